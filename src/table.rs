use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AdminError, FieldErrors, Result};
use crate::schedule::{Booking, BookingStatus, Court, PaymentStatus};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const EMPTY_MESSAGE: &str = "Nema rezultata.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Player,
    Court,
    Date,
    Status,
    PaymentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Filter, sort and page settings of the bookings table, as sent in the query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingTableQuery {
    pub player: Option<String>,
    pub court: Option<String>,
    pub status: Option<String>,
    pub payment: Option<String>,
    pub date: Option<NaiveDate>,
    pub sort: Option<SortColumn>,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default)]
    pub page: usize,
    pub page_size: Option<usize>,
}

/// Empty strings and "all" mean the filter is off
fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

/// Parsed, typed form of the column filters
#[derive(Debug, Default)]
struct Filters {
    player: Option<String>,
    court: Option<Court>,
    status: Option<BookingStatus>,
    payment: Option<PaymentStatus>,
    date: Option<NaiveDate>,
}

impl Filters {
    fn matches(&self, booking: &Booking) -> bool {
        if let Some(needle) = &self.player {
            if !booking.player.to_lowercase().contains(needle) {
                return false;
            }
        }
        self.court.map_or(true, |c| booking.court == c)
            && self.status.map_or(true, |s| booking.status == s)
            && self.payment.map_or(true, |p| booking.payment_status == p)
            && self.date.map_or(true, |d| booking.date == d)
    }
}

impl BookingTableQuery {
    /// Number of column filters in use (player search excluded), as shown on the filter badge
    pub fn active_filter_count(&self) -> usize {
        [&self.court, &self.status, &self.payment]
            .into_iter()
            .filter(|v| active(v).is_some())
            .count()
    }

    fn filters(&self) -> Result<Filters> {
        let mut errors = FieldErrors::new();
        let court = match active(&self.court) {
            Some(raw) => match raw.parse::<Court>() {
                Ok(court) => Some(court),
                Err(e) => {
                    errors.add("court", e.to_string());
                    None
                }
            },
            None => None,
        };
        let status = match active(&self.status) {
            Some(raw) => raw.parse::<BookingStatus>().map_err(|e| errors.add("status", e)).ok(),
            None => None,
        };
        let payment = match active(&self.payment) {
            Some(raw) => raw.parse::<PaymentStatus>().map_err(|e| errors.add("payment", e)).ok(),
            None => None,
        };
        if !errors.is_empty() {
            return Err(AdminError::Validation(errors));
        }
        Ok(Filters {
            player: active(&self.player).map(str::to_lowercase),
            court,
            status,
            payment,
            date: self.date,
        })
    }
}

fn compare(column: SortColumn, a: &Booking, b: &Booking) -> Ordering {
    match column {
        SortColumn::Player => a.player.to_lowercase().cmp(&b.player.to_lowercase()),
        SortColumn::Court => a.court.cmp(&b.court),
        SortColumn::Date => a
            .date
            .cmp(&b.date)
            .then_with(|| a.start_minutes().cmp(&b.start_minutes())),
        SortColumn::Status => a.status.as_str().cmp(b.status.as_str()),
        SortColumn::PaymentStatus => a.payment_status.as_str().cmp(b.payment_status.as_str()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAction {
    View,
    Edit,
    Cancel,
}

impl RowAction {
    pub const ALL: [RowAction; 3] = [RowAction::View, RowAction::Edit, RowAction::Cancel];

    pub fn label(self) -> &'static str {
        match self {
            RowAction::View => "Vidi detalje",
            RowAction::Edit => "Izmeni rezervaciju",
            RowAction::Cancel => "Otkaži rezervaciju",
        }
    }
}

/// A bookings table row, formatted for display
#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    pub id: String,
    pub player: String,
    pub phone: Option<String>,
    pub court: Court,
    pub date: String,
    pub time: String,
    pub status: BookingStatus,
    pub status_label: &'static str,
    pub payment_status: PaymentStatus,
    pub payment_label: &'static str,
    pub price: String,
    pub actions: Vec<RowAction>,
}

impl From<&Booking> for TableRow {
    fn from(b: &Booking) -> Self {
        TableRow {
            id: b.id.clone(),
            player: b.player.clone(),
            phone: b.phone.clone(),
            court: b.court,
            date: b.date.format("%d.%m.%Y").to_string(),
            time: b.time_range(),
            status: b.status,
            status_label: b.status.label(),
            payment_status: b.payment_status,
            payment_label: b.payment_status.label(),
            price: format_price(b.total_price),
            actions: RowAction::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TablePage {
    pub rows: Vec<TableRow>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub can_previous: bool,
    pub can_next: bool,
    pub active_filters: usize,
    pub empty_message: Option<&'static str>,
}

/// "4.500 RSD"
pub fn format_price(amount: u32) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("{} RSD", grouped)
}

/// Filters, sorts and pages `bookings` according to `query`
pub fn query_bookings(bookings: &[Booking], query: &BookingTableQuery) -> Result<TablePage> {
    let filters = query.filters()?;
    let mut matching: Vec<&Booking> = bookings.iter().filter(|b| filters.matches(b)).collect();

    if let Some(column) = query.sort {
        matching.sort_by(|a, b| {
            let ord = compare(column, a, b);
            match query.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
    }

    let page_size = query.page_size.filter(|s| *s > 0).unwrap_or(DEFAULT_PAGE_SIZE);
    let total = matching.len();
    let page_count = total.div_ceil(page_size);
    let rows: Vec<TableRow> = matching
        .into_iter()
        .skip(query.page.saturating_mul(page_size))
        .take(page_size)
        .map(TableRow::from)
        .collect();

    Ok(TablePage {
        empty_message: rows.is_empty().then_some(EMPTY_MESSAGE),
        rows,
        total,
        page: query.page,
        page_size,
        page_count,
        can_previous: query.page > 0,
        can_next: query.page.saturating_add(1) < page_count,
        active_filters: query.active_filter_count(),
    })
}
