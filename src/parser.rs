use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use csv::{Reader, StringRecord};
use log::{info, warn};

use crate::error::Result;
use crate::schedule::slot_utils::parse_time_to_minutes;
use crate::schedule::{Booking, BookingStatus, Court, PaymentStatus};

/// Longest booking a row may carry: one full day
const MAX_DURATION_MINUTES: u32 = 24 * 60;

/// Duration in minutes, 1 ..= one day
fn parse_duration(value: &str) -> Option<u32> {
    value
        .trim()
        .parse()
        .ok()
        .filter(|minutes| (1..=MAX_DURATION_MINUTES).contains(minutes))
}

/// Price in RSD; an empty cell means no price yet
fn parse_price(value: &str) -> Option<u32> {
    match value.trim() {
        "" => Some(0),
        raw => raw.parse().ok(),
    }
}

/// Accepts ISO dates (2024-12-24) and the table's display format (24.12.2024)
fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d.%m.%Y"))
        .ok()
}

/// Column positions, found by header name with the export layout as fallback
struct Columns {
    id: usize,
    court: usize,
    date: usize,
    time: usize,
    duration: usize,
    player: usize,
    phone: usize,
    status: usize,
    payment: usize,
    price: usize,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str, fallback: usize| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .unwrap_or(fallback)
        };
        Self {
            id: find("id", 0),
            court: find("court", 1),
            date: find("date", 2),
            time: find("time", 3),
            duration: find("duration", 4),
            player: find("player", 5),
            phone: find("phone", 6),
            status: find("status", 7),
            payment: find("payment", 8),
            price: find("price", 9),
        }
    }
}

fn parse_record(record: &StringRecord, cols: &Columns, line: usize) -> Option<Booking> {
    let get = |idx: usize| record.get(idx).unwrap_or("").trim();

    let id = get(cols.id);
    let player = get(cols.player);
    let court_raw = get(cols.court);

    // Skip if essential fields are missing
    if id.is_empty() || player.is_empty() || court_raw.is_empty() {
        return None;
    }

    let court = match court_raw.parse::<Court>() {
        Ok(court) => court,
        Err(e) => {
            warn!("Line {}: {}", line, e);
            return None;
        }
    };
    let Some(date) = parse_date(get(cols.date)) else {
        warn!("Line {}: invalid date '{}'", line, get(cols.date));
        return None;
    };
    let start = get(cols.time);
    if parse_time_to_minutes(start).is_none() {
        warn!("Line {}: invalid time '{}'", line, start);
        return None;
    }

    let status = match get(cols.status) {
        "" => BookingStatus::Pending,
        raw => match raw.parse() {
            Ok(status) => status,
            Err(e) => {
                warn!("Line {}: {}", line, e);
                return None;
            }
        },
    };
    let Some(duration_minutes) = parse_duration(get(cols.duration)) else {
        warn!("Line {}: invalid duration '{}'", line, get(cols.duration));
        return None;
    };
    let Some(total_price) = parse_price(get(cols.price)) else {
        warn!("Line {}: invalid price '{}'", line, get(cols.price));
        return None;
    };
    let payment_status = get(cols.payment).parse().unwrap_or_default();
    let phone = Some(get(cols.phone)).filter(|p| !p.is_empty()).map(str::to_string);

    Some(Booking {
        id: id.to_string(),
        court,
        date,
        start: start.to_string(),
        duration_minutes,
        player: player.to_string(),
        phone,
        status,
        payment_status,
        total_price,
    })
}

/// Loads bookings from a CSV file.
///
/// Rows without an id, player or court are skipped, as are rows whose court,
/// date, time, duration, price or status cannot be read. A later row with an already seen id
/// replaces the earlier one in place.
pub fn load_bookings<P: AsRef<Path>>(csv_path: P) -> Result<Vec<Booking>> {
    let mut reader = Reader::from_path(csv_path.as_ref())?;
    let cols = Columns::from_headers(reader.headers()?);

    let mut bookings: Vec<Booking> = Vec::new();
    let mut by_id: HashMap<String, usize> = HashMap::new();

    for (i, result) in reader.records().enumerate() {
        let record = result?;
        // header is line 1
        let Some(booking) = parse_record(&record, &cols, i + 2) else {
            continue;
        };
        match by_id.get(&booking.id) {
            Some(&pos) => bookings[pos] = booking,
            None => {
                by_id.insert(booking.id.clone(), bookings.len());
                bookings.push(booking);
            }
        }
    }

    info!("Loaded {} bookings from {}", bookings.len(), csv_path.as_ref().display());
    Ok(bookings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::export_bookings_to_csv;
    use crate::mock;
    use std::fs;

    #[test]
    fn test_export_then_load_restores_bookings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookings.csv");
        let original = mock::table_bookings();
        export_bookings_to_csv(&original, &path).unwrap();

        let loaded = load_bookings(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_columns_found_by_header_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reordered.csv");
        fs::write(
            &path,
            "player,court,time,duration,date,id\n\
             Ana Lukić, c3 ,17:00,60,24.12.2024,a1\n",
        )
        .unwrap();

        let loaded = load_bookings(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        let b = &loaded[0];
        assert_eq!(b.id, "a1");
        assert_eq!(b.court, Court::Three);
        assert_eq!(b.date, mock::featured_date());
        assert_eq!(b.duration_minutes, 60);
        assert_eq!(b.status, BookingStatus::Pending);
        assert_eq!(b.payment_status, PaymentStatus::Unpaid);
        assert_eq!(b.phone, None);
    }

    #[test]
    fn test_bad_rows_skipped_and_duplicates_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messy.csv");
        fs::write(
            &path,
            "id,court,date,time,duration,player,phone,status,payment,price\n\
             1,Teren 1,2024-12-24,09:00,60,Marko,,confirmed,paid,3500\n\
             2,Teren 9,2024-12-24,10:00,60,Jovan,,confirmed,paid,3500\n\
             3,Teren 2,2024-12-24,25:00,60,Nikola,,confirmed,paid,3500\n\
             4,Teren 2,2024-12-24,11:00,60,,,confirmed,paid,3500\n\
             1,Teren 1,2024-12-24,09:00,90,Marko,,completed,paid,4500\n",
        )
        .unwrap();

        let loaded = load_bookings(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].duration_minutes, 90);
        assert_eq!(loaded[0].status, BookingStatus::Completed);
    }

    #[test]
    fn test_bad_durations_and_prices_skip_the_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("durations.csv");
        fs::write(
            &path,
            "id,court,date,time,duration,player,phone,status,payment,price\n\
             1,Teren 1,2024-12-24,09:00,4294967295,Marko,,confirmed,paid,3500\n\
             2,Teren 1,2024-12-24,10:00,sixty,Jovan,,confirmed,paid,3500\n\
             3,Teren 1,2024-12-24,11:00,0,Nikola,,confirmed,paid,3500\n\
             4,Teren 1,2024-12-24,12:00,,Stefan,,confirmed,paid,3500\n\
             5,Teren 1,2024-12-24,13:00,60,Petar,,confirmed,paid,skupo\n\
             6,Teren 1,2024-12-24,14:00,60,Ana,,confirmed,paid,\n",
        )
        .unwrap();

        let loaded = load_bookings(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "6");
        assert_eq!(loaded[0].total_price, 0);
    }
}
