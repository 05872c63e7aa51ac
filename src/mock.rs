// Mock data for demo mode. Nothing here is persisted.

use chrono::NaiveDate;
use serde::Serialize;

use crate::schedule::{Booking, BookingStatus, Court, PaymentStatus};

/// The one day that has its own booking set; every other day shows the default set
pub fn featured_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 24).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn mock_booking(
    id: &str,
    court: Court,
    date: NaiveDate,
    start: &str,
    duration_minutes: u32,
    player: &str,
    phone: &str,
    status: BookingStatus,
    payment_status: PaymentStatus,
    total_price: u32,
) -> Booking {
    Booking {
        id: id.to_string(),
        court,
        date,
        start: start.to_string(),
        duration_minutes,
        player: player.to_string(),
        phone: Some(phone.to_string()),
        status,
        payment_status,
        total_price,
    }
}

fn featured_bookings(date: NaiveDate) -> Vec<Booking> {
    vec![
        mock_booking("1", Court::One, date, "09:00", 60, "Marko Marković", "+381 64 123 4567",
            BookingStatus::Confirmed, PaymentStatus::Paid, 4500),
        mock_booking("2", Court::One, date, "10:30", 90, "Jovan Jovanović", "+381 60 987 6543",
            BookingStatus::Confirmed, PaymentStatus::Unpaid, 5500),
        mock_booking("3", Court::Two, date, "09:00", 120, "Nikola Nikolić", "+381 61 222 3333",
            BookingStatus::Pending, PaymentStatus::Unpaid, 6500),
    ]
}

fn default_bookings(date: NaiveDate) -> Vec<Booking> {
    vec![
        mock_booking("4", Court::Three, date, "17:00", 60, "Stefan Stević", "+381 65 444 5555",
            BookingStatus::Confirmed, PaymentStatus::Unpaid, 3500),
        mock_booking("5", Court::Four, date, "18:30", 90, "Petar Petrović", "+381 63 777 8888",
            BookingStatus::Confirmed, PaymentStatus::Paid, 4500),
    ]
}

/// Mock bookings drawn on the schedule grid for `date`
pub fn bookings_for_date(date: NaiveDate) -> Vec<Booking> {
    if date == featured_date() {
        featured_bookings(date)
    } else {
        default_bookings(date)
    }
}

/// Bookings listed in the bookings table. This list is kept apart from the
/// grid sets: the same players appear with other courts and lengths.
pub fn table_bookings() -> Vec<Booking> {
    let date = featured_date();
    vec![
        mock_booking("1", Court::One, date, "09:00", 90, "Marko Marković", "+381 64 123 4567",
            BookingStatus::Confirmed, PaymentStatus::Paid, 4500),
        mock_booking("2", Court::Two, date, "10:30", 90, "Jovan Jovanović", "+381 60 987 6543",
            BookingStatus::Confirmed, PaymentStatus::Unpaid, 5500),
        mock_booking("3", Court::Three, date, "09:00", 120, "Nikola Nikolić", "+381 61 222 3333",
            BookingStatus::Pending, PaymentStatus::Unpaid, 6500),
        mock_booking("4", Court::One, date, "17:00", 60, "Stefan Stević", "+381 65 444 5555",
            BookingStatus::Cancelled, PaymentStatus::Refunded, 3500),
        mock_booking("5", Court::Four, date, "18:30", 90, "Petar Petrović", "+381 63 777 8888",
            BookingStatus::Completed, PaymentStatus::Paid, 4500),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Booking,
    Cancel,
    User,
}

#[derive(Debug, Clone, Serialize)]
pub struct Activity {
    pub user: String,
    pub action: String,
    pub ago: String,
    pub kind: ActivityKind,
}

pub fn recent_activity() -> Vec<Activity> {
    [
        ("Milan Perić", "napravio rezervaciju", "pre 5 min", ActivityKind::Booking),
        ("Ana Lukić", "otkazala termin", "pre 15 min", ActivityKind::Cancel),
        ("Marko Jurić", "se registrovao", "pre 1h", ActivityKind::User),
    ]
    .into_iter()
    .map(|(user, action, ago, kind)| Activity {
        user: user.to_string(),
        action: action.to_string(),
        ago: ago.to_string(),
        kind,
    })
    .collect()
}
