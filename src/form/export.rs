use std::path::Path;

use csv::WriterBuilder;

use crate::error::Result;
use crate::schedule::Booking;

pub const CSV_HEADERS: [&str; 10] = [
    "id", "court", "date", "time", "duration", "player", "phone", "status", "payment", "price",
];

/// Writes bookings to `csv_path` in the same column layout `parser::load_bookings` reads
pub fn export_bookings_to_csv(bookings: &[Booking], csv_path: &Path) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_path(csv_path)?;
    wtr.write_record(CSV_HEADERS)?;

    for booking in bookings {
        let date = booking.date.format("%Y-%m-%d").to_string();
        let duration = booking.duration_minutes.to_string();
        let price = booking.total_price.to_string();
        wtr.write_record([
            booking.id.as_str(),
            booking.court.name(),
            date.as_str(),
            booking.start.as_str(),
            duration.as_str(),
            booking.player.as_str(),
            booking.phone.as_deref().unwrap_or_default(),
            booking.status.as_str(),
            booking.payment_status.as_str(),
            price.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
