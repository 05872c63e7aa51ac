use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::NaiveDate;
use log::info;

use crate::error::{AdminError, Result};
use crate::mock;
use crate::schedule::{ensure_bookable, Booking, SlotConfig};

/// Where the day's existing bookings come from
#[derive(Debug, Clone)]
pub enum BookingSource {
    /// Built-in demo data, one featured day plus a default set for every other day
    Mock,
    /// Bookings read from a CSV file
    Loaded(Vec<Booking>),
}

impl BookingSource {
    pub fn for_date(&self, date: NaiveDate) -> Vec<Booking> {
        match self {
            BookingSource::Mock => mock::bookings_for_date(date),
            BookingSource::Loaded(bookings) => bookings.iter().filter(|b| b.date == date).cloned().collect(),
        }
    }

    pub fn all(&self) -> Vec<Booking> {
        match self {
            BookingSource::Mock => mock::table_bookings(),
            BookingSource::Loaded(bookings) => bookings.clone(),
        }
    }

    fn highest_numeric_id(&self) -> u64 {
        self.all()
            .iter()
            .filter_map(|b| b.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
    }
}

/// Existing bookings plus those accepted during this process's lifetime.
/// Accepted bookings live in memory only.
pub struct BookingLedger {
    source: BookingSource,
    accepted: Mutex<Vec<Booking>>,
    next_id: AtomicU64,
}

impl BookingLedger {
    pub fn new(source: BookingSource) -> Self {
        let next_id = source.highest_numeric_id() + 1;
        Self {
            source,
            accepted: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(next_id),
        }
    }

    pub fn next_id(&self) -> String {
        self.next_id.fetch_add(1, Ordering::Relaxed).to_string()
    }

    pub fn bookings_for_date(&self, date: NaiveDate) -> Result<Vec<Booking>> {
        let accepted = self.accepted.lock().map_err(|_| AdminError::StatePoisoned)?;
        let mut bookings = self.source.for_date(date);
        bookings.extend(accepted.iter().filter(|b| b.date == date).cloned());
        Ok(bookings)
    }

    pub fn all(&self) -> Result<Vec<Booking>> {
        let accepted = self.accepted.lock().map_err(|_| AdminError::StatePoisoned)?;
        let mut bookings = self.source.all();
        bookings.extend(accepted.iter().cloned());
        Ok(bookings)
    }

    /// Stores an accepted booking, re-checking availability under the lock so
    /// two concurrent submissions for the same slot cannot both land
    pub fn record(&self, booking: Booking, config: &SlotConfig) -> Result<Booking> {
        let mut accepted = self.accepted.lock().map_err(|_| AdminError::StatePoisoned)?;
        let mut existing = self.source.for_date(booking.date);
        existing.extend(accepted.iter().filter(|b| b.date == booking.date).cloned());
        ensure_bookable(&booking, &existing, config)?;

        info!("Recorded booking {} ({} {} {})", booking.id, booking.court, booking.date, booking.start);
        accepted.push(booking.clone());
        Ok(booking)
    }
}
