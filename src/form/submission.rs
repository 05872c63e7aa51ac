use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::FieldErrors;
use crate::schedule::{Booking, BookingStatus, Court, PaymentStatus, SlotConfig};

pub const DEFAULT_DURATION: &str = "90";
pub const DURATION_CHOICES: [u32; 3] = [60, 90, 120];

fn default_duration() -> String {
    DEFAULT_DURATION.to_string()
}

/// Quick-booking dialog fields as submitted by the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickBookingForm {
    #[serde(default)]
    pub court: String,
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: String,
    #[serde(default = "default_duration")]
    pub duration: String,
    #[serde(default)]
    pub player_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl QuickBookingForm {
    /// Blank dialog opened from the "Nova Rezervacija" button
    pub fn with_defaults(today: NaiveDate) -> Self {
        Self {
            court: String::new(),
            date: Some(today),
            time: String::new(),
            duration: default_duration(),
            player_name: String::new(),
            phone: None,
        }
    }

    /// Dialog opened by clicking an empty grid cell
    pub fn prefill(court: Court, time: &str, date: NaiveDate) -> Self {
        Self {
            court: court.name().to_string(),
            time: time.to_string(),
            ..Self::with_defaults(date)
        }
    }

    /// Checks every field and collects one message per failing field
    pub fn validate(&self, today: NaiveDate, config: &SlotConfig) -> Result<ValidatedBooking, FieldErrors> {
        let mut errors = FieldErrors::new();

        let court = if self.court.trim().is_empty() {
            errors.add("court", "Molimo izaberite teren.");
            None
        } else {
            match self.court.parse::<Court>() {
                Ok(court) => Some(court),
                Err(_) => {
                    errors.add("court", "Nepoznat teren.");
                    None
                }
            }
        };

        let date = match self.date {
            None => {
                errors.add("date", "Molimo izaberite datum.");
                None
            }
            Some(date) if date < today => {
                errors.add("date", "Datum ne može biti u prošlosti.");
                None
            }
            Some(date) => Some(date),
        };

        let time = self.time.trim();
        if time.is_empty() {
            errors.add("time", "Molimo izaberite vreme.");
        } else if !config.slots().iter().any(|s| s == time) {
            errors.add("time", "Izabrano vreme nije u rasporedu.");
        }

        let duration = match self.duration.trim() {
            "" => {
                errors.add("duration", "Molimo izaberite trajanje.");
                None
            }
            raw => match raw.parse::<u32>() {
                Ok(minutes) if DURATION_CHOICES.contains(&minutes) => Some(minutes),
                _ => {
                    errors.add("duration", "Trajanje mora biti 60, 90 ili 120 minuta.");
                    None
                }
            },
        };

        let player = self.player_name.trim();
        if player.chars().count() < 2 {
            errors.add("player_name", "Ime igrača mora imati bar 2 karaktera.");
        }

        match (court, date, duration) {
            (Some(court), Some(date), Some(duration_minutes)) if errors.is_empty() => Ok(ValidatedBooking {
                court,
                date,
                start: time.to_string(),
                duration_minutes,
                player: player.to_string(),
                phone: self
                    .phone
                    .as_deref()
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string),
            }),
            _ => Err(errors),
        }
    }
}

/// Quoted price in RSD for a new booking of the given length
pub fn quote_price(duration_minutes: u32) -> u32 {
    match duration_minutes {
        60 => 3500,
        90 => 4500,
        _ => 6500,
    }
}

/// Form values that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBooking {
    pub court: Court,
    pub date: NaiveDate,
    pub start: String,
    pub duration_minutes: u32,
    pub player: String,
    pub phone: Option<String>,
}

impl ValidatedBooking {
    /// New bookings start pending and unpaid
    pub fn into_booking(self, id: String) -> Booking {
        Booking {
            id,
            court: self.court,
            date: self.date,
            total_price: quote_price(self.duration_minutes),
            start: self.start,
            duration_minutes: self.duration_minutes,
            player: self.player,
            phone: self.phone,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
        }
    }
}
