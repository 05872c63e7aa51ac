use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AdminError;
use super::slot_utils::{minutes_to_time_string, parse_time_to_minutes};

/// One of the four rentable courts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Court {
    #[serde(rename = "Teren 1")]
    One,
    #[serde(rename = "Teren 2")]
    Two,
    #[serde(rename = "Teren 3")]
    Three,
    #[serde(rename = "Teren 4")]
    Four,
}

impl Court {
    /// All courts in grid row order
    pub const ALL: [Court; 4] = [Court::One, Court::Two, Court::Three, Court::Four];

    pub fn id(self) -> &'static str {
        match self {
            Court::One => "c1",
            Court::Two => "c2",
            Court::Three => "c3",
            Court::Four => "c4",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Court::One => "Teren 1",
            Court::Two => "Teren 2",
            Court::Three => "Teren 3",
            Court::Four => "Teren 4",
        }
    }
}

impl fmt::Display for Court {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Court {
    type Err = AdminError;

    /// Accepts either the display name ("Teren 2") or the short id ("c2")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Court::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted) || c.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AdminError::UnknownCourt(wanted.to_string()))
    }
}

/// Visual treatment of a booking cell on the schedule grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellTone {
    Occupied,
    Tentative,
}

impl CellTone {
    /// Short label shown under the player name
    pub fn short_label(self) -> &'static str {
        match self {
            CellTone::Occupied => "Potv.",
            CellTone::Tentative => "Ček.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
        BookingStatus::Completed,
        BookingStatus::NoShow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
            BookingStatus::NoShow => "no_show",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BookingStatus::Pending => "Na čekanju",
            BookingStatus::Confirmed => "Potvrđeno",
            BookingStatus::Cancelled => "Otkazano",
            BookingStatus::Completed => "Završeno",
            BookingStatus::NoShow => "Nedolazak",
        }
    }

    /// Only confirmed and completed bookings count as occupied on the grid
    pub fn tone(self) -> CellTone {
        match self {
            BookingStatus::Confirmed | BookingStatus::Completed => CellTone::Occupied,
            BookingStatus::Pending | BookingStatus::Cancelled | BookingStatus::NoShow => CellTone::Tentative,
        }
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        BookingStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == wanted)
            .ok_or_else(|| format!("unknown booking status '{}'", s.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "Neplaćeno",
            PaymentStatus::Paid => "Plaćeno",
            PaymentStatus::Refunded => "Vraćeno",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unpaid" => Ok(PaymentStatus::Unpaid),
            "paid" => Ok(PaymentStatus::Paid),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(format!("unknown payment status '{}'", other)),
        }
    }
}

/// A court booking as shown on both the schedule grid and the bookings table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub court: Court,
    pub date: NaiveDate,
    pub start: String, // HH:MM slot label
    pub duration_minutes: u32,
    pub player: String,
    pub phone: Option<String>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub total_price: u32, // RSD
}

impl Booking {
    pub fn start_minutes(&self) -> Option<u32> {
        parse_time_to_minutes(&self.start)
    }

    /// None when the start is unreadable or the end does not fit in a u32
    pub fn end_minutes(&self) -> Option<u32> {
        self.start_minutes()?.checked_add(self.duration_minutes)
    }

    pub fn end_label(&self) -> Option<String> {
        self.end_minutes().map(minutes_to_time_string)
    }

    /// "09:00 - 10:30"
    pub fn time_range(&self) -> String {
        match self.end_label() {
            Some(end) => format!("{} - {}", self.start, end),
            None => self.start.clone(),
        }
    }

    /// Number of grid columns this booking covers, or None when the duration
    /// is zero or not an exact multiple of the granularity
    pub fn span(&self, granularity_minutes: u32) -> Option<usize> {
        if granularity_minutes == 0
            || self.duration_minutes == 0
            || self.duration_minutes % granularity_minutes != 0
        {
            return None;
        }
        Some((self.duration_minutes / granularity_minutes) as usize)
    }

    /// Cancelled bookings no longer hold the court
    pub fn blocks_court(&self) -> bool {
        self.status != BookingStatus::Cancelled
    }

    /// Half-open interval overlap on the same court and date
    pub fn overlaps(&self, other: &Booking) -> bool {
        if self.court != other.court || self.date != other.date {
            return false;
        }
        match (self.start_minutes(), self.end_minutes(), other.start_minutes(), other.end_minutes()) {
            (Some(a_start), Some(a_end), Some(b_start), Some(b_end)) => a_start < b_end && b_start < a_end,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(court: Court, start: &str, duration: u32) -> Booking {
        Booking {
            id: "1".to_string(),
            court,
            date: NaiveDate::from_ymd_opt(2024, 12, 24).unwrap(),
            start: start.to_string(),
            duration_minutes: duration,
            player: "Marko Marković".to_string(),
            phone: None,
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Paid,
            total_price: 4500,
        }
    }

    #[test]
    fn test_court_from_str() {
        assert_eq!("Teren 2".parse::<Court>().unwrap(), Court::Two);
        assert_eq!("c4".parse::<Court>().unwrap(), Court::Four);
        assert!("Teren 9".parse::<Court>().is_err());
    }

    #[test]
    fn test_court_serde_uses_display_name() {
        assert_eq!(serde_json::to_string(&Court::Three).unwrap(), "\"Teren 3\"");
        let parsed: Court = serde_json::from_str("\"Teren 1\"").unwrap();
        assert_eq!(parsed, Court::One);
    }

    #[test]
    fn test_status_tone_collapse() {
        assert_eq!(BookingStatus::Confirmed.tone(), CellTone::Occupied);
        assert_eq!(BookingStatus::Completed.tone(), CellTone::Occupied);
        assert_eq!(BookingStatus::Pending.tone(), CellTone::Tentative);
        assert_eq!(BookingStatus::Cancelled.tone(), CellTone::Tentative);
        assert_eq!(BookingStatus::NoShow.tone(), CellTone::Tentative);
    }

    #[test]
    fn test_status_serde_snake_case() {
        assert_eq!(serde_json::to_string(&BookingStatus::NoShow).unwrap(), "\"no_show\"");
        assert_eq!("no_show".parse::<BookingStatus>().unwrap(), BookingStatus::NoShow);
    }

    #[test]
    fn test_span() {
        assert_eq!(booking(Court::One, "08:30", 90).span(30), Some(3));
        assert_eq!(booking(Court::One, "08:30", 45).span(30), None);
        assert_eq!(booking(Court::One, "08:30", 0).span(30), None);
    }

    #[test]
    fn test_time_range() {
        assert_eq!(booking(Court::One, "09:00", 90).time_range(), "09:00 - 10:30");
    }

    #[test]
    fn test_huge_duration_has_no_end() {
        let b = booking(Court::One, "09:00", u32::MAX);
        assert_eq!(b.end_minutes(), None);
        assert_eq!(b.time_range(), "09:00");
        assert!(!b.overlaps(&booking(Court::One, "10:00", 60)));
    }

    #[test]
    fn test_overlaps_is_half_open() {
        let a = booking(Court::One, "09:00", 60);
        let touching = booking(Court::One, "10:00", 60);
        let inside = booking(Court::One, "09:30", 60);
        let other_court = booking(Court::Two, "09:30", 60);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(!a.overlaps(&other_court));
    }
}
