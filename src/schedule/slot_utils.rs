use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{AdminError, Result};

/// Last hour a day may open or close at
pub const LAST_HOUR: u32 = 23;

/// Opening hours and grid resolution of the booking day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotConfig {
    pub opening_hour: u32,
    pub closing_hour: u32,
    pub granularity_minutes: u32,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            opening_hour: 8,
            closing_hour: 22,
            granularity_minutes: 30,
        }
    }
}

impl SlotConfig {
    /// Opening must come before closing, and both must be hours of one day
    pub fn validate(&self) -> Result<()> {
        if self.closing_hour > LAST_HOUR || self.opening_hour >= self.closing_hour {
            return Err(AdminError::InvalidHours {
                opening: self.opening_hour,
                closing: self.closing_hour,
            });
        }
        Ok(())
    }

    /// Number of labels including the closing boundary (08:00..=22:00 at 30 min = 29)
    pub fn slot_count(&self) -> usize {
        if self.granularity_minutes == 0 || self.closing_hour < self.opening_hour {
            return 0;
        }
        let open_minutes = (self.closing_hour - self.opening_hour) * 60;
        (open_minutes / self.granularity_minutes) as usize + 1
    }

    pub fn slots(&self) -> Vec<String> {
        generate_time_slots(self.opening_hour, self.granularity_minutes, self.slot_count())
    }

    pub fn closing_minutes(&self) -> u32 {
        self.closing_hour * 60
    }
}

/// Generates `count` labels of the form HH:MM starting at `start_hour:00`
/// and advancing by `granularity_minutes`
pub fn generate_time_slots(start_hour: u32, granularity_minutes: u32, count: usize) -> Vec<String> {
    let start = start_hour * 60;
    let slots: Vec<String> = (0..count as u32)
        .map(|i| minutes_to_time_string(start + i * granularity_minutes))
        .collect();
    debug!(
        "Generated {} time slots from {:02}:00 every {} min",
        slots.len(),
        start_hour,
        granularity_minutes
    );
    slots
}

/// Parses a time string (HH:MM) to minutes since midnight
pub fn parse_time_to_minutes(time_str: &str) -> Option<u32> {
    let (hours, minutes) = time_str.trim().split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours >= 24 || minutes >= 60 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Formats minutes since midnight as HH:MM; hours past midnight keep counting
/// ("24:00") so labels never wrap back to the start of the day
pub fn minutes_to_time_string(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
