use std::time::Duration;

use async_trait::async_trait;
use log::{info, warn};
use rand::Rng;
use serde::Serialize;

use crate::error::{AdminError, Result};
use crate::schedule::Booking;

/// Collaborator that accepts a new booking on behalf of the admin
#[async_trait]
pub trait BookingSubmitter: Send + Sync {
    async fn submit(&self, booking: Booking) -> Result<Booking>;
}

/// Stand-in for a booking backend: waits `delay`, then accepts the booking.
/// With a non-zero `failure_rate` it fails that share of submissions.
#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    delay: Duration,
    failure_rate: f64,
}

impl SimulatedSubmitter {
    pub fn new(delay: Duration, failure_rate: f64) -> Self {
        Self {
            delay,
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }
}

impl Default for SimulatedSubmitter {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000), 0.0)
    }
}

#[async_trait]
impl BookingSubmitter for SimulatedSubmitter {
    async fn submit(&self, booking: Booking) -> Result<Booking> {
        tokio::time::sleep(self.delay).await;

        let failed = self.failure_rate > 0.0 && rand::thread_rng().gen_bool(self.failure_rate);
        if failed {
            warn!("Simulated submission failure for {} at {}", booking.court, booking.start);
            return Err(AdminError::Submission("simulated backend failure".to_string()));
        }

        info!(
            "Booking {} accepted: {} - {} {} {}",
            booking.id, booking.player, booking.court, booking.date, booking.time_range()
        );
        Ok(booking)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Toast shown to the admin after a submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: Option<String>,
}

impl Notification {
    pub fn booking_created(booking: &Booking) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: "Rezervacija uspešno kreirana!".to_string(),
            description: Some(format!("{} - {} u {}", booking.player, booking.court, booking.start)),
        }
    }

    pub fn booking_failed() -> Self {
        Self {
            kind: NotificationKind::Error,
            title: "Greška pri kreiranju rezervacije.".to_string(),
            description: None,
        }
    }
}
