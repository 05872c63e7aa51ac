use chrono::NaiveDate;
use log::warn;

use crate::error::{AdminError, Result};
use crate::ledger::BookingLedger;
use crate::schedule::{ensure_bookable, Booking, SlotConfig};
use super::submission::QuickBookingForm;
use super::submitter::BookingSubmitter;

/// Validates the dialog, rejects overlaps, hands the booking to the submitter
/// and records it once accepted
pub async fn create_booking(
    form: &QuickBookingForm,
    today: NaiveDate,
    config: &SlotConfig,
    ledger: &BookingLedger,
    submitter: &dyn BookingSubmitter,
) -> Result<Booking> {
    let validated = form.validate(today, config).map_err(|fields| {
        warn!("Quick booking rejected: {}", fields);
        AdminError::Validation(fields)
    })?;

    let candidate = validated.into_booking(ledger.next_id());
    let existing = ledger.bookings_for_date(candidate.date)?;
    if let Err(e) = ensure_bookable(&candidate, &existing, config) {
        warn!("Quick booking rejected: {}", e);
        return Err(e);
    }

    let accepted = submitter.submit(candidate).await?;
    ledger.record(accepted, config)
}
