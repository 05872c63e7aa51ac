use crate::error::{AdminError, Result};
use super::slot_utils::SlotConfig;
use super::types::Booking;

/// First existing booking that still holds the court during the candidate's interval
pub fn find_conflict<'a>(candidate: &Booking, existing: &'a [Booking]) -> Option<&'a Booking> {
    existing
        .iter()
        .filter(|b| b.blocks_court() && b.id != candidate.id)
        .find(|b| b.overlaps(candidate))
}

/// Rejects a new booking that runs past closing or overlaps an active booking
pub fn ensure_bookable(candidate: &Booking, existing: &[Booking], config: &SlotConfig) -> Result<()> {
    let end = candidate
        .end_minutes()
        .ok_or_else(|| AdminError::InvalidTime(candidate.start.clone()))?;
    if end > config.closing_minutes() {
        return Err(AdminError::InvalidTime(format!(
            "{} + {} min ends after closing ({:02}:00)",
            candidate.start, candidate.duration_minutes, config.closing_hour
        )));
    }

    if let Some(existing) = find_conflict(candidate, existing) {
        return Err(AdminError::Conflict {
            court: candidate.court,
            start: existing.time_range(),
            existing_id: existing.id.clone(),
        });
    }
    Ok(())
}
