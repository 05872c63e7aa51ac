use log::warn;
use serde::Serialize;

use super::types::{Booking, BookingStatus, CellTone, Court};

/// One cell of a court row on the schedule grid
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderCell {
    Booking {
        booking_id: String,
        slot_label: String,
        span: usize,
        player: String,
        status: BookingStatus,
        tone: CellTone,
        duration_minutes: u32,
        /// Span was clamped because the booking runs past the last slot
        truncated: bool,
    },
    Empty {
        court: Court,
        slot_label: String,
    },
}

impl RenderCell {
    /// Number of slot columns this cell covers
    pub fn span(&self) -> usize {
        match self {
            RenderCell::Booking { span, .. } => *span,
            RenderCell::Empty { .. } => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RenderCell::Empty { .. })
    }

    pub fn slot_label(&self) -> &str {
        match self {
            RenderCell::Booking { slot_label, .. } | RenderCell::Empty { slot_label, .. } => slot_label,
        }
    }

    /// Routes a click on this cell. Empty cells hand `(court, slot_label)` to the
    /// handler and return true; booking cells ignore the click.
    pub fn click<F>(&self, handler: F) -> bool
    where
        F: FnOnce(Court, &str),
    {
        match self {
            RenderCell::Empty { court, slot_label } => {
                handler(*court, slot_label);
                true
            }
            RenderCell::Booking { .. } => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnplacedReason {
    UnknownStartSlot,
    InvalidDuration,
    Overlapping,
}

/// A booking the layout could not put on the row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnplacedBooking {
    pub booking_id: String,
    pub start: String,
    pub duration_minutes: u32,
    pub reason: UnplacedReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourtRow {
    pub court: Court,
    pub cells: Vec<RenderCell>,
    pub unplaced: Vec<UnplacedBooking>,
}

impl CourtRow {
    /// Total number of slot columns covered by the row's cells
    pub fn width(&self) -> usize {
        self.cells.iter().map(RenderCell::span).sum()
    }

    pub fn booking_cells(&self) -> impl Iterator<Item = &RenderCell> {
        self.cells.iter().filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleGrid {
    pub slots: Vec<String>,
    pub rows: Vec<CourtRow>,
}

impl ScheduleGrid {
    pub fn row(&self, court: Court) -> Option<&CourtRow> {
        self.rows.iter().find(|r| r.court == court)
    }

    pub fn unplaced(&self) -> impl Iterator<Item = &UnplacedBooking> {
        self.rows.iter().flat_map(|r| r.unplaced.iter())
    }

    /// Columns held by bookings across all rows; cancelled cells don't count
    pub fn booked_columns(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| r.booking_cells())
            .filter(|c| !matches!(c, RenderCell::Booking { status: BookingStatus::Cancelled, .. }))
            .map(RenderCell::span)
            .sum()
    }

    pub fn total_columns(&self) -> usize {
        self.slots.len() * self.rows.len()
    }
}

/// Picks the booking starting at `label`: the first one still holding the court,
/// otherwise the first cancelled one
fn pick_booking(bookings: &[&Booking], label: &str, granularity_minutes: u32) -> Option<(usize, usize)> {
    let mut fallback = None;
    for (i, booking) in bookings.iter().enumerate() {
        if booking.start != label {
            continue;
        }
        let Some(span) = booking.span(granularity_minutes) else {
            continue;
        };
        if booking.blocks_court() {
            return Some((i, span));
        }
        if fallback.is_none() {
            fallback = Some((i, span));
        }
    }
    fallback
}

/// Lays out one court's bookings left to right over `slots`.
///
/// Each placed booking becomes one cell spanning `duration / granularity`
/// columns; every uncovered slot becomes its own empty cell. Bookings that
/// cannot be placed are returned in `unplaced` instead of being drawn.
pub fn layout_court_row(
    court: Court,
    slots: &[String],
    bookings: &[&Booking],
    granularity_minutes: u32,
) -> CourtRow {
    let mut cells = Vec::with_capacity(slots.len());
    let mut placed = vec![false; bookings.len()];
    let mut skip_until: Option<usize> = None;

    for (index, label) in slots.iter().enumerate() {
        if skip_until.is_some_and(|until| index <= until) {
            continue;
        }

        match pick_booking(bookings, label, granularity_minutes) {
            Some((booking_index, span)) => {
                let booking = bookings[booking_index];
                let remaining = slots.len() - index;
                let truncated = span > remaining;
                let span = span.min(remaining);

                placed[booking_index] = true;
                skip_until = Some(index + span - 1);
                cells.push(RenderCell::Booking {
                    booking_id: booking.id.clone(),
                    slot_label: label.clone(),
                    span,
                    player: booking.player.clone(),
                    status: booking.status,
                    tone: booking.status.tone(),
                    duration_minutes: booking.duration_minutes,
                    truncated,
                });
            }
            None => cells.push(RenderCell::Empty {
                court,
                slot_label: label.clone(),
            }),
        }
    }

    let unplaced: Vec<UnplacedBooking> = bookings
        .iter()
        .zip(placed)
        .filter(|(_, was_placed)| !was_placed)
        .map(|(booking, _)| {
            let reason = if booking.span(granularity_minutes).is_none() {
                UnplacedReason::InvalidDuration
            } else if !slots.iter().any(|s| *s == booking.start) {
                UnplacedReason::UnknownStartSlot
            } else {
                UnplacedReason::Overlapping
            };
            warn!(
                "{}: booking {} at {} ({} min) not placed: {:?}",
                court, booking.id, booking.start, booking.duration_minutes, reason
            );
            UnplacedBooking {
                booking_id: booking.id.clone(),
                start: booking.start.clone(),
                duration_minutes: booking.duration_minutes,
                reason,
            }
        })
        .collect();

    CourtRow { court, cells, unplaced }
}

/// Lays out every court, in `Court::ALL` order, from a mixed booking list
pub fn layout_grid(slots: &[String], bookings: &[Booking], granularity_minutes: u32) -> ScheduleGrid {
    let rows = Court::ALL
        .into_iter()
        .map(|court| {
            let for_court: Vec<&Booking> = bookings.iter().filter(|b| b.court == court).collect();
            layout_court_row(court, slots, &for_court, granularity_minutes)
        })
        .collect();

    ScheduleGrid {
        slots: slots.to_vec(),
        rows,
    }
}
