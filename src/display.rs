use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::schedule::{RenderCell, ScheduleGrid};

/// Formats one cell as "HH:MM [SLOBODNO]" or "HH:MM-HH:MM Player (Potv. • 90m)"
pub fn format_cell(cell: &RenderCell, slots: &[String], index: usize) -> String {
    match cell {
        RenderCell::Empty { slot_label, .. } => format!("{} [SLOBODNO]", slot_label),
        RenderCell::Booking {
            slot_label,
            span,
            player,
            tone,
            duration_minutes,
            truncated,
            ..
        } => {
            let end = slots
                .get(index + span)
                .map(String::as_str)
                .unwrap_or("kraj");
            let cut = if *truncated { " [SKRAĆENO]" } else { "" };
            format!(
                "{}-{} {} ({} • {}m){}",
                slot_label,
                end,
                player,
                tone.short_label(),
                duration_minutes,
                cut
            )
        }
    }
}

/// Text form of a titled grid, one block per court
struct ScheduleText<'a> {
    title: &'a str,
    grid: &'a ScheduleGrid,
}

impl fmt::Display for ScheduleText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "** {} **", self.title)?;

        for row in &self.grid.rows {
            writeln!(f, "\n== {} ==", row.court)?;
            let mut index = 0;
            for cell in &row.cells {
                writeln!(f, "{}", format_cell(cell, &self.grid.slots, index))?;
                index += cell.span();
            }
            for unplaced in &row.unplaced {
                writeln!(
                    f,
                    "!! booking {} at {} ({} min) not shown: {:?}",
                    unplaced.booking_id, unplaced.start, unplaced.duration_minutes, unplaced.reason
                )?;
            }
        }
        Ok(())
    }
}

/// Renders the whole grid, one block per court
pub fn render_schedule(title: &str, grid: &ScheduleGrid) -> String {
    ScheduleText { title, grid }.to_string()
}

/// Writes a rendered schedule to a file
pub fn write_schedule_to_file(title: &str, grid: &ScheduleGrid, path: &Path) -> Result<()> {
    fs::write(path, render_schedule(title, grid))?;
    Ok(())
}

/// Prints a schedule in a readable format
pub fn print_schedule(title: &str, grid: &ScheduleGrid) {
    let placed: usize = grid.rows.iter().map(|r| r.booking_cells().count()).sum();
    let unplaced = grid.unplaced().count();

    println!("\n=== {} ===", title);
    println!("Bookings on grid: {}", placed);
    if unplaced > 0 {
        println!("⚠️  Bookings not shown: {}", unplaced);
    }
    print!("{}", render_schedule(title, grid));
}
