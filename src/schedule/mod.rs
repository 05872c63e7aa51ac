pub mod types;
pub mod slot_utils;
pub mod grid;
pub mod conflicts;

pub use types::{Booking, BookingStatus, Court, PaymentStatus};
pub use slot_utils::SlotConfig;
pub use grid::{layout_grid, RenderCell, ScheduleGrid};
pub use conflicts::ensure_bookable;
