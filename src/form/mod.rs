pub mod submission;
pub mod submitter;
pub mod intake;
pub mod export;

pub use submission::QuickBookingForm;
pub use submitter::{BookingSubmitter, Notification, SimulatedSubmitter};
pub use intake::create_booking;
pub use export::export_bookings_to_csv;
