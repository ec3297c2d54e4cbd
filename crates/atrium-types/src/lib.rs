//! Shared types for the atrium room-booking services.
//!
//! This crate holds the vocabulary every other atrium crate speaks:
//! the status/outcome taxonomy returned by service operations, the
//! weekly calendar tables (day names, hour labels, grid bounds), and
//! the persisted [`Reservation`] record.

pub mod calendar;
pub mod outcome;
pub mod reservation;

pub use calendar::{
    CLOSE_HOUR, DAYS_PER_WEEK, OPEN_HOUR, SLOTS_PER_DAY, day_name, hour_label, range_label,
};
pub use outcome::{Outcome, Status};
pub use reservation::{RESERVATION_ID_MAX, RESERVATION_ID_MIN, Reservation};
