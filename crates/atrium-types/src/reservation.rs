//! The persisted reservation record.

use serde::{Deserialize, Serialize};

/// Smallest valid reservation identifier (inclusive).
pub const RESERVATION_ID_MIN: u32 = 10_000;

/// Largest valid reservation identifier (inclusive).
pub const RESERVATION_ID_MAX: u32 = 99_999;

/// A confirmed reservation, keyed externally by its 5-digit identifier.
///
/// Records reference a room and an activity by name but do not own
/// them; deleting either afterwards leaves the record intact. Records
/// are never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Name of the reserved room.
    pub room: String,
    /// Day name, e.g. `"Monday"`.
    pub day: String,
    /// Reserved hour range label, e.g. `"9:00-11:00"`.
    pub reserved_hours: String,
    /// Name of the activity the room was reserved for.
    pub activity: String,
}
