//! Weekly calendar tables for the room occupancy grid.
//!
//! Rooms are bookable Monday through Sunday between a fixed opening
//! hour (9:00) and closing hour (18:00). Days are addressed 1-based
//! (Monday = 1, Sunday = 7) and hours map onto grid slots via
//! `slot = hour - OPEN_HOUR`.

/// First bookable hour of the day.
pub const OPEN_HOUR: u32 = 9;

/// Hour at which rooms close. The last bookable slot ends here.
pub const CLOSE_HOUR: u32 = 18;

/// Number of days in the weekly grid.
pub const DAYS_PER_WEEK: usize = 7;

/// Number of hour-wide slots per day.
pub const SLOTS_PER_DAY: usize = (CLOSE_HOUR - OPEN_HOUR) as usize;

/// Day names indexed Monday-first.
const DAY_NAMES: [&str; DAYS_PER_WEEK] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Hour labels from opening to closing, inclusive on both ends so a
/// range label can name the end of the last slot.
const HOUR_LABELS: [&str; SLOTS_PER_DAY + 1] = [
    "9:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00", "18:00",
];

/// Name of a 1-based day index, or `None` outside `[1, 7]`.
pub fn day_name(day: u32) -> Option<&'static str> {
    if (1..=DAYS_PER_WEEK as u32).contains(&day) {
        Some(DAY_NAMES[(day - 1) as usize])
    } else {
        None
    }
}

/// Label for a single hour, or `None` outside `[OPEN_HOUR, CLOSE_HOUR]`.
pub fn hour_label(hour: u32) -> Option<&'static str> {
    if (OPEN_HOUR..=CLOSE_HOUR).contains(&hour) {
        Some(HOUR_LABELS[(hour - OPEN_HOUR) as usize])
    } else {
        None
    }
}

/// Human-readable label for the hour range `[start, end)`, e.g.
/// `"9:00-11:00"`. Returns `None` if either bound falls outside the
/// opening hours or the range is empty.
pub fn range_label(start_hour: u32, end_hour: u32) -> Option<String> {
    if start_hour >= end_hour {
        return None;
    }
    Some(format!("{}-{}", hour_label(start_hour)?, hour_label(end_hour)?))
}
