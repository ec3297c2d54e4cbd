//! Room inventory and the weekly availability grid.
//!
//! Each room is a 7×9 grid of occupied flags: one row per day
//! (Monday-first), one slot per opening hour. The reservation step is
//! check-then-set under the service lock, so a range is either
//! committed whole or not at all.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::error;

use atrium_store::{KeyValueStore, StoreError};
use atrium_types::{
    CLOSE_HOUR, DAYS_PER_WEEK, OPEN_HOUR, Outcome, SLOTS_PER_DAY, day_name, range_label,
};
use atrium_wire::RouteSpec;

use crate::error::Result;
use crate::service::{Service, numeric};

/// Logical store name for the room table.
pub const ROOMS_STORE: &str = "rooms";

/// Weekly occupancy grid: `grid[day - 1][hour - OPEN_HOUR]`.
type Grid = Vec<Vec<bool>>;

const ROUTES: &[RouteSpec] = &[
    RouteSpec::exact("add", 1),
    RouteSpec::exact("remove", 1),
    RouteSpec::exact("reserve", 4),
    RouteSpec::ranged("checkavailability", 1, 2),
];

/// The room inventory service.
pub struct RoomService<S: KeyValueStore> {
    rooms: Mutex<BTreeMap<String, Grid>>,
    store: S,
}

impl<S: KeyValueStore> RoomService<S> {
    /// Load the room table from the store.
    pub fn open(store: S) -> Result<Self> {
        let rooms = store.load(ROOMS_STORE)?;
        Ok(Self {
            rooms: Mutex::new(rooms),
            store,
        })
    }

    fn empty_grid() -> Grid {
        vec![vec![false; SLOTS_PER_DAY]; DAYS_PER_WEEK]
    }

    fn persist(&self, rooms: &BTreeMap<String, Grid>) -> std::result::Result<(), StoreError> {
        self.store.save(ROOMS_STORE, rooms)
    }

    fn persistence_failed(e: &StoreError) -> Outcome {
        error!(error = %e, "failed to persist room table");
        Outcome::internal("<h2>Internal Server Error</h2>")
    }

    /// Create a room with an all-free grid.
    pub fn add(&self, name: &str) -> Outcome {
        let mut rooms = self.rooms.lock();
        if rooms.contains_key(name) {
            return Outcome::forbidden(format!("<h2>Room {name} already exists!</h2>"));
        }
        rooms.insert(name.to_string(), Self::empty_grid());
        if let Err(e) = self.persist(&rooms) {
            return Self::persistence_failed(&e);
        }
        Outcome::ok(format!("<h1>Room '{name}' added successfully.</h1>"))
    }

    /// Delete a room. Absence answers 403, matching the observed
    /// behavior rather than 404.
    pub fn remove(&self, name: &str) -> Outcome {
        let mut rooms = self.rooms.lock();
        if rooms.remove(name).is_none() {
            return Outcome::forbidden(format!("<h2>Room {name} does not exist!</h2>"));
        }
        if let Err(e) = self.persist(&rooms) {
            return Self::persistence_failed(&e);
        }
        Outcome::ok(format!("<h1>Room '{name}' removed successfully.</h1>"))
    }

    /// Reserve `duration` consecutive slots starting at `hour` on
    /// `day`. Any occupied slot in the range fails the whole request
    /// with no mutation.
    pub fn reserve(&self, name: &str, day: u32, hour: u32, duration: u32) -> Outcome {
        let valid = (1..=DAYS_PER_WEEK as u32).contains(&day)
            && (OPEN_HOUR..CLOSE_HOUR).contains(&hour)
            && duration > 0
            && duration <= CLOSE_HOUR - hour;
        if !valid {
            return Outcome::invalid("<h2>Inputs are invalid!</h2>");
        }

        let mut rooms = self.rooms.lock();
        let Some(grid) = rooms.get_mut(name) else {
            return Outcome::not_found(format!("<h2>Room {name} does not exist!</h2>"));
        };

        let start = (hour - OPEN_HOUR) as usize;
        let end = start + duration as usize;
        let Some(row) = grid.get_mut((day - 1) as usize) else {
            return Outcome::internal("<h2>Internal Server Error</h2>");
        };
        if row.len() < end {
            return Outcome::internal("<h2>Internal Server Error</h2>");
        }

        if row[start..end].iter().any(|&occupied| occupied) {
            return Outcome::forbidden(format!(
                "<h2>Room {name} is not available for the requested time slice!</h2>"
            ));
        }
        for slot in &mut row[start..end] {
            *slot = true;
        }

        if let Err(e) = self.persist(&rooms) {
            return Self::persistence_failed(&e);
        }

        let (Some(day_label), Some(hours)) = (day_name(day), range_label(hour, hour + duration))
        else {
            return Outcome::internal("<h2>Internal Server Error</h2>");
        };
        Outcome::ok(format!(
            "<h1>Room '{name}' reserved for {day_label} {hours}.</h1>"
        ))
    }

    /// List free hour-ranges, for one day or (with `day` omitted) the
    /// whole week. Any per-day failure fails the aggregate with 500.
    pub fn availability(&self, name: &str, day: Option<u32>) -> Outcome {
        match day {
            Some(day) => self.availability_for_day(name, day),
            None => {
                let mut body = String::new();
                for day in 1..=DAYS_PER_WEEK as u32 {
                    let outcome = self.availability_for_day(name, day);
                    if !outcome.is_ok() {
                        return Outcome::internal("<h2>Internal Server Error</h2>");
                    }
                    body.push_str(&outcome.message);
                    body.push('\n');
                }
                Outcome::ok(body.trim_end().to_string())
            }
        }
    }

    fn availability_for_day(&self, name: &str, day: u32) -> Outcome {
        let rooms = self.rooms.lock();
        let Some(grid) = rooms.get(name) else {
            return Outcome::not_found(format!("<h2>Room {name} does not exist!</h2>"));
        };
        let Some(day_label) = day_name(day) else {
            return Outcome::invalid(format!("<h2>Invalid day ({day})!</h2>"));
        };

        let Some(row) = grid.get((day - 1) as usize) else {
            return Outcome::internal("<h2>Internal Server Error</h2>");
        };

        let mut body = format!("<h3>{day_label}</h3>");
        for (slot, &occupied) in row.iter().take(SLOTS_PER_DAY).enumerate() {
            if occupied {
                continue;
            }
            let start = OPEN_HOUR + slot as u32;
            if let Some(label) = range_label(start, start + 1) {
                body.push_str(&format!("\n<p>{label}</p>"));
            }
        }
        Outcome::ok(body)
    }
}

#[async_trait]
impl<S: KeyValueStore + 'static> Service for RoomService<S> {
    fn name(&self) -> &'static str {
        "RoomService"
    }

    fn routes(&self) -> &'static [RouteSpec] {
        ROUTES
    }

    async fn call(&self, method: &str, args: &[String]) -> Outcome {
        match (method, args) {
            ("add", [name]) => self.add(name),
            ("remove", [name]) => self.remove(name),
            ("reserve", [name, day, hour, duration]) => {
                match (numeric(day), numeric(hour), numeric(duration)) {
                    (Some(day), Some(hour), Some(duration)) => {
                        self.reserve(name, day, hour, duration)
                    }
                    _ => Outcome::invalid("<h2>Inputs are invalid!</h2>"),
                }
            }
            ("checkavailability", [name]) => self.availability(name, None),
            ("checkavailability", [name, day]) => match numeric(day) {
                Some(day) => self.availability(name, Some(day)),
                None => Outcome::invalid(format!("<h2>Invalid day ({day})!</h2>")),
            },
            _ => Outcome::invalid(format!("<h2>unknown method '{method}'</h2>")),
        }
    }
}

#[cfg(test)]
mod tests {
    use atrium_store::MemoryStore;
    use atrium_types::Status;

    use super::*;

    fn service() -> RoomService<MemoryStore> {
        RoomService::open(MemoryStore::new()).unwrap()
    }

    fn stored_rooms(service: &RoomService<MemoryStore>) -> BTreeMap<String, Grid> {
        service.store.load(ROOMS_STORE).unwrap()
    }

    #[test]
    fn add_creates_an_all_free_grid_and_persists() {
        let service = service();
        assert!(service.add("A1").is_ok());

        let rooms = stored_rooms(&service);
        let grid = &rooms["A1"];
        assert_eq!(grid.len(), DAYS_PER_WEEK);
        assert!(grid.iter().all(|row| row.len() == SLOTS_PER_DAY));
        assert!(grid.iter().flatten().all(|&occupied| !occupied));
    }

    #[test]
    fn duplicate_add_is_forbidden() {
        let service = service();
        service.add("A1");
        assert_eq!(service.add("A1").status, Status::Forbidden);
    }

    #[test]
    fn add_then_remove_restores_the_empty_store() {
        let service = service();
        service.add("A1");
        assert!(service.remove("A1").is_ok());
        assert!(stored_rooms(&service).is_empty());
    }

    #[test]
    fn remove_of_absent_room_keeps_the_observed_403() {
        let service = service();
        assert_eq!(service.remove("A1").status, Status::Forbidden);
    }

    #[test]
    fn reserve_marks_exactly_the_requested_slots() {
        let service = service();
        service.add("A1");
        let outcome = service.reserve("A1", 1, 9, 2);
        assert!(outcome.is_ok());
        assert!(outcome.message.contains("Monday"));
        assert!(outcome.message.contains("9:00-11:00"));

        let rooms = stored_rooms(&service);
        let grid = &rooms["A1"];
        for (day, row) in grid.iter().enumerate() {
            for (slot, &occupied) in row.iter().enumerate() {
                let expected = day == 0 && slot < 2;
                assert_eq!(occupied, expected, "day {day} slot {slot}");
            }
        }
    }

    #[test]
    fn last_slot_of_the_day_is_reservable() {
        let service = service();
        service.add("A1");
        let outcome = service.reserve("A1", 7, 17, 1);
        assert!(outcome.is_ok());
        assert!(outcome.message.contains("Sunday"));
        assert!(outcome.message.contains("17:00-18:00"));
    }

    #[test]
    fn out_of_range_inputs_are_invalid() {
        let service = service();
        service.add("A1");
        for (day, hour, duration) in [
            (0, 9, 1),
            (8, 9, 1),
            (1, 8, 1),
            (1, 18, 1),
            (1, 9, 0),
            (1, 17, 2),
            (1, 9, 10),
        ] {
            assert_eq!(
                service.reserve("A1", day, hour, duration).status,
                Status::BadRequest,
                "day={day} hour={hour} duration={duration}"
            );
        }
    }

    #[test]
    fn unknown_room_is_not_found() {
        let service = service();
        assert_eq!(service.reserve("A1", 1, 9, 1).status, Status::NotFound);
    }

    #[test]
    fn overlapping_reservation_conflicts_and_leaves_the_grid_unchanged() {
        let service = service();
        service.add("A1");
        service.reserve("A1", 1, 9, 2);
        let before = stored_rooms(&service);

        let outcome = service.reserve("A1", 1, 10, 1);
        assert_eq!(outcome.status, Status::Forbidden);
        assert_eq!(stored_rooms(&service), before);
    }

    #[test]
    fn adjacent_reservation_on_the_same_day_succeeds() {
        let service = service();
        service.add("A1");
        assert!(service.reserve("A1", 1, 9, 2).is_ok());
        assert!(service.reserve("A1", 1, 11, 1).is_ok());
        assert!(service.reserve("A1", 2, 9, 2).is_ok());
    }

    #[test]
    fn availability_excludes_reserved_ranges() {
        let service = service();
        service.add("A1");
        service.reserve("A1", 1, 9, 2);

        let outcome = service.availability("A1", Some(1));
        assert!(outcome.is_ok());
        assert!(outcome.message.contains("<h3>Monday</h3>"));
        assert!(!outcome.message.contains("9:00-10:00"));
        assert!(!outcome.message.contains("10:00-11:00"));
        assert!(outcome.message.contains("11:00-12:00"));
        assert!(outcome.message.contains("17:00-18:00"));
    }

    #[test]
    fn availability_of_unknown_room_is_not_found() {
        let service = service();
        assert_eq!(service.availability("A1", Some(1)).status, Status::NotFound);
    }

    #[test]
    fn availability_with_invalid_day_is_a_bad_request() {
        let service = service();
        service.add("A1");
        assert_eq!(service.availability("A1", Some(0)).status, Status::BadRequest);
        assert_eq!(service.availability("A1", Some(8)).status, Status::BadRequest);
    }

    #[test]
    fn weekly_availability_concatenates_all_seven_days() {
        let service = service();
        service.add("A1");
        let outcome = service.availability("A1", None);
        assert!(outcome.is_ok());
        for day in ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"] {
            assert!(outcome.message.contains(&format!("<h3>{day}</h3>")));
        }
    }

    #[test]
    fn weekly_availability_of_unknown_room_is_an_internal_error() {
        let service = service();
        assert_eq!(service.availability("A1", None).status, Status::InternalError);
    }

    #[tokio::test]
    async fn call_rejects_non_numeric_reserve_args() {
        let service = service();
        service.add("A1");
        let args: Vec<String> = ["A1", "one", "9", "2"].iter().map(|s| s.to_string()).collect();
        let outcome = service.call("reserve", &args).await;
        assert_eq!(outcome.status, Status::BadRequest);
    }
}
