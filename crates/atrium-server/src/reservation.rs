//! Reservation orchestration.
//!
//! The reservation service owns no rooms and no activities; it calls
//! both peers over the wire. A reservation commits in three steps:
//! activity existence check, room slot commit, then the local record.
//! If recording fails after the room committed, the slots stay
//! occupied: there is no compensating rollback, by accepted
//! limitation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::Rng;
use tracing::{error, info, warn};

use atrium_store::{KeyValueStore, StoreError};
use atrium_types::{
    Outcome, RESERVATION_ID_MAX, RESERVATION_ID_MIN, Reservation, Status, day_name, range_label,
};
use atrium_wire::{RouteSpec, WireClient};

use crate::error::Result;
use crate::service::{Service, numeric};

/// Logical store name for the reservation ledger.
pub const RESERVATIONS_STORE: &str = "reservations";

const ROUTES: &[RouteSpec] = &[
    RouteSpec::exact("reserve", 5),
    RouteSpec::ranged("listavailability", 1, 2),
];

const INTERNAL_ERROR: &str = "<h2>Internal Server Error</h2>";

/// The reservation orchestration service.
pub struct ReservationService<S: KeyValueStore> {
    reservations: Mutex<BTreeMap<u32, Reservation>>,
    store: S,
    client: WireClient,
    room_addr: String,
    activity_addr: String,
}

impl<S: KeyValueStore> ReservationService<S> {
    /// Load the ledger and wire up the peer addresses.
    pub fn open(
        store: S,
        client: WireClient,
        room_addr: impl Into<String>,
        activity_addr: impl Into<String>,
    ) -> Result<Self> {
        let reservations = store.load(RESERVATIONS_STORE)?;
        Ok(Self {
            reservations: Mutex::new(reservations),
            store,
            client,
            room_addr: room_addr.into(),
            activity_addr: activity_addr.into(),
        })
    }

    fn persist(
        &self,
        reservations: &BTreeMap<u32, Reservation>,
    ) -> std::result::Result<(), StoreError> {
        self.store.save(RESERVATIONS_STORE, reservations)
    }

    /// Draw an identifier not yet in use. The id space is five digits
    /// and assumed never to fill, so the redraw loop is unbounded but
    /// terminating.
    fn unused_id(reservations: &BTreeMap<u32, Reservation>) -> u32 {
        let mut rng = rand::rng();
        loop {
            let id = rng.random_range(RESERVATION_ID_MIN..=RESERVATION_ID_MAX);
            if !reservations.contains_key(&id) {
                return id;
            }
        }
    }

    /// Reserve `room` for `activity` on `day` at `hour` for
    /// `duration` hours.
    pub async fn reserve(
        &self,
        room: &str,
        activity: &str,
        day: &str,
        hour: &str,
        duration: &str,
    ) -> Outcome {
        let check = match self
            .client
            .call(&self.activity_addr, "check", &[("name", activity)])
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "activity service unreachable");
                return Outcome::internal(INTERNAL_ERROR);
            }
        };
        match check.status {
            Status::Ok => {}
            Status::NotFound => {
                return Outcome::not_found(format!("<h2>Activity {activity} does not exist!</h2>"));
            }
            _ => return Outcome::internal(INTERNAL_ERROR),
        }

        let commit = match self
            .client
            .call(
                &self.room_addr,
                "reserve",
                &[
                    ("name", room),
                    ("day", day),
                    ("hour", hour),
                    ("duration", duration),
                ],
            )
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "room service unreachable");
                return Outcome::internal(INTERNAL_ERROR);
            }
        };
        match commit.status {
            Status::Ok => {}
            Status::BadRequest => return Outcome::invalid("<h2>Inputs are invalid!</h2>"),
            Status::Forbidden => {
                return Outcome::forbidden(format!(
                    "<h2>Room {room} is not available for the requested time slice!</h2>"
                ));
            }
            Status::NotFound => {
                return Outcome::not_found(format!("<h2>Room {room} does not exist!</h2>"));
            }
            Status::InternalError => return Outcome::internal(INTERNAL_ERROR),
        }

        // The room service validated and committed these same strings,
        // so from here a parse failure means a misbehaving peer.
        let (Some(day_num), Some(hour_num), Some(duration_num)) =
            (numeric(day), numeric(hour), numeric(duration))
        else {
            return Outcome::internal(INTERNAL_ERROR);
        };
        let (Some(day_label), Some(hours)) = (
            day_name(day_num),
            range_label(hour_num, hour_num + duration_num),
        ) else {
            return Outcome::internal(INTERNAL_ERROR);
        };

        let mut reservations = self.reservations.lock();
        let id = Self::unused_id(&reservations);
        reservations.insert(
            id,
            Reservation {
                room: room.to_string(),
                day: day_label.to_string(),
                reserved_hours: hours.clone(),
                activity: activity.to_string(),
            },
        );
        if let Err(e) = self.persist(&reservations) {
            // The room slots stay committed; accepted limitation.
            error!(error = %e, id, "failed to persist reservation ledger");
            return Outcome::internal(INTERNAL_ERROR);
        }
        info!(id, room, activity, day = day_label, hours = %hours, "reservation recorded");

        Outcome::ok(format!(
            "<h1>Room {room} has been successfully reserved for {day_label} {hours}!</h1>"
        ))
    }

    /// Forward an availability query to the room service and relabel
    /// the response header.
    pub async fn list_availability(&self, room: &str, day: Option<&str>) -> Outcome {
        let mut args = vec![("name", room)];
        if let Some(day) = day {
            args.push(("day", day));
        }

        let response = match self
            .client
            .call(&self.room_addr, "checkavailability", &args)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "room service unreachable");
                return Outcome::internal(INTERNAL_ERROR);
            }
        };

        match response.status {
            Status::Ok => Outcome::ok(format!(
                "<h2>Availability for room '{room}'</h2>\n{}",
                response.body
            )),
            Status::NotFound => Outcome::not_found(format!("<h2>Room {room} does not exist!</h2>")),
            Status::BadRequest => match day {
                Some(day) => Outcome::invalid(format!("<h2>Invalid day ({day})!</h2>")),
                None => Outcome::invalid("<h2>Inputs are invalid!</h2>"),
            },
            _ => Outcome::internal(INTERNAL_ERROR),
        }
    }
}

#[async_trait]
impl<S: KeyValueStore + 'static> Service for ReservationService<S> {
    fn name(&self) -> &'static str {
        "ReservationService"
    }

    fn routes(&self) -> &'static [RouteSpec] {
        ROUTES
    }

    async fn call(&self, method: &str, args: &[String]) -> Outcome {
        match (method, args) {
            ("reserve", [room, activity, day, hour, duration]) => {
                self.reserve(room, activity, day, hour, duration).await
            }
            ("listavailability", [room]) => self.list_availability(room, None).await,
            ("listavailability", [room, day]) => self.list_availability(room, Some(day)).await,
            _ => Outcome::invalid(format!("<h2>unknown method '{method}'</h2>")),
        }
    }
}
