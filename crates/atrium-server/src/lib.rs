//! The atrium services: room inventory, activity catalog, and
//! reservation orchestration.
//!
//! Each service owns one persistent store and answers the wire
//! protocol over its own TCP listener. [`RoomService`] holds the
//! weekly availability grid per room, [`ActivityService`] the flat
//! activity catalog, and [`ReservationService`] orchestrates both
//! over the wire to commit reservations.
//!
//! The shared [`serve`] loop accepts connections and dispatches
//! requests through each service's closed route table; all mutations
//! to a given store are serialized behind that service's lock, so the
//! check-then-set reservation step is atomic under concurrency.

pub mod activity;
pub mod config;
pub mod error;
pub mod reservation;
pub mod room;
pub mod service;

pub use activity::ActivityService;
pub use config::{ClusterConfig, ServiceConfig, StorageConfig};
pub use error::{ConfigError, Result, ServerError};
pub use reservation::ReservationService;
pub use room::RoomService;
pub use service::{Service, handle_request, serve};
