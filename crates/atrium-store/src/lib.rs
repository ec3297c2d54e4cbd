//! Key-value persistence for the atrium services.
//!
//! Each service owns exactly one logical store (`"rooms"`,
//! `"activities"`, `"reservations"`): a named document that is loaded
//! in full at startup and rewritten in full after every mutation. The
//! [`KeyValueStore`] trait decouples the services from the on-disk
//! encoding; [`JsonFileStore`] is the durable implementation and
//! [`MemoryStore`] backs unit tests.

pub mod error;
pub mod file;
pub mod kv;
pub mod memory;

pub use error::{Result, StoreError};
pub use file::JsonFileStore;
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
