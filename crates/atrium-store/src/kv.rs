//! The store abstraction the services persist through.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Durable mapping from a logical name to a structured document.
///
/// Implementations must make `save` atomic with respect to crashes: a
/// reader must observe either the previous document or the new one,
/// never a truncated write. `load` of a name that was never saved
/// yields the type's default value, so services start empty on a
/// fresh data directory.
pub trait KeyValueStore: Send + Sync {
    /// Load the document stored under `name`, or `T::default()` if
    /// the document does not exist yet.
    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T>;

    /// Replace the document stored under `name`.
    fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<()>;
}
