//! The activity catalog.
//!
//! Activities are bare names; existence is the only queryable fact.

use std::collections::BTreeSet;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::error;

use atrium_store::{KeyValueStore, StoreError};
use atrium_types::Outcome;
use atrium_wire::RouteSpec;

use crate::error::Result;
use crate::service::Service;

/// Logical store name for the activity catalog.
pub const ACTIVITIES_STORE: &str = "activities";

const ROUTES: &[RouteSpec] = &[
    RouteSpec::exact("add", 1),
    RouteSpec::exact("remove", 1),
    RouteSpec::exact("check", 1),
];

/// The activity catalog service.
pub struct ActivityService<S: KeyValueStore> {
    activities: Mutex<BTreeSet<String>>,
    store: S,
}

impl<S: KeyValueStore> ActivityService<S> {
    /// Load the catalog from the store.
    pub fn open(store: S) -> Result<Self> {
        let activities = store.load(ACTIVITIES_STORE)?;
        Ok(Self {
            activities: Mutex::new(activities),
            store,
        })
    }

    fn persist(&self, activities: &BTreeSet<String>) -> std::result::Result<(), StoreError> {
        self.store.save(ACTIVITIES_STORE, activities)
    }

    fn persistence_failed(e: &StoreError) -> Outcome {
        error!(error = %e, "failed to persist activity catalog");
        Outcome::internal("<h2>Internal Server Error</h2>")
    }

    /// Add an activity to the catalog.
    pub fn add(&self, name: &str) -> Outcome {
        let mut activities = self.activities.lock();
        if !activities.insert(name.to_string()) {
            return Outcome::forbidden(format!("<h2>Activity {name} already exists!</h2>"));
        }
        if let Err(e) = self.persist(&activities) {
            return Self::persistence_failed(&e);
        }
        Outcome::ok(format!("<h2>Activity {name} successfully added!</h2>"))
    }

    /// Remove an activity. Absence answers 403, matching the observed
    /// behavior rather than 404.
    pub fn remove(&self, name: &str) -> Outcome {
        let mut activities = self.activities.lock();
        if !activities.remove(name) {
            return Outcome::forbidden(format!("<h2>Activity {name} does not exist!</h2>"));
        }
        if let Err(e) = self.persist(&activities) {
            return Self::persistence_failed(&e);
        }
        Outcome::ok(format!("<h2>Activity {name} successfully removed!</h2>"))
    }

    /// Existence query; no side effect.
    pub fn check(&self, name: &str) -> Outcome {
        if self.activities.lock().contains(name) {
            Outcome::ok(format!("<h2>Activity {name} exists.</h2>"))
        } else {
            Outcome::not_found(format!("<h2>Activity {name} does not exist.</h2>"))
        }
    }
}

#[async_trait]
impl<S: KeyValueStore + 'static> Service for ActivityService<S> {
    fn name(&self) -> &'static str {
        "ActivityService"
    }

    fn routes(&self) -> &'static [RouteSpec] {
        ROUTES
    }

    async fn call(&self, method: &str, args: &[String]) -> Outcome {
        match (method, args) {
            ("add", [name]) => self.add(name),
            ("remove", [name]) => self.remove(name),
            ("check", [name]) => self.check(name),
            _ => Outcome::invalid(format!("<h2>unknown method '{method}'</h2>")),
        }
    }
}
