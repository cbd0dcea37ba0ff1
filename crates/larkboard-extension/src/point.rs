//! One named extension point.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::module::{HookRegistration, Placement};
use crate::priority::PriorityRegistry;

/// A named location where modules contribute listeners.
///
/// Owns a [`PriorityRegistry`] keyed by listener name plus the raw
/// registrations. The resolved order is computed on the first
/// [`has_listeners`](Self::has_listeners) or [`listeners`](Self::listeners)
/// call and cached; register everything first.
#[derive(Debug)]
pub struct ExtensionPoint {
    /// The point name.
    name: String,
    /// Ordering registry over listener names.
    registry: PriorityRegistry,
    /// Listener name → registration.
    registrations: HashMap<String, HookRegistration>,
}

impl ExtensionPoint {
    /// Creates an empty point.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registry: PriorityRegistry::new(),
            registrations: HashMap::new(),
        }
    }

    /// Returns the point name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a registration, placing it per its [`Placement`].
    ///
    /// A second registration under the same listener name replaces the
    /// first.
    pub fn add(&mut self, registration: HookRegistration) {
        let name = registration.name.clone();
        if self.registrations.contains_key(&name) {
            warn!(point = %self.name, listener = %name, "replacing listener registration");
            self.registry.remove(&name);
        }

        match &registration.placement {
            Placement::Default => self.registry.add(name.clone(), None),
            Placement::Priority(p) => self.registry.add(name.clone(), Some(*p)),
            Placement::Begin(p) => self.registry.add_begin(name.clone(), *p),
            Placement::End(p) => self.registry.add_end(name.clone(), *p),
            Placement::Before(anchor) => self.registry.add_before(name.clone(), anchor.clone()),
            Placement::After(anchor) => self.registry.add_after(name.clone(), anchor.clone()),
        }

        debug!(point = %self.name, listener = %name, "listener registered");
        self.registrations.insert(name, registration);
    }

    /// Removes a registration by listener name.
    pub fn remove(&mut self, name: &str) {
        self.registry.remove(name);
        self.registrations.remove(name);
    }

    /// Drops every registration and the cached order.
    pub fn remove_all(&mut self) {
        self.registry.remove_all();
        self.registrations.clear();
    }

    /// Returns whether any listener is registered, forcing the first
    /// resolve.
    pub fn has_listeners(&mut self) -> bool {
        self.registry.sort();
        self.registry.has_entities()
    }

    /// Returns the registrations in resolved order (memoized).
    pub fn listeners(&mut self) -> Vec<&HookRegistration> {
        self.registry.sort();
        let order = self.registry.sorted_entities().unwrap_or_default();
        order
            .iter()
            .filter_map(|name| self.registrations.get(name))
            .collect()
    }

    /// Returns the resolved listener names without borrowing the
    /// registrations.
    pub fn resolved_names(&mut self) -> Vec<String> {
        self.registry.sort().to_vec()
    }
}
