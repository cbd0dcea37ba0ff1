//! Template layer registry.
//!
//! Layers are named, orderable units of nested render output. The same
//! ordering engine that resolves hook listeners resolves the layer open
//! order; the close order is the open order reversed.
//!
//! While error-safe tracking is on, every added layer is also recorded on
//! an allow-list. Switching the registry into restricted mode prunes the
//! resolved order down to allow-listed layers, so a fatal error during
//! page construction can still emit a minimal, well-nested document.

use tracing::{debug, info};

use crate::priority::PriorityRegistry;

/// Ordering registry for nested render layers.
///
/// Built fresh for each rendered page; register every layer before the
/// first [`layers`](Self::layers) call.
#[derive(Debug, Default)]
pub struct LayerRegistry {
    /// The shared ordering engine.
    registry: PriorityRegistry,
    /// Layers registered while error-safe tracking was on.
    error_safe: Vec<String>,
    /// Whether added layers are currently recorded as error-safe.
    track_error_safe: bool,
    /// Whether resolution is restricted to error-safe layers.
    restricted: bool,
}

impl LayerRegistry {
    /// Creates an empty layer registry.
    pub fn new() -> Self {
        Self {
            registry: PriorityRegistry::new(),
            error_safe: Vec::new(),
            track_error_safe: false,
            restricted: false,
        }
    }

    /// Registers a layer in the general bucket.
    pub fn add(&mut self, name: impl Into<String>, priority: Option<i32>) {
        let name = name.into();
        self.track(&name);
        self.registry.add(name, priority);
    }

    /// Registers a layer in the begin bucket.
    pub fn add_begin(&mut self, name: impl Into<String>, priority: Option<i32>) {
        let name = name.into();
        self.track(&name);
        self.registry.add_begin(name, priority);
    }

    /// Registers a layer in the end bucket.
    pub fn add_end(&mut self, name: impl Into<String>, priority: Option<i32>) {
        let name = name.into();
        self.track(&name);
        self.registry.add_end(name, priority);
    }

    /// Registers a layer directly before `anchor`.
    pub fn add_before(&mut self, name: impl Into<String>, anchor: impl Into<String>) {
        let name = name.into();
        self.track(&name);
        self.registry.add_before(name, anchor);
    }

    /// Registers a layer directly after `anchor`.
    pub fn add_after(&mut self, name: impl Into<String>, anchor: impl Into<String>) {
        let name = name.into();
        self.track(&name);
        self.registry.add_after(name, anchor);
    }

    /// Removes a layer.
    pub fn remove(&mut self, name: &str) {
        self.registry.remove(name);
        self.error_safe.retain(|n| n != name);
    }

    /// Drops every layer, the allow-list and the cached order; leaves the
    /// registry back in registering state.
    pub fn remove_all(&mut self) {
        self.registry.remove_all();
        self.error_safe.clear();
        self.restricted = false;
    }

    /// Returns whether any layer is registered.
    pub fn has_layers(&self) -> bool {
        self.registry.has_entities()
    }

    /// Turns error-safe tracking on or off for subsequent registrations.
    pub fn track_error_safe(&mut self, on: bool) {
        self.track_error_safe = on;
    }

    /// Restricts resolution to the error-safe allow-list.
    ///
    /// Used when a fatal error interrupts normal page construction and
    /// only the minimal safe layers should render.
    pub fn restrict_to_error_safe(&mut self) {
        info!(retained = self.error_safe.len(), "layer registry restricted to error-safe layers");
        self.restricted = true;
    }

    /// Returns whether resolution is currently restricted.
    pub fn is_restricted(&self) -> bool {
        self.restricted
    }

    /// Resolves and returns the open order of layer names (memoized).
    pub fn layers(&mut self) -> Vec<String> {
        let order = self.registry.sort();
        if self.restricted {
            order
                .iter()
                .filter(|n| self.error_safe.contains(*n))
                .cloned()
                .collect()
        } else {
            order.to_vec()
        }
    }

    /// Returns the open order reversed, for emitting the matching closing
    /// structure of the nested layers.
    pub fn layers_reversed(&mut self) -> Vec<String> {
        let mut order = self.layers();
        order.reverse();
        order
    }

    fn track(&mut self, name: &str) {
        if self.track_error_safe && !self.error_safe.iter().any(|n| n == name) {
            debug!(layer = %name, "layer recorded as error-safe");
            self.error_safe.push(name.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock_registry() -> LayerRegistry {
        let mut layers = LayerRegistry::new();
        layers.track_error_safe(true);
        layers.add_begin("html", None);
        layers.add_begin("body", None);
        layers.add("content", None);
        layers.track_error_safe(false);
        layers.add("sidebar", None);
        layers.add_before("header", "content");
        layers.add_end("footer", None);
        layers
    }

    #[test]
    fn test_open_order() {
        let mut layers = stock_registry();
        assert_eq!(
            layers.layers(),
            ["html", "body", "header", "content", "sidebar", "footer"]
        );
    }

    #[test]
    fn test_close_order_is_reversed_open_order() {
        let mut layers = stock_registry();
        let mut expected = layers.layers();
        expected.reverse();
        assert_eq!(layers.layers_reversed(), expected);
    }

    #[test]
    fn test_restricted_resolution_keeps_only_error_safe_layers() {
        let mut layers = stock_registry();
        layers.restrict_to_error_safe();
        assert_eq!(layers.layers(), ["html", "body", "content"]);
        assert_eq!(layers.layers_reversed(), ["content", "body", "html"]);
    }

    #[test]
    fn test_restriction_preserves_relative_order() {
        let mut layers = LayerRegistry::new();
        layers.add("plain", None);
        layers.track_error_safe(true);
        layers.add_end("safe_late", None);
        layers.add_begin("safe_early", None);
        layers.track_error_safe(false);
        layers.restrict_to_error_safe();
        assert_eq!(layers.layers(), ["safe_early", "safe_late"]);
    }

    #[test]
    fn test_remove_all_clears_restriction_and_allow_list() {
        let mut layers = stock_registry();
        layers.restrict_to_error_safe();
        layers.remove_all();
        assert!(!layers.has_layers());
        assert!(!layers.is_restricted());
        assert!(layers.layers().is_empty());
    }

    #[test]
    fn test_remove_drops_layer_from_allow_list() {
        let mut layers = LayerRegistry::new();
        layers.track_error_safe(true);
        layers.add("a", None);
        layers.add("b", None);
        layers.track_error_safe(false);
        layers.remove("a");
        layers.restrict_to_error_safe();
        assert_eq!(layers.layers(), ["b"]);
    }
}
