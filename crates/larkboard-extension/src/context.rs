//! Event context and dependency injection for hook dispatch.
//!
//! An [`EventContext`] is the single mutable bag of named values owned by
//! one `trigger()` call. Listeners never alias it directly; they receive a
//! [`DependencyBag`] view, either over the full context or scoped to the
//! dependency names the listener declared.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::warn;

use larkboard_core::AppResult;

/// Named values shared by every listener of one dispatch.
///
/// Writes made by a listener are visible to the listeners that run after it
/// in the same trigger.
#[derive(Debug, Clone)]
pub struct EventContext {
    /// Arbitrary data keyed by string.
    values: HashMap<String, serde_json::Value>,
    /// When the triggering event happened.
    fired_at: DateTime<Utc>,
}

impl EventContext {
    /// Creates an empty context stamped with the current time.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            fired_at: Utc::now(),
        }
    }

    /// Inserts a value, consuming and returning the context.
    pub fn with_value(mut self, key: &str, value: serde_json::Value) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }

    /// Inserts a string value.
    pub fn with_str(self, key: &str, value: &str) -> Self {
        self.with_value(key, serde_json::json!(value))
    }

    /// Inserts an integer value.
    pub fn with_int(self, key: &str, value: i64) -> Self {
        self.with_value(key, serde_json::json!(value))
    }

    /// Inserts a boolean value.
    pub fn with_bool(self, key: &str, value: bool) -> Self {
        self.with_value(key, serde_json::json!(value))
    }

    /// Inserts a value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.values.insert(key.into(), value);
    }

    /// Gets a value by key.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    /// Gets a string value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.as_str())
    }

    /// Gets an i64 value.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.values.get(key).and_then(|v| v.as_i64())
    }

    /// Gets a bool value.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(|v| v.as_bool())
    }

    /// Returns whether a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns when the triggering event happened.
    pub fn fired_at(&self) -> DateTime<Utc> {
        self.fired_at
    }

    /// Returns the number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether the context holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for EventContext {
    fn default() -> Self {
        Self::new()
    }
}

/// The view of an [`EventContext`] handed to one listener invocation.
///
/// A listener that declared no dependencies gets the full context; one that
/// declared names gets a view scoped to exactly those names. Writes through
/// either view land in the shared context.
#[derive(Debug)]
pub struct DependencyBag<'a> {
    /// The shared context being viewed.
    context: &'a mut EventContext,
    /// Visible keys, or `None` for the full context.
    scope: Option<Vec<String>>,
}

impl<'a> DependencyBag<'a> {
    /// Creates a view over the full context.
    pub fn full(context: &'a mut EventContext) -> Self {
        Self {
            context,
            scope: None,
        }
    }

    /// Creates a view scoped to the given keys.
    pub fn scoped(context: &'a mut EventContext, names: Vec<String>) -> Self {
        Self {
            context,
            scope: Some(names),
        }
    }

    /// Returns whether this view is scoped to declared dependency names.
    pub fn is_scoped(&self) -> bool {
        self.scope.is_some()
    }

    /// Returns the keys visible through this view.
    pub fn names(&self) -> Vec<&str> {
        match &self.scope {
            Some(names) => names
                .iter()
                .map(String::as_str)
                .filter(|n| self.context.contains(n))
                .collect(),
            None => self.context.values.keys().map(String::as_str).collect(),
        }
    }

    /// Gets a value by key. Keys outside a scoped view read as absent.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        if !self.visible(key) {
            return None;
        }
        self.context.get(key)
    }

    /// Gets a string value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    /// Gets an i64 value.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.as_i64())
    }

    /// Gets a bool value.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.as_bool())
    }

    /// Writes a value into the shared context.
    ///
    /// A scoped listener writing a key it never declared still lands in the
    /// shared context, with a warning.
    pub fn set(&mut self, key: impl Into<String>, value: serde_json::Value) {
        let key = key.into();
        if let Some(scope) = &self.scope {
            if !scope.iter().any(|n| *n == key) {
                warn!(key = %key, "listener wrote a key outside its declared dependencies");
            }
        }
        self.context.insert(key, value);
    }

    /// Writes a string value into the shared context.
    pub fn set_str(&mut self, key: impl Into<String>, value: &str) {
        self.set(key, serde_json::json!(value));
    }

    fn visible(&self, key: &str) -> bool {
        match &self.scope {
            Some(names) => names.iter().any(|n| n == key),
            None => true,
        }
    }
}

/// Resolves dependency names absent from the trigger's context.
///
/// Supplied by the caller that owns the context for a request; typically
/// backed by whatever service locator the host application uses.
pub trait DependencyProvider {
    /// Returns values for the given missing names.
    ///
    /// Names the provider cannot resolve are simply left out of the result;
    /// the listener then sees them as absent.
    fn provide(&self, missing: &[String]) -> AppResult<HashMap<String, serde_json::Value>>;
}

/// A provider that resolves nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyProvider;

impl DependencyProvider for EmptyProvider {
    fn provide(&self, _missing: &[String]) -> AppResult<HashMap<String, serde_json::Value>> {
        Ok(HashMap::new())
    }
}
