//! Module registration contract.
//!
//! A module is one independently developed unit of forum behavior. The
//! dispatcher calls [`Module::hooks`] exactly once at construction and
//! groups the returned registrations by point name.

use serde::{Deserialize, Serialize};

use crate::listener::ListenerSpec;

/// Well-known extension point names.
///
/// Point names are open strings so modules may invent their own points;
/// these constants cover the dispatch sites the stock Larkboard
/// controllers fire.
pub mod points {
    /// A topic page is being assembled for display.
    pub const TOPIC_DISPLAY: &str = "topic_display";
    /// A message passed validation and is about to be stored.
    pub const MESSAGE_SAVE: &str = "message_save";
    /// A new member completed registration.
    pub const MEMBER_REGISTER: &str = "member_register";
    /// The board index page is being assembled.
    pub const BOARD_INDEX: &str = "board_index";
    /// A member profile page is being assembled.
    pub const PROFILE_DISPLAY: &str = "profile_display";
}

/// Metadata about a module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleInfo {
    /// Unique module identifier.
    pub id: String,
    /// Human-readable module name.
    pub name: String,
    /// Module version string.
    pub version: String,
    /// Module description.
    pub description: String,
}

/// Trait that all modules implement.
pub trait Module: Send + Sync {
    /// Returns module metadata.
    fn info(&self) -> ModuleInfo;

    /// Returns the hook registrations this module contributes.
    ///
    /// Called once per module at dispatcher construction.
    fn hooks(&self) -> Vec<HookRegistration>;
}

/// Where a registration lands in its point's ordering registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Placement {
    /// General bucket at the next default priority.
    #[default]
    Default,
    /// General bucket at an explicit priority.
    Priority(i32),
    /// Begin bucket; an explicit priority sorts higher-first.
    Begin(Option<i32>),
    /// End bucket.
    End(Option<i32>),
    /// Directly before the named listener.
    Before(String),
    /// Directly after the named listener.
    After(String),
}

/// One module's registered participation at an extension point.
#[derive(Debug, Clone)]
pub struct HookRegistration {
    /// The point this registration contributes to.
    pub point: String,
    /// Listener name, unique within the point.
    pub name: String,
    /// The invocation target.
    pub spec: ListenerSpec,
    /// Declared dependency names; empty means the listener receives the
    /// full event context.
    pub dependencies: Vec<String>,
    /// Ordering placement within the point.
    pub placement: Placement,
}

impl HookRegistration {
    /// Creates a registration at the default general placement.
    pub fn new(
        point: impl Into<String>,
        name: impl Into<String>,
        spec: ListenerSpec,
    ) -> Self {
        Self {
            point: point.into(),
            name: name.into(),
            spec,
            dependencies: Vec::new(),
            placement: Placement::Default,
        }
    }

    /// Declares the dependency names injected into the listener.
    pub fn with_dependencies<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = names.into_iter().map(Into::into).collect();
        self
    }

    /// Places the registration at an explicit general-bucket priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.placement = Placement::Priority(priority);
        self
    }

    /// Places the registration in the begin bucket.
    pub fn at_begin(mut self, priority: Option<i32>) -> Self {
        self.placement = Placement::Begin(priority);
        self
    }

    /// Places the registration in the end bucket.
    pub fn at_end(mut self, priority: Option<i32>) -> Self {
        self.placement = Placement::End(priority);
        self
    }

    /// Places the registration directly before another listener.
    pub fn before(mut self, anchor: impl Into<String>) -> Self {
        self.placement = Placement::Before(anchor.into());
        self
    }

    /// Places the registration directly after another listener.
    pub fn after(mut self, anchor: impl Into<String>) -> Self {
        self.placement = Placement::After(anchor.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_builder() {
        let reg = HookRegistration::new(
            points::MESSAGE_SAVE,
            "scan",
            ListenerSpec::callback(|_| Ok(())),
        )
        .with_dependencies(["message", "board"])
        .with_priority(40);

        assert_eq!(reg.point, "message_save");
        assert_eq!(reg.dependencies, ["message", "board"]);
        assert_eq!(reg.placement, Placement::Priority(40));
    }

    #[test]
    fn test_default_placement() {
        let reg = HookRegistration::new("p", "n", ListenerSpec::callback(|_| Ok(())));
        assert_eq!(reg.placement, Placement::Default);
        assert!(reg.dependencies.is_empty());
    }
}
