//! # larkboard-extension
//!
//! Extension subsystem for Larkboard. Provides:
//!
//! - Priority ordering engine with begin/general/end buckets and
//!   before/after constraints
//! - Extension points with memoized listener resolution
//! - Hook dispatcher with dependency injection and missing-listener
//!   tolerance
//! - Template layer registry with reversed close order and an error-safe
//!   degraded mode
//!
//! Registries are built fresh for each dispatch scope (one request/response
//! cycle); register everything before the first resolve.

pub mod context;
pub mod dispatcher;
pub mod layers;
pub mod listener;
pub mod module;
pub mod point;
pub mod prelude;
pub mod priority;

pub use context::{DependencyBag, DependencyProvider, EmptyProvider, EventContext};
pub use dispatcher::HookDispatcher;
pub use layers::LayerRegistry;
pub use listener::{Listener, ListenerCatalog, ListenerFactory, ListenerSpec};
pub use module::{HookRegistration, Module, ModuleInfo, Placement, points};
pub use point::ExtensionPoint;
pub use priority::PriorityRegistry;
