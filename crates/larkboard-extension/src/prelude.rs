//! Prelude for convenient imports.

pub use crate::context::{DependencyBag, DependencyProvider, EmptyProvider, EventContext};
pub use crate::dispatcher::HookDispatcher;
pub use crate::layers::LayerRegistry;
pub use crate::listener::{Listener, ListenerCatalog, ListenerFactory, ListenerSpec};
pub use crate::module::{points, HookRegistration, Module, ModuleInfo, Placement};
pub use crate::point::ExtensionPoint;
pub use crate::priority::PriorityRegistry;

pub use larkboard_core::{AppError, AppResult};
