//! Listener variants and the catalog they can be registered under.
//!
//! The invocation target of a hook registration is one of a closed set of
//! variants, decided at registration time. There is no by-name lookup at
//! dispatch time; a [`ListenerSpec::Registered`] reference is resolved
//! against the [`ListenerCatalog`] when the dispatcher is constructed.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use larkboard_core::{AppError, AppResult};

use crate::context::DependencyBag;

/// A hook listener with a bound receiver.
pub trait Listener: Send + Sync {
    /// Handles one hook invocation.
    fn invoke(&self, bag: &mut DependencyBag<'_>) -> AppResult<()>;
}

/// Builds a listener from the dependency bag at dispatch time.
///
/// Returning `Ok(None)` means construction itself was the entire effect and
/// nothing further is invoked.
pub trait ListenerFactory: Send + Sync {
    /// Constructs the listener, or performs the effect and returns `None`.
    fn construct(&self, bag: &mut DependencyBag<'_>) -> AppResult<Option<Box<dyn Listener>>>;
}

/// Free-function listener signature.
pub type CallbackFn = Arc<dyn Fn(&mut DependencyBag<'_>) -> AppResult<()> + Send + Sync>;

/// The invocation target of one hook registration.
#[derive(Clone)]
pub enum ListenerSpec {
    /// A free function or closure.
    Callback(CallbackFn),
    /// A shared listener instance (bound method receiver).
    Instance(Arc<dyn Listener>),
    /// A factory constructing the listener per invocation.
    Factory(Arc<dyn ListenerFactory>),
    /// A reference into the [`ListenerCatalog`], resolved at dispatcher
    /// construction.
    Registered(String),
}

impl ListenerSpec {
    /// Wraps a closure as a callback listener.
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&mut DependencyBag<'_>) -> AppResult<()> + Send + Sync + 'static,
    {
        Self::Callback(Arc::new(f))
    }

    /// Wraps a shared listener instance.
    pub fn instance(listener: Arc<dyn Listener>) -> Self {
        Self::Instance(listener)
    }

    /// Wraps a listener factory.
    pub fn factory(factory: Arc<dyn ListenerFactory>) -> Self {
        Self::Factory(factory)
    }

    /// References a catalog entry by name.
    pub fn registered(name: impl Into<String>) -> Self {
        Self::Registered(name.into())
    }

    /// Runs the listener against the bag.
    ///
    /// `Registered` variants must have been resolved before dispatch;
    /// hitting one here is a wiring error.
    pub(crate) fn run(&self, name: &str, bag: &mut DependencyBag<'_>) -> AppResult<()> {
        match self {
            Self::Callback(f) => f(bag),
            Self::Instance(listener) => listener.invoke(bag),
            Self::Factory(factory) => match factory.construct(bag)? {
                Some(listener) => listener.invoke(bag),
                None => Ok(()),
            },
            Self::Registered(reference) => Err(AppError::extension(format!(
                "listener '{name}' still references unresolved catalog entry '{reference}'"
            ))),
        }
    }
}

impl fmt::Debug for ListenerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("ListenerSpec::Callback"),
            Self::Instance(_) => f.write_str("ListenerSpec::Instance"),
            Self::Factory(_) => f.write_str("ListenerSpec::Factory"),
            Self::Registered(name) => write!(f, "ListenerSpec::Registered({name})"),
        }
    }
}

/// Named listener specs shared across modules.
///
/// Modules may publish listeners here and reference them from hook
/// registrations by name instead of carrying the spec inline.
#[derive(Debug, Default)]
pub struct ListenerCatalog {
    /// Name → spec.
    entries: HashMap<String, ListenerSpec>,
}

impl ListenerCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Publishes a spec under a name, replacing any previous entry.
    pub fn publish(&mut self, name: impl Into<String>, spec: ListenerSpec) {
        self.entries.insert(name.into(), spec);
    }

    /// Resolves a name to its spec.
    pub fn resolve(&self, name: &str) -> Option<&ListenerSpec> {
        self.entries.get(name)
    }

    /// Returns whether a name is published.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns all published names.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }
}
