//! Hook dispatcher — resolves listener order per point and invokes
//! listeners with dependency injection.
//!
//! Construct one dispatcher per dispatch scope (one request/response
//! cycle) and pass it through the call chain; instances are not shared
//! across requests.

use std::sync::Arc;

use tracing::{debug, info, warn};

use larkboard_core::config::extension::ExtensionConfig;
use larkboard_core::{AppError, AppResult};

use crate::context::{DependencyBag, DependencyProvider, EmptyProvider, EventContext};
use crate::listener::{ListenerCatalog, ListenerSpec};
use crate::module::{Module, ModuleInfo};
use crate::point::ExtensionPoint;

/// Dispatches triggers to module listeners in resolved priority order.
#[derive(Debug)]
pub struct HookDispatcher {
    /// Extension points, one per distinct point name, in first-seen order.
    points: Vec<ExtensionPoint>,
    /// Metadata of the modules that were loaded.
    modules: Vec<ModuleInfo>,
}

impl HookDispatcher {
    /// Builds a dispatcher from the given modules with an empty catalog
    /// and default configuration.
    pub fn new(modules: &[Arc<dyn Module>]) -> AppResult<Self> {
        Self::with_options(modules, &ListenerCatalog::new(), &ExtensionConfig::default())
    }

    /// Builds a dispatcher, resolving catalog references and applying the
    /// extension configuration.
    ///
    /// Each module's `hooks()` is called exactly once. A registration
    /// referencing a catalog name that is not published is skipped with a
    /// warning, or rejected when `strict_missing_listener` is set; every
    /// other registration still dispatches.
    pub fn with_options(
        modules: &[Arc<dyn Module>],
        catalog: &ListenerCatalog,
        config: &ExtensionConfig,
    ) -> AppResult<Self> {
        let mut dispatcher = Self {
            points: Vec::new(),
            modules: Vec::new(),
        };

        for module in modules {
            let module_info = module.info();
            if !config.module_enabled(&module_info.id) {
                debug!(module = %module_info.id, "module disabled by configuration");
                continue;
            }

            for mut registration in module.hooks() {
                if let ListenerSpec::Registered(reference) = &registration.spec {
                    match catalog.resolve(reference) {
                        Some(spec) => registration.spec = spec.clone(),
                        None if config.strict_missing_listener => {
                            return Err(AppError::extension(format!(
                                "module '{}' references unknown listener '{reference}'",
                                module_info.id
                            )));
                        }
                        None => {
                            warn!(
                                module = %module_info.id,
                                listener = %registration.name,
                                reference = %reference,
                                "skipping registration with unknown catalog listener"
                            );
                            continue;
                        }
                    }
                }
                dispatcher.point_mut(&registration.point).add(registration);
            }

            info!(
                module = %module_info.id,
                version = %module_info.version,
                "module hooks registered"
            );
            dispatcher.modules.push(module_info);
        }

        Ok(dispatcher)
    }

    /// Triggers a point without an external dependency provider.
    pub fn trigger(&mut self, point: &str, context: &mut EventContext) -> AppResult<()> {
        self.trigger_with(point, context, &EmptyProvider)
    }

    /// Triggers a point, invoking its listeners in resolved order.
    ///
    /// An unknown or empty point is a no-op. A listener with no declared
    /// dependencies receives the full context; one with declared names
    /// receives a bag scoped to exactly those names, with names absent
    /// from the context requested from `provider` and merged in first. A
    /// listener error propagates immediately and the remaining listeners
    /// do not run.
    pub fn trigger_with(
        &mut self,
        point: &str,
        context: &mut EventContext,
        provider: &dyn DependencyProvider,
    ) -> AppResult<()> {
        let Some(extension_point) = self.points.iter_mut().find(|p| p.name() == point) else {
            return Ok(());
        };
        if !extension_point.has_listeners() {
            return Ok(());
        }

        let resolved: Vec<(String, ListenerSpec, Vec<String>)> = extension_point
            .listeners()
            .into_iter()
            .map(|r| (r.name.clone(), r.spec.clone(), r.dependencies.clone()))
            .collect();

        debug!(point = %point, listeners = resolved.len(), "triggering point");

        for (name, spec, dependencies) in resolved {
            debug!(point = %point, listener = %name, "invoking listener");
            if dependencies.is_empty() {
                let mut bag = DependencyBag::full(context);
                spec.run(&name, &mut bag)?;
            } else {
                let missing: Vec<String> = dependencies
                    .iter()
                    .filter(|d| !context.contains(d))
                    .cloned()
                    .collect();
                if !missing.is_empty() {
                    debug!(point = %point, listener = %name, missing = ?missing, "requesting missing dependencies");
                    for (key, value) in provider.provide(&missing)? {
                        context.insert(key, value);
                    }
                }
                let mut bag = DependencyBag::scoped(context, dependencies);
                spec.run(&name, &mut bag)?;
            }
        }

        Ok(())
    }

    /// Returns whether any listener is registered for a point.
    pub fn has_point(&mut self, point: &str) -> bool {
        self.points
            .iter_mut()
            .find(|p| p.name() == point)
            .is_some_and(|p| p.has_listeners())
    }

    /// Returns the registered point names.
    pub fn point_names(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.name()).collect()
    }

    /// Returns the resolved listener order for a point, if it exists.
    pub fn resolved_order(&mut self, point: &str) -> Option<Vec<String>> {
        self.points
            .iter_mut()
            .find(|p| p.name() == point)
            .map(|p| p.resolved_names())
    }

    /// Returns metadata for the loaded modules.
    pub fn modules(&self) -> &[ModuleInfo] {
        &self.modules
    }

    fn point_mut(&mut self, name: &str) -> &mut ExtensionPoint {
        let index = match self.points.iter().position(|p| p.name() == name) {
            Some(index) => index,
            None => {
                self.points.push(ExtensionPoint::new(name));
                self.points.len() - 1
            }
        };
        &mut self.points[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::HookRegistration;

    struct StaticModule {
        info: ModuleInfo,
        hooks: Vec<HookRegistration>,
    }

    impl Module for StaticModule {
        fn info(&self) -> ModuleInfo {
            self.info.clone()
        }

        fn hooks(&self) -> Vec<HookRegistration> {
            self.hooks.clone()
        }
    }

    fn module(id: &str, hooks: Vec<HookRegistration>) -> Arc<dyn Module> {
        Arc::new(StaticModule {
            info: ModuleInfo {
                id: id.to_string(),
                name: id.to_string(),
                version: "0.1.0".to_string(),
                description: String::new(),
            },
            hooks,
        })
    }

    #[test]
    fn test_unknown_point_is_noop() {
        let mut dispatcher = HookDispatcher::new(&[]).expect("dispatcher");
        let mut ctx = EventContext::new();
        dispatcher.trigger("nowhere", &mut ctx).expect("no-op");
    }

    #[test]
    fn test_disabled_module_is_skipped() {
        let m = module(
            "audit",
            vec![HookRegistration::new(
                "p",
                "l",
                ListenerSpec::callback(|_| Ok(())),
            )],
        );
        let config = ExtensionConfig {
            enabled: vec!["mentions".to_string()],
            strict_missing_listener: false,
        };
        let mut dispatcher =
            HookDispatcher::with_options(&[m], &ListenerCatalog::new(), &config).expect("build");
        assert!(!dispatcher.has_point("p"));
        assert!(dispatcher.modules().is_empty());
    }

    #[test]
    fn test_missing_catalog_listener_skipped_leniently() {
        let m = module(
            "audit",
            vec![
                HookRegistration::new("p", "ghost", ListenerSpec::registered("nowhere")),
                HookRegistration::new(
                    "p",
                    "real",
                    ListenerSpec::callback(|bag| {
                        bag.set_str("ran", "real");
                        Ok(())
                    }),
                ),
            ],
        );
        let mut dispatcher = HookDispatcher::new(&[m]).expect("build");
        let mut ctx = EventContext::new();
        dispatcher.trigger("p", &mut ctx).expect("trigger");
        assert_eq!(ctx.get_str("ran"), Some("real"));
        assert_eq!(dispatcher.resolved_order("p").unwrap(), ["real"]);
    }

    #[test]
    fn test_missing_catalog_listener_rejected_strictly() {
        let m = module(
            "audit",
            vec![HookRegistration::new(
                "p",
                "ghost",
                ListenerSpec::registered("nowhere"),
            )],
        );
        let config = ExtensionConfig {
            enabled: Vec::new(),
            strict_missing_listener: true,
        };
        let result = HookDispatcher::with_options(&[m], &ListenerCatalog::new(), &config);
        assert!(result.is_err());
    }

    #[test]
    fn test_listener_error_aborts_remaining() {
        let m = module(
            "audit",
            vec![
                HookRegistration::new(
                    "p",
                    "boom",
                    ListenerSpec::callback(|_| Err(AppError::extension("boom"))),
                ),
                HookRegistration::new(
                    "p",
                    "after",
                    ListenerSpec::callback(|bag| {
                        bag.set_str("ran", "after");
                        Ok(())
                    }),
                ),
            ],
        );
        let mut dispatcher = HookDispatcher::new(&[m]).expect("build");
        let mut ctx = EventContext::new();
        assert!(dispatcher.trigger("p", &mut ctx).is_err());
        assert!(ctx.get("ran").is_none());
    }
}
