//! Integration tests for the hook dispatcher: resolved invocation order,
//! dependency injection and provider fallback.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use larkboard_core::AppResult;
use larkboard_extension::{
    DependencyBag, DependencyProvider, EventContext, HookDispatcher, HookRegistration, Listener,
    ListenerSpec, Module, ModuleInfo,
};

/// A module built from a fixed list of registrations.
struct TestModule {
    id: String,
    hooks: Vec<HookRegistration>,
}

impl TestModule {
    fn new(id: &str, hooks: Vec<HookRegistration>) -> Arc<dyn Module> {
        Arc::new(Self {
            id: id.to_string(),
            hooks,
        })
    }
}

impl Module for TestModule {
    fn info(&self) -> ModuleInfo {
        ModuleInfo {
            id: self.id.clone(),
            name: self.id.clone(),
            version: "0.1.0".to_string(),
            description: "test module".to_string(),
        }
    }

    fn hooks(&self) -> Vec<HookRegistration> {
        self.hooks.clone()
    }
}

/// Listener that records its name into a shared call log.
struct RecordingListener {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl Listener for RecordingListener {
    fn invoke(&self, _bag: &mut DependencyBag<'_>) -> AppResult<()> {
        self.log.lock().unwrap().push(self.name.to_string());
        Ok(())
    }
}

fn recording(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> ListenerSpec {
    ListenerSpec::instance(Arc::new(RecordingListener {
        name,
        log: Arc::clone(log),
    }))
}

#[test]
fn test_trigger_with_no_registrations_is_a_noop() {
    let mut dispatcher = HookDispatcher::new(&[]).expect("dispatcher");
    let mut ctx = EventContext::new();
    dispatcher
        .trigger("topic_display", &mut ctx)
        .expect("empty trigger must not fail");
    assert!(ctx.is_empty());
}

#[test]
fn test_invocation_order_end_begin_after() {
    // M1 at end, M2 at begin, M3 after M1: invocation order is M2, M1, M3.
    let log = Arc::new(Mutex::new(Vec::new()));
    let module = TestModule::new(
        "ordering",
        vec![
            HookRegistration::new("p", "m1", recording("m1", &log)).at_end(None),
            HookRegistration::new("p", "m2", recording("m2", &log)).at_begin(None),
            HookRegistration::new("p", "m3", recording("m3", &log)).after("m1"),
        ],
    );

    let mut dispatcher = HookDispatcher::new(&[module]).expect("dispatcher");
    let mut ctx = EventContext::new();
    dispatcher.trigger("p", &mut ctx).expect("trigger");

    assert_eq!(*log.lock().unwrap(), ["m2", "m1", "m3"]);
}

#[test]
fn test_scoped_bag_contains_exactly_declared_names() {
    let module = TestModule::new(
        "deps",
        vec![HookRegistration::new(
            "p",
            "needs_board_and_topic",
            ListenerSpec::callback(|bag| {
                assert_eq!(bag.get_str("board"), Some("general"));
                assert_eq!(bag.get_str("topic"), Some("welcome"));
                assert!(bag.get("member").is_none(), "undeclared key must be hidden");
                let mut names = bag.names();
                names.sort_unstable();
                assert_eq!(names, ["board", "topic"]);
                Ok(())
            }),
        )
        .with_dependencies(["board", "topic"])],
    );

    let mut dispatcher = HookDispatcher::new(&[module]).expect("dispatcher");
    let mut ctx = EventContext::new()
        .with_str("board", "general")
        .with_str("topic", "welcome")
        .with_str("member", "ada");
    dispatcher.trigger("p", &mut ctx).expect("trigger");
}

/// Provider that serves from a fixed table and counts its calls.
struct TableProvider {
    table: HashMap<String, serde_json::Value>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl DependencyProvider for TableProvider {
    fn provide(&self, missing: &[String]) -> AppResult<HashMap<String, serde_json::Value>> {
        self.calls.lock().unwrap().push(missing.to_vec());
        Ok(missing
            .iter()
            .filter_map(|name| self.table.get(name).map(|v| (name.clone(), v.clone())))
            .collect())
    }
}

#[test]
fn test_missing_dependencies_come_from_provider() {
    let module = TestModule::new(
        "deps",
        vec![HookRegistration::new(
            "p",
            "needs_board_and_topic",
            ListenerSpec::callback(|bag| {
                assert_eq!(bag.get_str("board"), Some("general"));
                assert_eq!(bag.get_str("topic"), Some("from_provider"));
                Ok(())
            }),
        )
        .with_dependencies(["board", "topic"])],
    );

    let provider = TableProvider {
        table: HashMap::from([("topic".to_string(), serde_json::json!("from_provider"))]),
        calls: Mutex::new(Vec::new()),
    };

    let mut dispatcher = HookDispatcher::new(&[module]).expect("dispatcher");
    let mut ctx = EventContext::new().with_str("board", "general");
    dispatcher
        .trigger_with("p", &mut ctx, &provider)
        .expect("trigger");

    // Only the name absent from the context was requested, and the
    // provided value persisted into the shared context.
    assert_eq!(*provider.calls.lock().unwrap(), [["topic".to_string()]]);
    assert_eq!(ctx.get_str("topic"), Some("from_provider"));
}

#[test]
fn test_provider_not_called_again_once_value_persisted() {
    let registration = |name: &str| {
        HookRegistration::new(
            "p",
            name,
            ListenerSpec::callback(|bag| {
                assert!(bag.get("settings").is_some());
                Ok(())
            }),
        )
        .with_dependencies(["settings"])
    };
    let module = TestModule::new("deps", vec![registration("first"), registration("second")]);

    let provider = TableProvider {
        table: HashMap::from([("settings".to_string(), serde_json::json!({"theme": "dark"}))]),
        calls: Mutex::new(Vec::new()),
    };

    let mut dispatcher = HookDispatcher::new(&[module]).expect("dispatcher");
    let mut ctx = EventContext::new();
    dispatcher
        .trigger_with("p", &mut ctx, &provider)
        .expect("trigger");

    assert_eq!(provider.calls.lock().unwrap().len(), 1);
}

#[test]
fn test_full_bag_mutations_visible_to_later_listeners() {
    let module = TestModule::new(
        "chain",
        vec![
            HookRegistration::new(
                "p",
                "writer",
                ListenerSpec::callback(|bag| {
                    bag.set_str("note", "from_writer");
                    Ok(())
                }),
            ),
            HookRegistration::new(
                "p",
                "reader",
                ListenerSpec::callback(|bag| {
                    assert_eq!(bag.get_str("note"), Some("from_writer"));
                    Ok(())
                }),
            )
            .after("writer"),
        ],
    );

    let mut dispatcher = HookDispatcher::new(&[module]).expect("dispatcher");
    let mut ctx = EventContext::new();
    dispatcher.trigger("p", &mut ctx).expect("trigger");
    assert_eq!(ctx.get_str("note"), Some("from_writer"));
}

#[test]
fn test_registrations_from_multiple_modules_share_a_point() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let first = TestModule::new(
        "first",
        vec![HookRegistration::new("p", "late", recording("late", &log)).at_end(None)],
    );
    let second = TestModule::new(
        "second",
        vec![HookRegistration::new("p", "early", recording("early", &log)).at_begin(None)],
    );

    let mut dispatcher = HookDispatcher::new(&[first, second]).expect("dispatcher");
    assert_eq!(dispatcher.modules().len(), 2);

    let mut ctx = EventContext::new();
    dispatcher.trigger("p", &mut ctx).expect("trigger");
    assert_eq!(*log.lock().unwrap(), ["early", "late"]);
}
