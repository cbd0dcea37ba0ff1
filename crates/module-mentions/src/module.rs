//! Module registration for mentions.

use std::sync::Arc;

use larkboard_extension::{points, HookRegistration, ListenerSpec, Module, ModuleInfo};

use crate::listeners::{scan_message, MentionHighlighter};

/// The mentions module.
///
/// Registers a scan listener on message save and a display decorator on
/// topic display, both declaring their dependencies explicitly.
#[derive(Debug, Default)]
pub struct MentionsModule;

impl MentionsModule {
    /// Creates the module.
    pub fn new() -> Self {
        Self
    }
}

impl Module for MentionsModule {
    fn info(&self) -> ModuleInfo {
        ModuleInfo {
            id: "mentions".to_string(),
            name: "Mentions".to_string(),
            version: "1.2.0".to_string(),
            description: "Scans messages for @-mentions and decorates them on display".to_string(),
        }
    }

    fn hooks(&self) -> Vec<HookRegistration> {
        vec![
            HookRegistration::new(
                points::MESSAGE_SAVE,
                "mentions_scan",
                ListenerSpec::callback(scan_message),
            )
            .with_dependencies(["message", "mentions"]),
            HookRegistration::new(
                points::TOPIC_DISPLAY,
                "mentions_highlight",
                ListenerSpec::instance(Arc::new(MentionHighlighter::new())),
            )
            .with_dependencies(["message", "board", "message_html"]),
        ]
    }
}
