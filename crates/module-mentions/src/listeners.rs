//! Hook listeners for the mentions module.

use tracing::debug;

use larkboard_core::AppResult;
use larkboard_extension::{DependencyBag, Listener};

use crate::scan::{extract_mentions, highlight_mentions};

/// Scans the message body being saved and records the mentioned names.
///
/// Declares a dependency on `message`; writes the extracted names back
/// into the context under `mentions` so downstream listeners (and the
/// saving controller) can notify the mentioned members.
pub fn scan_message(bag: &mut DependencyBag<'_>) -> AppResult<()> {
    let Some(body) = bag.get_str("message") else {
        return Ok(());
    };

    let mentions = extract_mentions(body);
    debug!(count = mentions.len(), "scanned message for mentions");
    bag.set("mentions", serde_json::json!(mentions));
    Ok(())
}

/// Decorates mention markup when a topic is displayed.
pub struct MentionHighlighter {
    /// Class attribute emitted on the wrapping span.
    css_class: String,
}

impl MentionHighlighter {
    /// Creates a highlighter with the stock `mention` class.
    pub fn new() -> Self {
        Self {
            css_class: "mention".to_string(),
        }
    }
}

impl Default for MentionHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Listener for MentionHighlighter {
    fn invoke(&self, bag: &mut DependencyBag<'_>) -> AppResult<()> {
        let Some(body) = bag.get_str("message") else {
            return Ok(());
        };

        let decorated = highlight_mentions(body, &self.css_class);
        if decorated != body {
            debug!(
                board = bag.get_str("board").unwrap_or("?"),
                "decorated mentions for display"
            );
        }
        bag.set("message_html", serde_json::json!(decorated));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larkboard_extension::EventContext;

    #[test]
    fn test_scan_writes_mentions_into_context() {
        let mut ctx = EventContext::new().with_str("message", "ping @ada and @grace");
        {
            let mut bag =
                DependencyBag::scoped(&mut ctx, vec!["message".to_string(), "mentions".to_string()]);
            scan_message(&mut bag).expect("scan");
        }
        assert_eq!(
            ctx.get("mentions"),
            Some(&serde_json::json!(["ada", "grace"]))
        );
    }

    #[test]
    fn test_scan_without_message_is_a_noop() {
        let mut ctx = EventContext::new();
        let mut bag = DependencyBag::full(&mut ctx);
        scan_message(&mut bag).expect("scan");
        assert!(ctx.get("mentions").is_none());
    }

    #[test]
    fn test_highlighter_writes_decorated_body() {
        let highlighter = MentionHighlighter::new();
        let mut ctx = EventContext::new()
            .with_str("message", "hi @ada")
            .with_str("board", "general");
        {
            let mut bag = DependencyBag::full(&mut ctx);
            highlighter.invoke(&mut bag).expect("highlight");
        }
        assert_eq!(
            ctx.get_str("message_html"),
            Some("hi <span class=\"mention\">@ada</span>")
        );
    }
}
