//! Template layer preview commands.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use larkboard_core::error::AppError;
use larkboard_extension::LayerRegistry;

use crate::output::{self, OutputFormat};

/// Arguments for the layers command
#[derive(Debug, Args)]
pub struct LayersArgs {
    /// Show the degraded order a fatal error would render
    #[arg(long)]
    pub error_safe: bool,
}

/// One row of the layer preview
#[derive(Debug, Serialize, Tabled)]
struct LayerRow {
    /// Position in the open order
    position: usize,
    /// Layer opened at this position
    open: String,
    /// Layer closed at this position
    close: String,
}

/// Execute the layers command
pub fn execute(args: &LayersArgs, format: OutputFormat) -> Result<(), AppError> {
    let mut layers = stock_page_layers();
    if args.error_safe {
        layers.restrict_to_error_safe();
    }

    let open = layers.layers();
    let close = layers.layers_reversed();

    let rows: Vec<LayerRow> = open
        .iter()
        .zip(close.iter())
        .enumerate()
        .map(|(position, (open, close))| LayerRow {
            position,
            open: open.clone(),
            close: close.clone(),
        })
        .collect();
    output::print_list(&rows, format);

    if args.error_safe {
        output::print_success("showing error-safe degraded order");
    }
    Ok(())
}

/// The stock Larkboard page skeleton used by the theme templates.
///
/// Structural layers register while error-safe tracking is on; decorative
/// layers come after it is turned off.
fn stock_page_layers() -> LayerRegistry {
    let mut layers = LayerRegistry::new();
    layers.track_error_safe(true);
    layers.add_begin("html", None);
    layers.add_begin("head", None);
    layers.add_begin("body", None);
    layers.add("main", None);
    layers.track_error_safe(false);
    layers.add_before("breadcrumbs", "main");
    layers.add("topic_list", None);
    layers.add_after("pagination", "topic_list");
    layers.add("sidebar", None);
    layers.add_end("footer", None);
    layers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_layers_resolve() {
        let mut layers = stock_page_layers();
        let open = layers.layers();
        assert_eq!(open.first().map(String::as_str), Some("html"));
        assert_eq!(open.last().map(String::as_str), Some("footer"));
    }

    #[test]
    fn test_error_safe_subset_is_structural() {
        let mut layers = stock_page_layers();
        layers.restrict_to_error_safe();
        assert_eq!(layers.layers(), ["html", "head", "body", "main"]);
    }
}
