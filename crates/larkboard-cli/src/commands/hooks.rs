//! Extension point inspection commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use larkboard_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for hook commands
#[derive(Debug, Args)]
pub struct HooksArgs {
    /// Hooks subcommand
    #[command(subcommand)]
    pub command: HooksCommand,
}

/// Hooks subcommands
#[derive(Debug, Subcommand)]
pub enum HooksCommand {
    /// List every registered extension point and its resolved listeners
    List,
    /// Show the resolved listener order for one point
    Order {
        /// Extension point name
        point: String,
    },
}

/// One row of the hook listing
#[derive(Debug, Serialize, Tabled)]
struct HookRow {
    /// Extension point name
    point: String,
    /// Position in the resolved order
    position: usize,
    /// Listener name
    listener: String,
}

/// Execute hook commands
pub fn execute(args: &HooksArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let mut dispatcher = super::build_dispatcher(&config)?;

    match &args.command {
        HooksCommand::List => {
            let mut rows = Vec::new();
            let names: Vec<String> = dispatcher
                .point_names()
                .into_iter()
                .map(str::to_string)
                .collect();
            for point in names {
                if let Some(order) = dispatcher.resolved_order(&point) {
                    for (position, listener) in order.into_iter().enumerate() {
                        rows.push(HookRow {
                            point: point.clone(),
                            position,
                            listener,
                        });
                    }
                }
            }
            output::print_list(&rows, format);
        }
        HooksCommand::Order { point } => {
            let Some(order) = dispatcher.resolved_order(point) else {
                output::print_error(&format!("No listeners registered for point '{}'", point));
                return Err(AppError::not_found(format!("unknown point '{point}'")));
            };
            let rows: Vec<HookRow> = order
                .into_iter()
                .enumerate()
                .map(|(position, listener)| HookRow {
                    point: point.clone(),
                    position,
                    listener,
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
