//! Module listing commands.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use larkboard_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for the modules command
#[derive(Debug, Args)]
pub struct ModulesArgs {}

/// One row of the module listing
#[derive(Debug, Serialize, Tabled)]
struct ModuleRow {
    /// Module identifier
    id: String,
    /// Human-readable name
    name: String,
    /// Version
    version: String,
    /// Description
    description: String,
}

/// Execute the modules command
pub fn execute(_args: &ModulesArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let dispatcher = super::build_dispatcher(&config)?;

    let rows: Vec<ModuleRow> = dispatcher
        .modules()
        .iter()
        .map(|info| ModuleRow {
            id: info.id.clone(),
            name: info.name.clone(),
            version: info.version.clone(),
            description: info.description.clone(),
        })
        .collect();

    output::print_list(&rows, format);
    Ok(())
}
