//! CLI command definitions and dispatch.

pub mod config;
pub mod hooks;
pub mod layers;
pub mod modules;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use larkboard_core::config::AppConfig;
use larkboard_core::error::AppError;
use larkboard_extension::{HookDispatcher, ListenerCatalog, Module};
use module_audit::AuditModule;
use module_mentions::MentionsModule;

use crate::output::OutputFormat;

/// Larkboard — extension subsystem inspector
#[derive(Debug, Parser)]
#[command(name = "larkboard", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (merges config/default and config/<env>)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Inspect extension points and resolved listener order
    Hooks(hooks::HooksArgs),
    /// Preview template layer open/close order
    Layers(layers::LayersArgs),
    /// List compiled-in modules
    Modules(modules::ModulesArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Hooks(args) => hooks::execute(args, &self.env, self.format),
            Commands::Layers(args) => layers::execute(args, self.format),
            Commands::Modules(args) => modules::execute(args, &self.env, self.format),
            Commands::Config(args) => config::execute(args, &self.env, self.format),
        }
    }
}

/// Helper: load configuration for the selected environment
pub fn load_config(env: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(env)
}

/// Helper: the compiled-in module set
pub fn compiled_modules() -> Vec<Arc<dyn Module>> {
    vec![
        Arc::new(MentionsModule::new()),
        Arc::new(AuditModule::new()),
    ]
}

/// Helper: build a dispatcher over the compiled-in modules
pub fn build_dispatcher(config: &AppConfig) -> Result<HookDispatcher, AppError> {
    HookDispatcher::with_options(
        &compiled_modules(),
        &ListenerCatalog::new(),
        &config.extensions,
    )
}
