//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use larkboard_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the merged configuration
    Show,
    /// Validate the configuration for the selected environment
    Validate,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, env: &str, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let config = super::load_config(env)?;
            output::print_item(&config, format);
        }
        ConfigCommand::Validate => match super::load_config(env) {
            Ok(config) => {
                output::print_success(&format!("Configuration for '{}' is valid", env));
                output::print_kv("Log level", &config.logging.level);
                output::print_kv("Log format", &config.logging.format);
                let enabled = if config.extensions.enabled.is_empty() {
                    "all".to_string()
                } else {
                    config.extensions.enabled.join(", ")
                };
                output::print_kv("Enabled modules", &enabled);
                output::print_kv(
                    "Strict missing listener",
                    &config.extensions.strict_missing_listener.to_string(),
                );
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {}", e));
                return Err(e);
            }
        },
    }

    Ok(())
}
