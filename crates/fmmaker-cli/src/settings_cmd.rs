//! `fmmaker settings`: view or change the stored settings.
//!
//! - `fmmaker settings show`: print the settings (keys masked)
//! - `fmmaker settings set [--anthropic-key K] [--openai-key K] [--service S] [--model M] [--temperature T]`
//!
//! `set` only overwrites the fields that were given a non-empty value.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use fmmaker_core::config::{get_settings_path, load_settings, update_settings, SettingsUpdate};
use fmmaker_core::Settings;
use fmmaker_providers::registry::find_by_name;

use crate::helpers::mask_key;

/// Settings subcommands.
#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Print the stored settings
    Show,

    /// Update stored settings
    Set {
        /// Anthropic API key
        #[arg(long)]
        anthropic_key: Option<String>,

        /// OpenAI API key
        #[arg(long)]
        openai_key: Option<String>,

        /// Default service (Anthropic or OpenAI)
        #[arg(short, long)]
        service: Option<String>,

        /// Default model
        #[arg(short, long)]
        model: Option<String>,

        /// Default temperature, 0.0 – 1.0
        #[arg(short, long)]
        temperature: Option<f64>,
    },
}

/// Dispatch a settings subcommand.
pub fn dispatch(action: SettingsCommands) -> Result<()> {
    match action {
        SettingsCommands::Show => {
            print_settings(&load_settings(None));
            Ok(())
        }
        SettingsCommands::Set {
            anthropic_key,
            openai_key,
            service,
            model,
            temperature,
        } => {
            let service = match service {
                Some(name) => Some(canonical_service(&name)?),
                None => None,
            };
            let update = SettingsUpdate {
                anthropic_api_key: anthropic_key,
                openai_api_key: openai_key,
                temperature,
                service,
                model,
            };
            let settings = update_settings(&update, None).with_context(|| {
                format!("failed to update settings at {}", get_settings_path().display())
            })?;
            println!("{} Settings saved", "✓".green());
            print_settings(&settings);
            Ok(())
        }
    }
}

/// Display form of a service name, rejecting unsupported ones.
fn canonical_service(name: &str) -> Result<String> {
    find_by_name(name)
        .map(|spec| spec.display_name.to_string())
        .with_context(|| format!("Unknown service: {name}"))
}

fn print_settings(settings: &Settings) {
    println!();
    println!("  {:<18} {}", "Settings:".bold(), get_settings_path().display());
    println!("  {:<18} {}", "Service:".bold(), settings.service);
    println!("  {:<18} {}", "Model:".bold(), settings.model);
    println!("  {:<18} {}", "Temperature:".bold(), settings.temperature);
    println!("  {:<18} {}", "Anthropic key:".bold(), mask_key(&settings.anthropic_api_key));
    println!("  {:<18} {}", "OpenAI key:".bold(), mask_key(&settings.openai_api_key));
    println!();
}
