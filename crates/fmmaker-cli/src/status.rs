//! `fmmaker status`: show settings, model cache, and provider status.

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;

use fmmaker_core::config::{get_settings_path, load_settings};
use fmmaker_core::ModelCache;
use fmmaker_providers::PROVIDERS;

/// Run the status command.
pub fn run() -> Result<()> {
    let settings_path = get_settings_path();
    let settings_exist = settings_path.exists();
    let settings = load_settings(None);
    let cache = ModelCache::new(None);

    println!();
    println!("{}", "Front-Matter Maker Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Settings:".bold(),
        settings_path.display(),
        if settings_exist {
            "✓".green().to_string()
        } else {
            "(created)".yellow().to_string()
        }
    );
    println!("  {:<18} {}", "Model cache:".bold(), cache.path().display());
    println!(
        "  {:<18} {} · {}",
        "Selection:".bold(),
        settings.service,
        settings.model
    );
    println!(
        "  {:<18} {}",
        "Parameters:".bold(),
        format!("temp: {}", settings.temperature).dimmed()
    );

    println!();
    println!("  {}", "Providers:".bold());
    let now = Utc::now();
    for spec in PROVIDERS {
        let key = if settings.api_key_for(spec.name).is_empty() {
            format!("{}", "· no key".dimmed())
        } else {
            format!("{} key set", "✓".green())
        };
        let cached = match cache.entry(spec.display_name) {
            Some(entry) if entry.is_fresh_at(now) => format!(
                "{} models cached, {}h old",
                entry.models.len(),
                (now - entry.last_updated).num_hours()
            ),
            Some(_) => "cache expired".to_string(),
            None => "not cached".to_string(),
        };
        println!("    {:<12} {}  {}", spec.display_name, key, cached.dimmed());
    }
    println!();

    Ok(())
}
