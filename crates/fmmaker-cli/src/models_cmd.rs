//! `fmmaker models`: list the models a service offers.
//!
//! Served from the model cache when fresh; otherwise fetched from the
//! provider (or its built-in defaults) and cached for a week.

use anyhow::Result;
use colored::Colorize;

use fmmaker_core::config::load_settings;
use fmmaker_core::ModelCache;
use fmmaker_providers::resolve;

/// Run the models command.
pub async fn run(service: Option<String>) -> Result<()> {
    let settings = load_settings(None);
    let service = service.unwrap_or_else(|| settings.service.clone());

    let cache = ModelCache::new(None);
    let provider = resolve(&service, settings.api_key_for(&service), &cache)?;
    let models = provider.list_models().await;

    println!();
    println!(
        "{} {}",
        provider.display_name().cyan().bold(),
        format!("({} models)", models.len()).dimmed()
    );
    for model in &models {
        let marker = if *model == settings.model {
            "✓".green().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "  {} {:<32} {}",
            marker,
            model,
            format!("max {} tokens", provider.max_tokens_for(model)).dimmed()
        );
    }
    println!();

    Ok(())
}
