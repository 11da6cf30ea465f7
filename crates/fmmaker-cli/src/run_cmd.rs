//! `fmmaker run`: process a batch of files with one prompt template.
//!
//! Selections come from the command line, optionally seeded from an
//! exported run configuration (`--config`). Service, model and temperature
//! default to the stored settings.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use tracing::info;

use fmmaker_batch::{start_batch, BatchState, ProcessingJob};
use fmmaker_core::config::load_settings;
use fmmaker_core::{ApiSection, ModelCache, RunConfig, RunSelection};
use fmmaker_providers::{resolve, RequestParameters};

use crate::helpers;

/// Arguments of `fmmaker run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Prompt template file; `{{TEXT}}` is replaced by each file's content
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Directory receiving the `<name>.md` outputs
    #[arg(short, long)]
    pub output: Option<String>,

    /// Reference line added under the front matter
    #[arg(short, long)]
    pub reference: Option<String>,

    /// Service name (Anthropic or OpenAI)
    #[arg(short, long)]
    pub service: Option<String>,

    /// Model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// Maximum tokens per response (bounded by the model's ceiling)
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature, 0.0 – 1.0
    #[arg(short, long)]
    pub temperature: Option<f64>,

    /// Load selections from an exported run configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Export this run's selections before starting
    #[arg(long)]
    pub save_config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    pub logs: bool,

    /// Input text files, processed in the given order
    pub files: Vec<String>,
}

/// Run the batch and render progress until it ends.
pub async fn run(args: RunArgs) -> Result<()> {
    let settings = load_settings(None);

    let loaded = match &args.config {
        Some(path) => Some(RunConfig::load_selection(path)?),
        None => None,
    };
    let selection = merge_selection(&args, loaded);

    let service = args.service.clone().unwrap_or_else(|| settings.service.clone());
    let model = args.model.clone().unwrap_or_else(|| settings.model.clone());
    let temperature = args.temperature.unwrap_or(settings.temperature);

    let cache = ModelCache::new(None);
    let provider = resolve(&service, settings.api_key_for(&service), &cache)?;
    let max_tokens = args
        .max_tokens
        .unwrap_or_else(|| provider.max_tokens_for(&model));
    let params = RequestParameters::bounded(provider.as_ref(), model, max_tokens, temperature);

    if let Some(path) = &args.save_config {
        let api = ApiSection {
            service: provider.display_name().to_string(),
            model: params.model.clone(),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };
        RunConfig::new(selection.clone(), api).save(path)?;
        println!("Configuration saved to {}", path.display());
    }

    let job = build_job(&selection);
    info!(
        service = provider.display_name(),
        model = %params.model,
        max_tokens = params.max_tokens,
        temperature = params.temperature,
        "starting batch"
    );
    println!(
        "{} {} · {} · max_tokens {} · temp {}",
        "▶".cyan(),
        provider.display_name(),
        params.model,
        params.max_tokens,
        params.temperature
    );

    let mut handle = start_batch(job, params, provider);
    while let Some(event) = handle.next_event().await {
        helpers::print_event(&event);
    }
    let report = handle.wait().await?;

    match report.state {
        BatchState::Completed => Ok(()),
        state => bail!(
            "batch {}: {}",
            state,
            report.error.as_deref().unwrap_or("no details")
        ),
    }
}

/// Command-line values win over values loaded from a run configuration.
fn merge_selection(args: &RunArgs, loaded: Option<RunSelection>) -> RunSelection {
    let mut selection = loaded.unwrap_or_default();
    if let Some(prompt) = &args.prompt {
        selection.prompt_file = prompt.clone();
    }
    if !args.files.is_empty() {
        selection.text_files = args.files.clone();
    }
    if let Some(output) = &args.output {
        selection.output_dir = output.clone();
    }
    if let Some(reference) = &args.reference {
        selection.reference = reference.clone();
    }
    selection
}

fn build_job(selection: &RunSelection) -> ProcessingJob {
    let inputs = selection
        .text_files
        .iter()
        .map(|f| helpers::expand_tilde(f))
        .collect();
    ProcessingJob::new(
        helpers::expand_tilde(&selection.prompt_file),
        inputs,
        helpers::expand_tilde(&selection.output_dir),
    )
    .with_reference(Some(selection.reference.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(files: &[&str]) -> RunArgs {
        RunArgs {
            prompt: None,
            output: None,
            reference: None,
            service: None,
            model: None,
            max_tokens: None,
            temperature: None,
            config: None,
            save_config: None,
            logs: false,
            files: files.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn loaded() -> RunSelection {
        RunSelection {
            prompt_file: "saved-prompt.txt".into(),
            text_files: vec!["saved.txt".into()],
            output_dir: "saved-out".into(),
            reference: "Saved ref".into(),
        }
    }

    #[test]
    fn loaded_selection_used_when_args_absent() {
        assert_eq!(merge_selection(&args(&[]), Some(loaded())), loaded());
    }

    #[test]
    fn args_override_loaded_selection() {
        let mut a = args(&["a.txt", "b.txt"]);
        a.output = Some("out".into());
        let merged = merge_selection(&a, Some(loaded()));
        assert_eq!(merged.prompt_file, "saved-prompt.txt");
        assert_eq!(merged.text_files, vec!["a.txt".to_string(), "b.txt".to_string()]);
        assert_eq!(merged.output_dir, "out");
        assert_eq!(merged.reference, "Saved ref");
    }

    #[test]
    fn build_job_keeps_order_and_reference() {
        let selection = RunSelection {
            prompt_file: "/p.txt".into(),
            text_files: vec!["/z.txt".into(), "/a.txt".into()],
            output_dir: "/out".into(),
            reference: "  ".into(),
        };
        let job = build_job(&selection);
        assert_eq!(
            job.input_file_paths,
            vec![PathBuf::from("/z.txt"), PathBuf::from("/a.txt")]
        );
        assert_eq!(job.reference, None);
    }
}
