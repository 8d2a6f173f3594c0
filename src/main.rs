//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `listing_harvest` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Config file loading and the trial window check
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use std::process;
use tokio_util::sync::CancellationToken;

use listing_harvest::config::{check_trial, load_app_config, Opt};
use listing_harvest::initialization::init_logger;
use listing_harvest::{
    cancel_on_interrupt, collect_targets, outcomes_to_rows, print_batch_summary, ExportOptions,
    Harvester, LogProgress,
};

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();

    if let Err(e) = run(opt).await {
        eprintln!("listing_harvest error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

async fn run(opt: Opt) -> Result<()> {
    let file_config = match &opt.config {
        Some(path) => Some(load_app_config(path)?),
        None => None,
    };
    let config = opt.to_config(file_config.as_ref());
    init_logger(&config).context("Failed to initialize logger")?;

    if let Some(trial) = file_config.as_ref().and_then(|f| f.trial.as_ref()) {
        check_trial(trial, Local::now().date_naive())?;
    }

    let targets = collect_targets(&opt.targets, opt.file.as_deref()).await?;
    if targets.is_empty() {
        bail!("No targets given: pass product URLs or identifiers, or --file");
    }

    config.validate()?;

    let harvester = Harvester::new(config);
    let cancel = CancellationToken::new();
    let interrupt = cancel_on_interrupt(cancel.clone());

    let batch = harvester
        .run_batch_with(&targets, &opt.banned_words, &LogProgress, &cancel)
        .await;

    // The engine is released whether or not the batch ran
    let shutdown = harvester.shutdown_engine().await;
    if let Some(error) = &shutdown.error {
        log::warn!("Engine shutdown reported: {error}");
    }
    cancel.cancel();
    let _ = interrupt.await;

    let result = batch?;
    print_batch_summary(&result.summary());

    println!(
        "{}",
        serde_json::to_string_pretty(result.outcomes()).context("Failed to render results")?
    );

    if let Some(output) = &opt.output {
        let rows = outcomes_to_rows(&result);
        let options = ExportOptions {
            output: Some(output.clone()),
            format: opt.format,
        };
        let export = harvester.export_table(&rows, &options);
        if !export.success {
            bail!(
                "Export failed: {}",
                export.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
        println!(
            "Exported {} row{} to {}",
            export.rows_written,
            if export.rows_written == 1 { "" } else { "s" },
            output.display()
        );
    }

    Ok(())
}
