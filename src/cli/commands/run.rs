//! Run command - Present a session at the terminal

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::{
    adapters::TerminalInput,
    app::App,
    cli::{
        config::ConfigArgs,
        output::{print_kv, print_metrics, print_section, print_session_result},
    },
    pipeline::{CsvObserver, JsonlObserver, MetricsObserver, SharedObserver},
};

#[derive(Parser, Debug)]
#[command(about = "Run an interactive session at the terminal")]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Write step records as JSON Lines
    #[arg(long)]
    pub jsonl: Option<PathBuf>,

    /// Write step records as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Save the session result as JSON
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Save the effective configuration as JSON
    #[arg(long)]
    pub save_config: Option<PathBuf>,

    /// Print sprite paths under each stimulus
    #[arg(long)]
    pub show_sprites: bool,
}

pub fn execute(args: RunArgs) -> Result<()> {
    let config = args.config.resolve()?;
    if let Some(path) = &args.save_config {
        config
            .save(path)
            .with_context(|| format!("failed to save config to {}", path.display()))?;
    }

    let app = App::new();
    let missing = app.missing_assets(&config);
    if !missing.is_empty() {
        eprintln!(
            "Warning: {} sprite(s) missing under {}",
            missing.len(),
            config.sprite_root.display()
        );
    }

    print_section("Sparring session");
    print_kv("Rounds", &config.repetitions.to_string());
    print_kv("Window", &format!("{} ms", config.wait_window_ms));
    for binding in config.keys.bindings() {
        print_kv(&format!("Key '{}'", binding.key), binding.action.label());
    }
    println!();

    let (metrics, metrics_handle) = SharedObserver::new(MetricsObserver::new());
    let mut session = app
        .create_session(config)?
        .with_observer(Box::new(metrics));
    if let Some(path) = &args.jsonl {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        session = session.with_observer(Box::new(observer));
    }
    if let Some(path) = &args.csv {
        let observer =
            CsvObserver::new(path).with_context(|| format!("failed to create {}", path.display()))?;
        session = session.with_observer(Box::new(observer));
    }

    println!("Press a key when the stimulus appears; Esc quits.");
    let result = {
        let mut input = TerminalInput::open()?.with_sprites(args.show_sprites);
        session.run(&mut input)
    }?;

    print_section("Session complete");
    print_session_result(&result);
    let summary = metrics_handle
        .lock()
        .map_err(|_| anyhow::anyhow!("metrics observer poisoned"))?
        .summary();
    print_metrics(&summary);

    if let Some(path) = &args.output {
        result
            .save(path)
            .with_context(|| format!("failed to save result to {}", path.display()))?;
        info!(path = %path.display(), "Saved session result");
    }
    Ok(())
}
