//! Methane Emissions Predictor - Main Entry Point
//!
//! Loads the model once, then runs the interactive form on stdin/stdout.
//! Logs go to stderr.

use anyhow::{Context, Result};
use methane_predictor::{
    assembler::{PredictionAssembler, RecordAssembler},
    config::{AppConfig, LogFormat, LoggingConfig},
    form::PredictionForm,
    models::ModelLoader,
};
use std::io;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(
        format!("methane_predictor={}", logging.level)
            .parse()
            .context("Invalid log level")?,
    );

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
    Ok(())
}

fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    init_logging(&config.logging)?;

    info!("Starting Methane Emissions Predictor");

    // Load the model; nothing else can run without it
    let loader = ModelLoader::new(&config.model.path);
    let predictor = match loader.load() {
        Ok(predictor) => predictor,
        Err(e) => {
            error!(path = %loader.path().display(), error = %e, "Model unavailable, halting");
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    info!(
        "Record assembler initialized ({} features)",
        RecordAssembler::new().feature_count()
    );

    let assembler = PredictionAssembler::new(predictor);
    info!(model = %assembler.model_name(), "Predictor ready");

    let mut form = PredictionForm::new(assembler, config.form.show_note);
    let stdin = io::stdin();
    let stdout = io::stdout();
    form.run(stdin.lock(), stdout.lock())
        .context("Form input/output failed")?;

    form.metrics().print_summary();
    info!("Predictor shutting down");

    Ok(())
}
