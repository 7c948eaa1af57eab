//! Mkvstamp - Batch MKV Branding Workflow
//!
//! This is the main entry point for the mkvstamp application, which copies
//! MKV files into an output directory, injects a generated subtitle track,
//! and rewrites container and track metadata using the MKVToolNix tools.

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use mkvstamp::cli::{Args, Commands};
use mkvstamp::config::Config;
use mkvstamp::pipeline::Pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    info!("Starting mkvstamp - Batch MKV Branding Workflow");

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            // Try to load config.toml from current directory first
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    // Create pipeline instance and make sure the external tools respond
    let pipeline = Pipeline::new(config);
    pipeline.check_tools().await?;

    // Execute command
    match args.command {
        Commands::Batch { input_dir, output_dir } => {
            info!("Processing directory: {}", input_dir.display());

            let summary = pipeline.process_directory(&input_dir, &output_dir).await?;

            println!(
                "\nBatch finished: {} processed, {} failed",
                summary.processed, summary.failed
            );
        }
        Commands::Process { input, output_dir } => {
            info!("Processing file: {}", input.display());

            let stage = pipeline.process_single_file(&input, &output_dir).await?;
            println!("Processed {} (reached {:?})", input.display(), stage);
        }
        Commands::Tracks { input } => {
            info!("Listing tracks of: {}", input.display());

            let tracks = pipeline.list_tracks(&input).await?;

            println!("\nTracks in {}:", input.display());
            println!("{:<8} {:<12}", "Number", "Type");
            println!("{}", "-".repeat(20));
            for track in tracks {
                println!("{:<8} {:<12}", track.number, track.track_type.to_string());
            }
        }
    }

    info!("mkvstamp workflow completed");
    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let app_dir = std::env::current_dir()?.join(".mkvstamp");
    let log_dir = app_dir.join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "mkvstamp.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    // Determine log level
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Create console layer
    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    // Create file layer
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    // Setup layered subscriber
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer);

    // Initialize the subscriber
    subscriber
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        "Logging initialized - console: {}, file: {}",
        log_level,
        log_dir.join("mkvstamp.log").display()
    );

    Ok(())
}
