use anyhow::Context;
use clap::Parser;
use cortex_vision::{AssessmentConfig, ImageOutcome, ParallelPipeline};
use cortex_vision::constants::defaults;
use cortex_vision::image_source::display_name;
use std::path::PathBuf;

/// Assess cortical cleanup from pupil-segmented images.
#[derive(Parser, Debug)]
#[command(name = "cleanup_assessor", version)]
struct Cli {
    /// Directory containing pupil-segmented PNG images.
    #[arg(long = "input_dir", default_value = defaults::INPUT_DIR)]
    input_dir: PathBuf,

    /// Directory for the CSV report and the debug mosaic.
    #[arg(long = "output_dir", default_value = defaults::OUTPUT_DIR)]
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // --- 1. Argument Parsing & Setup ---
    let cli = Cli::parse();
    let config = AssessmentConfig::new(&cli.input_dir, &cli.output_dir);
    let pipeline = ParallelPipeline::new(config).context("invalid configuration")?;
    pipeline.config().ensure_output_dir().with_context(|| {
        format!("could not create output directory {}", cli.output_dir.display())
    })?;

    // --- 2. Discovery ---
    let paths = pipeline
        .discover()
        .with_context(|| format!("could not list {}", cli.input_dir.display()))?;
    if paths.is_empty() {
        println!("No PNG images found in {}. Exiting.", cli.input_dir.display());
        return Ok(());
    }
    println!("Found {} images in {}.", paths.len(), cli.input_dir.display());

    // --- 3. Assessment ---
    let report = pipeline
        .assess_batch(paths, |outcome| {
            println!("Processing {}...", display_name(outcome.path()));
            if let ImageOutcome::Skipped(skipped) = outcome {
                println!("Warning: could not read {}, skipping.", skipped.path.display());
            }
        })
        .await
        .context("assessment failed")?;

    // --- 4. Artifacts ---
    let artifacts = report
        .write_artifacts(pipeline.config())
        .context("could not write results")?;
    println!("Saved CSV results to {}", artifacts.csv.display());
    if let Some(mosaic) = &artifacts.mosaic {
        println!("Saved debug mosaic to {}", mosaic.display());
    }

    if let Some(mean) = report.mean_ratio() {
        tracing::info!(
            assessed = report.len(),
            skipped = report.skipped().len(),
            mean_ratio = mean,
            "batch complete"
        );
    }
    Ok(())
}
