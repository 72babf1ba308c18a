//! Play Store Insights - exploratory analysis of the Google Play Store datasets
//!
//! Loads the app catalog and review sentiments, cleans them, renders five
//! charts and prints the statistics report.

use anyhow::{Context, Result};
use clap::Parser;
use playstore_insights::{AnalysisConfig, InstallsPolicy, Pipeline, RenderMode};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    author = "Murphy",
    version,
    about = "Google Play Store catalog & review sentiment analysis",
    long_about = "Loads googleplaystore.csv and googleplaystore_user_reviews.csv, cleans them,\n\
                  prints descriptive statistics, correlations, skewness and kurtosis, and\n\
                  renders five charts.\n\n\
                  EXAMPLES:\n  \
                  # Write charts and report.txt/report.json into ./charts\n  \
                  playstore-insights --input-dir data/\n\n  \
                  # Step through the charts in a window instead\n  \
                  playstore-insights --input-dir data/ --display\n\n  \
                  # Machine-readable report\n  \
                  playstore-insights --input-dir data/ --json | jq .statistics.skewness"
)]
struct Args {
    /// Directory containing both CSV files
    #[arg(long, env = "PLAYSTORE_INPUT_DIR", default_value = ".")]
    input_dir: PathBuf,

    /// App catalog file name inside the input directory
    #[arg(long, default_value = playstore_insights::config::DEFAULT_APPS_FILE)]
    apps_file: String,

    /// Review sentiment file name inside the input directory
    #[arg(long, default_value = playstore_insights::config::DEFAULT_REVIEWS_FILE)]
    reviews_file: String,

    /// Output directory for charts and report files
    #[arg(short, long, env = "PLAYSTORE_OUTPUT_DIR", default_value = "./charts")]
    output_dir: PathBuf,

    /// Show the charts one after another in a window instead of writing PNG files
    #[arg(long)]
    display: bool,

    /// Abort on a malformed Installs value instead of dropping the row
    #[arg(long)]
    strict_installs: bool,

    /// Print the report as JSON instead of text tables
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber. Logs go to stderr so stdout carries
/// only the report.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet);

    let config = AnalysisConfig::builder()
        .input_dir(&args.input_dir)
        .apps_file(&args.apps_file)
        .reviews_file(&args.reviews_file)
        .output_dir(&args.output_dir)
        .render_mode(if args.display {
            RenderMode::Screen
        } else {
            RenderMode::File
        })
        .installs_policy(if args.strict_installs {
            InstallsPolicy::Fail
        } else {
            InstallsPolicy::Drop
        })
        .build()
        .context("Invalid command line options")?;

    info!(
        apps = %config.apps_path().display(),
        reviews = %config.reviews_path().display(),
        "Starting analysis"
    );

    let outcome = Pipeline::new(config)?
        .run()
        .context("Analysis failed")?;

    if args.json {
        println!("{}", outcome.json_report);
    } else {
        print!("{}", outcome.text_report);
    }

    for path in &outcome.written {
        info!("Wrote {}", path.display());
    }
    Ok(())
}
