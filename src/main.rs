use std::{path::PathBuf, time::{Duration, Instant}};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use time::macros::format_description;

use ramp_daily_clicks::{
    memory_usage,
    workflow::{run_global, run_per_repository, write_repository},
    GlobLocator, RampConfig, RampWorkflow,
};

#[derive(Parser)]
#[command(name = "RAMP Daily Clicks Aggregator")]
#[command(about = "Aggregates monthly RAMP ZIP extracts into global and per-repository daily clicksums written as CSV.")]
#[command(version = "1.0.0")]
struct Cli {
    #[arg(short, long, default_value = "./ramp_zipped", help = "Directory the archive patterns are resolved against")]
    data_root: PathBuf,

    #[arg(long, default_value = "*/*all.zip", help = "Glob for v1 combined archives (before 2018-08-19)")]
    v1_pattern: String,

    #[arg(long, default_value = "*/*all_page-clicks.zip", help = "Glob for v2 page-click archives")]
    page_click_pattern: String,

    #[arg(long, default_value = "*/*all_country-device-info.zip", help = "Glob for v2 country/device archives")]
    country_device_pattern: String,

    #[arg(short, long, default_value = ".", help = "Output directory for summary CSVs")]
    output_dir: PathBuf,

    #[arg(long, default_value = "daily_clicks", help = "Per-repository output directory, relative to the output directory")]
    daily_dir: PathBuf,

    #[arg(short, long, default_value = "RAMP_repository_info.csv", help = "CSV with a repository_id column listing repositories to process")]
    repository_info: PathBuf,

    #[arg(short, long, default_value = "INFO", help = "Logging level (DEBUG, INFO, WARN, ERROR)")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Global daily clicksums across all repositories.
    Global,
    /// Daily clicksums for every repository in the repository list.
    PerRepository,
    /// A single repository.
    Repository {
        #[arg(long, help = "Repository identifier")]
        id: String,

        #[arg(long, help = "Write the full reconciled tables instead of daily clicksums")]
        full: bool,
    },
}

impl Cli {
    fn config(&self) -> RampConfig {
        RampConfig {
            data_root: self.data_root.clone(),
            v1_pattern: self.v1_pattern.clone(),
            page_click_pattern: self.page_click_pattern.clone(),
            country_device_pattern: self.country_device_pattern.clone(),
            output_dir: self.output_dir.clone(),
            daily_dir: self.daily_dir.clone(),
            repository_info: self.repository_info.clone(),
        }
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s {}ms", seconds, elapsed.subsec_millis())
    }
}

fn main() -> Result<()> {
    let main_start_time = Instant::now();
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_uppercase().as_str() {
        "DEBUG" => LevelFilter::Debug,
        "INFO" => LevelFilter::Info,
        "WARN" | "WARNING" => LevelFilter::Warn,
        "ERROR" => LevelFilter::Error,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to INFO.", cli.log_level);
            LevelFilter::Info
        }
    };
    SimpleLogger::new()
        .with_level(log_level)
        .with_timestamp_format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .init()?;

    info!("Starting RAMP Daily Clicks Aggregator v{}", env!("CARGO_PKG_VERSION"));
    memory_usage::log_memory_usage("initial");

    let config = cli.config();
    info!("Data root: {}", config.data_root.display());
    info!("Output directory: {}", config.output_dir.display());
    let workflow = RampWorkflow::new(GlobLocator::new(config.clone()));

    match &cli.command {
        Command::Global => {
            let daily = run_global(&workflow, &config)
                .context("Global daily clicksum run failed")?;
            info!(
                "Global summaries: {} page-click days, {} date/country/device rows",
                daily.page_clicks.len(),
                daily.access_info.len()
            );
        }
        Command::PerRepository => {
            let progress_bar = ProgressBar::new(0);
            progress_bar.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
                    .progress_chars("=> "),
            );
            progress_bar.set_message("Repositories: Starting...");
            let processed = run_per_repository(&workflow, &config, &progress_bar).with_context(|| {
                format!(
                    "Per-repository run failed (repository list {})",
                    config.repository_info.display()
                )
            })?;
            progress_bar.finish_with_message("Processing complete.");
            info!("Processed {} repositories.", processed);
        }
        Command::Repository { id, full } => {
            let written = write_repository(&workflow, &config, id, *full)
                .with_context(|| format!("Run for repository {} failed", id))?;
            for path in &written {
                info!("Output: {}", path.display());
            }
        }
    }

    memory_usage::log_memory_usage("final");
    info!("Total execution time: {}", format_elapsed(main_start_time.elapsed()));
    Ok(())
}
