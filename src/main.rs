// Entry point and high-level CLI flow.
//
// Loads the three building datasets, computes every metric once and prints
// the text report. Optional flags write the report, a JSON summary and the
// row-level CSV tables to disk.
use anyhow::{Context, Result};
use building_report::config::AnalysisConstants;
use building_report::loader::{self, DatasetPaths};
use building_report::metrics;
use building_report::{observability, output, report};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "building_report", version, about = "Building usage metrics report")]
struct Cli {
    /// Badge swipe export (one row per employee, Jan-Sep columns)
    #[arg(long, default_value = "Assumed Population in Future B37 Use - Badge Swipes YTD 2025.csv")]
    badges: PathBuf,

    /// Monthly utility consumption export
    #[arg(long, default_value = "FINAL MIT Hackathon Data - Schenectady.csv")]
    utilities: PathBuf,

    /// Conference center booking export
    #[arg(long, default_value = "GE 37 Conference Center usage JAN24-SEP25.csv")]
    bookings: PathBuf,

    /// TOML file overriding the built-in analysis constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the headline figures as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Directory for the monthly and per-floor occupancy CSV tables
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    observability::init_tracing();
    let cli = Cli::parse();

    let constants = match &cli.config {
        Some(path) => AnalysisConstants::load(path)
            .with_context(|| format!("loading constants from {}", path.display()))?,
        None => AnalysisConstants::default(),
    };

    let paths = DatasetPaths {
        badges: cli.badges.clone(),
        utilities: cli.utilities.clone(),
        bookings: cli.bookings.clone(),
    };
    let (dataset, load) =
        loader::load_dataset(&paths, &constants.loader).context("loading datasets")?;

    let bundle = metrics::compute_all(&dataset, &constants);
    if bundle.occupancy.employees != constants.building.headcount {
        warn!(
            roster = bundle.occupancy.employees,
            headcount = constants.building.headcount,
            "badge roster differs from configured headcount"
        );
    }

    let text = report::render(&bundle, &load, &constants);
    match &cli.output {
        Some(path) => {
            output::write_text(path, &text)?;
            info!(path = %path.display(), "report written");
        }
        None => print!("{text}"),
    }

    if let Some(path) = &cli.summary_json {
        output::write_json(path, &bundle.summary())?;
        info!(path = %path.display(), "summary written");
    }

    if let Some(dir) = &cli.export_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        let monthly = dir.join("monthly_occupancy.csv");
        output::write_csv(&monthly, &report::monthly_rows(&bundle.occupancy))?;
        let floors = dir.join("floor_distribution.csv");
        output::write_csv(&floors, &report::floor_rows(&bundle.occupancy))?;
        info!(dir = %dir.display(), "occupancy tables exported");
    }

    Ok(())
}
