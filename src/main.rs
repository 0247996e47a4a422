//! `ignite` command-line entry point
//!
//! ```text
//! ignite run [--config studies.toml] [--out results] [--study pressure ...] [--sequential] [--no-plots]
//! ignite config > studies.toml
//! ```
//!
//! Without `--config` the built-in methane auto-ignition studies are run.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use std::path::{Path, PathBuf};

use ignite_rs::config::{Study, StudyConfig};
use ignite_rs::models::GlobalMethaneKinetics;
use ignite_rs::output::export::{CsvConfig, CsvExporter, CsvMetadata, Exporter, JsonExporter};
use ignite_rs::output::format_study_report;
use ignite_rs::output::visualization::{plot_delay_curve, plot_temperature_traces, PlotConfig};
use ignite_rs::physics::ReactorSimulator;
use ignite_rs::sweep::SweepTable;

#[derive(Parser, Debug)]
#[command(name = "ignite")]
#[command(version)]
#[command(about = "Auto-ignition delay studies over pressure, temperature and composition", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run ignition delay studies and write reports, exports and charts
    Run(RunArgs),

    /// Print the built-in study document as TOML
    Config,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Study document (TOML); the built-in studies are used when omitted
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(long, short = 'o', default_value = "results")]
    out: PathBuf,

    /// Run only the named studies (repeatable)
    #[arg(long = "study", short = 's')]
    studies: Vec<String>,

    /// Visit grid points one at a time instead of on the thread pool
    #[arg(long)]
    sequential: bool,

    /// Skip chart rendering
    #[arg(long)]
    no_plots: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_studies(args),
        Commands::Config => print_config(),
    }
}

// =============================================================================
// Commands
// =============================================================================

fn print_config() -> Result<()> {
    let document = StudyConfig::methane_autoignition()
        .to_toml()
        .context("Failed to serialize the built-in studies")?;
    print!("{}", document);
    Ok(())
}

fn run_studies(args: RunArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => StudyConfig::from_file(path)
            .with_context(|| format!("Failed to load study document {}", path.display()))?,
        None => StudyConfig::methane_autoignition(),
    };

    let studies = config.select(&args.studies)?;

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create output directory {}", args.out.display()))?;

    let simulator = GlobalMethaneKinetics::default();
    let parallel = !args.sequential;

    for study in studies {
        let table = study
            .run(&simulator, parallel)
            .with_context(|| format!("Study '{}' failed", study.name))?;

        println!("{}", format_study_report(study.display_title(), &table));

        write_exports(study, &simulator, parallel, &table, &args.out)?;
        if !args.no_plots {
            write_charts(study, &table, &args.out)?;
        }
    }

    info!("results written to {}", args.out.display());
    Ok(())
}

// =============================================================================
// Outputs
// =============================================================================

fn write_exports(
    study: &Study,
    simulator: &dyn ReactorSimulator,
    parallel: bool,
    table: &SweepTable,
    out: &Path,
) -> Result<()> {
    let mut metadata = CsvMetadata::from_sweep(&study.name, simulator.name(), &study.settings(parallel));
    metadata.reactor_mode = Some(study.template.reactor.clone());
    let csv = CsvExporter::new(CsvConfig::default().with_metadata(metadata));

    let path = out.join(format!("{}_delays.csv", study.name));
    csv.export_table(table, &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    let path = out.join(format!("{}_delays.json", study.name));
    JsonExporter::default()
        .export_table(table, &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    let dir = out.join(format!("{}_trajectories", study.name));
    std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let trajectory_csv = CsvExporter::new(CsvConfig::default());
    for record in table.records() {
        let index: Vec<String> = record.point.index.iter().map(|i| i.to_string()).collect();
        let path = dir.join(format!("point_{}.csv", index.join("_")));
        trajectory_csv
            .export_trajectory(record, &path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(())
}

fn write_charts(study: &Study, table: &SweepTable, out: &Path) -> Result<()> {
    if table.ignited_count() == 0 {
        warn!("study '{}': no run ignited, skipping delay chart", study.name);
    } else {
        let path = out.join(format!("{}_delays.png", study.name));
        let config = PlotConfig::delay_curve(study.display_title());
        plot_delay_curve(table, &path.to_string_lossy(), Some(&config))?;
    }

    let path = out.join(format!("{}_temperature.png", study.name));
    let config = PlotConfig::temperature_traces(study.display_title());
    plot_temperature_traces(table, &path.to_string_lossy(), Some(&config))?;

    Ok(())
}
