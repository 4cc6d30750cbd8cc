use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use qebands_rust::{
    bands::analysis::{BandAnalysis, CROSSING_WINDOW},
    config::{Config, TaskProcess},
    error::QeError,
    parser::{
        bands_gnu::BandPath,
        fermi::read_fermi_energy,
        source::{select_source, Candidate},
    },
};

#[derive(Parser, Debug)]
#[command(
    name = "qebands",
    about = "DOS, PDOS and band structure plots from Quantum ESPRESSO output"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Only report warnings and errors (stderr)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the tasks of a TOML configuration file
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Run a single task instead of every configured one
        #[arg(long, value_enum)]
        only: Option<TaskKind>,
    },
    /// Print the band structure analysis of the first readable band file
    Analyze {
        /// `<seed>.dos` holding the Fermi energy
        #[arg(long)]
        dos: PathBuf,
        /// `.bands.gnu` files, most preferred first
        #[arg(long, required = true)]
        bands: Vec<PathBuf>,
        /// Half-width (eV) of the window counted as crossing E_F
        #[arg(long, default_value_t = CROSSING_WINDOW)]
        window: f64,
    },
    /// List the band segments found in a `.bands.gnu` file
    Segments {
        #[arg(long)]
        bands: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum TaskKind {
    Dos,
    Pdos,
    Bands,
}

fn run(config: PathBuf, only: Option<TaskKind>) -> Result<(), QeError> {
    let config = Config::from_file(config)?;
    let tasks = config.tasks();
    let wanted = |kind: TaskKind| only.map_or(true, |only| only == kind);
    let mut written: Vec<PathBuf> = vec![];
    if let Some(task) = tasks.dos().filter(|_| wanted(TaskKind::Dos)) {
        written.extend(task.task_execute(config.title())?);
    }
    if let Some(task) = tasks.pdos().filter(|_| wanted(TaskKind::Pdos)) {
        written.extend(task.task_execute(config.title())?);
    }
    if let Some(task) = tasks.bands().filter(|_| wanted(TaskKind::Bands)) {
        written.extend(task.task_execute(config.title())?);
    }
    if written.is_empty() {
        log::warn!("no task to run in {}", config.title());
    }
    for path in written.iter() {
        println!("{}", path.display());
    }
    Ok(())
}

fn analyze(dos: PathBuf, bands: Vec<PathBuf>, window: f64) -> Result<(), QeError> {
    let e_fermi = read_fermi_energy(&dos)?;
    let candidates: Vec<Candidate> = bands.into_iter().map(|p| Candidate::new(p, "")).collect();
    let (source, band_path) =
        select_source(&candidates, |path| BandPath::from_file(path)).into_result()?;
    let analysis = BandAnalysis::compute(&band_path, e_fermi, window)
        .map_err(|e| QeError::format(source.path(), e))?;
    println!("{}", analysis);
    Ok(())
}

fn segments(bands: PathBuf) -> Result<(), QeError> {
    let band_path = BandPath::from_file(&bands)?;
    let segments = band_path.segments();
    println!("{} segments in {}", segments.len(), bands.display());
    for (i, segment) in segments.iter().enumerate() {
        let k = segment.k();
        println!(
            "{:>4} {:>6} samples  k {:.4} .. {:.4}{}",
            i,
            segment.len(),
            k.first().copied().unwrap_or_default(),
            k.last().copied().unwrap_or_default(),
            if segment.is_drawable() { "" } else { "  (single sample)" }
        );
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let default_level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    match cli.command {
        Command::Run { config, only } => run(config, only)?,
        Command::Analyze { dos, bands, window } => analyze(dos, bands, window)?,
        Command::Segments { bands } => segments(bands)?,
    }
    Ok(())
}
