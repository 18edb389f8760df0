//! Dynasty Chronicle
//!
//! Runs the yearly world simulation and prints the chronicle.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use chronicle_core::config::{Config, DEFAULT_CONFIG_PATH};
use chronicle_core::events::logger::open_chronicle;
use chronicle_core::logging::{self, DEFAULT_LOG_LEVEL};
use chronicle_core::output::{render_family_tree, render_year, EventFilter};
use chronicle_core::rules::EventCatalog;
use chronicle_core::{ChronicleWriter, Simulation, SimulationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Human-readable yearly chronicle
    Text,
    /// One JSON object per chronicle entry
    Jsonl,
}

/// Command line arguments for the chronicle
#[derive(Parser, Debug)]
#[command(name = "chronicle")]
#[command(about = "A year-by-year chronicle of a world and its royal dynasties")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Event catalog (JSON)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// First simulated year
    #[arg(long)]
    start_year: Option<i32>,

    /// Number of years to simulate
    #[arg(long)]
    years: Option<u32>,

    /// Dynasty to found (repeatable)
    #[arg(long = "dynasty")]
    dynasties: Vec<String>,

    /// Only show world events of this category (repeatable)
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Hide world events
    #[arg(long)]
    no_world_events: bool,

    /// Hide dynasty events
    #[arg(long)]
    no_dynasty_events: bool,

    /// Output format for stdout
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Also write the full chronicle as JSONL to this file
    #[arg(long)]
    events_out: Option<PathBuf>,

    /// Skip the family trees at the end of a text run
    #[arg(long)]
    no_family_tree: bool,

    /// Log level for stderr (error, warn, info, debug, trace)
    #[arg(long, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
}

impl Args {
    fn filter(&self) -> EventFilter {
        EventFilter {
            world_events: !self.no_world_events,
            dynasty_events: !self.no_dynasty_events,
            ..Default::default()
        }
        .with_categories(self.categories.iter().cloned())
    }

    /// CLI flags override the file
    fn apply_overrides(&self, config: &mut Config) {
        let sim = &mut config.simulation;
        if let Some(path) = &self.catalog {
            sim.catalog = path.clone();
        }
        if let Some(seed) = self.seed {
            sim.seed = seed;
        }
        if let Some(start_year) = self.start_year {
            sim.start_year = start_year;
        }
        if let Some(years) = self.years {
            sim.years = years;
        }
        if !self.dynasties.is_empty() {
            sim.dynasties = self.dynasties.clone();
        }
    }
}

fn load_config(args: &Args) -> Result<Config, SimulationError> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(DEFAULT_CONFIG_PATH)?,
    };
    args.apply_overrides(&mut config);
    Ok(config)
}

fn run(args: &Args) -> Result<(), SimulationError> {
    let config = load_config(args)?;
    let catalog = EventCatalog::load(&config.simulation.catalog)?;
    tracing::info!(
        target: "events",
        "Loaded {} event definitions from {}",
        catalog.len(),
        config.simulation.catalog.display()
    );

    let filter = args.filter();
    let mut archive = match &args.events_out {
        Some(path) => open_chronicle(path)?,
        None => ChronicleWriter::null(),
    };
    let mut stdout_jsonl = match args.format {
        Format::Jsonl => ChronicleWriter::from_writer(std::io::stdout()),
        Format::Text => ChronicleWriter::null(),
    };

    let mut sim = Simulation::new(&config, catalog);
    let mut total = 0;
    sim.run(|report| {
        total += report.entries.len();
        archive.write_batch(&report.entries)?;
        match args.format {
            Format::Text => {
                if let Some(text) = render_year(report.year, &report.entries, &filter) {
                    println!("{}\n", text);
                }
            }
            Format::Jsonl => stdout_jsonl.write_batch(filter.apply(&report.entries))?,
        }
        Ok(())
    })?;

    archive.flush()?;
    stdout_jsonl.flush()?;

    if args.format == Format::Text && !args.no_family_tree {
        for dynasty in sim.dynasties().iter() {
            println!("{}", render_family_tree(dynasty, sim.roster()));
        }
    }

    tracing::info!(
        target: "simulation",
        "Chronicled {} entries over {} years",
        total,
        config.simulation.years
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(&args.log_level);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
