//! aprender-vmsim CLI: replay address traces through a TLB and page table.

use aprender_vmsim::trace::{load_trace, write_trace};
use aprender_vmsim::{
    MemorySimulator, PolicyKind, Result, SimError, SimulatorConfig, TraceGenerator,
};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use log::LevelFilter;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "aprender-vmsim")]
#[command(about = "TLB and page replacement simulator (LRU, Second-Chance)")]
#[command(version)]
struct Cli {
    /// Log every lookup, hit, miss, fault and eviction
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a trace and print statistics
    Run {
        /// Trace file (one address per line, decimal or 0x hex)
        trace: PathBuf,

        #[command(flatten)]
        sizing: SizingArgs,

        /// Replacement policy (LRU or SecondChance)
        #[arg(short, long)]
        policy: Option<String>,

        /// Print statistics as JSON instead of the text report
        #[arg(long)]
        json: bool,
    },

    /// Replay a trace under every policy and print each report
    Compare {
        /// Trace file
        trace: PathBuf,

        #[command(flatten)]
        sizing: SizingArgs,
    },

    /// Write a synthetic trace
    Generate {
        /// Number of addresses
        #[arg(short = 'n', long, default_value = "10000")]
        length: usize,

        /// Number of distinct pages
        #[arg(long, default_value = "256")]
        pages: u64,

        /// Page size in bytes
        #[arg(long, default_value = "4096")]
        page_size: u64,

        /// Probability of re-touching a recent page (0.0 - 1.0)
        #[arg(long, default_value = "0.0")]
        locality: f64,

        /// Random seed for reproducibility
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Sizing flags shared by `run` and `compare`. Flags override the config file.
#[derive(Args)]
struct SizingArgs {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Page size in bytes
    #[arg(long)]
    page_size: Option<u64>,

    /// TLB capacity in entries
    #[arg(long)]
    tlb_entries: Option<usize>,

    /// Number of physical frames
    #[arg(long)]
    frames: Option<usize>,
}

impl SizingArgs {
    fn resolve(&self, policy: Option<&str>, debug: bool) -> Result<SimulatorConfig> {
        let mut config = match &self.config {
            Some(path) => SimulatorConfig::load(path)?,
            None => SimulatorConfig::default(),
        };
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(tlb_entries) = self.tlb_entries {
            config.tlb_entries = tlb_entries;
        }
        if let Some(frames) = self.frames {
            config.num_frames = frames;
        }
        if let Some(policy) = policy {
            config.replacement_policy = policy.parse()?;
        }
        config.debug = config.debug || debug;
        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let result = match cli.command {
        Commands::Run {
            trace,
            sizing,
            policy,
            json,
        } => cmd_run(&trace, &sizing, policy.as_deref(), json, cli.debug),
        Commands::Compare { trace, sizing } => cmd_compare(&trace, &sizing, cli.debug),
        Commands::Generate {
            length,
            pages,
            page_size,
            locality,
            seed,
            output,
        } => cmd_generate(length, pages, page_size, locality, seed, output.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            exit_code(&e)
        }
    }
}

fn init_logging(debug: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    } else if debug {
        builder.filter_module("aprender_vmsim", LevelFilter::Debug);
    } else {
        builder.filter_level(LevelFilter::Warn);
    }
    // A logger may already be installed when embedded; keep the existing one.
    let _ = builder.try_init();
}

fn exit_code(err: &SimError) -> ExitCode {
    match err {
        SimError::InvalidConfig { .. } | SimError::UnknownPolicy(_) => ExitCode::from(2),
        SimError::TraceParse { .. } | SimError::Io(_) | SimError::Serialization(_) => {
            ExitCode::from(3)
        }
        SimError::InvariantViolation(_) => ExitCode::from(70),
    }
}

fn simulate(config: SimulatorConfig, addresses: &[u64]) -> Result<MemorySimulator> {
    let mut sim = MemorySimulator::new(config)?;
    sim.run_trace(addresses.iter().copied())?;
    Ok(sim)
}

fn cmd_run(
    trace: &Path,
    sizing: &SizingArgs,
    policy: Option<&str>,
    json: bool,
    debug: bool,
) -> Result<()> {
    let config = sizing.resolve(policy, debug)?;
    let addresses = load_trace(trace)?;
    log::info!("loaded {} addresses from {}", addresses.len(), trace.display());

    let sim = simulate(config, &addresses)?;
    if json {
        println!("{}", sim.report().to_json()?);
    } else {
        sim.print_statistics();
    }
    Ok(())
}

fn cmd_compare(trace: &Path, sizing: &SizingArgs, debug: bool) -> Result<()> {
    let base = sizing.resolve(None, debug)?;
    let addresses = load_trace(trace)?;

    for (i, policy) in PolicyKind::ALL.into_iter().enumerate() {
        if i > 0 {
            println!();
        }
        log::info!("{policy}: {}", policy.description());
        let sim = simulate(base.clone().with_policy(policy), &addresses)?;
        sim.print_statistics();
    }
    Ok(())
}

fn cmd_generate(
    length: usize,
    pages: u64,
    page_size: u64,
    locality: f64,
    seed: u64,
    output: Option<&Path>,
) -> Result<()> {
    if pages == 0 {
        return Err(SimError::invalid_config("pages", pages, "> 0"));
    }
    if page_size == 0 {
        return Err(SimError::invalid_config("page_size", page_size, "> 0"));
    }
    if !(0.0..=1.0).contains(&locality) {
        return Err(SimError::invalid_config("locality", locality, "in [0.0, 1.0]"));
    }

    let addresses = TraceGenerator::new(pages)
        .with_page_size(page_size)
        .with_locality(locality)
        .with_seed(seed)
        .generate(length);

    match output {
        Some(path) => {
            write_trace(File::create(path)?, &addresses)?;
            log::info!("wrote {} addresses to {}", addresses.len(), path.display());
        }
        None => write_trace(std::io::stdout().lock(), &addresses)?,
    }
    Ok(())
}
