use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::info;

use torus_sim_core::{Simulator, StdRng64};
use torus_sim_types::{RawConfig, SimConfig, SimConfigOverride};

#[derive(Parser, Debug)]
#[command(author, version, about = "Discrete-event simulator of packet traffic on a k-ary torus")]
struct Args {
    /// Load base configuration from a TOML file; CLI flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of dimensions.
    #[arg(short = 'd', long)]
    d: Option<usize>,

    /// Radix (nodes per dimension).
    #[arg(short = 'k', long)]
    k: Option<usize>,

    /// Switching rule, one of a-f.
    #[arg(short = 'r', long)]
    r: Option<char>,

    /// Channel hold time, in simulated ticks.
    #[arg(long)]
    cht: Option<u64>,

    /// Per-node blocked-queue capacity.
    #[arg(long)]
    bl: Option<usize>,

    /// Packet generation rate per node (Poisson process parameter). No
    /// default: must be supplied here or in a config file.
    #[arg(long)]
    lambda: Option<f64>,

    /// Simulated time bound at which the run stops.
    #[arg(long)]
    maxst: Option<u64>,

    /// Debug verbosity (0 = warnings only, 1 = info+debug, 2+ = trace).
    #[arg(short = 'v', long = "debug")]
    dbg: Option<u8>,

    /// PRNG seed for reproducible runs.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Emit the final report as JSON instead of the plain-text summary.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut raw = RawConfig::default();
    if let Some(path) = &args.config {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let file_override: SimConfigOverride =
            toml::from_str(&content).context("failed to parse config file")?;
        file_override.apply_to(&mut raw);
    }
    let cli_override = SimConfigOverride {
        d: args.d,
        k: args.k,
        r: args.r,
        cht: args.cht,
        bl: args.bl,
        lambda: args.lambda,
        maxst: args.maxst,
        dbg: args.dbg,
    };
    cli_override.apply_to(&mut raw);

    init_logging(raw.dbg);
    info!("torus-sim-cli starting...");

    let lambda = raw
        .lambda
        .context("lambda has no default: pass --lambda or set it in a --config file")?;
    let config = SimConfig::build(raw.d, raw.k, raw.r, raw.cht, raw.bl, lambda, raw.maxst, raw.dbg)?;
    info!(
        d = config.d,
        k = config.k,
        rule = %config.r,
        seed = args.seed,
        "configuration resolved"
    );

    let rng = StdRng64::seed_from_u64(args.seed);
    let mut sim = Simulator::new(config, rng);
    let report = sim.run()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }
    Ok(())
}

fn init_logging(dbg: u8) {
    let filter = match dbg {
        0 => "warn",
        1 => "info,torus_sim_core=debug",
        _ => "debug,torus_sim_core=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
