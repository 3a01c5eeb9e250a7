//! dssbench - Main Entry Point
//!
//! Command line front end for the benchmark pipeline.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

use dssbench::{parse_query_list, Harness, HarnessConfig, ScaleFactor};

#[derive(Parser)]
#[command(name = "dssbench")]
#[command(about = "Decision-support benchmark harness for PostgreSQL")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// TOML configuration file (built-in defaults if not specified)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ScaleArgs {
    /// Scale factor, e.g. 1 or 0.1
    #[arg(short = 's')]
    scale: ScaleFactor,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database for a scale factor
    Createdb(ScaleArgs),
    /// Apply the schema
    Ddl(ScaleArgs),
    /// Generate table data
    Dbgen(ScaleArgs),
    /// Load generated tables
    Load(ScaleArgs),
    /// Apply referential-integrity constraints
    Ri(ScaleArgs),
    /// Generate query text for every template
    Qgen(ScaleArgs),
    /// Time every query without sampling
    Time(ScaleArgs),
    /// Time queries while sampling CPU and block I/O
    Analyze {
        #[command(flatten)]
        sf: ScaleArgs,
        /// Queries to execute (separated by commas)
        #[arg(short = 'q', default_value = "1,2,3,4,5,6,7,8,9,10")]
        queries: String,
    },
    /// Run the whole pipeline
    All {
        #[command(flatten)]
        sf: ScaleArgs,
        /// dbgen and qgen are already done
        #[arg(short = 'p')]
        prepared: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::new("%H:%M:%S".to_string()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => HarnessConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => HarnessConfig::default(),
    };
    let harness = Harness::new(config);

    match cli.command {
        Command::Createdb(args) => harness.createdb(&args.scale)?,
        Command::Ddl(args) => harness.ddl(&args.scale)?,
        Command::Dbgen(args) => harness.dbgen(&args.scale)?,
        Command::Load(args) => harness.load(&args.scale)?,
        Command::Ri(args) => harness.ri(&args.scale)?,
        Command::Qgen(args) => harness.qgen(&args.scale)?,
        Command::Time(args) => {
            harness.time(&args.scale)?;
        }
        Command::Analyze { sf, queries } => {
            let queries = parse_query_list(&queries)?;
            harness.analyze(&sf.scale, &queries)?;
        }
        Command::All { sf, prepared } => {
            harness.all(&sf.scale, prepared)?;
        }
    }

    Ok(())
}
