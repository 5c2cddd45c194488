//! boxmatch - discover record layouts on a sample page and extract records.
//!
//! ```text
//! boxmatch configure task.json sample.json --top 5
//! boxmatch extract task.json sample.json --conf 0 page1.json page2.json
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;

use boxmatch_cli::task::TaskFile;

#[derive(Parser, Debug)]
#[command(name = "boxmatch")]
#[command(author, version, about = "Layout pattern discovery and record extraction", long_about = None)]
struct Args {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short = 'd', long, global = true, action = ArgAction::SetTrue)]
    debug: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank extraction configurations on a sample document
    Configure {
        /// Extraction task (attributes, taggers, parameters)
        task: PathBuf,
        /// Sample area document
        sample: PathBuf,
        /// Number of configurations to print
        #[arg(short = 'n', long, default_value_t = 10)]
        top: usize,
    },
    /// Extract records from target documents
    Extract {
        /// Extraction task (attributes, taggers, parameters)
        task: PathBuf,
        /// Sample area document used to configure the matcher
        sample: PathBuf,
        /// Index of the ranked configuration to apply
        #[arg(short = 'c', long = "conf", default_value_t = 0)]
        conf: usize,
        /// Target area documents
        #[arg(required = true)]
        targets: Vec<PathBuf>,
    },
}

fn init_tracing(debug: bool) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    match args.command {
        Command::Configure { task, sample, top } => {
            let task = TaskFile::load(&task)?;
            let ranked = boxmatch_cli::rank_configurations(&task, &sample, top)?;
            print_json(&ranked, args.pretty)
        }
        Command::Extract {
            task,
            sample,
            conf,
            targets,
        } => {
            let task = TaskFile::load(&task)?;
            let targets: Vec<&std::path::Path> = targets.iter().map(PathBuf::as_path).collect();
            let records = boxmatch_cli::extract(&task, &sample, conf, &targets)?;
            print_json(&records, args.pretty)
        }
    }
}
