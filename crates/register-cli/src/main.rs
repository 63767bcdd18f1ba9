//! register-serializer - turns register data into add-item/append-entry logs.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{hash, tsv, verify, yaml, EmitArgs};

#[derive(Parser)]
#[command(name = "register-serializer")]
#[command(about = "Serialize register records into content-addressed log entries")]
struct Cli {
    /// Increase diagnostic output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit a log entry for every row of a TSV file
    Tsv {
        /// Field metadata JSON file
        fields: String,
        /// Tab-separated data file with a header row
        data: String,
        #[command(flatten)]
        emit: EmitArgs,
    },
    /// Emit a log entry for every .yaml file in a directory
    Yaml {
        /// Field metadata JSON file
        fields: String,
        /// Directory of YAML documents
        dir: String,
        #[command(flatten)]
        emit: EmitArgs,
    },
    /// Print the content hash of an item
    Hash {
        /// Input file (or stdin if not provided)
        input: Option<String>,
    },
    /// Re-hash every entry in a log
    Verify {
        /// Path to log file
        log: String,
        /// Exit with error code if any verification fails
        #[arg(long)]
        strict: bool,
        /// Skip malformed or unpaired lines instead of stopping
        #[arg(long)]
        permissive: bool,
        /// Read logs whose append-entry line precedes its add-item line
        #[arg(long)]
        entry_first: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // stdout carries the log itself
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Tsv { fields, data, emit } => tsv::run(fields, data, emit),
        Commands::Yaml { fields, dir, emit } => yaml::run(fields, dir, emit),
        Commands::Hash { input } => hash::run(input),
        Commands::Verify {
            log,
            strict,
            permissive,
            entry_first,
            json,
        } => verify::run(log, strict, permissive, entry_first, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
