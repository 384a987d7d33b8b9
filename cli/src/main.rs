//! Scramjet CLI
//!
//! Batch format-preserving JPEG encryption over directories.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{batch, keygen, run, Mode};
use std::path::PathBuf;

// =============================================================================
// CLI DEFINITION
// =============================================================================

#[derive(Parser)]
#[command(name = "scramjet")]
#[command(about = "Format-preserving JPEG encryption in the DCT domain", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Raise log verbosity (-v: info, -vv: debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt every JPEG in a directory, then decrypt each result again
    /// (writes both output trees; a built-in round-trip check)
    Run {
        /// Directory of input JPEGs
        #[arg(long)]
        input: PathBuf,
        /// Output directory for encrypted images
        #[arg(long)]
        encrypted: PathBuf,
        /// Output directory for decrypted round-trip images
        #[arg(long)]
        decrypted: PathBuf,
        /// Master key file
        #[arg(short, long)]
        key: PathBuf,
    },
    /// Encrypt every JPEG in a directory
    Encrypt {
        /// Directory of input JPEGs
        #[arg(long)]
        input: PathBuf,
        /// Output directory
        #[arg(long)]
        output: PathBuf,
        /// Master key file
        #[arg(short, long)]
        key: PathBuf,
    },
    /// Decrypt every JPEG in a directory
    Decrypt {
        /// Directory of encrypted JPEGs
        #[arg(long)]
        input: PathBuf,
        /// Output directory
        #[arg(long)]
        output: PathBuf,
        /// Master key file
        #[arg(short, long)]
        key: PathBuf,
    },
    /// Generate a fresh master key file
    Keygen {
        /// Where to write the key file
        #[arg(long)]
        output: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// =============================================================================
// ENTRY POINT
// =============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match cli.command {
        Commands::Run { input, encrypted, decrypted, key } => run(&input, &encrypted, &decrypted, &key),
        Commands::Encrypt { input, output, key } => batch(&input, &output, &key, Mode::Encrypt),
        Commands::Decrypt { input, output, key } => batch(&input, &output, &key, Mode::Decrypt),
        Commands::Keygen { output, force } => keygen(&output, force),
    }
}
