//! bgmgen CLI - Command-line interface for procedural background music
//!
//! This binary validates track documents, renders them to WAV, and prints
//! step plans for inspecting the sequencer.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use bgmgen_cli::{commands, logging};

/// bgmgen - Procedural Background Music Generator
#[derive(Parser)]
#[command(name = "bgmgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging on stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a track or track-set document without rendering
    Validate {
        /// Path to the document (JSON)
        #[arg(short, long)]
        spec: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Render a single track to <out_root>/<output_name>.wav
    Generate {
        /// Path to the track document (JSON)
        #[arg(short, long)]
        spec: String,

        /// Output root directory (default: current directory)
        #[arg(short, long)]
        out_root: Option<String>,

        /// Override the noise seed (default: derived from output_name)
        #[arg(long)]
        seed: Option<u32>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Render every track of a soundtrack
    GenerateAll {
        /// Track-set file, track file, or directory of either
        #[arg(short, long)]
        tracks: String,

        /// Output root directory (default: current directory)
        #[arg(short, long)]
        out_root: Option<String>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print the voices the sequencer plays on each step
    Plan {
        /// Path to the track document (JSON)
        #[arg(short, long)]
        spec: String,

        /// Number of steps to show (default: 32)
        #[arg(long)]
        steps: Option<usize>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Validate { spec, json } => commands::validate::run(&spec, json),
        Commands::Generate {
            spec,
            out_root,
            seed,
            json,
        } => commands::generate::run(&spec, out_root.as_deref(), seed, json),
        Commands::GenerateAll {
            tracks,
            out_root,
            json,
        } => commands::generate_all::run(&tracks, out_root.as_deref(), json),
        Commands::Plan { spec, steps, json } => commands::plan::run(&spec, steps, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
