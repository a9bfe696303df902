//! Command-line tool for inspecting and rewriting schematic files.
//!
//! Run with `cargo run -p mapgen-tool -- info tree.mts`.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mapgen_config::{CliArgs, Config};
use mapgen_voxel::Rotation;

use crate::commands::{parse_mapping, parse_rotation};

#[derive(Parser, Debug)]
#[command(name = "mapgen-tool", about = "Inspect, rotate and rewrite schematic files")]
struct ToolArgs {
    #[command(flatten)]
    common: CliArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print dimensions, node names and slice probabilities.
    Info { file: PathBuf },
    /// Rotate a schematic around the vertical axis.
    Rotate {
        input: PathBuf,
        output: PathBuf,
        /// 90, 180 or 270.
        #[arg(long, value_parser = parse_rotation)]
        rotation: Rotation,
        /// RON node manifest giving each node's param2 kind.
        #[arg(long)]
        nodes: Option<PathBuf>,
    },
    /// Substitute node names.
    Replace {
        input: PathBuf,
        output: PathBuf,
        /// FROM=TO, repeatable.
        #[arg(long = "map", value_parser = parse_mapping, required = true)]
        mappings: Vec<(String, String)>,
    },
}

fn main() -> ExitCode {
    let args = ToolArgs::parse();

    let config_dir = args
        .common
        .config
        .clone()
        .or_else(|| Config::default_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args.common);

    let log_dir = config_dir.join("logs");
    mapgen_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let result = match &args.command {
        Command::Info { file } => commands::info(file).map(|text| print!("{text}")),
        Command::Rotate {
            input,
            output,
            rotation,
            nodes,
        } => commands::rotate(input, output, *rotation, nodes.as_deref()),
        Command::Replace {
            input,
            output,
            mappings,
        } => commands::replace(input, output, mappings),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
