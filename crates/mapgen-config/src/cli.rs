//! Command-line overrides shared by mapgen binaries.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;
use crate::flags::{MAPGEN_FLAGS, read_flag_string};

/// Mapgen command-line arguments.
///
/// CLI values override settings loaded from `mapgen.ron`.
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "mapgen", about = "Voxel map generation content tools")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Sea surface level.
    #[arg(long)]
    pub water_level: Option<i16>,

    /// Generator implementation name.
    #[arg(long)]
    pub mg_name: Option<String>,

    /// Generator flags applied on top of the config ("trees, nocaves").
    #[arg(long)]
    pub mg_flags: Option<String>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.mapgen.seed = seed;
        }
        if let Some(level) = args.water_level {
            self.mapgen.water_level = level;
        }
        if let Some(ref name) = args.mg_name {
            self.mapgen.mg_name = name.clone();
        }
        if let Some(ref flags) = args.mg_flags {
            let set = read_flag_string(flags, MAPGEN_FLAGS);
            self.mapgen.flags = set.apply_to(self.mapgen.flags);
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{MG_CAVES, MG_DUNGEONS, MG_FLAT, MG_TREES};

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(42),
            mg_name: Some("v7".to_string()),
            mg_flags: Some("nocaves, flat".to_string()),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.mapgen.seed, 42);
        assert_eq!(config.mapgen.mg_name, "v7");
        assert_eq!(config.mapgen.flags, MG_TREES | MG_DUNGEONS | MG_FLAT);
        assert_eq!(config.mapgen.flags & MG_CAVES, 0);
        // Non-overridden fields retain defaults
        assert_eq!(config.mapgen.water_level, 1);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_from_args() {
        let args = CliArgs::parse_from(["mapgen", "--seed", "7", "--water-level=-3"]);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.water_level, Some(-3));
    }
}
