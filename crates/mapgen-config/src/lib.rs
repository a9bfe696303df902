//! Configuration for mapgen sessions and tools.
//!
//! Settings persist to disk as a RON file with forward/backward compatible
//! serialization and can be overridden from the command line. Also home to
//! the named flag tables and the flag-string syntax shared by registration
//! and generator parameters.

mod cli;
mod config;
mod error;
pub mod flags;
mod noise;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE_NAME, Config, DebugConfig, MapgenParams, SchematicConfig};
pub use error::ConfigError;
pub use flags::{FlagDesc, FlagSet, FlagSpec, read_flag_string, write_flag_string};
pub use noise::NoiseParams;
