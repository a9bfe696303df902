//! Configuration structs with sensible defaults and RON persistence.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::flags::{MAPGEN_FLAGS, MG_CAVES, MG_DUNGEONS, MG_TREES, write_flag_string};
use crate::noise::NoiseParams;

/// File name used inside the config directory.
pub const CONFIG_FILE_NAME: &str = "mapgen.ron";

/// Top-level mapgen configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Global generator parameters.
    pub mapgen: MapgenParams,
    /// User-set noise parameters by name. These win over registered defaults.
    pub noise_params: BTreeMap<String, NoiseParams>,
    /// Schematic file settings.
    pub schematics: SchematicConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Global generator parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MapgenParams {
    /// Generator implementation name (e.g. "v6", "v7").
    pub mg_name: String,
    /// World seed.
    pub seed: u64,
    /// Y level of the sea surface.
    pub water_level: i16,
    /// Size of one generation unit in map blocks.
    pub chunksize: i16,
    /// Bit set over [`MAPGEN_FLAGS`].
    pub flags: u32,
}

impl MapgenParams {
    /// The flag bits rendered as a flag string.
    pub fn flags_string(&self) -> String {
        write_flag_string(self.flags, MAPGEN_FLAGS)
    }
}

/// Schematic file settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SchematicConfig {
    /// Directory relative schematic paths are resolved against.
    pub directory: PathBuf,
    /// Default for `force_placement` when a caller does not give one.
    pub force_placement: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for MapgenParams {
    fn default() -> Self {
        Self {
            mg_name: "v6".to_string(),
            seed: 0,
            water_level: 1,
            chunksize: 5,
            flags: MG_TREES | MG_CAVES | MG_DUNGEONS,
        }
    }
}

impl Default for SchematicConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("schems"),
            force_placement: true,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Platform config directory for mapgen settings (`<config_dir>/mapgen`).
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|d| d.join("mapgen"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded mapgen config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default mapgen config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `mapgen.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Re-reads the file: `Some(new_config)` if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Mapgen config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Resolves a schematic path: absolute paths pass through, relative ones
    /// are joined onto the schematic directory.
    pub fn schematic_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.schematics.directory.join(path)
        }
    }
}
