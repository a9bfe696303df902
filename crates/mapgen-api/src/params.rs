//! Session-wide generator parameters: mapgen params, noise defaults and
//! generation notifications.

use std::collections::BTreeMap;

use mapgen_config::flags::{GEN_NOTIFY_FLAGS, MAPGEN_FLAGS};
use mapgen_config::{FlagSpec, MapgenParams, NoiseParams};
use mapgen_voxel::ContentTable;
use serde::{Deserialize, Serialize};

use crate::session::MapgenSession;

/// Fields of `set_mapgen_params`. Absent fields are left alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapgenParamsUpdate {
    pub mgname: Option<String>,
    pub seed: Option<u64>,
    pub water_level: Option<i16>,
    /// Deprecated: names flags to clear.
    pub flagmask: Option<FlagSpec>,
    pub flags: Option<FlagSpec>,
}

impl<C: ContentTable> MapgenSession<C> {
    pub fn mapgen_params(&self) -> &MapgenParams {
        &self.config.mapgen
    }

    /// Overrides global generator parameters.
    ///
    /// `flagmask` is applied before `flags`: every flag it names is cleared.
    /// `flags` only touches the flags it names.
    pub fn set_mapgen_params(&mut self, update: &MapgenParamsUpdate) {
        let params = &mut self.config.mapgen;
        if let Some(name) = &update.mgname {
            params.mg_name = name.clone();
        }
        if let Some(seed) = update.seed {
            params.seed = seed;
        }
        if let Some(level) = update.water_level {
            params.water_level = level;
        }
        if let Some(mask) = &update.flagmask {
            params.flags &= !mask.read(MAPGEN_FLAGS).flags;
            tracing::error!("set_mapgen_params: the flagmask field is deprecated, name flags with \"no\" in flags instead");
        }
        if let Some(flags) = &update.flags {
            params.flags = flags.read(MAPGEN_FLAGS).apply_to(params.flags);
        }
        tracing::debug!(
            "mapgen params: {} seed={} water_level={} flags=[{}]",
            params.mg_name,
            params.seed,
            params.water_level,
            params.flags_string()
        );
    }

    /// Registers default noise parameters by name. Values the user set in
    /// the config keep precedence.
    pub fn set_noiseparam_defaults(&mut self, defaults: BTreeMap<String, NoiseParams>) {
        for (name, np) in defaults {
            tracing::debug!("noise default {}: {}", name, np);
            self.noise_defaults.insert(name, np);
        }
    }

    /// Effective noise parameters for `name`: the user's setting, else the
    /// registered default.
    pub fn noise_params(&self, name: &str) -> Option<&NoiseParams> {
        self.config
            .noise_params
            .get(name)
            .or_else(|| self.noise_defaults.get(name))
    }

    /// Selects which generation events are recorded. Replaces the previous
    /// selection.
    pub fn set_gen_notify(&mut self, flags: &FlagSpec) {
        self.gen_notify = flags.read(GEN_NOTIFY_FLAGS).flags;
    }

    /// Bit set over `GEN_NOTIFY_FLAGS`.
    pub fn gen_notify(&self) -> u32 {
        self.gen_notify
    }
}
