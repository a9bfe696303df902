//! The generation session: one content table, one pending resolver and the
//! three feature registries.

use std::collections::BTreeMap;

use mapgen_config::{Config, NoiseParams};
use mapgen_features::{BiomeRegistry, DecorationRegistry, OreRegistry};
use mapgen_voxel::{ContentTable, NodeResolver, ResolveReport};

use crate::error::SessionError;

/// Owns everything registered for one world's generation.
///
/// Registrations made before [`finalize`](Self::finalize) queue their node
/// names on the session resolver; `finalize` resolves them all in
/// registration order. Registrations made afterwards resolve at once.
pub struct MapgenSession<C: ContentTable> {
    pub(crate) config: Config,
    pub(crate) table: C,
    /// `None` once finalized.
    pub(crate) resolver: Option<NodeResolver>,
    pub(crate) biomes: BiomeRegistry,
    pub(crate) ores: OreRegistry,
    pub(crate) decorations: DecorationRegistry,
    /// Noise params registered by scripts; `config.noise_params` wins.
    pub(crate) noise_defaults: BTreeMap<String, NoiseParams>,
    /// Bit set over `GEN_NOTIFY_FLAGS`.
    pub(crate) gen_notify: u32,
    pub(crate) report: ResolveReport,
}

impl<C: ContentTable> MapgenSession<C> {
    /// Starts a session. The biome registry is seeded with the default biome.
    pub fn new(config: Config, table: C) -> Self {
        let mut resolver = NodeResolver::new();
        let biomes = BiomeRegistry::with_default_biome(&mut resolver);
        Self {
            config,
            table,
            resolver: Some(resolver),
            biomes,
            ores: OreRegistry::new(),
            decorations: DecorationRegistry::new(),
            noise_defaults: BTreeMap::new(),
            gen_notify: 0,
            report: ResolveReport::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn content_table(&self) -> &C {
        &self.table
    }

    /// Mutable access to the content table, for registering node types.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyFinalized`] once ids have been
    /// resolved; the table must not be renumbered after that.
    pub fn content_table_mut(&mut self) -> Result<&mut C, SessionError> {
        if self.is_finalized() {
            return Err(SessionError::AlreadyFinalized);
        }
        Ok(&mut self.table)
    }

    pub fn is_finalized(&self) -> bool {
        self.resolver.is_none()
    }

    pub fn biomes(&self) -> &BiomeRegistry {
        &self.biomes
    }

    pub fn ores(&self) -> &OreRegistry {
        &self.ores
    }

    pub fn decorations(&self) -> &DecorationRegistry {
        &self.decorations
    }

    /// Counts of everything resolved so far.
    pub fn resolve_report(&self) -> &ResolveReport {
        &self.report
    }

    /// Resolves every queued node name against the content table and links
    /// decorations to their biomes.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyFinalized`] on a second call.
    pub fn finalize(&mut self) -> Result<ResolveReport, SessionError> {
        let resolver = self.resolver.take().ok_or(SessionError::AlreadyFinalized)?;
        let pending = resolver.pending_len();
        let report = resolver.flush(&self.table);

        for deco in self.decorations.iter() {
            deco.resolve_biomes(&self.biomes);
        }

        tracing::info!(
            "mapgen session finalized: {} node requests, {} fell back, {} defaulted, {} biomes, {} ores, {} decorations",
            pending,
            report.fell_back,
            report.defaulted,
            self.biomes.len(),
            self.ores.len(),
            self.decorations.len()
        );
        self.report.merge(report.clone());
        Ok(report)
    }

    /// Moves a registration's node requests to the session. After
    /// finalization they are resolved on the spot.
    pub(crate) fn commit_requests(&mut self, mut local: NodeResolver) {
        match self.resolver.as_mut() {
            Some(resolver) => resolver.append(&mut local),
            None => {
                let report = local.flush(&self.table);
                self.report.merge(report);
            }
        }
    }

    pub(crate) fn require_finalized(&self) -> Result<(), SessionError> {
        if self.is_finalized() {
            Ok(())
        } else {
            Err(SessionError::NotFinalized)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use mapgen_features::{DEFAULT_BIOME_NAME, FeatureId};
    use mapgen_voxel::{ContentId, NodeDefTable};

    /// A session over a small table of common nodes.
    pub(crate) fn session() -> MapgenSession<NodeDefTable> {
        let table = NodeDefTable::from_ron_str(
            r#"[
                (name: "mapgen_stone"),
                (name: "mapgen_dirt"),
                (name: "mapgen_dirt_with_grass"),
                (name: "mapgen_water_source"),
                (name: "default:stone_with_coal"),
                (name: "default:tree"),
                (name: "default:leaves"),
                (name: "default:jungletree"),
                (name: "default:grass_1"),
                (name: "stairs:stair_wood", param2: facedir),
            ]"#,
        )
        .unwrap();
        MapgenSession::new(Config::default(), table)
    }

    #[test]
    fn test_new_session_has_default_biome() {
        let s = session();
        assert!(!s.is_finalized());
        assert_eq!(s.biomes().id_of(DEFAULT_BIOME_NAME), Some(FeatureId(0)));
        assert!(s.ores().is_empty());
        assert!(s.decorations().is_empty());
    }

    #[test]
    fn test_finalize_once() {
        let mut s = session();
        let report = s.finalize().unwrap();
        assert_eq!(report.total(), 5);
        assert!(s.is_finalized());
        assert!(matches!(s.finalize(), Err(SessionError::AlreadyFinalized)));
    }

    #[test]
    fn test_default_biome_nodes_resolve_on_finalize() {
        let mut s = session();
        let water = s.content_table().lookup("mapgen_water_source").unwrap();
        let default = s.biomes().get(FeatureId(0)).unwrap().clone();
        assert_eq!(default.c_water.get(), ContentId::IGNORE);

        s.finalize().unwrap();
        assert_eq!(default.c_water.get(), water);
        assert_eq!(default.c_top.get(), ContentId::AIR);
    }

    #[test]
    fn test_content_table_locked_after_finalize() {
        let mut s = session();
        s.content_table_mut().unwrap().register_name("late:node").unwrap();
        s.finalize().unwrap();
        assert!(matches!(
            s.content_table_mut(),
            Err(SessionError::AlreadyFinalized)
        ));
        assert!(s.content_table().lookup("late:node").is_some());
    }
}
