//! Biome records and the biome-specific registry helpers.

use mapgen_voxel::{ContentId, NodeResolver, NodeSlot};

use crate::error::ValidationError;
use crate::registry::{FeatureId, FeatureKind, FeatureRecord, FeatureRegistry};

/// Vertical limit of the generated world in either direction.
pub const MAP_GENERATION_LIMIT: i16 = 31000;

/// Name of the catch-all biome every session starts with.
pub const DEFAULT_BIOME_NAME: &str = "default";

/// Terrain family of a biome.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BiomeType {
    #[default]
    Normal,
    Liquid,
    Nether,
    Aether,
    Flat,
}

impl FeatureKind for BiomeType {
    const FIELD: &'static str = "type";
    const ALL: &'static [Self] = &[
        BiomeType::Normal,
        BiomeType::Liquid,
        BiomeType::Nether,
        BiomeType::Aether,
        BiomeType::Flat,
    ];

    fn name(self) -> &'static str {
        match self {
            BiomeType::Normal => "normal",
            BiomeType::Liquid => "liquid",
            BiomeType::Nether => "nether",
            BiomeType::Aether => "aether",
            BiomeType::Flat => "flat",
        }
    }
}

/// A registered biome. Node fields are filled by the resolver flush.
#[derive(Clone, Debug)]
pub struct Biome {
    pub id: FeatureId,
    pub name: String,
    pub kind: BiomeType,
    /// Reserved.
    pub flags: u32,

    pub c_top: NodeSlot,
    pub c_filler: NodeSlot,
    pub c_water: NodeSlot,
    pub c_dust: NodeSlot,
    pub c_dust_water: NodeSlot,

    pub depth_top: i16,
    pub depth_filler: i16,
    pub height_min: i16,
    pub height_max: i16,
    pub heat_point: f32,
    pub humidity_point: f32,
}

impl FeatureRecord for Biome {
    type Kind = BiomeType;
    const LABEL: &'static str = "biome";
    const UNIQUE_NAMES: bool = true;

    fn create(kind: BiomeType) -> Self {
        Self {
            id: FeatureId::INVALID,
            name: String::new(),
            kind,
            flags: 0,
            c_top: NodeSlot::new(),
            c_filler: NodeSlot::new(),
            c_water: NodeSlot::new(),
            c_dust: NodeSlot::new(),
            c_dust_water: NodeSlot::new(),
            depth_top: 1,
            depth_filler: 3,
            height_min: 0,
            height_max: 0,
            heat_point: 0.0,
            humidity_point: 0.0,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> BiomeType {
        self.kind
    }

    fn id(&self) -> FeatureId {
        self.id
    }

    fn set_id(&mut self, id: FeatureId) {
        self.id = id;
    }
}

/// Node names a biome asks for. Empty strings mean "not given".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BiomeNodeNames {
    pub top: String,
    pub filler: String,
    pub water: String,
    pub dust: String,
    pub dust_water: String,
}

impl Biome {
    /// # Errors
    ///
    /// Returns [`ValidationError::InvertedRange`] if `height_min > height_max`,
    /// or [`ValidationError::Negative`] for a negative depth.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.height_min > self.height_max {
            return Err(ValidationError::InvertedRange {
                field: "height",
                min: self.height_min as i64,
                max: self.height_max as i64,
            });
        }
        if self.depth_top < 0 {
            return Err(ValidationError::Negative {
                field: "depth_top",
                value: self.depth_top as i64,
            });
        }
        if self.depth_filler < 0 {
            return Err(ValidationError::Negative {
                field: "depth_filler",
                value: self.depth_filler as i64,
            });
        }
        Ok(())
    }

    /// Enqueues the five node slots with their fallbacks:
    /// top → `mapgen_dirt_with_grass`, filler → `mapgen_dirt`,
    /// water → `mapgen_water_source` (all defaulting to air), dust → `air`
    /// and dust_water → `mapgen_water_source` (both defaulting to ignore).
    pub fn request_nodes(&self, names: &BiomeNodeNames, resolver: &mut NodeResolver) {
        resolver.add_node(names.top.as_str(), "mapgen_dirt_with_grass", ContentId::AIR, &self.c_top);
        resolver.add_node(names.filler.as_str(), "mapgen_dirt", ContentId::AIR, &self.c_filler);
        resolver.add_node(names.water.as_str(), "mapgen_water_source", ContentId::AIR, &self.c_water);
        resolver.add_node(names.dust.as_str(), "air", ContentId::IGNORE, &self.c_dust);
        resolver.add_node(
            names.dust_water.as_str(),
            "mapgen_water_source",
            ContentId::IGNORE,
            &self.c_dust_water,
        );
    }

    /// `true` if `y` lies inside this biome's height range.
    pub fn contains_height(&self, y: i16) -> bool {
        y >= self.height_min && y <= self.height_max
    }
}

/// Registry of biomes. Id 0 is always the default biome.
pub type BiomeRegistry = FeatureRegistry<Biome>;

impl FeatureRegistry<Biome> {
    /// Creates a registry holding only the default biome, whose nodes are
    /// enqueued on `resolver`.
    pub fn with_default_biome(resolver: &mut NodeResolver) -> Self {
        let mut reg = Self::new();
        let mut b = Biome::create(BiomeType::Normal);
        b.name = DEFAULT_BIOME_NAME.to_string();
        b.depth_top = 0;
        b.depth_filler = 0;
        b.height_min = -MAP_GENERATION_LIMIT;
        b.height_max = MAP_GENERATION_LIMIT;

        let names = BiomeNodeNames {
            top: "air".into(),
            filler: "air".into(),
            water: "mapgen_water_source".into(),
            dust: "air".into(),
            dust_water: "mapgen_water_source".into(),
        };
        b.request_nodes(&names, resolver);
        if reg.add(b).is_err() {
            tracing::error!("failed to register the default biome");
        }
        reg
    }

    /// The biome whose (heat, humidity) point is nearest among those whose
    /// height range contains `y`. Falls back to id 0 when none match.
    pub fn closest_biome(&self, heat: f32, humidity: f32, y: i16) -> FeatureId {
        let mut best = FeatureId(0);
        let mut best_dist = f32::MAX;

        for b in self.iter().skip(1) {
            if !b.contains_height(y) {
                continue;
            }
            let dh = heat - b.heat_point;
            let dm = humidity - b.humidity_point;
            let dist = dh * dh + dm * dm;
            if dist < best_dist {
                best_dist = dist;
                best = b.id;
            }
        }

        best
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use mapgen_voxel::{ContentTable, NodeDefTable};

    fn biome(name: &str, heat: f32, humidity: f32, min: i16, max: i16) -> Biome {
        let mut b = Biome::create(BiomeType::Normal);
        b.name = name.to_string();
        b.heat_point = heat;
        b.humidity_point = humidity;
        b.height_min = min;
        b.height_max = max;
        b
    }

    #[test]
    fn test_create_defaults() {
        let b = Biome::create(BiomeType::Flat);
        assert_eq!(b.depth_top, 1);
        assert_eq!(b.depth_filler, 3);
        assert_eq!(b.id, FeatureId::INVALID);
        assert_eq!(b.c_top.get(), ContentId::IGNORE);
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(BiomeType::parse("Liquid"), Ok(BiomeType::Liquid));
        assert!(matches!(
            BiomeType::parse("ocean"),
            Err(ValidationError::UnknownVariant { field: "type", .. })
        ));
    }

    #[test]
    fn test_validate_height_range() {
        assert!(biome("a", 0.0, 0.0, 5, 50).validate().is_ok());
        assert!(matches!(
            biome("a", 0.0, 0.0, 50, 5).validate(),
            Err(ValidationError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_top_falls_back_to_dirt_with_grass() {
        let mut table = NodeDefTable::new();
        let fallback = table.register_name("mapgen_dirt_with_grass").unwrap();
        let water = table.register_name("mapgen_water_source").unwrap();

        let mut resolver = NodeResolver::new();
        let b = biome("plains", 0.0, 0.0, 5, 50);
        let names = BiomeNodeNames {
            top: "grass".into(),
            ..Default::default()
        };
        b.request_nodes(&names, &mut resolver);
        resolver.flush(&table);

        assert_eq!(b.c_top.get(), fallback);
        // No filler node exists at all: default air.
        assert_eq!(b.c_filler.get(), ContentId::AIR);
        assert_eq!(b.c_water.get(), water);
        assert_eq!(b.c_dust.get(), table.lookup("air").unwrap());
        assert_eq!(b.c_dust_water.get(), water);
    }

    #[test]
    fn test_default_biome_is_id_zero() {
        let mut resolver = NodeResolver::new();
        let reg = BiomeRegistry::with_default_biome(&mut resolver);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.id_of(DEFAULT_BIOME_NAME), Some(FeatureId(0)));
        assert_eq!(resolver.pending_len(), 5);

        let b = reg.get(FeatureId(0)).unwrap();
        assert!(b.contains_height(-MAP_GENERATION_LIMIT));
        assert!(b.contains_height(MAP_GENERATION_LIMIT));
    }

    #[test]
    fn test_closest_biome() {
        let mut resolver = NodeResolver::new();
        let mut reg = BiomeRegistry::with_default_biome(&mut resolver);
        let desert = reg.add(biome("desert", 90.0, 10.0, -10, 100)).unwrap();
        let jungle = reg.add(biome("jungle", 80.0, 90.0, -10, 100)).unwrap();
        let tundra = reg.add(biome("tundra", 0.0, 40.0, 0, 30)).unwrap();

        assert_eq!(reg.closest_biome(85.0, 20.0, 10), desert);
        assert_eq!(reg.closest_biome(75.0, 70.0, 10), jungle);
        assert_eq!(reg.closest_biome(5.0, 40.0, 10), tundra);
        // Tundra is out of range at y = 50; desert is closer than jungle.
        assert_eq!(reg.closest_biome(5.0, 30.0, 50), desert);
        // Nothing covers y = 500.
        assert_eq!(reg.closest_biome(5.0, 40.0, 500), FeatureId(0));
    }

    #[test]
    fn test_duplicate_biome_name_rejected() {
        let mut resolver = NodeResolver::new();
        let mut reg = BiomeRegistry::with_default_biome(&mut resolver);
        reg.add(biome("plains", 0.0, 0.0, 0, 10)).unwrap();
        assert!(reg.add(biome("plains", 1.0, 1.0, 0, 10)).is_err());
        assert!(reg.add(biome(DEFAULT_BIOME_NAME, 1.0, 1.0, 0, 10)).is_err());
        assert_eq!(reg.len(), 2);
    }
}
