//! Registration descriptions: the typed form of the tables a script hands
//! to `register_*`. Every field is optional and falls back to the same
//! default a script would get by leaving it out.

use std::collections::BTreeMap;
use std::path::PathBuf;

use mapgen_config::{FlagSpec, NoiseParams};
use mapgen_schematic::{RotationSpec, SchematicDef};
use serde::{Deserialize, Serialize};

/// A field that takes either one string or a list of them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn as_slice(&self) -> &[String] {
        match self {
            OneOrMany::One(s) => std::slice::from_ref(s),
            OneOrMany::Many(v) => v,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl From<&str> for OneOrMany {
    fn from(s: &str) -> Self {
        OneOrMany::One(s.to_string())
    }
}

impl From<Vec<&str>> for OneOrMany {
    fn from(v: Vec<&str>) -> Self {
        OneOrMany::Many(v.into_iter().map(str::to_string).collect())
    }
}

/// Node name substitutions, as `[("from", "to"), ...]` or `{"from": "to"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Replacements {
    Pairs(Vec<(String, String)>),
    Map(BTreeMap<String, String>),
}

impl Replacements {
    /// Both shapes as one map. A later pair for the same name wins.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        match self {
            Replacements::Pairs(pairs) => pairs.iter().cloned().collect(),
            Replacements::Map(map) => map.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Replacements::Pairs(pairs) => pairs.is_empty(),
            Replacements::Map(map) => map.is_empty(),
        }
    }
}

impl Default for Replacements {
    fn default() -> Self {
        Replacements::Map(BTreeMap::new())
    }
}

/// Where a schematic comes from: a file or an inline definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchematicSource {
    /// Relative paths are looked up in the configured schematic directory.
    File(PathBuf),
    Inline(SchematicDef),
}

// ---------------------------------------------------------------------------
// Biome
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeDesc {
    /// Biome type name; empty means "normal".
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub node_top: String,
    pub node_filler: String,
    pub node_water: String,
    pub node_dust: String,
    pub node_dust_water: String,
    pub depth_top: i16,
    pub depth_filler: i16,
    pub height_min: i16,
    pub height_max: i16,
    pub heat_point: f32,
    pub humidity_point: f32,
}

impl Default for BiomeDesc {
    fn default() -> Self {
        Self {
            kind: String::new(),
            name: String::new(),
            node_top: String::new(),
            node_filler: String::new(),
            node_water: String::new(),
            node_dust: String::new(),
            node_dust_water: String::new(),
            depth_top: 1,
            depth_filler: 3,
            height_min: 0,
            height_max: 0,
            heat_point: 0.0,
            humidity_point: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Ore
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OreDesc {
    /// Ore type name; empty means "scatter".
    pub ore_type: String,
    pub name: String,
    pub ore: String,
    pub ore_param2: u8,
    pub wherein: OneOrMany,
    pub clust_scarcity: i64,
    pub clust_num_ores: i64,
    pub clust_size: i64,
    pub height_min: i16,
    pub height_max: i16,
    #[serde(alias = "noise_threshhold")]
    pub noise_threshold: f32,
    pub flags: FlagSpec,
    pub noise_params: Option<NoiseParams>,
}

impl Default for OreDesc {
    fn default() -> Self {
        Self {
            ore_type: String::new(),
            name: String::new(),
            ore: String::new(),
            ore_param2: 0,
            wherein: OneOrMany::default(),
            clust_scarcity: 1,
            clust_num_ores: 1,
            clust_size: 0,
            height_min: 0,
            height_max: 0,
            noise_threshold: 0.0,
            flags: FlagSpec::default(),
            noise_params: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Decoration
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationDesc {
    /// Required: "simple", "schematic" or "lsystem".
    pub deco_type: String,
    pub name: String,
    pub place_on: OneOrMany,
    pub fill_ratio: f32,
    pub sidelen: i16,
    pub noise_params: Option<NoiseParams>,
    /// Biome names; empty means every biome.
    pub biomes: OneOrMany,

    // simple
    pub decoration: OneOrMany,
    pub height: i16,
    pub height_max: i16,
    pub spawn_by: OneOrMany,
    pub num_spawn_by: i16,

    // schematic
    pub schematic: Option<SchematicSource>,
    pub replacements: Replacements,
    pub rotation: RotationSpec,
    pub flags: FlagSpec,
}

impl Default for DecorationDesc {
    fn default() -> Self {
        Self {
            deco_type: String::new(),
            name: String::new(),
            place_on: OneOrMany::default(),
            fill_ratio: 0.02,
            sidelen: 8,
            noise_params: None,
            biomes: OneOrMany::default(),
            decoration: OneOrMany::default(),
            height: 1,
            height_max: 0,
            spawn_by: OneOrMany::default(),
            num_spawn_by: -1,
            schematic: None,
            replacements: Replacements::default(),
            rotation: RotationSpec::default(),
            flags: FlagSpec::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapgen_voxel::Rotation;

    #[test]
    fn test_ore_desc_defaults_from_empty_table() {
        let desc: OreDesc = ron::from_str("()").unwrap();
        assert_eq!(desc, OreDesc::default());
        assert_eq!(desc.clust_scarcity, 1);
        assert!(desc.wherein.is_empty());
    }

    #[test]
    fn test_string_or_list() {
        let one: OreDesc = ron::from_str(r#"(wherein: "default:stone")"#).unwrap();
        assert_eq!(one.wherein.as_slice(), ["default:stone".to_string()]);

        let many: OreDesc =
            ron::from_str(r#"(wherein: ["default:stone", "default:desert_stone"])"#).unwrap();
        assert_eq!(many.wherein.as_slice().len(), 2);
    }

    #[test]
    fn test_noise_threshold_alias() {
        let old: OreDesc = ron::from_str("(noise_threshhold: 0.5)").unwrap();
        let new: OreDesc = ron::from_str("(noise_threshold: 0.5)").unwrap();
        assert_eq!(old.noise_threshold, 0.5);
        assert_eq!(old, new);
    }

    #[test]
    fn test_ore_flags_forms() {
        let s: OreDesc = ron::from_str(r#"(flags: "absheight")"#).unwrap();
        assert_eq!(s.flags, FlagSpec::Str("absheight".into()));
        let bits: OreDesc = ron::from_str("(flags: 3)").unwrap();
        assert_eq!(bits.flags, FlagSpec::Bits(3));
    }

    #[test]
    fn test_replacement_shapes_agree() {
        let pairs: DecorationDesc = ron::from_str(
            r#"(replacements: [("default:tree", "default:jungletree"), ("default:leaves", "default:jungleleaves")])"#,
        )
        .unwrap();
        let map: DecorationDesc = ron::from_str(
            r#"(replacements: {"default:leaves": "default:jungleleaves", "default:tree": "default:jungletree"})"#,
        )
        .unwrap();
        assert_eq!(pairs.replacements.to_map(), map.replacements.to_map());
        assert_eq!(map.replacements.to_map().len(), 2);
    }

    #[test]
    fn test_later_pair_wins() {
        let r = Replacements::Pairs(vec![
            ("a".into(), "b".into()),
            ("a".into(), "c".into()),
        ]);
        assert_eq!(r.to_map()["a"], "c");
    }

    #[test]
    fn test_decoration_desc_defaults() {
        let desc: DecorationDesc = ron::from_str(r#"(deco_type: "simple", rotation: "random")"#).unwrap();
        assert_eq!(desc.sidelen, 8);
        assert_eq!(desc.height, 1);
        assert_eq!(desc.num_spawn_by, -1);
        assert_eq!(desc.rotation, RotationSpec::Random);

        let fixed: DecorationDesc = ron::from_str(r#"(rotation: "270")"#).unwrap();
        assert_eq!(fixed.rotation, RotationSpec::Fixed(Rotation::R270));
    }

    #[test]
    fn test_schematic_source_file() {
        let desc: DecorationDesc =
            ron::from_str(r#"(deco_type: "schematic", schematic: Some("trees/oak.mts"))"#).unwrap();
        assert_eq!(
            desc.schematic,
            Some(SchematicSource::File(PathBuf::from("trees/oak.mts")))
        );
    }

    #[test]
    fn test_biome_desc_defaults() {
        let desc = BiomeDesc::default();
        assert_eq!(desc.depth_top, 1);
        assert_eq!(desc.depth_filler, 3);
        assert!(desc.kind.is_empty());
    }
}
