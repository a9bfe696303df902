//! Ore records: clusters or sheets of one node type embedded in host nodes.

use mapgen_config::NoiseParams;
use mapgen_voxel::{ContentId, NodeListSlot, NodeResolver, NodeSlot};

use crate::error::ValidationError;
use crate::registry::{FeatureId, FeatureKind, FeatureRecord};

/// How an ore is distributed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OreType {
    #[default]
    Scatter,
    Sheet,
    Claylike,
}

impl FeatureKind for OreType {
    const FIELD: &'static str = "ore_type";
    const ALL: &'static [Self] = &[OreType::Scatter, OreType::Sheet, OreType::Claylike];

    fn name(self) -> &'static str {
        match self {
            OreType::Scatter => "scatter",
            OreType::Sheet => "sheet",
            OreType::Claylike => "claylike",
        }
    }
}

/// A registered ore.
#[derive(Clone, Debug)]
pub struct Ore {
    pub id: FeatureId,
    pub name: String,
    pub kind: OreType,

    /// The ore node itself.
    pub c_ore: NodeSlot,
    pub ore_param2: u8,
    /// Host nodes the ore may replace.
    pub c_wherein: NodeListSlot,

    /// One cluster per this many nodes.
    pub clust_scarcity: u32,
    /// Ore nodes per cluster.
    pub clust_num_ores: u32,
    /// Edge length of the cluster cube.
    pub clust_size: u32,
    pub height_min: i16,
    pub height_max: i16,
    pub noise_threshold: f32,
    /// Bit set over `ORE_FLAGS`.
    pub flags: u32,
    pub noise_params: Option<NoiseParams>,
}

impl FeatureRecord for Ore {
    type Kind = OreType;
    const LABEL: &'static str = "ore";

    fn create(kind: OreType) -> Self {
        Self {
            id: FeatureId::INVALID,
            name: String::new(),
            kind,
            c_ore: NodeSlot::new(),
            ore_param2: 0,
            c_wherein: NodeListSlot::new(),
            clust_scarcity: 1,
            clust_num_ores: 1,
            clust_size: 0,
            height_min: 0,
            height_max: 0,
            noise_threshold: 0.0,
            flags: 0,
            noise_params: None,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> OreType {
        self.kind
    }

    fn id(&self) -> FeatureId {
        self.id
    }

    fn set_id(&mut self, id: FeatureId) {
        self.id = id;
    }
}

impl Ore {
    /// Checks raw cluster parameters as given by a script and stores them.
    ///
    /// # Errors
    ///
    /// Scarcity and ores per cluster must be positive; cluster size must not
    /// be negative.
    pub fn set_cluster(&mut self, scarcity: i64, num_ores: i64, size: i64) -> Result<(), ValidationError> {
        if scarcity <= 0 {
            return Err(ValidationError::NotPositive {
                field: "clust_scarcity",
                value: scarcity,
            });
        }
        if num_ores <= 0 {
            return Err(ValidationError::NotPositive {
                field: "clust_num_ores",
                value: num_ores,
            });
        }
        if size < 0 {
            return Err(ValidationError::Negative {
                field: "clust_size",
                value: size,
            });
        }
        self.clust_scarcity = scarcity.min(u32::MAX as i64) as u32;
        self.clust_num_ores = num_ores.min(u32::MAX as i64) as u32;
        self.clust_size = size.min(u32::MAX as i64) as u32;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::InvertedRange`] if `height_min > height_max`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.height_min > self.height_max {
            return Err(ValidationError::InvertedRange {
                field: "height",
                min: self.height_min as i64,
                max: self.height_max as i64,
            });
        }
        Ok(())
    }

    /// Enqueues the host list and the ore node. The ore has no fallback and
    /// defaults to air.
    pub fn request_nodes<S: AsRef<str>>(&self, ore: &str, wherein: &[S], resolver: &mut NodeResolver) {
        for name in wherein {
            resolver.add_node_list(name.as_ref(), &self.c_wherein);
        }
        resolver.add_node(ore, "", ContentId::AIR, &self.c_ore);
    }
}
