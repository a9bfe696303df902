//! Read access to what a generator produced for the chunk being generated.

use std::collections::BTreeMap;

use glam::IVec3;
use mapgen_config::flags::GEN_NOTIFY_FLAGS;
use mapgen_voxel::{ContentTable, VoxelManip, VoxelRegion};

use crate::session::MapgenSession;

/// Name of the auxiliary map exposed as "heatmap".
pub const HEAT_MAP: &str = "heat";
/// Name of the auxiliary map exposed as "humiditymap".
pub const HUMIDITY_MAP: &str = "humidity";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapgenObjectKind {
    VoxelManip,
    HeightMap,
    BiomeMap,
    HeatMap,
    HumidityMap,
    GenNotify,
}

impl MapgenObjectKind {
    pub const ALL: [MapgenObjectKind; 6] = [
        MapgenObjectKind::VoxelManip,
        MapgenObjectKind::HeightMap,
        MapgenObjectKind::BiomeMap,
        MapgenObjectKind::HeatMap,
        MapgenObjectKind::HumidityMap,
        MapgenObjectKind::GenNotify,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MapgenObjectKind::VoxelManip => "voxelmanip",
            MapgenObjectKind::HeightMap => "heightmap",
            MapgenObjectKind::BiomeMap => "biomemap",
            MapgenObjectKind::HeatMap => "heatmap",
            MapgenObjectKind::HumidityMap => "humiditymap",
            MapgenObjectKind::GenNotify => "gennotify",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

/// What a generator exposes about the chunk it is working on.
pub trait GeneratorOutput {
    /// The voxel buffer being generated into.
    fn region(&mut self) -> &mut dyn VoxelRegion;

    /// Surface height per column, X fastest then Z.
    fn heightmap(&self) -> Option<&[i16]> {
        None
    }

    /// Biome id per column.
    fn biomemap(&self) -> Option<&[u8]> {
        None
    }

    /// A named per-column float map, if this generator computes it.
    fn aux_map(&self, _name: &str) -> Option<&[f32]> {
        None
    }

    /// Drains the positions recorded for event `index` of `GEN_NOTIFY_FLAGS`.
    fn take_notifications(&mut self, _index: usize) -> Vec<IVec3> {
        Vec::new()
    }
}

/// A generator object. Maps are copies; the voxel region is borrowed.
pub enum MapgenObject<'a> {
    VoxelManip {
        region: &'a mut dyn VoxelRegion,
        min_edge: IVec3,
        max_edge: IVec3,
    },
    HeightMap(Vec<i16>),
    BiomeMap(Vec<u8>),
    HeatMap(Vec<f32>),
    HumidityMap(Vec<f32>),
    /// Recorded positions per enabled event name.
    GenNotify(BTreeMap<&'static str, Vec<IVec3>>),
}

impl<C: ContentTable> MapgenSession<C> {
    /// Looks up generator object `kind` on `output`.
    ///
    /// `None` for an unknown kind or a map the generator does not provide.
    /// "gennotify" drains the lists of every event enabled with
    /// [`set_gen_notify`](Self::set_gen_notify).
    pub fn get_mapgen_object<'a>(
        &self,
        output: &'a mut dyn GeneratorOutput,
        kind: &str,
    ) -> Option<MapgenObject<'a>> {
        let Some(kind) = MapgenObjectKind::from_name(kind) else {
            tracing::warn!("get_mapgen_object: unknown object '{}'", kind);
            return None;
        };

        match kind {
            MapgenObjectKind::VoxelManip => {
                let region = output.region();
                let area = region.area();
                Some(MapgenObject::VoxelManip {
                    region,
                    min_edge: area.min_edge,
                    max_edge: area.max_edge,
                })
            }
            MapgenObjectKind::HeightMap => output.heightmap().map(|m| MapgenObject::HeightMap(m.to_vec())),
            MapgenObjectKind::BiomeMap => output.biomemap().map(|m| MapgenObject::BiomeMap(m.to_vec())),
            MapgenObjectKind::HeatMap => output.aux_map(HEAT_MAP).map(|m| MapgenObject::HeatMap(m.to_vec())),
            MapgenObjectKind::HumidityMap => output
                .aux_map(HUMIDITY_MAP)
                .map(|m| MapgenObject::HumidityMap(m.to_vec())),
            MapgenObjectKind::GenNotify => {
                let mut lists = BTreeMap::new();
                for (i, desc) in GEN_NOTIFY_FLAGS.iter().enumerate() {
                    if self.gen_notify & desc.flag == 0 {
                        continue;
                    }
                    lists.insert(desc.name, output.take_notifications(i));
                }
                Some(MapgenObject::GenNotify(lists))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory chunk
// ---------------------------------------------------------------------------

/// A generated chunk held in memory, for tools and tests.
#[derive(Clone, Debug)]
pub struct GeneratedChunk {
    pub vm: VoxelManip,
    pub heightmap: Option<Vec<i16>>,
    pub biomemap: Option<Vec<u8>>,
    pub aux_maps: BTreeMap<String, Vec<f32>>,
    notifications: Vec<Vec<IVec3>>,
}

impl GeneratedChunk {
    pub fn new(vm: VoxelManip) -> Self {
        Self {
            vm,
            heightmap: None,
            biomemap: None,
            aux_maps: BTreeMap::new(),
            notifications: vec![Vec::new(); GEN_NOTIFY_FLAGS.len()],
        }
    }

    /// Records a generation event. Unknown event names are ignored.
    pub fn notify(&mut self, event: &str, pos: IVec3) {
        match GEN_NOTIFY_FLAGS.iter().position(|d| d.name == event) {
            Some(i) => self.notifications[i].push(pos),
            None => tracing::warn!("unknown generation event '{}'", event),
        }
    }
}

impl GeneratorOutput for GeneratedChunk {
    fn region(&mut self) -> &mut dyn VoxelRegion {
        &mut self.vm
    }

    fn heightmap(&self) -> Option<&[i16]> {
        self.heightmap.as_deref()
    }

    fn biomemap(&self) -> Option<&[u8]> {
        self.biomemap.as_deref()
    }

    fn aux_map(&self, name: &str) -> Option<&[f32]> {
        self.aux_maps.get(name).map(Vec::as_slice)
    }

    fn take_notifications(&mut self, index: usize) -> Vec<IVec3> {
        self.notifications
            .get_mut(index)
            .map(std::mem::take)
            .unwrap_or_default()
    }
}
