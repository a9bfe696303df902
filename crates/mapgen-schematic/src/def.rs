//! Inline schematic definitions: the table form a script can hand over
//! instead of a file path.

use glam::U16Vec3;
use mapgen_voxel::{ContentId, MapNode, PROB_ALWAYS};
use serde::{Deserialize, Serialize};

use crate::error::SchematicError;
use crate::schematic::{NameTable, Schematic};

/// One cell of an inline definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchematicNodeDef {
    pub name: String,
    #[serde(default = "prob_always")]
    pub prob: u8,
    #[serde(default)]
    pub param2: u8,
}

/// Probability override for one layer. `ypos` is local to the schematic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceProbDef {
    pub ypos: u16,
    pub prob: u8,
}

/// A schematic written out as data: size, then `X * Y * Z` cells in storage
/// order (X fastest, then Z, then Y), then optional layer probabilities.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchematicDef {
    pub size: (u16, u16, u16),
    pub data: Vec<SchematicNodeDef>,
    #[serde(default)]
    pub yslice_prob: Vec<SliceProbDef>,
}

fn prob_always() -> u8 {
    PROB_ALWAYS
}

impl Schematic {
    /// Builds a schematic from an inline definition.
    ///
    /// # Errors
    ///
    /// Fails on a zero dimension or when `data` does not hold exactly
    /// `X * Y * Z` entries. Slice entries past the top layer are ignored.
    pub fn from_def(def: &SchematicDef) -> Result<Self, SchematicError> {
        let size = U16Vec3::new(def.size.0, def.size.1, def.size.2);
        let volume = size.x as usize * size.y as usize * size.z as usize;
        if volume == 0 {
            return Err(SchematicError::InvalidSize {
                x: size.x as i64,
                y: size.y as i64,
                z: size.z as i64,
            });
        }
        if def.data.len() != volume {
            return Err(SchematicError::DataLength {
                expected: volume,
                actual: def.data.len(),
            });
        }

        let mut names = NameTable::default();
        let mut nodes = Vec::with_capacity(volume);
        for cell in &def.data {
            let code = names.code_for(&cell.name)?;
            nodes.push(MapNode::with_params(ContentId(code), cell.prob, cell.param2));
        }

        let mut slice_probs = vec![PROB_ALWAYS; size.y as usize];
        for slice in &def.yslice_prob {
            match slice_probs.get_mut(slice.ypos as usize) {
                Some(p) => *p = slice.prob,
                None => tracing::warn!("yslice_prob ypos {} outside schematic", slice.ypos),
            }
        }

        Schematic::new(size, names.names, nodes, slice_probs)
    }

    /// The inverse of [`from_def`](Self::from_def). Layers with probability
    /// "always" are omitted from the slice list.
    pub fn to_def(&self) -> SchematicDef {
        let size = self.size();
        let data = self
            .nodes()
            .iter()
            .map(|n| SchematicNodeDef {
                name: self.node_names()[n.content.0 as usize].clone(),
                prob: n.param1,
                param2: n.param2,
            })
            .collect();
        let yslice_prob = self
            .slice_probs()
            .iter()
            .enumerate()
            .filter(|(_, p)| **p != PROB_ALWAYS)
            .map(|(y, p)| SliceProbDef {
                ypos: y as u16,
                prob: *p,
            })
            .collect();
        SchematicDef {
            size: (size.x, size.y, size.z),
            data,
            yslice_prob,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    #[test]
    fn test_from_ron_def() {
        let def: SchematicDef = ron::from_str(
            r#"(
                size: (1, 2, 1),
                data: [
                    (name: "default:tree"),
                    (name: "default:leaves", prob: 127, param2: 4),
                ],
                yslice_prob: [(ypos: 1, prob: 200)],
            )"#,
        )
        .unwrap();
        let s = Schematic::from_def(&def).unwrap();
        assert_eq!(s.size(), U16Vec3::new(1, 2, 1));
        assert_eq!(s.name_at(IVec3::new(0, 1, 0)), Some("default:leaves"));
        assert_eq!(s.get(IVec3::ZERO).unwrap().param1, PROB_ALWAYS);
        assert_eq!(s.get(IVec3::new(0, 1, 0)).unwrap().param1, 127);
        assert_eq!(s.get(IVec3::new(0, 1, 0)).unwrap().param2, 4);
        assert_eq!(s.slice_probs(), &[PROB_ALWAYS, 200]);
    }

    #[test]
    fn test_wrong_entry_count_rejected() {
        let def = SchematicDef {
            size: (2, 1, 1),
            data: vec![SchematicNodeDef {
                name: "a".into(),
                prob: 255,
                param2: 0,
            }],
            yslice_prob: vec![],
        };
        assert!(matches!(
            Schematic::from_def(&def),
            Err(SchematicError::DataLength {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_repeated_names_share_a_code() {
        let cell = |n: &str| SchematicNodeDef {
            name: n.into(),
            prob: 255,
            param2: 0,
        };
        let def = SchematicDef {
            size: (3, 1, 1),
            data: vec![cell("a"), cell("b"), cell("a")],
            yslice_prob: vec![],
        };
        let s = Schematic::from_def(&def).unwrap();
        assert_eq!(s.node_names(), &["a".to_string(), "b".to_string()]);
        assert_eq!(s.to_def(), def);
    }
}
