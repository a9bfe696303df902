//! Named bit flags and the "a, b, noc" flag-string syntax.
//!
//! A flag string is a comma-separated list of names. Matching is
//! case-insensitive and ignores surrounding whitespace. A name prefixed with
//! `no` clears that flag. Every name that matched, set or cleared, is added to
//! the returned mask so callers can apply the string on top of existing bits.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One named bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlagDesc {
    pub name: &'static str,
    pub flag: u32,
}

pub const MG_TREES: u32 = 0x01;
pub const MG_CAVES: u32 = 0x02;
pub const MG_DUNGEONS: u32 = 0x04;
pub const MG_FLAT: u32 = 0x08;
pub const MG_LIGHT: u32 = 0x10;

/// Global map generator flags.
pub const MAPGEN_FLAGS: &[FlagDesc] = &[
    FlagDesc { name: "trees", flag: MG_TREES },
    FlagDesc { name: "caves", flag: MG_CAVES },
    FlagDesc { name: "dungeons", flag: MG_DUNGEONS },
    FlagDesc { name: "flat", flag: MG_FLAT },
    FlagDesc { name: "light", flag: MG_LIGHT },
];

pub const OREFLAG_ABSHEIGHT: u32 = 0x01;
pub const OREFLAG_DENSITY: u32 = 0x02;
pub const OREFLAG_NODEISNT: u32 = 0x04;

/// Ore placement flags.
pub const ORE_FLAGS: &[FlagDesc] = &[
    FlagDesc { name: "absheight", flag: OREFLAG_ABSHEIGHT },
    FlagDesc { name: "scatter_noisedensity", flag: OREFLAG_DENSITY },
    FlagDesc { name: "claylike_nodeisnt", flag: OREFLAG_NODEISNT },
];

pub const DECO_PLACE_CENTER_X: u32 = 0x01;
pub const DECO_PLACE_CENTER_Y: u32 = 0x02;
pub const DECO_PLACE_CENTER_Z: u32 = 0x04;

/// Schematic decoration flags.
pub const DECO_SCHEMATIC_FLAGS: &[FlagDesc] = &[
    FlagDesc { name: "place_center_x", flag: DECO_PLACE_CENTER_X },
    FlagDesc { name: "place_center_y", flag: DECO_PLACE_CENTER_Y },
    FlagDesc { name: "place_center_z", flag: DECO_PLACE_CENTER_Z },
];

/// Generation events that can be recorded for scripts. Bit `i` belongs to
/// entry `i`.
pub const GEN_NOTIFY_FLAGS: &[FlagDesc] = &[
    FlagDesc { name: "dungeon", flag: 1 << 0 },
    FlagDesc { name: "temple", flag: 1 << 1 },
    FlagDesc { name: "cave_begin", flag: 1 << 2 },
    FlagDesc { name: "cave_end", flag: 1 << 3 },
    FlagDesc { name: "large_cave_begin", flag: 1 << 4 },
    FlagDesc { name: "large_cave_end", flag: 1 << 5 },
];

/// Result of reading a flags field: the bits to set and the bits the field
/// named.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlagSet {
    pub flags: u32,
    pub mask: u32,
}

impl FlagSet {
    /// Applies this set on top of `current`: bits in `mask` are replaced,
    /// the rest kept.
    pub fn apply_to(&self, current: u32) -> u32 {
        (current & !self.mask) | (self.flags & self.mask)
    }
}

/// Parses a flag string against `desc`. Unknown names are ignored.
pub fn read_flag_string(s: &str, desc: &[FlagDesc]) -> FlagSet {
    let mut set = FlagSet::default();

    for raw in s.split(',') {
        let word = raw.trim();
        if word.is_empty() {
            continue;
        }
        let lower = word.to_ascii_lowercase();
        let (name, negate) = match lower.strip_prefix("no") {
            Some(rest) if find_flag(rest, desc).is_some() => (rest, true),
            _ => (lower.as_str(), false),
        };

        match find_flag(name, desc) {
            Some(flag) => {
                if negate {
                    set.flags &= !flag;
                } else {
                    set.flags |= flag;
                }
                set.mask |= flag;
            }
            None => log::warn!("ignoring unknown flag '{}'", word),
        }
    }

    set
}

/// Renders the set bits of `flags` as a flag string, in table order.
pub fn write_flag_string(flags: u32, desc: &[FlagDesc]) -> String {
    desc.iter()
        .filter(|d| flags & d.flag != 0)
        .map(|d| d.name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn find_flag(name: &str, desc: &[FlagDesc]) -> Option<u32> {
    desc.iter().find(|d| d.name == name).map(|d| d.flag)
}

/// The accepted shapes of a flags field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagSpec {
    /// Raw bits; every known bit counts as specified.
    Bits(u32),
    /// A flag string such as `"trees, nocaves"`.
    Str(String),
    /// `{ "trees": true, "caves": false }`.
    Table(BTreeMap<String, bool>),
}

impl FlagSpec {
    pub fn read(&self, desc: &[FlagDesc]) -> FlagSet {
        match self {
            FlagSpec::Bits(bits) => {
                let all = desc.iter().fold(0, |acc, d| acc | d.flag);
                FlagSet {
                    flags: bits & all,
                    mask: all,
                }
            }
            FlagSpec::Str(s) => read_flag_string(s, desc),
            FlagSpec::Table(table) => {
                let mut set = FlagSet::default();
                for (name, on) in table {
                    match find_flag(&name.to_ascii_lowercase(), desc) {
                        Some(flag) => {
                            if *on {
                                set.flags |= flag;
                            }
                            set.mask |= flag;
                        }
                        None => log::warn!("ignoring unknown flag '{}'", name),
                    }
                }
                set
            }
        }
    }
}

/// An empty flag string: nothing specified, nothing changed.
impl Default for FlagSpec {
    fn default() -> Self {
        FlagSpec::Str(String::new())
    }
}

impl From<&str> for FlagSpec {
    fn from(s: &str) -> Self {
        FlagSpec::Str(s.to_string())
    }
}
