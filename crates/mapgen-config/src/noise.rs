//! Noise parameter records. Only the parameters live here; the noise math
//! belongs to the generator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Parameters of one fractal noise source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseParams {
    pub offset: f32,
    pub scale: f32,
    /// Wavelength per axis in nodes.
    pub spread: [f32; 3],
    pub seed: i32,
    pub octaves: u16,
    pub persist: f32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            offset: 0.0,
            scale: 1.0,
            spread: [250.0, 250.0, 250.0],
            seed: 0,
            octaves: 3,
            persist: 0.6,
        }
    }
}

/// Settings-file form: `offset, scale, (sx, sy, sz), seed, octaves, persist`.
impl fmt::Display for NoiseParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, ({}, {}, {}), {}, {}, {}",
            self.offset,
            self.scale,
            self.spread[0],
            self.spread[1],
            self.spread[2],
            self.seed,
            self.octaves,
            self.persist
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_ron_uses_defaults() {
        let np: NoiseParams = ron::from_str("(scale: 3.0, seed: 17)").unwrap();
        assert_eq!(np.scale, 3.0);
        assert_eq!(np.seed, 17);
        assert_eq!(np.octaves, NoiseParams::default().octaves);
    }

    #[test]
    fn test_display_settings_form() {
        let np = NoiseParams {
            offset: 0.0,
            scale: 1.0,
            spread: [100.0, 100.0, 100.0],
            seed: 23,
            octaves: 3,
            persist: 0.7,
        };
        assert_eq!(np.to_string(), "0, 1, (100, 100, 100), 23, 3, 0.7");
    }
}
