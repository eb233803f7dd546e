//! Deterministic terrain height sampling.
//!
//! **Seed-based determinism:** all noise is derived from `SamplerParams::seed`
//! so the same seed always produces the same height at every (world_x, world_z),
//! no matter which subsystem asks.

use engine_core::smoothing::smoothstep;
use noise::{NoiseFn, Perlin};

/// Derive a deterministic u32 noise seed from a world seed and an offset.
/// Same (seed, offset) always gives the same result so terrain is reproducible.
#[inline]
fn deterministic_noise_seed(seed: u64, offset: u64) -> u32 {
    ((seed.wrapping_add(offset))
        .wrapping_mul(0x9e3779b97f4a7c15_u64)
        .wrapping_add(offset.wrapping_mul(0x6c078965_u64))
        >> 32) as u32
}

/// Configuration for the terrain sampler.
#[derive(Debug, Clone)]
pub struct SamplerParams {
    /// Base noise frequency (lower = smoother terrain).
    pub frequency: f64,
    /// Number of octaves for fractal noise.
    pub octaves: u32,
    /// Frequency multiplier per octave.
    pub lacunarity: f64,
    /// Amplitude multiplier per octave.
    pub persistence: f64,
    /// World-space height amplitude in meters.
    pub amplitude: f32,
    /// World Y of the water table. Terrain below it flattens to this height.
    pub water_level: f32,
    /// Half-width of the shoreline blend band in world units.
    pub shore_band: f32,
    /// Seed for all derived noise sources.
    pub seed: u64,
}

impl Default for SamplerParams {
    fn default() -> Self {
        Self {
            frequency: 0.008,
            octaves: 2,
            lacunarity: 2.0,
            persistence: 0.8,
            amplitude: 5.0,
            water_level: -1.5,
            shore_band: 0.75,
            seed: 1356,
        }
    }
}

/// Pure height function over world (x, z). Shared by mesh deformation, the
/// physics heightfield and object placement; always finite for finite input.
pub struct TerrainSampler {
    terrain: Perlin,
    shake: Perlin,
    params: SamplerParams,
}

impl TerrainSampler {
    pub fn new(params: SamplerParams) -> Self {
        Self {
            terrain: Perlin::new(deterministic_noise_seed(params.seed, 0)),
            shake: Perlin::new(deterministic_noise_seed(params.seed, 1)),
            params,
        }
    }

    pub fn params(&self) -> &SamplerParams {
        &self.params
    }

    /// Raw fractal height at a world position, centered on zero.
    pub fn height(&self, x: f32, z: f32) -> f32 {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.params.frequency;
        let mut max_value = 0.0;

        for _ in 0..self.params.octaves {
            value += self.terrain.get([x as f64 * frequency, z as f64 * frequency]) * amplitude;
            max_value += amplitude;
            amplitude *= self.params.persistence;
            frequency *= self.params.lacunarity;
        }

        (value / max_value) as f32 * self.params.amplitude
    }

    /// Height with the shoreline treatment applied: below the water table the
    /// surface flattens to `water_level`, blended over a fixed world-space band
    /// so the shoreline has no seam. This is the call every consumer uses.
    pub fn surface_height(&self, x: f32, z: f32) -> f32 {
        let raw = self.height(x, z);
        let wl = self.params.water_level;
        let band = self.params.shore_band;
        let t = smoothstep(wl - band, wl + band, raw);
        wl + (raw - wl) * t
    }

    /// Two independent 1-D noise lanes for the boost camera shake, sampled at
    /// an advancing offset. Values are in [-1, 1] per lane.
    pub fn shake(&self, offset: f32) -> (f32, f32) {
        (
            self.shake.get([offset as f64, 10.0]) as f32,
            self.shake.get([offset as f64, 20.0]) as f32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Same seed must produce bit-identical heights from independent instances.
    #[test]
    fn sampler_deterministic_same_seed() {
        let a = TerrainSampler::new(SamplerParams::default());
        let b = TerrainSampler::new(SamplerParams::default());
        for i in 0..50 {
            let x = i as f32 * 13.7 - 300.0;
            let z = i as f32 * -7.3 + 120.0;
            assert_eq!(a.surface_height(x, z), b.surface_height(x, z));
        }
    }

    #[test]
    fn different_seed_different_heights() {
        let a = TerrainSampler::new(SamplerParams::default());
        let b = TerrainSampler::new(SamplerParams {
            seed: 9001,
            ..SamplerParams::default()
        });
        let mismatches = (0..50)
            .filter(|&i| {
                let x = i as f32 * 11.0;
                a.height(x, 5.0) != b.height(x, 5.0)
            })
            .count();
        assert!(mismatches > 0);
    }

    #[test]
    fn heights_are_finite_and_bounded() {
        let sampler = TerrainSampler::new(SamplerParams::default());
        for i in 0..100 {
            let h = sampler.height(i as f32 * 97.3, i as f32 * -41.1);
            assert!(h.is_finite());
            assert!(h.abs() <= sampler.params().amplitude + 1e-3);
        }
    }

    #[test]
    fn surface_stays_within_a_band_of_the_water_table() {
        let sampler = TerrainSampler::new(SamplerParams::default());
        let floor = sampler.params().water_level - sampler.params().shore_band;
        for i in 0..200 {
            let h = sampler.surface_height(i as f32 * 3.1, i as f32 * 5.7);
            assert!(h >= floor, "surface {h} fell below the shoreline band");
        }
    }

    #[test]
    fn deep_water_flattens_exactly_to_the_water_table() {
        // Water table at the terrain mean so deep-water samples are plentiful.
        let sampler = TerrainSampler::new(SamplerParams {
            water_level: 0.0,
            ..SamplerParams::default()
        });
        let wl = sampler.params().water_level;
        let band = sampler.params().shore_band;
        let mut seen_deep = false;
        for i in 0..2000 {
            let (x, z) = (i as f32 * 3.7, i as f32 * -2.9);
            if sampler.height(x, z) < wl - band {
                assert_eq!(sampler.surface_height(x, z), wl);
                seen_deep = true;
            }
        }
        assert!(seen_deep, "test terrain had no deep-water samples");
    }

    #[test]
    fn shore_blend_passes_through_raw_height_above_band() {
        let sampler = TerrainSampler::new(SamplerParams::default());
        let above = sampler.params().water_level + sampler.params().shore_band;
        for i in 0..200 {
            let x = i as f32 * 2.3;
            let raw = sampler.height(x, 42.0);
            if raw > above {
                let surface = sampler.surface_height(x, 42.0);
                assert!((surface - raw).abs() < 1e-5);
            }
        }
    }
}
