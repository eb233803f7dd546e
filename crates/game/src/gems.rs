//! Collectible gems.

use engine_core::Transform;
use glam::Vec3;
use procgen::TerrainSampler;
use rand::Rng;

use crate::config::GameplayTuning;

/// A collectible. A caught gem has zero scale and stays inert until the next
/// round placement resets it.
#[derive(Debug, Clone)]
pub struct Gem {
    pub transform: Transform,
    pub caught: bool,
}

/// The full set of gems for a round.
pub struct GemField {
    gems: Vec<Gem>,
    collected: usize,
    tuning: GameplayTuning,
}

impl GemField {
    /// Create the batch inactive: zero scale, nothing caught.
    pub fn new(tuning: GameplayTuning) -> Self {
        let gems = (0..tuning.gem_count)
            .map(|_| Gem {
                transform: Transform {
                    scale: Vec3::ZERO,
                    ..Default::default()
                },
                caught: false,
            })
            .collect();
        Self {
            gems,
            collected: 0,
            tuning,
        }
    }

    pub fn gems(&self) -> &[Gem] {
        &self.gems
    }

    pub fn len(&self) -> usize {
        self.gems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gems.is_empty()
    }

    pub fn collected(&self) -> usize {
        self.collected
    }

    pub fn all_collected(&self) -> bool {
        self.collected == self.gems.len()
    }

    /// (Re)place every gem around the craft and reset the round counters.
    /// Heights sit a uniform offset above the terrain surface at the gem's XZ,
    /// so no gem spawns embedded in the ground.
    pub fn place_round(
        &mut self,
        rng: &mut impl Rng,
        craft_position: Vec3,
        sampler: &TerrainSampler,
    ) {
        let r = self.tuning.gem_spawn_radius;
        self.collected = 0;
        for gem in &mut self.gems {
            let x = rng.gen_range(craft_position.x - r..craft_position.x + r);
            let z = rng.gen_range(craft_position.z - r..craft_position.z + r);
            let y = sampler.surface_height(x, z)
                + rng.gen_range(self.tuning.gem_height_min..self.tuning.gem_height_max);
            gem.transform = Transform {
                position: Vec3::new(x, y, z),
                scale: Vec3::splat(self.tuning.gem_scale),
                ..Default::default()
            };
            gem.caught = false;
        }
    }

    /// Collect every uncaught gem within the catch radius of the craft.
    /// Returns the indices collected this pass; each gem can only ever be
    /// collected once per placement.
    pub fn collect_pass(&mut self, craft_position: Vec3) -> Vec<usize> {
        let mut caught_now = Vec::new();
        for (i, gem) in self.gems.iter_mut().enumerate() {
            if gem.caught {
                continue;
            }
            if gem.transform.position.distance(craft_position) < self.tuning.catch_radius {
                gem.caught = true;
                gem.transform.scale = Vec3::ZERO;
                self.collected += 1;
                caught_now.push(i);
            }
        }
        caught_now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procgen::SamplerParams;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field() -> (GemField, TerrainSampler, StdRng) {
        (
            GemField::new(GameplayTuning::default()),
            TerrainSampler::new(SamplerParams::default()),
            StdRng::seed_from_u64(7),
        )
    }

    #[test]
    fn gems_start_inactive() {
        let (field, _, _) = field();
        assert_eq!(field.len(), 10);
        assert_eq!(field.collected(), 0);
        for gem in field.gems() {
            assert_eq!(gem.transform.scale, Vec3::ZERO);
            assert!(!gem.caught);
        }
    }

    #[test]
    fn placement_is_in_bounds_and_above_terrain() {
        let (mut field, sampler, mut rng) = field();
        let craft = Vec3::new(40.0, 12.0, -25.0);
        field.place_round(&mut rng, craft, &sampler);

        for gem in field.gems() {
            let p = gem.transform.position;
            assert!(p.is_finite());
            assert!((p.x - craft.x).abs() <= 100.0);
            assert!((p.z - craft.z).abs() <= 100.0);
            let ground = sampler.surface_height(p.x, p.z);
            assert!(p.y >= ground + 10.0 - 1e-3);
            assert!(p.y <= ground + 80.0 + 1e-3);
            assert_eq!(gem.transform.scale, Vec3::splat(0.2));
            assert!(!gem.caught);
        }
    }

    #[test]
    fn collection_counts_each_gem_exactly_once() {
        let (mut field, sampler, mut rng) = field();
        field.place_round(&mut rng, Vec3::ZERO, &sampler);
        let target = field.gems()[3].transform.position;

        let first = field.collect_pass(target);
        assert!(first.contains(&3));
        assert_eq!(field.collected(), first.len());
        assert!(field.gems()[3].caught);
        assert_eq!(field.gems()[3].transform.scale, Vec3::ZERO);

        // A second pass at the same spot must not double count.
        let second = field.collect_pass(target);
        assert!(!second.contains(&3));
        assert_eq!(field.collected(), first.len());
    }

    #[test]
    fn replacement_resets_flags_and_counter() {
        let (mut field, sampler, mut rng) = field();
        field.place_round(&mut rng, Vec3::ZERO, &sampler);
        let target = field.gems()[0].transform.position;
        field.collect_pass(target);
        assert!(field.collected() > 0);

        field.place_round(&mut rng, Vec3::ZERO, &sampler);
        assert_eq!(field.collected(), 0);
        assert!(field.gems().iter().all(|g| !g.caught));
        assert!(field
            .gems()
            .iter()
            .all(|g| g.transform.scale == Vec3::splat(0.2)));
    }

    #[test]
    fn out_of_range_gems_stay_uncaught() {
        let (mut field, sampler, mut rng) = field();
        field.place_round(&mut rng, Vec3::ZERO, &sampler);
        let far = Vec3::new(10_000.0, 0.0, 10_000.0);
        assert!(field.collect_pass(far).is_empty());
        assert_eq!(field.collected(), 0);
    }
}
