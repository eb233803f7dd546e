//! Game configuration (window, flight tuning, terrain, gameplay).
//! Loaded from config.ron at startup.
//!
//! One tuning table parametrizes the whole flight model; there are no
//! per-build control-law variants.

use serde::{Deserialize, Serialize};

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub flight: FlightTuning,
    pub terrain: TerrainTuning,
    pub gameplay: GameplayTuning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Master audio volume (0.0 to 1.0).
    pub master_volume: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            master_volume: 1.0,
        }
    }
}

/// Flight-model tuning. Constants are empirical; units are SI where they have
/// any (newtons, meters, seconds, radians).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightTuning {
    /// Craft mass in kg, distributed as a box.
    pub mass: f32,
    /// Full extents of the collision/inertia box (x, y, z).
    pub collision_box: [f32; 3],
    /// Per-second velocity damping rates. The angular rate is what keeps the
    /// strong control torques from winding the craft up into a spin.
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Constant forward thrust while the engine is on, in newtons.
    pub thrust: f32,
    /// Extra thrust multiplier while boosting.
    pub boost_thrust_multiplier: f32,
    /// Quadratic drag coefficient (force = c * speed^2 against velocity).
    pub drag_coefficient: f32,
    /// Speed cap in m/s. Also normalizes control authority.
    pub max_speed: f32,
    /// Above this airspeed with the engine on, gravity is switched off.
    pub takeoff_speed: f32,
    /// Peak control angular accelerations at max airspeed, rad/s^2.
    pub pitch_accel: f32,
    pub yaw_accel: f32,
    pub roll_accel: f32,
    /// Lateral force during banked turns, newtons.
    pub skid_force: f32,
    /// Proportional wings-level corrective torque gain.
    pub roll_stability_gain: f32,
    /// Dynamic-pressure lift parameters (0.5 * rho * v^2 * area * cl).
    pub air_density: f32,
    pub wing_area: f32,
    pub lift_coefficient: f32,
    /// Height band above the ground sample that still counts as on-ground.
    pub ground_tolerance: f32,
    /// Contact force above which the round ends with a hard impact, newtons.
    pub crash_force_threshold: f32,
    /// The craft is in the water once below water_level minus this margin.
    pub water_margin: f32,
    /// Gravitational acceleration magnitude.
    pub gravity: f32,
}

impl Default for FlightTuning {
    fn default() -> Self {
        Self {
            mass: 80.0,
            collision_box: [2.0, 0.5, 3.0],
            linear_damping: 0.3,
            angular_damping: 40.0,
            thrust: 1000.0,
            boost_thrust_multiplier: 30.0,
            drag_coefficient: 1.0,
            max_speed: 20.0,
            takeoff_speed: 5.0,
            pitch_accel: 25.0,
            yaw_accel: 20.0,
            roll_accel: 100.0,
            skid_force: 500.0,
            roll_stability_gain: 4000.0,
            air_density: 1.225,
            wing_area: 10.0,
            lift_coefficient: 1.0,
            ground_tolerance: 0.1,
            crash_force_threshold: 2600.0,
            water_margin: 0.5,
            gravity: 9.81,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainTuning {
    pub seed: u64,
    pub frequency: f64,
    pub octaves: u32,
    pub lacunarity: f64,
    pub persistence: f64,
    /// World-space terrain amplitude in meters.
    pub amplitude: f32,
    /// World Y of the water table.
    pub water_level: f32,
    /// Half-width of the shoreline blend band.
    pub shore_band: f32,
    /// Vertices per side of the renderable ground grid.
    pub mesh_resolution: usize,
    /// Local-space extent of the ground grid (scaled by `mesh_scale`).
    pub mesh_local_extent: f32,
    /// Baked world scale of the ground instance.
    pub mesh_scale: [f32; 3],
    /// Physics heightfield sample counts and spacing.
    pub heightfield_rows: usize,
    pub heightfield_cols: usize,
    pub heightfield_cell: f32,
}

impl Default for TerrainTuning {
    fn default() -> Self {
        Self {
            seed: 1356,
            frequency: 0.008,
            octaves: 2,
            lacunarity: 2.0,
            persistence: 0.8,
            amplitude: 5.0,
            water_level: -1.5,
            shore_band: 0.75,
            mesh_resolution: 65,
            mesh_local_extent: 64.0,
            mesh_scale: [4.0, 5.0, 4.0],
            heightfield_rows: 256,
            heightfield_cols: 256,
            heightfield_cell: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayTuning {
    pub gem_count: usize,
    pub gem_scale: f32,
    pub catch_radius: f32,
    /// Gems spawn within this XZ radius of the craft.
    pub gem_spawn_radius: f32,
    /// Gem height above the terrain surface, uniform in this range.
    pub gem_height_min: f32,
    pub gem_height_max: f32,
    pub countdown_seconds: f32,
    pub round_seconds: f32,
    pub tree_count: usize,
    pub tree_spawn_radius: f32,
}

impl Default for GameplayTuning {
    fn default() -> Self {
        Self {
            gem_count: 10,
            gem_scale: 0.2,
            catch_radius: 2.5,
            gem_spawn_radius: 100.0,
            gem_height_min: 10.0,
            gem_height_max: 80.0,
            countdown_seconds: 3.0,
            round_seconds: 120.0,
            tree_count: 16,
            tree_spawn_radius: 100.0,
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid,
    /// returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if let Ok(data) = std::fs::read_to_string(&path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(&path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
        .join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_ron() {
        let config = GameConfig::default();
        let text = ron::ser::to_string(&config).unwrap();
        let back: GameConfig = ron::from_str(&text).unwrap();
        assert_eq!(back.flight.max_speed, config.flight.max_speed);
        assert_eq!(back.terrain.seed, config.terrain.seed);
        assert_eq!(back.gameplay.gem_count, config.gameplay.gem_count);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let partial: GameConfig = ron::from_str("(flight: (max_speed: 35.0))").unwrap();
        assert_eq!(partial.flight.max_speed, 35.0);
        assert_eq!(partial.flight.mass, FlightTuning::default().mass);
        assert_eq!(partial.terrain.seed, TerrainTuning::default().seed);
    }
}
