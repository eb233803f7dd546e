//! Per-frame simulation: wires input, flight, terrain sync, gems, camera and
//! audio together in the order the data flows.
//!
//! Frame order: input -> flight step -> pose readback -> terrain sync around
//! the new pose -> camera/audio derivation -> instance updates. Everything
//! runs inline on the main thread; the physics step size is the real frame
//! delta (floored), with no fixed-timestep accumulator.

use anyhow::{Context, Result};
use audio::{AudioSystem, EngineMix, GemLoop};
use engine_core::{exp_smooth, Transform};
use glam::{Quat, Vec2, Vec3};
use input::InputState;
use physics::{ColliderHandle, PhysicsWorld};
use procgen::{GroundMesh, GroundVertex, HeightfieldSamples, SamplerParams, TerrainSampler};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scene::{Camera, DynamicMesh, SceneGraph};

use crate::camera::{FixedView, FollowCamera, ViewMode};
use crate::config::GameConfig;
use crate::flight::{ControlInputs, FlightEvent, FlightModel};
use crate::gems::GemField;
use crate::state::{EndCause, GameMessages, GamePhase, RoundState, StateEvent};

pub const CRAFT_ID: &str = "craft";
pub const ROTOR_ID: &str = "craft_rotor";
pub const TERRAIN_ID: &str = "terrain";

/// The craft model faces +Z; flight math uses -Z forward. Constant visual
/// correction composed into the render orientation.
fn model_correction() -> Quat {
    Quat::from_rotation_y(std::f32::consts::PI)
}

const ROTOR_LOCAL_OFFSET: Vec3 = Vec3::new(0.0, 0.99, -0.62);
const ROTOR_IDLE_SPIN: f32 = 5.0;
const ROTOR_ENGINE_SPIN: f32 = 25.0;
const ROTOR_SMOOTHING: f32 = 1.0;
const ROTOR_SMOOTHING_GAME_OVER: f32 = 5.0;

const ENGINE_PITCH_BASE: f32 = 1.0;
const ENGINE_PITCH_BOOST: f32 = 1.3;
const ENGINE_PITCH_SMOOTHING: f32 = 1.0;

const GEM_SPIN_SPEED: f32 = std::f32::consts::TAU / 5.0;
const GEM_CHIME_VOLUME: f64 = 0.3;
const GEM_LOOP_VOLUME: f64 = 1.0;
const AMBIENT_VOLUME: f64 = 0.1;

/// Full game simulation, headless apart from the scene/audio collaborators.
pub struct GameSim {
    config: GameConfig,
    scene: SceneGraph,
    pub camera: Camera,
    follow: FollowCamera,
    sampler: TerrainSampler,
    ground_mesh: GroundMesh,
    ground_buffer: DynamicMesh<GroundVertex>,
    heightfield: HeightfieldSamples,
    physics: PhysicsWorld,
    terrain_collider: ColliderHandle,
    flight: FlightModel,
    craft_latched: bool,
    craft_scale: Vec3,
    gems: GemField,
    state: RoundState,
    pub messages: GameMessages,
    rotor_angle: f32,
    rotor_velocity: f32,
    rotor_target: f32,
    gem_spin_angle: f32,
    engine_pitch: f32,
    rng: StdRng,
    audio: Option<AudioSystem>,
    engine_mix: Option<EngineMix>,
    gem_loops: Vec<GemLoop>,
}

impl GameSim {
    /// Build the scene, terrain and physics world. Audio stays off until
    /// [`GameSim::init_audio`].
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        let terrain = &config.terrain;
        let sampler = TerrainSampler::new(SamplerParams {
            frequency: terrain.frequency,
            octaves: terrain.octaves,
            lacunarity: terrain.lacunarity,
            persistence: terrain.persistence,
            amplitude: terrain.amplitude,
            water_level: terrain.water_level,
            shore_band: terrain.shore_band,
            seed: terrain.seed,
        });
        let mut rng = StdRng::seed_from_u64(seed);

        // The craft parks on the surface at the origin; the pose latch reads
        // this placement back on the first frame.
        let spawn = Vec3::new(
            0.0,
            sampler.surface_height(0.0, 0.0) + config.flight.collision_box[1] / 2.0 + 0.05,
            0.0,
        );

        let mut scene = SceneGraph::new();
        scene.insert(CRAFT_ID, Transform::from_position(spawn));
        scene.insert(ROTOR_ID, Transform::from_position(spawn + ROTOR_LOCAL_OFFSET));

        let mesh_scale = Vec3::from(terrain.mesh_scale);
        scene.insert(
            TERRAIN_ID,
            Transform {
                position: Vec3::new(spawn.x, 0.0, spawn.z),
                rotation: Quat::IDENTITY,
                scale: mesh_scale,
            },
        );

        // Decorative trees, pinned to the same surface function as everything
        // else so they never float or sink.
        for i in 0..config.gameplay.tree_count {
            let r = config.gameplay.tree_spawn_radius;
            let x = rng.gen_range(-r..r);
            let z = rng.gen_range(-r..r);
            scene.insert(
                format!("tree_{i}"),
                Transform::from_position(Vec3::new(x, sampler.surface_height(x, z), z)),
            );
        }

        let gems = GemField::new(config.gameplay.clone());
        for (i, gem) in gems.gems().iter().enumerate() {
            scene.insert(format!("gem_{i}"), gem.transform);
        }

        let mut ground_mesh = GroundMesh::plane(
            terrain.mesh_resolution,
            terrain.mesh_local_extent,
            mesh_scale,
        );
        ground_mesh.regenerate(&sampler, Vec2::new(spawn.x, spawn.z));
        let mut ground_buffer = DynamicMesh::new(ground_mesh.indices().to_vec());
        ground_buffer.upload(ground_mesh.vertices());

        let mut heightfield = HeightfieldSamples::new(
            terrain.heightfield_rows,
            terrain.heightfield_cols,
            terrain.heightfield_cell,
        );
        heightfield.rebuild(&sampler, spawn.x, spawn.z);

        let mut physics = PhysicsWorld::new();
        let terrain_collider = physics.add_terrain_heightfield(
            heightfield.heights(),
            heightfield.rows(),
            heightfield.cols(),
            heightfield.extent_x(),
            heightfield.extent_z(),
            spawn.x,
            spawn.z,
        );
        let flight = FlightModel::new(
            &mut physics,
            spawn,
            terrain.water_level,
            config.flight.clone(),
        );

        let state = RoundState::new(
            config.gameplay.countdown_seconds,
            config.gameplay.round_seconds,
        );

        Ok(Self {
            config,
            scene,
            camera: Camera::default(),
            follow: FollowCamera::new(),
            sampler,
            ground_mesh,
            ground_buffer,
            heightfield,
            physics,
            terrain_collider,
            flight,
            craft_latched: false,
            craft_scale: Vec3::ONE,
            gems,
            state,
            messages: GameMessages::new(),
            rotor_angle: 0.0,
            rotor_velocity: ROTOR_IDLE_SPIN,
            rotor_target: ROTOR_IDLE_SPIN,
            gem_spin_angle: 0.0,
            engine_pitch: ENGINE_PITCH_BASE,
            rng,
            audio: None,
            engine_mix: None,
            gem_loops: Vec::new(),
        })
    }

    /// Bring up the audio device, sounds and emitters. Failure leaves the game
    /// silent but playable.
    pub fn init_audio(&mut self) -> Result<()> {
        let mut audio = AudioSystem::new().context("open audio device")?;
        let dir = std::path::Path::new("assets/audio");
        for name in [
            "engine_idle",
            "engine_running",
            "gem_loop",
            "gem_collected",
            "ambient",
        ] {
            audio
                .load_sound(name, &dir.join(format!("{name}.ogg")))
                .with_context(|| format!("load sound '{name}'"))?;
        }
        audio.set_master_volume(self.config.window.master_volume);
        audio.play_looping("ambient", AMBIENT_VOLUME)?;

        let craft_position = self.flight.position();
        let mix = audio.start_engine_mix("engine_idle", "engine_running", craft_position)?;
        let mut loops = Vec::with_capacity(self.gems.len());
        for gem in self.gems.gems() {
            let mut gem_loop =
                audio.start_gem_loop("gem_loop", gem.transform.position, GEM_LOOP_VOLUME)?;
            // Inactive until the first round placement.
            gem_loop.mute();
            loops.push(gem_loop);
        }

        self.audio = Some(audio);
        self.engine_mix = Some(mix);
        self.gem_loops = loops;
        Ok(())
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn end_cause(&self) -> Option<EndCause> {
        self.state.end_cause()
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn flight(&self) -> &FlightModel {
        &self.flight
    }

    pub fn gems(&self) -> &GemField {
        &self.gems
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn sampler(&self) -> &TerrainSampler {
        &self.sampler
    }

    pub fn heightfield(&self) -> &HeightfieldSamples {
        &self.heightfield
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn terrain_collider(&self) -> ColliderHandle {
        self.terrain_collider
    }

    pub fn ground_buffer(&self) -> &DynamicMesh<GroundVertex> {
        &self.ground_buffer
    }

    /// Advance the whole game by one frame.
    pub fn frame(&mut self, input: &InputState, dt: f32) -> Result<()> {
        if !self.craft_latched {
            self.latch_craft_pose()?;
        }

        match self.state.phase() {
            GamePhase::StartMenu => self.menu_frame(input, dt)?,
            GamePhase::Playing => self.playing_frame(input, dt)?,
            GamePhase::GameOver => self.game_over_frame(dt)?,
        }

        self.update_gem_instances(dt)?;
        self.messages.update(dt);

        if let Some(mix) = &mut self.engine_mix {
            mix.update(
                self.flight.engine_on(),
                self.engine_pitch,
                self.flight.position(),
                dt,
            );
        }
        if let Some(audio) = &mut self.audio {
            let forward = self.camera.forward();
            audio.update_listener(self.camera.eye, forward, self.camera.up);
        }
        Ok(())
    }

    /// Seed the craft pose from the initial scene placement, exactly once.
    /// Afterwards the physics body owns position and orientation.
    fn latch_craft_pose(&mut self) -> Result<()> {
        let matrix = self.scene.transform(CRAFT_ID)?.to_matrix();
        let initial = Transform::from_matrix(&matrix);
        self.craft_scale = initial.scale;
        self.flight.set_pose(
            &mut self.physics,
            initial.position,
            (initial.rotation * model_correction()).normalize(),
        );
        self.craft_latched = true;
        log::info!(
            "Craft placed at {:?}, scale {:?}",
            initial.position,
            initial.scale
        );
        Ok(())
    }

    fn menu_frame(&mut self, input: &InputState, dt: f32) -> Result<()> {
        self.follow
            .menu_frame(&mut self.camera, self.flight.position(), dt);
        self.update_craft_instances(dt, ROTOR_SMOOTHING)?;

        if input.is_start_pressed() && self.state.start_playing() {
            self.messages
                .push("Take off! F: engine, H: start a round, WASD: fly, SPACE: boost");
        }
        Ok(())
    }

    fn playing_frame(&mut self, input: &InputState, dt: f32) -> Result<()> {
        if input.is_engine_toggle_pressed() {
            let on = self.flight.toggle_engine();
            self.rotor_target = if on { ROTOR_ENGINE_SPIN } else { ROTOR_IDLE_SPIN };
            self.messages
                .push(if on { "Engine on" } else { "Engine off" });
        }
        if input.is_nose_view_pressed() {
            self.follow.set_mode(ViewMode::Nose);
        }
        if input.is_chase_view_pressed() {
            self.follow.set_mode(ViewMode::Chase);
        }
        if input.scroll_delta() != 0.0 {
            self.follow.zoom(input.scroll_delta());
        }
        if input.is_countdown_pressed() {
            self.state.arm_countdown();
            self.messages.push("Round starting...");
        }

        match self.state.tick(dt) {
            Some(StateEvent::CountdownFinished) => self.start_round(),
            Some(StateEvent::RoundExpired) => {
                self.end_round(EndCause::TimeExpired);
                return Ok(());
            }
            None => {}
        }

        let controls = ControlInputs {
            pitch_up: input.is_pitch_up_held(),
            pitch_down: input.is_pitch_down_held(),
            turn_left: input.is_turn_left_held(),
            turn_right: input.is_turn_right_held(),
            boost: input.is_boost_held(),
            enabled: true,
        };
        let ground_height = self.heightfield.ground_height();
        if let Some(event) = self
            .flight
            .step(&mut self.physics, &controls, ground_height, dt)
        {
            let cause = match event {
                FlightEvent::HardImpact => EndCause::HardImpact,
                FlightEvent::Splashdown => EndCause::Splashdown,
            };
            self.end_round(cause);
            return Ok(());
        }

        if self.state.round_active() {
            let craft_position = self.flight.position();
            for index in self.gems.collect_pass(craft_position) {
                if let Some(gem_loop) = self.gem_loops.get_mut(index) {
                    gem_loop.mute();
                }
                if let Some(audio) = &mut self.audio {
                    if let Err(e) = audio.play("gem_collected", GEM_CHIME_VOLUME) {
                        log::warn!("gem chime failed: {e}");
                    }
                }
                self.messages.push(format!(
                    "Gems collected: {}/{}",
                    self.gems.collected(),
                    self.gems.len()
                ));
            }
            if self.gems.all_collected() {
                self.end_round(EndCause::AllGemsCollected);
                return Ok(());
            }
        }

        self.sync_terrain(true)?;
        self.update_craft_instances(dt, ROTOR_SMOOTHING)?;

        let boosting = controls.boost && self.flight.engine_on();
        let fixed = if input.is_right_view_held() {
            Some(FixedView::Right)
        } else if input.is_left_view_held() {
            Some(FixedView::Left)
        } else if input.is_front_view_held() {
            Some(FixedView::Front)
        } else {
            None
        };
        let render_orientation = self.flight.orientation() * model_correction();
        self.follow.follow_frame(
            &mut self.camera,
            self.flight.position(),
            render_orientation,
            fixed,
            boosting,
            &self.sampler,
            dt,
        );

        let pitch_target = if boosting { ENGINE_PITCH_BOOST } else { ENGINE_PITCH_BASE };
        self.engine_pitch =
            exp_smooth(self.engine_pitch, pitch_target, ENGINE_PITCH_SMOOTHING, dt);
        Ok(())
    }

    /// GameOver: controls are dead and the camera freezes at its last pose,
    /// but physics keeps stepping so the craft visibly settles.
    fn game_over_frame(&mut self, dt: f32) -> Result<()> {
        let controls = ControlInputs::default();
        let ground_height = self.heightfield.ground_height();
        let _ = self
            .flight
            .step(&mut self.physics, &controls, ground_height, dt);

        self.sync_terrain(false)?;
        self.update_craft_instances(dt, ROTOR_SMOOTHING_GAME_OVER)?;

        self.engine_pitch = exp_smooth(
            self.engine_pitch,
            ENGINE_PITCH_BASE,
            ENGINE_PITCH_SMOOTHING,
            dt,
        );
        Ok(())
    }

    fn start_round(&mut self) {
        self.gems
            .place_round(&mut self.rng, self.flight.position(), &self.sampler);
        for (gem, gem_loop) in self.gems.gems().iter().zip(&mut self.gem_loops) {
            gem_loop.place(gem.transform.position);
        }
        self.messages.push(format!(
            "Collect {} gems before the clock runs out!",
            self.gems.len()
        ));
    }

    fn end_round(&mut self, cause: EndCause) {
        if !self.state.finish(cause) {
            return;
        }
        self.rotor_target = if self.flight.engine_on() {
            ROTOR_ENGINE_SPIN
        } else {
            ROTOR_IDLE_SPIN
        };
        let summary = if self.gems.all_collected() {
            format!("You collected all {} gems!", self.gems.len())
        } else {
            format!(
                "You collected {} of {} gems.",
                self.gems.collected(),
                self.gems.len()
            )
        };
        self.messages
            .push(format!("Round over ({}). {}", cause.describe(), summary));
    }

    /// Regenerate terrain around the craft's current XZ. The render mesh is
    /// skipped once the round is over; the physics patch always follows so the
    /// settling craft keeps valid ground under it.
    fn sync_terrain(&mut self, update_mesh: bool) -> Result<()> {
        let position = self.flight.position();

        if update_mesh {
            self.ground_mesh
                .regenerate(&self.sampler, Vec2::new(position.x, position.z));
            self.ground_buffer.upload(self.ground_mesh.vertices());

            let terrain = self.scene.transform_mut(TERRAIN_ID)?;
            terrain.position.x = position.x;
            terrain.position.z = position.z;
        }

        self.heightfield
            .rebuild(&self.sampler, position.x, position.z);
        self.physics.update_terrain_heightfield(
            self.terrain_collider,
            self.heightfield.heights(),
            self.heightfield.rows(),
            self.heightfield.cols(),
            self.heightfield.extent_x(),
            self.heightfield.extent_z(),
            position.x,
            position.z,
        );
        Ok(())
    }

    /// Push the craft and rotor transforms into the scene, advancing the rotor
    /// spin toward its target speed.
    fn update_craft_instances(&mut self, dt: f32, rotor_smoothing: f32) -> Result<()> {
        self.rotor_velocity = exp_smooth(self.rotor_velocity, self.rotor_target, rotor_smoothing, dt);
        self.rotor_angle += self.rotor_velocity * dt;
        if self.rotor_angle > std::f32::consts::TAU {
            self.rotor_angle -= std::f32::consts::TAU;
        }

        let position = self.flight.position();
        let orientation = self.flight.orientation();

        *self.scene.transform_mut(CRAFT_ID)? = Transform {
            position,
            rotation: (orientation * model_correction()).normalize(),
            scale: self.craft_scale,
        };

        *self.scene.transform_mut(ROTOR_ID)? = Transform {
            position: position + orientation * (ROTOR_LOCAL_OFFSET * self.craft_scale),
            rotation: orientation * Quat::from_rotation_z(self.rotor_angle),
            scale: self.craft_scale,
        };
        Ok(())
    }

    fn update_gem_instances(&mut self, dt: f32) -> Result<()> {
        self.gem_spin_angle += GEM_SPIN_SPEED * dt;
        if self.gem_spin_angle > std::f32::consts::TAU {
            self.gem_spin_angle -= std::f32::consts::TAU;
        }
        let spin = Quat::from_rotation_y(self.gem_spin_angle);
        for (i, gem) in self.gems.gems().iter().enumerate() {
            *self.scene.transform_mut(&format!("gem_{i}"))? = Transform {
                rotation: spin,
                ..gem.transform
            };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use input::{ElementState, KeyCode};

    const DT: f32 = 1.0 / 60.0;

    fn sim() -> GameSim {
        GameSim::new(GameConfig::default(), 42).unwrap()
    }

    fn press(sim: &mut GameSim, key: KeyCode) {
        let mut input = InputState::new();
        input.process_keyboard(key, ElementState::Pressed);
        sim.frame(&input, DT).unwrap();
    }

    fn idle_frames(sim: &mut GameSim, n: usize, dt: f32) {
        let input = InputState::new();
        for _ in 0..n {
            sim.frame(&input, dt).unwrap();
        }
    }

    fn into_round(sim: &mut GameSim) {
        press(sim, KeyCode::KeyP);
        assert_eq!(sim.phase(), GamePhase::Playing);
        press(sim, KeyCode::KeyH);
        // Ride out the 3 s countdown.
        idle_frames(sim, 8, 0.5);
        assert!(sim.state().round_active(), "round should be live");
    }

    #[test]
    fn craft_pose_latches_once_from_the_scene() {
        let mut sim = sim();
        let placed = sim.scene().transform(CRAFT_ID).unwrap().position;
        idle_frames(&mut sim, 1, DT);
        assert!((sim.flight().position() - placed).length() < 0.1);
    }

    #[test]
    fn start_key_leaves_the_menu() {
        let mut sim = sim();
        assert_eq!(sim.phase(), GamePhase::StartMenu);
        idle_frames(&mut sim, 5, DT);
        assert_eq!(sim.phase(), GamePhase::StartMenu);
        press(&mut sim, KeyCode::KeyP);
        assert_eq!(sim.phase(), GamePhase::Playing);
    }

    #[test]
    fn countdown_places_gems_and_starts_the_clock() {
        let mut sim = sim();
        into_round(&mut sim);
        assert_eq!(sim.gems().collected(), 0);
        for gem in sim.gems().gems() {
            assert!(gem.transform.scale.length() > 0.0, "gems must be visible");
            assert!(!gem.caught);
        }
        assert!(sim.state().round_remaining().unwrap() > 100.0);
    }

    #[test]
    fn round_expiry_ends_the_game_exactly_once_with_time_expired() {
        let mut sim = sim();
        into_round(&mut sim);
        // Burn through the 120 s round.
        idle_frames(&mut sim, 260, 0.5);
        assert_eq!(sim.phase(), GamePhase::GameOver);
        assert_eq!(sim.end_cause(), Some(EndCause::TimeExpired));
        // Further frames stay in GameOver with the same cause.
        idle_frames(&mut sim, 20, 0.5);
        assert_eq!(sim.end_cause(), Some(EndCause::TimeExpired));
    }

    #[test]
    fn heightfield_tracks_the_craft() {
        let mut sim = sim();
        press(&mut sim, KeyCode::KeyP);
        idle_frames(&mut sim, 10, DT);

        let craft = sim.flight().position();
        let collider = sim
            .physics()
            .collider_translation(sim.terrain_collider())
            .unwrap();
        assert!((collider.x - craft.x).abs() < 1e-4);
        assert!((collider.z - craft.z).abs() < 1e-4);
        assert_eq!(
            sim.heightfield().ground_height(),
            sim.sampler().surface_height(craft.x, craft.z)
        );

        let terrain = sim.scene().transform(TERRAIN_ID).unwrap();
        assert!((terrain.position.x - craft.x).abs() < 1e-4);
        assert!((terrain.position.z - craft.z).abs() < 1e-4);
    }

    #[test]
    fn ground_buffer_re_uploads_each_playing_frame() {
        let mut sim = sim();
        press(&mut sim, KeyCode::KeyP);
        let generation = sim.ground_buffer().generation();
        idle_frames(&mut sim, 3, DT);
        assert_eq!(sim.ground_buffer().generation(), generation + 3);
    }

    #[test]
    fn engine_toggle_flips_state() {
        let mut sim = sim();
        press(&mut sim, KeyCode::KeyP);
        assert!(!sim.flight().engine_on());
        press(&mut sim, KeyCode::KeyF);
        assert!(sim.flight().engine_on());
        press(&mut sim, KeyCode::KeyF);
        assert!(!sim.flight().engine_on());
    }

    #[test]
    fn parked_craft_survives_a_long_idle_session() {
        let mut sim = sim();
        press(&mut sim, KeyCode::KeyP);
        let start = sim.flight().position();
        idle_frames(&mut sim, 120, DT);
        assert_eq!(sim.phase(), GamePhase::Playing, "no spurious game over");
        assert!((sim.flight().position() - start).length() < 0.5);
    }

    #[test]
    fn splashdown_ends_the_round_in_water() {
        let mut sim = sim();
        press(&mut sim, KeyCode::KeyP);
        // Teleport the craft under the water table; next frame must end the
        // round with the water cause and kill the engine.
        let water = sim.config.terrain.water_level;
        sim.flight.set_engine(true);
        let pose = Vec3::new(0.0, water - 5.0, 0.0);
        sim.flight.set_pose(&mut sim.physics, pose, Quat::IDENTITY);
        idle_frames(&mut sim, 1, DT);
        assert_eq!(sim.phase(), GamePhase::GameOver);
        assert_eq!(sim.end_cause(), Some(EndCause::Splashdown));
        assert!(!sim.flight().engine_on());
        // A second frame below water changes nothing.
        idle_frames(&mut sim, 1, DT);
        assert_eq!(sim.end_cause(), Some(EndCause::Splashdown));
    }

    #[test]
    fn camera_freezes_on_game_over() {
        let mut sim = sim();
        press(&mut sim, KeyCode::KeyP);
        idle_frames(&mut sim, 30, DT);
        let water = sim.config.terrain.water_level;
        sim.flight
            .set_pose(&mut sim.physics, Vec3::new(0.0, water - 5.0, 0.0), Quat::IDENTITY);
        idle_frames(&mut sim, 1, DT);
        assert_eq!(sim.phase(), GamePhase::GameOver);
        let frozen = sim.camera.eye;
        idle_frames(&mut sim, 30, DT);
        assert_eq!(sim.camera.eye, frozen);
    }

    #[test]
    fn collecting_every_gem_wins_the_round() {
        let mut sim = sim();
        into_round(&mut sim);
        // Walk the craft through each gem position between frames.
        let positions: Vec<Vec3> = sim
            .gems()
            .gems()
            .iter()
            .map(|g| g.transform.position)
            .collect();
        for p in positions {
            if sim.phase() != GamePhase::Playing {
                break;
            }
            sim.flight.set_pose(&mut sim.physics, p, Quat::IDENTITY);
            idle_frames(&mut sim, 1, DT);
        }
        assert_eq!(sim.end_cause(), Some(EndCause::AllGemsCollected));
        assert_eq!(sim.phase(), GamePhase::GameOver);
    }
}
