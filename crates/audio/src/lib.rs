//! Audio for gemflight using Kira for spatial sound.
//!
//! The game only computes target gains, pitches and positions; mixing and
//! decoding belong to Kira. Engine idle/running sources crossfade with a
//! clamped linear ramp (deliberately not the exponential smoothing the camera
//! uses), gem loops are muted on collection, and the listener follows the
//! smoothed camera every frame.

use anyhow::Result;
use engine_core::{linear_ramp, Vec3};
use kira::{
    manager::{backend::DefaultBackend, AudioManager, AudioManagerSettings},
    sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
    spatial::{
        emitter::{EmitterHandle, EmitterSettings},
        listener::{ListenerHandle, ListenerSettings},
        scene::{SpatialSceneHandle, SpatialSceneSettings},
    },
    tween::Tween,
};
use std::collections::HashMap;
use std::path::Path;

/// Crossfade speed for the engine idle/running pair, in gain units per second.
const ENGINE_FADE_SPEED: f32 = 1.5;

/// Main audio system managing sounds and spatial audio.
pub struct AudioSystem {
    manager: AudioManager,
    spatial_scene: SpatialSceneHandle,
    listener: ListenerHandle,
    sounds: HashMap<String, StaticSoundData>,
}

impl AudioSystem {
    /// Create a new audio system.
    pub fn new() -> Result<Self> {
        let mut manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())?;

        let mut spatial_scene = manager.add_spatial_scene(SpatialSceneSettings::default())?;

        let listener = spatial_scene.add_listener(
            mint::Vector3 { x: 0.0, y: 0.0, z: 0.0 },
            mint::Quaternion {
                v: mint::Vector3 { x: 0.0, y: 0.0, z: 0.0 },
                s: 1.0,
            },
            ListenerSettings::default(),
        )?;

        Ok(Self {
            manager,
            spatial_scene,
            listener,
            sounds: HashMap::new(),
        })
    }

    /// Load a sound from a file.
    pub fn load_sound(&mut self, name: &str, path: &Path) -> Result<()> {
        let sound_data = StaticSoundData::from_file(path)?;
        self.sounds.insert(name.to_string(), sound_data);
        Ok(())
    }

    fn sound(&self, name: &str) -> Result<StaticSoundData> {
        self.sounds
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("sound '{name}' not loaded"))
    }

    /// Play a 2D one-shot (UI feedback, the gem collect chime).
    pub fn play(&mut self, name: &str, volume: f64) -> Result<()> {
        let sound_data = self.sound(name)?;
        let settings = StaticSoundSettings::new().volume(volume);
        self.manager.play(sound_data.with_settings(settings))?;
        Ok(())
    }

    /// Play a 2D loop (background music).
    pub fn play_looping(&mut self, name: &str, volume: f64) -> Result<()> {
        let sound_data = self.sound(name)?;
        let settings = StaticSoundSettings::new().volume(volume).loop_region(0.0..);
        self.manager.play(sound_data.with_settings(settings))?;
        Ok(())
    }

    /// Start the engine idle/running pair on one emitter at the craft position.
    /// Both loops start immediately: idle audible, running muted.
    pub fn start_engine_mix(&mut self, idle: &str, running: &str, position: Vec3) -> Result<EngineMix> {
        let emitter = self.spatial_scene.add_emitter(
            mint::Vector3 { x: position.x, y: position.y, z: position.z },
            EmitterSettings::default(),
        )?;

        let idle_data = self.sound(idle)?.with_settings(
            StaticSoundSettings::new()
                .loop_region(0.0..)
                .volume(1.0)
                .output_destination(&emitter),
        );
        let running_data = self.sound(running)?.with_settings(
            StaticSoundSettings::new()
                .loop_region(0.0..)
                .volume(0.0)
                .output_destination(&emitter),
        );

        let idle_handle = self.manager.play(idle_data)?;
        let running_handle = self.manager.play(running_data)?;

        Ok(EngineMix {
            emitter,
            idle: idle_handle,
            running: running_handle,
            gains: [1.0, 0.0],
        })
    }

    /// Start a looping ambient loop at a gem position.
    pub fn start_gem_loop(&mut self, name: &str, position: Vec3, volume: f64) -> Result<GemLoop> {
        let emitter = self.spatial_scene.add_emitter(
            mint::Vector3 { x: position.x, y: position.y, z: position.z },
            EmitterSettings::default(),
        )?;
        let data = self.sound(name)?.with_settings(
            StaticSoundSettings::new()
                .loop_region(0.0..)
                .volume(volume)
                .output_destination(&emitter),
        );
        let handle = self.manager.play(data)?;
        Ok(GemLoop {
            emitter,
            handle,
            base_volume: volume,
        })
    }

    /// Update listener position and orientation (call each frame with the
    /// smoothed camera pose).
    pub fn update_listener(&mut self, position: Vec3, forward: Vec3, up: Vec3) {
        let right = forward.cross(up).normalize();
        let corrected_up = right.cross(forward).normalize();

        let rotation = glam::Mat3::from_cols(right, corrected_up, -forward);
        let quat = glam::Quat::from_mat3(&rotation);

        self.listener.set_position(
            mint::Vector3 { x: position.x, y: position.y, z: position.z },
            Tween::default(),
        );
        self.listener.set_orientation(
            mint::Quaternion {
                v: mint::Vector3 { x: quat.x, y: quat.y, z: quat.z },
                s: quat.w,
            },
            Tween::default(),
        );
    }

    /// Set master volume (0.0 to 1.0).
    pub fn set_master_volume(&mut self, volume: f64) {
        let _ = self.manager.main_track().set_volume(volume, Tween::default());
    }
}

/// Engine idle/running crossfade following the craft.
pub struct EngineMix {
    emitter: EmitterHandle,
    idle: StaticSoundHandle,
    running: StaticSoundHandle,
    /// Current [idle, running] gains.
    gains: [f32; 2],
}

impl EngineMix {
    /// Ramp both gains toward their targets (idle fades out when the engine is
    /// on, running fades in) with a step clamped by `ENGINE_FADE_SPEED * dt`,
    /// and apply the current engine pitch to the running loop.
    pub fn update(&mut self, engine_on: bool, pitch: f32, craft_position: Vec3, dt: f32) {
        let targets = [
            if engine_on { 0.0 } else { 1.0 },
            if engine_on { 1.0 } else { 0.0 },
        ];
        for (gain, target) in self.gains.iter_mut().zip(targets) {
            *gain = linear_ramp(*gain, target, ENGINE_FADE_SPEED, dt);
        }

        self.idle.set_volume(self.gains[0] as f64, Tween::default());
        self.running.set_volume(self.gains[1] as f64, Tween::default());
        self.running.set_playback_rate(pitch as f64, Tween::default());

        self.emitter.set_position(
            mint::Vector3 {
                x: craft_position.x,
                y: craft_position.y,
                z: craft_position.z,
            },
            Tween::default(),
        );
    }

    /// Current [idle, running] gains.
    pub fn gains(&self) -> [f32; 2] {
        self.gains
    }
}

/// One looping spatial loop attached to a gem.
pub struct GemLoop {
    emitter: EmitterHandle,
    handle: StaticSoundHandle,
    base_volume: f64,
}

impl GemLoop {
    /// Move the emitter to a (re)placed gem and restore its volume.
    pub fn place(&mut self, position: Vec3) {
        self.emitter.set_position(
            mint::Vector3 { x: position.x, y: position.y, z: position.z },
            Tween::default(),
        );
        self.handle.set_volume(self.base_volume, Tween::default());
    }

    /// Mute the loop once its gem is collected.
    pub fn mute(&mut self) {
        self.handle.set_volume(0.0, Tween::default());
    }
}

// Re-export for convenience
pub use kira;
