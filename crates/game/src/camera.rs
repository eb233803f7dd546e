//! Camera derivation: reads the craft pose and game phase, writes the scene
//! camera. Never touches physics state.

use engine_core::{exp_smooth, exp_smooth_vec3};
use glam::{Quat, Vec3};
use procgen::TerrainSampler;
use scene::Camera;

/// Player-selectable follow modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Third-person chase view behind the craft.
    Chase,
    /// Nose-mounted first-person view.
    Nose,
}

/// Fixed debug views, active while their key is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedView {
    Right,
    Left,
    Front,
}

// Offsets in the craft's local frame (forward is -Z).
const CHASE_OFFSET: Vec3 = Vec3::new(0.0, 1.5, 15.0);
const NOSE_OFFSET: Vec3 = Vec3::new(0.0, 0.5, -0.5);
const RIGHT_VIEW_OFFSET: Vec3 = Vec3::new(20.0, 5.0, 0.0);
const LEFT_VIEW_OFFSET: Vec3 = Vec3::new(-20.0, 5.0, 0.0);
const FRONT_VIEW_OFFSET: Vec3 = Vec3::new(0.0, 5.0, -20.0);

const POSITION_SMOOTHING: f32 = 5.0;
const SHAKE_SMOOTHING: f32 = 10.0;
const FOV_SMOOTHING: f32 = 5.0;

const SHAKE_SPEED: f32 = 100.0;
const SHAKE_INTENSITY: f32 = 0.2;

const MENU_ORBIT_SPEED: f32 = 0.4;
const MENU_ORBIT_DISTANCE: f32 = 12.0;
const MENU_ORBIT_HEIGHT: f32 = 3.0;

const MIN_FOV: f32 = 30.0_f32 * (std::f32::consts::PI / 180.0);
const MAX_FOV: f32 = 80.0_f32 * (std::f32::consts::PI / 180.0);
const BASE_FOV: f32 = 45.0_f32 * (std::f32::consts::PI / 180.0);
const BOOST_FOV_KICK: f32 = 15.0_f32 * (std::f32::consts::PI / 180.0);
const FOV_SCROLL_STEP: f32 = 2.5_f32 * (std::f32::consts::PI / 180.0);

/// Smoothed camera state following the craft.
pub struct FollowCamera {
    mode: ViewMode,
    position: Vec3,
    look_at: Vec3,
    base_fov: f32,
    fov: f32,
    shake_offset: Vec3,
    noise_offset: f32,
    menu_angle: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl FollowCamera {
    pub fn new() -> Self {
        Self {
            mode: ViewMode::Chase,
            position: Vec3::ZERO,
            look_at: Vec3::ZERO,
            base_fov: BASE_FOV,
            fov: BASE_FOV,
            shake_offset: Vec3::ZERO,
            noise_offset: 0.0,
            menu_angle: 0.0,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    /// Adjust the base FOV by scroll notches, clamped to the usable range.
    pub fn zoom(&mut self, notches: f32) {
        self.base_fov = (self.base_fov - notches * FOV_SCROLL_STEP).clamp(MIN_FOV, MAX_FOV);
    }

    /// Slow orbit around the parked craft while in the start menu.
    pub fn menu_frame(&mut self, camera: &mut Camera, craft_position: Vec3, dt: f32) {
        self.menu_angle += MENU_ORBIT_SPEED * dt;
        if self.menu_angle > std::f32::consts::TAU {
            self.menu_angle -= std::f32::consts::TAU;
        }
        self.position = craft_position
            + Vec3::new(
                self.menu_angle.sin() * MENU_ORBIT_DISTANCE,
                MENU_ORBIT_HEIGHT,
                self.menu_angle.cos() * MENU_ORBIT_DISTANCE,
            );
        self.look_at = craft_position;
        self.fov = self.base_fov;

        camera.eye = self.position;
        camera.look_at = self.look_at;
        camera.up = Vec3::Y;
        camera.fov = self.fov;
    }

    /// Per-frame follow update during play. `orientation` is the craft's
    /// render orientation; `fixed` overrides the view mode while held.
    pub fn follow_frame(
        &mut self,
        camera: &mut Camera,
        craft_position: Vec3,
        orientation: Quat,
        fixed: Option<FixedView>,
        boosting: bool,
        sampler: &TerrainSampler,
        dt: f32,
    ) {
        let mut target_look_at = craft_position;
        let offset = match fixed {
            Some(FixedView::Right) => RIGHT_VIEW_OFFSET,
            Some(FixedView::Left) => LEFT_VIEW_OFFSET,
            Some(FixedView::Front) => FRONT_VIEW_OFFSET,
            None => match self.mode {
                ViewMode::Chase => CHASE_OFFSET,
                ViewMode::Nose => {
                    let forward = orientation * Vec3::NEG_Z;
                    target_look_at = craft_position + orientation * NOSE_OFFSET + forward;
                    NOSE_OFFSET
                }
            },
        };
        let target_position = craft_position + orientation * offset;

        self.position = exp_smooth_vec3(self.position, target_position, POSITION_SMOOTHING, dt);
        self.look_at = exp_smooth_vec3(self.look_at, target_look_at, POSITION_SMOOTHING, dt);

        // Boost shake: two independent noise lanes at an advancing offset,
        // rotated into the craft frame. Decays back through the same law.
        let target_shake = if boosting {
            self.noise_offset += dt * SHAKE_SPEED;
            let (a, b) = sampler.shake(self.noise_offset);
            orientation * Vec3::new(0.0, a * SHAKE_INTENSITY, b * SHAKE_INTENSITY)
        } else {
            Vec3::ZERO
        };
        self.shake_offset = exp_smooth_vec3(self.shake_offset, target_shake, SHAKE_SMOOTHING, dt);

        let boost_kick = if boosting && self.mode == ViewMode::Chase && fixed.is_none() {
            BOOST_FOV_KICK
        } else {
            0.0
        };
        self.fov = exp_smooth(self.fov, self.base_fov + boost_kick, FOV_SMOOTHING, dt);

        camera.eye = self.position + self.shake_offset;
        camera.look_at = self.look_at;
        // The up vector follows the craft's roll so banked turns read smoothly.
        camera.up = (orientation * Vec3::Y).normalize();
        camera.fov = self.fov;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procgen::SamplerParams;

    fn sampler() -> TerrainSampler {
        TerrainSampler::new(SamplerParams::default())
    }

    #[test]
    fn chase_camera_converges_behind_the_craft() {
        let sampler = sampler();
        let mut camera = Camera::default();
        let mut follow = FollowCamera::new();
        let craft = Vec3::new(10.0, 30.0, -5.0);

        for _ in 0..600 {
            follow.follow_frame(
                &mut camera,
                craft,
                Quat::IDENTITY,
                None,
                false,
                &sampler,
                1.0 / 60.0,
            );
        }
        let expected = craft + CHASE_OFFSET;
        assert!((follow.position() - expected).length() < 0.05);
        assert!((follow.look_at() - craft).length() < 0.05);
    }

    #[test]
    fn approach_is_monotonic_without_overshoot() {
        let sampler = sampler();
        let mut camera = Camera::default();
        let mut follow = FollowCamera::new();
        let craft = Vec3::new(0.0, 0.0, -100.0);
        let target = craft + CHASE_OFFSET;

        let mut last_distance = f32::INFINITY;
        for _ in 0..240 {
            follow.follow_frame(
                &mut camera,
                craft,
                Quat::IDENTITY,
                None,
                false,
                &sampler,
                1.0 / 60.0,
            );
            let distance = (follow.position() - target).length();
            assert!(distance <= last_distance + 1e-4);
            last_distance = distance;
        }
    }

    #[test]
    fn zoom_clamps_to_the_fov_range() {
        let mut follow = FollowCamera::new();
        follow.zoom(100.0);
        assert!((follow.base_fov - MIN_FOV).abs() < 1e-6);
        follow.zoom(-100.0);
        assert!((follow.base_fov - MAX_FOV).abs() < 1e-6);
    }

    #[test]
    fn shake_decays_to_zero_after_boost_ends() {
        let sampler = sampler();
        let mut camera = Camera::default();
        let mut follow = FollowCamera::new();

        for _ in 0..60 {
            follow.follow_frame(
                &mut camera,
                Vec3::ZERO,
                Quat::IDENTITY,
                None,
                true,
                &sampler,
                1.0 / 60.0,
            );
        }
        for _ in 0..300 {
            follow.follow_frame(
                &mut camera,
                Vec3::ZERO,
                Quat::IDENTITY,
                None,
                false,
                &sampler,
                1.0 / 60.0,
            );
        }
        assert!(follow.shake_offset.length() < 1e-3);
        assert_eq!(camera.eye, follow.position() + follow.shake_offset);
    }

    #[test]
    fn boost_widens_the_chase_fov_only() {
        let sampler = sampler();
        let mut camera = Camera::default();
        let mut follow = FollowCamera::new();

        for _ in 0..600 {
            follow.follow_frame(
                &mut camera,
                Vec3::ZERO,
                Quat::IDENTITY,
                None,
                true,
                &sampler,
                1.0 / 60.0,
            );
        }
        assert!((camera.fov - (BASE_FOV + BOOST_FOV_KICK)).abs() < 1e-3);

        follow.set_mode(ViewMode::Nose);
        for _ in 0..600 {
            follow.follow_frame(
                &mut camera,
                Vec3::ZERO,
                Quat::IDENTITY,
                None,
                true,
                &sampler,
                1.0 / 60.0,
            );
        }
        assert!((camera.fov - BASE_FOV).abs() < 1e-3);
    }

    #[test]
    fn menu_orbit_keeps_a_fixed_distance() {
        let mut camera = Camera::default();
        let mut follow = FollowCamera::new();
        let craft = Vec3::new(5.0, 2.0, 5.0);
        for _ in 0..120 {
            follow.menu_frame(&mut camera, craft, 1.0 / 60.0);
            let horizontal = (camera.eye - craft) * Vec3::new(1.0, 0.0, 1.0);
            assert!((horizontal.length() - MENU_ORBIT_DISTANCE).abs() < 1e-3);
            assert!((camera.eye.y - craft.y - MENU_ORBIT_HEIGHT).abs() < 1e-3);
            assert_eq!(camera.look_at, craft);
        }
    }
}
