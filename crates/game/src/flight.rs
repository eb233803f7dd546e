//! Rigid-body flight model.
//!
//! One parametrized control law (see [`FlightTuning`]) turns held keys into
//! forces and torques on the craft body, steps the physics world by the frame
//! delta, and reads the resulting pose back as the authoritative craft state.
//!
//! The model is an arcade simplification, tuned for feel rather than
//! aerodynamic truth: control authority scales with airspeed, gravity switches
//! off above takeoff speed while the engine runs, and the speed cap clears
//! accumulated forces instead of clamping velocity.

use engine_core::time::MIN_DELTA_SECONDS;
use glam::{Quat, Vec3};
use physics::{ColliderHandle, PhysicsWorld, RigidBodyHandle};

use crate::config::FlightTuning;

/// Airspeed below which drag is not applied.
const SPEED_EPSILON: f32 = 1e-3;

/// Round-ending conditions detected by the flight step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightEvent {
    /// A contact force exceeded the crash threshold.
    HardImpact,
    /// The craft dropped below the water level.
    Splashdown,
}

/// Held flight controls for one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlInputs {
    pub pitch_up: bool,
    pub pitch_down: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub boost: bool,
    /// False once the round is over: keys are ignored, physics still runs.
    pub enabled: bool,
}

/// The craft: one dynamic rigid body plus the per-frame control policy.
pub struct FlightModel {
    body: RigidBodyHandle,
    collider: ColliderHandle,
    tuning: FlightTuning,
    /// Diagonal angular inertia of the collision box, body frame.
    inertia: Vec3,
    /// World Y below which the craft counts as in the water.
    water_level: f32,
    engine_on: bool,
    on_ground: bool,
    // Authoritative pose, read back from the body after each step.
    position: Vec3,
    orientation: Quat,
    velocity: Vec3,
}

impl FlightModel {
    /// Create the craft body at `position` and register it with the world.
    pub fn new(
        physics: &mut PhysicsWorld,
        position: Vec3,
        water_level: f32,
        tuning: FlightTuning,
    ) -> Self {
        let extents = Vec3::from(tuning.collision_box);
        let (body, collider) = physics.add_craft_body(
            position,
            extents,
            tuning.mass,
            tuning.linear_damping,
            tuning.angular_damping,
        );

        // Diagonal inertia of a solid cuboid: I = m/12 * (b^2 + c^2) per axis.
        let m12 = tuning.mass / 12.0;
        let inertia = Vec3::new(
            m12 * (extents.y * extents.y + extents.z * extents.z),
            m12 * (extents.x * extents.x + extents.z * extents.z),
            m12 * (extents.x * extents.x + extents.y * extents.y),
        );

        Self {
            body,
            collider,
            tuning,
            inertia,
            water_level,
            engine_on: false,
            on_ground: true,
            position,
            orientation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
        }
    }

    /// Seed the body pose from the initial scene placement. Called exactly once
    /// by the pose latch; afterwards the body owns the pose.
    pub fn set_pose(&mut self, physics: &mut PhysicsWorld, position: Vec3, orientation: Quat) {
        physics.set_body_pose(self.body, position, orientation);
        self.position = position;
        self.orientation = orientation;
        self.velocity = Vec3::ZERO;
    }

    pub fn toggle_engine(&mut self) -> bool {
        self.engine_on = !self.engine_on;
        self.engine_on
    }

    pub fn set_engine(&mut self, on: bool) {
        self.engine_on = on;
    }

    pub fn engine_on(&self) -> bool {
        self.engine_on
    }

    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    /// One flight step: forces, torques, integration, pose readback, and
    /// crash/water detection. `ground_height` is the heightfield's center
    /// sample from the last terrain sync.
    pub fn step(
        &mut self,
        physics: &mut PhysicsWorld,
        controls: &ControlInputs,
        ground_height: f32,
        dt: f32,
    ) -> Option<FlightEvent> {
        let dt = dt.max(MIN_DELTA_SECONDS);

        let velocity = physics.body_linear_velocity(self.body);
        let position = physics.body_position(self.body);
        let rotation = physics.body_rotation(self.body);
        let speed = velocity.length();

        // Control authority grows linearly with airspeed.
        let authority = speed / self.tuning.max_speed;
        let a_pitch = self.tuning.pitch_accel * authority;
        let a_yaw = self.tuning.yaw_accel * authority;
        let a_roll = self.tuning.roll_accel * authority;

        if speed > SPEED_EPSILON {
            let drag = self.tuning.drag_coefficient * speed * speed;
            physics.apply_force(self.body, -(velocity / speed) * drag);
        }

        self.on_ground = position.y <= ground_height + self.tuning.ground_tolerance;

        let mut any_control = false;
        if controls.enabled && self.engine_on && !self.on_ground {
            if controls.turn_left {
                any_control = true;
                physics.apply_local_torque(self.body, Vec3::Y * (self.inertia.y * a_yaw));
                physics.apply_local_torque(self.body, Vec3::Z * (self.inertia.z * a_roll));
                self.apply_skid(physics, rotation, Vec3::new(-1.0, 0.0, -0.5));
            }
            if controls.turn_right {
                any_control = true;
                physics.apply_local_torque(self.body, Vec3::NEG_Y * (self.inertia.y * a_yaw));
                physics.apply_local_torque(self.body, Vec3::NEG_Z * (self.inertia.z * a_roll));
                self.apply_skid(physics, rotation, Vec3::new(1.0, 0.0, -0.5));
            }
            if controls.pitch_up {
                any_control = true;
                physics.apply_local_torque(self.body, Vec3::X * (self.inertia.x * a_pitch));
                self.apply_pitch_lift(physics, rotation, speed, Vec3::NEG_Y);
            }
            if controls.pitch_down {
                any_control = true;
                physics.apply_local_torque(self.body, Vec3::NEG_X * (self.inertia.x * a_pitch));
                self.apply_pitch_lift(physics, rotation, speed, Vec3::Y);
            }
        }

        if !any_control {
            // Wings-level stabilizer: proportional torque on the roll axis
            // only. Pitch is left free.
            let right_w = rotation * Vec3::X;
            let forward_w = rotation * Vec3::NEG_Z;
            let roll_torque = forward_w * (right_w.y * self.tuning.roll_stability_gain);
            physics.apply_torque(self.body, roll_torque);
        }

        // Gravity stands in for lift above takeoff speed.
        if self.engine_on && speed > self.tuning.takeoff_speed {
            physics.set_gravity_y(0.0);
        } else {
            physics.set_gravity_y(-self.tuning.gravity);
        }

        if self.engine_on {
            physics.apply_local_force(self.body, Vec3::NEG_Z * self.tuning.thrust);
            if controls.enabled && controls.boost {
                physics.apply_local_force(
                    self.body,
                    Vec3::NEG_Z * (self.tuning.thrust * self.tuning.boost_thrust_multiplier),
                );
            }
        }

        if speed > self.tuning.max_speed {
            physics.clear_forces(self.body);
        }

        physics.step(dt);

        self.position = physics.body_position(self.body);
        self.orientation = physics.body_rotation(self.body);
        self.velocity = physics.body_linear_velocity(self.body);

        // A hard impact needs airspeed; contact spikes from a parked craft
        // settling onto the terrain stay below takeoff speed and are ignored.
        if speed > self.tuning.takeoff_speed {
            let impact = physics.max_contact_force(self.collider, dt);
            if impact > self.tuning.crash_force_threshold {
                self.engine_on = false;
                return Some(FlightEvent::HardImpact);
            }
        }

        if self.position.y < self.water_level - self.tuning.water_margin {
            self.engine_on = false;
            return Some(FlightEvent::Splashdown);
        }

        None
    }

    fn apply_skid(&self, physics: &mut PhysicsWorld, rotation: Quat, local_dir: Vec3) {
        let world_dir = rotation * local_dir.normalize();
        physics.apply_force(self.body, world_dir * self.tuning.skid_force);
    }

    /// Dynamic-pressure force paired with a pitch input:
    /// 0.5 * rho * v^2 * wing area * lift coefficient along a body-local
    /// vertical axis. Nose-up pairs with the negative axis, nose-down with the
    /// positive one, which is what makes pitching rotate the craft before it
    /// translates.
    fn apply_pitch_lift(
        &self,
        physics: &mut PhysicsWorld,
        rotation: Quat,
        speed: f32,
        local_axis: Vec3,
    ) {
        let magnitude = 0.5
            * self.tuning.air_density
            * speed
            * speed
            * self.tuning.wing_area
            * self.tuning.lift_coefficient;
        physics.apply_force(self.body, (rotation * local_axis) * magnitude);
    }
}
