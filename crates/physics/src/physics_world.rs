//! Physics world management with Rapier3D.
//!
//! All Rapier sets live inside [`PhysicsWorld`], so dropping it tears down
//! bodies, colliders and pipeline state together in dependency order.

use engine_core::Transform;
use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::*;

/// Main physics world containing all simulation state.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create a new physics world with default gravity.
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![0.0, -9.81, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Set the world gravity along Y.
    pub fn set_gravity_y(&mut self, g: f32) {
        self.gravity = vector![0.0, g, 0.0];
    }

    pub fn gravity_y(&self) -> f32 {
        self.gravity.y
    }

    /// Step the simulation by exactly `dt` seconds (no sub-stepping).
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Add the craft: a dynamic body with box-distributed mass.
    /// `box_extents` are the full collision-box dimensions; `mass` is spread
    /// over that box, giving the diagonal inertia of a cuboid.
    pub fn add_craft_body(
        &mut self,
        position: Vec3,
        box_extents: Vec3,
        mass: f32,
        linear_damping: f32,
        angular_damping: f32,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y, position.z])
            .linear_damping(linear_damping)
            .angular_damping(angular_damping)
            .build();
        let body_handle = self.rigid_body_set.insert(body);

        let collider = ColliderBuilder::cuboid(
            box_extents.x / 2.0,
            box_extents.y / 2.0,
            box_extents.z / 2.0,
        )
        .mass(mass)
        .friction(0.9)
        .restitution(0.0)
        .build();
        let collider_handle =
            self.collider_set
                .insert_with_parent(collider, body_handle, &mut self.rigid_body_set);

        (body_handle, collider_handle)
    }

    /// Create the terrain heightfield collider from world-space samples.
    /// - `heights`: row-major (index = row * ncols + col), rows along Z.
    /// - `size_x`, `size_z`: total extent in world units, centered on the translation.
    pub fn add_terrain_heightfield(
        &mut self,
        heights: &[f32],
        nrows: usize,
        ncols: usize,
        size_x: f32,
        size_z: f32,
        center_x: f32,
        center_z: f32,
    ) -> ColliderHandle {
        assert!(
            nrows >= 2 && ncols >= 2,
            "Terrain heightfield must have at least 2 rows and columns"
        );
        assert!(
            heights.len() >= nrows * ncols,
            "Heights slice too small for {}x{} grid",
            nrows,
            ncols
        );

        let heights_matrix = DMatrix::from_fn(nrows, ncols, |i, j| heights[i * ncols + j] as Real);
        let scale = vector![size_x, 1.0, size_z];

        let collider = ColliderBuilder::heightfield(heights_matrix, scale)
            .translation(vector![center_x, 0.0, center_z])
            .friction(0.9)
            .restitution(0.0)
            .build();
        self.collider_set.insert(collider)
    }

    /// Rebuild the heightfield shape in place and re-center it under the craft.
    /// Must run every frame while the craft moves; a stale patch lets the craft
    /// fall through unswept terrain.
    pub fn update_terrain_heightfield(
        &mut self,
        handle: ColliderHandle,
        heights: &[f32],
        nrows: usize,
        ncols: usize,
        size_x: f32,
        size_z: f32,
        center_x: f32,
        center_z: f32,
    ) {
        if let Some(collider) = self.collider_set.get_mut(handle) {
            let heights_matrix =
                DMatrix::from_fn(nrows, ncols, |i, j| heights[i * ncols + j] as Real);
            let scale = vector![size_x, 1.0, size_z];
            collider.set_shape(SharedShape::heightfield(heights_matrix, scale));
            collider.set_translation(vector![center_x, 0.0, center_z]);
        }
    }

    /// World position of a collider (heightfield center, for re-center checks).
    pub fn collider_translation(&self, handle: ColliderHandle) -> Option<Vec3> {
        self.collider_set.get(handle).map(|c| {
            let t = c.translation();
            Vec3::new(t.x, t.y, t.z)
        })
    }

    // ── Body access ────────────────────────────────────────────────────────

    pub fn body_position(&self, handle: RigidBodyHandle) -> Vec3 {
        let body = &self.rigid_body_set[handle];
        let t = body.translation();
        Vec3::new(t.x, t.y, t.z)
    }

    pub fn body_rotation(&self, handle: RigidBodyHandle) -> Quat {
        let r = self.rigid_body_set[handle].rotation();
        Quat::from_xyzw(r.i, r.j, r.k, r.w)
    }

    pub fn body_linear_velocity(&self, handle: RigidBodyHandle) -> Vec3 {
        let v = self.rigid_body_set[handle].linvel();
        Vec3::new(v.x, v.y, v.z)
    }

    /// Pose readback as an engine transform (unit scale).
    pub fn body_transform(&self, handle: RigidBodyHandle) -> Transform {
        Transform::from_position_rotation(self.body_position(handle), self.body_rotation(handle))
    }

    /// Teleport a body, clearing its velocities (craft pose latch, tests).
    pub fn set_body_pose(&mut self, handle: RigidBodyHandle, position: Vec3, rotation: Quat) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_translation(vector![position.x, position.y, position.z], true);
            body.set_rotation(
                UnitQuaternion::from_quaternion(Quaternion::new(
                    rotation.w, rotation.x, rotation.y, rotation.z,
                )),
                true,
            );
            body.set_linvel(vector![0.0, 0.0, 0.0], true);
            body.set_angvel(vector![0.0, 0.0, 0.0], true);
        }
    }

    /// Add a world-space force for this step.
    pub fn apply_force(&mut self, handle: RigidBodyHandle, force: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.add_force(vector![force.x, force.y, force.z], true);
        }
    }

    /// Add a body-local force, rotated into world space.
    pub fn apply_local_force(&mut self, handle: RigidBodyHandle, local_force: Vec3) {
        let world = self.body_rotation(handle) * local_force;
        self.apply_force(handle, world);
    }

    /// Add a world-space torque for this step.
    pub fn apply_torque(&mut self, handle: RigidBodyHandle, torque: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.add_torque(vector![torque.x, torque.y, torque.z], true);
        }
    }

    /// Add a body-local torque, rotated into world space.
    pub fn apply_local_torque(&mut self, handle: RigidBodyHandle, local_torque: Vec3) {
        let world = self.body_rotation(handle) * local_torque;
        self.apply_torque(handle, world);
    }

    /// Clear the forces accumulated on a body this step (torques are kept).
    pub fn clear_forces(&mut self, handle: RigidBodyHandle) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.reset_forces(true);
        }
    }

    /// Largest contact force magnitude touching `collider` after the last
    /// step, recovered from the frame-scoped contact manifolds (normal impulse
    /// over the step size). Returns 0.0 with no contacts.
    pub fn max_contact_force(&self, collider: ColliderHandle, dt: f32) -> f32 {
        let mut max: f32 = 0.0;
        for pair in self.narrow_phase.contact_pairs_with(collider) {
            for manifold in &pair.manifolds {
                for point in &manifold.points {
                    max = max.max(point.data.impulse / dt);
                }
            }
        }
        max
    }

    /// Remove a rigid body and its colliders.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn craft_body_reports_its_pose() {
        let mut world = PhysicsWorld::new();
        let (body, _) = world.add_craft_body(
            Vec3::new(1.0, 20.0, -3.0),
            Vec3::new(2.0, 0.5, 3.0),
            80.0,
            0.005,
            0.5,
        );
        assert_eq!(world.body_position(body), Vec3::new(1.0, 20.0, -3.0));
        assert_eq!(world.body_linear_velocity(body), Vec3::ZERO);
    }

    #[test]
    fn heightfield_recenters_to_the_requested_position() {
        let mut world = PhysicsWorld::new();
        let heights = vec![0.0; 16];
        let handle = world.add_terrain_heightfield(&heights, 4, 4, 4.0, 4.0, 0.0, 0.0);
        world.update_terrain_heightfield(handle, &heights, 4, 4, 4.0, 4.0, 12.5, -8.0);
        let t = world.collider_translation(handle).unwrap();
        assert_eq!(t, Vec3::new(12.5, 0.0, -8.0));
    }

    #[test]
    fn free_fall_accelerates_downward() {
        let mut world = PhysicsWorld::new();
        let (body, _) = world.add_craft_body(
            Vec3::new(0.0, 100.0, 0.0),
            Vec3::new(2.0, 0.5, 3.0),
            80.0,
            0.0,
            0.0,
        );
        for _ in 0..10 {
            world.step(1.0 / 60.0);
        }
        assert!(world.body_linear_velocity(body).y < -1.0);
        assert!(world.body_position(body).y < 100.0);
    }

    #[test]
    fn zero_gravity_preserves_vertical_velocity() {
        let mut world = PhysicsWorld::new();
        let (body, _) = world.add_craft_body(
            Vec3::new(0.0, 100.0, 0.0),
            Vec3::new(2.0, 0.5, 3.0),
            80.0,
            0.0,
            0.0,
        );
        world.set_gravity_y(0.0);
        world.step(1.0 / 60.0);
        assert_eq!(world.body_linear_velocity(body).y, 0.0);
    }
}
