//! Physics for gemflight, built on Rapier3D.

pub mod physics_world;

pub use physics_world::PhysicsWorld;

// Re-export handle types used across crate boundaries.
pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};
