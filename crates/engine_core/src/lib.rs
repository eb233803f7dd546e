//! Core types shared across the gemflight systems:
//! - Transform and spatial math
//! - Frame time management
//! - The smoothing laws used by the camera, rotor and audio derivation

pub mod smoothing;
pub mod time;
pub mod transform;

pub use smoothing::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
