//! Scene collaborator surface for gemflight.
//!
//! This crate is the narrow contract the gameplay core talks to instead of a
//! renderer: named instances with mutable world transforms, a dynamic vertex
//! buffer with an explicit pack-to-wire-format upload step, and camera state.
//! Pipeline setup, passes and asset decoding live behind this boundary and are
//! not part of this workspace.

pub mod camera;
pub mod graph;
pub mod mesh;

pub use camera::Camera;
pub use graph::{SceneError, SceneGraph};
pub use mesh::DynamicMesh;
