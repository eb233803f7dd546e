//! Procedural terrain for gemflight.
//!
//! One deterministic noise sampler feeds three consumers — the renderable
//! ground mesh, the physics heightfield and object placement — so the visual
//! ground, the collision ground and gameplay never disagree about height.

pub mod ground;
pub mod sampler;

pub use ground::{GroundMesh, GroundVertex, HeightfieldSamples};
pub use sampler::{SamplerParams, TerrainSampler};
