//! Named scene instances.

use engine_core::Transform;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    /// A required named instance is missing. This is load-time configuration
    /// breakage, not a runtime condition the core tolerates.
    #[error("scene instance '{0}' not found")]
    InstanceNotFound(String),
}

/// Flat registry of named instances with mutable world transforms. This is the
/// lookup surface the gameplay core uses; instance meshes and materials are a
/// backend concern.
#[derive(Debug, Default)]
pub struct SceneGraph {
    instances: HashMap<String, Transform>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an instance. Replaces any previous transform under `id`.
    pub fn insert(&mut self, id: impl Into<String>, transform: Transform) {
        self.instances.insert(id.into(), transform);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.instances.contains_key(id)
    }

    pub fn transform(&self, id: &str) -> Result<&Transform, SceneError> {
        self.instances
            .get(id)
            .ok_or_else(|| SceneError::InstanceNotFound(id.to_string()))
    }

    pub fn transform_mut(&mut self, id: &str) -> Result<&mut Transform, SceneError> {
        self.instances
            .get_mut(id)
            .ok_or_else(|| SceneError::InstanceNotFound(id.to_string()))
    }
}
