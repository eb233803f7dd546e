//! Dynamic vertex buffer with an explicit wire-format packing step.

use bytemuck::Pod;

/// CPU-side mesh whose vertices are rewritten every frame. Typed vertex math
/// stays typed; bytes exist only after [`DynamicMesh::upload`], which is the
/// single point where a backend would copy to GPU memory.
pub struct DynamicMesh<V: Pod> {
    vertices: Vec<V>,
    indices: Vec<u32>,
    packed: Vec<u8>,
    /// Bumped on every upload so a backend can detect stale GPU copies.
    generation: u64,
}

impl<V: Pod> DynamicMesh<V> {
    pub fn new(indices: Vec<u32>) -> Self {
        Self {
            vertices: Vec::new(),
            indices,
            packed: Vec::new(),
            generation: 0,
        }
    }

    /// Replace the vertex data and pack it to the wire format.
    pub fn upload(&mut self, vertices: &[V]) {
        self.vertices.clear();
        self.vertices.extend_from_slice(vertices);
        self.packed.clear();
        self.packed.extend_from_slice(bytemuck::cast_slice(vertices));
        self.generation += 1;
    }

    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Packed vertex bytes as last uploaded.
    pub fn packed_bytes(&self) -> &[u8] {
        &self.packed
    }

    /// Upload counter; unchanged bytes mean an unchanged generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
