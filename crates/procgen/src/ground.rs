//! Dynamic ground geometry.
//!
//! The ground mesh is a fixed template grid that follows the craft: every frame
//! the template is restored, heights are re-sampled at world coordinates derived
//! from the craft's XZ, and normals/tangents are rebuilt from scratch. Restoring
//! from the template each frame avoids numerical drift from mutating
//! already-mutated data. The physics heightfield is refilled from the same
//! sampler around the same center.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::sampler::TerrainSampler;

/// Ground vertex layout: position, normal, UV and a tangent whose `w` stores
/// the bitangent handedness (+1/-1).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GroundVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub tangent: [f32; 4],
}

/// Renderable ground grid with a pristine template kept for per-frame restore.
pub struct GroundMesh {
    /// Pristine template vertices (flat grid, local space). Never mutated.
    template: Vec<GroundVertex>,
    /// Working vertices, rewritten every frame.
    vertices: Vec<GroundVertex>,
    indices: Vec<u32>,
    resolution: usize,
    /// Baked world scale of the ground instance (basis-vector lengths).
    base_scale: Vec3,
}

impl GroundMesh {
    /// Build a flat `resolution` x `resolution` template grid spanning
    /// `local_extent` units in local X and Z, centered on the origin.
    pub fn plane(resolution: usize, local_extent: f32, base_scale: Vec3) -> Self {
        assert!(resolution >= 2, "ground grid needs at least 2x2 vertices");
        let step = local_extent / (resolution - 1) as f32;
        let half = local_extent / 2.0;

        let mut template = Vec::with_capacity(resolution * resolution);
        for z in 0..resolution {
            for x in 0..resolution {
                template.push(GroundVertex {
                    position: [x as f32 * step - half, 0.0, z as f32 * step - half],
                    normal: [0.0, 1.0, 0.0],
                    uv: [
                        x as f32 / (resolution - 1) as f32,
                        z as f32 / (resolution - 1) as f32,
                    ],
                    tangent: [1.0, 0.0, 0.0, 1.0],
                });
            }
        }

        let mut indices = Vec::with_capacity((resolution - 1) * (resolution - 1) * 6);
        for z in 0..(resolution - 1) {
            for x in 0..(resolution - 1) {
                let top_left = (z * resolution + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * resolution + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.push(top_left);
                indices.push(bottom_left);
                indices.push(top_right);

                indices.push(top_right);
                indices.push(bottom_left);
                indices.push(bottom_right);
            }
        }

        Self {
            vertices: template.clone(),
            template,
            indices,
            resolution,
            base_scale,
        }
    }

    pub fn vertices(&self) -> &[GroundVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn base_scale(&self) -> Vec3 {
        self.base_scale
    }

    /// Regenerate heights, normals and tangents around `center_xz`.
    ///
    /// Template positions/UVs are local space; a vertex's world XZ is its local
    /// XZ times the baked scale plus the craft offset. Heights are written back
    /// in local units (the instance transform re-applies the scale).
    pub fn regenerate(&mut self, sampler: &TerrainSampler, center_xz: Vec2) {
        self.vertices.copy_from_slice(&self.template);

        for v in &mut self.vertices {
            let world_x = v.position[0] * self.base_scale.x + center_xz.x;
            let world_z = v.position[2] * self.base_scale.z + center_xz.y;
            v.position[1] = sampler.surface_height(world_x, world_z) / self.base_scale.y;
        }

        self.rebuild_tangent_basis();
    }

    /// Accumulate face normals and UV-derived tangents/bitangents over every
    /// triangle, then per vertex: normalize the normal, Gram-Schmidt the
    /// tangent against it, and derive handedness from the bitangent.
    fn rebuild_tangent_basis(&mut self) {
        let count = self.vertices.len();
        let mut n_accum = vec![Vec3::ZERO; count];
        let mut t_accum = vec![Vec3::ZERO; count];
        let mut b_accum = vec![Vec3::ZERO; count];

        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);

            let p0 = Vec3::from(self.vertices[i0].position);
            let p1 = Vec3::from(self.vertices[i1].position);
            let p2 = Vec3::from(self.vertices[i2].position);

            let uv0 = Vec2::from(self.vertices[i0].uv);
            let uv1 = Vec2::from(self.vertices[i1].uv);
            let uv2 = Vec2::from(self.vertices[i2].uv);

            let edge1 = p1 - p0;
            let edge2 = p2 - p0;
            let face_n = edge1.cross(edge2).normalize();

            n_accum[i0] += face_n;
            n_accum[i1] += face_n;
            n_accum[i2] += face_n;

            let duv1 = uv1 - uv0;
            let duv2 = uv2 - uv0;
            let r = 1.0 / (duv1.x * duv2.y - duv2.x * duv1.y);
            let tangent = (edge1 * duv2.y - edge2 * duv1.y) * r;
            let bitangent = (edge2 * duv1.x - edge1 * duv2.x) * r;

            for i in [i0, i1, i2] {
                t_accum[i] += tangent;
                b_accum[i] += bitangent;
            }
        }

        for (i, v) in self.vertices.iter_mut().enumerate() {
            let n = n_accum[i].normalize();
            let t = t_accum[i];
            let t = (t - n * n.dot(t)).normalize();
            let handedness = if n.cross(t).dot(b_accum[i]) < 0.0 {
                -1.0
            } else {
                1.0
            };
            v.normal = n.to_array();
            v.tangent = [t.x, t.y, t.z, handedness];
        }
    }
}

/// Fixed-resolution height sample grid for the physics heightfield, rebuilt
/// every frame centered on the craft. Heights are world-space.
pub struct HeightfieldSamples {
    rows: usize,
    cols: usize,
    cell_size: f32,
    heights: Vec<f32>,
}

impl HeightfieldSamples {
    pub fn new(rows: usize, cols: usize, cell_size: f32) -> Self {
        assert!(rows >= 2 && cols >= 2, "heightfield needs at least 2x2 samples");
        Self {
            rows,
            cols,
            cell_size,
            heights: vec![0.0; rows * cols],
        }
    }

    /// Refill every sample around (`center_x`, `center_z`). Must run every
    /// frame: the grid is small, and a craft outside it would fall through
    /// unswept terrain.
    pub fn rebuild(&mut self, sampler: &TerrainSampler, center_x: f32, center_z: f32) {
        let half_cols = (self.cols / 2) as isize;
        let half_rows = (self.rows / 2) as isize;

        // Offsets are taken from the center sample so the grid center lands on
        // the craft's exact coordinates.
        for rz in 0..self.rows {
            for cx in 0..self.cols {
                let wx = center_x + (cx as isize - half_cols) as f32 * self.cell_size;
                let wz = center_z + (rz as isize - half_rows) as f32 * self.cell_size;
                self.heights[rz * self.cols + cx] = sampler.surface_height(wx, wz);
            }
        }
    }

    /// The ground reference height: the sample at the exact grid center.
    pub fn ground_height(&self) -> f32 {
        self.heights[(self.rows / 2) * self.cols + self.cols / 2]
    }

    /// Row-major samples (index = row * cols + col, rows along Z).
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total grid extent along world X.
    pub fn extent_x(&self) -> f32 {
        self.cols as f32 * self.cell_size
    }

    /// Total grid extent along world Z.
    pub fn extent_z(&self) -> f32 {
        self.rows as f32 * self.cell_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::SamplerParams;

    fn sampler() -> TerrainSampler {
        TerrainSampler::new(SamplerParams::default())
    }

    /// Mesh deformation and direct sampling must agree exactly (path invariance).
    #[test]
    fn mesh_heights_match_the_sampler() {
        let sampler = sampler();
        let scale = Vec3::new(4.0, 5.0, 4.0);
        let mut mesh = GroundMesh::plane(17, 16.0, scale);
        let center = Vec2::new(37.5, -12.25);
        mesh.regenerate(&sampler, center);

        for v in mesh.vertices() {
            let world_x = v.position[0] * scale.x + center.x;
            let world_z = v.position[2] * scale.z + center.y;
            let expected = sampler.surface_height(world_x, world_z) / scale.y;
            assert_eq!(v.position[1], expected);
        }
    }

    /// Heightfield samples and direct sampling must agree exactly (path invariance).
    #[test]
    fn heightfield_matches_the_sampler() {
        let sampler = sampler();
        let mut field = HeightfieldSamples::new(16, 16, 0.5);
        let (cx, cz) = (100.0, -40.0);
        field.rebuild(&sampler, cx, cz);

        for rz in 0..16 {
            for col in 0..16 {
                let expected = sampler.surface_height(
                    cx + (col as isize - 8) as f32 * 0.5,
                    cz + (rz as isize - 8) as f32 * 0.5,
                );
                assert_eq!(field.heights()[rz * 16 + col], expected);
            }
        }
    }

    /// After a rebuild centered on the craft, the ground reference height is
    /// the sampler's output at the craft's exact XZ.
    #[test]
    fn center_sample_is_the_ground_reference() {
        let sampler = sampler();
        let mut field = HeightfieldSamples::new(32, 32, 0.1);
        field.rebuild(&sampler, 12.0, 34.0);
        assert_eq!(field.ground_height(), sampler.surface_height(12.0, 34.0));
    }

    #[test]
    fn regenerate_is_drift_free() {
        let sampler = sampler();
        let mut mesh = GroundMesh::plane(9, 8.0, Vec3::ONE);
        let center = Vec2::new(3.0, 4.0);
        mesh.regenerate(&sampler, center);
        let first: Vec<GroundVertex> = mesh.vertices().to_vec();
        // Move away and back: restoring from the template must reproduce the
        // first result bit for bit.
        mesh.regenerate(&sampler, Vec2::new(-50.0, 80.0));
        mesh.regenerate(&sampler, center);
        assert_eq!(mesh.vertices(), first.as_slice());
    }

    #[test]
    fn normals_are_unit_and_tangents_orthogonal() {
        let sampler = sampler();
        let mut mesh = GroundMesh::plane(17, 16.0, Vec3::new(4.0, 5.0, 4.0));
        mesh.regenerate(&sampler, Vec2::new(7.0, 7.0));

        for v in mesh.vertices() {
            let n = Vec3::from(v.normal);
            let t = Vec3::new(v.tangent[0], v.tangent[1], v.tangent[2]);
            assert!((n.length() - 1.0).abs() < 1e-4);
            assert!((t.length() - 1.0).abs() < 1e-4);
            assert!(n.dot(t).abs() < 1e-4, "tangent must be orthogonal to normal");
            let w = v.tangent[3];
            assert!(w == 1.0 || w == -1.0);
        }
    }

    #[test]
    fn grid_indices_cover_all_cells() {
        let mesh = GroundMesh::plane(5, 4.0, Vec3::ONE);
        assert_eq!(mesh.indices().len(), 4 * 4 * 6);
        assert_eq!(mesh.vertices().len(), 25);
        let max = *mesh.indices().iter().max().unwrap();
        assert_eq!(max, 24);
    }
}
