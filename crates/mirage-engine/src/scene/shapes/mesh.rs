use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::coords::Rect;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Vertex layout shared by every mesh (matches `mesh.wgsl`).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Indexed triangle mesh in model space.
///
/// Meshes are shared through `Arc`; the renderer keeps one GPU copy per
/// live `Arc`, so build a mesh once and reuse it across frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        debug_assert!(indices.len() % 3 == 0);
        debug_assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
        Self { vertices, indices }
    }

    /// Unindexed triangle soup: positions/uvs taken three at a time, with one
    /// flat normal per triangle.
    pub fn from_triangles(positions: &[Vec3], uvs: &[[f32; 2]]) -> Self {
        debug_assert_eq!(positions.len(), uvs.len());
        let mut vertices = Vec::with_capacity(positions.len());
        for (tri, tri_uv) in positions.chunks_exact(3).zip(uvs.chunks_exact(3)) {
            let normal = (tri[1] - tri[0]).cross(tri[2] - tri[0]).normalize_or_zero();
            for (p, uv) in tri.iter().zip(tri_uv) {
                vertices.push(MeshVertex {
                    position: p.to_array(),
                    normal: normal.to_array(),
                    uv: *uv,
                });
            }
        }
        let indices = (0..vertices.len() as u32).collect();
        Self { vertices, indices }
    }

    /// Latitude/longitude sphere centred on the origin.
    pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);

        let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
        for ring in 0..=rings {
            let v = ring as f32 / rings as f32;
            let theta = v * std::f32::consts::PI;
            for seg in 0..=segments {
                let u = seg as f32 / segments as f32;
                let phi = u * std::f32::consts::TAU;
                let n = Vec3::new(-phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin());
                vertices.push(MeshVertex {
                    position: (n * radius).to_array(),
                    normal: n.to_array(),
                    uv: [u, 1.0 - v],
                });
            }
        }

        let stride = segments + 1;
        let mut indices = Vec::with_capacity((segments * rings * 6) as usize);
        for ring in 0..rings {
            for seg in 0..segments {
                let a = ring * stride + seg;
                let b = a + stride;
                if ring != 0 {
                    indices.extend_from_slice(&[a, b, a + 1]);
                }
                if ring != rings - 1 {
                    indices.extend_from_slice(&[a + 1, b, b + 1]);
                }
            }
        }

        Self { vertices, indices }
    }
}

/// Procedural surface detail evaluated per fragment from the mesh UVs.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum SurfacePattern {
    #[default]
    Plain,
    /// Wood planks: a light/dark gradient across u, darker seams every
    /// eighth of a tile along v, and fine grain noise.
    Wood,
    /// Low-amplitude plaster noise.
    Plaster,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub base_color: Color,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub pattern: SurfacePattern,
    /// Pattern tiling across the 0..1 UV range.
    pub uv_repeat: [f32; 2],
}

impl Material {
    pub fn plain(base_color: Color) -> Self {
        Self {
            base_color,
            emissive: Color::BLACK,
            emissive_intensity: 0.0,
            pattern: SurfacePattern::Plain,
            uv_repeat: [1.0, 1.0],
        }
    }

    pub fn with_pattern(self, pattern: SurfacePattern, uv_repeat: [f32; 2]) -> Self {
        Self { pattern, uv_repeat, ..self }
    }

    pub fn with_emissive(self, emissive: Color, intensity: f32) -> Self {
        Self { emissive, emissive_intensity: intensity, ..self }
    }
}

/// Light rig for a mesh pass. Colours are linear; intensities multiply them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Lighting {
    pub ambient: f32,
    pub hemisphere_sky: Color,
    pub hemisphere_ground: Color,
    pub hemisphere_intensity: f32,
    pub point_position: Vec3,
    pub point_intensity: f32,
    /// Distance at which the point light has faded to zero.
    pub point_range: f32,
    /// Direction the light comes *from* (need not be normalized).
    pub directional_from: Vec3,
    pub directional_intensity: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: 1.0,
            hemisphere_sky: Color::WHITE,
            hemisphere_ground: Color::BLACK,
            hemisphere_intensity: 0.0,
            point_position: Vec3::ZERO,
            point_intensity: 0.0,
            point_range: 1.0,
            directional_from: Vec3::Y,
            directional_intensity: 0.0,
        }
    }
}

/// Linear fog blended towards `color` between view-space depths `near` and
/// `far`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Fog {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}

/// One mesh instance inside a [`MeshCmd`].
#[derive(Debug, Clone)]
pub struct MeshDraw {
    pub mesh: Arc<Mesh>,
    pub translation: Vec3,
    pub material: Material,
}

impl PartialEq for MeshDraw {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.mesh, &other.mesh)
            && self.translation == other.translation
            && self.material == other.material
    }
}

/// A self-contained 3D pass drawn into `rect` with its own depth buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshCmd {
    /// Target area in logical pixels; the pass viewport and scissor.
    pub rect: Rect,
    pub view_proj: Mat4,
    pub eye: Vec3,
    pub lighting: Lighting,
    pub fog: Option<Fog>,
    pub draws: Vec<MeshDraw>,
}

impl DrawList {
    /// Records a 3D pass. Nothing else can interleave with its depth buffer,
    /// so 2D items at the same z land before or after it as a whole.
    #[inline]
    pub fn push_mesh(&mut self, z: ZIndex, cmd: MeshCmd) {
        self.push(z, DrawCmd::Mesh(cmd));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let mesh = Mesh::uv_sphere(0.5, 16, 8);
        for v in &mesh.vertices {
            let len = Vec3::from_array(v.position).length();
            assert!((len - 0.5).abs() < 1e-5, "{len}");
        }
        assert_eq!(mesh.indices.len() % 3, 0);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn sphere_skips_degenerate_pole_triangles() {
        let (segments, rings) = (16, 8);
        let mesh = Mesh::uv_sphere(1.0, segments, rings);
        // Two triangles per quad, minus one per quad on each pole ring.
        let expected = (segments * rings * 2 - 2 * segments) * 3;
        assert_eq!(mesh.indices.len() as u32, expected);
    }

    #[test]
    fn triangle_soup_gets_flat_normals() {
        let mesh = Mesh::from_triangles(
            &[Vec3::ZERO, Vec3::X, Vec3::Y],
            &[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
        );
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        for v in &mesh.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }
}
