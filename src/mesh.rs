use glam::Vec3;
use std::f32::consts::{PI, TAU};

use crate::loaders::TextureData;
use crate::types::Vertex;

/// CPU-side triangle mesh, ready for upload
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Base-color texture embedded with the mesh, if any
    pub texture: Option<TextureData>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

// Interleaved position/normal pairs, six triangles
#[rustfmt::skip]
const PYRAMID: [f32; 108] = [
    -4.0, 0.0, -4.0,  0.0, 4.0, -7.0,   4.0, 0.0, -4.0,  0.0, 4.0, -7.0,   0.0, 7.0, 0.0,  0.0, 4.0, -7.0,
    -4.0, 0.0,  4.0,  0.0, 4.0,  7.0,   4.0, 0.0,  4.0,  0.0, 4.0,  7.0,   0.0, 7.0, 0.0,  0.0, 4.0,  7.0,
    -4.0, 0.0, -4.0, -7.0, 4.0,  0.0,  -4.0, 0.0,  4.0, -7.0, 4.0,  0.0,   0.0, 7.0, 0.0, -7.0, 4.0,  0.0,
     4.0, 0.0, -4.0,  7.0, 4.0,  0.0,   4.0, 0.0,  4.0,  7.0, 4.0,  0.0,   0.0, 7.0, 0.0,  7.0, 4.0,  0.0,
    -4.0, 0.0, -4.0,  0.0,-1.0,  0.0,  -4.0, 0.0,  4.0,  0.0,-1.0,  0.0,   4.0, 0.0, -4.0,  0.0,-1.0,  0.0,
     4.0, 0.0,  4.0,  0.0,-1.0,  0.0,  -4.0, 0.0,  4.0,  0.0,-1.0,  0.0,   4.0, 0.0, -4.0,  0.0,-1.0,  0.0,
];

/// The spinning pyramid: four sloped faces and a two-triangle base
pub fn pyramid() -> MeshData {
    let vertices: Vec<Vertex> = PYRAMID
        .chunks_exact(6)
        .map(|v| {
            let normal = Vec3::new(v[3], v[4], v[5]).normalize();
            Vertex::new([v[0], v[1], v[2]], normal.to_array(), [0.0, 0.0])
        })
        .collect();
    let indices = (0..vertices.len() as u32).collect();

    MeshData {
        vertices,
        indices,
        texture: None,
    }
}

/// Latitude/longitude sphere centred on the origin
pub fn uv_sphere(radius: f32, slices: u32, stacks: u32) -> MeshData {
    let slices = slices.max(3);
    let stacks = stacks.max(2);
    let mut vertices = Vec::with_capacity(((slices + 1) * (stacks + 1)) as usize);

    for stack in 0..=stacks {
        let v = stack as f32 / stacks as f32;
        let phi = v * PI;
        for slice in 0..=slices {
            let u = slice as f32 / slices as f32;
            let theta = u * TAU;
            let normal = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            vertices.push(Vertex::new(
                (normal * radius).to_array(),
                normal.to_array(),
                [u, v],
            ));
        }
    }

    let ring = slices + 1;
    let mut indices = Vec::with_capacity((slices * stacks * 6) as usize);
    for stack in 0..stacks {
        for slice in 0..slices {
            let a = stack * ring + slice;
            let b = a + ring;
            indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }

    MeshData {
        vertices,
        indices,
        texture: None,
    }
}

/// Smooth vertex normals from face normals, for meshes shipped without them
pub fn compute_normals(vertices: &mut [Vertex], indices: &[u32]) {
    let mut accum = vec![Vec3::ZERO; vertices.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= vertices.len() || b >= vertices.len() || c >= vertices.len() {
            continue;
        }
        let p0 = Vec3::from_array(vertices[a].position);
        let p1 = Vec3::from_array(vertices[b].position);
        let p2 = Vec3::from_array(vertices[c].position);
        // Area-weighted: the cross product is left unnormalized
        let face = (p1 - p0).cross(p2 - p0);
        accum[a] += face;
        accum[b] += face;
        accum[c] += face;
    }

    for (vertex, normal) in vertices.iter_mut().zip(accum) {
        vertex.normal = normal.normalize_or_zero().to_array();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pyramid_has_six_triangles() {
        let mesh = pyramid();
        assert_eq!(mesh.vertices.len(), 18);
        assert_eq!(mesh.triangle_count(), 6);
        for vertex in &mesh.vertices {
            let n = Vec3::from_array(vertex.normal);
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_pyramid_apex_at_seven() {
        let top = pyramid()
            .vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::MIN, f32::max);
        assert_eq!(top, 7.0);
    }

    #[test]
    fn test_sphere_vertices_on_surface() {
        let mesh = uv_sphere(2.0, 16, 8);
        assert_eq!(mesh.vertices.len(), 17 * 9);
        assert_eq!(mesh.triangle_count(), 16 * 8 * 2);
        for vertex in &mesh.vertices {
            let p = Vec3::from_array(vertex.position);
            assert!((p.length() - 2.0).abs() < 1e-4);
        }
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn test_computed_normals_face_out_of_ccw_triangle() {
        let mut vertices = vec![
            Vertex::new([0.0, 0.0, 0.0], [0.0; 3], [0.0; 2]),
            Vertex::new([1.0, 0.0, 0.0], [0.0; 3], [0.0; 2]),
            Vertex::new([0.0, 1.0, 0.0], [0.0; 3], [0.0; 2]),
        ];
        compute_normals(&mut vertices, &[0, 1, 2]);
        for vertex in &vertices {
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
        }
    }

}
