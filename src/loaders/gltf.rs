use anyhow::{ensure, Context, Result};
use glam::{Mat3, Mat4, Vec3};
use std::path::Path;

use super::texture::TextureData;
use crate::mesh::{compute_normals, MeshData};
use crate::types::Vertex;

/// A glTF file flattened into CPU meshes
///
/// `meshes` is indexed by glTF mesh, then holds one entry per triangle
/// primitive so each keeps its own material texture. Node transforms are
/// baked into the vertices, so every mesh sits in the file's model space.
#[derive(Debug, Clone)]
pub struct ModelData {
    pub name: String,
    pub meshes: Vec<Vec<MeshData>>,
}

impl ModelData {
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().flatten().map(MeshData::triangle_count).sum()
    }

    pub fn primitive_count(&self) -> usize {
        self.meshes.iter().map(Vec::len).sum()
    }
}

/// Load a glTF model and bake its scene graph
pub fn load_model(path: impl AsRef<Path>) -> Result<ModelData> {
    let path = path.as_ref();
    let (document, buffers, images) =
        gltf::import(path).with_context(|| format!("Failed to load glTF file: {:?}", path))?;

    let textures: Vec<TextureData> = images.iter().map(TextureData::from_gltf_image).collect();
    let mut meshes = vec![Vec::new(); document.meshes().count()];

    let scenes: Vec<gltf::Scene> = match document.default_scene() {
        Some(scene) => vec![scene],
        None => document.scenes().collect(),
    };
    for scene in scenes {
        for node in scene.nodes() {
            bake_node(&node, &buffers, &textures, &Mat4::IDENTITY, &mut meshes)?;
        }
    }

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let model = ModelData { name, meshes };
    ensure!(
        model.triangle_count() > 0,
        "No triangles found in glTF file: {:?}",
        path
    );

    log::info!(
        "Loaded model '{}': {} meshes, {} primitives, {} triangles, {} textures",
        model.name,
        model.meshes.len(),
        model.primitive_count(),
        model.triangle_count(),
        textures.len()
    );
    Ok(model)
}

fn bake_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    textures: &[TextureData],
    parent: &Mat4,
    meshes: &mut [Vec<MeshData>],
) -> Result<()> {
    let transform = *parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            let baked = bake_primitive(&primitive, buffers, textures, &transform)
                .with_context(|| format!("Bad primitive in mesh {:?}", mesh.name()))?;
            if !baked.is_empty() {
                meshes[mesh.index()].push(baked);
            }
        }
    }

    for child in node.children() {
        bake_node(&child, buffers, textures, &transform, meshes)?;
    }

    Ok(())
}

fn bake_primitive(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    textures: &[TextureData],
    transform: &Mat4,
) -> Result<MeshData> {
    if primitive.mode() != gltf::mesh::Mode::Triangles {
        log::warn!("Skipping non-triangle primitive ({:?})", primitive.mode());
        return Ok(MeshData::default());
    }

    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|b| &b.0[..]));
    let positions: Vec<Vec3> = reader
        .read_positions()
        .context("Mesh primitive has no positions")?
        .map(|p| transform.transform_point3(Vec3::from_array(p)))
        .collect();

    let uvs: Vec<[f32; 2]> = match reader.read_tex_coords(0) {
        Some(uvs) => uvs.into_f32().collect(),
        None => vec![[0.0, 0.0]; positions.len()],
    };

    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    ensure!(
        indices.iter().all(|&i| (i as usize) < positions.len()),
        "Index out of range for {} vertices",
        positions.len()
    );

    let normal_matrix = Mat3::from_mat4(*transform).inverse().transpose();
    let normals: Option<Vec<Vec3>> = reader.read_normals().map(|normals| {
        normals
            .map(|n| (normal_matrix * Vec3::from_array(n)).normalize_or_zero())
            .collect()
    });

    let mut vertices: Vec<Vertex> = positions
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let normal = normals.as_ref().map_or(Vec3::ZERO, |n| n[i]);
            let uv = uvs.get(i).copied().unwrap_or([0.0, 0.0]);
            Vertex::new(p.to_array(), normal.to_array(), uv)
        })
        .collect();
    if normals.is_none() {
        compute_normals(&mut vertices, &indices);
    }

    let texture = primitive
        .material()
        .pbr_metallic_roughness()
        .base_color_texture()
        .and_then(|info| textures.get(info.texture().source().index()))
        .cloned();

    Ok(MeshData {
        vertices,
        indices,
        texture,
    })
}
