use glam::Vec3;
use room_viewer::loaders::load_model;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_one_mesh_per_gltf_mesh() {
    let model = load_model(fixture("two_triangles.gltf")).unwrap();

    assert_eq!(model.name, "two_triangles");
    assert_eq!(model.meshes.len(), 2);
    assert_eq!(model.primitive_count(), 2);
    assert_eq!(model.triangle_count(), 2);
    assert_eq!(model.meshes[0][0].indices, vec![0, 1, 2]);
}

#[test]
fn test_node_transforms_baked() {
    let model = load_model(fixture("two_triangles.gltf")).unwrap();

    // Mesh 0 sits on a node translated 5 along +Z
    let near: Vec<Vec3> = model.meshes[0][0]
        .vertices
        .iter()
        .map(|v| Vec3::from_array(v.position))
        .collect();
    assert_eq!(near, vec![Vec3::new(0.0, 0.0, 5.0), Vec3::new(1.0, 0.0, 5.0), Vec3::new(0.0, 1.0, 5.0)]);

    // Mesh 1 sits on a node scaled by 2
    assert_eq!(model.meshes[1][0].vertices[1].position, [2.0, 0.0, 0.0]);
}

#[test]
fn test_missing_normals_are_generated() {
    let model = load_model(fixture("two_triangles.gltf")).unwrap();
    for mesh in model.meshes.iter().flatten() {
        for vertex in &mesh.vertices {
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
        }
    }
}

#[test]
fn test_texcoords_read_when_present() {
    let model = load_model(fixture("two_triangles.gltf")).unwrap();
    let uvs: Vec<[f32; 2]> = model.meshes[0][0].vertices.iter().map(|v| v.uv).collect();
    assert_eq!(uvs, vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);

    // The second mesh has no TEXCOORD_0
    assert!(model.meshes[1][0].vertices.iter().all(|v| v.uv == [0.0, 0.0]));
    assert!(model.meshes.iter().flatten().all(|m| m.texture.is_none()));
}

#[test]
fn test_each_primitive_keeps_its_texture() {
    let model = load_model(fixture("two_materials.gltf")).unwrap();

    assert_eq!(model.meshes.len(), 1);
    assert_eq!(model.primitive_count(), 2);
    assert_eq!(model.triangle_count(), 2);

    let colors: Vec<Vec<u8>> = model.meshes[0]
        .iter()
        .map(|primitive| {
            let texture = primitive.texture.as_ref().expect("primitive lost its texture");
            assert_eq!((texture.width, texture.height), (1, 1));
            texture.rgba.clone()
        })
        .collect();
    assert_eq!(colors, vec![vec![255, 0, 0, 255], vec![0, 0, 255, 255]]);
}

#[test]
fn test_missing_model_reports_path() {
    let err = load_model(fixture("absent.gltf")).unwrap_err();
    assert!(format!("{:#}", err).contains("absent.gltf"));
}
