use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use std::collections::HashMap;
use std::path::Path;

use crate::lighting::{LightSwitch, SceneLightingState, POINT1_POSITION, POINT2_POSITION};
use crate::loaders::{load_model, load_texture, ModelData, TextureData};
use crate::types::DrawUniform;

pub const CLEAR_COLOR: [f64; 3] = [0.18, 0.25, 0.22];
pub const SHININESS: f32 = 10.0;

/// Pyramid spin rate, degrees per second about its own Y axis
const PYRAMID_SPIN: f32 = -40.0;

/// The glTF models the room is furnished with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Room,
    Table,
    Vase,
    Chicken,
    Lamp,
    Teapot,
}

impl ModelKind {
    pub const ALL: [ModelKind; 6] = [
        ModelKind::Room,
        ModelKind::Table,
        ModelKind::Vase,
        ModelKind::Chicken,
        ModelKind::Lamp,
        ModelKind::Teapot,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ModelKind::Room => "room.gltf",
            ModelKind::Table => "table.gltf",
            ModelKind::Vase => "vase.gltf",
            ModelKind::Chicken => "chicken.gltf",
            ModelKind::Lamp => "lamp.gltf",
            ModelKind::Teapot => "teapot.gltf",
        }
    }
}

/// What a draw item renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Geometry {
    /// A whole model, or one of its meshes
    Model(ModelKind, Option<usize>),
    Pyramid,
    Sphere,
}

/// Which texture is bound for a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    Wood,
    Cloth,
    /// The 1x1 white texture
    None,
    /// Whatever base-color texture each mesh carries, white if it has none
    Embedded,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
    pub emissive: Vec3,
}

impl Material {
    /// Same color for ambient and diffuse response, no highlights
    pub fn matte(color: Vec3) -> Self {
        Self {
            ambient: color,
            diffuse: color,
            specular: Vec3::ZERO,
            shininess: SHININESS,
            emissive: Vec3::ZERO,
        }
    }

    pub fn with_specular(mut self, specular: Vec3) -> Self {
        self.specular = specular;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub geometry: Geometry,
    pub texture: TextureSlot,
    pub material: Material,
    pub model: Mat4,
}

impl DrawItem {
    pub fn to_uniform(&self) -> DrawUniform {
        let m = &self.material;
        DrawUniform {
            model: self.model.to_cols_array_2d(),
            ambient: m.ambient.extend(1.0).to_array(),
            diffuse: m.diffuse.extend(1.0).to_array(),
            specular: m.specular.extend(m.shininess).to_array(),
            emissive: m.emissive.extend(1.0).to_array(),
        }
    }
}

fn scale(s: f32) -> Mat4 {
    Mat4::from_scale(Vec3::splat(s))
}

fn translate(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, y, z))
}

fn rotate_x(degrees: f32) -> Mat4 {
    Mat4::from_rotation_x(degrees.to_radians())
}

fn rotate_y(degrees: f32) -> Mat4 {
    Mat4::from_rotation_y(degrees.to_radians())
}

/// Draw list for the room at `time` seconds
///
/// Model matrices are in world space; the renderer applies the view.
pub fn compose(time: f32, lighting: &SceneLightingState) -> Vec<DrawItem> {
    let white = Material::matte(Vec3::ONE);
    let mut items = Vec::with_capacity(14);
    let mut push = |geometry, texture, material, model| {
        items.push(DrawItem {
            geometry,
            texture,
            material,
            model,
        })
    };

    push(
        Geometry::Model(ModelKind::Room, None),
        TextureSlot::Embedded,
        white,
        scale(0.03),
    );

    // Table, then four chairs walked around it
    let table = Geometry::Model(ModelKind::Table, Some(1));
    let chair = Geometry::Model(ModelKind::Table, Some(0));
    let mut m = scale(0.004);
    push(table, TextureSlot::Wood, white, m);
    push(chair, TextureSlot::Cloth, white, m);
    m *= rotate_y(180.0);
    push(chair, TextureSlot::Cloth, white, m);
    m = m * translate(250.0, 0.0, 0.0) * rotate_y(90.0);
    push(chair, TextureSlot::Cloth, white, m);
    m = m * translate(0.0, 0.0, -500.0) * rotate_y(180.0);
    push(chair, TextureSlot::Cloth, white, m);

    push(
        Geometry::Model(ModelKind::Vase, None),
        TextureSlot::None,
        Material::matte(Vec3::new(0.2, 0.4, 0.8)).with_specular(Vec3::ONE),
        translate(0.0, 3.0, 0.0) * scale(0.12),
    );

    push(
        Geometry::Model(ModelKind::Teapot, None),
        TextureSlot::None,
        Material::matte(Vec3::new(0.1, 0.8, 0.3)).with_specular(Vec3::ONE),
        translate(1.8, 3.4, 0.0) * scale(0.5),
    );

    let pyramid = translate(-1.5, 3.7, 0.5)
        * rotate_x(180.0)
        * rotate_y(PYRAMID_SPIN * time)
        * scale(0.1);
    push(
        Geometry::Pyramid,
        TextureSlot::None,
        Material::matte(Vec3::new(1.0, 0.2, 0.2)),
        pyramid,
    );

    // The chicken hangs off the pyramid and spins with it
    let yellow =
        Material::matte(Vec3::new(0.8, 0.8, 0.2)).with_specular(Vec3::new(0.6, 0.6, 1.0));
    push(
        Geometry::Model(ModelKind::Chicken, None),
        TextureSlot::None,
        yellow,
        pyramid * translate(0.0, -5.0, 0.0) * scale(0.2) * rotate_x(180.0),
    );

    let lamp = Geometry::Model(ModelKind::Lamp, None);
    push(lamp, TextureSlot::None, yellow, translate(-2.2, 3.075, -1.0) * scale(0.02));
    push(lamp, TextureSlot::None, yellow, translate(1.8, 3.075, 1.0) * scale(0.02));

    for (switch, position) in [
        (LightSwitch::Point1, POINT1_POSITION),
        (LightSwitch::Point2, POINT2_POSITION),
    ] {
        let bulb = Material {
            ambient: Vec3::ONE,
            diffuse: Vec3::splat(0.8),
            emissive: lighting.bulb_emission(switch),
            ..yellow
        };
        push(
            Geometry::Sphere,
            TextureSlot::None,
            bulb,
            Mat4::from_translation(position) * scale(0.1),
        );
    }

    items
}

/// Models and textures loaded from the assets directory
#[derive(Debug, Clone)]
pub struct SceneAssets {
    pub models: HashMap<ModelKind, ModelData>,
    pub wood: TextureData,
    pub cloth: TextureData,
}

impl SceneAssets {
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        log::info!("Loading assets from {:?}", dir);

        let mut models = HashMap::new();
        for kind in ModelKind::ALL {
            let model = load_model(dir.join(kind.file_name()))
                .with_context(|| format!("Failed to load {:?} model", kind))?;
            models.insert(kind, model);
        }

        let wood = load_texture(dir.join("oak.png")).context("Failed to load wood texture")?;
        let cloth = load_texture(dir.join("cloth.png")).context("Failed to load cloth texture")?;

        Ok(Self {
            models,
            wood,
            cloth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_has_fourteen_items() {
        assert_eq!(compose(0.0, &SceneLightingState::default()).len(), 14);
    }

    #[test]
    fn test_table_chain_places_chairs() {
        let items = compose(0.0, &SceneLightingState::default());
        let chairs: Vec<&DrawItem> = items
            .iter()
            .filter(|i| i.geometry == Geometry::Model(ModelKind::Table, Some(0)))
            .collect();
        assert_eq!(chairs.len(), 4);
        assert!(chairs.iter().all(|c| c.texture == TextureSlot::Cloth));

        // Third chair: 250 units along the flipped X axis, scaled by 0.004
        let origin = chairs[2].model.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(Vec3::new(-1.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn test_pyramid_spins_with_time() {
        let lighting = SceneLightingState::default();
        let at = |t| {
            compose(t, &lighting)
                .into_iter()
                .find(|i| i.geometry == Geometry::Pyramid)
                .unwrap()
                .model
        };
        assert_ne!(at(0.0), at(1.0));
        // Nine seconds is a full turn at 40°/s
        assert!(at(0.0).abs_diff_eq(at(9.0), 1e-4));
    }

    #[test]
    fn test_chicken_hangs_below_pyramid() {
        let items = compose(0.0, &SceneLightingState::default());
        let chicken = items
            .iter()
            .find(|i| i.geometry == Geometry::Model(ModelKind::Chicken, None))
            .unwrap();
        // Pyramid is flipped, so its local -Y points up: the chicken ends up at y=3.7+0.5
        let origin = chicken.model.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(Vec3::new(-1.5, 4.2, 0.5), 1e-4));
    }

    #[test]
    fn test_bulbs_dim_with_their_lights() {
        let mut lighting = SceneLightingState::default();
        lighting.toggle(LightSwitch::Point2);
        let bulbs: Vec<DrawItem> = compose(0.0, &lighting)
            .into_iter()
            .filter(|i| i.geometry == Geometry::Sphere)
            .collect();
        assert_eq!(bulbs.len(), 2);
        assert_eq!(bulbs[0].material.emissive, Vec3::ONE);
        assert_eq!(bulbs[1].material.emissive, Vec3::ZERO);
        assert!(bulbs[1]
            .model
            .transform_point3(Vec3::ZERO)
            .abs_diff_eq(POINT2_POSITION, 1e-5));
    }

    #[test]
    fn test_uniform_packs_shininess() {
        let item = compose(0.0, &SceneLightingState::default())[0];
        let uniform = item.to_uniform();
        assert_eq!(uniform.specular[3], SHININESS);
        assert_eq!(uniform.diffuse, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_missing_assets_fail_with_context() {
        let err = SceneAssets::load("no/such/assets").unwrap_err();
        assert!(format!("{:#}", err).contains("Room"));
    }
}
