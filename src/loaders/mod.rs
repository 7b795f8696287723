pub mod gltf;
pub mod texture;

pub use self::gltf::{load_model, ModelData};
pub use texture::{load_texture, TextureData};
