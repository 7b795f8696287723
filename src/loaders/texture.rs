use anyhow::{ensure, Context, Result};
use std::path::Path;

/// Decoded RGBA8 image, row-major, no padding
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        ensure!(width > 0 && height > 0, "Texture has no pixels");
        ensure!(
            rgba.len() == (width * height * 4) as usize,
            "Texture data is {} bytes, expected {} for {}x{} RGBA",
            rgba.len(),
            width * height * 4,
            width,
            height
        );
        Ok(Self { width, height, rgba })
    }

    /// 1x1 opaque white, bound to untextured meshes so one shader path serves all
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        }
    }

    /// Convert a decoded glTF image to RGBA8
    pub fn from_gltf_image(image: &gltf::image::Data) -> Self {
        let rgba = match image.format {
            gltf::image::Format::R8G8B8A8 => image.pixels.clone(),
            gltf::image::Format::R8G8B8 => image
                .pixels
                .chunks_exact(3)
                .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
                .collect(),
            gltf::image::Format::R8G8 => image
                .pixels
                .chunks_exact(2)
                .flat_map(|rg| [rg[0], rg[1], 0, 255])
                .collect(),
            gltf::image::Format::R8 => image
                .pixels
                .iter()
                .flat_map(|&l| [l, l, l, 255])
                .collect(),
            other => {
                log::warn!("Unsupported texture format {:?}, substituting white", other);
                vec![255; (image.width * image.height * 4) as usize]
            }
        };

        Self {
            width: image.width,
            height: image.height,
            rgba,
        }
    }
}

/// Load a PNG or JPEG from disk as RGBA8
pub fn load_texture(path: impl AsRef<Path>) -> Result<TextureData> {
    let path = path.as_ref();
    let image = image::open(path)
        .with_context(|| format!("Failed to load texture: {:?}", path))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    log::debug!("Loaded texture {:?}: {}x{}", path, width, height);

    TextureData::new(width, height, image.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_is_single_opaque_pixel() {
        let white = TextureData::white();
        assert_eq!((white.width, white.height), (1, 1));
        assert_eq!(white.rgba, vec![255, 255, 255, 255]);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        assert!(TextureData::new(2, 2, vec![0; 15]).is_err());
        assert!(TextureData::new(0, 4, vec![]).is_err());
        assert!(TextureData::new(2, 1, vec![0; 8]).is_ok());
    }

    #[test]
    fn test_rgb_gltf_image_gains_alpha() {
        let data = gltf::image::Data {
            pixels: vec![10, 20, 30, 40, 50, 60],
            format: gltf::image::Format::R8G8B8,
            width: 2,
            height: 1,
        };
        let texture = TextureData::from_gltf_image(&data);
        assert_eq!(texture.rgba, vec![10, 20, 30, 255, 40, 50, 60, 255]);
    }

    #[test]
    fn test_load_png_from_disk() {
        let path = std::env::temp_dir().join("room_viewer_texture_test.png");
        let mut png = image::RgbaImage::new(3, 2);
        png.put_pixel(2, 1, image::Rgba([1, 2, 3, 4]));
        png.save(&path).unwrap();

        let texture = load_texture(&path).unwrap();
        assert_eq!((texture.width, texture.height), (3, 2));
        assert_eq!(&texture.rgba[20..24], &[1, 2, 3, 4]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_texture_names_path() {
        let err = load_texture("no/such/oak.png").unwrap_err();
        assert!(format!("{:#}", err).contains("oak.png"));
    }
}
