use std::path::Path;

use anyhow::{Context, Result};

use super::RenderCtx;

/// Decoded RGBA8 pixels ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    /// Decodes an encoded image (PNG/JPEG/BMP), optionally flipping it vertically.
    pub fn decode(bytes: &[u8], flip_vertical: bool) -> Result<Self> {
        let image = image::load_from_memory(bytes).context("failed to decode image")?;
        Ok(Self::from_dynamic(image, flip_vertical))
    }

    /// Reads and decodes an image file.
    pub fn open(path: impl AsRef<Path>, flip_vertical: bool) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path).with_context(|| format!("failed to load {}", path.display()))?;
        Ok(Self::from_dynamic(image, flip_vertical))
    }

    fn from_dynamic(image: image::DynamicImage, flip_vertical: bool) -> Self {
        let image = if flip_vertical { image.flipv() } else { image };
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            width,
            height,
            rgba: rgba.into_raw(),
        }
    }

    /// 1×1 transparent black, bound in place of a texture that failed to load.
    pub fn placeholder() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![0, 0, 0, 0],
        }
    }

    /// Returns the RGBA value at `(x, y)`, row 0 being the first uploaded row.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let px = self.rgba.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Sampler wrapping used for projected textures.
///
/// Returns clamp-to-border with a transparent border when the device
/// supports it, clamp-to-edge otherwise.
pub fn projector_address_mode(
    features: wgpu::Features,
) -> (wgpu::AddressMode, Option<wgpu::SamplerBorderColor>) {
    if features.contains(wgpu::Features::ADDRESS_MODE_CLAMP_TO_BORDER) {
        (
            wgpu::AddressMode::ClampToBorder,
            Some(wgpu::SamplerBorderColor::TransparentBlack),
        )
    } else {
        (wgpu::AddressMode::ClampToEdge, None)
    }
}

/// Immutable 2D texture with its view and sampler.
#[derive(Debug)]
pub struct Texture2d {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    /// False when the placeholder was bound instead of the requested image.
    pub loaded: bool,
}

impl Texture2d {
    /// Uploads `image` as an RGBA8 texture with linear filtering.
    pub fn from_image(ctx: &RenderCtx<'_>, label: &str, image: &TextureImage) -> Self {
        let size = wgpu::Extent3d {
            width: image.width.max(1),
            height: image.height.max(1),
            depth_or_array_layers: 1,
        };

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * size.width),
                rows_per_image: Some(size.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let (address_mode, border_color) = projector_address_mode(ctx.features);
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            border_color,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            loaded: true,
        }
    }

    /// Loads `path`, falling back to a transparent placeholder on failure.
    ///
    /// A missing or corrupt file is not fatal; it is logged and rendering
    /// continues without the texture.
    pub fn load_or_placeholder(ctx: &RenderCtx<'_>, path: &Path, flip_vertical: bool) -> Self {
        match TextureImage::open(path, flip_vertical) {
            Ok(image) => {
                log::info!("loaded texture {} ({}x{})", path.display(), image.width, image.height);
                Self::from_image(ctx, "projtex texture", &image)
            }
            Err(err) => {
                log::warn!("{err:#}; using placeholder texture");
                let mut tex =
                    Self::from_image(ctx, "projtex placeholder texture", &TextureImage::placeholder());
                tex.loaded = false;
                tex
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1 pixel wide, 2 rows: red on top, blue below.
    fn two_row_png() -> Vec<u8> {
        let mut img = image::RgbaImage::new(1, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));

        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    // ── decoding ──────────────────────────────────────────────────────────

    #[test]
    fn decode_keeps_row_order() {
        let img = TextureImage::decode(&two_row_png(), false).unwrap();
        assert_eq!((img.width, img.height), (1, 2));
        assert_eq!(img.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(img.pixel(0, 1), Some([0, 0, 255, 255]));
    }

    #[test]
    fn decode_flips_vertically() {
        let img = TextureImage::decode(&two_row_png(), true).unwrap();
        assert_eq!(img.pixel(0, 0), Some([0, 0, 255, 255]));
        assert_eq!(img.pixel(0, 1), Some([255, 0, 0, 255]));
    }

    #[test]
    fn corrupt_bytes_are_an_error() {
        assert!(TextureImage::decode(b"not an image", false).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = TextureImage::open("/nonexistent/flower.png", true).unwrap_err();
        assert!(format!("{err:#}").contains("flower.png"));
    }

    // ── placeholder / sampler ─────────────────────────────────────────────

    #[test]
    fn placeholder_is_transparent() {
        let p = TextureImage::placeholder();
        assert_eq!((p.width, p.height), (1, 1));
        assert_eq!(p.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(p.pixel(1, 0), None);
    }

    #[test]
    fn border_mode_needs_feature() {
        let (mode, border) = projector_address_mode(wgpu::Features::ADDRESS_MODE_CLAMP_TO_BORDER);
        assert_eq!(mode, wgpu::AddressMode::ClampToBorder);
        assert_eq!(border, Some(wgpu::SamplerBorderColor::TransparentBlack));

        let (mode, border) = projector_address_mode(wgpu::Features::empty());
        assert_eq!(mode, wgpu::AddressMode::ClampToEdge);
        assert_eq!(border, None);
    }
}
