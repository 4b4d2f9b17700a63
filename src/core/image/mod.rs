//! Image materialization
//!
//! Fetches catalog image references and decodes them into renderable
//! bitmaps. GPU upload is deferred to the render thread via [`TextureQueue`].

mod texture;

pub use texture::TextureQueue;

use std::fmt;
use std::sync::{Arc, OnceLock};

use resvg::{tiny_skia, usvg};

use crate::config::UrlSubstitution;
use crate::util::http::{Transport, TransportError};

/// Failure to materialize one image reference.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to fetch image: {0}")]
    Fetch(#[from] TransportError),

    /// Neither the raster nor the vector decoder accepted the bytes.
    #[error("image bytes not decodable as raster or vector")]
    Decode,
}

/// A fetched, decoded image shared between the catalog cache and the
/// renderer.
///
/// The pixel data is filled in at decode time on a worker thread; the GPU
/// texture is installed later on the render thread ([`RemoteImage::upload`])
/// and released by egui's texture manager once the last clone drops.
#[derive(Clone)]
pub struct RemoteImage {
    inner: Arc<ImageInner>,
}

struct ImageInner {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    texture: OnceLock<egui::TextureHandle>,
}

impl RemoteImage {
    fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self {
            inner: Arc::new(ImageInner {
                width,
                height,
                rgba,
                texture: OnceLock::new(),
            }),
        }
    }

    pub fn width(&self) -> u32 {
        self.inner.width
    }

    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Install the GPU texture for this image. Render thread only.
    ///
    /// Idempotent: a second call reuses the installed texture.
    pub fn upload(&self, ctx: &egui::Context) {
        self.inner.texture.get_or_init(|| {
            let size = [self.inner.width as usize, self.inner.height as usize];
            let pixels = egui::ColorImage::from_rgba_unmultiplied(size, &self.inner.rgba);
            ctx.load_texture(
                format!("catalog-image-{}x{}", self.inner.width, self.inner.height),
                pixels,
                egui::TextureOptions::LINEAR,
            )
        });
    }

    /// The installed texture, once [`RemoteImage::upload`] has run.
    pub fn texture(&self) -> Option<&egui::TextureHandle> {
        self.inner.texture.get()
    }

    /// Whether two handles share the same underlying image.
    pub fn same_handle(&self, other: &RemoteImage) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for RemoteImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteImage")
            .field("width", &self.inner.width)
            .field("height", &self.inner.height)
            .field("uploaded", &self.inner.texture.get().is_some())
            .finish()
    }
}

/// Apply the configured substitution table to an image URL.
///
/// The replacement itself is never rewritten, so a rule whose stand-in lives
/// on the flagged host cannot loop.
pub fn substitute_url<'a>(substitutions: &'a [UrlSubstitution], url: &'a str) -> &'a str {
    for rule in substitutions {
        if url.contains(&rule.host_fragment) && url != rule.replacement {
            tracing::warn!("swapping image {} for configured stand-in", url);
            return &rule.replacement;
        }
    }
    url
}

/// Fetch and decode one image reference.
///
/// Network and pixel decode only; no GPU work happens here, so this is safe
/// to fan out across worker threads.
pub async fn fetch_image<T: Transport>(
    transport: &T,
    substitutions: &[UrlSubstitution],
    url: &str,
) -> Result<RemoteImage, FetchError> {
    let url = substitute_url(substitutions, url);
    let bytes = transport.get(url).await?;
    decode_image(&bytes).ok_or(FetchError::Decode)
}

/// Decode image bytes, trying the raster decoder first and SVG second.
pub fn decode_image(bytes: &[u8]) -> Option<RemoteImage> {
    if let Some((width, height, rgba)) = decode_raster(bytes) {
        return Some(RemoteImage::new(width, height, rgba));
    }
    if let Some((width, height, rgba)) = decode_svg(bytes) {
        return Some(RemoteImage::new(width, height, rgba));
    }
    None
}

fn decode_raster(bytes: &[u8]) -> Option<(u32, u32, Vec<u8>)> {
    let decoded = image::load_from_memory(bytes).ok()?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    Some((width, height, rgba.into_raw()))
}

fn decode_svg(bytes: &[u8]) -> Option<(u32, u32, Vec<u8>)> {
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default()).ok()?;

    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    // tiny-skia renders premultiplied; egui wants straight alpha.
    let rgba = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect();

    Some((size.width(), size.height(), rgba))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let pixels = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(pixels)
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_decode_raster() {
        let decoded = decode_image(&png_bytes(3, 2)).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }

    #[test]
    fn test_decode_svg_fallback() {
        let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="8">
            <rect width="16" height="8" fill="#ff0000"/>
        </svg>"##;

        let decoded = decode_image(svg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_image(b"neither raster nor vector").is_none());
    }

    #[test]
    fn test_substitution_applies_to_matching_url() {
        let rules = vec![crate::config::UrlSubstitution {
            host_fragment: "discordapp.".to_string(),
            replacement: "https://cdn.example.com/stand-in.png".to_string(),
        }];

        assert_eq!(
            substitute_url(&rules, "https://cdn.discordapp.com/x.png"),
            "https://cdn.example.com/stand-in.png"
        );
        assert_eq!(
            substitute_url(&rules, "https://cdn.example.com/fine.png"),
            "https://cdn.example.com/fine.png"
        );
    }

    #[test]
    fn test_substitution_never_rewrites_replacement() {
        let rules = vec![crate::config::UrlSubstitution {
            host_fragment: "example.com".to_string(),
            replacement: "https://example.com/stand-in.png".to_string(),
        }];

        assert_eq!(
            substitute_url(&rules, "https://example.com/stand-in.png"),
            "https://example.com/stand-in.png"
        );
    }
}
