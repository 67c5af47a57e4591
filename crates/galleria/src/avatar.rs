//! Avatar download and circular masking.
//!
//! The transform keeps the avatar at its native resolution: only the alpha
//! channel changes. A mask three times larger than the image is filled with
//! an inscribed ellipse and downsampled with area averaging, which gives the
//! circle an anti-aliased edge. The final alpha of each pixel is the minimum
//! of the mask and the source alpha, so transparent source pixels stay
//! transparent.
//!
//! Payloads wider or taller than [`MAX_AVATAR_SIDE`] are rejected as decode
//! errors before any pixel buffer is allocated.

use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{
    DynamicImage, GrayImage, ImageError, ImageFormat, ImageReader, ImageResult, Limits, Luma,
    RgbaImage, imageops,
};
use log::{debug, trace};

use galleria_core::entity::Entity;
use galleria_directory::DirectoryClient;

use crate::error::GalleryError;

/// Linear oversampling factor of the circle mask.
pub const MASK_OVERSAMPLING: u32 = 3;

/// Largest accepted avatar width or height, in pixels.
pub const MAX_AVATAR_SIDE: u32 = 2048;

/// A circularly masked avatar ready for embedding.
///
/// The pixel buffer keeps the source resolution; `size` is the side length
/// the avatar is displayed at.
#[derive(Debug, Clone)]
pub struct TransformedAvatar {
    id: String,
    pixels: RgbaImage,
    png: Vec<u8>,
    size: u32,
}

impl TransformedAvatar {
    /// Identifier of the owning entity.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Masked RGBA pixels at native resolution.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// PNG encoding of [`pixels`](Self::pixels).
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// Displayed width in pixels.
    pub fn width(&self) -> u32 {
        self.size
    }

    /// Displayed height in pixels.
    pub fn height(&self) -> u32 {
        self.size
    }

    /// Base64 text of the PNG payload.
    pub fn base64(&self) -> String {
        STANDARD.encode(&self.png)
    }

    /// Self-contained `data:` URI for inline embedding.
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.base64())
    }
}

/// Downloads and masks avatars for one gallery.
#[derive(Debug, Clone)]
pub struct AvatarTransformer<'a> {
    client: &'a DirectoryClient,
    size: u32,
}

impl<'a> AvatarTransformer<'a> {
    /// Creates a transformer displaying avatars at `size` pixels.
    pub fn new(client: &'a DirectoryClient, size: u32) -> Self {
        Self { client, size }
    }

    /// Downloads the avatar of `entity` and masks it.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::AssetUnavailable`] when the download fails on
    /// every attempt, [`GalleryError::Decode`] when the payload is not an
    /// image and [`GalleryError::Encode`] if PNG encoding fails.
    pub async fn transform(&self, entity: &Entity) -> Result<TransformedAvatar, GalleryError> {
        debug!(id = entity.id(), url:% = entity.avatar_url(); "Downloading avatar");

        let bytes = self
            .client
            .download(entity.avatar_url())
            .await
            .map_err(|source| GalleryError::AssetUnavailable {
                id: entity.id().to_string(),
                source,
            })?;

        mask_avatar(entity.id(), &bytes, self.size)
    }
}

/// Decodes `bytes`, applies the circular mask and re-encodes the result.
///
/// # Arguments
///
/// * `id` - Identifier of the owning entity.
/// * `bytes` - Raw raster payload in any supported format.
/// * `size` - Displayed side length.
///
/// # Errors
///
/// Returns [`GalleryError::Decode`] for payloads that are not a supported
/// image and [`GalleryError::Encode`] if PNG encoding fails.
pub fn mask_avatar(id: &str, bytes: &[u8], size: u32) -> Result<TransformedAvatar, GalleryError> {
    let source = decode_limited(bytes)
        .map_err(|source| GalleryError::Decode {
            id: id.to_string(),
            source,
        })?
        .to_rgba8();

    let pixels = apply_circle_mask(&source);

    let mut png = Vec::new();
    pixels
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|source| GalleryError::Encode {
            id: id.to_string(),
            source,
        })?;

    trace!(
        id = id,
        width = pixels.width(),
        height = pixels.height(),
        png_bytes = png.len();
        "Avatar masked"
    );

    Ok(TransformedAvatar {
        id: id.to_string(),
        pixels,
        png,
        size,
    })
}

/// Decodes `bytes` with the format guessed from their content, refusing
/// images larger than [`MAX_AVATAR_SIDE`] on either axis.
fn decode_limited(bytes: &[u8]) -> ImageResult<DynamicImage> {
    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_AVATAR_SIDE);
    limits.max_image_height = Some(MAX_AVATAR_SIDE);

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(ImageError::IoError)?;
    reader.limits(limits);
    reader.decode()
}

/// Returns a copy of `source` whose alpha is limited by an inscribed circle.
pub fn apply_circle_mask(source: &RgbaImage) -> RgbaImage {
    let (width, height) = source.dimensions();
    let mask = circle_mask(width, height);

    let mut masked = source.clone();
    for (x, y, pixel) in masked.enumerate_pixels_mut() {
        let Luma([coverage]) = *mask.get_pixel(x, y);
        pixel[3] = pixel[3].min(coverage);
    }
    masked
}

/// Builds an anti-aliased ellipse mask of `width` x `height`.
///
/// The ellipse is rasterized at [`MASK_OVERSAMPLING`] times the target size
/// by testing pixel centers, then averaged back down.
pub fn circle_mask(width: u32, height: u32) -> GrayImage {
    let big_width = width * MASK_OVERSAMPLING;
    let big_height = height * MASK_OVERSAMPLING;
    let radius_x = f64::from(big_width) / 2.0;
    let radius_y = f64::from(big_height) / 2.0;

    let oversized = GrayImage::from_fn(big_width, big_height, |x, y| {
        let dx = (f64::from(x) + 0.5 - radius_x) / radius_x;
        let dy = (f64::from(y) + 0.5 - radius_y) / radius_y;
        if dx * dx + dy * dy <= 1.0 {
            Luma([u8::MAX])
        } else {
            Luma([0])
        }
    });

    imageops::thumbnail(&oversized, width, height)
}
