// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image normalizer: orientation correction, alpha flattening, watermark
// fading and thumbnailing of member photos, operator photos and branding
// assets. Everything happens in memory.

use std::io::Cursor;

use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader, Rgb, RgbImage};
use renemico_core::error::{RenemicoError, Result};
use tracing::{debug, instrument, warn};

/// Opacity kept by card watermarks.
pub const WATERMARK_ALPHA: f32 = 0.12;

/// Operator photos are shrunk to fit inside this square.
pub const PHOTO_MAX_EDGE: u32 = 800;

/// Rotation needed to display an image upright, from its EXIF orientation
/// tag. Mirrored orientations are left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upright {
    Keep,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl Upright {
    pub fn from_tag(tag: Option<u8>) -> Self {
        match tag {
            Some(3) => Self::Rotate180,
            Some(6) => Self::Rotate90,
            Some(8) => Self::Rotate270,
            _ => Self::Keep,
        }
    }

    pub fn apply(self, image: DynamicImage) -> DynamicImage {
        match self {
            Self::Keep => image,
            Self::Rotate90 => image.rotate90(),
            Self::Rotate180 => image.rotate180(),
            Self::Rotate270 => image.rotate270(),
        }
    }
}

/// Image pipeline over a single in-memory image. Each step consumes `self`.
pub struct ImageProcessor {
    image: DynamicImage,
    source_format: Option<ImageFormat>,
}

impl ImageProcessor {
    /// Decode encoded bytes and rotate them upright.
    ///
    /// Missing or unreadable orientation metadata leaves the pixels as
    /// decoded; only undecodable image data is an error.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| RenemicoError::ImageError(format!("failed to sniff image format: {e}")))?;
        let source_format = reader.format();
        let mut decoder = reader
            .into_decoder()
            .map_err(|e| RenemicoError::ImageError(format!("failed to decode image: {e}")))?;

        let tag = match decoder.orientation() {
            Ok(orientation) => Some(orientation.to_exif()),
            Err(err) => {
                warn!(%err, "unreadable orientation metadata, keeping pixels as decoded");
                None
            }
        };

        let decoded = DynamicImage::from_decoder(decoder)
            .map_err(|e| RenemicoError::ImageError(format!("failed to decode image: {e}")))?;
        let upright = Upright::from_tag(tag);
        debug!(
            width = decoded.width(),
            height = decoded.height(),
            ?upright,
            "image decoded"
        );

        Ok(Self {
            image: upright.apply(decoded),
            source_format,
        })
    }

    /// Load an asset from disk. `None` when the file is absent or unreadable.
    pub fn open_optional(path: &std::path::Path) -> Option<Self> {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(err) => {
                debug!(path = %path.display(), %err, "asset not available");
                return None;
            }
        };
        match Self::from_bytes(&data) {
            Ok(processor) => Some(processor),
            Err(err) => {
                warn!(path = %path.display(), %err, "asset could not be decoded");
                None
            }
        }
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self {
            image,
            source_format: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Format sniffed from the original bytes, if any.
    pub fn source_format(&self) -> Option<ImageFormat> {
        self.source_format
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    /// Composite onto an opaque white background.
    pub fn flatten_on_white(self) -> Self {
        let rgba = self.image.to_rgba8();
        let flat = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            let [r, g, b, a] = rgba.get_pixel(x, y).0;
            let alpha = a as f32 / 255.0;
            let blend = |c: u8| (c as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
            Rgb([blend(r), blend(g), blend(b)])
        });
        Self {
            image: DynamicImage::ImageRgb8(flat),
            source_format: self.source_format,
        }
    }

    /// Multiply the alpha channel by `factor` (clamped to 0..=1).
    #[instrument(skip(self))]
    pub fn fade(self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        let mut rgba = self.image.to_rgba8();
        for pixel in rgba.pixels_mut() {
            pixel.0[3] = (pixel.0[3] as f32 * factor).round() as u8;
        }
        Self {
            image: DynamicImage::ImageRgba8(rgba),
            source_format: self.source_format,
        }
    }

    /// Shrink to fit `max_edge` x `max_edge`, preserving aspect ratio.
    /// Smaller images are returned untouched.
    pub fn thumbnail(self, max_edge: u32) -> Self {
        if self.image.width() <= max_edge && self.image.height() <= max_edge {
            return self;
        }
        let resized = self
            .image
            .resize(max_edge, max_edge, image::imageops::FilterType::Lanczos3);
        debug!(
            width = resized.width(),
            height = resized.height(),
            "image thumbnailed"
        );
        Self {
            image: resized,
            source_format: self.source_format,
        }
    }

    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| RenemicoError::ImageError(format!("PNG encoding failed: {e}")))?;
        Ok(cursor.into_inner())
    }
}

/// Print-ready opaque raster from encoded bytes: upright and flattened.
pub fn print_ready(data: &[u8]) -> Result<RgbImage> {
    Ok(ImageProcessor::from_bytes(data)?
        .flatten_on_white()
        .into_dynamic()
        .to_rgb8())
}
