// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Branding shared by every A4 document: palette, in-memory assets, header
// band, title band, section headings, QR placement and footer.

use std::path::Path;

use image::{DynamicImage, RgbImage};
use renemico_core::config::{AppConfig, Branding};
use renemico_core::error::Result;
use tracing::{debug, instrument};

use super::canvas::{CM, Canvas, Colour, Pen};
use crate::image::processor::{ImageProcessor, WATERMARK_ALPHA};
use crate::qr;

pub const PRIMARY: Colour = Colour::hex(0x2c3e50);
pub const SECONDARY: Colour = Colour::hex(0x3498db);
pub const ACCENT: Colour = Colour::hex(0xe74c3c);
pub const LIGHT: Colour = Colour::hex(0xecf0f1);
pub const GRID: Colour = Colour::hex(0xbdc3c7);
pub const MUTED: Colour = Colour::hex(0x7f8c8d);

/// Page margin on all sides.
pub const MARGIN: f32 = 1.5 * CM;

/// Rasterized QR images are drawn from this many pixels.
const QR_RENDER_PX: u32 = 300;

/// Branding rasters, decoded and made opaque once per rendering context.
#[derive(Debug, Clone, Default)]
pub struct BrandAssets {
    pub logo: Option<RgbImage>,
    pub card_logo: Option<RgbImage>,
    /// Card logo faded onto white.
    pub watermark: Option<RgbImage>,
    pub seal: Option<RgbImage>,
    pub secondary_seal: Option<RgbImage>,
    pub signature: Option<RgbImage>,
    pub banner: Option<RgbImage>,
}

fn opaque(processor: ImageProcessor) -> RgbImage {
    processor.flatten_on_white().into_dynamic().to_rgb8()
}

impl BrandAssets {
    /// Load every configured asset, resolving relative paths against `root`.
    /// Missing or undecodable files are left empty.
    #[instrument(skip(config), fields(root = %root.display()))]
    pub fn load(config: &AppConfig, root: &Path) -> Self {
        let paths = config.assets.resolved_against(root);
        let load = |p: &Path| ImageProcessor::open_optional(p).map(opaque);

        let card_source = ImageProcessor::open_optional(&paths.card_watermark);
        let watermark = card_source.as_ref().map(|p| {
            opaque(ImageProcessor::from_dynamic(p.as_dynamic().clone()).fade(WATERMARK_ALPHA))
        });

        let assets = Self {
            logo: load(&paths.logo),
            card_logo: card_source.map(opaque),
            watermark,
            seal: load(&paths.seal),
            secondary_seal: load(&paths.secondary_seal),
            signature: load(&paths.signature),
            banner: load(&paths.banner),
        };
        debug!(
            logo = assets.logo.is_some(),
            card_logo = assets.card_logo.is_some(),
            seal = assets.seal.is_some(),
            banner = assets.banner.is_some(),
            "branding assets loaded"
        );
        assets
    }
}

/// Everything a renderer needs besides the records themselves.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub branding: Branding,
    pub assets: BrandAssets,
    pub currency_code: String,
    pub currency_words: String,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::from_config(&AppConfig::default(), BrandAssets::default())
    }
}

impl RenderContext {
    pub fn from_config(config: &AppConfig, assets: BrandAssets) -> Self {
        Self {
            branding: config.branding.clone(),
            assets,
            currency_code: config.currency_code.clone(),
            currency_words: config.currency_words.clone(),
        }
    }
}

/// Framed box with a centred label, standing in for a missing image.
pub fn placeholder(canvas: &mut Canvas, x: f32, y: f32, w: f32, h: f32, label: &str) {
    canvas.stroke_rect(x, y, w, h, GRID, 1.0);
    canvas.text_centered(x + w / 2.0, y + h / 2.0 - 3.0, Pen::oblique(9.0).colour(MUTED), label);
}

/// Draw `image` if present, otherwise a placeholder box carrying `label`.
pub fn image_or_placeholder(
    canvas: &mut Canvas,
    image: Option<&RgbImage>,
    (x, y, w, h): (f32, f32, f32, f32),
    label: &str,
) {
    match image {
        Some(img) => canvas.image(img, x, y, w, h),
        None => placeholder(canvas, x, y, w, h, label),
    }
}

/// Light header band with logo and organization block. Returns the y of the
/// title band.
pub fn header(canvas: &mut Canvas, ctx: &RenderContext) -> f32 {
    let (w, h) = (canvas.width(), canvas.height());
    canvas.fill_rect(0.0, h - 3.5 * CM, w, 3.5 * CM, LIGHT);

    match &ctx.assets.logo {
        Some(logo) => canvas.image(logo, MARGIN, h - 3.5 * CM, 2.5 * CM, 2.5 * CM),
        None => {
            canvas.fill_rect(MARGIN, h - 3.0 * CM, 2.5 * CM, 2.5 * CM, SECONDARY);
            let pen = Pen::bold(10.0).colour(Colour::WHITE);
            canvas.text_centered(MARGIN + 1.25 * CM, h - 2.2 * CM, pen, "LOGO");
            canvas.text_centered(MARGIN + 1.25 * CM, h - 2.6 * CM, pen, &ctx.branding.acronym);
        }
    }

    let right = w - MARGIN;
    canvas.text_right(right, h - 2.0 * CM, Pen::bold(14.0).colour(PRIMARY), &ctx.branding.name);
    let pen = Pen::regular(10.0).colour(PRIMARY);
    let mut y = h - 2.7 * CM;
    for line in &ctx.branding.address_lines {
        canvas.text_right(right, y, pen, line);
        y -= 0.4 * CM;
    }
    canvas.text_right(right, y, pen, &ctx.branding.contact_line());

    h - 4.5 * CM
}

/// Full-width coloured band with a centred white title at baseline `y`.
pub fn title_band(canvas: &mut Canvas, y: f32, title: &str) {
    let w = canvas.width();
    canvas.fill_rect(0.0, y - 0.5 * CM, w, 1.2 * CM, SECONDARY);
    canvas.text_centered(w / 2.0, y, Pen::bold(18.0).colour(Colour::WHITE), title);
}

/// Bold heading followed by a rule. Returns the y below the rule.
pub fn section(canvas: &mut Canvas, y: f32, title: &str) -> f32 {
    canvas.text(MARGIN, y, Pen::bold(12.0).colour(PRIMARY), title);
    let rule_y = y - 1.0 * CM;
    canvas.line((MARGIN, rule_y), (canvas.width() - MARGIN, rule_y), SECONDARY, 1.0);
    rule_y - 1.0 * CM
}

/// Bold label with the wrapped amount in words to its right. Returns the y
/// below the last line.
pub fn words_block(canvas: &mut Canvas, y: f32, label: &str, offset: f32, lines: &[String]) -> f32 {
    canvas.text(MARGIN, y, Pen::bold(10.0).colour(PRIMARY), label);
    let pen = Pen::regular(10.0).colour(PRIMARY);
    let mut line_y = y;
    for line in lines {
        canvas.text(MARGIN + offset, line_y, pen, line);
        line_y -= 0.4 * CM;
    }
    line_y + 0.4 * CM - 0.8 * CM
}

/// Draw a QR code for `payload` with its lower-left corner at (`x`, `y`).
pub fn qr_code(canvas: &mut Canvas, payload: &str, x: f32, y: f32, size: f32) -> Result<()> {
    let gray = qr::render(payload, QR_RENDER_PX)?;
    let rgb = DynamicImage::ImageLuma8(gray).to_rgb8();
    canvas.image(&rgb, x, y, size, size);
    Ok(())
}

/// Grey rule and centred oblique lines at the bottom of the page.
pub fn footer(canvas: &mut Canvas, lines: &[&str]) {
    let w = canvas.width();
    let rule_y = MARGIN + 2.5 * CM;
    canvas.line((MARGIN, rule_y), (w - MARGIN, rule_y), GRID, 1.0);
    let pen = Pen::oblique(9.0).colour(MUTED);
    let mut y = MARGIN + 1.8 * CM;
    for line in lines {
        canvas.text_centered(w / 2.0, y, pen, line);
        y -= 0.5 * CM;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use renemico_core::PageFormat;

    #[test]
    fn header_without_logo_draws_placeholder() {
        let ctx = RenderContext::default();
        let mut canvas = Canvas::new("t", PageFormat::A4_PORTRAIT);
        let y = header(&mut canvas, &ctx);
        assert!(y < canvas.height());
        let out = canvas.finish();
        assert!(out.contains_text("LOGO"));
        assert!(out.contains_text("RENEMICO"));
        assert!(out.contains_text("Tél: +243 81 60 69 861 - Email: contact@renemico.com"));
    }

    #[test]
    fn missing_asset_directory_yields_empty_assets() {
        let dir = std::env::temp_dir().join("renemico-no-such-assets");
        let assets = BrandAssets::load(&AppConfig::default(), &dir);
        assert!(assets.logo.is_none());
        assert!(assets.watermark.is_none());
    }

    #[test]
    fn watermark_is_faded() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        let logo = image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 255]));
        std::fs::create_dir_all(dir.join("assets")).unwrap();
        logo.save(dir.join("assets/logo2.png")).unwrap();

        let assets = BrandAssets::load(&AppConfig::default(), dir);
        let card_logo = assets.card_logo.unwrap();
        let watermark = assets.watermark.unwrap();
        assert_eq!(card_logo.get_pixel(0, 0).0, [0, 0, 0]);
        // 12% black over white.
        assert_eq!(watermark.get_pixel(0, 0).0, [224, 224, 224]);
    }
}
