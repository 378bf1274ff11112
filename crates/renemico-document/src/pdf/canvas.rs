// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Drawing surface over printpdf 0.8.
//
// printpdf is data-oriented: each page is a `Vec<Op>`. `Canvas` accumulates
// ops for the current page, flushes them on `show_page`, and keeps a log of
// every string drawn per page so callers can inspect the laid-out text
// without parsing content streams. Coordinates are points from the
// bottom-left corner.

use image::RgbImage;
use printpdf::{
    BuiltinFont, Color, Line, LinePoint, Mm, Op, PaintMode, PdfDocument, PdfPage,
    PdfSaveOptions, PdfWarnMsg, Point, Polygon, PolygonRing, Pt, RawImage, RawImageData,
    RawImageFormat, Rgb, TextItem, WindingOrder, XObjectTransform,
};
use renemico_core::PageFormat;
use tracing::{debug, warn};

use super::metrics::text_width;

/// One centimetre in points.
pub const CM: f32 = 72.0 / 2.54;
/// One inch in points.
pub const INCH: f32 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
    Oblique,
    BoldOblique,
}

impl Font {
    fn builtin(self) -> BuiltinFont {
        match self {
            Self::Regular => BuiltinFont::Helvetica,
            Self::Bold => BuiltinFont::HelveticaBold,
            Self::Oblique => BuiltinFont::HelveticaOblique,
            Self::BoldOblique => BuiltinFont::HelveticaBoldOblique,
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(self, Self::Bold | Self::BoldOblique)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const BLACK: Colour = Colour::hex(0x000000);
    pub const WHITE: Colour = Colour::hex(0xffffff);

    /// From a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }

    fn to_pdf(self) -> Color {
        Color::Rgb(Rgb::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            None,
        ))
    }
}

/// Font, size and colour for a run of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub font: Font,
    pub size: f32,
    pub colour: Colour,
}

impl Pen {
    pub const fn regular(size: f32) -> Self {
        Self {
            font: Font::Regular,
            size,
            colour: Colour::BLACK,
        }
    }

    pub const fn bold(size: f32) -> Self {
        Self {
            font: Font::Bold,
            size,
            colour: Colour::BLACK,
        }
    }

    pub const fn oblique(size: f32) -> Self {
        Self {
            font: Font::Oblique,
            size,
            colour: Colour::BLACK,
        }
    }

    pub const fn colour(self, colour: Colour) -> Self {
        Self { colour, ..self }
    }

    pub fn width_of(&self, text: &str) -> f32 {
        text_width(text, self.font, self.size)
    }
}

/// A finished PDF and the text drawn on each of its pages.
#[derive(Debug, Clone)]
pub struct PdfOutput {
    pub bytes: Vec<u8>,
    pub page_text: Vec<Vec<String>>,
}

impl PdfOutput {
    pub fn page_count(&self) -> usize {
        self.page_text.len()
    }

    /// Whether any drawn string on any page contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.page_text
            .iter()
            .flatten()
            .any(|line| line.contains(needle))
    }

    pub fn page_contains(&self, page: usize, needle: &str) -> bool {
        self.page_text
            .get(page)
            .is_some_and(|lines| lines.iter().any(|l| l.contains(needle)))
    }
}

pub struct Canvas {
    doc: PdfDocument,
    page_w: f32,
    page_h: f32,
    pages: Vec<PdfPage>,
    ops: Vec<Op>,
    finished_text: Vec<Vec<String>>,
    text: Vec<String>,
}

impl Canvas {
    pub fn new(title: &str, format: PageFormat) -> Self {
        let (w, h) = format.dimensions_pt();
        Self {
            doc: PdfDocument::new(title),
            page_w: w,
            page_h: h,
            pages: Vec::new(),
            ops: Vec::new(),
            finished_text: Vec::new(),
            text: Vec::new(),
        }
    }

    pub fn width(&self) -> f32 {
        self.page_w
    }

    pub fn height(&self) -> f32 {
        self.page_h
    }

    /// Pages so far, counting the one being drawn.
    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    // -- Text -----------------------------------------------------------------

    pub fn text(&mut self, x: f32, y: f32, pen: Pen, text: &str) {
        if text.is_empty() {
            return;
        }
        let font = pen.font.builtin();
        self.ops.push(Op::SetFillColor {
            col: pen.colour.to_pdf(),
        });
        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetTextCursor {
            pos: Point { x: Pt(x), y: Pt(y) },
        });
        self.ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(pen.size),
            font,
        });
        self.ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_string())],
            font,
        });
        self.ops.push(Op::EndTextSection);
        self.text.push(text.to_string());
    }

    pub fn text_centered(&mut self, center_x: f32, y: f32, pen: Pen, text: &str) {
        self.text(center_x - pen.width_of(text) / 2.0, y, pen, text);
    }

    pub fn text_right(&mut self, right_x: f32, y: f32, pen: Pen, text: &str) {
        self.text(right_x - pen.width_of(text), y, pen, text);
    }

    // -- Shapes ---------------------------------------------------------------

    fn rect_ring(x: f32, y: f32, w: f32, h: f32) -> PolygonRing {
        let corner = |px: f32, py: f32| LinePoint {
            p: Point {
                x: Pt(px),
                y: Pt(py),
            },
            bezier: false,
        };
        PolygonRing {
            points: vec![
                corner(x, y),
                corner(x + w, y),
                corner(x + w, y + h),
                corner(x, y + h),
            ],
        }
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, colour: Colour) {
        self.ops.push(Op::SetFillColor {
            col: colour.to_pdf(),
        });
        self.ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![Self::rect_ring(x, y, w, h)],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            },
        });
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, colour: Colour, thickness: f32) {
        self.set_stroke(colour, thickness);
        self.ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![Self::rect_ring(x, y, w, h)],
                mode: PaintMode::Stroke,
                winding_order: WindingOrder::NonZero,
            },
        });
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), colour: Colour, thickness: f32) {
        self.set_stroke(colour, thickness);
        let point = |(px, py): (f32, f32)| LinePoint {
            p: Point {
                x: Pt(px),
                y: Pt(py),
            },
            bezier: false,
        };
        self.ops.push(Op::DrawLine {
            line: Line {
                points: vec![point(from), point(to)],
                is_closed: false,
            },
        });
    }

    fn set_stroke(&mut self, colour: Colour, thickness: f32) {
        self.ops.push(Op::SetOutlineColor {
            col: colour.to_pdf(),
        });
        self.ops.push(Op::SetOutlineThickness { pt: Pt(thickness) });
    }

    // -- Images ---------------------------------------------------------------

    /// Draw `image` stretched to `w` x `h` points with its lower-left corner
    /// at (`x`, `y`).
    pub fn image(&mut self, image: &RgbImage, x: f32, y: f32, w: f32, h: f32) {
        let (px_w, px_h) = image.dimensions();
        if px_w == 0 || px_h == 0 {
            warn!("skipping empty image");
            return;
        }
        let raw = RawImage {
            pixels: RawImageData::U8(image.as_raw().clone()),
            width: px_w as usize,
            height: px_h as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let id = self.doc.add_image(&raw);
        // At 72 dpi one pixel is one point.
        self.ops.push(Op::UseXobject {
            id,
            transform: XObjectTransform {
                translate_x: Some(Pt(x)),
                translate_y: Some(Pt(y)),
                scale_x: Some(w / px_w as f32),
                scale_y: Some(h / px_h as f32),
                dpi: Some(72.0),
                rotate: None,
            },
        });
    }

    /// Draw `image` at width `w`, keeping its aspect ratio. Returns the height
    /// used.
    pub fn image_fit_width(&mut self, image: &RgbImage, x: f32, y: f32, w: f32) -> f32 {
        let (px_w, px_h) = image.dimensions();
        if px_w == 0 {
            return 0.0;
        }
        let h = w * px_h as f32 / px_w as f32;
        self.image(image, x, y, w, h);
        h
    }

    // -- Pages ----------------------------------------------------------------

    /// Close the current page and start a fresh one.
    pub fn show_page(&mut self) {
        let ops = std::mem::take(&mut self.ops);
        self.pages.push(PdfPage::new(
            Mm(self.page_w * 25.4 / 72.0),
            Mm(self.page_h * 25.4 / 72.0),
            ops,
        ));
        self.finished_text.push(std::mem::take(&mut self.text));
    }

    /// Serialize the document, closing the current page.
    pub fn finish(mut self) -> PdfOutput {
        self.show_page();
        let Canvas {
            mut doc,
            pages,
            finished_text,
            ..
        } = self;
        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(count = warnings.len(), "printpdf emitted warnings");
        }
        debug!(pages = finished_text.len(), bytes = bytes.len(), "PDF serialized");

        PdfOutput {
            bytes,
            page_text: finished_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colours() {
        let c = Colour::hex(0x2c3e50);
        assert_eq!((c.r, c.g, c.b), (0x2c, 0x3e, 0x50));
    }

    #[test]
    fn pages_and_text_log() {
        let mut canvas = Canvas::new("test", PageFormat::A4_PORTRAIT);
        assert_eq!(canvas.page_count(), 1);
        canvas.text(72.0, 700.0, Pen::bold(12.0), "Première page");
        canvas.fill_rect(10.0, 10.0, 50.0, 20.0, Colour::hex(0xecf0f1));
        canvas.show_page();
        canvas.text_centered(canvas.width() / 2.0, 700.0, Pen::regular(10.0), "Seconde");
        assert_eq!(canvas.page_count(), 2);

        let out = canvas.finish();
        assert_eq!(out.page_count(), 2);
        assert!(out.page_contains(0, "Première"));
        assert!(out.page_contains(1, "Seconde"));
        assert!(!out.page_contains(1, "Première"));
        assert!(out.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn images_are_embedded() {
        let mut canvas = Canvas::new("img", PageFormat::A4_LANDSCAPE);
        let img = RgbImage::from_pixel(20, 10, image::Rgb([200, 10, 10]));
        let h = canvas.image_fit_width(&img, 0.0, 0.0, 100.0);
        assert!((h - 50.0).abs() < 1e-4);
        let out = canvas.finish();
        assert_eq!(out.page_count(), 1);
    }
}
