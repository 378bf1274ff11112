// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Two-sided member identity card on landscape A4.

use image::{DynamicImage, RgbImage};
use renemico_core::error::Result;
use renemico_core::{Member, NOT_PROVIDED, PageFormat};
use tracing::{info, instrument, warn};

use super::canvas::{Canvas, Colour, INCH, PdfOutput, Pen};
use super::letterhead::{RenderContext, image_or_placeholder};
use crate::format::{card_date, file_component};
use crate::image::processor::print_ready;
use crate::qr;

pub const CARD_TITLE: &str = "CARTE DE MEMBRE";

const BLUE: Colour = Colour::hex(0x0000ff);
const RED: Colour = Colour::hex(0xff0000);

/// Centre line of the front header, left of the page centre to clear the logo.
const HEADER_SHIFT: f32 = 65.0;
const FIELD_LABEL_X: f32 = 200.0;
const FIELD_VALUE_X: f32 = 380.0;
const SEX_X: f32 = 700.0;
const FIELD_SPACING: f32 = 45.0;

const NOTICE: [&str; 2] = [
    "Les autorités tant civiles que militaires sont priées d'apporter",
    "leur assistance au porteur de la présente",
];

/// `carte_AB12CD34.pdf`
pub fn card_filename(member: &Member) -> String {
    format!("carte_{}.pdf", file_component(&member.code))
}

/// Decode a stored raster, logging and dropping it when unreadable.
fn stored_raster(bytes: Option<&[u8]>, what: &'static str) -> Option<RgbImage> {
    let bytes = bytes?;
    match print_ready(bytes) {
        Ok(img) => Some(img),
        Err(e) => {
            warn!(what, error = %e, "stored image unreadable");
            None
        }
    }
}

/// The committed QR image of the member, or a fresh one when none is stored.
fn member_qr(ctx: &RenderContext, member: &Member) -> Result<RgbImage> {
    if let Some(img) = stored_raster(member.qrcode.as_deref(), "qrcode") {
        return Ok(img);
    }
    let payload = qr::member_payload(member, &ctx.branding);
    let gray = qr::render(&payload, qr::DEFAULT_SIZE_PX)?;
    Ok(DynamicImage::ImageLuma8(gray).to_rgb8())
}

fn or_missing(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_PROVIDED)
        .to_uppercase()
}

fn watermark(canvas: &mut Canvas, ctx: &RenderContext) {
    if let Some(wm) = &ctx.assets.watermark {
        let (w, h) = (canvas.width(), canvas.height());
        canvas.image(wm, 100.0, 100.0, w - 200.0, h - 200.0);
    }
}

fn front(canvas: &mut Canvas, ctx: &RenderContext, member: &Member) {
    let (w, h) = (canvas.width(), canvas.height());
    watermark(canvas, ctx);

    image_or_placeholder(
        canvas,
        ctx.assets.card_logo.as_ref(),
        (w - 145.0, h - 140.0, 1.9 * INCH, 1.9 * INCH),
        "Logo non disponible",
    );

    let cx = w / 2.0 - HEADER_SHIFT;
    let branding = &ctx.branding;
    canvas.text_centered(cx, h - 53.0, Pen::bold(25.0), &branding.country);
    canvas.text_centered(cx, h - 83.0, Pen::bold(24.0).colour(BLUE), &branding.name);
    canvas.text_centered(cx, h - 123.0, Pen::bold(36.0).colour(RED), &branding.acronym);
    canvas.text_centered(cx, h - 143.0, Pen::bold(15.0), &"*".repeat(70));
    canvas.text_centered(cx, h - 178.0, Pen::bold(40.0).colour(BLUE), CARD_TITLE);

    let photo = stored_raster(member.photo.as_deref(), "photo");
    image_or_placeholder(
        canvas,
        photo.as_ref(),
        (10.0, h - 450.0, 2.5 * INCH, 3.4 * INCH),
        "Photo non disponible",
    );

    let pen = Pen::bold(25.0);
    let fields = [
        ("NOM", member.nom.to_uppercase()),
        ("POST-NOM", member.post_nom.to_uppercase()),
        ("PRÉNOM", member.prenom.to_uppercase()),
        ("PROVINCE", member.province.label().to_uppercase()),
        ("FONCTION", or_missing(member.function.as_deref())),
        ("CATÉGORIE", member.category.label().to_uppercase()),
    ];
    let mut y = h - 225.0;
    for (i, (label, value)) in fields.iter().enumerate() {
        canvas.text(FIELD_LABEL_X, y, pen, label);
        canvas.text(FIELD_VALUE_X, y, pen, &format!(": {value}"));
        if i == 0 {
            canvas.text(SEX_X, y, pen, "SEXE");
            let gap = pen.width_of("SEXE") + 10.0;
            canvas.text(SEX_X + gap, y, pen, &format!(": {}", member.sex.code()));
        }
        y -= FIELD_SPACING;
    }

    y -= 2.0;
    let title = Pen::bold(20.0).colour(RED);
    let value = Pen::bold(16.0);
    let strip = [
        (20.0, "CODE", member.code.to_uppercase()),
        (200.0, "Délivrée le", card_date(member.registered_on)),
        (500.0, "Expiration", card_date(member.expires_on)),
    ];
    for (x, label, text) in &strip {
        canvas.text(*x, y, title, label);
        canvas.text(*x, y - 25.0, value, text);
    }

    image_or_placeholder(
        canvas,
        ctx.assets.seal.as_ref(),
        (655.0, h - 500.0, 2.5 * INCH, 2.5 * INCH),
        "Sceau non disponible",
    );
}

fn back(canvas: &mut Canvas, ctx: &RenderContext, member: &Member, qr: &RgbImage) {
    let (w, h) = (canvas.width(), canvas.height());
    watermark(canvas, ctx);

    canvas.image(qr, 10.0, h - 225.0, 3.0 * INCH, 3.0 * INCH);
    image_or_placeholder(
        canvas,
        ctx.assets.secondary_seal.as_ref(),
        (700.0, h - 170.0, 1.8 * INCH, 1.8 * INCH),
        "Logo non disponible",
    );

    let pen = Pen::bold(20.0);
    let site = member
        .site
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(NOT_PROVIDED);
    let lines = [
        ("Code Membre", member.code.as_str()),
        ("Secteur d'Activité (Site)", site),
    ];
    let mut y = h - 120.0;
    for (label, value) in lines {
        canvas.text(w - 600.0, y, pen, label);
        canvas.text(w - 375.0, y, pen, &format!(": {value}"));
        y -= 40.0;
    }

    match &ctx.assets.banner {
        Some(banner) => {
            canvas.image_fit_width(banner, 0.0, h - 350.0, 11.7 * INCH);
        }
        None => super::letterhead::placeholder(
            canvas,
            0.0,
            h - 350.0,
            w,
            1.2 * INCH,
            "Bannière non disponible",
        ),
    }

    let notice = Pen::bold(25.0);
    canvas.text_centered(w / 2.0, h - 480.0, notice, NOTICE[0]);
    canvas.text_centered(w / 2.0, h - 510.0, notice, NOTICE[1]);
}

/// Front with identity fields, back with QR code and authority notice.
#[instrument(skip_all, fields(member = %member.code))]
pub fn render_card(ctx: &RenderContext, member: &Member) -> Result<PdfOutput> {
    let qr = member_qr(ctx, member)?;

    let mut canvas = Canvas::new(CARD_TITLE, PageFormat::A4_LANDSCAPE);
    front(&mut canvas, ctx, member);
    canvas.show_page();
    back(&mut canvas, ctx, member, &qr);

    let output = canvas.finish();
    info!(
        pages = output.page_count(),
        photo = member.photo.is_some(),
        stored_qr = member.qrcode.is_some(),
        "member card rendered"
    );
    Ok(output)
}
