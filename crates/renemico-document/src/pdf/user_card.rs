// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One-page operator card on landscape A4.

use image::{DynamicImage, RgbImage};
use renemico_core::error::Result;
use renemico_core::{PageFormat, User};
use tracing::{info, instrument, warn};

use super::canvas::{CM, Canvas, PdfOutput, Pen};
use super::letterhead::{self, ACCENT, MARGIN, PRIMARY, RenderContext};
use crate::format::file_component;
use crate::image::avatar;
use crate::image::processor::{ImageProcessor, PHOTO_MAX_EDGE};
use crate::qr;

pub const USER_CARD_TITLE: &str = "CARTE D'UTILISATEUR";

/// `carte_utilisateur_jmukendi.pdf`
pub fn user_card_filename(user: &User) -> String {
    format!("carte_utilisateur_{}.pdf", file_component(&user.username))
}

/// The stored photo, upright and bounded, or the initials avatar.
fn portrait(user: &User) -> RgbImage {
    let decoded = user.photo.as_deref().map(|bytes| {
        ImageProcessor::from_bytes(bytes).map(|p| {
            p.thumbnail(PHOTO_MAX_EDGE)
                .flatten_on_white()
                .into_dynamic()
                .to_rgb8()
        })
    });
    match decoded {
        Some(Ok(img)) => img,
        Some(Err(e)) => {
            warn!(user = %user.username, error = %e, "user photo unreadable, using avatar");
            avatar::render(&user.full_name(), avatar::AVATAR_SIZE_PX)
        }
        None => avatar::render(&user.full_name(), avatar::AVATAR_SIZE_PX),
    }
}

fn user_qr(user: &User) -> Result<RgbImage> {
    if let Some(bytes) = user.qrcode.as_deref() {
        match ImageProcessor::from_bytes(bytes) {
            Ok(p) => return Ok(p.flatten_on_white().into_dynamic().to_rgb8()),
            Err(e) => warn!(user = %user.username, error = %e, "stored QR unreadable, regenerating"),
        }
    }
    let gray = qr::render(&qr::user_payload(user), qr::DEFAULT_SIZE_PX)?;
    Ok(DynamicImage::ImageLuma8(gray).to_rgb8())
}

#[instrument(skip_all, fields(user = %user.username))]
pub fn render_user_card(ctx: &RenderContext, user: &User) -> Result<PdfOutput> {
    let qr = user_qr(user)?;
    let mut canvas = Canvas::new(USER_CARD_TITLE, PageFormat::A4_LANDSCAPE);
    let w = canvas.width();

    let mut y = letterhead::header(&mut canvas, ctx);
    letterhead::title_band(&mut canvas, y, USER_CARD_TITLE);
    y -= 1.5 * CM;

    let photo_h = 7.0 * CM;
    canvas.image(&portrait(user), MARGIN, y - photo_h, 6.0 * CM, photo_h);

    let label = Pen::bold(16.0).colour(PRIMARY);
    let value = Pen::regular(16.0).colour(PRIMARY);
    let verified = if user.is_verified { "Oui" } else { "Non" };
    let full_name = user.full_name();
    let fields = [
        ("Nom d'utilisateur", user.username.as_str()),
        ("Nom complet", full_name.as_str()),
        ("Fonction", user.level.label()),
        ("Téléphone", user.phone.as_str()),
        ("Email", user.email.as_str()),
        ("Compte vérifié", verified),
    ];

    let x_label = MARGIN + 7.0 * CM;
    let x_value = x_label + 5.5 * CM;
    let mut line_y = y - 0.6 * CM;
    for (name, text) in fields {
        canvas.text(x_label, line_y, label, name);
        canvas.text(x_value, line_y, value, &format!(": {text}"));
        line_y -= 1.1 * CM;
    }

    let qr_size = 5.5 * CM;
    canvas.image(&qr, w - MARGIN - qr_size, y - qr_size, qr_size, qr_size);
    canvas.text_centered(
        w - MARGIN - qr_size / 2.0,
        y - qr_size - 0.6 * CM,
        Pen::bold(12.0).colour(ACCENT),
        &user.username,
    );

    letterhead::footer(
        &mut canvas,
        &[&format!(
            "Carte strictement personnelle, délivrée par {}",
            ctx.branding.acronym
        )],
    );

    let output = canvas.finish();
    info!(pages = output.page_count(), "user card rendered");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::inspect::page_count;
    use crate::pdf::test_support::{png_bytes, user};

    #[test]
    fn single_page_with_identity() {
        let out = render_user_card(&RenderContext::default(), &user()).unwrap();
        assert_eq!(page_count(&out.bytes).unwrap(), 1);
        assert!(out.contains_text(USER_CARD_TITLE));
        assert!(out.contains_text(": jmukendi"));
        assert!(out.contains_text(": Jean Mukendi"));
        assert!(out.contains_text(": Opérateur(trice)"));
        assert!(out.contains_text(": +243812345678"));
    }

    #[test]
    fn unreadable_photo_falls_back_to_avatar() {
        let mut u = user();
        u.photo = Some(vec![1, 2, 3]);
        assert_eq!(portrait(&u).dimensions(), (200, 200));
        u.photo = Some(png_bytes(1600, 1000));
        assert_eq!(portrait(&u).dimensions(), (800, 500));
    }

    #[test]
    fn filename() {
        assert_eq!(user_card_filename(&user()), "carte_utilisateur_jmukendi.pdf");
    }
}
