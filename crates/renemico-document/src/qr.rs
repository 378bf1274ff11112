// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// QR payloads and their rasterization.
//
// Payloads are plain multi-line text so that any phone scanner shows them
// verbatim. Images are always generated fresh; persisting a member's or an
// operator's QR image is the service layer's job.

use std::io::Cursor;

use chrono::NaiveDate;
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::types::Color;
use qrcode::{EcLevel, QrCode};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use renemico_core::config::Branding;
use renemico_core::error::{RenemicoError, Result};
use renemico_core::{Contribution, Member, User};
use renemico_finance::LedgerTotals;

use crate::format::{card_date, month_year, plain_money, short_date};

/// Default edge length of member and operator QR images, in pixels.
pub const DEFAULT_SIZE_PX: u32 = 200;

/// Blank modules around the symbol.
const QUIET_ZONE: u32 = 4;

/// Member card payload.
pub fn member_payload(member: &Member, branding: &Branding) -> String {
    format!(
        "Code : {}\nNom : {}\nPost-Nom : {}\nPrénom : {}\nCatégorie : {}\n\
         Date d'enregistrement : {}\nÀ vérifier l’authenticité sur {}",
        member.code,
        member.nom,
        member.post_nom,
        member.prenom,
        member.category.label(),
        card_date(member.registered_on),
        branding.website,
    )
}

/// Operator card payload.
pub fn user_payload(user: &User) -> String {
    format!(
        "USER:{}\nNAME:{}\nPHONE:{}",
        user.username,
        user.full_name(),
        user.phone
    )
}

pub fn invoice_payload(
    contribution: &Contribution,
    member: &Member,
    branding: &Branding,
    currency: &str,
) -> String {
    format!(
        "{} - Facture de cotisation\nN°: {}\nMembre: {}\nMois: {}\nMontant: {} {currency}\nDate: {}",
        branding.acronym,
        contribution.invoice_number(),
        member.full_name(),
        month_year(contribution.month),
        contribution.amount,
        short_date(contribution.paid_at.date_naive()),
    )
}

pub fn member_history_payload(
    member: &Member,
    total: i64,
    months: usize,
    branding: &Branding,
    currency: &str,
    as_of: NaiveDate,
) -> String {
    format!(
        "{} - Historique des cotisations\nMembre: {}\nTotal des cotisations: {} {currency}\n\
         Nombre de mois: {}\nGénéré le: {}",
        branding.acronym,
        member.full_name(),
        plain_money(Decimal::from(total)),
        months,
        short_date(as_of),
    )
}

pub fn all_history_payload(
    total: i64,
    count: usize,
    branding: &Branding,
    currency: &str,
    as_of: NaiveDate,
) -> String {
    format!(
        "{} - Historique des cotisations de tous les membres\nTotal des cotisations: {} {currency}\n\
         Nombre de contributions: {}\nGénéré le: {}",
        branding.acronym,
        plain_money(Decimal::from(total)),
        count,
        short_date(as_of),
    )
}

pub fn ledger_payload(
    period_label: &str,
    totals: &LedgerTotals,
    count: usize,
    branding: &Branding,
    currency: &str,
    as_of: NaiveDate,
) -> String {
    format!(
        "{} - Rapport {}\nEntrées: {} {currency}\nSorties: {} {currency}\nSolde: {} {currency}\n\
         Nombre d'opérations: {}\nGénéré le: {}",
        branding.acronym,
        period_label,
        plain_money(totals.inflow),
        plain_money(totals.outflow),
        plain_money(totals.balance()),
        count,
        short_date(as_of),
    )
}

/// Rasterize `payload` into a square black-on-white image of `size_px`.
#[instrument(skip(payload), fields(payload_len = payload.len()))]
pub fn render(payload: &str, size_px: u32) -> Result<GrayImage> {
    if size_px == 0 {
        return Err(RenemicoError::QrError("image size must be positive".into()));
    }
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::L)
        .map_err(|e| RenemicoError::QrError(format!("payload rejected: {e}")))?;

    let modules = code.to_colors();
    let width = code.width() as u32;
    let side = width + QUIET_ZONE * 2;

    let mut grid = GrayImage::from_pixel(side, side, Luma([255u8]));
    for (i, color) in modules.iter().enumerate() {
        if *color == Color::Dark {
            let x = i as u32 % width + QUIET_ZONE;
            let y = i as u32 / width + QUIET_ZONE;
            grid.put_pixel(x, y, Luma([0u8]));
        }
    }

    debug!(modules = width, size_px, "QR rasterized");
    Ok(image::imageops::resize(&grid, size_px, size_px, FilterType::Nearest))
}

/// [`render`] encoded as PNG.
pub fn render_png(payload: &str, size_px: u32) -> Result<Vec<u8>> {
    let img = render(payload, size_px)?;
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| RenemicoError::QrError(format!("PNG encoding failed: {e}")))?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use renemico_core::{Category, MemberStatus, Province, Sex, UserLevel};

    fn member() -> Member {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        Member {
            id: 3,
            code: "AB12CD34".into(),
            province: Province::Lualaba,
            category: Category::Founder,
            function: None,
            site: None,
            nom: "MUKENDI".into(),
            post_nom: "KABAMBA".into(),
            prenom: "JEAN".into(),
            sex: Sex::Male,
            birth_date: d(1980, 5, 12),
            birth_place: "LIKASI".into(),
            address: None,
            phone: None,
            email: None,
            photo: None,
            qrcode: None,
            registered_on: d(2025, 3, 4),
            updated_on: d(2025, 3, 4),
            expires_on: d(2028, 3, 4),
            status: MemberStatus::Active,
            profession: None,
            observations: None,
            card_renewed: false,
        }
    }

    #[test]
    fn member_payload_lines() {
        let payload = member_payload(&member(), &Branding::default());
        let lines: Vec<&str> = payload.lines().collect();
        assert_eq!(lines[0], "Code : AB12CD34");
        assert_eq!(lines[4], "Catégorie : Membre Fondateur");
        assert_eq!(lines[5], "Date d'enregistrement : 04-03-2025");
        assert!(lines[6].ends_with("www.renemico.com"));
    }

    #[test]
    fn user_payload_lines() {
        let user = User {
            id: 1,
            username: "JM0308".into(),
            first_name: "Jean".into(),
            last_name: "Mukendi".into(),
            email: "jean@renemico.com".into(),
            phone: "+243812345678".into(),
            level: UserLevel::Operator,
            photo: None,
            qrcode: None,
            is_verified: true,
        };
        assert_eq!(
            user_payload(&user),
            "USER:JM0308\nNAME:Jean Mukendi\nPHONE:+243812345678"
        );
    }

    #[test]
    fn invoice_payload_has_number_and_amount() {
        let contribution = Contribution {
            id: 42,
            member_id: 3,
            month: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            amount: 50,
            paid_at: Utc.with_ymd_and_hms(2025, 8, 5, 9, 0, 0).unwrap(),
        };
        let payload = invoice_payload(&contribution, &member(), &Branding::default(), "USD");
        assert!(payload.contains("N°: COT-0042"));
        assert!(payload.contains("Mois: août 2025"));
        assert!(payload.contains("Montant: 50 USD"));

        let francs = invoice_payload(&contribution, &member(), &Branding::default(), "CDF");
        assert!(francs.contains("Montant: 50 CDF"));
        assert!(payload.contains("Date: 05/08/2025"));
    }

    #[test]
    fn rendered_image_is_square_with_white_border() {
        let img = render("Code : AB12CD34", 200).unwrap();
        assert_eq!(img.dimensions(), (200, 200));
        assert_eq!(img.get_pixel(0, 0), &Luma([255u8]));
        assert!(img.pixels().any(|p| p.0[0] == 0));
    }

    #[test]
    fn png_output_decodes() {
        let png = render_png("USER:X", 120).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (120, 120));
    }

    #[test]
    fn zero_size_rejected() {
        assert!(matches!(render("x", 0), Err(RenemicoError::QrError(_))));
    }
}
