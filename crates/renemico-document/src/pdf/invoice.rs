// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Monthly contribution invoice.

use renemico_core::error::Result;
use renemico_core::{Contribution, Member, NOT_PROVIDED, PageFormat};
use rust_decimal::Decimal;
use tracing::{info, instrument};

use super::canvas::{CM, Canvas, Colour, PdfOutput, Pen};
use super::letterhead::{
    self, GRID, LIGHT, MARGIN, PRIMARY, RenderContext, SECONDARY,
};
use super::table::{Align, Cell, Row, Table};
use crate::format::{file_component, month_year, plain_money, short_date};
use crate::qr;
use crate::words::{amount_in_words, wrap_words};

pub const INVOICE_TITLE: &str = "FACTURE DE COTISATION MENSUELLE";

/// `Facture_COT-0042_MUKENDI.pdf`
pub fn invoice_filename(contribution: &Contribution, member: &Member) -> String {
    format!(
        "Facture_{}_{}.pdf",
        contribution.invoice_number(),
        file_component(&member.nom)
    )
}

fn or_missing(value: &Option<String>) -> &str {
    value.as_deref().filter(|v| !v.trim().is_empty()).unwrap_or(NOT_PROVIDED)
}

#[instrument(skip_all, fields(invoice = %contribution.invoice_number(), member = %member.code))]
pub fn render_invoice(
    ctx: &RenderContext,
    contribution: &Contribution,
    member: &Member,
) -> Result<PdfOutput> {
    let mut canvas = Canvas::new(INVOICE_TITLE, PageFormat::A4_PORTRAIT);
    let width = canvas.width();

    let mut y = letterhead::header(&mut canvas, ctx);
    letterhead::title_band(&mut canvas, y, INVOICE_TITLE);
    y -= 1.8 * CM;

    let number = contribution.invoice_number();
    let month = month_year(contribution.month).to_uppercase();
    let paid = short_date(contribution.paid_at.date_naive());
    let label = Pen::bold(10.0).colour(PRIMARY);
    let value = Pen::regular(10.0).colour(PRIMARY);

    let info = Table::new(vec![3.5 * CM, 7.0 * CM, 3.0 * CM, 7.0 * CM]);
    let info_rows = [
        ["N° Facture:", number.as_str(), "Date:", paid.as_str()],
        ["Mois de cotisation:", month.as_str(), "Échéance:", paid.as_str()],
    ];
    let mut top = y;
    for [a, b, c, d] in info_rows {
        let row = Row::new(
            vec![
                Cell::new(a, label).fill(LIGHT),
                Cell::new(b, value),
                Cell::new(c, label).fill(LIGHT),
                Cell::new(d, value),
            ],
            0.7 * CM,
        );
        info.draw_row(&mut canvas, MARGIN, top, &row);
        top -= row.height;
    }
    y -= 2.5 * CM;

    y = letterhead::section(&mut canvas, y, "INFORMATIONS DU MEMBRE");
    let member_table = Table::new(vec![3.0 * CM, 12.0 * CM]);
    let member_rows = [
        ("Nom complet:", member.full_name()),
        ("Adresse:", or_missing(&member.address).to_string()),
        ("Téléphone:", or_missing(&member.phone).to_string()),
        ("Email:", or_missing(&member.email).to_string()),
    ];
    let mut top = y + 0.5 * CM;
    for (name, text) in &member_rows {
        let row = Row::new(
            vec![Cell::new(*name, label).fill(LIGHT), Cell::new(text.as_str(), value)],
            0.8 * CM,
        );
        member_table.draw_row(&mut canvas, MARGIN, top, &row);
        top -= row.height;
    }
    y -= member_rows.len() as f32 * 0.9 * CM + 1.0 * CM;

    y = letterhead::section(&mut canvas, y, "DÉTAILS DE LA COTISATION");
    let details = Table::new(vec![8.0 * CM, 4.0 * CM, 3.5 * CM]).with_grid(GRID, 1.0);
    let head = Pen::bold(10.0).colour(Colour::WHITE);
    let amount = Decimal::from(contribution.amount);
    let rows = [
        Row::new(
            vec![
                Cell::new("Description", head).fill(PRIMARY),
                Cell::new("Période", head).fill(PRIMARY),
                Cell::new(format!("Montant ({})", ctx.currency_code), head)
                    .fill(PRIMARY)
                    .align(Align::Right),
            ],
            0.8 * CM,
        ),
        Row::new(
            vec![
                Cell::new("Cotisation mensuelle", value),
                Cell::new(month.as_str(), value),
                Cell::new(plain_money(amount), value).align(Align::Right),
            ],
            0.8 * CM,
        ),
    ];
    let mut top = y + 0.5 * CM;
    for row in &rows {
        details.draw_row(&mut canvas, MARGIN, top, row);
        top -= row.height;
    }
    y -= rows.len() as f32 * 0.9 * CM + 1.0 * CM;

    let words = wrap_words(&amount_in_words(amount, &ctx.currency_words), 80);
    y = letterhead::words_block(&mut canvas, y, "Montant en lettres:", 3.5 * CM, &words);

    canvas.fill_rect(width - 8.0 * CM, y - 1.5 * CM, 6.5 * CM, 1.5 * CM, LIGHT);
    canvas.stroke_rect(width - 8.0 * CM, y - 1.5 * CM, 6.5 * CM, 1.5 * CM, SECONDARY, 1.5);
    canvas.text(width - 7.5 * CM, y - 0.7 * CM, Pen::bold(12.0).colour(PRIMARY), "TOTAL:");
    canvas.text_right(
        width - MARGIN - 0.5 * CM,
        y - 0.7 * CM,
        Pen::bold(14.0).colour(PRIMARY),
        &format!("{} {}", plain_money(amount), ctx.currency_code),
    );
    y -= 2.5 * CM;

    let payload = qr::invoice_payload(contribution, member, &ctx.branding, &ctx.currency_code);
    letterhead::qr_code(&mut canvas, &payload, MARGIN, y - 1.5 * CM, 3.5 * CM)?;

    let sig_y = y - 1.0 * CM;
    match &ctx.assets.signature {
        Some(sig) => canvas.image(sig, MARGIN + 6.0 * CM, sig_y, 4.5 * CM, 4.0 * CM),
        None => letterhead::placeholder(
            &mut canvas,
            MARGIN + 6.0 * CM,
            sig_y,
            4.5 * CM,
            4.0 * CM,
            "Signature non disponible",
        ),
    }
    canvas.text(MARGIN + 15.0 * CM, sig_y, value, "Signature");
    canvas.text(MARGIN + 4.5 * CM, y - 6.5 * CM, value, "Pour l'organisation:");
    canvas.line(
        (MARGIN + 4.5 * CM, y - 6.7 * CM),
        (MARGIN + 10.0 * CM, y - 6.7 * CM),
        PRIMARY,
        1.0,
    );

    let contact = format!(
        "Cette facture est générée automatiquement, pour toute question, contactez-nous à {} ou au {}.",
        ctx.branding.email, ctx.branding.phone
    );
    letterhead::footer(
        &mut canvas,
        &["Merci pour votre confiance et votre cotisation mensuelle !", &contact],
    );

    let output = canvas.finish();
    info!(pages = output.page_count(), bytes = output.bytes.len(), "invoice rendered");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::inspect::page_count;
    use crate::pdf::test_support::{contribution, member};

    #[test]
    fn filename_uses_invoice_number_and_name() {
        assert_eq!(
            invoice_filename(&contribution(42, 50), &member()),
            "Facture_COT-0042_MUKENDI.pdf"
        );
    }

    #[test]
    fn invoice_content() {
        let out = render_invoice(&RenderContext::default(), &contribution(42, 50), &member()).unwrap();
        assert_eq!(out.page_count(), 1);
        assert_eq!(page_count(&out.bytes).unwrap(), 1);
        assert!(out.contains_text(INVOICE_TITLE));
        assert!(out.contains_text("COT-0042"));
        assert!(out.contains_text("AOÛT 2025"));
        assert!(out.contains_text("50.00 USD"));
        assert!(out.contains_text("Cinquante dollars américains"));
        // No address on file.
        assert!(out.contains_text(NOT_PROVIDED));
        assert!(out.contains_text("Signature non disponible"));
    }
}
