// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Periodic ledger report.

use chrono::NaiveDate;
use renemico_core::error::Result;
use renemico_core::{Operation, PageFormat};
use renemico_finance::Period;
use renemico_finance::aggregate::{ledger_totals, operations_in};
use tracing::{info, instrument};

use super::canvas::{CM, Canvas, Colour, PdfOutput, Pen};
use super::letterhead::{self, GRID, LIGHT, MARGIN, PRIMARY, RenderContext};
use super::table::{Align, Cell, Row, Table};
use crate::format::{file_component, money, short_date, truncate};
use crate::qr;

const ROW_HEIGHT: f32 = 0.6 * CM;
const MOTIVE_CHARS: usize = 30;

/// `rapport_mensuel.pdf`
pub fn report_filename(token: &str) -> String {
    format!("rapport_{}.pdf", file_component(token))
}

pub fn report_title(token: &str) -> String {
    format!("Rapport {} des Opérations", token.to_uppercase())
}

/// Ledger operations of the period named by `token`, newest first, with
/// inflow, outflow and balance. Unknown tokens report every operation.
#[instrument(skip(ctx, operations), fields(operations = operations.len()))]
pub fn render_report(
    ctx: &RenderContext,
    token: &str,
    operations: &[Operation],
    as_of: NaiveDate,
) -> Result<PdfOutput> {
    let period = Period::from_token(token);
    let selected = operations_in(operations, period, as_of);
    let totals = ledger_totals(selected.iter().copied());
    let title = report_title(token);

    let mut canvas = Canvas::new(&title, PageFormat::A4_PORTRAIT);
    let mut y = letterhead::header(&mut canvas, ctx);
    letterhead::title_band(&mut canvas, y, &title);
    y -= 1.5 * CM;

    let pen = Pen::regular(10.0).colour(PRIMARY);
    let head = Pen::bold(10.0).colour(Colour::WHITE);
    let amount_title = format!("Montant ({})", ctx.currency_code);
    let header = Row::new(
        ["Date", "Type", "Description", amount_title.as_str()]
            .into_iter()
            .map(|t| Cell::new(t, head).fill(PRIMARY).align(Align::Center))
            .collect(),
        ROW_HEIGHT,
    );
    let rows: Vec<Row> = selected
        .iter()
        .map(|op| {
            Row::new(
                vec![
                    Cell::new(short_date(op.date), pen),
                    Cell::new(op.kind.label(), pen),
                    Cell::new(truncate(&op.motive, MOTIVE_CHARS), pen),
                    Cell::new(money(op.amount), pen).align(Align::Right),
                ],
                ROW_HEIGHT,
            )
        })
        .collect();

    let table = Table::new(vec![3.0 * CM, 3.0 * CM, 7.0 * CM, 4.0 * CM]).with_grid(GRID, 0.5);
    let x = (canvas.width() - table.width()) / 2.0;
    let page_top = canvas.height() - MARGIN;
    y = table.draw_flowing(&mut canvas, x, y, MARGIN + 3.0 * CM, page_top, &header, &rows);

    let bold = Pen::bold(10.0).colour(PRIMARY);
    let summary = [
        ("TOTAL ENTRÉES", totals.inflow),
        ("TOTAL SORTIES", totals.outflow),
        ("SOLDE", totals.balance()),
    ];
    if y - summary.len() as f32 * ROW_HEIGHT < MARGIN + 2.6 * CM {
        canvas.show_page();
        y = page_top;
    }
    canvas.line((x, y), (x + table.width(), y), Colour::BLACK, 1.0);
    for (label, amount) in summary {
        let row = Row::new(
            vec![
                Cell::new(label, bold).fill(LIGHT).span(3),
                Cell::new(format!("{} {}", money(amount), ctx.currency_code), bold)
                    .fill(LIGHT)
                    .align(Align::Right),
            ],
            ROW_HEIGHT,
        );
        table.draw_row(&mut canvas, x, y, &row);
        y -= ROW_HEIGHT;
    }
    y -= 0.8 * CM;

    if y - 3.5 * CM < MARGIN + 2.6 * CM {
        canvas.show_page();
        y = page_top;
    }
    let payload = qr::ledger_payload(
        &token.to_uppercase(),
        &totals,
        selected.len(),
        &ctx.branding,
        &ctx.currency_code,
        as_of,
    );
    letterhead::qr_code(&mut canvas, &payload, MARGIN, y - 3.5 * CM, 3.5 * CM)?;
    canvas.text(
        MARGIN + 4.0 * CM,
        y - 1.0 * CM,
        Pen::oblique(9.0).colour(PRIMARY),
        &format!("Généré le {}", short_date(as_of)),
    );

    let contact = format!(
        "Ce rapport est généré automatiquement, pour toute question, contactez-nous à {}",
        ctx.branding.email
    );
    letterhead::footer(&mut canvas, &[&contact]);

    let output = canvas.finish();
    info!(
        token,
        period = period.map(|p| p.token()).unwrap_or("tout"),
        kept = selected.len(),
        balance = %totals.balance(),
        pages = output.page_count(),
        "ledger report rendered"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::inspect::page_count;
    use crate::pdf::test_support::{as_of, operation};
    use renemico_core::OperationKind;

    fn ops() -> Vec<Operation> {
        let today = as_of();
        let yesterday = today.pred_opt().unwrap();
        vec![
            operation(1, today, 10_000, OperationKind::Entree, "Cotisations du jour"),
            operation(2, today, 2_550, OperationKind::Sortie, "Achat de fournitures de bureau et papeterie"),
            operation(3, yesterday, 99_900, OperationKind::Entree, "Don"),
        ]
    }

    #[test]
    fn daily_report_only_has_today() {
        let out = render_report(&RenderContext::default(), "journalier", &ops(), as_of()).unwrap();
        assert_eq!(page_count(&out.bytes).unwrap(), 1);
        assert!(out.contains_text("Rapport JOURNALIER des Opérations"));
        assert!(out.contains_text("Cotisations du jour"));
        assert!(!out.contains_text("Don"));
        // Motive truncated to 30 characters.
        assert!(out.contains_text("Achat de fournitures de bureau"));
        assert!(!out.contains_text("papeterie"));
        assert!(out.contains_text("100.00 USD"));
        assert!(out.contains_text("25.50 USD"));
        assert!(out.contains_text("74.50 USD"));
    }

    #[test]
    fn unknown_token_reports_everything() {
        let out = render_report(&RenderContext::default(), "hebdo", &ops(), as_of()).unwrap();
        assert!(out.contains_text("Don"));
        assert!(out.contains_text("1,073.50 USD"));
        assert_eq!(report_filename("hebdo"), "rapport_hebdo.pdf");
    }

    #[test]
    fn empty_ledger_reports_zero() {
        let out = render_report(&RenderContext::default(), "annuel", &[], as_of()).unwrap();
        assert_eq!(out.page_count(), 1);
        assert!(out.contains_text("SOLDE"));
        assert!(out.contains_text("0.00 USD"));
    }
}
