// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contribution statements: one member's history and the history of every
// member.

use chrono::NaiveDate;
use renemico_core::error::Result;
use renemico_core::{Contribution, Member, PageFormat};
use renemico_finance::aggregate::{self, HistoryLine};
use rust_decimal::Decimal;
use tracing::{info, instrument};

use super::canvas::{CM, Canvas, Colour, PdfOutput, Pen};
use super::letterhead::{self, GRID, LIGHT, MARGIN, PRIMARY, RenderContext, SECONDARY};
use super::table::{Align, Cell, Row, Table};
use crate::format::{file_component, money_units, month_year};
use crate::qr;
use crate::words::{amount_in_words, wrap_words};

pub const STATEMENT_TITLE: &str = "HISTORIQUE DES COTISATIONS";
pub const ALL_MEMBERS_FILENAME: &str = "Historique_Tous_Membres.pdf";

const ROW_HEIGHT: f32 = 0.7 * CM;

/// `historique_MUKENDI.pdf`
pub fn member_history_filename(member: &Member) -> String {
    format!("historique_{}.pdf", file_component(&member.nom))
}

/// Header band, title band and the centred subtitle with its rule.
/// Returns the y where the table starts.
fn statement_top(canvas: &mut Canvas, ctx: &RenderContext, subtitle: &str) -> f32 {
    let mut y = letterhead::header(canvas, ctx);
    letterhead::title_band(canvas, y, STATEMENT_TITLE);
    y -= 1.8 * CM;
    let w = canvas.width();
    canvas.text_centered(w / 2.0, y, Pen::bold(12.0).colour(PRIMARY), subtitle);
    y -= 1.0 * CM;
    canvas.line((MARGIN, y), (w - MARGIN, y), SECONDARY, 1.0);
    y - 0.5 * CM
}

fn header_row(titles: &[&str], size: f32) -> Row {
    let pen = Pen::bold(size).colour(Colour::WHITE);
    Row::new(
        titles
            .iter()
            .map(|t| Cell::new(*t, pen).fill(PRIMARY).align(Align::Center))
            .collect(),
        ROW_HEIGHT,
    )
}

/// Everything below the subtitle of a statement.
struct StatementBody<'a> {
    table: Table,
    header: Row,
    rows: Vec<Row>,
    total_row: Row,
    words_label: &'a str,
    words_offset: f32,
    total: i64,
    payload: String,
}

/// Lay out the table, then the amount in words, the QR code and the footer,
/// breaking to a new page wherever the next block would not fit.
fn finish_statement(
    canvas: &mut Canvas,
    ctx: &RenderContext,
    table_top: f32,
    body: StatementBody<'_>,
) -> Result<()> {
    let table = &body.table;
    let x = (canvas.width() - table.width()) / 2.0;
    let page_top = canvas.height() - MARGIN;
    let bottom = MARGIN + 5.0 * CM;

    let mut y = table.draw_flowing(
        canvas,
        x,
        table_top,
        bottom,
        page_top,
        &body.header,
        &body.rows,
    );
    if y - ROW_HEIGHT < MARGIN + 2.5 * CM {
        canvas.show_page();
        y = page_top;
    }
    table.draw_row(canvas, x, y, &body.total_row);
    canvas.line((x, y), (x + table.width(), y), Colour::BLACK, 1.0);
    y -= ROW_HEIGHT + 1.0 * CM;

    let words = wrap_words(
        &amount_in_words(Decimal::from(body.total), &ctx.currency_words),
        80,
    );
    // Words, a gap and the QR must stay clear of the footer rule.
    let needed = words.len() as f32 * 0.4 * CM + 1.0 * CM + 3.5 * CM;
    if y - needed < MARGIN + 2.6 * CM {
        canvas.show_page();
        y = page_top;
    }
    y = letterhead::words_block(canvas, y, body.words_label, body.words_offset, &words);
    y -= 0.2 * CM;

    letterhead::qr_code(canvas, &body.payload, MARGIN, y - 3.5 * CM, 3.5 * CM)?;

    let contact = format!(
        "Ce document est généré automatiquement, pour toute question, contactez-nous à {}",
        ctx.branding.email
    );
    letterhead::footer(
        canvas,
        &["Merci pour votre confiance et vos cotisations !", &contact],
    );
    Ok(())
}

/// One member's contributions, newest month first, with total and amount
/// in words.
#[instrument(skip_all, fields(member = %member.code, contributions = contributions.len()))]
pub fn render_member_history(
    ctx: &RenderContext,
    member: &Member,
    contributions: &[Contribution],
    as_of: NaiveDate,
) -> Result<PdfOutput> {
    let mut canvas = Canvas::new(STATEMENT_TITLE, PageFormat::A4_PORTRAIT);
    let subtitle = format!(
        "{STATEMENT_TITLE} DE: {}",
        member.full_name().to_uppercase()
    );
    let top = statement_top(&mut canvas, ctx, &subtitle);

    let body_pen = Pen::regular(10.0).colour(PRIMARY);
    let history = aggregate::history_desc(contributions);
    let rows: Vec<Row> = history
        .iter()
        .map(|c| {
            Row::new(
                vec![
                    Cell::new(month_year(c.month), body_pen),
                    Cell::new(money_units(c.amount), body_pen).align(Align::Right),
                ],
                ROW_HEIGHT,
            )
        })
        .collect();

    let summary = aggregate::member_summary(contributions);
    let bold = Pen::bold(10.0).colour(PRIMARY);
    let total_row = Row::new(
        vec![
            Cell::new("TOTAL", bold).fill(LIGHT),
            Cell::new(money_units(summary.total), bold)
                .fill(LIGHT)
                .align(Align::Right),
        ],
        ROW_HEIGHT,
    );

    let amount_title = format!("Montant ({})", ctx.currency_code);
    let body = StatementBody {
        table: Table::new(vec![12.0 * CM, 6.0 * CM]).with_grid(GRID, 1.0),
        header: header_row(&["Mois", &amount_title], 12.0),
        rows,
        total_row,
        words_label: "Total en lettres:",
        words_offset: 3.0 * CM,
        total: summary.total,
        payload: qr::member_history_payload(
            member,
            summary.total,
            summary.months_paid,
            &ctx.branding,
            &ctx.currency_code,
            as_of,
        ),
    };
    finish_statement(&mut canvas, ctx, top, body)?;

    let output = canvas.finish();
    info!(
        pages = output.page_count(),
        total = summary.total,
        "member history rendered"
    );
    Ok(output)
}

/// Text columns stay left-aligned; only the amount is flushed right.
fn all_history_row(line: &HistoryLine<'_>, pen: Pen) -> Row {
    Row::new(
        vec![
            Cell::new(format!("{} {}", line.member.nom, line.member.post_nom), pen),
            Cell::new(line.member.code.as_str(), pen),
            Cell::new(line.member.province.label(), pen),
            Cell::new(month_year(line.contribution.month), pen),
            Cell::new(money_units(line.contribution.amount), pen).align(Align::Right),
        ],
        ROW_HEIGHT,
    )
}

/// Every contribution of every member, ordered by last name then newest
/// month.
#[instrument(skip_all, fields(members = members.len(), contributions = contributions.len()))]
pub fn render_all_history(
    ctx: &RenderContext,
    members: &[Member],
    contributions: &[Contribution],
    as_of: NaiveDate,
) -> Result<PdfOutput> {
    let mut canvas = Canvas::new(STATEMENT_TITLE, PageFormat::A4_PORTRAIT);
    let top = statement_top(
        &mut canvas,
        ctx,
        "HISTORIQUE DES COTISATIONS DE TOUS LES MEMBRES",
    );

    let pen = Pen::regular(9.0).colour(PRIMARY);
    let lines: Vec<HistoryLine<'_>> = aggregate::all_members_history(members, contributions);
    let total: i64 = lines.iter().map(|l| l.contribution.amount).sum();
    let rows: Vec<Row> = lines.iter().map(|l| all_history_row(l, pen)).collect();

    let bold = Pen::bold(9.0).colour(PRIMARY);
    let total_row = Row::new(
        vec![
            Cell::new("TOTAL GENERAL", bold).fill(LIGHT).span(4),
            Cell::new(money_units(total), bold).fill(LIGHT).align(Align::Right),
        ],
        ROW_HEIGHT,
    );

    let amount_title = format!("Montant ({})", ctx.currency_code);
    let body = StatementBody {
        table: Table::new(vec![4.0 * CM, 3.0 * CM, 4.0 * CM, 5.0 * CM, 3.0 * CM])
            .with_grid(GRID, 1.0),
        header: header_row(&["Membre", "Code", "Province", "Mois", &amount_title], 10.0),
        rows,
        total_row,
        words_label: "Total général en lettres:",
        words_offset: 4.0 * CM,
        total,
        payload: qr::all_history_payload(
            total,
            lines.len(),
            &ctx.branding,
            &ctx.currency_code,
            as_of,
        ),
    };
    finish_statement(&mut canvas, ctx, top, body)?;

    let output = canvas.finish();
    info!(
        pages = output.page_count(),
        lines = lines.len(),
        total,
        "all-members history rendered"
    );
    Ok(output)
}
