// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — drawing surface, tables, letterhead and the document renderers.

pub mod canvas;
pub mod card;
pub mod inspect;
pub mod invoice;
pub mod letterhead;
pub mod metrics;
pub mod report;
pub mod statement;
pub mod table;
pub mod user_card;

#[cfg(test)]
pub(crate) mod test_support;

pub use canvas::{Canvas, PdfOutput};
pub use card::{card_filename, render_card};
pub use invoice::{invoice_filename, render_invoice};
pub use letterhead::{BrandAssets, RenderContext};
pub use report::{render_report, report_filename};
pub use statement::{
    ALL_MEMBERS_FILENAME, member_history_filename, render_all_history, render_member_history,
};
pub use user_card::{render_user_card, user_card_filename};
