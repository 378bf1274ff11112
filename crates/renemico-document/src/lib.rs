// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// renemico-document — Document production for RENEMICO.
//
// French number-to-words, QR payloads, image normalization and avatars, PDF
// layout (member and operator cards, invoices, contribution statements,
// ledger reports) and XLSX exports.

pub mod export;
pub mod format;
pub mod image;
pub mod pdf;
pub mod qr;
pub mod words;

// Re-export the primary entry points so callers can use `renemico_document::render_invoice` etc.
pub use image::processor::ImageProcessor;
pub use pdf::{BrandAssets, PdfOutput, RenderContext};
pub use pdf::{render_all_history, render_card, render_invoice, render_member_history};
pub use pdf::{render_report, render_user_card};
pub use words::{amount_in_words, number_to_words};
