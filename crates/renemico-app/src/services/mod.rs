// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer: bridges callers (the CLI, a web front end) to the backend
// crates.
//
// Write paths run their pre-save steps explicitly here; read paths fetch
// records, aggregate and hand typed byte streams back.

pub mod app_services;
pub mod data_dir;
pub mod documents;
pub mod finance;
pub mod images;
pub mod membership;
pub mod users;

pub use app_services::AppServices;
pub use documents::RenderedDocument;
pub use images::ServedImage;
