// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// renemico-app — use cases over the registry: member lifecycle, payments,
// documents, exports and image serving.

pub mod services;

pub use services::{AppServices, RenderedDocument, ServedImage};
