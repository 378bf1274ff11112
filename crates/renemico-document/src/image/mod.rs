// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module: normalization of uploaded photos and branding assets, and
// generated default avatars.

pub mod avatar;
pub mod processor;

pub use processor::{ImageProcessor, Upright};
