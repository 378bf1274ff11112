// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// renemico-store — SQLite persistence for RENEMICO records.

mod codec;
mod finance;
mod members;
pub mod registry;
mod users;

pub use registry::Registry;
