// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Data directory resolution.

use std::path::PathBuf;

/// Overrides every other location when set.
pub const DATA_DIR_ENV: &str = "RENEMICO_DATA_DIR";

/// Return the application data directory, creating it if needed.
pub fn data_dir() -> PathBuf {
    let dir = resolve(|key| std::env::var(key).ok());
    std::fs::create_dir_all(&dir).ok();
    dir
}

/// `RENEMICO_DATA_DIR`, then `$XDG_DATA_HOME/renemico`, then
/// `$HOME/.local/share/renemico`.
fn resolve(var: impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(dir) = var(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    let base = if let Some(xdg) = var("XDG_DATA_HOME").filter(|d| !d.is_empty()) {
        PathBuf::from(xdg)
    } else if let Some(home) = var("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        // Last resort
        std::env::temp_dir()
    };
    base.join("renemico")
}
