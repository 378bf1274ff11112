// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// File name of the persisted configuration inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Organization identity printed on every document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branding {
    pub name: String,
    pub acronym: String,
    pub country: String,
    pub address_lines: Vec<String>,
    pub phone: String,
    pub email: String,
    /// Shown on QR payloads as the authenticity check location.
    pub website: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            name: "REGROUPEMENT DES NEGOCIANTS MINIERS DU CONGO".into(),
            acronym: "RENEMICO".into(),
            country: "REPUBLIQUE DEMOCRATIQUE DU CONGO".into(),
            address_lines: vec![
                "297, Avenue Lubudi, Quartier Industriel, Manika, Kolwezi".into(),
                "Lualaba - RDC".into(),
            ],
            phone: "+243 81 60 69 861".into(),
            email: "contact@renemico.com".into(),
            website: "www.renemico.com".into(),
        }
    }
}

impl Branding {
    /// "Tél: ... - Email: ..." contact line of the letterhead.
    pub fn contact_line(&self) -> String {
        format!("Tél: {} - Email: {}", self.phone, self.email)
    }
}

/// Branding image locations. Missing files are replaced by drawn placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub logo: PathBuf,
    /// Faded into the card background.
    pub card_watermark: PathBuf,
    pub seal: PathBuf,
    pub secondary_seal: PathBuf,
    pub signature: PathBuf,
    pub banner: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        let base = PathBuf::from("assets");
        Self {
            logo: base.join("logo.png"),
            card_watermark: base.join("logo2.png"),
            seal: base.join("pca.png"),
            secondary_seal: base.join("am.png"),
            signature: base.join("signature.png"),
            banner: base.join("ap.png"),
        }
    }
}

impl AssetPaths {
    /// Resolve every relative path against `root`.
    pub fn resolved_against(&self, root: &Path) -> Self {
        let join = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                root.join(p)
            }
        };
        Self {
            logo: join(&self.logo),
            card_watermark: join(&self.card_watermark),
            seal: join(&self.seal),
            secondary_seal: join(&self.secondary_seal),
            signature: join(&self.signature),
            banner: join(&self.banner),
        }
    }
}

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub branding: Branding,
    pub assets: AssetPaths,
    /// Currency code appended to amounts in tables ("USD").
    pub currency_code: String,
    /// Currency in words for the amount-in-words line.
    pub currency_words: String,
    /// SQLite file name inside the data directory.
    pub database_file: String,
    /// Lifetime of served images, in days.
    pub image_cache_days: u32,
    /// QR image size in pixels.
    pub qr_size_px: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            branding: Branding::default(),
            assets: AssetPaths::default(),
            currency_code: "USD".into(),
            currency_words: "dollars américains".into(),
            database_file: "renemico.db".into(),
            image_cache_days: 30,
            qr_size_px: 200,
        }
    }
}

impl AppConfig {
    /// Read `config.json` from `data_dir`. `None` when absent or unreadable.
    pub fn load(data_dir: &Path) -> Option<Self> {
        let path = data_dir.join(CONFIG_FILE);
        let data = std::fs::read_to_string(&path).ok()?;
        serde_json::from_str(&data).ok()
    }

    /// Load, falling back to defaults.
    pub fn load_or_default(data_dir: &Path) -> Self {
        Self::load(data_dir).unwrap_or_default()
    }

    pub fn persist(&self, data_dir: &Path) -> Result<()> {
        let path = data_dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(dir.path());
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.image_cache_days, 30);
    }

    #[test]
    fn persist_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.branding.phone = "+243 99 00 00 000".into();
        config.persist(dir.path()).unwrap();

        let loaded = AppConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.branding.phone, "+243 99 00 00 000");
    }

    #[test]
    fn partial_file_fills_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), r#"{"currency_code":"CDF"}"#).unwrap();
        let loaded = AppConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.currency_code, "CDF");
        assert_eq!(loaded.branding.acronym, "RENEMICO");
    }

    #[test]
    fn relative_assets_resolve_against_root() {
        let assets = AssetPaths::default().resolved_against(Path::new("/srv/renemico"));
        assert_eq!(assets.logo, PathBuf::from("/srv/renemico/assets/logo.png"));
    }
}
