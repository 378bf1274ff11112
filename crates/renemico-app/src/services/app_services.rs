// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer: opens the registry, loads configuration and
// branding, and hands out locked access to both.
//
// `Registry` wraps a rusqlite connection, which is `Send` but not `Sync`, so
// it lives behind `Arc<Mutex<>>`. Every use case takes the lock for the
// duration of its reads and writes only; rendering happens after release.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use renemico_core::AppConfig;
use renemico_core::error::{RenemicoError, Result};
use renemico_document::{BrandAssets, RenderContext};
use renemico_store::Registry;
use sha2::{Digest, Sha256};
use tracing::{info, instrument};

use super::data_dir;

/// Shared application services.
///
/// All fields are Arc-wrapped so the struct can be cloned into request
/// handlers freely.
#[derive(Clone)]
pub struct AppServices {
    registry: Arc<Mutex<Registry>>,
    data_dir: PathBuf,
    config: Arc<Mutex<AppConfig>>,
    render: Arc<Mutex<Arc<RenderContext>>>,
}

impl AppServices {
    /// Initialise all services from the default data directory.
    pub fn init() -> Result<Self> {
        Self::open(data_dir::data_dir())
    }

    /// Initialise from an explicit data directory: load `config.json`, decode
    /// branding assets and open the SQLite registry.
    #[instrument(skip_all, fields(path = %dir.display()))]
    pub fn open(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)?;
        let config = AppConfig::load_or_default(&dir);
        let registry = Registry::open(dir.join(&config.database_file))?;
        let services = Self::assemble(registry, dir, config);
        info!("app services initialised");
        Ok(services)
    }

    /// In-memory registry with the given configuration. Nothing is written
    /// to disk; branding assets resolve against the working directory.
    pub fn in_memory(config: AppConfig) -> Result<Self> {
        let registry = Registry::open_in_memory()?;
        Ok(Self::assemble(registry, PathBuf::from("."), config))
    }

    fn assemble(registry: Registry, data_dir: PathBuf, config: AppConfig) -> Self {
        let render = build_context(&config, &data_dir);
        Self {
            registry: Arc::new(Mutex::new(registry)),
            data_dir,
            config: Arc::new(Mutex::new(config)),
            render: Arc::new(Mutex::new(Arc::new(render))),
        }
    }

    // -- Shared access -------------------------------------------------------

    pub(crate) fn registry(&self) -> Result<MutexGuard<'_, Registry>> {
        self.registry
            .lock()
            .map_err(|_| RenemicoError::Database("registry lock poisoned".into()))
    }

    pub(crate) fn render_context(&self) -> Result<Arc<RenderContext>> {
        self.render
            .lock()
            .map(|ctx| Arc::clone(&*ctx))
            .map_err(|_| RenemicoError::Database("render context lock poisoned".into()))
    }

    // -- Config --------------------------------------------------------------

    /// Get a clone of the current config.
    pub fn config(&self) -> Result<AppConfig> {
        self.config
            .lock()
            .map(|c| c.clone())
            .map_err(|_| RenemicoError::Database("config lock poisoned".into()))
    }

    /// Update and persist the config. Branding assets are reloaded.
    #[instrument(skip_all)]
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        config.persist(&self.data_dir)?;
        let render = build_context(config, &self.data_dir);
        *self
            .config
            .lock()
            .map_err(|_| RenemicoError::Database("config lock poisoned".into()))? = config.clone();
        *self
            .render
            .lock()
            .map_err(|_| RenemicoError::Database("render context lock poisoned".into()))? =
            Arc::new(render);
        info!("configuration saved");
        Ok(())
    }

    /// The data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

fn build_context(config: &AppConfig, root: &Path) -> RenderContext {
    RenderContext::from_config(config, BrandAssets::load(config, root))
}

/// SHA-256 of `data`, hex encoded.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
