//! Shoebill Update Engine
//!
//! Reconciles the installed components with what the update server offers.
//!
//! Components:
//! - `locator` - Component kinds, scan roots and name matchers
//! - `hasher` - File fingerprints
//! - `inventory` - Scan of installed files
//! - `manifest` - Wire report of the inventory
//! - `client` - Update server transport and reply parsing
//! - `download` - Atomic file downloads
//! - `apply` - Listing or replacing offered files
//! - `state` - Run state marker

pub mod apply;
pub mod client;
pub mod download;
pub mod error;
pub mod hasher;
pub mod inventory;
pub mod locator;
pub mod manifest;
pub mod state;

pub use apply::{RunMode, RunSummary, UpdateApplier, UpdateOutcome};
pub use client::{HttpTransport, Transport, UpdateClient, UpdateDescriptor};
pub use error::UpdaterError;
pub use inventory::Inventory;
pub use locator::{ComponentKind, ComponentLocator};
pub use manifest::Manifest;

use crate::engine::config::UpdaterConfig;
use crate::engine::platform::PlatformFamily;
use error::Result;
use hasher::Hasher;
use state::RunStateMarker;
use std::path::PathBuf;
use tracing::info;

/// One update run against a server directory
pub struct Updater<T: Transport> {
    server_root: PathBuf,
    config: UpdaterConfig,
    platform: String,
    transport: T,
}

impl<T: Transport> Updater<T> {
    pub fn new(server_root: impl Into<PathBuf>, config: UpdaterConfig, transport: T) -> Self {
        Self {
            server_root: server_root.into(),
            config,
            platform: PlatformFamily::current_identifier().to_string(),
            transport,
        }
    }

    /// Read `updater.config.json` from the server root, falling back to defaults
    pub fn load(server_root: impl Into<PathBuf>, transport: T) -> Result<Self> {
        let server_root = server_root.into();
        let config = UpdaterConfig::load(&server_root)?;
        Ok(Self::new(server_root, config, transport))
    }

    /// Send the manifest to `url` instead of the configured endpoint
    pub fn with_update_url(mut self, url: impl Into<String>) -> Self {
        self.config.update_url = url.into();
        self
    }

    /// Resolve paths for `platform` instead of the host OS
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    pub fn marker(&self) -> RunStateMarker {
        RunStateMarker::new(self.server_root.join(&self.config.marker_file))
    }

    /// Scan, report, and list or apply whatever the server offers.
    ///
    /// Errors abort the run before any file is modified; per-file failures
    /// are reported in the summary instead.
    pub fn run(&self, mode: RunMode) -> Result<RunSummary> {
        let table = ComponentLocator::new(&self.config).resolve(&self.platform)?;

        if let Some(executable) = table.family().server_executable() {
            let path = self.server_root.join(executable);
            if !path.is_file() {
                return Err(UpdaterError::NotAServerDirectory(path));
            }
        }

        let hasher = Hasher::new(self.config.hash_algorithm);
        let inventory = Inventory::scan(&self.server_root, &table, &hasher)?;
        info!(
            "Inventory: {} entries, {} components missing",
            inventory.entries().len(),
            inventory.missing_kinds().len()
        );

        let manifest = Manifest::build(inventory.entries());
        let descriptors =
            UpdateClient::new(&self.transport, &self.config.update_url).fetch_updates(&manifest)?;

        let marker = self.marker();
        let applier = UpdateApplier::new(&self.server_root, &table, &self.transport, &marker);
        Ok(applier.apply(descriptors, mode))
    }
}
