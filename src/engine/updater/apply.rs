//! Update Application
//!
//! Turns the server's descriptors into either a list of available updates
//! or a sequence of delete-then-download replacements. Items are handled
//! independently: one failure never stops the rest of the run.

use super::client::{DescriptorKind, Transport, UpdateDescriptor};
use super::download::{DownloadError, Downloader};
use super::locator::ComponentTable;
use super::state::RunStateMarker;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// What a run does with the offered updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Report what could be updated without touching the filesystem
    ListOnly,
    /// Replace stale files with the offered ones
    Download,
}

/// Why a single item failed
#[derive(Error, Debug)]
pub enum ApplyError {
    #[error("Invalid file type {0}")]
    UnrecognizedKind(String),

    #[error("Invalid file name '{0}'")]
    InvalidFilename(String),

    #[error("The file {} could not be deleted. Make sure it's not in use! ({source})", path.display())]
    TargetInUse {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("File {filename} ({url}) could not be downloaded: {source}")]
    Download {
        filename: String,
        url: String,
        #[source]
        source: DownloadError,
    },
}

/// Terminal state of one descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// The target now holds the new content
    Downloaded { path: PathBuf },
    /// Listed as available, nothing written
    Skipped { path: PathBuf },
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    pub filename: String,
    pub kind: String,
    #[serde(flatten)]
    pub outcome: UpdateOutcome,
}

/// Counts and per-item results of one run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub mode: RunMode,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub marker_created: bool,
    pub items: Vec<ItemReport>,
}

impl RunSummary {
    /// The server had nothing to offer
    pub fn is_up_to_date(&self) -> bool {
        self.total == 0
    }

    /// Target paths listed as available in a report-only run
    pub fn available(&self) -> impl Iterator<Item = &Path> {
        self.items.iter().filter_map(|item| match &item.outcome {
            UpdateOutcome::Skipped { path } => Some(path.as_path()),
            _ => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().filter_map(|item| match &item.outcome {
            UpdateOutcome::Failed { reason } => Some((item.filename.as_str(), reason.as_str())),
            _ => None,
        })
    }
}

pub struct UpdateApplier<'a, T: Transport> {
    server_root: &'a Path,
    table: &'a ComponentTable,
    downloader: Downloader<'a, T>,
    marker: &'a RunStateMarker,
}

impl<'a, T: Transport> UpdateApplier<'a, T> {
    pub fn new(
        server_root: &'a Path,
        table: &'a ComponentTable,
        transport: &'a T,
        marker: &'a RunStateMarker,
    ) -> Self {
        Self {
            server_root,
            table,
            downloader: Downloader::new(transport),
            marker,
        }
    }

    /// Process every descriptor once and summarize the run
    pub fn apply(&self, descriptors: Vec<UpdateDescriptor>, mode: RunMode) -> RunSummary {
        let total = descriptors.len();
        if mode == RunMode::Download && total > 0 {
            info!("Starting download of {} files", total);
        }

        let items: Vec<ItemReport> = descriptors
            .into_iter()
            .map(|descriptor| {
                let outcome = match mode {
                    RunMode::ListOnly => self.list_one(&descriptor),
                    RunMode::Download => self.apply_one(&descriptor),
                };
                if let UpdateOutcome::Failed { reason } = &outcome {
                    warn!("{}", reason);
                }
                ItemReport {
                    filename: descriptor.filename,
                    kind: descriptor.kind.to_string(),
                    outcome,
                }
            })
            .collect();

        let succeeded = items
            .iter()
            .filter(|i| matches!(i.outcome, UpdateOutcome::Downloaded { .. }))
            .count();
        let failed = items
            .iter()
            .filter(|i| matches!(i.outcome, UpdateOutcome::Failed { .. }))
            .count();

        let marker_created = match mode {
            RunMode::Download if total > 0 => {
                info!("All downloads finished. Failed downloads: {}", failed);
                self.marker.finalize(succeeded)
            }
            _ => false,
        };

        RunSummary {
            mode,
            total,
            succeeded,
            failed,
            marker_created,
            items,
        }
    }

    fn list_one(&self, descriptor: &UpdateDescriptor) -> UpdateOutcome {
        match self.resolve_target(descriptor) {
            Ok(path) => UpdateOutcome::Skipped { path },
            Err(e) => UpdateOutcome::Failed { reason: e.to_string() },
        }
    }

    fn apply_one(&self, descriptor: &UpdateDescriptor) -> UpdateOutcome {
        match self.replace(descriptor) {
            Ok(path) => {
                info!("File {} was successfully downloaded and replaced", path.display());
                UpdateOutcome::Downloaded { path }
            }
            Err(e) => UpdateOutcome::Failed { reason: e.to_string() },
        }
    }

    /// Delete the stale file, clear the target and download into it
    fn replace(&self, descriptor: &UpdateDescriptor) -> Result<PathBuf, ApplyError> {
        let target = self.resolve_target(descriptor)?;
        self.remove_stale(&descriptor.old_file);

        let absolute = self.server_root.join(&target);
        if absolute.exists() {
            fs::remove_file(&absolute).map_err(|source| ApplyError::TargetInUse {
                path: target.clone(),
                source,
            })?;
        }

        info!("Starting download for {} ({})", target.display(), descriptor.download_url);
        self.downloader
            .download(&descriptor.download_url, &absolute)
            .map_err(|source| ApplyError::Download {
                filename: descriptor.filename.clone(),
                url: descriptor.download_url.clone(),
                source,
            })?;

        Ok(target)
    }

    /// Target path, relative to the server root, for a descriptor
    fn resolve_target(&self, descriptor: &UpdateDescriptor) -> Result<PathBuf, ApplyError> {
        let kind = match &descriptor.kind {
            DescriptorKind::Known(kind) => *kind,
            DescriptorKind::Unrecognized(raw) => {
                return Err(ApplyError::UnrecognizedKind(raw.clone()))
            }
        };
        if !is_bare_file_name(&descriptor.filename) {
            return Err(ApplyError::InvalidFilename(descriptor.filename.clone()));
        }
        Ok(self.table.target_dir(kind).join(&descriptor.filename))
    }

    /// Best effort: a stale file that cannot be removed is only logged
    fn remove_stale(&self, old_file: &str) {
        if old_file.is_empty() {
            return;
        }
        let relative = Path::new(old_file);
        if !stays_inside_root(relative) {
            warn!("Oldfile ({}) is outside the server directory, not deleting", old_file);
            return;
        }

        let path = self.server_root.join(relative);
        if !path.exists() {
            debug!("Oldfile ({}) does not exist", old_file);
            return;
        }
        match fs::remove_file(&path) {
            Ok(()) => debug!("Deleted {}", old_file),
            Err(e) => warn!("Oldfile ({}) could not be deleted: {}", old_file, e),
        }
    }
}

fn is_bare_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().is_some_and(|n| n == name)
}

fn stays_inside_root(path: &Path) -> bool {
    path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
