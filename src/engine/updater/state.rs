//! Run State Marker
//!
//! A zero-length file whose existence tells the server runtime that an
//! update run has replaced files at least once, so offline mode may be
//! relaxed on the next start.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct RunStateMarker {
    path: PathBuf,
}

impl RunStateMarker {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Create the marker; an existing marker is left as is
    pub fn create(&self) -> io::Result<()> {
        if self.exists() {
            return Ok(());
        }
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        Ok(())
    }

    /// Finalize a download run: the marker is created iff at least one file
    /// was replaced. Failure to create it never fails the run.
    ///
    /// Returns whether this run left a marker in place.
    pub fn finalize(&self, succeeded: usize) -> bool {
        if succeeded == 0 {
            return false;
        }
        match self.create() {
            Ok(()) => {
                info!("Marked {}", self.path.display());
                true
            }
            Err(e) => {
                warn!(
                    "{} could not be created ({}). Please deactivate offline mode once manually.",
                    self.path.display(),
                    e
                );
                false
            }
        }
    }
}
