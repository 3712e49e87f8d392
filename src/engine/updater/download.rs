//! Download Manager
//!
//! Streams a component to a `.partial` sibling and renames it into place
//! only once every byte has been written.

use super::client::{Transport, TransportError};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Download error types
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Network error: {0}")]
    Network(#[from] TransportError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Where a download is staged before it replaces `dest`
pub fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    dest.with_file_name(name)
}

/// Downloads update files through a [`Transport`]
pub struct Downloader<'a, T: Transport> {
    transport: &'a T,
}

impl<'a, T: Transport> Downloader<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Fetch `url` into `dest`, returning the number of bytes written.
    ///
    /// On failure `dest` is left untouched and the partial file is removed.
    pub fn download(&self, url: &str, dest: &Path) -> Result<u64, DownloadError> {
        let partial = partial_path(dest);
        let result = self
            .download_to_partial(url, &partial)
            .and_then(|bytes| {
                fs::rename(&partial, dest)
                    .map(|()| bytes)
                    .map_err(DownloadError::from)
            });

        match result {
            Ok(bytes) => {
                debug!("Wrote {} bytes to {}", bytes, dest.display());
                Ok(bytes)
            }
            Err(e) => {
                if partial.exists() {
                    if let Err(cleanup) = fs::remove_file(&partial) {
                        warn!("Could not remove {}: {}", partial.display(), cleanup);
                    }
                }
                Err(e)
            }
        }
    }

    fn download_to_partial(&self, url: &str, partial: &Path) -> Result<u64, DownloadError> {
        let mut stream = self.transport.open(url)?;

        let mut file = BufWriter::new(File::create(partial)?);
        let bytes = io::copy(&mut stream, &mut file)?;
        file.flush()?;
        file.get_ref().sync_all()?;

        Ok(bytes)
    }
}
