//! Installed File Inventory
//!
//! Scans the component directories and fingerprints every recognized file.

use super::error::{Result, UpdaterError};
use super::hasher::Hasher;
use super::locator::{ComponentKind, ComponentTable};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One file relevant to updating
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    /// Location relative to the server root
    pub path: PathBuf,
    pub kind: ComponentKind,
    /// Lowercase hex digest, empty when the component is missing entirely
    pub digest: String,
}

impl InventoryEntry {
    pub fn is_missing(&self) -> bool {
        self.digest.is_empty()
    }
}

/// Snapshot of what is installed, built fresh for every run
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    entries: Vec<InventoryEntry>,
    missing: BTreeSet<ComponentKind>,
}

impl Inventory {
    /// Scan every root of `table` below `server_root`.
    ///
    /// Directory listings are sorted by file name so the first file matching
    /// a kind is the lexicographically smallest one.
    pub fn scan(server_root: &Path, table: &ComponentTable, hasher: &Hasher) -> Result<Self> {
        let mut missing: BTreeSet<ComponentKind> = ComponentKind::ALL.into_iter().collect();
        let mut entries = Vec::new();

        for root in table.scan_roots() {
            for file_name in list_files(&server_root.join(root))? {
                let Some(kind) = table.classify(&file_name) else {
                    debug!("Ignoring {}", root.join(&file_name).display());
                    continue;
                };

                let path = root.join(&file_name);
                let digest = hasher
                    .digest_file(&server_root.join(&path))
                    .map_err(|source| UpdaterError::Hash {
                        path: path.clone(),
                        source,
                    })?;

                if !missing.remove(&kind) {
                    debug!("{} already satisfied, still reporting {}", kind, path.display());
                }
                info!("Added {} ({}) for update check", path.display(), kind);
                entries.push(InventoryEntry { path, kind, digest });
            }
        }

        for &kind in &missing {
            let path = table.spec(kind).canonical_path();
            info!("{} is missing and was added to the download queue", kind);
            entries.push(InventoryEntry {
                path,
                kind,
                digest: String::new(),
            });
        }

        Ok(Self { entries, missing })
    }

    pub fn entries(&self) -> &[InventoryEntry] {
        &self.entries
    }

    /// Kinds with no file on disk at all
    pub fn missing_kinds(&self) -> &BTreeSet<ComponentKind> {
        &self.missing
    }

    pub fn is_missing(&self, kind: ComponentKind) -> bool {
        self.missing.contains(&kind)
    }
}

/// Regular files directly inside `dir`, sorted by name
fn list_files(dir: &Path) -> Result<Vec<String>> {
    let unavailable = |source| UpdaterError::DirectoryUnavailable {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(unavailable)? {
        let entry = entry.map_err(unavailable)?;
        if !entry.path().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        } else {
            debug!("Skipping non UTF-8 file name {:?}", entry.file_name());
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::UpdaterConfig;
    use crate::engine::updater::locator::ComponentLocator;
    use tempfile::tempdir;

    fn setup(platform: &str) -> (tempfile::TempDir, ComponentTable) {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("shoebill").join("bootstrap")).unwrap();
        fs::create_dir_all(dir.path().join("plugins")).unwrap();
        let table = ComponentLocator::new(&UpdaterConfig::default())
            .resolve(platform)
            .unwrap();
        (dir, table)
    }

    fn write(root: &Path, rel: &str, content: &[u8]) {
        fs::write(root.join(rel), content).unwrap();
    }

    #[test]
    fn test_empty_roots_report_every_kind_missing() {
        let (dir, table) = setup("linux");
        let inventory = Inventory::scan(dir.path(), &table, &Hasher::default()).unwrap();

        assert_eq!(inventory.missing_kinds().len(), 3);
        assert_eq!(inventory.entries().len(), 3);
        for kind in ComponentKind::ALL {
            let synthetic: Vec<_> = inventory.entries().iter().filter(|e| e.kind == kind).collect();
            assert_eq!(synthetic.len(), 1);
            assert!(synthetic[0].is_missing());
            assert_eq!(synthetic[0].path, table.spec(kind).canonical_path());
        }
    }

    #[test]
    fn test_present_files_are_hashed() {
        let (dir, table) = setup("linux");
        write(dir.path(), "shoebill/bootstrap/shoebill-launcher-1.1.jar", b"launcher");
        write(dir.path(), "plugins/Shoebill", b"");
        write(dir.path(), "plugins/streamer.so", b"other plugin");

        let hasher = Hasher::default();
        let inventory = Inventory::scan(dir.path(), &table, &hasher).unwrap();

        assert!(!inventory.is_missing(ComponentKind::Launcher));
        assert!(!inventory.is_missing(ComponentKind::Plugin));
        assert!(inventory.is_missing(ComponentKind::DependencyManager));
        assert_eq!(inventory.entries().len(), 3);

        let launcher = &inventory.entries()[0];
        assert_eq!(launcher.kind, ComponentKind::Launcher);
        assert_eq!(launcher.digest, hasher.digest_bytes(b"launcher"));
        assert_eq!(
            launcher.path,
            Path::new("shoebill").join("bootstrap").join("shoebill-launcher-1.1.jar")
        );

        let plugin = &inventory.entries()[1];
        assert_eq!(plugin.digest, "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_kind_never_both_missing_and_present() {
        let (dir, table) = setup("linux");
        write(dir.path(), "shoebill/bootstrap/shoebill-launcher-1.0.jar", b"old");
        write(dir.path(), "shoebill/bootstrap/shoebill-launcher-1.1.jar", b"new");

        let inventory = Inventory::scan(dir.path(), &table, &Hasher::default()).unwrap();
        let launchers: Vec<_> = inventory
            .entries()
            .iter()
            .filter(|e| e.kind == ComponentKind::Launcher)
            .collect();

        assert_eq!(launchers.len(), 2);
        assert!(launchers.iter().all(|e| !e.is_missing()));
        assert!(launchers[0].path.ends_with("shoebill-launcher-1.0.jar"));
        assert!(!inventory.is_missing(ComponentKind::Launcher));
    }

    #[test]
    fn test_subdirectories_are_not_scanned() {
        let (dir, table) = setup("windows");
        fs::create_dir_all(dir.path().join("plugins").join("Shoebill.dll")).unwrap();

        let inventory = Inventory::scan(dir.path(), &table, &Hasher::default()).unwrap();
        assert!(inventory.is_missing(ComponentKind::Plugin));
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let (dir, table) = setup("linux");
        fs::remove_dir_all(dir.path().join("plugins")).unwrap();

        let result = Inventory::scan(dir.path(), &table, &Hasher::default());
        assert!(matches!(
            result,
            Err(UpdaterError::DirectoryUnavailable { path, .. }) if path.ends_with("plugins")
        ));
    }
}
