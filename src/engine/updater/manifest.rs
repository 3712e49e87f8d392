//! Update Manifest
//!
//! The "what I have" report sent to the update server.

use super::inventory::InventoryEntry;
use serde::{Deserialize, Serialize};

/// One manifest record, serialized with the server's field names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRecord {
    #[serde(rename = "Filename")]
    pub filename: String,
    #[serde(rename = "Filetype")]
    pub filetype: String,
    /// Empty when the file has to be fetched rather than updated
    #[serde(rename = "Filehash")]
    pub filehash: String,
    #[serde(rename = "Fullpath")]
    pub fullpath: String,
}

/// Ordered manifest, stable for a given inventory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    records: Vec<ManifestRecord>,
}

impl Manifest {
    /// One record per inventory entry, in inventory order
    pub fn build(entries: &[InventoryEntry]) -> Self {
        let records = entries
            .iter()
            .map(|entry| ManifestRecord {
                filename: entry
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                filetype: entry.kind.to_string(),
                filehash: entry.digest.clone(),
                fullpath: entry.path.to_string_lossy().into_owned(),
            })
            .collect();
        Self { records }
    }

    pub fn records(&self) -> &[ManifestRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// JSON array body for the `json` form field
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.records)
    }
}
