//! Content Hashing
//!
//! Computes the digests reported to the update server for each installed file.

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Digest algorithm used for file fingerprints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// What the update server compares against
    #[default]
    Md5,
    Sha256,
}

/// Deterministic file fingerprinting
#[derive(Debug, Clone, Copy, Default)]
pub struct Hasher {
    algorithm: HashAlgorithm,
}

impl Hasher {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Hash a file's content as lowercase hex
    pub fn digest_file(&self, path: &Path) -> io::Result<String> {
        let file = File::open(path)?;
        self.digest_reader(BufReader::new(file))
    }

    /// Hash everything readable from `reader` as lowercase hex
    pub fn digest_reader<R: Read>(&self, reader: R) -> io::Result<String> {
        match self.algorithm {
            HashAlgorithm::Md5 => stream_digest::<Md5, R>(reader),
            HashAlgorithm::Sha256 => stream_digest::<Sha256, R>(reader),
        }
    }

    pub fn digest_bytes(&self, bytes: &[u8]) -> String {
        match self.algorithm {
            HashAlgorithm::Md5 => hex::encode(Md5::digest(bytes)),
            HashAlgorithm::Sha256 => hex::encode(Sha256::digest(bytes)),
        }
    }
}

fn stream_digest<D: Digest, R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = D::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(hex::encode(hasher.finalize()))
}
