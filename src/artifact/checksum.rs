//! CRC32 checksums for written artifacts
//!
//! Checksums are recorded in the layout manifest and recomputed by `verify`
//! to detect partitions left half-written by an interrupted run.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crc32fast::Hasher;

use super::errors::{ArtifactError, ArtifactResult};

/// CRC32 (IEEE) over the provided bytes.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// CRC32 of an entire file, read in 8KB chunks.
pub fn compute_file_checksum(path: &Path) -> ArtifactResult<u32> {
    let file = File::open(path).map_err(|e| ArtifactError::io(path, e))?;

    let mut reader = BufReader::new(file);
    let mut hasher = Hasher::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| ArtifactError::io(path, e))?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize())
}

/// Format: `crc32:xxxxxxxx` (lowercase hex, zero-padded)
pub fn format_checksum(checksum: u32) -> String {
    format!("crc32:{:08x}", checksum)
}
