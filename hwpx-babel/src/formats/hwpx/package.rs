//! Zip container assembly.
//!
//! OCF readers sniff the `mimetype` entry at a fixed offset, so it must be
//! the first entry and stored uncompressed. Every entry gets the DOS epoch
//! as its timestamp, which makes the archive a pure function of its parts.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::ConversionError;

use super::{PackagePart, PartCompression, MIMETYPE_PATH};

/// Write `parts` into an in-memory zip archive, in order.
pub fn assemble(parts: &[PackagePart]) -> Result<Vec<u8>, ConversionError> {
    match parts.first() {
        Some(part) if part.path == MIMETYPE_PATH => {}
        _ => {
            return Err(ConversionError::invariant(
                "package must start with the mimetype entry",
            ))
        }
    }
    let mut seen = HashSet::new();
    for part in parts {
        if !seen.insert(part.path.as_str()) {
            return Err(ConversionError::invariant(format!(
                "duplicate package entry {}",
                part.path
            )));
        }
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for part in parts {
        let method = match part.compression {
            PartCompression::Stored => CompressionMethod::Stored,
            PartCompression::Deflated => CompressionMethod::Deflated,
        };
        let options = SimpleFileOptions::default()
            .compression_method(method)
            .last_modified_time(DateTime::default());
        zip.start_file(part.path.as_str(), options)?;
        zip.write_all(&part.payload)?;
    }

    let cursor = zip.finish()?;
    let bytes = cursor.into_inner();
    log::debug!("assembled {} parts into {} bytes", parts.len(), bytes.len());
    Ok(bytes)
}
