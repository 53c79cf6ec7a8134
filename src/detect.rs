//! PDF header sniffing.
//!
//! A cheap check run before handing bytes to the backend, so obviously
//! wrong inputs fail as [`Error::DocumentUnreadable`] with a clear reason.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Readers accept the header anywhere in the first kilobyte.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Read the PDF version from the start of a file.
pub fn sniff_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let file = File::open(path)?;
    let mut head = Vec::with_capacity(HEADER_SEARCH_WINDOW);
    file.take(HEADER_SEARCH_WINDOW as u64).read_to_end(&mut head)?;
    sniff_bytes(&head)
}

/// Read the PDF version (e.g. `"1.7"`) from a byte prefix.
pub fn sniff_bytes(data: &[u8]) -> Result<String> {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    let start = window
        .windows(PDF_MAGIC.len())
        .position(|w| w == PDF_MAGIC)
        .ok_or_else(|| Error::DocumentUnreadable("missing %PDF- header".to_string()))?;

    let version_start = start + PDF_MAGIC.len();
    let version_bytes = data
        .get(version_start..version_start + VERSION_LEN)
        .ok_or_else(|| Error::DocumentUnreadable("truncated PDF header".to_string()))?;
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::DocumentUnreadable(format!(
            "unsupported PDF version {:?}",
            version
        )));
    }

    Ok(version)
}

/// Check if bytes start like a PDF.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    sniff_bytes(data).is_ok()
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_valid_pdf() {
        assert_eq!(sniff_bytes(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap(), "1.7");
        assert_eq!(sniff_bytes(b"%PDF-2.0\n").unwrap(), "2.0");
    }

    #[test]
    fn test_sniff_leading_garbage() {
        let mut data = b"\x00\x00junk".to_vec();
        data.extend_from_slice(b"%PDF-1.4\n");
        assert_eq!(sniff_bytes(&data).unwrap(), "1.4");
    }

    #[test]
    fn test_sniff_rejects_other_formats() {
        assert!(matches!(
            sniff_bytes(b"<!DOCTYPE html>"),
            Err(Error::DocumentUnreadable(_))
        ));
        assert!(matches!(
            sniff_bytes(b"%PDF-"),
            Err(Error::DocumentUnreadable(_))
        ));
        assert!(matches!(
            sniff_bytes(b"%PDF-x.y"),
            Err(Error::DocumentUnreadable(_))
        ));
        assert!(!is_pdf_bytes(b""));
    }

    #[test]
    fn test_sniff_path_missing_file() {
        let result = sniff_path("/definitely/not/here.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
