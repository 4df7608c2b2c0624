/// File handling utilities
///
/// This module provides helpers for locating PDF files, deriving the path of
/// the extracted-text sibling file, writing it, and collecting file metadata.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::{debug, warn};
use serde::Serialize;
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

/// Magic bytes every PDF starts with
const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// Basic facts about an input file
#[derive(Debug, Clone, Serialize)]
pub struct FileMetadata {
    pub file_name: String,
    pub file_size: u64,
    pub modified: Option<String>,
    pub sha256: String,
}

/// Path of the sibling file that receives the extracted text
///
/// `reports/paper.pdf` with suffix `_extracted.txt` becomes
/// `reports/paper_extracted.txt`. Only the final extension is replaced.
///
/// # Arguments
///
/// * `pdf_path` - Path of the source PDF
/// * `suffix` - Text appended to the file stem
///
/// # Returns
///
/// The output path, in the same directory as the PDF
pub fn extracted_text_path(pdf_path: &Path, suffix: &str) -> PathBuf {
    let file_stem = pdf_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string());
    let output_filename = format!("{}{}", file_stem, suffix);

    match pdf_path.parent() {
        Some(parent) => parent.join(output_filename),
        None => PathBuf::from(output_filename),
    }
}

/// Write the extracted text verbatim
pub fn write_extracted_text(output_path: &Path, text: &str) -> io::Result<()> {
    debug!("Writing {} bytes of text to {}", text.len(), output_path.display());
    fs::write(output_path, text)
}

/// Check whether a file looks like a PDF, by extension or by signature
pub fn looks_like_pdf(file_path: &Path) -> bool {
    if has_pdf_extension(file_path) {
        return true;
    }

    let mut header = [0u8; 5];
    match File::open(file_path).and_then(|mut file| file.read_exact(&mut header)) {
        Ok(()) => header == PDF_SIGNATURE,
        Err(_) => false,
    }
}

fn has_pdf_extension(file_path: &Path) -> bool {
    file_path
        .extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Recursively collect PDF files under a directory
///
/// # Arguments
///
/// * `dir_path` - Directory to walk
/// * `max_files` - Stop after this many files
/// * `max_size_bytes` - Skip files larger than this
///
/// # Returns
///
/// Paths of the PDFs found, in sorted order
pub fn collect_pdf_files(dir_path: &Path, max_files: usize, max_size_bytes: u64) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir_path)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if files.len() >= max_files {
            warn!("Reached maximum file limit ({})", max_files);
            break;
        }

        let file_path = entry.path();
        if !file_path.is_file() || !has_pdf_extension(file_path) {
            continue;
        }

        match entry.metadata() {
            Ok(metadata) if metadata.len() > max_size_bytes => {
                warn!(
                    "Skipping {}: exceeds maximum file size ({:.2} MB)",
                    file_path.display(),
                    metadata.len() as f64 / 1024.0 / 1024.0
                );
            }
            Ok(_) => files.push(file_path.to_path_buf()),
            Err(e) => warn!("Error reading metadata for {}: {}", file_path.display(), e),
        }
    }

    files
}

/// Get file metadata for a given path, including a SHA-256 digest
pub fn get_file_metadata(file_path: &Path) -> Result<FileMetadata> {
    let metadata = fs::metadata(file_path)
        .with_context(|| format!("Failed to read metadata for {}", file_path.display()))?;

    let modified = metadata.modified().ok().map(|time| {
        DateTime::<Local>::from(time)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    });

    Ok(FileMetadata {
        file_name: file_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        file_size: metadata.len(),
        modified,
        sha256: sha256_file(file_path)?,
    })
}

fn sha256_file(file_path: &Path) -> Result<String> {
    let mut file = File::open(file_path)
        .with_context(|| format!("Failed to open {}", file_path.display()))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .with_context(|| format!("Failed to hash {}", file_path.display()))?;

    Ok(hex::encode(hasher.finalize()))
}
