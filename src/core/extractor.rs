/// PDF text extraction
///
/// Thin wrapper around the pdf-extract crate. The file is memory-mapped, the
/// bytes are handed to the extractor and the text comes back untouched.

use std::any::Any;
use std::fs::File;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use gag::Gag;
use log::{debug, info, warn};
use memmap2::Mmap;
use serde::Serialize;

/// Prefix shared by every extraction error message
pub const EXTRACTION_ERROR_PREFIX: &str = "Error extracting text";

/// Errors raised while pulling text out of a PDF
///
/// Every variant renders with the `EXTRACTION_ERROR_PREFIX` prefix.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Error extracting text: file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Error extracting text: could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error extracting text: {0}")]
    Pdf(String),

    #[error("Error extracting text: PDF parser panicked: {0}")]
    Panicked(String),
}

/// Text pulled out of a PDF
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedText {
    /// Raw text exactly as the extractor produced it
    pub text: String,
    /// Number of pages in the document, 0 if the page tree could not be read
    pub page_count: usize,
}

impl ExtractedText {
    /// Number of whitespace-separated tokens
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Extract the text of a PDF file
///
/// # Arguments
///
/// * `path` - Path to the PDF
///
/// # Returns
///
/// The extracted text and page count
pub fn extract_text(path: &Path) -> Result<ExtractedText, ExtractionError> {
    info!("Extracting text from {}", path.display());

    if !path.is_file() {
        return Err(ExtractionError::NotFound(path.to_path_buf()));
    }

    let io_error = |source| ExtractionError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    if file.metadata().map_err(io_error)?.len() == 0 {
        return Err(ExtractionError::Pdf(format!("{} is empty", path.display())));
    }

    // The mapping lives only for the duration of this call
    let mmap = unsafe { Mmap::map(&file) }.map_err(io_error)?;

    let extracted = extract_text_from_bytes(&mmap)?;
    debug!(
        "Extracted {} characters from {} page(s) of {}",
        extracted.text.len(),
        extracted.page_count,
        path.display()
    );

    Ok(extracted)
}

/// Extract the text of an in-memory PDF
pub fn extract_text_from_bytes(bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
    let text = quietly(|| pdf_extract::extract_text_from_mem(bytes))?
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    Ok(ExtractedText {
        text,
        page_count: count_pages(bytes),
    })
}

fn count_pages(bytes: &[u8]) -> usize {
    match lopdf::Document::load_mem(bytes) {
        Ok(document) => document.get_pages().len(),
        Err(e) => {
            warn!("Could not read page tree: {}", e);
            0
        }
    }
}

/// Run `f` with stdout and stderr silenced, turning a panic into an error
fn quietly<T>(f: impl FnOnce() -> T) -> Result<T, ExtractionError> {
    // pdf-extract prints font and encoding diagnostics directly
    let _gag_out = Gag::stdout().ok();
    let _gag_err = Gag::stderr().ok();

    panic::catch_unwind(AssertUnwindSafe(f))
        .map_err(|payload| ExtractionError::Panicked(panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
