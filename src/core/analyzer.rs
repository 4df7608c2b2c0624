/// Core PDF analyzer implementation
///
/// This file contains the implementation of the PdfAnalyzer which runs the
/// whole pipeline for one document: extract the text, score it, and save the
/// text next to the PDF.

use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{error, info, warn};
use serde::Serialize;

use crate::config::AnalyzerConfig;
use crate::core::extractor::{self, ExtractionError, EXTRACTION_ERROR_PREFIX};
use crate::core::readability::{ReadabilityAnalyzer, ReadabilityError, ReadabilityScores};
use crate::utils::file_utils::{self, FileMetadata};

/// Message reported in place of scores when there is nothing to score
pub const ANALYSIS_SKIPPED: &str = "Could not analyze text. Extraction failed or text is empty.";

/// Errors that stop the analysis of a file
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("File not found at {}", .0.display())]
    FileNotFound(PathBuf),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Readability(#[from] ReadabilityError),

    #[error("Failed to save extracted text to {}: {source}", path.display())]
    SaveText {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Outcome of scoring a piece of text: every score, or an error instead
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Analysis {
    Scores(ReadabilityScores),
    Skipped { error: String },
}

impl Analysis {
    pub fn skipped() -> Self {
        Analysis::Skipped {
            error: ANALYSIS_SKIPPED.to_string(),
        }
    }

    pub fn scores(&self) -> Option<&ReadabilityScores> {
        match self {
            Analysis::Scores(scores) => Some(scores),
            Analysis::Skipped { .. } => None,
        }
    }
}

/// Everything learned about one PDF
#[derive(Debug, Clone, Serialize)]
pub struct PdfReport {
    pub path: PathBuf,
    pub metadata: Option<FileMetadata>,
    pub page_count: usize,
    pub word_count: usize,
    pub analysis: Analysis,
    /// Where the extracted text was written, if it was
    pub extracted_text_path: Option<PathBuf>,
    /// Why the file could not be processed
    pub error: Option<String>,
    #[serde(skip)]
    pub text: String,
}

impl PdfReport {
    /// Report for a file whose text could not be extracted
    pub fn failed(path: &Path, error: &AnalyzerError) -> Self {
        Self {
            path: path.to_path_buf(),
            metadata: None,
            page_count: 0,
            word_count: 0,
            analysis: Analysis::skipped(),
            extracted_text_path: None,
            error: Some(error.to_string()),
            text: String::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Extracts and scores PDF documents
pub struct PdfAnalyzer {
    /// Configuration options
    config: AnalyzerConfig,

    /// Syllable dictionary and formulas
    readability: ReadabilityAnalyzer,
}

impl PdfAnalyzer {
    /// Create a new PdfAnalyzer instance
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration options
    ///
    /// # Returns
    ///
    /// A new PdfAnalyzer, or an error if the syllable dictionary cannot be loaded
    pub fn new(config: &AnalyzerConfig) -> Result<Self, AnalyzerError> {
        Ok(Self {
            config: config.clone(),
            readability: ReadabilityAnalyzer::new()?,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Score a piece of text
    ///
    /// Blank text, or text that is an extraction error message, yields
    /// `Analysis::Skipped` rather than scores.
    pub fn analyze_text(&self, text: &str) -> Analysis {
        if text.trim().is_empty() {
            warn!("No text to analyze");
            return Analysis::skipped();
        }
        if text.contains(EXTRACTION_ERROR_PREFIX) {
            warn!("Text is an extraction error, not document content");
            return Analysis::skipped();
        }

        match self.readability.analyze(text) {
            Ok(scores) => Analysis::Scores(scores),
            Err(e) => {
                warn!("Skipping readability analysis: {}", e);
                Analysis::skipped()
            }
        }
    }

    /// Run the full pipeline on one PDF
    ///
    /// # Arguments
    ///
    /// * `file_path` - Path to the PDF to analyze
    ///
    /// # Returns
    ///
    /// The report for the file. Missing files and extraction failures are
    /// errors; empty text is not, it produces a skipped analysis.
    pub fn analyze_file(&self, file_path: &Path) -> Result<PdfReport, AnalyzerError> {
        info!("Analyzing file: {}", file_path.display());
        let start_time = Instant::now();

        if !file_path.exists() {
            error!("File not found: {}", file_path.display());
            return Err(AnalyzerError::FileNotFound(file_path.to_path_buf()));
        }

        if !file_utils::looks_like_pdf(file_path) {
            warn!("{} does not look like a PDF", file_path.display());
        }

        let metadata = match file_utils::get_file_metadata(file_path) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                warn!("Could not read metadata for {}: {:#}", file_path.display(), e);
                None
            }
        };

        let extracted = extractor::extract_text(file_path).map_err(|e| {
            error!("{}", e);
            e
        })?;
        let word_count = extracted.word_count();
        info!("Extracted {} words from {}", word_count, file_path.display());

        let analysis = self.analyze_text(&extracted.text);

        let extracted_text_path = if self.config.save_extracted_text {
            let output_path = file_utils::extracted_text_path(file_path, &self.config.extracted_suffix);
            file_utils::write_extracted_text(&output_path, &extracted.text).map_err(|source| {
                AnalyzerError::SaveText {
                    path: output_path.clone(),
                    source,
                }
            })?;
            Some(output_path)
        } else {
            None
        };

        info!("Analysis completed in {:?}", start_time.elapsed());

        Ok(PdfReport {
            path: file_path.to_path_buf(),
            metadata,
            page_count: extracted.page_count,
            word_count,
            analysis,
            extracted_text_path,
            error: None,
            text: extracted.text,
        })
    }
}
