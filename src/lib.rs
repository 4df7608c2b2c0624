/// PDF Readability - extract text from PDF files and score how hard it is to read
///
/// This library pulls the text out of a PDF, computes the standard readability
/// scores on it (Flesch, Flesch-Kincaid, Gunning fog, SMOG, Coleman-Liau, ARI)
/// with a consensus grade level, and saves the extracted text for later use.

// Re-export core modules
pub mod core;
pub mod utils;

// Re-export main analyzer types for convenience
pub use crate::core::analyzer::{Analysis, AnalyzerError, PdfAnalyzer, PdfReport};
pub use crate::core::extractor::{extract_text, ExtractedText, ExtractionError};
pub use crate::core::readability::{ReadabilityAnalyzer, ReadabilityScores};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Analyze a single PDF and return its report
///
/// This is a convenience function for simple use cases. It uses the default
/// configuration, so the extracted text is saved next to the PDF.
///
/// # Arguments
///
/// * `file_path` - Path to the PDF to analyze
///
/// # Returns
///
/// The report for the file
pub fn analyze_pdf<P: AsRef<std::path::Path>>(file_path: P) -> anyhow::Result<PdfReport> {
    let analyzer = PdfAnalyzer::new(&config::AnalyzerConfig::default())?;
    Ok(analyzer.analyze_file(file_path.as_ref())?)
}

/// Library configuration and utilities
pub mod config {
    use std::path::Path;

    use log::{error, info};
    use serde::{Deserialize, Serialize};

    /// Settings that shape a run, loadable from a JSON file
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct AnalyzerConfig {
        /// Write the extracted text next to each PDF
        pub save_extracted_text: bool,
        /// Appended to the PDF's file stem to name the text file
        pub extracted_suffix: String,
        /// Largest PDF picked up when scanning a directory
        pub max_file_size_mb: u64,
        /// Most PDFs picked up when scanning a directory
        pub max_files: usize,
    }

    impl Default for AnalyzerConfig {
        fn default() -> Self {
            Self {
                save_extracted_text: true,
                extracted_suffix: "_extracted.txt".to_string(),
                max_file_size_mb: 50,
                max_files: 1000,
            }
        }
    }

    impl AnalyzerConfig {
        pub fn max_file_size_bytes(&self) -> u64 {
            self.max_file_size_mb.saturating_mul(1024 * 1024)
        }
    }

    /// Load configuration from file if provided
    ///
    /// A missing or malformed file is logged and the defaults are used.
    pub fn load_config(config_path: Option<&Path>) -> AnalyzerConfig {
        let Some(path) = config_path else {
            return AnalyzerConfig::default();
        };

        if !path.exists() {
            error!("Configuration file not found: {}", path.display());
            return AnalyzerConfig::default();
        }

        let config_str = match std::fs::read_to_string(path) {
            Ok(config_str) => config_str,
            Err(e) => {
                error!("Could not read configuration file {}: {}", path.display(), e);
                return AnalyzerConfig::default();
            }
        };

        match serde_json::from_str(&config_str) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                error!("Invalid JSON in configuration file: {}", e);
                AnalyzerConfig::default()
            }
        }
    }

}

/// Command-line application functionality
pub mod app {
    use std::path::Path;

    use indicatif::ProgressBar;
    use log::error;

    use crate::config::AnalyzerConfig;
    use crate::core::analyzer::{PdfAnalyzer, PdfReport};

    /// Run the analyzer on multiple files, one after another
    ///
    /// A file that cannot be processed does not stop the run; it gets a
    /// failed report instead.
    ///
    /// # Arguments
    ///
    /// * `file_paths` - Paths to the PDFs to analyze
    /// * `config` - Configuration options
    /// * `progress` - Optional progress bar, advanced once per file
    ///
    /// # Returns
    ///
    /// One report per input, in input order
    pub fn run_analyzer<P: AsRef<Path>>(
        file_paths: &[P],
        config: &AnalyzerConfig,
        progress: Option<&ProgressBar>,
    ) -> anyhow::Result<Vec<PdfReport>> {
        let analyzer = PdfAnalyzer::new(config)?;
        let mut reports = Vec::with_capacity(file_paths.len());

        for file_path in file_paths {
            let file_path = file_path.as_ref();

            let report = match analyzer.analyze_file(file_path) {
                Ok(report) => report,
                Err(e) => {
                    error!("Error analyzing {}: {}", file_path.display(), e);
                    PdfReport::failed(file_path, &e)
                }
            };
            reports.push(report);

            if let Some(pb) = progress {
                pb.inc(1);
            }
        }

        Ok(reports)
    }
}
