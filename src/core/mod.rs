/// Core module for PDF analysis
///
/// This module contains the text extractor, the readability formulas and the
/// analyzer that ties them together for a single document.

pub mod analyzer;
pub mod extractor;
pub mod readability;
