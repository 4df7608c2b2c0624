/// Utility modules for the PDF analyzer
///
/// This module contains utility functions for file handling, output formatting,
/// and report export.

pub mod file_utils;
pub mod output_formatter;
