/// Simple example demonstrating how to use the PDF Readability library

use anyhow::{bail, Result};
use pdf_readability::{analyze_pdf, Analysis};

fn main() -> Result<()> {
    let Some(pdf_path) = std::env::args().nth(1) else {
        bail!("usage: simple_usage <file.pdf>");
    };

    println!("Analyzing file: {}", pdf_path);

    // Extracts, scores and writes <name>_extracted.txt next to the PDF
    let report = analyze_pdf(&pdf_path)?;

    println!("{} page(s), {} words", report.page_count, report.word_count);

    match &report.analysis {
        Analysis::Scores(scores) => {
            for (name, value) in scores.fields() {
                println!("  {}: {:.2}", name, value);
            }
            println!("  grade band: {}", scores.grade_label());
        }
        Analysis::Skipped { error } => println!("  {}", error),
    }

    Ok(())
}
