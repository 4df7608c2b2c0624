/// Output formatter for analysis results
///
/// This module handles formatting and exporting analysis reports in various
/// formats, including console output, JSON, HTML, and CSV.

use std::cmp::Ordering;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use handlebars::Handlebars;
use serde_json::{json, Value};

use crate::core::analyzer::{Analysis, PdfReport};
use crate::core::readability::ReadabilityScores;

/// Turn a snake_case key into a display title ("smog_index" -> "Smog Index")
pub fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format one report for console output
///
/// # Arguments
///
/// * `report` - Report for a single PDF
/// * `use_markdown` - Whether to wrap the output in markdown triple backticks
///
/// # Returns
///
/// Formatted string for console output
pub fn format_report(report: &PdfReport, use_markdown: bool) -> String {
    let mut output = String::new();

    if use_markdown {
        output.push_str("```\n");
    }

    if let Some(error) = &report.error {
        output.push_str(&format!("{} {}\n", "Error:".red().bold(), error));
    } else {
        output.push_str(&format!(
            "Successfully extracted {} words.\n",
            report.word_count
        ));
        output.push_str(&format!(
            "\n{}\n",
            "--- Readability Analysis Results ---".bold()
        ));
        output.push_str(&format_analysis(&report.analysis));

        if let Some(saved) = &report.extracted_text_path {
            output.push_str(&format!(
                "\n{} {}\n",
                "Extracted text saved to:".green(),
                saved.display()
            ));
        }
    }

    if use_markdown {
        output.push_str("```\n");
    }

    output
}

/// Key/value lines for an analysis, or its error
pub fn format_analysis(analysis: &Analysis) -> String {
    match analysis {
        Analysis::Scores(scores) => format_scores(scores),
        Analysis::Skipped { error } => format!("{} {}\n", "Error:".red(), error),
    }
}

fn format_scores(scores: &ReadabilityScores) -> String {
    let mut output = String::new();

    for (key, value) in scores.fields() {
        let label = format!("{}:", title_case(key));
        output.push_str(&format!("{} {:.2}\n", label.cyan(), value));
    }

    output.push_str(&format!("{} {}\n", "Grade Band:".cyan(), scores.grade_label()));
    output.push_str(&format!(
        "{} {} ({})\n",
        "CEFR Level:".cyan(),
        scores.cefr_level,
        scores.cefr_level.description()
    ));

    output
}

/// Export reports to a JSON file
///
/// A single report is written as an object, several as an array.
pub fn export_results_json(reports: &[PdfReport], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create JSON output file: {}", output_path.display()))?;

    match reports {
        [report] => serde_json::to_writer_pretty(file, report),
        _ => serde_json::to_writer_pretty(file, reports),
    }
    .context("Failed to write JSON data")?;

    Ok(())
}

/// Create an HTML report from analysis results
///
/// # Arguments
///
/// * `reports` - Reports to include
/// * `output_path` - Path where the HTML file will be written
///
/// # Returns
///
/// Result indicating success or failure
pub fn create_html_report(reports: &[PdfReport], output_path: &Path) -> Result<()> {
    let mut handlebars = Handlebars::new();

    const HTML_TEMPLATE: &str = r#"
    <!DOCTYPE html>
    <html lang="en">
    <head>
        <meta charset="UTF-8">
        <meta name="viewport" content="width=device-width, initial-scale=1.0">
        <title>PDF Readability Report</title>
        <style>
            body {
                font-family: Arial, sans-serif;
                line-height: 1.6;
                color: #333;
                max-width: 1200px;
                margin: 0 auto;
                padding: 20px;
            }
            h1 {
                color: #2c3e50;
                border-bottom: 2px solid #3498db;
                padding-bottom: 10px;
            }
            h2 {
                color: #2980b9;
                margin-top: 30px;
            }
            .document {
                background-color: #f8f9fa;
                border-radius: 5px;
                padding: 15px;
                margin-bottom: 20px;
                box-shadow: 0 2px 5px rgba(0,0,0,0.1);
            }
            .scores td {
                padding: 4px 12px;
                border-bottom: 1px solid #eee;
            }
            .error {
                color: #c0392b;
            }
            .timestamp {
                color: #7f8c8d;
                font-size: 0.9em;
                margin-bottom: 30px;
            }
            .summary {
                background-color: #e8f4f8;
                padding: 15px;
                border-radius: 5px;
                margin-bottom: 30px;
            }
        </style>
    </head>
    <body>
        <h1>PDF Readability Report</h1>
        <div class="timestamp">Generated on: {{timestamp}}</div>

        <div class="summary">
            <h2>Summary</h2>
            <p>Documents: {{total}}</p>
            <p>Scored: {{scored}}</p>
        </div>

        {{#each documents}}
        <div class="document">
            <h2>{{name}}</h2>
            <p>{{path}} &middot; {{pages}} page(s) &middot; {{words}} words</p>
            {{#if error}}
            <p class="error">{{error}}</p>
            {{else}}
            <table class="scores">
                {{#each scores}}
                <tr><td>{{name}}</td><td>{{value}}</td></tr>
                {{/each}}
                <tr><td>Grade Band</td><td>{{grade_band}}</td></tr>
                <tr><td>CEFR Level</td><td>{{cefr}} ({{cefr_description}})</td></tr>
            </table>
            {{/if}}
        </div>
        {{/each}}
    </body>
    </html>
    "#;

    handlebars
        .register_template_string("report", HTML_TEMPLATE)
        .context("Failed to register HTML template")?;

    let documents: Vec<Value> = reports.iter().map(document_data).collect();
    let scored = reports
        .iter()
        .filter(|report| report.analysis.scores().is_some())
        .count();

    let template_data = json!({
        "timestamp": chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        "total": reports.len(),
        "scored": scored,
        "documents": documents,
    });

    let html = handlebars
        .render("report", &template_data)
        .context("Failed to render HTML template")?;

    let mut file = File::create(output_path)
        .context(format!("Failed to create HTML output file: {}", output_path.display()))?;

    file.write_all(html.as_bytes())
        .context("Failed to write HTML data")?;

    Ok(())
}

fn document_data(report: &PdfReport) -> Value {
    let name = report
        .path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| report.path.display().to_string());

    let mut document = json!({
        "name": name,
        "path": report.path.display().to_string(),
        "pages": report.page_count,
        "words": report.word_count,
    });

    match (&report.error, &report.analysis) {
        (Some(error), _) | (None, Analysis::Skipped { error }) => {
            document["error"] = json!(error);
        }
        (None, Analysis::Scores(scores)) => {
            let rows: Vec<Value> = scores
                .fields()
                .iter()
                .map(|(key, value)| json!({ "name": title_case(key), "value": format!("{:.2}", value) }))
                .collect();
            document["scores"] = json!(rows);
            document["grade_band"] = json!(scores.grade_label());
            document["cefr"] = json!(scores.cefr_level.to_string());
            document["cefr_description"] = json!(scores.cefr_level.description());
        }
    }

    document
}

/// Create a CSV report from analysis results
///
/// One row per file and metric; files without scores get a single error row.
pub fn create_csv_report(reports: &[PdfReport], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create CSV output file: {}", output_path.display()))?;

    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(["File", "Metric", "Value"])
        .context("Failed to write CSV header")?;

    for report in reports {
        let file_name = report.path.display().to_string();

        match (&report.error, &report.analysis) {
            (Some(error), _) | (None, Analysis::Skipped { error }) => {
                writer
                    .write_record([file_name.as_str(), "Error", error.as_str()])
                    .context("Failed to write CSV record")?;
            }
            (None, Analysis::Scores(scores)) => {
                for (key, value) in scores.fields() {
                    let metric = title_case(key);
                    let value = format!("{:.2}", value);
                    writer
                        .write_record([file_name.as_str(), metric.as_str(), value.as_str()])
                        .context("Failed to write CSV record")?;
                }
                let cefr = scores.cefr_level.to_string();
                writer
                    .write_record([file_name.as_str(), "CEFR Level", cefr.as_str()])
                    .context("Failed to write CSV record")?;
            }
        }
    }

    writer.flush().context("Failed to flush CSV writer")?;

    Ok(())
}

/// Create a summary of findings for multiple files
pub fn create_summary(reports: &[PdfReport]) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n\n", "Analysis Summary".yellow().bold()));
    output.push_str(&format!("Files analyzed: {}\n", reports.len()));

    let failed = reports.iter().filter(|report| report.is_failed()).count();
    let mut scored: Vec<(&PdfReport, &ReadabilityScores)> = reports
        .iter()
        .filter_map(|report| report.analysis.scores().map(|scores| (report, scores)))
        .collect();

    output.push_str(&format!("Failed: {}\n", failed));
    output.push_str(&format!(
        "Skipped (no text): {}\n",
        reports.len() - failed - scored.len()
    ));

    if scored.is_empty() {
        return output;
    }

    let average = scored
        .iter()
        .map(|(_, scores)| scores.estimated_grade_level)
        .sum::<f64>()
        / scored.len() as f64;
    output.push_str(&format!("Average grade level: {:.2}\n\n", average));

    output.push_str(&format!("{}\n", "Hardest Documents".cyan().bold()));
    scored.sort_by(|a, b| {
        b.1.estimated_grade_level
            .partial_cmp(&a.1.estimated_grade_level)
            .unwrap_or(Ordering::Equal)
    });

    for (i, (report, scores)) in scored.iter().take(10).enumerate() {
        output.push_str(&format!(
            "{}. {}: grade {:.1} ({})\n",
            i + 1,
            report.path.display(),
            scores.estimated_grade_level,
            scores.cefr_level
        ));
    }

    output
}
