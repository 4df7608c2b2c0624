/// PDF Readability - extract text from a PDF and score how hard it is to read
///
/// The main entry point for the application. It parses command-line arguments,
/// runs the analysis, prints the results and exports any requested reports.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Result;
use clap::{ArgAction, ArgGroup, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, LevelFilter};

use pdf_readability::config::{self, AnalyzerConfig};
use pdf_readability::utils::{file_utils, output_formatter};
use pdf_readability::{app, AnalyzerError, PdfAnalyzer, PdfReport};

/// Command line argument structure
#[derive(Parser, Debug)]
#[command(
    name = "pdf_readability",
    version,
    about = "Extract text from a PDF and compute readability statistics",
    long_about = "This tool extracts the text of a PDF file and reports:
- Flesch reading ease and Flesch-Kincaid grade
- Gunning fog, SMOG, Coleman-Liau and automated readability indexes
- A consensus grade level and CEFR band
The extracted text is saved next to the PDF as <name>_extracted.txt."
)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["pdf_path", "dir"]),
))]
struct Args {
    /// Path to the PDF file to analyze
    #[arg(name = "pdf_path")]
    pdf_path: Option<String>,

    /// Analyze every PDF in a directory (recursively)
    #[arg(long = "dir")]
    dir: Option<String>,

    /// Maximum PDF size to pick up from --dir, in MB
    #[arg(long = "max-size")]
    max_size: Option<u64>,

    /// Maximum number of PDFs to pick up from --dir
    #[arg(long = "max-files")]
    max_files: Option<usize>,

    /// Output in markdown format (wrapped in triple backticks)
    #[arg(long = "md", action = ArgAction::SetTrue)]
    md: bool,

    /// Export results to JSON file
    #[arg(long = "json")]
    json: Option<String>,

    /// Export results to HTML report
    #[arg(long = "html")]
    html: Option<String>,

    /// Export results to CSV file
    #[arg(long = "csv")]
    csv: Option<String>,

    /// Directory to store report files
    #[arg(long = "output-dir")]
    output_dir: Option<String>,

    /// Suppress terminal output
    #[arg(long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,

    /// With --dir, show only the summary
    #[arg(long = "summary-only", action = ArgAction::SetTrue)]
    summary_only: bool,

    /// Do not write the extracted text file
    #[arg(long = "no-save", action = ArgAction::SetTrue)]
    no_save: bool,

    /// Path to JSON configuration file
    #[arg(long = "config")]
    config: Option<String>,

    /// Set logging level
    #[arg(long = "log-level", default_value = "warn")]
    log_level: LevelFilter,

    /// Log file path (default: stderr)
    #[arg(long = "log-file")]
    log_file: Option<String>,
}

/// Main entry point function
fn main() -> ExitCode {
    // Usage errors exit with 1; --help and --version exit cleanly
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    setup_logging(&args);

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("{} {:#}", "Error:".red(), e);
            ExitCode::from(1)
        }
    }
}

/// Set up logging with file or stderr output
fn setup_logging(args: &Args) {
    let mut builder = env_logger::Builder::new();

    builder.filter_level(args.log_level);

    builder.format(|buf, record| {
        use chrono::Local;
        use std::io::Write;
        writeln!(
            buf,
            "{} - {} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Some(log_file) = &args.log_file {
        match File::create(log_file) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("Could not open log file {}: {}", log_file, e),
        }
    }

    let _ = builder.try_init();
}

/// Resolve configuration: file settings first, then command-line overrides
fn resolve_config(args: &Args) -> AnalyzerConfig {
    let mut config = config::load_config(args.config.as_deref().map(Path::new));

    if args.no_save {
        config.save_extracted_text = false;
    }
    if let Some(max_size) = args.max_size {
        config.max_file_size_mb = max_size;
    }
    if let Some(max_files) = args.max_files {
        config.max_files = max_files;
    }

    config
}

fn run(args: &Args) -> Result<ExitCode> {
    let config = resolve_config(args);

    match (&args.pdf_path, &args.dir) {
        (Some(pdf_path), _) => run_single(Path::new(pdf_path), &config, args),
        (None, Some(dir)) => run_batch(Path::new(dir), &config, args),
        (None, None) => unreachable!("clap requires an input"),
    }
}

/// Analyze one PDF
fn run_single(pdf_path: &Path, config: &AnalyzerConfig, args: &Args) -> Result<ExitCode> {
    if !pdf_path.exists() {
        error!("File not found: {}", pdf_path.display());
        println!("Error: File not found at {}", pdf_path.display());
        return Ok(ExitCode::from(1));
    }

    if !args.quiet {
        println!("--- Analyzing PDF: {} ---", pdf_path.display());
    }

    let analyzer = PdfAnalyzer::new(config)?;
    let report = match analyzer.analyze_file(pdf_path) {
        Ok(report) => report,
        Err(AnalyzerError::FileNotFound(path)) => {
            println!("Error: File not found at {}", path.display());
            return Ok(ExitCode::from(1));
        }
        Err(AnalyzerError::Extraction(e)) => {
            println!("{}", e);
            return Ok(ExitCode::from(1));
        }
        Err(e) => return Err(e.into()),
    };

    if !args.quiet {
        print!("{}", output_formatter::format_report(&report, args.md));
    }

    export_all_results(std::slice::from_ref(&report), args)?;

    Ok(ExitCode::SUCCESS)
}

/// Analyze every PDF under a directory
fn run_batch(dir_path: &Path, config: &AnalyzerConfig, args: &Args) -> Result<ExitCode> {
    let start_time = Instant::now();

    if !dir_path.is_dir() {
        error!("Directory not found: {}", dir_path.display());
        println!("Error: Directory not found at {}", dir_path.display());
        return Ok(ExitCode::from(1));
    }

    let files = file_utils::collect_pdf_files(
        dir_path,
        config.max_files,
        config.max_file_size_bytes(),
    );

    if files.is_empty() {
        eprintln!("{}", "Error: No PDF files found for analysis".red());
        eprintln!("Run with --help for usage information");
        return Ok(ExitCode::from(1));
    }

    info!("Found {} PDF files under {}", files.len(), dir_path.display());

    let progress_bar = if !args.quiet {
        println!("\n{} {} files...", "Analyzing".bold(), files.len());
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let reports = app::run_analyzer(&files, config, progress_bar.as_ref())?;

    if let Some(pb) = progress_bar {
        pb.finish_with_message("Analysis complete");
    }

    export_all_results(&reports, args)?;

    if !args.quiet {
        println!("\n{}", output_formatter::create_summary(&reports));
        println!(
            "{} {:.2} seconds",
            "Time elapsed:".green(),
            start_time.elapsed().as_secs_f64()
        );

        if !args.summary_only {
            for report in &reports {
                print_report_header(report);
                print!("{}", output_formatter::format_report(report, args.md));
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_report_header(report: &PdfReport) {
    println!("\n{}", "=".repeat(80).bold());
    println!("{} {}", "Results for:".cyan(), report.path.display());
    println!("{}", "=".repeat(80).bold());
}

/// Export reports based on command line arguments
fn export_all_results(reports: &[PdfReport], args: &Args) -> Result<()> {
    if let Some(output_dir) = &args.output_dir {
        std::fs::create_dir_all(output_dir)?;
    }

    if let Some(json_path) = &args.json {
        let json_path = generate_output_path(args, json_path);
        output_formatter::export_results_json(reports, &json_path)?;
        info!("JSON report written to {}", json_path.display());
    }

    if let Some(html_path) = &args.html {
        let html_path = generate_output_path(args, html_path);
        output_formatter::create_html_report(reports, &html_path)?;
        info!("HTML report written to {}", html_path.display());
    }

    if let Some(csv_path) = &args.csv {
        let csv_path = generate_output_path(args, csv_path);
        output_formatter::create_csv_report(reports, &csv_path)?;
        info!("CSV report written to {}", csv_path.display());
    }

    Ok(())
}

/// Place a report file inside --output-dir when one is given
fn generate_output_path(args: &Args, report_path: &str) -> PathBuf {
    let report_path = PathBuf::from(report_path);

    match &args.output_dir {
        Some(output_dir) if report_path.is_relative() => PathBuf::from(output_dir).join(report_path),
        _ => report_path,
    }
}
