// src/main.rs
mod extractors;
mod pdf;
mod storage;
mod utils;

use std::path::{Path, PathBuf};

use clap::Parser;

use extractors::section::{
    AbstractExtractor, LocatorConfig, DEFAULT_MIN_PARAGRAPH_LEN, DEFAULT_MIN_PATTERN_LEN,
};
use storage::StorageManager;
use utils::AppError;

/// Command Line Interface for the PDF abstract extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input PDF files to process
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output PDF path (single input only; default: <input>_abstract.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Title printed at the top of the generated document
    #[arg(long)]
    title: Option<String>,

    /// Number of leading pages to scan for the abstract (0 = whole document)
    #[arg(long, default_value_t = pdf::source::DEFAULT_MAX_PAGES)]
    max_pages: usize,

    /// Minimum capture length accepted from the labeled-pattern strategy
    #[arg(long, default_value_t = DEFAULT_MIN_PATTERN_LEN)]
    min_pattern_len: usize,

    /// Minimum paragraph length accepted by the paragraph fallback
    #[arg(long, default_value_t = DEFAULT_MIN_PARAGRAPH_LEN)]
    min_paragraph_len: usize,

    /// Write a JSON metadata sidecar next to each output
    #[arg(short, long)]
    metadata: bool,

    /// Debug mode - save raw and annotated extracted text next to the output
    #[arg(short, long)]
    debug: bool,

    /// Verbose logging (equivalent to RUST_LOG=debug)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), AppError> {
    // 1. Parse CLI arguments, then set up logging (reads RUST_LOG env var)
    let args = Args::parse();
    utils::logging::setup_logging(args.verbose);
    tracing::info!("Starting processing for args: {:?}", args);

    // 2. Validate the argument combination
    if args.inputs.len() > 1 && args.output.is_some() {
        return Err(AppError::Config(
            "--output is only valid with a single input file".to_string(),
        ));
    }

    // 3. Initialize the extractor and storage
    let config = LocatorConfig {
        min_pattern_len: args.min_pattern_len,
        min_paragraph_len: args.min_paragraph_len,
        ..LocatorConfig::default()
    };
    let extractor = AbstractExtractor::with_config(config);
    let storage = StorageManager::new();

    // 4. Process each document independently; a failure never aborts the batch
    let mut success_count = 0;
    let mut failure_count = 0;

    for input in &args.inputs {
        match process_document(input, &args, &extractor, &storage) {
            Ok(output) => {
                tracing::info!("Created abstract document: {}", output.display());
                success_count += 1;
            }
            Err(e) => {
                tracing::error!("Failed to process {}: {}", input.display(), e);
                failure_count += 1;
            }
        }
    }

    tracing::info!(
        "Processing finished. Success: {}, Failures: {}",
        success_count,
        failure_count
    );

    if failure_count > 0 {
        return Err(AppError::Processing(format!(
            "failed to extract an abstract from {} of {} documents",
            failure_count,
            args.inputs.len()
        )));
    }

    Ok(())
}

/// Runs the full pipeline for one document: read, locate, clean, render.
fn process_document(
    input: &Path,
    args: &Args,
    extractor: &AbstractExtractor,
    storage: &StorageManager,
) -> Result<PathBuf, AppError> {
    if !input.exists() {
        return Err(AppError::Config(format!(
            "input file {} not found",
            input.display()
        )));
    }
    let is_pdf = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if !is_pdf {
        return Err(AppError::Config(format!(
            "{} is not a PDF file",
            input.display()
        )));
    }

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    tracing::info!("Extracting text from: {}", input.display());
    let raw_text = pdf::source::extract_text(input, args.max_pages)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| StorageManager::default_output_path(input));

    if args.debug {
        save_debug_artifacts(&raw_text, &stem, &output);
    }

    tracing::info!("Searching for abstract content...");
    let section = extractor.extract_abstract(&raw_text, &stem)?;
    tracing::info!(
        "Abstract found ({} characters) via {}",
        section.char_count,
        section.provenance.as_str()
    );

    let title = args
        .title
        .clone()
        .unwrap_or_else(|| format!("Abstract from {stem}"));
    let saved = storage.save_abstract(&section, &title, &output)?;

    if args.metadata {
        match storage.save_metadata(&section, &output) {
            Ok(path) => tracing::info!("Saved metadata to: {}", path.display()),
            Err(e) => tracing::error!("Failed to save metadata: {}", e),
        }
    }

    Ok(saved)
}

/// Saves the raw extracted text plus a copy annotated with label and
/// boundary hits, next to the would-be output.
fn save_debug_artifacts(raw_text: &str, stem: &str, output: &Path) {
    let raw_path = output.with_file_name(format!("{stem}_raw.txt"));
    match std::fs::write(&raw_path, raw_text) {
        Ok(()) => tracing::info!("Saved raw text to {}", raw_path.display()),
        Err(e) => tracing::warn!("Failed to save raw text: {}", e),
    }

    let debug_patterns = [
        (r"(?i)\b(abstract|summary|overview)\b", "label"),
        (r"(?i)\b(keywords?|introduction|background)\b", "boundary"),
        (r"(?m)^\s*(\d+|[IVXivx]+)\.", "heading"),
    ];
    let annotated_path = output.with_file_name(format!("{stem}_annotated.txt"));
    if let Err(e) = utils::text_debug::save_annotated_text(raw_text, &annotated_path, &debug_patterns)
    {
        tracing::warn!("Failed to create annotated text: {}", e);
    }
}
