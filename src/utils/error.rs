// src/utils/error.rs
#![allow(dead_code)]
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Could not open document {0}: {1}")]
    Open(String, #[source] lopdf::Error),

    #[error("Could not decode text from {0}: {1}")]
    Extract(String, #[source] lopdf::Error),

    #[error("No extractable text in {0}")]
    NoText(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Abstract not found: {0}")]
    AbstractNotFound(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Document assembly error: {0}")]
    Pdf(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Reading source document failed: {0}")]
    Source(#[from] SourceError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
