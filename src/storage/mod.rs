// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::extractors::section::AbstractSection;
use crate::pdf::writer::{self, PageLayout};
use crate::utils::error::StorageError;

/// Sidecar written next to the output document when metadata is requested.
#[derive(Debug, Serialize)]
struct ExtractionMetadata<'a> {
    source: &'a str,
    strategy: &'a str,
    char_count: usize,
    extraction_timestamp: String,
}

pub struct StorageManager {
    layout: PageLayout,
}

impl StorageManager {
    pub fn new() -> Self {
        Self {
            layout: PageLayout::default(),
        }
    }

    /// Default output path: `<input_stem>_abstract.pdf` next to the input.
    pub fn default_output_path(input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        input.with_file_name(format!("{stem}_abstract.pdf"))
    }

    /// Renders the abstract into a new document at `output`, creating parent
    /// directories as needed.
    pub fn save_abstract(
        &self,
        section: &AbstractSection,
        title: &str,
        output: &Path,
    ) -> Result<PathBuf, StorageError> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(StorageError::IoError)?;
            }
        }

        let mut doc = writer::build_document(title, &section.content, &self.layout)?;
        doc.save(output)
            .map_err(|e| StorageError::Pdf(format!("failed to save {}: {e}", output.display())))?;

        tracing::info!("Saved abstract to {}", output.display());
        Ok(output.to_path_buf())
    }

    /// Saves metadata about the extraction in JSON format, next to `output`.
    pub fn save_metadata(
        &self,
        section: &AbstractSection,
        output: &Path,
    ) -> Result<PathBuf, StorageError> {
        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "abstract".to_string());
        let path = output.with_file_name(format!("{stem}_meta.json"));

        let metadata = ExtractionMetadata {
            source: &section.source_name,
            strategy: section.provenance.as_str(),
            char_count: section.char_count,
            extraction_timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&path, metadata_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", path.display());
        Ok(path)
    }
}

impl Default for StorageManager {
    fn default() -> Self {
        Self::new()
    }
}
