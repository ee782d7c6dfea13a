// src/extractors/mod.rs
pub mod section;
pub mod text;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use section::{
    AbstractCandidate,
    AbstractExtractor,
    AbstractSection,
    KeywordScanStrategy,
    LocateStrategy,
    LocatorConfig,
    ParagraphStrategy,
    PatternStrategy,
    Provenance,
};
