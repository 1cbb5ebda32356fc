//! readaloud-core: shared types for the document-to-audio pipeline
//!
//! Holds the error taxonomy, the external document catalog seam, and the
//! accessibility configuration validator. The heavier components
//! (extraction, synthesis, storage) live in their own crates and build
//! on these types.

pub mod accessibility;
pub mod document;
pub mod error;

pub use accessibility::{
    validate_accessibility_config, AccessibilityConfig, AccessibilityLimits,
    SanitizedAccessibility,
};
pub use document::{DocumentCatalog, MemoryCatalog, SourceDocument};
pub use error::{Error, Result};
