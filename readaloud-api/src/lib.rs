//! readaloud-api: the pipeline facade
//!
//! Ties the extraction, chunking, synthesis and storage crates into the
//! four pipeline operations plus two conveniences (full audiobook
//! generation and chunked text streaming). Transport bindings live
//! outside this crate; callers hand it a catalog and an asset store and
//! get request-scoped async operations back.

pub mod dto;
pub mod pipeline;
pub mod telemetry;

pub use dto::{AudiobookReport, DeliveredAudio, ExtractReport, StreamedText};
pub use pipeline::AudiobookPipeline;
