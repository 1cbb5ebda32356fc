//! readaloud-storage: audio assembly and durable storage
//!
//! Takes synthesis output and makes it durable: streamed chunk
//! outcomes are assembled into one playable byte sequence, and the
//! result is written through an [`AssetStore`]. A storage failure is
//! not a request failure; the audio falls back to direct delivery and
//! the target document's catalog entry is left untouched.

pub mod assemble;
pub mod error;
pub mod store;

pub use assemble::{assemble_streamed, store_or_deliver, StorageTarget, StoreOutcome};
pub use error::StorageError;
pub use store::{AssetStore, FailingAssetStore, FsAssetStore, MemoryAssetStore, StoredAsset};
