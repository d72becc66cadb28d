//! Object storage trait abstraction for Veridoc.
//!
//! Defines the [`BlobStore`] trait that storage backends implement,
//! together with [`BlobError`] and key validation shared by all backends.

pub mod error;
pub mod store;

pub use error::BlobError;
pub use store::{BlobStore, validate_key};
