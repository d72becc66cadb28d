pub mod api;
pub mod blob_factory;
pub mod config;
pub mod error;
pub mod extractor_factory;
pub mod store_factory;
