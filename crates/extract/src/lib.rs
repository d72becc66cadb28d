pub mod config;
pub mod error;
pub mod extractor;
pub mod http;
pub mod mock;

pub use config::ExtractionConfig;
pub use error::ExtractorError;
pub use extractor::{ExtractionInput, Extractor};
pub use http::HttpExtractor;
pub use mock::{FailingExtractor, MockExtractor};
