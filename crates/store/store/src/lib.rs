//! Store trait abstractions for Veridoc.
//!
//! Defines the [`DocumentStore`] and [`NotificationStore`] traits that
//! persistence backends implement, together with [`StoreError`] and a
//! shared conformance test suite backends run against themselves.

pub mod error;
pub mod store;
pub mod testing;

pub use error::StoreError;
pub use store::{DocumentStore, NotificationStore};
