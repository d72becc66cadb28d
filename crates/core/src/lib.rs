//! Core domain types for the veridoc document verification service.
//!
//! This crate defines the shared vocabulary used across every other
//! crate in the workspace: document records and their lifecycle status,
//! structured extraction results, notifications, and the identifier
//! newtypes that keep the different kinds of ids from being mixed up.

pub mod document;
pub mod extraction;
pub mod notification;
pub mod types;

pub use document::{Document, DocumentStatus};
pub use extraction::Extraction;
pub use notification::{Notification, NotificationKind};
pub use types::{DocumentId, NotificationId, OwnerId};
