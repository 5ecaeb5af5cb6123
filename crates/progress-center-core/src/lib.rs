//! Core types for progress-center.
//!
//! This crate provides the value types shared by the progress center:
//! tracked items, the message catalog used to word summaries, and
//! configuration.

mod config;
mod error;
mod item;
mod messages;

pub use config::{CenterConfig, CenterConfigBuilder};
pub use error::{ProgressError, ProgressResult};
pub use item::{CancelHandle, ItemId, ItemState, ItemType, ProgressItem};
pub use messages::{COUNT_PLACEHOLDER, MessageCatalog, MessageTemplates};
