//! Date-keyed filesystem store for captured frames and finished videos.
//!
//! This crate provides:
//! - The deterministic path layout under one base directory
//! - Idempotent bucket directory creation
//! - Ordered frame listing per day bucket
//! - Daily video discovery for master rebuilds

pub mod error;
pub mod layout;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use layout::{StoreLayout, MASTER_FILE_NAME};
pub use store::FrameStore;
