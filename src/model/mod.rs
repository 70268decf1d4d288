//! Data models for sqlsync.
//!
//! This module contains the domain models:
//! - BuildVersion
//! - SyncCheckpoint

pub mod checkpoint;
pub mod version;

pub use checkpoint::SyncCheckpoint;
pub use version::BuildVersion;
