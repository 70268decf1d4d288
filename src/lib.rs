//! sqlsync - Resumable build-folder SQL synchronizer
//!
//! Applies versioned setup scripts kept in build folders (`B12`, `B13`, ...)
//! to a target database and records how far it got, so the next run resumes
//! instead of re-applying.
//!
//! # Architecture
//!
//! - [`build`] - Build folder discovery and script reading
//! - [`engine`] - The resumable sync state machine
//! - [`storage`] - SQLite target database and progress log
//! - [`model`] - Data types (BuildVersion, SyncCheckpoint)
//! - [`config`] - Run configuration
//! - [`cli`] - Command-line interface using clap
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod build;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod storage;

pub use error::{Error, Result};
