//! Build discovery and script access.
//!
//! Build folders (`B12`, `B13`, ...) live directly under a base path and each
//! carries a `2.data_setup.sql` script. This module locates them, orders them
//! by the integer embedded in their names, and reads their scripts.
//!
//! # Submodules
//!
//! - [`locator`] - Runnability checks and recursive script discovery
//! - [`ordinal`] - Ordinal and label extraction from names and paths
//! - [`script`] - Line-oriented script reads (whole, suffix, line count)

pub mod locator;
pub mod ordinal;
pub mod script;

pub use locator::{BuildLocator, BuildScript, DATA_SETUP_NAME, DATA_SETUP_SUFFIX};
pub use ordinal::{extract_build_label, extract_ordinal};
pub use script::{line_count, read_lines, read_suffix_from, read_whole};
