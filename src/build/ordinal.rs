//! Ordinal extraction.
//!
//! Ordinals order builds and discovered script paths. Only ASCII digits
//! count; the first run found wins.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[0-9]+").expect("digit pattern is valid"));

static BUILD_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)b[0-9]+").expect("build label pattern is valid"));

/// Extract the first run of digits in `input` as an integer.
///
/// Works on version labels (`B13`) as well as arbitrary paths
/// (`B7/2.data_setup.sql` yields 7).
///
/// # Errors
///
/// Returns `MalformedVersion` if `input` has no digits or the run does not
/// fit in a `u64`.
pub fn extract_ordinal(input: &str) -> Result<u64> {
    DIGITS
        .find(input)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| Error::MalformedVersion {
            input: input.to_string(),
        })
}

/// Extract the first `B<digits>` token in `input`, upper-cased.
///
/// Used for `FROM_BUILD_B<n>` options and to name the build a discovered
/// script belongs to.
///
/// # Errors
///
/// Returns `MalformedVersion` if no such token exists.
pub fn extract_build_label(input: &str) -> Result<String> {
    BUILD_LABEL
        .find(input)
        .map(|m| m.as_str().to_uppercase())
        .ok_or_else(|| Error::MalformedVersion {
            input: input.to_string(),
        })
}
