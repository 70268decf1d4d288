//! Build version model.
//!
//! A build version is a label such as `B13` that orders by the integer
//! embedded in it. The prefix is decoration: `B013` and `B13` are the same
//! build.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::build::extract_ordinal;
use crate::error::{Error, Result};

/// Prefix used for synthesized versions (`next()`).
pub const VERSION_PREFIX: &str = "B";

/// An ordered build identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct BuildVersion {
    label: String,
    ordinal: u64,
}

impl BuildVersion {
    /// Parse a label, extracting its ordinal.
    ///
    /// # Errors
    ///
    /// Returns `MalformedVersion` if the label contains no digits.
    pub fn parse(label: &str) -> Result<Self> {
        let ordinal = extract_ordinal(label)?;
        Ok(Self {
            label: label.to_string(),
            ordinal,
        })
    }

    /// The label as configured or stored (e.g. `B13`).
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The embedded integer that orders this version.
    #[must_use]
    pub const fn ordinal(&self) -> u64 {
        self.ordinal
    }

    /// Name of the build folder under the base path.
    #[must_use]
    pub fn folder_name(&self) -> String {
        self.label.to_uppercase()
    }

    /// The build that follows this one: `B` + (ordinal + 1).
    ///
    /// The number is read from the label after its one-character prefix,
    /// so `B13x` fails even though an ordinal can be extracted from it.
    ///
    /// # Errors
    ///
    /// Returns `MalformedVersion` if the label's number part is not an integer.
    pub fn next(&self) -> Result<Self> {
        let malformed = || Error::MalformedVersion {
            input: self.label.clone(),
        };

        let current: u64 = self
            .label
            .get(1..)
            .ok_or_else(malformed)?
            .parse()
            .map_err(|_| malformed())?;
        let ordinal = current.checked_add(1).ok_or_else(malformed)?;

        Ok(Self {
            label: format!("{VERSION_PREFIX}{ordinal}"),
            ordinal,
        })
    }
}

impl PartialEq for BuildVersion {
    fn eq(&self, other: &Self) -> bool {
        self.ordinal == other.ordinal
    }
}

impl Eq for BuildVersion {}

impl Hash for BuildVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordinal.hash(state);
    }
}

impl PartialOrd for BuildVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BuildVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal.cmp(&other.ordinal)
    }
}

impl fmt::Display for BuildVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl From<BuildVersion> for String {
    fn from(version: BuildVersion) -> Self {
        version.label
    }
}

impl TryFrom<String> for BuildVersion {
    type Error = Error;

    fn try_from(label: String) -> Result<Self> {
        let ordinal = extract_ordinal(&label)?;
        Ok(Self { label, ordinal })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extracts_ordinal() {
        let version = BuildVersion::parse("B13").unwrap();
        assert_eq!(version.ordinal(), 13);
        assert_eq!(version.label(), "B13");
    }

    #[test]
    fn test_parse_without_digits_fails() {
        let result = BuildVersion::parse("latest");
        assert!(matches!(result, Err(Error::MalformedVersion { .. })));
    }

    #[test]
    fn test_ordering_ignores_prefix() {
        let b12 = BuildVersion::parse("B12").unwrap();
        let b13 = BuildVersion::parse("b13").unwrap();
        let padded = BuildVersion::parse("B013").unwrap();

        assert!(b12 < b13);
        assert_eq!(b13, padded);
        // Numeric, not lexicographic
        assert!(BuildVersion::parse("B9").unwrap() < b12);
    }

    #[test]
    fn test_next_increments_ordinal() {
        let next = BuildVersion::parse("B13").unwrap().next().unwrap();
        assert_eq!(next.ordinal(), 14);
        assert_eq!(next.label(), "B14");
    }

    #[test]
    fn test_next_lowercase_label() {
        let next = BuildVersion::parse("b7").unwrap().next().unwrap();
        assert_eq!(next.label(), "B8");
    }

    #[test]
    fn test_next_unparseable_number_fails() {
        let version = BuildVersion::parse("B13x").unwrap();
        assert!(matches!(version.next(), Err(Error::MalformedVersion { .. })));

        let version = BuildVersion::parse("build13").unwrap();
        assert!(matches!(version.next(), Err(Error::MalformedVersion { .. })));
    }

    #[test]
    fn test_folder_name_is_uppercase() {
        let version = BuildVersion::parse("b21").unwrap();
        assert_eq!(version.folder_name(), "B21");
    }

    #[test]
    fn test_serde_as_label() {
        let version = BuildVersion::parse("B21").unwrap();
        let json = serde_json::to_string(&version).unwrap();
        assert_eq!(json, "\"B21\"");

        let back: BuildVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ordinal(), 21);
        assert!(serde_json::from_str::<BuildVersion>("\"none\"").is_err());
    }
}
