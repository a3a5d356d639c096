// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Source location tracking.

use std::fmt;

/// Where a declaration or scope was written.
///
/// Both halves are optional: declarations synthesized by the parser (or by
/// tests) may have no file, and some front ends only know the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceLocation {
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: Some(file.into()),
            line: Some(line),
        }
    }

    /// A location with no file and no line.
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn is_unknown(&self) -> bool {
        self.file.is_none() && self.line.is_none()
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{}:{}", file, line),
            (Some(file), None) => write!(f, "{}", file),
            (None, Some(line)) => write!(f, "line {}", line),
            (None, None) => write!(f, "<unknown>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_full() {
        let loc = SourceLocation::new("site.pp", 12);
        assert_eq!(loc.to_string(), "site.pp:12");
    }

    #[test]
    fn display_partial() {
        let file_only = SourceLocation {
            file: Some("site.pp".to_string()),
            line: None,
        };
        assert_eq!(file_only.to_string(), "site.pp");

        let line_only = SourceLocation {
            file: None,
            line: Some(3),
        };
        assert_eq!(line_only.to_string(), "line 3");
    }

    #[test]
    fn unknown_location() {
        let loc = SourceLocation::unknown();
        assert!(loc.is_unknown());
        assert_eq!(loc.to_string(), "<unknown>");
        assert!(!SourceLocation::new("a", 1).is_unknown());
    }
}
