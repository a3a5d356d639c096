// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error code registry.
//!
//! Maps error codes (S0001, S0100, etc.) to titles and categories.

use std::collections::HashMap;

/// Registry of all known error codes.
pub struct ErrorCodeRegistry {
    codes: HashMap<&'static str, ErrorCodeInfo>,
}

/// Information about a single error code.
pub struct ErrorCodeInfo {
    pub code: &'static str,
    pub title: &'static str,
    pub category: ErrorCategory,
}

/// Error category for grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Structure,
    Resolution,
    Construction,
    Reference,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Structure => write!(f, "Structure"),
            ErrorCategory::Resolution => write!(f, "Resolution"),
            ErrorCategory::Construction => write!(f, "Construction"),
            ErrorCategory::Reference => write!(f, "Reference"),
        }
    }
}

macro_rules! register_codes {
    ($($code:literal => ($title:literal, $cat:expr)),* $(,)?) => {{
        let mut map = HashMap::new();
        $(
            map.insert($code, ErrorCodeInfo {
                code: $code,
                title: $title,
                category: $cat,
            });
        )*
        map
    }};
}

impl Default for ErrorCodeRegistry {
    fn default() -> Self {
        use ErrorCategory::*;

        Self {
            codes: register_codes! {
                // Declaration tree (S00xx)
                "S0001" => ("empty resource type", Structure),
                "S0002" => ("empty identity name", Structure),
                "S0003" => ("invalid scope child", Structure),
                "S0004" => ("identity attribute does not match name", Structure),

                // Lowering (S01xx)
                "S0100" => ("unknown resource type", Resolution),
                "S0101" => ("scope without a name", Resolution),
                "S0102" => ("resource construction failed", Construction),

                // Cross references (S02xx)
                "S0200" => ("reference to undeclared resource", Reference),
            },
        }
    }
}

impl ErrorCodeRegistry {
    pub fn get(&self, code: &str) -> Option<&ErrorCodeInfo> {
        self.codes.get(code)
    }
}
