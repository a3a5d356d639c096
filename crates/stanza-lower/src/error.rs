// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lowering error types.

use stanza_ast::{CompositeIdentity, SourceLocation};
use thiserror::Error;

/// A fatal lowering error. Aborts the whole lowering run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct LowerError {
    pub kind: LowerErrorKind,
    pub location: SourceLocation,
}

impl LowerError {
    pub fn unknown_type(identity: CompositeIdentity, location: SourceLocation) -> Self {
        Self {
            kind: LowerErrorKind::UnknownType { identity },
            location,
        }
    }

    pub fn missing_scope_name(scope_type: Option<String>, location: SourceLocation) -> Self {
        Self {
            kind: LowerErrorKind::MissingScopeName { scope_type },
            location,
        }
    }
}

/// The kind of lowering error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LowerErrorKind {
    #[error("could not find resource type `{}` (declared by {identity})", identity.resource_type)]
    UnknownType { identity: CompositeIdentity },

    #[error("{} must have a name", scope_label(scope_type))]
    MissingScopeName { scope_type: Option<String> },
}

fn scope_label(scope_type: &Option<String>) -> String {
    match scope_type {
        Some(t) => format!("`{}` scope", t),
        None => "scope".to_string(),
    }
}
