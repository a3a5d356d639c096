// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Errors raised while building the declaration tree.

use thiserror::Error;

use crate::span::SourceLocation;
use crate::value::Value;

/// A structural error detected when the parser builds declarations or
/// inserts children into a scope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AstError {
    #[error("declaration has an empty resource type")]
    EmptyResourceType { location: SourceLocation },

    #[error("`{resource_type}` declaration has an empty identity name")]
    EmptyIdentityName {
        resource_type: String,
        location: SourceLocation,
    },

    #[error("identity attribute {attribute} does not match name `{name}`")]
    IdentityMismatch {
        name: String,
        attribute: Value,
        location: SourceLocation,
    },

    #[error("scopes cannot hold children of kind `{kind}`")]
    InvalidChildType {
        kind: &'static str,
        scope: Option<String>,
    },
}
