// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Declaration tree types for the stanza configuration compiler.
//!
//! The parser builds these bottom-up: resource declarations are the leaves,
//! scopes (classes, blocks) are the containers. The lowering pass in
//! `stanza-lower` consumes them read-only.

pub mod span;
pub mod value;
pub mod decl;
mod error;

pub use span::SourceLocation;
pub use value::{Attributes, Value};
pub use decl::{Child, CompositeIdentity, Declaration, Node, Scope, IDENTITY_ATTRIBUTE};
pub use error::AstError;
