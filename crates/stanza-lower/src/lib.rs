// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lowering for the stanza configuration compiler.
//!
//! Turns the parser's tree of resource declarations into a tree of concrete
//! resource instances built by a pluggable type registry. Declarations with
//! the same identity in one scope are merged, declaration order is kept for
//! the dependency phase, and a declaration that fails to construct is logged
//! and dropped without taking its scope down with it.

mod error;
mod options;
mod registry;
mod resolved;
mod resolver;
mod types;

pub use error::{LowerError, LowerErrorKind};
pub use options::{LowerOptions, DEBUG_ENV};
pub use registry::{DanglingReference, DeclarationRegistry};
pub use resolved::{ResolvedContainer, ResolvedNode, ResolvedResource};
pub use resolver::{CleanupAction, ConstructionFailure, Resolution, Resolver};
pub use types::{ConstructionError, Resource, ResourceType, TypeRegistry, TypeTable};

use stanza_ast::Scope;

/// The result of lowering: a best-effort tree plus what was left out of it.
#[derive(Debug)]
pub struct Lowered {
    pub root: ResolvedContainer,
    pub failures: Vec<ConstructionFailure>,
}

impl Lowered {
    /// True when every declaration produced a resource.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Lower a scope tree with default options.
pub fn lower(scope: &Scope, types: &dyn TypeRegistry) -> Result<Lowered, LowerError> {
    lower_with_options(scope, types, &LowerOptions::default())
}

/// Lower a scope tree with explicit options.
pub fn lower_with_options(
    scope: &Scope,
    types: &dyn TypeRegistry,
    options: &LowerOptions,
) -> Result<Lowered, LowerError> {
    let mut resolver = Resolver::with_options(types, options.clone());
    let root = resolver.resolve_scope(scope)?;
    Ok(Lowered {
        root,
        failures: resolver.take_failures(),
    })
}
