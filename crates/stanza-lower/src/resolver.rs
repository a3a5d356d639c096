// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The lowering resolver.
//!
//! Walks a scope depth-first, in declaration order. Each declaration is
//! either built through the type registry or, when its identity already
//! appeared earlier in the same scope, merged into the earlier instance.
//! A declaration whose construction fails is cleaned up, logged, recorded
//! as a [`ConstructionFailure`] and left out; its siblings carry on.

use std::collections::HashMap;

use stanza_ast::{
    Attributes, Child, CompositeIdentity, Declaration, Scope, SourceLocation, Value,
    IDENTITY_ATTRIBUTE,
};
use tracing::{debug, error};

use crate::error::LowerError;
use crate::options::LowerOptions;
use crate::resolved::{ResolvedContainer, ResolvedNode, ResolvedResource};
use crate::types::{ConstructionError, Resource, ResourceType, TypeRegistry};

/// Which cleanup step ran after a construction failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupAction {
    /// The failing type handed back a partial instance; it was destroyed.
    DestroyedPartial,
    /// An instance with the same name was found in the type's own store
    /// and destroyed.
    DestroyedRetrieved,
    Nothing,
}

/// A declaration that produced no resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructionFailure {
    pub identity: CompositeIdentity,
    pub location: SourceLocation,
    pub cause: String,
    pub cleanup: CleanupAction,
    /// Full declaration dump, present when [`LowerOptions::debug`] is set.
    pub dump: Option<String>,
}

/// Outcome of resolving one declaration.
#[derive(Debug)]
pub enum Resolution {
    Resolved(ResolvedResource),
    Failed(ConstructionFailure),
}

pub struct Resolver<'t> {
    types: &'t dyn TypeRegistry,
    options: LowerOptions,
    failures: Vec<ConstructionFailure>,
}

impl<'t> Resolver<'t> {
    pub fn new(types: &'t dyn TypeRegistry) -> Self {
        Self::with_options(types, LowerOptions::default())
    }

    pub fn with_options(types: &'t dyn TypeRegistry, options: LowerOptions) -> Self {
        Self {
            types,
            options,
            failures: Vec::new(),
        }
    }

    /// Failures recorded so far, in the order they happened.
    pub fn failures(&self) -> &[ConstructionFailure] {
        &self.failures
    }

    pub fn take_failures(&mut self) -> Vec<ConstructionFailure> {
        std::mem::take(&mut self.failures)
    }

    /// Resolve a single declaration.
    ///
    /// An unknown resource type is fatal. A construction failure is not:
    /// it comes back as [`Resolution::Failed`] after cleanup.
    pub fn resolve_declaration(&mut self, decl: &Declaration) -> Result<Resolution, LowerError> {
        let identity = decl.composite_identity();
        let types = self.types;
        let Some(ty) = types.lookup(decl.resource_type()) else {
            return Err(LowerError::unknown_type(identity, decl.location().clone()));
        };

        match ty.construct(decl.attributes()) {
            Ok(mut instance) => {
                instance.set_location(decl.location().clone());
                Ok(Resolution::Resolved(ResolvedResource::new(
                    identity,
                    decl.location().clone(),
                    instance,
                )))
            }
            Err(err) => Ok(Resolution::Failed(self.fail(ty, decl, identity, err))),
        }
    }

    fn fail(
        &mut self,
        ty: &dyn ResourceType,
        decl: &Declaration,
        identity: CompositeIdentity,
        err: ConstructionError,
    ) -> ConstructionFailure {
        let ConstructionError { message, partial } = err;

        let dump = self.options.debug.then(|| decl.to_string());
        if let Some(ref dump) = dump {
            error!(resource = %identity, declaration = %dump, "failed declaration");
        }

        let cleanup = clean_up(ty, &identity, partial);
        error!(
            resource = %identity,
            location = %decl.location(),
            cause = %message,
            "could not create resource"
        );

        let failure = ConstructionFailure {
            identity,
            location: decl.location().clone(),
            cause: message,
            cleanup,
            dump,
        };
        self.failures.push(failure.clone());
        failure
    }

    /// Resolve a scope and everything under it.
    ///
    /// Nested scopes are fully resolved before the next sibling is looked
    /// at. Identity merging is local to one scope: a duplicate in a nested
    /// scope is its own resource.
    pub fn resolve_scope(&mut self, scope: &Scope) -> Result<ResolvedContainer, LowerError> {
        let Some(name) = scope.name.as_deref() else {
            return Err(LowerError::missing_scope_name(
                scope.scope_type.clone(),
                scope.location.clone(),
            ));
        };

        let mut container = open_container(name, scope);
        let mut name_table: HashMap<CompositeIdentity, usize> = HashMap::new();

        for child in scope.children() {
            match child {
                Child::Scope(nested) => {
                    let resolved = self.resolve_scope(nested)?;
                    container.children.push(ResolvedNode::Container(resolved));
                }
                Child::Declaration(decl) => {
                    let identity = decl.composite_identity();
                    if let Some(&slot) = name_table.get(&identity) {
                        if let Some(ResolvedNode::Resource(existing)) =
                            container.children.get_mut(slot)
                        {
                            merge_into(existing, decl, name);
                        }
                        continue;
                    }

                    match self.resolve_declaration(decl)? {
                        Resolution::Resolved(mut resource) => {
                            resource.parent = Some(name.to_string());
                            name_table.insert(identity, container.children.len());
                            container.children.push(ResolvedNode::Resource(resource));
                        }
                        Resolution::Failed(_) => {}
                    }
                }
            }
        }

        Ok(container)
    }
}

/// Seed a container from the scope's identity fields and defaults.
fn open_container(name: &str, scope: &Scope) -> ResolvedContainer {
    let mut attributes = Attributes::new();
    attributes.insert(IDENTITY_ATTRIBUTE.to_string(), Value::from(name));

    match scope.scope_type {
        Some(ref scope_type) => {
            attributes.insert("type".to_string(), Value::from(scope_type.as_str()));
        }
        None => debug!(scope = name, "scope has no type"),
    }

    match scope.defaults {
        Some(ref defaults) => {
            for (key, value) in defaults {
                debug!(scope = name, attribute = %key, "defining scope default");
                attributes.insert(key.clone(), value.clone());
            }
        }
        None => debug!(scope = name, "scope has no default attributes"),
    }

    ResolvedContainer {
        name: name.to_string(),
        scope_type: scope.scope_type.clone(),
        location: scope.location.clone(),
        attributes,
        children: Vec::new(),
    }
}

/// Later declaration wins for every attribute but the identity.
fn merge_into(existing: &mut ResolvedResource, decl: &Declaration, scope: &str) {
    for (key, value) in decl.attributes() {
        if key == IDENTITY_ATTRIBUTE {
            continue;
        }
        debug!(resource = %existing.identity, attribute = %key, "merging attribute");
        existing.instance.set_attribute(key, value.clone());
    }
    existing.parent = Some(scope.to_string());
}

fn clean_up(
    ty: &dyn ResourceType,
    identity: &CompositeIdentity,
    partial: Option<Box<dyn Resource>>,
) -> CleanupAction {
    if let Some(mut instance) = partial {
        error!(resource = %identity, "destroying partially built resource");
        instance.destroy();
        return CleanupAction::DestroyedPartial;
    }

    match ty.retrieve(&identity.name) {
        Some(mut existing) => {
            error!(resource = %identity, "destroying retrieved resource");
            existing.destroy();
            CleanupAction::DestroyedRetrieved
        }
        None => CleanupAction::Nothing,
    }
}
