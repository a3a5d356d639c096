// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The boundary to resource type implementations.
//!
//! Lowering never knows what a `file` or a `service` is. It looks the
//! declared type up in a [`TypeRegistry`] and asks the returned
//! [`ResourceType`] to build an instance from the declaration's attributes.

use std::collections::HashMap;
use std::fmt;

use stanza_ast::{Attributes, SourceLocation, Value};
use thiserror::Error;

/// A concrete resource instance produced by a [`ResourceType`].
pub trait Resource: fmt::Debug {
    fn resource_type(&self) -> &str;

    fn name(&self) -> &str;

    fn attribute(&self, key: &str) -> Option<Value>;

    /// Overwrite one attribute. Used when a later declaration in the same
    /// scope is merged into this instance.
    fn set_attribute(&mut self, key: &str, value: Value);

    fn set_location(&mut self, location: SourceLocation);

    /// Roll back whatever the instance registered on construction.
    fn destroy(&mut self);
}

/// Construction failed. `partial` carries the instance if the type got far
/// enough to build one, so that lowering can destroy it.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ConstructionError {
    pub message: String,
    pub partial: Option<Box<dyn Resource>>,
}

impl ConstructionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            partial: None,
        }
    }

    pub fn with_partial(mut self, partial: Box<dyn Resource>) -> Self {
        self.partial = Some(partial);
        self
    }
}

/// One kind of resource (`file`, `service`, ...).
pub trait ResourceType {
    fn name(&self) -> &str;

    /// Build an instance from the full attribute mapping, identity included.
    fn construct(&self, attributes: &Attributes) -> Result<Box<dyn Resource>, ConstructionError>;

    /// Fetch an instance already registered under `name` in the type's own
    /// store, if the type keeps one.
    fn retrieve(&self, _name: &str) -> Option<Box<dyn Resource>> {
        None
    }
}

/// Maps resource type names to their implementations.
pub trait TypeRegistry {
    fn lookup(&self, resource_type: &str) -> Option<&dyn ResourceType>;
}

/// A [`TypeRegistry`] backed by a hash map.
#[derive(Default)]
pub struct TypeTable {
    types: HashMap<String, Box<dyn ResourceType>>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type under its own name. A type registered twice replaces
    /// the earlier one.
    pub fn register(&mut self, ty: impl ResourceType + 'static) -> &mut Self {
        self.types.insert(ty.name().to_string(), Box::new(ty));
        self
    }

    pub fn contains(&self, resource_type: &str) -> bool {
        self.types.contains_key(resource_type)
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeRegistry for TypeTable {
    fn lookup(&self, resource_type: &str) -> Option<&dyn ResourceType> {
        self.types.get(resource_type).map(|ty| ty.as_ref())
    }
}

impl fmt::Debug for TypeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeTable")
            .field("types", &self.type_names())
            .finish()
    }
}
