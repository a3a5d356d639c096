// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Output of lowering: resolved resources grouped into resolved containers.

use stanza_ast::{Attributes, CompositeIdentity, SourceLocation, Value};

use crate::types::Resource;

/// A declaration turned into a concrete instance.
#[derive(Debug)]
pub struct ResolvedResource {
    pub identity: CompositeIdentity,
    pub location: SourceLocation,
    /// Name of the container this resource logically belongs to.
    pub parent: Option<String>,
    pub instance: Box<dyn Resource>,
}

impl ResolvedResource {
    pub fn new(
        identity: CompositeIdentity,
        location: SourceLocation,
        instance: Box<dyn Resource>,
    ) -> Self {
        Self {
            identity,
            location,
            parent: None,
            instance,
        }
    }

    pub fn resource_type(&self) -> &str {
        &self.identity.resource_type
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn attribute(&self, key: &str) -> Option<Value> {
        self.instance.attribute(key)
    }
}

/// One entry in a resolved container.
#[derive(Debug)]
pub enum ResolvedNode {
    Resource(ResolvedResource),
    Container(ResolvedContainer),
}

impl ResolvedNode {
    pub fn as_resource(&self) -> Option<&ResolvedResource> {
        match self {
            ResolvedNode::Resource(r) => Some(r),
            ResolvedNode::Container(_) => None,
        }
    }

    pub fn as_container(&self) -> Option<&ResolvedContainer> {
        match self {
            ResolvedNode::Container(c) => Some(c),
            ResolvedNode::Resource(_) => None,
        }
    }
}

/// A lowered scope. Children keep declaration order, with each merged
/// resource at the slot of its first occurrence.
#[derive(Debug)]
pub struct ResolvedContainer {
    pub name: String,
    pub scope_type: Option<String>,
    pub location: SourceLocation,
    /// `name`, `type` (when known), then the scope's default attributes.
    pub attributes: Attributes,
    pub children: Vec<ResolvedNode>,
}

impl ResolvedContainer {
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Find a direct child resource by identity. Nested containers are not
    /// searched; identities are only unique within one container.
    pub fn find(&self, identity: &CompositeIdentity) -> Option<&ResolvedResource> {
        self.children
            .iter()
            .filter_map(ResolvedNode::as_resource)
            .find(|r| &r.identity == identity)
    }

    /// Every resource in this container and its descendants, depth-first,
    /// in realization order.
    pub fn resources(&self) -> Vec<&ResolvedResource> {
        let mut out = Vec::new();
        self.collect_resources(&mut out);
        out
    }

    fn collect_resources<'a>(&'a self, out: &mut Vec<&'a ResolvedResource>) {
        for child in &self.children {
            match child {
                ResolvedNode::Resource(r) => out.push(r),
                ResolvedNode::Container(c) => c.collect_resources(out),
            }
        }
    }
}
