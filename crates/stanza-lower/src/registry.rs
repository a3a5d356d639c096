// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Session-wide log of every declaration the parser creates.
//!
//! The parser registers each declaration the moment it is built. The index
//! lets it ask, while still parsing, whether a resource named in a
//! reference has already been declared. Lowering does not consult it: merging
//! is decided per scope.
//!
//! One registry lives for one compilation session. Call [`clear`] (or build
//! a fresh one) before starting the next; stale entries otherwise leak into
//! it.
//!
//! [`clear`]: DeclarationRegistry::clear

use std::collections::HashMap;

use stanza_ast::{Child, CompositeIdentity, Declaration, Scope, SourceLocation, Value};

#[derive(Debug, Default)]
pub struct DeclarationRegistry {
    log: Vec<Declaration>,
    /// Identity → position in `log` of the latest declaration with it.
    index: HashMap<CompositeIdentity, usize>,
}

/// A reference attribute whose target was never declared in the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub from: CompositeIdentity,
    pub attribute: String,
    pub target: CompositeIdentity,
    pub location: SourceLocation,
}

impl DeclarationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the log and point the index at this declaration. Never fails;
    /// an identity registered again simply wins the index.
    pub fn register(&mut self, declaration: &Declaration) {
        self.index
            .insert(declaration.composite_identity(), self.log.len());
        self.log.push(declaration.clone());
    }

    /// Forget everything. Both the log and the index are emptied.
    pub fn clear(&mut self) {
        self.log.clear();
        self.index.clear();
    }

    /// Every registered declaration, in registration order.
    pub fn list(&self) -> &[Declaration] {
        &self.log
    }

    /// The most recently registered declaration with this identity.
    pub fn get(&self, identity: &CompositeIdentity) -> Option<&Declaration> {
        self.index.get(identity).and_then(|&i| self.log.get(i))
    }

    pub fn contains(&self, identity: &CompositeIdentity) -> bool {
        self.index.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Walk `scope` and report every `Reference` attribute (including ones
    /// nested in lists) that names an identity this registry has not seen.
    pub fn dangling_references(&self, scope: &Scope) -> Vec<DanglingReference> {
        let mut out = Vec::new();
        self.check_scope(scope, &mut out);
        out
    }

    fn check_scope(&self, scope: &Scope, out: &mut Vec<DanglingReference>) {
        for child in scope.children() {
            match child {
                Child::Scope(nested) => self.check_scope(nested, out),
                Child::Declaration(decl) => {
                    for (key, value) in decl.attributes() {
                        self.check_value(decl, key, value, out);
                    }
                }
            }
        }
    }

    fn check_value(
        &self,
        decl: &Declaration,
        key: &str,
        value: &Value,
        out: &mut Vec<DanglingReference>,
    ) {
        match value {
            Value::Reference(target) if !self.contains(target) => {
                out.push(DanglingReference {
                    from: decl.composite_identity(),
                    attribute: key.to_string(),
                    target: target.clone(),
                    location: decl.location().clone(),
                });
            }
            Value::List(items) => {
                for item in items {
                    self.check_value(decl, key, item, out);
                }
            }
            _ => {}
        }
    }
}
