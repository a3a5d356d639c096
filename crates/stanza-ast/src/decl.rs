// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Resource declarations and the scopes that hold them.

use std::fmt;

use crate::error::AstError;
use crate::span::SourceLocation;
use crate::value::{Attributes, Value};

/// Attribute key under which a declaration's identity name is stored.
pub const IDENTITY_ATTRIBUTE: &str = "name";

/// The `(resource_type, name)` pair identifying a resource.
///
/// Two declarations with the same composite identity in the same scope are
/// merged into a single resource during lowering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompositeIdentity {
    pub resource_type: String,
    pub name: String,
}

impl CompositeIdentity {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }

    /// Flat `type--name` key, as used in parse-time cross-reference tables.
    pub fn long_name(&self) -> String {
        format!("{}--{}", self.resource_type, self.name)
    }
}

impl fmt::Display for CompositeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.resource_type, self.name)
    }
}

/// One resource declaration: a type, an identity name, and attributes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawDeclaration"))]
pub struct Declaration {
    resource_type: String,
    name: String,
    attributes: Attributes,
    location: SourceLocation,
}

impl Declaration {
    /// Create a declaration with an unknown source location.
    pub fn new(
        resource_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, AstError> {
        Self::at(resource_type, name, SourceLocation::unknown())
    }

    /// Create a declaration written at `location`.
    ///
    /// The identity name is also stored as the `name` attribute, so type
    /// constructors receive it with the rest of the attributes.
    pub fn at(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        location: SourceLocation,
    ) -> Result<Self, AstError> {
        let resource_type = resource_type.into();
        let name = name.into();
        if resource_type.is_empty() {
            return Err(AstError::EmptyResourceType { location });
        }
        if name.is_empty() {
            return Err(AstError::EmptyIdentityName { resource_type, location });
        }

        let mut attributes = Attributes::new();
        attributes.insert(IDENTITY_ATTRIBUTE.to_string(), Value::String(name.clone()));

        Ok(Self {
            resource_type,
            name,
            attributes,
            location,
        })
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn composite_identity(&self) -> CompositeIdentity {
        CompositeIdentity::new(self.resource_type.clone(), self.name.clone())
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Set an attribute, returning the previous value.
    ///
    /// The identity attribute is fixed at construction; setting it is a no-op
    /// that returns `None`.
    pub fn set_attribute(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Option<Value> {
        let key = key.into();
        if key == IDENTITY_ATTRIBUTE {
            return None;
        }
        self.attributes.insert(key, value.into())
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }
}

/// Deserialized form of a [`Declaration`], checked by `Declaration::at`
/// before it becomes one.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawDeclaration {
    resource_type: String,
    name: String,
    #[serde(default)]
    attributes: Attributes,
    #[serde(default)]
    location: SourceLocation,
}

#[cfg(feature = "serde")]
impl TryFrom<RawDeclaration> for Declaration {
    type Error = AstError;

    /// A missing identity attribute is re-seeded; one that names a different
    /// resource is rejected.
    fn try_from(raw: RawDeclaration) -> Result<Self, Self::Error> {
        let mut decl = Declaration::at(raw.resource_type, raw.name, raw.location)?;
        for (key, value) in raw.attributes {
            if key == IDENTITY_ATTRIBUTE {
                if value.as_str() != Some(decl.name()) {
                    return Err(AstError::IdentityMismatch {
                        name: decl.name,
                        attribute: value,
                        location: decl.location,
                    });
                }
                continue;
            }
            decl.attributes.insert(key, value);
        }
        Ok(decl)
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) => {{", self.resource_type, self.name)?;
        for (i, (key, value)) in self.attributes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}

/// A value the parser may try to place inside a scope.
///
/// Only declarations and scopes are valid children; anything else is
/// rejected by [`Scope::push`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Declaration(Declaration),
    Scope(Scope),
    Value(Value),
}

impl Node {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Declaration(_) => "declaration",
            Node::Scope(_) => "scope",
            Node::Value(v) => v.kind_name(),
        }
    }
}

impl From<Declaration> for Node {
    fn from(decl: Declaration) -> Self {
        Node::Declaration(decl)
    }
}

impl From<Scope> for Node {
    fn from(scope: Scope) -> Self {
        Node::Scope(scope)
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Node::Value(value)
    }
}

/// A validated scope child.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Child {
    Declaration(Declaration),
    Scope(Scope),
}

impl TryFrom<Node> for Child {
    type Error = &'static str;

    /// Fails with the offending node's kind name.
    fn try_from(node: Node) -> Result<Self, Self::Error> {
        match node {
            Node::Declaration(d) => Ok(Child::Declaration(d)),
            Node::Scope(s) => Ok(Child::Scope(s)),
            other => Err(other.kind_name()),
        }
    }
}

/// An ordered, named container of declarations and nested scopes.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scope {
    /// Required by the time the scope is lowered.
    pub name: Option<String>,
    /// What kind of scope this is (e.g. `class`, `node`).
    pub scope_type: Option<String>,
    pub location: SourceLocation,
    /// Scope-level default attributes.
    pub defaults: Option<Attributes>,
    children: Vec<Child>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, scope_type: impl Into<String>) -> Self {
        self.scope_type = Some(scope_type.into());
        self
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Append a child. Anything other than a declaration or a scope is
    /// rejected here, never later at lowering time.
    pub fn push(&mut self, node: impl Into<Node>) -> Result<&mut Self, AstError> {
        let child = Child::try_from(node.into()).map_err(|kind| AstError::InvalidChildType {
            kind,
            scope: self.name.clone(),
        })?;
        self.children.push(child);
        Ok(self)
    }

    /// Append several children at once. Every node is checked before any is
    /// inserted, so a rejected batch leaves the scope unchanged.
    pub fn push_all<I>(&mut self, nodes: I) -> Result<&mut Self, AstError>
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        let mut batch = Vec::new();
        for node in nodes {
            let child = Child::try_from(node.into()).map_err(|kind| AstError::InvalidChildType {
                kind,
                scope: self.name.clone(),
            })?;
            batch.push(child);
        }
        self.children.extend(batch);
        Ok(self)
    }

    /// Set one scope-level default attribute.
    pub fn param(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.defaults
            .get_or_insert_with(Attributes::new)
            .insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> Declaration {
        Declaration::new("file", name).unwrap()
    }

    #[test]
    fn identity_attribute_is_seeded() {
        let decl = file("/etc/motd");
        assert_eq!(decl.attribute(IDENTITY_ATTRIBUTE), Some(&Value::from("/etc/motd")));
        assert_eq!(decl.composite_identity(), CompositeIdentity::new("file", "/etc/motd"));
    }

    #[test]
    fn identity_attribute_is_fixed() {
        let mut decl = file("/etc/motd");
        assert_eq!(decl.set_attribute(IDENTITY_ATTRIBUTE, "/etc/issue"), None);
        assert_eq!(decl.attribute(IDENTITY_ATTRIBUTE), Some(&Value::from("/etc/motd")));
        assert_eq!(decl.name(), "/etc/motd");
    }

    #[test]
    fn empty_type_or_name_rejected() {
        assert!(matches!(
            Declaration::new("", "x"),
            Err(AstError::EmptyResourceType { .. })
        ));
        assert!(matches!(
            Declaration::new("file", ""),
            Err(AstError::EmptyIdentityName { .. })
        ));
    }

    #[test]
    fn attributes_keep_insertion_order() {
        let decl = file("/tmp/a")
            .with_attribute("owner", "root")
            .with_attribute("mode", 644)
            .with_attribute("ensure", "present");
        let keys: Vec<&str> = decl.attributes().keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "owner", "mode", "ensure"]);
    }

    #[test]
    fn display_declaration() {
        let decl = file("/tmp/a").with_attribute("mode", 644);
        assert_eq!(decl.to_string(), "file(/tmp/a) => {name: \"/tmp/a\", mode: 644}");
    }

    #[test]
    fn long_name_joins_type_and_name() {
        assert_eq!(CompositeIdentity::new("service", "sshd").long_name(), "service--sshd");
        assert_eq!(CompositeIdentity::new("service", "sshd").to_string(), "service[sshd]");
    }

    #[test]
    fn push_accepts_declarations_and_scopes() {
        let mut scope = Scope::named("base");
        scope.push(file("/a")).unwrap().push(Scope::named("inner")).unwrap();
        assert_eq!(scope.len(), 2);
        assert!(matches!(scope.children()[0], Child::Declaration(_)));
        assert!(matches!(scope.children()[1], Child::Scope(_)));
    }

    #[test]
    fn push_rejects_foreign_children() {
        let mut scope = Scope::named("base");
        let err = scope.push(Value::from(3)).unwrap_err();
        assert_eq!(
            err,
            AstError::InvalidChildType {
                kind: "integer",
                scope: Some("base".to_string()),
            }
        );
        assert!(scope.is_empty());
    }

    #[test]
    fn push_all_is_all_or_nothing() {
        let mut scope = Scope::named("base");
        let nodes: Vec<Node> = vec![
            file("/a").into(),
            Value::from("oops").into(),
            file("/b").into(),
        ];
        assert!(scope.push_all(nodes).is_err());
        assert!(scope.is_empty());

        let nodes: Vec<Node> = vec![file("/a").into(), Scope::named("inner").into()];
        scope.push_all(nodes).unwrap();
        assert_eq!(scope.len(), 2);
    }

    #[test]
    fn param_creates_defaults() {
        let mut scope = Scope::named("base");
        assert!(scope.defaults.is_none());
        scope.param("owner", "root").param("group", "wheel");
        let defaults = scope.defaults.as_ref().unwrap();
        assert_eq!(defaults.get("owner"), Some(&Value::from("root")));
        assert_eq!(defaults.len(), 2);
    }

    #[cfg(feature = "serde")]
    mod serde_form {
        use super::*;

        fn parse(json: &str) -> Result<Declaration, serde_json::Error> {
            serde_json::from_str(json)
        }

        #[test]
        fn serialized_declaration_reads_back() {
            let decl = file("/etc/motd")
                .with_attribute("mode", 644)
                .with_location(SourceLocation::new("motd.pp", 3));
            let json = serde_json::to_string(&decl).unwrap();
            assert_eq!(parse(&json).unwrap(), decl);
        }

        #[test]
        fn empty_type_or_name_rejected() {
            let empty_type = r#"{"resource_type":"","name":"/a","attributes":{}}"#;
            let err = parse(empty_type).unwrap_err();
            assert!(err.to_string().contains("empty resource type"));

            let empty_name = r#"{"resource_type":"file","name":"","attributes":{}}"#;
            let err = parse(empty_name).unwrap_err();
            assert!(err.to_string().contains("empty identity name"));
        }

        #[test]
        fn missing_identity_attribute_is_seeded() {
            let json =
                r#"{"resource_type":"file","name":"/a","attributes":{"mode":{"Integer":600}}}"#;
            let decl = parse(json).unwrap();
            assert_eq!(decl.attribute(IDENTITY_ATTRIBUTE), Some(&Value::from("/a")));
            assert_eq!(decl.attribute("mode"), Some(&Value::from(600)));
            assert!(decl.location().is_unknown());
        }

        #[test]
        fn mismatched_identity_attribute_rejected() {
            let json =
                r#"{"resource_type":"file","name":"/a","attributes":{"name":{"String":"/b"}}}"#;
            let err = parse(json).unwrap_err();
            assert!(err.to_string().contains("does not match"));
        }
    }
}
