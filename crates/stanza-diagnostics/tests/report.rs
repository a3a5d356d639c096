// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Lower a tree with a broken declaration and check the report the user
//! would see for it.

use stanza_ast::{Attributes, Declaration, Scope, SourceLocation, Value};
use stanza_diagnostics::json::to_json_report;
use stanza_diagnostics::{lowering_diagnostics, ToDiagnostic};
use stanza_lower::{
    lower, ConstructionError, DeclarationRegistry, Resource, ResourceType, TypeTable,
};

#[derive(Debug)]
struct Package {
    name: String,
    attributes: Attributes,
}

impl Resource for Package {
    fn resource_type(&self) -> &str {
        "package"
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn attribute(&self, key: &str) -> Option<Value> {
        self.attributes.get(key).cloned()
    }
    fn set_attribute(&mut self, key: &str, value: Value) {
        self.attributes.insert(key.to_string(), value);
    }
    fn set_location(&mut self, _location: SourceLocation) {}
    fn destroy(&mut self) {}
}

/// Rejects any `ensure` other than `present`/`absent`.
struct PackageType;

impl ResourceType for PackageType {
    fn name(&self) -> &str {
        "package"
    }

    fn construct(&self, attributes: &Attributes) -> Result<Box<dyn Resource>, ConstructionError> {
        let name = attributes
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        match attributes.get("ensure").and_then(Value::as_str) {
            None | Some("present") | Some("absent") => Ok(Box::new(Package {
                name,
                attributes: attributes.clone(),
            })),
            Some(other) => Err(ConstructionError::new(format!("invalid ensure value `{}`", other))),
        }
    }
}

fn package(name: &str, line: u32) -> Declaration {
    Declaration::at("package", name, SourceLocation::new("packages.pp", line)).unwrap()
}

#[test]
fn best_effort_lowering_reports_what_failed() {
    let mut types = TypeTable::new();
    types.register(PackageType);

    let mut top = Scope::named("packages");
    top.push_all(vec![
        package("vim", 1),
        package("emacs", 2).with_attribute("ensure", "latest-ish"),
        package("git", 3).with_attribute("ensure", "present"),
    ])
    .unwrap();

    let lowered = lower(&top, &types).unwrap();
    assert_eq!(lowered.root.len(), 2);

    let diagnostics = lowering_diagnostics(&lowered);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].message,
        "could not create package[emacs]: invalid ensure value `latest-ish`"
    );
    assert_eq!(diagnostics[0].location, Some(SourceLocation::new("packages.pp", 2)));

    let report = to_json_report(&diagnostics, "packages.pp", "lower");
    assert!(!report.success);
    assert_eq!(report.error_count, 1);
}

#[test]
fn dangling_references_become_warnings() {
    let mut registry = DeclarationRegistry::new();
    let git = package("git", 1).with_attribute(
        "require",
        Value::Reference(stanza_ast::CompositeIdentity::new("package", "openssl")),
    );
    registry.register(&git);

    let mut top = Scope::named("packages");
    top.push(git).unwrap();

    let warnings: Vec<_> = registry
        .dangling_references(&top)
        .iter()
        .map(ToDiagnostic::to_diagnostic)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert!(!warnings[0].is_error());

    let report = to_json_report(&warnings, "packages.pp", "references");
    assert!(report.success);
    assert_eq!(report.warning_count, 1);
}
