// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Conversions from compiler error types to `Diagnostic`.

use stanza_ast::AstError;
use stanza_lower::{
    CleanupAction, ConstructionFailure, DanglingReference, LowerError, LowerErrorKind, Lowered,
};

use crate::{Diagnostic, ToDiagnostic};

// ============================================================================
// Declaration Tree Errors
// ============================================================================

impl ToDiagnostic for AstError {
    fn to_diagnostic(&self) -> Diagnostic {
        match self {
            AstError::EmptyResourceType { location } => Diagnostic::error(self.to_string())
                .with_code("S0001")
                .at(location),

            AstError::EmptyIdentityName { location, .. } => Diagnostic::error(self.to_string())
                .with_code("S0002")
                .at(location)
                .with_help("every resource needs a non-empty name"),

            AstError::IdentityMismatch { location, .. } => Diagnostic::error(self.to_string())
                .with_code("S0004")
                .at(location)
                .with_help("drop the `name` attribute or make it equal to the declared name"),

            AstError::InvalidChildType { scope, .. } => {
                let mut diag = Diagnostic::error(self.to_string())
                    .with_code("S0003")
                    .with_help("scopes hold only resource declarations and nested scopes");
                if let Some(name) = scope {
                    diag = diag.with_note(format!("while adding to scope `{}`", name));
                }
                diag
            }
        }
    }
}

// ============================================================================
// Lowering Errors
// ============================================================================

impl ToDiagnostic for LowerError {
    fn to_diagnostic(&self) -> Diagnostic {
        match &self.kind {
            LowerErrorKind::UnknownType { identity } => Diagnostic::error(self.to_string())
                .with_code("S0100")
                .at(&self.location)
                .with_help(format!(
                    "check the spelling of `{}` or load the module that defines it",
                    identity.resource_type
                )),

            LowerErrorKind::MissingScopeName { .. } => Diagnostic::error(self.to_string())
                .with_code("S0101")
                .at(&self.location),
        }
    }
}

impl ToDiagnostic for ConstructionFailure {
    fn to_diagnostic(&self) -> Diagnostic {
        let message = format!("could not create {}: {}", self.identity, self.cause);
        let mut diag = Diagnostic::error(message)
            .with_code("S0102")
            .at(&self.location);

        match self.cleanup {
            CleanupAction::DestroyedPartial => {
                diag = diag.with_note("the partially built resource was destroyed");
            }
            CleanupAction::DestroyedRetrieved => {
                diag = diag.with_note(format!("the existing {} was destroyed", self.identity));
            }
            CleanupAction::Nothing => {}
        }
        if let Some(ref dump) = self.dump {
            diag = diag.with_note(format!("declaration: {}", dump));
        }
        diag
    }
}

impl ToDiagnostic for DanglingReference {
    fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::warning(format!(
            "{} refers to {} in `{}`, which is never declared",
            self.from, self.target, self.attribute
        ))
        .with_code("S0200")
        .at(&self.location)
    }
}

/// One error per declaration that was left out of a best-effort lowering.
pub fn lowering_diagnostics(lowered: &Lowered) -> Vec<Diagnostic> {
    lowered.failures.iter().map(ToDiagnostic::to_diagnostic).collect()
}
