// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! JSON diagnostic output for machine consumption.

use serde::Serialize;

use crate::{codes::ErrorCodeRegistry, Diagnostic, Severity};

/// A complete JSON diagnostic report for one compilation run.
#[derive(Debug, Serialize)]
pub struct DiagnosticReport {
    /// Schema version for forward compatibility.
    pub version: u32,
    /// The manifest that was compiled.
    pub file: String,
    /// Whether compilation succeeded (no errors).
    pub success: bool,
    /// The compilation phase that produced these diagnostics.
    pub phase: String,
    pub diagnostics: Vec<JsonDiagnostic>,
    pub error_count: usize,
    pub warning_count: usize,
}

/// A single diagnostic in JSON form.
#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    /// "error", "warning", or "note".
    pub severity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short title registered for the code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Error category (e.g., "Construction").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<JsonLocation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JsonLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

/// Convert diagnostics to a structured JSON report.
pub fn to_json_report(diagnostics: &[Diagnostic], file: &str, phase: &str) -> DiagnosticReport {
    let registry = ErrorCodeRegistry::default();
    let mut error_count = 0;
    let mut warning_count = 0;

    let json_diags: Vec<JsonDiagnostic> = diagnostics
        .iter()
        .map(|d| {
            match d.severity {
                Severity::Error => error_count += 1,
                Severity::Warning => warning_count += 1,
                Severity::Note => {}
            }
            to_json_diagnostic(d, &registry)
        })
        .collect();

    DiagnosticReport {
        version: 1,
        file: file.to_string(),
        success: error_count == 0,
        phase: phase.to_string(),
        diagnostics: json_diags,
        error_count,
        warning_count,
    }
}

fn to_json_diagnostic(diag: &Diagnostic, registry: &ErrorCodeRegistry) -> JsonDiagnostic {
    let severity = match diag.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Note => "note",
    };

    let code = diag.code.as_ref().map(|c| c.0.clone());
    let info = code.as_ref().and_then(|c| registry.get(c));
    let title = info.map(|info| info.title.to_string());
    let category = info.map(|info| info.category.to_string());

    JsonDiagnostic {
        severity: severity.to_string(),
        code,
        title,
        category,
        message: diag.message.clone(),
        location: diag.location.as_ref().map(|l| JsonLocation {
            file: l.file.clone(),
            line: l.line,
        }),
        notes: diag.notes.clone(),
        help: diag.help.clone(),
    }
}

/// Serialize a diagnostic report to pretty JSON.
pub fn to_json_string(report: &DiagnosticReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stanza_ast::SourceLocation;

    #[test]
    fn report_counts_severities() {
        let diags = vec![
            Diagnostic::error("a").with_code("S0102"),
            Diagnostic::warning("b").with_code("S0200"),
            Diagnostic::note("c"),
        ];
        let report = to_json_report(&diags, "site.pp", "lower");

        assert!(!report.success);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.warning_count, 1);
        assert_eq!(report.diagnostics[0].category.as_deref(), Some("Construction"));
        assert_eq!(report.diagnostics[1].category.as_deref(), Some("Reference"));
        assert!(report.diagnostics[2].code.is_none());
        assert!(report.diagnostics[2].title.is_none());
    }

    #[test]
    fn json_shape() {
        let diags = vec![Diagnostic::error("could not create file[/a]: bad")
            .with_code("S0102")
            .at(&SourceLocation::new("site.pp", 3))];
        let report = to_json_report(&diags, "site.pp", "lower");
        let value: serde_json::Value = serde_json::from_str(&to_json_string(&report)).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["success"], false);
        assert_eq!(value["diagnostics"][0]["severity"], "error");
        assert_eq!(value["diagnostics"][0]["title"], "resource construction failed");
        assert_eq!(value["diagnostics"][0]["location"]["file"], "site.pp");
        assert_eq!(value["diagnostics"][0]["location"]["line"], 3);
        assert!(value["diagnostics"][0].get("notes").is_none());
    }

    #[test]
    fn empty_report_succeeds() {
        let report = to_json_report(&[], "site.pp", "lower");
        assert!(report.success);
        assert!(report.diagnostics.is_empty());
    }
}
