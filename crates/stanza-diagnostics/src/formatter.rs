// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Terminal formatter for diagnostics.
//!
//! ```text
//! error[S0102]: could not create file[/etc/motd]: mode must be octal
//!   --> motd.pp:7
//!    |
//!  7 |     mode => 'rw-r--r--',
//!    |
//!    = note: the partially built resource was destroyed
//! ```

use colored::Colorize;

use crate::{Diagnostic, Severity};

const GUTTER_WIDTH: usize = 2;

/// Formats diagnostics for terminal output.
#[derive(Default)]
pub struct DiagnosticFormatter<'a> {
    /// Source text of the file diagnostics point into, for the context line.
    source: Option<&'a str>,
}

impl<'a> DiagnosticFormatter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: &'a str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();
        self.format_header(&mut out, diagnostic);

        if let Some(ref location) = diagnostic.location {
            out.push_str(&format!("  {} {}\n", "-->".blue(), location));

            if let Some(line_num) = location.line {
                if let Some(text) = self.get_line(line_num as usize) {
                    let gutter = line_num.to_string().len().max(GUTTER_WIDTH);
                    out.push_str(&format!("{} {}\n", " ".repeat(gutter + 1), "|".blue()));
                    out.push_str(&format!(
                        "{:>width$} {} {}\n",
                        line_num.to_string().blue().bold(),
                        "|".blue(),
                        text,
                        width = gutter + 1,
                    ));
                    out.push_str(&format!("{} {}\n", " ".repeat(gutter + 1), "|".blue()));
                }
            }
        }

        self.format_footer(&mut out, diagnostic);
        out
    }

    /// Format several diagnostics, separated by blank lines.
    pub fn format_all(&self, diagnostics: &[Diagnostic]) -> String {
        diagnostics
            .iter()
            .map(|d| self.format(d))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_header(&self, out: &mut String, diagnostic: &Diagnostic) {
        let severity_str = match diagnostic.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Note => "note".blue().bold(),
        };

        if let Some(ref code) = diagnostic.code {
            out.push_str(&format!(
                "{}[{}]: {}\n",
                severity_str,
                code.0.clone().red().bold(),
                diagnostic.message.bold()
            ));
        } else {
            out.push_str(&format!("{}: {}\n", severity_str, diagnostic.message.bold()));
        }
    }

    fn format_footer(&self, out: &mut String, diagnostic: &Diagnostic) {
        for note in &diagnostic.notes {
            out.push_str(&format!(
                "{} {} {}: {}\n",
                " ".repeat(GUTTER_WIDTH + 1),
                "=".cyan(),
                "note".cyan().bold(),
                note
            ));
        }

        if let Some(ref help) = diagnostic.help {
            out.push_str(&format!(
                "{} {} {}: {}\n",
                " ".repeat(GUTTER_WIDTH + 1),
                "=".cyan(),
                "help".cyan().bold(),
                help
            ));
        }
    }

    /// Get source line text by 1-based line number.
    fn get_line(&self, line_num: usize) -> Option<&'a str> {
        let idx = line_num.checked_sub(1)?;
        self.source?.lines().nth(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stanza_ast::SourceLocation;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn header_and_location() {
        plain();
        let diag = Diagnostic::error("could not create file[/a]: bad mode")
            .with_code("S0102")
            .at(&SourceLocation::new("site.pp", 2));

        let out = DiagnosticFormatter::new().format(&diag);
        assert_eq!(out, "error[S0102]: could not create file[/a]: bad mode\n  --> site.pp:2\n");
    }

    #[test]
    fn source_line_is_shown() {
        plain();
        let source = "file { '/a':\n  mode => 'bogus',\n}\n";
        let diag = Diagnostic::error("bad mode").at(&SourceLocation::new("site.pp", 2));

        let out = DiagnosticFormatter::new().with_source(source).format(&diag);
        assert!(out.contains(" 2 |   mode => 'bogus',"));
    }

    #[test]
    fn notes_and_help() {
        plain();
        let diag = Diagnostic::warning("dangling")
            .with_note("first note")
            .with_help("declare it");

        let out = DiagnosticFormatter::new().format(&diag);
        assert_eq!(
            out,
            "warning: dangling\n    = note: first note\n    = help: declare it\n"
        );
    }

    #[test]
    fn line_out_of_range_is_skipped() {
        plain();
        let diag = Diagnostic::error("x").at(&SourceLocation::new("a.pp", 40));
        let out = DiagnosticFormatter::new().with_source("one line").format(&diag);
        assert!(!out.contains('|'));
    }
}
