//! Diagnostics and error reporting for konst
//!
//! Every user-facing problem the engine finds is a [`CompileError`] attached to the tree node it concerns. The trace
//! collects them; a driver renders them as plain text with [`render_error`] or as a miette graphical report with
//! [`render_report`] (every error implements [`miette::Diagnostic`] with a stable code).

use std::fmt;

use thiserror::Error;

use crate::frontend::ast::{NodeId, Span};

/// Stable identity of each diagnostic the engine can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    IntegerOverflow,
    DivisionByZero,
    WrongAnnotationTarget,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::IntegerOverflow => "konst::integer_overflow",
            DiagnosticCode::DivisionByZero => "konst::division_by_zero",
            DiagnosticCode::WrongAnnotationTarget => "konst::wrong_annotation_target",
        }
    }

    /// Severity the diagnostic is always reported with.
    pub fn kind(self) -> ErrorKind {
        match self {
            DiagnosticCode::IntegerOverflow | DiagnosticCode::DivisionByZero => ErrorKind::Warning,
            DiagnosticCode::WrongAnnotationTarget => ErrorKind::Error,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compile-time diagnostic with location information
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct CompileError {
    pub message: String,
    pub span: Span,
    /// Node the diagnostic is reported on.
    pub node: NodeId,
    pub code: DiagnosticCode,
    pub kind: ErrorKind,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl CompileError {
    pub fn new(code: DiagnosticCode, message: String, node: NodeId, span: Span) -> Self {
        Self {
            message,
            span,
            node,
            code,
            kind: code.kind(),
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Error,
    Warning,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Error => write!(f, "error"),
            ErrorKind::Warning => write!(f, "warning"),
        }
    }
}

impl miette::Diagnostic for CompileError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.kind {
            ErrorKind::Error => miette::Severity::Error,
            ErrorKind::Warning => miette::Severity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.hints.is_empty() && self.notes.is_empty() {
            return None;
        }
        let text = self.notes.iter().chain(self.hints.iter()).cloned().collect::<Vec<_>>().join("\n");
        Some(Box::new(text))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        let label = miette::LabeledSpan::new(Some(self.message.clone()), self.span.start, self.span.len());
        Some(Box::new(std::iter::once(label)))
    }
}

/// Render an error with source context as plain text.
pub fn render_error(file_name: &str, source: &str, error: &CompileError) -> String {
    let (line_num, col_num, line_text) = get_line_info(source, error.span.start);
    let width = line_num.to_string().len();

    let mut out = String::new();
    out.push_str(&format!("{}[{}]: {}\n", error.kind, error.code, error.message));
    out.push_str(&format!("  --> {file_name}:{line_num}:{col_num}\n"));
    out.push_str(&format!("  {:>width$} |\n", ""));
    out.push_str(&format!("  {line_num:>width$} | {line_text}\n"));

    // Underline up to the end of the first line of the span.
    let line_end = error.span.start.min(source.len()) - (col_num - 1) + line_text.len();
    let underline_len = error.span.end.min(line_end).saturating_sub(error.span.start).max(1);
    out.push_str(&format!(
        "  {:>width$} | {}{}",
        "",
        " ".repeat(col_num - 1),
        "^".repeat(underline_len)
    ));

    for note in &error.notes {
        out.push_str(&format!("\n  = note: {note}"));
    }
    for hint in &error.hints {
        out.push_str(&format!("\n  = hint: {hint}"));
    }
    out
}

/// Render an error through miette's graphical report handler (unicode, no colour).
pub fn render_report(file_name: &str, source: &str, error: &CompileError) -> String {
    let report =
        miette::Report::new(error.clone()).with_source_code(miette::NamedSource::new(file_name, source.to_string()));
    let handler = miette::GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor());
    let mut out = String::new();
    if handler.render_report(&mut out, &*report).is_err() {
        return render_error(file_name, source, error);
    }
    out
}

/// Get line number, column number, and line text for a byte offset
fn get_line_info(source: &str, offset: usize) -> (usize, usize, &str) {
    let offset = offset.min(source.len());
    let mut line_num = 1;
    let mut line_start = 0;

    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line_num += 1;
            line_start = i + 1;
        }
    }

    let line_end = source[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(source.len());

    let line_text = &source[line_start..line_end];
    let col_num = offset - line_start + 1;

    (line_num, col_num, line_text)
}

// ============================================================================
// Error catalog
// ============================================================================

/// Constructors for every diagnostic the engine reports.
pub mod errors {
    use super::*;

    pub fn integer_overflow(node: NodeId, span: Span) -> CompileError {
        CompileError::new(
            DiagnosticCode::IntegerOverflow,
            "This operation has led to an overflow".to_string(),
            node,
            span,
        )
        .with_note("The folded value wraps around to the machine-width result")
    }

    pub fn division_by_zero(node: NodeId, span: Span) -> CompileError {
        CompileError::new(DiagnosticCode::DivisionByZero, "Division by zero".to_string(), node, span)
    }

    pub fn wrong_annotation_target(actual_target: &str, node: NodeId, span: Span) -> CompileError {
        CompileError::new(
            DiagnosticCode::WrongAnnotationTarget,
            format!("This annotation is not applicable to target '{actual_target}'"),
            node,
            span,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_line_info() {
        let source = "line 1\nline 2\nline 3";

        let (line, col, text) = get_line_info(source, 0);
        assert_eq!(line, 1);
        assert_eq!(col, 1);
        assert_eq!(text, "line 1");

        let (line, col, text) = get_line_info(source, 10);
        assert_eq!(line, 2);
        assert_eq!(col, 4);
        assert_eq!(text, "line 2");
    }

    #[test]
    fn render_points_at_the_span() {
        let source = "val x = 10 / 0";
        let error = errors::division_by_zero(NodeId(3), Span::new(8, 14));
        insta::assert_snapshot!(render_error("Main.kt", source, &error), @r"
        warning[konst::division_by_zero]: Division by zero
          --> Main.kt:1:9
            |
          1 | val x = 10 / 0
            |         ^^^^^^
        ");
    }

    #[test]
    fn graphical_report_carries_code_source_and_label() {
        let source = "val x = 10 / 0";
        let error = errors::division_by_zero(NodeId(3), Span::new(8, 14));
        let report = render_report("Main.kt", source, &error);
        assert!(report.contains("konst::division_by_zero"), "{report}");
        assert!(report.contains("Main.kt:1:9"), "{report}");
        assert!(report.contains(source), "{report}");
        assert!(report.contains("Division by zero"), "{report}");
    }

    #[test]
    fn severity_follows_the_code() {
        let overflow = errors::integer_overflow(NodeId(0), Span::default());
        let target = errors::wrong_annotation_target("function", NodeId(1), Span::default());
        assert_eq!(overflow.kind, ErrorKind::Warning);
        assert_eq!(target.kind, ErrorKind::Error);
        assert_eq!(target.message, "This annotation is not applicable to target 'function'");
    }

    #[test]
    fn miette_code_is_stable() {
        use miette::Diagnostic;

        let error = errors::integer_overflow(NodeId(0), Span::new(2, 5));
        assert_eq!(error.code().map(|c| c.to_string()).as_deref(), Some("konst::integer_overflow"));
        let labels: Vec<_> = error.labels().into_iter().flatten().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 2);
        assert_eq!(labels[0].len(), 3);
    }
}
