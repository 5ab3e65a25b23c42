//! Parse diagnostics
//!
//! Every problem the parser detects becomes a [`Diagnostic`]; parsing never
//! stops on the first one. Diagnostics carry a line/column location for plain
//! text output and a byte [`Span`] for [`miette`] reports.

use crate::parser::ast::{SourceLocation, Span};
use thiserror::Error;

/// The category of a [`Diagnostic`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    LexError,
    UnexpectedToken,
    UnterminatedBlock,
    DuplicateVariable,
    NestingTooDeep,
}

/// A single problem found while parsing
#[derive(Debug, Clone, PartialEq, Eq, Error, miette::Diagnostic)]
pub enum Diagnostic {
    /// A character outside the language
    #[error("{location}: unrecognized character '{found}'")]
    #[diagnostic(code(loopc::lex_error))]
    LexError {
        found: char,
        location: SourceLocation,
        #[label("not part of the language")]
        span: Span,
    },

    #[error("{location}: expected {expected}, found {found}")]
    #[diagnostic(code(loopc::unexpected_token))]
    UnexpectedToken {
        expected: String,
        found: String,
        location: SourceLocation,
        #[label("expected {expected}")]
        span: Span,
    },

    /// Input ended inside a construct that was still open
    #[error(
        "{location}: unterminated {construct} opened at {opened_at}: expected {expected} before end of input"
    )]
    #[diagnostic(
        code(loopc::unterminated_block),
        help("blocks close with 'end' and statements with ';'")
    )]
    UnterminatedBlock {
        construct: &'static str,
        opened_at: SourceLocation,
        expected: String,
        location: SourceLocation,
        #[label("input ends here")]
        span: Span,
    },

    #[error("{location}: variable '{name}' appears twice in one declaration")]
    #[diagnostic(code(loopc::duplicate_variable))]
    DuplicateVariable {
        name: String,
        location: SourceLocation,
        #[label("already declared here")]
        span: Span,
    },

    #[error("{location}: parentheses nested deeper than {limit} levels")]
    #[diagnostic(code(loopc::nesting_too_deep))]
    NestingTooDeep {
        limit: usize,
        location: SourceLocation,
        #[label("nesting limit exceeded")]
        span: Span,
    },
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Diagnostic::LexError { .. } => DiagnosticKind::LexError,
            Diagnostic::UnexpectedToken { .. } => DiagnosticKind::UnexpectedToken,
            Diagnostic::UnterminatedBlock { .. } => DiagnosticKind::UnterminatedBlock,
            Diagnostic::DuplicateVariable { .. } => DiagnosticKind::DuplicateVariable,
            Diagnostic::NestingTooDeep { .. } => DiagnosticKind::NestingTooDeep,
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            Diagnostic::LexError { location, .. }
            | Diagnostic::UnexpectedToken { location, .. }
            | Diagnostic::UnterminatedBlock { location, .. }
            | Diagnostic::DuplicateVariable { location, .. }
            | Diagnostic::NestingTooDeep { location, .. } => *location,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Diagnostic::LexError { span, .. }
            | Diagnostic::UnexpectedToken { span, .. }
            | Diagnostic::UnterminatedBlock { span, .. }
            | Diagnostic::DuplicateVariable { span, .. }
            | Diagnostic::NestingTooDeep { span, .. } => *span,
        }
    }
}

/// All diagnostics of a failed parse, bundled with the source text so a
/// [`miette::Report`] can render every one of them with context.
#[derive(Debug, Error, miette::Diagnostic)]
#[error("parsing failed with {} error(s)", .diagnostics.len())]
#[diagnostic(code(loopc::parse_failed))]
pub struct ParseErrors {
    #[source_code]
    pub source_code: String,
    #[related]
    pub diagnostics: Vec<Diagnostic>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Diagnostic as _;

    fn unexpected() -> Diagnostic {
        Diagnostic::UnexpectedToken {
            expected: "';'".to_string(),
            found: "number 3".to_string(),
            location: SourceLocation::new(2, 7),
            span: Span::new(12, 13),
        }
    }

    #[test]
    fn test_display_includes_location_and_both_tokens() {
        assert_eq!(unexpected().to_string(), "2:7: expected ';', found number 3");
    }

    #[test]
    fn test_accessors() {
        let diagnostic = unexpected();
        assert_eq!(diagnostic.kind(), DiagnosticKind::UnexpectedToken);
        assert_eq!(diagnostic.location(), SourceLocation::new(2, 7));
        assert_eq!(diagnostic.span(), Span::new(12, 13));
    }

    #[test]
    fn test_miette_code_and_label() {
        let diagnostic = unexpected();
        let code = diagnostic.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("loopc::unexpected_token"));

        let labels: Vec<_> = diagnostic.labels().into_iter().flatten().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 12);
        assert_eq!(labels[0].len(), 1);
        assert_eq!(labels[0].label(), Some("expected ';'"));
    }

    #[test]
    fn test_parse_errors_relates_every_diagnostic() {
        let errors = ParseErrors {
            source_code: "x = 1 3;".to_string(),
            diagnostics: vec![unexpected(), unexpected()],
        };
        assert_eq!(errors.to_string(), "parsing failed with 2 error(s)");
        assert_eq!(errors.related().map(|r| r.count()), Some(2));
        assert!(errors.source_code().is_some());
    }
}
