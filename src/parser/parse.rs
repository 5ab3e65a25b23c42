//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure:
//! token helpers, diagnostic reporting, panic-mode recovery and the
//! [`parse`] entry points.
//!
//! # Parser Architecture
//!
//! The Parser is a recursive descent parser with one token of lookahead,
//! pulling tokens from the [`Lexer`] on demand:
//! - This module: Parser struct, helper methods, recovery and coordination
//! - `declarations`: `int` declarations and assignments
//! - `statements`: the program loop, `if`/`elif`/`else` and `loopc` blocks
//! - `expressions`: arithmetic expressions and conditions
//!
//! # Error handling
//!
//! Grammar functions return [`PResult`]. A diagnostic is recorded on the
//! parser at the point of detection and the failure then propagates with `?`
//! up to the nearest recovery point, which skips tokens up to a
//! resynchronization token (see [`constants`](super::constants)).

use crate::parser::ast::{Program, SourceLocation};
use crate::parser::constants::{BLOCK_TERMINATOR, DEFAULT_MAX_NESTING_DEPTH, STATEMENT_TERMINATOR};
use crate::parser::diagnostics::{Diagnostic, ParseErrors};
use crate::parser::lexer::{Lexer, Token, TokenKind};
use tracing::{debug, debug_span, trace};

/// Marker for a grammar rule that failed. The diagnostic explaining the
/// failure has already been recorded on the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Failed;

pub(crate) type PResult<T> = Result<T, Failed>;

/// Parser configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest allowed nesting of parenthesized expressions
    pub max_nesting_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}

/// Result of a parse: the (possibly partial) program and every diagnostic
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutput {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// The program if parsing was clean, otherwise every diagnostic bundled
    /// with `source` for rendering.
    pub fn into_result(self, source: &str) -> Result<Program, ParseErrors> {
        if self.diagnostics.is_empty() {
            Ok(self.program)
        } else {
            Err(ParseErrors {
                source_code: source.to_string(),
                diagnostics: self.diagnostics,
            })
        }
    }
}

/// Parse `source` with default options.
pub fn parse(source: &str) -> ParseOutput {
    parse_with_options(source, ParseOptions::default())
}

pub fn parse_with_options(source: &str, options: ParseOptions) -> ParseOutput {
    let _span = debug_span!("parse", bytes = source.len()).entered();
    let mut parser = Parser::with_options(source, options);
    let program = parser.parse_program();
    debug!(
        statements = program.statements.len(),
        diagnostics = parser.diagnostics.len(),
        "parse finished"
    );
    ParseOutput {
        program,
        diagnostics: parser.into_diagnostics(),
    }
}

/// A construct that has been opened but not yet closed. Errors found at end
/// of input are attributed to the innermost one.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OpenConstruct {
    pub(crate) name: &'static str,
    pub(crate) location: SourceLocation,
}

/// Recursive descent parser for loopc
pub struct Parser<'a> {
    pub(crate) source: &'a str,
    pub(crate) lexer: Lexer<'a>,
    pub(crate) current: Token,
    /// Whether a diagnostic already points at `current`
    pub(crate) current_reported: bool,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) open: Vec<OpenConstruct>,
    pub(crate) depth: usize,
    pub(crate) options: ParseOptions,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_options(source, ParseOptions::default())
    }

    pub fn with_options(source: &'a str, options: ParseOptions) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            source,
            lexer,
            current,
            current_reported: false,
            diagnostics: Vec::new(),
            open: Vec::new(),
            depth: 0,
            options,
        }
    }

    /// Diagnostics recorded so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    // ===== Helper methods =====

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    pub(crate) fn text(&self, token: &Token) -> &'a str {
        token.text(self.source)
    }

    /// Consume the current token and return it. `Eof` is never consumed.
    ///
    /// An unrecognized character that nothing has reported yet is reported
    /// here, so recovery can never skip one silently.
    pub(crate) fn advance(&mut self) -> Token {
        let consumed = self.current;
        if consumed.kind == TokenKind::Unknown && !self.current_reported {
            let diagnostic = self.lex_error(&consumed);
            self.report(diagnostic);
        }
        if consumed.kind != TokenKind::Eof {
            self.current = self.lexer.next_token();
            self.current_reported = false;
            trace!(kind = ?self.current.kind, offset = self.current.span.start, "token");
        }
        consumed
    }

    pub(crate) fn expect_token(&mut self, kind: TokenKind, expected: &str) -> PResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_expected(expected))
        }
    }

    pub(crate) fn expect_identifier(&mut self, expected: &str) -> PResult<(String, Token)> {
        let token = self.expect_token(TokenKind::Ident, expected)?;
        Ok((self.text(&token).to_string(), token))
    }

    /// Run `parse` with `name` registered as an open construct.
    pub(crate) fn enclosed<T>(
        &mut self,
        name: &'static str,
        location: SourceLocation,
        parse: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        self.open.push(OpenConstruct { name, location });
        let result = parse(self);
        self.open.pop();
        result
    }

    // ===== Diagnostics =====

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        debug!(kind = ?diagnostic.kind(), %diagnostic, "diagnostic");
        self.diagnostics.push(diagnostic);
    }

    /// Record that `expected` was wanted at the current token. At most one
    /// diagnostic is recorded per token.
    pub(crate) fn error_expected(&mut self, expected: &str) -> Failed {
        if self.current_reported {
            return Failed;
        }
        let token = self.current;
        let diagnostic = match (token.kind, self.open.last()) {
            (TokenKind::Unknown, _) => self.lex_error(&token),
            (TokenKind::Eof, Some(open)) => Diagnostic::UnterminatedBlock {
                construct: open.name,
                opened_at: open.location,
                expected: expected.to_string(),
                location: token.location,
                span: token.span,
            },
            _ => Diagnostic::UnexpectedToken {
                expected: expected.to_string(),
                found: token.describe(self.source),
                location: token.location,
                span: token.span,
            },
        };
        self.report(diagnostic);
        self.current_reported = true;
        Failed
    }

    fn lex_error(&self, token: &Token) -> Diagnostic {
        Diagnostic::LexError {
            found: self.text(token).chars().next().unwrap_or_default(),
            location: token.location,
            span: token.span,
        }
    }

    // ===== Panic-mode recovery =====

    /// Top-level recovery: skip past the next `;` or `end`, or stop in front
    /// of a token that starts a new statement.
    pub(crate) fn recover_statement(&mut self) {
        let mut skipped = 0usize;
        loop {
            let kind = self.current.kind;
            if kind == TokenKind::Eof || kind.starts_statement() {
                break;
            }
            self.advance();
            skipped += 1;
            if kind == STATEMENT_TERMINATOR || kind == BLOCK_TERMINATOR {
                break;
            }
        }
        debug!(skipped, "recovered at statement boundary");
    }

    /// Recovery inside a block body: skip past the next `;`, stopping in
    /// front of `end` so the block can still close.
    pub(crate) fn recover_in_block(&mut self) {
        let mut skipped = 0usize;
        loop {
            let kind = self.current.kind;
            if kind == TokenKind::Eof || kind == BLOCK_TERMINATOR {
                break;
            }
            self.advance();
            skipped += 1;
            if kind == STATEMENT_TERMINATOR {
                break;
            }
        }
        debug!(skipped, "recovered inside block");
    }

    /// Block-level recovery: skip past the `end` that closes the current
    /// block. `begin`/`end` pairs met on the way are skipped whole.
    pub(crate) fn recover_block(&mut self) {
        let mut skipped = 0usize;
        let mut open_begins = 0usize;
        loop {
            let kind = self.current.kind;
            if kind == TokenKind::Eof {
                break;
            }
            self.advance();
            skipped += 1;
            if kind == TokenKind::Begin {
                open_begins += 1;
            } else if kind == BLOCK_TERMINATOR {
                if open_begins <= 1 {
                    break;
                }
                open_begins -= 1;
            }
        }
        debug!(skipped, "recovered at block boundary");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::diagnostics::DiagnosticKind;

    #[test]
    fn test_advance_never_passes_eof() {
        let mut parser = Parser::new("x");
        assert_eq!(parser.advance().kind, TokenKind::Ident);
        assert_eq!(parser.advance().kind, TokenKind::Eof);
        assert!(parser.is_at_end());
    }

    #[test]
    fn test_one_diagnostic_per_token() {
        let mut parser = Parser::new("3");
        parser.error_expected("';'");
        parser.error_expected("an identifier");
        assert_eq!(parser.diagnostics().len(), 1);
        assert_eq!(parser.diagnostics()[0].kind(), DiagnosticKind::UnexpectedToken);
    }

    #[test]
    fn test_skipping_unknown_reports_it() {
        let mut parser = Parser::new("a # b ;");
        parser.advance();
        parser.recover_statement();
        assert!(parser.is_at_end());
        assert_eq!(parser.diagnostics().len(), 1);
        assert_eq!(parser.diagnostics()[0].kind(), DiagnosticKind::LexError);
    }

    #[test]
    fn test_error_at_eof_inside_open_construct() {
        let mut parser = Parser::new("");
        let result: PResult<()> =
            parser.enclosed("'if' block", SourceLocation::new(1, 1), |p| {
                Err(p.error_expected("'end'"))
            });
        assert!(result.is_err());
        assert!(parser.open.is_empty());
        assert!(matches!(
            parser.diagnostics()[0],
            Diagnostic::UnterminatedBlock { construct: "'if' block", .. }
        ));
    }

    #[test]
    fn test_statement_recovery_stops_before_statement_start() {
        let mut parser = Parser::new("1 2 int x;");
        parser.recover_statement();
        assert!(parser.check(TokenKind::Int));
    }

    #[test]
    fn test_block_recovery_consumes_end() {
        let mut parser = Parser::new("a ; b end c");
        parser.recover_block();
        let current = parser.current;
        assert_eq!(parser.text(&current), "c");
    }

    #[test]
    fn test_block_recovery_skips_inner_blocks() {
        let mut parser = Parser::new("x : begin a = 1; begin b = 2; end c = 3; end d");
        parser.recover_block();
        let current = parser.current;
        assert_eq!(parser.text(&current), "d");
    }

    #[test]
    fn test_into_result() {
        let output = parse("int x;");
        assert!(output.clone().into_result("int x;").is_ok());

        let output = parse("int ;");
        let errors = output.into_result("int ;").unwrap_err();
        assert_eq!(errors.diagnostics.len(), 1);
        assert_eq!(errors.source_code, "int ;");
    }
}
