//! Statement parsing implementation
//!
//! This module drives the top-level program loop and parses the block
//! statements:
//!
//! - Conditionals: `if c : begin ... end`, any number of `elif` clauses, an
//!   optional `else`
//! - Loops: `loopc c : begin ... end`
//!
//! Block bodies hold assignments only.
//!
//! # Grammar
//!
//! ```text
//! program ::= (declaration | equation | if | loop)* EOF
//! if      ::= "if" conditions ":" "begin" equation* "end" elif* else?
//! elif    ::= "elif" conditions ":" "begin" equation* "end"
//! else    ::= "else" ":" "begin" equation* "end"
//! loop    ::= "loopc" conditions ":" "begin" equation* "end"
//! ```
//!
//! # Recovery
//!
//! Block parsers recover on their own and always return with the cursor
//! past their final `end` (or at end of input). A block that contained an
//! error is dropped as a whole. A block where none may stand (inside a
//! body, or an `elif`/`else` with no `if`) is reported once and skipped
//! through its `end`.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Failed, PResult, Parser};

impl Parser<'_> {
    /// Parse the entire program
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::new();

        while !self.is_at_end() {
            let start = self.current.span.start;

            if let Ok(statement) = self.parse_statement() {
                program.statements.push(statement);
            }

            // Every round must consume input
            if self.current.span.start == start && !self.is_at_end() {
                self.advance();
            }
        }

        program
    }

    /// Parse a top-level statement
    pub(crate) fn parse_statement(&mut self) -> PResult<Statement> {
        match self.current.kind {
            TokenKind::If => self.parse_if().map(Statement::If),
            TokenKind::Loopc => self.parse_loop().map(Statement::Loop),
            // A block with no `if` in front of it
            TokenKind::Elif | TokenKind::Else | TokenKind::Begin => {
                let failed = self.error_expected("a statement");
                self.skip_block_chain();
                Err(failed)
            }
            _ => self.parse_simple_statement().map_err(|failed| {
                self.recover_statement();
                failed
            }),
        }
    }

    fn parse_simple_statement(&mut self) -> PResult<Statement> {
        match self.current.kind {
            TokenKind::Int => self.parse_declaration().map(Statement::Declaration),
            TokenKind::Ident => self.parse_equation().map(Statement::Equation),
            _ => Err(self.error_expected("a statement")),
        }
    }

    /// Parse if statement with its `elif` and `else` clauses
    pub(crate) fn parse_if(&mut self) -> PResult<If> {
        let location = self.advance().location;
        let mut failed = false;

        let head = self.parse_block("'if' block", location, Self::parse_block_condition);

        let mut elifs = Vec::new();
        while self.check(TokenKind::Elif) {
            let location = self.advance().location;
            match self.parse_block("'elif' block", location, Self::parse_block_condition) {
                Ok((conditions, body)) => elifs.push(Elif {
                    conditions,
                    body,
                    location,
                }),
                Err(Failed) => failed = true,
            }
        }

        let else_branch = if self.check(TokenKind::Else) {
            let location = self.advance().location;
            match self.parse_block("'else' block", location, Self::parse_block_open) {
                Ok(((), body)) => Some(Else { body, location }),
                Err(Failed) => {
                    failed = true;
                    None
                }
            }
        } else {
            None
        };

        match head {
            Ok((conditions, body)) if !failed => Ok(If {
                conditions,
                body,
                elifs,
                else_branch,
                location,
            }),
            _ => Err(Failed),
        }
    }

    /// Parse loop statement
    pub(crate) fn parse_loop(&mut self) -> PResult<Loop> {
        let location = self.advance().location;
        let (conditions, body) =
            self.parse_block("'loopc' block", location, Self::parse_block_condition)?;
        Ok(Loop {
            conditions,
            body,
            location,
        })
    }

    /// Parse a block header with `header`, then the body up to `end`.
    ///
    /// A header error skips to the block's `end`; body errors are recovered
    /// statement by statement. Either way the block is reported as failed.
    fn parse_block<H>(
        &mut self,
        name: &'static str,
        location: SourceLocation,
        header: fn(&mut Self) -> PResult<H>,
    ) -> PResult<(H, Vec<Equation>)> {
        self.enclosed(name, location, |p| {
            let head = match header(p) {
                Ok(head) => head,
                Err(failed) => {
                    p.recover_block();
                    return Err(failed);
                }
            };
            let body = p.parse_block_body()?;
            Ok((head, body))
        })
    }

    /// `conditions ":" "begin"`
    fn parse_block_condition(&mut self) -> PResult<Conditions> {
        let conditions = self.parse_conditions()?;
        self.parse_block_open()?;
        Ok(conditions)
    }

    /// `":" "begin"`
    fn parse_block_open(&mut self) -> PResult<()> {
        self.expect_token(TokenKind::Colon, "':'")?;
        self.expect_token(TokenKind::Begin, "'begin'")?;
        Ok(())
    }

    /// Skip a block that cannot be parsed here, together with any `elif`
    /// and `else` clauses chained to it.
    fn skip_block_chain(&mut self) {
        self.recover_block();
        while self.check(TokenKind::Elif) || self.check(TokenKind::Else) {
            self.recover_block();
        }
    }

    /// Parse assignments up to and including `end`
    fn parse_block_body(&mut self) -> PResult<Vec<Equation>> {
        let mut body = Vec::new();
        let mut failed = false;

        while !self.check(TokenKind::End) && !self.is_at_end() {
            match self.current.kind {
                TokenKind::Ident => match self.parse_equation() {
                    Ok(equation) => body.push(equation),
                    Err(Failed) => {
                        failed = true;
                        self.recover_in_block();
                    }
                },
                // Blocks do not nest; skip the inner one whole
                TokenKind::If
                | TokenKind::Loopc
                | TokenKind::Elif
                | TokenKind::Else
                | TokenKind::Begin => {
                    self.error_expected("an assignment or 'end'");
                    failed = true;
                    self.skip_block_chain();
                }
                _ => {
                    self.error_expected("an assignment or 'end'");
                    failed = true;
                    self.recover_in_block();
                }
            }
        }

        self.expect_token(TokenKind::End, "'end'")?;

        if failed {
            Err(Failed)
        } else {
            Ok(body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::diagnostics::DiagnosticKind;
    use crate::parser::printer::to_sexpr;

    fn parse_clean(source: &str) -> Program {
        let mut parser = Parser::new(source);
        let program = parser.parse_program();
        assert!(parser.diagnostics().is_empty(), "{:?}", parser.diagnostics());
        program
    }

    fn diagnostic_kinds(source: &str) -> Vec<DiagnosticKind> {
        let mut parser = Parser::new(source);
        parser.parse_program();
        parser.diagnostics().iter().map(|d| d.kind()).collect()
    }

    #[test]
    fn test_parse_if_chain() {
        let program = parse_clean(
            "if x > 1 : begin y = 1; end \
             elif x > 0 : begin y = 2; z = 3; end \
             elif x == 0 : begin end \
             else : begin y = 0; end",
        );
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            Statement::If(node) => {
                assert_eq!(node.body.len(), 1);
                assert_eq!(node.elifs.len(), 2);
                assert_eq!(node.elifs[0].body.len(), 2);
                assert!(node.elifs[1].body.is_empty());
                assert_eq!(node.else_branch.as_ref().map(|e| e.body.len()), Some(1));
            }
            other => panic!("Expected if statement, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_loop() {
        let program = parse_clean("loopc i < 10 : begin i += 1; s = s + i; end");
        assert_eq!(
            to_sexpr(&program),
            "(program (loopc (< i 10) (+= i 1) (= s (+ s i))))"
        );
    }

    #[test]
    fn test_mixed_top_level() {
        let program = parse_clean("int i = 0; loopc i < 3 : begin i += 1; end if i == 3 : begin i = 0; end i = 5;");
        assert_eq!(program.statements.len(), 4);
    }

    #[test]
    fn test_nested_block_is_rejected() {
        let kinds = diagnostic_kinds("if a > 1 : begin if b > 1 : begin c = 1; end end");
        assert_eq!(kinds, vec![DiagnosticKind::UnexpectedToken]);
    }

    #[test]
    fn test_nested_block_is_skipped_whole() {
        let mut parser =
            Parser::new("if a > 1 : begin if b > 1 : begin c = 1; d = 2; end e = 3; end f = 4;");
        let program = parser.parse_program();
        assert_eq!(parser.diagnostics().len(), 1);
        assert_eq!(
            parser.diagnostics()[0].to_string(),
            "1:18: expected an assignment or 'end', found 'if'"
        );
        // The outer block keeps its own 'end'; nothing leaks to the top level
        assert_eq!(to_sexpr(&program), "(program (= f 4))");
    }

    #[test]
    fn test_nested_chain_is_skipped_whole() {
        let mut parser = Parser::new(
            "loopc i < 3 : begin \
             if i > 1 : begin a = 1; end elif i > 0 : begin a = 2; end else : begin a = 3; end \
             i += 1; end x = 1;",
        );
        let program = parser.parse_program();
        assert_eq!(parser.diagnostics().len(), 1);
        assert_eq!(to_sexpr(&program), "(program (= x 1))");
    }

    #[test]
    fn test_block_without_if_is_skipped_whole() {
        for source in [
            "else : begin b = 3; c = 4; end",
            "elif x > 1 : begin b = 3; c = 4; end",
            "elif x > 1 : begin b = 3; end else : begin c = 4; end",
            "begin b = 3; c = 4; end",
        ] {
            let mut parser = Parser::new(source);
            let program = parser.parse_program();
            assert_eq!(parser.diagnostics().len(), 1, "{source}");
            assert_eq!(parser.diagnostics()[0].kind(), DiagnosticKind::UnexpectedToken);
            assert_eq!(to_sexpr(&program), "(program)", "{source}");
        }

        let mut parser = Parser::new("else : begin b = 3; end x = 1;");
        let program = parser.parse_program();
        assert_eq!(
            parser.diagnostics()[0].to_string(),
            "1:1: expected a statement, found 'else'"
        );
        assert_eq!(to_sexpr(&program), "(program (= x 1))");
    }

    #[test]
    fn test_body_error_recovers_inside_block() {
        let mut parser = Parser::new("if a > 1 : begin b = ; c = 2; end d = 1;");
        let program = parser.parse_program();
        assert_eq!(parser.diagnostics().len(), 1);
        // The broken if is dropped, the following statement survives
        assert_eq!(to_sexpr(&program), "(program (= d 1))");
    }

    #[test]
    fn test_header_error_skips_block() {
        let mut parser = Parser::new("loopc i 3 : begin i = 1; end x = 1;");
        let program = parser.parse_program();
        assert_eq!(parser.diagnostics().len(), 1);
        assert_eq!(to_sexpr(&program), "(program (= x 1))");
    }

    #[test]
    fn test_broken_elif_keeps_chain_together() {
        let mut parser = Parser::new(
            "if a > 1 : begin b = 1; end elif : begin b = 2; end else : begin b = 3; end x = 1;",
        );
        let program = parser.parse_program();
        assert_eq!(parser.diagnostics().len(), 1);
        assert_eq!(to_sexpr(&program), "(program (= x 1))");
    }

    #[test]
    fn test_unterminated_block() {
        let kinds = diagnostic_kinds("if x > 1 : begin x = 1 ;");
        assert_eq!(kinds, vec![DiagnosticKind::UnterminatedBlock]);
    }

    #[test]
    fn test_stray_tokens_at_top_level() {
        // 'end' is a resynchronization point on its own, ')' skips to ';'
        let mut parser = Parser::new("end ) ; x = 1;");
        let program = parser.parse_program();
        assert_eq!(parser.diagnostics().len(), 2);
        assert_eq!(to_sexpr(&program), "(program (= x 1))");
    }
}
