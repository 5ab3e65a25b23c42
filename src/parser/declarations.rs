//! Declaration and assignment parsing
//!
//! - Declarations: `int a, b = expr;`
//! - Assignments: `x = expr;` and the compound forms `+= -= *= /= %= ^=`
//!
//! # Grammar
//!
//! ```text
//! declaration ::= "int" identifier ("," identifier)* ("=" expr)? ";"
//! equation    ::= identifier assign_op expr ";"
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::diagnostics::Diagnostic;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Failed, PResult, Parser};
use rustc_hash::FxHashSet;

impl Parser<'_> {
    /// Parse declaration; the current token is `int`
    pub(crate) fn parse_declaration(&mut self) -> PResult<Declaration> {
        let location = self.advance().location;

        self.enclosed("declaration", location, |p| {
            let mut names = Vec::new();
            let mut seen = FxHashSet::default();

            loop {
                if p.check(TokenKind::Ident) {
                    let token = p.current;
                    let name = p.text(&token);
                    if !seen.insert(name) {
                        p.report(Diagnostic::DuplicateVariable {
                            name: name.to_string(),
                            location: token.location,
                            span: token.span,
                        });
                        p.current_reported = true;
                        return Err(Failed);
                    }
                }

                let (name, _) = p.expect_identifier("a variable name")?;
                names.push(name);

                if !p.match_token(TokenKind::Comma) {
                    break;
                }
            }

            let init = if p.match_token(TokenKind::Eq) {
                Some(p.parse_expression()?)
            } else {
                None
            };

            p.expect_token(TokenKind::Semicolon, "';' after declaration")?;

            Ok(Declaration {
                names,
                init,
                location,
            })
        })
    }

    /// Parse assignment; the current token is the target identifier
    pub(crate) fn parse_equation(&mut self) -> PResult<Equation> {
        let (target, token) = self.expect_identifier("an assignment target")?;
        let location = token.location;

        self.enclosed("assignment", location, |p| {
            let Some(op) = AssignOp::from_token(p.current.kind) else {
                return Err(p.error_expected("an assignment operator"));
            };
            p.advance();

            let value = p.parse_expression()?;
            p.expect_token(TokenKind::Semicolon, "';' after assignment")?;

            Ok(Equation {
                target,
                op,
                value,
                location,
            })
        })
    }
}
