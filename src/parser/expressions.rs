//! Expression parsing implementation
//!
//! Arithmetic expressions use one function per precedence level; each level
//! loops over its operators, so every binary operator (including `^`) is
//! left-associative. Conditions compare two expressions and chain with
//! `and`/`or` at a single precedence level, also to the left.
//!
//! # Grammar
//!
//! ```text
//! expr       ::= term (("+" | "-") term)*
//! term       ::= factor (("*" | "/" | "%") factor)*
//! factor     ::= final ("^" final)*
//! final      ::= identifier | number | "(" expr ")"
//! conditions ::= condition (("and" | "or") condition)*
//! condition  ::= expr rel_op expr
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::diagnostics::Diagnostic;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Failed, PResult, Parser};

impl Parser<'_> {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> PResult<Expr> {
        self.parse_binary_level(Precedence::Additive, Self::parse_term)
    }

    fn parse_term(&mut self) -> PResult<Expr> {
        self.parse_binary_level(Precedence::Multiplicative, Self::parse_factor)
    }

    fn parse_factor(&mut self) -> PResult<Expr> {
        self.parse_binary_level(Precedence::Power, Self::parse_final)
    }

    /// `operand (op operand)*` for the operators at `level`, folded to the left.
    fn parse_binary_level(
        &mut self,
        level: Precedence,
        operand: fn(&mut Self) -> PResult<Expr>,
    ) -> PResult<Expr> {
        let mut left = operand(self)?;

        while let Some(op) = self.binary_operator_at(level) {
            let location = self.advance().location;
            let right = operand(self)?;
            left = Expr::Binary(BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location,
            });
        }

        Ok(left)
    }

    fn binary_operator_at(&self, level: Precedence) -> Option<BinOp> {
        BinOp::from_token(self.current.kind).filter(|op| op.precedence() == level)
    }

    /// Parse an identifier, a number, or a parenthesized expression
    fn parse_final(&mut self) -> PResult<Expr> {
        match self.current.kind {
            TokenKind::Ident => {
                let token = self.advance();
                Ok(Expr::Final(Final::ident(self.text(&token), token.location)))
            }
            TokenKind::Number => {
                let token = self.advance();
                Ok(Expr::Final(Final::number(self.text(&token), token.location)))
            }
            TokenKind::LParen => self.parse_parenthesized(),
            _ => Err(self.error_expected("an expression")),
        }
    }

    fn parse_parenthesized(&mut self) -> PResult<Expr> {
        let open = self.advance();

        if self.depth >= self.options.max_nesting_depth {
            self.report(Diagnostic::NestingTooDeep {
                limit: self.options.max_nesting_depth,
                location: open.location,
                span: open.span,
            });
            return Err(Failed);
        }

        self.depth += 1;
        let result = self.enclosed("parenthesized expression", open.location, |p| {
            let expr = p.parse_expression()?;
            p.expect_token(TokenKind::RParen, "')'")?;
            Ok(expr)
        });
        self.depth -= 1;
        result
    }

    /// Parse `condition (("and" | "or") condition)*`
    pub(crate) fn parse_conditions(&mut self) -> PResult<Conditions> {
        let mut left = Conditions::Single(self.parse_condition()?);

        while let Some(op) = BoolOp::from_token(self.current.kind) {
            let location = self.advance().location;
            let right = self.parse_condition()?;
            left = Conditions::Combined {
                op,
                left: Box::new(left),
                right,
                location,
            };
        }

        Ok(left)
    }

    /// Parse `expr rel_op expr`
    fn parse_condition(&mut self) -> PResult<Condition> {
        let left = self.parse_expression()?;

        let Some(op) = RelOp::from_token(self.current.kind) else {
            return Err(self.error_expected("a comparison operator"));
        };
        self.advance();

        let right = self.parse_expression()?;
        Ok(Condition {
            op,
            location: left.location(),
            left,
            right,
        })
    }
}
