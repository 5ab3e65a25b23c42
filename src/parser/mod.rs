//! loopc source code parser
//!
//! This module transforms loopc source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST), with the [`parse::parse`] entry point
//! - [`ast`]: AST node definitions
//! - [`diagnostics`]: Errors recorded while parsing
//! - [`visitor`]: Traversal contract for AST consumers
//! - [`printer`]: Canonical source and s-expression rendering
//!
//! # Language
//!
//! - Declarations: `int a, b = expr;`
//! - Assignments: `x = expr;` plus `+= -= *= /= %= ^=`
//! - Blocks: `if`/`elif`/`else` and `loopc`, each `conditions : begin ... end`
//! - Expressions: `+ - * / % ^` over identifiers, integer literals and
//!   parentheses; conditions compare two expressions and chain with `and`/`or`
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with panic-mode error recovery.
//! A parse never stops at the first error: it reports every diagnostic it can
//! and returns the statements that parsed cleanly.

pub mod ast;
pub mod constants;
mod declarations;
pub mod diagnostics;
mod expressions;
pub mod lexer;
pub mod parse;
pub mod printer;
mod statements;
pub mod visitor;
