//! # Introduction
//!
//! loopc is a front end for a small imperative language with integer
//! declarations, assignments, `if`/`elif`/`else` conditionals and `loopc`
//! condition-controlled loops.  It turns source text into a typed syntax tree
//! and reports every syntax error it finds, with source locations, in a single
//! pass.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Visitor (printer, analyses, ...)
//! ```
//!
//! 1. [`parser::lexer`]: splits the source into tokens on demand.
//! 2. [`parser::parse`]: recursive descent over the token stream, recording
//!    [`Diagnostic`]s and recovering at statement and block boundaries.
//! 3. [`parser::ast`]: the tree handed to later stages.
//! 4. [`parser::visitor`]: one handler per node kind; [`parser::printer`]
//!    is the built-in consumer.
//!
//! ## Example
//!
//! ```
//! let output = loopc::parse("int i = 0; loopc i < 3 : begin i += 1; end");
//! assert!(!output.has_errors());
//! assert_eq!(output.program.statements.len(), 2);
//! ```
//!
//! Errors render through [miette](https://docs.rs/miette) once bundled with
//! their source:
//!
//! ```
//! let source = "int x = 2 @ 3;";
//! let errors = loopc::parse(source).into_result(source).unwrap_err();
//! assert_eq!(errors.diagnostics[0].kind(), loopc::DiagnosticKind::LexError);
//! ```

pub mod parser;

pub use parser::ast::*;
pub use parser::diagnostics::{Diagnostic, DiagnosticKind, ParseErrors};
pub use parser::lexer::{Lexer, Token, TokenKind};
pub use parser::parse::{parse, parse_with_options, ParseOptions, ParseOutput, Parser};
pub use parser::printer::{to_sexpr, Printer};
pub use parser::visitor::{Accept, Visitor};
