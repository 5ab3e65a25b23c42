// Constants for the loopc parser

use crate::parser::lexer::TokenKind;

/// Statement-level resynchronization point; consumed by recovery
pub const STATEMENT_TERMINATOR: TokenKind = TokenKind::Semicolon;

/// Block-level resynchronization point
pub const BLOCK_TERMINATOR: TokenKind = TokenKind::End;

/// Default limit on nested parentheses in one expression
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 256;
