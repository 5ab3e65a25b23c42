//! Lexer (tokenizer) for loopc source code
//!
//! Produces one [`Token`] per [`Lexer::next_token`] call. Problems are encoded
//! as token kinds rather than errors: a character outside the language becomes
//! a [`TokenKind::Unknown`] token for the parser to report.

use super::ast::{SourceLocation, Span};
use std::fmt;
use std::iter::FusedIterator;

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals and names
    Ident,
    Number,

    // Keywords
    Int,
    If,
    Elif,
    Else,
    Loopc,
    Begin,
    End,
    And,
    Or,

    // Arithmetic
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %
    Caret,   // ^

    // Assignment
    Eq,        // =
    PlusEq,    // +=
    MinusEq,   // -=
    StarEq,    // *=
    SlashEq,   // /=
    PercentEq, // %=
    CaretEq,   // ^=

    // Comparison
    EqEq,  // ==
    NotEq, // !=
    Lt,    // <
    Le,    // <=
    Gt,    // >
    Ge,    // >=

    // Punctuation
    LParen,    // (
    RParen,    // )
    Semicolon, // ;
    Comma,     // ,
    Colon,     // :

    /// A character that is not part of the language
    Unknown,

    // End of input
    Eof,
}

impl TokenKind {
    /// Looks a letter run up in the keyword table.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        let kind = match text {
            "int" => TokenKind::Int,
            "if" => TokenKind::If,
            "elif" => TokenKind::Elif,
            "else" => TokenKind::Else,
            "loopc" => TokenKind::Loopc,
            "begin" => TokenKind::Begin,
            "end" => TokenKind::End,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            _ => return None,
        };
        Some(kind)
    }

    /// Kinds that can only begin a top-level statement.
    pub fn starts_statement(self) -> bool {
        matches!(self, TokenKind::Int | TokenKind::If | TokenKind::Loopc)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Ident => "identifier",
            TokenKind::Number => "number",
            TokenKind::Int => "'int'",
            TokenKind::If => "'if'",
            TokenKind::Elif => "'elif'",
            TokenKind::Else => "'else'",
            TokenKind::Loopc => "'loopc'",
            TokenKind::Begin => "'begin'",
            TokenKind::End => "'end'",
            TokenKind::And => "'and'",
            TokenKind::Or => "'or'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Caret => "'^'",
            TokenKind::Eq => "'='",
            TokenKind::PlusEq => "'+='",
            TokenKind::MinusEq => "'-='",
            TokenKind::StarEq => "'*='",
            TokenKind::SlashEq => "'/='",
            TokenKind::PercentEq => "'%='",
            TokenKind::CaretEq => "'^='",
            TokenKind::EqEq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::Le => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::Ge => "'>='",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Semicolon => "';'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::Unknown => "unrecognized character",
            TokenKind::Eof => "end of input",
        };
        f.write_str(text)
    }
}

/// A classified lexeme. `span` indexes the exact lexeme text in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub location: SourceLocation,
}

impl Token {
    /// The lexeme this token was classified from.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start..self.span.end]
    }

    /// Human-readable description used in "expected X, found Y" messages.
    pub fn describe(&self, source: &str) -> String {
        match self.kind {
            TokenKind::Ident => format!("identifier '{}'", self.text(source)),
            TokenKind::Number => format!("number {}", self.text(source)),
            TokenKind::Unknown => format!("unrecognized character '{}'", self.text(source)),
            kind => kind.to_string(),
        }
    }
}

/// Lexer for loopc source code
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source string.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the remaining input, ending with exactly one `Eof` token.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            tokens.push(token);
            if token.kind == TokenKind::Eof {
                break;
            }
        }
        tokens
    }

    /// Classify the next lexeme. Once the input is exhausted every call
    /// returns an `Eof` token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let location = self.current_location();

        let Some(ch) = self.advance() else {
            return self.token(TokenKind::Eof, start, location);
        };

        let kind = match ch {
            c if c.is_ascii_alphabetic() => {
                self.advance_while(|c| c.is_ascii_alphabetic());
                TokenKind::keyword(&self.source[start..self.position])
                    .unwrap_or(TokenKind::Ident)
            }
            c if c.is_ascii_digit() => {
                self.advance_while(|c| c.is_ascii_digit());
                TokenKind::Number
            }
            '+' => self.with_equals(TokenKind::PlusEq, TokenKind::Plus),
            '-' => self.with_equals(TokenKind::MinusEq, TokenKind::Minus),
            '*' => self.with_equals(TokenKind::StarEq, TokenKind::Star),
            '/' => self.with_equals(TokenKind::SlashEq, TokenKind::Slash),
            '%' => self.with_equals(TokenKind::PercentEq, TokenKind::Percent),
            '^' => self.with_equals(TokenKind::CaretEq, TokenKind::Caret),
            '>' => self.with_equals(TokenKind::Ge, TokenKind::Gt),
            '<' => self.with_equals(TokenKind::Le, TokenKind::Lt),
            '=' => self.with_equals(TokenKind::EqEq, TokenKind::Eq),
            // A lone '!' is not an operator
            '!' => self.with_equals(TokenKind::NotEq, TokenKind::Unknown),
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            _ => TokenKind::Unknown,
        };

        self.token(kind, start, location)
    }

    fn token(&self, kind: TokenKind, start: usize, location: SourceLocation) -> Token {
        Token {
            kind,
            span: Span::new(start, self.position),
            location,
        }
    }

    /// Greedy two-character match: `<op>=` wins over `<op>`.
    fn with_equals(&mut self, paired: TokenKind, single: TokenKind) -> TokenKind {
        if self.peek() == Some('=') {
            self.advance();
            paired
        } else {
            single
        }
    }

    fn skip_whitespace(&mut self) {
        self.advance_while(|c| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C'));
    }

    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !predicate(ch) {
                break;
            }
            self.advance();
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.source[self.position..].chars().next()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

/// Yields tokens up to, but not including, end of input.
impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        (token.kind != TokenKind::Eof).then_some(token)
    }
}

impl FusedIterator for Lexer<'_> {}
