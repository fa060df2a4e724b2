use derive_more::Display;

use std::fmt;

/// Reserved words of the source language.
pub const KEYWORDS: &[&str] = &[
    "class",
    "constructor",
    "function",
    "method",
    "field",
    "static",
    "var",
    "int",
    "char",
    "boolean",
    "void",
    "true",
    "false",
    "null",
    "this",
    "let",
    "do",
    "if",
    "else",
    "while",
    "return",
];

/// Reserved single-character symbols.
pub const SYMBOLS: &[char] = &[
    '{', '}', '(', ')', '[', ']', '.', ',', ';', '+', '-', '*', '/', '&', '|', '<', '>', '=', '~',
];

/// The display forms double as the element names of the token dump.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    #[display(fmt = "keyword")]
    Keyword,
    #[display(fmt = "symbol")]
    Symbol,
    #[display(fmt = "integerConstant")]
    IntConst,
    #[display(fmt = "stringConstant")]
    StringConst,
    #[display(fmt = "identifier")]
    Identifier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// For string constants the surrounding quotes are stripped; for
    /// integer constants leading zeros are preserved.
    pub lexeme: String,
    /// Line of the token's first character, 1-based.
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: String, line: usize) -> Token {
        Token { kind, lexeme, line }
    }

    pub fn is_symbol(&self, ch: char) -> bool {
        self.kind == TokenKind::Symbol && self.lexeme.chars().next() == Some(ch)
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.lexeme == keyword
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "lex={}, value={}, lineNo={}",
            self.kind, self.lexeme, self.line
        )
    }
}
