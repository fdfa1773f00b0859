use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Text,

    // Tag delimiters
    BlockStart,
    BlockEnd,
    VarStart,
    VarEnd,

    // Expressions
    Name,
    Number,
    String,
    Operator,
    Punctuation,
    InterpolationStart,
    InterpolationEnd,

    EOF,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Text => "TEXT",
            TokenKind::BlockStart => "BLOCK_START",
            TokenKind::BlockEnd => "BLOCK_END",
            TokenKind::VarStart => "VAR_START",
            TokenKind::VarEnd => "VAR_END",
            TokenKind::Name => "NAME",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Punctuation => "PUNCTUATION",
            TokenKind::InterpolationStart => "INTERPOLATION_START",
            TokenKind::InterpolationEnd => "INTERPOLATION_END",
            TokenKind::EOF => "EOF",
        }
    }

    /// Wording used in parser-facing messages.
    pub fn english(&self) -> &'static str {
        match self {
            TokenKind::Text => "text",
            TokenKind::BlockStart => "begin of statement block",
            TokenKind::BlockEnd => "end of statement block",
            TokenKind::VarStart => "begin of print statement",
            TokenKind::VarEnd => "end of print statement",
            TokenKind::Name => "name",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Operator => "operator",
            TokenKind::Punctuation => "punctuation",
            TokenKind::InterpolationStart => "begin of string interpolation",
            TokenKind::InterpolationEnd => "end of string interpolation",
            TokenKind::EOF => "end of template",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Digit-only lexemes that fit an `i64` become integers, everything else
    /// is a float.
    pub fn parse(lexeme: &str) -> Option<Number> {
        if lexeme.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(int) = lexeme.parse::<i64>() {
                return Some(Number::Int(int));
            }
        }
        lexeme.parse::<f64>().ok().map(Number::Float)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Number::Int(int) => write!(f, "{}", int),
            Number::Float(float) => write!(f, "{}", float),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenValue {
    None,
    Text(String),
    Number(Number),
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenValue::None => Ok(()),
            TokenValue::Text(text) => write!(f, "{}", text),
            TokenValue::Number(number) => write!(f, "{}", number),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: TokenValue, line: usize) -> Self {
        Token { kind, value, line }
    }

    pub fn text(kind: TokenKind, text: &str, line: usize) -> Self {
        Token::new(kind, TokenValue::Text(String::from(text)), line)
    }

    pub fn bare(kind: TokenKind, line: usize) -> Self {
        Token::new(kind, TokenValue::None, line)
    }

    pub fn number(number: Number, line: usize) -> Self {
        Token::new(TokenKind::Number, TokenValue::Number(number), line)
    }

    /// The textual value, if this token carries one.
    pub fn lexeme(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// True if the kind matches and, when `values` is non-empty, the token's
    /// value equals one of them.
    pub fn test(&self, kind: TokenKind, values: &[&str]) -> bool {
        if self.kind != kind {
            return false;
        }
        if values.is_empty() {
            return true;
        }
        let value = self.value.to_string();
        values.iter().any(|v| *v == value)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.value)
    }
}

pub trait TokenString {
    fn token_string(&self) -> String;
}

impl TokenString for [Token] {
    fn token_string(&self) -> String {
        let toks = self
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        String::from("Vec(") + &toks + ")"
    }
}
