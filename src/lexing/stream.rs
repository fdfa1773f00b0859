use super::token::*;
use crate::diagnostic::*;
use crate::source::Source;
use std::fmt;
use std::rc::Rc;

/// Forward-only view over the tokens of one template, ending in `EOF`.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    index: usize,
    source: Rc<Source>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>, source: Rc<Source>) -> Result<Self, InternalError> {
        match tokens.last() {
            Some(last) if last.kind == TokenKind::EOF => (),
            _ => return Err(InternalError("token stream must end with EOF")),
        }
        if tokens.iter().filter(|t| t.kind == TokenKind::EOF).count() != 1 {
            return Err(InternalError("token stream must contain exactly one EOF"));
        }
        if tokens
            .iter()
            .any(|t| t.kind == TokenKind::Text && t.lexeme().map_or(true, str::is_empty))
        {
            return Err(InternalError("token stream must not contain empty text"));
        }

        Ok(TokenStream {
            tokens,
            index: 0,
            source,
        })
    }

    pub fn current(&self) -> &Token {
        &self.tokens[self.index]
    }

    /// Advances and returns the token that was current.
    pub fn next(&mut self) -> Result<Token, SyntaxError> {
        if self.index + 1 >= self.tokens.len() {
            return Err(self.end_of_template());
        }
        self.index += 1;
        Ok(self.tokens[self.index - 1].clone())
    }

    /// Advances only if the current token passes `test`.
    pub fn next_if(&mut self, kind: TokenKind, values: &[&str]) -> Option<Token> {
        if self.current().test(kind, values) {
            self.next().ok()
        } else {
            None
        }
    }

    pub fn expect(
        &mut self,
        kind: TokenKind,
        values: &[&str],
        message: Option<&str>,
    ) -> Result<Token, SyntaxError> {
        let token = self.current();
        if !token.test(kind, values) {
            let prefix = message.map(|m| format!("{}. ", m)).unwrap_or_default();
            let expected_value = match values.first() {
                Some(value) => format!(" with value \"{}\"", value),
                None => String::new(),
            };
            let message = format!(
                "{}Unexpected token \"{}\" of value \"{}\" (\"{}\" expected{}).",
                prefix,
                token.kind.english(),
                token.value,
                kind.english(),
                expected_value
            );
            return Err(SyntaxError::new(&message, token.line, &self.source));
        }
        self.next()
    }

    /// Peeks `offset` tokens past the current one.
    pub fn look(&self, offset: usize) -> Result<&Token, SyntaxError> {
        self.tokens
            .get(self.index + offset)
            .ok_or_else(|| self.end_of_template())
    }

    pub fn test(&self, kind: TokenKind, values: &[&str]) -> bool {
        self.current().test(kind, values)
    }

    pub fn is_eof(&self) -> bool {
        self.current().kind == TokenKind::EOF
    }

    pub fn source(&self) -> &Rc<Source> {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    fn end_of_template(&self) -> SyntaxError {
        let line = self.tokens[self.tokens.len() - 1].line;
        SyntaxError::new("Unexpected end of template.", line, &self.source)
    }
}

impl fmt::Display for TokenStream {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for token in &self.tokens {
            writeln!(f, "{:>4}  {}", token.line, token)?;
        }
        Ok(())
    }
}
