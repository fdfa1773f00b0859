use super::escape::unescape;
use super::operators::OperatorSet;
use super::options::LexerOptions;
use super::patterns::{self, Marker, Patterns, TagStart};
use super::stream::TokenStream;
use super::token::*;
use crate::diagnostic::*;
use crate::source::Source;
use log::{debug, trace};
use regex::Regex;
use std::rc::Rc;

const PUNCTUATION: &str = "()[]{}?:.,|";

/// Converts templates into token streams.
///
/// Patterns are compiled once, at construction. `tokenize` takes `&self` and
/// keeps its scanning state on the stack, so one lexer serves any number of
/// templates.
#[derive(Debug)]
pub struct Lexer {
    options: LexerOptions,
    patterns: Patterns,
}

impl Lexer {
    pub fn new(options: LexerOptions, operators: &OperatorSet) -> Result<Self, ConfigError> {
        let patterns = Patterns::new(&options, operators)?;
        Ok(Lexer { options, patterns })
    }

    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    pub fn tokenize<S: Into<Rc<Source>>>(&self, source: S) -> LexResult<TokenStream> {
        let source = source.into();
        debug!(target: "lexer", "tokenizing \"{}\"", source.name());

        let scanner = Scanner::new(self, Rc::clone(&source));
        let tokens = scanner.scan()?;
        Ok(TokenStream::new(tokens, source)?)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum State {
    Data,
    Block,
    Var,
    String,
    Interpolation,
}

struct Bracket {
    opener: String,
    line: usize,
}

fn closing_for(opener: &str) -> Option<char> {
    match opener {
        "(" => Some(')'),
        "[" => Some(']'),
        "{" => Some('}'),
        _ => None,
    }
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

/// Strips trailing ASCII whitespace, the set `[[:space:]]` matches in tag
/// patterns. NUL bytes are kept.
fn trim_trailing(text: &str) -> &str {
    text.trim_end_matches(is_space)
}

/// Byte length of the double-quoted string content at the start of `rest`,
/// stopping at an unescaped quote or an interpolation opener.
fn string_part_len(rest: &str, interpolation: &str) -> usize {
    let mut len = 0;
    let mut chars = rest.chars();
    while let Some(c) = chars.next() {
        if c == '"' || rest[len..].starts_with(interpolation) {
            break;
        }
        if c == '\\' {
            match chars.next() {
                Some(escaped) => len += 1 + escaped.len_utf8(),
                None => break,
            }
        } else {
            len += c.len_utf8();
        }
    }
    len
}

/// Transient state of one `tokenize` call.
struct Scanner<'l> {
    lexer: &'l Lexer,
    source: Rc<Source>,
    code: String,
    cursor: usize,
    line: usize,
    tokens: Vec<Token>,
    state: State,
    states: Vec<State>,
    brackets: Vec<Bracket>,
    positions: Vec<TagStart>,
    position: usize,
    tag_line: usize,
}

impl<'l> Scanner<'l> {
    fn new(lexer: &'l Lexer, source: Rc<Source>) -> Self {
        let code = source.code().replace("\r\n", "\n").replace('\r', "\n");
        let positions = lexer.patterns.tag_starts(&code);
        trace!(target: "lexer", "found {} tag openings", positions.len());

        Scanner {
            lexer,
            source,
            code,
            cursor: 0,
            line: 1,
            tokens: Vec::new(),
            state: State::Data,
            states: Vec::new(),
            brackets: Vec::new(),
            positions,
            position: 0,
            tag_line: 1,
        }
    }

    fn scan(mut self) -> LexResult<Vec<Token>> {
        while !self.is_at_end() {
            match self.state {
                State::Data => self.lex_data()?,
                State::Block => self.lex_block()?,
                State::Var => self.lex_var()?,
                State::String => self.lex_string()?,
                State::Interpolation => self.lex_interpolation()?,
            }
        }

        self.push_token(TokenKind::EOF, TokenValue::None);

        if let Some(bracket) = self.brackets.pop() {
            return Err(self.unclosed(&bracket.opener, bracket.line));
        }
        match self.state {
            State::Block => return Err(self.unclosed("block", self.tag_line)),
            State::Var => return Err(self.unclosed("variable", self.tag_line)),
            _ => (),
        }

        Ok(self.tokens)
    }

    fn lex_data(&mut self) -> LexResult<()> {
        while self.position < self.positions.len()
            && self.positions[self.position].offset < self.cursor
        {
            self.position += 1;
        }

        let tag = match self.positions.get(self.position) {
            Some(tag) => *tag,
            None => {
                let rest = self.rest().to_string();
                self.push_text(&rest);
                self.cursor = self.code.len();
                return Ok(());
            }
        };
        self.position += 1;

        let text = self.code[self.cursor..tag.offset].to_string();
        if tag.trim {
            self.push_text(trim_trailing(&text));
        } else {
            self.push_text(&text);
        }
        self.advance(text.len() + tag.len);

        match tag.marker {
            Marker::Comment => self.lex_comment(),
            Marker::Block => {
                if let Some(matched) = self.matches(&self.lexer.patterns.verbatim) {
                    self.advance(matched.len());
                    self.lex_raw_data()
                } else if let Some((len, number)) = self.line_directive() {
                    self.advance(len);
                    self.line = number;
                    Ok(())
                } else {
                    self.push_token(TokenKind::BlockStart, TokenValue::None);
                    self.push_state(State::Block);
                    self.tag_line = self.line;
                    Ok(())
                }
            }
            Marker::Variable => {
                self.push_token(TokenKind::VarStart, TokenValue::None);
                self.push_state(State::Var);
                self.tag_line = self.line;
                Ok(())
            }
        }
    }

    fn lex_block(&mut self) -> LexResult<()> {
        if self.brackets.is_empty() {
            if let Some(matched) = self.matches(&self.lexer.patterns.block_end) {
                self.push_token(TokenKind::BlockEnd, TokenValue::None);
                self.advance(matched.len());
                return self.pop_state();
            }
        }
        self.lex_expression()
    }

    fn lex_var(&mut self) -> LexResult<()> {
        if self.brackets.is_empty() {
            if let Some(matched) = self.matches(&self.lexer.patterns.var_end) {
                self.push_token(TokenKind::VarEnd, TokenValue::None);
                self.advance(matched.len());
                return self.pop_state();
            }
        }
        self.lex_expression()
    }

    fn lex_expression(&mut self) -> LexResult<()> {
        let whitespace = self.rest().len() - self.rest().trim_start_matches(is_space).len();
        if whitespace > 0 {
            self.advance(whitespace);
            if self.is_at_end() {
                let what = if self.state == State::Block {
                    "block"
                } else {
                    "variable"
                };
                return Err(self.unclosed(what, self.tag_line));
            }
        }

        if let Some(operator) = self.lexer.patterns.match_operator(self.rest()) {
            let len = operator.len();
            let normalized = operator.split_whitespace().collect::<Vec<_>>().join(" ");
            self.push_token(TokenKind::Operator, TokenValue::Text(normalized));
            self.advance(len);
        } else if let Some(name) = self.matches(&patterns::NAME) {
            let len = name.len();
            self.push_token(TokenKind::Name, TokenValue::Text(name));
            self.advance(len);
        } else if let Some(lexeme) = self.matches(&patterns::NUMBER) {
            let number = Number::parse(&lexeme)
                .ok_or(InternalError("number pattern matched a non-number"))?;
            self.push_token(TokenKind::Number, TokenValue::Number(number));
            self.advance(lexeme.len());
        } else if let Some(c) = self.peek().filter(|c| PUNCTUATION.contains(*c)) {
            self.punctuation(c)?;
        } else if let Some((len, body)) = self.string_literal() {
            self.push_token(TokenKind::String, TokenValue::Text(unescape(&body)));
            self.advance(len);
        } else if self.peek() == Some('"') {
            self.brackets.push(Bracket {
                opener: String::from("\""),
                line: self.line,
            });
            self.push_state(State::String);
            self.advance(1);
        } else {
            return Err(self.unexpected_character());
        }

        Ok(())
    }

    fn punctuation(&mut self, c: char) -> LexResult<()> {
        if "([{".contains(c) {
            self.brackets.push(Bracket {
                opener: c.to_string(),
                line: self.line,
            });
        } else if ")]}".contains(c) {
            let bracket = match self.brackets.pop() {
                Some(bracket) => bracket,
                None => {
                    let message = format!("Unexpected \"{}\".", c);
                    return Err(self.error(&message, self.line));
                }
            };
            if closing_for(&bracket.opener) != Some(c) {
                return Err(self.unclosed(&bracket.opener, bracket.line));
            }
        }

        self.push_token(TokenKind::Punctuation, TokenValue::Text(c.to_string()));
        self.advance(c.len_utf8());
        Ok(())
    }

    fn lex_raw_data(&mut self) -> LexResult<()> {
        let found = self
            .lexer
            .patterns
            .raw_data
            .captures(self.rest())
            .and_then(|captures| {
                let whole = captures.get(0)?;
                let opener = captures.get(1)?.as_str();
                let trim = opener.contains(self.lexer.options.whitespace_trim);
                Some((whole.start(), whole.end(), trim))
            });

        let (start, end, trim) = match found {
            Some(found) => found,
            None => {
                return Err(self.error(
                    "Unexpected end of file: Unclosed \"verbatim\" block.",
                    self.line,
                ))
            }
        };

        let text = self.rest()[..start].to_string();
        self.advance(end);
        if trim {
            self.push_text(trim_trailing(&text));
        } else {
            self.push_text(&text);
        }
        Ok(())
    }

    fn lex_comment(&mut self) -> LexResult<()> {
        match self.lexer.patterns.comment_end.find(self.rest()) {
            Some(end) => {
                let len = end.end();
                self.advance(len);
                Ok(())
            }
            None => Err(self.error("Unclosed comment.", self.line)),
        }
    }

    fn lex_string(&mut self) -> LexResult<()> {
        let lexer = self.lexer;
        let interpolation = &lexer.options.interpolation.open;

        if let Some(matched) = self.matches(&lexer.patterns.interpolation_start) {
            self.brackets.push(Bracket {
                opener: interpolation.clone(),
                line: self.line,
            });
            self.push_token(TokenKind::InterpolationStart, TokenValue::None);
            self.advance(matched.len());
            self.push_state(State::Interpolation);
            return Ok(());
        }

        let len = string_part_len(self.rest(), interpolation);
        if len > 0 {
            let part = unescape(&self.rest()[..len]);
            self.push_token(TokenKind::String, TokenValue::Text(part));
            self.advance(len);
            return Ok(());
        }

        if self.peek() == Some('"') {
            let bracket = self
                .brackets
                .pop()
                .ok_or(InternalError("string closed without an open quote"))?;
            if bracket.opener != "\"" {
                return Err(self.unclosed(&bracket.opener, bracket.line));
            }
            self.pop_state()?;
            self.advance(1);
            return Ok(());
        }

        Err(self.unexpected_character())
    }

    fn lex_interpolation(&mut self) -> LexResult<()> {
        let inside = self
            .brackets
            .last()
            .map_or(false, |b| b.opener == self.lexer.options.interpolation.open);
        if inside {
            if let Some(matched) = self.matches(&self.lexer.patterns.interpolation_end) {
                self.brackets.pop();
                self.push_token(TokenKind::InterpolationEnd, TokenValue::None);
                self.advance(matched.len());
                return self.pop_state();
            }
        }
        self.lex_expression()
    }

    // Helpers

    fn line_directive(&self) -> Option<(usize, usize)> {
        let captures = self.lexer.patterns.line_directive.captures(self.rest())?;
        let len = captures.get(0)?.len();
        let number = captures
            .get(1)?
            .as_str()
            .parse::<usize>()
            .unwrap_or(usize::MAX);
        Some((len, number))
    }

    fn string_literal(&self) -> Option<(usize, String)> {
        let captures = self.lexer.patterns.string.captures(self.rest())?;
        let len = captures.get(0)?.len();
        let body = captures.get(1).or_else(|| captures.get(2))?;
        Some((len, body.as_str().to_string()))
    }

    fn push_text(&mut self, text: &str) {
        if !text.is_empty() {
            self.push_token(TokenKind::Text, TokenValue::Text(String::from(text)));
        }
    }

    fn push_token(&mut self, kind: TokenKind, value: TokenValue) {
        let token = Token::new(kind, value, self.line);
        trace!(target: "lexer", "{} at line {}", token, token.line);
        self.tokens.push(token);
    }

    fn push_state(&mut self, state: State) {
        trace!(target: "lexer", "enter {:?} from {:?}", state, self.state);
        self.states.push(self.state);
        self.state = state;
    }

    fn pop_state(&mut self) -> LexResult<()> {
        let previous = self
            .states
            .pop()
            .ok_or(InternalError("cannot pop state without a previous state"))?;
        trace!(target: "lexer", "leave {:?} for {:?}", self.state, previous);
        self.state = previous;
        Ok(())
    }

    fn matches(&self, regex: &Regex) -> Option<String> {
        regex.find(self.rest()).map(|m| m.as_str().to_string())
    }

    /// Moves past `len` bytes, counting the newlines they contain.
    fn advance(&mut self, len: usize) {
        let end = self.cursor + len;
        let newlines = self.code[self.cursor..end]
            .bytes()
            .filter(|b| *b == b'\n')
            .count();
        self.line = self.line.saturating_add(newlines);
        self.cursor = end;
    }

    fn rest(&self) -> &str {
        &self.code[self.cursor..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn is_at_end(&self) -> bool {
        self.cursor >= self.code.len()
    }

    fn unexpected_character(&self) -> LexError {
        let c = self.peek().map(|c| c.to_string()).unwrap_or_default();
        let message = format!("Unexpected character \"{}\".", c);
        self.error(&message, self.line)
    }

    fn unclosed(&self, what: &str, line: usize) -> LexError {
        let message = format!("Unclosed \"{}\".", what);
        self.error(&message, line)
    }

    fn error(&self, message: &str, line: usize) -> LexError {
        LexError::Syntax(SyntaxError::new(message, line, &self.source))
    }
}
