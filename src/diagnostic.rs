use crate::source::Source;
use colored::*;
use std::rc::Rc;
use thiserror::Error;

/// A template that cannot be tokenized (or a token stream that does not hold
/// what the parser expected).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} in \"{}\" at line {}.", without_period(.message), .template.name(), .line)]
pub struct SyntaxError {
    message: String,
    line: usize,
    template: Rc<Source>,
}

impl SyntaxError {
    pub fn new(message: &str, line: usize, template: &Rc<Source>) -> Self {
        SyntaxError {
            message: String::from(message),
            line,
            template: Rc::clone(template),
        }
    }

    /// The bare message, without location.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn template(&self) -> &Rc<Source> {
        &self.template
    }
}

fn without_period(message: &str) -> &str {
    message.strip_suffix('.').unwrap_or(message)
}

/// A broken scanner invariant. Never caused by template contents.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("internal lexer fault: {0}")]
pub struct InternalError(pub &'static str);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Internal(#[from] InternalError),
}

pub type LexResult<T> = Result<T, LexError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{0} delimiters must not be empty")]
    EmptyDelimiter(&'static str),
    #[error("whitespace trim marker must not be whitespace")]
    WhitespaceTrimMarker,
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
}

pub trait Reporter {
    fn report(&self, error: &LexError);
}

pub struct DefaultReporter {}

impl DefaultReporter {
    pub fn new() -> Rc<Self> {
        Rc::new(DefaultReporter {})
    }
}

impl Reporter for DefaultReporter {
    fn report(&self, error: &LexError) {
        match error {
            LexError::Syntax(syntax) => {
                println!("\n{} {}\n", "• Error:".red().bold(), syntax.message());
                let gutter = syntax.line().to_string();
                if let Some(text) = syntax.template().line(syntax.line()) {
                    println!("  {} {} {}", gutter.blue().bold(), "|".blue().bold(), text);
                }
                let location = match syntax.template().path() {
                    Some(path) => format!("{}:{}", path.display(), syntax.line()),
                    None => format!("{}:{}", syntax.template().name(), syntax.line()),
                };
                println!("  {} {}\n", "-->".blue().bold(), location);
            }
            LexError::Internal(internal) => {
                println!("\n{} {}\n", "• Internal error:".magenta().bold(), internal.0);
            }
        }
    }
}
