use crate::diagnostic::ConfigError;

#[derive(Clone, Debug, PartialEq)]
pub struct Delimiters {
    pub open: String,
    pub close: String,
}

impl Delimiters {
    pub fn new(open: &str, close: &str) -> Self {
        Delimiters {
            open: String::from(open),
            close: String::from(close),
        }
    }

    fn is_empty(&self) -> bool {
        self.open.is_empty() || self.close.is_empty()
    }
}

/// Tag syntax understood by a `Lexer`.
#[derive(Clone, Debug, PartialEq)]
pub struct LexerOptions {
    pub tag_comment: Delimiters,
    pub tag_block: Delimiters,
    pub tag_variable: Delimiters,
    pub whitespace_trim: char,
    pub interpolation: Delimiters,
}

impl Default for LexerOptions {
    fn default() -> Self {
        LexerOptions {
            tag_comment: Delimiters::new("{#", "#}"),
            tag_block: Delimiters::new("{%", "%}"),
            tag_variable: Delimiters::new("{{", "}}"),
            whitespace_trim: '-',
            interpolation: Delimiters::new("#{", "}"),
        }
    }
}

impl LexerOptions {
    pub fn with_comment_tags(mut self, open: &str, close: &str) -> Self {
        self.tag_comment = Delimiters::new(open, close);
        self
    }

    pub fn with_block_tags(mut self, open: &str, close: &str) -> Self {
        self.tag_block = Delimiters::new(open, close);
        self
    }

    pub fn with_variable_tags(mut self, open: &str, close: &str) -> Self {
        self.tag_variable = Delimiters::new(open, close);
        self
    }

    pub fn with_whitespace_trim(mut self, marker: char) -> Self {
        self.whitespace_trim = marker;
        self
    }

    pub fn with_interpolation(mut self, open: &str, close: &str) -> Self {
        self.interpolation = Delimiters::new(open, close);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let pairs = [
            ("comment", &self.tag_comment),
            ("block", &self.tag_block),
            ("variable", &self.tag_variable),
            ("interpolation", &self.interpolation),
        ];
        for (name, delimiters) in pairs {
            if delimiters.is_empty() {
                return Err(ConfigError::EmptyDelimiter(name));
            }
        }
        if self.whitespace_trim.is_whitespace() {
            return Err(ConfigError::WhitespaceTrimMarker);
        }
        Ok(())
    }
}
