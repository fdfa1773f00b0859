use super::operators::OperatorSet;
use super::options::LexerOptions;
use crate::diagnostic::ConfigError;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// ASCII whitespace, the same set the trim marker strips.
const WS: &str = "[[:space:]]";

pub static NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A[a-zA-Z_\x7f-\x{10FFFF}][a-zA-Z0-9_\x7f-\x{10FFFF}]*").expect("name pattern")
});

pub static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A[0-9]+(?:\.[0-9]+)?").expect("number pattern"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    Comment,
    Block,
    Variable,
}

/// One tag opening found in the template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagStart {
    pub offset: usize,
    pub len: usize,
    pub marker: Marker,
    pub trim: bool,
}

/// Every pattern that depends on the lexer's options or operators, compiled
/// once per lexer.
#[derive(Debug)]
pub struct Patterns {
    tag_starts: Regex,
    pub block_end: Regex,
    pub var_end: Regex,
    pub raw_data: Regex,
    pub comment_end: Regex,
    pub verbatim: Regex,
    pub line_directive: Regex,
    pub interpolation_start: Regex,
    pub interpolation_end: Regex,
    pub operator: Regex,
    pub string: Regex,
    comment_open: String,
    block_open: String,
    variable_open: String,
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern(e.to_string()))
}

impl Patterns {
    pub fn new(options: &LexerOptions, operators: &OperatorSet) -> Result<Self, ConfigError> {
        options.validate()?;

        let trim = regex::escape(&options.whitespace_trim.to_string());
        let comment_open = regex::escape(&options.tag_comment.open);
        let comment_close = regex::escape(&options.tag_comment.close);
        let block_open = regex::escape(&options.tag_block.open);
        let block_close = regex::escape(&options.tag_block.close);
        let var_open = regex::escape(&options.tag_variable.open);
        let var_close = regex::escape(&options.tag_variable.close);
        let interpolation_open = regex::escape(&options.interpolation.open);
        let interpolation_close = regex::escape(&options.interpolation.close);

        let operator = operator_pattern(operators);
        debug!(target: "lexer", "operator pattern: {}", operator);

        Ok(Patterns {
            tag_starts: compile(&format!(
                "({}|{}|{})({})?",
                var_open, block_open, comment_open, trim
            ))?,
            block_end: compile(&format!(
                r"\A{ws}*(?:{t}{c}{ws}*|{ws}*{c})\n?",
                ws = WS,
                t = trim,
                c = block_close
            ))?,
            var_end: compile(&format!(
                r"\A(?:{ws}*{t}{c}{ws}*|{ws}*{c})",
                ws = WS,
                t = trim,
                c = var_close
            ))?,
            raw_data: compile(&format!(
                r"(?s)({o}{t}|{o}){ws}*endverbatim{ws}*(?:{t}{c}{ws}*|{ws}*{c})",
                ws = WS,
                o = block_open,
                t = trim,
                c = block_close
            ))?,
            comment_end: compile(&format!(
                r"(?s)(?:{t}{c}{ws}*|{c})\n?",
                ws = WS,
                t = trim,
                c = comment_close
            ))?,
            verbatim: compile(&format!(
                r"(?s)\A{ws}*verbatim{ws}*(?:{t}{c}{ws}*|{ws}*{c})",
                ws = WS,
                t = trim,
                c = block_close
            ))?,
            line_directive: compile(&format!(
                r"\A{ws}*line{ws}+([0-9]+){ws}*{c}",
                ws = WS,
                c = block_close
            ))?,
            interpolation_start: compile(&format!(r"\A{}{}*", interpolation_open, WS))?,
            interpolation_end: compile(&format!(r"\A{}*{}", WS, interpolation_close))?,
            operator: compile(&operator)?,
            string: compile(&string_pattern(&options.interpolation.open))?,
            comment_open: options.tag_comment.open.clone(),
            block_open: options.tag_block.open.clone(),
            variable_open: options.tag_variable.open.clone(),
        })
    }

    /// All tag openings in `code`, in order, each optionally carrying the
    /// trim marker.
    pub fn tag_starts(&self, code: &str) -> Vec<TagStart> {
        self.tag_starts
            .captures_iter(code)
            .filter_map(|captures| {
                let whole = captures.get(0)?;
                let opener = captures.get(1)?.as_str();
                let marker = if opener == self.variable_open {
                    Marker::Variable
                } else if opener == self.block_open {
                    Marker::Block
                } else if opener == self.comment_open {
                    Marker::Comment
                } else {
                    return None;
                };
                Some(TagStart {
                    offset: whole.start(),
                    len: whole.len(),
                    marker,
                    trim: captures.get(2).is_some(),
                })
            })
            .collect()
    }

    /// Matches an operator at the start of `rest`, returning the raw operator
    /// text. A following delimiter required by word operators is not part of
    /// the result.
    pub fn match_operator<'r>(&self, rest: &'r str) -> Option<&'r str> {
        let captures = self.operator.captures(rest)?;
        captures
            .iter()
            .skip(1)
            .flatten()
            .next()
            .map(|m| m.as_str())
    }
}

/// Quoted strings that cannot interpolate: single-quoted, or double-quoted
/// without the first character of the interpolation opener.
fn string_pattern(interpolation: &str) -> String {
    let stop = interpolation
        .chars()
        .next()
        .map(|c| regex::escape(&c.to_string()))
        .unwrap_or_default();
    format!(
        r#"(?s)\A(?:"([^{s}"\\]*(?:\\.[^{s}"\\]*)*)"|'([^'\\]*(?:\\.[^'\\]*)*)')"#,
        s = stop
    )
}

/// Builds one anchored alternation of `=` and every registered operator,
/// longest first. Each alternative wraps its symbol in the only capture group
/// it has.
pub fn operator_pattern(operators: &OperatorSet) -> String {
    let mut symbols: Vec<&str> = std::iter::once("=")
        .chain(operators.symbols())
        .filter(|s| !s.trim().is_empty())
        .collect();
    symbols.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    symbols.dedup();

    let alternatives: Vec<String> = symbols
        .iter()
        .map(|symbol| {
            let escaped = symbol
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(&format!("{}+", WS));
            let ends_with_word = symbol
                .chars()
                .last()
                .map_or(false, |c| c.is_alphanumeric() || c == '_');
            if ends_with_word {
                format!(r"({})(?:{}|[()])", escaped, WS)
            } else {
                format!("({})", escaped)
            }
        })
        .collect();

    format!(r"\A(?:{})", alternatives.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexing::operators::Operator;
    use pretty_assertions::assert_eq;

    fn patterns(operators: &OperatorSet) -> Patterns {
        Patterns::new(&LexerOptions::default(), operators).unwrap()
    }

    #[test]
    fn equals_is_always_an_operator() {
        assert_eq!(operator_pattern(&OperatorSet::new()), r"\A(?:(=))");
    }

    #[test]
    fn longest_symbol_comes_first() {
        let mut operators = OperatorSet::new();
        operators
            .add_binary("*", Operator::left(60))
            .add_binary("**", Operator::right(200));
        assert_eq!(
            operator_pattern(&operators),
            r"\A(?:(\*\*)|(\*)|(=))"
        );
    }

    #[test]
    fn word_operators_need_a_delimiter() {
        let p = patterns(&OperatorSet::standard());
        assert_eq!(p.match_operator("not (a)"), Some("not"));
        assert_eq!(p.match_operator("not(a)"), Some("not"));
        assert_eq!(p.match_operator("nothing"), None);
        assert_eq!(p.match_operator("in"), None);
    }

    #[test]
    fn multi_word_operators_accept_any_whitespace() {
        let p = patterns(&OperatorSet::standard());
        assert_eq!(p.match_operator("not   in x"), Some("not   in"));
        assert_eq!(p.match_operator("starts\nwith 'a'"), Some("starts\nwith"));
        assert_eq!(p.match_operator("not x"), Some("not"));
    }

    #[test]
    fn symbolic_operators_match_without_delimiter() {
        let p = patterns(&OperatorSet::standard());
        assert_eq!(p.match_operator("==1"), Some("=="));
        assert_eq!(p.match_operator("//2"), Some("//"));
        assert_eq!(p.match_operator("..b"), Some(".."));
        assert_eq!(p.match_operator("=x"), Some("="));
        assert_eq!(p.match_operator("b-and(x)"), Some("b-and"));
    }

    #[test]
    fn tag_starts_are_found_in_order() {
        let p = patterns(&OperatorSet::new());
        let starts = p.tag_starts("a {{ b }} {%- c %}{# d #}");
        assert_eq!(
            starts,
            vec![
                TagStart { offset: 2, len: 2, marker: Marker::Variable, trim: false },
                TagStart { offset: 10, len: 3, marker: Marker::Block, trim: true },
                TagStart { offset: 18, len: 2, marker: Marker::Comment, trim: false },
            ]
        );
    }

    #[test]
    fn custom_delimiters_are_escaped() {
        let options = LexerOptions::default()
            .with_variable_tags("${", "}")
            .with_block_tags("<%", "%>");
        let p = Patterns::new(&options, &OperatorSet::new()).unwrap();
        let starts = p.tag_starts("x ${ y } <% z %>");
        assert_eq!(starts.len(), 2);
        assert_eq!(starts[0].marker, Marker::Variable);
        assert_eq!(starts[1].marker, Marker::Block);
        assert!(p.var_end.is_match(" }"));
        assert!(p.block_end.is_match(" %>"));
    }

    #[test]
    fn plain_strings_stop_at_interpolation_opener() {
        let p = patterns(&OperatorSet::new());
        assert!(p.string.is_match(r#""a{b}" x"#));
        assert!(!p.string.is_match(r#""a#{b}" x"#));
        assert!(p.string.is_match("'a#{b}' x"));

        let options = LexerOptions::default().with_interpolation("${", "}");
        let p = Patterns::new(&options, &OperatorSet::new()).unwrap();
        assert!(p.string.is_match(r#""a#{b}" x"#));
        assert!(!p.string.is_match(r#""a${b}" x"#));
    }

    #[test]
    fn empty_delimiters_are_rejected() {
        let options = LexerOptions::default().with_comment_tags("", "#}");
        assert_eq!(
            Patterns::new(&options, &OperatorSet::new()).unwrap_err(),
            ConfigError::EmptyDelimiter("comment")
        );
    }
}
