pub use stencil::diagnostic::*;
use stencil::lexing::*;
use stencil::Source;
use std::cell::RefCell;
use std::rc::Rc;

pub type TestResult = std::result::Result<(), String>;

#[allow(dead_code)]
pub mod test_source {

    use stencil::Source;

    pub fn new_text(text: &str) -> Source {
        Source::new(text, "<test>")
    }
}

#[allow(dead_code)]
pub mod test_token {

    use stencil::lexing::*;

    pub fn text(value: &str, line: usize) -> Token {
        Token::text(TokenKind::Text, value, line)
    }

    pub fn name(value: &str, line: usize) -> Token {
        Token::text(TokenKind::Name, value, line)
    }

    pub fn string(value: &str, line: usize) -> Token {
        Token::text(TokenKind::String, value, line)
    }

    pub fn operator(value: &str, line: usize) -> Token {
        Token::text(TokenKind::Operator, value, line)
    }

    pub fn punctuation(value: &str, line: usize) -> Token {
        Token::text(TokenKind::Punctuation, value, line)
    }

    pub fn number(value: Number, line: usize) -> Token {
        Token::number(value, line)
    }

    pub fn int(value: i64, line: usize) -> Token {
        Token::number(Number::Int(value), line)
    }

    pub fn float(value: f64, line: usize) -> Token {
        Token::number(Number::Float(value), line)
    }

    pub fn block_start(line: usize) -> Token {
        Token::bare(TokenKind::BlockStart, line)
    }

    pub fn block_end(line: usize) -> Token {
        Token::bare(TokenKind::BlockEnd, line)
    }

    pub fn var_start(line: usize) -> Token {
        Token::bare(TokenKind::VarStart, line)
    }

    pub fn var_end(line: usize) -> Token {
        Token::bare(TokenKind::VarEnd, line)
    }

    pub fn interpolation_start(line: usize) -> Token {
        Token::bare(TokenKind::InterpolationStart, line)
    }

    pub fn interpolation_end(line: usize) -> Token {
        Token::bare(TokenKind::InterpolationEnd, line)
    }

    pub fn eof(line: usize) -> Token {
        Token::bare(TokenKind::EOF, line)
    }
}

#[allow(dead_code)]
pub fn standard_lexer() -> Lexer {
    Lexer::new(LexerOptions::default(), &OperatorSet::standard()).unwrap()
}

#[allow(dead_code)]
pub fn test_lex(text: &str) -> Result<Vec<Token>, LexError> {
    standard_lexer()
        .tokenize(test_source::new_text(text))
        .map(|stream| stream.tokens().to_vec())
}

#[allow(dead_code)]
pub fn test_stream(text: &str) -> TokenStream {
    standard_lexer()
        .tokenize(Source::new(text, "<test>"))
        .unwrap()
}

pub struct ErrorCapture {
    errors: Rc<RefCell<Vec<LexError>>>,
}

#[allow(dead_code)]
impl ErrorCapture {
    pub fn unwrap(&mut self) -> Vec<LexError> {
        let captured = RefCell::new(Vec::new());
        self.errors.swap(&captured);
        captured.into_inner()
    }
}

pub struct TestReporter {
    errors: Rc<RefCell<Vec<LexError>>>,
}

#[allow(dead_code)]
impl TestReporter {
    pub fn new() -> (Rc<dyn Reporter>, ErrorCapture) {
        let errors = Rc::new(RefCell::new(Vec::new()));
        (
            Rc::new(TestReporter {
                errors: Rc::clone(&errors),
            }),
            ErrorCapture { errors },
        )
    }
}

impl Reporter for TestReporter {
    fn report(&self, error: &LexError) {
        self.errors.borrow_mut().push(error.clone());
    }
}

#[allow(dead_code)]
pub fn assert_slices_equal<T, U>(
    kind: &str,
    got: &[T],
    expected: &[T],
    test: U,
    list: &str,
) -> TestResult
where
    T: std::fmt::Display,
    U: Fn(&T, &T) -> bool,
{
    if got.len() != expected.len() {
        let one_line = format!("Expected {} {}, got {}", expected.len(), kind, got.len());
        println!("{}\n{}", &one_line, list);
        return Err(one_line);
    }

    for (lhs, rhs) in got.iter().zip(expected) {
        if !test(lhs, rhs) {
            println!("Expected:\n  {}\nGot:\n  {}", rhs, lhs);
            return Err(String::from("Unexpected item"));
        }
    }

    Ok(())
}
