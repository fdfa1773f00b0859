pub mod diagnostic;
pub mod lexing;
pub mod source;

use diagnostic::*;
use lexing::*;
pub use source::*;
use std::rc::Rc;

/// Tokenizes `source` with the default tag syntax and the standard operator
/// table, sending any failure to `reporter`.
pub fn run(source: Source, reporter: Rc<dyn Reporter>) -> Option<TokenStream> {
    let lexer = match Lexer::new(LexerOptions::default(), &OperatorSet::standard()) {
        Ok(lexer) => lexer,
        Err(error) => {
            log::error!("{}", error);
            return None;
        }
    };

    match lexer.tokenize(source) {
        Ok(stream) => Some(stream),
        Err(error) => {
            reporter.report(&error);
            None
        }
    }
}
