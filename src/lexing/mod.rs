mod escape;
pub mod lexer;
pub mod operators;
pub mod options;
mod patterns;
pub mod stream;
pub mod token;

pub use escape::unescape;
pub use lexer::Lexer;
pub use operators::{Associativity, Operator, OperatorSet};
pub use options::{Delimiters, LexerOptions};
pub use stream::TokenStream;
pub use token::{Number, Token, TokenKind, TokenString, TokenValue};
