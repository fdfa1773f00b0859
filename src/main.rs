use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use stencil::diagnostic::{DefaultReporter, LexError, Reporter};
use stencil::lexing::{Lexer, LexerOptions, Operator, OperatorSet};
use stencil::Source;

#[derive(Parser)]
#[command(name = "stencil")]
#[command(about = "Prints the token stream of a template")]
struct Args {
    /// Path to the template to tokenize
    file: PathBuf,

    #[arg(long, num_args = 2, value_names = ["OPEN", "CLOSE"])]
    comment_tags: Option<Vec<String>>,

    #[arg(long, num_args = 2, value_names = ["OPEN", "CLOSE"])]
    block_tags: Option<Vec<String>>,

    #[arg(long, num_args = 2, value_names = ["OPEN", "CLOSE"])]
    variable_tags: Option<Vec<String>>,

    #[arg(long, num_args = 2, value_names = ["OPEN", "CLOSE"])]
    interpolation: Option<Vec<String>>,

    #[arg(long)]
    whitespace_trim: Option<char>,

    /// Extra binary operator, may be repeated
    #[arg(long = "operator", value_name = "SYMBOL")]
    operators: Vec<String>,

    /// Start from an empty operator table instead of the standard one
    #[arg(long)]
    no_standard_operators: bool,
}

impl Args {
    fn options(&self) -> LexerOptions {
        let mut options = LexerOptions::default();
        if let Some([open, close]) = self.comment_tags.as_deref() {
            options = options.with_comment_tags(open, close);
        }
        if let Some([open, close]) = self.block_tags.as_deref() {
            options = options.with_block_tags(open, close);
        }
        if let Some([open, close]) = self.variable_tags.as_deref() {
            options = options.with_variable_tags(open, close);
        }
        if let Some([open, close]) = self.interpolation.as_deref() {
            options = options.with_interpolation(open, close);
        }
        if let Some(marker) = self.whitespace_trim {
            options = options.with_whitespace_trim(marker);
        }
        options
    }

    fn operators(&self) -> OperatorSet {
        let mut operators = if self.no_standard_operators {
            OperatorSet::new()
        } else {
            OperatorSet::standard()
        };
        for symbol in &self.operators {
            operators.add_binary(symbol, Operator::left(0));
        }
        operators
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let source = match Source::load(&args.file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("{}: {}", args.file.display(), error);
            return ExitCode::FAILURE;
        }
    };

    let lexer = match Lexer::new(args.options(), &args.operators()) {
        Ok(lexer) => lexer,
        Err(error) => {
            eprintln!("{}", error);
            return ExitCode::FAILURE;
        }
    };

    let reporter: Rc<dyn Reporter> = DefaultReporter::new();
    match lexer.tokenize(source) {
        Ok(stream) => {
            print!("{}", stream);
            ExitCode::SUCCESS
        }
        Err(error) => {
            reporter.report(&error);
            match error {
                LexError::Syntax(_) => ExitCode::FAILURE,
                LexError::Internal(_) => ExitCode::from(70),
            }
        }
    }
}
