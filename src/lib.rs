//! A tree-walking interpreter for a small subset of Lox: variables, block scoping,
//! `if`/`while`/`for`, short-circuiting `and`/`or`, arithmetic and `print`.
//!
//! ```
//! use linnet::reporter::CollectingReporter;
//! use linnet::Interpreter;
//!
//! let mut output: Vec<u8> = Vec::new();
//! let mut reporter = CollectingReporter::new();
//! let mut interpreter = Interpreter::new(&mut output);
//! linnet::execute("var a = 1; print a + 2;", &mut interpreter, &mut reporter).unwrap();
//! drop(interpreter);
//! assert_eq!(output, b"3\n");
//! ```

pub mod environment;
pub mod error;
pub mod expr;
pub mod interpreter;
pub mod parser;
pub mod reporter;
pub mod scanner;
pub mod stmt;

pub use expr::LiteralValue;
pub use interpreter::Interpreter;

use crate::error::LoxError;
use crate::reporter::{Reporter, Tally};

pub type ExecutionResult = Result<(), LoxError>;

/// Scan, parse and run a program. Nothing runs if scanning or parsing reported anything.
pub fn execute(code: &str, interpreter: &mut Interpreter, reporter: &mut dyn Reporter) -> ExecutionResult {
    let mut tally = Tally::new(reporter);
    let tokens = scanner::scan_tokens(code, &mut tally);
    let statements = parser::parse(&tokens, &mut tally);
    if tally.errors > 0 {
        return Err(LoxError::Syntax { count: tally.errors });
    }

    interpreter.interpret(&statements, &mut tally)?;
    Ok(())
}

/// Scan, parse and evaluate a single expression, as typed at the interactive prompt.
pub fn evaluate(code: &str, interpreter: &mut Interpreter, reporter: &mut dyn Reporter) -> Result<LiteralValue, LoxError> {
    let mut tally = Tally::new(reporter);
    let tokens = scanner::scan_tokens(code, &mut tally);
    let expression = parser::parse_expression(&tokens, &mut tally);
    let expression = match expression {
        Some(expression) if tally.errors == 0 => expression,
        _ => return Err(LoxError::Syntax { count: tally.errors }),
    };

    interpreter.evaluate_expression(&expression).map_err(|error| {
        tally.runtime_error(&error);
        LoxError::from(error)
    })
}
