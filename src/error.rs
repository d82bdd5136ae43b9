use std::result;

use thiserror::Error;

use crate::scanner::Token;

pub type GenericResult<T> = result::Result<T, Box<dyn std::error::Error>>;
pub type RuntimeResult<T> = result::Result<T, RuntimeError>;

/// A lexical or syntax error, attributed to a source line.
///
/// `location` is empty for scanner errors, `" at end"` when the parser ran out of tokens,
/// and `" at '<lexeme>'"` otherwise.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("[line {line}] Error{location}: {message}")]
pub struct SyntaxError {
    pub line: u32,
    pub location: String,
    pub message: String,
}

impl SyntaxError {
    pub fn new(line: u32, location: &str, message: &str) -> SyntaxError {
        SyntaxError {
            line,
            location: location.to_string(),
            message: message.to_string(),
        }
    }
}

/// An error raised while executing a program. Always anchored to the token that triggered it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}\n[line {line}]")]
pub struct RuntimeError {
    pub line: u32,
    pub lexeme: String,
    pub message: String,
}

impl RuntimeError {
    pub fn new(token: &Token, message: &str) -> RuntimeError {
        RuntimeError {
            line: token.line,
            lexeme: token.lexeme.clone(),
            message: message.to_string(),
        }
    }
}

/// Outcome of a failed run as seen by the host.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoxError {
    // details were already handed to the reporter
    #[error("{count} syntax error(s), program was not run")]
    Syntax { count: usize },
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
