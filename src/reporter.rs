use std::io::Write;

use crate::error::{RuntimeError, SyntaxError};
use crate::scanner::{Token, TokenType};

/// Receives every user-visible diagnostic. The interpreter core never prints errors itself.
pub trait Reporter {
    fn report(&mut self, line: u32, location: &str, message: &str);

    fn runtime_error(&mut self, error: &RuntimeError);

    // parser errors are anchored to a token rather than a bare line
    fn token_error(&mut self, token: &Token, message: &str) {
        if token.token_type == TokenType::Eof {
            self.report(token.line, " at end", message);
        } else {
            self.report(token.line, &format!(" at '{}'", token.lexeme), message);
        }
    }
}

/// Destination of `print` statement output.
pub trait OutputSink {
    fn print(&mut self, text: &str);
}

impl<W: Write> OutputSink for W {
    fn print(&mut self, text: &str) {
        if let Err(error) = writeln!(self, "{text}") {
            tracing::warn!(%error, "failed to write program output");
        }
    }
}

/// Prints diagnostics to stderr in the conventional Lox format.
#[derive(Debug, Default)]
pub struct StderrReporter;

impl StderrReporter {
    pub fn new() -> StderrReporter {
        StderrReporter
    }
}

impl Reporter for StderrReporter {
    fn report(&mut self, line: u32, location: &str, message: &str) {
        eprintln!("{}", SyntaxError::new(line, location, message));
    }

    fn runtime_error(&mut self, error: &RuntimeError) {
        eprintln!("{error}");
    }
}

/// Keeps diagnostics in memory, for embedding hosts and tests.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub syntax_errors: Vec<SyntaxError>,
    pub runtime_errors: Vec<RuntimeError>,
}

impl CollectingReporter {
    pub fn new() -> CollectingReporter {
        CollectingReporter::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.syntax_errors
            .iter()
            .map(|error| error.to_string())
            .chain(self.runtime_errors.iter().map(|error| error.to_string()))
            .collect()
    }
}

impl Reporter for CollectingReporter {
    fn report(&mut self, line: u32, location: &str, message: &str) {
        self.syntax_errors.push(SyntaxError::new(line, location, message));
    }

    fn runtime_error(&mut self, error: &RuntimeError) {
        self.runtime_errors.push(error.clone());
    }
}

/// Counts syntax reports passing through to the host reporter, so the pipeline can refuse
/// to run a program that failed to scan or parse.
pub(crate) struct Tally<'a> {
    inner: &'a mut dyn Reporter,
    pub errors: usize,
}

impl<'a> Tally<'a> {
    pub fn new(inner: &'a mut dyn Reporter) -> Tally<'a> {
        Tally { inner, errors: 0 }
    }
}

impl<'a> Reporter for Tally<'a> {
    fn report(&mut self, line: u32, location: &str, message: &str) {
        self.errors += 1;
        self.inner.report(line, location, message);
    }

    fn runtime_error(&mut self, error: &RuntimeError) {
        self.inner.runtime_error(error);
    }
}
