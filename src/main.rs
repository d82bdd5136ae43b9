use std::ffi::OsString;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use linnet::error::{GenericResult, LoxError};
use linnet::reporter::{CollectingReporter, OutputSink, Reporter, StderrReporter};
use linnet::{parser, scanner};
use linnet::Interpreter;

// sysexits codes conventionally used by Lox hosts
const EXIT_USAGE: u8 = 64;
const EXIT_DATA_ERROR: u8 = 65;
const EXIT_SOFTWARE: u8 = 70;
const EXIT_IO_ERROR: u8 = 74;

/// Tree-walking interpreter for a subset of Lox. Runs a script, or starts an interactive
/// prompt when no script is given.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path of the script to run.
    script: Option<PathBuf>,
}

fn main() -> ExitCode {
    init_tracing();

    let args = match parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(code) => return ExitCode::from(code),
    };

    match args.script {
        Some(path) => ExitCode::from(run_file(&path)),
        None => match run_prompt() {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("{error}");
                ExitCode::from(EXIT_IO_ERROR)
            }
        },
    }
}

// help and version requests exit cleanly, anything else clap rejects is a usage error
fn parse_args<I, T>(args: I) -> Result<Args, u8>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Args::try_parse_from(args).map_err(|error| {
        let _ = error.print();
        if error.use_stderr() {
            EXIT_USAGE
        } else {
            0
        }
    })
}

// Only installs a subscriber when RUST_LOG is set, e.g. RUST_LOG=linnet=trace
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn run_file(path: &Path) -> u8 {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) => {
            eprintln!("Could not read script '{}': {error}", path.display());
            return EXIT_IO_ERROR;
        }
    };

    run_script(&contents, &mut io::stdout().lock(), &mut StderrReporter::new())
}

fn run_script(code: &str, output: &mut dyn OutputSink, reporter: &mut dyn Reporter) -> u8 {
    let mut interpreter = Interpreter::new(output);
    match linnet::execute(code, &mut interpreter, reporter) {
        Ok(()) => 0,
        Err(LoxError::Syntax { .. }) => EXIT_DATA_ERROR,
        Err(LoxError::Runtime(_)) => EXIT_SOFTWARE,
    }
}

fn run_prompt() -> GenericResult<()> {
    let stdin = io::stdin();
    let mut output = io::stdout();
    let mut reporter = StderrReporter::new();
    let mut interpreter = Interpreter::new(&mut output);
    let mut buffer = String::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        buffer.clear();
        if stdin.lock().read_line(&mut buffer)? == 0 {
            // end of input
            println!();
            return Ok(());
        }

        let line = buffer.trim_end();
        if is_bare_expression(line) {
            if let Ok(value) = linnet::evaluate(line, &mut interpreter, &mut reporter) {
                println!("{value}");
            }
        } else if let Err(error) = linnet::execute(line, &mut interpreter, &mut reporter) {
            // already reported; the session carries on with its globals intact
            tracing::debug!(%error, "prompt line failed");
        }
    }
}

// parse silently so that statements don't produce expression diagnostics
fn is_bare_expression(line: &str) -> bool {
    let mut quiet = CollectingReporter::new();
    let tokens = scanner::scan_tokens(line, &mut quiet);
    parser::parse_expression(&tokens, &mut quiet).is_some() && quiet.syntax_errors.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn status_of(code: &str) -> (u8, String, Vec<String>) {
        let mut output: Vec<u8> = Vec::new();
        let mut reporter = CollectingReporter::new();
        let status = run_script(code, &mut output, &mut reporter);
        let output = String::from_utf8(output).expect("program output should be utf-8");
        (status, output, reporter.messages())
    }

    #[test]
    fn successful_script_exits_cleanly() {
        assert_eq!((0, "3\n".to_string(), vec![]), status_of("print 1 + 2;"));
    }

    #[test]
    fn syntax_error_exits_with_data_error() {
        let (status, output, messages) = status_of("print 1;\nprint ;");
        assert_eq!(EXIT_DATA_ERROR, status);
        assert_eq!("", output);
        assert_eq!(vec!["[line 2] Error at ';': Expect expression.".to_string()], messages);
    }

    #[test]
    fn runtime_error_exits_with_software_error() {
        let (status, output, messages) = status_of("print 1;\nprint -\"a\";");
        assert_eq!(EXIT_SOFTWARE, status);
        assert_eq!("1\n", output);
        assert_eq!(vec!["Operand must be a number.\n[line 2]".to_string()], messages);
    }

    #[test]
    fn unreadable_script_exits_with_io_error() {
        let path = std::env::temp_dir().join("linnet-missing-script-for-tests.lox");
        assert_eq!(EXIT_IO_ERROR, run_file(&path));
    }

    #[test]
    fn extra_arguments_are_a_usage_error() {
        assert_eq!(EXIT_USAGE, parse_args(["linnet", "a.lox", "b.lox"]).unwrap_err());
        let args = parse_args(["linnet", "a.lox"]).expect("one script is accepted");
        assert_eq!(Some(PathBuf::from("a.lox")), args.script);
    }
}
