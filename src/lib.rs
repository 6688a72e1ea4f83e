#![allow(clippy::new_without_default)]

mod ast;
mod environment;
mod error;
mod interpreter;
mod object;
mod parser;
mod printer;
mod scanner;
mod token;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::environment::{Environment, ScopeId};
    pub use crate::error::ErrorReporter;
    pub use crate::interpreter::*;
    pub use crate::object::*;
    pub use crate::parser::*;
    pub use crate::printer::AstPrinter;
    pub use crate::scanner::*;
    pub use crate::token::*;
    pub use crate::{run_source, ExitStatus};
}

use std::io::{self, BufRead, Write};

use anyhow::Context;
use log::debug;

use prelude::{parse_source, Environment, ErrorReporter, Interpreter, RuntimeError};

/// Outcome of running one source text, with the exit code a driver should
/// report for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Ok = 0,
    CompileError = 65,
    RuntimeError = 70,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Scan, parse and run `source` against `globals`.
///
/// Program output goes to `out` and diagnostics to `err`. Syntax errors are
/// all reported and nothing runs; a runtime error is reported and stops the
/// run. Bindings made at the top level stay in `globals` for the next call.
/// An `Err` means the host itself failed, e.g. `out` could not be written.
pub fn run_source(
    globals: &mut Environment,
    source: &str,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> anyhow::Result<ExitStatus> {
    let mut reporter = ErrorReporter::new(err);

    let statements = match parse_source(source) {
        Ok(stmts) => stmts,
        Err(errors) => {
            debug!("{} compile errors: {errors}", errors.len());
            for e in errors.iter() {
                reporter.parse_error(e)?;
            }
            vec![]
        }
    };

    if reporter.had_error {
        return Ok(reporter.status());
    }

    match Interpreter::new(globals, out).interpret(&statements) {
        Ok(()) => {}
        Err(RuntimeError::Generic { line, msg }) => reporter.runtime_error(line, &msg)?,
        Err(e) => return Err(e.into()),
    }

    Ok(reporter.status())
}

/// A session bound to stdout and stderr. Globals persist across runs.
pub struct Lox {
    globals: Environment,
}

impl Lox {
    pub fn new() -> Self {
        Self { globals: Environment::new() }
    }

    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    pub fn run(&mut self, source: &str) -> anyhow::Result<ExitStatus> {
        run_source(&mut self.globals, source, &mut io::stdout().lock(), &mut io::stderr().lock())
    }

    pub fn run_file(&mut self, filename: &str) -> anyhow::Result<ExitStatus> {
        let content = std::fs::read_to_string(filename)
            .with_context(|| format!("Could not read file '{filename}'"))?;
        self.run(&content)
    }

    /// Read and run one line at a time until stdin closes. Errors in a line
    /// are reported and the session goes on.
    pub fn run_prompt(&mut self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();

        loop {
            print!(">> ");
            io::stdout().flush()?;

            let Some(line) = lines.next() else {
                break;
            };
            self.run(&line?)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::Object;

    #[test]
    fn session_keeps_its_globals() {
        let mut lox = Lox::new();
        assert_eq!(lox.run("var answer = 6 * 7;").unwrap(), ExitStatus::Ok);
        assert_eq!(lox.run("answer = answer + 1;").unwrap(), ExitStatus::Ok);
        assert_eq!(lox.globals().get("answer"), Some(&Object::Number(43.0)));
    }

    #[test]
    fn compile_errors_leave_globals_untouched() {
        let mut lox = Lox::new();
        assert_eq!(lox.run("var a = 1; print;").unwrap(), ExitStatus::CompileError);
        assert_eq!(lox.globals().get("a"), None);
    }
}
