mod error;
mod expr;
mod stmt;

use std::io::Write;

use log::debug;

pub use error::RuntimeError;

use crate::prelude::*;

type InterpreterResult = Result<Object, RuntimeError>;

/// Tree-walking evaluator. Borrows the caller's environment for the duration
/// of a run, so global bindings outlive the interpreter.
pub struct Interpreter<'a> {
    environment: &'a mut Environment,
    out: &'a mut dyn Write,
}

impl<'a> Interpreter<'a> {
    pub fn new(environment: &'a mut Environment, out: &'a mut dyn Write) -> Self {
        Self { environment, out }
    }

    /// Execute `statements` in order, stopping at the first runtime error.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        debug!("interpreting {} statements", statements.len());

        for stmt in statements {
            self.execute(stmt)?;
        }

        Ok(())
    }
}
