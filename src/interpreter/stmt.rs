use std::io::Write;

use super::RuntimeError;
use crate::prelude::*;

impl Interpreter<'_> {
    pub fn execute(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Expression { expr } => {
                self.evaluate_expr(expr)?;
            }
            Stmt::Print { expr } => {
                let value = self.evaluate_expr(expr)?;
                writeln!(self.out, "{value}")?;
            }
            Stmt::Var { name, initializer } => {
                let value = if let Some(expr) = initializer {
                    self.evaluate_expr(expr)?
                } else {
                    Object::Null
                };

                self.environment.define(&name.lexeme, value);
            }
            Stmt::Block { statements } => self.execute_block(statements)?,
        };
        Ok(())
    }

    /// Run `statements` in a fresh scope. The scope is left again whether the
    /// block finishes or fails.
    pub fn execute_block(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        self.environment.push_scope();
        let result = statements.iter().try_for_each(|s| self.execute(s));
        self.environment.pop_scope();
        result
    }
}
