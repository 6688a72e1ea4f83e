use super::{InterpreterResult, RuntimeError};
use crate::prelude::*;

impl Interpreter<'_> {
    pub fn evaluate_expr(&mut self, expr: &Expr) -> InterpreterResult {
        match expr {
            Expr::Literal { value } => self.evaluate_literal(value),
            Expr::Grouping { expr: inner } => self.evaluate_expr(inner.as_ref()),
            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),
            Expr::Binary { left, operator, right } => self.evaluate_binary(left, operator, right),
            Expr::Variable { name } => self
                .environment
                .get(&name.lexeme)
                .cloned()
                .ok_or_else(|| undefined_variable(name)),
            Expr::Assignment { name, value } => {
                let value = self.evaluate_expr(value.as_ref())?;

                if !self.environment.assign(&name.lexeme, value.clone()) {
                    return Err(undefined_variable(name));
                }

                Ok(value)
            }
        }
    }

    fn evaluate_literal(&self, token: &Token) -> InterpreterResult {
        match token.token_type {
            TokenType::Nil => Ok(Object::Null),
            TokenType::True => Ok(Object::Boolean(true)),
            TokenType::False => Ok(Object::Boolean(false)),
            TokenType::StringLiteral => {
                // Skip the quote marks
                let lexeme = token.lexeme.as_str();
                let text = lexeme
                    .strip_prefix('"')
                    .and_then(|s| s.strip_suffix('"'))
                    .unwrap_or(lexeme);
                Ok(Object::String(text.to_owned()))
            }
            TokenType::Number => token
                .lexeme
                .parse::<f64>()
                .map(Object::Number)
                .map_err(|_| RuntimeError::error(token.line, "Invalid number literal")),
            _ => Err(RuntimeError::error(token.line, "Invalid literal")),
        }
    }

    fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> InterpreterResult {
        let value = self.evaluate_expr(right)?;
        match operator.token_type {
            TokenType::Minus => {
                if let Object::Number(n) = value {
                    Ok(Object::Number(-n))
                } else {
                    Err(RuntimeError::error(operator.line, "Operand must be a number"))
                }
            }
            TokenType::Bang => Ok(Object::Boolean(!value.is_truthy())),

            // Unreachable code. We don't have any unary expression except the ones above.
            _ => Ok(Object::Null),
        }
    }

    fn evaluate_binary(
        &mut self,
        left: &Expr,
        operator: &Token,
        right: &Expr,
    ) -> InterpreterResult {
        let left_value = self.evaluate_expr(left)?;
        let right_value = self.evaluate_expr(right)?;

        match operator.token_type {
            TokenType::Plus => {
                if let (Some(l), Some(r)) = (left_value.number(), right_value.number()) {
                    Ok(Object::Number(l + r))
                } else if let (Some(l), Some(r)) = (left_value.string(), right_value.string()) {
                    Ok(Object::String(format!("{l}{r}")))
                } else {
                    Err(RuntimeError::error(
                        operator.line,
                        "Operands must be two numbers or two strings",
                    ))
                }
            }
            TokenType::Minus => check_number_operands(operator, &left_value, &right_value)
                .map(|(l, r)| Object::Number(l - r)),
            TokenType::Star => check_number_operands(operator, &left_value, &right_value)
                .map(|(l, r)| Object::Number(l * r)),
            TokenType::Slash => check_number_operands(operator, &left_value, &right_value)
                .map(|(l, r)| Object::Number(l / r)),
            TokenType::Greater => check_number_operands(operator, &left_value, &right_value)
                .map(|(l, r)| Object::Boolean(l > r)),
            TokenType::GreaterEqual => check_number_operands(operator, &left_value, &right_value)
                .map(|(l, r)| Object::Boolean(l >= r)),
            TokenType::Less => check_number_operands(operator, &left_value, &right_value)
                .map(|(l, r)| Object::Boolean(l < r)),
            TokenType::LessEqual => check_number_operands(operator, &left_value, &right_value)
                .map(|(l, r)| Object::Boolean(l <= r)),

            TokenType::EqualEqual => Ok(Object::Boolean(left_value == right_value)),
            TokenType::BangEqual => Ok(Object::Boolean(left_value != right_value)),

            // Unreachable code
            _ => Ok(Object::Null),
        }
    }
}

fn check_number_operands(
    operator: &Token,
    left: &Object,
    right: &Object,
) -> Result<(f64, f64), RuntimeError> {
    if let (Some(l), Some(r)) = (left.number(), right.number()) {
        Ok((l, r))
    } else {
        Err(RuntimeError::error(operator.line, "Operands must be numbers"))
    }
}

fn undefined_variable(name: &Token) -> RuntimeError {
    RuntimeError::error(name.line, format!("Undefined variable '{}'", name.lexeme))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate(source: &str) -> InterpreterResult {
        let mut statements = parse_source(source).expect("failed to parse the source");
        let Some(Stmt::Expression { expr }) = statements.pop() else {
            panic!("statement is not an expression");
        };

        let mut env = Environment::new();
        let mut out = std::io::sink();
        Interpreter::new(&mut env, &mut out).evaluate_expr(&expr)
    }

    fn error_message(source: &str) -> String {
        match evaluate(source) {
            Err(RuntimeError::Generic { msg, .. }) => msg,
            other => panic!("expected a runtime error, got {other:?}"),
        }
    }

    #[test]
    fn string_literal_drops_quotes() {
        assert_eq!(evaluate("\"a b\";").unwrap(), Object::String("a b".to_owned()));
        assert_eq!(evaluate("\"\";").unwrap(), Object::String(String::new()));
    }

    #[test]
    fn division_by_zero_is_not_an_error() {
        assert_eq!(evaluate("1 / 0;").unwrap(), Object::Number(f64::INFINITY));
        assert!(matches!(evaluate("0 / 0;").unwrap(), Object::Number(n) if n.is_nan()));
    }

    #[test]
    fn bang_never_fails() {
        assert_eq!(evaluate("!nil;").unwrap(), Object::Boolean(true));
        assert_eq!(evaluate("!0;").unwrap(), Object::Boolean(false));
        assert_eq!(evaluate("!\"\";").unwrap(), Object::Boolean(false));
    }

    #[test]
    fn type_errors() {
        assert_eq!(error_message("1 + \"a\";"), "Operands must be two numbers or two strings");
        assert_eq!(error_message("nil + nil;"), "Operands must be two numbers or two strings");
        assert_eq!(error_message("\"a\" - \"b\";"), "Operands must be numbers");
        assert_eq!(error_message("true < false;"), "Operands must be numbers");
        assert_eq!(error_message("-\"a\";"), "Operand must be a number");
    }

    #[test]
    fn cross_type_equality_is_false() {
        assert_eq!(evaluate("1 == \"1\";").unwrap(), Object::Boolean(false));
        assert_eq!(evaluate("nil == false;").unwrap(), Object::Boolean(false));
        assert_eq!(evaluate("0 != nil;").unwrap(), Object::Boolean(true));
        assert_eq!(evaluate("3 + 4 == 7;").unwrap(), Object::Boolean(true));
    }

    #[test]
    fn undefined_assignment_reports_the_identifier_line() {
        match evaluate("\n\nmissing = 1;") {
            Err(RuntimeError::Generic { line, msg }) => {
                assert_eq!(line, 3);
                assert_eq!(msg, "Undefined variable 'missing'");
            }
            other => panic!("expected a runtime error, got {other:?}"),
        }
    }
}
