use std::io::Write;

use crate::prelude::*;

/// Renders diagnostics onto an error stream and remembers what kind of
/// failure it has seen.
pub struct ErrorReporter<'a> {
    stream: &'a mut dyn Write,
    pub had_error: bool,
    pub had_runtime_error: bool,
}

impl<'a> ErrorReporter<'a> {
    pub fn new(stream: &'a mut dyn Write) -> Self {
        Self { stream, had_error: false, had_runtime_error: false }
    }

    /// `[line L] Error<location>: <message>.`
    pub fn report(&mut self, line: u32, location: &str, message: &str) -> std::io::Result<()> {
        self.had_error = true;
        writeln!(self.stream, "[line {line}] Error{location}: {message}.")
    }

    pub fn parse_error(&mut self, e: &ParseError) -> std::io::Result<()> {
        self.report(e.token.line, &e.location(), &e.message)
    }

    /// `<message>.` followed by `[line L]` on its own line.
    pub fn runtime_error(&mut self, line: u32, message: &str) -> std::io::Result<()> {
        self.had_runtime_error = true;
        writeln!(self.stream, "{message}.\n[line {line}]")
    }

    /// The exit status for everything reported so far.
    pub fn status(&self) -> ExitStatus {
        if self.had_error {
            ExitStatus::CompileError
        } else if self.had_runtime_error {
            ExitStatus::RuntimeError
        } else {
            ExitStatus::Ok
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut ErrorReporter<'_>) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        let mut reporter = ErrorReporter::new(&mut buf);
        f(&mut reporter).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn status_follows_what_was_reported() {
        let mut buf = Vec::new();
        let mut reporter = ErrorReporter::new(&mut buf);
        assert_eq!(reporter.status(), ExitStatus::Ok);

        reporter.runtime_error(3, "Operand must be a number").unwrap();
        assert_eq!(reporter.status(), ExitStatus::RuntimeError);

        reporter.report(1, "", "Unexpected character").unwrap();
        assert_eq!(reporter.status(), ExitStatus::CompileError);
    }

    #[test]
    fn parse_error_locations() {
        let at_token = ParseError::new(Token::new(TokenType::Semicolon, ";", 2), "Expect expression");
        let at_end = ParseError::new(Token::new(TokenType::EOF, "", 4), "Expect ';' after value");
        let lexical = ParseError::new(Token::error("Unexpected character", 1), "Unexpected character");

        assert_eq!(
            render(|r| r.parse_error(&at_token)),
            "[line 2] Error at ';': Expect expression.\n"
        );
        assert_eq!(
            render(|r| r.parse_error(&at_end)),
            "[line 4] Error at end: Expect ';' after value.\n"
        );
        assert_eq!(
            render(|r| r.parse_error(&lexical)),
            "[line 1] Error: Unexpected character.\n"
        );
    }

    #[test]
    fn runtime_error_format() {
        assert_eq!(
            render(|r| r.runtime_error(3, "Operands must be numbers")),
            "Operands must be numbers.\n[line 3]\n"
        );
    }
}
