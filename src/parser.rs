use std::fmt::Display;

use log::debug;
use thiserror::Error;

use crate::prelude::*;

/// A syntax error, attributed to the token where it was detected. Lexical
/// errors carry the scanner's `TokenType::Error` token.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub token: Token,
}

impl ParseError {
    pub fn new(token: Token, message: impl Into<String>) -> Self {
        Self { message: message.into(), token }
    }

    /// Where the error happened, in the form used by diagnostics: empty for
    /// lexical errors, `" at end"` at EOF and `" at '<lexeme>'"` otherwise.
    pub fn location(&self) -> String {
        match self.token.token_type {
            TokenType::EOF => " at end".to_owned(),
            TokenType::Error => String::new(),
            _ => format!(" at '{}'", self.token.lexeme),
        }
    }
}

/// Every diagnostic collected while parsing one source, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseErrors(pub Vec<ParseError>);

impl ParseErrors {
    pub fn iter(&self) -> std::slice::Iter<'_, ParseError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for ParseErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.as_slice() {
            [] => write!(f, "no errors"),
            [only] => write!(f, "{only}"),
            [first, _] => write!(f, "{first} (and 1 more error)"),
            [first, rest @ ..] => write!(f, "{first} (and {} more errors)", rest.len()),
        }
    }
}

impl std::error::Error for ParseErrors {}

impl IntoIterator for ParseErrors {
    type Item = ParseError;
    type IntoIter = std::vec::IntoIter<ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

type ParseResult<T> = Result<T, ParseError>;

/// Scan and parse `source`. Lexical errors are split off the token stream
/// before parsing and reported ahead of the syntax errors.
pub fn parse_source(source: &str) -> Result<Vec<Stmt>, ParseErrors> {
    let (lexical, tokens): (Vec<_>, Vec<_>) = Scanner::new(source)
        .scan_tokens()
        .into_iter()
        .partition(|t| t.token_type == TokenType::Error);

    let mut errors: Vec<_> = lexical
        .into_iter()
        .map(|t| ParseError::new(t.clone(), t.lexeme))
        .collect();

    let (statements, syntax) = Parser::new(tokens).parse();
    errors.extend(syntax);

    if errors.is_empty() {
        Ok(statements)
    } else {
        Err(ParseErrors(errors))
    }
}

/// Deepest allowed nesting of groups, unary operators, assignments, blocks
/// and chained binary operators. Bounds the height of every syntax tree.
pub const MAX_NESTING: usize = 200;

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
    errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.token_type) != Some(TokenType::EOF) {
            let line = tokens.last().map_or(1, |t| t.line);
            tokens.push(Token::new(TokenType::EOF, "", line));
        }

        Self { tokens, current: 0, depth: 0, errors: vec![] }
    }

    /// Parse every declaration up to EOF. A declaration that fails to parse
    /// is left out of the result and its error is collected instead.
    pub fn parse(&mut self) -> (Vec<Stmt>, Vec<ParseError>) {
        let mut statements = vec![];
        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        debug!("parsed {} statements, {} errors", statements.len(), self.errors.len());
        (statements, std::mem::take(&mut self.errors))
    }

    fn declaration(&mut self) -> Option<Stmt> {
        let result = if self.match_tt(&[TokenType::Var]) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(e) => {
                self.errors.push(e);
                self.synchronize();
                None
            }
        }
    }

    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(TokenType::Identifier, "Expect variable name")?;

        let initializer = if self.match_tt(&[TokenType::Equal]) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::Semicolon, "Expect ';' after variable declaration")?;

        Ok(Stmt::Var { name, initializer })
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        if self.match_tt(&[TokenType::Print]) {
            self.print_statement()
        } else if self.match_tt(&[TokenType::LeftBrace]) {
            Ok(Stmt::Block { statements: self.nested(Self::block)? })
        } else {
            self.expression_statement()
        }
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(TokenType::Semicolon, "Expect ';' after value")?;
        Ok(Stmt::Print { expr })
    }

    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = vec![];

        // Broken declarations inside the block recover on their own
        while !self.check(TokenType::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.consume(TokenType::RightBrace, "Expect '}' after block")?;
        Ok(statements)
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(TokenType::Semicolon, "Expect ';' after expression")?;
        Ok(Stmt::Expression { expr })
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.equality()?;

        if self.match_tt(&[TokenType::Equal]) {
            let equals = self.previous();
            let value = self.nested(Self::assignment)?;
            if let Expr::Variable { name } = expr {
                return Ok(Expr::Assignment { name, value: Box::new(value) });
            }

            // Not worth unwinding the statement for, just record it
            self.errors.push(ParseError::new(equals, "Invalid assignment target"));
        }

        Ok(expr)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        self.binary(&[TokenType::BangEqual, TokenType::EqualEqual], Self::comparison)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        self.binary(
            &[TokenType::GreaterEqual, TokenType::Greater, TokenType::LessEqual, TokenType::Less],
            Self::term,
        )
    }

    fn term(&mut self) -> ParseResult<Expr> {
        self.binary(&[TokenType::Minus, TokenType::Plus], Self::factor)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        self.binary(&[TokenType::Slash, TokenType::Star], Self::unary)
    }

    /// Left-associative chain of `operand (operator operand)*`. Every fold
    /// makes the tree one level deeper.
    fn binary(
        &mut self,
        operators: &[TokenType],
        operand: fn(&mut Self) -> ParseResult<Expr>,
    ) -> ParseResult<Expr> {
        let outer = self.depth;
        let result = self.fold_binary(operators, operand);
        self.depth = outer;
        result
    }

    fn fold_binary(
        &mut self,
        operators: &[TokenType],
        operand: fn(&mut Self) -> ParseResult<Expr>,
    ) -> ParseResult<Expr> {
        let mut expr = operand(self)?;

        while self.match_tt(operators) {
            let operator = self.previous();
            self.enter()?;
            let right = operand(self)?;
            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }
        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if self.match_tt(&[TokenType::Bang, TokenType::Minus]) {
            let operator = self.previous();
            let right = self.nested(Self::unary)?;
            return Ok(Expr::Unary { operator, right: Box::new(right) });
        }

        self.primary()
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        if self.match_tt(&[
            TokenType::False,
            TokenType::True,
            TokenType::Nil,
            TokenType::Number,
            TokenType::StringLiteral,
        ]) {
            return Ok(Expr::Literal { value: self.previous() });
        }
        if self.match_tt(&[TokenType::Identifier]) {
            return Ok(Expr::Variable { name: self.previous() });
        }
        if self.match_tt(&[TokenType::LeftParen]) {
            let expr = self.nested(Self::expression)?;
            self.consume(TokenType::RightParen, "Expect ')' after expression")?;
            return Ok(Expr::Grouping { expr: Box::new(expr) });
        }

        Err(ParseError::new(self.peek().clone(), "Expect expression"))
    }

    /// Run `rule` one level deeper than the current one.
    fn nested<T>(&mut self, rule: fn(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        let outer = self.depth;
        let result = match self.enter() {
            Ok(()) => rule(self),
            Err(e) => Err(e),
        };
        self.depth = outer;
        result
    }

    /// Fail at the token just consumed once nesting hits `MAX_NESTING`.
    fn enter(&mut self) -> ParseResult<()> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::new(self.previous(), "Too much nesting"));
        }
        self.depth += 1;
        Ok(())
    }

    /// Return the next token if its `token_type` matches the given type as input.
    /// Otherwise, fail with the given message at the next token.
    fn consume(&mut self, token_type: TokenType, message: &str) -> ParseResult<Token> {
        if self.check(token_type) {
            return Ok(self.advance());
        }

        Err(ParseError::new(self.peek().clone(), message))
    }

    fn match_tt(&mut self, types: &[TokenType]) -> bool {
        if types.iter().any(|&tt| self.check(tt)) {
            self.advance();
            return true;
        }

        false
    }

    /// Check to see if the next token's type matches the given `token_type`.
    fn check(&self, token_type: TokenType) -> bool {
        !self.is_at_end() && self.peek().token_type == token_type
    }

    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().token_type == TokenType::EOF
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> Token {
        self.tokens[self.current.saturating_sub(1)].clone()
    }

    fn synchronize(&mut self) {
        self.advance();

        // Move and discard tokens until we find a statement boundary
        while !self.is_at_end() {
            if self.previous().token_type == TokenType::Semicolon {
                return;
            }

            match self.peek().token_type {
                TokenType::Class
                | TokenType::Fun
                | TokenType::Var
                | TokenType::For
                | TokenType::If
                | TokenType::While
                | TokenType::Print
                | TokenType::Return => return,
                _ => {}
            }

            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn errors(source: &str) -> Vec<(String, String)> {
        match parse_source(source) {
            Ok(_) => vec![],
            Err(errors) => errors.into_iter().map(|e| (e.message, e.token.lexeme)).collect(),
        }
    }

    fn error(message: &str, lexeme: &str) -> (String, String) {
        (message.to_owned(), lexeme.to_owned())
    }

    #[test]
    fn empty_source_has_no_statements() {
        assert_eq!(parse_source(""), Ok(vec![]));
        assert_eq!(parse_source("// only a comment\n"), Ok(vec![]));
    }

    #[test]
    fn binary_levels_are_left_associative() {
        let stmts = parse_source("1 - 2 - 3;").unwrap();
        let Stmt::Expression { expr: Expr::Binary { left, right, .. } } = &stmts[0] else {
            panic!("expected a binary expression, got {stmts:?}");
        };
        assert!(matches!(left.as_ref(), Expr::Binary { .. }));
        assert!(matches!(right.as_ref(), Expr::Literal { .. }));
    }

    #[test]
    fn assignment_is_right_associative() {
        let stmts = parse_source("a = b = 1;").unwrap();
        let Stmt::Expression { expr: Expr::Assignment { name, value } } = &stmts[0] else {
            panic!("expected an assignment, got {stmts:?}");
        };
        assert_eq!(name.lexeme, "a");
        assert!(matches!(value.as_ref(), Expr::Assignment { name, .. } if name.lexeme == "b"));
    }

    #[test]
    fn invalid_assignment_target() {
        assert_eq!(errors("1 = 2;"), vec![error("Invalid assignment target", "=")]);
        assert_eq!(errors("(a) = 2;"), vec![error("Invalid assignment target", "=")]);
        assert_eq!(errors("a + b = 2;"), vec![error("Invalid assignment target", "=")]);
    }

    #[test]
    fn one_error_per_broken_statement() {
        assert_eq!(
            errors("var = 1; print ;"),
            vec![error("Expect variable name", "="), error("Expect expression", ";")]
        );
    }

    #[test]
    fn recovery_stops_before_statement_keywords() {
        assert_eq!(
            errors("1 2 var a = 1; print a +;"),
            vec![error("Expect ';' after expression", "2"), error("Expect expression", ";")]
        );
    }

    #[test]
    fn missing_tokens() {
        assert_eq!(errors("print 1"), vec![error("Expect ';' after value", "")]);
        assert_eq!(errors("(1 + 2;"), vec![error("Expect ')' after expression", ";")]);
        assert_eq!(errors("{ var a = 1;"), vec![error("Expect '}' after block", "")]);
        assert_eq!(errors("var a = 1"), vec![error("Expect ';' after variable declaration", "")]);
        assert_eq!(errors("a"), vec![error("Expect ';' after expression", "")]);
    }

    #[test]
    fn errors_inside_a_block_do_not_abort_it() {
        assert_eq!(
            errors("{ print ; print 1; }"),
            vec![error("Expect expression", ";")]
        );
    }

    #[test]
    fn lexical_errors_come_first() {
        let errors = parse_source("print 1 +;\n@").unwrap_err();
        let located: Vec<_> = errors.iter().map(|e| (e.message.as_str(), e.location())).collect();
        assert_eq!(
            located,
            vec![("Unexpected character", String::new()), ("Expect expression", " at ';'".to_owned())]
        );
    }

    #[test]
    fn nesting_is_bounded() {
        let unary = format!("print {}1;", "-".repeat(50_000));
        assert_eq!(errors(&unary), vec![error("Too much nesting", "-")]);

        let groups = format!("print {}1{};", "(".repeat(50_000), ")".repeat(50_000));
        assert_eq!(errors(&groups), vec![error("Too much nesting", "(")]);

        let chain = format!("print 1{};", " + 1".repeat(50_000));
        assert_eq!(errors(&chain), vec![error("Too much nesting", "+")]);

        let assignments = format!("{}1;", "a = ".repeat(50_000));
        assert_eq!(errors(&assignments), vec![error("Too much nesting", "=")]);
    }

    #[test]
    fn nesting_below_the_limit_parses() {
        let unary = format!("print {}1;", "!".repeat(MAX_NESTING - 1));
        assert!(parse_source(&unary).is_ok());

        let chain = format!("print 1{};", " * 2".repeat(MAX_NESTING - 1));
        assert!(parse_source(&chain).is_ok());
    }

    #[test]
    fn error_list_display() {
        let token = Token::new(TokenType::EOF, "", 1);
        let one = ParseError::new(token, "first");
        assert_eq!(ParseErrors(vec![]).to_string(), "no errors");
        assert_eq!(ParseErrors(vec![one.clone()]).to_string(), "first");
        assert_eq!(ParseErrors(vec![one.clone(), one.clone()]).to_string(), "first (and 1 more error)");
        assert_eq!(ParseErrors(vec![one.clone(), one.clone(), one]).to_string(), "first (and 2 more errors)");
    }
}
