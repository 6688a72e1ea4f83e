use crate::prelude::*;

/// Renders a syntax tree as an indented, branch-drawn text dump:
///
/// ```text
/// PRINT
/// └── BINARY(+)
///     ├── NUMBER(1)
///     └── NUMBER(2)
/// ```
pub struct AstPrinter {
    out: String,
    paddings: Vec<&'static str>,
    last_child: bool,
}

impl AstPrinter {
    pub fn print<'a>(node: impl Into<Node<'a>>) -> String {
        let mut printer = Self { out: String::new(), paddings: vec![], last_child: true };
        walk(&mut printer, node);
        printer.out
    }

    pub fn print_all(statements: &[Stmt]) -> String {
        statements.iter().map(|stmt| Self::print(stmt)).collect()
    }

    fn label(node: Node<'_>) -> String {
        match node {
            Node::Stmt(Stmt::Block { .. }) => "BLOCK".to_owned(),
            Node::Stmt(Stmt::Expression { .. }) => "EXPRESSION".to_owned(),
            Node::Stmt(Stmt::Print { .. }) => "PRINT".to_owned(),
            Node::Stmt(Stmt::Var { name, .. }) => format!("VAR({})", name.lexeme),
            Node::Expr(Expr::Assignment { name, .. }) => format!("ASSIGN({})", name.lexeme),
            Node::Expr(Expr::Binary { operator, .. }) => format!("BINARY({})", operator.lexeme),
            Node::Expr(Expr::Grouping { .. }) => "GROUP".to_owned(),
            Node::Expr(Expr::Literal { value }) => match value.token_type {
                TokenType::Nil => "NIL".to_owned(),
                TokenType::True => "TRUE".to_owned(),
                TokenType::False => "FALSE".to_owned(),
                tt => format!("{tt}({})", value.lexeme),
            },
            Node::Expr(Expr::Unary { operator, .. }) => format!("UNARY({})", operator.lexeme),
            Node::Expr(Expr::Variable { name }) => format!("VARIABLE({})", name.lexeme),
        }
    }
}

impl Visitor for AstPrinter {
    fn visit(&mut self, node: Node<'_>) -> Walk {
        let last_child = self.last_child;

        if let Some((_, outer)) = self.paddings.split_last() {
            outer.iter().for_each(|pad| self.out.push_str(pad));
            self.out.push_str(if last_child { "└── " } else { "├── " });
        }

        self.out.push_str(&Self::label(node));
        self.out.push('\n');

        // Children are walked by hand so each one knows whether it is the last
        let children = node.children();
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.last_child = i + 1 == count;
            self.paddings.push(if self.last_child { "    " } else { "│   " });
            walk(self, child);
            self.paddings.pop();
        }

        self.last_child = last_child;
        Walk::Skip
    }
}
