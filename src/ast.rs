use crate::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Assignment {
        name: Token,
        value: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Grouping {
        expr: Box<Expr>,
    },
    /// Keeps the literal's token; the runtime value is derived from its lexeme.
    Literal {
        value: Token,
    },
    Unary {
        operator: Token,
        right: Box<Expr>,
    },
    Variable {
        name: Token,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block { statements: Vec<Stmt> },
    Expression { expr: Expr },
    Print { expr: Expr },
    Var { name: Token, initializer: Option<Expr> },
}

/// Borrowed view of any AST node, statement or expression.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Stmt(&'a Stmt),
    Expr(&'a Expr),
}

impl<'a> From<&'a Stmt> for Node<'a> {
    fn from(stmt: &'a Stmt) -> Self {
        Node::Stmt(stmt)
    }
}

impl<'a> From<&'a Expr> for Node<'a> {
    fn from(expr: &'a Expr) -> Self {
        Node::Expr(expr)
    }
}

impl<'a> Node<'a> {
    /// Immediate children in evaluation order.
    pub fn children(&self) -> Vec<Node<'a>> {
        match *self {
            Node::Stmt(stmt) => match stmt {
                Stmt::Block { statements } => statements.iter().map(Node::Stmt).collect(),
                Stmt::Expression { expr } | Stmt::Print { expr } => vec![Node::Expr(expr)],
                Stmt::Var { initializer, .. } => {
                    initializer.iter().map(Node::Expr).collect()
                }
            },
            Node::Expr(expr) => match expr {
                Expr::Assignment { value, .. } => vec![Node::Expr(value)],
                Expr::Binary { left, right, .. } => vec![Node::Expr(left), Node::Expr(right)],
                Expr::Grouping { expr } => vec![Node::Expr(expr)],
                Expr::Unary { right, .. } => vec![Node::Expr(right)],
                Expr::Literal { .. } | Expr::Variable { .. } => vec![],
            },
        }
    }
}

/// Returned by a [`Visitor`] to tell [`walk`] whether to descend into the
/// children of the node it just visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    Skip,
}

pub trait Visitor {
    fn visit(&mut self, node: Node<'_>) -> Walk;
}

/// Pre-order, depth-first traversal starting at `node`.
pub fn walk<'a, V: Visitor + ?Sized>(visitor: &mut V, node: impl Into<Node<'a>>) {
    let node = node.into();
    if visitor.visit(node) == Walk::Skip {
        return;
    }

    for child in node.children() {
        walk(visitor, child);
    }
}
