//! Expression AST - the core of SQL expression building.
//!
//! This module provides a strongly-typed AST for SQL expressions
//! with exhaustive pattern matching enforced by the compiler.

use super::{SqlWriter, Value};

// =============================================================================
// Expression AST
// =============================================================================

/// A SQL expression.
///
/// Every variant must be handled in `write_to()` - the compiler enforces this.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference: table.column (table is always an alias we control)
    Column { table: String, column: String },

    /// Bare identifier, e.g. a reference to a SELECT alias.
    Ident(String),

    /// Integer literal emitted inline.
    Integer(i64),

    /// String literal emitted inline.
    ///
    /// Only for trusted constants (format strings and the like). Caller
    /// values go through [`Expr::Param`].
    Str(String),

    /// Bound positional parameter.
    Param(Value),

    /// Function call: name(args...)
    Function {
        name: String,
        args: Vec<Expr>,
        distinct: bool,
    },

    /// `*`
    Star,

    /// Binary operation: left op right
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    /// IN: expr IN (values...)
    In {
        expr: Box<Expr>,
        values: Vec<Expr>,
        negated: bool,
    },

    /// IS NULL / IS NOT NULL
    IsNull { expr: Box<Expr>, negated: bool },

    /// Parenthesized expression
    Paren(Box<Expr>),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    NotEq,
    And,
    Or,
}

impl BinaryOperator {
    fn as_sql(&self) -> &'static str {
        match self {
            BinaryOperator::Eq => "=",
            BinaryOperator::NotEq => "<>",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
        }
    }
}

// =============================================================================
// Constructors
// =============================================================================

/// Qualified column reference.
pub fn col(table: &str, column: &str) -> Expr {
    Expr::Column {
        table: table.into(),
        column: column.into(),
    }
}

/// Bare (quoted) identifier.
pub fn ident(name: &str) -> Expr {
    Expr::Ident(name.into())
}

/// Bound parameter.
pub fn param(value: Value) -> Expr {
    Expr::Param(value)
}

/// Function call.
pub fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.into(),
        args,
        distinct: false,
    }
}

pub fn count_star() -> Expr {
    func("COUNT", vec![Expr::Star])
}

pub fn count_distinct(expr: Expr) -> Expr {
    Expr::Function {
        name: "COUNT".into(),
        args: vec![expr],
        distinct: true,
    }
}

pub fn sum(expr: Expr) -> Expr {
    func("SUM", vec![expr])
}

pub fn coalesce(args: Vec<Expr>) -> Expr {
    func("COALESCE", args)
}

// =============================================================================
// Combinators
// =============================================================================

impl Expr {
    pub fn eq(self, other: Expr) -> Expr {
        self.binary(BinaryOperator::Eq, other)
    }

    pub fn and(self, other: Expr) -> Expr {
        self.binary(BinaryOperator::And, other)
    }

    pub fn or(self, other: Expr) -> Expr {
        self.binary(BinaryOperator::Or, other)
    }

    pub fn is_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self),
            negated: false,
        }
    }

    pub fn in_list(self, values: Vec<Expr>) -> Expr {
        Expr::In {
            expr: Box::new(self),
            values,
            negated: false,
        }
    }

    pub fn paren(self) -> Expr {
        Expr::Paren(Box::new(self))
    }

    /// AND together a list of expressions. `None` when the list is empty.
    pub fn conjunction(exprs: impl IntoIterator<Item = Expr>) -> Option<Expr> {
        exprs.into_iter().reduce(Expr::and)
    }

    /// An expression that is never true.
    pub fn never() -> Expr {
        Expr::Integer(0).eq(Expr::Integer(1))
    }

    fn binary(self, op: BinaryOperator, right: Expr) -> Expr {
        Expr::BinaryOp {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }

    pub(crate) fn write_to(&self, w: &mut SqlWriter) {
        match self {
            Expr::Column { table, column } => {
                w.ident(table).push(".").ident(column);
            }
            Expr::Ident(name) => {
                w.ident(name);
            }
            Expr::Integer(n) => {
                w.push(&n.to_string());
            }
            Expr::Str(s) => {
                w.push("'").push(&s.replace('\'', "''")).push("'");
            }
            Expr::Param(value) => {
                w.bind(value);
            }
            Expr::Function {
                name,
                args,
                distinct,
            } => {
                w.push(name).push("(");
                if *distinct {
                    w.push("DISTINCT ");
                }
                write_list(w, args);
                w.push(")");
            }
            Expr::Star => {
                w.push("*");
            }
            Expr::BinaryOp { left, op, right } => {
                write_operand(w, left, *op);
                w.push(" ").push(op.as_sql()).push(" ");
                write_operand(w, right, *op);
            }
            Expr::In {
                expr,
                values,
                negated,
            } => {
                expr.write_to(w);
                w.push(if *negated { " NOT IN (" } else { " IN (" });
                write_list(w, values);
                w.push(")");
            }
            Expr::IsNull { expr, negated } => {
                expr.write_to(w);
                w.push(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Expr::Paren(inner) => {
                w.push("(");
                inner.write_to(w);
                w.push(")");
            }
        }
    }
}

fn write_list(w: &mut SqlWriter, exprs: &[Expr]) {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            w.push(", ");
        }
        expr.write_to(w);
    }
}

/// OR nested under AND needs parentheses.
fn write_operand(w: &mut SqlWriter, operand: &Expr, parent: BinaryOperator) {
    let needs_parens = matches!(
        (operand, parent),
        (
            Expr::BinaryOp {
                op: BinaryOperator::Or,
                ..
            },
            BinaryOperator::And
        )
    );
    if needs_parens {
        w.push("(");
        operand.write_to(w);
        w.push(")");
    } else {
        operand.write_to(w);
    }
}
