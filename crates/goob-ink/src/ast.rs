//! Syntax tree produced by the parser.

// ── Expressions ───────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    NotEq,
    And,
    Or,
}

impl BinOp {
    /// Applies the operator to one pair of lanes.
    ///
    /// Division and modulo by zero yield `0.0`; comparisons and logic yield
    /// `1.0` / `0.0`.
    #[inline]
    pub fn apply(self, l: f64, r: f64) -> f64 {
        match self {
            BinOp::Add => l + r,
            BinOp::Sub => l - r,
            BinOp::Mul => l * r,
            BinOp::Div => if r != 0.0 { l / r } else { 0.0 },
            // `%` on f64 is fmod: sign follows the dividend.
            BinOp::Mod => if r != 0.0 { l % r } else { 0.0 },
            BinOp::Lt => truth(l < r),
            BinOp::Gt => truth(l > r),
            BinOp::LtEq => truth(l <= r),
            BinOp::GtEq => truth(l >= r),
            BinOp::Eq => truth(l == r),
            BinOp::NotEq => truth(l != r),
            BinOp::And => truth(l != 0.0 && r != 0.0),
            BinOp::Or => truth(l != 0.0 || r != 0.0),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    #[inline]
    pub fn apply(self, v: f64) -> f64 {
        match self {
            UnaryOp::Neg => -v,
            UnaryOp::Not => truth(v == 0.0),
        }
    }
}

#[inline]
fn truth(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    /// Field or constant reference by full name, e.g. `"pos.x"` or `"dt"`.
    Name(String),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary { op, operand: Box::new(operand) }
    }
}

// ── Statements ────────────────────────────────────────────────────────────

/// Assignment operator: `=`, `+=`, `-=`, `*=`, `/=`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AssignOp {
    Set,
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfBranch {
    pub condition: Expr,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign {
        target: String,
        op: AssignOp,
        value: Expr,
    },
    If {
        /// `if` followed by any `elif`s, in source order.
        branches: Vec<IfBranch>,
        else_body: Option<Block>,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

// ── Top level ─────────────────────────────────────────────────────────────

/// A parsed `@behavior name:` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Behavior {
    pub name: String,
    pub body: Block,
}
