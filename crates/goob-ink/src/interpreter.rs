use std::collections::HashMap;

use crate::ast::{AssignOp, Behavior, Block, Expr, IfBranch, Stmt};
use crate::error::InkError;

// ── Bindings ──────────────────────────────────────────────────────────────

/// Names visible to a behaviour for one execution.
///
/// Fields are mutable columns, one lane per sprite; constants are read-only
/// scalars broadcast to every lane. Lookup checks fields first.
pub struct Bindings<'a> {
    count: usize,
    fields: HashMap<String, &'a mut [f64]>,
    constants: HashMap<String, f64>,
}

impl<'a> Bindings<'a> {
    pub fn new(count: usize) -> Self {
        Self { count, fields: HashMap::new(), constants: HashMap::new() }
    }

    /// Number of lanes every field must have.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Binds a mutable column. Its length must equal [`count`](Self::count).
    pub fn bind_field(&mut self, name: impl Into<String>, lanes: &'a mut [f64]) -> Result<(), InkError> {
        let name = name.into();
        if lanes.len() != self.count {
            return Err(InkError::runtime(format!(
                "field '{name}' has {} lanes, expected {}",
                lanes.len(),
                self.count
            )));
        }
        self.fields.insert(name, lanes);
        Ok(())
    }

    pub fn bind_constant(&mut self, name: impl Into<String>, value: f64) {
        self.constants.insert(name.into(), value);
    }

    pub fn constant(&self, name: &str) -> Option<f64> {
        self.constants.get(name).copied()
    }

    pub fn field(&self, name: &str) -> Option<&[f64]> {
        self.fields.get(name).map(|lanes| &**lanes)
    }

    fn lookup(&self, name: &str) -> Result<Value, InkError> {
        if let Some(lanes) = self.fields.get(name) {
            return Ok(Value::Lanes(lanes.to_vec()));
        }
        if let Some(&v) = self.constants.get(name) {
            return Ok(Value::Scalar(v));
        }
        Err(unknown_name(name))
    }
}

fn unknown_name(name: &str) -> InkError {
    InkError::runtime(format!("unknown name '{name}'"))
}

fn not_assignable(name: &str, is_constant: bool) -> InkError {
    if is_constant {
        InkError::runtime(format!("cannot assign to constant '{name}'"))
    } else {
        InkError::runtime(format!("cannot assign to unknown field '{name}'"))
    }
}

// ── Values ────────────────────────────────────────────────────────────────

/// Result of evaluating an expression: one value for all lanes, or one per
/// lane.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Lanes(Vec<f64>),
}

impl Value {
    #[inline]
    pub fn lane(&self, i: usize) -> f64 {
        match self {
            Value::Scalar(v) => *v,
            Value::Lanes(v) => v[i],
        }
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Value {
        match self {
            Value::Scalar(v) => Value::Scalar(f(v)),
            Value::Lanes(mut v) => {
                v.iter_mut().for_each(|x| *x = f(*x));
                Value::Lanes(v)
            }
        }
    }

    fn zip(self, rhs: Value, f: impl Fn(f64, f64) -> f64) -> Value {
        match (self, rhs) {
            (Value::Scalar(l), Value::Scalar(r)) => Value::Scalar(f(l, r)),
            (Value::Lanes(mut l), Value::Scalar(r)) => {
                l.iter_mut().for_each(|x| *x = f(*x, r));
                Value::Lanes(l)
            }
            (Value::Scalar(l), Value::Lanes(mut r)) => {
                r.iter_mut().for_each(|x| *x = f(l, *x));
                Value::Lanes(r)
            }
            (Value::Lanes(mut l), Value::Lanes(r)) => {
                l.iter_mut().zip(r).for_each(|(x, y)| *x = f(*x, y));
                Value::Lanes(l)
            }
        }
    }
}

// ── Interpreter ───────────────────────────────────────────────────────────

/// Runs a [`Behavior`] over every lane of a [`Bindings`] at once.
///
/// Conditionals never branch per lane: each `if` arm runs under a lane mask
/// and assignments only touch active lanes.
#[derive(Debug, Default)]
pub struct Interpreter {
    mask: Vec<bool>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn execute(&mut self, behavior: &Behavior, bindings: &mut Bindings<'_>) -> Result<(), InkError> {
        if bindings.count == 0 {
            return Ok(());
        }
        self.mask.clear();
        self.mask.resize(bindings.count, true);
        self.exec_block(&behavior.body, bindings)
    }

    /// Validates every name in `behavior` against the given field and
    /// constant names, including names in branches that would not run.
    pub fn check(behavior: &Behavior, fields: &[&str], constants: &[&str]) -> Result<(), InkError> {
        Checker { fields, constants }.block(&behavior.body)
    }

    fn exec_block(&mut self, block: &Block, b: &mut Bindings<'_>) -> Result<(), InkError> {
        for stmt in &block.stmts {
            match stmt {
                Stmt::Assign { target, op, value } => self.exec_assign(target, *op, value, b)?,
                Stmt::If { branches, else_body } => self.exec_if(branches, else_body.as_ref(), b)?,
            }
        }
        Ok(())
    }

    fn exec_assign(&mut self, target: &str, op: AssignOp, value: &Expr, b: &mut Bindings<'_>) -> Result<(), InkError> {
        // Target is resolved before the value is evaluated.
        if !b.fields.contains_key(target) {
            return Err(not_assignable(target, b.constants.contains_key(target)));
        }
        let value = eval(value, b)?;
        let Some(lanes) = b.fields.get_mut(target) else {
            return Ok(());
        };

        for (i, lane) in lanes.iter_mut().enumerate() {
            if !self.mask[i] {
                continue;
            }
            let v = value.lane(i);
            match op {
                AssignOp::Set => *lane = v,
                AssignOp::Add => *lane += v,
                AssignOp::Sub => *lane -= v,
                AssignOp::Mul => *lane *= v,
                AssignOp::Div => {
                    if v != 0.0 {
                        *lane /= v;
                    }
                }
            }
        }
        Ok(())
    }

    fn exec_if(&mut self, branches: &[IfBranch], else_body: Option<&Block>, b: &mut Bindings<'_>) -> Result<(), InkError> {
        let outer = self.mask.clone();
        let mut remaining = outer.clone();

        for branch in branches {
            let cond = eval(&branch.condition, b)?;
            let taken: Vec<bool> = remaining
                .iter()
                .enumerate()
                .map(|(i, &r)| r && cond.lane(i) != 0.0)
                .collect();
            for (r, &t) in remaining.iter_mut().zip(&taken) {
                if t {
                    *r = false;
                }
            }
            // Untaken bodies are not run; `check` has already validated them.
            if taken.iter().any(|&t| t) {
                self.mask = taken;
                let result = self.exec_block(&branch.body, b);
                self.mask.clone_from(&outer);
                result?;
            }
        }

        if let Some(body) = else_body {
            if remaining.iter().any(|&r| r) {
                self.mask = remaining;
                let result = self.exec_block(body, b);
                self.mask.clone_from(&outer);
                result?;
            }
        }

        self.mask = outer;
        Ok(())
    }
}

fn eval(expr: &Expr, b: &Bindings<'_>) -> Result<Value, InkError> {
    match expr {
        Expr::Number(n) => Ok(Value::Scalar(*n)),
        Expr::Name(name) => b.lookup(name),
        Expr::Unary { op, operand } => Ok(eval(operand, b)?.map(|v| op.apply(v))),
        Expr::Binary { op, lhs, rhs } => {
            let l = eval(lhs, b)?;
            let r = eval(rhs, b)?;
            Ok(l.zip(r, |x, y| op.apply(x, y)))
        }
    }
}

// ── Static check ──────────────────────────────────────────────────────────

struct Checker<'n> {
    fields: &'n [&'n str],
    constants: &'n [&'n str],
}

impl Checker<'_> {
    fn block(&self, block: &Block) -> Result<(), InkError> {
        for stmt in &block.stmts {
            match stmt {
                Stmt::Assign { target, value, .. } => {
                    if !self.fields.contains(&target.as_str()) {
                        return Err(not_assignable(target, self.constants.contains(&target.as_str())));
                    }
                    self.expr(value)?;
                }
                Stmt::If { branches, else_body } => {
                    for branch in branches {
                        self.expr(&branch.condition)?;
                        self.block(&branch.body)?;
                    }
                    if let Some(body) = else_body {
                        self.block(body)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn expr(&self, expr: &Expr) -> Result<(), InkError> {
        match expr {
            Expr::Number(_) => Ok(()),
            Expr::Name(name) => {
                if self.fields.contains(&name.as_str()) || self.constants.contains(&name.as_str()) {
                    Ok(())
                } else {
                    Err(unknown_name(name))
                }
            }
            Expr::Unary { operand, .. } => self.expr(operand),
            Expr::Binary { lhs, rhs, .. } => {
                self.expr(lhs)?;
                self.expr(rhs)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    fn run(src: &str, x: &mut [f64]) -> Result<(), InkError> {
        let behavior = parse_str(src).unwrap();
        let mut b = Bindings::new(x.len());
        b.bind_field("x", x)?;
        b.bind_constant("k", 2.0);
        Interpreter::new().execute(&behavior, &mut b)
    }

    #[test]
    fn arithmetic_on_every_lane() {
        let mut x = [1.0, 2.0, 3.0];
        run("@behavior t:\n    x = x * k + 1\n", &mut x).unwrap();
        assert_eq!(x, [3.0, 5.0, 7.0]);
    }

    #[test]
    fn compound_assignments() {
        let mut x = [10.0];
        run("@behavior t:\n    x += 2\n    x -= 4\n    x *= 3\n    x /= 6\n", &mut x).unwrap();
        assert_eq!(x, [4.0]);
    }

    #[test]
    fn division_and_modulo_by_zero_are_zero() {
        let mut x = [7.0, -7.0];
        run("@behavior t:\n    x = x / 0\n", &mut x).unwrap();
        assert_eq!(x, [0.0, 0.0]);

        let mut x = [7.0];
        run("@behavior t:\n    x = x % 0\n", &mut x).unwrap();
        assert_eq!(x, [0.0]);
    }

    #[test]
    fn divide_assign_by_zero_leaves_lane() {
        let mut x = [5.0, 6.0];
        run("@behavior t:\n    x /= 0\n", &mut x).unwrap();
        assert_eq!(x, [5.0, 6.0]);
    }

    #[test]
    fn modulo_follows_dividend_sign() {
        let mut x = [-7.0, 7.0];
        run("@behavior t:\n    x = x % 3\n", &mut x).unwrap();
        assert_eq!(x, [-1.0, 1.0]);
    }

    #[test]
    fn if_only_touches_matching_lanes() {
        let mut x = [1.0, 5.0, 10.0];
        run("@behavior t:\n    if x > 4:\n        x = 0\n", &mut x).unwrap();
        assert_eq!(x, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn elif_and_else_take_remaining_lanes() {
        let src = "\
@behavior t:
    if x < 0:
        x = -1
    elif x < 10:
        x = 1
    else:
        x = 100
";
        let mut x = [-3.0, 3.0, 30.0, 0.0];
        run(src, &mut x).unwrap();
        assert_eq!(x, [-1.0, 1.0, 100.0, 1.0]);
    }

    #[test]
    fn branch_body_does_not_retrigger_later_arms() {
        // The first arm moves lane 0 into the second arm's range, but the
        // second arm's mask excludes lanes already taken.
        let src = "\
@behavior t:
    if x < 0:
        x = 5
    elif x > 1:
        x = 50
";
        let mut x = [-1.0, 2.0];
        run(src, &mut x).unwrap();
        assert_eq!(x, [5.0, 50.0]);
    }

    #[test]
    fn nested_if_restores_outer_mask() {
        let src = "\
@behavior t:
    if x > 0:
        if x > 5:
            x = 100
        x += 1
    x += 1000
";
        let mut x = [-1.0, 1.0, 6.0];
        run(src, &mut x).unwrap();
        assert_eq!(x, [999.0, 1002.0, 1101.0]);
    }

    #[test]
    fn logic_operators_yield_zero_or_one() {
        let mut x = [0.0, 3.0];
        run("@behavior t:\n    x = not x or (x > 1 and x < 2)\n", &mut x).unwrap();
        assert_eq!(x, [1.0, 0.0]);
    }

    #[test]
    fn scalar_only_expression_broadcasts() {
        let mut x = [0.0, 0.0];
        run("@behavior t:\n    x = -(k * 3)\n", &mut x).unwrap();
        assert_eq!(x, [-6.0, -6.0]);
    }

    #[test]
    fn unknown_name_is_runtime_error() {
        let err = run("@behavior t:\n    x = y\n", &mut [1.0]).unwrap_err();
        assert!(matches!(err, InkError::Runtime { .. }));
        assert!(err.to_string().contains("'y'"));
    }

    #[test]
    fn assigning_constant_is_runtime_error() {
        let err = run("@behavior t:\n    k = 1\n", &mut [1.0]).unwrap_err();
        assert!(err.to_string().contains("constant 'k'"));
    }

    #[test]
    fn constant_target_reported_before_unknown_value() {
        let err = run("@behavior t:\n    k = nope\n", &mut [1.0]).unwrap_err();
        assert!(err.to_string().contains("constant 'k'"), "{err}");

        let behavior = parse_str("@behavior t:\n    k = nope\n").unwrap();
        let err = Interpreter::check(&behavior, &["x"], &["k"]).unwrap_err();
        assert!(err.to_string().contains("constant 'k'"), "{err}");
    }

    #[test]
    fn zero_lanes_does_nothing() {
        // Even an unknown name is not reached when there are no lanes.
        assert!(run("@behavior t:\n    x = y\n", &mut []).is_ok());
    }

    #[test]
    fn field_length_must_match_count() {
        let mut lanes = [1.0, 2.0];
        let mut b = Bindings::new(3);
        assert!(b.bind_field("x", &mut lanes).is_err());
    }

    #[test]
    fn check_finds_errors_in_untaken_branches() {
        let behavior = parse_str("@behavior t:\n    if 0:\n        x = nope\n").unwrap();
        assert!(Interpreter::check(&behavior, &["x"], &["k"]).is_err());

        // The same script runs fine because the branch never matches.
        let mut x = [1.0];
        let mut b = Bindings::new(1);
        b.bind_field("x", &mut x).unwrap();
        assert!(Interpreter::new().execute(&behavior, &mut b).is_ok());
    }

    #[test]
    fn check_rejects_constant_target() {
        let behavior = parse_str("@behavior t:\n    dt = 1\n").unwrap();
        let err = Interpreter::check(&behavior, &["x"], &["dt"]).unwrap_err();
        assert!(err.to_string().contains("constant 'dt'"));
    }

    #[test]
    fn check_accepts_valid_script() {
        let behavior = parse_str("@behavior t:\n    x += k * dt\n").unwrap();
        assert!(Interpreter::check(&behavior, &["x"], &["k", "dt"]).is_ok());
    }
}
