//! The tree-walking evaluator.

use std::io::{BufRead, Write};

use crate::ast::*;
use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::scope::Environment;
use crate::value::Value;

type RERR = RuntimeErrorKind;

fn literal_value(lit: &Literal) -> Value {
    match lit {
        Literal::Int(i) => Value::Int(*i),
        Literal::Float(f) => Value::Float(*f),
        Literal::Char(c) => Value::Char(*c),
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Str(s) => Value::Str(s.clone()),
    }
}

/// Coerces `value` to `kind`, applying the same implicit int→float
/// promotion and numeric-string parsing the binary operators use. Returns
/// `None` when no such coercion exists, leaving the caller to build the
/// diagnostic (it alone knows the variable name for the message).
fn coerce_to_kind(value: Value, kind: Kind) -> Option<Value> {
    match kind {
        Kind::Int => match value.coerce_numeric_string() {
            Value::Int(i) => Some(Value::Int(i)),
            _ => None,
        },
        Kind::Float => match value.coerce_numeric_string() {
            Value::Int(i) => Some(Value::Float(i as f32)),
            Value::Float(f) => Some(Value::Float(f)),
            _ => None,
        },
        Kind::Char => match value {
            Value::Char(c) => Some(Value::Char(c)),
            _ => None,
        },
        Kind::Bool => match value {
            Value::Bool(b) => Some(Value::Bool(b)),
            _ => None,
        },
        Kind::String => match value {
            Value::Str(s) => Some(Value::Str(s)),
            _ => None,
        },
    }
}

/// The `for`-loop condition check: looser than `if`/`while`'s strict
/// boolean requirement. Anything other than `DILI`-as-bool or the string
/// `"DILI"` counts as true.
fn loose_truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Str(s) if s == "DILI" => false,
        _ => true,
    }
}

/// Promotes both operands to a shared numeric kind (after numeric-string
/// coercion), or fails with the operator's type-mismatch error.
fn promote_numeric(
    lv: Value,
    rv: Value,
    op: &'static str,
    line: u32,
) -> Result<(Value, Value), RuntimeError> {
    let lv = lv.coerce_numeric_string();
    let rv = rv.coerce_numeric_string();
    match (lv, rv) {
        (Value::Int(a), Value::Int(b)) => Ok((Value::Int(a), Value::Int(b))),
        (Value::Float(a), Value::Float(b)) => Ok((Value::Float(a), Value::Float(b))),
        (Value::Int(a), Value::Float(b)) => Ok((Value::Float(a as f32), Value::Float(b))),
        (Value::Float(a), Value::Int(b)) => Ok((Value::Float(a), Value::Float(b as f32))),
        (a, b) => Err(RuntimeError::new(
            RERR::TypeMismatchOp {
                op,
                lhs: a.kind(),
                rhs: b.kind(),
            },
            line,
        )),
    }
}

fn eval_equality(op: BinOp, lv: Value, rv: Value, line: u32) -> Result<Value, RuntimeError> {
    let same = if lv.kind() == rv.kind() && matches!(lv.kind(), Kind::Char | Kind::String | Kind::Bool) {
        lv == rv
    } else {
        let (a, b) = promote_numeric(lv, rv, op.symbol(), line)?;
        match (a, b) {
            (Value::Int(x), Value::Int(y)) => x == y,
            (Value::Float(x), Value::Float(y)) => x == y,
            _ => unreachable!("promote_numeric always yields same-kind numerics"),
        }
    };
    Ok(Value::Bool(if op == BinOp::Eq { same } else { !same }))
}

fn eval_ordering(op: BinOp, lv: Value, rv: Value, line: u32) -> Result<Value, RuntimeError> {
    let (a, b) = promote_numeric(lv, rv, op.symbol(), line)?;
    let result = match (a, b) {
        (Value::Int(x), Value::Int(y)) => match op {
            BinOp::Gt => x > y,
            BinOp::Lt => x < y,
            BinOp::Ge => x >= y,
            BinOp::Le => x <= y,
            _ => unreachable!(),
        },
        (Value::Float(x), Value::Float(y)) => match op {
            BinOp::Gt => x > y,
            BinOp::Lt => x < y,
            BinOp::Ge => x >= y,
            BinOp::Le => x <= y,
            _ => unreachable!(),
        },
        _ => unreachable!("promote_numeric always yields same-kind numerics"),
    };
    Ok(Value::Bool(result))
}

fn eval_arith(op: BinOp, lv: Value, rv: Value, line: u32) -> Result<Value, RuntimeError> {
    let (a, b) = promote_numeric(lv, rv, op.symbol(), line)?;
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => {
            if matches!(op, BinOp::Div | BinOp::Mod) && y == 0 {
                return Err(RuntimeError::new(RERR::DivisionByZero, line));
            }
            let result = match op {
                BinOp::Add => x.checked_add(y),
                BinOp::Sub => x.checked_sub(y),
                BinOp::Mul => x.checked_mul(y),
                BinOp::Div => x.checked_div(y),
                BinOp::Mod => x.checked_rem(y),
                _ => unreachable!(),
            };
            result.map(Value::Int).ok_or_else(|| {
                RuntimeError::new(RERR::IntegerOverflow(op.symbol().to_string()), line)
            })
        }
        (Value::Float(x), Value::Float(y)) => {
            if matches!(op, BinOp::Div | BinOp::Mod) && y == 0.0 {
                return Err(RuntimeError::new(RERR::DivisionByZero, line));
            }
            let result = match op {
                BinOp::Add => x + y,
                BinOp::Sub => x - y,
                BinOp::Mul => x * y,
                BinOp::Div => x / y,
                BinOp::Mod => x % y,
                _ => unreachable!(),
            };
            Ok(Value::Float(result))
        }
        _ => unreachable!("promote_numeric always yields same-kind numerics"),
    }
}

fn eval_logical(op: LogicalOp, lv: Value, rv: Value, line: u32) -> Result<Value, RuntimeError> {
    match (lv, rv) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(match op {
            LogicalOp::And => a && b,
            LogicalOp::Or => a || b,
        })),
        (a, b) => Err(RuntimeError::new(
            RERR::TypeMismatchOp {
                op: if op == LogicalOp::And { "UG" } else { "O" },
                lhs: a.kind(),
                rhs: b.kind(),
            },
            line,
        )),
    }
}

fn eval_unary(op: UnaryOp, v: Value, line: u32) -> Result<Value, RuntimeError> {
    match op {
        UnaryOp::Not => match v {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            other => Err(RuntimeError::new(
                RERR::TypeMismatchOp {
                    op: "DILI",
                    lhs: other.kind(),
                    rhs: other.kind(),
                },
                line,
            )),
        },
        UnaryOp::Neg | UnaryOp::Pos => match v.coerce_numeric_string() {
            Value::Int(i) if op == UnaryOp::Neg => i
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::new(RERR::IntegerOverflow("-".to_string()), line)),
            Value::Int(i) => Ok(Value::Int(i)),
            Value::Float(f) => Ok(Value::Float(if op == UnaryOp::Neg { -f } else { f })),
            other => Err(RuntimeError::new(
                RERR::TypeMismatchOp {
                    op: if op == UnaryOp::Neg { "-" } else { "+" },
                    lhs: other.kind(),
                    rhs: other.kind(),
                },
                line,
            )),
        },
    }
}

fn checked_increment(v: Value, line: u32) -> Result<Value, RuntimeError> {
    match v {
        Value::Int(i) => i
            .checked_add(1)
            .map(Value::Int)
            .ok_or_else(|| RuntimeError::new(RERR::IntegerOverflow("++".to_string()), line)),
        other => Err(RuntimeError::new(
            RERR::TypeMismatchOp {
                op: "++",
                lhs: other.kind(),
                rhs: other.kind(),
            },
            line,
        )),
    }
}

/// Walks a [`Program`] against a fresh [`Environment`], reading from
/// `input` and writing to `output`. Generic over both so the CLI can wire
/// real stdio while tests use in-memory buffers.
pub struct Engine<'a, R, W> {
    env: Environment,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Engine<'a, R, W> {
    pub fn new(input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            env: Environment::new(),
            input,
            output,
        }
    }

    pub fn run(&mut self, program: &Program) -> Result<(), RuntimeError> {
        let span = tracing::debug_span!("eval");
        let _enter = span.enter();
        for stmt in &program.statements {
            self.exec_stmt(stmt)?;
        }
        Ok(())
    }

    fn lookup(&self, name: &str, line: u32) -> Result<Value, RuntimeError> {
        self.env
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::new(RERR::UndeclaredVariable(name.to_string()), line))
    }

    fn kind_of(&self, name: &str, line: u32) -> Result<Kind, RuntimeError> {
        self.env
            .kind_of(name)
            .ok_or_else(|| RuntimeError::new(RERR::UndeclaredVariable(name.to_string()), line))
    }

    fn strict_bool(&self, v: Value, line: u32) -> Result<bool, RuntimeError> {
        match v {
            Value::Bool(b) => Ok(b),
            other => Err(RuntimeError::new(
                RERR::ConditionNotBoolean(other.kind()),
                line,
            )),
        }
    }

    /// Standard output is outside the language's error surface (see §7 of
    /// the design notes); a write failure here has no Bisaya++ diagnostic
    /// to raise, so it is silently swallowed rather than invented.
    fn write_str(&mut self, s: &str) {
        let _ = self.output.write_all(s.as_bytes());
    }

    fn read_line(&mut self, name: &str, line: u32) -> Result<String, RuntimeError> {
        let mut raw = String::new();
        let n = self.input.read_line(&mut raw).unwrap_or(0);
        let trimmed = raw.trim_end_matches(['\n', '\r']);
        if n == 0 || trimmed.is_empty() {
            return Err(RuntimeError::new(
                RERR::InputInvalid(name.to_string()),
                line,
            ));
        }
        Ok(trimmed.to_string())
    }

    fn exec_block(&mut self, block: &Block) -> Result<(), RuntimeError> {
        for stmt in block {
            self.exec_stmt(stmt)?;
        }
        Ok(())
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Declaration { kind, targets, .. } => {
                for target in targets {
                    let value = match &target.init {
                        Some(expr) => {
                            let v = self.eval_expr(expr)?;
                            coerce_to_kind(v.clone(), *kind).ok_or_else(|| {
                                RuntimeError::new(
                                    RERR::TypeMismatchAssign {
                                        name: target.name.clone(),
                                        value: v.display(),
                                        declared: *kind,
                                        found: v.kind(),
                                    },
                                    target.line,
                                )
                            })?
                        }
                        None => Value::default_for(*kind),
                    };
                    self.env.declare(&target.name, *kind, value);
                }
                Ok(())
            }
            Stmt::Assignment {
                name, op, value, line,
            } => {
                self.eval_assign(name, *op, value, *line)?;
                Ok(())
            }
            Stmt::Increment { name, line } => {
                let current = self.lookup(name, *line)?;
                let next = checked_increment(current, *line)?;
                self.env.set(name, next);
                Ok(())
            }
            Stmt::Input { names, line } => {
                for name in names {
                    let kind = self.kind_of(name, *line)?;
                    let raw = self.read_line(name, *line)?;
                    let coerced = coerce_to_kind(Value::Str(raw.clone()), kind).ok_or_else(|| {
                        RuntimeError::new(
                            RERR::TypeMismatchAssign {
                                name: name.clone(),
                                value: raw.clone(),
                                declared: kind,
                                found: Kind::String,
                            },
                            *line,
                        )
                    })?;
                    self.env.set(name, coerced);
                }
                Ok(())
            }
            Stmt::Output { exprs, .. } => {
                let mut out = String::new();
                for expr in exprs {
                    let v = self.eval_expr(expr)?;
                    out.push_str(&v.display());
                }
                self.write_str(&out);
                Ok(())
            }
            Stmt::If {
                cond,
                then_block,
                else_block,
                line,
            } => {
                let c = self.eval_expr(cond)?;
                if self.strict_bool(c, *line)? {
                    self.exec_block(then_block)
                } else {
                    match else_block {
                        Some(ElseBranch::Block(block)) => self.exec_block(block),
                        Some(ElseBranch::ElseIf(stmt)) => self.exec_stmt(stmt),
                        None => Ok(()),
                    }
                }
            }
            Stmt::While { cond, body, line } => {
                loop {
                    let c = self.eval_expr(cond)?;
                    if !self.strict_bool(c, *line)? {
                        break;
                    }
                    self.exec_block(body)?;
                }
                Ok(())
            }
            Stmt::For {
                init,
                cond,
                update,
                body,
                ..
            } => {
                self.exec_stmt(init)?;
                loop {
                    let c = self.eval_expr(cond)?;
                    if !loose_truthy(&c) {
                        break;
                    }
                    self.exec_block(body)?;
                    self.exec_update(update)?;
                }
                Ok(())
            }
            Stmt::Empty(_) => Ok(()),
        }
    }

    /// The one place the increment statement/expression distinction is
    /// bridged: a bare `name++` update commits, anything else is just
    /// evaluated for its side effects (an assignment always commits on its
    /// own terms).
    fn exec_update(&mut self, update: &Expr) -> Result<(), RuntimeError> {
        if let Expr::PostIncrement(name, line) = update {
            let current = self.lookup(name, *line)?;
            let next = checked_increment(current, *line)?;
            self.env.set(name, next);
            Ok(())
        } else {
            self.eval_expr(update)?;
            Ok(())
        }
    }

    fn eval_assign(
        &mut self,
        name: &str,
        op: AssignOp,
        value_expr: &Expr,
        line: u32,
    ) -> Result<Value, RuntimeError> {
        let rhs = self.eval_expr(value_expr)?;
        let declared_kind = self.kind_of(name, line)?;
        let new_value = if op == AssignOp::Assign {
            rhs
        } else {
            let current = self.lookup(name, line)?;
            let bin_op = match op {
                AssignOp::AddAssign => BinOp::Add,
                AssignOp::SubAssign => BinOp::Sub,
                AssignOp::MulAssign => BinOp::Mul,
                AssignOp::DivAssign => BinOp::Div,
                AssignOp::ModAssign => BinOp::Mod,
                AssignOp::Assign => unreachable!(),
            };
            eval_arith(bin_op, current, rhs, line)?
        };
        let coerced = coerce_to_kind(new_value.clone(), declared_kind).ok_or_else(|| {
            RuntimeError::new(
                RERR::TypeMismatchAssign {
                    name: name.to_string(),
                    value: new_value.display(),
                    declared: declared_kind,
                    found: new_value.kind(),
                },
                line,
            )
        })?;
        self.env.set(name, coerced.clone());
        Ok(coerced)
    }

    fn eval_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(lit, _) => Ok(literal_value(lit)),
            Expr::Newline(_) => Ok(Value::Str("\n".to_string())),
            Expr::Variable(name, line) => self.lookup(name, *line),
            Expr::Unary(op, inner, line) => {
                let v = self.eval_expr(inner)?;
                eval_unary(*op, v, *line)
            }
            Expr::PostIncrement(name, line) => {
                let current = self.lookup(name, *line)?;
                checked_increment(current, *line)
            }
            Expr::Binary(op, l, r, line) => {
                let lv = self.eval_expr(l)?;
                let rv = self.eval_expr(r)?;
                match op {
                    BinOp::Eq | BinOp::Ne => eval_equality(*op, lv, rv, *line),
                    BinOp::Gt | BinOp::Lt | BinOp::Ge | BinOp::Le => {
                        eval_ordering(*op, lv, rv, *line)
                    }
                    BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => {
                        eval_arith(*op, lv, rv, *line)
                    }
                }
            }
            Expr::Concat(l, r, _) => {
                let lv = self.eval_expr(l)?;
                let rv = self.eval_expr(r)?;
                Ok(Value::Str(format!("{}{}", lv.display(), rv.display())))
            }
            Expr::Logical(op, l, r, line) => {
                let lv = self.eval_expr(l)?;
                let rv = self.eval_expr(r)?;
                eval_logical(*op, lv, rv, *line)
            }
            Expr::Group(inner, _) => self.eval_expr(inner),
            Expr::Assign(name, op, value, line) => self.eval_assign(name, *op, value, *line),
        }
    }
}

/// Runs a program tree to completion against the given reader/writer.
pub fn run<R: BufRead, W: Write>(
    program: &Program,
    input: &mut R,
    output: &mut W,
) -> Result<(), RuntimeError> {
    Engine::new(input, output).run(program)
}
