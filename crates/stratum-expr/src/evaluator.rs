//! Bottom-up evaluation of a [`BoundExpression`] against a variable
//! environment and a host-supplied function dispatch table.

use std::fmt;

use stratum_value::{AtomType, ConversionError, Variant, ValueType};

use crate::binder::{BoundExpression, VariableReference};

#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    DivisionByZero,
    ArithmeticOverflow,
    Conversion(ConversionError),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::DivisionByZero => write!(f, "division by zero"),
            EvalError::ArithmeticOverflow => write!(f, "arithmetic overflow"),
            EvalError::Conversion(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for EvalError {}

impl From<ConversionError> for EvalError {
    fn from(err: ConversionError) -> Self {
        EvalError::Conversion(err)
    }
}

/// Evaluate `bound`, resolving variables through `variables` and dispatching
/// calls through `functions`.
///
/// Precondition: every variable `bound` references has an entry reachable
/// through `variables`, and every function `bound` calls validated its
/// arguments at bind time — this function assumes both, per the evaluator's
/// totality guarantee.
pub fn evaluate(
    bound: &BoundExpression,
    variables: &dyn Fn(&VariableReference) -> Variant,
    functions: &dyn Fn(&str, &[Variant]) -> Result<Variant, EvalError>,
) -> Result<Variant, EvalError> {
    match bound {
        BoundExpression::Value(value) => Ok(value.clone()),
        BoundExpression::Variable(reference) => Ok(variables(reference)),
        BoundExpression::Unary { op, operand } => {
            let value = evaluate(operand, variables, functions)?;
            match op.as_str() {
                "-" => negate(&value),
                other => unreachable!("binder only ever produces unary '-', got {other:?}"),
            }
        }
        BoundExpression::Binary { op, lhs, rhs } => {
            let lhs = evaluate(lhs, variables, functions)?;
            let rhs = evaluate(rhs, variables, functions)?;
            arithmetic(op, &lhs, &rhs)
        }
        BoundExpression::Call { name, args } => {
            let values: Vec<Variant> = args
                .iter()
                .map(|arg| evaluate(arg, variables, functions))
                .collect::<Result<_, _>>()?;
            functions(name, &values)
        }
    }
}

fn is_double(value: &Variant) -> bool {
    matches!(value.value_type(), ValueType::Atom(AtomType::Double))
}

fn negate(value: &Variant) -> Result<Variant, EvalError> {
    if is_double(value) {
        Ok(Variant::double(-value.to_double()?))
    } else {
        let i = value.to_int()?;
        i.checked_neg().map(Variant::int).ok_or(EvalError::ArithmeticOverflow)
    }
}

fn arithmetic(op: &str, lhs: &Variant, rhs: &Variant) -> Result<Variant, EvalError> {
    if is_double(lhs) || is_double(rhs) {
        let a = lhs.to_double()?;
        let b = rhs.to_double()?;
        let result = match op {
            "+" => a + b,
            "-" => a - b,
            "*" => a * b,
            "/" if b == 0.0 => return Err(EvalError::DivisionByZero),
            "/" => a / b,
            "%" if b == 0.0 => return Err(EvalError::DivisionByZero),
            "%" => a % b,
            other => unreachable!("binder only ever produces +,-,*,/,%, got {other:?}"),
        };
        return Ok(Variant::double(result));
    }

    let a = lhs.to_int()?;
    let b = rhs.to_int()?;
    let result = match op {
        "+" => a.checked_add(b),
        "-" => a.checked_sub(b),
        "*" => a.checked_mul(b),
        "/" if b == 0 => return Err(EvalError::DivisionByZero),
        "/" => a.checked_div(b),
        "%" if b == 0 => return Err(EvalError::DivisionByZero),
        "%" => a.checked_rem(b),
        other => unreachable!("binder only ever produces +,-,*,/,%, got {other:?}"),
    };
    result.map(Variant::int).ok_or(EvalError::ArithmeticOverflow)
}
