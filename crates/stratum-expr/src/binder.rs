//! Binding: resolving an [`UnboundExpr`]'s variable and function names into
//! stable references, checked against host-supplied signatures.

use std::collections::HashMap;
use std::fmt;

use stratum_metamodel::BuiltinVariable;
use stratum_value::{ObjectId, Variant, ValueType};

use crate::signature::{FunctionSignature, SignatureMismatch};
use crate::unbound::UnboundExpr;

/// What a bound variable name actually refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableReference {
    Object(ObjectId),
    Builtin(BuiltinVariable),
}

/// An expression with every variable and function reference resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundExpression {
    Value(Variant),
    Variable(VariableReference),
    Unary {
        op: String,
        operand: Box<BoundExpression>,
    },
    Binary {
        op: String,
        lhs: Box<BoundExpression>,
        rhs: Box<BoundExpression>,
    },
    Call {
        name: String,
        args: Vec<BoundExpression>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum BindError {
    UnknownVariable(String),
    UnknownFunction(String),
    InvalidArity {
        name: String,
        expected_at_least: usize,
        expected_at_most: Option<usize>,
        got: usize,
    },
    ArgumentTypeMismatch {
        name: String,
        index: usize,
        expected: String,
        got: ValueType,
    },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::UnknownVariable(name) => write!(f, "unknown variable '{name}'"),
            BindError::UnknownFunction(name) => write!(f, "unknown function '{name}'"),
            BindError::InvalidArity { name, expected_at_least, expected_at_most, got } => match expected_at_most {
                Some(max) if max == expected_at_least => {
                    write!(f, "'{name}' expects {expected_at_least} argument(s), got {got}")
                }
                Some(max) => write!(f, "'{name}' expects {expected_at_least}..={max} argument(s), got {got}"),
                None => write!(f, "'{name}' expects at least {expected_at_least} argument(s), got {got}"),
            },
            BindError::ArgumentTypeMismatch { name, index, expected, got } => {
                write!(f, "'{name}' argument {index}: expected {expected}, got {got}")
            }
        }
    }
}

impl std::error::Error for BindError {}

/// Resolve every name in `expr` against `variable_names` and `functions`.
pub fn bind(
    expr: &UnboundExpr,
    variable_names: &HashMap<String, VariableReference>,
    functions: &HashMap<String, FunctionSignature>,
) -> Result<BoundExpression, BindError> {
    match expr {
        UnboundExpr::Value(value) => Ok(BoundExpression::Value(value.clone())),
        UnboundExpr::Variable(name) => variable_names
            .get(name)
            .cloned()
            .map(BoundExpression::Variable)
            .ok_or_else(|| BindError::UnknownVariable(name.clone())),
        UnboundExpr::Unary { op, operand } => Ok(BoundExpression::Unary {
            op: op.clone(),
            operand: Box::new(bind(operand, variable_names, functions)?),
        }),
        UnboundExpr::Binary { op, lhs, rhs } => Ok(BoundExpression::Binary {
            op: op.clone(),
            lhs: Box::new(bind(lhs, variable_names, functions)?),
            rhs: Box::new(bind(rhs, variable_names, functions)?),
        }),
        UnboundExpr::Function { name, args } => bind_call(name, args, variable_names, functions),
    }
}

fn bind_call(
    name: &str,
    args: &[UnboundExpr],
    variable_names: &HashMap<String, VariableReference>,
    functions: &HashMap<String, FunctionSignature>,
) -> Result<BoundExpression, BindError> {
    let signature = functions
        .get(name)
        .ok_or_else(|| BindError::UnknownFunction(name.to_string()))?;

    let bound_args: Vec<BoundExpression> = args
        .iter()
        .map(|arg| bind(arg, variable_names, functions))
        .collect::<Result<_, _>>()?;

    // Only positions whose type can be inferred statically (literals,
    // builtin variables, nested calls) are checked; an `object` variable's
    // attribute type is not known until the memory is queried, so those
    // positions are passed through as `None` and left to evaluation.
    let arg_types: Vec<Option<ValueType>> = bound_args.iter().map(|arg| infer_type(arg, functions)).collect();

    signature
        .validate(&arg_types)
        .map_err(|mismatch| signature_mismatch_to_bind_error(name, signature, &arg_types, mismatch))?;

    Ok(BoundExpression::Call {
        name: name.to_string(),
        args: bound_args,
    })
}

fn signature_mismatch_to_bind_error(
    name: &str,
    signature: &FunctionSignature,
    arg_types: &[Option<ValueType>],
    mismatch: SignatureMismatch,
) -> BindError {
    match mismatch {
        SignatureMismatch::InvalidArity {
            expected_at_least,
            expected_at_most,
            got,
        } => BindError::InvalidArity {
            name: name.to_string(),
            expected_at_least,
            expected_at_most,
            got,
        },
        SignatureMismatch::ArgumentTypeMismatch { index } => {
            let desc = if index < signature.positional.len() {
                &signature.positional[index].value_type
            } else {
                &signature
                    .variadic
                    .as_ref()
                    .expect("a type mismatch past the positional prefix implies a variadic tail")
                    .value_type
            };
            BindError::ArgumentTypeMismatch {
                name: name.to_string(),
                index,
                expected: desc.to_string(),
                got: arg_types[index].expect("validate() only reports a type mismatch for a known argument type"),
            }
        }
    }
}

/// Best-effort static type of a bound expression, used only to check call
/// argument types early. `None` means the type can only be known at
/// evaluation time.
fn infer_type(expr: &BoundExpression, functions: &HashMap<String, FunctionSignature>) -> Option<ValueType> {
    use stratum_value::AtomType;

    match expr {
        BoundExpression::Value(value) => Some(value.value_type()),
        BoundExpression::Variable(VariableReference::Builtin(builtin)) => Some(builtin.value_type),
        BoundExpression::Variable(VariableReference::Object(_)) => None,
        BoundExpression::Unary { operand, .. } => infer_type(operand, functions),
        BoundExpression::Binary { lhs, rhs, .. } => {
            match (infer_type(lhs, functions)?, infer_type(rhs, functions)?) {
                (ValueType::Atom(AtomType::Double), _) | (_, ValueType::Atom(AtomType::Double)) => {
                    Some(ValueType::Atom(AtomType::Double))
                }
                (left, _) => Some(left),
            }
        }
        BoundExpression::Call { name, .. } => functions.get(name).map(|signature| signature.returns),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use stratum_value::AtomType;

    use crate::parser::parse;
    use crate::signature::{ArgumentDesc, UnionType};

    use super::*;

    fn names(pairs: &[(&str, VariableReference)]) -> HashMap<String, VariableReference> {
        pairs.iter().map(|(n, r)| (n.to_string(), r.clone())).collect()
    }

    #[test]
    fn resolves_variables_and_computes_the_expected_tree_shape() {
        let expr = parse("a + b * c").unwrap().to_unbound();
        let variables = names(&[
            ("a", VariableReference::Object(ObjectId::new(1))),
            ("b", VariableReference::Object(ObjectId::new(2))),
            ("c", VariableReference::Object(ObjectId::new(3))),
        ]);
        let bound = bind(&expr, &variables, &HashMap::new()).unwrap();
        assert!(matches!(bound, BoundExpression::Binary { .. }));
    }

    #[test]
    fn unknown_variable_is_reported() {
        let expr = parse("missing").unwrap().to_unbound();
        let err = bind(&expr, &HashMap::new(), &HashMap::new()).unwrap_err();
        assert_eq!(err, BindError::UnknownVariable("missing".to_string()));
    }

    #[test]
    fn unknown_function_is_reported() {
        let expr = parse("fun(1)").unwrap().to_unbound();
        let err = bind(&expr, &HashMap::new(), &HashMap::new()).unwrap_err();
        assert_eq!(err, BindError::UnknownFunction("fun".to_string()));
    }

    #[test]
    fn arity_mismatch_is_reported() {
        let expr = parse("fun(1, 2)").unwrap().to_unbound();
        let mut functions = HashMap::new();
        functions.insert(
            "fun".to_string(),
            FunctionSignature::new(ValueType::Atom(AtomType::Int))
                .with_positional(ArgumentDesc::new("x", UnionType::Concrete(ValueType::Atom(AtomType::Int)))),
        );
        let err = bind(&expr, &HashMap::new(), &functions).unwrap_err();
        assert!(matches!(err, BindError::InvalidArity { got: 2, .. }));
    }

    #[test]
    fn argument_type_mismatch_is_reported_when_statically_known() {
        let expr = parse("fun(flag)").unwrap().to_unbound();
        let mut functions = HashMap::new();
        functions.insert(
            "fun".to_string(),
            FunctionSignature::new(ValueType::Atom(AtomType::Int))
                .with_positional(ArgumentDesc::new("x", UnionType::Concrete(ValueType::Atom(AtomType::Bool)))),
        );
        let variables = names(&[(
            "flag",
            VariableReference::Builtin(BuiltinVariable::new("flag", ValueType::Atom(AtomType::Int))),
        )]);
        let err = bind(&expr, &variables, &functions).unwrap_err();
        assert!(matches!(err, BindError::ArgumentTypeMismatch { index: 0, .. }));
    }

    #[test]
    fn binding_twice_is_deterministic() {
        let expr = parse("a + b * c").unwrap().to_unbound();
        let variables = names(&[
            ("a", VariableReference::Object(ObjectId::new(1))),
            ("b", VariableReference::Object(ObjectId::new(2))),
            ("c", VariableReference::Object(ObjectId::new(3))),
        ]);
        let first = bind(&expr, &variables, &HashMap::new()).unwrap();
        let second = bind(&expr, &variables, &HashMap::new()).unwrap();
        assert_eq!(first, second);
    }
}
