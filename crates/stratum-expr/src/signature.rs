//! Function signatures the binder checks calls against.

use std::fmt;

use stratum_value::ValueType;

/// The set of value types an argument position accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum UnionType {
    Any,
    Concrete(ValueType),
    Union(Vec<ValueType>),
}

impl UnionType {
    /// Whether a value of `value_type` satisfies this position, following
    /// the same convertibility graph the value layer uses elsewhere.
    pub fn accepts(&self, value_type: ValueType) -> bool {
        match self {
            UnionType::Any => true,
            UnionType::Concrete(expected) => stratum_value::is_convertible(value_type, *expected),
            UnionType::Union(options) => options.iter().any(|&expected| stratum_value::is_convertible(value_type, expected)),
        }
    }
}

impl fmt::Display for UnionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnionType::Any => write!(f, "any"),
            UnionType::Concrete(t) => write!(f, "{t}"),
            UnionType::Union(options) => {
                let rendered: Vec<String> = options.iter().map(|t| t.to_string()).collect();
                write!(f, "{}", rendered.join(" | "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDesc {
    pub name: String,
    pub value_type: UnionType,
}

impl ArgumentDesc {
    pub fn new(name: impl Into<String>, value_type: UnionType) -> Self {
        Self {
            name: name.into(),
            value_type,
        }
    }
}

/// A host-declared function's calling convention: a fixed prefix of
/// positional arguments plus an optional variadic tail, all sharing one
/// return type.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub positional: Vec<ArgumentDesc>,
    pub variadic: Option<ArgumentDesc>,
    pub returns: ValueType,
}

/// Why a call site's argument list didn't match a [`FunctionSignature`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureMismatch {
    InvalidArity { expected_at_least: usize, expected_at_most: Option<usize>, got: usize },
    ArgumentTypeMismatch { index: usize },
}

impl FunctionSignature {
    pub fn new(returns: ValueType) -> Self {
        Self {
            positional: Vec::new(),
            variadic: None,
            returns,
        }
    }

    pub fn with_positional(mut self, arg: ArgumentDesc) -> Self {
        self.positional.push(arg);
        self
    }

    pub fn with_variadic(mut self, arg: ArgumentDesc) -> Self {
        self.variadic = Some(arg);
        self
    }

    /// Check a call site's argument types against this signature.
    ///
    /// Each argument's type may be `None` when it cannot be determined
    /// without evaluating the call (e.g. an object-backed variable whose
    /// attribute type is only known once a frame is queried); such
    /// positions are counted for arity but skipped for the type check.
    pub fn validate(&self, args: &[Option<ValueType>]) -> Result<(), SignatureMismatch> {
        let min = self.positional.len();
        if args.len() < min || (self.variadic.is_none() && args.len() > min) {
            return Err(SignatureMismatch::InvalidArity {
                expected_at_least: min,
                expected_at_most: if self.variadic.is_none() { Some(min) } else { None },
                got: args.len(),
            });
        }

        for (index, (arg_type, desc)) in args.iter().zip(self.positional.iter()).enumerate() {
            let Some(arg_type) = arg_type else { continue };
            if !desc.value_type.accepts(*arg_type) {
                return Err(SignatureMismatch::ArgumentTypeMismatch { index });
            }
        }

        if let Some(variadic) = &self.variadic {
            for (index, arg_type) in args.iter().enumerate().skip(min) {
                let Some(arg_type) = arg_type else { continue };
                if !variadic.value_type.accepts(*arg_type) {
                    return Err(SignatureMismatch::ArgumentTypeMismatch { index });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use stratum_value::AtomType;

    use super::*;

    fn int_desc(name: &str) -> ArgumentDesc {
        ArgumentDesc::new(name, UnionType::Concrete(ValueType::Atom(AtomType::Int)))
    }

    #[test]
    fn fixed_arity_rejects_wrong_count() {
        let sig = FunctionSignature::new(ValueType::Atom(AtomType::Int)).with_positional(int_desc("x"));
        assert!(sig.validate(&[Some(ValueType::Atom(AtomType::Int))]).is_ok());
        assert!(matches!(
            sig.validate(&[]).unwrap_err(),
            SignatureMismatch::InvalidArity { .. }
        ));
        assert!(matches!(
            sig.validate(&[Some(ValueType::Atom(AtomType::Int)), Some(ValueType::Atom(AtomType::Int))])
                .unwrap_err(),
            SignatureMismatch::InvalidArity { .. }
        ));
    }

    #[test]
    fn variadic_accepts_any_extra_count() {
        let sig = FunctionSignature::new(ValueType::Atom(AtomType::Int)).with_variadic(int_desc("rest"));
        assert!(sig.validate(&[]).is_ok());
        assert!(sig.validate(&[Some(ValueType::Atom(AtomType::Int)); 5]).is_ok());
    }

    #[test]
    fn type_mismatch_reports_the_offending_index() {
        let sig = FunctionSignature::new(ValueType::Atom(AtomType::Int))
            .with_positional(int_desc("x"))
            .with_positional(int_desc("y"));
        let err = sig
            .validate(&[Some(ValueType::Atom(AtomType::Int)), Some(ValueType::Atom(AtomType::Bool))])
            .unwrap_err();
        assert_eq!(err, SignatureMismatch::ArgumentTypeMismatch { index: 1 });
    }

    #[test]
    fn convertible_types_are_accepted() {
        let sig = FunctionSignature::new(ValueType::Atom(AtomType::Double)).with_positional(ArgumentDesc::new(
            "x",
            UnionType::Concrete(ValueType::Atom(AtomType::Double)),
        ));
        assert!(sig.validate(&[Some(ValueType::Atom(AtomType::Int))]).is_ok());
    }

    #[test]
    fn unknown_argument_types_skip_the_type_check_but_still_count_for_arity() {
        let sig = FunctionSignature::new(ValueType::Atom(AtomType::Int))
            .with_positional(int_desc("x"))
            .with_positional(int_desc("y"));
        assert!(sig.validate(&[None, Some(ValueType::Atom(AtomType::Bool))]).is_ok());
        assert!(matches!(sig.validate(&[None]).unwrap_err(), SignatureMismatch::InvalidArity { .. }));
    }
}
