//! Overload-group validation (§4.5 phase 1): grouping body-less signatures
//! together with the single implementation that backs them, the way the
//! teacher's declaration checker groups repeated `function`/method
//! declarations of the same name before building a callable type for them.

use stypec_types::{FunctionSignature, OverloadedFunction};

/// One name's worth of declarations collected in source order, before
/// they're known to form a valid overload group.
#[derive(Debug, Default)]
pub struct OverloadGroup {
    /// Body-less signatures, in declaration order.
    pub signatures: Vec<FunctionSignature>,
    /// The implementation signature, if one has been seen yet.
    pub implementation: Option<FunctionSignature>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverloadError {
    /// More than one implementation was declared for the same name.
    MultipleImplementations,
    /// Every signature was body-less; no implementation backs them (an
    /// abstract-method group is the one case this is legal — the caller
    /// decides whether to treat it as an error using `allow_bodyless_group`).
    NoImplementation,
    /// The implementation accepts fewer required arguments than some
    /// signature declares reachable — §4.5: "the implementation's minArity
    /// must not exceed any signature's minArity".
    ImplementationArityTooNarrow,
}

impl OverloadGroup {
    pub fn push(&mut self, signature: FunctionSignature, has_body: bool) -> Result<(), OverloadError> {
        if has_body {
            if self.implementation.is_some() {
                return Err(OverloadError::MultipleImplementations);
            }
            self.implementation = Some(signature);
        } else {
            self.signatures.push(signature);
        }
        Ok(())
    }

    /// Finalizes the group into a callable type: a plain `Function` when
    /// there was exactly one declaration and it had a body, an
    /// `OverloadedFunction` when body-less signatures preceded the
    /// implementation, or an error if the group's shape is invalid.
    ///
    /// `allow_bodyless_group` permits a group with no implementation at all
    /// (abstract methods, ambient/`.d.ts`-style declarations), returning an
    /// `OverloadedFunction` whose `implementation` is synthesized as the
    /// widest signature (falling back to the last one declared) purely so
    /// downstream code always has something to call through.
    pub fn finish(self, allow_bodyless_group: bool) -> Result<CallableShape, OverloadError> {
        match self.implementation {
            Some(implementation) => {
                if let Some(bad) = self.signatures.iter().find(|s| s.min_arity > implementation.min_arity) {
                    let _ = bad;
                    return Err(OverloadError::ImplementationArityTooNarrow);
                }
                if self.signatures.is_empty() {
                    Ok(CallableShape::Single(implementation))
                } else {
                    Ok(CallableShape::Overloaded(OverloadedFunction { signatures: self.signatures, implementation }))
                }
            }
            None if allow_bodyless_group && !self.signatures.is_empty() => {
                let implementation = self.signatures.last().cloned().expect("checked non-empty above");
                Ok(CallableShape::Overloaded(OverloadedFunction { signatures: self.signatures, implementation }))
            }
            None => Err(OverloadError::NoImplementation),
        }
    }
}

#[derive(Debug, Clone)]
pub enum CallableShape {
    Single(FunctionSignature),
    Overloaded(OverloadedFunction),
}

impl CallableShape {
    pub fn into_ty(self) -> stypec_types::Ty {
        match self {
            CallableShape::Single(sig) => std::rc::Rc::new(stypec_types::TypeInfo::Function(sig)),
            CallableShape::Overloaded(overloaded) => std::rc::Rc::new(stypec_types::TypeInfo::OverloadedFunction(overloaded)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stypec_types::{PrimitiveKind, TypeInfo};

    fn sig(min_arity: usize) -> FunctionSignature {
        FunctionSignature {
            params: vec![TypeInfo::primitive(PrimitiveKind::Number); min_arity],
            return_type: TypeInfo::primitive(PrimitiveKind::Void),
            min_arity,
            has_rest: false,
            this_type: None,
        }
    }

    #[test]
    fn single_declaration_with_body_is_a_plain_function() {
        let mut group = OverloadGroup::default();
        group.push(sig(1), true).unwrap();
        matches!(group.finish(false).unwrap(), CallableShape::Single(_));
    }

    #[test]
    fn signatures_plus_implementation_form_an_overloaded_function() {
        let mut group = OverloadGroup::default();
        group.push(sig(1), false).unwrap();
        group.push(sig(1), false).unwrap();
        group.push(sig(1), true).unwrap();
        assert!(matches!(group.finish(false).unwrap(), CallableShape::Overloaded(_)));
    }

    #[test]
    fn two_implementations_is_an_error() {
        let mut group = OverloadGroup::default();
        group.push(sig(1), true).unwrap();
        assert_eq!(group.push(sig(1), true), Err(OverloadError::MultipleImplementations));
    }

    #[test]
    fn implementation_narrower_than_a_signature_is_an_error() {
        let mut group = OverloadGroup::default();
        group.push(sig(2), false).unwrap();
        group.push(sig(1), true).unwrap();
        assert!(matches!(group.finish(false), Err(OverloadError::ImplementationArityTooNarrow)));
    }

    #[test]
    fn bodyless_group_without_implementation_is_an_error_unless_allowed() {
        let mut group = OverloadGroup::default();
        group.push(sig(1), false).unwrap();
        assert!(matches!(group.finish(false), Err(OverloadError::NoImplementation)));
        let mut group = OverloadGroup::default();
        group.push(sig(1), false).unwrap();
        assert!(group.finish(true).is_ok());
    }
}
