//! The Expression Checker (§4.3): recursive descent over [`Expr`], producing
//! a [`Ty`] for every node and recording it into the type map as it goes.
//! Contextual typing (an expected type flowing in from the enclosing
//! position — a variable's annotation, a call argument's parameter type) is
//! threaded as `Option<&Ty>` rather than a second pass, the way the
//! teacher's `expr.rs` resolves object-literal and arrow-function types
//! against the slot they're being assigned into.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use stypec_ast::{
    ArrayElement, Argument, ArrowBody, AssignOp, BinaryOp, Expr, ExprKind, Literal, LogicalOp, MemberKey, NodeId,
    ObjectProperty, Param, PropertyKey, TemplateLiteral, TypeExpr, TypeExprKind, UnaryOp,
};
use stypec_common::diagnostics::ErrorKind;
use stypec_common::Span;
use stypec_solver::{
    narrow_discriminant, narrow_equality, narrow_has_member, narrow_instance_of, narrow_nullish, narrow_truthy,
    narrow_typeof, non_nullish, complete_bindings, infer_type_args,
};
use stypec_types::class::{Class, ClassHandle, InstanceOf};
use stypec_types::generics::substitute;
use stypec_types::{
    make_union, FunctionSignature, GenericDefKind, GenericRef, IndexMapWrapper, OrderedFloat, OverloadedFunction,
    PrimitiveKind, Record, Ty, TypeInfo,
};

use crate::context::{Checker, FunctionContext};

impl<'a> Checker<'a> {
    pub fn check_expr(&mut self, expr: &Expr) -> Ty {
        self.check_expr_contextual(expr, None)
    }

    pub fn check_expr_contextual(&mut self, expr: &Expr, expected: Option<&Ty>) -> Ty {
        let ty = self.check_expr_kind(expr, expected);
        self.record(expr.id, ty)
    }

    fn check_expr_kind(&mut self, expr: &Expr, expected: Option<&Ty>) -> Ty {
        match &expr.kind {
            ExprKind::Literal(lit) => check_literal(lit),
            ExprKind::Identifier(name) => self.check_identifier(name, expr.span),
            ExprKind::This => self.current_function().this_type.clone().unwrap_or_else(TypeInfo::any),
            ExprKind::Super => self.check_super(expr.span),
            ExprKind::ImportMeta => TypeInfo::any(),
            ExprKind::Array(elements) => self.check_array(elements, expected),
            ExprKind::Object(props) => self.check_object(props, expected, expr.span),
            ExprKind::Grouping(inner) => self.check_expr_contextual(inner, expected),
            ExprKind::Binary { op, left, right } => self.check_binary(*op, left, right, expr.span),
            ExprKind::Logical { op, left, right } => self.check_logical(*op, left, right),
            ExprKind::Unary { op, operand } => self.check_unary(*op, operand),
            ExprKind::Update { operand, .. } => {
                self.check_expr(operand);
                TypeInfo::primitive(PrimitiveKind::Number)
            }
            ExprKind::Assignment { op, target, value } => self.check_assignment(*op, target, value, expr.span),
            ExprKind::Ternary { test, consequent, alternate } => {
                self.check_ternary(test, consequent, alternate, expected)
            }
            ExprKind::Sequence(exprs) => {
                let mut last = TypeInfo::any();
                for e in exprs {
                    last = self.check_expr(e);
                }
                last
            }
            ExprKind::Call { callee, type_args, args, optional } => {
                self.check_call(callee, type_args, args, *optional, expr.span)
            }
            ExprKind::New { callee, type_args, args } => self.check_new(callee, type_args, args, expr.span),
            ExprKind::Member { object, key, optional } => self.check_member(object, key, *optional, expr.span),
            ExprKind::Arrow { params, body, return_type, is_async } => {
                self.check_arrow(params, body, return_type.as_ref(), *is_async)
            }
            ExprKind::FunctionExpr { params, body, return_type, is_async, is_generator, .. } => {
                let sig = self.check_function_like(params, Some(body), return_type.as_ref(), None, *is_async, *is_generator);
                Rc::new(TypeInfo::Function(sig))
            }
            ExprKind::ClassExpr(cd) => crate::classes::check_class_expr(self, cd, expr.span),
            ExprKind::TemplateLiteral(tpl) => self.check_template(tpl),
            ExprKind::TaggedTemplate { tag, template } => {
                self.check_expr(tag);
                self.check_template(template);
                TypeInfo::any()
            }
            ExprKind::Spread(inner) => self.check_expr(inner),
            ExprKind::TypeAssertion { expr: inner, ty } => self.check_type_assertion(inner, ty, expr.span),
            ExprKind::Satisfies { expr: inner, ty } => self.check_satisfies(inner, ty),
            ExprKind::NonNull(inner) => {
                let t = self.check_expr(inner);
                non_nullish(&t)
            }
            ExprKind::Delete(inner) => {
                self.check_expr(inner);
                TypeInfo::primitive(PrimitiveKind::Boolean)
            }
            ExprKind::Await(inner) => {
                let t = self.check_expr(inner);
                unwrap_promise(&t)
            }
            ExprKind::Yield { argument, .. } => {
                if let Some(a) = argument {
                    self.check_expr(a);
                }
                TypeInfo::any()
            }
            ExprKind::DynamicImport(inner) => {
                self.check_expr(inner);
                TypeInfo::any()
            }
        }
    }

    fn check_template(&mut self, tpl: &TemplateLiteral) -> Ty {
        for e in &tpl.expressions {
            self.check_expr(e);
        }
        TypeInfo::primitive(PrimitiveKind::String)
    }

    fn check_identifier(&mut self, name: &str, span: Span) -> Ty {
        if name == "undefined" {
            return TypeInfo::primitive(PrimitiveKind::Undefined);
        }
        if let Some(ty) = self.narrowing.get(name).cloned() {
            return ty;
        }
        if let Some(ty) = self.env.lookup_value(name) {
            return ty;
        }
        if let Some(ty) = self.env.lookup_type(name) {
            // A class, enum, or namespace name used where a value is
            // expected (`new Foo()`'s callee, `Color.Red`) resolves through
            // the type table since the binder never gives these a separate
            // value binding.
            return ty;
        }
        self.error(ErrorKind::UnknownName, format!("cannot find name '{name}'"), span);
        TypeInfo::any()
    }

    fn check_super(&mut self, span: Span) -> Ty {
        if let Some(this_ty) = self.current_function().this_type.clone() {
            if let TypeInfo::Instance(inst) = this_ty.as_ref() {
                if let Some(super_handle) = inst.class.get().superclass.clone() {
                    return Rc::new(TypeInfo::Instance(InstanceOf { class: super_handle, type_args: vec![] }));
                }
            }
        }
        self.error(ErrorKind::TypeMismatch, "'super' used outside of a derived class", span);
        TypeInfo::any()
    }

    fn check_array(&mut self, elements: &[ArrayElement], expected: Option<&Ty>) -> Ty {
        let elem_expected = expected.and_then(|e| match e.as_ref() {
            TypeInfo::Array(inner) => Some(inner.clone()),
            _ => None,
        });
        let mut member_tys = Vec::new();
        for el in elements {
            match el {
                ArrayElement::Item(e) => member_tys.push(self.check_expr_contextual(e, elem_expected.as_ref())),
                ArrayElement::Spread(e) => {
                    let t = self.check_expr(e);
                    match t.as_ref() {
                        TypeInfo::Array(inner) => member_tys.push(inner.clone()),
                        TypeInfo::Tuple(tuple) => {
                            for el in &tuple.elements {
                                member_tys.push(el.ty.clone());
                            }
                            if let Some(rest) = &tuple.rest {
                                member_tys.push(rest.clone());
                            }
                        }
                        _ => member_tys.push(TypeInfo::any()),
                    }
                }
                ArrayElement::Hole => member_tys.push(TypeInfo::primitive(PrimitiveKind::Undefined)),
            }
        }
        let elem_ty = if member_tys.is_empty() { elem_expected.unwrap_or_else(TypeInfo::any) } else { make_union(member_tys) };
        Rc::new(TypeInfo::Array(elem_ty))
    }

    /// Checks an object literal's members, then — since a literal is
    /// "fresh" only at the position it's written in, never once it has
    /// flowed through an intermediate binding — validates it against a
    /// directly-contextual expected type for excess properties (§4.1
    /// "fresh object literal" check). `expected` here is only ever the
    /// type flowing in from this literal's own syntactic position (a
    /// variable's annotation, a call argument's parameter type); a literal
    /// assigned to an untyped variable and read back later is no longer
    /// fresh by the time it reaches an annotated slot, so it is compared
    /// structurally instead, with no excess-property diagnostic.
    fn check_object(&mut self, props: &[ObjectProperty], expected: Option<&Ty>, span: Span) -> Ty {
        let mut fields = indexmap::IndexMap::new();
        let mut string_index = None;
        let mut number_index = None;
        for prop in props {
            match prop {
                ObjectProperty::KeyValue(pa) => {
                    if let PropertyKey::Computed(ke) = &pa.key {
                        self.check_expr(ke);
                    }
                    if let Some(name) = property_key_name(&pa.key) {
                        let expected_field = expected.and_then(|e| self.solver.lookup_member(e, &name));
                        let ty = self.check_expr_contextual(&pa.value, expected_field.as_ref());
                        fields.insert(name, ty);
                    } else {
                        self.check_expr(&pa.value);
                    }
                }
                ObjectProperty::Shorthand(name) => {
                    let ty = self.check_identifier(name, Span::dummy());
                    fields.insert(name.clone(), ty);
                }
                ObjectProperty::Method { key, params, body, is_async, is_generator } => {
                    if let PropertyKey::Computed(ke) = key {
                        self.check_expr(ke);
                    }
                    if let Some(name) = property_key_name(key) {
                        let sig = self.check_function_like(params, Some(body), None, None, *is_async, *is_generator);
                        fields.insert(name, Rc::new(TypeInfo::Function(sig)));
                    }
                }
                ObjectProperty::Getter { key, body, return_type } => {
                    if let Some(name) = property_key_name(key) {
                        let sig = self.check_function_like(&[], Some(body), return_type.as_ref(), None, false, false);
                        fields.insert(name, sig.return_type);
                    }
                }
                ObjectProperty::Setter { key, param, body } => {
                    if let Some(name) = property_key_name(key) {
                        let params = std::slice::from_ref(param);
                        let sig = self.check_function_like(params, Some(body), None, None, false, false);
                        fields.entry(name).or_insert_with(|| sig.params.first().cloned().unwrap_or_else(TypeInfo::any));
                    }
                }
                ObjectProperty::Spread(inner) => {
                    let t = self.check_expr(inner);
                    if let TypeInfo::Record(r) = t.as_ref() {
                        for (k, v) in r.fields.0.iter() {
                            fields.insert(k.clone(), v.clone());
                        }
                        string_index = r.string_index.clone().or(string_index);
                        number_index = r.number_index.clone().or(number_index);
                    }
                }
            }
        }
        let record = Record { fields: IndexMapWrapper(fields), string_index, number_index, symbol_index: None };
        if let Some(exp) = expected {
            for name in stypec_solver::excess_properties(exp, &record) {
                self.error(
                    ErrorKind::TypeMismatch,
                    format!("object literal may only specify known properties, and '{name}' does not exist in the expected type"),
                    span,
                );
            }
        }
        Rc::new(TypeInfo::Record(record))
    }

    fn check_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr, span: Span) -> Ty {
        let lt = self.check_expr(left);
        let rt = self.check_expr(right);
        use BinaryOp::*;
        match op {
            Add => {
                let l_is_str = matches!(lt.as_ref(), TypeInfo::Primitive(PrimitiveKind::String) | TypeInfo::LiteralString(_));
                let r_is_str = matches!(rt.as_ref(), TypeInfo::Primitive(PrimitiveKind::String) | TypeInfo::LiteralString(_));
                if l_is_str || r_is_str {
                    TypeInfo::primitive(PrimitiveKind::String)
                } else {
                    self.check_bigint_mix(&lt, &rt, span);
                    if is_bigint(&lt) && is_bigint(&rt) { TypeInfo::primitive(PrimitiveKind::BigInt) } else { TypeInfo::primitive(PrimitiveKind::Number) }
                }
            }
            Sub | Mul | Div | Mod | Exp | BitAnd | BitOr | BitXor | Shl | Shr => {
                self.check_bigint_mix(&lt, &rt, span);
                if is_bigint(&lt) && is_bigint(&rt) { TypeInfo::primitive(PrimitiveKind::BigInt) } else { TypeInfo::primitive(PrimitiveKind::Number) }
            }
            UShr => {
                if is_bigint(&lt) || is_bigint(&rt) {
                    self.error(ErrorKind::UnsupportedShift, "'>>>' is not supported on 'bigint'", span);
                }
                TypeInfo::primitive(PrimitiveKind::Number)
            }
            Lt | Gt | Le | Ge | EqEq | NotEq | EqEqEq | NotEqEq | In | InstanceOf => {
                TypeInfo::primitive(PrimitiveKind::Boolean)
            }
        }
    }

    fn check_bigint_mix(&mut self, lt: &Ty, rt: &Ty, span: Span) {
        if is_bigint(lt) != is_bigint(rt) && !TypeInfo::is_any(lt) && !TypeInfo::is_any(rt) {
            self.error(ErrorKind::MixedBigInt, "cannot mix 'bigint' with other types in arithmetic", span);
        }
    }

    fn check_logical(&mut self, op: LogicalOp, left: &Expr, right: &Expr) -> Ty {
        let (lt, then_d, else_d) = self.guard_effects(left);
        match op {
            LogicalOp::And => {
                let (_, falsy_a) = narrow_truthy(&lt);
                self.narrowing.push();
                for (p, t) in &then_d {
                    self.narrowing.narrow(p.clone(), t.clone());
                }
                let rt = self.check_expr(right);
                self.narrowing.pop();
                make_union(vec![falsy_a, rt])
            }
            LogicalOp::Or => {
                let (truthy_a, _) = narrow_truthy(&lt);
                self.narrowing.push();
                for (p, t) in &else_d {
                    self.narrowing.narrow(p.clone(), t.clone());
                }
                let rt = self.check_expr(right);
                self.narrowing.pop();
                make_union(vec![truthy_a, rt])
            }
            LogicalOp::NullishCoalescing => {
                let non_null = non_nullish(&lt);
                let rt = self.check_expr(right);
                make_union(vec![non_null, rt])
            }
        }
    }

    fn check_unary(&mut self, op: UnaryOp, operand: &Expr) -> Ty {
        let ty = self.check_expr(operand);
        match op {
            UnaryOp::Plus | UnaryOp::Minus => {
                if is_bigint(&ty) { TypeInfo::primitive(PrimitiveKind::BigInt) } else { TypeInfo::primitive(PrimitiveKind::Number) }
            }
            UnaryOp::BitNot => {
                if is_bigint(&ty) { TypeInfo::primitive(PrimitiveKind::BigInt) } else { TypeInfo::primitive(PrimitiveKind::Number) }
            }
            UnaryOp::Not => TypeInfo::primitive(PrimitiveKind::Boolean),
            UnaryOp::Typeof => TypeInfo::primitive(PrimitiveKind::String),
            UnaryOp::Void => TypeInfo::primitive(PrimitiveKind::Undefined),
        }
    }

    fn check_assignment(&mut self, op: AssignOp, target: &Expr, value: &Expr, span: Span) -> Ty {
        let target_ty = self.check_expr(target);
        let value_ty = self.check_expr_contextual(value, Some(&target_ty));
        let result_ty = match op {
            AssignOp::Assign => value_ty,
            AssignOp::AddAssign => {
                if matches!(target_ty.as_ref(), TypeInfo::Primitive(PrimitiveKind::String) | TypeInfo::LiteralString(_)) {
                    target_ty.clone()
                } else {
                    TypeInfo::primitive(PrimitiveKind::Number)
                }
            }
            AssignOp::AndAssign | AssignOp::OrAssign | AssignOp::NullishAssign => make_union(vec![target_ty.clone(), value_ty]),
            _ => target_ty.clone(),
        };
        if matches!(op, AssignOp::Assign) && !self.solver.is_assignable(&target_ty, &result_ty) {
            self.error(ErrorKind::TypeMismatch, "value is not assignable to target's type", span);
        }
        if let Some(path) = expr_path(target) {
            self.narrowing.invalidate(&path);
            self.narrowing.narrow(path, result_ty.clone());
        }
        result_ty
    }

    fn check_ternary(&mut self, test: &Expr, consequent: &Expr, alternate: &Expr, expected: Option<&Ty>) -> Ty {
        let (_, then_d, else_d) = self.guard_effects(test);
        self.narrowing.push();
        for (p, t) in &then_d {
            self.narrowing.narrow(p.clone(), t.clone());
        }
        let then_ty = self.check_expr_contextual(consequent, expected);
        self.narrowing.pop();
        self.narrowing.push();
        for (p, t) in &else_d {
            self.narrowing.narrow(p.clone(), t.clone());
        }
        let else_ty = self.check_expr_contextual(alternate, expected);
        self.narrowing.pop();
        make_union(vec![then_ty, else_ty])
    }

    fn check_argument(&mut self, arg: &Argument) -> Ty {
        match arg {
            Argument::Normal(e) => self.check_expr(e),
            Argument::Spread(e) => self.check_expr(e),
        }
    }

    fn check_call(&mut self, callee: &Expr, type_args: &[TypeExpr], args: &[Argument], optional: bool, span: Span) -> Ty {
        let callee_ty = self.check_expr(callee);
        let target = if optional { non_nullish(&callee_ty) } else { callee_ty.clone() };
        let result = match target.as_ref() {
            TypeInfo::Function(sig) => {
                let sig = sig.clone();
                self.check_call_signature(&sig, type_args, args, span)
            }
            TypeInfo::OverloadedFunction(of) => {
                let of = of.clone();
                self.check_overloaded_call(&of, args, span)
            }
            TypeInfo::GenericFunction(def) => {
                let def = def.clone();
                self.check_generic_call(&def, type_args, args, span)
            }
            _ if TypeInfo::is_any(target.as_ref()) => {
                for a in args {
                    self.check_argument(a);
                }
                TypeInfo::any()
            }
            _ => {
                self.error(ErrorKind::NotCallable, "expression is not callable", span);
                for a in args {
                    self.check_argument(a);
                }
                TypeInfo::any()
            }
        };
        if optional && !TypeInfo::is_any(callee_ty.as_ref()) {
            make_union(vec![result, TypeInfo::primitive(PrimitiveKind::Undefined)])
        } else {
            result
        }
    }

    fn check_call_signature(&mut self, sig: &FunctionSignature, type_args: &[TypeExpr], args: &[Argument], span: Span) -> Ty {
        let _ = type_args;
        self.check_args_against_params(&sig.params, sig.has_rest, sig.min_arity, args, span);
        sig.return_type.clone()
    }

    fn check_overloaded_call(&mut self, of: &OverloadedFunction, args: &[Argument], span: Span) -> Ty {
        for sig in &of.signatures {
            if self.args_match_signature(sig, args) {
                self.check_args_against_params(&sig.params, sig.has_rest, sig.min_arity, args, span);
                return sig.return_type.clone();
            }
        }
        self.check_args_against_params(&of.implementation.params, of.implementation.has_rest, of.implementation.min_arity, args, span);
        of.implementation.return_type.clone()
    }

    fn args_match_signature(&mut self, sig: &FunctionSignature, args: &[Argument]) -> bool {
        if args.len() < sig.min_arity || (!sig.has_rest && args.len() > sig.params.len()) {
            return false;
        }
        for (param_ty, arg) in sig.params.iter().zip(args.iter()) {
            let arg_ty = self.check_argument(arg);
            if !self.solver.is_assignable(param_ty, &arg_ty) {
                return false;
            }
        }
        true
    }

    fn check_generic_call(&mut self, def: &GenericRef, type_args: &[TypeExpr], args: &[Argument], span: Span) -> Ty {
        let sig = match &def.kind {
            GenericDefKind::Function(sig) => sig.clone(),
            _ => {
                self.error(ErrorKind::NotCallable, "expression is not callable", span);
                return TypeInfo::any();
            }
        };
        let arg_tys: Vec<Ty> = args.iter().map(|a| self.check_argument(a)).collect();
        let bindings = if !type_args.is_empty() {
            let mut map = FxHashMap::default();
            for (tp, te) in def.type_params.iter().zip(type_args.iter()) {
                map.insert(tp.id, self.resolve_type(te));
            }
            complete_bindings(&def.type_params, map)
        } else {
            let inferred = infer_type_args(&def.type_params, &sig.params, &arg_tys);
            complete_bindings(&def.type_params, inferred)
        };
        let sig_ty = Rc::new(TypeInfo::Function(sig));
        let resolved = substitute(&sig_ty, &bindings);
        let resolved_sig = match resolved.as_ref() {
            TypeInfo::Function(s) => s.clone(),
            _ => unreachable!("substituting a Function template always yields a Function"),
        };
        self.check_args_against_params(&resolved_sig.params, resolved_sig.has_rest, resolved_sig.min_arity, args, span);
        resolved_sig.return_type
    }

    fn check_args_against_params(&mut self, params: &[Ty], has_rest: bool, min_arity: usize, args: &[Argument], span: Span) {
        let has_spread_arg = args.iter().any(|a| matches!(a, Argument::Spread(_)));
        if args.len() < min_arity && !has_spread_arg {
            self.error(ErrorKind::ArityMismatch, format!("expected at least {min_arity} arguments, got {}", args.len()), span);
        } else if !has_rest && args.len() > params.len() && !has_spread_arg {
            self.error(ErrorKind::ArityMismatch, format!("expected at most {} arguments, got {}", params.len(), args.len()), span);
        }
        for (i, arg) in args.iter().enumerate() {
            let expected = params.get(i).or_else(|| if has_rest { params.last() } else { None });
            match arg {
                Argument::Normal(e) => {
                    let arg_ty = self.check_expr_contextual(e, expected);
                    if let Some(expected_ty) = expected {
                        if !self.solver.is_assignable(expected_ty, &arg_ty) {
                            self.error(ErrorKind::TypeMismatch, format!("argument {} is not assignable to its parameter's type", i + 1), e.span);
                        }
                    }
                }
                Argument::Spread(e) => {
                    self.check_expr(e);
                }
            }
        }
    }

    fn check_new(&mut self, callee: &Expr, type_args: &[TypeExpr], args: &[Argument], span: Span) -> Ty {
        let name = match &callee.kind {
            ExprKind::Identifier(name) => name.clone(),
            _ => {
                self.check_expr(callee);
                for a in args {
                    self.check_argument(a);
                }
                return TypeInfo::any();
            }
        };
        let synthetic =
            TypeExpr { id: NodeId::DUMMY, span, kind: TypeExprKind::Reference { name, type_args: type_args.to_vec() } };
        let instance_ty = self.resolve_type(&synthetic);
        if let TypeInfo::Instance(inst) = instance_ty.as_ref() {
            if inst.class.get().is_abstract {
                self.error(
                    ErrorKind::AbstractInstantiation,
                    format!("cannot create an instance of abstract class '{}'", inst.class.name()),
                    span,
                );
            }
            match Class::resolve_member(&inst.class, "constructor") {
                Some(ctor) => {
                    if let TypeInfo::Function(sig) = ctor.ty.as_ref() {
                        let sig = sig.clone();
                        self.check_args_against_params(&sig.params, sig.has_rest, sig.min_arity, args, span);
                    } else {
                        for a in args {
                            self.check_argument(a);
                        }
                    }
                }
                None => {
                    for a in args {
                        self.check_argument(a);
                    }
                }
            }
        } else {
            for a in args {
                self.check_argument(a);
            }
        }
        instance_ty
    }

    fn check_member(&mut self, object: &Expr, key: &MemberKey, optional: bool, span: Span) -> Ty {
        let object_ty = self.check_expr(object);
        let target = if optional { non_nullish(&object_ty) } else { object_ty.clone() };
        let result = match key {
            MemberKey::Name(name) | MemberKey::Private(name) => self.member_access(&target, name, span),
            MemberKey::Index(index_expr) => {
                let index_ty = self.check_expr(index_expr);
                index_access(&target, &index_ty)
            }
        };
        if optional {
            make_union(vec![result, TypeInfo::primitive(PrimitiveKind::Undefined)])
        } else {
            result
        }
    }

    fn member_access(&mut self, target: &Ty, name: &str, span: Span) -> Ty {
        if let TypeInfo::Instance(inst) = target.as_ref() {
            if let Some(member) = Class::resolve_member(&inst.class, name) {
                if (member.is_private || member.is_protected) && !self.access_allowed(&inst.class, member.is_private) {
                    self.error(
                        ErrorKind::AccessViolation,
                        format!("'{name}' is private or protected and only accessible within its class"),
                        span,
                    );
                }
                return member.ty;
            }
        }
        match self.solver.lookup_member(target, name) {
            Some(ty) => ty,
            None => {
                if !TypeInfo::is_any(target.as_ref()) && !TypeInfo::is_unknown(target.as_ref()) {
                    self.error(ErrorKind::UnknownName, format!("property '{name}' does not exist on this type"), span);
                }
                TypeInfo::any()
            }
        }
    }

    fn access_allowed(&self, handle: &ClassHandle, is_private: bool) -> bool {
        match &self.current_class {
            Some(current) if is_private => current == handle,
            Some(current) => Class::is_subclass_of(current, handle) || Class::is_subclass_of(handle, current),
            None => false,
        }
    }

    fn check_arrow(&mut self, params: &[Param], body: &ArrowBody, return_type: Option<&TypeExpr>, is_async: bool) -> Ty {
        let this_type = self.current_function().this_type.clone();
        match body {
            ArrowBody::Block(block) => {
                let sig = self.check_function_like(params, Some(block), return_type, this_type, is_async, false);
                Rc::new(TypeInfo::Function(sig))
            }
            ArrowBody::Expr(expr_body) => {
                let param_tys: Vec<Ty> = params.iter().map(|p| p.ty.as_ref().map(|t| self.resolve_type(t)).unwrap_or_else(TypeInfo::any)).collect();
                let min_arity = params.iter().take_while(|p| !p.optional && !p.rest && p.default.is_none()).count();
                let has_rest = params.last().map(|p| p.rest).unwrap_or(false);
                let frame = FunctionContext {
                    return_type: TypeInfo::any(),
                    this_type: this_type.clone(),
                    is_async,
                    is_generator: false,
                    declared: return_type.is_some(),
                    inferred_returns: Vec::new(),
                };
                self.function_stack.push(frame);
                let child_env = self.env.child();
                for (param, ty) in params.iter().zip(param_tys.iter()) {
                    child_env.define_value(param.name.clone(), ty.clone());
                }
                let previous_env = std::mem::replace(&mut self.env, child_env);
                let body_ty = self.check_expr(expr_body);
                self.env = previous_env;
                self.function_stack.pop();
                let declared_return = return_type.map(|t| self.resolve_type(t));
                let raw_return = declared_return.unwrap_or(body_ty);
                let final_return = if is_async { Rc::new(TypeInfo::Promise(raw_return)) } else { raw_return };
                Rc::new(TypeInfo::Function(FunctionSignature {
                    params: param_tys,
                    return_type: final_return,
                    min_arity,
                    has_rest,
                    this_type,
                }))
            }
        }
    }

    fn check_type_assertion(&mut self, inner: &Expr, ty: &TypeExpr, span: Span) -> Ty {
        let inner_ty = self.check_expr(inner);
        let target = self.resolve_type(ty);
        if !self.solver.is_assignable(&target, &inner_ty) && !self.solver.is_assignable(&inner_ty, &target) {
            self.error(
                ErrorKind::TypeMismatch,
                "type assertion is not legal because neither type sufficiently overlaps with the other",
                span,
            );
        }
        target
    }

    fn check_satisfies(&mut self, inner: &Expr, ty: &TypeExpr) -> Ty {
        let target = self.resolve_type(ty);
        let inner_ty = self.check_expr_contextual(inner, Some(&target));
        if !self.solver.is_assignable(&target, &inner_ty) {
            self.error(ErrorKind::TypeMismatch, "expression does not satisfy the expected type", inner.span);
        }
        inner_ty
    }

    /// Checks a function-like body (function declaration, method, arrow
    /// with a block body, object-literal method/getter/setter): pushes a
    /// fresh [`FunctionContext`] and lexical scope, binds parameters, walks
    /// the body, and folds collected `return` types into the signature when
    /// no return type was declared (§4.4 "definite-return / inference").
    pub(crate) fn check_function_like(
        &mut self,
        params: &[Param],
        body: Option<&stypec_ast::Block>,
        return_type: Option<&TypeExpr>,
        this_type: Option<Ty>,
        is_async: bool,
        is_generator: bool,
    ) -> FunctionSignature {
        tracing::trace!(file = %self.file, params = params.len(), has_body = body.is_some(), "body-check start");
        let param_tys: Vec<Ty> = params
            .iter()
            .map(|p| {
                let base = p.ty.as_ref().map(|t| self.resolve_type(t)).unwrap_or_else(TypeInfo::any);
                if p.rest { Rc::new(TypeInfo::Array(base)) } else { base }
            })
            .collect();
        let min_arity = params.iter().take_while(|p| !p.optional && !p.rest && p.default.is_none()).count();
        let has_rest = params.last().map(|p| p.rest).unwrap_or(false);

        let declared_return = return_type.map(|t| self.resolve_type(t));
        let raw_return = declared_return.clone().unwrap_or_else(TypeInfo::any);
        let unwrapped_return = if is_async { unwrap_promise(&raw_return) } else { raw_return };

        let frame = FunctionContext {
            return_type: unwrapped_return,
            this_type: this_type.clone(),
            is_async,
            is_generator,
            declared: declared_return.is_some(),
            inferred_returns: Vec::new(),
        };
        self.function_stack.push(frame);
        self.narrowing.push();
        let prev_loop = std::mem::replace(&mut self.loop_depth, 0);
        let prev_switch = std::mem::replace(&mut self.switch_depth, 0);
        let prev_labels = std::mem::take(&mut self.labels);

        let child_env = self.env.child();
        for (param, ty) in params.iter().zip(param_tys.iter()) {
            child_env.define_value(param.name.clone(), ty.clone());
        }
        let previous_env = std::mem::replace(&mut self.env, child_env);
        if let Some(b) = body {
            self.check_block_stmts(&b.stmts);
        }
        self.env = previous_env;

        self.loop_depth = prev_loop;
        self.switch_depth = prev_switch;
        self.labels = prev_labels;
        self.narrowing.pop();
        let ctx = self.function_stack.pop().expect("pushed above");

        if ctx.declared && !is_generator && !is_void_like(&ctx.return_type) {
            if let Some(b) = body {
                if !crate::stmt::block_terminates(&b.stmts) {
                    self.error(
                        ErrorKind::NonExhaustiveReturn,
                        "function lacks a return statement on every code path",
                        Span::dummy(),
                    );
                }
            }
        }

        let return_ty = if ctx.declared {
            ctx.return_type
        } else if ctx.inferred_returns.is_empty() {
            TypeInfo::primitive(PrimitiveKind::Void)
        } else {
            make_union(ctx.inferred_returns)
        };
        let wrapped_return = if is_generator {
            Rc::new(TypeInfo::GeneratorType(return_ty))
        } else if is_async {
            Rc::new(TypeInfo::Promise(return_ty))
        } else {
            return_ty
        };

        tracing::trace!(file = %self.file, "body-check end");
        FunctionSignature { params: param_tys, return_type: wrapped_return, min_arity, has_rest, this_type }
    }

    /// Computes a condition expression's type plus the narrowing deltas its
    /// true/false branches contribute (§4.2), by type-checking it once and
    /// then reading back the already-recorded sub-expression types rather
    /// than re-evaluating them.
    pub(crate) fn guard_effects(&mut self, expr: &Expr) -> (Ty, FxHashMap<String, Ty>, FxHashMap<String, Ty>) {
        let ty = self.check_expr(expr);
        let (then_d, else_d) = self.compute_guard_deltas(expr);
        (ty, then_d, else_d)
    }

    fn compute_guard_deltas(&self, expr: &Expr) -> (FxHashMap<String, Ty>, FxHashMap<String, Ty>) {
        match &expr.kind {
            ExprKind::Unary { op: UnaryOp::Not, operand } => {
                let (t, e) = self.compute_guard_deltas(operand);
                (e, t)
            }
            ExprKind::Logical { op: LogicalOp::And, left, right } => {
                let (lt, _le) = self.compute_guard_deltas(left);
                let (rt, _re) = self.compute_guard_deltas(right);
                let mut then_d = lt;
                then_d.extend(rt);
                (then_d, FxHashMap::default())
            }
            ExprKind::Logical { op: LogicalOp::Or, left, right } => {
                let (_lt, le) = self.compute_guard_deltas(left);
                let (_rt, re) = self.compute_guard_deltas(right);
                let mut else_d = le;
                else_d.extend(re);
                (FxHashMap::default(), else_d)
            }
            ExprKind::Binary { op, left, right } => self.compute_binary_guard(*op, left, right),
            ExprKind::Call { callee, args, .. } => self.compute_predicate_guard(callee, args),
            _ => {
                if let (Some(path), Some(ty)) = (expr_path(expr), self.type_map.get(expr.id).cloned()) {
                    let (t, f) = narrow_truthy(&ty);
                    let mut then_d = FxHashMap::default();
                    then_d.insert(path.clone(), t);
                    let mut else_d = FxHashMap::default();
                    else_d.insert(path, f);
                    (then_d, else_d)
                } else {
                    (FxHashMap::default(), FxHashMap::default())
                }
            }
        }
    }

    fn compute_binary_guard(&self, op: BinaryOp, left: &Expr, right: &Expr) -> (FxHashMap<String, Ty>, FxHashMap<String, Ty>) {
        let negate = matches!(op, BinaryOp::NotEq | BinaryOp::NotEqEq);
        match op {
            BinaryOp::EqEq | BinaryOp::NotEq | BinaryOp::EqEqEq | BinaryOp::NotEqEq => {
                if let ExprKind::Unary { op: UnaryOp::Typeof, operand } = &left.kind {
                    if let Some(kind) = string_literal(right) {
                        if let (Some(path), Some(ty)) = (expr_path(operand), self.type_map.get(operand.id).cloned()) {
                            let (t, f) = narrow_typeof(&ty, &kind);
                            return pair(path, t, f, negate);
                        }
                    }
                }
                if let ExprKind::Unary { op: UnaryOp::Typeof, operand } = &right.kind {
                    if let Some(kind) = string_literal(left) {
                        if let (Some(path), Some(ty)) = (expr_path(operand), self.type_map.get(operand.id).cloned()) {
                            let (t, f) = narrow_typeof(&ty, &kind);
                            return pair(path, t, f, negate);
                        }
                    }
                }
                let strict = matches!(op, BinaryOp::EqEqEq | BinaryOp::NotEqEq);
                if is_nullish_literal(right) {
                    if let (Some(path), Some(ty)) = (expr_path(left), self.type_map.get(left.id).cloned()) {
                        let include_undefined = !strict || matches!(right.kind, ExprKind::Literal(Literal::Undefined));
                        let (nullish, rest) = narrow_nullish(&ty, include_undefined);
                        return pair(path, nullish, rest, negate);
                    }
                }
                if is_nullish_literal(left) {
                    if let (Some(path), Some(ty)) = (expr_path(right), self.type_map.get(right.id).cloned()) {
                        let include_undefined = !strict || matches!(left.kind, ExprKind::Literal(Literal::Undefined));
                        let (nullish, rest) = narrow_nullish(&ty, include_undefined);
                        return pair(path, nullish, rest, negate);
                    }
                }
                if let ExprKind::Member { object, key: MemberKey::Name(field), optional: false } = &left.kind {
                    if let (Some(parent_path), Some(parent_ty), Some(lit_ty)) =
                        (expr_path(object), self.type_map.get(object.id).cloned(), self.type_map.get(right.id).cloned())
                    {
                        if is_literal_ty(&lit_ty) {
                            let (matching, rest) = narrow_discriminant(self.solver, &parent_ty, field, &lit_ty);
                            return pair(parent_path, matching, rest, negate);
                        }
                    }
                }
                if let (Some(path), Some(ty), Some(lit_ty)) =
                    (expr_path(left), self.type_map.get(left.id).cloned(), self.type_map.get(right.id).cloned())
                {
                    if is_literal_ty(&lit_ty) {
                        let (t, f) = narrow_equality(&ty, &lit_ty);
                        return pair(path, t, f, negate);
                    }
                }
                (FxHashMap::default(), FxHashMap::default())
            }
            BinaryOp::In => {
                if let (Some(member), Some(path), Some(ty)) =
                    (string_literal(left), expr_path(right), self.type_map.get(right.id).cloned())
                {
                    let (has, rest) = narrow_has_member(self.solver, &ty, &member);
                    return pair(path, has, rest, false);
                }
                (FxHashMap::default(), FxHashMap::default())
            }
            BinaryOp::InstanceOf => {
                if let (Some(path), Some(ty)) = (expr_path(left), self.type_map.get(left.id).cloned()) {
                    if let ExprKind::Identifier(name) = &right.kind {
                        if let Some(handle) = resolve_class_handle_by_name(&self.env, name) {
                            let (t, f) = narrow_instance_of(&ty, &handle);
                            return pair(path, t, f, false);
                        }
                    }
                }
                (FxHashMap::default(), FxHashMap::default())
            }
            _ => (FxHashMap::default(), FxHashMap::default()),
        }
    }

    fn compute_predicate_guard(&self, callee: &Expr, args: &[Argument]) -> (FxHashMap<String, Ty>, FxHashMap<String, Ty>) {
        if let ExprKind::Identifier(name) = &callee.kind {
            if let Some(info) = self.predicates.get(name) {
                if let Some(Argument::Normal(arg_expr)) = args.get(info.param_index) {
                    if let (Some(path), Some(ty)) = (expr_path(arg_expr), self.type_map.get(arg_expr.id).cloned()) {
                        let asserted = info.asserted.clone();
                        let rest = exclude_from_union(self.solver, &ty, &asserted);
                        return pair(path, asserted, rest, false);
                    }
                }
            }
        }
        (FxHashMap::default(), FxHashMap::default())
    }
}

fn pair(path: String, then_ty: Ty, else_ty: Ty, negate: bool) -> (FxHashMap<String, Ty>, FxHashMap<String, Ty>) {
    let mut then_d = FxHashMap::default();
    let mut else_d = FxHashMap::default();
    if negate {
        then_d.insert(path.clone(), else_ty);
        else_d.insert(path, then_ty);
    } else {
        then_d.insert(path.clone(), then_ty);
        else_d.insert(path, else_ty);
    }
    (then_d, else_d)
}

fn exclude_from_union(solver: &stypec_solver::Solver, ty: &Ty, asserted: &Ty) -> Ty {
    match ty.as_ref() {
        TypeInfo::Union(members) => make_union(members.iter().filter(|m| !solver.is_assignable(asserted, m)).cloned().collect()),
        _ => ty.clone(),
    }
}

/// The dotted lexical path a narrowing refinement is keyed by: a bare
/// identifier, `this`, or a chain of non-computed, non-optional member
/// accesses off of one. Anything else (a call result, a computed index) has
/// no stable path and narrowing simply doesn't apply to it.
pub(crate) fn expr_path(expr: &Expr) -> Option<String> {
    match &expr.kind {
        ExprKind::Identifier(name) => Some(name.clone()),
        ExprKind::This => Some("this".to_string()),
        ExprKind::Member { object, key: MemberKey::Name(name), optional: false } => {
            expr_path(object).map(|base| format!("{base}.{name}"))
        }
        _ => None,
    }
}

fn resolve_class_handle_by_name(env: &stypec_env::Env, name: &str) -> Option<ClassHandle> {
    match env.lookup_type(name)?.as_ref() {
        TypeInfo::Instance(inst) => Some(inst.class.clone()),
        TypeInfo::GenericClass(def) => match &def.kind {
            GenericDefKind::Class(handle) => Some(handle.clone()),
            _ => None,
        },
        _ => None,
    }
}

fn string_literal(expr: &Expr) -> Option<String> {
    match &expr.kind {
        ExprKind::Literal(Literal::String(s)) => Some(s.clone()),
        _ => None,
    }
}

fn is_nullish_literal(expr: &Expr) -> bool {
    matches!(expr.kind, ExprKind::Literal(Literal::Null) | ExprKind::Literal(Literal::Undefined))
}

fn is_literal_ty(ty: &Ty) -> bool {
    matches!(ty.as_ref(), TypeInfo::LiteralString(_) | TypeInfo::LiteralNumber(_) | TypeInfo::LiteralBoolean(_))
}

fn is_bigint(ty: &Ty) -> bool {
    matches!(ty.as_ref(), TypeInfo::Primitive(PrimitiveKind::BigInt))
}

/// Declared return types that don't require a definite-return check: `void`
/// (nothing to return), `any`/`unknown` (unconstrained), `never` (the body
/// is expected to never finish, not to return).
fn is_void_like(ty: &Ty) -> bool {
    matches!(
        ty.as_ref(),
        TypeInfo::Primitive(PrimitiveKind::Void)
            | TypeInfo::Primitive(PrimitiveKind::Any)
            | TypeInfo::Primitive(PrimitiveKind::Unknown)
            | TypeInfo::Primitive(PrimitiveKind::Never)
    )
}

pub(crate) fn unwrap_promise(ty: &Ty) -> Ty {
    match ty.as_ref() {
        TypeInfo::Promise(inner) => inner.clone(),
        _ => ty.clone(),
    }
}

fn property_key_name(key: &PropertyKey) -> Option<String> {
    match key {
        PropertyKey::Identifier(name) => Some(name.clone()),
        PropertyKey::StringLiteral(name) => Some(name.clone()),
        PropertyKey::NumberLiteral(n) => Some(n.to_string()),
        PropertyKey::Computed(_) => None,
    }
}

fn check_literal(lit: &Literal) -> Ty {
    match lit {
        Literal::String(s) => Rc::new(TypeInfo::LiteralString(s.clone())),
        Literal::Number(n) => Rc::new(TypeInfo::LiteralNumber(OrderedFloat(*n))),
        Literal::Boolean(b) => Rc::new(TypeInfo::LiteralBoolean(*b)),
        Literal::BigInt(_) => TypeInfo::primitive(PrimitiveKind::BigInt),
        Literal::Null => TypeInfo::primitive(PrimitiveKind::Null),
        Literal::Undefined => TypeInfo::primitive(PrimitiveKind::Undefined),
        Literal::RegExp { .. } => Rc::new(TypeInfo::RegExp),
    }
}

fn index_access(target: &Ty, index_ty: &Ty) -> Ty {
    match target.as_ref() {
        TypeInfo::Array(elem) => elem.clone(),
        TypeInfo::Tuple(tuple) => {
            if let TypeInfo::LiteralNumber(n) = index_ty.as_ref() {
                if let Some(el) = tuple.elements.get(n.0 as usize) {
                    return el.ty.clone();
                }
            }
            tuple.rest.clone().unwrap_or_else(TypeInfo::any)
        }
        TypeInfo::Record(r) => {
            if let TypeInfo::LiteralString(s) = index_ty.as_ref() {
                if let Some(ty) = r.fields.0.get(s) {
                    return ty.clone();
                }
            }
            if matches!(index_ty.as_ref(), TypeInfo::Primitive(PrimitiveKind::Number) | TypeInfo::LiteralNumber(_)) {
                if let Some(ty) = &r.number_index {
                    return ty.clone();
                }
            }
            r.string_index.clone().unwrap_or_else(TypeInfo::any)
        }
        _ if TypeInfo::is_any(target.as_ref()) => TypeInfo::any(),
        _ => TypeInfo::any(),
    }
}
