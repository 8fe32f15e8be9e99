//! Smart constructors for unions and intersections (§3 invariant 2:
//! "Union and intersection types are canonicalized: members are flattened
//! one level, duplicate members removed, and a union/intersection of zero
//! or one distinct members never appears — it collapses to `never`/the
//! member itself").
//!
//! Every other module that builds a union or intersection must go through
//! [`make_union`]/[`make_intersection`] rather than constructing
//! `TypeInfo::Union`/`TypeInfo::Intersection` directly, or the invariant
//! silently stops holding.

use std::rc::Rc;

use crate::info::{Ty, TypeInfo};

pub fn make_union(members: Vec<Ty>) -> Ty {
    let mut flat = Vec::with_capacity(members.len());
    flatten_union(members, &mut flat);

    if flat.iter().any(|t| TypeInfo::is_any(t)) {
        return TypeInfo::any();
    }

    let mut deduped: Vec<Ty> = Vec::with_capacity(flat.len());
    for member in flat {
        if TypeInfo::is_never(&member) {
            continue;
        }
        if !deduped.iter().any(|existing| existing == &member) {
            deduped.push(member);
        }
    }

    match deduped.len() {
        0 => TypeInfo::never(),
        1 => deduped.into_iter().next().unwrap(),
        _ => Rc::new(TypeInfo::Union(deduped)),
    }
}

fn flatten_union(members: Vec<Ty>, out: &mut Vec<Ty>) {
    for member in members {
        match member.as_ref() {
            TypeInfo::Union(nested) => flatten_union(nested.clone(), out),
            _ => out.push(member),
        }
    }
}

pub fn make_intersection(members: Vec<Ty>) -> Ty {
    let mut flat = Vec::with_capacity(members.len());
    flatten_intersection(members, &mut flat);

    if flat.iter().any(|t| TypeInfo::is_never(t)) {
        return TypeInfo::never();
    }
    if flat.iter().any(|t| TypeInfo::is_any(t)) {
        return TypeInfo::any();
    }

    let mut deduped: Vec<Ty> = Vec::with_capacity(flat.len());
    for member in flat {
        // `unknown` is the intersection identity: `T & unknown` is just `T`.
        if TypeInfo::is_unknown(&member) {
            continue;
        }
        if !deduped.iter().any(|existing| existing == &member) {
            deduped.push(member);
        }
    }

    match deduped.len() {
        0 => TypeInfo::unknown(),
        1 => deduped.into_iter().next().unwrap(),
        _ => Rc::new(TypeInfo::Intersection(deduped)),
    }
}

fn flatten_intersection(members: Vec<Ty>, out: &mut Vec<Ty>) {
    for member in members {
        match member.as_ref() {
            TypeInfo::Intersection(nested) => flatten_intersection(nested.clone(), out),
            _ => out.push(member),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_str(s: &str) -> Ty {
        Rc::new(TypeInfo::LiteralString(s.to_string()))
    }

    #[test]
    fn flattens_nested_unions() {
        let inner = make_union(vec![lit_str("a"), lit_str("b")]);
        let outer = make_union(vec![inner, lit_str("c")]);
        match outer.as_ref() {
            TypeInfo::Union(members) => assert_eq!(members.len(), 3),
            other => panic!("expected flattened union, got {other:?}"),
        }
    }

    #[test]
    fn dedupes_members() {
        let u = make_union(vec![lit_str("a"), lit_str("a"), lit_str("b")]);
        match u.as_ref() {
            TypeInfo::Union(members) => assert_eq!(members.len(), 2),
            other => panic!("expected deduped union, got {other:?}"),
        }
    }

    #[test]
    fn singleton_union_collapses() {
        let u = make_union(vec![lit_str("a"), lit_str("a")]);
        assert_eq!(u, lit_str("a"));
    }

    #[test]
    fn empty_union_is_never() {
        let u = make_union(vec![TypeInfo::never(), TypeInfo::never()]);
        assert_eq!(u, TypeInfo::never());
    }

    #[test]
    fn any_absorbs_union() {
        let u = make_union(vec![lit_str("a"), TypeInfo::any()]);
        assert_eq!(u, TypeInfo::any());
    }

    #[test]
    fn intersection_with_unknown_is_identity() {
        let i = make_intersection(vec![lit_str("a"), TypeInfo::unknown()]);
        assert_eq!(i, lit_str("a"));
    }

    #[test]
    fn intersection_with_never_is_never() {
        let i = make_intersection(vec![lit_str("a"), TypeInfo::never()]);
        assert_eq!(i, TypeInfo::never());
    }
}
