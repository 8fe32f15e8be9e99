//! Renders `TypeInfo` the way diagnostics quote it back to the user.

use std::fmt;

use crate::class::InstanceOf;
use crate::info::{EnumMemberValue, PrimitiveKind, TypeInfo, WellKnownSymbol};

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeInfo::Primitive(kind) => write!(f, "{}", primitive_name(*kind)),
            TypeInfo::LiteralString(s) => write!(f, "{s:?}"),
            TypeInfo::LiteralNumber(n) => write!(f, "{}", n.0),
            TypeInfo::LiteralBoolean(b) => write!(f, "{b}"),

            TypeInfo::Array(elem) => {
                if needs_parens(elem.as_ref()) {
                    write!(f, "({elem})[]")
                } else {
                    write!(f, "{elem}[]")
                }
            }
            TypeInfo::Tuple(tuple) => {
                write!(f, "[")?;
                for (i, elem) in tuple.elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", elem.ty)?;
                    if elem.optional {
                        write!(f, "?")?;
                    }
                }
                if let Some(rest) = &tuple.rest {
                    if !tuple.elements.is_empty() {
                        write!(f, ", ")?;
                    }
                    write!(f, "...{rest}[]")?;
                }
                write!(f, "]")
            }
            TypeInfo::Record(record) => {
                write!(f, "{{ ")?;
                for (i, (name, ty)) in record.fields.0.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{name}: {ty}")?;
                }
                if let Some(idx) = &record.string_index {
                    write!(f, "; [key: string]: {idx}")?;
                }
                if let Some(idx) = &record.number_index {
                    write!(f, "; [key: number]: {idx}")?;
                }
                write!(f, " }}")
            }

            TypeInfo::Function(sig) => write!(f, "{}", format_signature(sig)),
            TypeInfo::OverloadedFunction(overloaded) => {
                write!(f, "{}", format_signature(&overloaded.implementation))
            }

            TypeInfo::Instance(instance) => write!(f, "{}", format_instance(instance)),

            TypeInfo::Interface(iface) => write!(f, "{}", iface.name),
            TypeInfo::Enum(e) => write!(f, "{}", e.name),
            TypeInfo::Namespace(ns) => write!(f, "{}", ns.name),

            TypeInfo::Union(members) => {
                let rendered: Vec<String> = members.iter().map(|m| format_union_member(m)).collect();
                write!(f, "{}", rendered.join(" | "))
            }
            TypeInfo::Intersection(members) => {
                let rendered: Vec<String> = members.iter().map(|m| format_union_member(m)).collect();
                write!(f, "{}", rendered.join(" & "))
            }

            TypeInfo::TypeParameter(param) => write!(f, "{}", param.name),
            TypeInfo::GenericClass(def) | TypeInfo::GenericInterface(def) | TypeInfo::GenericFunction(def) => {
                let params: Vec<&str> = def.type_params.iter().map(|p| p.name.as_str()).collect();
                write!(f, "{}<{}>", def.name, params.join(", "))
            }
            TypeInfo::InstantiatedGeneric(inst) => {
                let args: Vec<String> = inst.type_args.iter().map(|a| a.to_string()).collect();
                write!(f, "{}<{}>", inst.definition.name, args.join(", "))
            }

            TypeInfo::Promise(inner) => write!(f, "Promise<{inner}>"),
            TypeInfo::MapType(k, v) => write!(f, "Map<{k}, {v}>"),
            TypeInfo::SetType(inner) => write!(f, "Set<{inner}>"),
            TypeInfo::WeakMap(k, v) => write!(f, "WeakMap<{k}, {v}>"),
            TypeInfo::WeakSet(inner) => write!(f, "WeakSet<{inner}>"),
            TypeInfo::Date => write!(f, "Date"),
            TypeInfo::RegExp => write!(f, "RegExp"),
            TypeInfo::ErrorType => write!(f, "Error"),
            TypeInfo::Buffer => write!(f, "Buffer"),
            TypeInfo::IteratorType(inner) => write!(f, "Iterator<{inner}>"),
            TypeInfo::GeneratorType(inner) => write!(f, "Generator<{inner}>"),
            TypeInfo::AsyncGeneratorType(inner) => write!(f, "AsyncGenerator<{inner}>"),
            TypeInfo::Timeout => write!(f, "Timeout"),

            TypeInfo::UniqueSymbol(sym) => write!(f, "typeof {}", well_known_symbol_name(*sym)),
        }
    }
}

impl fmt::Display for EnumMemberValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumMemberValue::Number(n) => write!(f, "{n}"),
            EnumMemberValue::String(s) => write!(f, "{s:?}"),
        }
    }
}

fn primitive_name(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::String => "string",
        PrimitiveKind::Number => "number",
        PrimitiveKind::Boolean => "boolean",
        PrimitiveKind::Void => "void",
        PrimitiveKind::Null => "null",
        PrimitiveKind::Undefined => "undefined",
        PrimitiveKind::Symbol => "symbol",
        PrimitiveKind::BigInt => "bigint",
        PrimitiveKind::Any => "any",
        PrimitiveKind::Unknown => "unknown",
        PrimitiveKind::Never => "never",
    }
}

fn well_known_symbol_name(sym: WellKnownSymbol) -> &'static str {
    match sym {
        WellKnownSymbol::Iterator => "Symbol.iterator",
        WellKnownSymbol::AsyncIterator => "Symbol.asyncIterator",
        WellKnownSymbol::ToStringTag => "Symbol.toStringTag",
        WellKnownSymbol::HasInstance => "Symbol.hasInstance",
        WellKnownSymbol::IsConcatSpreadable => "Symbol.isConcatSpreadable",
        WellKnownSymbol::ToPrimitive => "Symbol.toPrimitive",
        WellKnownSymbol::Species => "Symbol.species",
        WellKnownSymbol::Unscopables => "Symbol.unscopables",
    }
}

fn format_signature(sig: &crate::info::FunctionSignature) -> String {
    let mut params = Vec::with_capacity(sig.params.len());
    for (i, param) in sig.params.iter().enumerate() {
        let optional = i >= sig.min_arity && !(sig.has_rest && i == sig.params.len() - 1);
        if sig.has_rest && i == sig.params.len() - 1 {
            params.push(format!("...args{i}: {param}[]"));
        } else if optional {
            params.push(format!("arg{i}?: {param}"));
        } else {
            params.push(format!("arg{i}: {param}"));
        }
    }
    format!("({}) => {}", params.join(", "), sig.return_type)
}

fn format_instance(instance: &InstanceOf) -> String {
    if instance.type_args.is_empty() {
        instance.class.name().to_string()
    } else {
        let args: Vec<String> = instance.type_args.iter().map(|a| a.to_string()).collect();
        format!("{}<{}>", instance.class.name(), args.join(", "))
    }
}

fn needs_parens(ty: &TypeInfo) -> bool {
    matches!(ty, TypeInfo::Union(_) | TypeInfo::Intersection(_) | TypeInfo::Function(_))
}

fn format_union_member(ty: &TypeInfo) -> String {
    if needs_parens(ty) {
        format!("({ty})")
    } else {
        ty.to_string()
    }
}
