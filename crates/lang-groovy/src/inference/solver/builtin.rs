//! Bundled declarations for the part of the JDK and the Groovy runtime that
//! everyday scripts touch. Stands in for a classpath solver.
//!
//! Entries are written as Java-like headers and member signatures and parsed
//! once on first use.

use super::{TypeSolver, ensure_name};
use crate::inference::core::{
    MemberInfo, MemberKind, ParameterInfo, TypeDeclaration, TypeKind, TypeParameter,
};
use groovyscope_api::models::{SymbolReference, TypeRef};
use groovyscope_core::Result;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

use crate::inference::core::TypeKind::{Class, Interface};

type Entry = (TypeKind, &'static str, &'static [&'static str]);

#[rustfmt::skip]
static ENTRIES: &[Entry] = &[
    (Class, "java.lang.Object", &[
        "java.lang.String toString()",
        "boolean equals(java.lang.Object)",
        "int hashCode()",
        "java.lang.Class<?> getClass()",
    ]),
    (Interface, "java.io.Serializable", &[]),
    (Interface, "java.lang.Cloneable", &[]),
    (Interface, "java.lang.Runnable", &["void run()"]),
    (Interface, "java.lang.Comparable<T>", &["int compareTo(T)"]),
    (Interface, "java.lang.CharSequence", &[
        "int length()",
        "char charAt(int)",
        "java.lang.CharSequence subSequence(int, int)",
    ]),
    (Interface, "java.lang.Iterable<T>", &["java.util.Iterator<T> iterator()"]),
    (Interface, "java.util.Iterator<E>", &["boolean hasNext()", "E next()"]),
    (Class, "java.lang.Class<T> implements java.io.Serializable", &[
        "java.lang.String getName()",
        "java.lang.String getSimpleName()",
    ]),
    (Class, "java.lang.String implements java.io.Serializable, java.lang.Comparable<java.lang.String>, java.lang.CharSequence", &[
        "int length()",
        "char charAt(int)",
        "boolean isEmpty()",
        "java.lang.String substring(int)",
        "java.lang.String substring(int, int)",
        "java.lang.String toUpperCase()",
        "java.lang.String toLowerCase()",
        "java.lang.String trim()",
        "java.lang.String concat(java.lang.String)",
        "boolean contains(java.lang.CharSequence)",
        "boolean startsWith(java.lang.String)",
        "int indexOf(java.lang.String)",
        "java.lang.String[] split(java.lang.String)",
        "static java.lang.String valueOf(java.lang.Object)",
    ]),
    (Class, "groovy.lang.GString implements java.lang.Comparable, java.lang.CharSequence, java.io.Serializable", &[
        "java.lang.String toString()",
        "java.lang.Object[] getValues()",
        "java.lang.String[] getStrings()",
    ]),
    (Class, "java.lang.StringBuilder implements java.io.Serializable, java.lang.Comparable<java.lang.StringBuilder>, java.lang.CharSequence", &[
        "java.lang.StringBuilder append(java.lang.Object)",
        "java.lang.String toString()",
        "int length()",
    ]),
    (Class, "java.lang.Number implements java.io.Serializable", &[
        "int intValue()",
        "long longValue()",
        "float floatValue()",
        "double doubleValue()",
    ]),
    (Class, "java.lang.Byte extends java.lang.Number implements java.lang.Comparable<java.lang.Byte>", &[]),
    (Class, "java.lang.Short extends java.lang.Number implements java.lang.Comparable<java.lang.Short>", &[]),
    (Class, "java.lang.Integer extends java.lang.Number implements java.lang.Comparable<java.lang.Integer>", &[
        "static int parseInt(java.lang.String)",
        "static java.lang.Integer valueOf(int)",
        "field static int MAX_VALUE",
        "field static int MIN_VALUE",
    ]),
    (Class, "java.lang.Long extends java.lang.Number implements java.lang.Comparable<java.lang.Long>", &[
        "static long parseLong(java.lang.String)",
        "field static long MAX_VALUE",
    ]),
    (Class, "java.lang.Float extends java.lang.Number implements java.lang.Comparable<java.lang.Float>", &[]),
    (Class, "java.lang.Double extends java.lang.Number implements java.lang.Comparable<java.lang.Double>", &[
        "static double parseDouble(java.lang.String)",
    ]),
    (Class, "java.lang.Character implements java.io.Serializable, java.lang.Comparable<java.lang.Character>", &[
        "char charValue()",
        "static boolean isDigit(char)",
    ]),
    (Class, "java.lang.Boolean implements java.io.Serializable, java.lang.Comparable<java.lang.Boolean>", &[
        "boolean booleanValue()",
        "static boolean parseBoolean(java.lang.String)",
    ]),
    (Class, "java.math.BigInteger extends java.lang.Number implements java.lang.Comparable<java.math.BigInteger>", &[
        "java.math.BigInteger add(java.math.BigInteger)",
        "java.math.BigInteger multiply(java.math.BigInteger)",
        "static java.math.BigInteger valueOf(long)",
    ]),
    (Class, "java.math.BigDecimal extends java.lang.Number implements java.lang.Comparable<java.math.BigDecimal>", &[
        "java.math.BigDecimal add(java.math.BigDecimal)",
        "java.math.BigDecimal multiply(java.math.BigDecimal)",
        "static java.math.BigDecimal valueOf(double)",
    ]),
    (Class, "java.lang.Math", &[
        "static int abs(int)",
        "static int max(int, int)",
        "static int min(int, int)",
        "static double sqrt(double)",
        "static double pow(double, double)",
        "field static double PI",
    ]),
    (Class, "java.lang.System", &[
        "static long currentTimeMillis()",
        "field static java.io.PrintStream out",
    ]),
    (Class, "java.io.PrintStream", &[
        "void println(java.lang.Object)",
        "void print(java.lang.Object)",
    ]),
    (Class, "java.lang.Throwable implements java.io.Serializable", &["java.lang.String getMessage()"]),
    (Class, "java.lang.Exception extends java.lang.Throwable", &[]),
    (Class, "java.lang.RuntimeException extends java.lang.Exception", &[]),
    (Class, "java.lang.IllegalArgumentException extends java.lang.RuntimeException", &[]),
    (Class, "java.lang.IllegalStateException extends java.lang.RuntimeException", &[]),
    (Class, "java.io.IOException extends java.lang.Exception", &[]),
    (Interface, "java.util.Collection<E> extends java.lang.Iterable<E>", &[
        "int size()",
        "boolean isEmpty()",
        "boolean contains(java.lang.Object)",
        "boolean add(E)",
        "boolean remove(java.lang.Object)",
    ]),
    (Interface, "java.util.List<E> extends java.util.Collection<E>", &[
        "E get(int)",
        "E set(int, E)",
        "int indexOf(java.lang.Object)",
        "java.util.List<E> subList(int, int)",
    ]),
    (Interface, "java.util.Set<E> extends java.util.Collection<E>", &[]),
    (Interface, "java.util.Map<K, V>", &[
        "V get(java.lang.Object)",
        "V put(K, V)",
        "int size()",
        "boolean isEmpty()",
        "boolean containsKey(java.lang.Object)",
        "java.util.Set<K> keySet()",
        "java.util.Collection<V> values()",
    ]),
    (Interface, "java.util.RandomAccess", &[]),
    (Class, "java.util.AbstractCollection<E> implements java.util.Collection<E>", &[]),
    (Class, "java.util.AbstractList<E> extends java.util.AbstractCollection<E> implements java.util.List<E>", &[]),
    (Class, "java.util.AbstractSet<E> extends java.util.AbstractCollection<E> implements java.util.Set<E>", &[]),
    (Class, "java.util.AbstractMap<K, V> implements java.util.Map<K, V>", &[]),
    (Class, "java.util.ArrayList<E> extends java.util.AbstractList<E> implements java.util.List<E>, java.util.RandomAccess, java.lang.Cloneable, java.io.Serializable", &[]),
    (Class, "java.util.LinkedList<E> extends java.util.AbstractList<E> implements java.util.List<E>, java.lang.Cloneable, java.io.Serializable", &[]),
    (Class, "java.util.HashSet<E> extends java.util.AbstractSet<E> implements java.util.Set<E>, java.lang.Cloneable, java.io.Serializable", &[]),
    (Class, "java.util.LinkedHashSet<E> extends java.util.HashSet<E> implements java.util.Set<E>, java.lang.Cloneable, java.io.Serializable", &[]),
    (Class, "java.util.HashMap<K, V> extends java.util.AbstractMap<K, V> implements java.util.Map<K, V>, java.lang.Cloneable, java.io.Serializable", &[]),
    (Class, "java.util.LinkedHashMap<K, V> extends java.util.HashMap<K, V> implements java.util.Map<K, V>", &[]),
    (Interface, "java.util.function.Function<T, R>", &["R apply(T)"]),
    (Class, "groovy.lang.Closure<V> implements java.lang.Cloneable, java.lang.Runnable, java.io.Serializable", &[
        "V call()",
        "V call(java.lang.Object)",
        "int getMaximumNumberOfParameters()",
    ]),
];

static BUILTINS: Lazy<HashMap<String, Arc<TypeDeclaration>>> = Lazy::new(|| {
    let declarations: HashMap<_, _> = ENTRIES
        .iter()
        .map(|(kind, header, members)| {
            let declaration = declaration(*kind, header, members);
            (declaration.qualified_name.clone(), Arc::new(declaration))
        })
        .collect();
    tracing::debug!(count = declarations.len(), "loaded builtin declarations");
    declarations
});

/// Answers qualified names of the bundled runtime types.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinTypeSolver;

impl BuiltinTypeSolver {
    pub fn new() -> Self {
        Self
    }

    pub fn known_names(&self) -> impl Iterator<Item = &'static str> {
        BUILTINS.keys().map(String::as_str)
    }
}

impl TypeSolver for BuiltinTypeSolver {
    fn try_to_solve_type(&self, name: &str) -> Result<SymbolReference<Arc<TypeDeclaration>>> {
        ensure_name(name)?;
        Ok(BUILTINS.get(name).cloned().into())
    }

    fn name(&self) -> &str {
        "builtin"
    }
}

fn declaration(kind: TypeKind, header: &str, members: &[&str]) -> TypeDeclaration {
    let (head, implemented) = match header.split_once(" implements ") {
        Some((head, list)) => (head, split_top_level(list)),
        None => (header, Vec::new()),
    };
    let (name, extended) = match head.split_once(" extends ") {
        Some((name, list)) => (name, split_top_level(list)),
        None => (head, Vec::new()),
    };

    let (qualified_name, type_parameters) = match name.split_once('<') {
        Some((base, params)) => (
            base,
            split_top_level(params.trim_end_matches('>'))
                .into_iter()
                .map(TypeParameter::new)
                .collect(),
        ),
        None => (name, Vec::new()),
    };

    let mut declaration = TypeDeclaration::new(qualified_name, kind);
    declaration.type_parameters = type_parameters;
    let extended = extended.into_iter().map(parse_type_ref);
    if kind == Interface {
        declaration.interfaces.extend(extended);
    } else {
        declaration.superclass = extended.into_iter().next();
    }
    declaration
        .interfaces
        .extend(implemented.into_iter().map(parse_type_ref));
    declaration.members = members
        .iter()
        .map(|signature| member(qualified_name, signature))
        .collect();
    declaration
}

fn member(declaring_type: &str, signature: &str) -> MemberInfo {
    let mut rest = signature.trim();
    let mut kind = MemberKind::Method;
    if let Some(stripped) = rest.strip_prefix("field ") {
        kind = MemberKind::Field;
        rest = stripped;
    }
    let mut modifiers = Vec::new();
    if let Some(stripped) = rest.strip_prefix("static ") {
        modifiers.push("static".to_string());
        rest = stripped;
    }

    let (head, parameters) = match rest.split_once('(') {
        Some((head, params)) => {
            let parameters = split_top_level(params.trim_end_matches(')'))
                .into_iter()
                .enumerate()
                .map(|(i, ty)| ParameterInfo {
                    name: format!("arg{}", i),
                    type_ref: parse_type_ref(ty),
                    is_varargs: false,
                })
                .collect();
            (head, parameters)
        }
        None => (rest, Vec::new()),
    };
    let (type_text, name) = head.rsplit_once(' ').unwrap_or(("void", head));

    MemberInfo {
        name: name.to_string(),
        kind,
        declaring_type: Some(declaring_type.to_string()),
        type_ref: parse_type_ref(type_text),
        parameters,
        type_parameters: Vec::new(),
        modifiers,
    }
}

/// Parses a Java-like type string such as `java.util.Map<K, V[]>`.
/// Dotted names become qualified ids; bare names stay raw (primitives and
/// type variables).
pub(crate) fn parse_type_ref(text: &str) -> TypeRef {
    let text = text.trim();
    if let Some(element) = text.strip_suffix("[]") {
        return TypeRef::array(parse_type_ref(element));
    }
    if text == "?" {
        return TypeRef::Wildcard {
            bound: None,
            is_upper_bound: true,
        };
    }
    for (keyword, is_upper_bound) in [("? extends ", true), ("? super ", false)] {
        if let Some(bound) = text.strip_prefix(keyword) {
            return TypeRef::Wildcard {
                bound: Some(Box::new(parse_type_ref(bound))),
                is_upper_bound,
            };
        }
    }
    match text.split_once('<') {
        Some((base, args)) => {
            let args = args.strip_suffix('>').unwrap_or(args);
            TypeRef::generic(
                name_ref(base),
                split_top_level(args).into_iter().map(parse_type_ref).collect(),
            )
        }
        None => name_ref(text),
    }
}

fn name_ref(name: &str) -> TypeRef {
    let name = name.trim();
    if name.contains('.') {
        TypeRef::id(name)
    } else {
        TypeRef::raw(name)
    }
}

/// Splits on commas outside angle brackets.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = text[start..].trim();
    if !last.is_empty() {
        parts.push(last);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_type_ref() {
        assert_eq!(
            parse_type_ref("java.util.Map<K, java.util.List<V>[]>"),
            TypeRef::generic(
                TypeRef::id("java.util.Map"),
                vec![
                    TypeRef::raw("K"),
                    TypeRef::array(TypeRef::generic(
                        TypeRef::id("java.util.List"),
                        vec![TypeRef::raw("V")]
                    )),
                ]
            )
        );
    }

    #[test]
    fn test_array_list_header() {
        let solver = BuiltinTypeSolver::new();
        let list = solver
            .try_to_solve_type("java.util.ArrayList")
            .unwrap()
            .into_option()
            .unwrap();
        assert_eq!(list.type_parameters.len(), 1);
        assert_eq!(list.superclass.as_ref().and_then(|s| s.base_name()), Some("java.util.AbstractList"));
        assert!(list.interfaces.iter().any(|i| i.base_name() == Some("java.io.Serializable")));
    }

    #[test]
    fn test_member_signatures() {
        let solver = BuiltinTypeSolver::new();
        let math = solver.try_to_solve_type("java.lang.Math").unwrap().into_option().unwrap();
        let max = math.methods_named("max").next().unwrap();
        assert!(max.is_static());
        assert_eq!(max.parameters.len(), 2);
        assert_eq!(max.type_ref, TypeRef::raw("int"));
        assert!(math.field("PI").is_some());
    }

    #[test]
    fn test_every_supertype_is_bundled() {
        let solver = BuiltinTypeSolver::new();
        for declaration in BUILTINS.values() {
            for supertype in declaration.supertypes() {
                let name = supertype.base_name().unwrap();
                assert!(
                    solver.try_to_solve_type(name).unwrap().is_solved(),
                    "{} refers to missing {}",
                    declaration,
                    name
                );
            }
        }
    }
}
