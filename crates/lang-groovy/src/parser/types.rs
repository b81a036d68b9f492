//! Types are converted from their source text. Groovy type syntax is small
//! (dotted names, type arguments, wildcards, `[]` and `...`), and reading the
//! text keeps the converter independent of how the grammar nests it.

use super::converter::{Conv, Converter};
use crate::ast::{NodeId, NodeKind, Primitive};
use tree_sitter::Node as TsNode;

impl<'a> Converter<'a> {
    pub(crate) fn type_node(&mut self, node: TsNode) -> Conv<NodeId> {
        self.guarded(node, |this, node| {
            let text = this.text(node);
            this.type_from_text(text, node)
        })
    }

    /// Builds the type written as `text`; every created node takes the
    /// range of `origin`.
    pub(crate) fn type_from_text(&mut self, text: &str, origin: TsNode) -> Conv<NodeId> {
        let text = strip_annotations(text.trim());
        if text.is_empty() {
            return self.fail(origin, "empty type");
        }
        if let Some(element) = text.strip_suffix("...") {
            let component = self.type_from_text(element, origin)?;
            return Ok(self.alloc(NodeKind::ArrayType { component }, origin));
        }
        if let Some(element) = text.strip_suffix("[]") {
            let component = self.type_from_text(element, origin)?;
            return Ok(self.alloc(NodeKind::ArrayType { component }, origin));
        }

        let alternatives = split_top_level(text, '|');
        if alternatives.len() > 1 {
            let mut elements = Vec::with_capacity(alternatives.len());
            for alternative in alternatives {
                elements.push(self.type_from_text(alternative, origin)?);
            }
            return Ok(self.alloc(NodeKind::UnionType { elements }, origin));
        }

        if let Some(rest) = text.strip_prefix('?') {
            let rest = rest.trim();
            let (bound, is_upper_bound) = if let Some(bound) = rest.strip_prefix("extends") {
                (Some(bound), true)
            } else if let Some(bound) = rest.strip_prefix("super") {
                (Some(bound), false)
            } else if rest.is_empty() {
                (None, true)
            } else {
                return self.fail(origin, format!("malformed wildcard `{}`", text));
            };
            let bound = match bound {
                Some(bound) => Some(self.type_from_text(bound, origin)?),
                None => None,
            };
            return Ok(self.alloc(
                NodeKind::WildcardType {
                    bound,
                    is_upper_bound,
                },
                origin,
            ));
        }

        let kind = match text {
            "void" => NodeKind::VoidType,
            "def" | "var" => NodeKind::DynamicType {
                keyword: text.to_string(),
            },
            _ => match Primitive::from_name(text) {
                Some(primitive) => NodeKind::PrimitiveType { primitive },
                None => self.class_type(text, origin)?,
            },
        };
        Ok(self.alloc(kind, origin))
    }

    fn class_type(&mut self, text: &str, origin: TsNode) -> Conv<NodeKind> {
        let Some((base, arguments)) = text.split_once('<') else {
            return Ok(NodeKind::ClassType {
                name: compact_name(text),
                type_arguments: None,
            });
        };
        let Some(arguments) = arguments.trim_end().strip_suffix('>') else {
            return self.fail(origin, format!("unbalanced type arguments in `{}`", text));
        };
        let mut converted = Vec::new();
        for argument in split_top_level(arguments, ',') {
            converted.push(self.type_from_text(argument, origin)?);
        }
        Ok(NodeKind::ClassType {
            name: compact_name(base),
            type_arguments: Some(converted),
        })
    }

    /// `<T extends Number & Comparable<T>, U>` on a class or method.
    pub(crate) fn type_parameters_from_text(&mut self, text: &str, origin: TsNode) -> Conv<Vec<NodeId>> {
        let inner = text.trim();
        let inner = inner.strip_prefix('<').unwrap_or(inner);
        let inner = inner.strip_suffix('>').unwrap_or(inner);
        let mut parameters = Vec::new();
        for parameter in split_top_level(inner, ',') {
            let (name, bounds_text) = match parameter.split_once(" extends ") {
                Some((name, bounds)) => (name.trim(), Some(bounds)),
                None => (parameter.trim(), None),
            };
            let mut bounds = Vec::new();
            for bound in bounds_text.map(|b| split_top_level(b, '&')).unwrap_or_default() {
                bounds.push(self.type_from_text(bound, origin)?);
            }
            parameters.push(self.alloc(
                NodeKind::TypeParameter {
                    name: name.to_string(),
                    bounds,
                },
                origin,
            ));
        }
        Ok(parameters)
    }
}

/// `java . util . List` and `java.util.List` name the same type.
fn compact_name(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Drops leading `@Annotation` or `@Annotation(...)` prefixes.
pub(crate) fn strip_annotations(mut text: &str) -> &str {
    while let Some(rest) = text.strip_prefix('@') {
        let end = rest
            .find(|c: char| c.is_whitespace() || c == '(')
            .unwrap_or(rest.len());
        let mut after = &rest[end..];
        if after.starts_with('(') {
            after = after.find(')').map_or("", |close| &after[close + 1..]);
        }
        text = after.trim_start();
    }
    text
}

/// Splits on `separator` outside angle brackets.
pub(crate) fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(text[start..i].trim());
                start = i + c.len_utf8();
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
