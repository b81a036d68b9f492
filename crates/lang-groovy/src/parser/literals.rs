//! Literal conversion with Groovy's conventions: single-quoted text is a
//! plain string, and a double-quoted string with an unescaped `$` or an
//! embedded template expression is a GString.

use super::converter::{Conv, Converter, named_children, operands};
use crate::ast::{NodeId, NodeKind};
use tree_sitter::Node as TsNode;

impl<'a> Converter<'a> {
    pub(crate) fn is_literal(kind: &str) -> bool {
        matches!(
            kind,
            "number_literal"
                | "integer_literal"
                | "decimal_literal"
                | "boolean_literal"
                | "true"
                | "false"
                | "null"
                | "null_literal"
                | "string"
                | "string_literal"
        )
    }

    pub(crate) fn literal(&mut self, node: TsNode) -> Conv<NodeId> {
        let text = self.text(node).trim();
        let kind = match node.kind() {
            "number_literal" | "integer_literal" | "decimal_literal" => number_kind(text),
            "string" | "string_literal" => return self.string_literal(node),
            _ => match text {
                "true" => NodeKind::BooleanLiteral { value: true },
                "false" => NodeKind::BooleanLiteral { value: false },
                "null" => NodeKind::NullLiteral,
                _ => return self.fail(node, "unsupported literal"),
            },
        };
        Ok(self.alloc(kind, node))
    }

    fn string_literal(&mut self, node: TsNode) -> Conv<NodeId> {
        let text = self.text(node);
        let (quote, inner) = split_quotes(text);

        let mut expressions = Vec::new();
        for part in named_children(node) {
            if matches!(part.kind(), "interpolation" | "string_interpolation") {
                let embedded = operands(part);
                match embedded.first() {
                    Some(expression) => expressions.push(self.expression(*expression)?),
                    None => return self.fail(part, "empty interpolation"),
                }
            }
        }

        let kind = if quote.starts_with('\'') {
            NodeKind::StringLiteral {
                value: unescape(inner),
            }
        } else if !expressions.is_empty() || has_placeholder(inner) {
            NodeKind::GStringLiteral {
                value: inner.to_string(),
                expressions,
            }
        } else {
            NodeKind::StringLiteral {
                value: unescape(inner),
            }
        };
        Ok(self.alloc(kind, node))
    }
}

/// Integer unless the text has a fraction, an exponent or a floating suffix.
fn number_kind(text: &str) -> NodeKind {
    let lower = text.to_ascii_lowercase();
    let is_decimal = if lower.starts_with("0x") {
        lower.contains('p') || lower.contains('.')
    } else {
        lower.contains('.')
            || lower.contains('e')
            || lower.ends_with('f')
            || lower.ends_with('d')
    };
    if is_decimal {
        NodeKind::DecimalLiteral {
            value: text.to_string(),
        }
    } else {
        NodeKind::IntegerLiteral {
            value: text.to_string(),
        }
    }
}

/// The opening delimiter and the text between the delimiters.
fn split_quotes(text: &str) -> (&str, &str) {
    for quote in ["'''", "\"\"\"", "$/", "'", "\"", "/"] {
        if let Some(rest) = text.strip_prefix(quote) {
            let closing = match quote {
                "$/" => "/$",
                other => other,
            };
            return (quote, rest.strip_suffix(closing).unwrap_or(rest));
        }
    }
    ("", text)
}

/// An unescaped `$` followed by an identifier start or `{`.
fn has_placeholder(text: &str) -> bool {
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '$' => {
                if chars
                    .clone()
                    .next()
                    .is_some_and(|n| n == '{' || n == '_' || n.is_alphabetic())
                {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

/// Resolves backslash escapes. `\$` yields a literal dollar sign.
pub(crate) fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            out.push('\\');
            break;
        };
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            's' => out.push(' '),
            '\n' => {}
            'u' => {
                let hex: String = std::iter::from_fn(|| chars.next_if(|h| h.is_ascii_hexdigit()))
                    .take(4)
                    .collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            '0'..='7' => {
                let mut code = escaped.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(digit) if code * 8 + digit <= 0o377 => {
                            code = code * 8 + digit;
                            chars.next();
                        }
                        _ => break,
                    }
                }
                out.push(char::from_u32(code).unwrap_or('\u{fffd}'));
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{has_placeholder, unescape};
    use crate::ast::NodeKind;
    use crate::parser::GroovyParser;
    use groovyscope_core::ParseConfig;

    fn initializer_kind(source: &str) -> NodeKind {
        let result = GroovyParser::new()
            .unwrap()
            .parse(source, &ParseConfig::strict())
            .unwrap();
        let unit = result.unit.unwrap();
        let declarator = result
            .ast
            .find_first(unit, |k| matches!(k, NodeKind::VariableDeclarator { .. }))
            .unwrap();
        match result.ast.kind(declarator) {
            NodeKind::VariableDeclarator {
                initializer: Some(init),
                ..
            } => result.ast.kind(*init).clone(),
            other => panic!("unexpected declarator {:?}", other),
        }
    }

    #[test]
    fn test_single_quotes_are_plain_strings() {
        assert_eq!(
            initializer_kind("def s = 'hello'"),
            NodeKind::StringLiteral {
                value: "hello".into()
            }
        );
    }

    #[test]
    fn test_dollar_makes_gstring() {
        assert!(matches!(
            initializer_kind("def s = \"hi $name\""),
            NodeKind::GStringLiteral { value, .. } if value == "hi $name"
        ));
        assert_eq!(
            initializer_kind("def s = \"cost \\$5\""),
            NodeKind::StringLiteral {
                value: "cost $5".into()
            }
        );
    }

    #[test]
    fn test_number_literal_kinds() {
        assert!(matches!(initializer_kind("def n = 42"), NodeKind::IntegerLiteral { value } if value == "42"));
        assert!(matches!(initializer_kind("def n = 10L"), NodeKind::IntegerLiteral { .. }));
        assert!(matches!(initializer_kind("def n = 1.5"), NodeKind::DecimalLiteral { .. }));
        assert!(matches!(initializer_kind("def n = 2f"), NodeKind::DecimalLiteral { .. }));
        assert!(matches!(initializer_kind("def n = 0xFF"), NodeKind::IntegerLiteral { .. }));
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(has_placeholder("hi $name"));
        assert!(has_placeholder("sum ${a + b}"));
        assert!(!has_placeholder("cost \\$5"));
        assert!(!has_placeholder("just $"));
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\tb\n"), "a\tb\n");
        assert_eq!(unescape(r"\u0041\101"), "AA");
        assert_eq!(unescape(r"\$x"), "$x");
    }
}
