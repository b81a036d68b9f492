use groovyscope_api::models::Range;
use serde::Serialize;
use std::fmt;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl Primitive {
    pub const ALL: [Primitive; 8] = [
        Primitive::Boolean,
        Primitive::Char,
        Primitive::Byte,
        Primitive::Short,
        Primitive::Int,
        Primitive::Long,
        Primitive::Float,
        Primitive::Double,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "boolean" => Primitive::Boolean,
            "char" => Primitive::Char,
            "byte" => Primitive::Byte,
            "short" => Primitive::Short,
            "int" => Primitive::Int,
            "long" => Primitive::Long,
            "float" => Primitive::Float,
            "double" => Primitive::Double,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Char => "char",
            Primitive::Byte => "byte",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
        }
    }

    pub fn boxed_name(self) -> &'static str {
        match self {
            Primitive::Boolean => "java.lang.Boolean",
            Primitive::Char => "java.lang.Character",
            Primitive::Byte => "java.lang.Byte",
            Primitive::Short => "java.lang.Short",
            Primitive::Int => "java.lang.Integer",
            Primitive::Long => "java.lang.Long",
            Primitive::Float => "java.lang.Float",
            Primitive::Double => "java.lang.Double",
        }
    }

    pub fn from_boxed_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.boxed_name() == name)
    }

    pub fn is_numeric(self) -> bool {
        self != Primitive::Boolean
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    BinOr,
    Xor,
    BinAnd,
    Equals,
    NotEquals,
    Less,
    Greater,
    LessEquals,
    GreaterEquals,
    LeftShift,
    SignedRightShift,
    UnsignedRightShift,
    Plus,
    Minus,
    Multiply,
    Divide,
    Remainder,
    /// `a ?: b`
    Elvis,
    /// `a ** b`
    Power,
    /// `a <=> b`
    Compare,
    /// `a in b`
    In,
    /// `a ==~ /re/`
    Match,
}

impl BinaryOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "||" => BinaryOp::Or,
            "&&" => BinaryOp::And,
            "|" => BinaryOp::BinOr,
            "^" => BinaryOp::Xor,
            "&" => BinaryOp::BinAnd,
            "==" => BinaryOp::Equals,
            "!=" => BinaryOp::NotEquals,
            "<" => BinaryOp::Less,
            ">" => BinaryOp::Greater,
            "<=" => BinaryOp::LessEquals,
            ">=" => BinaryOp::GreaterEquals,
            "<<" => BinaryOp::LeftShift,
            ">>" => BinaryOp::SignedRightShift,
            ">>>" => BinaryOp::UnsignedRightShift,
            "+" => BinaryOp::Plus,
            "-" => BinaryOp::Minus,
            "*" => BinaryOp::Multiply,
            "/" => BinaryOp::Divide,
            "%" => BinaryOp::Remainder,
            "?:" => BinaryOp::Elvis,
            "**" => BinaryOp::Power,
            "<=>" => BinaryOp::Compare,
            "in" => BinaryOp::In,
            "==~" => BinaryOp::Match,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::BinOr => "|",
            BinaryOp::Xor => "^",
            BinaryOp::BinAnd => "&",
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEquals => "<=",
            BinaryOp::GreaterEquals => ">=",
            BinaryOp::LeftShift => "<<",
            BinaryOp::SignedRightShift => ">>",
            BinaryOp::UnsignedRightShift => ">>>",
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Remainder => "%",
            BinaryOp::Elvis => "?:",
            BinaryOp::Power => "**",
            BinaryOp::Compare => "<=>",
            BinaryOp::In => "in",
            BinaryOp::Match => "==~",
        }
    }

    /// Operators whose result is always `boolean`.
    pub fn is_predicate(self) -> bool {
        matches!(
            self,
            BinaryOp::Or
                | BinaryOp::And
                | BinaryOp::Equals
                | BinaryOp::NotEquals
                | BinaryOp::Less
                | BinaryOp::Greater
                | BinaryOp::LessEquals
                | BinaryOp::GreaterEquals
                | BinaryOp::In
                | BinaryOp::Match
        )
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    Plus,
    Minus,
    Multiply,
    Divide,
    Remainder,
    BinAnd,
    BinOr,
    Xor,
    LeftShift,
    SignedRightShift,
    UnsignedRightShift,
}

impl AssignOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "=" => AssignOp::Assign,
            "+=" => AssignOp::Plus,
            "-=" => AssignOp::Minus,
            "*=" => AssignOp::Multiply,
            "/=" => AssignOp::Divide,
            "%=" => AssignOp::Remainder,
            "&=" => AssignOp::BinAnd,
            "|=" => AssignOp::BinOr,
            "^=" => AssignOp::Xor,
            "<<=" => AssignOp::LeftShift,
            ">>=" => AssignOp::SignedRightShift,
            ">>>=" => AssignOp::UnsignedRightShift,
            _ => return None,
        })
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    BitwiseComplement,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

impl UnaryOp {
    pub fn from_prefix(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => UnaryOp::Plus,
            "-" => UnaryOp::Minus,
            "!" => UnaryOp::Not,
            "~" => UnaryOp::BitwiseComplement,
            "++" => UnaryOp::PreIncrement,
            "--" => UnaryOp::PreDecrement,
            _ => return None,
        })
    }

    pub fn from_postfix(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "++" => UnaryOp::PostIncrement,
            "--" => UnaryOp::PostDecrement,
            _ => return None,
        })
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentKind {
    Line,
    Block,
    Doc,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    /// Text without the comment delimiters.
    pub content: String,
    pub range: Option<Range>,
}

impl Comment {
    pub fn from_source(text: &str, range: Option<Range>) -> Self {
        let (kind, content) = if let Some(rest) = text.strip_prefix("//") {
            (CommentKind::Line, rest)
        } else if let Some(rest) = text.strip_prefix("/**") {
            (CommentKind::Doc, rest.strip_suffix("*/").unwrap_or(rest))
        } else {
            let rest = text.strip_prefix("/*").unwrap_or(text);
            (CommentKind::Block, rest.strip_suffix("*/").unwrap_or(rest))
        };
        Self {
            kind,
            content: content.to_string(),
            range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_delimiters_are_stripped() {
        let doc = Comment::from_source("/** Greets. */", None);
        assert_eq!(doc.kind, CommentKind::Doc);
        assert_eq!(doc.content, " Greets. ");

        let line = Comment::from_source("// note", None);
        assert_eq!(line.kind, CommentKind::Line);
        assert_eq!(line.content, " note");
    }

    #[test]
    fn test_boxed_names_round_trip() {
        for primitive in Primitive::ALL {
            assert_eq!(Primitive::from_boxed_name(primitive.boxed_name()), Some(primitive));
        }
        assert!(!Primitive::Boolean.is_numeric());
    }
}
