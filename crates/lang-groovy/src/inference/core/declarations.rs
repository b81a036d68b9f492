//! Declaration tables the solvers hand out. Member and supertype types stay
//! syntactic ([`TypeRef`]); contexts resolve them on demand.

use crate::ast::NodeId;
use groovyscope_api::models::TypeRef;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Trait,
}

/// A generic type parameter, e.g. `T extends Comparable<T>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: String,
    pub bounds: Vec<TypeRef>,
}

impl TypeParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Method,
    Constructor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    pub name: String,
    /// Varargs parameters carry the array type.
    pub type_ref: TypeRef,
    pub is_varargs: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    pub name: String,
    pub kind: MemberKind,
    /// Qualified name of the declaring type; `None` for script methods.
    pub declaring_type: Option<String>,
    /// Field type or method return type.
    pub type_ref: TypeRef,
    pub parameters: Vec<ParameterInfo>,
    pub type_parameters: Vec<TypeParameter>,
    pub modifiers: Vec<String>,
}

impl MemberInfo {
    pub fn is_static(&self) -> bool {
        self.modifiers.iter().any(|m| m == "static")
    }

    /// The type an argument is checked against for `parameter`: a type
    /// variable of this method stands for its first bound, or `Object`.
    pub fn parameter_type(&self, parameter: &ParameterInfo) -> TypeRef {
        if let TypeRef::Raw(name) = &parameter.type_ref {
            if let Some(variable) = self.type_parameters.iter().find(|t| &t.name == name) {
                return variable
                    .bounds
                    .first()
                    .cloned()
                    .unwrap_or_else(|| TypeRef::id(super::OBJECT));
            }
        }
        parameter.type_ref.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    pub qualified_name: String,
    pub kind: TypeKind,
    pub type_parameters: Vec<TypeParameter>,
    pub superclass: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub members: Vec<MemberInfo>,
}

impl TypeDeclaration {
    pub fn new(qualified_name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            kind,
            type_parameters: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.qualified_name)
    }

    pub fn package_name(&self) -> Option<&str> {
        self.qualified_name
            .rsplit_once('.')
            .map(|(package, _)| package)
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface | TypeKind::Annotation | TypeKind::Trait)
    }

    /// Declared superclass followed by declared interfaces.
    pub fn supertypes(&self) -> impl Iterator<Item = &TypeRef> {
        self.superclass.iter().chain(self.interfaces.iter())
    }

    pub fn fields(&self) -> impl Iterator<Item = &MemberInfo> {
        self.members.iter().filter(|m| m.kind == MemberKind::Field)
    }

    pub fn field(&self, name: &str) -> Option<&MemberInfo> {
        self.fields().find(|m| m.name == name)
    }

    pub fn methods_named<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s MemberInfo> + 's {
        self.members
            .iter()
            .filter(move |m| m.kind == MemberKind::Method && m.name == name)
    }

    pub fn type_parameter_index(&self, name: &str) -> Option<usize> {
        self.type_parameters.iter().position(|p| p.name == name)
    }
}

impl fmt::Display for TypeDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Field,
    EnumConstant,
    Parameter,
    LocalVariable,
    /// Script-level variable of a compilation unit.
    ScriptVariable,
}

/// What a symbol name resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueDeclaration {
    pub name: String,
    pub kind: ValueKind,
    /// `Raw("def")` for dynamically typed declarations.
    pub type_ref: TypeRef,
    pub declaring_type: Option<String>,
    /// Declaring syntax node, when the declaration comes from a parsed unit.
    pub node: Option<NodeId>,
}

impl ValueDeclaration {
    pub fn new(name: impl Into<String>, kind: ValueKind, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            kind,
            type_ref,
            declaring_type: None,
            node: None,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(&self.type_ref, TypeRef::Raw(name) if name == "def" || name == "var")
    }
}
