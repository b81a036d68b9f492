use super::NodeId;
use super::ops::{AssignOp, BinaryOp, Primitive, UnaryOp};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Record,
}

/// Payload of a node. Child links are `NodeId`s into the owning arena;
/// everything else is plain data.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // Declarations
    /// `members` holds type declarations, script methods and script
    /// statements, in source order.
    CompilationUnit {
        package: Option<NodeId>,
        imports: Vec<NodeId>,
        members: Vec<NodeId>,
    },
    PackageDeclaration {
        name: String,
    },
    ImportDeclaration {
        name: String,
        is_static: bool,
        is_asterisk: bool,
    },
    ClassDeclaration {
        name: String,
        class_kind: ClassKind,
        modifiers: Vec<String>,
        type_parameters: Vec<NodeId>,
        extended: Vec<NodeId>,
        implemented: Vec<NodeId>,
        members: Vec<NodeId>,
    },
    EnumConstant {
        name: String,
        arguments: Vec<NodeId>,
        members: Vec<NodeId>,
    },
    FieldDeclaration {
        modifiers: Vec<String>,
        variables: Vec<NodeId>,
    },
    VariableDeclarator {
        name: String,
        var_type: NodeId,
        initializer: Option<NodeId>,
    },
    MethodDeclaration {
        name: String,
        modifiers: Vec<String>,
        type_parameters: Vec<NodeId>,
        return_type: NodeId,
        parameters: Vec<NodeId>,
        throws: Vec<NodeId>,
        body: Option<NodeId>,
    },
    ConstructorDeclaration {
        name: String,
        modifiers: Vec<String>,
        type_parameters: Vec<NodeId>,
        parameters: Vec<NodeId>,
        throws: Vec<NodeId>,
        body: NodeId,
    },
    InitializerDeclaration {
        is_static: bool,
        body: NodeId,
    },
    Parameter {
        name: String,
        modifiers: Vec<String>,
        param_type: NodeId,
        is_varargs: bool,
    },
    TypeParameter {
        name: String,
        bounds: Vec<NodeId>,
    },
    Annotation {
        name: String,
        pairs: Vec<NodeId>,
    },
    MemberValuePair {
        name: String,
        value: NodeId,
    },

    // Types
    /// `type_arguments` is `Some(vec![])` for the diamond `<>`.
    ClassType {
        name: String,
        type_arguments: Option<Vec<NodeId>>,
    },
    PrimitiveType {
        primitive: Primitive,
    },
    VoidType,
    ArrayType {
        component: NodeId,
    },
    WildcardType {
        bound: Option<NodeId>,
        is_upper_bound: bool,
    },
    /// `A | B` in a multi-catch.
    UnionType {
        elements: Vec<NodeId>,
    },
    /// `def` or `var`.
    DynamicType {
        keyword: String,
    },

    // Statements
    Block {
        statements: Vec<NodeId>,
    },
    ExpressionStmt {
        expression: NodeId,
    },
    If {
        condition: NodeId,
        then_stmt: NodeId,
        else_stmt: Option<NodeId>,
    },
    While {
        condition: NodeId,
        body: NodeId,
    },
    Do {
        body: NodeId,
        condition: NodeId,
    },
    For {
        init: Vec<NodeId>,
        condition: Option<NodeId>,
        update: Vec<NodeId>,
        body: NodeId,
    },
    ForEach {
        variable: NodeId,
        iterable: NodeId,
        body: NodeId,
    },
    Return {
        expression: Option<NodeId>,
    },
    Throw {
        expression: NodeId,
    },
    Break {
        label: Option<String>,
    },
    Continue {
        label: Option<String>,
    },
    Try {
        resources: Vec<NodeId>,
        body: NodeId,
        catch_clauses: Vec<NodeId>,
        finally_block: Option<NodeId>,
    },
    CatchClause {
        parameter: NodeId,
        body: NodeId,
    },
    Switch {
        selector: NodeId,
        entries: Vec<NodeId>,
    },
    /// No labels means `default`.
    SwitchEntry {
        labels: Vec<NodeId>,
        statements: Vec<NodeId>,
    },
    Assert {
        check: NodeId,
        message: Option<NodeId>,
    },
    Labeled {
        label: String,
        statement: NodeId,
    },
    Synchronized {
        expression: NodeId,
        body: NodeId,
    },
    EmptyStmt,

    // Expressions
    VariableDeclarationExpr {
        modifiers: Vec<String>,
        variables: Vec<NodeId>,
    },
    Assign {
        target: NodeId,
        operator: AssignOp,
        value: NodeId,
    },
    Binary {
        left: NodeId,
        operator: BinaryOp,
        right: NodeId,
    },
    Unary {
        operator: UnaryOp,
        expression: NodeId,
    },
    Conditional {
        condition: NodeId,
        then_expr: NodeId,
        else_expr: NodeId,
    },
    MethodCall {
        scope: Option<NodeId>,
        name: String,
        type_arguments: Vec<NodeId>,
        arguments: Vec<NodeId>,
    },
    ObjectCreation {
        scope: Option<NodeId>,
        class_type: NodeId,
        type_arguments: Vec<NodeId>,
        arguments: Vec<NodeId>,
        body: Option<Vec<NodeId>>,
    },
    FieldAccess {
        scope: NodeId,
        name: String,
    },
    Name {
        identifier: String,
    },
    ArrayAccess {
        array: NodeId,
        index: NodeId,
    },
    ArrayCreation {
        element_type: NodeId,
        dimensions: Vec<NodeId>,
        extra_dimensions: usize,
        initializer: Option<NodeId>,
    },
    ArrayInitializer {
        values: Vec<NodeId>,
    },
    /// `[a, b]`
    ListExpression {
        values: Vec<NodeId>,
    },
    /// `[k: v]`; `[:]` has no entries. Named call arguments are collected
    /// into one of these as well.
    MapExpression {
        entries: Vec<NodeId>,
    },
    /// A bare-word key is stored as a `StringLiteral`.
    MapEntry {
        key: NodeId,
        value: NodeId,
    },
    Cast {
        target_type: NodeId,
        expression: NodeId,
    },
    InstanceOf {
        expression: NodeId,
        target_type: NodeId,
        pattern: Option<String>,
    },
    Closure {
        parameters: Vec<NodeId>,
        body: NodeId,
    },
    MethodReference {
        scope: NodeId,
        identifier: String,
    },
    ClassExpr {
        class_type: NodeId,
    },
    This {
        qualifier: Option<String>,
    },
    Super {
        qualifier: Option<String>,
    },
    Enclosed {
        inner: NodeId,
    },
    IntegerLiteral {
        value: String,
    },
    DecimalLiteral {
        value: String,
    },
    StringLiteral {
        value: String,
    },
    /// Interpolated string; `expressions` are the embedded expressions.
    GStringLiteral {
        value: String,
        expressions: Vec<NodeId>,
    },
    BooleanLiteral {
        value: bool,
    },
    NullLiteral,

    /// Placeholder for a sub-tree that could not be converted.
    Empty {
        foreign_kind: String,
    },
}

/// Expands to one match over every child slot of a payload. The same arm
/// text serves `&NodeKind` and `&mut NodeKind` through binding modes.
macro_rules! each_child {
    ($kind:expr, $f:expr) => {{
        let mut f = $f;
        match $kind {
            NodeKind::CompilationUnit {
                package,
                imports,
                members,
            } => {
                if let Some(c) = package {
                    f(c);
                }
                for c in imports {
                    f(c);
                }
                for c in members {
                    f(c);
                }
            }
            NodeKind::ClassDeclaration {
                type_parameters,
                extended,
                implemented,
                members,
                ..
            } => {
                for c in type_parameters {
                    f(c);
                }
                for c in extended {
                    f(c);
                }
                for c in implemented {
                    f(c);
                }
                for c in members {
                    f(c);
                }
            }
            NodeKind::EnumConstant {
                arguments, members, ..
            } => {
                for c in arguments {
                    f(c);
                }
                for c in members {
                    f(c);
                }
            }
            NodeKind::FieldDeclaration { variables, .. }
            | NodeKind::VariableDeclarationExpr { variables, .. } => {
                for c in variables {
                    f(c);
                }
            }
            NodeKind::VariableDeclarator {
                var_type,
                initializer,
                ..
            } => {
                f(var_type);
                if let Some(c) = initializer {
                    f(c);
                }
            }
            NodeKind::MethodDeclaration {
                type_parameters,
                return_type,
                parameters,
                throws,
                body,
                ..
            } => {
                for c in type_parameters {
                    f(c);
                }
                f(return_type);
                for c in parameters {
                    f(c);
                }
                for c in throws {
                    f(c);
                }
                if let Some(c) = body {
                    f(c);
                }
            }
            NodeKind::ConstructorDeclaration {
                type_parameters,
                parameters,
                throws,
                body,
                ..
            } => {
                for c in type_parameters {
                    f(c);
                }
                for c in parameters {
                    f(c);
                }
                for c in throws {
                    f(c);
                }
                f(body);
            }
            NodeKind::InitializerDeclaration { body, .. } => f(body),
            NodeKind::Parameter { param_type, .. } => f(param_type),
            NodeKind::TypeParameter { bounds, .. } => {
                for c in bounds {
                    f(c);
                }
            }
            NodeKind::Annotation { pairs, .. } => {
                for c in pairs {
                    f(c);
                }
            }
            NodeKind::MemberValuePair { value, .. } => f(value),
            NodeKind::ClassType { type_arguments, .. } => {
                if let Some(arguments) = type_arguments {
                    for c in arguments {
                        f(c);
                    }
                }
            }
            NodeKind::ArrayType { component } => f(component),
            NodeKind::WildcardType { bound, .. } => {
                if let Some(c) = bound {
                    f(c);
                }
            }
            NodeKind::UnionType { elements } => {
                for c in elements {
                    f(c);
                }
            }
            NodeKind::Block { statements } => {
                for c in statements {
                    f(c);
                }
            }
            NodeKind::ExpressionStmt { expression }
            | NodeKind::Throw { expression }
            | NodeKind::Unary { expression, .. } => f(expression),
            NodeKind::If {
                condition,
                then_stmt,
                else_stmt,
            } => {
                f(condition);
                f(then_stmt);
                if let Some(c) = else_stmt {
                    f(c);
                }
            }
            NodeKind::While { condition, body } => {
                f(condition);
                f(body);
            }
            NodeKind::Do { body, condition } => {
                f(body);
                f(condition);
            }
            NodeKind::For {
                init,
                condition,
                update,
                body,
            } => {
                for c in init {
                    f(c);
                }
                if let Some(c) = condition {
                    f(c);
                }
                for c in update {
                    f(c);
                }
                f(body);
            }
            NodeKind::ForEach {
                variable,
                iterable,
                body,
            } => {
                f(variable);
                f(iterable);
                f(body);
            }
            NodeKind::Return { expression } => {
                if let Some(c) = expression {
                    f(c);
                }
            }
            NodeKind::Try {
                resources,
                body,
                catch_clauses,
                finally_block,
            } => {
                for c in resources {
                    f(c);
                }
                f(body);
                for c in catch_clauses {
                    f(c);
                }
                if let Some(c) = finally_block {
                    f(c);
                }
            }
            NodeKind::CatchClause { parameter, body } => {
                f(parameter);
                f(body);
            }
            NodeKind::Switch { selector, entries } => {
                f(selector);
                for c in entries {
                    f(c);
                }
            }
            NodeKind::SwitchEntry { labels, statements } => {
                for c in labels {
                    f(c);
                }
                for c in statements {
                    f(c);
                }
            }
            NodeKind::Assert { check, message } => {
                f(check);
                if let Some(c) = message {
                    f(c);
                }
            }
            NodeKind::Labeled { statement, .. } => f(statement),
            NodeKind::Synchronized { expression, body } => {
                f(expression);
                f(body);
            }
            NodeKind::Assign { target, value, .. } => {
                f(target);
                f(value);
            }
            NodeKind::Binary { left, right, .. } => {
                f(left);
                f(right);
            }
            NodeKind::Conditional {
                condition,
                then_expr,
                else_expr,
            } => {
                f(condition);
                f(then_expr);
                f(else_expr);
            }
            NodeKind::MethodCall {
                scope,
                type_arguments,
                arguments,
                ..
            } => {
                if let Some(c) = scope {
                    f(c);
                }
                for c in type_arguments {
                    f(c);
                }
                for c in arguments {
                    f(c);
                }
            }
            NodeKind::ObjectCreation {
                scope,
                class_type,
                type_arguments,
                arguments,
                body,
            } => {
                if let Some(c) = scope {
                    f(c);
                }
                for c in type_arguments {
                    f(c);
                }
                f(class_type);
                for c in arguments {
                    f(c);
                }
                if let Some(members) = body {
                    for c in members {
                        f(c);
                    }
                }
            }
            NodeKind::FieldAccess { scope, .. } | NodeKind::MethodReference { scope, .. } => {
                f(scope)
            }
            NodeKind::ArrayAccess { array, index } => {
                f(array);
                f(index);
            }
            NodeKind::ArrayCreation {
                element_type,
                dimensions,
                initializer,
                ..
            } => {
                f(element_type);
                for c in dimensions {
                    f(c);
                }
                if let Some(c) = initializer {
                    f(c);
                }
            }
            NodeKind::ArrayInitializer { values } | NodeKind::ListExpression { values } => {
                for c in values {
                    f(c);
                }
            }
            NodeKind::MapExpression { entries } => {
                for c in entries {
                    f(c);
                }
            }
            NodeKind::MapEntry { key, value } => {
                f(key);
                f(value);
            }
            NodeKind::Cast {
                target_type,
                expression,
            } => {
                f(target_type);
                f(expression);
            }
            NodeKind::InstanceOf {
                expression,
                target_type,
                ..
            } => {
                f(expression);
                f(target_type);
            }
            NodeKind::Closure { parameters, body } => {
                for c in parameters {
                    f(c);
                }
                f(body);
            }
            NodeKind::ClassExpr { class_type } => f(class_type),
            NodeKind::Enclosed { inner } => f(inner),
            NodeKind::GStringLiteral { expressions, .. } => {
                for c in expressions {
                    f(c);
                }
            }
            NodeKind::PackageDeclaration { .. }
            | NodeKind::ImportDeclaration { .. }
            | NodeKind::PrimitiveType { .. }
            | NodeKind::VoidType
            | NodeKind::DynamicType { .. }
            | NodeKind::Break { .. }
            | NodeKind::Continue { .. }
            | NodeKind::EmptyStmt
            | NodeKind::Name { .. }
            | NodeKind::This { .. }
            | NodeKind::Super { .. }
            | NodeKind::IntegerLiteral { .. }
            | NodeKind::DecimalLiteral { .. }
            | NodeKind::StringLiteral { .. }
            | NodeKind::BooleanLiteral { .. }
            | NodeKind::NullLiteral
            | NodeKind::Empty { .. } => {}
        }
    }};
}

impl NodeKind {
    /// Direct syntactic children in source order.
    pub fn children(&self) -> Vec<NodeId> {
        let mut children = Vec::new();
        each_child!(self, |c: &NodeId| children.push(*c));
        children
    }

    pub fn visit_children_mut(&mut self, f: &mut dyn FnMut(&mut NodeId)) {
        each_child!(self, |c: &mut NodeId| f(c));
    }

    /// The payload with every child link blanked out.
    pub(crate) fn detached(&self) -> NodeKind {
        let mut kind = self.clone();
        kind.visit_children_mut(&mut |slot| *slot = NodeId::DETACHED);
        kind
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            NodeKind::PackageDeclaration { name }
            | NodeKind::ImportDeclaration { name, .. }
            | NodeKind::ClassDeclaration { name, .. }
            | NodeKind::EnumConstant { name, .. }
            | NodeKind::VariableDeclarator { name, .. }
            | NodeKind::MethodDeclaration { name, .. }
            | NodeKind::ConstructorDeclaration { name, .. }
            | NodeKind::Parameter { name, .. }
            | NodeKind::TypeParameter { name, .. }
            | NodeKind::Annotation { name, .. }
            | NodeKind::MemberValuePair { name, .. }
            | NodeKind::ClassType { name, .. }
            | NodeKind::MethodCall { name, .. }
            | NodeKind::FieldAccess { name, .. } => Some(name),
            NodeKind::Name { identifier } => Some(identifier),
            _ => None,
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(
            self,
            NodeKind::ClassType { .. }
                | NodeKind::PrimitiveType { .. }
                | NodeKind::VoidType
                | NodeKind::ArrayType { .. }
                | NodeKind::WildcardType { .. }
                | NodeKind::UnionType { .. }
                | NodeKind::DynamicType { .. }
        )
    }

    /// Nodes that open a lexical scope for name resolution.
    pub fn is_scope(&self) -> bool {
        matches!(
            self,
            NodeKind::CompilationUnit { .. }
                | NodeKind::ClassDeclaration { .. }
                | NodeKind::MethodDeclaration { .. }
                | NodeKind::ConstructorDeclaration { .. }
                | NodeKind::Closure { .. }
                | NodeKind::Block { .. }
        )
    }

    pub fn is_empty_placeholder(&self) -> bool {
        matches!(self, NodeKind::Empty { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_follow_source_order() {
        let kind = NodeKind::For {
            init: vec![NodeId(1)],
            condition: Some(NodeId(2)),
            update: vec![NodeId(3), NodeId(4)],
            body: NodeId(5),
        };
        assert_eq!(
            kind.children(),
            vec![NodeId(1), NodeId(2), NodeId(3), NodeId(4), NodeId(5)]
        );
    }

    #[test]
    fn test_detached_ignores_child_links() {
        let a = NodeKind::Enclosed { inner: NodeId(1) };
        let b = NodeKind::Enclosed { inner: NodeId(7) };
        assert_ne!(a, b);
        assert_eq!(a.detached(), b.detached());
    }
}
