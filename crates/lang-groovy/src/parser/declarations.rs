//! Declarations. Headers (modifiers, return types, `extends` clauses) are read
//! from the source text between the named parts the grammar exposes.

use super::converter::{
    Conv, Converter, child_of_kind, named_children, named_children_with_comments, operands,
};
use super::types::{split_top_level, strip_annotations};
use crate::ast::{ClassKind, Comment, NodeId, NodeKind};
use tree_sitter::Node as TsNode;

const MODIFIER_KEYWORDS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "final",
    "abstract",
    "synchronized",
    "transient",
    "volatile",
    "native",
    "strictfp",
    "default",
    "sealed",
    "non-sealed",
];

/// Modifier keywords and annotations of a declaration.
#[derive(Default)]
pub(crate) struct Modifiers {
    pub keywords: Vec<String>,
    pub annotations: Vec<NodeId>,
}

/// Splits leading annotations and modifier keywords off a declaration header.
fn strip_modifiers(mut text: &str) -> (&str, Vec<String>) {
    let mut keywords = Vec::new();
    loop {
        text = strip_annotations(text.trim_start());
        let end = text.find(char::is_whitespace).unwrap_or(text.len());
        let word = &text[..end];
        if word.is_empty() || !MODIFIER_KEYWORDS.contains(&word) {
            return (text.trim(), keywords);
        }
        keywords.push(word.to_string());
        text = &text[end..];
    }
}

/// Byte index of `word` in `text` as a whole word.
fn find_word(text: &str, word: &str) -> Option<usize> {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_' || c == '$';
    text.match_indices(word).map(|(i, _)| i).find(|&i| {
        let before = text[..i].chars().next_back();
        let after = text[i + word.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}

/// The text of a header clause introduced by `keyword`, up to the next
/// clause keyword.
fn clause<'t>(header: &'t str, keyword: &str) -> Option<&'t str> {
    let start = find_word(header, keyword)? + keyword.len();
    let rest = &header[start..];
    let end = ["extends", "implements", "permits", "throws"]
        .iter()
        .filter_map(|k| find_word(rest, k))
        .min()
        .unwrap_or(rest.len());
    Some(rest[..end].trim())
}

/// Splits `<T, U> rest` into the type parameter text and the rest.
fn leading_generics(text: &str) -> (Option<&str>, &str) {
    if !text.starts_with('<') {
        return (None, text);
    }
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return (Some(&text[..=i]), text[i + 1..].trim_start());
                }
            }
            _ => {}
        }
    }
    (None, text)
}

impl<'a> Converter<'a> {
    pub(crate) fn compilation_unit(&mut self, root: TsNode) -> Conv<NodeId> {
        let mut package = None;
        let mut imports = Vec::new();
        let mut body = Vec::new();

        for child in named_children_with_comments(root) {
            match child.kind() {
                "groovy_package" | "package_declaration" => {
                    let name = self.package_name(child)?;
                    package = Some(self.alloc(NodeKind::PackageDeclaration { name }, child));
                }
                "groovy_import" | "import_declaration" => imports.push(self.import(child)?),
                "shebang" | "hashbang" => {}
                _ => body.push(child),
            }
        }

        let (members, orphans) =
            self.sequence(body, |this, child| this.toplevel(child).map(Some))?;
        let unit = self.alloc(
            NodeKind::CompilationUnit {
                package,
                imports,
                members,
            },
            root,
        );
        self.attach_orphans(unit, orphans);
        Ok(unit)
    }

    fn package_name(&self, node: TsNode) -> Conv<String> {
        let text = strip_annotations(self.text(node).trim());
        let name = text
            .strip_prefix("package")
            .unwrap_or(text)
            .trim()
            .trim_end_matches(';')
            .trim();
        if name.is_empty() {
            return self.fail(node, "package without a name");
        }
        Ok(name.chars().filter(|c| !c.is_whitespace()).collect())
    }

    /// `import static a.b.C.m`, `import a.b.*`, `import a.b.C as D`.
    fn import(&mut self, node: TsNode) -> Conv<NodeId> {
        let text = self.text(node).trim();
        let mut rest = text
            .strip_prefix("import")
            .unwrap_or(text)
            .trim()
            .trim_end_matches(';')
            .trim();
        let is_static = match rest.strip_prefix("static") {
            Some(after) if after.starts_with(char::is_whitespace) => {
                rest = after.trim_start();
                true
            }
            _ => false,
        };
        if let Some(alias) = find_word(rest, "as") {
            rest = rest[..alias].trim_end();
        }
        let (rest, is_asterisk) = match rest.strip_suffix('*') {
            Some(prefix) => (prefix.trim_end().trim_end_matches('.'), true),
            None => (rest, false),
        };
        let name: String = rest.chars().filter(|c| !c.is_whitespace()).collect();
        if name.is_empty() {
            return self.fail(node, "import without a name");
        }
        let kind = NodeKind::ImportDeclaration {
            name,
            is_static,
            is_asterisk,
        };
        Ok(self.alloc(kind, node))
    }

    /// A top-level script element: a type, a script method or a statement.
    fn toplevel(&mut self, node: TsNode) -> Conv<NodeId> {
        match node.kind() {
            kind if Self::is_method_declaration(kind) => self.member(node),
            _ => self.statement(node),
        }
    }

    pub(crate) fn is_type_declaration(kind: &str) -> bool {
        matches!(
            kind,
            "class_definition"
                | "class_declaration"
                | "interface_definition"
                | "interface_declaration"
                | "enum_definition"
                | "enum_declaration"
                | "trait_definition"
        )
    }

    pub(crate) fn is_method_declaration(kind: &str) -> bool {
        matches!(
            kind,
            "function_definition"
                | "function_declaration"
                | "method_declaration"
                | "constructor_declaration"
        )
    }

    fn body_child<'t>(node: TsNode<'t>) -> Option<TsNode<'t>> {
        node.child_by_field_name("body").or_else(|| {
            named_children(node).into_iter().rev().find(|child| {
                matches!(
                    child.kind(),
                    "closure" | "block" | "class_body" | "enum_body" | "interface_body"
                )
            })
        })
    }

    fn name_child<'t>(&self, node: TsNode<'t>) -> Conv<TsNode<'t>> {
        match node
            .child_by_field_name("name")
            .or_else(|| child_of_kind(node, "identifier"))
        {
            Some(name) => Ok(name),
            None => self.fail(node, "declaration without a name"),
        }
    }

    /// Source text from the start of `node` up to the start of `until`.
    fn text_before(&self, node: TsNode, until: TsNode) -> &'a str {
        let end = until.start_byte().max(node.start_byte());
        &self.source[node.start_byte()..end]
    }

    /// The named child of `node` that starts where `slice` starts, as the
    /// origin of a type read from text.
    fn origin_of<'t>(&self, node: TsNode<'t>, slice: &str) -> TsNode<'t> {
        let Some(offset) = (slice.as_ptr() as usize).checked_sub(self.source.as_ptr() as usize)
        else {
            return node;
        };
        named_children(node)
            .into_iter()
            .find(|child| child.start_byte() == offset)
            .unwrap_or(node)
    }

    /// The declared type written as `text`; no type at all means `def`.
    fn declared_type(&mut self, text: &'a str, node: TsNode) -> Conv<NodeId> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(self.alloc_synthetic(NodeKind::DynamicType {
                keyword: "def".to_string(),
            }));
        }
        let origin = self.origin_of(node, text);
        self.type_from_text(text, origin)
    }

    pub(crate) fn type_declaration(&mut self, node: TsNode) -> Conv<NodeId> {
        let modifiers = self.modifiers(node)?;
        let name_node = self.name_child(node)?;
        let name = self.text(name_node).to_string();

        let keyword = self
            .text_before(node, name_node)
            .split_whitespace()
            .next_back()
            .unwrap_or("class");
        let class_kind = match keyword {
            "interface" | "trait" => ClassKind::Interface,
            "@interface" => ClassKind::Annotation,
            "enum" => ClassKind::Enum,
            "record" => ClassKind::Record,
            _ => ClassKind::Class,
        };

        let Some(body) = Self::body_child(node) else {
            return self.fail(node, "type declaration without a body");
        };
        let header = self.source[name_node.end_byte()..body.start_byte()].trim();
        let (generics, header) = leading_generics(header);
        let type_parameters = match generics {
            Some(generics) => self.type_parameters_from_text(generics, node)?,
            None => Vec::new(),
        };
        let extended = self.type_list(clause(header, "extends"), node)?;
        let implemented = self.type_list(clause(header, "implements"), node)?;

        self.class_names.push(name.clone());
        let members = self.sequence(named_children_with_comments(body), |this, child| {
            let member = match child.kind() {
                "identifier" | "function_call" | "enum_constant"
                    if class_kind == ClassKind::Enum =>
                {
                    this.enum_constant(child)?
                }
                _ => this.member(child)?,
            };
            Ok(Some(member))
        });
        self.class_names.pop();
        let (members, orphans) = members?;

        let id = self.alloc(
            NodeKind::ClassDeclaration {
                name,
                class_kind,
                modifiers: modifiers.keywords,
                type_parameters,
                extended,
                implemented,
                members,
            },
            node,
        );
        self.finish_declaration(id, modifiers.annotations, orphans);
        Ok(id)
    }

    fn finish_declaration(&mut self, id: NodeId, annotations: Vec<NodeId>, orphans: Vec<Comment>) {
        for annotation in annotations {
            self.ast.add_annotation(id, annotation);
        }
        self.attach_orphans(id, orphans);
    }

    fn type_list(&mut self, text: Option<&str>, origin: TsNode) -> Conv<Vec<NodeId>> {
        let mut types = Vec::new();
        for part in text.map(|t| split_top_level(t, ',')).unwrap_or_default() {
            types.push(self.type_from_text(part, origin)?);
        }
        Ok(types)
    }

    /// `RED` or `RED('#f00')`.
    fn enum_constant(&mut self, node: TsNode) -> Conv<NodeId> {
        self.guarded(node, |this, node| {
            let (name, arguments) = match node.kind() {
                "identifier" => (this.text(node).to_string(), Vec::new()),
                _ => {
                    let name = this.text(this.field_or_operand(node, "function", 0)?).to_string();
                    let arguments = match child_of_kind(node, "argument_list") {
                        Some(list) => this.arguments(list)?,
                        None => Vec::new(),
                    };
                    (name, arguments)
                }
            };
            Ok(this.alloc(
                NodeKind::EnumConstant {
                    name,
                    arguments,
                    members: Vec::new(),
                },
                node,
            ))
        })
    }

    pub(crate) fn member(&mut self, node: TsNode) -> Conv<NodeId> {
        self.guarded(node, Self::member_inner)
    }

    fn member_inner(&mut self, node: TsNode) -> Conv<NodeId> {
        match node.kind() {
            "declaration" | "field_declaration" => self.field(node),
            kind if Self::is_method_declaration(kind) => self.method(node),
            // `{ ... }` in a class body
            "closure" | "block" => {
                let body = self.block(node)?;
                Ok(self.alloc(
                    NodeKind::InitializerDeclaration {
                        is_static: false,
                        body,
                    },
                    node,
                ))
            }
            kind if Self::is_type_declaration(kind) => self.type_declaration(node),
            _ => self.fail(node, "unsupported class member"),
        }
    }

    fn field(&mut self, node: TsNode) -> Conv<NodeId> {
        let modifiers = self.modifiers(node)?;
        let variables = self.declarators(node)?;
        let id = self.alloc(
            NodeKind::FieldDeclaration {
                modifiers: modifiers.keywords,
                variables,
            },
            node,
        );
        self.finish_declaration(id, modifiers.annotations, Vec::new());
        Ok(id)
    }

    /// `def x = 1`, `final String s`, `List<Integer> xs = []`. The type is
    /// everything between the modifiers and the name.
    pub(crate) fn declarators(&mut self, node: TsNode) -> Conv<Vec<NodeId>> {
        let mut cursor = node.walk();
        let children: Vec<TsNode> = node.children(&mut cursor).collect();
        let assign = children
            .iter()
            .position(|c| !c.is_named() && c.kind() == "=");
        let head = &children[..assign.unwrap_or(children.len())];

        let name_node = match node.child_by_field_name("name") {
            Some(name) => name,
            None => match head.iter().rev().find(|c| c.kind() == "identifier") {
                Some(name) => *name,
                None => return self.fail(node, "declaration without a name"),
            },
        };
        let (type_text, _) = strip_modifiers(self.text_before(node, name_node));
        let var_type = self.declared_type(type_text, node)?;

        let value = match node.child_by_field_name("value") {
            Some(value) => Some(value),
            None => assign.and_then(|assign| {
                children[assign + 1..]
                    .iter()
                    .find(|c| c.is_named() && !c.is_extra())
                    .copied()
            }),
        };
        let initializer = match value {
            Some(value) => Some(self.expression(value)?),
            None => None,
        };
        Ok(vec![self.alloc(
            NodeKind::VariableDeclarator {
                name: self.text(name_node).to_string(),
                var_type,
                initializer,
            },
            node,
        )])
    }

    fn method(&mut self, node: TsNode) -> Conv<NodeId> {
        let modifiers = self.modifiers(node)?;
        let Some(list) = node
            .child_by_field_name("parameters")
            .or_else(|| child_of_kind(node, "parameter_list"))
            .or_else(|| child_of_kind(node, "formal_parameters"))
        else {
            return self.fail(node, "method without a parameter list");
        };
        let name_node = match node
            .child_by_field_name("function")
            .or_else(|| node.child_by_field_name("name"))
        {
            Some(name) => name,
            None => match named_children(node)
                .into_iter()
                .take_while(|c| c.id() != list.id())
                .filter(|c| c.kind() == "identifier")
                .last()
            {
                Some(name) => name,
                None => return self.fail(node, "method without a name"),
            },
        };
        let name = self.text(name_node).to_string();

        let (header, _) = strip_modifiers(self.text_before(node, name_node));
        // `def <T> T pick(...)`
        let header = match header.strip_prefix("def") {
            Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
            _ => header,
        };
        let (generics, return_text) = leading_generics(header);
        let type_parameters = match generics {
            Some(generics) => self.type_parameters_from_text(generics, node)?,
            None => Vec::new(),
        };
        let parameters = self.parameters(list)?;
        let body_node = Self::body_child(node);
        let tail_end = body_node.map_or(node.end_byte(), |b| b.start_byte());
        let tail = &self.source[list.end_byte()..tail_end.max(list.end_byte())];
        let throws = self.type_list(clause(tail, "throws"), node)?;
        let body = match body_node {
            Some(body) => Some(self.block(body)?),
            None => None,
        };

        let is_constructor = return_text.is_empty()
            && self.class_names.last() == Some(&name)
            && generics.is_none();
        let kind = match (is_constructor, body) {
            (true, Some(body)) => NodeKind::ConstructorDeclaration {
                name,
                modifiers: modifiers.keywords,
                type_parameters,
                parameters,
                throws,
                body,
            },
            _ => NodeKind::MethodDeclaration {
                name,
                modifiers: modifiers.keywords,
                type_parameters,
                return_type: self.declared_type(return_text, node)?,
                parameters,
                throws,
                body,
            },
        };
        let id = self.alloc(kind, node);
        self.finish_declaration(id, modifiers.annotations, Vec::new());
        Ok(id)
    }

    pub(crate) fn parameters(&mut self, list: TsNode) -> Conv<Vec<NodeId>> {
        let mut parameters = Vec::new();
        for child in named_children(list) {
            parameters.push(self.parameter(child)?);
        }
        Ok(parameters)
    }

    pub(crate) fn parameter(&mut self, node: TsNode) -> Conv<NodeId> {
        self.guarded(node, Self::parameter_inner)
    }

    /// `a`, `int a`, `String... names`, `def x = 1`. A varargs parameter
    /// stores its element type.
    fn parameter_inner(&mut self, node: TsNode) -> Conv<NodeId> {
        if node.kind() == "identifier" {
            return Ok(self.untyped_parameter(node));
        }
        let modifiers = self.modifiers(node)?;
        let name_node = match node.child_by_field_name("name") {
            Some(name) => name,
            None => {
                let mut cursor = node.walk();
                let head: Vec<TsNode> = node
                    .children(&mut cursor)
                    .take_while(|c| c.is_named() || c.kind() != "=")
                    .collect();
                match head.into_iter().rev().find(|c| c.kind() == "identifier") {
                    Some(name) => name,
                    None => return self.fail(node, "parameter without a name"),
                }
            }
        };
        let (type_text, _) = strip_modifiers(self.text_before(node, name_node));
        let (type_text, is_varargs) = match type_text.strip_suffix("...") {
            Some(element) => (element.trim_end(), true),
            None => (type_text, false),
        };
        let param_type = self.declared_type(type_text, node)?;
        let id = self.alloc(
            NodeKind::Parameter {
                name: self.text(name_node).to_string(),
                modifiers: modifiers.keywords,
                param_type,
                is_varargs,
            },
            node,
        );
        self.finish_declaration(id, modifiers.annotations, Vec::new());
        Ok(id)
    }

    /// Keywords come from the leading text; annotations from `annotation`
    /// children, directly or inside a modifier list.
    pub(crate) fn modifiers(&mut self, node: TsNode) -> Conv<Modifiers> {
        let (_, keywords) = strip_modifiers(self.text(node));
        let mut modifiers = Modifiers {
            keywords,
            annotations: Vec::new(),
        };
        for child in named_children(node) {
            match child.kind() {
                "annotation" | "marker_annotation" => {
                    modifiers.annotations.push(self.annotation(child)?)
                }
                "modifiers" | "modifier" => {
                    for inner in named_children(child) {
                        if matches!(inner.kind(), "annotation" | "marker_annotation") {
                            modifiers.annotations.push(self.annotation(inner)?);
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(modifiers)
    }

    /// `@Name`, `@Name(value)`, `@Name(key = value, other = 2)`.
    pub(crate) fn annotation(&mut self, node: TsNode) -> Conv<NodeId> {
        let text = self.text(node).trim_start_matches('@');
        let end = text
            .find(|c: char| c.is_whitespace() || c == '(')
            .unwrap_or(text.len());
        let name = text[..end].to_string();
        if name.is_empty() {
            return self.fail(node, "annotation without a name");
        }
        let mut pairs = Vec::new();
        let arguments = named_children(node)
            .into_iter()
            .find(|c| c.kind().contains("argument"));
        if let Some(arguments) = arguments {
            for argument in operands(arguments) {
                let pair = match argument.kind() {
                    "map_item" | "element_value_pair" | "assignment" => {
                        let parts = operands(argument);
                        let (Some(key), Some(value)) = (parts.first(), parts.last()) else {
                            return self.fail(argument, "incomplete annotation argument");
                        };
                        NodeKind::MemberValuePair {
                            name: self.text(*key).to_string(),
                            value: self.expression(*value)?,
                        }
                    }
                    _ => NodeKind::MemberValuePair {
                        name: "value".to_string(),
                        value: self.expression(argument)?,
                    },
                };
                pairs.push(self.alloc(pair, argument));
            }
        }
        Ok(self.alloc(NodeKind::Annotation { name, pairs }, node))
    }
}

#[cfg(test)]
mod tests {
    use super::{clause, find_word, leading_generics, strip_modifiers};
    use crate::ast::{ClassKind, NodeKind};
    use crate::parser::GroovyParser;
    use groovyscope_core::ParseConfig;

    #[test]
    fn test_header_helpers() {
        let (rest, keywords) = strip_modifiers("@Deprecated public static final String");
        assert_eq!(rest, "String");
        assert_eq!(keywords, vec!["public", "static", "final"]);
        assert_eq!(find_word("Mapper implements X", "implements"), Some(7));
        assert_eq!(find_word("extendsFoo", "extends"), None);
        assert_eq!(
            clause("<T> extends Base<T> implements A, B", "implements"),
            Some("A, B")
        );
        assert_eq!(
            leading_generics("<K, V extends List<K>> Map<K, V>"),
            (Some("<K, V extends List<K>>"), "Map<K, V>")
        );
    }

    #[test]
    fn test_class_with_fields_and_methods() {
        let source = "class Widget extends Base implements Named {\n    String name\n    Widget(String name) { this.name = name }\n    int size() { 1 }\n    def label() { name }\n}";
        let result = GroovyParser::new()
            .unwrap()
            .parse(source, &ParseConfig::strict())
            .unwrap();
        let unit = result.unit.expect("strict parse succeeds");
        let class = result
            .ast
            .find_first(unit, |k| matches!(k, NodeKind::ClassDeclaration { .. }))
            .unwrap();
        let NodeKind::ClassDeclaration {
            name,
            class_kind,
            extended,
            implemented,
            members,
            ..
        } = result.ast.kind(class)
        else {
            unreachable!()
        };
        assert_eq!(name, "Widget");
        assert_eq!(*class_kind, ClassKind::Class);
        assert_eq!(extended.len(), 1);
        assert_eq!(implemented.len(), 1);
        assert_eq!(members.len(), 4);
        assert!(matches!(result.ast.kind(members[0]), NodeKind::FieldDeclaration { .. }));
        assert!(matches!(
            result.ast.kind(members[1]),
            NodeKind::ConstructorDeclaration { parameters, .. } if parameters.len() == 1
        ));
        let NodeKind::MethodDeclaration { return_type, .. } = result.ast.kind(members[3]) else {
            panic!("expected a method");
        };
        assert!(matches!(result.ast.kind(*return_type), NodeKind::DynamicType { .. }));
    }

    #[test]
    fn test_script_method_with_varargs() {
        let source = "def total(int first, int... rest) { first }";
        let result = GroovyParser::new()
            .unwrap()
            .parse(source, &ParseConfig::strict())
            .unwrap();
        let unit = result.unit.expect("strict parse succeeds");
        let method = result
            .ast
            .find_first(unit, |k| matches!(k, NodeKind::MethodDeclaration { .. }))
            .unwrap();
        let NodeKind::MethodDeclaration { parameters, .. } = result.ast.kind(method) else {
            unreachable!()
        };
        assert!(matches!(
            result.ast.kind(parameters[1]),
            NodeKind::Parameter { name, is_varargs: true, .. } if name == "rest"
        ));
    }
}
