use super::converter::{
    Conv, Converter, child_of_kind, has_token, is_comment_kind, named_children, operands,
    operator_token,
};
use crate::ast::{AssignOp, BinaryOp, NodeId, NodeKind, UnaryOp};
use tree_sitter::Node as TsNode;

impl<'a> Converter<'a> {
    pub(crate) fn expression(&mut self, node: TsNode) -> Conv<NodeId> {
        self.guarded(node, Self::expression_inner)
    }

    fn expression_inner(&mut self, node: TsNode) -> Conv<NodeId> {
        if has_token(node, "new") {
            let kind = self.object_creation(node)?;
            return Ok(self.alloc(kind, node));
        }
        let kind = match node.kind() {
            "parenthesized_expression" => NodeKind::Enclosed {
                inner: self.expression(self.first_named(node)?)?,
            },
            "assignment" | "assignment_expression" => self.assignment(node)?,
            "binary_op" | "binary_expression" => return self.binary(node),
            "unary_op" | "unary_expression" => {
                let symbol = self.operator_text(node)?;
                let Some(operator) = UnaryOp::from_prefix(symbol) else {
                    return self.fail(node, format!("unknown unary operator `{}`", symbol));
                };
                NodeKind::Unary {
                    operator,
                    expression: self.expression(self.first_named(node)?)?,
                }
            }
            "increment_op" | "update_expression" => self.update(node)?,
            "ternary_op" | "ternary_expression" => NodeKind::Conditional {
                condition: self.expression(self.field_or_operand(node, "condition", 0)?)?,
                then_expr: self.expression(self.field_or_operand(node, "then", 1)?)?,
                else_expr: self.expression(self.field_or_operand(node, "else", 2)?)?,
            },
            "cast_expression" => NodeKind::Cast {
                target_type: self.type_node(self.field_or_operand(node, "type", 0)?)?,
                expression: self.expression(self.field_or_operand(node, "value", 1)?)?,
            },
            "closure" | "closure_expression" => self.closure(node)?,
            "list" | "list_literal" => {
                let mut values = Vec::new();
                for value in operands(node) {
                    values.push(self.expression(value)?);
                }
                NodeKind::ListExpression { values }
            }
            "map" | "map_literal" => {
                let mut entries = Vec::new();
                for item in named_children(node) {
                    entries.push(self.map_entry(item)?);
                }
                NodeKind::MapExpression { entries }
            }
            "function_call" | "method_call" | "method_invocation" => self.call(node)?,
            // `println 'hi'`, `assertThat x`
            "juxt_function_call" | "command_expression" => self.call(node)?,
            "dotted_identifier" | "field_access" | "member_access" | "property_access" => {
                self.member_access(node)?
            }
            "index" | "index_expression" | "array_access" => NodeKind::ArrayAccess {
                array: self.expression(self.field_or_operand(node, "array", 0)?)?,
                index: self.expression(self.field_or_operand(node, "index", 1)?)?,
            },
            "identifier" => match self.text(node) {
                "this" => NodeKind::This { qualifier: None },
                "super" => NodeKind::Super { qualifier: None },
                identifier => NodeKind::Name {
                    identifier: identifier.to_string(),
                },
            },
            "this" => NodeKind::This { qualifier: None },
            "super" => NodeKind::Super { qualifier: None },
            kind if Self::is_literal(kind) => return self.literal(node),
            _ => return self.fail(node, "unsupported expression"),
        };
        Ok(self.alloc(kind, node))
    }

    fn operator_text(&self, node: TsNode) -> Conv<&'a str> {
        match operator_token(node) {
            Some(token) => Ok(self.text(token)),
            None => self.fail(node, "missing operator"),
        }
    }

    fn assignment(&mut self, node: TsNode) -> Conv<NodeKind> {
        let symbol = self.operator_text(node)?;
        let Some(operator) = AssignOp::from_symbol(symbol) else {
            return self.fail(node, format!("unknown assignment operator `{}`", symbol));
        };
        let parts = operands(node);
        let (Some(target), Some(value)) = (parts.first(), parts.last()) else {
            return self.fail(node, "incomplete assignment");
        };
        Ok(NodeKind::Assign {
            target: self.expression(*target)?,
            operator,
            value: self.expression(*value)?,
        })
    }

    /// Binary operators, including the type operators `as` and `instanceof`.
    fn binary(&mut self, node: TsNode) -> Conv<NodeId> {
        let symbol = self.operator_text(node)?;
        let parts = operands(node);
        let (Some(left), Some(right)) = (parts.first().copied(), parts.get(1).copied()) else {
            return self.fail(node, "incomplete binary operation");
        };
        let kind = match symbol {
            "as" => NodeKind::Cast {
                target_type: self.type_node(right)?,
                expression: self.expression(left)?,
            },
            "instanceof" => NodeKind::InstanceOf {
                expression: self.expression(left)?,
                target_type: self.type_node(right)?,
                pattern: None,
            },
            "!instanceof" => {
                let expression = self.expression(left)?;
                let target_type = self.type_node(right)?;
                let check = self.alloc(
                    NodeKind::InstanceOf {
                        expression,
                        target_type,
                        pattern: None,
                    },
                    node,
                );
                NodeKind::Unary {
                    operator: UnaryOp::Not,
                    expression: check,
                }
            }
            _ => {
                let Some(operator) = BinaryOp::from_symbol(symbol) else {
                    return self.fail(node, format!("unknown binary operator `{}`", symbol));
                };
                NodeKind::Binary {
                    left: self.expression(left)?,
                    operator,
                    right: self.expression(right)?,
                }
            }
        };
        Ok(self.alloc(kind, node))
    }

    fn update(&mut self, node: TsNode) -> Conv<NodeKind> {
        let Some(first) = node.child(0) else {
            return self.fail(node, "empty update expression");
        };
        let symbol = self.operator_text(node)?;
        let operator = if first.is_named() {
            UnaryOp::from_postfix(symbol)
        } else {
            UnaryOp::from_prefix(symbol)
        };
        let Some(operator) = operator else {
            return self.fail(node, "unknown update operator");
        };
        Ok(NodeKind::Unary {
            operator,
            expression: self.expression(self.first_named(node)?)?,
        })
    }

    /// `{ a, int b -> ... }`. Everything before `->` declares parameters;
    /// untyped ones are declared `def`.
    fn closure(&mut self, node: TsNode) -> Conv<NodeKind> {
        let mut cursor = node.walk();
        let children: Vec<TsNode> = node.children(&mut cursor).collect();
        let arrow = children.iter().position(|c| c.kind() == "->");

        let mut parameters = Vec::new();
        let mut statements = Vec::new();
        for (i, child) in children.into_iter().enumerate() {
            if !child.is_named() {
                continue;
            }
            if arrow.is_some_and(|arrow| i < arrow) {
                match child.kind() {
                    "parameter_list" => parameters.extend(self.parameters(child)?),
                    "identifier" => parameters.push(self.untyped_parameter(child)),
                    kind if is_comment_kind(kind) => {}
                    _ => parameters.push(self.parameter(child)?),
                }
            } else {
                statements.push(child);
            }
        }
        let body = self.block_of(node, statements)?;
        Ok(NodeKind::Closure { parameters, body })
    }

    pub(crate) fn untyped_parameter(&mut self, node: TsNode) -> NodeId {
        let param_type = self.alloc_synthetic(NodeKind::DynamicType {
            keyword: "def".to_string(),
        });
        self.alloc(
            NodeKind::Parameter {
                name: self.text(node).to_string(),
                modifiers: Vec::new(),
                param_type,
                is_varargs: false,
            },
            node,
        )
    }

    fn map_entry(&mut self, item: TsNode) -> Conv<NodeId> {
        let key_node = self.field_or_operand(item, "key", 0)?;
        let value_node = self.field_or_operand(item, "value", 1)?;
        let key = match key_node.kind() {
            "identifier" => {
                let value = self.text(key_node).to_string();
                self.alloc(NodeKind::StringLiteral { value }, key_node)
            }
            _ => self.expression(key_node)?,
        };
        let value = self.expression(value_node)?;
        Ok(self.alloc(NodeKind::MapEntry { key, value }, item))
    }

    /// Method calls with or without parentheses. A trailing closure is the
    /// last argument and named arguments are gathered into one leading map.
    fn call(&mut self, node: TsNode) -> Conv<NodeKind> {
        let function = self.field_or_operand(node, "function", 0)?;
        let (scope, name) = self.call_target(function)?;

        let mut arguments = Vec::new();
        for child in operands(node) {
            if child.id() == function.id() {
                continue;
            }
            match child.kind() {
                "argument_list" => arguments.extend(self.arguments(child)?),
                _ => arguments.push(self.expression(child)?),
            }
        }
        Ok(NodeKind::MethodCall {
            scope,
            name,
            type_arguments: Vec::new(),
            arguments,
        })
    }

    fn call_target(&mut self, function: TsNode) -> Conv<(Option<NodeId>, String)> {
        match function.kind() {
            "identifier" | "this" | "super" => Ok((None, self.text(function).to_string())),
            "dotted_identifier" | "field_access" | "member_access" | "property_access" => {
                let parts = operands(function);
                let Some((last, receiver)) = parts.split_last() else {
                    return self.fail(function, "empty member access");
                };
                let scope = self.receiver(function, receiver)?;
                Ok((Some(scope), self.text(*last).to_string()))
            }
            // `closure(1)`, `list[0](x)`
            _ => Ok((Some(self.expression(function)?), "call".to_string())),
        }
    }

    /// The receiver made of the leading parts of a member access. A grammar
    /// that flattens `a.b.c` into sibling identifiers is folded left.
    fn receiver(&mut self, access: TsNode, parts: &[TsNode]) -> Conv<NodeId> {
        let Some((first, rest)) = parts.split_first() else {
            return self.fail(access, "member access without a receiver");
        };
        let mut scope = self.expression(*first)?;
        for part in rest {
            let name = self.text(*part).to_string();
            scope = self.alloc(NodeKind::FieldAccess { scope, name }, *part);
        }
        Ok(scope)
    }

    fn member_access(&mut self, node: TsNode) -> Conv<NodeKind> {
        let parts = operands(node);
        let Some((last, receiver)) = parts.split_last() else {
            return self.fail(node, "empty member access");
        };
        let name = self.text(*last).to_string();
        // `this.&log`, `String::valueOf`
        if has_token(node, ".&") || has_token(node, "::") {
            return Ok(NodeKind::MethodReference {
                scope: self.receiver(node, receiver)?,
                identifier: name,
            });
        }
        if name == "class" {
            let receiver_text: String = receiver.iter().map(|p| self.text(*p)).collect::<Vec<_>>().join(".");
            return Ok(NodeKind::ClassExpr {
                class_type: self.type_from_text(&receiver_text, node)?,
            });
        }
        if name == "this" {
            let qualifier = receiver.iter().map(|p| self.text(*p)).collect::<Vec<_>>().join(".");
            return Ok(NodeKind::This {
                qualifier: Some(qualifier),
            });
        }
        let scope = self.receiver(node, receiver)?;
        Ok(NodeKind::FieldAccess { scope, name })
    }

    /// `new Foo(args)`, `new Foo<T>()`, `new int[3]`.
    fn object_creation(&mut self, node: TsNode) -> Conv<NodeKind> {
        let Some(target) = operands(node).into_iter().next() else {
            return self.fail(node, "`new` without a type");
        };
        match target.kind() {
            "function_call" | "method_call" | "method_invocation" => {
                let function = self.field_or_operand(target, "function", 0)?;
                let class_type = self.type_node(function)?;
                let mut arguments = Vec::new();
                for child in operands(target) {
                    if child.id() == function.id() {
                        continue;
                    }
                    match child.kind() {
                        "argument_list" => arguments.extend(self.arguments(child)?),
                        _ => arguments.push(self.expression(child)?),
                    }
                }
                Ok(NodeKind::ObjectCreation {
                    scope: None,
                    class_type,
                    type_arguments: Vec::new(),
                    arguments,
                    body: None,
                })
            }
            "index" | "index_expression" | "array_access" => self.array_creation(node, target),
            _ => {
                // `new Foo()` where the grammar keeps the pieces flat.
                let class_type = self.type_node(target)?;
                let arguments = match child_of_kind(node, "argument_list") {
                    Some(list) => self.arguments(list)?,
                    None => Vec::new(),
                };
                Ok(NodeKind::ObjectCreation {
                    scope: None,
                    class_type,
                    type_arguments: Vec::new(),
                    arguments,
                    body: None,
                })
            }
        }
    }

    /// `new int[3][]`: sized dimensions come from the index chain, and
    /// trailing `[]` pairs in the text are extra dimensions.
    fn array_creation(&mut self, node: TsNode, target: TsNode) -> Conv<NodeKind> {
        let mut dimensions = Vec::new();
        let mut base = target;
        while matches!(base.kind(), "index" | "index_expression" | "array_access") {
            let parts = operands(base);
            let (Some(inner), Some(size)) = (parts.first().copied(), parts.get(1).copied()) else {
                return self.fail(base, "incomplete array dimension");
            };
            dimensions.push(self.expression(size)?);
            base = inner;
        }
        dimensions.reverse();
        let element_type = self.type_node(base)?;
        let tail = &self.text(node)[target.end_byte() - node.start_byte()..];
        let extra_dimensions = tail.matches("[]").count();
        // `new int[] { 1, 2 }`
        let initializer = match child_of_kind(node, "closure") {
            Some(values_node) => {
                let mut values = Vec::new();
                for value in named_children(values_node) {
                    values.push(self.expression(value)?);
                }
                Some(self.alloc(NodeKind::ArrayInitializer { values }, values_node))
            }
            None => None,
        };
        Ok(NodeKind::ArrayCreation {
            element_type,
            dimensions,
            extra_dimensions,
            initializer,
        })
    }

    pub(crate) fn arguments(&mut self, list: TsNode) -> Conv<Vec<NodeId>> {
        let mut arguments = Vec::new();
        let mut named = Vec::new();
        for argument in operands(list) {
            match argument.kind() {
                "map_item" | "map_entry" => named.push(self.map_entry(argument)?),
                _ => arguments.push(self.expression(argument)?),
            }
        }
        if !named.is_empty() {
            let map = self.alloc(NodeKind::MapExpression { entries: named }, list);
            arguments.insert(0, map);
        }
        Ok(arguments)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{BinaryOp, NodeKind, UnaryOp};
    use crate::parser::GroovyParser;
    use groovyscope_core::ParseConfig;

    fn parse(source: &str) -> crate::parser::ParseResult {
        let result = GroovyParser::new()
            .unwrap()
            .parse(source, &ParseConfig::strict())
            .unwrap();
        assert!(result.problems.is_empty(), "{:?}", result.problems);
        result
    }

    #[test]
    fn test_binary_precedence() {
        let result = parse("def x = 1 + 2 * 3");
        let unit = result.unit.unwrap();
        let sum = result
            .ast
            .find_first(unit, |k| matches!(k, NodeKind::Binary { .. }))
            .unwrap();
        let NodeKind::Binary {
            operator, right, ..
        } = result.ast.kind(sum)
        else {
            unreachable!()
        };
        assert_eq!(*operator, BinaryOp::Plus);
        assert!(matches!(
            result.ast.kind(*right),
            NodeKind::Binary {
                operator: BinaryOp::Multiply,
                ..
            }
        ));
    }

    #[test]
    fn test_postfix_and_prefix_updates() {
        let result = parse("def i = 0; def j = 0; i++; --j");
        let unit = result.unit.unwrap();
        let operators: Vec<UnaryOp> = result
            .ast
            .find_all(unit, |k| matches!(k, NodeKind::Unary { .. }))
            .into_iter()
            .map(|id| match result.ast.kind(id) {
                NodeKind::Unary { operator, .. } => *operator,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(operators, vec![UnaryOp::PostIncrement, UnaryOp::PreDecrement]);
    }

    #[test]
    fn test_closure_parameters_default_to_def() {
        let result = parse("def twice = { a, b -> a * b }");
        let unit = result.unit.unwrap();
        let closure = result
            .ast
            .find_first(unit, |k| matches!(k, NodeKind::Closure { .. }))
            .unwrap();
        let NodeKind::Closure { parameters, body } = result.ast.kind(closure) else {
            unreachable!()
        };
        assert_eq!(parameters.len(), 2);
        let NodeKind::Parameter { param_type, .. } = result.ast.kind(parameters[0]) else {
            panic!("closure parameter");
        };
        assert!(matches!(result.ast.kind(*param_type), NodeKind::DynamicType { .. }));
        assert!(matches!(result.ast.kind(*body), NodeKind::Block { statements } if statements.len() == 1));
    }

    #[test]
    fn test_list_and_map_literals() {
        let result = parse("def l = [1, 2, 3]\ndef m = [name: 'x', size: 2]");
        let unit = result.unit.unwrap();
        assert!(
            result
                .ast
                .find_first(unit, |k| matches!(k, NodeKind::ListExpression { values } if values.len() == 3))
                .is_some()
        );
        let map = result
            .ast
            .find_first(unit, |k| matches!(k, NodeKind::MapExpression { .. }))
            .unwrap();
        let NodeKind::MapExpression { entries } = result.ast.kind(map) else {
            unreachable!()
        };
        assert_eq!(entries.len(), 2);
        let NodeKind::MapEntry { key, .. } = result.ast.kind(entries[0]) else {
            panic!("map entry");
        };
        assert_eq!(
            result.ast.kind(*key),
            &NodeKind::StringLiteral {
                value: "name".into()
            }
        );
    }

    #[test]
    fn test_command_call_without_parentheses() {
        let result = parse("println 'hi'");
        let unit = result.unit.unwrap();
        let call = result
            .ast
            .find_first(unit, |k| matches!(k, NodeKind::MethodCall { .. }))
            .unwrap();
        assert!(matches!(
            result.ast.kind(call),
            NodeKind::MethodCall { scope: None, name, arguments, .. } if name == "println" && arguments.len() == 1
        ));
    }

    #[test]
    fn test_scoped_call() {
        let result = parse("def list = []\nlist.add('a')");
        let unit = result.unit.unwrap();
        let call = result
            .ast
            .find_first(unit, |k| matches!(k, NodeKind::MethodCall { .. }))
            .unwrap();
        assert!(matches!(
            result.ast.kind(call),
            NodeKind::MethodCall { scope: Some(_), name, arguments, .. } if name == "add" && arguments.len() == 1
        ));
    }

    #[test]
    fn test_as_becomes_cast() {
        let result = parse("def n = '5' as Integer");
        let unit = result.unit.unwrap();
        assert!(
            result
                .ast
                .find_first(unit, |k| matches!(k, NodeKind::Cast { .. }))
                .is_some()
        );
    }
}
