use super::converter::{
    Conv, Converter, child_of_kind, has_token, named_children, named_children_with_comments,
    operands,
};
use crate::ast::{NodeId, NodeKind};
use tree_sitter::Node as TsNode;

impl<'a> Converter<'a> {
    pub(crate) fn statement(&mut self, node: TsNode) -> Conv<NodeId> {
        self.guarded(node, Self::statement_inner)
    }

    fn statement_inner(&mut self, node: TsNode) -> Conv<NodeId> {
        let kind = match node.kind() {
            "block" => return self.block(node),
            ";" => NodeKind::EmptyStmt,
            "expression_statement" => NodeKind::ExpressionStmt {
                expression: self.expression(self.first_named(node)?)?,
            },
            "declaration" | "local_variable_declaration" => NodeKind::ExpressionStmt {
                expression: self.local_variables(node)?,
            },
            "if_statement" => {
                let parts = operands(node);
                let Some(condition) = parts.first() else {
                    return self.fail(node, "if without a condition");
                };
                let Some(then_stmt) = parts.get(1) else {
                    return self.fail(node, "if without a body");
                };
                NodeKind::If {
                    condition: self.condition(*condition)?,
                    then_stmt: self.body(*then_stmt)?,
                    else_stmt: match parts.get(2) {
                        Some(alternative) => Some(self.body(*alternative)?),
                        None => None,
                    },
                }
            }
            "while_loop" | "while_statement" => {
                let parts = operands(node);
                let (Some(condition), Some(body)) = (parts.first(), parts.get(1)) else {
                    return self.fail(node, "incomplete while loop");
                };
                NodeKind::While {
                    condition: self.condition(*condition)?,
                    body: self.body(*body)?,
                }
            }
            "do_while_loop" | "do_statement" => {
                let parts = operands(node);
                let (Some(body), Some(condition)) = (parts.first(), parts.get(1)) else {
                    return self.fail(node, "incomplete do loop");
                };
                NodeKind::Do {
                    body: self.body(*body)?,
                    condition: self.condition(*condition)?,
                }
            }
            "for_loop" | "for_statement" => self.for_loop(node)?,
            "for_in_loop" | "enhanced_for_statement" => self.for_each(node)?,
            "return" | "return_statement" => NodeKind::Return {
                expression: match operands(node).into_iter().next() {
                    Some(value) => Some(self.expression(value)?),
                    None => None,
                },
            },
            "throw" | "throw_statement" => NodeKind::Throw {
                expression: self.expression(self.first_named(node)?)?,
            },
            "break" | "break_statement" => NodeKind::Break {
                label: self.label(node),
            },
            "continue" | "continue_statement" => NodeKind::Continue {
                label: self.label(node),
            },
            "try_statement" => self.try_statement(node)?,
            "switch_statement" => return self.switch(node),
            "assertion" | "assert_statement" => {
                let mut parts = operands(node).into_iter();
                let Some(check) = parts.next() else {
                    return self.fail(node, "assert without a condition");
                };
                NodeKind::Assert {
                    check: self.expression(check)?,
                    message: match parts.next() {
                        Some(message) => Some(self.expression(message)?),
                        None => None,
                    },
                }
            }
            "labeled_statement" | "label" => {
                let parts = operands(node);
                let (Some(label), Some(statement)) = (parts.first(), parts.get(1)) else {
                    return self.fail(node, "incomplete labeled statement");
                };
                NodeKind::Labeled {
                    label: self.text(*label).to_string(),
                    statement: self.statement(*statement)?,
                }
            }
            "synchronized_statement" => {
                let parts = operands(node);
                let (Some(lock), Some(body)) = (parts.first(), parts.get(1)) else {
                    return self.fail(node, "incomplete synchronized block");
                };
                NodeKind::Synchronized {
                    expression: self.condition(*lock)?,
                    body: self.block(*body)?,
                }
            }
            kind if Self::is_type_declaration(kind) => return self.type_declaration(node),
            kind if Self::is_method_declaration(kind) => return self.member(node),
            // Groovy statements are bare expressions.
            _ => NodeKind::ExpressionStmt {
                expression: self.expression(node)?,
            },
        };
        Ok(self.alloc(kind, node))
    }

    /// A `{ ... }` body: every named child is a statement.
    pub(crate) fn block(&mut self, node: TsNode) -> Conv<NodeId> {
        let children = named_children_with_comments(node)
            .into_iter()
            .filter(|child| !matches!(child.kind(), "parameter" | "parameter_list"))
            .collect();
        self.block_of(node, children)
    }

    /// A block made of `children`, ranged over `origin`.
    pub(crate) fn block_of(&mut self, origin: TsNode, children: Vec<TsNode>) -> Conv<NodeId> {
        let (statements, orphans) =
            self.sequence(children, |this, child| this.statement(child).map(Some))?;
        let id = self.alloc(NodeKind::Block { statements }, origin);
        self.attach_orphans(id, orphans);
        Ok(id)
    }

    /// The body of a control statement. Braces parse as a closure or a
    /// block depending on context; both mean a block here.
    fn body(&mut self, node: TsNode) -> Conv<NodeId> {
        match node.kind() {
            "closure" | "block" => self.block(node),
            _ => self.statement(node),
        }
    }

    pub(crate) fn local_variables(&mut self, node: TsNode) -> Conv<NodeId> {
        let modifiers = self.modifiers(node)?;
        let variables = self.declarators(node)?;
        let id = self.alloc(
            NodeKind::VariableDeclarationExpr {
                modifiers: modifiers.keywords,
                variables,
            },
            node,
        );
        for annotation in modifiers.annotations {
            self.ast.add_annotation(id, annotation);
        }
        Ok(id)
    }

    /// The expression inside `( ... )`, without an `Enclosed` wrapper.
    fn condition(&mut self, node: TsNode) -> Conv<NodeId> {
        if node.kind() == "parenthesized_expression" {
            self.expression(self.first_named(node)?)
        } else {
            self.expression(node)
        }
    }

    fn label(&self, node: TsNode) -> Option<String> {
        child_of_kind(node, "identifier").map(|id| self.text(id).to_string())
    }

    /// Children of `node` between its `(` and `)`, split at `separator`
    /// tokens, followed by the named children after `)`.
    fn header_sections<'t>(node: TsNode<'t>, separator: &str) -> (Vec<Vec<TsNode<'t>>>, Vec<TsNode<'t>>) {
        let mut sections = vec![Vec::new()];
        let mut after = Vec::new();
        let mut state = 0u8;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match (state, child.kind()) {
                (0, "(") => state = 1,
                (1, ")") => state = 2,
                (1, kind) if kind == separator && !child.is_named() => sections.push(Vec::new()),
                (1, _) if child.is_named() && !child.is_extra() => {
                    if let Some(section) = sections.last_mut() {
                        section.push(child);
                    }
                }
                (2, _) if child.is_named() && !child.is_extra() => after.push(child),
                _ => {}
            }
        }
        (sections, after)
    }

    /// `for (init; condition; update) body`
    fn for_loop(&mut self, node: TsNode) -> Conv<NodeKind> {
        let (sections, after) = Self::header_sections(node, ";");
        let Some(body) = after.first() else {
            return self.fail(node, "for loop without a body");
        };
        let mut sections = sections.into_iter();
        let mut init = Vec::new();
        for child in sections.next().unwrap_or_default() {
            init.push(match child.kind() {
                "declaration" | "local_variable_declaration" => self.local_variables(child)?,
                _ => self.expression(child)?,
            });
        }
        let condition = match sections.next().unwrap_or_default().first() {
            Some(condition) => Some(self.expression(*condition)?),
            None => None,
        };
        let mut update = Vec::new();
        for child in sections.next().unwrap_or_default() {
            update.push(self.expression(child)?);
        }
        let body = self.body(*body)?;
        Ok(NodeKind::For {
            init,
            condition,
            update,
            body,
        })
    }

    /// `for (x in items)`, `for (String s : items)`.
    fn for_each(&mut self, node: TsNode) -> Conv<NodeKind> {
        let separator = if has_token(node, "in") { "in" } else { ":" };
        let (sections, after) = Self::header_sections(node, separator);
        let (Some(variable_part), Some(iterable_part), Some(body)) =
            (sections.first(), sections.get(1), after.first())
        else {
            return self.fail(node, "incomplete for-in loop");
        };
        let Some((name_node, type_part)) = variable_part.split_last() else {
            return self.fail(node, "for-in loop without a variable");
        };
        let var_type = match type_part.first() {
            Some(first) => {
                let text = &self.source[first.start_byte()..name_node.start_byte()];
                self.type_from_text(text, *first)?
            }
            None => self.alloc_synthetic(NodeKind::DynamicType {
                keyword: "def".to_string(),
            }),
        };
        let declarator = self.alloc(
            NodeKind::VariableDeclarator {
                name: self.text(*name_node).to_string(),
                var_type,
                initializer: None,
            },
            *name_node,
        );
        let variable = self.alloc_synthetic(NodeKind::VariableDeclarationExpr {
            modifiers: Vec::new(),
            variables: vec![declarator],
        });
        let Some(iterable) = iterable_part.first() else {
            return self.fail(node, "for-in loop without an iterable");
        };
        let iterable = self.expression(*iterable)?;
        let body = self.body(*body)?;
        Ok(NodeKind::ForEach {
            variable,
            iterable,
            body,
        })
    }

    fn try_statement(&mut self, node: TsNode) -> Conv<NodeKind> {
        let mut body = None;
        let mut catch_clauses = Vec::new();
        let mut finally_block = None;
        for child in named_children(node) {
            match child.kind() {
                "catch_clause" => catch_clauses.push(self.catch_clause(child)?),
                "finally_clause" => {
                    let block = self.first_named(child)?;
                    finally_block = Some(self.block(block)?);
                }
                "closure" | "block" if body.is_none() => body = Some(self.block(child)?),
                _ => {}
            }
        }
        let Some(body) = body else {
            return self.fail(node, "try without a body");
        };
        Ok(NodeKind::Try {
            resources: Vec::new(),
            body,
            catch_clauses,
            finally_block,
        })
    }

    /// `catch (IOException | RuntimeException e)`; an untyped parameter
    /// catches `Exception`.
    fn catch_clause(&mut self, node: TsNode) -> Conv<NodeId> {
        let (sections, after) = Self::header_sections(node, ",");
        let header: Vec<TsNode> = sections.into_iter().flatten().collect();
        let Some((name_node, _)) = header.split_last() else {
            return self.fail(node, "catch without a parameter");
        };
        let start = header[0].start_byte();
        let type_text = &self.source[start..name_node.start_byte()];
        let param_type = if type_text.trim().is_empty() {
            self.type_from_text("Exception", *name_node)?
        } else {
            self.type_from_text(type_text, header[0])?
        };
        let parameter = self.alloc(
            NodeKind::Parameter {
                name: self.text(*name_node).to_string(),
                modifiers: Vec::new(),
                param_type,
                is_varargs: false,
            },
            *name_node,
        );
        let Some(body) = after.first() else {
            return self.fail(node, "catch without a body");
        };
        let body = self.block(*body)?;
        Ok(self.alloc(NodeKind::CatchClause { parameter, body }, node))
    }

    /// `switch (x) { case 1: ...; default: ... }`
    pub(crate) fn switch(&mut self, node: TsNode) -> Conv<NodeId> {
        let parts = named_children_with_comments(node);
        let Some((selector, rest)) = parts.split_first() else {
            return self.fail(node, "switch without a selector");
        };
        let selector = self.condition(*selector)?;
        let mut groups = Vec::new();
        for child in rest.iter().copied() {
            match child.kind() {
                "switch_block" | "switch_body" => groups.extend(named_children_with_comments(child)),
                _ => groups.push(child),
            }
        }
        let (entries, orphans) =
            self.sequence(groups, |this, group| this.switch_entry(group).map(Some))?;
        let id = self.alloc(NodeKind::Switch { selector, entries }, node);
        self.attach_orphans(id, orphans);
        Ok(id)
    }

    /// Labels come before the `:` token, statements after it.
    fn switch_entry(&mut self, node: TsNode) -> Conv<NodeId> {
        let is_default = has_token(node, "default");
        let mut labels = Vec::new();
        let mut statements = Vec::new();
        let mut in_body = false;
        let mut cursor = node.walk();
        let children: Vec<TsNode> = node.children(&mut cursor).collect();
        for child in children {
            if !child.is_named() {
                in_body |= child.kind() == ":" || child.kind() == "->";
                continue;
            }
            if child.is_extra() {
                continue;
            }
            if in_body {
                statements.push(self.statement(child)?);
            } else if !is_default {
                labels.push(self.expression(child)?);
            }
        }
        Ok(self.alloc(NodeKind::SwitchEntry { labels, statements }, node))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::NodeKind;
    use crate::parser::GroovyParser;
    use groovyscope_core::ParseConfig;

    fn members(source: &str) -> (crate::parser::ParseResult, Vec<crate::ast::NodeId>) {
        let result = GroovyParser::new()
            .unwrap()
            .parse(source, &ParseConfig::strict())
            .unwrap();
        let unit = result.unit.expect("strict parse succeeds");
        let NodeKind::CompilationUnit { members, .. } = result.ast.kind(unit) else {
            panic!("root is a compilation unit");
        };
        let members = members.clone();
        (result, members)
    }

    #[test]
    fn test_if_else_and_loops() {
        let source = "if (ready) { go() } else { stop() }\nfor (int i = 0; i < 3; i++) { tick(i) }\nfor (s in names) { println(s) }";
        let (result, members) = members(source);
        assert_eq!(members.len(), 3);
        assert!(matches!(
            result.ast.kind(members[0]),
            NodeKind::If {
                else_stmt: Some(_),
                ..
            }
        ));
        assert!(matches!(
            result.ast.kind(members[1]),
            NodeKind::For { init, condition: Some(_), update, .. } if init.len() == 1 && update.len() == 1
        ));
        assert!(matches!(result.ast.kind(members[2]), NodeKind::ForEach { .. }));
    }

    #[test]
    fn test_bare_expressions_are_statements() {
        let (result, members) = members("def x = 1\nx = x + 1\nprintln x");
        assert_eq!(members.len(), 3);
        for member in members {
            assert!(matches!(result.ast.kind(member), NodeKind::ExpressionStmt { .. }));
        }
    }

    #[test]
    fn test_try_catch_finally() {
        let source = "try { risky() } catch (IOException e) { log(e) } finally { close() }";
        let (result, members) = members(source);
        let clause = result
            .ast
            .find_first(members[0], |k| matches!(k, NodeKind::CatchClause { .. }))
            .unwrap();
        let NodeKind::CatchClause { parameter, .. } = result.ast.kind(clause) else {
            unreachable!()
        };
        let NodeKind::Parameter { name, param_type, .. } = result.ast.kind(*parameter) else {
            panic!("catch parameter");
        };
        assert_eq!(name, "e");
        assert!(matches!(
            result.ast.kind(*param_type),
            NodeKind::ClassType { name, .. } if name == "IOException"
        ));
        assert!(matches!(
            result.ast.kind(members[0]),
            NodeKind::Try {
                finally_block: Some(_),
                ..
            }
        ));
    }
}
