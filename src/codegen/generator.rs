//! Transformation of validated activity trees into compile-unit fragments.

use crate::codegen::unit::{CompileUnit, MemberDecl, NamespaceDecl, TypeDecl};
use crate::markup::ActivityNode;
use crate::results::{codes, CompilerError};
use crate::validation::{walk_activities, TreeVisit};
use itertools::Itertools;

/// Imports every generated namespace must carry exactly once.
pub const STANDARD_IMPORTS: &[&str] = &["Core", "Workflow", "Workflow.Activities"];

pub const INITIALIZER_METHOD: &str = "initialize_components";

/// Generates one [`CompileUnit`] fragment per input tree. Purely
/// transformational; the only I/O in the pipeline around it belongs to the
/// orchestrator.
pub struct CodeGenerator {
    no_inline_code: bool,
}

impl CodeGenerator {
    pub fn new(no_inline_code: bool) -> Self {
        Self { no_inline_code }
    }

    /// Produces the fragment for one file, or `None` when a structural
    /// precondition failed. Violations are appended to `errors`; the rest
    /// of the batch is unaffected either way.
    pub fn generate(
        &self,
        file: &str,
        tree: &ActivityNode,
        errors: &mut Vec<CompilerError>,
    ) -> Option<CompileUnit> {
        // Both preconditions are re-checked here, independently of the
        // identifier validator.
        let Some(declared) = tree.declared_class.as_deref() else {
            errors.push(CompilerError::at(
                file,
                tree.line as i32,
                tree.column as i32,
                codes::MISSING_CLASS,
                "cannot compile a workflow without a class declaration; \
                 add an x:Class attribute to the root activity",
            ));
            return None;
        };

        if self.no_inline_code {
            let mut found_code = false;
            walk_activities(tree, &mut |node| {
                if node.code.is_some() {
                    found_code = true;
                    errors.push(CompilerError::at(
                        file,
                        node.line as i32,
                        node.column as i32,
                        codes::INLINE_CODE_FORBIDDEN,
                        "inline code is not allowed by the active compilation policy",
                    ));
                }
                TreeVisit::Continue
            });
            if found_code {
                return None;
            }
        }

        let (namespace, class_name) = match declared.rsplit_once('.') {
            Some((namespace, class_name)) => (namespace.to_string(), class_name.to_string()),
            None => (String::new(), declared.to_string()),
        };

        let mut members = Vec::new();
        collect_field_members(tree, &mut members);
        members.push(MemberDecl::Method {
            name: INITIALIZER_METHOD.to_string(),
            statements: tree
                .children
                .iter()
                .filter(|child| child.enabled)
                .map(|child| {
                    if child.name.is_empty() {
                        format!("attach {}", child.type_name)
                    } else {
                        format!("attach {} ({})", child.name, child.type_name)
                    }
                })
                .collect(),
        });

        Some(CompileUnit {
            namespaces: vec![NamespaceDecl {
                name: namespace,
                imports: Vec::new(),
                types: vec![TypeDecl {
                    name: class_name,
                    base_type: tree.type_name.clone(),
                    members,
                }],
            }],
        })
    }

    /// The final pass over the merged unit: standard imports exactly once
    /// per namespace, and the caller's root-namespace prefix applied to
    /// every generated namespace.
    pub fn normalize(unit: &mut CompileUnit, root_namespace: &str) {
        for namespace in &mut unit.namespaces {
            if !root_namespace.is_empty() {
                namespace.name = if namespace.name.is_empty() {
                    root_namespace.to_string()
                } else {
                    format!("{}.{}", root_namespace, namespace.name)
                };
            }
            let mut imports: Vec<String> =
                STANDARD_IMPORTS.iter().map(|s| s.to_string()).collect();
            imports.extend(namespace.imports.drain(..));
            namespace.imports = imports.into_iter().unique().collect();
        }
    }
}

/// Field members for every enabled, named activity below the root, in
/// document order. Disabled subtrees contribute nothing.
fn collect_field_members(root: &ActivityNode, members: &mut Vec<MemberDecl>) {
    for child in &root.children {
        walk_activities(child, &mut |node| {
            if !node.enabled {
                return TreeVisit::SkipChildren;
            }
            if !node.name.is_empty() {
                members.push(MemberDecl::Field {
                    name: node.name.clone(),
                    type_name: node.type_name.clone(),
                });
            }
            TreeVisit::Continue
        });
    }
}
