//! Identifier well-formedness and uniqueness over an activity tree.

use crate::backend::LanguageService;
use crate::markup::{ActivityNode, NAME_ATTRIBUTE};
use crate::results::{codes, CompilerError};
use crate::validation::walker::{walk_activities, TreeVisit};
use ahash::{AHashMap, AHashSet};

/// Walks an activity tree reporting identifier problems.
///
/// The validator never mutates the tree and never aborts the walk: every
/// finding is appended and traversal continues, so one pass reports every
/// problem in the tree.
pub struct IdentifierValidator<'a> {
    language: &'a dyn LanguageService,
}

impl<'a> IdentifierValidator<'a> {
    pub fn new(language: &'a dyn LanguageService) -> Self {
        Self { language }
    }

    /// Depth-first pre-order; disabled nodes are skipped along with their
    /// whole subtree. An anonymous root is permitted; any node with a
    /// non-empty name gets the uniqueness and syntax checks.
    pub fn validate(&self, file: &str, root: &ActivityNode) -> Vec<CompilerError> {
        let mut findings = Vec::new();
        let mut occurrences: AHashMap<String, u32> = AHashMap::new();

        walk_activities(root, &mut |node| {
            if !node.enabled {
                return TreeVisit::SkipChildren;
            }
            if node.name.is_empty() {
                return TreeVisit::Continue;
            }

            let count = occurrences.entry(node.name.clone()).or_insert(0);
            *count += 1;
            match *count {
                1 => {
                    if !self.language.is_valid_identifier(&node.name) {
                        findings.push(
                            CompilerError::at(
                                file,
                                node.line as i32,
                                node.column as i32,
                                codes::INVALID_IDENTIFIER,
                                format!(
                                    "'{}' is not a valid identifier in the target language",
                                    node.name
                                ),
                            )
                            .with_property(NAME_ATTRIBUTE),
                        );
                    }
                }
                // Report once per duplicate name, on the second
                // occurrence only; later occurrences stay silent.
                2 => {
                    findings.push(
                        CompilerError::at(
                            file,
                            node.line as i32,
                            node.column as i32,
                            codes::DUPLICATE_IDENTIFIER,
                            format!("the activity name '{}' is already in use", node.name),
                        )
                        .with_property(NAME_ATTRIBUTE),
                    );
                }
                _ => {}
            }
            TreeVisit::Continue
        });

        findings
    }
}

/// The stricter `check_types` pass: every enabled activity's type must be
/// a member of the authorized set.
pub fn check_authorized_types(
    file: &str,
    root: &ActivityNode,
    authorized: &AHashSet<String>,
) -> Vec<CompilerError> {
    let mut findings = Vec::new();
    walk_activities(root, &mut |node| {
        if !node.enabled {
            return TreeVisit::SkipChildren;
        }
        if !authorized.contains(&node.type_name) {
            findings.push(CompilerError::at(
                file,
                node.line as i32,
                node.column as i32,
                codes::TYPE_NOT_AUTHORIZED,
                format!("activity type '{}' is not authorized", node.type_name),
            ));
        }
        TreeVisit::Continue
    });
    findings
}
