//! Deserialization of XOML documents into activity trees.

use crate::error::MarkupError;
use crate::markup::activity::ActivityNode;
use crate::markup::reader::{self, MarkupElement};
use crate::resolve::TypeResolver;
use std::path::Path;

/// File extension that marks an input as workflow markup.
pub const XOML_EXTENSION: &str = "xoml";

pub const NAME_ATTRIBUTE: &str = "Name";
pub const ENABLED_ATTRIBUTE: &str = "Enabled";
pub const CODE_ATTRIBUTE: &str = "Code";
pub const CLASS_ATTRIBUTE: &str = "x:Class";

/// True if the path carries the markup extension.
pub fn is_markup_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(XOML_EXTENSION))
}

/// Reads and parses a markup file into its raw element tree. No type
/// resolution happens here; that is [`MarkupDocumentLoader::build_tree`].
pub fn parse_file(path: &Path) -> Result<MarkupElement, MarkupError> {
    let source = std::fs::read_to_string(path)
        .map_err(|error| MarkupError::Io(format!("{}: {}", path.display(), error)))?;
    reader::parse_document(&source)
}

/// The root element's `x:Class` attribute, when present. Used to pre-seed
/// the resolver before any tree is built.
pub fn declared_class(root: &MarkupElement) -> Option<&str> {
    root.attribute(CLASS_ATTRIBUTE)
}

/// Turns raw markup elements into [`ActivityNode`] trees, resolving each
/// element name through the type-resolution collaborator.
pub struct MarkupDocumentLoader<'a> {
    resolver: &'a dyn TypeResolver,
}

impl<'a> MarkupDocumentLoader<'a> {
    pub fn new(resolver: &'a dyn TypeResolver) -> Self {
        Self { resolver }
    }

    /// Builds the activity tree for a parsed document.
    ///
    /// Absence of the class marker on the root is not an error here; the
    /// code generator rejects class-less trees with its own diagnostic.
    pub fn build_tree(&self, root: &MarkupElement) -> Result<ActivityNode, MarkupError> {
        self.build_node(root, true)
    }

    fn build_node(
        &self,
        element: &MarkupElement,
        is_root: bool,
    ) -> Result<ActivityNode, MarkupError> {
        let type_name = self.resolve_type(element)?;

        if !is_root && element.has_attribute(CLASS_ATTRIBUTE) {
            return Err(MarkupError::InvalidAttribute {
                element: element.name.clone(),
                attribute: CLASS_ATTRIBUTE.to_string(),
                line: element.line.saturating_sub(1),
                column: element.column.saturating_sub(1),
                message: "a class declaration is only allowed on the document root".to_string(),
            });
        }

        if element.text_content().is_some() {
            return Err(MarkupError::UnexpectedContent {
                element: element.name.clone(),
                line: element.line.saturating_sub(1),
                column: element.column.saturating_sub(1),
            });
        }

        let enabled = match element.attribute(ENABLED_ATTRIBUTE) {
            None => true,
            Some(raw) => match raw.trim() {
                "true" => true,
                "false" => false,
                _ => {
                    return Err(MarkupError::InvalidAttribute {
                        element: element.name.clone(),
                        attribute: ENABLED_ATTRIBUTE.to_string(),
                        line: element.line.saturating_sub(1),
                        column: element.column.saturating_sub(1),
                        message: format!("expected 'true' or 'false', found '{}'", raw),
                    });
                }
            },
        };

        let mut children = Vec::new();
        for child in element.element_children() {
            children.push(self.build_node(child, false)?);
        }

        Ok(ActivityNode {
            type_name,
            name: element
                .attribute(NAME_ATTRIBUTE)
                .unwrap_or_default()
                .to_string(),
            enabled,
            code: element.attribute(CODE_ATTRIBUTE).map(str::to_string),
            declared_class: if is_root {
                element.attribute(CLASS_ATTRIBUTE).map(str::to_string)
            } else {
                None
            },
            children,
            line: element.line,
            column: element.column,
        })
    }

    fn resolve_type(&self, element: &MarkupElement) -> Result<String, MarkupError> {
        // Namespace prefixes are routing information for the reader only;
        // resolution works on the local name.
        let local_name = element
            .name
            .rsplit_once(':')
            .map_or(element.name.as_str(), |(_, local)| local);
        self.resolver
            .resolve(local_name)
            .map(|descriptor| descriptor.qualified_name)
            .ok_or_else(|| MarkupError::UnresolvedType {
                element: element.name.clone(),
                line: element.line.saturating_sub(1),
                column: element.column.saturating_sub(1),
            })
    }
}
