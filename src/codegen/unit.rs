//! The source-level output model: a namespace/type/member declaration
//! tree, plus a deterministic renderer so the unit can be handed to the
//! downstream compiler as a source file.

use itertools::Itertools;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileUnit {
    /// Namespaces in the order their source files were supplied.
    pub namespaces: Vec<NamespaceDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    /// May be empty for the global namespace.
    pub name: String,
    pub imports: Vec<String>,
    pub types: Vec<TypeDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,
    /// The root activity's qualified type name.
    pub base_type: String,
    /// Members in document order from the originating tree.
    pub members: Vec<MemberDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberDecl {
    Field { name: String, type_name: String },
    Method { name: String, statements: Vec<String> },
}

impl CompileUnit {
    /// Appends a per-file fragment, folding same-named namespaces together
    /// while keeping first-appearance order.
    pub fn merge(&mut self, fragment: CompileUnit) {
        for namespace in fragment.namespaces {
            match self
                .namespaces
                .iter_mut()
                .find(|existing| existing.name == namespace.name)
            {
                Some(existing) => {
                    existing.types.extend(namespace.types);
                    existing.imports.extend(namespace.imports);
                }
                None => self.namespaces.push(namespace),
            }
        }
    }

    /// Qualified names of every generated type.
    pub fn type_names(&self) -> Vec<String> {
        self.namespaces
            .iter()
            .flat_map(|namespace| {
                namespace.types.iter().map(move |ty| {
                    if namespace.name.is_empty() {
                        ty.name.clone()
                    } else {
                        format!("{}.{}", namespace.name, ty.name)
                    }
                })
            })
            .collect()
    }

    /// Renders the unit as deterministic source text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for namespace in &self.namespaces {
            for import in namespace.imports.iter().unique() {
                out.push_str(&format!("import {};\n", import));
            }
            let indent = if namespace.name.is_empty() {
                ""
            } else {
                out.push_str(&format!("namespace {} {{\n", namespace.name));
                "    "
            };
            for ty in &namespace.types {
                out.push_str(&format!(
                    "{}partial class {} : {} {{\n",
                    indent, ty.name, ty.base_type
                ));
                for member in &ty.members {
                    match member {
                        MemberDecl::Field { name, type_name } => {
                            out.push_str(&format!("{}    field {} {};\n", indent, type_name, name));
                        }
                        MemberDecl::Method { name, statements } => {
                            out.push_str(&format!("{}    method {}() {{\n", indent, name));
                            for statement in statements {
                                out.push_str(&format!("{}        {};\n", indent, statement));
                            }
                            out.push_str(&format!("{}    }}\n", indent));
                        }
                    }
                }
                out.push_str(&format!("{}}}\n", indent));
            }
            if !namespace.name.is_empty() {
                out.push_str("}\n");
            }
        }
        out
    }
}
