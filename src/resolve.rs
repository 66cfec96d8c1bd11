//! Type resolution against reference assemblies.
//!
//! Markup elements name activity types; the resolver turns a qualified (or
//! short) name into a [`TypeDescriptor`] by consulting, in priority order:
//! pre-seeded declared class names, the registered local assembly, sidecar
//! manifests of the explicit reference list, and the built-in core set.
//!
//! Each compile call builds its own index inside the isolated session, so
//! nothing here is shared between calls.

use ahash::{AHashMap, AHashSet};
use serde::Deserialize;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// File stem identifying the core runtime library in a reference list.
pub const CORE_LIBRARY_STEM: &str = "corelib";

/// Sidecar suffix describing the types a reference binary exports.
pub const MANIFEST_SUFFIX: &str = ".types.json";

/// Activity types that are always resolvable, core library or not.
const CORE_ACTIVITY_TYPES: &[&str] = &[
    "Workflow.Activities.Sequence",
    "Workflow.Activities.Parallel",
    "Workflow.Activities.IfElse",
    "Workflow.Activities.IfElseBranch",
    "Workflow.Activities.While",
    "Workflow.Activities.CodeBlock",
    "Workflow.Activities.Delay",
    "Workflow.Activities.Listen",
    "Workflow.Activities.EventDriven",
    "Workflow.Activities.Suspend",
    "Workflow.Activities.Terminate",
];

/// A resolved type: its qualified name and the binary it came from
/// (`None` for built-in core types and pre-seeded class names).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub qualified_name: String,
    pub assembly: Option<PathBuf>,
}

/// Resolves a qualified name to a type descriptor.
pub trait TypeResolver {
    fn resolve(&self, name: &str) -> Option<TypeDescriptor>;
}

#[derive(Deserialize)]
struct ReferenceManifest {
    types: Vec<String>,
}

/// The default resolver: a lazily-populated index over a reference list.
pub struct ReferenceIndex {
    references: Vec<PathBuf>,
    core_library: Option<PathBuf>,
    pending_classes: AHashSet<String>,
    local_assembly: Option<(PathBuf, Vec<String>)>,
    // Built on first resolve; the reference manifests are not touched
    // before that.
    index: RefCell<Option<AHashMap<String, TypeDescriptor>>>,
}

impl ReferenceIndex {
    /// `core_library` is the reference-list entry whose file stem matched
    /// [`CORE_LIBRARY_STEM`], when one was present. The built-in core set
    /// is indexed either way.
    pub fn new(references: Vec<PathBuf>, core_library: Option<PathBuf>) -> Self {
        Self {
            references,
            core_library,
            pending_classes: AHashSet::new(),
            local_assembly: None,
            index: RefCell::new(None),
        }
    }

    /// Pre-seeds a markup file's own declared class so self-references
    /// resolve before the local assembly exists.
    pub fn register_pending_class(&mut self, qualified_name: &str) {
        self.pending_classes.insert(qualified_name.to_string());
        self.index.replace(None);
    }

    /// Registers the intermediate assembly once it has been built. Names it
    /// defines stop being pending; they now resolve to the binary.
    pub fn register_local_assembly(&mut self, path: PathBuf, types: Vec<String>) {
        for name in &types {
            self.pending_classes.remove(name);
        }
        self.local_assembly = Some((path, types));
        self.index.replace(None);
    }

    fn build_index(&self) -> AHashMap<String, TypeDescriptor> {
        let mut index = AHashMap::new();
        for name in CORE_ACTIVITY_TYPES {
            index.insert(
                (*name).to_string(),
                TypeDescriptor {
                    qualified_name: (*name).to_string(),
                    assembly: self.core_library.clone(),
                },
            );
        }
        // The core entry is removed from the downstream reference list,
        // but its manifest still feeds resolution.
        for reference in self.references.iter().chain(self.core_library.iter()) {
            for name in load_manifest(reference) {
                index.insert(
                    name.clone(),
                    TypeDescriptor {
                        qualified_name: name,
                        assembly: Some(reference.clone()),
                    },
                );
            }
        }
        if let Some((path, types)) = &self.local_assembly {
            for name in types {
                index.insert(
                    name.clone(),
                    TypeDescriptor {
                        qualified_name: name.clone(),
                        assembly: Some(path.clone()),
                    },
                );
            }
        }
        for name in &self.pending_classes {
            index.insert(
                name.clone(),
                TypeDescriptor {
                    qualified_name: name.clone(),
                    assembly: None,
                },
            );
        }
        index
    }

    fn with_index<T>(&self, f: impl FnOnce(&AHashMap<String, TypeDescriptor>) -> T) -> T {
        let mut slot = self.index.borrow_mut();
        f(slot.get_or_insert_with(|| self.build_index()))
    }
}

impl TypeResolver for ReferenceIndex {
    fn resolve(&self, name: &str) -> Option<TypeDescriptor> {
        self.with_index(|index| {
            if let Some(found) = index.get(name) {
                return Some(found.clone());
            }
            // Short names match any indexed type's final segment.
            let suffix = format!(".{}", name);
            index
                .values()
                .find(|descriptor| descriptor.qualified_name.ends_with(&suffix))
                .cloned()
        })
    }
}

fn load_manifest(reference: &Path) -> Vec<String> {
    let manifest_path = PathBuf::from(format!("{}{}", reference.display(), MANIFEST_SUFFIX));
    let Ok(raw) = std::fs::read_to_string(&manifest_path) else {
        log::debug!("no type manifest next to {}", reference.display());
        return Vec::new();
    };
    match serde_json::from_str::<ReferenceManifest>(&raw) {
        Ok(manifest) => manifest.types,
        Err(error) => {
            log::warn!(
                "ignoring unreadable type manifest {}: {}",
                manifest_path.display(),
                error
            );
            Vec::new()
        }
    }
}

/// Partitions a reference list around the core runtime library.
///
/// Returns the references to hand to the downstream compiler (core entry
/// removed so it is not added twice) and the core path itself when found.
pub fn split_core_reference(references: &[PathBuf]) -> (Vec<PathBuf>, Option<PathBuf>) {
    let mut downstream = Vec::with_capacity(references.len());
    let mut core = None;
    for reference in references {
        let is_core = reference
            .file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| stem.eq_ignore_ascii_case(CORE_LIBRARY_STEM));
        if is_core && core.is_none() {
            core = Some(reference.clone());
        } else {
            downstream.push(reference.clone());
        }
    }
    (downstream, core)
}
