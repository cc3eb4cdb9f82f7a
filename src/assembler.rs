//! Builds the virtual project executed by the sandbox.
//!
//! Assembly is a pure function of its inputs: the same input always yields
//! byte-identical files, which lets the sandbox session skip remounts when
//! nothing meaningful changed.

use crate::model::{ComponentRecord, DependencyMap};
use crate::resolver::RegistryClosure;
use crate::templates::{entry_shell, TSCONFIG_SOURCE, UTILS_SOURCE};
use crate::theme::ThemeEngine;
use crate::vfs::{
    component_path, VirtualFile, VirtualFileSet, ENTRY_PATH, STYLESHEET_PATH, TSCONFIG_PATH,
    USAGE_PATH, UTILS_PATH,
};

/// Edit-time helper libraries and type stubs every project gets.
pub const BASELINE_DEPENDENCIES: &[(&str, &str)] = &[
    ("lucide-react", "latest"),
    ("clsx", "latest"),
    ("tailwind-merge", "latest"),
    ("@types/react", "^18.2.0"),
    ("@types/react-dom", "^18.2.0"),
    ("@types/node", "^20.0.0"),
];

pub fn baseline_dependencies() -> DependencyMap {
    BASELINE_DEPENDENCIES
        .iter()
        .map(|(name, version)| (name.to_string(), version.to_string()))
        .collect()
}

/// Merges dependency maps; each later layer overrides earlier ones per package.
pub fn merge_dependencies<'a>(layers: impl IntoIterator<Item = &'a DependencyMap>) -> DependencyMap {
    let mut merged = DependencyMap::new();
    for layer in layers {
        for (name, version) in layer {
            merged.insert(name.clone(), version.clone());
        }
    }
    merged
}

/// Everything the assembler needs for one project.
#[derive(Debug, Clone, Copy)]
pub struct ProjectInput<'a> {
    /// Catalog identifier deciding the component's file path.
    pub slug: &'a str,
    pub component_source: &'a str,
    pub usage_source: &'a str,
    /// Blank or absent stylesheets are replaced by the default theme.
    pub stylesheet: Option<&'a str>,
    pub dependencies: Option<&'a DependencyMap>,
    pub registry: &'a RegistryClosure,
    pub dark: bool,
}

impl<'a> ProjectInput<'a> {
    /// Input taken straight from a stored record.
    pub fn from_record(record: &'a ComponentRecord, registry: &'a RegistryClosure, dark: bool) -> Self {
        Self {
            slug: record.slug(),
            component_source: &record.source,
            usage_source: &record.usage_source,
            stylesheet: record.stylesheet.as_deref(),
            dependencies: record.dependencies.as_ref(),
            registry,
            dark,
        }
    }

    pub fn component_path(&self) -> String {
        component_path(self.slug)
    }
}

/// Output of assembly: the file set plus the merged dependency map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledProject {
    pub files: VirtualFileSet,
    pub dependencies: DependencyMap,
    /// Path of the component under edit.
    pub component_path: String,
}

/// Assembles the project for `input`, using `engine` for the fallback stylesheet.
///
/// # Arguments
/// * `engine` - Theme engine providing the default stylesheet
/// * `input` - Sources, dependencies and registry closure of the component
///
/// # Returns
/// The assembled project. Registry components whose path collides with an
/// existing file are skipped with a warning.
pub fn assemble(engine: &ThemeEngine, input: &ProjectInput<'_>) -> AssembledProject {
    let component_path = input.component_path();
    let stylesheet = match input.stylesheet {
        Some(css) if !css.trim().is_empty() => css.to_string(),
        _ => engine.default_stylesheet(),
    };

    let mut files = VirtualFileSet::new();
    // Visible files first so the tab order reads usage, component, stylesheet.
    files.insert(USAGE_PATH, VirtualFile::visible(input.usage_source));
    files.insert(component_path.clone(), VirtualFile::visible(input.component_source));
    files.insert(STYLESHEET_PATH, VirtualFile::visible(stylesheet));

    for entry in input.registry.iter() {
        let path = crate::vfs::component_path(&entry.id);
        if !files.insert(path.clone(), VirtualFile::visible(entry.source.as_str())) {
            log::warn!(
                "Registry dependency '{}' collides with existing file {}, skipping it",
                entry.id,
                path
            );
        }
    }

    files.insert(ENTRY_PATH, VirtualFile::hidden(entry_shell(input.dark)));
    files.insert(UTILS_PATH, VirtualFile::hidden(UTILS_SOURCE));
    files.insert(TSCONFIG_PATH, VirtualFile::hidden(TSCONFIG_SOURCE));

    let own = input.dependencies.cloned().unwrap_or_default();
    let dependencies = merge_dependencies([
        &baseline_dependencies(),
        &input.registry.merged_dependencies(),
        &own,
    ]);

    AssembledProject {
        files,
        dependencies,
        component_path,
    }
}
