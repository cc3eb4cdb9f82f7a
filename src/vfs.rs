//! In-memory virtual project files.
//!
//! A [`VirtualFileSet`] is what the sandbox executes: a map from logical path to
//! file text plus a visibility flag. The order in which user-facing files are
//! listed is kept separately so that tabs appear in a stable, meaningful order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ENTRY_PATH: &str = "/App.tsx";
pub const USAGE_PATH: &str = "/Preview.tsx";
pub const STYLESHEET_PATH: &str = "/styles/globals.css";
pub const UTILS_PATH: &str = "/lib/utils.ts";
pub const TSCONFIG_PATH: &str = "/tsconfig.json";

/// Path of a catalog component's source file inside the project.
pub fn component_path(slug: &str) -> String {
    format!("/components/ui/{}.tsx", slug)
}

/// Path → text, used for diffing and for the last-saved baseline.
pub type FileSnapshot = BTreeMap<String, String>;

/// One file of the virtual project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualFile {
    pub code: String,
    #[serde(default)]
    pub hidden: bool,
}

impl VirtualFile {
    pub fn visible(code: impl Into<String>) -> Self {
        Self { code: code.into(), hidden: false }
    }

    pub fn hidden(code: impl Into<String>) -> Self {
        Self { code: code.into(), hidden: true }
    }
}

/// A set of uniquely-pathed files with a stable visible-file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualFileSet {
    files: BTreeMap<String, VirtualFile>,
    visible_order: Vec<String>,
}

impl VirtualFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a file. Returns false (and leaves the set untouched) if the path is taken.
    pub fn insert(&mut self, path: impl Into<String>, file: VirtualFile) -> bool {
        let path = path.into();
        if self.files.contains_key(&path) {
            return false;
        }
        if !file.hidden {
            self.visible_order.push(path.clone());
        }
        self.files.insert(path, file);
        true
    }

    pub fn get(&self, path: &str) -> Option<&VirtualFile> {
        self.files.get(path)
    }

    pub fn text(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(|f| f.code.as_str())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Replaces the text of an existing file. Returns false if the path is unknown.
    pub fn set_text(&mut self, path: &str, text: &str) -> bool {
        match self.files.get_mut(path) {
            Some(file) => {
                file.code.clear();
                file.code.push_str(text);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// All paths in lexical order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(|p| p.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VirtualFile)> {
        self.files.iter().map(|(p, f)| (p.as_str(), f))
    }

    /// User-facing paths in tab order.
    pub fn visible_paths(&self) -> &[String] {
        &self.visible_order
    }

    /// Snapshot of every file's text.
    pub fn snapshot(&self) -> FileSnapshot {
        self.files
            .iter()
            .map(|(p, f)| (p.clone(), f.code.clone()))
            .collect()
    }

    /// Snapshot restricted to user-facing files.
    pub fn visible_snapshot(&self) -> FileSnapshot {
        self.files
            .iter()
            .filter(|(_, f)| !f.hidden)
            .map(|(p, f)| (p.clone(), f.code.clone()))
            .collect()
    }
}

/// True if the two snapshots differ at any path, including paths present in only one.
pub fn snapshots_differ(a: &FileSnapshot, b: &FileSnapshot) -> bool {
    a != b
}

/// Paths whose text differs between two snapshots (union of keys).
pub fn changed_paths(a: &FileSnapshot, b: &FileSnapshot) -> Vec<String> {
    let mut out: Vec<String> = a
        .iter()
        .filter(|(path, text)| b.get(*path) != Some(*text))
        .map(|(path, _)| path.clone())
        .collect();
    out.extend(b.keys().filter(|p| !a.contains_key(*p)).cloned());
    out.sort();
    out
}
