//! Live preview session.
//!
//! [`SandboxSession`] owns the live file set of one open preview and is the
//! only writer to it. The execution environment itself is an external
//! capability behind [`PreviewSurface`]; the session decides when to mount it
//! from scratch and when to forward single-file changes instead.
//!
//! Remounting discards undo history, so it happens only when the session key
//! (theme, colour mode, resolved registry ids) changes. Text changes from
//! upstream are applied as file overwrites on the running session.

use crate::assembler::AssembledProject;
use crate::config::EditorConfig;
use crate::model::DependencyMap;
use crate::vfs::{changed_paths, FileSnapshot, VirtualFileSet};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

/// Inputs whose change requires tearing the preview down and mounting it again.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub theme: String,
    pub dark: bool,
    /// Sorted registry identifiers.
    pub registry_ids: Vec<String>,
}

/// Everything handed to the execution environment on mount.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MountSpec {
    pub files: VirtualFileSet,
    pub dependencies: DependencyMap,
    pub external_resources: Vec<String>,
    pub active_file: String,
    pub visible_files: Vec<String>,
    /// Start rendering without waiting for user interaction.
    pub autorun: bool,
    pub generation: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest<'a> {
    dependencies: &'a DependencyMap,
    external_resources: &'a [String],
    active_file: &'a str,
    visible_files: &'a [String],
    hidden_files: Vec<&'a str>,
}

impl MountSpec {
    /// Writes every file below `dir` plus a `sandbox.json` manifest.
    pub fn export(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)?;
        for (path, file) in self.files.iter() {
            let relative = path.trim_start_matches('/');
            if relative.split('/').any(|part| part == ".." || part.is_empty()) {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("refusing to export path {}", path),
                ));
            }
            let target = dir.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(target, &file.code)?;
        }

        let manifest = Manifest {
            dependencies: &self.dependencies,
            external_resources: &self.external_resources,
            active_file: &self.active_file,
            visible_files: &self.visible_files,
            hidden_files: self
                .files
                .iter()
                .filter(|(_, f)| f.hidden)
                .map(|(p, _)| p)
                .collect(),
        };
        let json = serde_json::to_string_pretty(&manifest).map_err(io::Error::other)?;
        fs::write(dir.join("sandbox.json"), json)
    }
}

/// The external execution environment.
pub trait PreviewSurface {
    /// Replaces whatever is running with a fresh instance.
    fn mount(&mut self, spec: &MountSpec);
    /// Forwards a single file change to the running instance.
    fn file_changed(&mut self, path: &str, text: &str);
    fn unmount(&mut self);
}

/// Surface that renders nothing and records every call. Used by tests and the CLI.
#[derive(Debug, Default, Clone)]
pub struct HeadlessPreview {
    pub mounts: Vec<MountSpec>,
    pub writes: Vec<(String, String)>,
    pub unmounts: usize,
}

impl HeadlessPreview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_mount(&self) -> Option<&MountSpec> {
        self.mounts.last()
    }
}

impl PreviewSurface for HeadlessPreview {
    fn mount(&mut self, spec: &MountSpec) {
        self.mounts.push(spec.clone());
    }

    fn file_changed(&mut self, path: &str, text: &str) {
        self.writes.push((path.to_string(), text.to_string()));
    }

    fn unmount(&mut self) {
        self.unmounts += 1;
    }
}

/// What [`SandboxSession::sync`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The surface was mounted from scratch.
    Mounted,
    /// Paths overwritten on the running surface.
    Updated(Vec<String>),
    Unchanged,
}

/// Deepest undo history kept per file.
const MAX_UNDO_DEPTH: usize = 200;

/// One running preview and its live files.
pub struct SandboxSession<P: PreviewSurface> {
    surface: P,
    key: Option<SessionKey>,
    /// Files as last produced by the assembler, before any edits.
    assembled: VirtualFileSet,
    live: VirtualFileSet,
    dependencies: DependencyMap,
    external_resources: Vec<String>,
    default_active_file: String,
    active_file: String,
    generation: u64,
    autorun: bool,
    undo: HashMap<String, Vec<String>>,
}

impl<P: PreviewSurface> SandboxSession<P> {
    pub fn new(surface: P, config: &EditorConfig) -> Self {
        Self {
            surface,
            key: None,
            assembled: VirtualFileSet::new(),
            live: VirtualFileSet::new(),
            dependencies: DependencyMap::new(),
            external_resources: config.external_resources.clone(),
            default_active_file: config.default_active_file.clone(),
            active_file: config.default_active_file.clone(),
            generation: 0,
            autorun: false,
            undo: HashMap::new(),
        }
    }

    /// Requests that the surface start rendering immediately on mount.
    pub fn with_autorun(mut self, autorun: bool) -> Self {
        self.autorun = autorun;
        self
    }

    pub fn surface(&self) -> &P {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut P {
        &mut self.surface
    }

    pub fn key(&self) -> Option<&SessionKey> {
        self.key.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.key.is_some()
    }

    /// Incremented on every mount.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn files(&self) -> &VirtualFileSet {
        &self.live
    }

    pub fn dependencies(&self) -> &DependencyMap {
        &self.dependencies
    }

    pub fn text(&self, path: &str) -> Option<&str> {
        self.live.text(path)
    }

    /// Every file as currently held, including edits.
    pub fn snapshot(&self) -> FileSnapshot {
        self.live.snapshot()
    }

    /// User-facing files only.
    pub fn visible_snapshot(&self) -> FileSnapshot {
        self.live.visible_snapshot()
    }

    pub fn active_file(&self) -> &str {
        &self.active_file
    }

    pub fn active_text(&self) -> Option<&str> {
        self.live.text(&self.active_file)
    }

    /// Switches the editor to `path`. Unknown paths are refused.
    pub fn set_active_file(&mut self, path: &str) -> bool {
        if !self.live.contains(path) {
            return false;
        }
        self.active_file = path.to_string();
        true
    }

    /// Spec of the currently running mount.
    pub fn mount_spec(&self) -> MountSpec {
        MountSpec {
            files: self.live.clone(),
            dependencies: self.dependencies.clone(),
            external_resources: self.external_resources.clone(),
            active_file: self.active_file.clone(),
            visible_files: self.live.visible_paths().to_vec(),
            autorun: self.autorun,
            generation: self.generation,
        }
    }

    /// Brings the session in line with a freshly assembled project.
    ///
    /// When `key` differs from the running key the surface is remounted. Files
    /// the user edited keep their live text across the remount, while undo
    /// history is dropped. Otherwise only files whose assembled text changed
    /// are overwritten in place.
    pub fn sync(&mut self, key: SessionKey, project: AssembledProject) -> SyncOutcome {
        if self.key.as_ref() != Some(&key) {
            self.remount(key, project, true);
            return SyncOutcome::Mounted;
        }

        let previous = self.assembled.snapshot();
        let next = project.files.snapshot();
        let changed = changed_paths(&previous, &next);

        let structural = changed
            .iter()
            .any(|p| !previous.contains_key(p) || !next.contains_key(p));
        if structural {
            // The path set only changes with the registry set, which is part of the key.
            log::warn!("File set changed without a key change, remounting");
            self.remount(key, project, true);
            return SyncOutcome::Mounted;
        }

        self.dependencies = project.dependencies;
        let mut updated = Vec::new();
        for path in changed {
            if let Some(text) = next.get(&path) {
                self.overwrite_file(&path, text);
                updated.push(path);
            }
        }
        self.assembled = project.files;

        if updated.is_empty() {
            SyncOutcome::Unchanged
        } else {
            SyncOutcome::Updated(updated)
        }
    }

    /// Mounts `project` discarding every live edit. Used when a different component is opened.
    pub fn replace(&mut self, key: SessionKey, project: AssembledProject) {
        self.remount(key, project, false);
    }

    fn remount(&mut self, key: SessionKey, project: AssembledProject, keep_edits: bool) {
        let mut live = project.files.clone();
        if keep_edits {
            for (path, file) in self.live.iter() {
                let edited = self.assembled.text(path) != Some(file.code.as_str());
                if edited && live.contains(path) {
                    live.set_text(path, &file.code);
                }
            }
        }

        if self.key.is_some() {
            self.surface.unmount();
        }
        self.assembled = project.files;
        self.live = live;
        self.dependencies = project.dependencies;
        self.key = Some(key);
        self.generation += 1;
        self.undo.clear();
        if !self.live.contains(&self.active_file) {
            self.active_file = self.default_active_file.clone();
        }

        log::info!(
            "Mounting preview generation {} ({} files)",
            self.generation,
            self.live.len()
        );
        let spec = self.mount_spec();
        self.surface.mount(&spec);
    }

    /// Text typed by the user into `path`.
    pub fn edit_file(&mut self, path: &str, text: &str) -> bool {
        self.overwrite_file(path, text)
    }

    /// Replaces the text of `path` on the live session.
    ///
    /// This is the only way file text changes after mount. The previous text is
    /// pushed to the file's undo history. Returns false for unknown paths.
    pub fn overwrite_file(&mut self, path: &str, text: &str) -> bool {
        let Some(current) = self.live.text(path) else {
            return false;
        };
        if current == text {
            return true;
        }
        let history = self.undo.entry(path.to_string()).or_default();
        history.push(current.to_string());
        if history.len() > MAX_UNDO_DEPTH {
            history.remove(0);
        }
        self.live.set_text(path, text);
        self.surface.file_changed(path, text);
        true
    }

    pub fn can_undo(&self, path: &str) -> bool {
        self.undo.get(path).is_some_and(|h| !h.is_empty())
    }

    /// Restores the previous text of `path`.
    pub fn undo(&mut self, path: &str) -> bool {
        let Some(previous) = self.undo.get_mut(path).and_then(|h| h.pop()) else {
            return false;
        };
        self.live.set_text(path, &previous);
        self.surface.file_changed(path, &previous);
        true
    }

    /// Tears the surface down. The session can be mounted again with `sync`.
    pub fn unmount(&mut self) {
        if self.key.take().is_some() {
            self.surface.unmount();
        }
        self.undo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{assemble, ProjectInput};
    use crate::resolver::{RegistryClosure, ResolvedComponent};
    use crate::theme::ThemeEngine;
    use crate::vfs::{STYLESHEET_PATH, USAGE_PATH};

    fn key(theme: &str, dark: bool, ids: &[&str]) -> SessionKey {
        SessionKey {
            theme: theme.to_string(),
            dark,
            registry_ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn project(usage: &str, css: Option<&str>, registry: &RegistryClosure, dark: bool) -> AssembledProject {
        let engine = ThemeEngine::builtin();
        assemble(
            &engine,
            &ProjectInput {
                slug: "button",
                component_source: "export function Button() {}",
                usage_source: usage,
                stylesheet: css,
                dependencies: None,
                registry,
                dark,
            },
        )
    }

    fn session() -> SandboxSession<HeadlessPreview> {
        SandboxSession::new(HeadlessPreview::new(), &EditorConfig::default())
    }

    #[test]
    fn test_first_sync_mounts() {
        let registry = RegistryClosure::new();
        let mut s = session();
        let outcome = s.sync(key("default", false, &[]), project("u", None, &registry, false));
        assert_eq!(outcome, SyncOutcome::Mounted);
        assert_eq!(s.generation(), 1);
        assert_eq!(s.surface().mounts.len(), 1);
        assert_eq!(s.active_file(), USAGE_PATH);
        assert_eq!(s.active_text(), Some("u"));
    }

    #[test]
    fn test_same_inputs_do_not_remount() {
        let registry = RegistryClosure::new();
        let mut s = session();
        s.sync(key("default", false, &[]), project("u", None, &registry, false));
        let outcome = s.sync(key("default", false, &[]), project("u", None, &registry, false));
        assert_eq!(outcome, SyncOutcome::Unchanged);
        assert_eq!(s.surface().mounts.len(), 1);
    }

    #[test]
    fn test_source_change_overwrites_in_place() {
        let registry = RegistryClosure::new();
        let mut s = session();
        s.sync(key("default", false, &[]), project("u1", None, &registry, false));
        s.edit_file(USAGE_PATH, "typed");
        let outcome = s.sync(key("default", false, &[]), project("u2", None, &registry, false));
        assert_eq!(outcome, SyncOutcome::Updated(vec![USAGE_PATH.to_string()]));
        assert_eq!(s.text(USAGE_PATH), Some("u2"));
        assert_eq!(s.surface().mounts.len(), 1);
        // the overwrite is undoable like any other change
        assert!(s.undo(USAGE_PATH));
        assert_eq!(s.text(USAGE_PATH), Some("typed"));
    }

    #[test]
    fn test_key_change_remounts_and_keeps_edits() {
        let registry = RegistryClosure::new();
        let mut s = session();
        s.sync(key("default", false, &[]), project("u", None, &registry, false));
        s.edit_file(USAGE_PATH, "edited");
        assert!(s.can_undo(USAGE_PATH));

        let outcome = s.sync(key("default", true, &[]), project("u", None, &registry, true));
        assert_eq!(outcome, SyncOutcome::Mounted);
        assert_eq!(s.generation(), 2);
        assert_eq!(s.surface().unmounts, 1);
        assert_eq!(s.text(USAGE_PATH), Some("edited"));
        assert!(!s.can_undo(USAGE_PATH));
        assert!(s.text(crate::vfs::ENTRY_PATH).unwrap().contains("isDark = true"));
    }

    #[test]
    fn test_active_file_falls_back_when_removed() {
        let mut registry = RegistryClosure::new();
        registry.insert(ResolvedComponent {
            id: "icon".to_string(),
            source: "// icon".to_string(),
            dependencies: DependencyMap::new(),
            registry_dependencies: Vec::new(),
        });
        let mut s = session();
        s.sync(key("default", false, &["icon"]), project("u", None, &registry, false));
        assert!(s.set_active_file("/components/ui/icon.tsx"));

        let empty = RegistryClosure::new();
        s.sync(key("default", false, &[]), project("u", None, &empty, false));
        assert_eq!(s.active_file(), USAGE_PATH);
        assert!(!s.set_active_file("/components/ui/icon.tsx"));
    }

    #[test]
    fn test_overwrite_unknown_path_is_refused() {
        let registry = RegistryClosure::new();
        let mut s = session();
        s.sync(key("default", false, &[]), project("u", None, &registry, false));
        assert!(!s.overwrite_file("/nope.tsx", "x"));
        assert!(s.overwrite_file(STYLESHEET_PATH, "body{}"));
        assert_eq!(s.surface().writes.last().unwrap().0, STYLESHEET_PATH);
    }

    #[test]
    fn test_export_writes_manifest() {
        let registry = RegistryClosure::new();
        let mut s = session();
        s.sync(key("default", false, &[]), project("u", None, &registry, false));
        let dir = std::env::temp_dir().join(format!("uiforge_export_{}", std::process::id()));
        s.mount_spec().export(&dir).unwrap();
        assert_eq!(fs::read_to_string(dir.join("Preview.tsx")).unwrap(), "u");
        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join("sandbox.json")).unwrap()).unwrap();
        assert_eq!(manifest["activeFile"], USAGE_PATH);
        assert!(manifest["hiddenFiles"]
            .as_array()
            .unwrap()
            .iter()
            .any(|p| p == "/App.tsx"));
        let _ = fs::remove_dir_all(dir);
    }
}
