//! Preview surface rendered inside the studio window.
//!
//! The desktop studio has no JavaScript runtime, so the surface keeps its own
//! copy of the mounted project and the UI draws a summary of it: the palette
//! the stylesheet defines, the files, and which ones changed recently. The
//! same copy is what gets exported for an external bundler.

use std::collections::VecDeque;
use std::time::Instant;
use uiforge::vfs::STYLESHEET_PATH;
use uiforge::{MountSpec, PreviewSurface};

/// Number of recent file writes kept for display.
const RECENT_CHANGES: usize = 8;

/// [`PreviewSurface`] backed by plain state that egui panels read.
#[derive(Debug, Default)]
pub struct EguiPreview {
    mounted: Option<MountSpec>,
    mount_count: u64,
    recent_changes: VecDeque<String>,
    last_change_at: Option<Instant>,
}

impl EguiPreview {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Queries =====

    /// The project as the surface currently runs it, edits included.
    pub fn mounted(&self) -> Option<&MountSpec> {
        self.mounted.as_ref()
    }

    /// How many times the surface was mounted since creation.
    pub fn mount_count(&self) -> u64 {
        self.mount_count
    }

    /// Most recent first.
    pub fn recent_changes(&self) -> impl Iterator<Item = &str> {
        self.recent_changes.iter().map(|p| p.as_str())
    }

    pub fn last_change_at(&self) -> Option<Instant> {
        self.last_change_at
    }

    pub fn stylesheet(&self) -> Option<&str> {
        self.mounted.as_ref()?.files.text(STYLESHEET_PATH)
    }
}

impl PreviewSurface for EguiPreview {
    fn mount(&mut self, spec: &MountSpec) {
        log::debug!(
            "Preview mounted (generation {}, {} files)",
            spec.generation,
            spec.files.len()
        );
        self.mounted = Some(spec.clone());
        self.mount_count += 1;
        self.recent_changes.clear();
        self.last_change_at = None;
    }

    fn file_changed(&mut self, path: &str, text: &str) {
        let Some(spec) = self.mounted.as_mut() else {
            log::warn!("Write to {} before the preview was mounted", path);
            return;
        };
        if !spec.files.set_text(path, text) {
            log::warn!("Write to unknown preview file {}", path);
            return;
        }
        self.recent_changes.retain(|p| p != path);
        self.recent_changes.push_front(path.to_string());
        self.recent_changes.truncate(RECENT_CHANGES);
        self.last_change_at = Some(Instant::now());
    }

    fn unmount(&mut self) {
        self.mounted = None;
        self.recent_changes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uiforge::vfs::{VirtualFile, VirtualFileSet, USAGE_PATH};

    fn spec() -> MountSpec {
        let mut files = VirtualFileSet::new();
        files.insert(USAGE_PATH, VirtualFile::visible("export default () => null"));
        files.insert(STYLESHEET_PATH, VirtualFile::visible(":root { --primary: #e11d48; }"));
        MountSpec {
            visible_files: files.visible_paths().to_vec(),
            files,
            dependencies: Default::default(),
            external_resources: Vec::new(),
            active_file: USAGE_PATH.to_string(),
            autorun: false,
            generation: 1,
        }
    }

    #[test]
    fn test_mount_and_write() {
        let mut preview = EguiPreview::new();
        preview.mount(&spec());
        preview.file_changed(USAGE_PATH, "export default () => <p/>");

        assert_eq!(preview.mount_count(), 1);
        let mounted = preview.mounted().unwrap();
        assert_eq!(mounted.files.text(USAGE_PATH), Some("export default () => <p/>"));
        assert_eq!(preview.recent_changes().collect::<Vec<_>>(), vec![USAGE_PATH]);
        assert!(preview.last_change_at().is_some());
    }

    #[test]
    fn test_remount_clears_changes() {
        let mut preview = EguiPreview::new();
        preview.mount(&spec());
        preview.file_changed(STYLESHEET_PATH, ":root {}");
        preview.mount(&spec());

        assert_eq!(preview.mount_count(), 2);
        assert_eq!(preview.recent_changes().count(), 0);
        assert_eq!(preview.stylesheet(), Some(":root { --primary: #e11d48; }"));
    }

    #[test]
    fn test_unknown_path_is_ignored() {
        let mut preview = EguiPreview::new();
        preview.file_changed(USAGE_PATH, "x");
        preview.mount(&spec());
        preview.file_changed("/nope.tsx", "x");
        assert_eq!(preview.recent_changes().count(), 0);

        preview.unmount();
        assert!(preview.mounted().is_none());
    }
}
