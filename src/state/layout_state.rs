//! UI layout state management.

use serde::{Deserialize, Serialize};

/// Sizes and visibility of the studio panels. Persisted as one JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutState {
    /// Width of the catalog side panel in points
    catalog_width: f32,
    /// Share of the central area given to the code editor (0.0 to 1.0)
    code_split_ratio: f32,
    /// Whether the catalog side panel is shown
    show_catalog: bool,
    /// Whether hidden support files are listed in the preview panel
    show_hidden_files: bool,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutState {
    pub fn new() -> Self {
        Self {
            catalog_width: 260.0,
            code_split_ratio: 0.55,
            show_catalog: true,
            show_hidden_files: false,
        }
    }

    // ===== Layout Queries =====

    pub fn catalog_width(&self) -> f32 {
        self.catalog_width
    }

    pub fn code_split_ratio(&self) -> f32 {
        self.code_split_ratio
    }

    pub fn show_catalog(&self) -> bool {
        self.show_catalog
    }

    pub fn show_hidden_files(&self) -> bool {
        self.show_hidden_files
    }

    // ===== Layout Mutations =====

    pub fn set_catalog_width(&mut self, width: f32) {
        self.catalog_width = width.clamp(160.0, 600.0);
    }

    /// Sets the code/preview split, clamped to keep both panes usable.
    pub fn set_code_split_ratio(&mut self, ratio: f32) {
        self.code_split_ratio = ratio.clamp(0.2, 0.8);
    }

    pub fn show_catalog_mut(&mut self) -> &mut bool {
        &mut self.show_catalog
    }

    pub fn show_hidden_files_mut(&mut self) -> &mut bool {
        &mut self.show_hidden_files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_ratio_is_clamped() {
        let mut layout = LayoutState::new();
        layout.set_code_split_ratio(0.95);
        assert_eq!(layout.code_split_ratio(), 0.8);
        layout.set_code_split_ratio(0.0);
        assert_eq!(layout.code_split_ratio(), 0.2);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let layout: LayoutState = serde_json::from_str(r#"{"show_catalog": false}"#).unwrap();
        assert!(!layout.show_catalog());
        assert_eq!(layout.catalog_width(), 260.0);
    }
}
