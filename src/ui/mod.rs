//! UI panel rendering subsystem
//!
//! - Toolbar (component actions, theme selector, save indicator)
//! - Catalog panel (catalog, own components, trash)
//! - Code panel (file tabs and the text editor)
//! - Preview panel (what the embedded preview runs)
//! - Status bar
//! - Publish dialog
//! - Panel manager (layout and interaction routing)

pub mod toolbar;
pub mod catalog_panel;
pub mod code_panel;
pub mod preview_panel;
pub mod status_bar;
pub mod publish_dialog;
pub mod swatch;
pub mod panel_manager;
