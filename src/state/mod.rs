//! State management modules for the studio.
//!
//! State only, no UI concerns:
//! - Editor state (the open component editor)
//! - Catalog state (listing, trash, publish form)
//! - Theme state (preferred theme, dark mode)
//! - Layout state (panel sizes and visibility)
//! - Preview surface (what the embedded preview currently runs)

mod editor_state;
mod catalog_state;
mod theme_state;
mod layout_state;
mod preview_surface;

pub use editor_state::{EditorState, StudioEditor};
pub use catalog_state::CatalogState;
pub use theme_state::ThemeState;
pub use layout_state::LayoutState;
pub use preview_surface::EguiPreview;
