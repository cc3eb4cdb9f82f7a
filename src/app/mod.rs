//! Application-level modules for the studio.
//!
//! The coordinators and the centralized state they operate on.

mod app_state;
mod studio_coordinator;
mod theme_coordinator;
mod settings_coordinator;
pub mod demo_catalog;

pub use app_state::AppState;
pub use studio_coordinator::StudioCoordinator;
pub use theme_coordinator::ThemeCoordinator;
pub use settings_coordinator::SettingsCoordinator;
