//! uiforge studio
//!
//! Desktop front end for the live component preview core. The studio
//! browses a component catalog, opens components in an editor with a live
//! preview, switches themes and saves edits back to the component store.
//!
//! The application is built with a modular architecture:
//! - `app/` - Centralized state and the coordinators that operate on it
//! - `state/` - Focused state components and the embedded preview surface
//! - `io/` - Background saving
//! - `ui/` - Panel rendering and interaction routing

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod app;
mod io;
mod state;
mod ui;

use app::{AppState, SettingsCoordinator, StudioCoordinator, ThemeCoordinator};
use io::AsyncSaver;
use state::LayoutState;
use ui::panel_manager::{PanelInteraction, PanelManager};
use uiforge::{ComponentStore, EditorConfig, FileStore, IdentityProvider, MemoryStore, StaticIdentity};

const LAYOUT_KEY: &str = "layout";
const LAST_COMPONENT_KEY: &str = "last_component";

/// How often the UI wakes up to drive the save timers while idle.
const TIMER_REPAINT: Duration = Duration::from_millis(250);

/// Command-line options: `uiforge-studio [--store <dir>] [--config <file>] [--memory]`.
#[derive(Default)]
struct Args {
    store_dir: Option<PathBuf>,
    config: Option<PathBuf>,
    memory: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--store" => {
                let dir = iter.next().ok_or_else(|| anyhow::anyhow!("--store requires a directory"))?;
                args.store_dir = Some(PathBuf::from(dir));
            }
            "--config" => {
                let file = iter.next().ok_or_else(|| anyhow::anyhow!("--config requires a file"))?;
                args.config = Some(PathBuf::from(file));
            }
            "--memory" => args.memory = true,
            other => anyhow::bail!("unknown argument '{}'", other),
        }
    }
    Ok(args)
}

/// Opens the requested store. Falls back to an in-memory store when the
/// platform data directory is unavailable.
fn open_store(args: &Args) -> anyhow::Result<Arc<dyn ComponentStore>> {
    if args.memory {
        return Ok(Arc::new(MemoryStore::new()));
    }
    let store = match &args.store_dir {
        Some(dir) => FileStore::open(dir)?,
        None => match FileStore::open_default() {
            Ok(store) => store,
            Err(err) => {
                log::warn!("No persistent store available ({}), using memory", err);
                return Ok(Arc::new(MemoryStore::new()));
            }
        },
    };
    log::info!("Component store at {}", store.root().display());
    Ok(Arc::new(store))
}

/// Main application entry point that initializes and launches the studio.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let store = open_store(&args)?;
    app::demo_catalog::ensure_demo_catalog(store.as_ref())?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_title("uiforge studio"),
        ..Default::default()
    };

    eframe::run_native(
        "uiforge studio",
        options,
        Box::new(move |cc| Ok(Box::new(StudioApp::new(cc, config, store)))),
    )
    .map_err(|err| anyhow::anyhow!("studio exited with an error: {}", err))
}

/// The studio application. Most work is delegated to coordinators:
/// - `StudioCoordinator` handles component workflows and saving
/// - `ThemeCoordinator` handles theme persistence and visuals
/// - `PanelManager` handles panel layout and rendering
struct StudioApp {
    /// Centralized application state
    state: AppState,
    /// Background store writer
    saver: AsyncSaver,
    /// Who saves are attributed to
    identity: StaticIdentity,
}

impl StudioApp {
    /// Creates the studio with theme and layout restored from storage and
    /// reopens the component that was open last time.
    fn new(cc: &eframe::CreationContext, config: EditorConfig, store: Arc<dyn ComponentStore>) -> Self {
        let engine = uiforge::ThemeEngine::builtin();
        let theme = ThemeCoordinator::load_theme_from_storage(cc.storage, &engine);
        let layout: LayoutState = SettingsCoordinator::load_setting_or(cc.storage, LAYOUT_KEY, LayoutState::new());
        let last_component: Option<String> =
            SettingsCoordinator::try_load_setting(cc.storage, LAST_COMPONENT_KEY).flatten();

        let subject = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "local".to_string());
        let identity = StaticIdentity::signed_in(subject);
        let user = identity.current_user();

        let mut state = AppState::with_preferences(config, theme, layout);
        let mut saver = AsyncSaver::new(store);
        StudioCoordinator::refresh_listings(&mut state, saver.store().as_ref(), user.as_ref());
        if let Some(id) = last_component {
            StudioCoordinator::open_component(&mut state, &mut saver, user.as_ref(), &id);
        }

        Self { state, saver, identity }
    }

    /// Handles panel interactions by delegating to StudioCoordinator.
    fn handle_panel_interaction(&mut self, interaction: PanelInteraction, ctx: &egui::Context) {
        let user = self.identity.current_user();
        let user = user.as_ref();
        let store = Arc::clone(self.saver.store());
        let store = store.as_ref();
        let state = &mut self.state;
        let saver = &mut self.saver;

        match interaction {
            PanelInteraction::NewComponent => StudioCoordinator::new_component(state, saver, user),
            PanelInteraction::OpenRequested(id) => {
                StudioCoordinator::open_component(state, saver, user, &id);
            }
            PanelInteraction::ForkRequested(id) => StudioCoordinator::fork(state, saver, user, &id),
            PanelInteraction::RestoreRequested(id) => StudioCoordinator::restore(state, store, user, &id),
            PanelInteraction::RefreshRequested => StudioCoordinator::refresh_listings(state, store, user),
            PanelInteraction::FileSelected(path) => {
                if let Some(editor) = state.editor.editor_mut() {
                    editor.set_active_file(&path);
                }
            }
            PanelInteraction::TextEdited(text) => {
                StudioCoordinator::edit_active(state, &text);
            }
            PanelInteraction::SaveRequested => StudioCoordinator::request_save(state, saver, user, ctx),
            PanelInteraction::ResetRequested => StudioCoordinator::reset(state),
            PanelInteraction::UndoRequested => {
                StudioCoordinator::undo_active(state);
            }
            PanelInteraction::ReloadRequested => StudioCoordinator::reload_open(state, store),
            PanelInteraction::ExportRequested(dir) => StudioCoordinator::export_project(state, &dir),
            PanelInteraction::ThemeSelected(name) => StudioCoordinator::select_theme(state, &name),
            PanelInteraction::DarkModeToggled(dark) => StudioCoordinator::set_dark(state, dark),
            PanelInteraction::PublishRequested => {
                if let Some(editor) = state.editor.editor() {
                    let props = editor.props();
                    let (name, description) = (props.display_name.clone(), props.description.clone());
                    state.catalog.open_publish(&name, &description);
                }
            }
            PanelInteraction::PublishConfirmed => StudioCoordinator::publish(state, saver, user),
            PanelInteraction::PublishCancelled => state.catalog.close_publish(),
            PanelInteraction::TrashRequested => StudioCoordinator::move_to_trash(state, store, user),
        }
    }

    fn persist(&self, storage: &mut dyn eframe::Storage) {
        ThemeCoordinator::save_theme_to_storage(storage, &self.state.theme);
        SettingsCoordinator::save_setting(storage, LAYOUT_KEY, &self.state.layout);
        match self.state.editor.component_id() {
            Some(id) => SettingsCoordinator::save_setting(storage, LAST_COMPONENT_KEY, &Some(id)),
            None => SettingsCoordinator::clear_setting(storage, LAST_COMPONENT_KEY),
        }
    }
}

impl Drop for StudioApp {
    /// Writes unsaved edits synchronously before the window goes away.
    fn drop(&mut self) {
        let user = self.identity.current_user();
        StudioCoordinator::flush_open_editor(&mut self.state, &mut self.saver, user.as_ref());
        self.state.editor.close();
    }
}

impl eframe::App for StudioApp {
    /// Called by eframe on shutdown and periodically while running.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.persist(storage);
    }

    /// Main update loop:
    /// 1. Pick up finished background saves
    /// 2. Drive auto-save and the saved indicator
    /// 3. Apply theme
    /// 4. Render all panels via PanelManager and handle their interaction
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        StudioCoordinator::check_save_completion(&mut self.state, &mut self.saver);

        let user = self.identity.current_user();
        StudioCoordinator::tick(&mut self.state, &mut self.saver, user.as_ref(), ctx);

        ThemeCoordinator::apply_current_theme(ctx, &self.state);

        if let Some(interaction) = PanelManager::render_all_panels(ctx, &mut self.state, &self.saver) {
            self.handle_panel_interaction(interaction, ctx);
        }

        if self.state.editor.is_open() {
            ctx.request_repaint_after(TIMER_REPAINT);
        }
    }
}
