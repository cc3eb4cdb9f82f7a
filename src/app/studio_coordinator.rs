//! Application-level coordination and workflow management.
//!
//! Every workflow that touches more than one piece of state goes through
//! here: opening and switching components, forking and publishing, the trash,
//! and the hand-off between the editor's save requests and the background
//! saver.

use crate::app::AppState;
use crate::io::{AsyncSaver, SaveResult};
use crate::state::EguiPreview;
use std::path::Path;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use uiforge::catalog::{fork_component, publish_component};
use uiforge::{
    ComponentEditor, ComponentRecord, ComponentStore, EditorProps, NewComponent, SaveStatus, UserToken,
};

const NEW_COMPONENT_SOURCE: &str = "export function MyComponent() {\n  return <div className=\"rounded-md bg-primary p-4 text-primary-foreground\">Hello</div>\n}\n";
const NEW_COMPONENT_USAGE: &str = "import { MyComponent } from \"@/components/ui/my-component\"\n\nexport default function Preview() {\n  return <MyComponent />\n}\n";

/// Coordinates application-level operations and workflows.
pub struct StudioCoordinator;

impl StudioCoordinator {
    // ===== Listings =====

    /// Reloads the catalog, the user's components and the user's trash.
    pub fn refresh_listings(state: &mut AppState, store: &dyn ComponentStore, user: Option<&UserToken>) {
        match store.list_catalog() {
            Ok(entries) => state.catalog.set_entries(entries),
            Err(err) => state.set_error(format!("Error loading catalog: {}", err)),
        }

        let (owned, trash) = match user {
            Some(user) => (
                store.list_owned(user).unwrap_or_else(|err| {
                    log::warn!("Could not list own components: {}", err);
                    Vec::new()
                }),
                store.list_trash(user).unwrap_or_else(|err| {
                    log::warn!("Could not list trash: {}", err);
                    Vec::new()
                }),
            ),
            None => (Vec::new(), Vec::new()),
        };
        state.catalog.set_owned(owned);
        state.catalog.set_trash(trash);
    }

    // ===== Opening =====

    /// Opens a record in the editor, replacing the open one.
    ///
    /// Records the user does not own open read-only. Unsaved changes of the
    /// previously open component are written synchronously first, after any
    /// background save of it has finished.
    ///
    /// # Returns
    /// True if the record was found and opened
    pub fn open_component(state: &mut AppState, saver: &mut AsyncSaver, user: Option<&UserToken>, id: &str) -> bool {
        let store = Arc::clone(saver.store());
        let store = store.as_ref();
        let record = match store.get(id) {
            Ok(record) => record,
            Err(err) => {
                state.set_error(format!("Error opening component: {}", err));
                return false;
            }
        };

        Self::flush_open_editor(state, saver, user);

        let mut props = EditorProps::from_record(&record);
        props.read_only = !Self::is_owner(&record, user);
        let editor = ComponentEditor::open(
            state.engine.clone(),
            state.config.clone(),
            EguiPreview::new(),
            props,
            store,
            state.theme.is_dark(),
        );
        log::info!(
            "Opened '{}' ({}){}",
            record.name,
            record.id,
            if editor.is_read_only() { " read-only" } else { "" }
        );
        state.editor.open(editor);
        state.clear_messages();
        true
    }

    /// Creates a scratch component owned by the user and opens it.
    pub fn new_component(state: &mut AppState, saver: &mut AsyncSaver, user: Option<&UserToken>) {
        let store = Arc::clone(saver.store());
        let store = store.as_ref();
        let Some(user) = user else {
            state.set_error(uiforge::reconciler::UNAUTHENTICATED_MESSAGE);
            return;
        };
        let component = NewComponent {
            name: "My Component".to_string(),
            catalog_id: Some("my-component".to_string()),
            source: NEW_COMPONENT_SOURCE.to_string(),
            usage_source: NEW_COMPONENT_USAGE.to_string(),
            ..Default::default()
        };
        match store.create(user, component) {
            Ok(id) => {
                Self::open_component(state, saver, Some(user), &id);
                Self::refresh_listings(state, store, Some(user));
            }
            Err(err) => state.set_error(format!("Error creating component: {}", err)),
        }
    }

    /// Re-reads the open record from the store and feeds it to the editor.
    ///
    /// Local edits to files whose stored text did not change are kept.
    pub fn reload_open(state: &mut AppState, store: &dyn ComponentStore) {
        let Some(id) = state.editor.component_id().map(str::to_string) else {
            return;
        };
        let record = match store.get(&id) {
            Ok(record) => record,
            Err(err) => {
                state.set_error(format!("Error reloading component: {}", err));
                return;
            }
        };
        if let Some(editor) = state.editor.editor_mut() {
            let mut props = EditorProps::from_record(&record);
            props.read_only = editor.is_read_only();
            editor.update_props(props, store);
        }
    }

    // ===== Catalog Workflows =====

    /// Forks a catalog entry into the user's components and opens the copy.
    pub fn fork(state: &mut AppState, saver: &mut AsyncSaver, user: Option<&UserToken>, record_id: &str) {
        let store = Arc::clone(saver.store());
        let store = store.as_ref();
        match fork_component(store, user, record_id) {
            Ok(id) => {
                Self::open_component(state, saver, user, &id);
                Self::refresh_listings(state, store, user);
                state.set_info("Forked into your components");
            }
            Err(err) => state.set_error(format!("Error forking component: {}", err)),
        }
    }

    /// Publishes the open component with the metadata from the publish form.
    pub fn publish(state: &mut AppState, saver: &mut AsyncSaver, user: Option<&UserToken>) {
        Self::flush_open_editor(state, saver, user);
        let store = Arc::clone(saver.store());
        let store = store.as_ref();
        let Some(id) = state.editor.component_id().map(str::to_string) else {
            return;
        };
        let request = state.catalog.publish_request().clone();
        if request.name.trim().is_empty() {
            state.set_error("A published component needs a name");
            return;
        }
        match publish_component(store, user, &id, &request, now_ms()) {
            Ok(slug) => {
                state.catalog.close_publish();
                Self::refresh_listings(state, store, user);
                state.set_info(format!("Published as '{}'", slug));
            }
            Err(err) => state.set_error(format!("Error publishing component: {}", err)),
        }
    }

    /// Moves the open component to the trash and closes it.
    pub fn move_to_trash(state: &mut AppState, store: &dyn ComponentStore, user: Option<&UserToken>) {
        let Some(user) = user else {
            state.set_error(uiforge::reconciler::UNAUTHENTICATED_MESSAGE);
            return;
        };
        let Some(id) = state.editor.component_id().map(str::to_string) else {
            return;
        };
        match store.soft_delete(user, &id, now_ms()) {
            Ok(()) => {
                state.editor.close();
                Self::refresh_listings(state, store, Some(user));
                state.set_info("Moved to trash");
            }
            Err(err) => state.set_error(format!("Error deleting component: {}", err)),
        }
    }

    pub fn restore(state: &mut AppState, store: &dyn ComponentStore, user: Option<&UserToken>, id: &str) {
        let Some(user) = user else {
            state.set_error(uiforge::reconciler::UNAUTHENTICATED_MESSAGE);
            return;
        };
        match store.restore(user, id) {
            Ok(()) => {
                Self::refresh_listings(state, store, Some(user));
                state.set_info("Restored from trash");
            }
            Err(err) => state.set_error(format!("Error restoring component: {}", err)),
        }
    }

    // ===== Editing =====

    /// Writes `text` into the active file of the open editor.
    pub fn edit_active(state: &mut AppState, text: &str) -> bool {
        let Some(editor) = state.editor.editor_mut() else {
            return false;
        };
        let path = editor.session().active_file().to_string();
        editor.edit(&path, text)
    }

    pub fn undo_active(state: &mut AppState) -> bool {
        let Some(editor) = state.editor.editor_mut() else {
            return false;
        };
        let path = editor.session().active_file().to_string();
        editor.undo(&path)
    }

    pub fn reset(state: &mut AppState) {
        if let Some(editor) = state.editor.editor_mut() {
            editor.reset();
        }
    }

    pub fn select_theme(state: &mut AppState, name: &str) {
        state.theme.set_preferred_theme(name);
        if let Some(editor) = state.editor.editor_mut() {
            editor.select_theme(name);
        }
    }

    pub fn set_dark(state: &mut AppState, dark: bool) {
        state.theme.set_dark(dark);
        if let Some(editor) = state.editor.editor_mut() {
            editor.set_dark(dark);
        }
    }

    /// Writes the running project (edits included) to `dir`.
    pub fn export_project(state: &mut AppState, dir: &Path) {
        let Some(editor) = state.editor.editor() else {
            return;
        };
        match editor.session().mount_spec().export(dir) {
            Ok(()) => state.set_info(format!("Exported project to {}", dir.display())),
            Err(err) => state.set_error(format!("Error exporting project: {}", err)),
        }
    }

    // ===== Saving =====

    /// Manual save. Starts a background write unless one is already running.
    pub fn request_save(state: &mut AppState, saver: &mut AsyncSaver, user: Option<&UserToken>, ctx: &egui::Context) {
        let Some(editor) = state.editor.editor_mut() else {
            return;
        };
        if let Some(pending) = editor.save(user.cloned(), Instant::now()) {
            saver.start_save(pending, ctx);
        }
    }

    /// Drives the editor's timers. Called once per frame.
    pub fn tick(state: &mut AppState, saver: &mut AsyncSaver, user: Option<&UserToken>, ctx: &egui::Context) {
        let Some(editor) = state.editor.editor_mut() else {
            return;
        };
        if let Some(pending) = editor.tick(user.cloned(), Instant::now()) {
            log::debug!("Auto-saving {}", pending.component_id);
            saver.start_save(pending, ctx);
        }
    }

    /// Hands a finished background save back to the editor.
    ///
    /// Returns true if a save completed this frame.
    pub fn check_save_completion(state: &mut AppState, saver: &mut AsyncSaver) -> bool {
        Self::deliver_save_result(state, saver.check_completion())
    }

    /// Writes unsaved edits of the open editor synchronously.
    ///
    /// A background save still running is waited for and reported first, so
    /// edits made after it started are written too.
    pub fn flush_open_editor(state: &mut AppState, saver: &mut AsyncSaver, user: Option<&UserToken>) {
        Self::deliver_save_result(state, saver.wait_for_completion());
        let Some(editor) = state.editor.editor_mut() else {
            return;
        };
        if editor.is_read_only() || !editor.has_unsaved_changes() {
            return;
        }
        let store = Arc::clone(saver.store());
        if editor.save_now(store.as_ref(), user.cloned(), Instant::now()) != SaveStatus::Saved {
            log::warn!(
                "Unsaved changes of '{}' could not be written",
                editor.props().display_name
            );
        }
    }

    fn deliver_save_result(state: &mut AppState, outcome: SaveResult) -> bool {
        match outcome {
            SaveResult::Completed { ticket, result } => {
                match state.editor.editor_mut() {
                    Some(editor) => {
                        if !editor.complete_save(ticket, result, Instant::now()) {
                            log::debug!("Ignoring stale save result (ticket {})", ticket);
                        }
                    }
                    None => log::debug!("Save finished after its editor closed (ticket {})", ticket),
                }
                true
            }
            SaveResult::None => false,
        }
    }

    // ===== Helpers =====

    fn is_owner(record: &ComponentRecord, user: Option<&UserToken>) -> bool {
        match (record.owner.as_deref(), user) {
            (Some(owner), Some(user)) => owner == user.subject(),
            _ => false,
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
