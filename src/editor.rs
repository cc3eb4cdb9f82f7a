//! The editable live preview.
//!
//! [`ComponentEditor`] wires the pieces together for one open component: the
//! theme binding decides the stylesheet, the assembler builds the project, the
//! sandbox session runs it and the reconciler tracks unsaved changes. All
//! methods are synchronous; saves are handed out as [`SaveRequest`]s and can
//! run anywhere (see [`execute_save`]) before being reported back.

use crate::assembler::{assemble, AssembledProject, ProjectInput};
use crate::binding::ThemeBinding;
use crate::config::EditorConfig;
use crate::model::{ComponentId, ComponentRecord, DependencyMap};
use crate::reconciler::{Reconciler, SaveError, SaveRequest, SaveStatus};
use crate::resolver::{RegistryClosure, RegistryResolver};
use crate::sandbox::{PreviewSurface, SandboxSession, SyncOutcome};
use crate::store::{ComponentStore, UserToken};
use crate::theme::{ThemeChoice, ThemeEngine};
use crate::validate::validate_code;
use crate::vfs::{FileSnapshot, USAGE_PATH};
use std::time::Instant;

/// Inputs of an editor, as provided by the surrounding page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorProps {
    /// Record the editor saves into. `None` for unsaved scratch components.
    pub component_id: Option<ComponentId>,
    /// Catalog identifier deciding the component's file path.
    pub slug: String,
    pub component_source: String,
    pub usage_source: String,
    pub stylesheet: Option<String>,
    pub dependencies: Option<DependencyMap>,
    pub registry_dependency_ids: Vec<String>,
    pub read_only: bool,
    pub display_name: String,
    pub description: String,
}

impl EditorProps {
    pub fn from_record(record: &ComponentRecord) -> Self {
        Self {
            component_id: Some(record.id.clone()),
            slug: record.slug().to_string(),
            component_source: record.source.clone(),
            usage_source: record.usage_source.clone(),
            stylesheet: record.stylesheet.clone(),
            dependencies: record.dependencies.clone(),
            registry_dependency_ids: record.registry_ids().to_vec(),
            read_only: false,
            display_name: record.name.clone(),
            description: record.description.clone(),
        }
    }
}

/// A save request addressed to a specific record.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSave {
    pub component_id: ComponentId,
    pub request: SaveRequest,
}

/// Runs a save against the store. Safe to call from a worker thread.
pub fn execute_save(store: &dyn ComponentStore, save: &PendingSave) -> Result<(), SaveError> {
    store
        .update(&save.request.user, &save.component_id, &save.request.patch)
        .map_err(SaveError::from)
}

pub struct ComponentEditor<P: PreviewSurface> {
    engine: ThemeEngine,
    config: EditorConfig,
    props: EditorProps,
    registry: RegistryClosure,
    binding: ThemeBinding,
    session: SandboxSession<P>,
    reconciler: Reconciler,
}

impl<P: PreviewSurface> ComponentEditor<P> {
    /// Opens an editor: resolves registry dependencies, mounts the preview and
    /// takes the mounted files as the saved baseline.
    pub fn open(
        engine: ThemeEngine,
        config: EditorConfig,
        surface: P,
        props: EditorProps,
        store: &dyn ComponentStore,
        dark: bool,
    ) -> Self {
        let registry = resolve_registry(store, &config, &props);
        let binding = ThemeBinding::from_persisted(&engine, props.stylesheet.as_deref(), dark)
            .with_read_only(props.read_only);
        let project = build(&engine, &binding, &props, &registry);

        let mut session = SandboxSession::new(surface, &config);
        session.sync(binding.session_key(registry.sorted_ids()), project.clone());

        let mut reconciler = Reconciler::new(
            &config,
            project.component_path.clone(),
            project.files.visible_snapshot(),
        )
        .with_read_only(props.read_only);
        reconciler.seed(&session);

        Self {
            engine,
            config,
            props,
            registry,
            binding,
            session,
            reconciler,
        }
    }

    // ===== Queries =====

    pub fn props(&self) -> &EditorProps {
        &self.props
    }

    pub fn engine(&self) -> &ThemeEngine {
        &self.engine
    }

    pub fn session(&self) -> &SandboxSession<P> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SandboxSession<P> {
        &mut self.session
    }

    pub fn registry(&self) -> &RegistryClosure {
        &self.registry
    }

    pub fn theme(&self) -> &ThemeChoice {
        self.binding.selected()
    }

    pub fn is_dark(&self) -> bool {
        self.binding.is_dark()
    }

    pub fn is_read_only(&self) -> bool {
        self.props.read_only
    }

    pub fn status(&self) -> SaveStatus {
        self.reconciler.status()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.reconciler.message()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.reconciler.has_unsaved_changes(&self.session)
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    // ===== Editing =====

    pub fn edit(&mut self, path: &str, text: &str) -> bool {
        if self.props.read_only {
            return false;
        }
        self.session.edit_file(path, text)
    }

    pub fn set_active_file(&mut self, path: &str) -> bool {
        self.session.set_active_file(path)
    }

    pub fn undo(&mut self, path: &str) -> bool {
        self.session.undo(path)
    }

    /// Switches theme, remounting the preview when the session key changes.
    pub fn select_theme(&mut self, name: &str) {
        if self.reconciler.is_closed() {
            return;
        }
        if let Some(key) = self.binding.select_theme(&self.engine, &mut self.session, name) {
            let project = build(&self.engine, &self.binding, &self.props, &self.registry);
            self.session.sync(key, project);
        }
    }

    pub fn set_dark(&mut self, dark: bool) {
        if self.reconciler.is_closed() {
            return;
        }
        if self.binding.set_dark(dark) {
            self.resync();
        }
    }

    /// Upstream data changed: re-resolve, re-assemble and re-seed the baseline.
    ///
    /// Files whose upstream text did not change keep their live edits.
    pub fn update_props(&mut self, props: EditorProps, store: &dyn ComponentStore) {
        let same_record = props.component_id == self.props.component_id;
        self.props = props;
        self.registry = resolve_registry(store, &self.config, &self.props);
        self.binding
            .observe_persisted(&self.engine, self.props.stylesheet.as_deref());
        let project = build(&self.engine, &self.binding, &self.props, &self.registry);
        let key = self.binding.session_key(self.registry.sorted_ids());

        let baseline = project.files.visible_snapshot();
        let path = project.component_path.clone();
        if same_record {
            self.session.sync(key, project);
            self.reconciler.rebase(path, baseline);
        } else {
            self.session.replace(key, project);
            self.reconciler.reseed(path, baseline);
        }
    }

    fn resync(&mut self) -> SyncOutcome {
        let project = build(&self.engine, &self.binding, &self.props, &self.registry);
        let key = self.binding.session_key(self.registry.sorted_ids());
        self.session.sync(key, project)
    }

    // ===== Saving =====

    /// Manual save. Validation findings are logged; they never block the save.
    pub fn save(&mut self, user: Option<UserToken>, now: Instant) -> Option<PendingSave> {
        let request = self.reconciler.request_save(&self.session, user, now)?;
        self.log_validation(&request);
        self.address(request, now)
    }

    /// Drives auto-save and the saved-indicator timer. Call regularly.
    pub fn tick(&mut self, user: Option<UserToken>, now: Instant) -> Option<PendingSave> {
        let request = self.reconciler.tick(&self.session, user, now)?;
        self.log_validation(&request);
        self.address(request, now)
    }

    pub fn complete_save(&mut self, ticket: u64, result: Result<(), SaveError>, now: Instant) -> bool {
        self.reconciler.complete_save(ticket, result, now)
    }

    /// Saves synchronously through `store`. Returns the resulting status.
    pub fn save_now(&mut self, store: &dyn ComponentStore, user: Option<UserToken>, now: Instant) -> SaveStatus {
        if let Some(pending) = self.save(user, now) {
            let result = execute_save(store, &pending);
            self.complete_save(pending.request.ticket, result, now);
        }
        self.status()
    }

    pub fn reset(&mut self) {
        self.reconciler.reset(&mut self.session);
    }

    /// Tears the preview down and stops every timer.
    pub fn close(&mut self) {
        self.reconciler.close();
        self.session.unmount();
    }

    fn address(&mut self, request: SaveRequest, now: Instant) -> Option<PendingSave> {
        match &self.props.component_id {
            Some(id) => Some(PendingSave {
                component_id: id.clone(),
                request,
            }),
            None => {
                let ticket = request.ticket;
                self.reconciler.complete_save(
                    ticket,
                    Err(SaveError::Failed("component has no record to save into".to_string())),
                    now,
                );
                None
            }
        }
    }

    fn log_validation(&self, request: &SaveRequest) {
        let sources = [
            (self.reconciler.component_path(), request.patch.source.as_deref()),
            (USAGE_PATH, request.patch.usage_source.as_deref()),
        ];
        for (path, code) in sources {
            let Some(code) = code else { continue };
            let report = validate_code(code);
            for error in &report.errors {
                log::warn!("{}: {}", path, error);
            }
            for warning in &report.warnings {
                log::debug!("{}: {}", path, warning);
            }
        }
    }

    /// Files the editor would save right now.
    pub fn visible_snapshot(&self) -> FileSnapshot {
        self.session.visible_snapshot()
    }
}

fn resolve_registry(store: &dyn ComponentStore, config: &EditorConfig, props: &EditorProps) -> RegistryClosure {
    RegistryResolver::new(store)
        .with_max_rounds(config.max_resolve_rounds)
        .resolve(&props.registry_dependency_ids)
}

fn build(
    engine: &ThemeEngine,
    binding: &ThemeBinding,
    props: &EditorProps,
    registry: &RegistryClosure,
) -> AssembledProject {
    let stylesheet = binding.effective_stylesheet(engine, props.stylesheet.as_deref());
    assemble(
        engine,
        &ProjectInput {
            slug: &props.slug,
            component_source: &props.component_source,
            usage_source: &props.usage_source,
            stylesheet: stylesheet.as_deref(),
            dependencies: props.dependencies.as_ref(),
            registry,
            dark: binding.is_dark(),
        },
    )
}
