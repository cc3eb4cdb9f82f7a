//! Unsaved-change tracking and save orchestration.
//!
//! The [`Reconciler`] is a single-owner state machine driven by three kinds of
//! input: user save/reset actions, clock ticks and save completions. It never
//! performs I/O itself. `request_save` and `tick` hand out a [`SaveRequest`]
//! which the owner executes against the store, reporting the outcome back
//! through [`Reconciler::complete_save`].
//!
//! "Dirty" is not stored. It is recomputed on demand by comparing the
//! session's user-facing files with the last-saved baseline.

use crate::config::EditorConfig;
use crate::model::ComponentPatch;
use crate::sandbox::{PreviewSurface, SandboxSession};
use crate::store::{StoreError, UserToken};
use crate::vfs::{changed_paths, FileSnapshot, STYLESHEET_PATH, USAGE_PATH};
use std::time::{Duration, Instant};
use thiserror::Error;

pub const UNAUTHENTICATED_MESSAGE: &str = "Sign in to save your changes";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save changes";

/// Save status as reported to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    /// Transient; reverts to `Idle` after the indicator delay.
    Saved,
    Error,
}

impl SaveStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SaveStatus::Idle => "",
            SaveStatus::Saving => "Saving...",
            SaveStatus::Saved => "Saved",
            SaveStatus::Error => "Error saving",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("save failed: {0}")]
    Failed(String),
}

impl SaveError {
    /// Short message suitable for a status banner.
    pub fn user_message(&self) -> &'static str {
        match self {
            SaveError::Unauthenticated => UNAUTHENTICATED_MESSAGE,
            SaveError::Failed(_) => SAVE_FAILED_MESSAGE,
        }
    }
}

impl From<StoreError> for SaveError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unauthenticated => SaveError::Unauthenticated,
            other => SaveError::Failed(other.to_string()),
        }
    }
}

/// A save the owner must execute. Identified by `ticket` when reporting back.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub ticket: u64,
    pub user: UserToken,
    pub patch: ComponentPatch,
}

#[derive(Debug, Clone)]
struct InFlight {
    ticket: u64,
    snapshot: FileSnapshot,
}

/// Edit/save state of one open editor.
#[derive(Debug, Clone)]
pub struct Reconciler {
    component_path: String,
    /// Persisted texts the session was opened with.
    original: FileSnapshot,
    /// Last confirmed save. `None` until the session has been seeded.
    baseline: Option<FileSnapshot>,
    status: SaveStatus,
    message: Option<String>,
    in_flight: Option<InFlight>,
    next_ticket: u64,
    saved_reset_at: Option<Instant>,
    next_autosave_at: Option<Instant>,
    autosave_interval: Duration,
    saved_delay: Duration,
    read_only: bool,
    closed: bool,
}

impl Reconciler {
    /// # Arguments
    /// * `config` - Auto-save interval and saved-indicator delay
    /// * `component_path` - Path of the component under edit inside the project
    /// * `original` - User-facing files as persisted when the editor opened
    pub fn new(config: &EditorConfig, component_path: impl Into<String>, original: FileSnapshot) -> Self {
        Self {
            component_path: component_path.into(),
            original,
            baseline: None,
            status: SaveStatus::Idle,
            message: None,
            in_flight: None,
            next_ticket: 1,
            saved_reset_at: None,
            next_autosave_at: None,
            autosave_interval: config.autosave_interval(),
            saved_delay: config.saved_indicator_delay(),
            read_only: false,
            closed: false,
        }
    }

    /// Read-only reconcilers refuse every save.
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    // ===== Queries =====

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    /// User-facing message of the last failure.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_saving(&self) -> bool {
        self.status == SaveStatus::Saving
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn component_path(&self) -> &str {
        &self.component_path
    }

    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    fn reference(&self) -> &FileSnapshot {
        self.baseline.as_ref().unwrap_or(&self.original)
    }

    /// True when any user-facing file differs from the last-saved baseline.
    pub fn has_unsaved_changes<P: PreviewSurface>(&self, session: &SandboxSession<P>) -> bool {
        *self.reference() != session.visible_snapshot()
    }

    /// Paths that differ from the baseline.
    pub fn unsaved_paths<P: PreviewSurface>(&self, session: &SandboxSession<P>) -> Vec<String> {
        changed_paths(self.reference(), &session.visible_snapshot())
    }

    /// When the next auto-save check is due, if scheduled.
    pub fn next_autosave_at(&self) -> Option<Instant> {
        self.next_autosave_at
    }

    // ===== Baseline management =====

    /// Takes the session's current files as the saved baseline.
    pub fn seed<P: PreviewSurface>(&mut self, session: &SandboxSession<P>) {
        self.baseline = Some(session.visible_snapshot());
    }

    /// Upstream data changed (e.g. another component was opened): start over
    /// from `snapshot`. A save still in flight is forgotten and its completion ignored.
    pub fn reseed(&mut self, component_path: impl Into<String>, snapshot: FileSnapshot) {
        self.component_path = component_path.into();
        self.original = snapshot.clone();
        self.baseline = Some(snapshot);
        self.in_flight = None;
        self.status = SaveStatus::Idle;
        self.message = None;
        self.saved_reset_at = None;
    }

    /// The open record's upstream data changed: take `snapshot` as the new
    /// baseline. A save in flight stays in flight and its completion still lands.
    pub fn rebase(&mut self, component_path: impl Into<String>, snapshot: FileSnapshot) {
        if !self.is_saving() {
            self.reseed(component_path, snapshot);
            return;
        }
        self.component_path = component_path.into();
        self.original = snapshot.clone();
        self.baseline = Some(snapshot);
    }

    // ===== Transitions =====

    /// Starts a save of the current files.
    ///
    /// Returns `None` when a save is already in flight, the editor is read-only
    /// or closed, or nobody is signed in. The last case moves to `Error`.
    pub fn request_save<P: PreviewSurface>(
        &mut self,
        session: &SandboxSession<P>,
        user: Option<UserToken>,
        now: Instant,
    ) -> Option<SaveRequest> {
        if self.closed || self.read_only {
            log::debug!("Save ignored: editor is closed or read-only");
            return None;
        }
        if self.is_saving() {
            log::debug!("Save ignored: another save is in flight");
            return None;
        }
        let Some(user) = user else {
            self.status = SaveStatus::Error;
            self.message = Some(UNAUTHENTICATED_MESSAGE.to_string());
            return None;
        };

        let snapshot = session.visible_snapshot();
        let patch = ComponentPatch {
            source: snapshot.get(&self.component_path).cloned(),
            usage_source: snapshot.get(USAGE_PATH).cloned(),
            stylesheet: snapshot.get(STYLESHEET_PATH).cloned(),
            dependencies: None,
        };

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight = Some(InFlight { ticket, snapshot });
        self.status = SaveStatus::Saving;
        self.message = None;
        self.saved_reset_at = None;
        // A manual save restarts the auto-save interval.
        self.next_autosave_at = Some(now + self.autosave_interval);

        Some(SaveRequest { ticket, user, patch })
    }

    /// Reports the outcome of a save. Returns false for unknown or stale tickets.
    pub fn complete_save(&mut self, ticket: u64, result: Result<(), SaveError>, now: Instant) -> bool {
        if self.in_flight.as_ref().map(|f| f.ticket) != Some(ticket) {
            log::debug!("Ignoring completion of stale save #{}", ticket);
            return false;
        }
        let Some(in_flight) = self.in_flight.take() else {
            return false;
        };

        match result {
            Ok(()) => {
                log::info!("Saved {} ({} files)", self.component_path, in_flight.snapshot.len());
                self.baseline = Some(in_flight.snapshot);
                self.status = SaveStatus::Saved;
                self.message = None;
                self.saved_reset_at = Some(now + self.saved_delay);
            }
            Err(err) => {
                log::error!("Saving {} failed: {}", self.component_path, err);
                self.status = SaveStatus::Error;
                self.message = Some(err.user_message().to_string());
            }
        }
        true
    }

    /// Advances timers. Returns a save request when the auto-save fires.
    ///
    /// The dirty and in-flight checks run when the timer fires, not when it is
    /// scheduled.
    pub fn tick<P: PreviewSurface>(
        &mut self,
        session: &SandboxSession<P>,
        user: Option<UserToken>,
        now: Instant,
    ) -> Option<SaveRequest> {
        if self.closed {
            return None;
        }

        if self.status == SaveStatus::Saved && self.saved_reset_at.is_some_and(|at| now >= at) {
            self.status = SaveStatus::Idle;
            self.saved_reset_at = None;
        }

        let due = match self.next_autosave_at {
            Some(at) => now >= at,
            None => {
                self.next_autosave_at = Some(now + self.autosave_interval);
                false
            }
        };
        if !due {
            return None;
        }
        self.next_autosave_at = Some(now + self.autosave_interval);

        if self.read_only || self.is_saving() || !self.has_unsaved_changes(session) {
            return None;
        }
        log::debug!("Auto-saving {}", self.component_path);
        self.request_save(session, user, now)
    }

    /// Discards unsaved edits.
    ///
    /// With a baseline every baseline path is restored; before the first seed
    /// only the active file is restored to its persisted text.
    pub fn reset<P: PreviewSurface>(&mut self, session: &mut SandboxSession<P>) {
        match &self.baseline {
            Some(baseline) => {
                for (path, text) in baseline {
                    session.overwrite_file(path, text);
                }
            }
            None => {
                let active = session.active_file().to_string();
                if let Some(text) = self.original.get(&active) {
                    session.overwrite_file(&active, text);
                }
            }
        }
        if !self.is_saving() {
            self.status = SaveStatus::Idle;
            self.message = None;
        }
    }

    /// Stops all timers. Later ticks and completions are ignored.
    pub fn close(&mut self) {
        self.closed = true;
        self.in_flight = None;
        self.next_autosave_at = None;
        self.saved_reset_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{assemble, ProjectInput};
    use crate::resolver::RegistryClosure;
    use crate::sandbox::{HeadlessPreview, SessionKey};
    use crate::theme::ThemeEngine;

    struct Fixture {
        session: SandboxSession<HeadlessPreview>,
        reconciler: Reconciler,
        start: Instant,
    }

    fn fixture() -> Fixture {
        let config = EditorConfig::default();
        let engine = ThemeEngine::builtin();
        let registry = RegistryClosure::new();
        let project = assemble(
            &engine,
            &ProjectInput {
                slug: "card",
                component_source: "export function Card() {}",
                usage_source: "export default () => <div>hi</div>",
                stylesheet: None,
                dependencies: None,
                registry: &registry,
                dark: false,
            },
        );
        let original = project.files.visible_snapshot();
        let path = project.component_path.clone();
        let mut session = SandboxSession::new(HeadlessPreview::new(), &config);
        session.sync(
            SessionKey {
                theme: "default".to_string(),
                dark: false,
                registry_ids: Vec::new(),
            },
            project,
        );
        let mut reconciler = Reconciler::new(&config, path, original);
        reconciler.seed(&session);
        Fixture {
            session,
            reconciler,
            start: Instant::now(),
        }
    }

    fn user() -> Option<UserToken> {
        Some(UserToken::new("u1"))
    }

    #[test]
    fn test_clean_after_open() {
        let f = fixture();
        assert!(!f.reconciler.has_unsaved_changes(&f.session));
        assert_eq!(f.reconciler.status(), SaveStatus::Idle);
    }

    #[test]
    fn test_edit_makes_dirty() {
        let mut f = fixture();
        f.session.edit_file(USAGE_PATH, "export default () => <div>bye</div>");
        assert!(f.reconciler.has_unsaved_changes(&f.session));
        assert_eq!(f.reconciler.unsaved_paths(&f.session), vec![USAGE_PATH.to_string()]);
    }

    #[test]
    fn test_save_extracts_persisted_fields() {
        let mut f = fixture();
        f.session.edit_file("/components/ui/card.tsx", "export function Card() { return 1 }");
        let req = f.reconciler.request_save(&f.session, user(), f.start).unwrap();
        assert_eq!(req.patch.source.as_deref(), Some("export function Card() { return 1 }"));
        assert_eq!(req.patch.usage_source.as_deref(), Some("export default () => <div>hi</div>"));
        assert!(req.patch.stylesheet.unwrap().contains(":root"));
        assert_eq!(req.patch.dependencies, None);
        assert_eq!(f.reconciler.status(), SaveStatus::Saving);
    }

    #[test]
    fn test_successful_save_clears_dirty() {
        let mut f = fixture();
        f.session.edit_file(USAGE_PATH, "changed");
        let req = f.reconciler.request_save(&f.session, user(), f.start).unwrap();
        assert!(f.reconciler.complete_save(req.ticket, Ok(()), f.start));
        assert_eq!(f.reconciler.status(), SaveStatus::Saved);
        assert!(!f.reconciler.has_unsaved_changes(&f.session));
    }

    #[test]
    fn test_edits_during_save_stay_dirty() {
        let mut f = fixture();
        f.session.edit_file(USAGE_PATH, "first");
        let req = f.reconciler.request_save(&f.session, user(), f.start).unwrap();
        f.session.edit_file(USAGE_PATH, "second");
        f.reconciler.complete_save(req.ticket, Ok(()), f.start);
        assert!(f.reconciler.has_unsaved_changes(&f.session));
    }

    #[test]
    fn test_single_flight() {
        let mut f = fixture();
        f.session.edit_file(USAGE_PATH, "changed");
        let first = f.reconciler.request_save(&f.session, user(), f.start);
        let second = f.reconciler.request_save(&f.session, user(), f.start);
        assert!(first.is_some());
        assert!(second.is_none());
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut f = fixture();
        f.session.edit_file(USAGE_PATH, "changed");
        let req = f.reconciler.request_save(&f.session, user(), f.start).unwrap();
        assert!(!f.reconciler.complete_save(req.ticket + 7, Ok(()), f.start));
        assert_eq!(f.reconciler.status(), SaveStatus::Saving);
        assert!(f.reconciler.complete_save(req.ticket, Ok(()), f.start));
        assert!(!f.reconciler.complete_save(req.ticket, Ok(()), f.start));
    }

    #[test]
    fn test_failure_keeps_edits() {
        let mut f = fixture();
        f.session.edit_file(USAGE_PATH, "changed");
        let before = f.session.snapshot();
        let req = f.reconciler.request_save(&f.session, user(), f.start).unwrap();
        f.reconciler
            .complete_save(req.ticket, Err(SaveError::Failed("offline".to_string())), f.start);
        assert_eq!(f.reconciler.status(), SaveStatus::Error);
        assert_eq!(f.reconciler.message(), Some(SAVE_FAILED_MESSAGE));
        assert_eq!(f.session.snapshot(), before);
        assert!(f.reconciler.has_unsaved_changes(&f.session));
        // retry is possible
        assert!(f.reconciler.request_save(&f.session, user(), f.start).is_some());
    }

    #[test]
    fn test_unauthenticated_never_enters_saving() {
        let mut f = fixture();
        f.session.edit_file(USAGE_PATH, "changed");
        assert!(f.reconciler.request_save(&f.session, None, f.start).is_none());
        assert_eq!(f.reconciler.status(), SaveStatus::Error);
        assert_eq!(f.reconciler.message(), Some(UNAUTHENTICATED_MESSAGE));
    }

    #[test]
    fn test_store_error_mapping() {
        assert_eq!(SaveError::from(StoreError::Unauthenticated), SaveError::Unauthenticated);
        let failed = SaveError::from(StoreError::NotFound("x".to_string()));
        assert_eq!(failed.user_message(), SAVE_FAILED_MESSAGE);
    }

    #[test]
    fn test_autosave_fires_only_when_dirty() {
        let mut f = fixture();
        let t0 = f.start;
        assert!(f.reconciler.tick(&f.session, user(), t0).is_none());
        assert!(f
            .reconciler
            .tick(&f.session, user(), t0 + Duration::from_secs(31))
            .is_none());

        f.session.edit_file(USAGE_PATH, "changed");
        assert!(f
            .reconciler
            .tick(&f.session, user(), t0 + Duration::from_secs(40))
            .is_none());
        let req = f.reconciler.tick(&f.session, user(), t0 + Duration::from_secs(62));
        assert!(req.is_some());
        assert!(f
            .reconciler
            .tick(&f.session, user(), t0 + Duration::from_secs(200))
            .is_none());
    }

    #[test]
    fn test_saved_reverts_to_idle() {
        let mut f = fixture();
        f.session.edit_file(USAGE_PATH, "changed");
        let req = f.reconciler.request_save(&f.session, user(), f.start).unwrap();
        f.reconciler.complete_save(req.ticket, Ok(()), f.start);
        f.reconciler.tick(&f.session, user(), f.start + Duration::from_secs(1));
        assert_eq!(f.reconciler.status(), SaveStatus::Saved);
        f.reconciler.tick(&f.session, user(), f.start + Duration::from_secs(2));
        assert_eq!(f.reconciler.status(), SaveStatus::Idle);
    }

    #[test]
    fn test_reset_restores_baseline() {
        let mut f = fixture();
        f.session.edit_file(USAGE_PATH, "changed");
        f.session.edit_file(STYLESHEET_PATH, "body {}");
        f.reconciler.reset(&mut f.session);
        assert!(!f.reconciler.has_unsaved_changes(&f.session));
        assert_eq!(f.reconciler.status(), SaveStatus::Idle);
    }

    #[test]
    fn test_reset_without_baseline_restores_active_file_only() {
        let mut f = fixture();
        let config = EditorConfig::default();
        f.reconciler = Reconciler::new(&config, "/components/ui/card.tsx", f.session.visible_snapshot());
        f.session.edit_file(USAGE_PATH, "changed usage");
        f.session.edit_file(STYLESHEET_PATH, "body {}");
        f.reconciler.reset(&mut f.session);
        assert_eq!(f.session.text(USAGE_PATH), Some("export default () => <div>hi</div>"));
        assert_eq!(f.session.text(STYLESHEET_PATH), Some("body {}"));
    }

    #[test]
    fn test_close_stops_autosave() {
        let mut f = fixture();
        f.session.edit_file(USAGE_PATH, "changed");
        f.reconciler.tick(&f.session, user(), f.start);
        f.reconciler.close();
        assert!(f
            .reconciler
            .tick(&f.session, user(), f.start + Duration::from_secs(120))
            .is_none());
        assert!(f.reconciler.request_save(&f.session, user(), f.start).is_none());
    }

    #[test]
    fn test_read_only_refuses_saves() {
        let mut f = fixture();
        f.reconciler = f.reconciler.clone().with_read_only(true);
        f.session.edit_file(USAGE_PATH, "changed");
        assert!(f.reconciler.request_save(&f.session, user(), f.start).is_none());
        assert_eq!(f.reconciler.status(), SaveStatus::Idle);
    }

    #[test]
    fn test_reseed_forgets_in_flight_save() {
        let mut f = fixture();
        f.session.edit_file(USAGE_PATH, "changed");
        let req = f.reconciler.request_save(&f.session, user(), f.start).unwrap();
        f.reconciler.reseed("/components/ui/other.tsx", f.session.visible_snapshot());
        assert!(!f.reconciler.complete_save(req.ticket, Ok(()), f.start));
        assert_eq!(f.reconciler.status(), SaveStatus::Idle);
    }

    #[test]
    fn test_rebase_keeps_in_flight_save() {
        let mut f = fixture();
        f.session.edit_file(USAGE_PATH, "changed");
        let req = f.reconciler.request_save(&f.session, user(), f.start).unwrap();
        let path = f.reconciler.component_path().to_string();
        f.reconciler.rebase(path, f.session.visible_snapshot());

        assert_eq!(f.reconciler.status(), SaveStatus::Saving);
        assert!(f.reconciler.request_save(&f.session, user(), f.start).is_none());
        assert!(f.reconciler.complete_save(req.ticket, Ok(()), f.start));
        assert_eq!(f.reconciler.status(), SaveStatus::Saved);
    }
}
