//! Background saving of component edits.
//!
//! Store writes can be slow (a network database, a synced folder), so the
//! studio hands each [`PendingSave`] to a worker thread and polls for the
//! outcome once per frame. The reconciler only ever issues one save at a time,
//! so a single channel is enough.

use crate::io::SavingState;
use eframe::egui;
use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use uiforge::{execute_save, ComponentStore, PendingSave, SaveError};

/// Result of polling the saver.
#[derive(Debug, PartialEq)]
pub enum SaveResult {
    /// The worker finished the save with this ticket
    Completed {
        ticket: u64,
        result: Result<(), SaveError>,
    },
    /// Nothing finished since the last poll
    None,
}

/// Runs store writes off the UI thread.
pub struct AsyncSaver {
    store: Arc<dyn ComponentStore>,
    saving_state: Arc<Mutex<SavingState>>,
    receiver: Option<Receiver<(u64, Result<(), SaveError>)>>,
}

impl AsyncSaver {
    pub fn new(store: Arc<dyn ComponentStore>) -> Self {
        Self {
            store,
            saving_state: Arc::new(Mutex::new(SavingState::new())),
            receiver: None,
        }
    }

    pub fn store(&self) -> &Arc<dyn ComponentStore> {
        &self.store
    }

    /// True while a worker thread is writing.
    pub fn is_saving(&self) -> bool {
        self.saving_state
            .lock()
            .map(|state| state.in_progress)
            .unwrap_or(false)
    }

    /// Ticket of the save currently running, if any.
    pub fn current_ticket(&self) -> Option<u64> {
        self.saving_state.lock().ok().and_then(|state| state.ticket)
    }

    /// Starts writing `save` on a worker thread.
    ///
    /// Call [`check_completion`](Self::check_completion) every frame to pick
    /// up the result; the worker requests a repaint when it is done.
    ///
    /// # Arguments
    /// * `save` - The addressed save request produced by the editor
    /// * `ctx` - egui context used to wake the UI when the save finishes
    pub fn start_save(&mut self, save: PendingSave, ctx: &egui::Context) {
        let (sender, receiver) = channel();
        self.receiver = Some(receiver);

        let ticket = save.request.ticket;
        if let Ok(mut state) = self.saving_state.lock() {
            state.in_progress = true;
            state.ticket = Some(ticket);
        }

        let store = Arc::clone(&self.store);
        let saving_state = Arc::clone(&self.saving_state);
        let ctx_handle = ctx.clone();

        thread::spawn(move || {
            log::debug!("Saving {} (ticket {})", save.component_id, ticket);
            let result = execute_save(store.as_ref(), &save);
            if let Err(err) = &result {
                log::warn!("Save of {} failed: {}", save.component_id, err);
            }

            let _ = sender.send((ticket, result));

            if let Ok(mut state) = saving_state.lock() {
                state.in_progress = false;
                state.ticket = None;
            }

            ctx_handle.request_repaint();
        });
    }

    /// Returns the outcome of the last save once the worker has finished.
    pub fn check_completion(&mut self) -> SaveResult {
        let Some(receiver) = &self.receiver else {
            return SaveResult::None;
        };
        match receiver.try_recv() {
            Ok((ticket, result)) => {
                self.receiver = None;
                SaveResult::Completed { ticket, result }
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => SaveResult::None,
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.receiver = None;
                SaveResult::None
            }
        }
    }

    /// Blocks until the running save finishes and returns its outcome.
    ///
    /// Returns `SaveResult::None` right away when nothing is running.
    pub fn wait_for_completion(&mut self) -> SaveResult {
        let Some(receiver) = self.receiver.take() else {
            return SaveResult::None;
        };
        match receiver.recv() {
            Ok((ticket, result)) => SaveResult::Completed { ticket, result },
            Err(_) => SaveResult::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use uiforge::{ComponentPatch, MemoryStore, NewComponent, SaveRequest, UserToken};

    fn wait_for(saver: &mut AsyncSaver) -> SaveResult {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            let result = saver.check_completion();
            if result != SaveResult::None {
                return result;
            }
            thread::sleep(Duration::from_millis(5));
        }
        SaveResult::None
    }

    fn pending(id: &str, ticket: u64) -> PendingSave {
        PendingSave {
            component_id: id.to_string(),
            request: SaveRequest {
                ticket,
                user: UserToken::new("u1"),
                patch: ComponentPatch {
                    usage_source: Some("export default () => <b/>".to_string()),
                    ..Default::default()
                },
            },
        }
    }

    #[test]
    fn test_saver_is_idle_initially() {
        let mut saver = AsyncSaver::new(Arc::new(MemoryStore::new()));
        assert!(!saver.is_saving());
        assert_eq!(saver.current_ticket(), None);
        assert_eq!(saver.check_completion(), SaveResult::None);
    }

    #[test]
    fn test_background_save_updates_store() {
        let store = Arc::new(MemoryStore::new());
        let record = NewComponent {
            name: "Card".to_string(),
            source: "export function Card() {}".to_string(),
            usage_source: "export default () => null".to_string(),
            ..Default::default()
        }
        .into_record("c1".to_string(), Some("u1".to_string()));
        store.put(record).unwrap();

        let mut saver = AsyncSaver::new(store.clone());
        saver.start_save(pending("c1", 7), &egui::Context::default());

        assert_eq!(
            wait_for(&mut saver),
            SaveResult::Completed {
                ticket: 7,
                result: Ok(())
            }
        );
        assert_eq!(store.get("c1").unwrap().usage_source, "export default () => <b/>");
        assert!(!saver.is_saving());
    }

    #[test]
    fn test_missing_record_reports_failure() {
        let mut saver = AsyncSaver::new(Arc::new(MemoryStore::new()));
        saver.start_save(pending("missing", 1), &egui::Context::default());
        match wait_for(&mut saver) {
            SaveResult::Completed { ticket, result } => {
                assert_eq!(ticket, 1);
                assert!(matches!(result, Err(SaveError::Failed(_))));
            }
            SaveResult::None => panic!("save never completed"),
        }
    }

    #[test]
    fn test_wait_for_completion_blocks_until_done() {
        let mut saver = AsyncSaver::new(Arc::new(MemoryStore::new()));
        assert_eq!(saver.wait_for_completion(), SaveResult::None);

        saver.start_save(pending("missing", 3), &egui::Context::default());
        match saver.wait_for_completion() {
            SaveResult::Completed { ticket, .. } => assert_eq!(ticket, 3),
            SaveResult::None => panic!("save never completed"),
        }
        assert_eq!(saver.check_completion(), SaveResult::None);
    }
}
