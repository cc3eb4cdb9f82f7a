//! Shared flag of a background save.

/// State of an async save, shared with the worker thread through `Arc<Mutex<>>`.
///
/// Only the flag lives here; the result travels through a channel.
#[derive(Debug, Default)]
pub struct SavingState {
    /// True while a worker is writing to the store
    pub in_progress: bool,
    /// Ticket of the save the worker is running
    pub ticket: Option<u64>,
}

impl SavingState {
    pub fn new() -> Self {
        Self::default()
    }
}
