//! Background I/O for the studio.

pub mod saving_state;
pub mod async_saver;

// Re-export commonly used types
pub use saving_state::SavingState;
pub use async_saver::{AsyncSaver, SaveResult};
