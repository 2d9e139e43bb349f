// crates/neura-ibft/src/timers/mod.rs

pub mod block_timer;
pub mod round_timer;

pub use block_timer::TokioBlockTimer;
pub use round_timer::TokioRoundTimer;

use std::sync::{Mutex, PoisonError};
use tokio::task::JoinHandle;

/// The single pending timer task of a timer. Starting a new one aborts the old.
#[derive(Debug, Default)]
struct TimerSlot {
    current: Mutex<Option<JoinHandle<()>>>,
}

impl TimerSlot {
    fn replace(&self, task: JoinHandle<()>) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = current.replace(task) {
            previous.abort();
        }
    }

    fn cancel(&self) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = current.take() {
            previous.abort();
        }
    }

    fn is_running(&self) -> bool {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        current.as_ref().is_some_and(|task| !task.is_finished())
    }
}
