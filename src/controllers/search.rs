use std::sync::Mutex;

use tokio::task::JoinHandle;

use crate::state::SharedState;
use crate::views::table::refresh_table;

/// The search input: its current text and the one pending debounce timer.
pub struct SearchBox {
    query: Mutex<String>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl SearchBox {
    pub fn new() -> Self {
        Self {
            query: Mutex::new(String::new()),
            pending: Mutex::new(None),
        }
    }

    pub fn query(&self) -> String {
        self.query.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set_query(&self, text: &str) {
        *self.query.lock().unwrap_or_else(|e| e.into_inner()) = text.to_string();
    }

    /// Install a new timer, aborting the one it replaces.
    fn replace_pending(&self, handle: JoinHandle<()>) {
        let previous = self
            .pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    pub fn cancel_pending(&self) {
        if let Some(handle) = self.pending.lock().unwrap_or_else(|e| e.into_inner()).take() {
            handle.abort();
        }
    }
}

impl Default for SearchBox {
    fn default() -> Self {
        Self::new()
    }
}

/// Input handler for the search box. The table refreshes once typing has
/// paused for the configured debounce interval.
pub fn on_search_input(state: &SharedState, text: &str) {
    state.search.set_query(text);

    let delay = state.config.search_debounce;
    let task_state = state.clone();
    let handle = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        refresh_table(&task_state).await;
    });

    state.search.replace_pending(handle);
}
