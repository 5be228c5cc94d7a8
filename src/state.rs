use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Mutex};

use crate::api::ApiClient;
use crate::config::Config;
use crate::controllers::{FormState, SearchBox};
use crate::models::Submission;
use crate::page::Page;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub api: ApiClient,
    pub page: Arc<dyn Page>,
    pub form: Mutex<FormState>,
    pub search: SearchBox,
    /// Submissions behind the rows currently on the page.
    pub rows: Mutex<Vec<Submission>>,
    /// Bumped by every table refresh; a response is applied only if no
    /// newer refresh has started since.
    pub refresh_seq: AtomicU64,
}
