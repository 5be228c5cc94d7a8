pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod models;
pub mod page;
pub mod views;
pub mod controllers;
pub mod console;

use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Mutex};

use crate::api::ApiClient;
use crate::config::Config;
use crate::controllers::{FormState, SearchBox};
use crate::error::ClientError;
use crate::page::Page;
use crate::state::{AppState, SharedState};
use crate::views::table::try_refresh_table;

pub fn build_state(config: Config, page: Arc<dyn Page>) -> Result<SharedState, ClientError> {
    let api = ApiClient::new(&config)?;

    Ok(Arc::new(AppState {
        config,
        api,
        page,
        form: Mutex::new(FormState::default()),
        search: SearchBox::new(),
        rows: Mutex::new(Vec::new()),
        refresh_seq: AtomicU64::new(0),
    }))
}

/// Page-load sequence: grab a CSRF token (when prefetching is on), then do
/// the initial table load.
pub async fn start(state: &SharedState) -> Result<(), ClientError> {
    tracing::info!("Page loaded, initializing");

    let result = async {
        if state.config.prefetch_csrf {
            state.api.fetch_csrf_token().await?;
        }
        try_refresh_table(state).await?;
        Ok::<_, ClientError>(())
    }
    .await;

    if let Err(e) = &result {
        tracing::error!("Error initializing page: {e}");
    }
    result
}
