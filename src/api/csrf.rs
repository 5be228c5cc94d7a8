use std::future::Future;

use tokio::sync::Mutex;

use crate::error::ClientError;

/// Holds the session's CSRF token once fetched. Never refreshed on its
/// own; a stale token only shows up as an HTTP error from the backend.
pub struct CsrfToken {
    value: Mutex<Option<String>>,
}

impl CsrfToken {
    pub fn new() -> Self {
        Self {
            value: Mutex::new(None),
        }
    }

    /// Return the held token, or run `fetch` to obtain one. Concurrent
    /// callers wait on the same fetch instead of issuing their own.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<String, ClientError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, ClientError>>,
    {
        let mut value = self.value.lock().await;
        if let Some(token) = value.as_ref() {
            return Ok(token.clone());
        }

        tracing::debug!("No CSRF token, getting one");
        let token = fetch().await?;
        *value = Some(token.clone());
        Ok(token)
    }

    pub async fn set(&self, token: String) {
        *self.value.lock().await = Some(token);
    }

    pub async fn current(&self) -> Option<String> {
        self.value.lock().await.clone()
    }

    /// Forget the token so the next mutating request fetches a new one.
    pub async fn clear(&self) {
        *self.value.lock().await = None;
    }
}

impl Default for CsrfToken {
    fn default() -> Self {
        Self::new()
    }
}
