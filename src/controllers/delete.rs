use crate::error::ClientError;
use crate::state::SharedState;
use crate::views::table::refresh_table;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this submission?";

/// Delete-button handler. Returns `Ok(false)` when the user declines the
/// prompt, in which case nothing is sent.
pub async fn delete_submission(state: &SharedState, id: i64) -> Result<bool, ClientError> {
    if !state.page.confirm(DELETE_PROMPT) {
        tracing::debug!("Delete of submission {id} cancelled");
        return Ok(false);
    }

    match try_delete(state, id).await {
        Ok(()) => Ok(true),
        Err(e) => {
            tracing::error!("Error deleting submission {id}: {e}");
            state.page.alert(&format!("Error deleting submission: {e}"));
            Err(e)
        }
    }
}

async fn try_delete(state: &SharedState, id: i64) -> Result<(), ClientError> {
    tracing::info!("Deleting submission {id}");
    let response = state.api.delete(&id.to_string()).await?;

    if !response.is_success() {
        return Err(ClientError::Server(
            response
                .message
                .unwrap_or_else(|| "Error deleting submission".to_string()),
        ));
    }

    refresh_table(state).await;
    Ok(())
}
