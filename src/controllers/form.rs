use std::sync::MutexGuard;

use crate::error::ClientError;
use crate::models::{Submission, SubmissionForm};
use crate::page::{EDIT_SUBMISSION_TITLE, NEW_SUBMISSION_TITLE};
use crate::state::SharedState;
use crate::views::table::{find_row, refresh_table};

/// Which endpoint the shared form posts to.
#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Create,
    Edit(String),
}

impl FormMode {
    /// Read the mode off the form's `data-editing` / `data-edit-id`
    /// attributes. Only the exact string `"true"` means editing.
    pub fn from_attributes(
        editing: Option<&str>,
        edit_id: Option<&str>,
    ) -> Result<Self, ClientError> {
        match (editing, edit_id) {
            (Some("true"), Some(id)) if !id.is_empty() => Ok(FormMode::Edit(id.to_string())),
            (Some("true"), _) => Err(ClientError::InvalidForm(
                "form is in edit mode without an id".to_string(),
            )),
            _ => Ok(FormMode::Create),
        }
    }

    pub fn target_path(&self) -> String {
        match self {
            FormMode::Create => "/add".to_string(),
            FormMode::Edit(id) => format!("/edit/{id}"),
        }
    }
}

/// The add/edit form: field values, mode attributes and the submit button.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub values: SubmissionForm,
    pub data_editing: Option<String>,
    pub data_edit_id: Option<String>,
    pub submit_disabled: bool,
}

impl FormState {
    pub fn mode(&self) -> Result<FormMode, ClientError> {
        FormMode::from_attributes(self.data_editing.as_deref(), self.data_edit_id.as_deref())
    }

    /// Clear every field and drop the edit attributes.
    pub fn reset(&mut self) {
        self.values = SubmissionForm::default();
        self.data_editing = None;
        self.data_edit_id = None;
    }

    pub fn begin_edit(&mut self, sub: &Submission) {
        self.data_editing = Some("true".to_string());
        self.data_edit_id = Some(sub.id.to_string());
        self.values = SubmissionForm::from_submission(sub);
    }
}

pub(crate) fn lock_form(state: &SharedState) -> MutexGuard<'_, FormState> {
    state.form.lock().unwrap_or_else(|e| e.into_inner())
}

pub fn set_field(state: &SharedState, name: &str, value: &str) -> Result<(), ClientError> {
    lock_form(state).values.set(name, value)
}

/// Switch the form to Edit for the given submission.
pub fn populate_edit_form(state: &SharedState, sub: &Submission) {
    lock_form(state).begin_edit(sub);
    tracing::debug!("Editing submission {}", sub.id);
    state.page.set_modal_title(EDIT_SUBMISSION_TITLE);
}

/// Edit-button handler: load the row with this id from the latest render.
pub fn edit_row(state: &SharedState, id: i64) -> Result<(), ClientError> {
    match find_row(state, id) {
        Some(sub) => {
            populate_edit_form(state, &sub);
            Ok(())
        }
        None => {
            tracing::error!("Error populating form: no row with id {id}");
            state
                .page
                .alert("An error occurred while loading the submission details");
            Err(ClientError::InvalidForm(format!("no submission with id {id}")))
        }
    }
}

/// Back to Create mode with empty fields.
pub fn reset_form(state: &SharedState) {
    lock_form(state).reset();
    state.page.set_modal_title(NEW_SUBMISSION_TITLE);
}

/// Modal-close handler. Closing always lands the form in Create mode.
pub fn close_modal(state: &SharedState) {
    state.page.hide_modal();
    reset_form(state);
}

/// Post the form to `/add` or `/edit/{id}`. On success the modal closes and
/// the table refreshes once; on failure the user gets an alert. The submit
/// button is disabled for the duration either way, and a submit while it is
/// disabled does nothing and returns `Ok(false)`.
pub async fn submit_form(state: &SharedState) -> Result<bool, ClientError> {
    let snapshot = {
        let mut form = lock_form(state);
        if form.submit_disabled {
            tracing::debug!("Submit ignored, a submission is already in flight");
            return Ok(false);
        }
        form.submit_disabled = true;
        form.mode().map(|mode| (mode, form.values.clone()))
    };

    let result = match snapshot {
        Ok((mode, values)) => send_form(state, &mode, &values).await,
        Err(e) => Err(e),
    };

    if let Err(e) = &result {
        tracing::error!("Error submitting form: {e}");
        state.page.alert(&format!("Error submitting form: {e}"));
    }

    lock_form(state).submit_disabled = false;
    result.map(|()| true)
}

async fn send_form(
    state: &SharedState,
    mode: &FormMode,
    values: &SubmissionForm,
) -> Result<(), ClientError> {
    tracing::info!("Submitting to {}", mode.target_path());

    let response = match mode {
        FormMode::Create => state.api.add(values).await?,
        FormMode::Edit(id) => state.api.edit(id, values).await?,
    };

    if let Some(err) = response.failure() {
        return Err(ClientError::Server(err));
    }

    close_modal(state);
    refresh_table(state).await;
    Ok(())
}
