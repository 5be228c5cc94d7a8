use std::sync::atomic::Ordering;

use askama::Template;

use crate::error::ClientError;
use crate::models::Submission;
use crate::state::SharedState;

use super::contact::format_contact_info;

/// One table row, every cell already reduced to display text.
#[derive(Debug, Clone)]
pub struct RowView {
    pub index: usize,
    pub id: i64,
    pub submission_date: String,
    pub recruiter_firm: String,
    pub client_name: String,
    pub recruiter_name: String,
    pub recruiter_contact: String,
    pub contact_html: String,
    pub position: String,
    pub rate: String,
    pub job_id: String,
    pub interview_date: String,
    pub follow_up_date: String,
    pub notes: String,
}

impl RowView {
    fn new(index: usize, sub: &Submission) -> Self {
        RowView {
            index,
            id: sub.id,
            submission_date: sub.submission_date.clone(),
            recruiter_firm: sub.recruiter_firm.clone(),
            client_name: sub.client_name.clone(),
            recruiter_name: sub.recruiter_name.clone(),
            recruiter_contact: sub.recruiter_contact.clone(),
            contact_html: format_contact_info(&sub.recruiter_contact),
            position: sub.position.clone(),
            rate: sub.rate.clone().unwrap_or_default(),
            job_id: sub.job_id.clone(),
            interview_date: sub.interview_date.clone().unwrap_or_default(),
            follow_up_date: sub.follow_up_date.clone().unwrap_or_default(),
            notes: sub.notes.clone().unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "submissions_table.html")]
struct SubmissionsTableTemplate<'a> {
    rows: &'a [RowView],
}

/// A freshly built table body: the `<tr>` markup plus the rows behind it.
#[derive(Debug, Clone)]
pub struct RenderedTable {
    pub html: String,
    pub rows: Vec<RowView>,
}

/// Build the table body for a result set. Rows are numbered from 1.
pub fn render_table(submissions: &[Submission]) -> Result<RenderedTable, ClientError> {
    let rows: Vec<RowView> = submissions
        .iter()
        .enumerate()
        .map(|(i, sub)| RowView::new(i + 1, sub))
        .collect();

    let html = SubmissionsTableTemplate { rows: &rows }.render()?;
    Ok(RenderedTable { html, rows })
}

/// Re-query with the current search text and rebuild the table. Errors are
/// logged and swallowed.
pub async fn refresh_table(state: &SharedState) {
    if let Err(e) = try_refresh_table(state).await {
        tracing::error!("Error refreshing table: {e}");
    }
}

/// Like `refresh_table`, but returns the error. `Ok(false)` means a newer
/// refresh started while this one was in flight and its result was dropped.
pub async fn try_refresh_table(state: &SharedState) -> Result<bool, ClientError> {
    let ticket = state.refresh_seq.fetch_add(1, Ordering::SeqCst) + 1;
    let query = state.search.query();

    tracing::debug!("Refreshing table (query: {query:?})");
    let submissions = state.api.search(&query).await?;

    if state.refresh_seq.load(Ordering::SeqCst) != ticket {
        tracing::debug!("Discarding stale search results for {query:?}");
        return Ok(false);
    }

    let table = render_table(&submissions)?;
    tracing::debug!("Got {} submissions", submissions.len());

    *state.rows.lock().unwrap_or_else(|e| e.into_inner()) = submissions;
    state.page.replace_table(&table);
    Ok(true)
}

/// Look up a row of the latest render by id.
pub fn find_row(state: &SharedState, id: i64) -> Option<Submission> {
    state
        .rows
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .iter()
        .find(|sub| sub.id == id)
        .cloned()
}
