use crate::views::table::RenderedTable;

pub const NEW_SUBMISSION_TITLE: &str = "New Submission";
pub const EDIT_SUBMISSION_TITLE: &str = "Edit Submission";

/// The host surface the client drives: the submissions table body, the
/// add/edit modal, and blocking user prompts.
pub trait Page: Send + Sync {
    /// Replace the whole table body with a fresh render.
    fn replace_table(&self, table: &RenderedTable);

    /// Blocking notice to the user.
    fn alert(&self, message: &str);

    /// Blocking yes/no question. `false` means the user declined.
    fn confirm(&self, message: &str) -> bool;

    fn hide_modal(&self);

    fn set_modal_title(&self, title: &str);
}
