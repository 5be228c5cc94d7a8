pub mod delete;
pub mod form;
pub mod search;

pub use delete::{DELETE_PROMPT, delete_submission};
pub use form::{
    FormMode, FormState, close_modal, edit_row, populate_edit_form, reset_form, set_field,
    submit_form,
};
pub use search::{SearchBox, on_search_input};
