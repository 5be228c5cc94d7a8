pub mod submission;

pub use submission::{FIELD_NAMES, Submission, SubmissionForm};
