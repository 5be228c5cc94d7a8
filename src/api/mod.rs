pub mod client;
pub mod csrf;

pub use client::{ApiClient, CSRF_HEADER, MutationResponse};
pub use csrf::CsrfToken;
