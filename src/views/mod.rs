pub mod contact;
pub mod table;

pub use contact::format_contact_info;
pub use table::{RenderedTable, RowView, refresh_table, render_table};
