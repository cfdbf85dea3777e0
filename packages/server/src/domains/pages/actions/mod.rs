pub mod delete_page;
pub mod generate_page;
pub mod queries;
pub mod save_page;

pub use delete_page::{delete_page, DeleteError};
pub use generate_page::{build_template, generate_page, GenerateError};
pub use queries::{get_member_page, list_admin_pages, list_member_pages};
pub use save_page::{save_page, SaveError};
