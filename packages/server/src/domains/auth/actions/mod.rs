pub mod approve_login;
pub mod log_login;

pub use approve_login::{approve_login, LoginError, LoginIdentity};
pub use log_login::log_login;
