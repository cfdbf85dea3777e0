// Session tokens, login approval and the login audit log

pub mod actions;
pub mod jwt;
pub mod models;

pub use jwt::{Claims, JwtService};
