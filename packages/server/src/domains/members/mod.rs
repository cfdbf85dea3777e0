// Join applications and the approved-member roster

pub mod actions;
pub mod models;
