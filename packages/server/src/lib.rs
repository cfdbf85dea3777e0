// Members-only content site - API core
//
// Backend for a membership-gated content site: join applications reviewed
// by administrators, approved members reading curated pages, and an admin
// toolchain that imports spreadsheet tabs into page documents and keeps
// them in sync with their source sheets.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
