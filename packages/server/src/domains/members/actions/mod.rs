pub mod apply;
pub mod import_members;
pub mod manage_member;
pub mod review_application;

pub use apply::{apply, ApplyError};
pub use import_members::{import_members, parse_member_rows, ImportMembersError, MemberRow};
pub use manage_member::{delete_member, upsert_member};
pub use review_application::{approve_application, reject_application, ReviewError};
