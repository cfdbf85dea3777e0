pub mod application;
pub mod approved_member;

pub use application::{Application, ApplicationStatus};
pub use approved_member::{ApprovedMember, MemberStatus};
