// Page documents: the content model members read and admins curate

pub mod actions;
pub mod models;

pub use models::page::{
    ContentBody, ContentItem, Page, PageSection, TableCell, TableContent, TableRow,
};
