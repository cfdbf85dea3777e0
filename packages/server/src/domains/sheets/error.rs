use thiserror::Error;

use crate::common::auth::AuthError;

/// Import/re-sync failures that surface to the caller
///
/// Each variant maps to one fixed user-facing message at the route layer;
/// anything unexpected is folded into `Internal` and reported generically.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Spreadsheet URL not recognized")]
    BadUrl,

    #[error("Failed to fetch spreadsheet")]
    FetchFailed,

    #[error("Spreadsheet tab has no data")]
    EmptyTable,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
