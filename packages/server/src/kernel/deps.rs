//! Server dependencies (using traits for testability)
//!
//! Central dependency container handed to every action. External services
//! sit behind trait objects so tests can swap them for mocks.

use sqlx::PgPool;
use std::sync::Arc;

use crate::common::auth::HasAuthContext;
use crate::domains::auth::JwtService;
use crate::kernel::BaseSheetFetcher;

/// Server dependencies accessible to actions
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// Spreadsheet CSV export access
    pub sheet_fetcher: Arc<dyn BaseSheetFetcher>,
    /// Session token creation and verification
    pub jwt_service: Arc<JwtService>,
    /// Emails granted admin rights by configuration
    pub admin_emails: Vec<String>,
}

impl ServerDeps {
    pub fn new(
        db_pool: PgPool,
        sheet_fetcher: Arc<dyn BaseSheetFetcher>,
        jwt_service: Arc<JwtService>,
        admin_emails: Vec<String>,
    ) -> Self {
        Self {
            db_pool,
            sheet_fetcher,
            jwt_service,
            admin_emails,
        }
    }
}

/// Implement HasAuthContext for ServerDeps to enable authorization checks
impl HasAuthContext for ServerDeps {
    fn db_pool(&self) -> &PgPool {
        &self.db_pool
    }

    fn admin_emails(&self) -> &[String] {
        &self.admin_emails
    }
}
