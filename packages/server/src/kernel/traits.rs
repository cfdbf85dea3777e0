// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic. Import and
// re-sync decide WHAT to fetch; implementations only decide HOW.
//
// Naming convention: Base* for trait names (e.g., BaseSheetFetcher)

use anyhow::Result;
use async_trait::async_trait;

use crate::domains::sheets::SheetRef;

// =============================================================================
// Sheet Fetcher Trait (Infrastructure - spreadsheet CSV export)
// =============================================================================

#[async_trait]
pub trait BaseSheetFetcher: Send + Sync {
    /// Fetch one tab of a spreadsheet as CSV text
    async fn fetch_csv(&self, sheet: &SheetRef) -> Result<String>;
}
