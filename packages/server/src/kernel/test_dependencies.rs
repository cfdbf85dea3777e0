// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::domains::sheets::SheetRef;

use super::traits::BaseSheetFetcher;

// =============================================================================
// Mock Sheet Fetcher
// =============================================================================

#[derive(Debug, Clone)]
enum MockResponse {
    Csv(String),
    Failure(String),
}

/// Queued-response fetcher that records every call. Clones share the
/// queue and the recorded calls.
#[derive(Clone)]
pub struct MockSheetFetcher {
    responses: Arc<Mutex<Vec<MockResponse>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockSheetFetcher {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful CSV response
    pub fn with_csv(self, csv: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(MockResponse::Csv(csv.to_string()));
        self
    }

    /// Queue a failed fetch
    pub fn with_failure(self, reason: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(MockResponse::Failure(reason.to_string()));
        self
    }

    /// Source keys of every fetch that was attempted, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Check whether a given source key was fetched
    pub fn was_fetched(&self, source_key: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|key| key == source_key)
    }
}

impl Default for MockSheetFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseSheetFetcher for MockSheetFetcher {
    async fn fetch_csv(&self, sheet: &SheetRef) -> Result<String> {
        self.calls.lock().unwrap().push(sheet.source_key());

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok("名前,説明\nMock,モックの説明。\n".to_string());
        }
        match responses.remove(0) {
            MockResponse::Csv(csv) => Ok(csv),
            MockResponse::Failure(reason) => Err(anyhow::anyhow!("mock fetch failed: {reason}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queued_responses_drain_in_order() {
        let fetcher = MockSheetFetcher::new()
            .with_csv("a,b\n1,2\n")
            .with_failure("boom");
        let sheet = SheetRef {
            sheet_id: "abc".to_string(),
            gid: "0".to_string(),
        };

        assert_eq!(fetcher.fetch_csv(&sheet).await.unwrap(), "a,b\n1,2\n");
        assert!(fetcher.fetch_csv(&sheet).await.is_err());
        assert_eq!(fetcher.calls(), vec!["abc:0", "abc:0"]);
        assert!(fetcher.was_fetched("abc:0"));
    }
}
