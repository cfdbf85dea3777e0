//! HTTP-backed spreadsheet fetcher
//!
//! Pulls a tab through the public CSV export endpoint. No retries: a
//! failed fetch is the caller's signal to reject (import) or skip
//! (re-sync).

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::domains::sheets::SheetRef;

use super::traits::BaseSheetFetcher;

pub struct HttpSheetFetcher {
    client: reqwest::Client,
}

impl HttpSheetFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for HttpSheetFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseSheetFetcher for HttpSheetFetcher {
    async fn fetch_csv(&self, sheet: &SheetRef) -> Result<String> {
        let url = sheet.csv_export_url();
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("fetching {url}"))?
            .error_for_status()
            .with_context(|| format!("export endpoint rejected {url}"))?;
        response.text().await.context("reading CSV body")
    }
}
