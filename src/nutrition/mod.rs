mod extract;

pub use extract::parse_nutrition;

use std::time::Duration;

use futures_util::future::join_all;
use log::warn;
use reqwest::Client;
use scraper::Html;

use crate::model::{NutritionInfo, NutritionRecord};

/// Fetches nutrition facts from recipe pages, one GET per URL.
///
/// Fetching is best-effort enrichment: every failure is absorbed here and
/// surfaces as a sentinel record, never as an error.
pub struct NutritionFetcher {
    client: Client,
}

impl NutritionFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch every URL concurrently and return one record per URL, in input
    /// order regardless of completion order.
    pub async fn fetch_batch(&self, urls: &[String]) -> Vec<NutritionRecord> {
        join_all(urls.iter().map(|url| self.fetch_one(url))).await
    }

    async fn fetch_one(&self, url: &str) -> NutritionRecord {
        let info = match self.try_fetch(url).await {
            Ok(info) => info,
            Err(err) => {
                warn!("Nutrition fetch failed for {url}: {err}");
                NutritionInfo::Unavailable
            }
        };

        info.into_record()
    }

    async fn try_fetch(&self, url: &str) -> Result<NutritionInfo, reqwest::Error> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        // Html is not Send, so parsing stays after the last await.
        Ok(parse_nutrition(&Html::parse_document(&body)))
    }
}
