use crate::client::{validate_days, validate_name, validate_page, AnalyticsApi, ApiStatusError};
use crate::config::Settings;
use crate::domain::hotmap::HierarchyIndustry;
use crate::domain::industry::{IndustrySummary, IndustryTrend};
use crate::domain::report::{AllIndustriesLlmAnalysis, IndustryAnalysis, IndustryLlmAnalysis};
use crate::domain::stock::{StockDetail, StockListItem};
use crate::domain::Page;
use anyhow::{Context, Result};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Longest slice of an undecodable body kept in the error message.
const BODY_EXCERPT_CHARS: usize = 300;

#[derive(Debug, Clone)]
pub struct HttpAnalyticsApi {
    http: reqwest::Client,
    base_url: Url,
    retries: u32,
}

impl HttpAnalyticsApi {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.require_analytics_api_base_url()?,
            Duration::from_secs(settings.analytics_api_timeout_secs),
            settings.analytics_api_retries,
        )
    }

    pub fn new(base_url: &str, timeout: Duration, retries: u32) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .with_context(|| format!("invalid analytics API base URL: {base_url}"))?;
        anyhow::ensure!(
            !base_url.cannot_be_a_base(),
            "analytics API base URL cannot carry paths: {base_url}"
        );

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build analytics API http client")?;

        Ok(Self {
            http,
            base_url,
            retries: retries.max(1),
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("analytics API base URL cannot carry paths"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch_once<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T> {
        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("analytics API request failed ({endpoint})"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .with_context(|| format!("failed to read analytics API response ({endpoint})"))?;

        if !status.is_success() {
            return Err(ApiStatusError::new(endpoint, status, text).into());
        }

        decode(endpoint, &text)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.url(segments)?;
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            tracing::debug!(endpoint, attempt, url = %url, "analytics API request");
            match self.fetch_once(endpoint, url.clone(), query).await {
                Ok(parsed) => return Ok(parsed),
                Err(err) => {
                    let client_error = err
                        .downcast_ref::<ApiStatusError>()
                        .is_some_and(|e| e.status.is_client_error());
                    if client_error || attempt >= self.retries {
                        return Err(err);
                    }
                    let backoff = Duration::from_secs(1 << (attempt - 1).min(5));
                    tracing::warn!(endpoint, attempt, ?backoff, error = %err, "analytics API request failed; retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl AnalyticsApi for HttpAnalyticsApi {
    async fn industry_analysis(&self, page: u32, page_size: u32) -> Result<Page<IndustrySummary>> {
        validate_page(page, page_size)?;
        self.get_json(
            "industry_analysis",
            &["stock", "industry", "analysis"],
            &[("page", page.to_string()), ("page_size", page_size.to_string())],
        )
        .await
    }

    async fn industry_trend(&self, industry: &str) -> Result<IndustryTrend> {
        let industry = validate_name("industry", industry)?;
        self.get_json(
            "industry_trend",
            &["stock", "industry", "trend"],
            &[("industry", industry.to_string())],
        )
        .await
    }

    async fn stock_hierarchy(&self) -> Result<Vec<HierarchyIndustry>> {
        self.get_json(
            "stock_hierarchy",
            &["stock", "industry", "stock-hierarchy"],
            &[],
        )
        .await
    }

    async fn analyze_industry(&self, industry: &str, days: u32) -> Result<IndustryAnalysis> {
        let industry = validate_name("industry", industry)?;
        validate_days(days)?;
        self.get_json(
            "analyze_industry",
            &["stock", "industry", "analyze"],
            &[("industry", industry.to_string()), ("days", days.to_string())],
        )
        .await
    }

    async fn analyze_industry_llm(
        &self,
        industry: &str,
        days: u32,
    ) -> Result<IndustryLlmAnalysis> {
        let industry = validate_name("industry", industry)?;
        validate_days(days)?;
        self.get_json(
            "analyze_industry_llm",
            &["stock", "industry", "analyze", "llm"],
            &[("industry", industry.to_string()), ("days", days.to_string())],
        )
        .await
    }

    async fn analyze_all_industries_llm(&self, days: u32) -> Result<AllIndustriesLlmAnalysis> {
        validate_days(days)?;
        self.get_json(
            "analyze_all_industries_llm",
            &["stock", "industry", "analyze", "all", "llm"],
            &[("days", days.to_string())],
        )
        .await
    }

    async fn stock_list(&self, page: u32, page_size: u32) -> Result<Page<StockListItem>> {
        validate_page(page, page_size)?;
        self.get_json(
            "stock_list",
            &["stock", "list"],
            &[("page", page.to_string()), ("page_size", page_size.to_string())],
        )
        .await
    }

    async fn stock_detail(&self, stock_code: &str) -> Result<StockDetail> {
        let stock_code = validate_name("stock_code", stock_code)?;
        self.get_json("stock_detail", &["stock", "detail", stock_code], &[])
            .await
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, text: &str) -> Result<T> {
    serde_json::from_str::<T>(text).with_context(|| {
        format!(
            "unexpected analytics API payload ({endpoint}): {}",
            excerpt(text, BODY_EXCERPT_CHARS)
        )
    })
}

fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
