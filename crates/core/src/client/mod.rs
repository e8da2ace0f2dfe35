pub mod error;
pub mod http;

pub use error::{ApiStatusError, InvalidParams};
pub use http::HttpAnalyticsApi;

use crate::domain::hotmap::HierarchyIndustry;
use crate::domain::industry::{IndustrySummary, IndustryTrend};
use crate::domain::report::{AllIndustriesLlmAnalysis, IndustryAnalysis, IndustryLlmAnalysis};
use crate::domain::stock::{StockDetail, StockListItem};
use crate::domain::Page;
use anyhow::Result;

pub const MAX_PAGE_SIZE: u32 = 100;
pub const MAX_DAYS: u32 = 365;
pub const DEFAULT_DAYS: u32 = 90;

/// Read-only view of the stock/industry analytics service.
#[async_trait::async_trait]
pub trait AnalyticsApi: Send + Sync {
    async fn industry_analysis(&self, page: u32, page_size: u32) -> Result<Page<IndustrySummary>>;

    async fn industry_trend(&self, industry: &str) -> Result<IndustryTrend>;

    async fn stock_hierarchy(&self) -> Result<Vec<HierarchyIndustry>>;

    async fn analyze_industry(&self, industry: &str, days: u32) -> Result<IndustryAnalysis>;

    async fn analyze_industry_llm(&self, industry: &str, days: u32)
        -> Result<IndustryLlmAnalysis>;

    async fn analyze_all_industries_llm(&self, days: u32) -> Result<AllIndustriesLlmAnalysis>;

    async fn stock_list(&self, page: u32, page_size: u32) -> Result<Page<StockListItem>>;

    async fn stock_detail(&self, stock_code: &str) -> Result<StockDetail>;
}

pub fn validate_page(page: u32, page_size: u32) -> Result<()> {
    if page < 1 {
        return Err(InvalidParams(format!("page must be >= 1 (got {page})")).into());
    }
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(InvalidParams(format!(
            "page_size must be 1..={MAX_PAGE_SIZE} (got {page_size})"
        ))
        .into());
    }
    Ok(())
}

pub fn validate_days(days: u32) -> Result<()> {
    if !(1..=MAX_DAYS).contains(&days) {
        return Err(InvalidParams(format!("days must be 1..={MAX_DAYS} (got {days})")).into());
    }
    Ok(())
}

pub fn validate_name<'a>(what: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InvalidParams(format!("{what} must be non-empty")).into());
    }
    Ok(trimmed)
}
