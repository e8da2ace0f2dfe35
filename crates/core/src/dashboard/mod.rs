//! Tab loaders: turn API results into view models the front ends render as-is.
//!
//! Loaders for the trend and hotmap tabs never fail. A failed request becomes a message in the
//! tab and the affected data degrades to empty lists or the sample hotmap.

pub mod docs;

use crate::analytics::{
    daily_average_change, hotmap_or_mock, trailing_window, HotmapData, IndustryFilter, TrendChart,
    TrendStats,
};
use crate::client::{validate_days, AnalyticsApi, DEFAULT_DAYS};
use crate::domain::industry::IndustrySummary;
use crate::domain::report::{AllIndustriesLlmAnalysis, IndustryAnalysis, IndustryLlmAnalysis};
use anyhow::Context;
use serde::{Deserialize, Serialize};

pub type HotmapTab = HotmapData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendQuery {
    pub page: u32,
    pub page_size: u32,
    pub filter: IndustryFilter,
    /// Trailing window for the per-industry statistics.
    pub window_days: u32,
}

impl TrendQuery {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size,
            filter: IndustryFilter::All,
            window_days: DEFAULT_DAYS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u32,
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

impl Pagination {
    pub fn new(page: u32, page_size: u32, total: u64) -> Self {
        let per_page = u64::from(page_size.max(1));
        let total_pages = total.div_ceil(per_page).clamp(1, u64::from(u32::MAX)) as u32;
        let page = page.max(1);
        Self {
            page,
            page_size,
            total,
            total_pages,
            prev: (page > 1).then(|| page - 1),
            next: (page < total_pages).then(|| page + 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartedIndustry {
    pub industry: String,
    pub stock_count: u64,
    pub stats: TrendStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendTab {
    pub pagination: Pagination,
    pub filter: IndustryFilter,
    pub rows: Vec<IndustrySummary>,
    pub charted: Vec<ChartedIndustry>,
    pub chart: TrendChart,
    pub errors: Vec<String>,
}

impl TrendTab {
    /// An empty tab that only carries `message`.
    pub fn failed(query: &TrendQuery, message: String) -> Self {
        Self {
            pagination: Pagination::new(query.page, query.page_size, 0),
            filter: query.filter,
            rows: Vec::new(),
            charted: Vec::new(),
            chart: TrendChart::default(),
            errors: vec![message],
        }
    }
}

/// Loads one page of industry summaries and charts the industries selected by the filter.
///
/// Trend requests for the charted industries run concurrently; an industry whose trend fails is
/// left out of the chart and reported in `errors`.
pub async fn load_trend_tab<A>(api: &A, query: &TrendQuery) -> TrendTab
where
    A: AnalyticsApi + ?Sized,
{
    if let Err(err) = validate_days(query.window_days) {
        tracing::warn!(window_days = query.window_days, error = %err, "trend window rejected");
        return TrendTab::failed(query, format!("Invalid trend window: {err:#}"));
    }

    let page = match api.industry_analysis(query.page, query.page_size).await {
        Ok(page) => page,
        Err(err) => {
            tracing::error!(page = query.page, page_size = query.page_size, error = %err, "industry analysis fetch failed");
            return TrendTab::failed(query, format!("Failed to load industry analysis: {err:#}"));
        }
    };

    let mut errors = Vec::new();
    let pagination = Pagination::new(query.page, query.page_size, page.total);
    let selected = query.filter.apply(&page.data);

    let fetches = selected.iter().map(|summary| async move {
        (summary, api.industry_trend(&summary.industry).await)
    });
    let results = futures::future::join_all(fetches).await;

    let mut charted = Vec::with_capacity(results.len());
    let mut series = Vec::with_capacity(results.len());
    for (summary, result) in results {
        match result {
            Ok(trend) => {
                let daily = daily_average_change(&trend);
                let stock_count = if trend.stock_count > 0 {
                    trend.stock_count
                } else {
                    trend.stock_trends.len() as u64
                };
                charted.push(ChartedIndustry {
                    industry: summary.industry.clone(),
                    stock_count,
                    stats: TrendStats::compute(
                        trailing_window(&trend, &daily, query.window_days as usize),
                        query.window_days as usize,
                    ),
                });
                series.push((summary.industry.clone(), daily));
            }
            Err(err) => {
                tracing::warn!(industry = %summary.industry, error = %err, "industry trend fetch failed");
                errors.push(format!(
                    "Failed to load trend for {}: {err:#}",
                    summary.industry
                ));
            }
        }
    }

    tracing::info!(
        page = pagination.page,
        rows = page.data.len(),
        charted = charted.len(),
        filter = %query.filter,
        "trend tab loaded"
    );

    TrendTab {
        pagination,
        filter: query.filter,
        rows: page.data,
        charted,
        chart: TrendChart::from_daily(series),
        errors,
    }
}

pub async fn load_hotmap_tab<A>(api: &A) -> HotmapTab
where
    A: AnalyticsApi + ?Sized,
{
    let data = hotmap_or_mock(api.stock_hierarchy().await);
    tracing::info!(industries = data.nodes.len(), source = ?data.source, "hotmap tab loaded");
    data
}

pub async fn load_industry_report<A>(
    api: &A,
    industry: &str,
    days: u32,
) -> anyhow::Result<IndustryLlmAnalysis>
where
    A: AnalyticsApi + ?Sized,
{
    api.analyze_industry_llm(industry, days)
        .await
        .with_context(|| format!("industry report for {} failed", industry.trim()))
}

pub async fn load_market_report<A>(api: &A, days: u32) -> anyhow::Result<AllIndustriesLlmAnalysis>
where
    A: AnalyticsApi + ?Sized,
{
    api.analyze_all_industries_llm(days)
        .await
        .context("market report failed")
}

/// Recomputes the industry analysis locally from its raw trend instead of asking the backend.
pub async fn analyze_from_trend<A>(
    api: &A,
    industry: &str,
    days: u32,
) -> anyhow::Result<IndustryAnalysis>
where
    A: AnalyticsApi + ?Sized,
{
    validate_days(days)?;
    let trend = api
        .industry_trend(industry)
        .await
        .with_context(|| format!("trend for {} failed", industry.trim()))?;
    anyhow::ensure!(
        !trend.stock_trends.is_empty(),
        "no trend data for {}",
        industry.trim()
    );

    let daily = daily_average_change(&trend);
    let stock_count = trend.stock_trends.len() as u64;
    let name = if trend.industry.is_empty() {
        industry.trim()
    } else {
        trend.industry.as_str()
    };
    let recent = trailing_window(&trend, &daily, days as usize);
    Ok(TrendStats::compute(recent, days as usize).into_analysis(name, stock_count, recent))
}
