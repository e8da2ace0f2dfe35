use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use sectorboard_core::analytics::IndustryFilter;
use sectorboard_core::chart::{hotmap_treemap_options, trend_line_options};
use sectorboard_core::client::{validate_days, AnalyticsApi, ApiStatusError, InvalidParams, DEFAULT_DAYS};
use sectorboard_core::dashboard::{self, HotmapTab, TrendQuery, TrendTab};
use sectorboard_core::domain::hotmap::HierarchyIndustry;
use sectorboard_core::domain::industry::{IndustrySummary, IndustryTrend};
use sectorboard_core::domain::report::{
    AllIndustriesLlmAnalysis, IndustryAnalysis, IndustryLlmAnalysis,
};
use sectorboard_core::domain::stock::{StockDetail, StockListItem};
use sectorboard_core::domain::Page;

use crate::pages;

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn AnalyticsApi>,
    pub api_base_url: Option<String>,
    pub page_size: u32,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/trend", get(trend_page))
        .route("/docs", get(docs_page))
        .route("/hotmap", get(hotmap_page))
        .route("/api/trend", get(trend_json))
        .route("/api/hotmap", get(hotmap_json))
        .route("/api/industry/report", get(industry_report))
        .route("/api/market/report", get(market_report))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn index() -> Redirect {
    Redirect::to("/trend")
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Default, Deserialize)]
pub struct TrendParams {
    page: Option<u32>,
    page_size: Option<u32>,
    filter: Option<String>,
    days: Option<u32>,
}

impl AppState {
    fn trend_query(&self, params: &TrendParams) -> Result<TrendQuery, String> {
        let filter = match params.filter.as_deref() {
            Some(raw) => raw.parse::<IndustryFilter>().map_err(|e| e.to_string())?,
            None => IndustryFilter::All,
        };
        let window_days = params.days.unwrap_or(DEFAULT_DAYS);
        validate_days(window_days).map_err(|e| format!("Invalid trend window: {e:#}"))?;
        Ok(TrendQuery {
            page: params.page.unwrap_or(1),
            page_size: params.page_size.unwrap_or(self.page_size),
            filter,
            window_days,
        })
    }

    async fn trend_tab(&self, params: Result<Query<TrendParams>, QueryRejection>) -> (TrendTab, u32) {
        let params = match params {
            Ok(Query(params)) => params,
            Err(rejection) => {
                tracing::warn!(error = %rejection.body_text(), "trend query rejected");
                let message = format!("Invalid query: {}", rejection.body_text());
                return (TrendTab::failed(&TrendQuery::new(self.page_size), message), DEFAULT_DAYS);
            }
        };
        match self.trend_query(&params) {
            Ok(query) => (
                dashboard::load_trend_tab(self.api.as_ref(), &query).await,
                query.window_days,
            ),
            Err(message) => {
                let query = TrendQuery {
                    page: params.page.unwrap_or(1),
                    page_size: params.page_size.unwrap_or(self.page_size),
                    ..TrendQuery::new(self.page_size)
                };
                (TrendTab::failed(&query, message), DEFAULT_DAYS)
            }
        }
    }
}

async fn trend_page(
    State(state): State<AppState>,
    params: Result<Query<TrendParams>, QueryRejection>,
) -> Html<String> {
    let (tab, days) = state.trend_tab(params).await;
    Html(pages::render_trend_page(&tab, days))
}

async fn docs_page(State(state): State<AppState>) -> Html<String> {
    Html(pages::render_docs_page(state.api_base_url.as_deref()))
}

async fn hotmap_page(State(state): State<AppState>) -> Html<String> {
    let tab = dashboard::load_hotmap_tab(state.api.as_ref()).await;
    Html(pages::render_hotmap_page(&tab))
}

#[derive(Debug, Serialize)]
struct TrendPayload {
    tab: TrendTab,
    options: Value,
}

async fn trend_json(
    State(state): State<AppState>,
    params: Result<Query<TrendParams>, QueryRejection>,
) -> Json<TrendPayload> {
    let (tab, _) = state.trend_tab(params).await;
    let options = trend_line_options(&tab.chart);
    Json(TrendPayload { tab, options })
}

#[derive(Debug, Serialize)]
struct HotmapPayload {
    tab: HotmapTab,
    options: Value,
}

async fn hotmap_json(State(state): State<AppState>) -> Json<HotmapPayload> {
    let tab = dashboard::load_hotmap_tab(state.api.as_ref()).await;
    let options = hotmap_treemap_options(&tab.nodes);
    Json(HotmapPayload { tab, options })
}

#[derive(Debug, Deserialize)]
pub struct IndustryReportParams {
    #[serde(default)]
    industry: String,
    days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct MarketReportParams {
    days: Option<u32>,
}

async fn industry_report(
    State(state): State<AppState>,
    Query(params): Query<IndustryReportParams>,
) -> Result<Json<IndustryLlmAnalysis>, ApiFailure> {
    let days = params.days.unwrap_or(DEFAULT_DAYS);
    let report = dashboard::load_industry_report(state.api.as_ref(), &params.industry, days).await?;
    Ok(Json(report))
}

async fn market_report(
    State(state): State<AppState>,
    Query(params): Query<MarketReportParams>,
) -> Result<Json<AllIndustriesLlmAnalysis>, ApiFailure> {
    let days = params.days.unwrap_or(DEFAULT_DAYS);
    let report = dashboard::load_market_report(state.api.as_ref(), days).await?;
    Ok(Json(report))
}

/// The analytics API is not configured; every call fails the same way.
#[derive(Debug, Clone, Copy)]
pub struct Unconfigured;

#[derive(Debug)]
struct NotConfigured;

impl std::fmt::Display for NotConfigured {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ANALYTICS_API_BASE_URL is not configured")
    }
}

impl std::error::Error for NotConfigured {}

#[async_trait::async_trait]
impl AnalyticsApi for Unconfigured {
    async fn industry_analysis(
        &self,
        _page: u32,
        _page_size: u32,
    ) -> anyhow::Result<Page<IndustrySummary>> {
        Err(NotConfigured.into())
    }

    async fn industry_trend(
        &self,
        _industry: &str,
    ) -> anyhow::Result<IndustryTrend> {
        Err(NotConfigured.into())
    }

    async fn stock_hierarchy(&self) -> anyhow::Result<Vec<HierarchyIndustry>> {
        Err(NotConfigured.into())
    }

    async fn analyze_industry(
        &self,
        _industry: &str,
        _days: u32,
    ) -> anyhow::Result<IndustryAnalysis> {
        Err(NotConfigured.into())
    }

    async fn analyze_industry_llm(
        &self,
        _industry: &str,
        _days: u32,
    ) -> anyhow::Result<IndustryLlmAnalysis> {
        Err(NotConfigured.into())
    }

    async fn analyze_all_industries_llm(
        &self,
        _days: u32,
    ) -> anyhow::Result<AllIndustriesLlmAnalysis> {
        Err(NotConfigured.into())
    }

    async fn stock_list(
        &self,
        _page: u32,
        _page_size: u32,
    ) -> anyhow::Result<Page<StockListItem>> {
        Err(NotConfigured.into())
    }

    async fn stock_detail(&self, _stock_code: &str) -> anyhow::Result<StockDetail> {
        Err(NotConfigured.into())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub struct ApiFailure(anyhow::Error);

impl From<anyhow::Error> for ApiFailure {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

fn status_for(err: &anyhow::Error) -> StatusCode {
    if err.downcast_ref::<InvalidParams>().is_some() {
        return StatusCode::BAD_REQUEST;
    }
    if err.downcast_ref::<NotConfigured>().is_some() {
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    match err.downcast_ref::<ApiStatusError>() {
        Some(e) if e.is_not_found() => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            sentry_anyhow::capture_anyhow(&self.0);
            tracing::error!(%status, error = %self.0, "report request failed");
        } else {
            tracing::warn!(%status, error = %self.0, "report request rejected");
        }
        (
            status,
            Json(ErrorBody {
                error: format!("{:#}", self.0),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    struct StubApi;

    fn summary(name: &str, avg_change: f64) -> IndustrySummary {
        IndustrySummary {
            industry: name.to_string(),
            stock_count: 1,
            avg_change,
            avg_volatility: 0.8,
        }
    }

    #[async_trait::async_trait]
    impl AnalyticsApi for StubApi {
        async fn industry_analysis(
            &self,
            page: u32,
            page_size: u32,
        ) -> anyhow::Result<Page<IndustrySummary>> {
            sectorboard_core::client::validate_page(page, page_size)?;
            Ok(Page {
                total: 2,
                page,
                page_size,
                data: vec![summary("Banking", 0.4), summary("Coal", -0.6)],
            })
        }

        async fn industry_trend(&self, industry: &str) -> anyhow::Result<IndustryTrend> {
            let points = serde_json::from_value(serde_json::json!([
                {"date": "2025-01-02", "close": 5.0, "change_percent": 0.4}
            ]))?;
            Ok(IndustryTrend {
                industry: industry.to_string(),
                stock_count: 1,
                stock_trends: BTreeMap::from([("000001".to_string(), points)]),
            })
        }

        async fn stock_hierarchy(&self) -> anyhow::Result<Vec<HierarchyIndustry>> {
            Err(ApiStatusError::new("stock_hierarchy", StatusCode::NOT_FOUND, String::new()).into())
        }

        async fn analyze_industry(
            &self,
            industry: &str,
            days: u32,
        ) -> anyhow::Result<IndustryAnalysis> {
            dashboard::analyze_from_trend(self, industry, days).await
        }

        async fn analyze_industry_llm(
            &self,
            industry: &str,
            days: u32,
        ) -> anyhow::Result<IndustryLlmAnalysis> {
            sectorboard_core::client::validate_days(days)?;
            if industry == "Unknown" {
                return Err(ApiStatusError::new(
                    "analyze_industry_llm",
                    StatusCode::NOT_FOUND,
                    r#"{"detail": "unknown industry"}"#.to_string(),
                )
                .into());
            }
            Ok(IndustryLlmAnalysis {
                industry: industry.to_string(),
                period: format!("{days} days"),
                stock_count: 1,
                avg_change: 0.4,
                volatility: 0.0,
                positive_days: 1,
                negative_days: 0,
                positive_rate: "100.00%".to_string(),
                llm_analysis: "Steady.".to_string(),
            })
        }

        async fn analyze_all_industries_llm(
            &self,
            _days: u32,
        ) -> anyhow::Result<AllIndustriesLlmAnalysis> {
            anyhow::bail!("model backend timed out")
        }

        async fn stock_list(
            &self,
            page: u32,
            page_size: u32,
        ) -> anyhow::Result<Page<StockListItem>> {
            Ok(Page::empty(page, page_size))
        }

        async fn stock_detail(&self, stock_code: &str) -> anyhow::Result<StockDetail> {
            anyhow::bail!("unknown stock {stock_code}")
        }
    }

    fn state(api: Arc<dyn AnalyticsApi>) -> AppState {
        AppState {
            api,
            api_base_url: Some("http://analytics.test/api/v1".to_string()),
            page_size: 10,
        }
    }

    fn params(filter: Option<&str>) -> TrendParams {
        TrendParams {
            filter: filter.map(str::to_string),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn trend_page_renders_rows_and_chart() {
        let Html(html) = trend_page(State(state(Arc::new(StubApi))), Ok(Query(params(None)))).await;
        assert_eq!(html.matches("<tr><td>").count(), 4); // 2 summary rows + 2 charted rows
        assert!(html.contains("echarts.init"));
        assert!(!html.contains(r#"class="error""#));
    }

    #[tokio::test]
    async fn unknown_filter_is_reported_on_page() {
        let Html(html) =
            trend_page(State(state(Arc::new(StubApi))), Ok(Query(params(Some("median"))))).await;
        assert!(html.contains("unknown industry filter: median"));
    }

    fn query_from(uri: &str) -> Result<Query<TrendParams>, QueryRejection> {
        let uri: axum::http::Uri = uri.parse().unwrap();
        Query::try_from_uri(&uri)
    }

    #[tokio::test]
    async fn malformed_query_renders_page_with_banner() {
        let Html(html) = trend_page(State(state(Arc::new(StubApi))), query_from("/trend?page=abc")).await;
        assert!(html.contains(r#"<div class="error">Invalid query: "#));
        assert!(html.contains("No industries to show."));
        assert!(html.contains(r#"<a href="/trend" class="active">"#));

        let Json(payload) =
            trend_json(State(state(Arc::new(StubApi))), query_from("/api/trend?days=-1")).await;
        assert!(payload.tab.rows.is_empty());
        assert!(payload.tab.errors[0].starts_with("Invalid query: "));
    }

    #[tokio::test]
    async fn out_of_range_days_is_reported_on_page() {
        let Html(html) =
            trend_page(State(state(Arc::new(StubApi))), query_from("/trend?days=0")).await;
        assert!(html.contains("Invalid trend window: invalid parameters: days must be 1..=365"));
        assert!(!html.contains("data-industry-report="));
        assert!(html.contains(r#"data-market-report="90""#));
    }

    #[tokio::test]
    async fn trend_json_applies_filter() {
        let Json(payload) =
            trend_json(State(state(Arc::new(StubApi))), Ok(Query(params(Some("bottom3"))))).await;
        assert_eq!(payload.tab.rows.len(), 2);
        assert_eq!(payload.tab.chart.series[0].name, "Coal");
        assert_eq!(payload.options["series"][0]["name"], "Coal");
    }

    #[tokio::test]
    async fn hotmap_falls_back_to_sample_data() {
        let Json(payload) = hotmap_json(State(state(Arc::new(StubApi)))).await;
        assert_eq!(
            payload.tab.source,
            sectorboard_core::analytics::HotmapSource::Mock
        );
        assert!(payload.tab.error.is_some());
        assert_eq!(payload.options["series"][0]["type"], "treemap");
    }

    #[tokio::test]
    async fn unconfigured_api_degrades_pages() {
        let s = state(Arc::new(Unconfigured));
        let Html(html) = trend_page(State(s.clone()), Ok(Query(params(None)))).await;
        assert!(html.contains("ANALYTICS_API_BASE_URL is not configured"));

        let Html(html) = hotmap_page(State(s.clone())).await;
        assert!(html.contains("Showing sample data."));

        let res = market_report(State(s), Query(MarketReportParams { days: None }))
            .await
            .map(|_| ())
            .unwrap_err()
            .into_response();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn report_errors_map_to_status_codes() {
        let s = state(Arc::new(StubApi));

        let ok = industry_report(
            State(s.clone()),
            Query(IndustryReportParams {
                industry: "Banking".to_string(),
                days: Some(30),
            }),
        )
        .await
        .map(|Json(r)| r)
        .map_err(|_| ())
        .unwrap();
        assert_eq!(ok.period, "30 days");

        let not_found = industry_report(
            State(s.clone()),
            Query(IndustryReportParams {
                industry: "Unknown".to_string(),
                days: None,
            }),
        )
        .await
        .map(|_| ())
        .unwrap_err()
        .into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let bad_days = industry_report(
            State(s.clone()),
            Query(IndustryReportParams {
                industry: "Banking".to_string(),
                days: Some(0),
            }),
        )
        .await
        .map(|_| ())
        .unwrap_err()
        .into_response();
        assert_eq!(bad_days.status(), StatusCode::BAD_REQUEST);

        let upstream = market_report(State(s), Query(MarketReportParams { days: Some(30) }))
            .await
            .map(|_| ())
            .unwrap_err()
            .into_response();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
    }
}
