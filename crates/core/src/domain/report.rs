use crate::domain::de;
use crate::domain::industry::IndustrySummary;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyChange {
    #[serde(default, deserialize_with = "de::date_string")]
    pub date: String,
    #[serde(default, deserialize_with = "de::f64_or_zero")]
    pub change: f64,
}

/// Statistical analysis of one industry over a trailing window (`/stock/industry/analyze`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryAnalysis {
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub industry: String,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub period: String,
    #[serde(default, deserialize_with = "de::count")]
    pub stock_count: u64,
    #[serde(default, deserialize_with = "de::f64_or_zero")]
    pub avg_change: f64,
    #[serde(default, deserialize_with = "de::f64_or_zero")]
    pub volatility: f64,
    #[serde(default, deserialize_with = "de::count")]
    pub positive_days: u64,
    #[serde(default, deserialize_with = "de::count")]
    pub negative_days: u64,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub positive_rate: String,
    #[serde(default, deserialize_with = "de::vec_or_default")]
    pub daily_performance: Vec<DailyChange>,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub summary: String,
}

/// LLM-written report for a single industry (`/stock/industry/analyze/llm`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryLlmAnalysis {
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub industry: String,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub period: String,
    #[serde(default, deserialize_with = "de::count")]
    pub stock_count: u64,
    #[serde(default, deserialize_with = "de::f64_or_zero")]
    pub avg_change: f64,
    #[serde(default, deserialize_with = "de::f64_or_zero")]
    pub volatility: f64,
    #[serde(default, deserialize_with = "de::count")]
    pub positive_days: u64,
    #[serde(default, deserialize_with = "de::count")]
    pub negative_days: u64,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub positive_rate: String,
    #[serde(
        default,
        alias = "analysis_report",
        deserialize_with = "de::string_or_default"
    )]
    pub llm_analysis: String,
}

/// LLM-written report across all industries (`/stock/industry/analyze/all/llm`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllIndustriesLlmAnalysis {
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub period: String,
    #[serde(default, deserialize_with = "de::count")]
    pub industry_count: u64,
    #[serde(default, deserialize_with = "de::vec_or_default")]
    pub industries_data: Vec<IndustrySummary>,
    #[serde(
        default,
        alias = "analysis_report",
        deserialize_with = "de::string_or_default"
    )]
    pub llm_analysis: String,
}
