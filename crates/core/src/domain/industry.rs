use crate::domain::de;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of `/stock/industry/analysis`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustrySummary {
    #[serde(default, alias = "name", deserialize_with = "de::string_or_default")]
    pub industry: String,
    #[serde(default, deserialize_with = "de::count")]
    pub stock_count: u64,
    #[serde(
        default,
        alias = "avg_change_percent",
        deserialize_with = "de::f64_or_zero"
    )]
    pub avg_change: f64,
    #[serde(default, alias = "volatility", deserialize_with = "de::f64_or_zero")]
    pub avg_volatility: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    #[serde(default, alias = "trade_date", deserialize_with = "de::date_string")]
    pub date: String,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub close: Option<f64>,
    #[serde(
        default,
        alias = "pct_chg",
        alias = "changePercent",
        deserialize_with = "de::opt_f64"
    )]
    pub change_percent: Option<f64>,
}

/// Response of `/stock/industry/trend`: per-stock daily series keyed by stock code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryTrend {
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub industry: String,
    #[serde(default, deserialize_with = "de::count")]
    pub stock_count: u64,
    #[serde(default, deserialize_with = "de::vec_map_or_default")]
    pub stock_trends: BTreeMap<String, Vec<TrendPoint>>,
}
