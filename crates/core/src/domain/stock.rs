use crate::domain::de;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockListItem {
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub stock_code: String,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub stock_name: String,
    #[serde(default, deserialize_with = "de::string_or_default")]
    pub industry: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    #[serde(default, deserialize_with = "de::date_string")]
    pub date: String,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub open: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub close: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub high: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub low: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub volume: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub amount: Option<f64>,
    #[serde(default, alias = "pct_chg", deserialize_with = "de::opt_f64")]
    pub change_percent: Option<f64>,
}

/// `basic_info` is passed through untyped; its keys vary with the upstream data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockDetail {
    #[serde(default)]
    pub basic_info: BTreeMap<String, Value>,
    #[serde(default, deserialize_with = "de::vec_or_default")]
    pub historical_data: Vec<DailyBar>,
}

impl StockDetail {
    pub fn basic_str(&self, key: &str) -> Option<&str> {
        self.basic_info.get(key).and_then(Value::as_str)
    }
}
