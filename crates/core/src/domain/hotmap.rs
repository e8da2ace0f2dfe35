use crate::domain::de;
use serde::{Deserialize, Serialize};

/// Industry node of `/stock/industry/stock-hierarchy`. `value` is market cap in units of 100M.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyIndustry {
    #[serde(default, alias = "industry", deserialize_with = "de::string_or_default")]
    pub name: String,
    #[serde(default, alias = "market_cap", deserialize_with = "de::f64_or_zero")]
    pub value: f64,
    #[serde(
        default,
        alias = "change_percent",
        alias = "avg_change",
        deserialize_with = "de::f64_or_zero"
    )]
    pub increase: f64,
    #[serde(default, deserialize_with = "de::count")]
    pub stock_count: u64,
    #[serde(default, alias = "stocks", deserialize_with = "de::vec_or_default")]
    pub children: Vec<HierarchyStock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyStock {
    #[serde(default, alias = "stock_name", deserialize_with = "de::string_or_default")]
    pub name: String,
    #[serde(
        default,
        alias = "market_cap",
        alias = "total_market_cap",
        deserialize_with = "de::f64_or_zero"
    )]
    pub value: f64,
    #[serde(
        default,
        alias = "change_percent",
        alias = "pct_chg",
        deserialize_with = "de::f64_or_zero"
    )]
    pub increase: f64,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub pe_ttm: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub pb: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub float_market_cap: Option<f64>,
}

/// Treemap node. `value` is `[market_cap, secondary_metric, change_percent, visual_value]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotmapNode {
    pub name: String,
    pub value: [f64; 4],
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HotmapNode>,
}

impl HotmapNode {
    pub fn market_cap(&self) -> f64 {
        self.value[0]
    }

    pub fn secondary_metric(&self) -> f64 {
        self.value[1]
    }

    pub fn change_percent(&self) -> f64 {
        self.value[2]
    }

    pub fn visual_value(&self) -> f64 {
        self.value[3]
    }
}
