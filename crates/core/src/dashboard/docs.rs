//! Reference for the analytics endpoints, shown on the documentation tab.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct EndpointDoc {
    pub method: &'static str,
    pub path: &'static str,
    pub params: &'static [(&'static str, &'static str)],
    pub description: &'static str,
    pub example: &'static str,
}

pub const ENDPOINTS: &[EndpointDoc] = &[
    EndpointDoc {
        method: "GET",
        path: "/stock/industry/analysis",
        params: &[
            ("page", "page number, starting at 1 (default 1)"),
            ("page_size", "rows per page, 1-100 (default 20)"),
        ],
        description: "Industry averages sorted by average change, paginated.",
        example: r#"{
  "total": 31,
  "page": 1,
  "page_size": 10,
  "data": [
    {"industry": "Semiconductors", "stock_count": 14, "avg_change": 0.83, "avg_volatility": 2.41}
  ]
}"#,
    },
    EndpointDoc {
        method: "GET",
        path: "/stock/industry/trend",
        params: &[("industry", "industry name (required)")],
        description: "Daily close and change percent of every stock in one industry.",
        example: r#"{
  "industry": "Banking",
  "stock_count": 2,
  "stock_trends": {
    "600000": [{"date": "2025-01-02", "close": 10.12, "change_percent": 0.6}],
    "601398": [{"date": "2025-01-02", "close": 6.45, "change_percent": -0.3}]
  }
}"#,
    },
    EndpointDoc {
        method: "GET",
        path: "/stock/industry/stock-hierarchy",
        params: &[],
        description: "Industries with their stocks, sized by market cap (100M units) for the hotmap.",
        example: r#"[
  {
    "name": "Banking",
    "value": 65300.0,
    "increase": 0.42,
    "stock_count": 2,
    "children": [
      {"name": "ICBC", "value": 21500.0, "increase": 0.35, "pe_ttm": 5.6, "pb": 0.6, "float_market_cap": 16400.0}
    ]
  }
]"#,
    },
    EndpointDoc {
        method: "GET",
        path: "/stock/industry/analyze",
        params: &[
            ("industry", "industry name (required)"),
            ("days", "trailing window, 1-365 (default 90)"),
        ],
        description: "Statistical summary of one industry over the trailing window.",
        example: r#"{
  "industry": "Banking",
  "period": "90 days",
  "stock_count": 2,
  "avg_change": 0.12,
  "volatility": 0.9,
  "positive_days": 34,
  "negative_days": 27,
  "positive_rate": "55.74%",
  "daily_performance": [{"date": "2025-01-02", "change": 0.15}],
  "summary": "..."
}"#,
    },
    EndpointDoc {
        method: "GET",
        path: "/stock/industry/analyze/llm",
        params: &[
            ("industry", "industry name (required)"),
            ("days", "trailing window, 1-365 (default 90)"),
        ],
        description: "The industry summary plus an LLM-written report.",
        example: r#"{
  "industry": "Banking",
  "period": "90 days",
  "stock_count": 2,
  "avg_change": 0.12,
  "volatility": 0.9,
  "positive_days": 34,
  "negative_days": 27,
  "positive_rate": "55.74%",
  "llm_analysis": "..."
}"#,
    },
    EndpointDoc {
        method: "GET",
        path: "/stock/industry/analyze/all/llm",
        params: &[("days", "trailing window, 1-365 (default 90)")],
        description: "Every industry's averages plus an LLM-written market overview.",
        example: r#"{
  "period": "90 days",
  "industry_count": 31,
  "industries_data": [{"industry": "Banking", "stock_count": 2, "avg_change": 0.12, "avg_volatility": 0.9}],
  "llm_analysis": "..."
}"#,
    },
    EndpointDoc {
        method: "GET",
        path: "/stock/list",
        params: &[
            ("page", "page number, starting at 1 (default 1)"),
            ("page_size", "rows per page, 1-100 (default 20)"),
        ],
        description: "Index constituents with their industry, paginated.",
        example: r#"{
  "total": 300,
  "page": 1,
  "page_size": 20,
  "data": [{"stock_code": "600000", "stock_name": "SPD Bank", "industry": "Banking"}]
}"#,
    },
    EndpointDoc {
        method: "GET",
        path: "/stock/detail/{stock_code}",
        params: &[("stock_code", "exchange stock code (path)")],
        description: "Basic information and daily bars of one stock.",
        example: r#"{
  "basic_info": {"stock_code": "600000", "stock_name": "SPD Bank", "industry": "Banking"},
  "historical_data": [
    {"date": "2025-01-02", "open": 10.0, "close": 10.12, "high": 10.2, "low": 9.95,
     "volume": 325000, "amount": 328000000.0, "change_percent": 0.6}
  ]
}"#,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hotmap::HierarchyIndustry;
    use crate::domain::industry::{IndustrySummary, IndustryTrend};
    use crate::domain::report::{AllIndustriesLlmAnalysis, IndustryAnalysis, IndustryLlmAnalysis};
    use crate::domain::stock::{StockDetail, StockListItem};
    use crate::domain::Page;

    fn example(path: &str) -> &'static str {
        ENDPOINTS
            .iter()
            .find(|e| e.path == path)
            .map(|e| e.example)
            .unwrap()
    }

    // The documented examples must decode into the types the client uses.
    #[test]
    fn examples_match_client_types() {
        serde_json::from_str::<Page<IndustrySummary>>(example("/stock/industry/analysis")).unwrap();
        serde_json::from_str::<IndustryTrend>(example("/stock/industry/trend")).unwrap();
        serde_json::from_str::<Vec<HierarchyIndustry>>(example("/stock/industry/stock-hierarchy"))
            .unwrap();
        serde_json::from_str::<IndustryAnalysis>(example("/stock/industry/analyze")).unwrap();
        serde_json::from_str::<IndustryLlmAnalysis>(example("/stock/industry/analyze/llm"))
            .unwrap();
        serde_json::from_str::<AllIndustriesLlmAnalysis>(example(
            "/stock/industry/analyze/all/llm",
        ))
        .unwrap();
        serde_json::from_str::<Page<StockListItem>>(example("/stock/list")).unwrap();
        serde_json::from_str::<StockDetail>(example("/stock/detail/{stock_code}")).unwrap();
    }

    #[test]
    fn every_endpoint_is_a_get() {
        assert_eq!(ENDPOINTS.len(), 8);
        assert!(ENDPOINTS.iter().all(|e| e.method == "GET"));
    }
}
