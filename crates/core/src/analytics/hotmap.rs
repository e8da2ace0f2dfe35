use crate::domain::hotmap::{HierarchyIndustry, HierarchyStock, HotmapNode};
use serde::Serialize;

/// Multiplier from change percent to the colour dimension of a treemap node.
pub const VISUAL_SCALE: f64 = 10.0;

pub fn visual_value(change_percent: f64) -> f64 {
    change_percent * VISUAL_SCALE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HotmapSource {
    Live,
    Mock,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotmapData {
    pub nodes: Vec<HotmapNode>,
    pub source: HotmapSource,
    pub error: Option<String>,
}

/// Industries and their stocks, largest market cap first.
///
/// Industry nodes use the stock count as secondary metric, stock nodes use PE (TTM). An industry
/// reported without a market cap falls back to the sum of its stocks.
pub fn build_hotmap(industries: &[HierarchyIndustry]) -> Vec<HotmapNode> {
    let mut nodes: Vec<HotmapNode> = industries
        .iter()
        .filter(|i| !i.name.is_empty())
        .map(industry_node)
        .collect();
    sort_by_market_cap(&mut nodes);
    nodes
}

fn industry_node(industry: &HierarchyIndustry) -> HotmapNode {
    let mut children: Vec<HotmapNode> = industry
        .children
        .iter()
        .filter(|s| !s.name.is_empty())
        .map(stock_node)
        .collect();
    sort_by_market_cap(&mut children);

    let market_cap = if industry.value > 0.0 {
        industry.value
    } else {
        children.iter().map(HotmapNode::market_cap).sum()
    };
    let stock_count = if industry.stock_count > 0 {
        industry.stock_count as f64
    } else {
        children.len() as f64
    };

    HotmapNode {
        name: industry.name.clone(),
        value: [
            market_cap,
            stock_count,
            industry.increase,
            visual_value(industry.increase),
        ],
        children,
    }
}

fn stock_node(stock: &HierarchyStock) -> HotmapNode {
    HotmapNode {
        name: stock.name.clone(),
        value: [
            stock.value,
            stock.pe_ttm.unwrap_or(0.0),
            stock.increase,
            visual_value(stock.increase),
        ],
        children: Vec::new(),
    }
}

fn sort_by_market_cap(nodes: &mut [HotmapNode]) {
    nodes.sort_by(|a, b| b.market_cap().total_cmp(&a.market_cap()));
}

/// Live nodes when the fetch succeeded with at least one industry, otherwise the bundled sample.
pub fn hotmap_or_mock(fetched: anyhow::Result<Vec<HierarchyIndustry>>) -> HotmapData {
    match fetched {
        Ok(industries) => {
            let nodes = build_hotmap(&industries);
            if nodes.is_empty() {
                tracing::warn!("stock hierarchy is empty; using sample hotmap");
                HotmapData {
                    nodes: mock_hotmap(),
                    source: HotmapSource::Mock,
                    error: Some("Market hierarchy returned no industries".to_string()),
                }
            } else {
                HotmapData {
                    nodes,
                    source: HotmapSource::Live,
                    error: None,
                }
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "stock hierarchy fetch failed; using sample hotmap");
            HotmapData {
                nodes: mock_hotmap(),
                source: HotmapSource::Mock,
                error: Some(format!("Failed to load market hierarchy: {err:#}")),
            }
        }
    }
}

// (industry, change %, [(stock, market cap in 100M, change %, PE TTM)])
type MockIndustry = (&'static str, f64, &'static [(&'static str, f64, f64, f64)]);

const MOCK_INDUSTRIES: &[MockIndustry] = &[
    (
        "Banking",
        0.42,
        &[
            ("ICBC", 21500.0, 0.35, 5.6),
            ("China Construction Bank", 18900.0, 0.51, 5.9),
            ("Agricultural Bank", 16200.0, 0.28, 5.4),
            ("China Merchants Bank", 8700.0, 0.77, 6.8),
        ],
    ),
    (
        "Liquor",
        -1.12,
        &[
            ("Kweichow Moutai", 21000.0, -0.86, 24.1),
            ("Wuliangye", 5300.0, -1.65, 15.2),
            ("Luzhou Laojiao", 2200.0, -1.31, 14.7),
        ],
    ),
    (
        "Semiconductors",
        2.35,
        &[
            ("SMIC", 4200.0, 3.12, 88.4),
            ("Naura Technology", 2100.0, 2.48, 45.9),
            ("Will Semiconductor", 1300.0, 1.46, 52.3),
        ],
    ),
    (
        "Power Equipment",
        0.87,
        &[
            ("CATL", 9800.0, 1.05, 21.7),
            ("Sungrow Power", 1500.0, 0.42, 16.3),
            ("LONGi Green Energy", 1400.0, -0.37, 31.2),
        ],
    ),
    (
        "Pharmaceuticals",
        -0.54,
        &[
            ("Hengrui Medicine", 2900.0, -0.64, 55.0),
            ("Mindray Medical", 3100.0, -0.21, 27.8),
            ("WuXi AppTec", 1800.0, -0.95, 16.4),
        ],
    ),
    (
        "Automobiles",
        1.48,
        &[
            ("BYD", 8200.0, 2.03, 22.5),
            ("SAIC Motor", 1300.0, 0.36, 9.1),
            ("Great Wall Motor", 2100.0, 1.21, 13.6),
        ],
    ),
];

/// Bundled sample market used when the hierarchy is unavailable.
pub fn mock_hotmap() -> Vec<HotmapNode> {
    let industries: Vec<HierarchyIndustry> = MOCK_INDUSTRIES
        .iter()
        .map(|(name, increase, stocks)| HierarchyIndustry {
            name: name.to_string(),
            value: 0.0,
            increase: *increase,
            stock_count: stocks.len() as u64,
            children: stocks
                .iter()
                .map(|(stock, cap, change, pe)| HierarchyStock {
                    name: stock.to_string(),
                    value: *cap,
                    increase: *change,
                    pe_ttm: Some(*pe),
                    pb: None,
                    float_market_cap: None,
                })
                .collect(),
        })
        .collect();
    build_hotmap(&industries)
}
