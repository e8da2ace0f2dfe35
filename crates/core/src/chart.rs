//! ECharts option documents for the dashboard's charts.

use crate::analytics::TrendChart;
use crate::domain::hotmap::HotmapNode;
use serde_json::{json, Value};

// Gains are red and losses green, as on mainland exchanges.
const GAIN_COLOR: &str = "#d94e5d";
const FLAT_COLOR: &str = "#aaaaaa";
const LOSS_COLOR: &str = "#2e9d5b";

/// Visual values beyond this magnitude saturate the colour scale (±10% change).
const VISUAL_RANGE: f64 = 100.0;

pub fn trend_line_options(chart: &TrendChart) -> Value {
    let series: Vec<Value> = chart
        .series
        .iter()
        .map(|s| {
            json!({
                "name": s.name,
                "type": "line",
                "showSymbol": false,
                "connectNulls": true,
                "data": s.data,
            })
        })
        .collect();

    json!({
        "title": {"text": "Industry daily average change"},
        "tooltip": {"trigger": "axis"},
        "legend": {
            "type": "scroll",
            "top": 28,
            "data": chart.series.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
        },
        "grid": {"left": 48, "right": 24, "top": 72, "bottom": 56},
        "xAxis": {"type": "category", "boundaryGap": false, "data": chart.dates},
        "yAxis": {"type": "value", "axisLabel": {"formatter": "{value}%"}},
        "dataZoom": [{"type": "inside"}, {"type": "slider"}],
        "series": series,
    })
}

pub fn hotmap_treemap_options(nodes: &[HotmapNode]) -> Value {
    json!({
        "title": {"text": "Market hotmap"},
        "tooltip": {},
        "visualMap": {
            "type": "continuous",
            "show": false,
            "dimension": 3,
            "min": -VISUAL_RANGE,
            "max": VISUAL_RANGE,
            "inRange": {"color": [LOSS_COLOR, FLAT_COLOR, GAIN_COLOR]},
        },
        "series": [{
            "name": "Market",
            "type": "treemap",
            "visualDimension": 3,
            "leafDepth": 1,
            "roam": false,
            "label": {"show": true, "formatter": "{b}"},
            "upperLabel": {"show": true, "height": 24},
            "levels": [
                {"itemStyle": {"borderColor": "#333", "borderWidth": 2, "gapWidth": 2}},
                {"itemStyle": {"borderColor": "#555", "borderWidth": 1, "gapWidth": 1}},
            ],
            "data": nodes,
        }],
    })
}

/// Plain-text summary line for a node, used by the terminal views.
pub fn describe_node(node: &HotmapNode) -> String {
    format!(
        "{}: market cap {:.1} (100M), change {:+.2}%",
        node.name,
        node.market_cap(),
        node.change_percent()
    )
}
