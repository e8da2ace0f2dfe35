//! Plain-text tables for the terminal.

use sectorboard_core::analytics::HotmapSource;
use sectorboard_core::chart::describe_node;
use sectorboard_core::dashboard::{HotmapTab, Pagination, TrendTab};
use sectorboard_core::domain::industry::IndustrySummary;
use sectorboard_core::domain::report::{AllIndustriesLlmAnalysis, IndustryAnalysis, IndustryLlmAnalysis};
use sectorboard_core::domain::stock::{StockDetail, StockListItem};
use sectorboard_core::domain::Page;

pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut out = String::new();
    out.push_str(&pad_line(headers.iter().copied(), &widths));
    out.push_str(&pad_line(dashes.iter().map(String::as_str), &widths));
    for row in rows {
        out.push_str(&pad_line(row.iter().map(String::as_str), &widths));
    }
    out
}

fn pad_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, w)| {
            let pad = w.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    format!("{}\n", padded.join("  ").trim_end())
}

fn pct(v: f64) -> String {
    format!("{v:+.2}%")
}

fn opt_num(v: Option<f64>) -> String {
    v.map(|n| format!("{n:.2}")).unwrap_or_else(|| "-".to_string())
}

fn pagination_line(p: &Pagination) -> String {
    format!("page {} of {} ({} total)\n", p.page, p.total_pages, p.total)
}

pub fn industries(page: &Page<IndustrySummary>) -> String {
    let rows: Vec<Vec<String>> = page
        .data
        .iter()
        .map(|s| {
            vec![
                s.industry.clone(),
                s.stock_count.to_string(),
                pct(s.avg_change),
                format!("{:.2}", s.avg_volatility),
            ]
        })
        .collect();
    let mut out = table(&["Industry", "Stocks", "Avg change", "Avg volatility"], &rows);
    let p = Pagination::new(page.page, page.page_size, page.total);
    out.push_str(&pagination_line(&p));
    out
}

pub fn trend(tab: &TrendTab, last: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("Filter: {}\n", tab.filter.label()));

    let rows: Vec<Vec<String>> = tab
        .charted
        .iter()
        .map(|c| {
            vec![
                c.industry.clone(),
                c.stock_count.to_string(),
                pct(c.stats.avg_change),
                format!("{:.2}", c.stats.volatility),
                c.stats.positive_rate_label(),
                c.stats.sample_days.to_string(),
            ]
        })
        .collect();
    out.push_str(&table(
        &["Industry", "Stocks", "Mean daily", "Volatility", "Up days", "Days"],
        &rows,
    ));

    if !tab.chart.is_empty() && last > 0 {
        let start = tab.chart.dates.len().saturating_sub(last);
        let mut headers = vec!["Date"];
        headers.extend(tab.chart.series.iter().map(|s| s.name.as_str()));
        let rows: Vec<Vec<String>> = (start..tab.chart.dates.len())
            .map(|i| {
                let mut row = vec![tab.chart.dates[i].clone()];
                row.extend(
                    tab.chart
                        .series
                        .iter()
                        .map(|s| s.data[i].map(pct).unwrap_or_else(|| "-".to_string())),
                );
                row
            })
            .collect();
        out.push('\n');
        out.push_str(&table(&headers, &rows));
    }

    out.push_str(&pagination_line(&tab.pagination));
    out
}

pub fn hotmap(tab: &HotmapTab, with_stocks: bool) -> String {
    let mut out = String::new();
    if tab.source == HotmapSource::Mock {
        out.push_str("(sample data)\n");
    }
    for node in &tab.nodes {
        out.push_str(&describe_node(node));
        out.push_str(&format!(", {} stocks\n", node.secondary_metric()));
        if with_stocks {
            for child in &node.children {
                out.push_str(&format!(
                    "  {}, PE {}\n",
                    describe_node(child),
                    opt_num((child.secondary_metric() > 0.0).then(|| child.secondary_metric()))
                ));
            }
        }
    }
    out
}

pub fn analysis(a: &IndustryAnalysis, last: usize) -> String {
    let mut out = format!(
        "{} ({}), {} stocks\nmean change {}, volatility {:.2}, up {} / down {} days ({})\n{}\n",
        a.industry,
        a.period,
        a.stock_count,
        pct(a.avg_change),
        a.volatility,
        a.positive_days,
        a.negative_days,
        a.positive_rate,
        a.summary
    );
    if last > 0 && !a.daily_performance.is_empty() {
        let start = a.daily_performance.len().saturating_sub(last);
        let rows: Vec<Vec<String>> = a.daily_performance[start..]
            .iter()
            .map(|d| vec![d.date.clone(), pct(d.change)])
            .collect();
        out.push('\n');
        out.push_str(&table(&["Date", "Change"], &rows));
    }
    out
}

pub fn industry_report(r: &IndustryLlmAnalysis) -> String {
    format!(
        "{} ({}), {} stocks\nmean change {}, volatility {:.2}, up {} / down {} days ({})\n\n{}\n",
        r.industry,
        r.period,
        r.stock_count,
        pct(r.avg_change),
        r.volatility,
        r.positive_days,
        r.negative_days,
        r.positive_rate,
        r.llm_analysis.trim()
    )
}

pub fn market_report(r: &AllIndustriesLlmAnalysis) -> String {
    let page = Page {
        total: r.industry_count,
        page: 1,
        page_size: r.industries_data.len().max(1) as u32,
        data: r.industries_data.clone(),
    };
    format!(
        "Market overview ({}), {} industries\n\n{}\n{}\n",
        r.period,
        r.industry_count,
        industries(&page),
        r.llm_analysis.trim()
    )
}

pub fn stocks(page: &Page<StockListItem>) -> String {
    let rows: Vec<Vec<String>> = page
        .data
        .iter()
        .map(|s| vec![s.stock_code.clone(), s.stock_name.clone(), s.industry.clone()])
        .collect();
    let mut out = table(&["Code", "Name", "Industry"], &rows);
    let p = Pagination::new(page.page, page.page_size, page.total);
    out.push_str(&pagination_line(&p));
    out
}

pub fn stock(code: &str, d: &StockDetail, last: usize) -> String {
    let name = d.basic_str("stock_name").unwrap_or(code);
    let industry = d.basic_str("industry").unwrap_or("-");
    let mut out = format!("{name} ({code}), {industry}\n");

    let start = d.historical_data.len().saturating_sub(last);
    let rows: Vec<Vec<String>> = d.historical_data[start..]
        .iter()
        .map(|b| {
            vec![
                b.date.clone(),
                opt_num(b.open),
                opt_num(b.close),
                opt_num(b.high),
                opt_num(b.low),
                b.change_percent.map(pct).unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    out.push_str(&table(&["Date", "Open", "Close", "High", "Low", "Change"], &rows));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sectorboard_core::analytics::{mock_hotmap, TrendChart, TrendStats};
    use sectorboard_core::dashboard::ChartedIndustry;
    use sectorboard_core::domain::report::DailyChange;
    use serde_json::json;

    #[test]
    fn table_pads_columns() {
        let out = table(
            &["Name", "N"],
            &[
                vec!["Banking".to_string(), "12".to_string()],
                vec!["Coal".to_string(), "3".to_string()],
            ],
        );
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "Name     N");
        assert_eq!(lines[1], "-------  --");
        assert_eq!(lines[2], "Banking  12");
        assert_eq!(lines[3], "Coal     3");
    }

    #[test]
    fn industries_lists_every_row() {
        let page: Page<IndustrySummary> = serde_json::from_value(json!({
            "total": 12, "page": 2, "page_size": 5,
            "data": [
                {"industry": "Banking", "stock_count": 4, "avg_change": 0.5, "avg_volatility": 1.0},
                {"industry": "Coal", "stock_count": 2, "avg_change": -1.25, "avg_volatility": 2.0}
            ]
        }))
        .unwrap();
        let out = industries(&page);
        assert!(out.contains("Banking"));
        assert!(out.contains("-1.25%"));
        assert!(out.ends_with("page 2 of 3 (12 total)\n"));
    }

    #[test]
    fn trend_prints_trailing_dates() {
        let daily: Vec<DailyChange> = (1..=5)
            .map(|d| DailyChange {
                date: format!("2025-01-0{d}"),
                change: d as f64,
            })
            .collect();
        let tab = TrendTab {
            pagination: Pagination::new(1, 10, 1),
            filter: sectorboard_core::analytics::IndustryFilter::All,
            rows: Vec::new(),
            charted: vec![ChartedIndustry {
                industry: "Chips".to_string(),
                stock_count: 3,
                stats: TrendStats::compute(&daily, 90),
            }],
            chart: TrendChart::from_daily(vec![("Chips".to_string(), daily)]),
            errors: Vec::new(),
        };
        let out = trend(&tab, 2);
        assert!(out.contains("2025-01-05  +5.00%"));
        assert!(out.contains("2025-01-04"));
        assert!(!out.contains("2025-01-03"));
        assert!(out.contains("100.00%"));
    }

    #[test]
    fn hotmap_marks_sample_data() {
        let tab = HotmapTab {
            nodes: mock_hotmap(),
            source: HotmapSource::Mock,
            error: None,
        };
        let out = hotmap(&tab, true);
        assert!(out.starts_with("(sample data)\n"));
        assert!(out.contains("  Kweichow Moutai: market cap 21000.0 (100M), change -0.86%, PE 24.10"));
    }

    #[test]
    fn stock_detail_falls_back_to_code() {
        let d: StockDetail = serde_json::from_value(json!({
            "basic_info": {},
            "historical_data": [{"date": "2025-01-02", "close": 10.5, "change_percent": null}]
        }))
        .unwrap();
        let out = stock("600000", &d, 5);
        assert!(out.starts_with("600000 (600000), -\n"));
        assert!(out.contains("10.50"));
    }
}
