//! Server-rendered HTML for the three dashboard tabs.
//!
//! Pages are self-contained apart from the ECharts script; chart options are embedded as JSON
//! and handed to the library on load.

use sectorboard_core::analytics::{HotmapSource, IndustryFilter};
use sectorboard_core::chart::{hotmap_treemap_options, trend_line_options};
use sectorboard_core::dashboard::docs::{EndpointDoc, ENDPOINTS};
use sectorboard_core::dashboard::{HotmapTab, Pagination, TrendTab};
use serde_json::Value;

const ECHARTS_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Trend,
    Docs,
    Hotmap,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Trend, Tab::Docs, Tab::Hotmap];

    fn href(self) -> &'static str {
        match self {
            Tab::Trend => "/trend",
            Tab::Docs => "/docs",
            Tab::Hotmap => "/hotmap",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Tab::Trend => "Industry trends",
            Tab::Docs => "API reference",
            Tab::Hotmap => "Market hotmap",
        }
    }
}

pub fn render_trend_page(tab: &TrendTab, window_days: u32) -> String {
    let body = format!(
        r#"{errors}
<section>
  {filter_form}
  {table}
  {pagination}
</section>
<section>
  <div id="trend-chart" class="chart">{empty_chart}</div>
  {charted}
</section>
<section>
  <h2>Analyst reports</h2>
  <p class="muted">Generated on demand by the analytics service; this can take a while.</p>
  <button type="button" data-market-report="{days}">Market overview ({days} days)</button>
  <pre id="report" class="report" hidden></pre>
</section>
{chart_script}
<script>{report_js}</script>"#,
        errors = render_errors(&tab.errors),
        filter_form = render_filter_form(tab.filter, tab.pagination.page_size, window_days),
        table = render_summary_table(tab),
        pagination = render_pagination(&tab.pagination, tab.filter, window_days),
        empty_chart = if tab.chart.is_empty() {
            r#"<p class="muted">No trend data to chart.</p>"#
        } else {
            ""
        },
        charted = render_charted_table(tab, window_days),
        days = window_days,
        chart_script = if tab.chart.is_empty() {
            String::new()
        } else {
            chart_script("trend-chart", &trend_line_options(&tab.chart), "")
        },
        report_js = REPORT_JS,
    );
    layout(Tab::Trend, &body)
}

pub fn render_docs_page(base_url: Option<&str>) -> String {
    let base = match base_url {
        Some(url) => format!("<p>Base URL: <code>{}</code></p>", escape(url)),
        None => r#"<p class="error">ANALYTICS_API_BASE_URL is not configured.</p>"#.to_string(),
    };
    let endpoints: String = ENDPOINTS.iter().map(render_endpoint_doc).collect();
    layout(
        Tab::Docs,
        &format!(
            r#"<section>
  <p>All endpoints answer <code>GET</code> requests with JSON. Failures carry <code>{{"detail": "..."}}</code>.</p>
  {base}
</section>
{endpoints}"#
        ),
    )
}

pub fn render_hotmap_page(tab: &HotmapTab) -> String {
    let notice = match tab.source {
        HotmapSource::Live => String::new(),
        HotmapSource::Mock => format!(
            r#"<div class="error">{}<br>Showing sample data.</div>"#,
            escape(tab.error.as_deref().unwrap_or("Market hierarchy unavailable."))
        ),
    };
    let options = hotmap_treemap_options(&tab.nodes);
    layout(
        Tab::Hotmap,
        &format!(
            r#"{notice}
<section>
  <p class="muted">Area is market cap (100M units); colour is the day's change, red up and green down.</p>
  <div id="hotmap-chart" class="chart tall"></div>
</section>
{script}"#,
            script = chart_script("hotmap-chart", &options, HOTMAP_TOOLTIP_JS),
        ),
    )
}

fn layout(active: Tab, body: &str) -> String {
    let nav: String = Tab::ALL
        .iter()
        .map(|tab| {
            let class = if *tab == active { " class=\"active\"" } else { "" };
            format!(r#"<a href="{}"{class}>{}</a>"#, tab.href(), tab.title())
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - sectorboard</title>
    <style>{css}</style>
    <script src="{ECHARTS_CDN}"></script>
</head>
<body>
    <nav>{nav}</nav>
    <main>
        <h1>{title}</h1>
        {body}
    </main>
</body>
</html>"#,
        title = active.title(),
        css = CSS,
    )
}

fn render_errors(errors: &[String]) -> String {
    errors
        .iter()
        .map(|e| format!(r#"<div class="error">{}</div>"#, escape(e)))
        .collect()
}

fn render_filter_form(current: IndustryFilter, page_size: u32, days: u32) -> String {
    let options: String = IndustryFilter::ALL
        .iter()
        .map(|f| {
            let selected = if *f == current { " selected" } else { "" };
            format!(r#"<option value="{}"{selected}>{}</option>"#, f.as_str(), f.label())
        })
        .collect();
    format!(
        r#"<form method="get" action="/trend" class="filters">
    <label>Chart <select name="filter" onchange="this.form.submit()">{options}</select></label>
    <input type="hidden" name="page_size" value="{page_size}">
    <input type="hidden" name="days" value="{days}">
  </form>"#
    )
}

fn render_summary_table(tab: &TrendTab) -> String {
    if tab.rows.is_empty() {
        return r#"<p class="muted">No industries to show.</p>"#.to_string();
    }
    let rows: String = tab
        .rows
        .iter()
        .map(|r| {
            format!(
                r#"<tr><td>{}</td><td class="num">{}</td><td class="num {}">{:+.2}%</td><td class="num">{:.2}</td></tr>"#,
                escape(&r.industry),
                r.stock_count,
                change_class(r.avg_change),
                r.avg_change,
                r.avg_volatility,
            )
        })
        .collect();
    format!(
        r#"<table id="industries">
    <thead><tr><th>Industry</th><th>Stocks</th><th>Avg change</th><th>Avg volatility</th></tr></thead>
    <tbody>{rows}</tbody>
  </table>"#
    )
}

fn render_pagination(p: &Pagination, filter: IndustryFilter, days: u32) -> String {
    let link = |page: u32, text: &str| {
        format!(
            r#"<a href="/trend?page={page}&amp;page_size={}&amp;filter={filter}&amp;days={days}">{text}</a>"#,
            p.page_size
        )
    };
    let prev = p.prev.map(|n| link(n, "&laquo; Prev")).unwrap_or_default();
    let next = p.next.map(|n| link(n, "Next &raquo;")).unwrap_or_default();
    format!(
        r#"<div class="pagination">{prev}<span>Page {} of {} ({} industries)</span>{next}</div>"#,
        p.page, p.total_pages, p.total
    )
}

fn render_charted_table(tab: &TrendTab, days: u32) -> String {
    if tab.charted.is_empty() {
        return String::new();
    }
    let rows: String = tab
        .charted
        .iter()
        .map(|c| {
            format!(
                r#"<tr><td>{name}</td><td class="num">{}</td><td class="num {}">{:+.2}%</td><td class="num">{:.2}</td><td class="num">{}</td><td><button type="button" data-industry-report="{name}" data-days="{days}">Report</button></td></tr>"#,
                c.stock_count,
                change_class(c.stats.avg_change),
                c.stats.avg_change,
                c.stats.volatility,
                c.stats.positive_rate_label(),
                name = escape(&c.industry),
            )
        })
        .collect();
    format!(
        r#"<table id="charted">
    <thead><tr><th>Charted industry</th><th>Stocks</th><th>Mean daily change ({days}d)</th><th>Volatility</th><th>Up days</th><th></th></tr></thead>
    <tbody>{rows}</tbody>
  </table>"#
    )
}

fn render_endpoint_doc(doc: &EndpointDoc) -> String {
    let params = if doc.params.is_empty() {
        r#"<p class="muted">No parameters.</p>"#.to_string()
    } else {
        let items: String = doc
            .params
            .iter()
            .map(|(name, desc)| format!("<li><code>{}</code>: {}</li>", escape(name), escape(desc)))
            .collect();
        format!("<ul>{items}</ul>")
    };
    format!(
        r#"<section class="endpoint">
  <h2><span class="method">{}</span> <code>{}</code></h2>
  <p>{}</p>
  {params}
  <pre>{}</pre>
</section>
"#,
        doc.method,
        escape(doc.path),
        escape(doc.description),
        escape(doc.example),
    )
}

/// `setup` runs before the options are applied and may patch `options` with JS-only settings
/// such as formatter functions.
fn chart_script(element_id: &str, options: &Value, setup: &str) -> String {
    format!(
        r#"<script>
(function () {{
  var el = document.getElementById("{element_id}");
  if (!window.echarts || !el) {{ return; }}
  var chart = echarts.init(el);
  var options = {options};
  {setup}
  chart.setOption(options);
  window.addEventListener("resize", function () {{ chart.resize(); }});
}})();
</script>"#,
        options = script_json(options),
    )
}

/// JSON safe to inline inside a `<script>` element.
fn script_json(value: &Value) -> String {
    value
        .to_string()
        .replace("</", "<\\/")
        .replace("<!--", "<\\!--")
}

fn change_class(change: f64) -> &'static str {
    if change > 0.0 {
        "up"
    } else if change < 0.0 {
        "down"
    } else {
        "flat"
    }
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// value = [market cap, secondary metric, change %, visual value]
const HOTMAP_TOOLTIP_JS: &str = r#"options.tooltip = {
    formatter: function (p) {
      var v = p.value || [];
      var cap = Number(v[0] || 0).toFixed(1);
      var change = Number(v[2] || 0);
      return echarts.format.encodeHTML(p.name) + "<br>Market cap: " + cap + " (100M)"
        + "<br>Change: " + (change > 0 ? "+" : "") + change.toFixed(2) + "%";
    }
  };"#;

const REPORT_JS: &str = r#"
(function () {
  var out = document.getElementById("report");
  function show(url) {
    out.hidden = false;
    out.textContent = "Loading...";
    fetch(url)
      .then(function (res) { return res.json().then(function (body) { return [res.ok, body]; }); })
      .then(function (r) {
        out.textContent = r[0] ? (r[1].llm_analysis || "(empty report)") : ("Request failed: " + (r[1].error || "unknown error"));
      })
      .catch(function (e) { out.textContent = "Request failed: " + e; });
  }
  document.querySelectorAll("[data-industry-report]").forEach(function (btn) {
    btn.addEventListener("click", function () {
      show("/api/industry/report?industry=" + encodeURIComponent(btn.dataset.industryReport) + "&days=" + btn.dataset.days);
    });
  });
  document.querySelectorAll("[data-market-report]").forEach(function (btn) {
    btn.addEventListener("click", function () {
      show("/api/market/report?days=" + btn.dataset.marketReport);
    });
  });
})();
"#;

const CSS: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 0; color: #222; background: #f6f7f9; }
nav { display: flex; gap: 4px; padding: 8px 16px; background: #1f2933; }
nav a { color: #cbd2d9; text-decoration: none; padding: 6px 12px; border-radius: 4px; }
nav a.active { background: #3e4c59; color: #fff; }
main { max-width: 1200px; margin: 0 auto; padding: 16px; }
section { background: #fff; border: 1px solid #e4e7eb; border-radius: 6px; padding: 16px; margin-bottom: 16px; }
table { width: 100%; border-collapse: collapse; }
th, td { padding: 6px 8px; border-bottom: 1px solid #e4e7eb; text-align: left; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
.up { color: #d94e5d; } .down { color: #2e9d5b; } .flat { color: #616e7c; }
.chart { width: 100%; height: 420px; } .chart.tall { height: 640px; }
.error { background: #fde8e8; color: #9b1c1c; border: 1px solid #f8b4b4; border-radius: 4px; padding: 8px 12px; margin-bottom: 12px; }
.muted { color: #7b8794; }
.pagination { display: flex; gap: 12px; align-items: center; margin-top: 12px; }
.filters { margin-bottom: 12px; }
.report { white-space: pre-wrap; background: #f5f7fa; padding: 12px; border-radius: 4px; }
.method { background: #2680c2; color: #fff; border-radius: 3px; padding: 2px 6px; font-size: 0.8em; }
pre { overflow-x: auto; }
"#;
