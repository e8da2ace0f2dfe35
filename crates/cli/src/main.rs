use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sectorboard_core::analytics::IndustryFilter;
use sectorboard_core::chart::{hotmap_treemap_options, trend_line_options};
use sectorboard_core::client::{AnalyticsApi, HttpAnalyticsApi, DEFAULT_DAYS};
use sectorboard_core::dashboard::{self, TrendQuery};

mod render;

#[derive(Debug, Parser)]
#[command(name = "sectorboard", about = "Industry trends and market hotmap from the terminal")]
struct Args {
    /// Print the raw JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// One page of industry averages.
    Industries {
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Defaults to DASHBOARD_PAGE_SIZE.
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// The trend tab: a page of industries with the filtered ones charted.
    Trend {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
        /// top3, bottom3 or all.
        #[arg(long, default_value_t = IndustryFilter::All)]
        filter: IndustryFilter,
        #[arg(long, default_value_t = DEFAULT_DAYS)]
        days: u32,
        /// Trailing dates to print per charted industry.
        #[arg(long, default_value_t = 10)]
        last: usize,
    },
    /// Market cap and change per industry, falling back to sample data.
    Hotmap {
        /// Also list each industry's stocks.
        #[arg(long)]
        stocks: bool,
    },
    /// Statistical summary of one industry.
    Analyze {
        industry: String,
        #[arg(long, default_value_t = DEFAULT_DAYS)]
        days: u32,
        /// Compute from the raw trend instead of the backend's summary.
        #[arg(long)]
        local: bool,
        #[arg(long, default_value_t = 10)]
        last: usize,
    },
    /// LLM-written report for one industry.
    Report {
        industry: String,
        #[arg(long, default_value_t = DEFAULT_DAYS)]
        days: u32,
    },
    /// LLM-written overview of every industry.
    MarketReport {
        #[arg(long, default_value_t = DEFAULT_DAYS)]
        days: u32,
    },
    /// One page of index constituents.
    Stocks {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Basic info and recent daily bars of one stock.
    Stock {
        code: String,
        #[arg(long, default_value_t = 20)]
        last: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = sectorboard_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let api = HttpAnalyticsApi::from_settings(&settings)?;

    if let Err(err) = run(&api, &args, settings.dashboard_page_size).await {
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(error = %err, "command failed");
        return Err(err);
    }
    Ok(())
}

async fn run(api: &dyn AnalyticsApi, args: &Args, default_page_size: u32) -> anyhow::Result<()> {
    let json = args.json;
    match &args.command {
        Command::Industries { page, page_size } => {
            let page = api
                .industry_analysis(*page, page_size.unwrap_or(default_page_size))
                .await
                .context("industry analysis failed")?;
            if json {
                print_json(&page)?;
            } else {
                print!("{}", render::industries(&page));
            }
        }
        Command::Trend {
            page,
            page_size,
            filter,
            days,
            last,
        } => {
            let query = TrendQuery {
                page: *page,
                page_size: page_size.unwrap_or(default_page_size),
                filter: *filter,
                window_days: *days,
            };
            let tab = dashboard::load_trend_tab(api, &query).await;
            for err in &tab.errors {
                eprintln!("warning: {err}");
            }
            if json {
                print_json(&serde_json::json!({
                    "tab": &tab,
                    "options": trend_line_options(&tab.chart),
                }))?;
            } else {
                print!("{}", render::trend(&tab, *last));
            }
        }
        Command::Hotmap { stocks } => {
            let tab = dashboard::load_hotmap_tab(api).await;
            if let Some(err) = &tab.error {
                eprintln!("warning: {err}");
            }
            if json {
                print_json(&serde_json::json!({
                    "tab": &tab,
                    "options": hotmap_treemap_options(&tab.nodes),
                }))?;
            } else {
                print!("{}", render::hotmap(&tab, *stocks));
            }
        }
        Command::Analyze {
            industry,
            days,
            local,
            last,
        } => {
            let analysis = if *local {
                dashboard::analyze_from_trend(api, industry, *days).await?
            } else {
                api.analyze_industry(industry, *days)
                    .await
                    .with_context(|| format!("analysis of {} failed", industry.trim()))?
            };
            if json {
                print_json(&analysis)?;
            } else {
                print!("{}", render::analysis(&analysis, *last));
            }
        }
        Command::Report { industry, days } => {
            let report = dashboard::load_industry_report(api, industry, *days).await?;
            if json {
                print_json(&report)?;
            } else {
                println!("{}", generated_at());
                print!("{}", render::industry_report(&report));
            }
        }
        Command::MarketReport { days } => {
            let report = dashboard::load_market_report(api, *days).await?;
            if json {
                print_json(&report)?;
            } else {
                println!("{}", generated_at());
                print!("{}", render::market_report(&report));
            }
        }
        Command::Stocks { page, page_size } => {
            let page = api
                .stock_list(*page, page_size.unwrap_or(default_page_size))
                .await
                .context("stock list failed")?;
            if json {
                print_json(&page)?;
            } else {
                print!("{}", render::stocks(&page));
            }
        }
        Command::Stock { code, last } => {
            let detail = api
                .stock_detail(code)
                .await
                .with_context(|| format!("detail for {} failed", code.trim()))?;
            if json {
                print_json(&detail)?;
            } else {
                print!("{}", render::stock(code.trim(), &detail, *last));
            }
        }
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn generated_at() -> String {
    format!("Generated {}", chrono::Local::now().format("%Y-%m-%d %H:%M"))
}

fn init_sentry(settings: &sectorboard_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trend_flags() {
        let args = Args::try_parse_from([
            "sectorboard", "trend", "--page", "2", "--filter", "bottom3", "--days", "30", "--json",
        ])
        .unwrap();
        assert!(args.json);
        match args.command {
            Command::Trend {
                page,
                page_size,
                filter,
                days,
                ..
            } => {
                assert_eq!(page, 2);
                assert_eq!(page_size, None);
                assert_eq!(filter, IndustryFilter::Bottom3);
                assert_eq!(days, 30);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_filter() {
        let err = Args::try_parse_from(["sectorboard", "trend", "--filter", "top10"]).unwrap_err();
        assert!(err.to_string().contains("top10"));
    }

    #[test]
    fn analyze_defaults_to_ninety_days() {
        let args = Args::try_parse_from(["sectorboard", "analyze", "Banking"]).unwrap();
        match args.command {
            Command::Analyze {
                industry,
                days,
                local,
                ..
            } => {
                assert_eq!(industry, "Banking");
                assert_eq!(days, 90);
                assert!(!local);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn market_report_subcommand_is_kebab_case() {
        let args = Args::try_parse_from(["sectorboard", "market-report", "--days", "7"]).unwrap();
        assert!(matches!(args.command, Command::MarketReport { days: 7 }));
    }
}
