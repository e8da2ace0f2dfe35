use crate::domain::de::normalize_date;
use crate::domain::industry::IndustryTrend;
use crate::domain::report::{DailyChange, IndustryAnalysis};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Per-date mean of the stocks' `change_percent`, oldest first.
///
/// A stock without a value for a date does not count towards that date's mean. For a stock that
/// lists a date more than once, its first entry carrying a value is used. Dates where no stock
/// has a value are omitted.
pub fn daily_average_change(trend: &IndustryTrend) -> Vec<DailyChange> {
    let mut buckets: BTreeMap<String, (f64, u32)> = BTreeMap::new();

    for points in trend.stock_trends.values() {
        let mut seen = HashSet::new();
        for p in points {
            let Some(change) = p.change_percent.filter(|c| c.is_finite()) else {
                continue;
            };
            let date = normalize_date(&p.date);
            if date.is_empty() || !seen.insert(date.clone()) {
                continue;
            }
            let bucket = buckets.entry(date).or_insert((0.0, 0));
            bucket.0 += change;
            bucket.1 += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(date, (sum, n))| DailyChange {
            date,
            change: sum / f64::from(n),
        })
        .collect()
}

/// The tail of `daily` that falls within the last `days` dates listed anywhere in `trend`.
///
/// Dates that appear in the trend but carry no value still take a slot in the window, so a
/// stretch of missing data shortens the sample instead of reaching further back.
pub fn trailing_window<'a>(
    trend: &IndustryTrend,
    daily: &'a [DailyChange],
    days: usize,
) -> &'a [DailyChange] {
    let listed: BTreeSet<String> = trend
        .stock_trends
        .values()
        .flatten()
        .map(|p| normalize_date(&p.date))
        .filter(|d| !d.is_empty())
        .collect();
    if days == 0 {
        return &daily[daily.len()..];
    }
    let Some(first) = listed.iter().rev().nth(days - 1) else {
        return daily;
    };
    let start = daily.partition_point(|d| d.date.as_str() < first.as_str());
    &daily[start..]
}

/// Summary statistics over the trailing window of daily industry averages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendStats {
    pub window_days: usize,
    pub sample_days: usize,
    pub avg_change: f64,
    pub volatility: f64,
    pub positive_days: u64,
    pub negative_days: u64,
    pub positive_rate: f64,
}

impl TrendStats {
    pub fn compute(daily: &[DailyChange], window_days: usize) -> Self {
        let start = daily.len().saturating_sub(window_days);
        let recent = &daily[start..];
        let n = recent.len();

        let positive_days = recent.iter().filter(|d| d.change > 0.0).count() as u64;
        let negative_days = recent.iter().filter(|d| d.change < 0.0).count() as u64;

        let (avg_change, volatility, positive_rate) = if n == 0 {
            (0.0, 0.0, 0.0)
        } else {
            let mean = recent.iter().map(|d| d.change).sum::<f64>() / n as f64;
            let volatility = if n > 1 {
                let var = recent
                    .iter()
                    .map(|d| (d.change - mean).powi(2))
                    .sum::<f64>()
                    / (n - 1) as f64;
                var.sqrt()
            } else {
                0.0
            };
            (mean, volatility, positive_days as f64 / n as f64 * 100.0)
        };

        Self {
            window_days,
            sample_days: n,
            avg_change,
            volatility,
            positive_days,
            negative_days,
            positive_rate,
        }
    }

    pub fn positive_rate_label(&self) -> String {
        format!("{:.2}%", self.positive_rate)
    }

    pub fn summary(&self, industry: &str) -> String {
        let trend = if self.avg_change > 0.5 {
            format!("strong overall, averaging {:+.2}% per day", self.avg_change)
        } else if self.avg_change > 0.0 {
            format!("positive overall, averaging {:+.2}% per day", self.avg_change)
        } else if self.avg_change > -0.5 {
            format!("flat overall, averaging {:+.2}% per day", self.avg_change)
        } else {
            format!("weak overall, averaging {:+.2}% per day", self.avg_change)
        };

        let volatility = if self.volatility > 2.0 {
            "high"
        } else if self.volatility > 1.0 {
            "moderate"
        } else {
            "low"
        };

        format!(
            "{industry} over the last {} days: {trend}, up on {} of trading days, {volatility} volatility. \
             Watch the sector leaders and weigh macro conditions and sector policy before acting.",
            self.window_days,
            self.positive_rate_label(),
        )
    }

    pub fn into_analysis(
        self,
        industry: &str,
        stock_count: u64,
        daily: &[DailyChange],
    ) -> IndustryAnalysis {
        let start = daily.len().saturating_sub(self.window_days);
        IndustryAnalysis {
            industry: industry.to_string(),
            period: format!("{} days", self.window_days),
            stock_count,
            avg_change: self.avg_change,
            volatility: self.volatility,
            positive_days: self.positive_days,
            negative_days: self.negative_days,
            positive_rate: self.positive_rate_label(),
            daily_performance: daily[start..].to_vec(),
            summary: self.summary(industry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::industry::TrendPoint;
    use serde_json::json;

    fn point(date: &str, change: Option<f64>) -> TrendPoint {
        TrendPoint {
            date: date.to_string(),
            close: Some(10.0),
            change_percent: change,
        }
    }

    fn trend(stocks: Vec<(&str, Vec<TrendPoint>)>) -> IndustryTrend {
        IndustryTrend {
            industry: "Banking".to_string(),
            stock_count: stocks.len() as u64,
            stock_trends: stocks
                .into_iter()
                .map(|(code, pts)| (code.to_string(), pts))
                .collect(),
        }
    }

    fn daily(values: &[f64]) -> Vec<DailyChange> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| DailyChange {
                date: format!("2025-01-{:02}", i + 1),
                change: *v,
            })
            .collect()
    }

    #[test]
    fn averages_per_date_and_skips_missing_stocks() {
        let t = trend(vec![
            (
                "600000",
                vec![point("2025-01-02", Some(1.0)), point("2025-01-03", Some(-2.0))],
            ),
            (
                "600036",
                vec![point("2025-01-02", Some(3.0)), point("2025-01-03", None)],
            ),
            ("601398", vec![point("2025-01-02", Some(-1.0))]),
        ]);

        let out = daily_average_change(&t);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].date, "2025-01-02");
        assert!((out[0].change - 1.0).abs() < 1e-9);
        // Only 600000 has a value on the 3rd.
        assert_eq!(out[1].date, "2025-01-03");
        assert!((out[1].change + 2.0).abs() < 1e-9);
    }

    #[test]
    fn dates_are_sorted_and_normalized() {
        let t = trend(vec![
            ("a", vec![point("2025-01-05T00:00:00", Some(1.0))]),
            ("b", vec![point("20250103", Some(2.0)), point("2025-01-05", Some(3.0))]),
        ]);
        let out = daily_average_change(&t);
        let dates: Vec<_> = out.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-01-03", "2025-01-05"]);
        assert!((out[1].change - 2.0).abs() < 1e-9);
    }

    #[test]
    fn first_valued_entry_wins_for_duplicate_dates() {
        let t = trend(vec![(
            "a",
            vec![
                point("2025-01-02", None),
                point("2025-01-02", Some(4.0)),
                point("2025-01-02", Some(8.0)),
            ],
        )]);
        let out = daily_average_change(&t);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].change, 4.0);
    }

    #[test]
    fn dates_without_any_value_are_dropped() {
        let t = trend(vec![
            ("a", vec![point("2025-01-02", None)]),
            ("b", vec![point("2025-01-02", None)]),
        ]);
        assert!(daily_average_change(&t).is_empty());
    }

    #[test]
    fn empty_trend_yields_nothing() {
        let t: IndustryTrend = serde_json::from_value(json!({"industry": "X"})).unwrap();
        assert!(daily_average_change(&t).is_empty());
    }

    #[test]
    fn stats_use_trailing_window() {
        let d = daily(&[10.0, 1.0, -1.0, 2.0]);
        let s = TrendStats::compute(&d, 3);
        assert_eq!(s.sample_days, 3);
        assert!((s.avg_change - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(s.positive_days, 2);
        assert_eq!(s.negative_days, 1);
        assert_eq!(s.positive_rate_label(), "66.67%");
        // sample std of [1, -1, 2]
        assert!((s.volatility - 1.527525231651947).abs() < 1e-9);
    }

    #[test]
    fn stats_on_single_day_have_zero_volatility() {
        let s = TrendStats::compute(&daily(&[0.0]), 90);
        assert_eq!(s.volatility, 0.0);
        assert_eq!(s.positive_days, 0);
        assert_eq!(s.negative_days, 0);
        assert_eq!(s.positive_rate_label(), "0.00%");
    }

    #[test]
    fn stats_on_empty_input_are_zero() {
        let s = TrendStats::compute(&[], 30);
        assert_eq!(s.sample_days, 0);
        assert_eq!(s.avg_change, 0.0);
        assert!(s.summary("Coal").contains("flat overall"));
    }

    #[test]
    fn summary_reflects_thresholds() {
        let strong = TrendStats::compute(&daily(&[0.6, 0.8]), 30);
        assert!(strong.summary("Chips").starts_with("Chips over the last 30 days: strong"));
        assert!(strong.summary("Chips").contains("low volatility"));

        let weak = TrendStats::compute(&daily(&[-3.0, 1.0]), 30);
        let text = weak.summary("Steel");
        assert!(text.contains("weak overall"));
        assert!(text.contains("high volatility"));
    }

    #[test]
    fn into_analysis_keeps_window_slice() {
        let d = daily(&[1.0, 2.0, 3.0]);
        let a = TrendStats::compute(&d, 2).into_analysis("Media", 7, &d);
        assert_eq!(a.period, "2 days");
        assert_eq!(a.stock_count, 7);
        assert_eq!(a.daily_performance.len(), 2);
        assert_eq!(a.daily_performance[0].date, "2025-01-02");
    }

    #[test]
    fn window_counts_dates_without_values() {
        let t = trend(vec![
            (
                "600000",
                vec![
                    point("2025-01-02", Some(1.0)),
                    point("2025-01-03", Some(2.0)),
                    point("2025-01-06", None),
                    point("2025-01-07", Some(4.0)),
                ],
            ),
            ("601398", vec![point("2025-01-06", None)]),
        ]);
        let all = daily_average_change(&t);
        assert_eq!(all.len(), 3);

        let recent = trailing_window(&t, &all, 2);
        let dates: Vec<_> = recent.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-01-07"]);

        let stats = TrendStats::compute(recent, 2);
        assert_eq!(stats.sample_days, 1);
        assert_eq!(stats.avg_change, 4.0);

        assert_eq!(trailing_window(&t, &all, 3).len(), 2);
        assert_eq!(trailing_window(&t, &all, 90).len(), 3);
        assert!(trailing_window(&t, &all, 0).is_empty());
    }
}
