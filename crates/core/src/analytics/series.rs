use crate::domain::report::DailyChange;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub name: String,
    /// Aligned with [`TrendChart::dates`]; `None` where the industry has no average that day.
    pub data: Vec<Option<f64>>,
}

/// Daily average change of several industries on a shared date axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendChart {
    pub dates: Vec<String>,
    pub series: Vec<TrendSeries>,
}

impl TrendChart {
    pub fn from_daily<I>(industries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<DailyChange>)>,
    {
        let industries: Vec<_> = industries.into_iter().collect();

        let dates: Vec<String> = industries
            .iter()
            .flat_map(|(_, daily)| daily.iter().map(|d| d.date.clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let series = industries
            .into_iter()
            .map(|(name, daily)| {
                let by_date: HashMap<&str, f64> =
                    daily.iter().map(|d| (d.date.as_str(), d.change)).collect();
                let data = dates
                    .iter()
                    .map(|date| by_date.get(date.as_str()).copied())
                    .collect();
                TrendSeries { name, data }
            })
            .collect();

        Self { dates, series }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty() || self.dates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: &str, change: f64) -> DailyChange {
        DailyChange {
            date: date.to_string(),
            change,
        }
    }

    #[test]
    fn aligns_series_on_union_of_dates() {
        let chart = TrendChart::from_daily(vec![
            (
                "Banking".to_string(),
                vec![day("2025-01-02", 1.0), day("2025-01-03", 0.5)],
            ),
            (
                "Coal".to_string(),
                vec![day("2025-01-01", -1.0), day("2025-01-03", 2.0)],
            ),
        ]);

        assert_eq!(chart.dates, vec!["2025-01-01", "2025-01-02", "2025-01-03"]);
        assert_eq!(chart.series[0].name, "Banking");
        assert_eq!(chart.series[0].data, vec![None, Some(1.0), Some(0.5)]);
        assert_eq!(chart.series[1].data, vec![Some(-1.0), None, Some(2.0)]);
    }

    #[test]
    fn industry_without_data_still_gets_a_series() {
        let chart = TrendChart::from_daily(vec![
            ("Banking".to_string(), vec![day("2025-01-02", 1.0)]),
            ("Media".to_string(), Vec::new()),
        ]);
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[1].data, vec![None]);
        assert!(!chart.is_empty());
    }

    #[test]
    fn empty_input_is_empty_chart() {
        assert!(TrendChart::from_daily(Vec::new()).is_empty());
    }
}
