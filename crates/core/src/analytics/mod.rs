//! Client-side aggregation over analytics already computed upstream.

pub mod daily;
pub mod filter;
pub mod hotmap;
pub mod series;

pub use daily::{daily_average_change, trailing_window, TrendStats};
pub use filter::IndustryFilter;
pub use hotmap::{build_hotmap, hotmap_or_mock, mock_hotmap, HotmapData, HotmapSource};
pub use series::{TrendChart, TrendSeries};
