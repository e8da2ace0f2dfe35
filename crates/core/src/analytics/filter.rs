use crate::domain::industry::IndustrySummary;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const EDGE_COUNT: usize = 3;

/// Which industries of the current page get charted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndustryFilter {
    Top3,
    Bottom3,
    #[default]
    All,
}

impl IndustryFilter {
    pub const ALL: [IndustryFilter; 3] = [Self::Top3, Self::Bottom3, Self::All];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top3 => "top3",
            Self::Bottom3 => "bottom3",
            Self::All => "all",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Top3 => "Top 3 by average change",
            Self::Bottom3 => "Bottom 3 by average change",
            Self::All => "All industries",
        }
    }

    /// `Top3` is best first, `Bottom3` is worst first, `All` keeps input order.
    pub fn apply(self, industries: &[IndustrySummary]) -> Vec<IndustrySummary> {
        match self {
            Self::Top3 => ranked(industries).into_iter().take(EDGE_COUNT).collect(),
            Self::Bottom3 => ranked(industries).into_iter().rev().take(EDGE_COUNT).collect(),
            Self::All => industries.to_vec(),
        }
    }
}

fn ranked(industries: &[IndustrySummary]) -> Vec<IndustrySummary> {
    let mut out = industries.to_vec();
    out.sort_by(|a, b| b.avg_change.total_cmp(&a.avg_change));
    out
}

impl fmt::Display for IndustryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndustryFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top3" | "top" => Ok(Self::Top3),
            "bottom3" | "bottom" => Ok(Self::Bottom3),
            "all" | "" => Ok(Self::All),
            other => anyhow::bail!("unknown industry filter: {other} (expected top3, bottom3 or all)"),
        }
    }
}
