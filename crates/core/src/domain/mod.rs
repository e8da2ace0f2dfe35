pub mod de;
pub mod hotmap;
pub mod industry;
pub mod report;
pub mod stock;

use serde::{Deserialize, Serialize};

/// Envelope used by the paginated endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default, deserialize_with = "de::count")]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default, deserialize_with = "de::vec_or_default")]
    pub data: Vec<T>,
}

impl<T> Page<T> {
    pub fn empty(page: u32, page_size: u32) -> Self {
        Self {
            total: 0,
            page,
            page_size,
            data: Vec::new(),
        }
    }
}
