//! Offset/limit paging shared by the list operations.

use serde::Deserialize;

pub const DEFAULT_LIMIT: u64 = 100;
/// Largest offset or limit the SQL drivers bind (signed 64-bit).
pub const MAX_ROWS: u64 = i64::MAX as u64;

/// `?skip=&limit=` query parameters. Missing values fall back to 0 and 100;
/// a zero limit yields an empty page. Both values are capped at `MAX_ROWS`,
/// so an offset past the end is just an empty page.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(from = "PageQuery")]
pub struct Page {
    pub skip: u64,
    pub limit: u64,
}

#[derive(Deserialize)]
struct PageQuery {
    #[serde(default)]
    skip: u64,
    #[serde(default = "default_limit")]
    limit: u64,
}

fn default_limit() -> u64 { DEFAULT_LIMIT }

impl From<PageQuery> for Page {
    fn from(q: PageQuery) -> Self { Self::new(q.skip, q.limit) }
}

impl Default for Page {
    fn default() -> Self { Self { skip: 0, limit: DEFAULT_LIMIT } }
}

impl Page {
    pub fn new(skip: u64, limit: u64) -> Self {
        Self { skip: skip.min(MAX_ROWS), limit: limit.min(MAX_ROWS) }
    }
}
