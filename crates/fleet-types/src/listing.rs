//! Pagination and keyword matching for list endpoints.
//!
//! Lists are served in fixed pages of [`PAGE_SIZE`] records. A page carries
//! its own number, the total page count and the total record count.

use serde::Serialize;

/// Fixed number of records per page.
pub const PAGE_SIZE: usize = 10;

/// One page of an ordered result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number that was served.
    pub page: u32,
    /// Total number of pages, `ceil(total / PAGE_SIZE)`.
    pub pages: u32,
    pub total: usize,
}

impl<T> Page<T> {
    /// Cut page `page` (1-based, values below 1 read as 1) out of an
    /// already filtered and ordered result set.
    pub fn slice(items: Vec<T>, page: u32) -> Self {
        let page = page.max(1);
        let total = items.len();
        let pages = total.div_ceil(PAGE_SIZE) as u32;
        let skip = (page as usize - 1).saturating_mul(PAGE_SIZE);
        let items = items.into_iter().skip(skip).take(PAGE_SIZE).collect();
        Self {
            items,
            page,
            pages,
            total,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            pages: self.pages,
            total: self.total,
        }
    }
}

/// Case-insensitive free-text filter.
///
/// Matches when any of the candidate fields contains the keyword as a
/// literal substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword(String);

impl Keyword {
    /// Blank or missing input means "no filter".
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Keyword(trimmed.to_lowercase()))
        }
    }

    pub fn matches_any(&self, fields: &[&str]) -> bool {
        fields
            .iter()
            .any(|field| field.to_lowercase().contains(&self.0))
    }
}
