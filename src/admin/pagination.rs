use serde::{Deserialize, Serialize};

pub const PER_PAGE: i64 = 10;

/// A 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
}

impl PageRequest {
    pub fn new(page: i64) -> Self {
        Self { page: page.max(1) }
    }

    /// Parses a raw query value. Missing, non-numeric and non-positive
    /// values all mean page 1.
    pub fn from_param(raw: Option<&str>) -> Self {
        let page = raw
            .and_then(|value| value.trim().parse::<i64>().ok())
            .unwrap_or(1);
        Self::new(page)
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        PER_PAGE
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(PER_PAGE)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1)
    }
}

/// One paginated block of the admin dashboard.
///
/// `total` comes from a separate COUNT query, so under concurrent writes it
/// can disagree with `data` by the rows inserted in between.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub current_page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            data,
            total,
            current_page: request.page(),
            per_page: request.limit(),
            total_pages: total_pages(total, request.limit()),
        }
    }
}

/// Ceiling division; zero rows means zero pages.
pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if total <= 0 || per_page <= 0 {
        return 0;
    }
    (total + per_page - 1) / per_page
}
