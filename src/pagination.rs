//! Offset/limit pagination and the metadata returned with every page.

use serde::Serialize;
use url::form_urlencoded;

pub const DEFAULT_OFFSET: usize = 0;
pub const DEFAULT_LIMIT: usize = 10;

/// A normalized pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Negative offsets become 0; missing or non-positive limits become
    /// [`DEFAULT_LIMIT`].
    pub fn new(offset: Option<i64>, limit: Option<i64>) -> Self {
        let offset = offset
            .filter(|o| *o > 0)
            .and_then(|o| usize::try_from(o).ok())
            .unwrap_or(DEFAULT_OFFSET);
        let limit = limit
            .filter(|l| *l > 0)
            .and_then(|l| usize::try_from(l).ok())
            .unwrap_or(DEFAULT_LIMIT);
        Self { offset, limit }
    }

    /// Slice `[offset, offset + limit)` out of the full match set.
    pub fn apply<T: Clone>(&self, matches: &[T]) -> Page<T> {
        let start = self.offset.min(matches.len());
        let end = start.saturating_add(self.limit).min(matches.len());
        Page {
            items: matches[start..end].to_vec(),
            total: matches.len(),
            request: *self,
        }
    }
}

/// One page of results plus what is needed to describe its neighbours.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Size of the whole match set, before slicing.
    pub total: usize,
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn current_page(&self) -> usize {
        self.request.offset / self.request.limit + 1
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.request.limit)
    }

    pub fn previous_offset(&self) -> Option<usize> {
        let current = self.current_page();
        (current > 1).then(|| (current - 2) * self.request.limit)
    }

    pub fn next_offset(&self) -> Option<usize> {
        let current = self.current_page();
        (current < self.total_pages()).then(|| current * self.request.limit)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }

    /// Response metadata. Neighbour links are `base_url?offset=..&limit=..`
    /// followed by `params` in the given order.
    pub fn metadata(&self, base_url: &str, params: &[(&str, String)]) -> PageMetadata {
        let link = |offset: usize| page_link(base_url, offset, self.request.limit, params);
        PageMetadata {
            total_pages: self.total_pages(),
            total_exercises: self.total,
            current_page: self.current_page(),
            previous_page: self.previous_offset().map(link),
            next_page: self.next_offset().map(link),
        }
    }
}

/// Pagination block of a paginated response. Missing neighbours serialize as
/// `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub total_pages: usize,
    pub total_exercises: usize,
    pub current_page: usize,
    pub previous_page: Option<String>,
    pub next_page: Option<String>,
}

fn page_link(base_url: &str, offset: usize, limit: usize, params: &[(&str, String)]) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("offset", &offset.to_string());
    query.append_pair("limit", &limit.to_string());
    for (name, value) in params {
        query.append_pair(name, value);
    }
    format!("{}?{}", base_url, query.finish())
}
