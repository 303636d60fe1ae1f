use serde::Serialize;

use crate::types::RecipeSummary;

/// Results per page in the results panel
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// The last search the user ran and what came back
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchSession {
    pub query: String,
    pub results: Vec<RecipeSummary>,
}

/// Where a page sits among its siblings, for the prev/next buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageNav {
    pub current: usize,
    pub pages: usize,
    pub prev: Option<usize>,
    pub next: Option<usize>,
}

impl SearchSession {
    pub fn new(query: impl Into<String>, results: Vec<RecipeSummary>) -> Self {
        SearchSession {
            query: query.into(),
            results,
        }
    }

    /// 1-based page of results. Out-of-range pages (including 0) are empty.
    pub fn page(&self, page_number: usize, page_size: usize) -> &[RecipeSummary] {
        if page_number == 0 || page_size == 0 {
            return &[];
        }
        let start = (page_number - 1).saturating_mul(page_size);
        let end = page_number.saturating_mul(page_size);
        let len = self.results.len();
        &self.results[start.min(len)..end.min(len)]
    }

    pub fn page_count(&self, page_size: usize) -> usize {
        if page_size == 0 {
            return 0;
        }
        self.results.len().div_ceil(page_size)
    }

    pub fn nav(&self, page_number: usize, page_size: usize) -> PageNav {
        let pages = self.page_count(page_size);
        PageNav {
            current: page_number,
            pages,
            prev: (page_number > 1 && page_number <= pages).then(|| page_number - 1),
            next: (page_number >= 1 && page_number < pages).then(|| page_number + 1),
        }
    }
}
