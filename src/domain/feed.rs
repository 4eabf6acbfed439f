pub const DEFAULT_PAGE_SIZE: u32 = 5;
pub const MAX_PAGE_SIZE: u32 = 50;

/// A validated feed page request. Page numbers start at 1; a zero or missing
/// limit falls back to [`DEFAULT_PAGE_SIZE`] and oversized limits are clamped.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FeedRequest {
    page: u32,
    limit: u32,
}

impl FeedRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        let limit = if limit == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            limit.min(MAX_PAGE_SIZE)
        };

        Self {
            page: page.max(1),
            limit,
        }
    }

    pub const fn page(self) -> u32 {
        self.page
    }

    pub const fn limit(self) -> u32 {
        self.limit
    }

    /// Saturates instead of overflowing, so an absurd page number lands past
    /// the end of the data rather than wrapping back into it.
    pub const fn offset(self) -> u32 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for FeedRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: FeedRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page(),
            limit: request.limit(),
            total,
        }
    }

    pub fn total_pages(&self) -> u32 {
        (self.total.div_ceil(u64::from(self.limit))) as u32
    }
}
