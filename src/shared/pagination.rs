/// Page window pushed down to the store query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = ((total as f64) / (limit.max(1) as f64)).ceil() as u32;
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }

    /// Slice an already ordered, fully materialised collection.
    pub fn from_ordered(all: Vec<T>, window: PageRequest) -> Self {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(window.offset() as usize)
            .take(window.page_size as usize)
            .collect();
        Self::new(items, total, window.page, window.page_size)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_second_page() {
        let result = PaginatedResult::from_ordered((1..=25).collect(), PageRequest::new(2, 10));
        assert_eq!(result.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(result.total, 25);
        assert_eq!(result.total_pages, 3);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let result = PaginatedResult::from_ordered(vec![1, 2, 3], PageRequest::new(5, 10));
        assert!(result.items.is_empty());
        assert_eq!(result.total, 3);
        assert_eq!(result.total_pages, 1);
    }

    #[test]
    fn zero_page_is_clamped_to_first() {
        let window = PageRequest::new(0, 0);
        assert_eq!(window.page, 1);
        assert_eq!(window.page_size, 1);
        assert_eq!(window.offset(), 0);
    }
}
