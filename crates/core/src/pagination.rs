//! Offset/limit pagination arithmetic.

use serde::Serialize;

/// Page size used when the caller does not supply a usable one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PaginationParams {
    page: u32,
    page_size: u32,
}

/// Pagination block returned to clients.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub next: Option<u32>,
    pub prev: Option<u32>,
    pub total: u64,
    pub page: u32,
}

impl PaginationParams {
    /// Build from raw query values; page < 1 becomes 1, a missing or
    /// non-positive page size becomes [`DEFAULT_PAGE_SIZE`].
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = page
            .filter(|p| *p >= 1)
            .map(|p| u32::try_from(p).unwrap_or(u32::MAX))
            .unwrap_or(1);
        let page_size = page_size
            .filter(|s| *s >= 1)
            .map(|s| u32::try_from(s).unwrap_or(u32::MAX))
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Self { page, page_size }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    pub fn page_info(&self, total: u64) -> PageInfo {
        let seen = u64::from(self.page) * u64::from(self.page_size);
        PageInfo {
            next: (total > seen).then(|| self.page.saturating_add(1)),
            prev: (self.page > 1).then(|| self.page.saturating_sub(1)),
            total,
            page: self.page,
        }
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_apply() {
        let p = PaginationParams::new(Some(0), None);
        assert_eq!(p, PaginationParams { page: 1, page_size: 10 });
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(PaginationParams::new(Some(3), Some(25)).offset(), 50);
    }

    #[test]
    fn zero_page_does_not_underflow() {
        let p = PaginationParams { page: 0, page_size: 10 };
        assert_eq!(p.offset(), 0);
        assert_eq!(p.page_info(5).prev, None);
    }

    #[test]
    fn accessors_expose_normalised_values() {
        let p = PaginationParams::new(Some(-4), Some(0));
        assert_eq!((p.page(), p.page_size()), (1, DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn first_page_has_no_prev() {
        let info = PaginationParams::new(Some(1), Some(10)).page_info(25);
        assert_eq!(info.prev, None);
        assert_eq!(info.next, Some(2));
    }

    #[test]
    fn last_page_has_no_next() {
        let info = PaginationParams::new(Some(3), Some(10)).page_info(30);
        assert_eq!(info.next, None);
        assert_eq!(info.prev, Some(2));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a next page is advertised iff items remain past this page.
        #[test]
        fn next_iff_items_remain(page in 1i64..1_000, size in 1i64..500, total in 0u64..1_000_000) {
            let params = PaginationParams::new(Some(page), Some(size));
            let info = params.page_info(total);
            prop_assert_eq!(info.next.is_some(), total > params.offset() + u64::from(params.page_size()));
        }
    }
}
