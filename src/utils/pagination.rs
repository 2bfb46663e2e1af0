//! Offset pagination derived from untrusted `page` / `limit` inputs.

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// A resolved page window, always with `page >= 1` and `limit >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Resolves raw query values. Anything missing, non-numeric or not
    /// strictly positive falls back to the default for that field.
    pub fn resolve(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: positive_or(page, DEFAULT_PAGE),
            limit: positive_or(limit, DEFAULT_LIMIT),
        }
    }

    /// Rows to skip: `(page - 1) * limit`, saturating instead of overflowing.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn positive_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_page_has_zero_offset() {
        let page = PageRequest::resolve(Some("1"), Some("10"));
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 10);
    }

    #[test]
    fn test_absent_values_use_defaults() {
        assert_eq!(PageRequest::resolve(None, None), PageRequest::default());
    }

    #[test]
    fn test_non_numeric_values_use_defaults() {
        let page = PageRequest::resolve(Some("two"), Some("ten"));
        assert_eq!(page, PageRequest { page: 1, limit: 10 });
    }

    #[test]
    fn test_non_positive_values_use_defaults() {
        assert_eq!(
            PageRequest::resolve(Some("0"), Some("-5")),
            PageRequest { page: 1, limit: 10 }
        );
        assert_eq!(
            PageRequest::resolve(Some("-1"), Some("3")),
            PageRequest { page: 1, limit: 3 }
        );
    }

    #[test]
    fn test_huge_page_saturates() {
        let page = PageRequest::resolve(Some(&i64::MAX.to_string()), Some("100"));
        assert_eq!(page.offset(), i64::MAX);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_offset_is_page_minus_one_times_limit(page in 1i64..100_000, limit in 1i64..10_000) {
            let request = PageRequest::resolve(Some(&page.to_string()), Some(&limit.to_string()));
            prop_assert_eq!(request.page, page);
            prop_assert_eq!(request.limit, limit);
            prop_assert_eq!(request.offset(), (page - 1) * limit);
        }

        #[test]
        fn prop_garbage_never_yields_non_positive_window(page in ".*", limit in ".*") {
            let request = PageRequest::resolve(Some(&page), Some(&limit));
            prop_assert!(request.page >= 1);
            prop_assert!(request.limit >= 1);
            prop_assert!(request.offset() >= 0);
        }
    }
}
