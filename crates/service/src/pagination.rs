//! Page windows for the list endpoints that can grow without bound
//! (login activity and the feedback gallery).

use serde::Deserialize;

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// `?page=&per_page=` as sent by clients. Both are optional.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn first_page() -> u32 { 1 }
fn default_per_page() -> u32 { DEFAULT_PER_PAGE }

impl Pagination {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self { page: page.unwrap_or_else(first_page), per_page: per_page.unwrap_or_else(default_per_page) }
    }

    /// Zero-based page index and page size as sea-orm's paginator expects them.
    /// Page 0 reads as the first page; the size is kept within `1..=MAX_PER_PAGE`.
    pub fn window(self) -> (u64, u64) {
        let index = self.page.saturating_sub(1);
        let size = self.per_page.clamp(1, MAX_PER_PAGE);
        (u64::from(index), u64::from(size))
    }
}

impl Default for Pagination {
    fn default() -> Self { Self::new(None, None) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_fall_back() {
        assert_eq!(Pagination::new(None, Some(5)), Pagination { page: 1, per_page: 5 });
        assert_eq!(Pagination::default().window(), (0, u64::from(DEFAULT_PER_PAGE)));
    }

    #[test]
    fn window_is_clamped() {
        assert_eq!(Pagination { page: 0, per_page: 0 }.window(), (0, 1));
        assert_eq!(Pagination { page: 3, per_page: 1000 }.window(), (2, u64::from(MAX_PER_PAGE)));
    }

    #[test]
    fn deserializes_partial_query() {
        let p: Pagination = serde_json::from_str(r#"{"per_page": 50}"#).unwrap();
        assert_eq!(p, Pagination { page: 1, per_page: 50 });
    }
}
