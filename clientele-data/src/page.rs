use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn is_ascending(self) -> bool {
        matches!(self, Direction::Asc)
    }
}

/// Ordering of a listing: columns compared left to right.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sort {
    orders: Vec<(String, Direction)>,
}

impl Sort {
    pub fn unsorted() -> Self {
        Self::default()
    }

    /// Ascending order on `column`.
    pub fn by(column: &str) -> Self {
        Self::unsorted().and(column, Direction::Asc)
    }

    pub fn by_desc(column: &str) -> Self {
        Self::unsorted().and(column, Direction::Desc)
    }

    pub fn and(mut self, column: &str, direction: Direction) -> Self {
        self.orders.push((column.to_string(), direction));
        self
    }

    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn orders(&self) -> impl Iterator<Item = (&str, Direction)> {
        self.orders.iter().map(|(c, d)| (c.as_str(), *d))
    }
}

/// Pagination parameters. `page` is zero-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pageable {
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub size: u64,
    #[serde(default)]
    pub sort: Sort,
}

fn default_page_size() -> u64 {
    20
}

impl Default for Pageable {
    fn default() -> Self {
        Self {
            page: 0,
            size: default_page_size(),
            sort: Sort::unsorted(),
        }
    }
}

impl Pageable {
    pub fn of(page: u64, size: u64) -> Self {
        Self {
            page,
            size,
            sort: Sort::unsorted(),
        }
    }

    pub fn sorted(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

/// A page of results with pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, pageable: &Pageable, total_elements: u64) -> Self {
        let total_pages = if pageable.size == 0 {
            0
        } else {
            total_elements.div_ceil(pageable.size)
        };
        Self {
            content,
            page: pageable.page,
            size: pageable.size,
            total_elements,
            total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let page = Page::new(vec![1, 2], &Pageable::of(2, 2), 5);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_next());
    }

    #[test]
    fn last_possible_page_has_no_next() {
        let page: Page<u8> = Page::new(vec![], &Pageable::of(u64::MAX, 1), 5);
        assert_eq!(page.page, u64::MAX);
        assert!(!page.has_next());
        assert!(Page::new(vec![1], &Pageable::of(3, 1), 5).has_next());
    }

    #[test]
    fn zero_size_has_no_pages() {
        let page: Page<u8> = Page::new(vec![], &Pageable::of(0, 0), 5);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn pageable_defaults_from_json() {
        let p: Pageable = serde_json::from_str(r#"{"page": 3}"#).unwrap();
        assert_eq!(p.size, 20);
        assert_eq!(p.offset(), 60);
        assert!(p.sort.is_unsorted());
    }
}
