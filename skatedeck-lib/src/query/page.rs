//! Page type for paginated query results.

use crate::model::Skater;

/// A page of query results with the total matching count.
///
/// The count covers every record matching the query's filters, not just the
/// slice in this page, so callers can derive the page count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    records: Vec<Skater>,
    total_count: usize,
}

impl Page {
    /// Creates a new page with records and the total matching count.
    pub fn new(records: Vec<Skater>, total_count: usize) -> Self {
        Self {
            records,
            total_count,
        }
    }

    /// Returns a reference to the records in this page.
    pub fn records(&self) -> &[Skater] {
        &self.records
    }

    /// Consumes the page and returns the records.
    pub fn into_records(self) -> Vec<Skater> {
        self.records
    }

    /// Returns the total number of records matching the query.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Returns the number of pages needed to show every matching record at
    /// the given page size.
    ///
    /// This is `ceil(total / items)`: zero only when no records match.
    ///
    /// # Panics
    ///
    /// Panics if `items` is zero. The browse-state codec clamps page sizes
    /// before they reach this point.
    pub fn page_count(&self, items: usize) -> usize {
        self.total_count.div_ceil(items)
    }

    /// Returns `true` if this page has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of records in this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_rounds_up() {
        let page = Page::new(Vec::new(), 95);
        assert_eq!(page.page_count(10), 10);
        assert_eq!(page.page_count(50), 2);
        assert_eq!(page.page_count(95), 1);
        assert_eq!(page.page_count(100), 1);
    }

    #[test]
    fn test_page_count_zero_only_when_empty() {
        assert_eq!(Page::new(Vec::new(), 0).page_count(10), 0);
        assert_eq!(Page::new(Vec::new(), 1).page_count(10), 1);
    }
}
