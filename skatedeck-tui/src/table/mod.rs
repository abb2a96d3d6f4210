//! Table widget - a column-driven grid for record rows.
//!
//! The table has two operating modes. In self-managed mode it owns
//! filter/sort/page state and derives the visible subset from the full
//! dataset in memory. In manual mode it displays exactly the rows it is
//! given; the host owns all state and re-supplies data after every change.

mod render;
mod selection;

pub use render::BodyCell;
pub use render::EmptyState;
pub use render::HeaderCell;
pub use render::PaginationBar;
pub use render::RenderSlots;
pub use render::SELECT_COLUMN;
pub use render::render_table;
pub use selection::Selection;

use std::collections::HashSet;
use std::hash::Hash;

use skatedeck_lib::query::DEFAULTS;
use skatedeck_lib::query::Direction;

// =============================================================================
// Column
// =============================================================================

/// Column width specification.
#[derive(Clone, Copy, Debug)]
pub enum ColumnWidth {
    /// Fixed width in characters.
    Fixed(u16),
    /// Flexible width with weight.
    Flex(u16),
}

impl Default for ColumnWidth {
    fn default() -> Self {
        ColumnWidth::Flex(1)
    }
}

/// A table column definition.
#[derive(Clone, Debug)]
pub struct Column {
    /// Unique identifier, matching the wire name of the field it shows.
    pub id: String,
    /// Header text displayed at the top.
    pub header: String,
    /// Width specification.
    pub width: ColumnWidth,
    /// Whether interacting with the header cycles the sort.
    pub sortable: bool,
    /// Whether the column can be hidden through the visibility menu.
    pub hideable: bool,
}

impl Column {
    /// Create a new sortable, hideable column with the given id and header.
    pub fn new(id: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            width: ColumnWidth::default(),
            sortable: true,
            hideable: true,
        }
    }

    /// Set a fixed width for this column.
    pub fn fixed(mut self, width: u16) -> Self {
        self.width = ColumnWidth::Fixed(width);
        self
    }

    /// Set a flex width for this column.
    pub fn flex(mut self, weight: u16) -> Self {
        self.width = ColumnWidth::Flex(weight);
        self
    }

    /// Set whether this column participates in sorting.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Set whether this column can be hidden.
    pub fn hideable(mut self, hideable: bool) -> Self {
        self.hideable = hideable;
        self
    }
}

// =============================================================================
// TableRow
// =============================================================================

/// Orderable value a row exposes for a column.
#[derive(Clone, Debug, PartialEq)]
pub enum SortKey {
    /// Case-insensitive text ordering.
    Text(String),
    /// Numeric ordering.
    Number(f64),
}

impl SortKey {
    fn compare(&self, other: &SortKey) -> std::cmp::Ordering {
        use std::cmp::Ordering;

        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SortKey::Text(a), SortKey::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            // Mixed keys only happen on a misconfigured column; keep the
            // order stable rather than panicking.
            (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
        }
    }
}

/// Trait for rows that can be displayed in a table.
///
/// # Example
///
/// ```ignore
/// impl TableRow for User {
///     type Key = u32;
///
///     fn key(&self) -> u32 {
///         self.id
///     }
///
///     fn cell(&self, column_id: &str) -> String {
///         match column_id {
///             "name" => self.name.clone(),
///             _ => String::new(),
///         }
///     }
/// }
/// ```
pub trait TableRow: Clone {
    /// The key type used to identify this row.
    type Key: Clone + Eq + Hash;

    /// Return a unique key for this row.
    fn key(&self) -> Self::Key;

    /// Cell text for the given column.
    fn cell(&self, column_id: &str) -> String;

    /// Orderable value for the given column. Defaults to the cell text.
    fn sort_key(&self, column_id: &str) -> SortKey {
        SortKey::Text(self.cell(column_id))
    }
}

// =============================================================================
// TableState
// =============================================================================

/// Active sort on one column.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSort {
    /// The sorted column's id.
    pub column_id: String,
    /// The sort direction.
    pub direction: Direction,
}

/// How a table manages its interactive state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableMode {
    /// The table owns filter/sort/page state and derives the visible rows.
    SelfManaged,
    /// The table displays exactly the rows supplied; the host owns state.
    Manual,
}

/// Match kinds for self-managed filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchKind {
    /// Case-insensitive substring match on the cell text.
    Substring,
    /// Exact match on the cell text.
    Exact,
}

/// A filter a self-managed table applies to one column.
#[derive(Clone, Debug)]
pub struct ColumnFilter {
    /// The filtered column's id.
    pub column_id: String,
    /// How cell text is matched.
    pub kind: MatchKind,
    /// The filter value.
    pub value: String,
}

/// State for a table widget.
pub struct TableState<T: TableRow> {
    mode: TableMode,
    rows: Vec<T>,
    columns: Vec<Column>,
    /// Row selection, keyed by record id. Ephemeral.
    pub selection: Selection<T::Key>,
    sort: Option<ColumnSort>,
    filters: Vec<ColumnFilter>,
    global: Option<String>,
    page: usize,
    items: usize,
    hidden: HashSet<String>,
    cursor: usize,
    focused_column: usize,
    manual_total: usize,
    manual_page_count: usize,
}

impl<T: TableRow> TableState<T> {
    /// Create an empty table with the given columns and mode.
    pub fn new(columns: Vec<Column>, mode: TableMode) -> Self {
        Self {
            mode,
            rows: Vec::new(),
            columns,
            selection: Selection::new(),
            sort: None,
            filters: Vec::new(),
            global: None,
            page: DEFAULTS.page,
            items: DEFAULTS.items,
            hidden: HashSet::new(),
            cursor: 0,
            focused_column: 0,
            manual_total: 0,
            manual_page_count: 0,
        }
    }

    /// Replace the table's rows.
    ///
    /// Self-managed hosts pass the full dataset; manual hosts pass exactly
    /// the page to display.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.clamp_cursor();
    }

    /// The rows as supplied, before any self-managed processing.
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// The table's operating mode.
    pub fn mode(&self) -> TableMode {
        self.mode
    }

    // =========================================================================
    // Columns and visibility
    // =========================================================================

    /// Columns that are currently shown, in definition order.
    pub fn visible_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|col| !self.hidden.contains(&col.id))
            .collect()
    }

    /// Columns that may be hidden through the visibility menu.
    pub fn hideable_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|col| col.hideable).collect()
    }

    /// Whether the given column is currently hidden.
    pub fn is_hidden(&self, column_id: &str) -> bool {
        self.hidden.contains(column_id)
    }

    /// Toggle visibility of a hideable column.
    pub fn toggle_column(&mut self, column_id: &str) {
        let hideable = self
            .columns
            .iter()
            .any(|col| col.id == column_id && col.hideable);
        if !hideable {
            return;
        }

        if !self.hidden.remove(column_id) {
            self.hidden.insert(column_id.to_string());
        }
        self.clamp_focus();
    }

    // =========================================================================
    // Cursor and column focus
    // =========================================================================

    /// Index of the focused row within the visible rows.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the row cursor by `delta`, clamped to the visible rows.
    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.visible_rows().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let target = self.cursor as isize + delta;
        self.cursor = target.clamp(0, len as isize - 1) as usize;
    }

    /// The column the focus is on, if any are visible.
    pub fn focused_column(&self) -> Option<&Column> {
        let columns = self.visible_columns();
        columns.get(self.focused_column).copied()
    }

    /// Move the column focus by `delta`, clamped to the visible columns.
    pub fn move_focus(&mut self, delta: isize) {
        let len = self.visible_columns().len();
        if len == 0 {
            self.focused_column = 0;
            return;
        }
        let target = self.focused_column as isize + delta;
        self.focused_column = target.clamp(0, len as isize - 1) as usize;
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    /// The active sort, if any.
    pub fn sort(&self) -> Option<&ColumnSort> {
        self.sort.as_ref()
    }

    /// Next step in the fixed sort cycle for a column:
    /// unsorted -> ascending -> descending -> unsorted.
    pub fn next_sort_direction(&self, column_id: &str) -> Option<Direction> {
        match &self.sort {
            Some(sort) if sort.column_id == column_id => match sort.direction {
                Direction::Asc => Some(Direction::Desc),
                Direction::Desc => None,
            },
            _ => Some(Direction::Asc),
        }
    }

    /// Set the displayed sort. Manual hosts call this after deciding the
    /// next sort themselves.
    pub fn apply_sort(&mut self, sort: Option<ColumnSort>) {
        self.sort = sort;
    }

    /// Self-managed: advance the sort cycle on a sortable column.
    pub fn cycle_sort(&mut self, column_id: &str) {
        let sortable = self
            .columns
            .iter()
            .any(|col| col.id == column_id && col.sortable);
        if !sortable {
            return;
        }

        self.sort = self
            .next_sort_direction(column_id)
            .map(|direction| ColumnSort {
                column_id: column_id.to_string(),
                direction,
            });
    }

    // =========================================================================
    // Filtering (self-managed)
    // =========================================================================

    /// Set or clear the filter on a column. Any filter change returns to the
    /// first page.
    pub fn set_filter(&mut self, column_id: &str, kind: MatchKind, value: Option<String>) {
        self.filters.retain(|f| f.column_id != column_id);
        if let Some(value) = value {
            if !value.is_empty() {
                self.filters.push(ColumnFilter {
                    column_id: column_id.to_string(),
                    kind,
                    value,
                });
            }
        }
        self.page = DEFAULTS.page;
        self.clamp_cursor();
    }

    /// The active filter value on a column, if any.
    pub fn filter_value(&self, column_id: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|f| f.column_id == column_id)
            .map(|f| f.value.as_str())
    }

    /// Set or clear the search-all-columns filter. A row passes when any of
    /// its cells contains the needle. Changing it returns to the first page.
    pub fn set_global_filter(&mut self, value: Option<String>) {
        self.global = value.filter(|v| !v.is_empty());
        self.page = DEFAULTS.page;
        self.clamp_cursor();
    }

    /// The active search-all-columns value, if any.
    pub fn global_filter(&self) -> Option<&str> {
        self.global.as_deref()
    }

    fn matches(&self, row: &T) -> bool {
        let per_column = self.filters.iter().all(|filter| {
            let cell = row.cell(&filter.column_id);
            match filter.kind {
                MatchKind::Substring => cell.to_lowercase().contains(&filter.value.to_lowercase()),
                MatchKind::Exact => cell == filter.value,
            }
        });
        if !per_column {
            return false;
        }

        match &self.global {
            Some(needle) => {
                let needle = needle.to_lowercase();
                self.columns
                    .iter()
                    .any(|col| row.cell(&col.id).to_lowercase().contains(&needle))
            }
            None => true,
        }
    }

    fn filtered_len(&self) -> usize {
        self.rows.iter().filter(|row| self.matches(row)).count()
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// The page currently shown (1-based). Self-managed tables clamp to the
    /// last non-empty page when filters shrink the dataset.
    pub fn page(&self) -> usize {
        match self.mode {
            TableMode::Manual => self.page,
            TableMode::SelfManaged => self.page.min(self.page_count().max(1)),
        }
    }

    /// Records per page.
    pub fn items(&self) -> usize {
        self.items
    }

    /// Set the page to show.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
        self.cursor = 0;
    }

    /// Set the page size. The page is kept and re-clamped.
    pub fn set_items(&mut self, items: usize) {
        self.items = items.max(1);
        self.clamp_cursor();
    }

    /// Manual hosts supply the counts the store reported.
    pub fn set_manual_counts(&mut self, total: usize, page_count: usize) {
        self.manual_total = total;
        self.manual_page_count = page_count;
    }

    /// Total matching records.
    pub fn total(&self) -> usize {
        match self.mode {
            TableMode::Manual => self.manual_total,
            TableMode::SelfManaged => self.filtered_len(),
        }
    }

    /// Number of pages at the current page size.
    pub fn page_count(&self) -> usize {
        match self.mode {
            TableMode::Manual => self.manual_page_count,
            TableMode::SelfManaged => self.filtered_len().div_ceil(self.items),
        }
    }

    /// The rows the body shows.
    ///
    /// Manual mode passes the supplied rows through untouched; self-managed
    /// mode filters, sorts, and slices the current page.
    pub fn visible_rows(&self) -> Vec<T> {
        match self.mode {
            TableMode::Manual => self.rows.clone(),
            TableMode::SelfManaged => {
                let mut rows: Vec<T> = self
                    .rows
                    .iter()
                    .filter(|row| self.matches(row))
                    .cloned()
                    .collect();

                if let Some(sort) = &self.sort {
                    rows.sort_by(|a, b| {
                        let ordering = a
                            .sort_key(&sort.column_id)
                            .compare(&b.sort_key(&sort.column_id));
                        match sort.direction {
                            Direction::Asc => ordering,
                            Direction::Desc => ordering.reverse(),
                        }
                    });
                }

                rows.into_iter()
                    .skip((self.page() - 1) * self.items)
                    .take(self.items)
                    .collect()
            }
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Toggle selection of the row under the cursor.
    pub fn toggle_cursor_selection(&mut self) {
        if let Some(key) = self.visible_rows().get(self.cursor).map(TableRow::key) {
            self.selection.toggle(key);
        }
    }

    /// Toggle selection of every visible row (select-all for the page).
    pub fn toggle_select_all_visible(&mut self) {
        let keys: Vec<_> = self.visible_rows().iter().map(TableRow::key).collect();
        if !keys.is_empty() {
            self.selection.toggle_all(keys);
        }
    }

    fn clamp_cursor(&mut self) {
        let len = self.visible_rows().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    fn clamp_focus(&mut self) {
        let len = self.visible_columns().len();
        self.focused_column = self.focused_column.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct TestRow {
        id: u32,
        name: &'static str,
        score: i64,
    }

    impl TableRow for TestRow {
        type Key = u32;

        fn key(&self) -> u32 {
            self.id
        }

        fn cell(&self, column_id: &str) -> String {
            match column_id {
                "name" => self.name.to_string(),
                "score" => self.score.to_string(),
                _ => String::new(),
            }
        }

        fn sort_key(&self, column_id: &str) -> SortKey {
            match column_id {
                "score" => SortKey::Number(self.score as f64),
                _ => SortKey::Text(self.cell(column_id)),
            }
        }
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::new("name", "Name"),
            Column::new("score", "Score").fixed(6),
        ]
    }

    fn rows(count: u32) -> Vec<TestRow> {
        (0..count)
            .map(|i| TestRow {
                id: i,
                name: if i % 2 == 0 { "alice" } else { "bob" },
                score: i64::from(i) * 7 % 13,
            })
            .collect()
    }

    fn self_managed(count: u32) -> TableState<TestRow> {
        let mut table = TableState::new(columns(), TableMode::SelfManaged);
        table.set_rows(rows(count));
        table
    }

    #[test]
    fn test_sort_cycle_is_fixed() {
        let mut table = self_managed(5);

        assert_eq!(table.next_sort_direction("name"), Some(Direction::Asc));
        table.cycle_sort("name");
        assert_eq!(table.next_sort_direction("name"), Some(Direction::Desc));
        table.cycle_sort("name");
        assert_eq!(table.next_sort_direction("name"), None);
        table.cycle_sort("name");
        assert_eq!(table.sort(), None);

        // Back around the cycle.
        assert_eq!(table.next_sort_direction("name"), Some(Direction::Asc));
    }

    #[test]
    fn test_cycling_another_column_restarts_ascending() {
        let mut table = self_managed(5);
        table.cycle_sort("name");
        table.cycle_sort("name");
        assert_eq!(table.next_sort_direction("score"), Some(Direction::Asc));
    }

    #[test]
    fn test_unsortable_column_is_ignored() {
        let mut table = TableState::new(
            vec![Column::new("name", "Name").sortable(false)],
            TableMode::SelfManaged,
        );
        table.set_rows(rows(3));
        table.cycle_sort("name");
        assert_eq!(table.sort(), None);
    }

    #[test]
    fn test_self_managed_filters_then_pages() {
        let mut table = self_managed(30);
        table.set_items(10);

        // 15 of 30 rows are "alice".
        table.set_filter("name", MatchKind::Exact, Some("alice".into()));
        assert_eq!(table.total(), 15);
        assert_eq!(table.page_count(), 2);
        assert_eq!(table.visible_rows().len(), 10);

        table.set_page(2);
        assert_eq!(table.visible_rows().len(), 5);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut table = self_managed(30);
        table.set_page(3);
        table.set_filter("name", MatchKind::Substring, Some("ali".into()));
        assert_eq!(table.page(), 1);
    }

    #[test]
    fn test_page_clamps_when_filter_shrinks_data() {
        let mut table = self_managed(30);
        table.set_page(3);
        assert_eq!(table.page(), 3);

        table.set_filter("name", MatchKind::Exact, Some("bob".into()));
        table.set_page(9);
        assert_eq!(table.page(), table.page_count());
    }

    #[test]
    fn test_numeric_sort_orders_numerically() {
        let mut table = TableState::new(columns(), TableMode::SelfManaged);
        table.set_rows(vec![
            TestRow { id: 1, name: "a", score: 9 },
            TestRow { id: 2, name: "b", score: 100 },
            TestRow { id: 3, name: "c", score: 20 },
        ]);
        table.cycle_sort("score");

        let scores: Vec<_> = table.visible_rows().iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![9, 20, 100]);
    }

    #[test]
    fn test_global_filter_matches_any_column() {
        let mut table = TableState::new(columns(), TableMode::SelfManaged);
        table.set_rows(vec![
            TestRow { id: 1, name: "alice", score: 7 },
            TestRow { id: 2, name: "bob", score: 70 },
            TestRow { id: 3, name: "carol", score: 3 },
        ]);

        // Hits the score column on row 2 and the name column on nobody.
        table.set_global_filter(Some("70".into()));
        assert_eq!(table.total(), 1);

        table.set_global_filter(Some("ALICE".into()));
        assert_eq!(table.total(), 1);

        table.set_global_filter(None);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn test_global_and_column_filters_combine() {
        let mut table = self_managed(30);
        table.set_filter("name", MatchKind::Exact, Some("alice".into()));
        table.set_global_filter(Some("bob".into()));
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn test_manual_mode_passes_rows_through() {
        let mut table = TableState::new(columns(), TableMode::Manual);
        table.set_rows(rows(7));
        table.set_filter("name", MatchKind::Exact, Some("alice".into()));
        // Manual tables never filter what they were given.
        assert_eq!(table.visible_rows().len(), 7);
    }

    #[test]
    fn test_select_all_visible_is_per_page() {
        let mut table = self_managed(25);
        table.set_items(10);
        table.toggle_select_all_visible();
        assert_eq!(table.selection.len(), 10);

        table.set_page(3);
        table.toggle_select_all_visible();
        assert_eq!(table.selection.len(), 15);
    }

    #[test]
    fn test_hidden_column_leaves_visible_set() {
        let mut table = self_managed(3);
        table.toggle_column("score");
        assert_eq!(table.visible_columns().len(), 1);
        assert!(table.is_hidden("score"));

        table.toggle_column("score");
        assert_eq!(table.visible_columns().len(), 2);
    }
}
