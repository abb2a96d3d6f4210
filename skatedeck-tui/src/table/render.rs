//! Table chrome rendering.
//!
//! Every structural region is drawn through a named render slot with a
//! narrow, typed input: hosts replace a slot to restyle a region without
//! touching the table's layout or state.

use crossterm::style::Stylize;
use unicode_width::UnicodeWidthChar;

use skatedeck_lib::query::Direction;

use super::Column;
use super::ColumnWidth;
use super::TableRow;
use super::TableState;

/// Id of the synthetic selection-marker column injected before the data
/// columns. Never sortable, never hideable.
pub const SELECT_COLUMN: &str = "select";

/// Input to the header-cell slot.
pub struct HeaderCell<'a> {
    /// The column being drawn.
    pub column: &'a Column,
    /// Sort direction currently applied to this column, if any.
    pub sort: Option<Direction>,
    /// Cell width in characters.
    pub width: u16,
}

/// Input to the body-cell slot.
pub struct BodyCell<'a> {
    /// The column being drawn.
    pub column: &'a Column,
    /// The cell text.
    pub text: &'a str,
    /// Whether the row is selected.
    pub selected: bool,
    /// Whether the row is under the cursor.
    pub focused: bool,
    /// A fetch is in flight; draw a placeholder instead of stale text.
    pub pending: bool,
    /// Cell width in characters.
    pub width: u16,
}

/// Input to the pagination-bar slot.
pub struct PaginationBar {
    /// Current page (1-based).
    pub page: usize,
    /// Total number of pages.
    pub page_count: usize,
    /// Records per page.
    pub items: usize,
    /// Total matching records.
    pub total: usize,
    /// Number of selected rows.
    pub selected: usize,
    /// Number of rows on this page.
    pub row_count: usize,
}

/// Input to the empty-state slot.
pub struct EmptyState {
    /// Full table width in characters.
    pub width: u16,
}

/// Named render slots for the table chrome.
///
/// The defaults draw a plain bold header, dimmed skeleton cells while a
/// fetch is in flight, and a one-line pagination summary.
pub struct RenderSlots {
    /// Draws one header cell.
    pub header_cell: Box<dyn Fn(&HeaderCell<'_>) -> String>,
    /// Draws one body cell.
    pub body_cell: Box<dyn Fn(&BodyCell<'_>) -> String>,
    /// Draws the pagination bar.
    pub pagination: Box<dyn Fn(&PaginationBar) -> String>,
    /// Draws the placeholder row shown when there are no results.
    pub empty: Box<dyn Fn(&EmptyState) -> String>,
}

impl Default for RenderSlots {
    fn default() -> Self {
        Self {
            header_cell: Box::new(default_header_cell),
            body_cell: Box::new(default_body_cell),
            pagination: Box::new(default_pagination),
            empty: Box::new(default_empty),
        }
    }
}

fn default_header_cell(cell: &HeaderCell<'_>) -> String {
    let marker = match cell.sort {
        Some(Direction::Asc) => " ^",
        Some(Direction::Desc) => " v",
        None => "",
    };
    fit(&format!("{}{}", cell.column.header, marker), cell.width)
        .bold()
        .to_string()
}

fn default_body_cell(cell: &BodyCell<'_>) -> String {
    if cell.pending {
        let blocks = "░".repeat(cell.width as usize);
        return fit(&blocks, cell.width).dim().to_string();
    }

    let text = fit(cell.text, cell.width);
    if cell.focused {
        text.reverse().to_string()
    } else if cell.selected {
        text.bold().to_string()
    } else {
        text
    }
}

fn default_pagination(bar: &PaginationBar) -> String {
    format!(
        "{} of {} row(s) selected · Page {} of {} · {} per page · {} total",
        bar.selected,
        bar.row_count,
        bar.page,
        bar.page_count.max(1),
        bar.items,
        bar.total,
    )
}

fn default_empty(state: &EmptyState) -> String {
    format!("{:^1$}", "No results.", state.width as usize)
}

/// Renders the full table chrome as terminal lines.
///
/// The contract: the header renders exactly once, the body renders one line
/// per visible row (or the empty-state placeholder when there are no rows
/// and no fetch is in flight), and the pagination bar renders exactly once.
pub fn render_table<T: TableRow>(
    state: &TableState<T>,
    slots: &RenderSlots,
    width: u16,
    pending: bool,
) -> Vec<String> {
    let rows = state.visible_rows();

    let mut columns: Vec<Column> = vec![select_column(state, &rows)];
    columns.extend(state.visible_columns().into_iter().cloned());
    let widths = layout_widths(&columns, width);

    let mut lines = Vec::new();

    let header = columns
        .iter()
        .zip(&widths)
        .map(|(column, &cell_width)| {
            let sort = state
                .sort()
                .filter(|s| s.column_id == column.id)
                .map(|s| s.direction);
            (slots.header_cell)(&HeaderCell {
                column,
                sort,
                width: cell_width,
            })
        })
        .collect::<Vec<_>>()
        .join(" ");
    lines.push(header);

    if rows.is_empty() {
        if !pending {
            lines.push((slots.empty)(&EmptyState { width }));
        }
    } else {
        for (index, row) in rows.iter().enumerate() {
            let key = row.key();
            let selected = state.selection.is_selected(&key);
            let focused = index == state.cursor();

            let line = columns
                .iter()
                .zip(&widths)
                .map(|(column, &cell_width)| {
                    let text = if column.id == SELECT_COLUMN {
                        if selected { "[x]".to_string() } else { "[ ]".to_string() }
                    } else {
                        row.cell(&column.id)
                    };
                    (slots.body_cell)(&BodyCell {
                        column,
                        text: &text,
                        selected,
                        focused,
                        pending,
                        width: cell_width,
                    })
                })
                .collect::<Vec<_>>()
                .join(" ");
            lines.push(line);
        }
    }

    lines.push((slots.pagination)(&PaginationBar {
        page: state.page(),
        page_count: state.page_count(),
        items: state.items(),
        total: state.total(),
        selected: state.selection.len(),
        row_count: rows.len(),
    }));

    lines
}

/// The selection-marker column. Its header doubles as the select-all
/// indicator for the current page.
fn select_column<T: TableRow>(state: &TableState<T>, rows: &[T]) -> Column {
    let keys: Vec<_> = rows.iter().map(TableRow::key).collect();
    let header = if state.selection.all_selected(keys.iter()) {
        "[x]"
    } else {
        "[ ]"
    };
    Column::new(SELECT_COLUMN, header)
        .fixed(3)
        .sortable(false)
        .hideable(false)
}

/// Distributes the table width over the columns: fixed columns take their
/// width, the rest is split between flex columns by weight.
fn layout_widths(columns: &[Column], total: u16) -> Vec<u16> {
    let separators = columns.len().saturating_sub(1) as u16;
    let fixed: u16 = columns
        .iter()
        .map(|col| match col.width {
            ColumnWidth::Fixed(w) => w,
            ColumnWidth::Flex(_) => 0,
        })
        .sum();

    let mut remaining = total.saturating_sub(fixed).saturating_sub(separators);
    let mut weight_left: u16 = columns
        .iter()
        .map(|col| match col.width {
            ColumnWidth::Fixed(_) => 0,
            ColumnWidth::Flex(weight) => weight,
        })
        .sum();

    columns
        .iter()
        .map(|col| match col.width {
            ColumnWidth::Fixed(w) => w,
            ColumnWidth::Flex(weight) => {
                if weight_left == 0 {
                    return 1;
                }
                let share = (u32::from(remaining) * u32::from(weight) / u32::from(weight_left))
                    .max(1) as u16;
                remaining = remaining.saturating_sub(share);
                weight_left -= weight;
                share
            }
        })
        .collect()
}

/// Truncates `text` to the given display width and pads it with spaces.
fn fit(text: &str, width: u16) -> String {
    let width = width as usize;
    let mut out = String::new();
    let mut used = 0;

    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }

    out.push_str(&" ".repeat(width - used));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableMode;

    #[derive(Clone)]
    struct TestRow {
        id: u32,
        name: &'static str,
    }

    impl TableRow for TestRow {
        type Key = u32;

        fn key(&self) -> u32 {
            self.id
        }

        fn cell(&self, column_id: &str) -> String {
            match column_id {
                "name" => self.name.to_string(),
                _ => String::new(),
            }
        }
    }

    fn table_with(rows: u32) -> TableState<TestRow> {
        let mut table = TableState::new(
            vec![Column::new("name", "Name"), Column::new("id", "Id").fixed(6)],
            TableMode::Manual,
        );
        table.set_rows(
            (0..rows)
                .map(|i| TestRow { id: i, name: "alice" })
                .collect(),
        );
        table.set_manual_counts(rows as usize, 1);
        table
    }

    #[test]
    fn test_header_rows_and_pagination_counts() {
        let table = table_with(3);
        let lines = render_table(&table, &RenderSlots::default(), 60, false);

        // One header, three rows, one pagination bar.
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("Name"));
        assert!(lines[4].contains("Page 1 of 1"));
    }

    #[test]
    fn test_empty_idle_shows_single_placeholder() {
        let table = table_with(0);
        let lines = render_table(&table, &RenderSlots::default(), 60, false);

        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("No results."));
    }

    #[test]
    fn test_empty_pending_shows_no_placeholder() {
        let table = table_with(0);
        let lines = render_table(&table, &RenderSlots::default(), 60, true);

        assert_eq!(lines.len(), 2);
        assert!(!lines.iter().any(|l| l.contains("No results.")));
    }

    #[test]
    fn test_pending_rows_render_skeletons() {
        let table = table_with(2);
        let lines = render_table(&table, &RenderSlots::default(), 60, true);

        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("░"));
        assert!(!lines[1].contains("alice"));
    }

    #[test]
    fn test_select_all_marker_in_header() {
        let mut table = table_with(2);
        let lines = render_table(&table, &RenderSlots::default(), 60, false);
        assert!(lines[0].contains("[ ]"));

        table.toggle_select_all_visible();
        let lines = render_table(&table, &RenderSlots::default(), 60, false);
        assert!(lines[0].contains("[x]"));
    }

    #[test]
    fn test_host_can_replace_a_slot() {
        let table = table_with(0);
        let slots = RenderSlots {
            empty: Box::new(|_| "nothing here".to_string()),
            ..RenderSlots::default()
        };
        let lines = render_table(&table, &slots, 60, false);
        assert!(lines[1].contains("nothing here"));
    }

    #[test]
    fn test_layout_gives_fixed_then_splits_flex() {
        let columns = vec![
            Column::new("a", "A").fixed(10),
            Column::new("b", "B").flex(1),
            Column::new("c", "C").flex(1),
        ];
        let widths = layout_widths(&columns, 40);

        assert_eq!(widths[0], 10);
        // 40 - 10 fixed - 2 separators = 28 split between two flex columns.
        assert_eq!(widths[1] + widths[2], 28);
    }

    #[test]
    fn test_fit_truncates_and_pads() {
        assert_eq!(fit("abcdef", 4), "abcd");
        assert_eq!(fit("ab", 4), "ab  ");
    }
}
