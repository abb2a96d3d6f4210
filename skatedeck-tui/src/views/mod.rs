//! Browsing views.
//!
//! Both views share the roster's column layout and row mapping; they differ
//! in who owns the browse state (see the table widget's modes).

mod client;
mod server;

pub use client::ClientView;
pub use server::ServerView;

use uuid::Uuid;

use skatedeck_lib::model::Skater;

use crate::table::Column;
use crate::table::SortKey;
use crate::table::TableRow;
use crate::table::TableState;

/// Page sizes offered by the page-size selector.
pub const PAGE_SIZES: [usize; 5] = [10, 20, 30, 40, 50];

/// Signals a view sends back to the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    /// Nothing for the loop to do.
    None,
    /// The email filter text changed; restart the debounce delay.
    FilterEdited,
    /// Commit the email filter now, skipping the remaining delay.
    CommitFilter,
}

/// Roster column layout shared by both views.
///
/// Age is intentionally not sortable; the selection and price columns keep
/// fixed widths so the flexible text columns absorb resizes.
pub fn skater_columns() -> Vec<Column> {
    vec![
        Column::new("name", "Name").flex(2),
        Column::new("age", "Age").fixed(5).sortable(false),
        Column::new("email", "Email").flex(3),
        Column::new("stats", "Stats").flex(3),
        Column::new("stance", "Stance").fixed(8),
        Column::new("deck_price", "Deck Price").fixed(12),
    ]
}

impl TableRow for Skater {
    type Key = Uuid;

    fn key(&self) -> Uuid {
        self.id
    }

    fn cell(&self, column_id: &str) -> String {
        match column_id {
            "name" => self.name.clone(),
            "age" => self.age.to_string(),
            "email" => self.email.clone(),
            "stats" => self.stats.clone(),
            "stance" => self.stance.to_string(),
            "deck_price" => self.deck_price.to_string(),
            _ => String::new(),
        }
    }

    fn sort_key(&self, column_id: &str) -> SortKey {
        match column_id {
            "age" => SortKey::Number(f64::from(self.age)),
            "deck_price" => {
                SortKey::Number(self.deck_price.to_cents().unwrap_or(i64::MAX) as f64)
            }
            _ => SortKey::Text(self.cell(column_id)),
        }
    }
}

/// Advances through [`PAGE_SIZES`], wrapping at the end.
pub(crate) fn next_page_size(current: usize) -> usize {
    match PAGE_SIZES.iter().position(|&size| size == current) {
        Some(index) => PAGE_SIZES[(index + 1) % PAGE_SIZES.len()],
        None => PAGE_SIZES[0],
    }
}

/// One-line column visibility menu: digits toggle hideable columns.
pub(crate) fn columns_menu_line(table: &TableState<Skater>) -> String {
    table
        .hideable_columns()
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let marker = if table.is_hidden(&column.id) { " " } else { "x" };
            format!("{}:{} [{}]", index + 1, column.header, marker)
        })
        .collect::<Vec<_>>()
        .join("  ")
}
