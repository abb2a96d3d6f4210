//! Client-controlled roster view.
//!
//! Fetches the complete record set exactly once when the view is opened,
//! then hands everything to a self-managed table: filter, sort, and page
//! changes are pure in-memory operations, with no re-fetch regardless of
//! dataset size.

use std::sync::Arc;

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;

use skatedeck_lib::SkaterStore;
use skatedeck_lib::SqliteStore;
use skatedeck_lib::error::StoreError;
use skatedeck_lib::model::Skater;
use skatedeck_lib::model::Stance;
use skatedeck_lib::query::Direction;

use crate::table::ColumnSort;
use crate::table::MatchKind;
use crate::table::RenderSlots;
use crate::table::TableMode;
use crate::table::TableState;
use crate::table::render_table;

use super::ViewAction;
use super::columns_menu_line;
use super::next_page_size;
use super::skater_columns;

/// Which debounced text input is receiving keystrokes.
#[derive(Clone, Copy, PartialEq, Eq)]
enum EditTarget {
    Email,
    Global,
}

/// The in-memory browsing view.
pub struct ClientView {
    store: Arc<SqliteStore>,
    table: TableState<Skater>,
    slots: RenderSlots,
    email_input: String,
    global_input: String,
    editing: Option<EditTarget>,
    columns_menu: bool,
    status: Option<String>,
}

impl ClientView {
    /// Opens the view, fetching the full roster once.
    pub async fn open(store: Arc<SqliteStore>) -> Result<Self, StoreError> {
        let rows = store.fetch_all().await?;
        log::info!("client view loaded {} records", rows.len());

        let mut table = TableState::new(skater_columns(), TableMode::SelfManaged);
        table.set_rows(rows);
        // Fixed initial sort; after this the sort is whatever the user
        // cycles to.
        table.apply_sort(Some(ColumnSort {
            column_id: "email".into(),
            direction: Direction::Asc,
        }));

        Ok(Self {
            store,
            table,
            slots: RenderSlots::default(),
            email_input: String::new(),
            global_input: String::new(),
            editing: None,
            columns_menu: false,
            status: None,
        })
    }

    /// Whether keystrokes are currently going into a filter input.
    pub fn is_typing(&self) -> bool {
        self.editing.is_some()
    }

    /// Renders the view as terminal lines.
    pub fn render(&self, width: u16) -> Vec<String> {
        let mut lines = Vec::new();
        lines.push("Skaters — client-controlled (in-memory)".to_string());
        lines.push(self.filter_bar());
        if self.columns_menu {
            lines.push(format!("Columns: {}", columns_menu_line(&self.table)));
        }
        lines.extend(render_table(&self.table, &self.slots, width, false));
        if let Some(status) = &self.status {
            lines.push(status.clone());
        }
        lines
    }

    fn filter_bar(&self) -> String {
        let cursor = |target| {
            if self.editing == Some(target) { "_" } else { "" }
        };
        let stance = self
            .table
            .filter_value("stance")
            .map(|s| format!(" · stance: {}", s))
            .unwrap_or_default();
        format!(
            "Search all: {}{} · Search emails: {}{}{}",
            self.global_input,
            cursor(EditTarget::Global),
            self.email_input,
            cursor(EditTarget::Email),
            stance
        )
    }

    /// Handles one key press, returning what the event loop should do next.
    pub async fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
        if let Some(target) = self.editing {
            let input = match target {
                EditTarget::Email => &mut self.email_input,
                EditTarget::Global => &mut self.global_input,
            };
            match key.code {
                KeyCode::Esc => self.editing = None,
                KeyCode::Enter => {
                    self.editing = None;
                    return ViewAction::CommitFilter;
                }
                KeyCode::Backspace => {
                    if input.pop().is_some() {
                        return ViewAction::FilterEdited;
                    }
                }
                KeyCode::Char(c) => {
                    input.push(c);
                    return ViewAction::FilterEdited;
                }
                _ => {}
            }
            return ViewAction::None;
        }

        if self.columns_menu {
            match key.code {
                KeyCode::Esc | KeyCode::Char('c') => self.columns_menu = false,
                KeyCode::Char(c @ '1'..='9') => {
                    let index = c as usize - '1' as usize;
                    let id = self
                        .table
                        .hideable_columns()
                        .get(index)
                        .map(|column| column.id.clone());
                    if let Some(id) = id {
                        self.table.toggle_column(&id);
                    }
                }
                _ => {}
            }
            return ViewAction::None;
        }

        match key.code {
            KeyCode::Up => self.table.move_cursor(-1),
            KeyCode::Down => self.table.move_cursor(1),
            KeyCode::Left => self.table.move_focus(-1),
            KeyCode::Right => self.table.move_focus(1),
            KeyCode::Char(' ') => self.table.toggle_cursor_selection(),
            KeyCode::Char('a') => self.table.toggle_select_all_visible(),
            KeyCode::Char('/') => self.editing = Some(EditTarget::Email),
            KeyCode::Char('?') => self.editing = Some(EditTarget::Global),
            KeyCode::Char('c') => self.columns_menu = true,
            KeyCode::Char('s') => self.cycle_sort(),
            KeyCode::Char('[') => {
                let page = self.table.page();
                if page > 1 {
                    self.table.set_page(page - 1);
                }
            }
            KeyCode::Char(']') => {
                let page = self.table.page();
                if page < self.table.page_count() {
                    self.table.set_page(page + 1);
                }
            }
            KeyCode::Char('{') => self.table.set_page(1),
            KeyCode::Char('}') => {
                let last = self.table.page_count().max(1);
                self.table.set_page(last);
            }
            KeyCode::Char('i') => {
                let items = next_page_size(self.table.items());
                self.table.set_items(items);
            }
            KeyCode::Char('m') => self.toggle_stance(Stance::Mongo),
            KeyCode::Char('g') => self.toggle_stance(Stance::Goofy),
            KeyCode::Char('x') => self.table.set_filter("stance", MatchKind::Exact, None),
            KeyCode::Char('d') => self.delete_selected().await,
            _ => {}
        }

        ViewAction::None
    }

    fn cycle_sort(&mut self) {
        let Some(column) = self.table.focused_column() else {
            return;
        };
        if !column.sortable {
            return;
        }
        let column_id = column.id.clone();
        self.table.cycle_sort(&column_id);
    }

    fn toggle_stance(&mut self, stance: Stance) {
        let value = if self.table.filter_value("stance") == Some(stance.as_str()) {
            None
        } else {
            Some(stance.as_str().to_string())
        };
        self.table.set_filter("stance", MatchKind::Exact, value);
    }

    /// Applies the debounced filter inputs to the in-memory table.
    pub fn commit_filter(&mut self) {
        let email = if self.email_input.is_empty() {
            None
        } else {
            Some(self.email_input.clone())
        };
        self.table.set_filter("email", MatchKind::Substring, email);

        let global = if self.global_input.is_empty() {
            None
        } else {
            Some(self.global_input.clone())
        };
        self.table.set_global_filter(global);
    }

    /// Deletes the selected rows and re-fetches the roster on success. A
    /// failed delete leaves the selection untouched.
    async fn delete_selected(&mut self) {
        let ids = self.table.selection.keys();
        if ids.is_empty() {
            return;
        }

        match self.store.delete_many(&ids).await {
            Ok(removed) => {
                self.table.selection.clear();
                match self.store.fetch_all().await {
                    Ok(rows) => {
                        self.table.set_rows(rows);
                        self.status = Some(format!("Deleted {} record(s)", removed));
                    }
                    Err(e) => {
                        log::warn!("refetch after delete failed: {e}");
                        self.status = Some(format!("Refetch failed: {e}"));
                    }
                }
            }
            Err(e) => {
                log::warn!("delete failed: {e}");
                self.status = Some(format!("Delete failed: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use skatedeck_lib::model::Money;

    async fn seeded_store(count: usize) -> Arc<SqliteStore> {
        let store = SqliteStore::open_in_memory().await.expect("open store");
        for i in 0..count {
            let stance = if i % 2 == 0 { Stance::Mongo } else { Stance::Goofy };
            let skater = Skater::new(
                format!("Skater {:03}", i),
                format!("skater{:03}@example.com", i),
                18,
                stance,
                "ollie",
                Money::from_cents(5_000),
            );
            store.insert(&skater).await.expect("insert");
        }
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_open_fetches_everything_with_email_sort() {
        let view = ClientView::open(seeded_store(25).await).await.unwrap();

        assert_eq!(view.table.rows().len(), 25);
        assert_eq!(view.table.total(), 25);
        // Fixed initial sort: email ascending.
        let visible = view.table.visible_rows();
        assert_eq!(visible.len(), 10);
        assert_eq!(visible[0].email, "skater000@example.com");
    }

    #[tokio::test]
    async fn test_filtering_never_refetches() {
        let store = seeded_store(10).await;
        let mut view = ClientView::open(store.clone()).await.unwrap();

        // Empty the store behind the view's back.
        let all = store.fetch_all().await.unwrap();
        let ids: Vec<_> = all.iter().map(|s| s.id).collect();
        store.delete_many(&ids).await.unwrap();

        view.email_input = "skater00".into();
        view.commit_filter();

        // The view still filters the set it fetched at open.
        assert_eq!(view.table.total(), 10);
    }

    #[tokio::test]
    async fn test_global_search_narrows_across_columns() {
        let mut view = ClientView::open(seeded_store(6).await).await.unwrap();

        // "Skater 003" only appears in the name column.
        view.global_input = "Skater 003".into();
        view.commit_filter();
        assert_eq!(view.table.total(), 1);

        view.global_input.clear();
        view.commit_filter();
        assert_eq!(view.table.total(), 6);
    }

    #[tokio::test]
    async fn test_delete_clears_selection_and_refetches() {
        let mut view = ClientView::open(seeded_store(12).await).await.unwrap();

        view.table.toggle_select_all_visible();
        assert_eq!(view.table.selection.len(), 10);

        view.delete_selected().await;

        assert!(view.table.selection.is_empty());
        assert_eq!(view.table.rows().len(), 2);
        assert_eq!(view.store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_with_empty_selection_is_a_no_op() {
        let mut view = ClientView::open(seeded_store(4).await).await.unwrap();

        view.delete_selected().await;
        assert_eq!(view.table.rows().len(), 4);
        assert!(view.status.is_none());
    }
}
