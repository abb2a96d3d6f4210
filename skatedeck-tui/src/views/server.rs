//! Server-controlled roster view.
//!
//! The query string is the single source of truth: every interaction merges
//! a partial update into it, and navigation decodes the result back into a
//! store query. Navigation is two-phase — `navigate` applies the update and
//! marks the view in-flight, `complete_fetch` runs the query — so the event
//! loop can draw the in-flight frame between the two.

use std::sync::Arc;

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;

use skatedeck_lib::SkaterStore;
use skatedeck_lib::SqliteStore;
use skatedeck_lib::model::Skater;
use skatedeck_lib::model::Stance;
use skatedeck_lib::query::ParamUpdate;
use skatedeck_lib::query::QueryState;
use skatedeck_lib::query::merge_query_string;

use crate::table::ColumnSort;
use crate::table::RenderSlots;
use crate::table::TableMode;
use crate::table::TableState;
use crate::table::render_table;

use super::ViewAction;
use super::columns_menu_line;
use super::next_page_size;
use super::skater_columns;

/// The query-string-driven browsing view.
pub struct ServerView {
    store: Arc<SqliteStore>,
    /// The current location. Always round-trippable to `state`.
    location: String,
    state: QueryState,
    table: TableState<Skater>,
    page_count: usize,
    pending: bool,
    email_input: String,
    editing_email: bool,
    columns_menu: bool,
    status: Option<String>,
    slots: RenderSlots,
}

impl ServerView {
    /// Creates the view with its initial navigation staged. The event loop
    /// completes it with [`complete_fetch`](Self::complete_fetch).
    pub fn new(store: Arc<SqliteStore>) -> Self {
        let slots = RenderSlots {
            empty: Box::new(|state| {
                format!("{:^1$}", "No skaters match this filter.", state.width as usize)
            }),
            ..RenderSlots::default()
        };

        let mut view = Self {
            store,
            location: String::new(),
            state: QueryState::default(),
            table: TableState::new(skater_columns(), TableMode::Manual),
            page_count: 0,
            pending: false,
            email_input: String::new(),
            editing_email: false,
            columns_menu: false,
            status: None,
            slots,
        };
        view.navigate(&[]);
        view
    }

    /// Whether keystrokes are currently going into the filter input.
    pub fn is_typing(&self) -> bool {
        self.editing_email
    }

    /// Whether a staged navigation still needs its fetch run.
    pub fn needs_fetch(&self) -> bool {
        self.pending
    }

    /// Applies a partial query-state update and stages the re-fetch.
    fn navigate(&mut self, updates: &[ParamUpdate]) {
        self.location = merge_query_string(&self.location, updates);
        self.state = QueryState::parse(&self.location);

        if !self.editing_email {
            self.email_input = self.state.email.clone().unwrap_or_default();
        }
        self.table.set_items(self.state.items);
        self.table.set_page(self.state.page);
        self.table.apply_sort(self.explicit_sort());

        self.status = None;
        self.pending = true;
        log::info!("navigate -> ?{}", self.location);
    }

    /// The sort marker to display: present only when the query string
    /// actually carries a sort parameter. The store still orders by the
    /// default otherwise.
    fn explicit_sort(&self) -> Option<ColumnSort> {
        let has_sort = self
            .location
            .split('&')
            .any(|part| part.starts_with("sort="));
        has_sort.then(|| ColumnSort {
            column_id: self.state.sort.as_str().to_string(),
            direction: self.state.order,
        })
    }

    /// Runs the staged fetch. A failed fetch renders an empty error state
    /// instead of crashing the loop.
    pub async fn complete_fetch(&mut self) {
        match self.store.list(&self.state.to_query()).await {
            Ok(page) => {
                self.page_count = page.page_count(self.state.items);
                self.table
                    .set_manual_counts(page.total_count(), self.page_count);
                self.table.set_rows(page.into_records());
            }
            Err(e) => {
                log::warn!("fetch failed: {e}");
                self.page_count = 0;
                self.table.set_manual_counts(0, 0);
                self.table.set_rows(Vec::new());
                self.status = Some(format!("Fetch failed: {e}"));
            }
        }
        self.pending = false;
    }

    /// Renders the view as terminal lines.
    pub fn render(&self, width: u16) -> Vec<String> {
        let mut lines = Vec::new();
        lines.push(format!("Skaters — server-controlled · ?{}", self.location));
        lines.push(self.filter_bar());
        if self.columns_menu {
            lines.push(format!("Columns: {}", columns_menu_line(&self.table)));
        }
        lines.extend(render_table(&self.table, &self.slots, width, self.pending));
        if let Some(status) = &self.status {
            lines.push(status.clone());
        }
        lines
    }

    fn filter_bar(&self) -> String {
        let cursor = if self.editing_email { "_" } else { "" };
        let stance = self
            .state
            .stance
            .map(|s| format!(" · stance: {}", s))
            .unwrap_or_default();
        format!("Search emails: {}{}{}", self.email_input, cursor, stance)
    }

    /// Handles one key press, returning what the event loop should do next.
    ///
    /// Controls that would trigger a navigation are disabled while one is
    /// already in flight.
    pub async fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
        if self.editing_email {
            match key.code {
                KeyCode::Esc => self.editing_email = false,
                KeyCode::Enter => {
                    self.editing_email = false;
                    return ViewAction::CommitFilter;
                }
                KeyCode::Backspace => {
                    if self.email_input.pop().is_some() {
                        return ViewAction::FilterEdited;
                    }
                }
                KeyCode::Char(c) => {
                    self.email_input.push(c);
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
            KeyCode::Char('/') => self.editing_email = true,
            KeyCode::Char('c') => self.columns_menu = true,
            KeyCode::Char('s') if !self.pending => self.cycle_sort(),
            KeyCode::Char('[') if !self.pending => self.prev_page(),
            KeyCode::Char(']') if !self.pending => self.next_page(),
            KeyCode::Char('{') if !self.pending => self.first_page(),
            KeyCode::Char('}') if !self.pending => self.last_page(),
            KeyCode::Char('i') if !self.pending => self.cycle_items(),
            KeyCode::Char('m') if !self.pending => self.toggle_stance(Stance::Mongo),
            KeyCode::Char('g') if !self.pending => self.toggle_stance(Stance::Goofy),
            KeyCode::Char('x') if !self.pending => self.clear_stance(),
            KeyCode::Char('d') if !self.pending => self.delete_selected().await,
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

        let updates = match self.table.next_sort_direction(&column_id) {
            Some(direction) => vec![
                ParamUpdate::set("sort", &column_id),
                ParamUpdate::set("order", direction.as_str()),
            ],
            None => vec![
                ParamUpdate::remove("sort"),
                ParamUpdate::remove("order"),
            ],
        };
        self.navigate(&updates);
    }

    fn prev_page(&mut self) {
        if self.state.page > 1 {
            self.navigate(&[ParamUpdate::set("page", self.state.page - 1)]);
        }
    }

    fn next_page(&mut self) {
        if self.state.page < self.page_count {
            self.navigate(&[ParamUpdate::set("page", self.state.page + 1)]);
        }
    }

    fn first_page(&mut self) {
        if self.state.page != 1 {
            self.navigate(&[ParamUpdate::set("page", 1)]);
        }
    }

    fn last_page(&mut self) {
        if self.page_count > 0 && self.state.page != self.page_count {
            self.navigate(&[ParamUpdate::set("page", self.page_count)]);
        }
    }

    fn cycle_items(&mut self) {
        let items = next_page_size(self.state.items);
        self.navigate(&[ParamUpdate::set("items", items)]);
    }

    fn toggle_stance(&mut self, stance: Stance) {
        let updates = if self.state.stance == Some(stance) {
            vec![ParamUpdate::set("page", 1), ParamUpdate::remove("stance")]
        } else {
            vec![
                ParamUpdate::set("page", 1),
                ParamUpdate::set("stance", stance.as_str()),
            ]
        };
        self.navigate(&updates);
    }

    fn clear_stance(&mut self) {
        if self.state.stance.is_some() {
            self.navigate(&[ParamUpdate::set("page", 1), ParamUpdate::remove("stance")]);
        }
    }

    /// Turns the debounced email input into a navigation. Filter changes
    /// always return to the first page.
    pub fn commit_filter(&mut self) {
        if self.pending {
            return;
        }
        let updates = if self.email_input.is_empty() {
            vec![ParamUpdate::set("page", 1), ParamUpdate::remove("email")]
        } else {
            vec![
                ParamUpdate::set("page", 1),
                ParamUpdate::set("email", &self.email_input),
            ]
        };
        self.navigate(&updates);
    }

    /// Deletes the selected rows, then re-runs the current query. A failed
    /// delete leaves the selection untouched.
    async fn delete_selected(&mut self) {
        let ids = self.table.selection.keys();
        if ids.is_empty() {
            return;
        }

        match self.store.delete_many(&ids).await {
            Ok(removed) => {
                self.table.selection.clear();
                self.navigate(&[]);
                self.status = Some(format!("Deleted {} record(s)", removed));
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
    use skatedeck_lib::query::Direction;

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

    async fn opened(count: usize) -> ServerView {
        let mut view = ServerView::new(seeded_store(count).await);
        view.complete_fetch().await;
        view
    }

    #[tokio::test]
    async fn test_open_fetches_the_default_page() {
        let view = opened(25).await;
        assert!(!view.needs_fetch());
        assert_eq!(view.table.visible_rows().len(), 10);
        assert_eq!(view.page_count, 3);
    }

    #[tokio::test]
    async fn test_navigation_is_two_phase() {
        let mut view = opened(25).await;

        view.navigate(&[ParamUpdate::set("page", 2)]);
        assert!(view.needs_fetch());
        // The stale rows are still there for the in-flight frame.
        assert_eq!(view.table.visible_rows().len(), 10);

        view.complete_fetch().await;
        assert!(!view.needs_fetch());
        assert_eq!(view.table.visible_rows()[0].email, "skater010@example.com");
    }

    #[tokio::test]
    async fn test_location_round_trips_through_state() {
        let mut view = opened(25).await;

        view.navigate(&[
            ParamUpdate::set("page", 2),
            ParamUpdate::set("email", "skater0"),
        ]);
        view.complete_fetch().await;

        assert_eq!(QueryState::parse(&view.location), view.state);
        assert_eq!(view.state.page, 2);
        assert_eq!(view.state.email.as_deref(), Some("skater0"));
    }

    #[tokio::test]
    async fn test_stance_toggle_resets_page_and_removes_on_repeat() {
        let mut view = opened(40).await;

        view.navigate(&[ParamUpdate::set("page", 3)]);
        view.complete_fetch().await;

        view.toggle_stance(Stance::Mongo);
        view.complete_fetch().await;
        assert_eq!(view.state.page, 1);
        assert_eq!(view.state.stance, Some(Stance::Mongo));
        assert_eq!(view.table.total(), 20);

        view.toggle_stance(Stance::Mongo);
        view.complete_fetch().await;
        assert_eq!(view.state.stance, None);
        assert!(!view.location.contains("stance"));
    }

    #[tokio::test]
    async fn test_sort_cycle_walks_the_query_string() {
        let mut view = opened(5).await;

        // Focus starts on the name column.
        assert_eq!(view.table.focused_column().map(|c| c.id.clone()), Some("name".into()));

        view.cycle_sort();
        view.complete_fetch().await;
        assert!(view.location.contains("sort=name"));
        assert!(view.location.contains("order=asc"));
        assert_eq!(
            view.table.sort().map(|s| s.direction),
            Some(Direction::Asc)
        );

        view.cycle_sort();
        view.complete_fetch().await;
        assert!(view.location.contains("order=desc"));

        view.cycle_sort();
        view.complete_fetch().await;
        assert!(!view.location.contains("sort="));
        assert!(view.table.sort().is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_selection_and_refreshes() {
        let mut view = opened(12).await;

        view.table.toggle_select_all_visible();
        assert_eq!(view.table.selection.len(), 10);

        view.delete_selected().await;
        view.complete_fetch().await;

        assert!(view.table.selection.is_empty());
        assert_eq!(view.table.total(), 2);
    }

    #[tokio::test]
    async fn test_email_commit_navigates_to_first_page() {
        let mut view = opened(30).await;

        view.navigate(&[ParamUpdate::set("page", 2)]);
        view.complete_fetch().await;

        view.email_input = "skater02".into();
        view.commit_filter();
        view.complete_fetch().await;

        assert_eq!(view.state.page, 1);
        assert_eq!(view.table.total(), 10);
    }
}
