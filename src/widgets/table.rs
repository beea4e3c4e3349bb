//! Table widget: rows of payload maps shown under a column header.
//!
//! The table keeps every row it was given and a filtered view of row indices.
//! The cursor indexes into the filtered view, so `selected_row` always returns
//! a row the user can see.

use serde_json::Value;

use crate::command::Cmd;
use crate::config::{ColumnSpec, TableConfig};
use crate::event::binding::Bindings;
use crate::event::bus::EventBus;
use crate::event::input::{InputEvent, Key};
use crate::event::message::{Message, Payload};
use crate::widget::dispatch::{dispatch, Interactive};
use crate::widget::traits::{Component, ComponentId, Focusable, Response};

/// Rows moved by PageUp/PageDown when no height is configured.
const DEFAULT_PAGE: usize = 10;

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// A scrollable, filterable table.
#[derive(Debug, Clone)]
pub struct Table {
    id: ComponentId,
    columns: Vec<ColumnSpec>,
    rows: Vec<Payload>,
    /// Indices into `rows` that pass the filter, in row order.
    visible: Vec<usize>,
    cursor: usize,
    filter: String,
    height: Option<u16>,
    focused: bool,
    bindings: Bindings,
    bus: Option<EventBus>,
}

impl Table {
    /// Create an empty table with the given columns.
    pub fn new(id: impl Into<ComponentId>, columns: Vec<ColumnSpec>) -> Self {
        Self {
            id: id.into(),
            columns,
            rows: Vec::new(),
            visible: Vec::new(),
            cursor: 0,
            filter: String::new(),
            height: None,
            focused: false,
            bindings: Bindings::new(),
            bus: None,
        }
    }

    /// Build from a `table_props` configuration.
    pub fn from_config(id: impl Into<ComponentId>, config: &TableConfig) -> Self {
        let mut table = Self::new(id, config.columns.clone()).with_bindings(config.bindings.clone());
        table.height = config.height;
        table.set_rows(config.rows.clone());
        table
    }

    /// Set the initial rows (builder pattern).
    pub fn with_rows(mut self, rows: Vec<Payload>) -> Self {
        self.set_rows(rows);
        self
    }

    /// Set the bindings (builder pattern).
    pub fn with_bindings(mut self, bindings: Bindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Publish binding events on `bus` (builder pattern).
    pub fn with_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    // ── Rows ─────────────────────────────────────────────────────────

    /// Replace every row. The filter is re-applied and the cursor clamped.
    pub fn set_rows(&mut self, rows: Vec<Payload>) {
        self.rows = rows;
        self.refilter();
    }

    /// All rows, ignoring the filter.
    pub fn rows(&self) -> &[Payload] {
        &self.rows
    }

    /// Rows that pass the filter, in order.
    pub fn visible_rows(&self) -> impl Iterator<Item = &Payload> {
        self.visible.iter().map(|&i| &self.rows[i])
    }

    /// Number of rows that pass the filter.
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// The columns.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// The row under the cursor.
    pub fn selected_row(&self) -> Option<&Payload> {
        self.visible.get(self.cursor).map(|&i| &self.rows[i])
    }

    /// Cursor position within the visible rows.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    // ── Filtering ────────────────────────────────────────────────────

    /// Show only rows with a cell containing `query`, ignoring case.
    pub fn filter(&mut self, query: &str) {
        self.filter = query.to_lowercase();
        self.refilter();
    }

    /// Show every row again.
    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.refilter();
    }

    /// The active filter (lowercased), empty if none.
    pub fn filter_query(&self) -> &str {
        &self.filter
    }

    fn refilter(&mut self) {
        let query = &self.filter;
        self.visible = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                query.is_empty()
                    || row
                        .values()
                        .any(|v| cell_text(v).to_lowercase().contains(query.as_str()))
            })
            .map(|(i, _)| i)
            .collect();
        self.cursor = self.cursor.min(self.visible.len().saturating_sub(1));
    }

    // ── Cursor ───────────────────────────────────────────────────────

    /// Move the cursor up one row.
    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the cursor down one row.
    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.visible.len() {
            self.cursor += 1;
        }
    }

    /// Move the cursor to the first row.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move the cursor to the last row.
    pub fn move_end(&mut self) {
        self.cursor = self.visible.len().saturating_sub(1);
    }

    /// Move the cursor up one page.
    pub fn page_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(self.page_size());
    }

    /// Move the cursor down one page.
    pub fn page_down(&mut self) {
        let last = self.visible.len().saturating_sub(1);
        self.cursor = (self.cursor + self.page_size()).min(last);
    }

    /// Body rows that fit: the configured height minus the header line.
    fn page_size(&self) -> usize {
        match self.height {
            Some(h) => usize::from(h).saturating_sub(1).max(1),
            None => DEFAULT_PAGE,
        }
    }

    fn column_width(&self, column: &ColumnSpec) -> usize {
        if let Some(w) = column.width {
            return usize::from(w);
        }
        self.visible_rows()
            .map(|row| row.get(&column.key).map_or(0, |v| cell_text(v).chars().count()))
            .chain(std::iter::once(column.title.chars().count()))
            .max()
            .unwrap_or(0)
    }
}

/// Display text of one cell. Strings are shown bare, null as empty.
pub(crate) fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn fit(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{truncated:<width$}")
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

impl Focusable for Table {
    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn has_focus(&self) -> bool {
        self.focused
    }
}

impl Component for Table {
    fn id(&self) -> &ComponentId {
        &self.id
    }

    fn view(&self) -> String {
        let widths: Vec<usize> = self.columns.iter().map(|c| self.column_width(c)).collect();
        let render = |cells: Vec<String>| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(text, &w)| fit(text, w))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_owned()
        };

        let mut lines = Vec::new();
        lines.push(format!(
            "  {}",
            render(self.columns.iter().map(|c| c.title.clone()).collect())
        ));

        let page = self.page_size();
        let start = if self.height.is_some() {
            self.cursor.saturating_sub(page - 1)
        } else {
            0
        };
        let end = if self.height.is_some() {
            (start + page).min(self.visible.len())
        } else {
            self.visible.len()
        };

        for pos in start..end {
            let row = &self.rows[self.visible[pos]];
            let marker = if pos == self.cursor { "> " } else { "  " };
            let cells = self
                .columns
                .iter()
                .map(|c| row.get(&c.key).map(cell_text).unwrap_or_default())
                .collect();
            lines.push(format!("{marker}{}", render(cells)));
        }
        if self.visible.is_empty() {
            lines.push("  (no rows)".to_owned());
        }
        lines.join("\n")
    }

    fn update(&mut self, msg: Message) -> (Cmd, Response) {
        dispatch(self, msg)
    }

    fn as_focusable(&self) -> Option<&dyn Focusable> {
        Some(self)
    }

    fn as_focusable_mut(&mut self) -> Option<&mut dyn Focusable> {
        Some(self)
    }
}

impl Interactive for Table {
    fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    fn bus(&self) -> Option<&EventBus> {
        self.bus.as_ref()
    }

    /// Cursor keys move the selection. Everything is consumed.
    fn delegate(&mut self, msg: Message) -> (Cmd, Response) {
        if let Message::Input(InputEvent::Key(key)) = msg {
            match key.code {
                Key::Up => self.move_up(),
                Key::Down => self.move_down(),
                Key::Home => self.move_home(),
                Key::End => self.move_end(),
                Key::PageUp => self.page_up(),
                Key::PageDown => self.page_down(),
                _ => {}
            }
        }
        (Cmd::None, Response::Handled)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::binding::Binding;
    use crate::event::message::payload;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn people() -> Table {
        let rows = vec![
            payload([("id", json!(1)), ("name", json!("Ada"))]),
            payload([("id", json!(2)), ("name", json!("Grace"))]),
            payload([("id", json!(3)), ("name", json!("Linus"))]),
        ];
        Table::new("t", vec![ColumnSpec::new("id"), ColumnSpec::new("name")]).with_rows(rows)
    }

    // ── Cursor ──────────────────────────────────────────────────────

    #[test]
    fn cursor_keys_move_selection() {
        let mut t = people();
        assert_eq!(t.selected_row().unwrap()["name"], "Ada");
        let _ = t.update(Message::key(Key::Down));
        let _ = t.update(Message::key(Key::Down));
        let _ = t.update(Message::key(Key::Down));
        assert_eq!(t.cursor(), 2);
        let _ = t.update(Message::key(Key::Home));
        assert_eq!(t.cursor(), 0);
        let _ = t.update(Message::key(Key::End));
        assert_eq!(t.selected_row().unwrap()["name"], "Linus");
        let _ = t.update(Message::key(Key::Up));
        assert_eq!(t.cursor(), 1);
    }

    #[test]
    fn paging_is_clamped() {
        let mut t = people();
        t.page_down();
        assert_eq!(t.cursor(), 2);
        t.page_up();
        assert_eq!(t.cursor(), 0);
    }

    #[test]
    fn empty_table_has_no_selection() {
        let mut t = Table::new("t", vec![ColumnSpec::new("id")]);
        t.move_down();
        t.move_end();
        assert!(t.selected_row().is_none());
        assert!(t.view().contains("(no rows)"));
    }

    // ── Filtering ───────────────────────────────────────────────────

    #[test]
    fn filter_is_case_insensitive_over_all_cells() {
        let mut t = people();
        t.filter("GRA");
        assert_eq!(t.visible_len(), 1);
        assert_eq!(t.selected_row().unwrap()["id"], 2);
        t.filter("3");
        assert_eq!(t.selected_row().unwrap()["name"], "Linus");
        t.clear_filter();
        assert_eq!(t.visible_len(), 3);
    }

    #[test]
    fn filter_clamps_cursor() {
        let mut t = people();
        t.move_end();
        t.filter("ada");
        assert_eq!(t.cursor(), 0);
        assert_eq!(t.selected_row().unwrap()["name"], "Ada");
    }

    #[test]
    fn set_rows_keeps_filter() {
        let mut t = people();
        t.filter("x");
        t.set_rows(vec![payload([("name", "Rex")]), payload([("name", "Tom")])]);
        assert_eq!(t.rows().len(), 2);
        assert_eq!(t.visible_len(), 1);
    }

    // ── View ────────────────────────────────────────────────────────

    #[test]
    fn view_marks_cursor_row() {
        let mut t = people();
        t.move_down();
        assert_eq!(
            t.view(),
            "  id | name\n  1  | Ada\n> 2  | Grace\n  3  | Linus"
        );
    }

    #[test]
    fn view_scrolls_with_height() {
        let config = TableConfig {
            columns: vec![ColumnSpec::new("name")],
            rows: people().rows().to_vec(),
            height: Some(3),
            bindings: Bindings::new(),
        };
        let mut t = Table::from_config("t", &config);
        t.move_end();
        assert_eq!(t.view(), "  name\n  Grace\n> Linus");
    }

    // ── Dispatch ────────────────────────────────────────────────────

    #[test]
    fn bound_key_publishes_on_bus() {
        let bus = EventBus::new();
        let mut t = people()
            .with_bindings(Bindings::from(vec![Binding::new(Key::Char('r'), "Refresh", "reload")]))
            .with_bus(bus);
        let (cmd, resp) = t.update(Message::key(Key::Char('r')));
        assert_eq!(resp, Response::Handled);
        assert_eq!(cmd.published()[0].name, "Refresh");
        assert_eq!(cmd.published()[0].source, "t");
    }

    #[test]
    fn focus_capability() {
        let mut t = people();
        assert!(!t.is_focused());
        t.set_focus(true);
        assert!(t.is_focused());
    }
}
