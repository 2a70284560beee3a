//! The table: index-aligned typed columns plus the global selection state.
//!
//! All selection mutations go through the table. Each call mutates exactly one target set
//! (a column's local set or the global set), then notifies the subscribed
//! [`SelectionObserver`]s with a [`SelectionChange`].

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::column::{Column, NumericColumn};
use crate::error::{ForensicsError, ForensicsResult};
use crate::selection::{
    Facet, Scope, SelectionAction, SelectionChange, SelectionEvent, SelectionKey, SelectionObserver, SelectionSets,
    SelectionState,
};
use crate::types::{ColumnKind, RawValue};

/// Id (and label) of the synthetic 1-based row-index column.
pub const ROW_INDEX_ID: &str = "#";

/// An ordered set of equally long columns.
pub struct Table {
    columns: Vec<Column>,
    len: usize,
    global: SelectionState,
    display_order: Option<Vec<usize>>,
    observers: Vec<Arc<dyn SelectionObserver>>,
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("columns", &self.column_ids())
            .field("len", &self.len)
            .field("global", &self.global)
            .field("display_order_set", &self.display_order.is_some())
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl Table {
    /// Build a table from labelled feeder columns, inferring each column's kind.
    ///
    /// - the row count is the longest feeder; shorter feeders are padded with empty strings
    /// - ids are derived from labels and disambiguated (`amount`, `amount_2`, ...)
    pub fn from_columns<L: Into<String>>(feeders: Vec<(L, Vec<RawValue>)>) -> Self {
        Self::build(feeders, false)
    }

    /// Like [`Self::from_columns`], with a synthetic row-index column (`1..=len`) at position 0.
    pub fn with_row_index<L: Into<String>>(feeders: Vec<(L, Vec<RawValue>)>) -> Self {
        Self::build(feeders, true)
    }

    /// Build a table from already typed columns (e.g. programmatically assembled
    /// [`ColumnKind::Mixed`] columns). Ids must be unique and lengths equal.
    pub fn from_typed(columns: Vec<Column>) -> ForensicsResult<Self> {
        let len = columns.first().map(Column::len).unwrap_or(0);
        let mut seen = HashSet::new();
        for c in &columns {
            if c.len() != len {
                return Err(ForensicsError::SchemaMismatch {
                    message: format!("column '{}' has {} rows, expected {len}", c.id(), c.len()),
                });
            }
            if !seen.insert(c.id().to_string()) {
                return Err(ForensicsError::SchemaMismatch {
                    message: format!("duplicate column id '{}'", c.id()),
                });
            }
        }
        Ok(Self {
            columns,
            len,
            global: SelectionState::default(),
            display_order: None,
            observers: Vec::new(),
        })
    }

    fn build<L: Into<String>>(feeders: Vec<(L, Vec<RawValue>)>, row_index: bool) -> Self {
        let feeders: Vec<(String, Vec<RawValue>)> =
            feeders.into_iter().map(|(l, v)| (l.into(), v)).collect();
        let len = feeders.iter().map(|(_, v)| v.len()).max().unwrap_or(0);

        let mut ids: HashSet<String> = HashSet::new();
        let mut columns = Vec::with_capacity(feeders.len() + usize::from(row_index));

        if row_index {
            let values = (1..=len).map(|i| RawValue::from(i as f64)).collect();
            ids.insert(ROW_INDEX_ID.to_string());
            columns.push(Column::new(ROW_INDEX_ID, ROW_INDEX_ID, values));
        }

        for (label, mut values) in feeders {
            if values.len() < len {
                tracing::warn!(
                    column = %label,
                    rows = values.len(),
                    expected = len,
                    "padding short column with empty values"
                );
                values.resize(len, RawValue::from(""));
            }
            let id = unique_id(&label, &mut ids);
            columns.push(Column::new(id, label, values));
        }

        Self {
            columns,
            len,
            global: SelectionState::default(),
            display_order: None,
            observers: Vec::new(),
        }
    }

    /// Row count shared by every column.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_ids(&self) -> Vec<&str> {
        self.columns.iter().map(Column::id).collect()
    }

    /// Column by id; `None` when absent.
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id() == id)
    }

    pub fn column_at(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Kind of column `id`, for renderer dispatch.
    pub fn kind_of(&self, id: &str) -> Option<ColumnKind> {
        self.column(id).map(Column::kind)
    }

    /// Raw values of row `index` across all columns.
    pub fn row(&self, index: usize) -> Option<Vec<&RawValue>> {
        if index >= self.len {
            return None;
        }
        Some(self.columns.iter().filter_map(|c| c.raw(index)).collect())
    }

    /// Global (table-wide) selection state.
    pub fn global(&self) -> &SelectionState {
        &self.global
    }

    /// Register an observer for selection changes.
    pub fn subscribe(&mut self, observer: Arc<dyn SelectionObserver>) {
        self.observers.push(observer);
    }

    /// Set the row iteration order used by statistics (after UI sorting/filtering).
    ///
    /// `order` may be a subset of rows but must not repeat or exceed the row count.
    pub fn set_display_order(&mut self, order: Vec<usize>) -> ForensicsResult<()> {
        let mut seen = HashSet::with_capacity(order.len());
        for &row in &order {
            if row >= self.len {
                return Err(ForensicsError::InvalidRowOrder {
                    message: format!("row {row} out of range (len={})", self.len),
                });
            }
            if !seen.insert(row) {
                return Err(ForensicsError::InvalidRowOrder {
                    message: format!("row {row} listed twice"),
                });
            }
        }
        self.display_order = Some(order);
        Ok(())
    }

    pub fn clear_display_order(&mut self) {
        self.display_order = None;
    }

    pub fn display_order(&self) -> Option<&[usize]> {
        self.display_order.as_deref()
    }

    /// Statistics view of column `id`, in display order.
    ///
    /// `None` when the column is absent or not [`ColumnKind::Numeric`].
    pub fn numeric(&self, id: &str) -> Option<NumericColumn<'_>> {
        let view = self.column(id)?.numeric(&self.global)?;
        Some(match self.display_order.as_deref() {
            Some(order) => view.with_order(order),
            None => view,
        })
    }

    /// Whether `key` is ignored for column `id` (local OR global).
    ///
    /// For an unknown column only the global set is consulted.
    pub fn is_ignored(&self, id: &str, key: &SelectionKey) -> bool {
        self.is_selected(Facet::Ignore, id, key)
    }

    /// Whether `key` is highlighted for column `id` (local OR global).
    pub fn is_highlighted(&self, id: &str, key: &SelectionKey) -> bool {
        self.is_selected(Facet::Highlight, id, key)
    }

    pub fn is_selected(&self, facet: Facet, id: &str, key: &SelectionKey) -> bool {
        match self.column(id) {
            Some(c) => c.effective(&self.global).contains(facet, key),
            None => self.global.sets(facet).contains(key),
        }
    }

    /// Rows of column `id` excluded by the ignore selection (filter-count badge).
    pub fn ignored_row_count(&self, id: &str) -> Option<usize> {
        self.column(id).map(|c| c.ignored_rows(&self.global))
    }

    /// `(ignore, highlight)` key counts of one scope; `None` for an unknown column.
    pub fn selection_counts(&self, scope: &Scope) -> Option<(usize, usize)> {
        let state = match scope {
            Scope::Local(id) => self.column(id)?.selection(),
            Scope::Global => &self.global,
        };
        Some((state.ignore.len(), state.highlight.len()))
    }

    /// Add `key` to the `facet` set of `scope`.
    pub fn add_to(&mut self, facet: Facet, scope: &Scope, key: SelectionKey) -> ForensicsResult<SelectionChange> {
        self.mutate(SelectionAction::Add, facet, scope, key)
    }

    /// Remove `key` from the `facet` set of `scope`.
    pub fn remove_from(
        &mut self,
        facet: Facet,
        scope: &Scope,
        key: SelectionKey,
    ) -> ForensicsResult<SelectionChange> {
        self.mutate(SelectionAction::Remove, facet, scope, key)
    }

    pub fn ignore(&mut self, scope: &Scope, key: SelectionKey) -> ForensicsResult<SelectionChange> {
        self.add_to(Facet::Ignore, scope, key)
    }

    pub fn unignore(&mut self, scope: &Scope, key: SelectionKey) -> ForensicsResult<SelectionChange> {
        self.remove_from(Facet::Ignore, scope, key)
    }

    pub fn highlight(&mut self, scope: &Scope, key: SelectionKey) -> ForensicsResult<SelectionChange> {
        self.add_to(Facet::Highlight, scope, key)
    }

    pub fn unhighlight(&mut self, scope: &Scope, key: SelectionKey) -> ForensicsResult<SelectionChange> {
        self.remove_from(Facet::Highlight, scope, key)
    }

    /// Remove `key` from every column's local `facet` set and from the global one.
    ///
    /// Each set holding the key is mutated (and reported) separately; locals first, global last.
    pub fn remove_everywhere(&mut self, facet: Facet, key: &SelectionKey) -> Vec<SelectionChange> {
        let holders: Vec<String> = self
            .columns
            .iter()
            .filter(|c| c.selection().sets(facet).contains(key))
            .map(|c| c.id().to_string())
            .collect();

        let mut changes = Vec::with_capacity(holders.len() + 1);
        for id in holders {
            changes.extend(self.remove_from(facet, &Scope::Local(id), key.clone()).ok());
        }
        if self.global.sets(facet).contains(key) {
            changes.extend(self.remove_from(facet, &Scope::Global, key.clone()).ok());
        }
        changes
    }

    /// Remove every key of `facet` in `scope`.
    pub fn clear_facet(&mut self, facet: Facet, scope: &Scope) -> ForensicsResult<SelectionChange> {
        let change = match scope {
            Scope::Local(id) => {
                let global = &self.global;
                let column = self
                    .columns
                    .iter_mut()
                    .find(|c| c.id() == id)
                    .ok_or_else(|| ForensicsError::UnknownColumn { id: id.clone() })?;
                let sets = column.selection_mut().sets_mut(facet);
                let before = !sets.is_empty();
                let affected = if sets.is_subset(global.sets(facet)) {
                    Vec::new()
                } else {
                    vec![id.clone()]
                };
                sets.clear();
                SelectionChange {
                    action: SelectionAction::Clear,
                    facet,
                    scope: scope.clone(),
                    key: None,
                    before,
                    after: false,
                    affected_columns: affected,
                }
            }
            Scope::Global => {
                let sets = self.global.sets(facet);
                let before = !sets.is_empty();
                let affected = self
                    .columns
                    .iter()
                    .filter(|c| !sets.is_subset(c.selection().sets(facet)))
                    .map(|c| c.id().to_string())
                    .collect();
                self.global.sets_mut(facet).clear();
                SelectionChange {
                    action: SelectionAction::Clear,
                    facet,
                    scope: Scope::Global,
                    key: None,
                    before,
                    after: false,
                    affected_columns: affected,
                }
            }
        };
        self.notify(&change);
        Ok(change)
    }

    /// Clear both facets of `scope`.
    pub fn clear(&mut self, scope: &Scope) -> ForensicsResult<Vec<SelectionChange>> {
        Ok(vec![
            self.clear_facet(Facet::Ignore, scope)?,
            self.clear_facet(Facet::Highlight, scope)?,
        ])
    }

    /// Clear every local and the global selection.
    pub fn reset_selection(&mut self) -> Vec<SelectionChange> {
        let mut scopes: Vec<Scope> = self
            .columns
            .iter()
            .filter(|c| !c.selection().is_empty())
            .map(|c| Scope::Local(c.id().to_string()))
            .collect();
        if !self.global.is_empty() {
            scopes.push(Scope::Global);
        }

        let mut changes = Vec::new();
        for scope in scopes {
            if let Ok(mut c) = self.clear(&scope) {
                changes.append(&mut c);
            }
        }
        changes
    }

    /// Apply a decoded UI [`SelectionEvent`].
    pub fn apply_event(&mut self, event: &SelectionEvent) -> ForensicsResult<SelectionChange> {
        let scope = event.resolved_scope()?;
        match (event.action, event.resolved_key()?) {
            (SelectionAction::Clear, _) => self.clear_facet(event.facet, &scope),
            (action, Some(key)) => self.mutate(action, event.facet, &scope, key),
            (action, None) => Err(ForensicsError::InvalidEvent {
                message: format!("{action:?} selection event without a key"),
            }),
        }
    }

    /// Decode a JSON [`SelectionEvent`] and apply it.
    pub fn apply_event_json(&mut self, json: &str) -> ForensicsResult<SelectionChange> {
        let event: SelectionEvent = serde_json::from_str(json)?;
        self.apply_event(&event)
    }

    fn mutate(
        &mut self,
        action: SelectionAction,
        facet: Facet,
        scope: &Scope,
        key: SelectionKey,
    ) -> ForensicsResult<SelectionChange> {
        if action == SelectionAction::Add {
            key.validate()?;
        }
        let (before, after, affected_columns) = match scope {
            Scope::Local(id) => {
                let in_global = self.global.sets(facet).contains(&key);
                let column = self
                    .columns
                    .iter_mut()
                    .find(|c| c.id() == id)
                    .ok_or_else(|| ForensicsError::UnknownColumn { id: id.clone() })?;
                let sets = column.selection_mut().sets_mut(facet);
                let (before, after) = apply(action == SelectionAction::Add, sets, &key);
                let affected = if before != after && !in_global {
                    vec![id.clone()]
                } else {
                    Vec::new()
                };
                (before, after, affected)
            }
            Scope::Global => {
                let (before, after) = apply(action == SelectionAction::Add, self.global.sets_mut(facet), &key);
                let affected = if before != after {
                    self.columns
                        .iter()
                        .filter(|c| !c.selection().sets(facet).contains(&key))
                        .map(|c| c.id().to_string())
                        .collect()
                } else {
                    Vec::new()
                };
                (before, after, affected)
            }
        };

        let change = SelectionChange {
            action,
            facet,
            scope: scope.clone(),
            key: Some(key),
            before,
            after,
            affected_columns,
        };
        self.notify(&change);
        Ok(change)
    }

    fn notify(&self, change: &SelectionChange) {
        for o in &self.observers {
            o.on_change(change);
        }
    }
}

/// Insert (`add == true`) or remove `key`; returns membership before and after.
fn apply(add: bool, sets: &mut SelectionSets, key: &SelectionKey) -> (bool, bool) {
    let before = sets.contains(key);
    if add {
        sets.insert(key.clone());
    } else {
        sets.remove(key);
    }
    (before, sets.contains(key))
}

fn unique_id(label: &str, taken: &mut HashSet<String>) -> String {
    let base = match label.trim() {
        "" => "column",
        trimmed => trimmed,
    };
    let mut id = base.to_string();
    let mut suffix = 2;
    while taken.contains(&id) {
        id = format!("{base}_{suffix}");
        suffix += 1;
    }
    taken.insert(id.clone());
    id
}
