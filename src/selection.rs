//! Ignore/highlight selection state.
//!
//! Every [`crate::column::Column`] owns a *local* [`SelectionState`]; the [`crate::table::Table`]
//! owns one *global* [`SelectionState`] shared by all columns. A key is selected for a column
//! when it is present in the column's local set **or** in the global set for the same facet
//! ([`EffectiveSelection`]).
//!
//! Mutations go through the table (see [`crate::table::Table::add_to`]) so that observers are
//! notified with a [`SelectionChange`] once the target set has been updated.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ForensicsError, ForensicsResult};
use crate::statistics::leading_digit::leading_digit_in;
use crate::types::Value;

/// Ignore excludes from statistics; highlight only flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Facet {
    Ignore,
    Highlight,
}

/// Which kind of key a selection targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionType {
    Value,
    #[serde(rename = "nGram")]
    NGram,
    LeadingDigit,
}

/// A typed selection key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "key", rename_all = "camelCase")]
pub enum SelectionKey {
    /// A raw cell value.
    Value(Value),
    /// A literal n-gram substring (decimal point included when present).
    #[serde(rename = "nGram")]
    NGram(String),
    /// A leading digit, `"1"` to `"9"`.
    LeadingDigit(String),
}

impl SelectionKey {
    /// Build a key of `selection_type` from a primitive event payload.
    ///
    /// N-gram and digit keys use the value's string form, so `3` and `"3"` are the same digit.
    pub fn from_parts(selection_type: SelectionType, key: Value) -> Self {
        match selection_type {
            SelectionType::Value => Self::Value(key),
            SelectionType::NGram => Self::NGram(key.to_string()),
            SelectionType::LeadingDigit => Self::LeadingDigit(key.to_string()),
        }
    }

    pub fn selection_type(&self) -> SelectionType {
        match self {
            Self::Value(_) => SelectionType::Value,
            Self::NGram(_) => SelectionType::NGram,
            Self::LeadingDigit(_) => SelectionType::LeadingDigit,
        }
    }

    /// Check that the key can select something specific.
    ///
    /// Rejected: an empty n-gram (it is contained in every string), empty value text, and
    /// leading digits other than `"1"` to `"9"`.
    pub fn validate(&self) -> ForensicsResult<()> {
        let problem = match self {
            Self::NGram(s) if s.is_empty() => "empty n-gram key",
            Self::Value(Value::Text(s)) if s.is_empty() => "empty value key",
            Self::LeadingDigit(d) if !matches!(d.as_bytes(), [b'1'..=b'9']) => "leading digit key must be 1-9",
            _ => return Ok(()),
        };
        Err(ForensicsError::InvalidKey {
            message: format!("{problem} ({self})"),
        })
    }

    /// Convenience constructor for value keys.
    pub fn value(v: impl Into<Value>) -> Self {
        Self::Value(v.into())
    }

    /// Convenience constructor for n-gram keys.
    pub fn ngram(s: impl Into<String>) -> Self {
        Self::NGram(s.into())
    }

    /// Convenience constructor for leading-digit keys.
    pub fn leading_digit(d: char) -> Self {
        Self::LeadingDigit(d.to_string())
    }
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "value:{v}"),
            Self::NGram(s) => write!(f, "nGram:{s}"),
            Self::LeadingDigit(d) => write!(f, "leadingDigit:{d}"),
        }
    }
}

/// Where a mutation applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// One column, by id.
    Local(String),
    /// Every column of the table.
    Global,
}

impl Scope {
    /// Local scope for column `id`.
    pub fn local(id: impl Into<String>) -> Self {
        Self::Local(id.into())
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(id) => write!(f, "local({id})"),
            Self::Global => f.write_str("global"),
        }
    }
}

/// The three key sets of one facet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSets {
    values: HashSet<Value>,
    ngrams: HashSet<String>,
    leading_digits: HashSet<String>,
}

impl SelectionSets {
    pub fn contains(&self, key: &SelectionKey) -> bool {
        match key {
            SelectionKey::Value(v) => self.values.contains(v),
            SelectionKey::NGram(s) => self.ngrams.contains(s),
            SelectionKey::LeadingDigit(d) => self.leading_digits.contains(d),
        }
    }

    /// Returns `true` if the key was not already present.
    pub fn insert(&mut self, key: SelectionKey) -> bool {
        match key {
            SelectionKey::Value(v) => self.values.insert(v),
            SelectionKey::NGram(s) => self.ngrams.insert(s),
            SelectionKey::LeadingDigit(d) => self.leading_digits.insert(d),
        }
    }

    /// Returns `true` if the key was present.
    pub fn remove(&mut self, key: &SelectionKey) -> bool {
        match key {
            SelectionKey::Value(v) => self.values.remove(v),
            SelectionKey::NGram(s) => self.ngrams.remove(s),
            SelectionKey::LeadingDigit(d) => self.leading_digits.remove(d),
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.ngrams.clear();
        self.leading_digits.clear();
    }

    /// Total number of keys across the three sets.
    pub fn len(&self) -> usize {
        self.values.len() + self.ngrams.len() + self.leading_digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn values(&self) -> &HashSet<Value> {
        &self.values
    }

    pub fn ngrams(&self) -> &HashSet<String> {
        &self.ngrams
    }

    pub fn leading_digits(&self) -> &HashSet<String> {
        &self.leading_digits
    }

    /// Whether every key in `self` is also in `other`.
    pub fn is_subset(&self, other: &SelectionSets) -> bool {
        self.values.is_subset(&other.values)
            && self.ngrams.is_subset(&other.ngrams)
            && self.leading_digits.is_subset(&other.leading_digits)
    }

    fn matches_value(&self, value: &Value, text: &str) -> bool {
        self.values.contains(value)
            || leading_digit_in(value, &self.leading_digits).is_some()
            || self.ngrams.iter().any(|g| !g.is_empty() && text.contains(g.as_str()))
    }
}

/// Ignore and highlight registries for one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub ignore: SelectionSets,
    pub highlight: SelectionSets,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sets(&self, facet: Facet) -> &SelectionSets {
        match facet {
            Facet::Ignore => &self.ignore,
            Facet::Highlight => &self.highlight,
        }
    }

    pub fn sets_mut(&mut self, facet: Facet) -> &mut SelectionSets {
        match facet {
            Facet::Ignore => &mut self.ignore,
            Facet::Highlight => &mut self.highlight,
        }
    }

    pub fn clear(&mut self) {
        self.ignore.clear();
        self.highlight.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.ignore.is_empty() && self.highlight.is_empty()
    }
}

/// Local + global selection as seen by one column.
#[derive(Debug, Clone, Copy)]
pub struct EffectiveSelection<'a> {
    local: &'a SelectionState,
    global: &'a SelectionState,
}

impl<'a> EffectiveSelection<'a> {
    pub fn new(local: &'a SelectionState, global: &'a SelectionState) -> Self {
        Self { local, global }
    }

    /// Union rule: selected locally or globally.
    pub fn contains(&self, facet: Facet, key: &SelectionKey) -> bool {
        self.local.sets(facet).contains(key) || self.global.sets(facet).contains(key)
    }

    pub fn is_ignored(&self, key: &SelectionKey) -> bool {
        self.contains(Facet::Ignore, key)
    }

    pub fn is_highlighted(&self, key: &SelectionKey) -> bool {
        self.contains(Facet::Highlight, key)
    }

    /// Whether a cell value is caught by `facet`: the value itself, its leading digit, or any
    /// n-gram contained in its string form is selected.
    pub fn matches_value(&self, facet: Facet, value: &Value) -> bool {
        let local = self.local.sets(facet);
        let global = self.global.sets(facet);
        if local.is_empty() && global.is_empty() {
            return false;
        }
        let text = value.to_string();
        local.matches_value(value, &text) || global.matches_value(value, &text)
    }
}

/// What a mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionAction {
    #[default]
    Add,
    Remove,
    /// Remove every key of one facet in one scope.
    Clear,
}

/// Notification emitted after a selection mutation has been committed.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChange {
    pub action: SelectionAction,
    pub facet: Facet,
    pub scope: Scope,
    /// `None` for [`SelectionAction::Clear`].
    pub key: Option<SelectionKey>,
    /// Target set membership before the mutation (for clears: whether the set was non-empty).
    pub before: bool,
    /// Target set membership after the mutation.
    pub after: bool,
    /// Columns whose effective (local OR global) selection changed.
    pub affected_columns: Vec<String>,
}

impl SelectionChange {
    /// True when the target set did not change.
    pub fn is_noop(&self) -> bool {
        self.before == self.after
    }

    /// True when some column's statistics are stale and must be recomputed.
    pub fn invalidates_statistics(&self) -> bool {
        self.facet == Facet::Ignore && !self.affected_columns.is_empty()
    }
}

/// Observer interface for selection changes (redraws, filter-count badges).
pub trait SelectionObserver: Send + Sync {
    fn on_change(&self, change: &SelectionChange);
}

/// Fans out changes to a list of observers.
#[derive(Default)]
pub struct CompositeSelectionObserver {
    observers: Vec<Arc<dyn SelectionObserver>>,
}

impl CompositeSelectionObserver {
    pub fn new(observers: Vec<Arc<dyn SelectionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeSelectionObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeSelectionObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl SelectionObserver for CompositeSelectionObserver {
    fn on_change(&self, change: &SelectionChange) {
        for o in &self.observers {
            o.on_change(change);
        }
    }
}

/// Logs selection changes through `tracing`.
#[derive(Debug, Default)]
pub struct TracingSelectionObserver;

impl SelectionObserver for TracingSelectionObserver {
    fn on_change(&self, change: &SelectionChange) {
        tracing::debug!(
            action = ?change.action,
            facet = ?change.facet,
            scope = %change.scope,
            key = %change.key.as_ref().map(ToString::to_string).unwrap_or_default(),
            before = change.before,
            after = change.after,
            affected = change.affected_columns.len(),
            "selection changed"
        );
    }
}

/// Scope as spelled in a [`SelectionEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScopeKind {
    Local,
    Global,
}

/// A user selection event as produced by a UI layer.
///
/// JSON shape:
///
/// ```json
/// {"facet": "ignore", "scope": "local", "type": "value", "key": 5, "column": "amount"}
/// ```
///
/// `action` defaults to `"add"`; `"remove"` and `"clear"` are also accepted. `key` is required
/// except for clears, and `column` is required for the local scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionEvent {
    pub facet: Facet,
    pub scope: ScopeKind,
    #[serde(rename = "type")]
    pub selection_type: SelectionType,
    #[serde(default)]
    pub key: Option<Value>,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub action: SelectionAction,
}

impl SelectionEvent {
    /// Resolve the event's scope.
    pub fn resolved_scope(&self) -> ForensicsResult<Scope> {
        match (self.scope, &self.column) {
            (ScopeKind::Global, _) => Ok(Scope::Global),
            (ScopeKind::Local, Some(id)) => Ok(Scope::Local(id.clone())),
            (ScopeKind::Local, None) => Err(ForensicsError::InvalidEvent {
                message: "local selection event without a column".to_string(),
            }),
        }
    }

    /// Resolve the event's key; `Ok(None)` only for clears.
    pub fn resolved_key(&self) -> ForensicsResult<Option<SelectionKey>> {
        match (&self.key, self.action) {
            (_, SelectionAction::Clear) => Ok(None),
            (Some(k), _) => {
                let key = SelectionKey::from_parts(self.selection_type, k.clone());
                key.validate().map_err(|e| ForensicsError::InvalidEvent {
                    message: e.to_string(),
                })?;
                Ok(Some(key))
            }
            (None, action) => Err(ForensicsError::InvalidEvent {
                message: format!("{action:?} selection event without a key"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        EffectiveSelection, Facet, Scope, SelectionAction, SelectionEvent, SelectionKey, SelectionSets,
        SelectionState, SelectionType,
    };
    use crate::types::Value;

    #[test]
    fn sets_insert_and_remove_report_membership_changes() {
        let mut sets = SelectionSets::default();
        assert!(sets.insert(SelectionKey::value(5)));
        assert!(!sets.insert(SelectionKey::value(5)));
        assert!(sets.insert(SelectionKey::ngram("12")));
        assert_eq!(sets.len(), 2);
        assert!(sets.remove(&SelectionKey::value(5)));
        assert!(!sets.remove(&SelectionKey::value(5)));
        assert!(!sets.contains(&SelectionKey::value(5)));
    }

    #[test]
    fn keys_of_different_types_do_not_collide() {
        let mut sets = SelectionSets::default();
        sets.insert(SelectionKey::ngram("3"));
        assert!(!sets.contains(&SelectionKey::leading_digit('3')));
        assert!(!sets.contains(&SelectionKey::value("3")));
    }

    #[test]
    fn union_rule_over_local_and_global() {
        let mut local = SelectionState::new();
        let mut global = SelectionState::new();
        local.ignore.insert(SelectionKey::value(1));
        global.ignore.insert(SelectionKey::value(2));
        global.highlight.insert(SelectionKey::value(3));

        let eff = EffectiveSelection::new(&local, &global);
        assert!(eff.is_ignored(&SelectionKey::value(1)));
        assert!(eff.is_ignored(&SelectionKey::value(2)));
        assert!(!eff.is_ignored(&SelectionKey::value(3)));
        assert!(eff.is_highlighted(&SelectionKey::value(3)));
        assert!(!eff.is_highlighted(&SelectionKey::value(1)));
    }

    #[test]
    fn value_matching_covers_digits_and_ngrams() {
        let mut local = SelectionState::new();
        let global = SelectionState::new();
        local.ignore.insert(SelectionKey::leading_digit('3'));
        local.highlight.insert(SelectionKey::ngram("45"));

        let eff = EffectiveSelection::new(&local, &global);
        assert!(eff.matches_value(Facet::Ignore, &Value::Number(-304.0)));
        assert!(!eff.matches_value(Facet::Ignore, &Value::Number(403.0)));
        assert!(eff.matches_value(Facet::Highlight, &Value::Number(1450.0)));
        assert!(!eff.matches_value(Facet::Highlight, &Value::Number(154.0)));
    }

    #[test]
    fn event_decodes_from_ui_json() {
        let ev: SelectionEvent = serde_json::from_str(
            r#"{"facet":"ignore","scope":"local","type":"nGram","key":"23","column":"amount"}"#,
        )
        .unwrap();
        assert_eq!(ev.facet, Facet::Ignore);
        assert_eq!(ev.selection_type, SelectionType::NGram);
        assert_eq!(ev.action, SelectionAction::Add);
        assert_eq!(ev.resolved_scope().unwrap(), Scope::local("amount"));
        assert_eq!(ev.resolved_key().unwrap(), Some(SelectionKey::ngram("23")));
    }

    #[test]
    fn numeric_digit_keys_normalize_to_strings() {
        let ev: SelectionEvent = serde_json::from_str(
            r#"{"facet":"highlight","scope":"global","type":"leadingDigit","key":7,"action":"remove"}"#,
        )
        .unwrap();
        assert_eq!(ev.resolved_scope().unwrap(), Scope::Global);
        assert_eq!(ev.resolved_key().unwrap(), Some(SelectionKey::leading_digit('7')));
    }

    #[test]
    fn degenerate_event_keys_are_rejected() {
        for json in [
            r#"{"facet":"ignore","scope":"global","type":"nGram","key":""}"#,
            r#"{"facet":"ignore","scope":"global","type":"value","key":""}"#,
            r#"{"facet":"ignore","scope":"global","type":"leadingDigit","key":0}"#,
            r#"{"facet":"ignore","scope":"global","type":"leadingDigit","key":"12"}"#,
            r#"{"facet":"ignore","scope":"global","type":"leadingDigit","key":"x"}"#,
        ] {
            let ev: SelectionEvent = serde_json::from_str(json).unwrap();
            let err = ev.resolved_key().unwrap_err();
            assert!(err.to_string().starts_with("invalid selection event"), "{json}: {err}");
        }
    }

    #[test]
    fn key_validation_accepts_ordinary_keys() {
        assert!(SelectionKey::ngram("23").validate().is_ok());
        assert!(SelectionKey::value(0).validate().is_ok());
        assert!(SelectionKey::leading_digit('9').validate().is_ok());
        assert!(SelectionKey::leading_digit('0').validate().is_err());
    }

    #[test]
    fn empty_ngram_in_a_set_matches_nothing() {
        let mut local = SelectionState::new();
        let global = SelectionState::new();
        local.ignore.insert(SelectionKey::ngram(""));

        let eff = EffectiveSelection::new(&local, &global);
        assert!(!eff.matches_value(Facet::Ignore, &Value::Number(12.0)));
    }

    #[test]
    fn local_event_without_column_is_rejected() {
        let ev: SelectionEvent =
            serde_json::from_str(r#"{"facet":"ignore","scope":"local","type":"value","key":5}"#).unwrap();
        let err = ev.resolved_scope().unwrap_err();
        assert!(err.to_string().contains("without a column"));
    }
}
