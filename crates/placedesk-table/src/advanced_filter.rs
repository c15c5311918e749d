//! Advanced filter builder
//!
//! Owns one filter tree per table. The root lives behind an `Arc`: every
//! effective edit swaps in a new `Arc`, while a no-op (unknown group, bad
//! leaf index, unchanged value) keeps the current one, so hosts can detect
//! changes with `Arc::ptr_eq`.
//!
//! The builder never fetches. `apply` and `clear` hand the encoded query to
//! the host through `FilterHost` and mirror it into the location through
//! `QuerySync`.

use std::sync::Arc;

use chrono::NaiveDate;
use placedesk_core::{
    ColumnDescriptor, ColumnType, Combinator, FilterGroup, FilterLeaf, FilterOperator, GroupId,
    GroupIdAllocator, LeafKey, WireQuery, column_type_of, decode_query, encode,
};

use crate::url_sync::{Navigation, PAGE_PARAM, QuerySync, clear_filters, write_filters};

/// Maximum number of group levels, root included
pub const MAX_GROUP_LEVELS: usize = 3;

/// Wire format of date editor values
pub const DATE_VALUE_FORMAT: &str = "%Y-%m-%d";

/// Receiver of applied filters (the table's host state)
pub trait FilterHost {
    fn set_page_index(&mut self, page_index: usize);
    fn set_filters(&mut self, filters: WireQuery);
}

/// Value input rendered for a leaf, chosen by the field's column type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueEditor {
    TextInput,
    NumberInput,
    /// Stores `"true"` / `"false"`
    Toggle,
    /// Stores a `YYYY-MM-DD` local date, no later than today
    DatePicker,
}

impl ValueEditor {
    pub fn for_type(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::String | ColumnType::Other => Self::TextInput,
            ColumnType::Int => Self::NumberInput,
            ColumnType::Bool => Self::Toggle,
            ColumnType::Date => Self::DatePicker,
        }
    }
}

pub fn format_date_value(date: NaiveDate) -> String {
    date.format(DATE_VALUE_FORMAT).to_string()
}

pub fn parse_date_value(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_VALUE_FORMAT).ok()
}

/// Whether the date picker accepts `date` (future dates are disabled)
pub fn is_selectable_date(date: NaiveDate, today: NaiveDate) -> bool {
    date <= today
}

pub fn bool_value(checked: bool) -> &'static str {
    if checked { "true" } else { "false" }
}

pub fn parse_bool_value(value: &str) -> bool {
    value == "true"
}

#[derive(Debug)]
pub struct AdvancedFilter {
    columns: Vec<ColumnDescriptor>,
    root: Arc<FilterGroup>,
    ids: GroupIdAllocator,
    popover_open: bool,
    has_active_filters: bool,
    applied: WireQuery,
}

impl AdvancedFilter {
    /// `columns` are the fields offered in the field dropdown
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            columns,
            root: Arc::new(FilterGroup::root()),
            ids: GroupIdAllocator::new(),
            popover_open: false,
            has_active_filters: false,
            applied: WireQuery::empty(),
        }
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn root(&self) -> &Arc<FilterGroup> {
        &self.root
    }

    pub fn has_active_filters(&self) -> bool {
        self.has_active_filters
    }

    fn edit<F>(&mut self, group: GroupId, edit: F) -> bool
    where
        F: FnOnce(&mut FilterGroup) -> bool,
    {
        match self.root.rebuild_with(group, edit) {
            Some(rebuilt) => {
                self.root = Arc::new(rebuilt);
                true
            }
            None => false,
        }
    }

    /// Append an empty draft leaf to `group`
    pub fn add_leaf(&mut self, group: GroupId) -> bool {
        self.edit(group, |g| {
            g.leaves.push(FilterLeaf::draft());
            true
        })
    }

    pub fn remove_leaf(&mut self, group: GroupId, index: usize) -> bool {
        self.edit(group, |g| {
            if index < g.leaves.len() {
                g.leaves.remove(index);
                true
            } else {
                false
            }
        })
    }

    /// Set one part of a leaf.
    ///
    /// Changing the field leaves operator and value as they are, even if the
    /// operator is not offered for the new field's type.
    pub fn update_leaf(&mut self, group: GroupId, index: usize, key: LeafKey, value: &str) -> bool {
        self.edit(group, |g| match g.leaves.get_mut(index) {
            Some(leaf) if leaf.get(key) != value => {
                leaf.set(key, value);
                true
            }
            _ => false,
        })
    }

    /// Append an empty `AND` subgroup to `group`.
    ///
    /// Refused when the new group would exceed `MAX_GROUP_LEVELS`. Returns the
    /// new group's id.
    pub fn add_subgroup(&mut self, group: GroupId) -> Option<GroupId> {
        let depth = self.root.depth_of(group)?;
        if depth + 1 >= MAX_GROUP_LEVELS {
            tracing::debug!(group = group.0, depth, "Subgroup nesting limit reached");
            return None;
        }

        let id = self.ids.next_id();
        self.edit(group, |g| {
            g.subgroups.push(FilterGroup::new(id, Combinator::And));
            true
        })
        .then_some(id)
    }

    /// Remove a subgroup wherever it appears. The root is never removed.
    pub fn remove_subgroup(&mut self, group: GroupId) -> bool {
        if group == GroupId::ROOT {
            return false;
        }
        let Some(parent) = self.root.parent_of(group) else {
            return false;
        };
        self.edit(parent, |g| {
            g.subgroups.retain(|s| s.id != group);
            true
        })
    }

    pub fn update_combinator(&mut self, group: GroupId, combinator: Combinator) -> bool {
        self.edit(group, |g| {
            if g.combinator == combinator {
                return false;
            }
            g.combinator = combinator;
            true
        })
    }

    /// Encode the tree and hand it to the host.
    ///
    /// Does nothing when the tree encodes to `{}`. Returns true when filters
    /// were applied.
    pub fn apply(&mut self, host: &mut dyn FilterHost, query: &mut dyn QuerySync) -> bool {
        let encoded = encode(&self.root);
        if encoded.is_empty() {
            tracing::debug!("Nothing to apply, filter tree is empty");
            return false;
        }

        host.set_page_index(0);
        host.set_filters(encoded.clone());
        query.set(PAGE_PARAM, "0");
        write_filters(query, &encoded);
        query.commit(Navigation::Push);

        tracing::info!(
            leaves = self.root.leaf_count(),
            filters = %encoded.to_json_string(),
            "Applied filters"
        );
        self.popover_open = false;
        self.has_active_filters = true;
        self.applied = encoded;
        true
    }

    /// Reset the tree and remove every applied filter
    pub fn clear(&mut self, host: &mut dyn FilterHost, query: &mut dyn QuerySync) {
        self.root = Arc::new(FilterGroup::root());
        self.has_active_filters = false;
        self.applied = WireQuery::empty();

        host.set_page_index(0);
        host.set_filters(WireQuery::empty());
        query.set(PAGE_PARAM, "0");
        clear_filters(query);
        query.commit(Navigation::Replace);
        tracing::info!("Cleared filters");
    }

    /// Rebuild the tree from filters supplied by the host, e.g. after the
    /// table state was hydrated from a shared URL.
    ///
    /// Empty or already-applied queries are ignored. A query that cannot be
    /// decoded is logged and leaves the tree unchanged.
    pub fn set_applied_filters(&mut self, filters: &WireQuery) -> bool {
        if filters.is_empty() || *filters == self.applied {
            return false;
        }

        match decode_query(filters, &mut self.ids) {
            Ok(tree) => {
                self.root = Arc::new(tree);
                self.has_active_filters = true;
                self.applied = filters.clone();
                true
            }
            Err(error) => {
                tracing::warn!(
                    %error,
                    filters = %filters.to_json_string(),
                    "Failed to decode applied filters"
                );
                false
            }
        }
    }

    /// Leaves in the root group and its direct subgroups
    pub fn active_filter_count(&self) -> usize {
        self.root.leaves.len()
            + self
                .root
                .subgroups
                .iter()
                .map(|g| g.leaves.len())
                .sum::<usize>()
    }

    /// Count shown on the filter button while filters are applied
    pub fn badge(&self) -> Option<usize> {
        self.has_active_filters.then(|| self.active_filter_count())
    }

    /// Operators offered for `field`, by its column type
    pub fn operators_for(&self, field: &str) -> &'static [FilterOperator] {
        FilterOperator::for_type(column_type_of(&self.columns, field))
    }

    pub fn editor_for(&self, field: &str) -> ValueEditor {
        ValueEditor::for_type(column_type_of(&self.columns, field))
    }

    pub fn open_popover(&mut self) {
        self.popover_open = true;
    }

    pub fn close_popover(&mut self) {
        self.popover_open = false;
    }

    pub fn is_popover_open(&self) -> bool {
        self.popover_open
    }

    pub fn popover_title(&self) -> &'static str {
        if self.has_active_filters {
            "Edit Filters"
        } else {
            "Add Filters"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url_sync::{FILTERS_PARAM, LocationQuery};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Default)]
    struct RecordingHost {
        page_index: Option<usize>,
        filters: Option<WireQuery>,
    }

    impl FilterHost for RecordingHost {
        fn set_page_index(&mut self, page_index: usize) {
            self.page_index = Some(page_index);
        }

        fn set_filters(&mut self, filters: WireQuery) {
            self.filters = Some(filters);
        }
    }

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("first_name", "First Name", ColumnType::String),
            ColumnDescriptor::new("age", "Age", ColumnType::Int),
            ColumnDescriptor::new("is_placed", "Placed", ColumnType::Bool),
            ColumnDescriptor::new("date_of_birth", "Date of Birth", ColumnType::Date),
        ]
    }

    #[test]
    fn test_edits_swap_root_and_noops_keep_it() {
        let mut filter = AdvancedFilter::new(columns());
        let before = Arc::clone(filter.root());

        assert!(!filter.add_leaf(GroupId(99)));
        assert!(!filter.remove_leaf(GroupId::ROOT, 0));
        assert!(Arc::ptr_eq(&before, filter.root()));

        assert!(filter.add_leaf(GroupId::ROOT));
        assert!(!Arc::ptr_eq(&before, filter.root()));
        assert_eq!(filter.root().leaves, vec![FilterLeaf::draft()]);
        assert!(before.leaves.is_empty());
    }

    #[test]
    fn test_update_leaf_keeps_operator_on_field_change() {
        let mut filter = AdvancedFilter::new(columns());
        filter.add_leaf(GroupId::ROOT);
        filter.update_leaf(GroupId::ROOT, 0, LeafKey::Field, "first_name");
        filter.update_leaf(GroupId::ROOT, 0, LeafKey::Operator, "contains");
        filter.update_leaf(GroupId::ROOT, 0, LeafKey::Value, "an");

        assert!(filter.update_leaf(GroupId::ROOT, 0, LeafKey::Field, "age"));
        assert_eq!(
            filter.root().leaves[0],
            FilterLeaf::new("age", "contains", "an")
        );
        assert!(!filter.update_leaf(GroupId::ROOT, 0, LeafKey::Field, "age"));
        assert!(!filter.update_leaf(GroupId::ROOT, 3, LeafKey::Value, "x"));
    }

    #[test]
    fn test_subgroup_depth_cap() {
        let mut filter = AdvancedFilter::new(columns());
        let level1 = filter.add_subgroup(GroupId::ROOT).unwrap();
        let level2 = filter.add_subgroup(level1).unwrap();
        assert_ne!(level1, level2);

        let before = Arc::clone(filter.root());
        assert_eq!(filter.add_subgroup(level2), None);
        assert!(Arc::ptr_eq(&before, filter.root()));
        assert_eq!(filter.root().depth(), MAX_GROUP_LEVELS);
    }

    #[test]
    fn test_remove_subgroup() {
        let mut filter = AdvancedFilter::new(columns());
        let level1 = filter.add_subgroup(GroupId::ROOT).unwrap();
        let level2 = filter.add_subgroup(level1).unwrap();

        assert!(!filter.remove_subgroup(GroupId::ROOT));
        assert!(filter.remove_subgroup(level2));
        assert!(filter.root().find(level1).unwrap().subgroups.is_empty());
        assert!(!filter.remove_subgroup(level2));
    }

    #[test]
    fn test_update_combinator() {
        let mut filter = AdvancedFilter::new(columns());
        assert!(!filter.update_combinator(GroupId::ROOT, Combinator::And));
        assert!(filter.update_combinator(GroupId::ROOT, Combinator::Or));
        assert_eq!(filter.root().combinator, Combinator::Or);
    }

    #[test]
    fn test_apply_pushes_filters() {
        let mut filter = AdvancedFilter::new(columns());
        let mut host = RecordingHost::default();
        let mut query = LocationQuery::parse("page=4&size=50");

        filter.open_popover();
        filter.add_leaf(GroupId::ROOT);
        filter.update_leaf(GroupId::ROOT, 0, LeafKey::Field, "first_name");
        filter.update_leaf(GroupId::ROOT, 0, LeafKey::Operator, "=");
        filter.update_leaf(GroupId::ROOT, 0, LeafKey::Value, "Jane");

        assert!(filter.apply(&mut host, &mut query));
        let expected = json!({"$and": [{"first_name": {"$eq": "Jane"}}]});
        assert_eq!(host.page_index, Some(0));
        assert_eq!(host.filters.unwrap().to_value(), expected);
        assert_eq!(query.get(PAGE_PARAM).as_deref(), Some("0"));
        assert_eq!(
            query.get(FILTERS_PARAM).as_deref(),
            Some(r#"{"$and":[{"first_name":{"$eq":"Jane"}}]}"#)
        );
        assert_eq!(query.last_navigation(), Some(Navigation::Push));
        assert!(!filter.is_popover_open());
        assert_eq!(filter.badge(), Some(1));
        assert_eq!(filter.popover_title(), "Edit Filters");
    }

    #[test]
    fn test_apply_empty_tree_is_noop() {
        let mut filter = AdvancedFilter::new(columns());
        let mut host = RecordingHost::default();
        let mut query = LocationQuery::new();
        filter.add_leaf(GroupId::ROOT);

        assert!(!filter.apply(&mut host, &mut query));
        assert_eq!(host.page_index, None);
        assert!(query.history().is_empty());
        assert_eq!(filter.badge(), None);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut filter = AdvancedFilter::new(columns());
        let mut host = RecordingHost::default();
        let mut query = LocationQuery::parse("page=2&filters=%7B%7D&tab=x");
        filter.set_applied_filters(
            &WireQuery::try_from(json!({"$and": [{"age": {"$gt": 18}}]})).unwrap(),
        );

        filter.clear(&mut host, &mut query);
        assert_eq!(**filter.root(), FilterGroup::root());
        assert!(!filter.has_active_filters());
        assert_eq!(host.page_index, Some(0));
        assert_eq!(host.filters, Some(WireQuery::empty()));
        assert_eq!(query.to_query_string(), "page=0&tab=x");
        assert_eq!(query.last_navigation(), Some(Navigation::Replace));
    }

    #[test]
    fn test_set_applied_filters() {
        let mut filter = AdvancedFilter::new(columns());
        let applied = WireQuery::try_from(json!({"$or": [
            {"age": {"$gte": 21}},
            {"$and": [{"is_placed": {"$eq": true}}, {"first_name": {"$startswith": "J"}}]}
        ]}))
        .unwrap();

        assert!(filter.set_applied_filters(&applied));
        assert_eq!(filter.root().combinator, Combinator::Or);
        assert_eq!(filter.active_filter_count(), 3);
        assert!(filter.has_active_filters());

        // Same query again is ignored
        let before = Arc::clone(filter.root());
        assert!(!filter.set_applied_filters(&applied));
        assert!(Arc::ptr_eq(&before, filter.root()));

        // Empty query keeps the tree
        assert!(!filter.set_applied_filters(&WireQuery::empty()));
        assert!(Arc::ptr_eq(&before, filter.root()));
    }

    #[test]
    fn test_set_applied_filters_decode_failure_keeps_tree() {
        let mut filter = AdvancedFilter::new(columns());
        filter.add_leaf(GroupId::ROOT);
        let before = Arc::clone(filter.root());

        let malformed = WireQuery::try_from(json!({"$and": ["age"]})).unwrap();
        assert!(!filter.set_applied_filters(&malformed));
        assert!(Arc::ptr_eq(&before, filter.root()));
    }

    #[test]
    fn test_active_filter_count_covers_two_levels() {
        let mut filter = AdvancedFilter::new(columns());
        let level1 = filter.add_subgroup(GroupId::ROOT).unwrap();
        let level2 = filter.add_subgroup(level1).unwrap();
        filter.add_leaf(GroupId::ROOT);
        filter.add_leaf(level1);
        filter.add_leaf(level1);
        filter.add_leaf(level2);
        assert_eq!(filter.active_filter_count(), 3);
    }

    #[test]
    fn test_operators_and_editors_by_type() {
        let filter = AdvancedFilter::new(columns());
        assert_eq!(filter.editor_for("first_name"), ValueEditor::TextInput);
        assert_eq!(filter.editor_for("age"), ValueEditor::NumberInput);
        assert_eq!(filter.editor_for("is_placed"), ValueEditor::Toggle);
        assert_eq!(filter.editor_for("date_of_birth"), ValueEditor::DatePicker);

        assert_eq!(
            filter.operators_for("is_placed"),
            &[FilterOperator::Equal, FilterOperator::NotEqual]
        );
        assert!(filter.operators_for("age").contains(&FilterOperator::In));
        assert!(!filter.operators_for("date_of_birth").contains(&FilterOperator::In));
        assert_eq!(
            filter.operators_for("unknown"),
            &[FilterOperator::Equal, FilterOperator::NotEqual]
        );
        assert_eq!(filter.operators_for(""), filter.operators_for("unknown"));
        assert_eq!(filter.editor_for("unknown"), ValueEditor::TextInput);
    }

    #[test]
    fn test_value_helpers() {
        let date = NaiveDate::from_ymd_opt(2003, 1, 9).unwrap();
        assert_eq!(format_date_value(date), "2003-01-09");
        assert_eq!(parse_date_value("2003-01-09"), Some(date));
        assert_eq!(parse_date_value("09/01/2003"), None);

        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert!(is_selectable_date(date, today));
        assert!(!is_selectable_date(today.succ_opt().unwrap(), today));

        assert_eq!(bool_value(true), "true");
        assert!(!parse_bool_value(bool_value(false)));
    }
}
