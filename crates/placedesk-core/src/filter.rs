//! Filter expression tree
//!
//! A filter session is a single root `FilterGroup`. Groups hold ordered leaves
//! (field/operator/value predicates) followed by ordered subgroups. Edits are
//! expressed as pure rebuilds: `rebuild_with` returns a new tree when the edit
//! applied and `None` when the target could not be found, so callers can keep
//! the previous root untouched.

use serde::{Deserialize, Serialize};

/// Stable identifier of a group within one filter tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u64);

impl GroupId {
    /// The root group always carries this id
    pub const ROOT: GroupId = GroupId(1);
}

/// Hands out fresh, unique group ids for one tree
#[derive(Debug, Clone)]
pub struct GroupIdAllocator {
    next: u64,
}

impl GroupIdAllocator {
    pub fn new() -> Self {
        Self {
            next: GroupId::ROOT.0 + 1,
        }
    }

    pub fn next_id(&mut self) -> GroupId {
        let id = GroupId(self.next);
        self.next += 1;
        id
    }
}

impl Default for GroupIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Boolean operator joining the children of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Combinator {
    #[default]
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

impl Combinator {
    pub fn label(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// Key used for the group in the wire query
    pub fn token(&self) -> &'static str {
        match self {
            Self::And => "$and",
            Self::Or => "$or",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "$and" => Some(Self::And),
            "$or" => Some(Self::Or),
            _ => None,
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Self::And => Self::Or,
            Self::Or => Self::And,
        }
    }
}

/// Which part of a leaf an edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKey {
    Field,
    Operator,
    Value,
}

/// One field/operator/value predicate.
///
/// `operator` holds the UI label (`"="`, `"contains"`, ...) or, for operators
/// decoded from an unrecognised wire token, the token itself. All values are
/// kept as text; typed editors format them before storing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterLeaf {
    pub field: String,
    pub operator: String,
    pub value: String,
}

impl FilterLeaf {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    /// An empty leaf as added by the builder
    pub fn draft() -> Self {
        Self::default()
    }

    /// A leaf is eligible for encoding once field and operator are chosen
    pub fn is_complete(&self) -> bool {
        !self.field.is_empty() && !self.operator.is_empty()
    }

    pub fn get(&self, key: LeafKey) -> &str {
        match key {
            LeafKey::Field => &self.field,
            LeafKey::Operator => &self.operator,
            LeafKey::Value => &self.value,
        }
    }

    pub fn set(&mut self, key: LeafKey, value: impl Into<String>) {
        let value = value.into();
        match key {
            LeafKey::Field => self.field = value,
            LeafKey::Operator => self.operator = value,
            LeafKey::Value => self.value = value,
        }
    }
}

/// A boolean-combinator node of the filter tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub id: GroupId,
    pub combinator: Combinator,
    pub leaves: Vec<FilterLeaf>,
    pub subgroups: Vec<FilterGroup>,
}

impl FilterGroup {
    pub fn new(id: GroupId, combinator: Combinator) -> Self {
        Self {
            id,
            combinator,
            leaves: Vec::new(),
            subgroups: Vec::new(),
        }
    }

    /// The single empty `AND` root every filter session starts with
    pub fn root() -> Self {
        Self::new(GroupId::ROOT, Combinator::And)
    }

    pub fn with_leaf(mut self, leaf: FilterLeaf) -> Self {
        self.leaves.push(leaf);
        self
    }

    pub fn with_subgroup(mut self, group: FilterGroup) -> Self {
        self.subgroups.push(group);
        self
    }

    /// True when the group holds neither leaves nor subgroups
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty() && self.subgroups.is_empty()
    }

    /// Find a group anywhere in this subtree
    pub fn find(&self, id: GroupId) -> Option<&FilterGroup> {
        if self.id == id {
            return Some(self);
        }
        self.subgroups.iter().find_map(|g| g.find(id))
    }

    /// Nesting level of a group relative to this one (this group is level 0)
    pub fn depth_of(&self, id: GroupId) -> Option<usize> {
        if self.id == id {
            return Some(0);
        }
        self.subgroups
            .iter()
            .find_map(|g| g.depth_of(id))
            .map(|d| d + 1)
    }

    /// Number of group levels in this subtree (a lone group has depth 1)
    pub fn depth(&self) -> usize {
        1 + self.subgroups.iter().map(|g| g.depth()).max().unwrap_or(0)
    }

    /// Id of the group that directly contains `id`
    pub fn parent_of(&self, id: GroupId) -> Option<GroupId> {
        if self.subgroups.iter().any(|g| g.id == id) {
            return Some(self.id);
        }
        self.subgroups.iter().find_map(|g| g.parent_of(id))
    }

    /// Total leaves in this subtree
    pub fn leaf_count(&self) -> usize {
        self.leaves.len() + self.subgroups.iter().map(|g| g.leaf_count()).sum::<usize>()
    }

    /// Structural equality ignoring group ids
    pub fn same_shape(&self, other: &FilterGroup) -> bool {
        self.combinator == other.combinator
            && self.leaves == other.leaves
            && self.subgroups.len() == other.subgroups.len()
            && self
                .subgroups
                .iter()
                .zip(&other.subgroups)
                .all(|(a, b)| a.same_shape(b))
    }

    /// Rebuild the tree with `edit` applied to the group `id`.
    ///
    /// Returns `None` when the group does not exist or `edit` reports that it
    /// changed nothing; the original tree is never modified.
    pub fn rebuild_with<F>(&self, id: GroupId, edit: F) -> Option<FilterGroup>
    where
        F: FnOnce(&mut FilterGroup) -> bool,
    {
        let mut edit = Some(edit);
        self.rebuild_inner(id, &mut edit)
    }

    fn rebuild_inner<F>(&self, id: GroupId, edit: &mut Option<F>) -> Option<FilterGroup>
    where
        F: FnOnce(&mut FilterGroup) -> bool,
    {
        if self.id == id {
            let apply = edit.take()?;
            let mut updated = self.clone();
            return apply(&mut updated).then_some(updated);
        }

        for (index, subgroup) in self.subgroups.iter().enumerate() {
            if let Some(rebuilt) = subgroup.rebuild_inner(id, edit) {
                let mut updated = self.clone();
                updated.subgroups[index] = rebuilt;
                return Some(updated);
            }
            // Target found but the edit declined
            if edit.is_none() {
                return None;
            }
        }
        None
    }
}

impl Default for FilterGroup {
    fn default() -> Self {
        Self::root()
    }
}
