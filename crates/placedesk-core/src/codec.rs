//! Filter tree <-> wire query codec
//!
//! Wire grammar:
//!
//! ```text
//! WireQuery  := { "$and" | "$or" : [ (LeafObject | WireQuery)* ] } | {}
//! LeafObject := { field : { operatorToken : value } }
//! ```
//!
//! Leaves are encoded before subgroups. Leaves on the same field stay separate
//! array entries so duplicate-field predicates are never merged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    Combinator, CoreError, FilterGroup, FilterLeaf, GroupId, GroupIdAllocator, Result,
    label_to_token, token_to_label,
};

/// Serialized filter predicate tree exchanged with the data source and the URL
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireQuery(Map<String, Value>);

impl WireQuery {
    /// The `{}` query meaning "no filter applied"
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Compact JSON as written to the URL and the data-source request
    pub fn to_json_string(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }

    /// Parse a JSON object; anything other than an object is rejected
    pub fn from_json_str(json: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(CoreError::InvalidFilter(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }
}

impl From<Map<String, Value>> for WireQuery {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for WireQuery {
    type Error = CoreError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::empty()),
            other => Err(CoreError::InvalidFilter(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }
}

/// Encode a filter tree into its wire form. An empty root encodes to `{}`.
pub fn encode(root: &FilterGroup) -> WireQuery {
    match encode_group(root) {
        Some(Value::Object(map)) => WireQuery(map),
        _ => WireQuery::empty(),
    }
}

fn encode_group(group: &FilterGroup) -> Option<Value> {
    let mut entries: Vec<Value> = group
        .leaves
        .iter()
        .filter(|leaf| leaf.is_complete())
        .map(encode_leaf)
        .collect();
    entries.extend(group.subgroups.iter().filter_map(encode_group));

    if entries.is_empty() {
        return None;
    }

    let mut map = Map::new();
    map.insert(group.combinator.token().to_string(), Value::Array(entries));
    Some(Value::Object(map))
}

fn encode_leaf(leaf: &FilterLeaf) -> Value {
    let mut predicate = Map::new();
    predicate.insert(
        label_to_token(&leaf.operator).into_owned(),
        Value::String(leaf.value.clone()),
    );
    let mut entry = Map::new();
    entry.insert(leaf.field.clone(), Value::Object(predicate));
    Value::Object(entry)
}

/// Decode a wire query back into a filter tree.
///
/// `null`, `{}` and objects without a combinator key decode to the default
/// empty root. Subgroups get fresh ids from `ids`; the root keeps
/// `GroupId::ROOT`.
pub fn decode(query: &Value, ids: &mut GroupIdAllocator) -> Result<FilterGroup> {
    let map = match query {
        Value::Null => return Ok(FilterGroup::root()),
        Value::Object(map) => map,
        other => {
            return Err(CoreError::InvalidFilter(format!(
                "expected a JSON object, found {}",
                json_kind(other)
            )));
        }
    };

    let Some((combinator, items)) = group_entry(map) else {
        return Ok(FilterGroup::root());
    };

    // A malformed top-level list is treated as empty
    let items = items.as_array().map(Vec::as_slice).unwrap_or_default();
    decode_group(items, GroupId::ROOT, combinator, ids)
}

/// Decode a typed wire query
pub fn decode_query(query: &WireQuery, ids: &mut GroupIdAllocator) -> Result<FilterGroup> {
    decode(&query.to_value(), ids)
}

fn group_entry(map: &Map<String, Value>) -> Option<(Combinator, &Value)> {
    [Combinator::And, Combinator::Or]
        .into_iter()
        .find_map(|c| map.get(c.token()).map(|items| (c, items)))
}

fn decode_group(
    items: &[Value],
    id: GroupId,
    combinator: Combinator,
    ids: &mut GroupIdAllocator,
) -> Result<FilterGroup> {
    let mut group = FilterGroup::new(id, combinator);

    for item in items {
        let Value::Object(entry) = item else {
            return Err(CoreError::InvalidFilter(format!(
                "group entry must be an object, found {}",
                json_kind(item)
            )));
        };

        if let Some((sub_combinator, sub_items)) = group_entry(entry) {
            let Value::Array(sub_items) = sub_items else {
                return Err(CoreError::InvalidFilter(format!(
                    "'{}' must hold an array",
                    sub_combinator.token()
                )));
            };
            let sub_id = ids.next_id();
            group
                .subgroups
                .push(decode_group(sub_items, sub_id, sub_combinator, ids)?);
            continue;
        }

        for (field, predicate) in entry {
            let Value::Object(predicate) = predicate else {
                return Err(CoreError::InvalidFilter(format!(
                    "predicate for '{field}' must be an object"
                )));
            };
            for (token, value) in predicate {
                group.leaves.push(FilterLeaf::new(
                    field.clone(),
                    token_to_label(token).into_owned(),
                    value_text(value),
                ));
            }
        }
    }

    Ok(group)
}

/// Render a wire value as leaf text (`18` -> `"18"`, `[1,2]` -> `"1,2"`)
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
