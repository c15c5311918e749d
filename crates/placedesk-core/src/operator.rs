//! Filter operators
//!
//! One table drives both directions of the codec and the per-type operator
//! lists offered by the filter builder.

use std::borrow::Cow;

use crate::ColumnType;

/// Operators understood by the filter builder and the data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    // Equality operators
    Equal,
    NotEqual,

    // String operators
    Contains,
    DoesNotContain,
    StartsWith,
    EndsWith,
    IsEmpty,
    IsNotEmpty,
    IsAnyOf,

    // Comparison operators
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,

    // List operators
    In,
}

const STRING_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equal,
    FilterOperator::NotEqual,
    FilterOperator::Contains,
    FilterOperator::DoesNotContain,
    FilterOperator::StartsWith,
    FilterOperator::EndsWith,
    FilterOperator::IsNotEmpty,
    FilterOperator::IsEmpty,
    FilterOperator::IsAnyOf,
];

const INT_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equal,
    FilterOperator::NotEqual,
    FilterOperator::LessThan,
    FilterOperator::LessThanOrEqual,
    FilterOperator::GreaterThan,
    FilterOperator::GreaterThanOrEqual,
    FilterOperator::In,
];

const EQUALITY_OPERATORS: &[FilterOperator] = &[FilterOperator::Equal, FilterOperator::NotEqual];

const DATE_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equal,
    FilterOperator::NotEqual,
    FilterOperator::LessThan,
    FilterOperator::LessThanOrEqual,
    FilterOperator::GreaterThan,
    FilterOperator::GreaterThanOrEqual,
];

impl FilterOperator {
    /// Label shown in the operator dropdown and stored on a leaf
    pub fn label(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::Contains => "contains",
            Self::DoesNotContain => "not contains",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::IsEmpty => "isempty",
            Self::IsNotEmpty => "isnotempty",
            Self::IsAnyOf => "isanyof",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::In => "in",
        }
    }

    /// Token used in the wire query
    pub fn token(&self) -> &'static str {
        match self {
            Self::Equal => "$eq",
            Self::NotEqual => "$ne",
            Self::Contains => "$contains",
            Self::DoesNotContain => "$ncontains",
            Self::StartsWith => "$startswith",
            Self::EndsWith => "$endswith",
            Self::IsEmpty => "$isempty",
            Self::IsNotEmpty => "$isnotempty",
            Self::IsAnyOf => "$isanyof",
            Self::LessThan => "$lt",
            Self::LessThanOrEqual => "$lte",
            Self::GreaterThan => "$gt",
            Self::GreaterThanOrEqual => "$gte",
            Self::In => "$in",
        }
    }

    /// Get all operators in table order
    pub fn all() -> &'static [FilterOperator] {
        &[
            Self::Equal,
            Self::NotEqual,
            Self::Contains,
            Self::DoesNotContain,
            Self::StartsWith,
            Self::EndsWith,
            Self::IsEmpty,
            Self::IsNotEmpty,
            Self::IsAnyOf,
            Self::LessThan,
            Self::LessThanOrEqual,
            Self::GreaterThan,
            Self::GreaterThanOrEqual,
            Self::In,
        ]
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().iter().copied().find(|op| op.label() == label)
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::all().iter().copied().find(|op| op.token() == token)
    }

    /// Operators offered for a column type, in dropdown order
    pub fn for_type(column_type: ColumnType) -> &'static [FilterOperator] {
        match column_type {
            ColumnType::String => STRING_OPERATORS,
            ColumnType::Int => INT_OPERATORS,
            ColumnType::Bool | ColumnType::Other => EQUALITY_OPERATORS,
            ColumnType::Date => DATE_OPERATORS,
        }
    }

    pub fn is_legal_for(&self, column_type: ColumnType) -> bool {
        Self::for_type(column_type).contains(self)
    }
}

/// Map a leaf's operator label to its wire token.
///
/// Labels without a table entry pass through unchanged so that operators
/// decoded from a newer client survive a decode/encode cycle.
pub fn label_to_token(label: &str) -> Cow<'_, str> {
    match FilterOperator::from_label(label) {
        Some(op) => Cow::Borrowed(op.token()),
        None => Cow::Borrowed(label),
    }
}

/// Map a wire token back to the leaf label, passing unknown tokens through
pub fn token_to_label(token: &str) -> Cow<'_, str> {
    match FilterOperator::from_token(token) {
        Some(op) => Cow::Borrowed(op.label()),
        None => Cow::Borrowed(token),
    }
}
