//! Dimension and dimension object models
//!
//! A dimension is a classification axis (e.g. cost center, project); its
//! objects are the values ledger lines get tagged with.

use std::cmp::Ordering;

/// A classification axis (`#DIM`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub id: u32,
    /// Dimension name; empty means missing
    pub name: String,
}

impl Dimension {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// One enumerated value of a dimension (`#OBJEKT`)
///
/// The object id is opaque text and is never normalized as a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionObject {
    pub dimension_id: u32,
    pub object_id: String,
    /// Object name; empty means missing
    pub name: String,
    /// Dimension name this object claims to belong to, checked on validation
    pub dimension_name: Option<String>,
}

impl DimensionObject {
    pub fn new(dimension_id: u32, object_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            dimension_id,
            object_id: object_id.into(),
            name: name.into(),
            dimension_name: None,
        }
    }

    /// Assert the name of the owning dimension
    pub fn with_dimension_name(mut self, dimension_name: impl Into<String>) -> Self {
        self.dimension_name = Some(dimension_name.into());
        self
    }

    /// Key ordering: dimension id, then object id as text
    pub fn key_cmp(&self, other: &Self) -> Ordering {
        self.dimension_id
            .cmp(&other.dimension_id)
            .then_with(|| self.object_id.cmp(&other.object_id))
    }
}
