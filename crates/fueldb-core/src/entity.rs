//! The entity contract and record identity.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::field::{Field, FieldAccessor};

/// A persisted record type with a declared field table.
pub trait Entity:
    Clone + Default + fmt::Debug + fmt::Display + Serialize + DeserializeOwned + 'static
{
    /// Name used in dialog titles and error messages.
    const TYPE_NAME: &'static str;
    /// Table holding this type inside a store.
    const TABLE: &'static str;

    /// The static field table, usually built with [`crate::field_table!`].
    fn fields() -> &'static [Field<Self>];

    /// Natural key of this record, or `None` when the store assigns ids.
    fn natural_key(&self) -> Option<RecordId> {
        None
    }

    fn accessor() -> FieldAccessor<Self> {
        FieldAccessor::new()
    }
}

/// Identity of a stored record, kept as text so hosts can pass it through
/// command lines unchanged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// An entity together with the id it is stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<E> {
    pub id: RecordId,
    pub entity: E,
}
