//! Named field access on entities.
//!
//! Every entity type declares a static table of `(name, getter, setter)`
//! triples with [`field_table!`]. Values cross the table as text, the only
//! representation the widget layer deals in.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

use crate::entity::Entity;
use crate::error::{Error, Result};

/// Text format of date columns.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Text format of date-time columns.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Conversion between a column type and its widget text.
///
/// `from_text(to_text(v)) == v` holds for every implementation.
pub trait FieldText: Sized {
    fn to_text(&self) -> String;
    fn from_text(text: &str) -> std::result::Result<Self, String>;
}

impl FieldText for String {
    fn to_text(&self) -> String {
        self.clone()
    }

    fn from_text(text: &str) -> std::result::Result<Self, String> {
        Ok(text.to_string())
    }
}

impl FieldText for bool {
    fn to_text(&self) -> String {
        self.to_string()
    }

    fn from_text(text: &str) -> std::result::Result<Self, String> {
        match text {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err("expected `true` or `false`".to_string()),
        }
    }
}

impl FieldText for i64 {
    fn to_text(&self) -> String {
        self.to_string()
    }

    fn from_text(text: &str) -> std::result::Result<Self, String> {
        text.parse().map_err(|e: std::num::ParseIntError| e.to_string())
    }
}

impl FieldText for Decimal {
    fn to_text(&self) -> String {
        self.to_string()
    }

    fn from_text(text: &str) -> std::result::Result<Self, String> {
        Decimal::from_str(text).map_err(|e| e.to_string())
    }
}

impl FieldText for NaiveDate {
    fn to_text(&self) -> String {
        self.format(DATE_FORMAT).to_string()
    }

    fn from_text(text: &str) -> std::result::Result<Self, String> {
        NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map_err(|e| format!("{e} (expected YYYY-MM-DD)"))
    }
}

impl FieldText for NaiveDateTime {
    fn to_text(&self) -> String {
        self.format(DATE_TIME_FORMAT).to_string()
    }

    fn from_text(text: &str) -> std::result::Result<Self, String> {
        NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT)
            .map_err(|e| format!("{e} (expected YYYY-MM-DD HH:MM:SS)"))
    }
}

/// Optional columns: the empty string stands for "no value".
impl<T: FieldText> FieldText for Option<T> {
    fn to_text(&self) -> String {
        self.as_ref().map(T::to_text).unwrap_or_default()
    }

    fn from_text(text: &str) -> std::result::Result<Self, String> {
        if text.is_empty() {
            Ok(None)
        } else {
            T::from_text(text).map(Some)
        }
    }
}

/// One entry of an entity's field table.
pub struct Field<E> {
    pub name: &'static str,
    pub get: fn(&E) -> String,
    pub set: fn(&mut E, &str) -> std::result::Result<(), String>,
}

impl<E> fmt::Debug for Field<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field").field("name", &self.name).finish()
    }
}

/// Builds a `&'static [Field<E>]` from plain struct field names.
///
/// ```ignore
/// static FIELDS: &[Field<Outlet>] = field_table!(Outlet { name, location });
/// ```
#[macro_export]
macro_rules! field_table {
    ($entity:ty { $($field:ident),+ $(,)? }) => {
        &[$(
            $crate::field::Field::<$entity> {
                name: stringify!($field),
                get: |entity: &$entity| $crate::field::FieldText::to_text(&entity.$field),
                set: |entity: &mut $entity, text: &str| -> ::std::result::Result<(), String> {
                    entity.$field = $crate::field::FieldText::from_text(text)?;
                    Ok(())
                },
            }
        ),+]
    };
}

/// Reads and writes fields of `E` by name.
pub struct FieldAccessor<E: 'static> {
    fields: &'static [Field<E>],
}

impl<E: 'static> Clone for FieldAccessor<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: 'static> Copy for FieldAccessor<E> {}

impl<E: Entity> Default for FieldAccessor<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> FieldAccessor<E> {
    pub fn new() -> Self {
        Self {
            fields: E::fields(),
        }
    }

    /// Declared field names, in table order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|field| field.name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.name == name)
    }

    fn field(&self, name: &str) -> Result<&'static Field<E>> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .ok_or_else(|| Error::UnknownField {
                entity_type: E::TYPE_NAME,
                field: name.to_string(),
            })
    }

    /// Text of `name` on `entity`.
    pub fn get(&self, entity: &E, name: &str) -> Result<String> {
        Ok((self.field(name)?.get)(entity))
    }

    /// Parse `text` into field `name` of `entity`.
    ///
    /// On failure the entity is left unchanged.
    pub fn set(&self, entity: &mut E, name: &str, text: &str) -> Result<()> {
        (self.field(name)?.set)(entity, text).map_err(|reason| Error::InvalidValue {
            field: name.to_string(),
            value: text.to_string(),
            reason,
        })
    }

    /// Write every value in `values` onto `entity`, in order.
    pub fn apply(&self, entity: &mut E, values: &FieldValues) -> Result<()> {
        for (name, text) in values.iter() {
            self.set(entity, name, text)?;
        }
        Ok(())
    }
}

/// Ordered `field name -> text` pairs collected from a dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues(Vec<(String, String)>);

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value for `name`, keeping first-insert order.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for FieldValues {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut values = FieldValues::new();
        for (name, value) in iter {
            values.insert(name, value);
        }
        values
    }
}

impl<N: Into<String>, V: Into<String>, const LEN: usize> From<[(N, V); LEN]> for FieldValues {
    fn from(pairs: [(N, V); LEN]) -> Self {
        pairs.into_iter().collect()
    }
}
