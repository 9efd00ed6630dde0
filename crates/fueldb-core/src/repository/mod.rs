//! Persistence contract used by the dialog controller.
//!
//! Each operation is its own unit of work: it either commits completely or
//! fails without side effects. Nothing spans two operations, so there is no
//! rollback of an earlier, successful call.

pub mod file;
pub mod memory;

pub use file::{FileRepository, FileStore};
pub use memory::MemoryRepository;

use crate::entity::{Entity, Record, RecordId};
use crate::error::{Error, Result, StorageError};
use crate::field::FieldValues;

/// Get/create/update/delete for one entity type.
pub trait Repository<E: Entity> {
    /// Fetch a record. Absence is [`Error::NotFound`], never an empty entity.
    fn get(&mut self, id: &RecordId) -> Result<Record<E>>;

    /// Build a new entity from `fields` and persist it.
    fn create(&mut self, fields: &FieldValues) -> Result<Record<E>>;

    /// Overwrite every field named in `fields` on the stored record.
    // TODO: write only the fields whose text differs from the stored value.
    fn update(&mut self, record: &Record<E>, fields: &FieldValues) -> Result<Record<E>>;

    /// Remove the record; later `get`s of its id fail with `NotFound`.
    fn delete(&mut self, record: &Record<E>) -> Result<()>;
}

impl<E: Entity, R: Repository<E> + ?Sized> Repository<E> for &mut R {
    fn get(&mut self, id: &RecordId) -> Result<Record<E>> {
        (**self).get(id)
    }

    fn create(&mut self, fields: &FieldValues) -> Result<Record<E>> {
        (**self).create(fields)
    }

    fn update(&mut self, record: &Record<E>, fields: &FieldValues) -> Result<Record<E>> {
        (**self).update(record, fields)
    }

    fn delete(&mut self, record: &Record<E>) -> Result<()> {
        (**self).delete(record)
    }
}

/// A default `E` with `fields` applied.
pub(crate) fn build_entity<E: Entity>(fields: &FieldValues) -> Result<E> {
    let mut entity = E::default();
    E::accessor().apply(&mut entity, fields)?;
    Ok(entity)
}

pub(crate) fn not_found<E: Entity>(id: &RecordId) -> Error {
    Error::NotFound {
        entity_type: E::TYPE_NAME,
        id: id.to_string(),
    }
}

/// Take the next surrogate id from a table counter.
///
/// An exhausted counter is a constraint error; the counter is left as is.
pub(crate) fn allocate_id<E: Entity>(next_id: &mut u64) -> Result<RecordId> {
    let following = next_id.checked_add(1).ok_or_else(|| {
        StorageError::Constraint(format!("{} ids are exhausted", E::TYPE_NAME))
    })?;
    let id = RecordId::from(*next_id);
    *next_id = following;
    Ok(id)
}

/// Counter value after an explicitly chosen surrogate `id` was stored, so
/// later allocations skip it.
pub(crate) fn skip_past(next_id: u64, id: &RecordId) -> u64 {
    match id.as_str().parse::<u64>() {
        Ok(n) if n >= next_id => n.saturating_add(1),
        _ => next_id,
    }
}
