//! In-memory repository.

use std::collections::BTreeMap;

use super::{allocate_id, build_entity, not_found, skip_past, Repository};
use crate::entity::{Entity, Record, RecordId};
use crate::error::{Result, StorageError};
use crate::field::FieldValues;

/// Records of one entity type held in memory.
#[derive(Debug, Clone)]
pub struct MemoryRepository<E> {
    rows: BTreeMap<RecordId, E>,
    next_id: u64,
}

impl<E> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<E: Entity> MemoryRepository<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `entity` under `id` directly, replacing any existing row.
    pub fn insert(&mut self, id: impl Into<RecordId>, entity: E) -> Record<E> {
        let id = id.into();
        if entity.natural_key().is_none() {
            self.next_id = skip_past(self.next_id, &id);
        }
        self.rows.insert(id.clone(), entity.clone());
        Record { id, entity }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn allocate(&mut self, entity: &E) -> Result<RecordId> {
        match entity.natural_key() {
            Some(key) => Ok(key),
            None => allocate_id::<E>(&mut self.next_id),
        }
    }
}

impl<E: Entity> Repository<E> for MemoryRepository<E> {
    fn get(&mut self, id: &RecordId) -> Result<Record<E>> {
        self.rows
            .get(id)
            .map(|entity| Record {
                id: id.clone(),
                entity: entity.clone(),
            })
            .ok_or_else(|| not_found::<E>(id))
    }

    fn create(&mut self, fields: &FieldValues) -> Result<Record<E>> {
        let entity: E = build_entity(fields)?;
        if let Some(key) = entity.natural_key() {
            if self.rows.contains_key(&key) {
                return Err(StorageError::Constraint(format!(
                    "{} {} already exists",
                    E::TYPE_NAME,
                    key
                ))
                .into());
            }
        }
        let id = self.allocate(&entity)?;
        self.rows.insert(id.clone(), entity.clone());
        Ok(Record { id, entity })
    }

    fn update(&mut self, record: &Record<E>, fields: &FieldValues) -> Result<Record<E>> {
        let mut entity = self
            .rows
            .get(&record.id)
            .cloned()
            .ok_or_else(|| not_found::<E>(&record.id))?;
        E::accessor().apply(&mut entity, fields)?;

        let id = entity.natural_key().unwrap_or_else(|| record.id.clone());
        if id != record.id && self.rows.contains_key(&id) {
            return Err(StorageError::Constraint(format!(
                "{} {} already exists",
                E::TYPE_NAME,
                id
            ))
            .into());
        }
        self.rows.remove(&record.id);
        self.rows.insert(id.clone(), entity.clone());
        Ok(Record { id, entity })
    }

    fn delete(&mut self, record: &Record<E>) -> Result<()> {
        self.rows
            .remove(&record.id)
            .map(|_| ())
            .ok_or_else(|| not_found::<E>(&record.id))
    }
}
