//! File-backed store.
//!
//! A store is one JSON document holding a table per entity type. Every
//! repository operation reloads the document, applies its change and commits
//! by renaming a fully written temporary file over the original.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::{allocate_id, build_entity, not_found, Repository};
use crate::entity::{Entity, Record, RecordId};
use crate::error::{Result, StorageError};
use crate::field::FieldValues;
use crate::models::TABLES;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Table {
    next_id: u64,
    rows: BTreeMap<RecordId, Row>,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Row {
    created: NaiveDateTime,
    updated: NaiveDateTime,
    data: serde_json::Value,
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn read_document(path: &Path) -> Result<Document> {
    let file = File::open(path).map_err(StorageError::from)?;
    let document = serde_json::from_reader(BufReader::new(file)).map_err(StorageError::from)?;
    Ok(document)
}

fn write_document(path: &Path, document: &Document) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(StorageError::from)?;
    {
        let mut writer = BufWriter::new(file.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, document).map_err(StorageError::from)?;
        writer.flush().map_err(StorageError::from)?;
    }
    file.as_file().sync_all().map_err(StorageError::from)?;
    file.persist(path)
        .map_err(|e| StorageError::from(e.error))?;
    Ok(())
}

/// A store file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open the store at `path`, creating a blank one if the file does not
    /// exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Self::create(path);
        }

        // Fail here rather than in the middle of a dialog.
        read_document(path)?;
        tracing::debug!("Opened store {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Write a blank store at `path`, replacing any existing file.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let document = Document {
            tables: TABLES
                .iter()
                .map(|table| (table.to_string(), Table::default()))
                .collect(),
        };
        write_document(path, &document)?;
        tracing::info!("Created blank store {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A repository session for entity type `E`.
    pub fn repository<E: Entity>(&self) -> FileRepository<E> {
        FileRepository {
            path: self.path.clone(),
            _entity: PhantomData,
        }
    }
}

/// Repository for `E` inside a [`FileStore`].
#[derive(Debug, Clone)]
pub struct FileRepository<E> {
    path: PathBuf,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> FileRepository<E> {
    fn decode(id: &RecordId, row: &Row) -> Result<Record<E>> {
        let entity = serde_json::from_value(row.data.clone()).map_err(StorageError::from)?;
        Ok(Record {
            id: id.clone(),
            entity,
        })
    }

    fn encode(entity: &E) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(entity).map_err(StorageError::from)?)
    }

    fn duplicate(id: &RecordId) -> StorageError {
        StorageError::Constraint(format!("{} {} already exists", E::TYPE_NAME, id))
    }
}

impl<E: Entity> Repository<E> for FileRepository<E> {
    fn get(&mut self, id: &RecordId) -> Result<Record<E>> {
        let document = read_document(&self.path)?;
        let row = document
            .tables
            .get(E::TABLE)
            .and_then(|table| table.rows.get(id))
            .ok_or_else(|| not_found::<E>(id))?;
        Self::decode(id, row)
    }

    fn create(&mut self, fields: &FieldValues) -> Result<Record<E>> {
        let entity: E = build_entity(fields)?;
        let mut document = read_document(&self.path)?;
        let table = document.tables.entry(E::TABLE.to_string()).or_default();

        let id = match entity.natural_key() {
            Some(key) => key,
            None => allocate_id::<E>(&mut table.next_id)?,
        };
        if table.rows.contains_key(&id) {
            return Err(Self::duplicate(&id).into());
        }

        let stamp = now();
        table.rows.insert(
            id.clone(),
            Row {
                created: stamp,
                updated: stamp,
                data: Self::encode(&entity)?,
            },
        );
        write_document(&self.path, &document)?;

        tracing::info!("Created {} {}", E::TYPE_NAME, id);
        Ok(Record { id, entity })
    }

    fn update(&mut self, record: &Record<E>, fields: &FieldValues) -> Result<Record<E>> {
        let mut document = read_document(&self.path)?;
        let table = document
            .tables
            .get_mut(E::TABLE)
            .ok_or_else(|| not_found::<E>(&record.id))?;
        let row = table
            .rows
            .get(&record.id)
            .ok_or_else(|| not_found::<E>(&record.id))?;

        let Record { mut entity, .. } = Self::decode(&record.id, row)?;
        E::accessor().apply(&mut entity, fields)?;
        let created = row.created;

        let id = entity.natural_key().unwrap_or_else(|| record.id.clone());
        if id != record.id && table.rows.contains_key(&id) {
            return Err(Self::duplicate(&id).into());
        }

        table.rows.remove(&record.id);
        table.rows.insert(
            id.clone(),
            Row {
                created,
                updated: now(),
                data: Self::encode(&entity)?,
            },
        );
        write_document(&self.path, &document)?;

        if id != record.id {
            tracing::info!("Updated {} {} (now {})", E::TYPE_NAME, record.id, id);
        } else {
            tracing::info!("Updated {} {}", E::TYPE_NAME, id);
        }
        Ok(Record { id, entity })
    }

    fn delete(&mut self, record: &Record<E>) -> Result<()> {
        let mut document = read_document(&self.path)?;
        document
            .tables
            .get_mut(E::TABLE)
            .and_then(|table| table.rows.remove(&record.id))
            .ok_or_else(|| not_found::<E>(&record.id))?;
        write_document(&self.path, &document)?;

        tracing::info!("Deleted {} {}", E::TYPE_NAME, record.id);
        Ok(())
    }
}
