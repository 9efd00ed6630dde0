//! Shared helpers for the core integration tests

#![allow(dead_code)] // Not every test file uses every helper

use fueldb_core::{
    CheckBox, Entity, FieldValues, Form, FuelType, LineEdit, MemoryRepository, Record, RecordId,
    Repository, Result, StorageError, Widget, WidgetSurface,
};

/// Repository wrapper that records every call and can be told to fail writes.
pub struct SpyRepository<E> {
    pub inner: MemoryRepository<E>,
    pub calls: Vec<&'static str>,
    pub fail_writes: bool,
}

impl<E: Entity> SpyRepository<E> {
    pub fn new(inner: MemoryRepository<E>) -> Self {
        Self {
            inner,
            calls: Vec::new(),
            fail_writes: false,
        }
    }

    fn write_guard(&self) -> Result<()> {
        if self.fail_writes {
            Err(StorageError::Io(std::io::Error::other("disk unplugged")).into())
        } else {
            Ok(())
        }
    }
}

impl<E: Entity> Repository<E> for SpyRepository<E> {
    fn get(&mut self, id: &RecordId) -> Result<Record<E>> {
        self.calls.push("get");
        self.inner.get(id)
    }

    fn create(&mut self, fields: &FieldValues) -> Result<Record<E>> {
        self.calls.push("create");
        self.write_guard()?;
        self.inner.create(fields)
    }

    fn update(&mut self, record: &Record<E>, fields: &FieldValues) -> Result<Record<E>> {
        self.calls.push("update");
        self.write_guard()?;
        self.inner.update(record, fields)
    }

    fn delete(&mut self, record: &Record<E>) -> Result<()> {
        self.calls.push("delete");
        self.write_guard()?;
        self.inner.delete(record)
    }
}

/// The three sample fuel types, stored under ids 1 to 3.
pub fn sample_fuel_types() -> MemoryRepository<FuelType> {
    let mut repository = MemoryRepository::new();
    for (id, name, vendor, ron) in [
        (1u64, "Vortex 98", "Shell", "98"),
        (2, "E10 Unleaded", "Caltex", "91"),
        (3, "Synergy 8000", "Mobil", "98"),
    ] {
        repository.insert(
            id,
            FuelType {
                name: name.to_string(),
                vendor: vendor.to_string(),
                ron: ron.to_string(),
            },
        );
    }
    repository
}

pub fn set_text(form: &mut Form, widget_id: &str, text: &str) {
    form.widget_mut(widget_id)
        .and_then(|widget| widget.as_any_mut().downcast_mut::<LineEdit>())
        .unwrap_or_else(|| panic!("no line edit named {widget_id}"))
        .set_text(text);
}

pub fn text(form: &Form, widget_id: &str) -> String {
    form.widget(widget_id)
        .and_then(|widget| widget.as_any().downcast_ref::<LineEdit>())
        .unwrap_or_else(|| panic!("no line edit named {widget_id}"))
        .text()
        .to_string()
}

pub fn set_checked(form: &mut Form, widget_id: &str, checked: bool) {
    form.widget_mut(widget_id)
        .and_then(|widget| widget.as_any_mut().downcast_mut::<CheckBox>())
        .unwrap_or_else(|| panic!("no check box named {widget_id}"))
        .set_checked(checked);
}

/// A confirmer that always answers `answer`.
pub fn answer(answer: bool) -> impl FnMut(&str) -> bool {
    move |_: &str| answer
}
