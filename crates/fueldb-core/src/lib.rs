//! Core of fueldb: entity models, repositories and the generic dialog
//! controller that binds widgets to entity fields.
//!
//! Frontends supply a [`WidgetSurface`] and drive a [`DialogController`];
//! everything else lives here.

pub mod binding;
pub mod dialog;
pub mod entity;
pub mod error;
pub mod field;
pub mod layout;
pub mod models;
pub mod repository;
pub mod widget;

pub use binding::BindingTable;
pub use dialog::{CommitAction, Confirmer, DialogController, DialogState, Mode, Outcome};
pub use entity::{Entity, Record, RecordId};
pub use error::{Error, Result, StorageError};
pub use field::{FieldAccessor, FieldValues};
pub use layout::{DialogLayout, EntityDialog};
pub use models::{FuelType, Outlet, Purchase, Vehicle};
pub use repository::{FileRepository, FileStore, MemoryRepository, Repository};
pub use widget::{
    CheckBox, Form, FormRow, LineEdit, Widget, WidgetAdapter, WidgetKind, WidgetSurface,
};
