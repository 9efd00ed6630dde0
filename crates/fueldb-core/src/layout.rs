//! Per-entity dialog layouts.

use crate::binding::BindingTable;
use crate::entity::Entity;
use crate::error::Result;
use crate::widget::Form;

/// The widgets of one entity's dialog and the bindings that feed them.
#[derive(Debug)]
pub struct DialogLayout<E> {
    pub form: Form,
    pub bindings: BindingTable<E>,
}

/// Entities that ship a dialog layout.
pub trait EntityDialog: Entity {
    /// Fresh widgets and bindings; every call returns new widgets.
    fn layout() -> Result<DialogLayout<Self>>;
}

/// Builds a layout from `(widget id, label, field)` line edits.
pub(crate) fn line_edit_layout<E: Entity>(
    rows: &[(&str, &str, &'static str)],
) -> Result<DialogLayout<E>> {
    let form = rows
        .iter()
        .fold(Form::new(), |form, (id, label, _)| form.with_line_edit(*id, *label));
    let bindings = BindingTable::new(rows.iter().map(|(id, _, field)| (*id, *field)))?;
    Ok(DialogLayout { form, bindings })
}
