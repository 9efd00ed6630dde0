//! Widget-to-field binding tables.

use std::marker::PhantomData;

use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::field::FieldValues;
use crate::widget::{WidgetAdapter, WidgetSurface};

/// One `widget id -> field name` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub widget_id: String,
    pub field: &'static str,
}

/// Ordered bindings for entity type `E`.
///
/// Field names are checked against `E`'s field table when the table is
/// built; widget ids are checked against a surface by [`Self::validate`].
#[derive(Debug, Clone)]
pub struct BindingTable<E> {
    bindings: Vec<Binding>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> BindingTable<E> {
    pub fn new<I, W>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (W, &'static str)>,
        W: Into<String>,
    {
        let fields = E::fields();
        let bindings = pairs
            .into_iter()
            .map(|(widget_id, name)| {
                let field = fields
                    .iter()
                    .find(|field| field.name == name)
                    .ok_or_else(|| Error::UnknownField {
                        entity_type: E::TYPE_NAME,
                        field: name.to_string(),
                    })?;
                Ok(Binding {
                    widget_id: widget_id.into(),
                    field: field.name,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            bindings,
            _entity: PhantomData,
        })
    }

    /// `(widget id, field name)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.bindings
            .iter()
            .map(|binding| (binding.widget_id.as_str(), binding.field))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Check every bound widget exists on `surface` and that `adapter` can
    /// handle it. Reads nothing back and writes nothing.
    pub fn validate<S>(&self, surface: &S, adapter: &WidgetAdapter) -> Result<()>
    where
        S: WidgetSurface + ?Sized,
    {
        for (widget_id, _) in self.iter() {
            let widget = surface
                .widget(widget_id)
                .ok_or_else(|| Error::MissingWidget {
                    widget_id: widget_id.to_string(),
                })?;
            adapter.check(widget_id, widget)?;
        }
        Ok(())
    }

    /// Write every bound field of `entity` into its widget.
    pub fn populate<S>(&self, entity: &E, surface: &mut S, adapter: &WidgetAdapter) -> Result<()>
    where
        S: WidgetSurface + ?Sized,
    {
        let accessor = E::accessor();
        for (widget_id, field) in self.iter() {
            let text = accessor.get(entity, field)?;
            let widget = surface
                .widget_mut(widget_id)
                .ok_or_else(|| Error::MissingWidget {
                    widget_id: widget_id.to_string(),
                })?;
            adapter.write(widget_id, widget, &text)?;
        }
        Ok(())
    }

    /// Read every bound widget into a `field -> text` mapping.
    pub fn collect<S>(&self, surface: &S, adapter: &WidgetAdapter) -> Result<FieldValues>
    where
        S: WidgetSurface + ?Sized,
    {
        let mut values = FieldValues::new();
        for (widget_id, field) in self.iter() {
            let widget = surface
                .widget(widget_id)
                .ok_or_else(|| Error::MissingWidget {
                    widget_id: widget_id.to_string(),
                })?;
            values.insert(field, adapter.read(widget_id, widget)?);
        }
        Ok(values)
    }
}
