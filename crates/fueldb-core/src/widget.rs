//! Toolkit-neutral widgets and the capability-dispatching adapter.
//!
//! A widget only declares a [`WidgetKind`]. The [`WidgetAdapter`] keeps one
//! read/write strategy per kind, so hosts can add kinds without touching the
//! controller.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Capability tag declared by a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetKind(&'static str);

impl WidgetKind {
    /// Single-line text entry.
    pub const LINE_EDIT: WidgetKind = WidgetKind("line_edit");
    /// Boolean toggle.
    pub const CHECK_BOX: WidgetKind = WidgetKind("check_box");

    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A control that holds a displayed value.
pub trait Widget: Any {
    fn kind(&self) -> WidgetKind;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Single-line text entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEdit {
    text: String,
}

impl LineEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn push(&mut self, c: char) {
        self.text.push(c);
    }

    pub fn pop(&mut self) -> Option<char> {
        self.text.pop()
    }
}

impl Widget for LineEdit {
    fn kind(&self) -> WidgetKind {
        WidgetKind::LINE_EDIT
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Boolean toggle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckBox {
    checked: bool,
}

impl CheckBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub fn toggle(&mut self) {
        self.checked = !self.checked;
    }
}

impl Widget for CheckBox {
    fn kind(&self) -> WidgetKind {
        WidgetKind::CHECK_BOX
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Lookup of widgets by identifier.
pub trait WidgetSurface {
    fn widget(&self, id: &str) -> Option<&dyn Widget>;
    fn widget_mut(&mut self, id: &str) -> Option<&mut dyn Widget>;
}

/// A labelled widget on a [`Form`].
pub struct FormRow {
    pub id: String,
    pub label: String,
    pub widget: Box<dyn Widget>,
}

impl fmt::Debug for FormRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormRow")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("kind", &self.widget.kind())
            .finish()
    }
}

/// Ordered widgets of one dialog.
#[derive(Debug, Default)]
pub struct Form {
    rows: Vec<FormRow>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_widget(
        mut self,
        id: impl Into<String>,
        label: impl Into<String>,
        widget: Box<dyn Widget>,
    ) -> Self {
        self.rows.push(FormRow {
            id: id.into(),
            label: label.into(),
            widget,
        });
        self
    }

    pub fn with_line_edit(self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.with_widget(id, label, Box::new(LineEdit::new()))
    }

    pub fn with_check_box(self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.with_widget(id, label, Box::new(CheckBox::new()))
    }

    pub fn rows(&self) -> &[FormRow] {
        &self.rows
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut FormRow> {
        self.rows.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl WidgetSurface for Form {
    fn widget(&self, id: &str) -> Option<&dyn Widget> {
        self.rows
            .iter()
            .find(|row| row.id == id)
            .map(|row| row.widget.as_ref())
    }

    fn widget_mut(&mut self, id: &str) -> Option<&mut dyn Widget> {
        self.rows
            .iter_mut()
            .find(|row| row.id == id)
            .map(|row| row.widget.as_mut())
    }
}

type ReadStrategy = Arc<dyn Fn(&dyn Any) -> Option<String> + Send + Sync>;
// `None` when the widget is not the type the strategy was registered for.
type WriteStrategy =
    Arc<dyn Fn(&mut dyn Any, &str) -> Option<std::result::Result<(), String>> + Send + Sync>;

#[derive(Clone)]
struct Strategy {
    read: ReadStrategy,
    write: WriteStrategy,
}

/// Reads and writes widget values by dispatching on [`WidgetKind`].
#[derive(Clone, Default)]
pub struct WidgetAdapter {
    strategies: HashMap<WidgetKind, Strategy>,
}

impl fmt::Debug for WidgetAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetAdapter")
            .field("kinds", &self.strategies.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl WidgetAdapter {
    /// An adapter that supports no kinds at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Line edits and check boxes.
    pub fn standard() -> Self {
        let mut adapter = Self::new();
        adapter.register::<LineEdit>(
            WidgetKind::LINE_EDIT,
            |line| line.text().to_string(),
            |line, text| {
                line.set_text(text);
                Ok(())
            },
        );
        adapter.register::<CheckBox>(
            WidgetKind::CHECK_BOX,
            |check| check.is_checked().to_string(),
            |check, text| match text {
                "true" => {
                    check.set_checked(true);
                    Ok(())
                }
                "false" => {
                    check.set_checked(false);
                    Ok(())
                }
                _ => Err("a check box only holds `true` or `false`".to_string()),
            },
        );
        adapter
    }

    /// Register the strategy for `kind`, replacing any previous one.
    pub fn register<W: Widget>(
        &mut self,
        kind: WidgetKind,
        read: fn(&W) -> String,
        write: fn(&mut W, &str) -> std::result::Result<(), String>,
    ) -> &mut Self {
        tracing::debug!("Registering widget strategy for {}", kind);
        self.strategies.insert(
            kind,
            Strategy {
                read: Arc::new(move |any: &dyn Any| any.downcast_ref::<W>().map(read)),
                write: Arc::new(move |any: &mut dyn Any, text: &str| {
                    any.downcast_mut::<W>().map(|w| write(w, text))
                }),
            },
        );
        self
    }

    pub fn supports(&self, kind: WidgetKind) -> bool {
        self.strategies.contains_key(&kind)
    }

    fn unsupported(widget_id: &str, widget: &dyn Widget) -> Error {
        Error::UnsupportedWidget {
            widget_id: widget_id.to_string(),
            kind: widget.kind().to_string(),
        }
    }

    /// Displayed text of `widget`.
    pub fn read(&self, widget_id: &str, widget: &dyn Widget) -> Result<String> {
        self.strategies
            .get(&widget.kind())
            .and_then(|strategy| (strategy.read)(widget.as_any()))
            .ok_or_else(|| Self::unsupported(widget_id, widget))
    }

    /// Replace the displayed text of `widget`.
    pub fn write(&self, widget_id: &str, widget: &mut dyn Widget, text: &str) -> Result<()> {
        let Some(strategy) = self.strategies.get(&widget.kind()) else {
            return Err(Self::unsupported(widget_id, widget));
        };
        match (strategy.write)(widget.as_any_mut(), text) {
            Some(Ok(())) => Ok(()),
            Some(Err(reason)) => Err(Error::RejectedByWidget {
                widget_id: widget_id.to_string(),
                value: text.to_string(),
                reason,
            }),
            None => Err(Self::unsupported(widget_id, widget)),
        }
    }

    /// Dry-run check that `widget` can be read and written. Side-effect free.
    pub fn check(&self, widget_id: &str, widget: &dyn Widget) -> Result<()> {
        self.read(widget_id, widget).map(|_| ())
    }
}
