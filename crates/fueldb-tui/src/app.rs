//! Application state management.

use fueldb_core::{
    CheckBox, DialogController, DialogLayout, DialogState, Entity, Form, LineEdit, Mode, Outcome,
    Repository, WidgetKind,
};
use std::cell::Cell;
use std::rc::Rc;

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Moving between and editing form fields.
    Editing,
    /// Waiting for a yes/no answer to the deletion prompt.
    ConfirmDelete,
}

/// Main application model: one open dialog and the form it drives.
pub struct App<E: Entity, R> {
    /// The dialog controller for the record being shown.
    pub dialog: DialogController<E, R>,
    /// Widgets shown on screen.
    pub form: Form,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Index of the focused form row.
    pub focus: usize,
    /// Last error or notice to display.
    pub status: Option<String>,
    /// Answer handed to the dialog when it asks to confirm a deletion.
    delete_answer: Rc<Cell<bool>>,
}

impl<E: Entity, R: Repository<E>> App<E, R> {
    /// Build the dialog and open it.
    ///
    /// Fails before anything is drawn when the record to edit or delete does
    /// not exist or the layout does not fit the bindings.
    pub fn new(repository: R, mode: Mode, layout: DialogLayout<E>) -> fueldb_core::Result<Self> {
        let delete_answer = Rc::new(Cell::new(false));
        let answer = Rc::clone(&delete_answer);
        let DialogLayout { mut form, bindings } = layout;

        let mut dialog =
            DialogController::new(repository, mode, bindings, move |_: &str| answer.get());
        dialog.open(&mut form)?;

        Ok(Self {
            dialog,
            form,
            input_mode: InputMode::Editing,
            focus: 0,
            status: None,
            delete_answer,
        })
    }

    /// Deleting shows the record but does not allow changes.
    pub fn is_read_only(&self) -> bool {
        matches!(self.dialog.mode(), Mode::Delete(_))
    }

    pub fn is_closed(&self) -> bool {
        self.dialog.state() == DialogState::Closed
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.dialog.outcome()
    }

    pub fn focus_next(&mut self) {
        if !self.form.is_empty() {
            self.focus = (self.focus + 1) % self.form.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.form.is_empty() {
            self.focus = (self.focus + self.form.len() - 1) % self.form.len();
        }
    }

    /// Kind of the focused widget.
    pub fn focused_kind(&self) -> Option<WidgetKind> {
        self.form.rows().get(self.focus).map(|row| row.widget.kind())
    }

    fn focused_line_edit(&mut self) -> Option<&mut LineEdit> {
        if self.is_read_only() {
            return None;
        }
        self.form
            .row_mut(self.focus)
            .and_then(|row| row.widget.as_any_mut().downcast_mut::<LineEdit>())
    }

    pub fn type_char(&mut self, c: char) {
        if let Some(line_edit) = self.focused_line_edit() {
            line_edit.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(line_edit) = self.focused_line_edit() {
            line_edit.pop();
        }
    }

    /// Flip the focused check box.
    pub fn toggle(&mut self) {
        if self.is_read_only() {
            return;
        }
        if let Some(check_box) = self
            .form
            .row_mut(self.focus)
            .and_then(|row| row.widget.as_any_mut().downcast_mut::<CheckBox>())
        {
            check_box.toggle();
        }
    }

    /// The user accepted the dialog.
    ///
    /// Deleting first asks for confirmation; everything else commits now.
    pub fn confirm(&mut self) {
        if self.is_read_only() {
            self.input_mode = InputMode::ConfirmDelete;
            return;
        }
        self.commit();
    }

    /// Answer the deletion prompt.
    pub fn answer_delete(&mut self, yes: bool) {
        self.input_mode = InputMode::Editing;
        self.delete_answer.set(yes);
        self.commit();
    }

    fn commit(&mut self) {
        match self.dialog.confirm(&self.form) {
            Ok(Outcome::Declined) => {
                self.status = Some("Deletion cancelled".to_string());
            }
            Ok(_) => self.status = None,
            Err(e) => {
                tracing::warn!("Could not save {}: {}", E::TYPE_NAME, e);
                self.status = Some(e.to_string());
            }
        }
    }

    /// The user rejected the dialog.
    pub fn cancel(&mut self) {
        if let Err(e) = self.dialog.cancel() {
            self.status = Some(e.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fueldb_core::{CommitAction, EntityDialog, FuelType, MemoryRepository, RecordId};

    fn fuel_types() -> MemoryRepository<FuelType> {
        let mut repository = MemoryRepository::new();
        repository.insert(
            1u64,
            FuelType {
                name: "Vortex 98".to_string(),
                vendor: "Shell".to_string(),
                ron: "98".to_string(),
            },
        );
        repository
    }

    fn app(mode: Mode) -> App<FuelType, MemoryRepository<FuelType>> {
        App::new(fuel_types(), mode, FuelType::layout().unwrap()).unwrap()
    }

    #[test]
    fn test_typing_edits_focused_field() {
        let mut app = app(Mode::Create);
        for c in "E10".chars() {
            app.type_char(c);
        }
        app.backspace();
        app.focus_next();
        app.type_char('X');

        let values = app.dialog.collect_fields(&app.form).unwrap();
        assert_eq!(values.get("name"), Some("E1"));
        assert_eq!(values.get("vendor"), Some("X"));
    }

    #[test]
    fn test_focus_wraps() {
        let mut app = app(Mode::Create);
        app.focus_prev();
        assert_eq!(app.focus, 2);
        app.focus_next();
        assert_eq!(app.focus, 0);
    }

    #[test]
    fn test_confirm_create_closes_dialog() {
        let mut app = app(Mode::Create);
        app.type_char('V');
        app.confirm();

        assert!(app.is_closed());
        assert_eq!(
            app.outcome(),
            Some(&Outcome::Committed {
                action: CommitAction::Created,
                id: RecordId::from("2"),
            })
        );
    }

    #[test]
    fn test_delete_mode_is_read_only_and_asks_first() {
        let mut app = app(Mode::Delete(RecordId::from("1")));
        app.type_char('X');
        app.confirm();
        assert_eq!(app.input_mode, InputMode::ConfirmDelete);
        assert!(!app.is_closed());

        app.answer_delete(false);
        assert!(!app.is_closed());
        assert_eq!(app.status.as_deref(), Some("Deletion cancelled"));

        app.confirm();
        app.answer_delete(true);
        assert!(app.is_closed());
        assert_eq!(app.dialog.repository().len(), 0);
    }

    #[test]
    fn test_invalid_value_keeps_dialog_open() {
        let layout = fueldb_core::Vehicle::layout().unwrap();
        let mut app = App::new(MemoryRepository::new(), Mode::Create, layout).unwrap();
        app.type_char('A');
        app.focus = 10;
        for c in "last week".chars() {
            app.type_char(c);
        }
        app.confirm();

        assert!(!app.is_closed());
        assert!(app.status.as_deref().unwrap_or_default().contains("Invalid value"));
    }

    #[test]
    fn test_open_fails_for_missing_record() {
        let result = App::new(
            fuel_types(),
            Mode::Edit(RecordId::from("9999")),
            FuelType::layout().unwrap(),
        );
        assert!(result.is_err());
    }
}
