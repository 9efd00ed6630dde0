//! The generic create/edit/delete dialog controller.
//!
//! A [`DialogController`] moves values between widgets and one entity
//! through a [`BindingTable`], and turns the host's confirm/cancel actions
//! into at most one repository call.
//!
//! ```text
//! Created --open--> Populated --confirm--> Closed(Committed)
//!                      |  ^  \--cancel---> Closed(Cancelled)
//!                      \--/ delete declined (Declined)
//! ```

use crate::binding::BindingTable;
use crate::entity::{Entity, Record, RecordId};
use crate::error::{Error, Result};
use crate::field::FieldValues;
use crate::repository::Repository;
use crate::widget::{WidgetAdapter, WidgetSurface};

/// What a dialog was opened to do. Fixed for the dialog's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Create,
    Edit(RecordId),
    Delete(RecordId),
}

impl Mode {
    /// Interpret the host's edit/delete options.
    pub fn from_flags(edit: Option<RecordId>, delete: Option<RecordId>) -> Result<Self> {
        match (edit, delete) {
            (Some(_), Some(_)) => Err(Error::Usage(
                "Cannot edit and delete at the same time!".to_string(),
            )),
            (Some(id), None) => Ok(Mode::Edit(id)),
            (None, Some(id)) => Ok(Mode::Delete(id)),
            (None, None) => Ok(Mode::Create),
        }
    }

    /// The record an edit or delete targets.
    pub fn target(&self) -> Option<&RecordId> {
        match self {
            Mode::Create => None,
            Mode::Edit(id) | Mode::Delete(id) => Some(id),
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            Mode::Create => "New",
            Mode::Edit(_) => "Edit",
            Mode::Delete(_) => "Delete",
        }
    }
}

/// Lifecycle position of a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    /// Constructed; nothing fetched or shown yet.
    Created,
    /// Widgets hold the values being edited.
    Populated,
    /// Committed or cancelled. Terminal.
    Closed,
}

impl DialogState {
    fn name(&self) -> &'static str {
        match self {
            DialogState::Created => "not open yet",
            DialogState::Populated => "open",
            DialogState::Closed => "closed",
        }
    }
}

/// Which repository operation a confirm completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitAction {
    Created,
    Updated,
    Deleted,
}

impl CommitAction {
    pub fn past_tense(&self) -> &'static str {
        match self {
            CommitAction::Created => "Created",
            CommitAction::Updated => "Updated",
            CommitAction::Deleted => "Deleted",
        }
    }
}

/// Result of a confirm or cancel, reported to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The repository operation completed and the dialog closed.
    Committed { action: CommitAction, id: RecordId },
    /// The dialog closed without touching the repository.
    Cancelled,
    /// The user declined to delete; the dialog stays open.
    Declined,
}

/// Host-level yes/no prompt.
pub trait Confirmer {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirmer for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Drives one create/edit/delete dialog for entity type `E`.
pub struct DialogController<E: Entity, R> {
    repository: R,
    mode: Mode,
    bindings: BindingTable<E>,
    adapter: WidgetAdapter,
    confirmer: Box<dyn Confirmer>,
    record: Option<Record<E>>,
    state: DialogState,
    outcome: Option<Outcome>,
}

impl<E: Entity, R: Repository<E>> DialogController<E, R> {
    /// Construct a dialog. Touches neither the repository nor any widget.
    pub fn new(
        repository: R,
        mode: Mode,
        bindings: BindingTable<E>,
        confirmer: impl Confirmer + 'static,
    ) -> Self {
        Self {
            repository,
            mode,
            bindings,
            adapter: WidgetAdapter::standard(),
            confirmer: Box::new(confirmer),
            record: None,
            state: DialogState::Created,
            outcome: None,
        }
    }

    /// Like [`Self::new`], taking the host's raw edit/delete options.
    ///
    /// Both options set fails with [`Error::Usage`] before the repository is
    /// used.
    pub fn from_flags(
        repository: R,
        edit: Option<RecordId>,
        delete: Option<RecordId>,
        bindings: BindingTable<E>,
        confirmer: impl Confirmer + 'static,
    ) -> Result<Self> {
        let mode = Mode::from_flags(edit, delete)?;
        Ok(Self::new(repository, mode, bindings, confirmer))
    }

    /// Replace the standard widget adapter.
    pub fn with_adapter(mut self, adapter: WidgetAdapter) -> Self {
        self.adapter = adapter;
        self
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    /// Set once the dialog has closed.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// The record being edited or deleted, or the one just created.
    pub fn record(&self) -> Option<&Record<E>> {
        self.record.as_ref()
    }

    pub fn bindings(&self) -> &BindingTable<E> {
        &self.bindings
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repository
    }

    pub fn into_repository(self) -> R {
        self.repository
    }

    /// Window title, e.g. `Edit FuelType`.
    pub fn title(&self) -> String {
        format!("{} {}", self.mode.verb(), E::TYPE_NAME)
    }

    /// Text of the deletion prompt.
    pub fn delete_prompt(&self) -> String {
        match &self.record {
            Some(record) => format!(
                "Do you really want to delete this {}?\n{}",
                E::TYPE_NAME,
                record.entity
            ),
            None => format!("Do you really want to delete this {}?", E::TYPE_NAME),
        }
    }

    fn require(&self, expected: DialogState, action: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::InvalidState {
                action,
                state: self.state.name(),
            })
        }
    }

    /// Check the bindings against `surface`. Idempotent and side-effect free.
    pub fn validate<S>(&self, surface: &S) -> Result<()>
    where
        S: WidgetSurface + ?Sized,
    {
        self.bindings.validate(surface, &self.adapter)
    }

    /// Validate, fetch the target record for edit/delete and show it.
    ///
    /// On error the dialog stays `Created`.
    pub fn open<S>(&mut self, surface: &mut S) -> Result<()>
    where
        S: WidgetSurface + ?Sized,
    {
        self.require(DialogState::Created, "open")?;
        self.validate(surface)?;

        if let Some(id) = self.mode.target() {
            let record = self.repository.get(id)?;
            self.bindings
                .populate(&record.entity, surface, &self.adapter)?;
            self.record = Some(record);
        }

        self.state = DialogState::Populated;
        tracing::debug!("Opened dialog: {}", self.title());
        Ok(())
    }

    /// Current widget values, keyed by field name in binding order.
    pub fn collect_fields<S>(&self, surface: &S) -> Result<FieldValues>
    where
        S: WidgetSurface + ?Sized,
    {
        self.bindings.collect(surface, &self.adapter)
    }

    /// Perform the mode's repository operation.
    ///
    /// Any error leaves the dialog `Populated` with the widgets untouched so
    /// the user can retry or cancel.
    pub fn confirm<S>(&mut self, surface: &S) -> Result<Outcome>
    where
        S: WidgetSurface + ?Sized,
    {
        self.require(DialogState::Populated, "confirm")?;

        let (action, record) = match &self.mode {
            Mode::Create => {
                let fields = self.collect_fields(surface)?;
                (CommitAction::Created, self.repository.create(&fields)?)
            }
            Mode::Edit(_) => {
                let fields = self.collect_fields(surface)?;
                let current = self.record.as_ref().ok_or(Error::InvalidState {
                    action: "confirm",
                    state: "missing its record",
                })?;
                (
                    CommitAction::Updated,
                    self.repository.update(current, &fields)?,
                )
            }
            Mode::Delete(_) => {
                let prompt = self.delete_prompt();
                if !self.confirmer.confirm(&prompt) {
                    tracing::info!("Deletion of {} declined", E::TYPE_NAME);
                    return Ok(Outcome::Declined);
                }
                let current = self.record.take().ok_or(Error::InvalidState {
                    action: "confirm",
                    state: "missing its record",
                })?;
                if let Err(err) = self.repository.delete(&current) {
                    self.record = Some(current);
                    return Err(err);
                }
                (CommitAction::Deleted, current)
            }
        };

        let outcome = Outcome::Committed {
            action,
            id: record.id.clone(),
        };
        tracing::info!("{} {} {}", action.past_tense(), E::TYPE_NAME, record.id);
        self.record = Some(record);
        self.close(outcome.clone());
        Ok(outcome)
    }

    /// Close without any repository call.
    ///
    /// Accepted from `Created` as well as `Populated`, so a host can abandon a
    /// dialog whose `open` failed.
    pub fn cancel(&mut self) -> Result<Outcome> {
        if self.state == DialogState::Closed {
            return Err(Error::InvalidState {
                action: "cancel",
                state: self.state.name(),
            });
        }
        tracing::info!("Rejected changes");
        self.close(Outcome::Cancelled);
        Ok(Outcome::Cancelled)
    }

    fn close(&mut self, outcome: Outcome) {
        tracing::debug!("Closing dialog {} with {:?}", self.title(), outcome);
        self.state = DialogState::Closed;
        self.outcome = Some(outcome);
    }
}
