//! Integration tests for the dialog controller lifecycle
//!
//! Every test drives a controller the way a host would: build the entity's
//! layout, open, type into widgets, then confirm or cancel.

mod common;

use common::{answer, sample_fuel_types, set_checked, set_text, text, SpyRepository};
use fueldb_core::{
    BindingTable, CommitAction, DialogController, DialogState, EntityDialog, Error, FieldValues,
    Form, FuelType, MemoryRepository, Mode, Outcome, Purchase, RecordId, Repository, StorageError,
    Vehicle, WidgetAdapter,
};
use std::cell::RefCell;
use std::rc::Rc;

fn id(id: &str) -> RecordId {
    RecordId::from(id)
}

#[test]
fn test_create_persists_widget_values() {
    let mut repository = MemoryRepository::<FuelType>::new();
    let layout = FuelType::layout().unwrap();
    let mut form = layout.form;

    let mut dialog =
        DialogController::new(&mut repository, Mode::Create, layout.bindings, answer(true));
    dialog.open(&mut form).unwrap();
    assert_eq!(dialog.state(), DialogState::Populated);
    assert_eq!(dialog.title(), "New FuelType");

    set_text(&mut form, "name_line_edit", "Vortex 98");
    set_text(&mut form, "vendor_line_edit", "Shell");
    set_text(&mut form, "ron_line_edit", "98");

    let outcome = dialog.confirm(&form).unwrap();
    let Outcome::Committed { action, id } = outcome else {
        panic!("expected a commit, got {outcome:?}");
    };
    assert_eq!(action, CommitAction::Created);
    assert_eq!(dialog.state(), DialogState::Closed);
    drop(dialog);

    let stored = repository.get(&id).unwrap();
    assert_eq!(stored.entity.name, "Vortex 98");
    assert_eq!(stored.entity.vendor, "Shell");
    assert_eq!(stored.entity.ron, "98");
}

#[test]
fn test_edit_populates_widgets_and_updates_changed_field() {
    let mut repository = sample_fuel_types();
    let layout = FuelType::layout().unwrap();
    let mut form = layout.form;

    let mut dialog = DialogController::new(
        &mut repository,
        Mode::Edit(id("1")),
        layout.bindings,
        answer(true),
    );
    dialog.open(&mut form).unwrap();

    assert_eq!(text(&form, "name_line_edit"), "Vortex 98");
    assert_eq!(text(&form, "vendor_line_edit"), "Shell");
    assert_eq!(text(&form, "ron_line_edit"), "98");

    set_text(&mut form, "vendor_line_edit", "BP");
    let outcome = dialog.confirm(&form).unwrap();
    assert_eq!(
        outcome,
        Outcome::Committed {
            action: CommitAction::Updated,
            id: id("1"),
        }
    );
    drop(dialog);

    let stored = repository.get(&id("1")).unwrap().entity;
    assert_eq!(stored.vendor, "BP");
    assert_eq!(stored.name, "Vortex 98");
    assert_eq!(stored.ron, "98");
}

#[test]
fn test_edit_leaves_unbound_fields_alone() {
    let mut repository = MemoryRepository::<Vehicle>::new();
    repository.insert(
        "ABC-123",
        Vehicle {
            rego: "ABC-123".to_string(),
            make: "Toyota".to_string(),
            notes: "Timing belt done at 140000".to_string(),
            ..Vehicle::default()
        },
    );
    let bindings = BindingTable::<Vehicle>::new([("make_line_edit", "make")]).unwrap();
    let mut form = Form::new().with_line_edit("make_line_edit", "Make");

    let mut dialog = DialogController::new(
        &mut repository,
        Mode::Edit(id("ABC-123")),
        bindings,
        answer(true),
    );
    dialog.open(&mut form).unwrap();
    set_text(&mut form, "make_line_edit", "Lexus");
    dialog.confirm(&form).unwrap();
    drop(dialog);

    let stored = repository.get(&id("ABC-123")).unwrap().entity;
    assert_eq!(stored.make, "Lexus");
    assert_eq!(stored.notes, "Timing belt done at 140000");
}

#[test]
fn test_delete_declined_keeps_record_and_stays_open() {
    let mut repository = sample_fuel_types();
    let layout = FuelType::layout().unwrap();
    let mut form = layout.form;
    let prompts = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&prompts);

    let mut dialog = DialogController::new(
        &mut repository,
        Mode::Delete(id("1")),
        layout.bindings,
        move |message: &str| {
            seen.borrow_mut().push(message.to_string());
            false
        },
    );
    dialog.open(&mut form).unwrap();
    assert_eq!(dialog.title(), "Delete FuelType");

    assert_eq!(dialog.confirm(&form).unwrap(), Outcome::Declined);
    assert_eq!(dialog.state(), DialogState::Populated);
    assert_eq!(dialog.outcome(), None);

    assert_eq!(dialog.cancel().unwrap(), Outcome::Cancelled);
    assert_eq!(dialog.state(), DialogState::Closed);
    drop(dialog);

    let prompts = prompts.borrow();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].starts_with("Do you really want to delete this FuelType?"));
    assert!(prompts[0].contains("Vortex 98"));

    let stored = repository.get(&id("1")).unwrap().entity;
    assert_eq!(stored.name, "Vortex 98");
}

#[test]
fn test_delete_confirmed_removes_record() {
    let mut repository = sample_fuel_types();
    let layout = FuelType::layout().unwrap();
    let mut form = layout.form;

    let mut dialog = DialogController::new(
        &mut repository,
        Mode::Delete(id("1")),
        layout.bindings,
        answer(true),
    );
    dialog.open(&mut form).unwrap();
    let outcome = dialog.confirm(&form).unwrap();
    assert_eq!(
        outcome,
        Outcome::Committed {
            action: CommitAction::Deleted,
            id: id("1"),
        }
    );
    drop(dialog);

    let err = repository.get(&id("1")).unwrap_err();
    assert!(matches!(err, Error::NotFound { entity_type: "FuelType", .. }));
    assert_eq!(repository.len(), 2);
}

#[test]
fn test_edit_and_delete_together_never_reach_the_repository() {
    let mut spy = SpyRepository::new(sample_fuel_types());
    let layout = FuelType::layout().unwrap();

    let result = DialogController::from_flags(
        &mut spy,
        Some(id("1")),
        Some(id("1")),
        layout.bindings,
        answer(true),
    );

    assert!(matches!(result, Err(Error::Usage(_))));
    assert!(spy.calls.is_empty());
}

#[test]
fn test_missing_record_fails_open() {
    for mode in [Mode::Edit(id("9999")), Mode::Delete(id("9999"))] {
        let mut repository = sample_fuel_types();
        let layout = FuelType::layout().unwrap();
        let mut form = layout.form;

        let mut dialog =
            DialogController::new(&mut repository, mode, layout.bindings, answer(true));
        let err = dialog.open(&mut form).unwrap_err();

        match err {
            Error::NotFound { entity_type, id } => {
                assert_eq!(entity_type, "FuelType");
                assert_eq!(id, "9999");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(dialog.state(), DialogState::Created);
        assert!(dialog.record().is_none());
        assert!(matches!(
            dialog.confirm(&form),
            Err(Error::InvalidState { .. })
        ));
    }
}

#[test]
fn test_missing_widget_fails_before_repository_use() {
    let mut spy = SpyRepository::new(sample_fuel_types());
    let layout = FuelType::layout().unwrap();
    let mut form = Form::new()
        .with_line_edit("name_line_edit", "Name")
        .with_line_edit("vendor_line_edit", "Vendor");

    let mut dialog =
        DialogController::new(&mut spy, Mode::Edit(id("1")), layout.bindings, answer(true));

    let first = dialog.validate(&form).unwrap_err();
    let second = dialog.validate(&form).unwrap_err();
    assert!(matches!(first, Error::MissingWidget { ref widget_id } if widget_id == "ron_line_edit"));
    assert_eq!(first.to_string(), second.to_string());

    assert!(matches!(
        dialog.open(&mut form),
        Err(Error::MissingWidget { .. })
    ));
    assert_eq!(dialog.state(), DialogState::Created);
    drop(dialog);
    assert!(spy.calls.is_empty());
}

#[test]
fn test_unsupported_widget_fails_before_repository_use() {
    let mut spy = SpyRepository::new(sample_fuel_types());
    let layout = FuelType::layout().unwrap();
    let mut form = layout.form;

    // An adapter that only knows check boxes cannot drive line edits.
    let mut adapter = WidgetAdapter::new();
    adapter.register::<fueldb_core::CheckBox>(
        fueldb_core::WidgetKind::CHECK_BOX,
        |check| check.is_checked().to_string(),
        |check, text| {
            check.set_checked(text == "true");
            Ok(())
        },
    );

    let mut dialog =
        DialogController::new(&mut spy, Mode::Edit(id("1")), layout.bindings, answer(true))
            .with_adapter(adapter);

    match dialog.open(&mut form).unwrap_err() {
        Error::UnsupportedWidget { widget_id, kind } => {
            assert_eq!(widget_id, "name_line_edit");
            assert_eq!(kind, "line_edit");
        }
        other => panic!("unexpected error: {other}"),
    }
    drop(dialog);
    assert!(spy.calls.is_empty());
}

#[test]
fn test_storage_failure_keeps_dialog_open_with_input() {
    let mut spy = SpyRepository::new(sample_fuel_types());
    let layout = FuelType::layout().unwrap();
    let mut form = layout.form;

    let mut dialog =
        DialogController::new(&mut spy, Mode::Edit(id("2")), layout.bindings, answer(true));
    dialog.open(&mut form).unwrap();
    set_text(&mut form, "ron_line_edit", "95");

    dialog.repository_mut().fail_writes = true;
    let err = dialog.confirm(&form).unwrap_err();
    assert!(matches!(err, Error::Storage(StorageError::Io(_))));
    assert_eq!(dialog.state(), DialogState::Populated);
    assert_eq!(text(&form, "ron_line_edit"), "95");

    dialog.repository_mut().fail_writes = false;
    dialog.confirm(&form).unwrap();
    assert_eq!(dialog.state(), DialogState::Closed);
    drop(dialog);

    assert_eq!(spy.calls, ["get", "update", "update"]);
    assert_eq!(spy.inner.get(&id("2")).unwrap().entity.ron, "95");
}

#[test]
fn test_each_confirm_calls_one_repository_operation() {
    let mut spy = SpyRepository::new(sample_fuel_types());
    let layout = FuelType::layout().unwrap();
    let mut form = layout.form;

    let mut dialog =
        DialogController::new(&mut spy, Mode::Delete(id("3")), layout.bindings, answer(true));
    dialog.open(&mut form).unwrap();
    dialog.confirm(&form).unwrap();
    drop(dialog);

    assert_eq!(spy.calls, ["get", "delete"]);
}

#[test]
fn test_cancel_never_touches_the_repository() {
    let mut spy = SpyRepository::new(sample_fuel_types());
    let layout = FuelType::layout().unwrap();
    let mut form = layout.form;

    let mut dialog =
        DialogController::new(&mut spy, Mode::Create, layout.bindings, answer(true));
    dialog.open(&mut form).unwrap();
    set_text(&mut form, "name_line_edit", "Never saved");

    assert_eq!(dialog.cancel().unwrap(), Outcome::Cancelled);
    assert_eq!(dialog.outcome(), Some(&Outcome::Cancelled));
    drop(dialog);

    assert!(spy.calls.is_empty());
    assert_eq!(spy.inner.len(), 3);
}

#[test]
fn test_closed_dialog_rejects_further_actions() {
    let mut repository = sample_fuel_types();
    let layout = FuelType::layout().unwrap();
    let mut form = layout.form;

    let mut dialog = DialogController::new(
        &mut repository,
        Mode::Edit(id("1")),
        layout.bindings,
        answer(true),
    );
    dialog.open(&mut form).unwrap();
    dialog.confirm(&form).unwrap();

    assert!(matches!(
        dialog.confirm(&form),
        Err(Error::InvalidState { action: "confirm", .. })
    ));
    assert!(matches!(
        dialog.cancel(),
        Err(Error::InvalidState { action: "cancel", .. })
    ));
    assert!(matches!(
        dialog.open(&mut form),
        Err(Error::InvalidState { action: "open", .. })
    ));
}

#[test]
fn test_invalid_text_keeps_dialog_open() {
    let mut repository = MemoryRepository::<Purchase>::new();
    let layout = Purchase::layout().unwrap();
    let mut form = layout.form;

    let mut dialog =
        DialogController::new(&mut repository, Mode::Create, layout.bindings, answer(true));
    dialog.open(&mut form).unwrap();
    set_text(&mut form, "vehicle_line_edit", "ABC-123");
    set_text(&mut form, "odometer_line_edit", "lots");

    let err = dialog.confirm(&form).unwrap_err();
    assert!(matches!(err, Error::InvalidValue { ref field, .. } if field == "odometer"));
    assert_eq!(dialog.state(), DialogState::Populated);

    set_text(&mut form, "odometer_line_edit", "145675");
    set_text(&mut form, "quantity_line_edit", "33.55");
    set_checked(&mut form, "filled_tank_check_box", true);
    let outcome = dialog.confirm(&form).unwrap();
    drop(dialog);

    let Outcome::Committed { id, .. } = outcome else {
        panic!("expected a commit, got {outcome:?}");
    };
    assert_eq!(id.as_str(), "ABC-123@145675");
    let stored = repository.get(&id).unwrap().entity;
    assert!(stored.filled_tank);
    assert_eq!(stored.quantity.map(|q| q.to_string()), Some("33.55".to_string()));
}

#[test]
fn test_cancel_after_failed_open_closes_without_repository_use() {
    let mut spy = SpyRepository::new(sample_fuel_types());
    let layout = FuelType::layout().unwrap();
    let mut form = layout.form;

    let mut dialog = DialogController::new(
        &mut spy,
        Mode::Edit(id("9999")),
        layout.bindings,
        answer(true),
    );
    assert!(dialog.open(&mut form).is_err());
    assert_eq!(dialog.state(), DialogState::Created);

    assert_eq!(dialog.cancel().unwrap(), Outcome::Cancelled);
    assert_eq!(dialog.state(), DialogState::Closed);
    drop(dialog);

    assert_eq!(spy.calls, ["get"]);
}

#[test]
fn test_purchase_reading_with_other_scale_is_a_duplicate() {
    let mut repository = MemoryRepository::<Purchase>::new();
    let first = repository
        .create(&FieldValues::from([
            ("vehicle_rego", "ABC-123"),
            ("odometer", "146814"),
        ]))
        .unwrap();

    let err = repository
        .create(&FieldValues::from([
            ("vehicle_rego", "ABC-123"),
            ("odometer", "146814.0"),
        ]))
        .unwrap_err();

    assert!(matches!(err, Error::Storage(StorageError::Constraint(_))));
    assert_eq!(first.id.as_str(), "ABC-123@146814");
    assert_eq!(repository.len(), 1);
}
