//! Gating tests.
//!
//! A denied affordance must be absent from the rendered output, not present
//! in a disabled state.

use traknor_acl::{Ability, Action, Gate, PermissionTable, Role, Subject};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Button {
    Edit,
    Move,
    Convert,
    Delete,
}

fn work_order_toolbar(gate: &Gate<'_>) -> Vec<Button> {
    gate.filter_items([
        (Action::Edit, Subject::WorkOrder, Button::Edit),
        (Action::Move, Subject::WorkOrder, Button::Move),
        (Action::Convert, Subject::Solicitation, Button::Convert),
        (Action::Delete, Subject::WorkOrder, Button::Delete),
    ])
}

#[test]
fn toolbar_per_role() {
    let table = PermissionTable::reference();

    let admin = Gate::new(Ability::new(&table, Some(Role::Admin)));
    assert_eq!(
        work_order_toolbar(&admin),
        [Button::Edit, Button::Move, Button::Convert, Button::Delete]
    );

    let technician = Gate::new(Ability::new(&table, Some(Role::Technician)));
    assert_eq!(
        work_order_toolbar(&technician),
        [Button::Edit, Button::Move, Button::Convert]
    );

    let requester = Gate::new(Ability::new(&table, Some(Role::Requester)));
    assert!(work_order_toolbar(&requester).is_empty());
}

/// Without a session every gate is closed.
#[test]
fn missing_session_closes_every_gate() {
    let table = PermissionTable::reference();
    let gate = Gate::new(Ability::anonymous(&table));
    for action in Action::ALL {
        for subject in Subject::ALL {
            assert_eq!(gate.if_can(action, subject, || ()), None);
        }
    }
    assert!(work_order_toolbar(&gate).is_empty());
}

#[test]
fn requester_create_button_only_for_solicitations() {
    let table = PermissionTable::reference();
    let gate = Gate::new(Ability::new(&table, Some(Role::Requester)));
    assert_eq!(gate.if_can_create(Subject::Solicitation, || "New request"), Some("New request"));
    assert_eq!(gate.if_can_create(Subject::WorkOrder, || "New work order"), None);
    assert_eq!(gate.if_can_delete(Subject::Solicitation, || "Delete"), None);
}
