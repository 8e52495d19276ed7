//! Capability evaluator properties against the reference table.

use traknor_acl::{Action, PermissionTable, Role, Subject};

/// Every (role, action, subject) triple evaluates to a plain boolean.
#[test]
fn every_triple_evaluates() {
    let table = PermissionTable::reference();
    let mut granted = 0;
    for role in Role::ALL {
        for action in Action::ALL {
            for subject in Subject::ALL {
                if table.can(role, action, subject) {
                    granted += 1;
                }
            }
        }
    }
    assert!(granted > 0);
}

#[test]
fn admin_can_do_everything() {
    let table = PermissionTable::reference();
    for action in Action::ALL {
        for subject in Subject::ALL {
            assert!(table.can(Role::Admin, action, subject), "admin {action} {subject}");
        }
    }
    assert!(table.can(Role::Admin, Action::Manage, Subject::User));
}

/// Delete is never granted to technicians or requesters.
#[test]
fn non_admins_cannot_delete() {
    let table = PermissionTable::reference();
    for role in [Role::Technician, Role::Requester] {
        for subject in Subject::ALL {
            assert!(!table.can(role, Action::Delete, subject), "{role} may delete {subject}");
        }
        assert!(
            table
                .rules(role)
                .iter()
                .all(|rule| !rule.actions.contains(&Action::Delete))
        );
    }
}

/// A `*` rule grants its actions on every subject.
#[test]
fn wildcard_rules_cover_every_subject() {
    let table = PermissionTable::reference();
    for role in Role::ALL {
        for rule in table.rules(role).iter().filter(|r| r.subjects.is_any()) {
            for action in &rule.actions {
                for subject in Subject::ALL {
                    assert!(table.can(role, *action, subject));
                }
            }
        }
    }
}

#[test]
fn technician_edit_scope() {
    let table = PermissionTable::reference();
    for subject in [Subject::WorkOrder, Subject::Inventory, Subject::Procedure] {
        assert!(table.can(Role::Technician, Action::Edit, subject));
    }
    for subject in [Subject::User, Subject::Asset, Subject::Plan] {
        assert!(!table.can(Role::Technician, Action::Edit, subject));
    }
}

#[test]
fn requester_works_through_solicitations() {
    let table = PermissionTable::reference();
    assert!(table.can(Role::Requester, Action::Create, Subject::Solicitation));
    assert!(table.can(Role::Requester, Action::Edit, Subject::Solicitation));
    assert!(!table.can(Role::Requester, Action::Create, Subject::WorkOrder));
    assert!(!table.can(Role::Requester, Action::Edit, Subject::WorkOrder));
}

/// Evaluating the same question repeatedly never changes the answer and a
/// role switch takes effect immediately.
#[test]
fn no_decision_is_cached() {
    let table = PermissionTable::reference();
    let as_requester = traknor_acl::Ability::new(&table, Some(Role::Requester));
    let as_admin = traknor_acl::Ability::new(&table, Some(Role::Admin));
    for _ in 0..3 {
        assert!(!as_requester.can_delete(Subject::Asset));
        assert!(as_admin.can_delete(Subject::Asset));
    }
}
