//! Configuration and permission-table loading tests.

use std::io::Write;

use traknor_acl::config::Acl;
use traknor_acl::{Action, Error, Loader, PermissionTable, Role, Subject, load_permission_table};

/// The loader strips `jwt_secret` from TOML files before applying
/// environment / CLI overrides.
#[test]
fn jwt_secret_stripped_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[auth]
jwt_secret = "should_be_stripped"
"#
    )
    .unwrap();

    let loader = Loader::new("ACLCFGTEST");
    let result = loader.load(Some(file.path()), None, None);
    assert!(
        matches!(result, Err(Error::Config(_))),
        "a secret from the file alone must not satisfy the loader"
    );

    let config = loader
        .load(Some(file.path()), None, Some("cli_override_secret"))
        .unwrap();
    assert_eq!(config.auth.jwt_secret, "cli_override_secret");
}

#[test]
fn unset_table_path_loads_reference_table() {
    let table = load_permission_table(&Acl::default()).unwrap();
    assert_eq!(table, PermissionTable::reference());
}

#[test]
fn table_file_replaces_reference_rules() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[[roles.admin]]
action = ["view", "create", "edit", "delete", "move", "convert", "manage"]
subject = "*"

[[roles.technician]]
action = "view"
subject = "*"

[[roles.technician]]
action = "manage"
subject = "inventory"
"#
    )
    .unwrap();

    let acl = Acl {
        table_path: Some(file.path().to_path_buf()),
    };
    let table = load_permission_table(&acl).unwrap();
    assert!(table.can(Role::Technician, Action::Manage, Subject::Inventory));
    assert!(!table.can(Role::Technician, Action::Edit, Subject::WorkOrder));
    assert!(!table.can(Role::Requester, Action::View, Subject::Report));
}

#[test]
fn missing_table_file_is_a_config_error() {
    let acl = Acl {
        table_path: Some("/nonexistent/permissions.toml".into()),
    };
    assert!(matches!(load_permission_table(&acl), Err(Error::Config(_))));
}

#[test]
fn invalid_table_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[[roles.technician]]
action = "approve"
subject = "*"
"#
    )
    .unwrap();
    let acl = Acl {
        table_path: Some(file.path().to_path_buf()),
    };
    assert!(load_permission_table(&acl).is_err());
}
