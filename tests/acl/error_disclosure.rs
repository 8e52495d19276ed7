//! Error response tests.
//!
//! Server-side failures must not leak paths or internal messages to the
//! client. Denials name only the refused action and subject.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::StatusCode;
use traknor_acl::config::Acl;
use traknor_acl::{Ability, Action, Error, PermissionTable, Role, Subject, load_permission_table};

fn body_text(body: Full<Bytes>) -> String {
    let bytes = tokio_test::block_on(body.collect()).unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[test]
fn config_error_body_hides_the_table_path() {
    let acl = Acl {
        table_path: Some("/srv/secret/dir/permissions.toml".into()),
    };
    let err = load_permission_table(&acl).unwrap_err();
    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_text(response.into_body());
    assert!(body.contains("Internal server error"));
    assert!(!body.contains("/srv/secret"), "path leaked: {body}");
}

#[test]
fn table_parse_error_body_is_generic() {
    let err = PermissionTable::from_toml(
        r#"
[[roles.admin]]
action = "/srv/etc/shadow"
subject = "*"
"#,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Toml(_)));

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_text(response.into_body());
    assert!(!body.contains("shadow"), "detail leaked: {body}");
    assert!(body.contains("Internal server error"));
}

#[test]
fn forbidden_names_the_denied_pair() {
    let err = Error::Forbidden {
        action: Action::Delete,
        subject: Subject::Asset,
    };
    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        response.headers().get(hyper::header::CONTENT_TYPE).unwrap(),
        "application/json"
    );

    let body: serde_json::Value = serde_json::from_str(&body_text(response.into_body())).unwrap();
    assert_eq!(body["error"], "Forbidden: cannot delete asset");
}

#[test]
fn require_denial_renders_as_403() {
    let table = PermissionTable::reference();
    let ability = Ability::new(&table, Some(Role::Technician));
    let response = ability
        .require(Action::Delete, Subject::WorkOrder)
        .unwrap_err()
        .into_response();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[test]
fn expired_token_is_401() {
    assert_eq!(
        Error::TokenExpired.into_response().status(),
        StatusCode::UNAUTHORIZED
    );
}
