//! Identity resolution tests.
//!
//! Any token problem must resolve to the anonymous viewer, which is denied
//! everything, rather than to an error or a default role.

use hyper::http::HeaderMap;
use jsonwebtoken::{EncodingKey, Header, encode};
use traknor_acl::config::Auth;
use traknor_acl::session::{self, Claims};
use traknor_acl::{Error, Role, Viewer};

fn config() -> Auth {
    Auth {
        jwt_secret: "real_secret_that_is_at_least_32b!".to_string(),
    }
}

fn claims(role: &str, lifetime: jiff::SignedDuration) -> Claims {
    let now = jiff::Timestamp::now();
    Claims {
        sub: "user-1".to_string(),
        role: role.to_string(),
        department_id: None,
        sector_ids: vec!["sector-hvac-1".to_string()],
        exp: (now + lifetime).as_second(),
        iat: now.as_second(),
    }
}

fn sign(config: &Auth, claims: &Claims) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .unwrap()
}

fn headers(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Authorization", value.parse().unwrap());
    headers
}

#[test]
fn valid_token_resolves_viewer() {
    let config = config();
    let token = sign(&config, &claims("requester", jiff::SignedDuration::from_hours(1)));
    let viewer = session::viewer_from_headers(&headers(&format!("Bearer {token}")), &config);
    assert_eq!(viewer.role, Some(Role::Requester));
    assert_eq!(viewer.sector_ids, ["sector-hvac-1"]);
}

/// RFC 7235: the auth-scheme is case-insensitive.
#[test]
fn lowercase_bearer_is_accepted() {
    let config = config();
    let token = sign(&config, &claims("admin", jiff::SignedDuration::from_hours(1)));
    let viewer = session::viewer_from_headers(&headers(&format!("bearer {token}")), &config);
    assert_eq!(viewer.role, Some(Role::Admin));
}

#[test]
fn expired_token_is_reported_and_resolves_anonymous() {
    let config = config();
    let token = sign(&config, &claims("admin", jiff::SignedDuration::from_hours(-2)));
    assert!(matches!(session::verify_token(&config, &token), Err(Error::TokenExpired)));
    let viewer = session::viewer_from_headers(&headers(&format!("Bearer {token}")), &config);
    assert_eq!(viewer, Viewer::anonymous());
}

/// A token forged with `"alg":"none"` must not grant a role.
#[test]
fn none_algorithm_token_is_anonymous() {
    use base64::Engine;
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let header = engine.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let payload = engine.encode(
        serde_json::json!({"sub":"mallory","role":"admin","exp":9999999999i64,"iat":1700000000})
            .to_string(),
    );
    let forged = format!("{header}.{payload}.");

    let viewer = session::viewer_from_headers(&headers(&format!("Bearer {forged}")), &config());
    assert_eq!(viewer, Viewer::anonymous());
}

/// Rotating the signing key invalidates every outstanding token.
#[test]
fn token_from_old_key_is_anonymous() {
    let old = Auth {
        jwt_secret: "old_secret_key_production_32byte!".to_string(),
    };
    let token = sign(&old, &claims("admin", jiff::SignedDuration::from_hours(1)));
    let viewer = session::viewer_from_headers(&headers(&format!("Bearer {token}")), &config());
    assert_eq!(viewer.role, None);
}

#[test]
fn short_secret_is_rejected() {
    let weak = Auth {
        jwt_secret: "x".to_string(),
    };
    assert!(matches!(session::verify_token(&weak, "a.b.c"), Err(Error::Config(_))));
}

#[test]
fn unknown_role_claim_has_no_permissions() {
    let config = config();
    let token = sign(&config, &claims("superuser", jiff::SignedDuration::from_hours(1)));
    let viewer = session::viewer_from_headers(&headers(&format!("Bearer {token}")), &config);
    assert_eq!(viewer.id, "user-1");
    assert_eq!(viewer.role, None);
}
