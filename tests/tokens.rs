use axum_storefront_api::tokens::{
    ACCESS_TOKEN_KIND, REFRESH_TOKEN_KIND, TokenRegistry, decode_token, issue_access_token,
    issue_refresh_token,
};
use uuid::Uuid;

const SECRET: &str = "test-secret";

#[test]
fn access_token_round_trips() {
    let user_id = Uuid::new_v4();
    let token = issue_access_token(SECRET, user_id, "user").expect("issue token");

    let claims = decode_token(SECRET, &token).expect("decode token");
    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.role, "user");
    assert_eq!(claims.kind, ACCESS_TOKEN_KIND);
}

#[test]
fn refresh_token_carries_refresh_kind() {
    let token = issue_refresh_token(SECRET, Uuid::new_v4(), "admin").expect("issue token");
    let claims = decode_token(SECRET, &token).expect("decode token");
    assert_eq!(claims.kind, REFRESH_TOKEN_KIND);
    assert_eq!(claims.role, "admin");
}

#[test]
fn forged_tokens_do_not_decode() {
    let token = issue_access_token(SECRET, Uuid::new_v4(), "user").expect("issue token");
    assert!(decode_token("other-secret", &token).is_none());
    assert!(decode_token(SECRET, "not-a-jwt").is_none());
}

#[tokio::test]
async fn registry_tracks_and_revokes_tokens() {
    let registry = TokenRegistry::new();
    registry.insert("tok-1").await;

    assert!(registry.contains("tok-1").await);
    assert!(!registry.contains("tok-2").await);

    assert!(registry.revoke("tok-1").await);
    assert!(!registry.contains("tok-1").await);

    // Revoking an unknown token is harmless.
    assert!(!registry.revoke("tok-1").await);
}
