mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::TestServer;

#[tokio::test]
async fn protected_route_without_token_is_rejected() -> Result<()> {
    let server = TestServer::start().await?;

    let resp = server.get("/store", None).send().await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = resp.json().await?;
    assert_eq!(
        body,
        json!({
            "description": "Request does not contain an access token.",
            "error": "authorization_required",
        })
    );
    Ok(())
}

#[tokio::test]
async fn non_bearer_header_counts_as_missing() -> Result<()> {
    let server = TestServer::start().await?;

    let resp = server
        .client
        .get(server.url("/store"))
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = resp.json().await?;
    assert_eq!(body["error"], "authorization_required");
    Ok(())
}

#[tokio::test]
async fn garbage_token_fails_signature_check() -> Result<()> {
    let server = TestServer::start().await?;

    let resp = server.get("/store", Some("not.a.jwt")).send().await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = resp.json().await?;
    assert_eq!(
        body,
        json!({
            "message": "Signature verification failed.",
            "error": "invalid_token",
        })
    );
    Ok(())
}

#[tokio::test]
async fn token_signed_by_another_server_is_invalid() -> Result<()> {
    let issuer = TestServer::start_with(|c| c.security.jwt_secret = "some-other-secret".to_string()).await?;
    let (access, _) = issuer.signup("mallory").await?;

    let server = TestServer::start().await?;
    let resp = server.get("/store", Some(&access)).send().await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = resp.json().await?;
    assert_eq!(body["error"], "invalid_token");
    Ok(())
}

#[tokio::test]
async fn expired_access_token_is_rejected() -> Result<()> {
    let server = TestServer::start_with(|c| c.security.access_token_ttl_secs = -60).await?;
    let (access, _) = server.signup("alice").await?;

    let resp = server.get("/store", Some(&access)).send().await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = resp.json().await?;
    assert_eq!(
        body,
        json!({
            "message": "The token has expired.",
            "error": "token_expired",
        })
    );
    Ok(())
}

#[tokio::test]
async fn refresh_token_cannot_reach_access_routes() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, refresh) = server.signup("alice").await?;

    let resp = server.get("/store", Some(&refresh)).send().await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = resp.json().await?;
    assert_eq!(body["error"], "invalid_token");
    Ok(())
}

#[tokio::test]
async fn access_token_cannot_refresh() -> Result<()> {
    let server = TestServer::start().await?;
    let (access, _) = server.signup("alice").await?;

    let resp = server.post("/refresh", Some(&access)).send().await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = resp.json().await?;
    assert_eq!(body["error"], "invalid_token");
    Ok(())
}

#[tokio::test]
async fn logout_revokes_the_access_token() -> Result<()> {
    let server = TestServer::start().await?;
    let (access, _) = server.signup("alice").await?;

    let resp = server.get("/store", Some(&access)).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = server.post("/logout", Some(&access)).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["message"], "Successfully logged out");

    let resp = server.get("/store", Some(&access)).send().await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await?;
    assert_eq!(
        body,
        json!({
            "description": "The token has been revoked.",
            "error": "token_revoked",
        })
    );
    Ok(())
}

#[tokio::test]
async fn logout_only_revokes_that_token() -> Result<()> {
    let server = TestServer::start().await?;
    let (first, _) = server.signup("alice").await?;

    let resp = server
        .post("/login", None)
        .json(&json!({ "username": "alice", "password": "secret-pw" }))
        .send()
        .await?;
    let second = resp.json::<Value>().await?["access_token"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    server.post("/logout", Some(&first)).send().await?;

    let resp = server.get("/store", Some(&second)).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn refreshed_token_is_not_fresh() -> Result<()> {
    let server = TestServer::start().await?;
    let (access, refresh) = server.signup("alice").await?;
    let store_id = server.create_store(&access, "Corner Shop").await?;

    let resp = server.post("/refresh", Some(&refresh)).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    let refreshed = body["access_token"].as_str().unwrap_or_default().to_string();
    assert!(!refreshed.is_empty());

    // Good enough for ordinary access-token routes
    let resp = server.get("/store", Some(&refreshed)).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);

    // But not for item creation
    let resp = server
        .post("/item", Some(&refreshed))
        .json(&json!({ "name": "Chair", "price": 10.0, "store_id": store_id }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await?;
    assert_eq!(
        body,
        json!({
            "description": "Token is not fresh.",
            "error": "fresh_token_required",
        })
    );
    Ok(())
}

#[tokio::test]
async fn refresh_token_is_single_use() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, refresh) = server.signup("alice").await?;

    let resp = server.post("/refresh", Some(&refresh)).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = server.post("/refresh", Some(&refresh)).send().await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await?;
    assert_eq!(body["error"], "token_revoked");
    Ok(())
}

#[tokio::test]
async fn expired_refresh_token_is_rejected() -> Result<()> {
    let server = TestServer::start_with(|c| c.security.refresh_token_ttl_secs = -60).await?;
    let (access, refresh) = server.signup("alice").await?;

    // An expired refresh token never gets far enough to be revoked
    let resp = server.post("/refresh", Some(&refresh)).send().await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await?;
    assert_eq!(body["error"], "token_expired");

    // The access token is unaffected by the refresh token's lifetime
    let resp = server.get("/store", Some(&access)).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn first_user_is_admin_and_others_are_not() -> Result<()> {
    let server = TestServer::start().await?;
    let (admin, _) = server.signup("admin").await?;
    let (regular, _) = server.signup("bob").await?;

    let store_id = server.create_store(&admin, "Doomed").await?;

    let resp = server
        .delete(&format!("/store/{}", store_id), Some(&regular))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await?;
    assert_eq!(body["message"], "Admin privilege required.");

    let resp = server
        .delete(&format!("/store/{}", store_id), Some(&admin))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["message"], "Store deleted.");
    Ok(())
}

#[tokio::test]
async fn admin_principal_follows_config() -> Result<()> {
    let server = TestServer::start_with(|c| c.security.admin_user_id = 2).await?;
    let (first, _) = server.signup("alice").await?;
    let (second, _) = server.signup("bob").await?;
    let store_id = server.create_store(&first, "Shop").await?;

    let resp = server
        .delete(&format!("/store/{}", store_id), Some(&first))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = server
        .delete(&format!("/store/{}", store_id), Some(&second))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn persisted_revocation_survives_restart() -> Result<()> {
    let path = std::env::temp_dir().join(format!("stores-api-{}.db", uuid::Uuid::new_v4()));
    let url = format!("sqlite://{}", path.display());
    let persistent = |url: String| {
        move |c: &mut stores_api::AppConfig| {
            c.database.url = url;
            c.security.persist_blocklist = true;
        }
    };

    let first = TestServer::start_with(persistent(url.clone())).await?;
    let (access, _) = first.signup("alice").await?;
    let resp = first.post("/logout", Some(&access)).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    drop(first);

    let second = TestServer::start_with(persistent(url)).await?;
    let resp = second.get("/store", Some(&access)).send().await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await?;
    assert_eq!(body["error"], "token_revoked");
    drop(second);

    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
    }
    Ok(())
}
