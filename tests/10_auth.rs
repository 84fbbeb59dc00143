mod common;

use anyhow::Result;
use bucketlist_api::auth::{generate_jwt, Claims};
use bucketlist_api::config::AppConfig;
use chrono::Utc;
use common::{read, TestServer, PASSWORD};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_register_returns_user_without_password() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = read(server.register("wcyn").await?).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["username"], "wcyn");
    assert_eq!(body["data"]["email"], "wcyn@andela.com");
    assert!(body["data"]["uri"].as_str().unwrap().starts_with("/api/v1/auth/users/"));
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("password_hash").is_none());
    Ok(())
}

#[tokio::test]
async fn test_register_validation_errors() -> Result<()> {
    let server = TestServer::start().await?;

    let resp = server
        .client
        .post(server.url("/api/v1/auth/register"))
        .json(&json!({"username": "wcyn", "email": "not-an-email", "password": "123"}))
        .send()
        .await?;
    let (status, body) = read(resp).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["email"][0], "not-an-email is not a valid email address.");
    assert_eq!(body["field_errors"]["password"][0], "Password must have more than 6 characters.");
    Ok(())
}

#[tokio::test]
async fn test_register_duplicate_username() -> Result<()> {
    let server = TestServer::start().await?;
    assert_eq!(server.register("paul").await?.status(), StatusCode::CREATED);

    let (status, body) = read(server.register("paul").await?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["username"].is_array());
    assert!(body["field_errors"]["email"].is_array());
    Ok(())
}

#[tokio::test]
async fn test_register_rejects_invalid_json() -> Result<()> {
    let server = TestServer::start().await?;

    let resp = server
        .client
        .post(server.url("/api/v1/auth/register"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    let (status, body) = read(resp).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");
    Ok(())
}

#[tokio::test]
async fn test_login_returns_bearer_token() -> Result<()> {
    let server = TestServer::start().await?;
    server.register("wcyn").await?;

    let (status, body) = read(server.login("wcyn", PASSWORD).await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["data"]["expires_in"].as_i64().unwrap() > 0);
    assert_eq!(body["data"]["user"]["username"], "wcyn");
    Ok(())
}

#[tokio::test]
async fn test_login_failures_share_a_message() -> Result<()> {
    let server = TestServer::start().await?;
    server.register("wcyn").await?;

    let (status, wrong_password) = read(server.login("wcyn", "wrong-password").await?).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, unknown_user) = read(server.login("nobody", PASSWORD).await?).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password["message"], unknown_user["message"]);
    Ok(())
}

#[tokio::test]
async fn test_protected_routes_require_token() -> Result<()> {
    let server = TestServer::start().await?;

    let resp = server.client.get(server.url("/api/v1/bucketlists/")).send().await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = server
        .client
        .get(server.url("/api/v1/bucketlists/"))
        .header("authorization", "Token abc")
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = server.get("not.a.jwt", "/api/v1/bucketlists/").await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_expired_token_is_rejected() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, body) = read(server.register("wcyn").await?).await?;
    let user_id = body["data"]["id"].as_i64().unwrap();

    let mut claims = Claims::new(user_id, "wcyn".to_string(), 1);
    claims.iat = Utc::now().timestamp() - 3 * 3600;
    claims.exp = Utc::now().timestamp() - 3600;
    let token = generate_jwt(&claims, &AppConfig::testing().security.jwt_secret)?;

    let (status, body) = read(server.get(&token, "/api/v1/bucketlists/").await?).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].as_str().unwrap().contains("ExpiredSignature"));
    Ok(())
}

#[tokio::test]
async fn test_logout_revokes_token() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.user_token("wcyn").await?;

    let resp = server.post(&token, "/api/v1/auth/logout", json!({})).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = server.get(&token, "/api/v1/bucketlists/").await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_new_login_supersedes_old_token() -> Result<()> {
    let server = TestServer::start().await?;
    let first = server.user_token("wcyn").await?;

    let (_, body) = read(server.login("wcyn", PASSWORD).await?).await?;
    let second = body["data"]["token"].as_str().unwrap().to_string();

    assert_eq!(server.get(&first, "/api/v1/bucketlists/").await?.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(server.get(&second, "/api/v1/bucketlists/").await?.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_refresh_issues_replacement_token() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.user_token("wcyn").await?;

    let (status, body) = read(server.post(&token, "/api/v1/auth/refresh", json!({})).await?).await?;
    assert_eq!(status, StatusCode::OK);
    let refreshed = body["data"]["token"].as_str().unwrap().to_string();
    assert_ne!(refreshed, token);

    assert_eq!(server.get(&token, "/api/v1/bucketlists/").await?.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(server.get(&refreshed, "/api/v1/bucketlists/").await?.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_user_detail_is_private() -> Result<()> {
    let server = TestServer::start().await?;
    let wcyn = server.user_token("wcyn").await?;
    let paul = server.user_token("paul").await?;

    let (status, body) = read(server.get(&wcyn, "/api/v1/auth/users/1").await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "wcyn");

    assert_eq!(server.get(&paul, "/api/v1/auth/users/1").await?.status(), StatusCode::FORBIDDEN);
    assert_eq!(server.get(&paul, "/api/v1/auth/users/99").await?.status(), StatusCode::NOT_FOUND);
    Ok(())
}
