mod common;

use anyhow::Result;
use common::{read, TestServer};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_create_item_defaults_done_to_false() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.user_token("wcyn").await?;
    let bl = server.bucketlist(&token, "Travel").await?;

    let path = format!("/api/v1/bucketlists/{}/items", bl);
    let (status, body) = read(server.post(&token, &path, json!({"description": "Visit Cairo"})).await?).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["done"], false);
    assert_eq!(body["data"]["bucketlist"], bl);
    assert_eq!(body["data"]["tags"], json!([]));
    Ok(())
}

#[tokio::test]
async fn test_item_tags_are_attached_and_replaced() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.user_token("wcyn").await?;
    let bl = server.bucketlist(&token, "Travel").await?;
    let africa = server.tag(&token, bl, "africa").await?;
    let cheap = server.tag(&token, bl, "cheap").await?;

    let item = server
        .item(&token, bl, json!({"description": "Visit Cairo", "tags": [africa, cheap]}))
        .await?;
    let path = format!("/api/v1/bucketlists/{}/items/{}", bl, item);

    let (_, body) = read(server.get(&token, &path).await?).await?;
    assert_eq!(body["data"]["tags"].as_array().unwrap().len(), 2);

    let (status, body) = read(server.put(&token, &path, json!({"done": true, "tags": [cheap]})).await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["done"], true);
    assert_eq!(body["data"]["tags"][0]["name"], "cheap");
    assert_eq!(body["data"]["tags"].as_array().unwrap().len(), 1);

    let (_, body) = read(server.get(&token, &format!("/api/v1/bucketlists/{}", bl)).await?).await?;
    assert_eq!(body["data"]["items"][0]["tags"][0]["name"], "cheap");
    Ok(())
}

#[tokio::test]
async fn test_item_rejects_foreign_tags() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.user_token("wcyn").await?;
    let travel = server.bucketlist(&token, "Travel").await?;
    let other = server.bucketlist(&token, "Other").await?;
    let tag = server.tag(&token, other, "elsewhere").await?;

    let path = format!("/api/v1/bucketlists/{}/items/", travel);
    let (status, body) = read(server.post(&token, &path, json!({"description": "Visit", "tags": [tag, 99]})).await?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["tags"].is_array());
    Ok(())
}

#[tokio::test]
async fn test_item_must_belong_to_bucketlist() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.user_token("wcyn").await?;
    let travel = server.bucketlist(&token, "Travel").await?;
    let other = server.bucketlist(&token, "Other").await?;
    let item = server.item(&token, other, json!({"description": "Elsewhere"})).await?;

    let path = format!("/api/v1/bucketlists/{}/items/{}", travel, item);
    assert_eq!(server.get(&token, &path).await?.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_list_and_delete_items() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.user_token("wcyn").await?;
    let bl = server.bucketlist(&token, "Travel").await?;
    let first = server.item(&token, bl, json!({"description": "Visit Cairo"})).await?;
    server.item(&token, bl, json!({"description": "Visit Lagos", "done": true})).await?;

    let list = format!("/api/v1/bucketlists/{}/items/", bl);
    let (status, body) = read(server.get(&token, &list).await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 2);
    assert_eq!(body["data"]["items"][1]["done"], true);

    let path = format!("/api/v1/bucketlists/{}/items/{}", bl, first);
    assert_eq!(server.delete(&token, &path).await?.status(), StatusCode::NO_CONTENT);
    assert_eq!(server.get(&token, &path).await?.status(), StatusCode::NOT_FOUND);

    let (_, body) = read(server.get(&token, &format!("{}?q=lagos", list)).await?).await?;
    assert_eq!(body["data"]["count"], 1);
    Ok(())
}

#[tokio::test]
async fn test_deleting_bucketlist_removes_items() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.user_token("wcyn").await?;
    let bl = server.bucketlist(&token, "Travel").await?;
    let item = server.item(&token, bl, json!({"description": "Visit Cairo"})).await?;

    server.delete(&token, &format!("/api/v1/bucketlists/{}", bl)).await?;
    let path = format!("/api/v1/bucketlists/{}/items/{}", bl, item);
    assert_eq!(server.get(&token, &path).await?.status(), StatusCode::NOT_FOUND);
    Ok(())
}
