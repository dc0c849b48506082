mod common;

use std::time::Duration;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

fn titles(list: &Value) -> Vec<&str> {
    list.as_array()
        .map(|notes| notes.iter().filter_map(|n| n["title"].as_str()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn list_is_empty_for_new_account() -> Result<()> {
    let app = common::test_app();
    let (token, _) = app.signup("Ada", "ada@example.com", "analytical").await?;

    let (status, body) = app.send(Method::GET, "/api/notes", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    Ok(())
}

#[tokio::test]
async fn create_returns_note_owned_by_caller() -> Result<()> {
    let app = common::test_app();
    let (token, id) = app.signup("Ada", "ada@example.com", "analytical").await?;

    let note = app.create_note(&token, "Shopping", "Eggs, flour").await?;
    assert_eq!(note["title"], "Shopping");
    assert_eq!(note["content"], "Eggs, flour");
    assert_eq!(note["ownerId"], id.as_str());
    assert!(note["id"].is_string());
    assert!(note["createdAt"].is_string());
    assert!(note["updatedAt"].is_string());
    Ok(())
}

#[tokio::test]
async fn create_requires_both_title_and_content() -> Result<()> {
    let app = common::test_app();
    let (token, _) = app.signup("Ada", "ada@example.com", "analytical").await?;

    for body in [
        json!({ "title": "", "content": "" }),
        json!({ "title": "Only title", "content": "" }),
        json!({ "title": "", "content": "Only content" }),
        json!({ "title": "Only title" }),
        json!({}),
    ] {
        let (status, resp) = app
            .send(Method::POST, "/api/notes", Some(&token), Some(body.clone()))
            .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {}: {}", body, resp);
        assert_eq!(resp["code"], "VALIDATION_ERROR");
    }

    let (_, list) = app.send(Method::GET, "/api/notes", Some(&token), None).await?;
    assert_eq!(list, json!([]));
    Ok(())
}

#[tokio::test]
async fn list_orders_by_most_recent_update() -> Result<()> {
    let app = common::test_app();
    let (token, _) = app.signup("Ada", "ada@example.com", "analytical").await?;

    app.create_note(&token, "X", "x").await?;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let y = app.create_note(&token, "Y", "y").await?;
    tokio::time::sleep(Duration::from_millis(5)).await;
    app.create_note(&token, "Z", "z").await?;

    let (_, list) = app.send(Method::GET, "/api/notes", Some(&token), None).await?;
    assert_eq!(titles(&list), vec!["Z", "Y", "X"]);

    tokio::time::sleep(Duration::from_millis(5)).await;
    let uri = format!("/api/notes/{}", y["id"].as_str().unwrap());
    let (status, updated) = app
        .send(Method::PUT, &uri, Some(&token), Some(json!({ "title": "Y", "content": "y2" })))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["content"], "y2");

    let (_, list) = app.send(Method::GET, "/api/notes", Some(&token), None).await?;
    assert_eq!(titles(&list), vec!["Y", "Z", "X"]);
    Ok(())
}

#[tokio::test]
async fn other_owners_notes_are_not_found() -> Result<()> {
    let app = common::test_app();
    let (alice, _) = app.signup("Alice", "alice@example.com", "alice-pw").await?;
    let (bob, bob_id) = app.signup("Bob", "bob@example.com", "bob-pw-1").await?;

    app.create_note(&alice, "Alice's", "secret").await?;
    let bobs = app.create_note(&bob, "Bob's", "secret").await?;
    let uri = format!("/api/notes/{}", bobs["id"].as_str().unwrap());

    let (status, get_body) = app.send(Method::GET, &uri, Some(&alice), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(Method::PUT, &uri, Some(&alice), Some(json!({ "title": "pwned", "content": "pwned" })))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send(Method::DELETE, &uri, Some(&alice), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Same answer as a note that never existed
    let missing = format!("/api/notes/{}", uuid::Uuid::new_v4());
    let (status, missing_body) = app.send(Method::GET, &missing, Some(&alice), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(get_body, missing_body);

    let (_, alice_list) = app.send(Method::GET, "/api/notes", Some(&alice), None).await?;
    assert_eq!(titles(&alice_list), vec!["Alice's"]);

    // Bob still sees and controls his note, untouched
    let (status, note) = app.send(Method::GET, &uri, Some(&bob), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(note["title"], "Bob's");
    assert_eq!(note["ownerId"], bob_id.as_str());

    let (status, note) = app
        .send(Method::PUT, &uri, Some(&bob), Some(json!({ "title": "Bob's v2", "content": "still secret" })))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(note["title"], "Bob's v2");
    assert_eq!(note["ownerId"], bob_id.as_str());

    let (status, body) = app.send(Method::DELETE, &uri, Some(&bob), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = app.send(Method::GET, &uri, Some(&bob), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn update_cannot_reassign_owner() -> Result<()> {
    let app = common::test_app();
    let (alice, alice_id) = app.signup("Alice", "alice@example.com", "alice-pw").await?;
    let (_, bob_id) = app.signup("Bob", "bob@example.com", "bob-pw-1").await?;

    let note = app.create_note(&alice, "Mine", "body").await?;
    let uri = format!("/api/notes/{}", note["id"].as_str().unwrap());

    let (status, updated) = app
        .send(
            Method::PUT,
            &uri,
            Some(&alice),
            Some(json!({ "title": "Still mine", "content": "body", "ownerId": bob_id })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["ownerId"], alice_id.as_str());
    Ok(())
}

#[tokio::test]
async fn update_rejects_blank_fields() -> Result<()> {
    let app = common::test_app();
    let (token, _) = app.signup("Ada", "ada@example.com", "analytical").await?;
    let note = app.create_note(&token, "Title", "Content").await?;
    let uri = format!("/api/notes/{}", note["id"].as_str().unwrap());

    let (status, _) = app
        .send(Method::PUT, &uri, Some(&token), Some(json!({ "title": "", "content": "x" })))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, unchanged) = app.send(Method::GET, &uri, Some(&token), None).await?;
    assert_eq!(unchanged["title"], "Title");
    Ok(())
}

#[tokio::test]
async fn non_uuid_id_is_not_found() -> Result<()> {
    let app = common::test_app();
    let (token, _) = app.signup("Ada", "ada@example.com", "analytical").await?;

    let (status, _) = app.send(Method::GET, "/api/notes/not-an-id", Some(&token), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
