mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_create_user_reports_each_invalid_field() {
    let app = TestApp::new();
    let response = app
        .post(
            "/users",
            json!({ "username": "ab", "email": "not-an-email", "password": "123" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["statusCode"], 400);
    assert_eq!(response.body["error"], "Bad Request");
    assert_eq!(
        response.body["message"],
        json!([
            { "field": "username", "message": "Username must be at least 3 characters long" },
            { "field": "email", "message": "Please provide a valid email address" },
            { "field": "password", "message": "Password must be at least 6 characters long" },
        ])
    );
}

#[tokio::test]
async fn test_duplicate_username_and_email_conflict() {
    let app = TestApp::new();
    app.sign_up_and_login("takenuser").await;

    let same_username = app
        .post(
            "/users",
            json!({ "username": "takenuser", "email": "other@test.com", "password": "password" }),
        )
        .await;
    assert_eq!(same_username.status, StatusCode::CONFLICT);
    assert_eq!(same_username.body["message"], "Username already taken");

    let same_email = app
        .post(
            "/users",
            json!({ "username": "otheruser", "email": "takenuser@test.com", "password": "password" }),
        )
        .await;
    assert_eq!(same_email.status, StatusCode::CONFLICT);
    assert_eq!(same_email.body["message"], "Email already taken");
}

#[tokio::test]
async fn test_get_user_by_username() {
    let app = TestApp::new();
    app.sign_up_and_login("lookupuser").await;

    let found = app.get("/users/lookupuser").await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["username"], "lookupuser");
    assert_eq!(found.body["instrument"], json!([]));

    let missing = app.get("/users/nosuchuser").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(
        missing.body["message"],
        "Could not find the user with the provided username"
    );
}

#[tokio::test]
async fn test_update_requires_token() {
    let app = TestApp::new();
    let response = app
        .request(
            axum::http::Method::PATCH,
            "/users",
            Some(json!({ "fullName": "Nobody" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_profile_and_password() {
    let app = TestApp::new();
    let token = app.sign_up_and_login("patchuser").await;

    let updated = app
        .patch_auth(
            "/users",
            json!({ "fullName": "Patched Name", "description": "Drummer" }),
            &token,
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["fullName"], "Patched Name");
    assert_eq!(updated.body["description"], "Drummer");

    let wrong_old = app
        .patch_auth(
            "/users",
            json!({ "oldPassword": "incorrect", "newPassword": "newpassword" }),
            &token,
        )
        .await;
    assert_eq!(wrong_old.status, StatusCode::FORBIDDEN);
    assert_eq!(wrong_old.body["message"], "Your current Password is not correct");

    let no_old = app
        .patch_auth("/users", json!({ "newPassword": "newpassword" }), &token)
        .await;
    assert_eq!(no_old.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_old.body["message"], "Invalid password data");

    let changed = app
        .patch_auth(
            "/users",
            json!({ "oldPassword": "password", "newPassword": "newpassword" }),
            &token,
        )
        .await;
    assert_eq!(changed.status, StatusCode::OK);

    let login = app
        .post(
            "/auth/login",
            json!({ "username": "patchuser", "password": "newpassword" }),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_onto_taken_username_conflicts() {
    let app = TestApp::new();
    app.sign_up_and_login("firstuser").await;
    let token = app.sign_up_and_login("seconduser").await;

    let response = app
        .patch_auth("/users", json!({ "username": "firstuser" }), &token)
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(
        response.body["message"],
        "The provided username is already in use"
    );
}

#[tokio::test]
async fn test_delete_user() {
    let app = TestApp::new();
    let token = app.sign_up_and_login("deleteuser").await;

    let deleted = app.delete_auth("/users", &token).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    assert_eq!(app.get("/users/deleteuser").await.status, StatusCode::NOT_FOUND);
    // The token outlives the account
    let profile = app.get_auth("/auth/profile", &token).await;
    assert_eq!(profile.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_instrument_lifecycle() {
    let app = TestApp::new();
    let token = app.sign_up_and_login("cellist").await;

    let added = app
        .patch_auth(
            "/users/instruments",
            json!({ "name": "Cello", "genre": ["Classical"] }),
            &token,
        )
        .await;
    assert_eq!(added.status, StatusCode::OK);
    let instrument_id = added.body["instrument"][0]["_id"]
        .as_str()
        .unwrap()
        .to_string();

    let listed = app.get("/users/cellist/instruments").await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body[0]["name"], "Cello");

    let renamed = app
        .patch_auth(
            &format!("/users/instruments/{instrument_id}"),
            json!({ "name": "Baroque Cello" }),
            &token,
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["instrument"][0]["name"], "Baroque Cello");
    assert_eq!(renamed.body["instrument"][0]["genre"], json!(["Classical"]));

    let removed = app
        .delete_auth(&format!("/users/instruments/{instrument_id}"), &token)
        .await;
    assert_eq!(removed.status, StatusCode::OK);
    assert_eq!(removed.body["instrument"], json!([]));

    let again = app
        .delete_auth(&format!("/users/instruments/{instrument_id}"), &token)
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
    assert_eq!(again.body["message"], "Instrument not found");
}

#[tokio::test]
async fn test_add_instrument_requires_fields() {
    let app = TestApp::new();
    let token = app.sign_up_and_login("noinstrument").await;

    let response = app
        .patch_auth("/users/instruments", json!({}), &token)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["message"],
        json!([
            { "field": "name", "message": "Field Required" },
            { "field": "genre", "message": "Field Required" },
        ])
    );
}

#[tokio::test]
async fn test_add_instrument_rejects_empty_values() {
    let app = TestApp::new();
    let token = app.sign_up_and_login("emptyinstrument").await;

    let response = app
        .patch_auth(
            "/users/instruments",
            json!({ "name": "", "genre": [] }),
            &token,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["message"],
        json!([
            { "field": "name", "message": "Field Required" },
            { "field": "genre", "message": "Field Required" },
        ])
    );

    let profile = app.get("/users/emptyinstrument/instruments").await;
    assert_eq!(profile.body, json!([]));
}

#[tokio::test]
async fn test_route_names_are_reserved_usernames() {
    let app = TestApp::new();
    for reserved in ["search", "instruments"] {
        let response = app
            .post(
                "/users",
                json!({
                    "username": reserved,
                    "email": format!("{reserved}@test.com"),
                    "password": "password",
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response.body["message"],
            json!([{ "field": "username", "message": "This username is reserved" }])
        );
    }

    let token = app.sign_up_and_login("renamer").await;
    let rename = app
        .patch_auth("/users", json!({ "username": "search" }), &token)
        .await;
    assert_eq!(rename.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_username_is_required() {
    let app = TestApp::new();
    let response = app
        .post(
            "/users",
            json!({ "username": "", "email": "blank@test.com", "password": "password" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"][0]["field"], "username");
    let message = response.body["message"][0]["message"].as_str().unwrap();
    assert!(message.contains("Field Required"));
}

#[tokio::test]
async fn test_instruments_of_unknown_user() {
    let app = TestApp::new();
    let response = app.get("/users/ghost/instruments").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "No user found");
}

#[tokio::test]
async fn test_search_users_by_instrument() {
    let app = TestApp::new();
    let violin = app.sign_up_and_login("violinist").await;
    app.sign_up_and_login("drummer").await;
    app.patch_auth(
        "/users/instruments",
        json!({ "name": "Violin", "genre": ["Folk"] }),
        &violin,
    )
    .await;

    let found = app.get("/users/search?instrument=violin").await;
    assert_eq!(found.status, StatusCode::OK);
    let names: Vec<&str> = found
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["violinist"]);

    let all = app.get("/users").await;
    assert_eq!(all.body.as_array().unwrap().len(), 2);
}
