mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{ADMIN, ADMIN_PASSWORD, TestApp, soup};

async fn logged_in_app() -> TestApp {
    let mut app = TestApp::spawn().await;
    app.login(ADMIN, ADMIN_PASSWORD).await;
    app
}

#[tokio::test]
async fn empty_collection_renders() {
    let mut app = TestApp::spawn().await;
    let page = app.get("/").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("No recipes here so far."));
}

#[tokio::test]
async fn soup_scenario() {
    let mut app = logged_in_app().await;

    let resp = app.post_form("/add", &soup()).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location.as_deref(), Some("/view/1"));

    let page = app.get("/view/1").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("New entry was successfully posted"));
    assert!(page.body.contains("<h1>Soup</h1>"));
    assert!(page.body.contains("water, salt"));

    let page = app.get("/search/dinner").await;
    assert!(page.body.contains("href=\"/view/1\""));

    let page = app.post_form("/search", &[("search_query", "pasta")]).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(!page.body.contains("href=\"/view/"));
}

#[tokio::test]
async fn anonymous_visitors_can_browse() {
    let mut app = logged_in_app().await;
    app.post_form("/add", &soup()).await;
    app.cookies.clear();

    let page = app.get("/").await;
    assert!(page.body.contains("href=\"/view/1\""));
    assert!(!page.body.contains("href=\"/add\""));

    let page = app.get("/view/1").await;
    assert!(page.body.contains("Soup"));
    assert!(!page.body.contains("/delete/1"));

    let page = app.get("/search").await;
    assert!(page.body.contains("href=\"/search/dinner\""));
    assert!(page.body.contains("href=\"/search/easy\""));
}

#[tokio::test]
async fn search_requires_every_token() {
    let mut app = logged_in_app().await;
    for (title, tags) in [
        ("Chicken curry", "spicy"),
        ("Tomato soup", "starter"),
        ("Chicken soup", "winter"),
        ("Bread", "baking"),
    ] {
        let fields = [
            ("title", title),
            ("ingredients", ""),
            ("steps", ""),
            ("tags", tags),
            ("url", ""),
        ];
        app.post_form("/add", &fields).await;
    }

    let page = app
        .post_form("/search", &[("search_query", "chicken soup")])
        .await;
    assert!(page.body.contains("href=\"/view/3\""));
    for id in [1, 2, 4] {
        assert!(!page.body.contains(&format!("href=\"/view/{id}\"")));
    }

    // word order must not matter
    let page = app
        .post_form("/search", &[("search_query", "soup chicken")])
        .await;
    assert!(page.body.contains("href=\"/view/3\""));
    for id in [1, 2, 4] {
        assert!(!page.body.contains(&format!("href=\"/view/{id}\"")));
    }

    let page = app.get("/search/soup%20chicken").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("href=\"/view/3\""));
    for id in [1, 2, 4] {
        assert!(!page.body.contains(&format!("href=\"/view/{id}\"")));
    }

    let page = app.post_form("/search", &[("search_query", "")]).await;
    for id in 1..=4 {
        assert!(page.body.contains(&format!("href=\"/view/{id}\"")));
    }
}

#[tokio::test]
async fn missing_field_is_reported_and_nothing_is_written() {
    let mut app = logged_in_app().await;

    let resp = app.post_form("/add", &[("title", "Half a recipe")]).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location.as_deref(), Some("/add"));
    assert_eq!(app.entry_count().await, 0);

    let page = app.get("/add").await;
    assert!(page.body.contains("Missing field: ingredients"));
}

#[tokio::test]
async fn edit_replaces_entry() {
    let mut app = logged_in_app().await;
    app.post_form("/add", &soup()).await;

    let form = app.get("/edit/1").await;
    assert!(form.body.contains("value=\"easy dinner\""));

    let resp = app
        .post_form(
            "/edit/1",
            &[
                ("title", "Stew"),
                ("ingredients", "beef"),
                ("steps", "simmer"),
                ("tags", "winter"),
                ("url", "https://example.com/stew"),
            ],
        )
        .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location.as_deref(), Some("/view/1"));

    let page = app.get("/view/1").await;
    assert!(page.body.contains("Entry 1 has been modified."));
    assert!(page.body.contains("<h1>Stew</h1>"));
    assert!(page.body.contains("<a href=\"https://example.com/stew\">"));
    assert!(!page.body.contains("Soup"));
}

#[tokio::test]
async fn edit_of_unknown_id_changes_nothing() {
    let mut app = logged_in_app().await;
    app.post_form("/add", &soup()).await;

    let resp = app.post_form("/edit/42", &soup()).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(app.entry_count().await, 1);

    let page = app.get("/view/42").await;
    assert!(page.body.contains("No such recipe."));
}

#[tokio::test]
async fn delete_removes_entry_and_tolerates_unknown_ids() {
    let mut app = logged_in_app().await;
    app.post_form("/add", &soup()).await;

    let resp = app.get("/delete/1").await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location.as_deref(), Some("/"));
    assert_eq!(app.entry_count().await, 0);

    let page = app.get("/").await;
    assert!(page.body.contains("Entry 1 has been deleted"));

    let page = app.get("/view/1").await;
    assert!(page.body.contains("No such recipe."));

    assert_eq!(app.get("/delete/99").await.status, StatusCode::SEE_OTHER);
    assert_eq!(app.get("/delete/abc").await.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn user_text_is_escaped() {
    let mut app = logged_in_app().await;
    let fields = [
        ("title", "<script>alert(1)</script>"),
        ("ingredients", ""),
        ("steps", ""),
        ("tags", ""),
        ("url", ""),
    ];
    app.post_form("/add", &fields).await;

    let page = app.get("/view/1").await;
    assert!(!page.body.contains("<script>"));
    assert!(page.body.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn storage_failure_is_a_generic_500_and_releases_connections() {
    let mut app = TestApp::spawn().await;
    sqlx::query("DROP TABLE entries")
        .execute(&app.pool)
        .await
        .expect("failed to drop table");

    // more requests than the pool holds: a leaked connection would block acquire
    for _ in 0..8 {
        let page = tokio::time::timeout(Duration::from_secs(5), app.get("/"))
            .await
            .expect("request blocked waiting for a connection");
        assert_eq!(page.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(page.body.contains("An internal server error occurred."));
        assert!(!page.body.contains("no such table"));
        assert!(!page.body.contains("entries"));
    }
}

#[tokio::test]
async fn unread_notices_are_capped() {
    let mut app = logged_in_app().await;

    for _ in 0..60 {
        let resp = app.get("/delete/99").await;
        assert_eq!(resp.status, StatusCode::SEE_OTHER);
    }
    let cookie = app
        .cookies
        .get("recipe_flash")
        .expect("flash cookie missing");
    assert!(cookie.len() < 4096, "flash cookie grew to {}", cookie.len());

    let page = app.get("/").await;
    assert_eq!(page.body.matches("Entry 99 has been deleted").count(), 5);
}
