#![allow(dead_code)]

use std::collections::BTreeMap;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use recipe_box::{Config, RecipeState, db::SqlitePool, recipe_router};
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN: &str = "admin";
pub const ADMIN_PASSWORD: &str = "default";

pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
    pub cookies: BTreeMap<String, String>,
    _dir: TempDir,
}

pub struct Reply {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let cfg = Config {
            database: dir.path().join("recipes.db"),
            username: ADMIN.to_string(),
            password: ADMIN_PASSWORD.to_string(),
            ..Config::default()
        };
        let pool = recipe_box::db::open(&cfg)
            .await
            .expect("failed to open database");
        let state = RecipeState::new(pool.clone(), &cfg).expect("invalid state");
        Self {
            app: recipe_router(state),
            pool,
            cookies: BTreeMap::new(),
            _dir: dir,
        }
    }

    pub async fn get(&mut self, uri: &str) -> Reply {
        let req = self
            .request("GET", uri)
            .body(Body::empty())
            .expect("failed to build request");
        self.send(req).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> Reply {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let req = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("failed to build request");
        self.send(req).await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Reply {
        self.post_form("/login", &[("username", username), ("password", password)])
            .await
    }

    pub async fn entry_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM entries")
            .fetch_one(&self.pool)
            .await
            .expect("count query failed")
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri);
        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(header::COOKIE, cookie);
        }
        builder
    }

    async fn send(&mut self, req: Request<Body>) -> Reply {
        let resp = self.app.clone().oneshot(req).await.expect("request failed");
        self.store_cookies(&resp);
        let status = resp.status();
        let location = resp
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        Reply {
            status,
            location,
            body: String::from_utf8(body.to_vec()).expect("response body was not utf-8"),
        }
    }

    /// Minimal browser cookie store: empty values are removals.
    fn store_cookies(&mut self, resp: &Response) {
        for value in resp.headers().get_all(header::SET_COOKIE) {
            let Ok(raw) = value.to_str() else { continue };
            let pair = raw.split(';').next().unwrap_or_default();
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            if value.is_empty() {
                self.cookies.remove(name.trim());
            } else {
                self.cookies
                    .insert(name.trim().to_string(), value.to_string());
            }
        }
    }
}

pub fn soup() -> Vec<(&'static str, &'static str)> {
    vec![
        ("title", "Soup"),
        ("ingredients", "water, salt"),
        ("steps", "boil"),
        ("tags", "easy dinner"),
        ("url", ""),
    ]
}
