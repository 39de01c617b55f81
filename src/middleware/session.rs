//! Per-visitor session state and one-shot flash notices, both kept in private
//! (encrypted and authenticated) cookies.

use std::convert::Infallible;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponseParts, ResponseParts};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;

pub const SESSION_COOKIE: &str = "recipe_session";
pub const FLASH_COOKIE: &str = "recipe_flash";

/// Unread notices expire on their own.
const FLASH_MAX_AGE: Duration = Duration::minutes(5);

/// Only the newest notices are kept so the cookie stays well under 4 KB.
pub const MAX_FLASHES: usize = 5;

/// Cookie attributes shared by every cookie the app sets.
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    pub secure: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub logged_in: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Error,
}

impl FlashCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashCategory::Success => "success",
            FlashCategory::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

/// Session extracted from the request cookies. Return it as part of the response
/// so changes reach the client.
pub struct Session {
    jar: PrivateCookieJar,
    policy: CookiePolicy,
    data: SessionData,
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    Key: FromRef<S>,
    CookiePolicy: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state).await?;
        let data = jar
            .get(SESSION_COOKIE)
            .and_then(|c| serde_json::from_str(c.value()).ok())
            .unwrap_or_default();
        Ok(Self {
            jar,
            policy: CookiePolicy::from_ref(state),
            data,
        })
    }
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        self.data.logged_in
    }

    pub fn log_in(mut self) -> Self {
        self.data.logged_in = true;
        self.store_data()
    }

    pub fn log_out(mut self) -> Self {
        self.data = SessionData::default();
        self.jar = self.jar.remove(clear_cookie(SESSION_COOKIE));
        self
    }

    /// Queue a notice for the next rendered page.
    pub fn flash(mut self, category: FlashCategory, message: impl Into<String>) -> Self {
        let mut flashes = self.read_flashes();
        push_capped(
            &mut flashes,
            Flash {
                category,
                message: message.into(),
            },
        );
        // Vec<Flash> always serializes
        let value = serde_json::to_string(&flashes).unwrap_or_default();
        self.jar = self
            .jar
            .add(build_cookie(FLASH_COOKIE, value, self.policy, Some(FLASH_MAX_AGE)));
        self
    }

    /// Pending notices, removed from the client once this session is returned.
    pub fn take_flashes(mut self) -> (Self, Vec<Flash>) {
        let flashes = self.read_flashes();
        if !flashes.is_empty() {
            self.jar = self.jar.remove(clear_cookie(FLASH_COOKIE));
        }
        (self, flashes)
    }

    fn read_flashes(&self) -> Vec<Flash> {
        self.jar
            .get(FLASH_COOKIE)
            .and_then(|c| serde_json::from_str(c.value()).ok())
            .unwrap_or_default()
    }

    fn store_data(mut self) -> Self {
        let value = serde_json::to_string(&self.data).unwrap_or_default();
        self.jar = self
            .jar
            .add(build_cookie(SESSION_COOKIE, value, self.policy, None));
        self
    }
}

impl IntoResponseParts for Session {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        self.jar.into_response_parts(res)
    }
}

fn push_capped(flashes: &mut Vec<Flash>, flash: Flash) {
    flashes.push(flash);
    if flashes.len() > MAX_FLASHES {
        let excess = flashes.len() - MAX_FLASHES;
        flashes.drain(..excess);
    }
}

fn build_cookie(
    name: &str,
    value: String,
    policy: CookiePolicy,
    max_age: Option<Duration>,
) -> Cookie<'static> {
    let mut cookie = Cookie::build(Cookie::new(name.to_string(), value))
        .path("/")
        .http_only(true)
        .secure(policy.secure)
        .same_site(SameSite::Lax)
        .build();
    cookie.set_max_age(max_age);
    cookie
}

fn clear_cookie(name: &str) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
