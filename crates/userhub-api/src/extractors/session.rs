//! `SessionCredentials` extractor reading the session cookie and bearer token.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};

use userhub_auth::session::RequestCredentials;
use userhub_entity::session::SessionRef;

/// Cookie carrying the session reference.
pub const SESSION_COOKIE: &str = "session";

/// Header carrying a freshly issued token in responses. Also accepted on
/// requests when no `Authorization` header is sent.
pub const TOKEN_HEADER: &str = "token";

/// Whatever credentials the request carried. Never rejects; judging them is
/// the guard's job.
#[derive(Debug, Clone, Default)]
pub struct SessionCredentials(pub RequestCredentials);

impl std::ops::Deref for SessionCredentials {
    type Target = RequestCredentials;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for SessionCredentials
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let session = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| cookie.value().parse::<SessionRef>().ok());

        let token = bearer_token(&parts.headers).or_else(|| {
            parts
                .headers
                .get(TOKEN_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
        });

        Ok(Self(RequestCredentials { session, token }))
    }
}

/// Builds the cookie handing `session` to the client.
pub fn session_cookie(session: &SessionRef) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Builds the cookie that clears the session reference.
pub fn cleared_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}
