use std::sync::Arc;

use argon2::{
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use axum::{
    body::Body,
    extract::{Query, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, Request,
    },
    middleware::Next,
    response::{Html, IntoResponse, Response},
    Form,
};
use rand::rngs::OsRng;
use serde::Deserialize;
use stockfolio_core::users::UserRepositoryTrait;
use thiserror::Error;

use crate::{
    error::{PageError, PageResult},
    main_lib::AppState,
    session::SESSION_COOKIE,
    views::{escape_html, layout, redirect, Nav},
};

const LOGIN_PATH: &str = "/login";
const MISSING_CREDENTIALS: &str = "Please enter both username and password.";
const UNKNOWN_USERNAME: &str = "Invalid username.";
const WRONG_PASSWORD: &str = "Invalid password.";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    Internal(String),
}

impl From<AuthError> for PageError {
    fn from(err: AuthError) -> Self {
        PageError::Internal(err.to_string())
    }
}

/// Hashes `password` into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Internal(format!("Failed to hash password: {e}")))
}

pub fn verify_password(password_hash: &str, candidate: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| AuthError::Internal(format!("Stored password hash is invalid: {e}")))?;
    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .map_err(|err| match err {
            PasswordHashError::Password => AuthError::InvalidCredentials,
            other => AuthError::Internal(format!("Password verification failed: {other}")),
        })
}

/// Identity of a logged-in request, placed in the request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: i32,
    pub username: String,
    pub token: String,
}

/// The session token from the `Cookie` header, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn expired_cookie(secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn with_cookie(mut response: Response, cookie: String) -> PageResult<Response> {
    let value = HeaderValue::from_str(&cookie)
        .map_err(|e| PageError::Internal(format!("Invalid cookie header: {e}")))?;
    response.headers_mut().append(SET_COOKIE, value);
    Ok(response)
}

fn login_redirect_with(message: &str) -> Response {
    redirect(&format!("{LOGIN_PATH}?error={}", urlencoding::encode(message)))
}

/// Lets the request through only with a live session, otherwise sends the
/// browser to the login page.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = session_token(request.headers()) else {
        return redirect(LOGIN_PATH);
    };
    let Some(session) = state.sessions.get(&token).await else {
        return redirect(LOGIN_PATH);
    };
    request.extensions_mut().insert(CurrentUser {
        user_id: session.user_id,
        username: session.username,
        token,
    });
    next.run(request).await
}

#[derive(Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login_page(Query(query): Query<LoginQuery>) -> Html<String> {
    let alert = query
        .error
        .filter(|message| !message.is_empty())
        .map(|message| {
            format!(
                r#"<div class="alert alert-danger">{}</div>"#,
                escape_html(&message)
            )
        })
        .unwrap_or_default();
    let body = format!(
        r#"<div class="login-card">
<h2>Login</h2>
{alert}
<form method="post" action="{LOGIN_PATH}">
<label for="username">Username</label>
<input type="text" id="username" name="username" required autofocus />
<label for="password">Password</label>
<input type="password" id="password" name="password" required />
<button type="submit" class="btn-proceed">Login</button>
</form>
</div>"#
    );
    layout("Login", Nav::None, None, &body)
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> PageResult<Response> {
    let username = form.username.trim();
    let password = form.password.trim();
    if username.is_empty() || password.is_empty() {
        return Ok(login_redirect_with(MISSING_CREDENTIALS));
    }

    let Some(user) = state.user_repository.find_by_username(username)? else {
        tracing::info!("Login rejected for unknown user '{}'", username);
        return Ok(login_redirect_with(UNKNOWN_USERNAME));
    };

    match verify_password(&user.password_hash, password) {
        Ok(()) => {}
        Err(AuthError::InvalidCredentials) => {
            tracing::info!("Login rejected for '{}': wrong password", username);
            return Ok(login_redirect_with(WRONG_PASSWORD));
        }
        Err(other) => return Err(other.into()),
    }

    let token = state.sessions.create(user.id, &user.username).await;
    tracing::info!("User '{}' logged in", user.username);
    with_cookie(
        redirect("/dashboard"),
        session_cookie(&token, state.secure_cookies),
    )
}

pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        state.sessions.destroy(&token).await;
    }
    match with_cookie(redirect(LOGIN_PATH), expired_cookie(state.secure_cookies)) {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}
