//! Registration, form login and logout.

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use notekeep_core::{mask_username, CoreError, NewUser};
use serde::Deserialize;

use super::{error_response, html_escape, layout, messages_html};
use crate::auth::cookie;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
    pub logout: Option<String>,
    pub registered: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterQuery {
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub async fn login_page(Query(query): Query<LoginQuery>) -> Html<String> {
    let mut errors = Vec::new();
    let mut notices = Vec::new();
    if query.error.is_some() {
        errors.push("Invalid email or password.".to_string());
    }
    if query.logout.is_some() {
        notices.push("You have been logged out.".to_string());
    }
    if query.registered.is_some() {
        notices.push("Registration successful. Please sign in.".to_string());
    }
    Html(render_login(&errors, &notices))
}

pub async fn login_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let user = match state.auth.authenticate(&form.email, &form.password).await {
        Ok(user) => user,
        Err(CoreError::InvalidCredentials) => return Redirect::to("/login?error").into_response(),
        Err(e) => return error_response(&e),
    };

    // never carry a pre-login session id across authentication
    if let Some(old) = cookie::session_id(&headers) {
        state.session_store.remove(&old);
    }

    let session_id = state.session_store.create(user.id);
    let set_cookie = cookie::set_session(
        &session_id,
        state.session_store.ttl(),
        state.secure_cookies(),
    );
    ([(header::SET_COOKIE, set_cookie)], Redirect::to("/dashboard")).into_response()
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(session_id) = cookie::session_id(&headers) {
        state.session_store.remove(&session_id);
    }
    (
        [(header::SET_COOKIE, cookie::clear_session(state.secure_cookies()))],
        Redirect::to("/login?logout"),
    )
        .into_response()
}

pub async fn register_page(Query(query): Query<RegisterQuery>) -> Html<String> {
    let errors = if query.error.is_some() {
        vec!["That email is already registered.".to_string()]
    } else {
        Vec::new()
    };
    Html(render_register(&errors, "", ""))
}

pub async fn register_submit(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let username = form.username.clone();
    let email = form.email.clone();
    let new_user = NewUser {
        username: form.username,
        email: form.email,
        password: form.password,
    };

    match state.auth.register(new_user).await {
        Ok(user) => {
            tracing::debug!("web registration for {}", mask_username(&user.username));
            Redirect::to("/login?registered").into_response()
        }
        Err(CoreError::Validation(messages)) => (
            StatusCode::BAD_REQUEST,
            Html(render_register(&messages, &username, &email)),
        )
            .into_response(),
        Err(CoreError::EmailTaken) => Redirect::to("/register?error").into_response(),
        Err(e) => error_response(&e),
    }
}

fn render_login(errors: &[String], notices: &[String]) -> String {
    let body = format!(
        r#"<div class="card">
  <h1>Sign in</h1>
  {errors}
  {notices}
  <form method="post" action="/login">
    <label for="email">Email</label>
    <input id="email" name="email" type="email" autocomplete="username" required />
    <label for="password">Password</label>
    <input id="password" name="password" type="password" autocomplete="current-password" required />
    <button type="submit">Sign in</button>
  </form>
  <p class="meta">No account? <a href="/register">Register</a></p>
</div>"#,
        errors = messages_html("error", errors),
        notices = messages_html("info", notices),
    );
    layout("Sign in", &body)
}

fn render_register(errors: &[String], username: &str, email: &str) -> String {
    let body = format!(
        r#"<div class="card">
  <h1>Create account</h1>
  {errors}
  <form method="post" action="/register">
    <label for="username">Username</label>
    <input id="username" name="username" value="{username}" required />
    <label for="email">Email</label>
    <input id="email" name="email" type="email" value="{email}" required />
    <label for="password">Password</label>
    <input id="password" name="password" type="password" autocomplete="new-password" required />
    <p class="meta">At least 8 characters with upper and lower case letters, a digit and one of @#$%^&amp;+=!</p>
    <button type="submit">Register</button>
  </form>
  <p class="meta">Already registered? <a href="/login">Sign in</a></p>
</div>"#,
        errors = messages_html("error", errors),
        username = html_escape(username),
        email = html_escape(email),
    );
    layout("Register", &body)
}
