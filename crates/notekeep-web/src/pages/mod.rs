//! Server-rendered pages for the form-login web UI.

mod account;
mod dashboard;

use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use notekeep_core::CoreError;

use crate::error::status_and_message;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        .route("/register", get(account::register_page).post(account::register_submit))
        .route("/login", get(account::login_page).post(account::login_submit))
        .route("/logout", get(account::logout).post(account::logout))
        .route("/dashboard", get(dashboard::dashboard).post(dashboard::create_note))
        .route("/dashboard/update/{id}", post(dashboard::update_note))
        .route("/dashboard/delete/{id}", post(dashboard::delete_note))
}

/// Renders a core error as an HTML page with the mapped status code.
pub fn error_response(err: &CoreError) -> Response {
    let (status, message) = status_and_message(err);
    let body = format!(
        r#"<h1>{}</h1>
<p>{}</p>
<p><a href="/dashboard">Back to dashboard</a></p>"#,
        status.as_u16(),
        html_escape(&message)
    );
    (status, Html(layout("Error", &body))).into_response()
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>{title} · notekeep</title>
    <style>
      body {{ font-family: system-ui, -apple-system, Segoe UI, Roboto, sans-serif; padding: 2rem; max-width: 720px; margin: 0 auto; }}
      .card {{ border: 1px solid #ddd; border-radius: 12px; padding: 1.25rem; margin-bottom: 1rem; }}
      label {{ display: block; margin-top: 0.75rem; font-weight: 600; }}
      input, textarea {{ width: 100%; padding: 0.6rem; border: 1px solid #ccc; border-radius: 10px; margin-top: 0.25rem; box-sizing: border-box; }}
      button {{ margin-top: 1rem; padding: 0.6rem 1rem; border: 0; border-radius: 10px; background: #111; color: #fff; font-weight: 700; cursor: pointer; }}
      button.danger {{ background: #b00020; }}
      .error {{ color: #b00020; }}
      .info {{ color: #1b5e20; }}
      .meta {{ color: #555; font-size: 0.85rem; }}
    </style>
  </head>
  <body>
{body}
  </body>
</html>"#,
        title = html_escape(title),
    )
}

fn messages_html(class: &str, messages: &[String]) -> String {
    messages
        .iter()
        .map(|m| format!(r#"<p class="{class}">{}</p>"#, html_escape(m)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            html_escape(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#x27;y&#x27;&lt;/script&gt;"
        );
    }

    #[test]
    fn error_page_carries_status() {
        let response = error_response(&CoreError::Forbidden);
        assert_eq!(response.status(), axum::http::StatusCode::FORBIDDEN);
    }
}
