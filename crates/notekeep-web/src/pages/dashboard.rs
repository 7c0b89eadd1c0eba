//! Session-authenticated note dashboard.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use notekeep_core::{CoreError, Identity, Note, NoteId, NoteInput};
use serde::Deserialize;

use super::{error_response, html_escape, layout, messages_html};
use crate::auth::middleware::SessionUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NoteForm {
    pub title: String,
    pub content: String,
}

impl From<NoteForm> for NoteInput {
    fn from(form: NoteForm) -> Self {
        NoteInput {
            title: form.title,
            content: form.content,
        }
    }
}

pub async fn dashboard(user: SessionUser, State(state): State<AppState>) -> Response {
    render(&state, &user.identity, StatusCode::OK, &[]).await
}

pub async fn create_note(
    user: SessionUser,
    State(state): State<AppState>,
    Form(form): Form<NoteForm>,
) -> Response {
    match state.notes.create(&user.identity, form.into()).await {
        Ok(_) => Redirect::to("/dashboard").into_response(),
        Err(CoreError::Validation(messages)) => {
            render(&state, &user.identity, StatusCode::BAD_REQUEST, &messages).await
        }
        Err(e) => error_response(&e),
    }
}

pub async fn update_note(
    user: SessionUser,
    State(state): State<AppState>,
    Path(id): Path<NoteId>,
    Form(form): Form<NoteForm>,
) -> Response {
    match state.notes.update(&user.identity, id, form.into()).await {
        Ok(_) => Redirect::to("/dashboard").into_response(),
        Err(CoreError::Validation(messages)) => {
            render(&state, &user.identity, StatusCode::BAD_REQUEST, &messages).await
        }
        Err(e) => error_response(&e),
    }
}

pub async fn delete_note(
    user: SessionUser,
    State(state): State<AppState>,
    Path(id): Path<NoteId>,
) -> Response {
    match state.notes.delete(&user.identity, id).await {
        Ok(()) => Redirect::to("/dashboard").into_response(),
        Err(e) => error_response(&e),
    }
}

async fn render(
    state: &AppState,
    identity: &Identity,
    status: StatusCode,
    errors: &[String],
) -> Response {
    match state.notes.list(identity).await {
        Ok(notes) => (status, Html(render_dashboard(identity, &notes, errors))).into_response(),
        Err(e) => error_response(&e),
    }
}

fn render_dashboard(identity: &Identity, notes: &[Note], errors: &[String]) -> String {
    let items = if notes.is_empty() {
        r#"<p class="meta">No notes yet.</p>"#.to_string()
    } else {
        notes.iter().map(render_note).collect::<Vec<_>>().join("\n")
    };

    let body = format!(
        r#"<div class="card">
  <h1>{username}'s notes</h1>
  <form method="post" action="/logout"><button type="submit">Sign out</button></form>
</div>
<div class="card">
  <h2>New note</h2>
  {errors}
  <form method="post" action="/dashboard">
    <label for="title">Title</label>
    <input id="title" name="title" maxlength="100" required />
    <label for="content">Content</label>
    <textarea id="content" name="content" rows="4" maxlength="1000" required></textarea>
    <button type="submit">Save</button>
  </form>
</div>
{items}"#,
        username = html_escape(&identity.username),
        errors = messages_html("error", errors),
    );
    layout("Dashboard", &body)
}

fn render_note(note: &Note) -> String {
    format!(
        r#"<div class="card">
  <form method="post" action="/dashboard/update/{id}">
    <input name="title" value="{title}" maxlength="100" required />
    <textarea name="content" rows="3" maxlength="1000" required>{content}</textarea>
    <p class="meta">Created {created}</p>
    <button type="submit">Update</button>
  </form>
  <form method="post" action="/dashboard/delete/{id}">
    <button class="danger" type="submit">Delete</button>
  </form>
</div>"#,
        id = note.id,
        title = html_escape(&note.title),
        content = html_escape(&note.content),
        created = note.created_at.format("%Y-%m-%d %H:%M UTC"),
    )
}
