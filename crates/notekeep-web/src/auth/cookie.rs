//! Session cookie read/write helpers.

use std::time::Duration;

use axum::http::{header, HeaderMap};

pub const SESSION_COOKIE_NAME: &str = "notekeep_session";

/// Extracts the session cookie value from the request's `Cookie` headers.
pub fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|cookie| {
            cookie
                .trim()
                .strip_prefix(SESSION_COOKIE_NAME)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

pub fn set_session(session_id: &str, max_age: Duration, secure: bool) -> String {
    format!(
        "{SESSION_COOKIE_NAME}={session_id}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}{}",
        max_age.as_secs(),
        if secure { "; Secure" } else { "" }
    )
}

pub fn clear_session(secure: bool) -> String {
    format!(
        "{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0{}",
        if secure { "; Secure" } else { "" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_session_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; notekeep_session=abc-123; lang=en"),
        );
        assert_eq!(session_id(&headers).as_deref(), Some("abc-123"));
    }

    #[test]
    fn ignores_lookalike_names_and_empty_values() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("notekeep_session_old=zzz; notekeep_session="),
        );
        assert_eq!(session_id(&headers), None);
    }

    #[test]
    fn set_cookie_flags() {
        let cookie = set_session("abc", Duration::from_secs(1800), true);
        assert!(cookie.starts_with("notekeep_session=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=1800"));
        assert!(cookie.ends_with("; Secure"));

        assert!(!clear_session(false).contains("Secure"));
        assert!(clear_session(false).contains("Max-Age=0"));
    }
}
