//! Input validation for registration and note forms.
//!
//! Each `validate_*` function collects every violation instead of stopping
//! at the first one, so forms can show all problems at once.

use crate::error::{CoreError, CoreResult};
use crate::model::{NewUser, NoteInput};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_USERNAME_LEN: usize = 50;
pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_CONTENT_LEN: usize = 1000;

const PASSWORD_SPECIALS: &[char] = &['@', '#', '$', '%', '^', '&', '+', '=', '!'];

/// Characters that end a line: LF, CR, NEL, LINE SEPARATOR, PARAGRAPH SEPARATOR.
const LINE_TERMINATORS: &[char] = &['\n', '\r', '\u{0085}', '\u{2028}', '\u{2029}'];

/// Returns `true` if `password` has at least [`MIN_PASSWORD_LEN`] chars and
/// contains a digit, a lower-case letter, an upper-case letter and one of
/// `@#$%^&+=!`. Passwords spanning more than one line are rejected.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && !password.contains(LINE_TERMINATORS)
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(&c))
}

pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.find('.') {
        Some(_) => !domain.starts_with('.') && !domain.ends_with('.'),
        None => false,
    }
}

pub fn validate_registration(user: &NewUser) -> CoreResult<()> {
    let mut errors = Vec::new();

    let username = user.username.trim();
    if username.is_empty() {
        errors.push("username is required".to_string());
    } else if username.chars().count() > MAX_USERNAME_LEN {
        errors.push(format!(
            "username must be at most {MAX_USERNAME_LEN} characters"
        ));
    }

    if !is_valid_email(user.email.trim()) {
        errors.push("email must be a valid address".to_string());
    }

    if !is_strong_password(&user.password) {
        errors.push(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters and contain a digit, \
             a lower-case letter, an upper-case letter and one of @#$%^&+=!"
        ));
    }

    finish(errors)
}

pub fn validate_note(input: &NoteInput) -> CoreResult<()> {
    let mut errors = Vec::new();

    if input.title.trim().is_empty() {
        errors.push("title is required".to_string());
    } else if input.title.chars().count() > MAX_TITLE_LEN {
        errors.push(format!("title must be at most {MAX_TITLE_LEN} characters"));
    }

    if input.content.trim().is_empty() {
        errors.push("content is required".to_string());
    } else if input.content.chars().count() > MAX_CONTENT_LEN {
        errors.push(format!(
            "content must be at most {MAX_CONTENT_LEN} characters"
        ));
    }

    finish(errors)
}

fn finish(errors: Vec<String>) -> CoreResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(password: &str) -> NewUser {
        NewUser {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn strong_password_passes() {
        assert!(is_strong_password("StrongPass1!"));
        assert!(is_strong_password("aB3@efgh"));
    }

    #[test]
    fn short_password_fails() {
        assert!(!is_strong_password("123"));
        assert!(!is_strong_password("aB3@efg"));
    }

    #[test]
    fn password_missing_digit_fails() {
        assert!(!is_strong_password("StrongPass!"));
    }

    #[test]
    fn password_missing_upper_fails() {
        assert!(!is_strong_password("strongpass1!"));
    }

    #[test]
    fn password_missing_lower_fails() {
        assert!(!is_strong_password("STRONGPASS1!"));
    }

    #[test]
    fn password_missing_special_fails() {
        assert!(!is_strong_password("StrongPass12"));
        // '*' is not in the accepted special set
        assert!(!is_strong_password("StrongPass1*"));
    }

    #[test]
    fn password_with_line_break_fails() {
        for sep in ["\n", "\r", "\u{0085}", "\u{2028}", "\u{2029}"] {
            assert!(!is_strong_password(&format!("Strong{sep}Pass1!")), "{sep:?}");
        }
    }

    #[test]
    fn email_format() {
        assert!(is_valid_email("test@test.com"));
        assert!(is_valid_email("a.b+c@mail.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@example."));
        assert!(!is_valid_email("us er@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
    }

    #[test]
    fn registration_with_weak_password_fails() {
        let err = validate_registration(&new_user("123")).unwrap_err();
        match err {
            CoreError::Validation(msgs) => {
                assert_eq!(msgs.len(), 1);
                assert!(msgs[0].starts_with("password"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn registration_collects_every_violation() {
        let user = NewUser {
            username: "  ".to_string(),
            email: "not-an-email".to_string(),
            password: "weak".to_string(),
        };
        match validate_registration(&user).unwrap_err() {
            CoreError::Validation(msgs) => assert_eq!(msgs.len(), 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn registration_valid() {
        assert!(validate_registration(&new_user("StrongPass1!")).is_ok());
    }

    #[test]
    fn note_requires_title_and_content() {
        let input = NoteInput {
            title: " ".to_string(),
            content: String::new(),
        };
        match validate_note(&input).unwrap_err() {
            CoreError::Validation(msgs) => assert_eq!(msgs.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn note_length_limits() {
        let input = NoteInput {
            title: "t".repeat(MAX_TITLE_LEN + 1),
            content: "c".repeat(MAX_CONTENT_LEN),
        };
        match validate_note(&input).unwrap_err() {
            CoreError::Validation(msgs) => {
                assert_eq!(msgs, vec!["title must be at most 100 characters"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let input = NoteInput {
            title: "t".repeat(MAX_TITLE_LEN),
            content: "c".repeat(MAX_CONTENT_LEN + 1),
        };
        match validate_note(&input).unwrap_err() {
            CoreError::Validation(msgs) => {
                assert_eq!(msgs, vec!["content must be at most 1000 characters"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn note_at_exact_limits_passes() {
        let input = NoteInput {
            title: "t".repeat(MAX_TITLE_LEN),
            content: "c".repeat(MAX_CONTENT_LEN),
        };
        assert!(validate_note(&input).is_ok());
    }
}
