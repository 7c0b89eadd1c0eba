//! Masking helpers so credentials never reach the logs in clear text.

const MASK: &str = "***";

/// Masks an email address for logging.
///
/// `"user@example.com"` becomes `"u***@e***.com"`. Empty input, or input
/// without an `@` after the first character, is masked completely.
pub fn mask_email(email: &str) -> String {
    let Some(at) = email.find('@') else {
        return MASK.to_string();
    };
    if at == 0 {
        return MASK.to_string();
    }

    let local = &email[..at];
    let domain = &email[at + 1..];

    let masked_local = match local.chars().next() {
        Some(c) => format!("{c}{MASK}"),
        None => MASK.to_string(),
    };

    let masked_domain = match domain.chars().next() {
        None => MASK.to_string(),
        Some(first) => match domain.rfind('.') {
            Some(dot) if dot > 0 => format!("{first}{MASK}{}", &domain[dot..]),
            _ => format!("{first}{MASK}"),
        },
    };

    format!("{masked_local}@{masked_domain}")
}

/// Masks a username for logging: first two characters, then `***`.
/// Names of two characters or fewer are masked completely.
pub fn mask_username(username: &str) -> String {
    if username.chars().count() <= 2 {
        return MASK.to_string();
    }
    let prefix: String = username.chars().take(2).collect();
    format!("{prefix}{MASK}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_valid_email() {
        let masked = mask_email("aliev99@gmail.com");
        assert!(masked.starts_with("a***@"));
        assert!(masked.ends_with(".com"));
        assert!(!masked.contains("aliev"));
        assert!(!masked.contains("gmail"));
        assert_eq!(masked, "a***@g***.com");
    }

    #[test]
    fn masks_dotted_local_part() {
        let masked = mask_email("aliev.ibra99@gmail.com");
        assert!(!masked.contains("ibra99"));
        assert_eq!(masked, "a***@g***.com");
    }

    #[test]
    fn masks_short_email() {
        let masked = mask_email("a@b.com");
        assert!(masked.contains(MASK));
        assert_ne!(masked, "a@b.com");
    }

    #[test]
    fn empty_email_is_fully_masked() {
        assert_eq!(mask_email(""), MASK);
    }

    #[test]
    fn email_without_at_is_fully_masked() {
        assert_eq!(mask_email("notanemail"), MASK);
        assert_eq!(mask_email("@example.com"), MASK);
    }

    #[test]
    fn domain_without_dot() {
        assert_eq!(mask_email("user@localhost"), "u***@l***");
        assert_eq!(mask_email("user@"), "u***@***");
    }

    #[test]
    fn masks_username() {
        let masked = mask_username("johndoe");
        assert_eq!(masked, "jo***");
        assert!(!masked.contains("hndoe"));
    }

    #[test]
    fn short_username_is_fully_masked() {
        assert_eq!(mask_username("ab"), MASK);
        assert_eq!(mask_username(""), MASK);
    }
}
