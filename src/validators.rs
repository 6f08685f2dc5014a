/// Input validators
///
/// Email shape checks for registration, password limits imposed by bcrypt,
/// and chirp body length and word filtering.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
const MIN_EMAIL_LENGTH: usize = 3;
/// bcrypt only reads the first 72 bytes of a password
const MAX_PASSWORD_BYTES: usize = 72;
pub const MAX_CHIRP_LENGTH: usize = 140;

const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];
const CENSORED: &str = "****";

lazy_static! {
    // RFC 5322 simplified email regex (practical validation)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();
}

/// Validates an email address and returns it trimmed
///
/// Case is preserved: emails are stored and matched exactly as given.
pub fn is_valid_email(email: &str) -> Result<String, ValidationError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("email".to_string()));
    }

    if trimmed.len() < MIN_EMAIL_LENGTH {
        return Err(ValidationError::TooShort("email".to_string(), MIN_EMAIL_LENGTH));
    }

    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong("email".to_string(), MAX_EMAIL_LENGTH));
    }

    if !EMAIL_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat("email".to_string()));
    }

    Ok(trimmed.to_string())
}

/// Checks a password is usable with bcrypt; strength is not judged here
pub fn is_valid_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password".to_string()));
    }

    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::TooLong("password".to_string(), MAX_PASSWORD_BYTES));
    }

    Ok(())
}

/// Validates a chirp body and returns it with profane words censored
pub fn validate_chirp(body: &str) -> Result<String, ValidationError> {
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ValidationError::TooLong("chirp".to_string(), MAX_CHIRP_LENGTH));
    }

    Ok(censor_profanity(body))
}

/// Replace profane words (case-insensitive, split on single spaces) with `****`
pub fn censor_profanity(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lowered = word.to_lowercase();
            if PROFANE_WORDS.contains(&lowered.as_str()) {
                CENSORED
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert_eq!(is_valid_email("a@example.com"), Ok("a@example.com".to_string()));
        assert_eq!(is_valid_email("  Mixed.Case@Example.com "), Ok("Mixed.Case@Example.com".to_string()));
        assert!(is_valid_email("user+tag@sub.example.co.kr").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        let invalid = ["", "   ", "notanemail", "user@", "@example.com", "user@@example.com"];
        for email in invalid {
            assert!(is_valid_email(email).is_err(), "{:?} should be rejected", email);
        }

        let long_email = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            is_valid_email(&long_email),
            Err(ValidationError::TooLong(_, MAX_EMAIL_LENGTH))
        ));
    }

    #[test]
    fn test_password_limits() {
        assert!(is_valid_password("pw123").is_ok());
        assert!(is_valid_password(&"a".repeat(72)).is_ok());
        assert!(matches!(is_valid_password(""), Err(ValidationError::EmptyField(_))));
        assert!(matches!(
            is_valid_password(&"a".repeat(73)),
            Err(ValidationError::TooLong(_, MAX_PASSWORD_BYTES))
        ));
    }

    #[test]
    fn test_chirp_length() {
        assert!(validate_chirp(&"a".repeat(MAX_CHIRP_LENGTH)).is_ok());
        assert!(validate_chirp(&"a".repeat(MAX_CHIRP_LENGTH + 1)).is_err());
        // Length counts characters, not bytes
        assert!(validate_chirp(&"é".repeat(MAX_CHIRP_LENGTH)).is_ok());
    }

    #[test]
    fn test_profanity_is_censored() {
        assert_eq!(
            censor_profanity("I had something interesting for breakfast"),
            "I had something interesting for breakfast"
        );
        assert_eq!(
            censor_profanity("I hear Mastodon is better than Chirpy. sharbert I need to migrate"),
            "I hear Mastodon is better than Chirpy. **** I need to migrate"
        );
        assert_eq!(
            censor_profanity("I really need a kerfuffle to go to bed sooner, Fornax !"),
            "I really need a **** to go to bed sooner, **** !"
        );
    }

    #[test]
    fn test_punctuated_words_are_kept() {
        assert_eq!(censor_profanity("Sharbert! kerfuffle."), "Sharbert! kerfuffle.");
    }
}
