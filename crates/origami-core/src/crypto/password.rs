//! Password policy and strength feedback.
//!
//! `validate_password` is enforced whenever a new password is chosen.
//! `PasswordStrength` is advisory and only drives UI feedback.

use serde::Serialize;

use crate::error::{JournalError, Result};

/// Minimum password length in characters.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Validate a new password meets minimum security requirements.
///
/// # Requirements
///
/// - At least 6 characters long
/// - Not empty or only whitespace
///
/// # Examples
///
/// ```
/// use origami_core::crypto::validate_password;
///
/// assert!(validate_password("orange17").is_ok());
/// assert!(validate_password("short").is_err());
/// ```
pub fn validate_password(password: &str) -> Result<()> {
    if password.trim().is_empty() {
        return Err(JournalError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }

    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(JournalError::InvalidInput(format!(
            "Password must be at least {} characters (got {})",
            MIN_PASSWORD_LENGTH, length
        )));
    }

    Ok(())
}

/// Coarse strength rating shown next to a new password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthLabel {
    Weak,
    Fair,
    Good,
    Strong,
}

impl StrengthLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weak => "Weak",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Strong => "Strong",
        }
    }
}

/// Strength score (0..=6) with suggestions for improvement.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordStrength {
    pub score: u8,
    pub label: StrengthLabel,
    pub feedback: Vec<&'static str>,
}

const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

impl PasswordStrength {
    /// Score a password by length and character variety.
    pub fn evaluate(password: &str) -> Self {
        let mut score = 0u8;
        let mut feedback = Vec::new();

        let length = password.chars().count();
        if length >= 8 {
            score += 2;
        } else if length >= MIN_PASSWORD_LENGTH {
            score += 1;
        } else {
            feedback.push("Use at least 6 characters");
        }

        let checks: [(fn(char) -> bool, &'static str); 4] = [
            (|c| c.is_lowercase(), "Add lowercase letters"),
            (|c| c.is_uppercase(), "Add uppercase letters"),
            (|c| c.is_ascii_digit(), "Add numbers"),
            (|c| SPECIAL_CHARACTERS.contains(c), "Add special characters"),
        ];
        for (matches, hint) in checks {
            if password.chars().any(matches) {
                score += 1;
            } else {
                feedback.push(hint);
            }
        }

        let label = match score {
            0..=2 => StrengthLabel::Weak,
            3..=4 => StrengthLabel::Fair,
            5 => StrengthLabel::Good,
            _ => StrengthLabel::Strong,
        };

        Self {
            score,
            label,
            feedback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password() {
        assert!(validate_password("orange17").is_ok());
        assert!(validate_password("longer password with spaces and symbols!@#").is_ok());
    }

    #[test]
    fn test_password_too_short() {
        let result = validate_password("short");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("at least 6 characters"));
    }

    #[test]
    fn test_minimum_length_matches_strength_hint() {
        assert!(validate_password("Lemon1").is_ok());
        assert!(validate_password("Lemon").is_err());

        let strength = PasswordStrength::evaluate("Lemon1!");
        assert!(validate_password("Lemon1!").is_ok());
        assert_eq!(strength.label, StrengthLabel::Good);
        assert!(!strength.feedback.contains(&"Use at least 6 characters"));
    }

    #[test]
    fn test_password_empty() {
        assert!(validate_password("").is_err());
        assert!(validate_password("        ").is_err());
        assert!(validate_password("\n\t").is_err());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 5 characters, 10 bytes
        assert!(validate_password("ééééé").is_err());
    }

    #[test]
    fn test_strength_weak() {
        let strength = PasswordStrength::evaluate("abc");
        assert_eq!(strength.label, StrengthLabel::Weak);
        assert!(strength.feedback.contains(&"Use at least 6 characters"));
        assert!(strength.feedback.contains(&"Add numbers"));
    }

    #[test]
    fn test_strength_fair() {
        // length 8 (+2), lowercase (+1), digits (+1)
        let strength = PasswordStrength::evaluate("orange17");
        assert_eq!(strength.score, 4);
        assert_eq!(strength.label, StrengthLabel::Fair);
        assert_eq!(
            strength.feedback,
            vec!["Add uppercase letters", "Add special characters"]
        );
    }

    #[test]
    fn test_strength_good_and_strong() {
        assert_eq!(
            PasswordStrength::evaluate("Orange17").label,
            StrengthLabel::Good
        );

        let strong = PasswordStrength::evaluate("Orange17!");
        assert_eq!(strong.score, 6);
        assert_eq!(strong.label, StrengthLabel::Strong);
        assert!(strong.feedback.is_empty());
    }

    #[test]
    fn test_empty_password_scores_zero() {
        let strength = PasswordStrength::evaluate("");
        assert_eq!(strength.score, 0);
        assert_eq!(strength.label, StrengthLabel::Weak);
    }
}
