//! Input handling helpers for passwords and entry bodies.

use std::io::{self, IsTerminal, Read};

use dialoguer::Password;
use origami_core::crypto::validate_password;
use zeroize::Zeroizing;

use crate::errors::CliError;

/// Read a non-empty password from environment variable `var`.
pub fn env_password(var: &str) -> Option<Zeroizing<String>> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(Zeroizing::new)
}

/// Prompt for an existing password, or read it from `env_var`.
pub fn read_password(
    env_var: &str,
    prompt: &str,
    interactive: bool,
) -> anyhow::Result<Zeroizing<String>> {
    if let Some(value) = env_password(env_var) {
        return Ok(value);
    }
    if !interactive {
        return Err(CliError::auth_failed_with_hint(
            "No password provided and no TTY available.",
            format!("Hint: Set {}.", env_var),
        )
        .into());
    }
    prompt_password(prompt)
}

/// Prompt on the terminal without echo.
pub fn prompt_password(prompt: &str) -> anyhow::Result<Zeroizing<String>> {
    Password::new()
        .with_prompt(prompt)
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Choose a new password: `env_var` first, else prompt with confirmation.
///
/// Prompts again until the password meets the policy.
pub fn read_new_password(env_var: &str, interactive: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Some(value) = env_password(env_var) {
        validate_password(&value).map_err(|e| {
            CliError::invalid_input(format!("Password does not meet requirements: {}", e))
        })?;
        return Ok(value);
    }
    if !interactive {
        return Err(CliError::invalid_input(format!(
            "No new password provided and no TTY available. Set {}.",
            env_var
        ))
        .into());
    }
    loop {
        let password = Password::new()
            .with_prompt("New password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()
            .map(Zeroizing::new)
            .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?;
        if let Err(err) = validate_password(&password) {
            eprintln!("Password does not meet requirements: {}", err);
            continue;
        }
        return Ok(password);
    }
}

/// Read entry body from --body flag or stdin.
pub fn read_entry_body(no_input: bool, body: Option<String>) -> anyhow::Result<String> {
    if let Some(value) = body {
        if value.trim().is_empty() {
            return Err(CliError::invalid_input("--body cannot be empty").into());
        }
        return Ok(value);
    }

    if io::stdin().is_terminal() {
        if no_input {
            return Err(CliError::invalid_input("--no-input requires content from stdin").into());
        }
        eprintln!("Write your entry, then press Ctrl-D:");
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
    let trimmed = buffer.trim_end().to_string();
    if trimmed.is_empty() {
        return Err(CliError::invalid_input("No input provided on stdin").into());
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_password_ignores_blank() {
        std::env::set_var("ORIGAMI_TEST_BLANK_PASSWORD", "   ");
        assert!(env_password("ORIGAMI_TEST_BLANK_PASSWORD").is_none());
        std::env::remove_var("ORIGAMI_TEST_BLANK_PASSWORD");
    }

    #[test]
    fn test_env_password_reads_value() {
        std::env::set_var("ORIGAMI_TEST_SET_PASSWORD", "orange17");
        let value = env_password("ORIGAMI_TEST_SET_PASSWORD").expect("password");
        assert_eq!(value.as_str(), "orange17");
        std::env::remove_var("ORIGAMI_TEST_SET_PASSWORD");
    }

    #[test]
    fn test_read_password_without_tty_fails() {
        let err = read_password("ORIGAMI_TEST_UNSET_PASSWORD", "Password", false).unwrap_err();
        assert!(err.to_string().contains("ORIGAMI_TEST_UNSET_PASSWORD"));
    }

    #[test]
    fn test_new_password_from_env_is_validated() {
        std::env::set_var("ORIGAMI_TEST_SHORT_PASSWORD", "short");
        assert!(read_new_password("ORIGAMI_TEST_SHORT_PASSWORD", false).is_err());
        std::env::remove_var("ORIGAMI_TEST_SHORT_PASSWORD");
    }

    #[test]
    fn test_body_flag_wins() {
        let body = read_entry_body(true, Some("hello".to_string())).unwrap();
        assert_eq!(body, "hello");
    }

    #[test]
    fn test_blank_body_flag_rejected() {
        assert!(read_entry_body(true, Some("  ".to_string())).is_err());
    }
}
