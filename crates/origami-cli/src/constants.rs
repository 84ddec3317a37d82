//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Resource not found (config, journal, entry).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong password, locked out).
    pub const AUTH_FAILED: i32 = 5;

    /// Integrity check failed or an entry did not authenticate.
    pub const INTEGRITY_FAILED: i32 = 6;

    /// Entry bodies requested while the journal is locked.
    pub const ACCESS_DENIED: i32 = 7;
}

/// Environment variables read by the CLI.
pub mod env_vars {
    pub const PASSWORD: &str = "ORIGAMI_PASSWORD";
    pub const NEW_PASSWORD: &str = "ORIGAMI_NEW_PASSWORD";
    pub const CONFIG: &str = "ORIGAMI_CONFIG";
    pub const LOG: &str = "ORIGAMI_LOG";
}

/// Interactive unlock prompts before giving up.
pub const MAX_PROMPT_ATTEMPTS: u32 = 3;
