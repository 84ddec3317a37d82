use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use origami_core::guard::{MOOD_MAX, MOOD_MIN};
use origami_core::VERSION;

/// Origami - a private daily journal with optional password protection
#[derive(Parser)]
#[command(name = "origami")]
#[command(author, version = VERSION, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the journal database (overrides config)
    #[arg(long, global = true, env = "ORIGAMI_DB", value_name = "PATH")]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Never prompt; fail instead of asking for input
    #[arg(long, global = true)]
    pub no_input: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Where to create the journal database
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Config path override
    #[arg(long, value_name = "PATH")]
    pub config_path: Option<String>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `write` command
#[derive(Args)]
pub struct WriteArgs {
    /// Entry date (YYYY-MM-DD or "today")
    #[arg(value_name = "DATE")]
    pub date: String,

    /// Entry body (overrides stdin)
    #[arg(long)]
    pub body: Option<String>,

    /// Mood rating
    #[arg(long, value_parser = clap::value_parser!(u8).range(MOOD_MIN as i64..=MOOD_MAX as i64))]
    pub mood: Option<u8>,
}

/// Arguments for the `read` command
#[derive(Args)]
pub struct ReadArgs {
    /// Entry date (YYYY-MM-DD or "today")
    #[arg(value_name = "DATE")]
    pub date: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `search` command
#[derive(Args)]
pub struct SearchArgs {
    /// Text to look for (case-insensitive)
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Entry date (YYYY-MM-DD or "today")
    #[arg(value_name = "DATE")]
    pub date: String,
}

/// Arguments for the `status` command
#[derive(Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `backup` command
#[derive(Args)]
pub struct BackupArgs {
    /// Destination file (must not exist)
    #[arg(value_name = "DEST")]
    pub destination: String,
}

/// Arguments for the `check` command
#[derive(Args)]
pub struct CheckArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a config file and an empty journal
    Init(InitArgs),

    /// Turn on password protection
    Protect,

    /// Turn off password protection
    Unprotect,

    /// Change the journal password
    Passwd,

    /// Write (or replace) the entry for a day
    Write(WriteArgs),

    /// Show the entry for a day
    Read(ReadArgs),

    /// List entries (dates and metadata only)
    List(ListArgs),

    /// Search entry bodies
    Search(SearchArgs),

    /// Delete the entry for a day
    Delete(DeleteArgs),

    /// Show protection status without prompting
    Status(StatusArgs),

    /// Copy the journal database to a new file
    Backup(BackupArgs),

    /// Verify database and entry integrity
    Check(CheckArgs),

    /// Interactive session (keeps the journal unlocked between commands)
    Shell,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_write_accepts_mood_in_range() {
        let cli = Cli::try_parse_from(["origami", "write", "today", "--mood", "5"]).unwrap();
        match cli.command {
            Some(Commands::Write(args)) => assert_eq!(args.mood, Some(5)),
            _ => panic!("expected write"),
        }
    }

    #[test]
    fn test_write_rejects_mood_out_of_range() {
        assert!(Cli::try_parse_from(["origami", "write", "today", "--mood", "6"]).is_err());
        assert!(Cli::try_parse_from(["origami", "write", "today", "--mood", "0"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["origami", "list", "--db", "/tmp/j.db", "-q"]).unwrap();
        assert_eq!(cli.db.as_deref(), Some("/tmp/j.db"));
        assert!(cli.quiet);
    }
}
