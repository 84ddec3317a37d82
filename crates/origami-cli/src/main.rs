//! Origami CLI - a private daily journal with optional password protection
//!
//! This is the command-line interface for Origami. It wraps the journal
//! guard from `origami-core` with prompts, config handling and output
//! formatting.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod ui;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use origami_core::VERSION;

use app::AppContext;
use cli::{Cli, Commands};
use constants::env_vars;
use errors::{exit_code_for, promote, split_hint};
use ui::{hint, print, print_error};

fn main() {
    init_logging();
    let cli = Cli::parse();
    let ctx = AppContext::new(&cli);

    if let Err(err) = run(&ctx) {
        let err = promote(err);
        let ui = ctx.ui_context(false);
        let rendered = format!("{:#}", err);
        let (message, error_hint) = split_hint(&rendered);
        print_error(&ui, message, error_hint);
        std::process::exit(exit_code_for(&err));
    }
}

/// Log to stderr. `ORIGAMI_LOG` takes an env-filter directive; default is
/// warnings only.
fn init_logging() {
    let filter =
        EnvFilter::try_from_env(env_vars::LOG).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(ctx: &AppContext) -> anyhow::Result<()> {
    match &ctx.cli().command {
        Some(Commands::Init(args)) => commands::init::handle_init(ctx, args),
        Some(Commands::Protect) => commands::protection::handle_protect(ctx),
        Some(Commands::Unprotect) => commands::protection::handle_unprotect(ctx),
        Some(Commands::Passwd) => commands::protection::handle_passwd(ctx),
        Some(Commands::Write(args)) => commands::entries::handle_write(ctx, args),
        Some(Commands::Read(args)) => commands::entries::handle_read(ctx, args),
        Some(Commands::List(args)) => commands::entries::handle_list(ctx, args),
        Some(Commands::Search(args)) => commands::entries::handle_search(ctx, args),
        Some(Commands::Delete(args)) => commands::entries::handle_delete(ctx, args),
        Some(Commands::Status(args)) => commands::maintenance::handle_status(ctx, args),
        Some(Commands::Backup(args)) => commands::maintenance::handle_backup(ctx, args),
        Some(Commands::Check(args)) => commands::maintenance::handle_check(ctx, args),
        Some(Commands::Shell) => commands::shell::handle_shell(ctx),
        Some(Commands::Completions(args)) => commands::misc::handle_completions(args),
        None => {
            let ui = ctx.ui_context(false);
            println!("Origami v{}", VERSION);
            print(&ui, &hint(&ui, "origami init"));
            print(&ui, &hint(&ui, "origami --help"));
            Ok(())
        }
    }
}
