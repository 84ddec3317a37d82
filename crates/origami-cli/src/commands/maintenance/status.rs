use serde::Serialize;

use origami_core::crypto::KdfParams;
use origami_core::JournalStore;

use crate::app::AppContext;
use crate::cli::StatusArgs;
use crate::ui::{
    blank_line, format_bytes, format_duration, header, kv, print, print_json, OutputMode,
};

#[derive(Debug, Serialize)]
struct StatusReport {
    journal: String,
    protected: bool,
    state: &'static str,
    entries: usize,
    schema_version: i64,
    size_bytes: u64,
    kdf: Option<KdfParams>,
    idle_timeout_seconds: Option<u64>,
    max_failed_attempts: u32,
}

/// Report protection state. Never prompts and never unlocks.
pub fn handle_status(ctx: &AppContext, args: &StatusArgs) -> anyhow::Result<()> {
    let path = ctx.journal_path()?;
    let mut guard = ctx.open_guard()?;

    let record = guard.store().get_password_record()?;
    let config = guard.config().clone();
    let report = StatusReport {
        journal: path.display().to_string(),
        protected: record.is_some(),
        state: guard.state().as_str(),
        entries: guard.list_entries()?.len(),
        schema_version: guard.store().schema_version()?,
        size_bytes: std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0),
        kdf: record.map(|r| r.kdf),
        idle_timeout_seconds: config.idle_timeout.map(|d| d.as_secs()),
        max_failed_attempts: config.max_failed_attempts,
    };

    let ui = ctx.ui_context(args.json);
    match ui.mode {
        OutputMode::Json => print_json(&report)?,
        OutputMode::Pretty => {
            print(&ui, &header(&ui, "status", None));
            blank_line(&ui);
            print(&ui, &kv(&ui, "Journal", &report.journal));
            print(
                &ui,
                &kv(&ui, "Protection", if report.protected { "on" } else { "off" }),
            );
            print(&ui, &kv(&ui, "State", report.state));
            print(&ui, &kv(&ui, "Entries", &report.entries.to_string()));
            print(&ui, &kv(&ui, "Size", &format_bytes(report.size_bytes)));
            if let Some(kdf) = &report.kdf {
                print(
                    &ui,
                    &kv(
                        &ui,
                        "KDF",
                        &format!(
                            "Argon2id, {} MiB, {} iterations, {} lane{}",
                            kdf.memory_kib / 1024,
                            kdf.iterations,
                            kdf.parallelism,
                            if kdf.parallelism == 1 { "" } else { "s" }
                        ),
                    ),
                );
            }
            let idle = config
                .idle_timeout
                .map(format_duration)
                .unwrap_or_else(|| "off".to_string());
            print(&ui, &kv(&ui, "Idle timeout", &idle));
        }
        OutputMode::Plain => {
            println!("journal={}", report.journal);
            println!("protected={}", report.protected);
            println!("state={}", report.state);
            println!("entries={}", report.entries);
            println!("schema_version={}", report.schema_version);
            println!("size_bytes={}", report.size_bytes);
            if let Some(kdf) = &report.kdf {
                println!("kdf_memory_kib={}", kdf.memory_kib);
                println!("kdf_iterations={}", kdf.iterations);
                println!("kdf_parallelism={}", kdf.parallelism);
            }
        }
    }
    Ok(())
}
