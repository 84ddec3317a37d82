//! Progress indicators: an indicatif spinner and a step list.

use std::time::Duration;

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};

use super::context::UiContext;
use super::render::badge;
use super::theme::Badge;

/// A spinner for indeterminate progress.
///
/// Draws on stderr, and only when the context allows animation; otherwise
/// every method except `finish_err` is a no-op.
pub struct Spinner<'a> {
    ctx: &'a UiContext,
    bar: Option<IndicatifBar>,
}

impl<'a> Spinner<'a> {
    /// Create a new spinner with the given message.
    pub fn new(ctx: &'a UiContext, message: &str) -> Self {
        let bar = if ctx.allows_animation() {
            let template = if ctx.unicode {
                "{spinner:.cyan} {msg}..."
            } else {
                "{spinner} {msg}..."
            };
            let tick_strings: &[&str] = if ctx.unicode {
                &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", ""]
            } else {
                &["|", "/", "-", "\\", ""]
            };
            // a bad template only costs the animation
            ProgressStyle::default_spinner()
                .template(template)
                .ok()
                .map(|style| {
                    let pb = IndicatifBar::new_spinner();
                    pb.set_style(style.tick_strings(tick_strings));
                    pb.set_message(message.to_string());
                    pb
                })
        } else {
            None
        };

        Self { ctx, bar }
    }

    /// Begin animating.
    pub fn start(&self) {
        if let Some(bar) = &self.bar {
            bar.enable_steady_tick(Duration::from_millis(80));
        }
    }

    /// Remove the spinner line without printing anything.
    pub fn clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    /// Finish spinner with error message.
    pub fn finish_err(&self, message: &str) {
        self.clear();
        eprintln!("{}", badge(self.ctx, Badge::Err, message));
    }
}

/// A step list that reports each stage of a multi-part check.
pub struct StepList<'a> {
    ctx: &'a UiContext,
    steps: Vec<(String, Option<Badge>)>,
    current: usize,
}

impl<'a> StepList<'a> {
    /// Create a new step list with the given step names.
    pub fn new(ctx: &'a UiContext, steps: &[&str]) -> Self {
        Self {
            ctx,
            steps: steps.iter().map(|s| (s.to_string(), None)).collect(),
            current: 0,
        }
    }

    /// Print the "Checking..." header in pretty mode.
    pub fn start(&self, header: &str) {
        if self.ctx.mode.is_pretty() {
            println!("{}...", header);
        }
    }

    /// Mark current step with the given badge and advance.
    pub fn complete(&mut self, result: Badge) {
        if self.current < self.steps.len() {
            self.steps[self.current].1 = Some(result);
            self.render_step(self.current);
            self.current += 1;
        }
    }

    pub fn ok(&mut self) {
        self.complete(Badge::Ok);
    }

    pub fn err(&mut self) {
        self.complete(Badge::Err);
    }

    /// Mark current step as not run.
    pub fn skip(&mut self) {
        self.complete(Badge::Info);
    }

    fn render_step(&self, index: usize) {
        if self.ctx.mode.is_json() {
            return;
        }
        let (name, result) = &self.steps[index];

        if self.ctx.mode.is_pretty() {
            let status = match result {
                Some(b) => badge(self.ctx, *b, ""),
                None => "...".to_string(),
            };
            println!("- {}: {}", name, status);
        } else {
            let status_str = match result {
                Some(Badge::Ok) => "ok",
                Some(Badge::Warn) => "warn",
                Some(Badge::Err) => "err",
                Some(Badge::Info) => "skipped",
                None => "pending",
            };
            println!(
                "check={} {}",
                name.to_lowercase().replace(' ', "_"),
                status_str
            );
        }
    }

    /// Check if any step had an error.
    pub fn has_error(&self) -> bool {
        self.steps
            .iter()
            .any(|(_, result)| *result == Some(Badge::Err))
    }
}
