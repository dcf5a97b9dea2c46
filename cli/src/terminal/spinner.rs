use std::io::Write;
use std::sync::OnceLock;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

static PROGRESS: OnceLock<ProgressBar> = OnceLock::new();

/// Starts the audit progress bar for `total` records. Hidden when stderr is
/// not a terminal.
pub fn start_audit_progress(total: usize) -> &'static ProgressBar {
    PROGRESS.get_or_init(|| {
        let target = if console::Term::stderr().is_term() {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        let pb = ProgressBar::with_draw_target(Some(total as u64), target);

        let style = ProgressStyle::with_template(
            "{spinner:.blue} {msg} {bar:24.blue/bright_black} {pos}/{len} {elapsed:.dim}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .tick_strings(TICK_STRINGS);

        pb.set_style(style);
        pb.set_message("Auditing site records".to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    })
}

pub fn report_audit_progress(done: usize) {
    if let Some(pb) = PROGRESS.get() {
        pb.set_position(done as u64);
        let length = pb.length().unwrap_or_default();
        pb.set_message(format!(
            "Audited {} of {} site records",
            done.to_string().green().bold(),
            length
        ));
    }
}

pub fn finish_audit_progress() {
    if let Some(pb) = PROGRESS.get() {
        pb.finish_and_clear();
    }
}

fn active_progress() -> Option<&'static ProgressBar> {
    PROGRESS.get().filter(|pb| !pb.is_finished() && !pb.is_hidden())
}

/// Log sink that keeps the progress bar intact while events are written.
pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match active_progress() {
            Some(pb) => pb.suspend(|| std::io::stderr().write_all(buf))?,
            None => std::io::stderr().write_all(buf)?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        std::io::stderr().flush()
    }
}
