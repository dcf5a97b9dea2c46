//! Terminal renderer for audit output.
//!
//! Every line goes through the [`PRINT_TARGET`] tracing target so it shares
//! the progress-bar-aware writer with the log output.

use colored::*;
use tracing::info;

use crate::terminal::colors;
use crate::terminal::format::Detail;

pub const TOTAL_WIDTH: usize = 64;
pub const PRINT_TARGET: &str = "siteaudit::print";

pub fn line(msg: impl AsRef<str>) {
    info!(target: PRINT_TARGET, raw_msg = msg.as_ref());
}

pub fn blank() {
    line("");
}

/// Horizontal rules framing the output.
#[derive(Debug, Clone, Copy)]
pub enum Rule<'a> {
    /// Opening rule carrying the tool name and version.
    Title,
    /// Section divider with an upper-cased caption.
    Section(&'a str),
    /// Plain heavy rule closing a section or the run.
    Closing,
}

pub fn rule(kind: Rule<'_>, quiet: u8) {
    if quiet > 0 {
        return;
    }
    let rendered = match kind {
        Rule::Title => framed(
            &format!("⟦ SITEAUDIT v{} ⟧", env!("CARGO_PKG_VERSION")),
            '═',
            |caption| caption.bright_green().bold(),
        ),
        Rule::Section(caption) => framed(&format!("⟦ {} ⟧", caption.to_uppercase()), '─', |c| {
            c.bright_green()
        }),
        Rule::Closing => "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR).to_string(),
    };
    line(rendered);
}

fn framed(caption: &str, fill: char, style: fn(&str) -> ColoredString) -> String {
    let free = TOTAL_WIDTH.saturating_sub(console::measure_text_width(caption));
    let left = free / 2;
    let pad = |n: usize| fill.to_string().repeat(n).color(colors::SEPARATOR);
    format!("{}{}{}", pad(left), style(caption), pad(free - left))
}

/// Key/value lines sharing one dotted key column.
pub struct StatusTable {
    key_width: usize,
}

impl StatusTable {
    pub fn for_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let key_width = keys.into_iter().map(str::len).max().unwrap_or(0);
        Self { key_width }
    }

    pub fn row(&self, key: &str, value: impl std::fmt::Display) {
        line(format!(
            "{} {}{} {}",
            ">".color(colors::SEPARATOR),
            key.color(colors::PRIMARY),
            leader(self.key_width, key),
            value
        ));
    }
}

/// One audited record: an indexed head line and its status rows as branches.
pub fn record_tree(idx: usize, name: &str, details: &[Detail]) {
    line(format!(
        "{}{}{} {}",
        "[".color(colors::SEPARATOR),
        idx.to_string().color(colors::ACCENT),
        "]".color(colors::SEPARATOR),
        name.color(colors::PRIMARY)
    ));

    let key_width = details.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (i, (key, status)) in details.iter().enumerate() {
        let branch = if i + 1 == details.len() { "└─" } else { "├─" };
        line(format!(
            " {} {}{} {}",
            branch.color(colors::SEPARATOR),
            key.color(colors::TEXT_DEFAULT),
            leader(key_width, key),
            status
        ));
    }
}

fn leader(width: usize, key: &str) -> String {
    format!("{}:", ".".repeat(width + 1 - key.len().min(width)))
        .color(colors::SEPARATOR)
        .to_string()
}

pub fn centered(msg: &str) {
    let pad = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    line(format!("{pad}{msg}"));
}

pub fn no_records() {
    line("The inventory contains no site records.".red().bold().to_string());
}
