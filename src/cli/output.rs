//! CLI output formatting utilities.

use crate::normalize::{DisplayRecord, HIGHLIGHT_CLOSE, HIGHLIGHT_OPEN};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use std::sync::LazyLock;

static HIGHLIGHT_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        "{}(.*?){}",
        regex::escape(HIGHLIGHT_OPEN),
        regex::escape(HIGHLIGHT_CLOSE)
    );
    Regex::new(&pattern).expect("valid regex")
});

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print one search result.
    pub fn search_result(record: &DisplayRecord) {
        println!(
            "\n{} {} @ {}",
            style(">>").green(),
            style(&record.video_title).bold(),
            style(record.timestamp()).cyan(),
        );
        println!("   {}", render_highlights(&record.clip_text));
        println!("   {}", style(&record.video_url).dim());
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Turn highlight spans into terminal styling and undo HTML escaping.
pub(crate) fn render_highlights(clip_text: &str) -> String {
    let styled = HIGHLIGHT_SPAN.replace_all(clip_text, |caps: &regex::Captures| {
        style(&caps[1]).yellow().bold().to_string()
    });

    unescape_html(&styled)
}

fn unescape_html(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
