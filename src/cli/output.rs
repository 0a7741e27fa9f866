//! CLI output formatting utilities.

use crate::rag::{AnswerSource, RagResponse};
use crate::session::{ChatEntry, Role};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

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

    /// Print one chat history entry with its role label.
    pub fn chat_entry(entry: &ChatEntry) {
        let label = format!("{} {}:", entry.role.marker(), entry.role.label());
        let label = match entry.role {
            Role::User => style(label).green().bold(),
            Role::Assistant => style(label).cyan().bold(),
        };
        println!("{} {}", label, entry.text);
    }

    /// Print an answer, noting when it did not come from the video.
    pub fn answer(response: &RagResponse) {
        println!("\n{}\n", response.answer);
        if response.source != AnswerSource::Transcript {
            println!("{}", style(format!("(answered from {})", response.source)).dim());
        }
    }

    /// Print retrieved segments with their scores.
    pub fn sources(response: &RagResponse) {
        for source in &response.sources {
            println!(
                "\n{} segment {} (score: {:.2})",
                style(">>").green(),
                style(source.order + 1).cyan(),
                source.score
            );
            println!("   {}", content_preview(&source.content, 200));
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Truncate content with ellipsis.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let cut: String = content.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
