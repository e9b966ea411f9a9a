use anyhow::Result;
use clap::ValueEnum;
use gmhistory::Message;
use serde::Serialize;

/// Output mode for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputMode {
    /// No output
    None,
    /// Human-readable text (default)
    #[default]
    Text,
    /// JSON output
    Json,
}

impl OutputMode {
    pub fn is_json(&self) -> bool {
        matches!(self, OutputMode::Json)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, OutputMode::None)
    }
}

/// Write JSON to stdout.
pub fn write_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Truncate a string to the given max *character* length with ellipsis.
/// Handles multi-byte UTF-8 characters (emojis, etc.) safely.
pub fn truncate(s: &str, max: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max {
        s.to_string()
    } else if max > 1 {
        let end_idx = s
            .char_indices()
            .nth(max - 1)
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        format!("{}…", &s[..end_idx])
    } else if max == 1 {
        "…".to_string()
    } else {
        String::new()
    }
}

/// One-line summary of a message body. Attachment-only messages get a
/// placeholder so rows never look blank.
pub fn message_line(m: &Message, max: usize) -> String {
    let text = m.text.replace('\n', " ");
    let text = if text.is_empty() {
        match m.attachments.len() {
            0 => "[No Text/Media]".to_string(),
            n => format!("[{} attachment(s)]", n),
        }
    } else {
        text
    };
    truncate(&text, max)
}

/// Print messages as a table, or as JSON.
pub fn print_messages(mode: OutputMode, messages: &[Message]) -> Result<()> {
    if mode.is_none() {
        return Ok(());
    }
    if mode.is_json() {
        return write_json(&serde_json::json!({ "messages": messages }));
    }
    println!("{:<20} {:<20} {:<18} {}", "TIME", "ID", "FROM", "TEXT");
    for m in messages {
        println!(
            "{:<20} {:<20} {:<18} {}",
            m.created_at.format("%Y-%m-%d %H:%M:%S"),
            m.id,
            truncate(&m.name, 16),
            message_line(m, 80),
        );
    }
    Ok(())
}
