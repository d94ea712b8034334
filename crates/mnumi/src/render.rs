use chrono::{DateTime, Utc};
use colored::*;
use mnumistore::commands::{CmdMessage, MessageLevel};
use mnumistore::mapper::Document;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 16;
const COUNT_WIDTH: usize = 12;

pub fn print_messages(messages: &[CmdMessage], to_stderr: bool) {
    for message in messages {
        let line = match message.level {
            MessageLevel::Info => message.content.dimmed(),
            MessageLevel::Success => message.content.green(),
            MessageLevel::Warning => message.content.yellow(),
        };
        if to_stderr {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

pub fn print_headers(headers: &[(&str, String)]) {
    for (name, value) in headers {
        println!("{}: {}", name.bold(), value);
    }
    println!();
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One line per document: id, entry count, age.
pub fn print_table(documents: &[Document], empty_label: &str) {
    if documents.is_empty() {
        println!("{}", empty_label.dimmed());
        return;
    }

    for doc in documents {
        let id = doc.id.as_deref().unwrap_or("-");
        let count = entry_count(doc);
        let age = doc.modified_at.map(format_time_ago).unwrap_or_default();

        let available = LINE_WIDTH.saturating_sub(COUNT_WIDTH + TIME_WIDTH);
        let id_display = truncate_to_width(id, available);
        let padding = available.saturating_sub(id_display.width());

        println!(
            "{}{}{:>cw$}{}",
            id_display,
            " ".repeat(padding),
            count,
            format!("{:>tw$}", age, tw = TIME_WIDTH).dimmed(),
            cw = COUNT_WIDTH,
        );
    }
}

/// Detail view of a single document: fields, then entries.
pub fn print_document(doc: &Document) {
    let fields = [
        ("id", doc.id.as_deref()),
        ("name", doc.name.as_deref()),
        ("type", doc.calendar_type.as_deref()),
        ("domain", doc.domain.as_deref()),
        ("locale", doc.locale.as_deref()),
        ("fallback", doc.fallback.as_deref()),
        ("modified", doc.modified.as_deref()),
        ("link", doc.link.as_deref()),
        ("version", doc.version.as_deref()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("{:>10}  {}", label.dimmed(), value);
        }
    }

    if let Some(events) = &doc.events {
        println!();
        for event in events {
            let marker = if event.cyclic { "↻" } else { " " };
            let kind = if event.event_type.is_empty() {
                String::new()
            } else {
                format!(" ({})", event.event_type)
            };
            println!("  {} {}  {}{}", marker.cyan(), event.date, event.name, kind.dimmed());
        }
    }

    if let Some(rows) = &doc.translations {
        println!();
        for row in rows {
            let original = row.original.as_deref().unwrap_or("-");
            let changed = row.original.as_deref() != Some(row.translation.as_str());
            let translation = if changed {
                row.translation.green()
            } else {
                row.translation.normal()
            };
            println!("  {}  {} → {}", row.id.bold(), original.dimmed(), translation);
        }
    }
}

fn entry_count(doc: &Document) -> String {
    match (&doc.events, &doc.translations) {
        (Some(events), _) => format!("{} events", events.len()),
        (_, Some(rows)) => format!("{} entries", rows.len()),
        _ => String::new(),
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    timeago::Formatter::new().convert(duration.to_std().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_wide_text() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
        assert_eq!(truncate_to_width("żółćżółć", 4), "żół…");
    }

    #[test]
    fn counts_entries() {
        let doc = Document {
            translations: Some(Vec::new()),
            ..Document::default()
        };
        assert_eq!(entry_count(&doc), "0 entries");
        assert_eq!(entry_count(&Document::default()), "");
    }
}
