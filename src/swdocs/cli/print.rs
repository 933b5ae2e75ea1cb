use chrono::{DateTime, Utc};
use colored::Colorize;
use swdocs::commands::{CmdMessage, MessageLevel};
use swdocs::config::{SwdocsConfig, KEYS};
use swdocs::model::{Document, DocumentSummary};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const NAME_WIDTH: usize = 28;
const TIME_WIDTH: usize = 16;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_document(doc: &Document) {
    println!("{}", doc.name.bold());
    if !doc.description.is_empty() {
        println!("{}", doc.description);
    }
    let author = doc
        .user
        .as_deref()
        .map(|u| format!(" by {}", u))
        .unwrap_or_default();
    println!(
        "{}",
        format!(
            "created {}, updated {}{}",
            doc.created.to_display(),
            doc.updated.to_display(),
            author
        )
        .dimmed()
    );

    for section in doc.sections.iter() {
        println!();
        println!("{}", section.header.yellow());
        if let Some(description) = &section.description {
            println!("  {}", description);
        }
        for link in &section.links {
            if link.description.is_empty() {
                println!("  - {}", link.url);
            } else {
                println!("  - {} {}", link.description, link.url.dimmed());
            }
        }
    }
}

pub(super) fn print_summaries(summaries: &[DocumentSummary]) {
    for line in summary_lines(summaries) {
        println!("{}", line);
    }
}

fn summary_lines(summaries: &[DocumentSummary]) -> Vec<String> {
    summaries
        .iter()
        .map(|summary| {
            let name = pad_to_width(&truncate_to_width(&summary.name, NAME_WIDTH), NAME_WIDTH);
            let detail = summary
                .description
                .clone()
                .or_else(|| summary.user.clone())
                .unwrap_or_default()
                .replace('\n', " ");
            let available = LINE_WIDTH.saturating_sub(NAME_WIDTH + TIME_WIDTH + 2);
            let detail = pad_to_width(&truncate_to_width(&detail, available), available);
            let time_ago = format_time_ago(summary.updated.as_datetime());
            format!("{} {} {}", name.bold(), detail, time_ago.dimmed())
        })
        .collect()
}

pub(super) fn print_config(config: &SwdocsConfig) {
    for key in KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

fn pad_to_width(s: &str, width: usize) -> String {
    format!("{}{}", s, " ".repeat(width.saturating_sub(s.width())))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
