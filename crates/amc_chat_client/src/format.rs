//! Turns an [`Answer`] into display lines, and classifies display text back into
//! typed lines for rendering.
//!
//! The textual form (`format_answer`) is what a news message stores; the view
//! runs each stored line through [`classify_line`]. `format_lines` is that same
//! classification applied to a freshly formatted answer.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::chat::Message;
use crate::locale::Language;
use crate::messages::{Answer, Article};

/// Prefix of a section header line.
pub const HEADER_MARKER: &str = "📰 ";
/// Prefix of an article link line.
pub const LINK_MARKER: &str = "🔹 ";
const LINK_LINE_PREFIX: &str = "🔹 [";
/// Prefix of a list item line.
pub const BULLET_MARKER: &str = "•";

const UNTITLED: &str = "Untitled";
const PLACEHOLDER_URL: &str = "#";

/// One rendered line of a bot message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Bold section header, marker included.
    Header(String),
    /// Article anchor.
    Link { title: String, url: String },
    /// Indented list item, marker included.
    ListItem(String),
    /// Small muted text (dates, categories), trimmed.
    Metadata(String),
    /// Anything else, including blank spacer lines.
    Plain(String),
}

impl Line {
    /// Text form of the line as it appears in a formatted answer.
    pub fn to_text(&self) -> String {
        match self {
            Line::Header(s) | Line::ListItem(s) | Line::Metadata(s) | Line::Plain(s) => s.clone(),
            Line::Link { title, url } => format!("{}[{}]({})", LINK_MARKER, title, url),
        }
    }
}

/// Format an answer as multi-line text.
///
/// Institutional answers are returned verbatim.
pub fn format_answer(answer: &Answer, language: Language) -> String {
    if answer.is_institutional {
        return answer.message.clone().unwrap_or_default();
    }
    news_lines(answer, language)
        .iter()
        .map(Line::to_text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format an answer as typed lines, exactly as a stored news message renders.
pub fn format_lines(answer: &Answer, language: Language) -> Vec<Line> {
    classify_text(&format_answer(answer, language))
}

fn news_lines(answer: &Answer, language: Language) -> Vec<Line> {
    if answer.context.is_empty() {
        return vec![Line::Plain(language.no_results().to_string())];
    }

    let (amharic, english): (Vec<&Article>, Vec<&Article>) = answer
        .context
        .iter()
        .partition(|a| a.language == Language::Am);

    let mut lines = Vec::new();
    push_section(&mut lines, language.amharic_news_header(), &amharic);
    push_section(&mut lines, language.english_news_header(), &english);
    lines.push(Line::Plain(language.results_summary(answer.total_results)));
    lines
}

fn push_section(lines: &mut Vec<Line>, header: &str, articles: &[&Article]) {
    if articles.is_empty() {
        return;
    }
    lines.push(Line::Header(format!("{}{}", HEADER_MARKER, header)));
    for article in articles {
        lines.push(Line::Link {
            title: article.title.as_deref().unwrap_or(UNTITLED).to_string(),
            url: article.url.as_deref().unwrap_or(PLACEHOLDER_URL).to_string(),
        });
        let date = article.date.as_deref().map(display_date).unwrap_or_default();
        let category = article
            .category
            .as_deref()
            .map(|c| format!("[{}]", c))
            .unwrap_or_default();
        let meta = format!("{} {}", date, category).trim().to_string();
        if !meta.is_empty() {
            lines.push(Line::Metadata(meta));
        }
        lines.push(Line::Plain(String::new()));
    }
}

/// Render a timestamp as `M/D/YYYY`. Values that are not a recognised
/// timestamp are shown as they are.
pub fn display_date(raw: &str) -> String {
    let raw = raw.trim();
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|d| d.date_naive())
        .or_else(|_| DateTime::parse_from_rfc2822(raw).map(|d| d.date_naive()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|d| d.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").map(|d| d.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));
    match date {
        Ok(d) => d.format("%-m/%-d/%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Classify one line of a formatted answer by its structural prefix.
///
/// A line that looks like a link but lacks a `[title](url)` pair becomes plain text.
pub fn classify_line(line: &str) -> Line {
    if line.starts_with(LINK_LINE_PREFIX) && line.contains("](") {
        return parse_link(line).unwrap_or_else(|| Line::Plain(line.to_string()));
    }
    if line.starts_with(HEADER_MARKER.trim_end()) {
        Line::Header(line.to_string())
    } else if line.starts_with(BULLET_MARKER) {
        Line::ListItem(line.to_string())
    } else if line.trim().starts_with('[') || line.contains('/') {
        Line::Metadata(line.trim().to_string())
    } else {
        Line::Plain(line.to_string())
    }
}

/// Classify every line of a multi-line text.
pub fn classify_text(text: &str) -> Vec<Line> {
    text.split('\n').map(classify_line).collect()
}

fn parse_link(line: &str) -> Option<Line> {
    let rest = line.strip_prefix(LINK_LINE_PREFIX)?;
    let (title, tail) = rest.split_once("](")?;
    let end = tail.rfind(')')?;
    Some(Line::Link {
        title: title.to_string(),
        url: tail[..end].to_string(),
    })
}

/// Lines to display for a transcript entry. Only news messages are structured.
pub fn render_message(message: &Message) -> Vec<Line> {
    if message.is_news {
        classify_text(&message.text)
    } else {
        vec![Line::Plain(message.text.clone())]
    }
}
