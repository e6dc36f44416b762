//! Text normalization for model output and editor content
//!
//! Model instructions ask for plain paragraphs; these helpers enforce it on
//! whatever actually comes back.

use std::sync::OnceLock;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder};

/// Generic sales openers a subject line should avoid
const STOCK_PHRASES: &[&str] = &[
    "quick question",
    "meeting request",
    "following up",
    "touching base",
    "checking in",
    "just circling back",
    "partnership opportunity",
    "limited time offer",
];

static STOCK_MATCHER: OnceLock<Option<AhoCorasick>> = OnceLock::new();

fn stock_matcher() -> Option<&'static AhoCorasick> {
    STOCK_MATCHER
        .get_or_init(|| {
            AhoCorasickBuilder::new()
                .ascii_case_insensitive(true)
                .build(STOCK_PHRASES)
                .ok()
        })
        .as_ref()
}

/// Stock phrases found in `text`, in order of appearance, without duplicates
pub fn stock_phrases(text: &str) -> Vec<&'static str> {
    let Some(ac) = stock_matcher() else {
        return Vec::new();
    };

    let mut found = Vec::new();
    for m in ac.find_iter(text) {
        let phrase = STOCK_PHRASES[m.pattern().as_usize()];
        if !found.contains(&phrase) {
            found.push(phrase);
        }
    }
    found
}

/// Remove a leading bullet or enumeration marker from one line
pub fn strip_list_marker(line: &str) -> &str {
    let trimmed = line.trim_start();

    for bullet in ["- ", "* ", "• ", "– ", "— ", "+ "] {
        if let Some(rest) = trimmed.strip_prefix(bullet) {
            return rest.trim_start();
        }
    }

    // "1. ", "2) ", "10. "
    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &trimmed[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return rest.trim_start();
        }
    }

    trimmed
}

/// True if any line starts with a bullet or enumeration marker
pub fn has_list_markup(text: &str) -> bool {
    text.lines()
        .any(|line| !line.trim().is_empty() && strip_list_marker(line) != line.trim_start())
}

/// Collapse text into one paragraph with list markers removed
pub fn single_paragraph(text: &str) -> String {
    text.lines()
        .map(strip_list_marker)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strip list markers line by line, keeping paragraph breaks.
///
/// Runs of blank lines collapse to a single blank line.
pub fn plain_paragraphs(text: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = strip_list_marker(line).trim();
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }

    paragraphs.join("\n\n")
}

/// Number of paragraphs (blank-line separated blocks)
pub fn paragraph_count(text: &str) -> usize {
    text.split("\n\n").filter(|p| !p.trim().is_empty()).count()
}

const ZWJ: char = '\u{200D}';

fn is_pictographic(c: char) -> bool {
    matches!(
        c as u32,
        0x1F000..=0x1FAFF | 0x2600..=0x27BF | 0x2300..=0x23FF | 0x2B00..=0x2BFF
    )
}

fn is_regional_indicator(c: char) -> bool {
    matches!(c as u32, 0x1F1E6..=0x1F1FF)
}

/// Joiners, variation selectors, skin tones, tag characters and the keycap mark
fn extends_emoji(c: char) -> bool {
    c == ZWJ
        || matches!(
            c as u32,
            0xFE00..=0xFE0F | 0x1F3FB..=0x1F3FF | 0xE0020..=0xE007F | 0x20E3
        )
}

/// Keep only the first emoji of a run at the start of a subject.
///
/// ZWJ sequences, modified emoji and flag pairs count as one emoji.
pub fn limit_leading_emoji(subject: &str) -> String {
    let mut emoji = 0;
    let mut first_end = 0;
    let mut rest_start = subject.len();
    let mut after_zwj = false;
    let mut open_flag = false;

    for (i, c) in subject.char_indices() {
        if is_pictographic(c) || extends_emoji(c) {
            let continues = extends_emoji(c) || after_zwj || (open_flag && is_regional_indicator(c));
            if continues {
                open_flag = false;
            } else {
                emoji += 1;
                open_flag = is_regional_indicator(c);
            }
        } else if c.is_whitespace() && emoji > 0 {
            open_flag = false;
        } else {
            rest_start = i;
            break;
        }
        after_zwj = c == ZWJ;
        if emoji == 1 && !c.is_whitespace() {
            first_end = i + c.len_utf8();
        }
    }

    if emoji <= 1 {
        return subject.to_string();
    }

    let lead = &subject[..rest_start];
    let rest = &subject[rest_start..];
    let sep = if !rest.is_empty() && lead.ends_with(char::is_whitespace) {
        " "
    } else {
        ""
    };
    format!("{}{}{}", &subject[..first_end], sep, rest)
}

/// Trim a subject line, keep at most one leading emoji and capitalize the
/// first letter after it
pub fn normalize_subject(subject: &str) -> String {
    let subject = limit_leading_emoji(&single_paragraph(subject));
    let mut out = String::with_capacity(subject.len());
    let mut capitalized = false;

    for c in subject.chars() {
        if !capitalized && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            capitalized = true;
        } else {
            if !capitalized && c.is_alphanumeric() {
                capitalized = true;
            }
            out.push(c);
        }
    }
    out
}

/// Convert editor content to plain text.
///
/// Plain text passes through untouched; anything that looks like HTML is
/// rendered to text first.
pub fn to_plain_text(body: &str) -> String {
    if !looks_like_html(body) {
        return body.trim().to_string();
    }
    match html2text::config::plain().string_from_read(body.as_bytes(), 10_000) {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            tracing::debug!("HTML conversion failed, using raw body: {}", e);
            body.trim().to_string()
        }
    }
}

fn looks_like_html(text: &str) -> bool {
    let Some(open) = text.find('<') else {
        return false;
    };
    text[open..]
        .chars()
        .nth(1)
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '/')
        && text[open..].contains('>')
}

/// Remove a Markdown code fence that some models wrap JSON in
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
