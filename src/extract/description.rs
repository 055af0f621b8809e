//! Description recovery and cleaning
//!
//! Descriptions have no dedicated markup, so two strategies are tried in
//! order: pick the longest block-level text that is long enough and
//! mentions a domain keyword, or fall back to a line scan from a
//! "Описание" heading (or an emoji-prefixed line) until a known trailing
//! marker. The result is truncated and then stripped of site boilerplate.

use super::PageText;
use once_cell::sync::Lazy;
use regex::Regex;

/// Hard cap on stored description length, in characters.
const MAX_CHARS: usize = 5000;

/// Minimum block length for the block-scan strategy.
const MIN_BLOCK_CHARS: usize = 100;

/// Cleaned descriptions shorter than this carry no usable signal.
const MIN_CLEAN_CHARS: usize = 20;

/// Maximum lines collected by the line-scan fallback.
const MAX_SCAN_LINES: usize = 50;

/// A block qualifies only if it mentions the domain at all.
const KEYWORDS: &[&str] = &["квартир", "комнат", "ремонт", "этаж", "район", "дом"];

/// Lines that end the line-scan fallback.
const STOP_MARKERS: &[&str] = &["Пожаловаться", "Полезные статьи"];

/// Site boilerplate stripped from descriptions, applied in order.
static GARBAGE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)поднять в топ[^\n]*",
        r"(?i)продвигать объявление[^\n]*",
        r"(?i)написать автору[^\n]*",
        r"(?i)пожаловаться[^\n]*",
        r"(?i)перевод выполнен автоматически[^\n]*",
        r"(?i)показать оригинал[^\n]*",
        r"(?i)показать на карте",
        r"(?i)полезные статьи[^\n]*",
        r"(?i)сообщить о проблеме[^\n]*",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

/// Extracts the raw (uncleaned) description text from a page, or `None`
/// when neither strategy finds a qualifying candidate.
pub fn extract_description(page: &PageText) -> Option<String> {
    from_blocks(&page.blocks)
        .or_else(|| from_lines(&page.text))
        .map(|d| truncate_chars(&d, MAX_CHARS))
}

/// Strategy 1: the longest block over the length threshold that contains
/// at least one domain keyword.
fn from_blocks(blocks: &[String]) -> Option<String> {
    let mut best: Option<&String> = None;

    for block in blocks {
        if block.chars().count() <= MIN_BLOCK_CHARS {
            continue;
        }
        let lower = block.to_lowercase();
        if !KEYWORDS.iter().any(|k| lower.contains(k)) {
            continue;
        }
        if best.map_or(true, |b| block.chars().count() > b.chars().count()) {
            best = Some(block);
        }
    }

    best.cloned()
}

/// Strategy 2: scan for a short "Описание" heading or a ♥-prefixed line and
/// concatenate the following lines until a stop marker, capped at
/// `MAX_SCAN_LINES`.
fn from_lines(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();

    for (i, line) in lines.iter().enumerate() {
        let line = line.trim();
        let is_heading = line.contains("Описание") && line.chars().count() < 20;
        if !is_heading && !line.starts_with('♥') {
            continue;
        }

        let mut collected = Vec::new();
        for candidate in lines.iter().skip(i).take(MAX_SCAN_LINES) {
            let candidate = candidate.trim();
            if STOP_MARKERS.iter().any(|m| candidate.contains(m)) {
                break;
            }
            if !candidate.is_empty() && !candidate.contains("Цена м2") {
                collected.push(candidate);
            }
        }

        if !collected.is_empty() {
            return Some(collected.join(" "));
        }
    }

    None
}

/// Strips site boilerplate from a raw description.
///
/// Applies the fixed garbage-pattern list in order, collapses whitespace,
/// and treats anything under the minimum length as no description at all.
/// Idempotent: cleaning a cleaned description is a no-op.
pub fn clean_description(raw: &str) -> String {
    let mut text = raw.to_string();
    for pattern in GARBAGE.iter() {
        text = pattern.replace_all(&text, "").into_owned();
    }
    let text = MULTI_SPACE.replace_all(&text, " ").trim().to_string();

    if text.chars().count() < MIN_CLEAN_CHARS {
        String::new()
    } else {
        text
    }
}

/// Truncates to a character count without splitting a code point.
fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
