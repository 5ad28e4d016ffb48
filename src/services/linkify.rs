// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

//! Turns bug and radar references into HTML anchors for `<pre>` bodies, and back.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

pub const RADAR_WEB_PREFIX: &str = "https://rdar.apple.com/";

static REFERENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:https?|rdar)://[^\s<>()\[\]{}"'`]+"#).unwrap());

static RADAR_PROBLEM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^rdar://problem/(\d+)$").unwrap());

static ANCHOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<a href="[^"]*">([^<]*)</a>"#).unwrap());

static ENTITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(amp|lt|gt|quot|#39|#x27);").unwrap());

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

/// Escapes the characters that would otherwise be read as markup inside `<pre>`.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

pub fn unescape_html(text: &str) -> Cow<'_, str> {
    ENTITY_REGEX.replace_all(text, |caps: &Captures<'_>| match &caps[1] {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        _ => "'",
    })
}

/// Web URL a recognized reference points at.
pub fn resolve_href(reference: &str) -> String {
    if let Some(caps) = RADAR_PROBLEM_REGEX.captures(reference) {
        return format!("{RADAR_WEB_PREFIX}{}", &caps[1]);
    }
    match reference.strip_prefix("rdar://") {
        Some(rest) => format!("{RADAR_WEB_PREFIX}{rest}"),
        None => reference.to_string(),
    }
}

/// Escapes one line and wraps every recognized reference in an anchor.
///
/// Brackets and trailing sentence punctuation around a reference stay
/// outside the anchor, so `(rdar://1234)` keeps its parentheses.
pub fn linkify_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len() * 2);
    let mut last = 0;

    for found in REFERENCE_REGEX.find_iter(line) {
        let reference = found.as_str().trim_end_matches(TRAILING_PUNCTUATION);
        let target = reference.split_once("://").map_or("", |(_, rest)| rest);
        if target.is_empty() {
            continue;
        }

        out.push_str(&escape_html(&line[last..found.start()]));
        out.push_str("<a href=\"");
        out.push_str(&escape_html(&resolve_href(reference)));
        out.push_str("\">");
        out.push_str(&escape_html(reference));
        out.push_str("</a>");
        last = found.start() + reference.len();
    }

    out.push_str(&escape_html(&line[last..]));
    out
}

/// Inverse of [`linkify_line`]: anchors collapse to their visible text.
pub fn unlinkify_line(line: &str) -> String {
    let stripped = ANCHOR_REGEX.replace_all(line, "$1");
    unescape_html(&stripped).into_owned()
}

pub fn linkify(text: &str) -> String {
    text.split('\n')
        .map(linkify_line)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn unlinkify(text: &str) -> String {
    text.split('\n')
        .map(unlinkify_line)
        .collect::<Vec<_>>()
        .join("\n")
}
