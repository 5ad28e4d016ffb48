// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{DiffLine, DiffLineKind};

static HUNK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@@\s*-(\d+)(?:,(\d+))?\s+\+(\d+)(?:,(\d+))?\s*@@").unwrap());

static GIT_HEADER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^diff --git (?:a/)?\S+ (?:b/)?(\S+)").unwrap());

/// Classifies every line of a unified diff.
///
/// Handles both `diff --git` output and bare `---`/`+++` patches. Inside a
/// hunk, `---`/`+++` pairs are removed and added lines until the hunk's
/// declared line counts are used up; after that (or after a hunk declaring
/// no lines at all) the pair starts a new file.
pub fn parse_unified_diff(text: &str) -> Vec<DiffLine> {
    let raw: Vec<&str> = text.lines().collect();
    let mut out: Vec<DiffLine> = Vec::with_capacity(raw.len());

    let mut file_start = 0;
    let mut file_path: Option<String> = None;
    let mut in_header = false;
    let mut seen_old_header = false;
    let mut next_line: u32 = 0;
    let mut old_left: u32 = 0;
    let mut new_left: u32 = 0;

    for (i, line) in raw.iter().enumerate() {
        let followed_by_new = raw.get(i + 1).is_some_and(|n| n.starts_with("+++ "));
        let hunk_open = !in_header && (old_left > 0 || new_left > 0);
        let starts_file = line.starts_with("diff --git ")
            || (line.starts_with("--- ")
                && followed_by_new
                && !hunk_open
                && !(in_header && !seen_old_header));

        if starts_file {
            assign_path(&mut out[file_start..], file_path.take());
            file_start = out.len();
            in_header = true;
            seen_old_header = false;
            file_path = GIT_HEADER_REGEX
                .captures(line)
                .map(|caps| caps[1].to_string());
        }

        if in_header && !line.starts_with("@@") {
            if let Some(old) = line.strip_prefix("--- ") {
                seen_old_header = true;
                if file_path.is_none() {
                    file_path = header_path(old, "a/");
                }
            } else if let Some(new) = line.strip_prefix("+++ ")
                && let Some(path) = header_path(new, "b/")
            {
                file_path = Some(path);
            }
            out.push(make_line(DiffLineKind::FileHeader, line, None));
            continue;
        }

        if let Some(caps) = HUNK_REGEX.captures(line) {
            in_header = false;
            next_line = caps[3].parse().unwrap_or(0);
            old_left = hunk_count(caps.get(2).map(|m| m.as_str()));
            new_left = hunk_count(caps.get(4).map(|m| m.as_str()));
            out.push(make_line(DiffLineKind::HunkHeader, line, None));
            continue;
        }

        let (kind, numbered) = match line.as_bytes().first() {
            Some(b'+') => {
                new_left = new_left.saturating_sub(1);
                (DiffLineKind::Addition, true)
            }
            Some(b'-') => {
                old_left = old_left.saturating_sub(1);
                (DiffLineKind::Removal, false)
            }
            Some(b' ') | None => {
                old_left = old_left.saturating_sub(1);
                new_left = new_left.saturating_sub(1);
                (DiffLineKind::Context, true)
            }
            // "\ No newline at end of file" and stray text
            _ => (DiffLineKind::Context, false),
        };
        let number = if numbered && next_line > 0 {
            let n = next_line;
            next_line = next_line.saturating_add(1);
            Some(n)
        } else {
            None
        };
        out.push(make_line(kind, line, number));
    }

    assign_path(&mut out[file_start..], file_path);
    out
}

/// Line count of a hunk range; an omitted count means one line.
fn hunk_count(count: Option<&str>) -> u32 {
    count.map_or(1, |c| c.parse().unwrap_or(0))
}

fn make_line(kind: DiffLineKind, text: &str, line: Option<u32>) -> DiffLine {
    DiffLine {
        kind,
        text: text.to_string(),
        path: String::new(),
        line,
    }
}

fn assign_path(lines: &mut [DiffLine], path: Option<String>) {
    let Some(path) = path else {
        return;
    };
    for line in lines {
        line.path.clone_from(&path);
    }
}

/// Path from a `---`/`+++` header, without the `a/`/`b/` prefix or timestamp.
fn header_path(value: &str, prefix: &str) -> Option<String> {
    let value = value.split('\t').next().unwrap_or(value).trim_end();
    if value == "/dev/null" || value.is_empty() {
        return None;
    }
    Some(value.strip_prefix(prefix).unwrap_or(value).to_string())
}
