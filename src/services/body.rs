// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

//! Pull request description format.
//!
//! ```text
//! <preamble>
//!
//! ----------------------------------------------------------------------
//! #### <hash>
//! <pre>
//! <linkified message>
//! </pre>
//! ----------------------------------------------------------------------
//! #### <hash>
//! ...
//! ```
//!
//! Markdown backends get the same layout with a ``` fence instead of `<pre>`.

use tracing::debug;

use crate::domain::{CommitRecord, PullRequestBody, is_commit_hash};
use crate::error::{Error, Result};
use crate::services::linkify;

/// 70 dashes between the preamble and between commit sections.
pub const SECTION_RULE: &str =
    "----------------------------------------------------------------------";

/// Body content standing in for a commit without a message.
pub const EMPTY_MESSAGE: &str = "???";

const HEADER_PREFIX: &str = "#### ";
const PRE_OPEN: &str = "<pre>";
const PRE_CLOSE: &str = "</pre>";
const MIN_FENCE: usize = 3;

const STATUS_BUBBLE_START: &str = "<!--EWS-Status-Bubble-Start-->";
const STATUS_BUBBLE_END: &str = "<!--EWS-Status-Bubble-End-->";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wrapping {
    Html,
    Fenced(usize),
}

impl Wrapping {
    fn detect(line: &str) -> Option<Self> {
        let line = line.trim_end();
        if line == PRE_OPEN {
            Some(Self::Html)
        } else if line.len() >= MIN_FENCE && line.bytes().all(|b| b == b'`') {
            Some(Self::Fenced(line.len()))
        } else {
            None
        }
    }

    fn closer(self) -> String {
        match self {
            Self::Html => PRE_CLOSE.to_string(),
            Self::Fenced(len) => "`".repeat(len),
        }
    }
}

pub struct BodyCodec;

impl BodyCodec {
    /// Renders `commits` (newest first, as given) into a PR description.
    ///
    /// `linkify` selects the HTML `<pre>` form with clickable references;
    /// otherwise messages are fenced verbatim for Markdown renderers.
    pub fn encode(preamble: Option<&str>, commits: &[CommitRecord], linkify: bool) -> String {
        let mut body = String::new();

        if let Some(preamble) = preamble {
            body.push_str(preamble);
            body.push_str("\n\n");
            body.push_str(SECTION_RULE);
            body.push('\n');
        }

        let sections: Vec<String> = commits
            .iter()
            .map(|commit| Self::encode_section(commit, linkify))
            .collect();
        body.push_str(&sections.join(&format!("\n{SECTION_RULE}\n")));

        debug!(commits = commits.len(), linkify, chars = body.len(), "body encoded");
        body
    }

    pub fn encode_body(body: &PullRequestBody, linkify: bool) -> String {
        Self::encode(body.preamble.as_deref(), &body.commits, linkify)
    }

    fn encode_section(commit: &CommitRecord, linkify: bool) -> String {
        let content = match commit.message.as_deref() {
            None => EMPTY_MESSAGE,
            Some(message) => message.strip_suffix('\n').unwrap_or(message),
        };

        if linkify {
            format!(
                "{HEADER_PREFIX}{}\n{PRE_OPEN}\n{}\n{PRE_CLOSE}",
                commit.hash,
                linkify::linkify(content)
            )
        } else {
            let fence = fence_for(content);
            format!("{HEADER_PREFIX}{}\n{fence}\n{content}\n{fence}", commit.hash)
        }
    }

    /// Parses a description produced by [`BodyCodec::encode`], in either wrapping.
    ///
    /// Status-bubble comments between or after sections are ignored. Message
    /// lines are kept byte for byte, except that a body whose headers end in
    /// CRLF has the `\r` stripped from every line.
    pub fn decode(text: &str) -> Result<PullRequestBody> {
        let lines: Vec<&str> = text.split('\n').collect();
        let (preamble_end, first) = Self::find_first_section(&lines)?;
        let crlf = lines[first].ends_with('\r');

        let preamble = preamble_end.map(|end| join_lines(&lines[..end], crlf));
        let mut commits = Vec::new();
        let mut cursor = first;

        loop {
            let (commit, next) = Self::decode_section(&lines, cursor, crlf)?;
            commits.push(commit);
            cursor = Self::skip_trailers(&lines, next);

            let Some(line) = lines.get(cursor) else {
                break;
            };
            if line.trim_end() != SECTION_RULE {
                return Err(malformed(format!(
                    "expected a section rule after commit {}, found '{}'",
                    commits.len(),
                    line.trim_end()
                )));
            }
            cursor += 1;
        }

        debug!(
            commits = commits.len(),
            preamble = preamble.is_some(),
            crlf,
            "body decoded"
        );
        Ok(PullRequestBody { preamble, commits })
    }

    /// Locates the first commit header.
    ///
    /// Returns the number of preamble lines (if any) and the header's index.
    /// The preamble ends at the first blank line followed by a rule and a
    /// header with a valid hash. Rules quoted inside the preamble don't count.
    fn find_first_section(lines: &[&str]) -> Result<(Option<usize>, usize)> {
        if lines[0].starts_with(HEADER_PREFIX) {
            return Ok((None, 0));
        }

        let found = (1..lines.len().saturating_sub(1)).find(|&rule| {
            lines[rule].trim_end() == SECTION_RULE
                && lines[rule - 1].trim_end().is_empty()
                && header_hash(lines[rule + 1]).is_some_and(is_commit_hash)
        });
        if let Some(rule) = found {
            return Ok((Some(rule - 1), rule + 1));
        }

        let has_header = lines.iter().any(|l| l.starts_with(HEADER_PREFIX));
        Err(malformed(if has_header {
            "text before the first commit is not followed by a section rule".to_string()
        } else {
            "no '#### <hash>' commit header found".to_string()
        }))
    }

    /// Decodes the section starting at `start`; returns the index after it.
    fn decode_section(lines: &[&str], start: usize, crlf: bool) -> Result<(CommitRecord, usize)> {
        let header = lines
            .get(start)
            .ok_or_else(|| malformed("expected a commit header".to_string()))?;
        let hash = header_hash(header).ok_or_else(|| {
            malformed(format!("expected '#### <hash>', found '{}'", header.trim_end()))
        })?;
        if !is_commit_hash(hash) {
            return Err(malformed(format!("invalid commit hash '{hash}'")));
        }

        let wrapping = lines
            .get(start + 1)
            .and_then(|l| Wrapping::detect(l))
            .ok_or_else(|| malformed(format!("commit {hash} has no message block")))?;
        let closer = wrapping.closer();

        let mut end = start + 2;
        let trailer = loop {
            let line = lines
                .get(end)
                .ok_or_else(|| malformed(format!("unterminated message block for commit {hash}")))?;
            if let Some(rest) = line.strip_prefix(closer.as_str())
                && (rest.trim().is_empty() || rest.starts_with(STATUS_BUBBLE_START))
            {
                break rest;
            }
            end += 1;
        };

        let raw = join_lines(&lines[start + 2..end], crlf);
        let content = match wrapping {
            Wrapping::Html => linkify::unlinkify(&raw),
            Wrapping::Fenced(_) => raw,
        };
        let message = (content != EMPTY_MESSAGE).then_some(content);

        let next = if trailer.starts_with(STATUS_BUBBLE_START) {
            skip_status_bubble(lines, end, trailer)
        } else {
            end + 1
        };
        Ok((
            CommitRecord {
                hash: hash.to_string(),
                message,
            },
            next,
        ))
    }

    /// Skips blank lines and status bubbles that follow a section.
    fn skip_trailers(lines: &[&str], mut cursor: usize) -> usize {
        loop {
            match lines.get(cursor).map(|l| l.trim()) {
                Some("") => cursor += 1,
                Some(line) if line.starts_with(STATUS_BUBBLE_START) => {
                    cursor = skip_status_bubble(lines, cursor, line);
                }
                _ => return cursor,
            }
        }
    }
}

fn header_hash(line: &str) -> Option<&str> {
    line.strip_prefix(HEADER_PREFIX).map(str::trim_end)
}

fn join_lines(lines: &[&str], crlf: bool) -> String {
    if crlf {
        lines
            .iter()
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        lines.join("\n")
    }
}

/// Index after a status bubble whose start marker opens `from`, found on line
/// `index`. An unterminated bubble runs to the end of the text.
fn skip_status_bubble(lines: &[&str], index: usize, from: &str) -> usize {
    let after_start = from.get(STATUS_BUBBLE_START.len()..).unwrap_or_default();
    if after_start.contains(STATUS_BUBBLE_END) {
        return index + 1;
    }
    lines[index + 1..]
        .iter()
        .position(|l| l.contains(STATUS_BUBBLE_END))
        .map_or(lines.len(), |offset| index + 1 + offset + 1)
}

/// A backtick fence longer than any backtick run inside `content`.
fn fence_for(content: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in content.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat((longest + 1).max(MIN_FENCE))
}

fn malformed(reason: String) -> Error {
    Error::MalformedBody(reason)
}
