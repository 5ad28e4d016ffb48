// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{CommentThread, DiffLine, DiffLineKind, ThreadAnchor, ThreadMap};

pub const THREAD_OPEN: &str = ">>>>";
pub const THREAD_CLOSE: &str = "<<<<";
const REPLY_INDENT: &str = "    ";

/// How a backend displays replies inside a thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NestingMode {
    /// Every comment at the same level, in arrival order.
    #[default]
    Flat,
    /// Replies indented once under the top-level comment they answer.
    OneLevel,
}

pub struct DiffAnnotator;

impl DiffAnnotator {
    /// Interleaves review threads with the diff they were left on.
    ///
    /// File-level threads go after the file's headers, before its first
    /// hunk. Line threads go right after the destination line they anchor
    /// to. Threads on files or lines absent from the diff are dropped.
    pub fn annotate(lines: &[DiffLine], threads: &ThreadMap, mode: NestingMode) -> Vec<String> {
        let mut out = Vec::with_capacity(lines.len());
        let mut pending_file: Option<&str> = None;
        let mut previous: Option<&DiffLine> = None;
        let mut rendered = 0usize;

        for line in lines {
            let starts_file = line.is_file_header()
                && previous.is_none_or(|p| !p.is_file_header() || p.path != line.path);

            if starts_file {
                rendered += Self::flush_file_thread(&mut out, &mut pending_file, threads, mode);
                pending_file = Some(line.path.as_str());
            } else if line.kind == DiffLineKind::HunkHeader {
                rendered += Self::flush_file_thread(&mut out, &mut pending_file, threads, mode);
            }

            out.push(line.text.clone());

            if let Some(number) = line.line {
                let anchor = ThreadAnchor::line(line.path.as_str(), number);
                if let Some(thread) = threads.get(&anchor) {
                    Self::render_thread(&mut out, thread, mode);
                    rendered += 1;
                }
            }
            previous = Some(line);
        }
        rendered += Self::flush_file_thread(&mut out, &mut pending_file, threads, mode);

        debug!(
            threads = threads.len(),
            rendered,
            omitted = threads.len().saturating_sub(rendered),
            "diff annotated"
        );
        out
    }

    fn flush_file_thread(
        out: &mut Vec<String>,
        pending_file: &mut Option<&str>,
        threads: &ThreadMap,
        mode: NestingMode,
    ) -> usize {
        let Some(path) = pending_file.take() else {
            return 0;
        };
        match threads.get(&ThreadAnchor::file(path)) {
            Some(thread) => {
                Self::render_thread(out, thread, mode);
                1
            }
            None => 0,
        }
    }

    pub fn render_thread(out: &mut Vec<String>, thread: &CommentThread, mode: NestingMode) {
        out.push(THREAD_OPEN.to_string());
        match mode {
            NestingMode::Flat => {
                for entry in &thread.entries {
                    push_comment(out, "", &entry.author, &entry.text);
                }
            }
            NestingMode::OneLevel => {
                let roots = thread
                    .entries
                    .iter()
                    .filter(|e| thread.root_of(e) == e.id);
                for root in roots {
                    push_comment(out, "", &root.author, &root.text);
                    for reply in thread
                        .entries
                        .iter()
                        .filter(|e| e.id != root.id && thread.root_of(e) == root.id)
                    {
                        push_comment(out, REPLY_INDENT, &reply.author, &reply.text);
                    }
                }
            }
        }
        out.push(THREAD_CLOSE.to_string());
    }
}

/// `<author>: <text>`, with extra text lines kept at the comment's indent.
fn push_comment(out: &mut Vec<String>, indent: &str, author: &str, text: &str) {
    let mut lines = text.lines();
    out.push(format!("{indent}{author}: {}", lines.next().unwrap_or("")));
    for line in lines {
        out.push(format!("{indent}{line}"));
    }
}
