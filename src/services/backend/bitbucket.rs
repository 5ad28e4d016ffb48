// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use serde::Deserialize;
use tracing::debug;

use super::{BackendKind, HostingBackend, display_author};
use crate::domain::{CommentEntry, CommentId, ThreadAnchor, ThreadMap};
use crate::error::Result;
use crate::services::annotate::NestingMode;

/// Page of `GET .../pull-requests/{id}/activities`.
#[derive(Debug, Deserialize)]
struct ActivityPage {
    #[serde(default)]
    values: Vec<Activity>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Activity {
    action: String,
    #[serde(default)]
    comment_anchor: Option<CommentAnchor>,
    #[serde(default)]
    comment: Option<Comment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentAnchor {
    path: String,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    line_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Comment {
    id: u64,
    text: String,
    author: Author,
    #[serde(default)]
    comments: Vec<Comment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Author {
    name: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    email_address: Option<String>,
}

/// Bitbucket Server renders Markdown and nests replies under their parent.
pub struct BitbucketBackend;

impl HostingBackend for BitbucketBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Bitbucket
    }

    fn nesting_mode(&self) -> NestingMode {
        NestingMode::OneLevel
    }

    fn linkify(&self) -> bool {
        false
    }

    fn parse_comments(&self, payload: &str) -> Result<ThreadMap> {
        let page: ActivityPage = serde_json::from_str(payload)?;

        let mut collected: Vec<(ThreadAnchor, CommentEntry)> = Vec::new();
        for activity in page.values {
            if activity.action != "COMMENTED" {
                continue;
            }
            let (Some(anchor), Some(comment)) = (activity.comment_anchor, activity.comment) else {
                continue;
            };
            // Lines on the removed side have no destination line to sit under.
            if anchor.line_type.as_deref() == Some("REMOVED") {
                debug!(path = %anchor.path, "skipping comment on removed line");
                continue;
            }
            let anchor = match anchor.line {
                Some(line) => ThreadAnchor::line(anchor.path, line),
                None => ThreadAnchor::file(anchor.path),
            };
            flatten(&anchor, comment, None, &mut collected);
        }

        // Activities arrive newest first; ids give arrival order.
        collected.sort_by_key(|(_, entry)| entry.id);

        let mut threads = ThreadMap::new();
        for (anchor, entry) in collected {
            threads.insert(anchor, entry);
        }

        debug!(
            threads = threads.len(),
            comments = threads.comment_count(),
            "bitbucket activities parsed"
        );
        Ok(threads)
    }

    fn post_comment(
        &self,
        threads: &mut ThreadMap,
        anchor: ThreadAnchor,
        author: &str,
        text: &str,
    ) -> CommentId {
        let parent = threads
            .get(&anchor)
            .and_then(|thread| thread.root())
            .map(|root| root.id);
        threads.add(anchor, author, text, parent)
    }
}

fn flatten(
    anchor: &ThreadAnchor,
    comment: Comment,
    parent: Option<CommentId>,
    out: &mut Vec<(ThreadAnchor, CommentEntry)>,
) {
    let name = comment
        .author
        .display_name
        .as_deref()
        .unwrap_or(&comment.author.name);
    out.push((
        anchor.clone(),
        CommentEntry {
            id: comment.id,
            author: display_author(name, comment.author.email_address.as_deref()),
            text: comment.text,
            parent,
        },
    ));
    for reply in comment.comments {
        flatten(anchor, reply, Some(comment.id), out);
    }
}
