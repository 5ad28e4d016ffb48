// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use serde::Deserialize;
use tracing::debug;

use super::{BackendKind, HostingBackend, display_author};
use crate::domain::{CommentEntry, CommentId, ThreadAnchor, ThreadMap};
use crate::error::Result;
use crate::services::annotate::NestingMode;

/// Element of `GET /repos/{owner}/{repo}/pulls/{number}/comments`.
#[derive(Debug, Deserialize)]
struct ReviewComment {
    id: u64,
    path: String,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    subject_type: Option<String>,
    body: String,
    user: User,
    #[serde(default)]
    in_reply_to_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct User {
    login: String,
    #[serde(default)]
    email: Option<String>,
}

/// GitHub renders descriptions as HTML and shows review replies flat.
pub struct GitHubBackend;

impl HostingBackend for GitHubBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::GitHub
    }

    fn nesting_mode(&self) -> NestingMode {
        NestingMode::Flat
    }

    fn linkify(&self) -> bool {
        true
    }

    fn parse_comments(&self, payload: &str) -> Result<ThreadMap> {
        let mut comments: Vec<ReviewComment> = serde_json::from_str(payload)?;
        comments.sort_by_key(|c| c.id);

        let mut threads = ThreadMap::new();
        for comment in comments {
            // Outdated line comments lose their line; they no longer map onto the diff.
            let anchor = match (comment.subject_type.as_deref(), comment.line) {
                (Some("file"), _) => ThreadAnchor::file(comment.path),
                (_, Some(line)) => ThreadAnchor::line(comment.path, line),
                (_, None) => {
                    debug!(id = comment.id, path = %comment.path, "outdated comment skipped");
                    continue;
                }
            };
            threads.insert(
                anchor,
                CommentEntry {
                    id: comment.id,
                    author: display_author(&comment.user.login, comment.user.email.as_deref()),
                    text: comment.body,
                    parent: comment.in_reply_to_id,
                },
            );
        }

        debug!(
            threads = threads.len(),
            comments = threads.comment_count(),
            "github review comments parsed"
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
        threads.add(anchor, author, text, None)
    }
}
