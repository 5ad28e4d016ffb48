// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::collections::BTreeMap;

/// Where a review thread is attached: a file line, or the file as a whole.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThreadAnchor {
    pub path: String,
    pub line: Option<u32>,
}

impl ThreadAnchor {
    pub fn line(path: impl Into<String>, line: u32) -> Self {
        Self {
            path: path.into(),
            line: Some(line),
        }
    }

    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line: None,
        }
    }
}

pub type CommentId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEntry {
    pub id: CommentId,
    /// Display form, e.g. `Tim Committer <committer@webkit.org>`.
    pub author: String,
    pub text: String,
    pub parent: Option<CommentId>,
}

/// Comments on one anchor, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentThread {
    pub entries: Vec<CommentEntry>,
}

impl CommentThread {
    pub fn root(&self) -> Option<&CommentEntry> {
        self.entries.iter().find(|e| e.parent.is_none())
    }

    pub fn get(&self, id: CommentId) -> Option<&CommentEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Follows parent links up to the top-level comment this entry hangs under.
    pub fn root_of(&self, entry: &CommentEntry) -> CommentId {
        let mut current = entry;
        // Bounded by the thread length so a parent cycle cannot spin forever.
        for _ in 0..self.entries.len() {
            match current.parent.and_then(|p| self.get(p)) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current.id
    }
}

/// All review threads of one pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadMap {
    threads: BTreeMap<ThreadAnchor, CommentThread>,
    next_id: CommentId,
}

impl ThreadMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a comment to the thread at `anchor`, creating it if needed.
    pub fn add(
        &mut self,
        anchor: ThreadAnchor,
        author: impl Into<String>,
        text: impl Into<String>,
        parent: Option<CommentId>,
    ) -> CommentId {
        let id = self.next_id + 1;
        self.insert(
            anchor,
            CommentEntry {
                id,
                author: author.into(),
                text: text.into(),
                parent,
            },
        );
        id
    }

    /// Inserts an entry that already carries a backend-assigned id.
    pub fn insert(&mut self, anchor: ThreadAnchor, entry: CommentEntry) {
        self.next_id = self.next_id.max(entry.id);
        self.threads.entry(anchor).or_default().entries.push(entry);
    }

    pub fn get(&self, anchor: &ThreadAnchor) -> Option<&CommentThread> {
        self.threads.get(anchor)
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// Total number of comments across all threads.
    pub fn comment_count(&self) -> usize {
        self.threads.values().map(|t| t.entries.len()).sum()
    }
}
