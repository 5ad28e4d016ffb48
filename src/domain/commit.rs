// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const HASH_LEN: usize = 40;

/// A commit as it appears in a pull request description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    /// `None` when the message could not be read.
    #[serde(default)]
    pub message: Option<String>,
}

impl CommitRecord {
    pub fn new(hash: impl Into<String>, message: Option<String>) -> Result<Self> {
        let hash = hash.into();
        if !is_commit_hash(&hash) {
            return Err(Error::InvalidHash(hash));
        }
        Ok(Self { hash, message })
    }

    /// First line of the message, used for PR titles.
    pub fn subject(&self) -> Option<&str> {
        self.message
            .as_deref()
            .and_then(|m| m.lines().next())
            .filter(|l| !l.trim().is_empty())
    }
}

pub fn is_commit_hash(s: &str) -> bool {
    s.len() == HASH_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Decoded pull request description.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PullRequestBody {
    #[serde(default)]
    pub preamble: Option<String>,
    pub commits: Vec<CommitRecord>,
}
