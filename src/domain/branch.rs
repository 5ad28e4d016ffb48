// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

/// Per-branch record the caller loads before and saves after remote selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchState {
    pub branch: String,
    /// Remote the branch's pull request was last made against.
    pub sticky_remote: Option<String>,
}

impl BranchState {
    pub fn new(branch: impl Into<String>, sticky_remote: Option<String>) -> Self {
        Self {
            branch: branch.into(),
            sticky_remote,
        }
    }
}
