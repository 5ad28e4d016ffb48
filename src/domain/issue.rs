// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use serde::{Deserialize, Serialize};

/// A bug referenced by the change, with the tracker's classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueReference {
    /// Canonical link, e.g. `https://bugs.webkit.org/show_bug.cgi?id=1`.
    pub link: String,
    #[serde(default)]
    pub component: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
}

impl IssueReference {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            component: None,
            project: None,
        }
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }
}

impl std::fmt::Display for IssueReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.link)
    }
}
