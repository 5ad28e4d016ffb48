// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::domain::{CommitRecord, IssueReference};
use crate::error::Result;

static REFERENCE_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    vec![
        (
            "Bugzilla",
            Regex::new(r"(?:https?://)?([\w.-]+/show_bug\.cgi\?id=\d+)").unwrap(),
        ),
        (
            "GitHub",
            Regex::new(r"(?:https?://)?([\w.-]*github[\w.-]*/[\w.-]+/[\w.-]+/issues/\d+)").unwrap(),
        ),
        (
            "Radar",
            Regex::new(r"(?:rdar|radar)://(?:problem/|/)?(\d+)").unwrap(),
        ),
    ]
});

/// Kind of tracker a link belongs to, e.g. `Bugzilla`.
pub fn tracker_name(link: &str) -> Option<&'static str> {
    REFERENCE_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(link))
        .map(|(name, _)| *name)
}

/// Canonical links of every issue mentioned in `message`, first mention first.
pub fn extract_links(message: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = Vec::new();

    for (name, pattern) in REFERENCE_PATTERNS.iter() {
        for caps in pattern.captures_iter(message) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let link = if *name == "Radar" {
                format!("rdar://{}", &caps[1])
            } else {
                format!("https://{}", &caps[1])
            };
            found.push((whole.start(), link));
        }
    }

    found.sort_by_key(|(start, _)| *start);
    let mut links: Vec<String> = Vec::with_capacity(found.len());
    for (_, link) in found {
        if !links.contains(&link) {
            links.push(link);
        }
    }
    links
}

/// Component and project of known issues, keyed by canonical link.
#[derive(Debug, Clone, Default)]
pub struct IssueCatalog {
    entries: HashMap<String, IssueReference>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<IssueReference>),
    Wrapped { issues: Vec<IssueReference> },
}

impl IssueCatalog {
    pub fn from_references(references: impl IntoIterator<Item = IssueReference>) -> Self {
        let entries = references
            .into_iter()
            .map(|r| (r.link.clone(), r))
            .collect();
        Self { entries }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let references = match serde_json::from_str(json)? {
            CatalogFile::List(list) => list,
            CatalogFile::Wrapped { issues } => issues,
        };
        Ok(Self::from_references(references))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn references(&self) -> Vec<IssueReference> {
        let mut all: Vec<IssueReference> = self.entries.values().cloned().collect();
        all.sort_by(|a, b| a.link.cmp(&b.link));
        all
    }

    /// Classified reference for `link`; unknown issues carry no component.
    pub fn resolve(&self, link: &str) -> IssueReference {
        self.entries
            .get(link)
            .cloned()
            .unwrap_or_else(|| IssueReference::new(link))
    }
}

/// Issues referenced across `commits`, in commit order, each listed once.
pub fn references_in(commits: &[CommitRecord], catalog: &IssueCatalog) -> Vec<IssueReference> {
    let mut links: Vec<String> = Vec::new();
    for message in commits.iter().filter_map(|c| c.message.as_deref()) {
        for link in extract_links(message) {
            if !links.contains(&link) {
                links.push(link);
            }
        }
    }
    debug!(count = links.len(), "issue references extracted");
    links.iter().map(|link| catalog.resolve(link)).collect()
}
