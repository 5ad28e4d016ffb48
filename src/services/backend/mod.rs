// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

pub mod bitbucket;
pub mod github;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{CommentId, ThreadAnchor, ThreadMap};
use crate::error::{Error, Result};
use crate::services::annotate::NestingMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[value(name = "github")]
    GitHub,
    Bitbucket,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GitHub => write!(f, "github"),
            Self::Bitbucket => write!(f, "bitbucket"),
        }
    }
}

/// The parts of a hosting service whose behavior differs per backend.
pub trait HostingBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    fn nesting_mode(&self) -> NestingMode;

    /// Whether descriptions render as HTML and should carry anchors.
    fn linkify(&self) -> bool;

    /// Decodes the backend's review-comment payload into threads.
    fn parse_comments(&self, payload: &str) -> Result<ThreadMap>;

    /// Records a new comment on `anchor` the way the backend would thread it.
    fn post_comment(
        &self,
        threads: &mut ThreadMap,
        anchor: ThreadAnchor,
        author: &str,
        text: &str,
    ) -> CommentId;
}

pub fn create_backend(kind: BackendKind) -> Box<dyn HostingBackend> {
    match kind {
        BackendKind::GitHub => Box::new(github::GitHubBackend),
        BackendKind::Bitbucket => Box::new(bitbucket::BitbucketBackend),
    }
}

/// Repository coordinates parsed from a git remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLocation {
    pub kind: BackendKind,
    pub host: String,
    /// GitHub owner or Bitbucket project key.
    pub owner: String,
    pub repo: String,
}

impl RemoteLocation {
    /// Accepts `https://host/owner/repo(.git)`, `git@host:owner/repo.git`,
    /// and Bitbucket Server's `/projects/P/repos/R` and `/scm/P/R` forms.
    pub fn parse(remote_url: &str) -> Result<Self> {
        let unsupported = || Error::UnsupportedRemote(remote_url.to_string());
        let (host, path) = split_remote(remote_url).ok_or_else(unsupported)?;

        let path = path.trim_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let location = match segments.as_slice() {
            ["projects", project, "repos", repo, ..] | ["scm", project, repo] => Self {
                kind: BackendKind::Bitbucket,
                host,
                owner: (*project).to_string(),
                repo: (*repo).to_string(),
            },
            [owner, repo] if host.contains("bitbucket") => Self {
                kind: BackendKind::Bitbucket,
                host,
                owner: (*owner).to_string(),
                repo: (*repo).to_string(),
            },
            [owner, repo] if host.contains("github") => Self {
                kind: BackendKind::GitHub,
                host,
                owner: (*owner).to_string(),
                repo: (*repo).to_string(),
            },
            _ => return Err(unsupported()),
        };

        debug!(
            kind = %location.kind,
            host = %location.host,
            owner = %location.owner,
            repo = %location.repo,
            "remote parsed"
        );
        Ok(location)
    }

    pub fn backend(&self) -> Box<dyn HostingBackend> {
        create_backend(self.kind)
    }

    /// Web address of pull request `number` on this repository.
    pub fn pull_request_url(&self, number: u64) -> String {
        match self.kind {
            BackendKind::GitHub => {
                format!("https://{}/{}/{}/pull/{number}", self.host, self.owner, self.repo)
            }
            BackendKind::Bitbucket => format!(
                "https://{}/projects/{}/repos/{}/pull-requests/{number}/overview",
                self.host, self.owner, self.repo
            ),
        }
    }
}

fn split_remote(remote_url: &str) -> Option<(String, String)> {
    if !remote_url.contains("://") {
        // scp-like: [user@]host:path
        let (authority, path) = remote_url.split_once(':')?;
        let host = authority.rsplit('@').next()?;
        if host.is_empty() || host.contains('/') {
            return None;
        }
        return Some((host.to_lowercase(), path.to_string()));
    }

    let url = url::Url::parse(remote_url).ok()?;
    let host = url.host_str()?.to_lowercase();
    Some((host, url.path().to_string()))
}

/// `Name <email>` with `?` standing in for an unknown address.
pub(crate) fn display_author(name: &str, email: Option<&str>) -> String {
    format!("{name} <{}>", email.filter(|e| !e.is_empty()).unwrap_or("?"))
}
