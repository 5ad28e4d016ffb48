// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::path::PathBuf;

use tokio::process::Command;
use tracing::debug;

use crate::domain::{BranchState, CommitRecord};
use crate::error::{Error, Result};

const RECORD_SEPARATOR: char = '\u{1e}';
const FIELD_SEPARATOR: char = '\u{0}';
const STICKY_REMOTE_KEY: &str = "prsync-remote";

pub struct GitService {
    repo: gix::Repository,
    work_dir: PathBuf,
}

impl GitService {
    pub fn discover() -> Result<Self> {
        let repo = gix::discover(".").map_err(|_| Error::NotAGitRepo)?;

        let work_dir = repo
            .work_dir()
            .ok_or_else(|| Error::Git("Bare repository not supported".into()))?
            .to_path_buf();

        Ok(Self { repo, work_dir })
    }

    pub fn current_branch(&self) -> Result<String> {
        let head = self
            .repo
            .head_name()
            .map_err(|e| Error::Git(e.to_string()))?
            .ok_or_else(|| Error::Git("HEAD is detached".into()))?;
        Ok(head.shorten().to_string())
    }

    /// Commits in `base..HEAD`, newest first.
    pub async fn commits_since(&self, base: &str) -> Result<Vec<CommitRecord>> {
        let range = format!("{base}..HEAD");
        let stdout = self
            .run(&["log", "--format=%H%x00%B%x1e", &range])
            .await?;

        let mut commits = Vec::new();
        for record in stdout.split(RECORD_SEPARATOR) {
            let record = record.trim_start_matches('\n');
            if record.is_empty() {
                continue;
            }
            let (hash, message) = record.split_once(FIELD_SEPARATOR).unwrap_or((record, ""));
            let message = message.trim_end_matches('\n');
            let message = (!message.is_empty()).then(|| format!("{message}\n"));
            commits.push(CommitRecord::new(hash.trim(), message)?);
        }

        debug!(base, count = commits.len(), "commits listed");
        if commits.is_empty() {
            return Err(Error::NoCommits {
                base: base.to_string(),
            });
        }
        Ok(commits)
    }

    pub async fn remote_url(&self, remote: &str) -> Result<String> {
        let url = self.run(&["remote", "get-url", remote]).await?;
        Ok(url.trim().to_string())
    }

    pub async fn load_branch_state(&self, branch: &str) -> Result<BranchState> {
        let key = Self::sticky_key(branch);
        let output = Command::new("git")
            .args(["config", "--get", &key])
            .current_dir(&self.work_dir)
            .output()
            .await?;

        // `git config --get` exits with 1 when the key is unset.
        let sticky = if output.status.success() {
            let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
            (!value.is_empty()).then_some(value)
        } else if output.status.code() == Some(1) {
            None
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Git(stderr.to_string()));
        };

        debug!(branch, sticky = ?sticky, "branch state loaded");
        Ok(BranchState::new(branch, sticky))
    }

    pub async fn save_branch_state(&self, state: &BranchState) -> Result<()> {
        let key = Self::sticky_key(&state.branch);
        match &state.sticky_remote {
            Some(remote) => {
                self.run(&["config", &key, remote]).await?;
            }
            None => {
                // Unsetting a missing key fails with status 5; nothing to undo then.
                let _ = Command::new("git")
                    .args(["config", "--unset", &key])
                    .current_dir(&self.work_dir)
                    .output()
                    .await?;
            }
        }
        debug!(branch = %state.branch, sticky = ?state.sticky_remote, "branch state saved");
        Ok(())
    }

    fn sticky_key(branch: &str) -> String {
        format!("branch.{branch}.{STICKY_REMOTE_KEY}")
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Git(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
