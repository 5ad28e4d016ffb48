// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

// miette's Diagnostic derive generates code that triggers this false positive
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Malformed pull request body: {0}")]
    #[diagnostic(
        code(prsync::body::malformed),
        help("Bodies must contain '#### <hash>' sections wrapped in ``` or <pre> blocks")
    )]
    MalformedBody(String),

    #[error("Invalid commit hash '{0}'")]
    #[diagnostic(
        code(prsync::commit::invalid_hash),
        help("Commit hashes must be 40 lowercase hexadecimal characters")
    )]
    InvalidHash(String),

    #[error("No commits found between '{base}' and HEAD")]
    #[diagnostic(
        code(prsync::git::no_commits),
        help("Commit your changes or pass a different --base")
    )]
    NoCommits { base: String },

    #[error("Not a git repository")]
    #[diagnostic(
        code(prsync::git::not_repo),
        help("Run this command inside a git repository")
    )]
    NotAGitRepo,

    #[error("Operation cancelled by user")]
    Cancelled,

    #[error(
        "'{branch}' was previously made against the '{sticky}' remote\n\
         Prevailing issue indicates it should be made against '{prevailing}'\n\
         Cannot automatically determine which is correct, canceling pull-request"
    )]
    #[diagnostic(
        code(prsync::remote::ambiguous),
        help("Re-run interactively (without --defaults) to pick a remote")
    )]
    AmbiguousRemote {
        branch: String,
        sticky: String,
        prevailing: String,
    },

    #[error("You do not have access to a secure remote to make a pull request for a redacted issue")]
    #[diagnostic(
        code(prsync::redaction::no_secure_remote),
        help(
            "Please consult repository administrators to gain access to a secure remote to make this fix against"
        )
    )]
    NoSecureRemote,

    #[error("Pull request references redacted issues and '{remote}' is not a secure remote")]
    #[diagnostic(
        code(prsync::redaction::blocked),
        help("Target one of the configured secure remotes, or confirm the override with --yes")
    )]
    RedactionBlocked { remote: String },

    #[error("Unsupported remote '{0}'")]
    #[diagnostic(
        code(prsync::remote::unsupported),
        help("Only GitHub and Bitbucket Server remotes are supported")
    )]
    UnsupportedRemote(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(prsync::config::error))]
    Config(String),

    #[error("Git error: {0}")]
    #[diagnostic(code(prsync::git::error))]
    Git(String),

    #[error("Invalid JSON input: {0}")]
    #[diagnostic(code(prsync::input::json))]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),
}

impl Error {
    /// Whether this error means "stop the pull request flow" rather than a failure.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Error::Cancelled | Error::AmbiguousRemote { .. })
    }
}

impl From<dialoguer::Error> for Error {
    fn from(e: dialoguer::Error) -> Self {
        Error::Dialog(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
