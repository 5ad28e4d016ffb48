// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::path::PathBuf;

use clap::Parser;

use crate::services::backend::BackendKind;

#[derive(Parser, Debug)]
#[command(name = "prsync")]
#[command(version)]
#[command(about = "Keep pull request descriptions in sync with your branch", long_about = None)]
pub struct Cli {
    /// Branch the pull request merges into
    #[arg(short, long, global = true, env = "PRSYNC_BASE")]
    pub base: Option<String>,

    /// Never prompt; conflicts that need an answer cancel instead
    #[arg(long, global = true)]
    pub defaults: bool,

    /// Confirm redaction overrides without prompting
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Render the pull request description for a set of commits
    Encode {
        /// JSON list of {hash, message}; defaults to `git log <base>..HEAD`
        #[arg(long)]
        commits: Option<PathBuf>,

        /// Free text placed above the commits
        #[arg(long)]
        preamble: Option<String>,

        /// HTML body with clickable references
        #[arg(long, conflicts_with = "no_linkify")]
        linkify: bool,

        /// Markdown body with fenced messages
        #[arg(long)]
        no_linkify: bool,
    },
    /// Parse a pull request description back into commits (stdin if no file)
    Decode { file: Option<PathBuf> },
    /// Interleave review comments with a unified diff
    Annotate {
        /// Unified diff of the pull request
        #[arg(long)]
        diff: PathBuf,

        /// Review comments as returned by the backend's API
        #[arg(long)]
        comments: PathBuf,

        #[arg(long, value_enum, default_value_t = BackendKind::GitHub)]
        backend: BackendKind,
    },
    /// Check whether referenced issues require a secure remote
    Redaction {
        /// JSON list of {link, component, project}
        #[arg(long)]
        issues: PathBuf,

        /// Only evaluate issues referenced by `<base>..HEAD`
        #[arg(long)]
        from_git: bool,

        /// Remote the pull request is about to be made against
        #[arg(long)]
        remote: Option<String>,
    },
    /// Resolve which remote the branch's pull request belongs on
    Remote {
        /// Remote the current issues call for
        #[arg(long)]
        prevailing: String,

        /// Branch to resolve (defaults to the current branch)
        #[arg(long)]
        branch: Option<String>,
    },
    /// Run every local step of making a pull request and print its body
    Prepare {
        /// Issue catalog used to classify referenced issues
        #[arg(long)]
        issues: Option<PathBuf>,

        /// Remote to make the pull request against
        #[arg(long)]
        remote: Option<String>,

        /// Free text placed above the commits
        #[arg(long)]
        preamble: Option<String>,

        /// Number of the pull request being updated
        #[arg(long)]
        pr: Option<u64>,
    },
    /// Initialize config file
    Init,
    /// Show current configuration
    Config,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
