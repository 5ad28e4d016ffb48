// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::io::{IsTerminal, Read};
use std::path::Path;

use console::style;
use dialoguer::Confirm;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::domain::{CommitRecord, IssueReference};
use crate::error::{Error, Result};
use crate::services::{
    annotate::DiffAnnotator,
    backend::{BackendKind, RemoteLocation, create_backend},
    body::BodyCodec,
    diff::parse_unified_diff,
    git::GitService,
    issues::{IssueCatalog, references_in},
    remote::{RemotePrompt, RemoteSelector, TerminalPrompt},
};

/// Commit as accepted in `--commits` files.
#[derive(Debug, Deserialize)]
struct CommitInput {
    hash: String,
    #[serde(default)]
    message: Option<String>,
}

pub struct App {
    cli: Cli,
    config: Config,
}

impl App {
    pub fn new(cli: Cli) -> Result<Self> {
        let config = Config::load(&cli)?;
        debug!(
            base_branch = %config.base_branch,
            default_remote = %config.default_remote,
            linkify = ?config.linkify,
            "config loaded"
        );
        Ok(Self { cli, config })
    }

    pub async fn run(&mut self) -> Result<()> {
        match &self.cli.command {
            Commands::Encode {
                commits,
                preamble,
                linkify,
                no_linkify,
            } => {
                let flag = match (*linkify, *no_linkify) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                };
                self.encode(commits.as_deref(), preamble.as_deref(), flag)
                    .await
            }
            Commands::Decode { file } => self.decode(file.as_deref()),
            Commands::Annotate {
                diff,
                comments,
                backend,
            } => self.annotate(diff, comments, *backend),
            Commands::Redaction {
                issues,
                from_git,
                remote,
            } => self.redaction(issues, *from_git, remote.as_deref()).await,
            Commands::Remote { prevailing, branch } => {
                self.remote(prevailing, branch.as_deref()).await
            }
            Commands::Prepare {
                issues,
                remote,
                preamble,
                pr,
            } => {
                self.prepare(
                    issues.as_deref(),
                    remote.as_deref(),
                    preamble.as_deref(),
                    *pr,
                )
                .await
            }
            Commands::Init => {
                let path = Config::create_default()?;
                println!("Created config: {}", path.display());
                Ok(())
            }
            Commands::Config => {
                self.show_config();
                Ok(())
            }
            Commands::Completions { shell } => {
                let mut cmd = <Cli as clap::CommandFactory>::command();
                clap_complete::generate(*shell, &mut cmd, "prsync", &mut std::io::stdout());
                Ok(())
            }
        }
    }

    // ─── Body ───

    async fn encode(
        &self,
        commits_file: Option<&Path>,
        preamble: Option<&str>,
        linkify_flag: Option<bool>,
    ) -> Result<()> {
        let commits = match commits_file {
            Some(path) => load_commits(path)?,
            None => {
                let git = GitService::discover()?;
                git.commits_since(&self.config.base_branch).await?
            }
        };

        let linkify = match linkify_flag.or(self.config.linkify) {
            Some(linkify) => linkify,
            None => self.default_remote_linkify().await,
        };

        println!("{}", BodyCodec::encode(preamble, &commits, linkify));
        Ok(())
    }

    /// Backend preference of the default remote, HTML when it can't be told.
    async fn default_remote_linkify(&self) -> bool {
        let Ok(git) = GitService::discover() else {
            return true;
        };
        match git.remote_url(&self.config.default_remote).await {
            Ok(url) => RemoteLocation::parse(&url)
                .map(|location| location.backend().linkify())
                .unwrap_or(true),
            Err(e) => {
                debug!(error = %e, "default remote unavailable, linkifying");
                true
            }
        }
    }

    fn decode(&self, file: Option<&Path>) -> Result<()> {
        let text = match file {
            Some(path) => std::fs::read_to_string(path)?,
            None => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            }
        };
        let body = BodyCodec::decode(&text)?;
        println!("{}", serde_json::to_string_pretty(&body)?);
        Ok(())
    }

    // ─── Review ───

    fn annotate(&self, diff: &Path, comments: &Path, kind: BackendKind) -> Result<()> {
        let backend = create_backend(kind);
        let threads = backend.parse_comments(&std::fs::read_to_string(comments)?)?;
        let lines = parse_unified_diff(&std::fs::read_to_string(diff)?);

        for line in DiffAnnotator::annotate(&lines, &threads, backend.nesting_mode()) {
            println!("{line}");
        }
        Ok(())
    }

    // ─── Redaction ───

    async fn redaction(&self, issues: &Path, from_git: bool, remote: Option<&str>) -> Result<()> {
        let catalog = IssueCatalog::load(issues)?;
        let (git, references) = if from_git {
            let git = GitService::discover()?;
            let commits = git.commits_since(&self.config.base_branch).await?;
            let references = references_in(&commits, &catalog);
            (Some(git), references)
        } else {
            (GitService::discover().ok(), catalog.references())
        };

        let target = self
            .enforce_redaction(git.as_ref(), &references, remote)
            .await?;
        println!("{target}");
        Ok(())
    }

    /// Evaluates redaction and returns the remote the issues call for.
    ///
    /// Without a repository the configured secure remotes are taken on
    /// trust; otherwise only remotes git knows about qualify.
    async fn enforce_redaction(
        &self,
        git: Option<&GitService>,
        references: &[IssueReference],
        requested: Option<&str>,
    ) -> Result<String> {
        let redaction = &self.config.redaction;
        let report = redaction.policy()?.evaluate(references);

        if let Some(reference) = &report.decided_by {
            self.print_info(&format!("A commit you are uploading references {reference}"));
        }
        for note in &report.notes {
            self.print_info(note);
        }
        for warning in &report.warnings {
            self.print_warning(warning);
        }

        let requested = requested.map(str::to_string);
        if !report.is_blocked() {
            return Ok(requested.unwrap_or_else(|| self.config.default_remote.clone()));
        }

        self.print_info("Pull request needs to be sent to a secure remote for review");

        match requested {
            Some(remote) if redaction.is_secure(&remote) => Ok(remote),
            Some(remote) => {
                if self.confirm_redaction_override(&remote)? {
                    warn!(remote = %remote, "redaction overridden by operator");
                    Ok(remote)
                } else {
                    Err(Error::RedactionBlocked { remote })
                }
            }
            None => self.first_accessible_secure_remote(git).await,
        }
    }

    async fn first_accessible_secure_remote(&self, git: Option<&GitService>) -> Result<String> {
        for remote in &self.config.redaction.secure_remotes {
            let Some(git) = git else {
                return Ok(remote.clone());
            };
            match git.remote_url(remote).await {
                Ok(_) => return Ok(remote.clone()),
                Err(e) => debug!(remote = %remote, error = %e, "secure remote not accessible"),
            }
        }
        Err(Error::NoSecureRemote)
    }

    fn confirm_redaction_override(&self, remote: &str) -> Result<bool> {
        if self.cli.yes {
            return Ok(true);
        }
        if !self.is_interactive() {
            return Ok(false);
        }
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "'{remote}' is not a secure remote. Make the pull request there anyway?"
            ))
            .default(false)
            .interact()?;
        Ok(confirmed)
    }

    // ─── Remote ───

    async fn remote(&self, prevailing: &str, branch: Option<&str>) -> Result<()> {
        let git = GitService::discover()?;
        let branch = match branch {
            Some(branch) => branch.to_string(),
            None => git.current_branch()?,
        };

        let remote = self.select_remote(&git, &branch, prevailing).await?;
        println!("{remote}");
        Ok(())
    }

    async fn select_remote(&self, git: &GitService, branch: &str, prevailing: &str) -> Result<String> {
        let mut state = git.load_branch_state(branch).await?;
        let mut terminal = TerminalPrompt;
        let prompt: Option<&mut dyn RemotePrompt> = if self.is_interactive() {
            Some(&mut terminal)
        } else {
            None
        };

        let remote = RemoteSelector::resolve(&mut state, prevailing, prompt)?;
        git.save_branch_state(&state).await?;
        Ok(remote)
    }

    // ─── Full flow ───

    async fn prepare(
        &self,
        issues: Option<&Path>,
        remote: Option<&str>,
        preamble: Option<&str>,
        pr: Option<u64>,
    ) -> Result<()> {
        let git = GitService::discover()?;
        let branch = git.current_branch()?;

        self.print_status(&format!(
            "Collecting commits on '{branch}' since '{}'...",
            self.config.base_branch
        ));
        let commits = git.commits_since(&self.config.base_branch).await?;

        let catalog = match issues {
            Some(path) => IssueCatalog::load(path)?,
            None => IssueCatalog::default(),
        };
        if let Some(title) = commits.first().and_then(CommitRecord::subject) {
            self.print_info(&format!("Title: {title}"));
        }
        let references = references_in(&commits, &catalog);
        debug!(commits = commits.len(), references = references.len(), "branch scanned");

        let prevailing = self
            .enforce_redaction(Some(&git), &references, remote)
            .await?;
        let target = match remote {
            // An explicit remote is the operator's decision; remember it.
            Some(remote) => {
                let mut state = git.load_branch_state(&branch).await?;
                state.sticky_remote = Some(remote.to_string());
                git.save_branch_state(&state).await?;
                remote.to_string()
            }
            None => self.select_remote(&git, &branch, &prevailing).await?,
        };
        self.print_status(&format!("Making the PR against the '{target}' remote"));

        let url = git.remote_url(&target).await?;
        let location = RemoteLocation::parse(&url)?;
        if let Some(number) = pr {
            self.print_status(&format!("Updating {}", location.pull_request_url(number)));
        }
        let linkify = self
            .config
            .linkify
            .unwrap_or_else(|| location.backend().linkify());

        println!("{}", BodyCodec::encode(preamble, &commits, linkify));
        Ok(())
    }

    fn show_config(&self) {
        println!("Base branch: {}", self.config.base_branch);
        println!("Default remote: {}", self.config.default_remote);
        match self.config.linkify {
            Some(linkify) => println!("Linkify: {linkify}"),
            None => println!("Linkify: per backend"),
        }
        println!();
        println!("[redaction]");
        println!("  redact: {:?}", self.config.redaction.redact);
        println!("  exempt: {:?}", self.config.redaction.exempt);
        println!("  secure_remotes: {:?}", self.config.redaction.secure_remotes);
    }

    fn is_interactive(&self) -> bool {
        !self.cli.defaults && std::io::stdout().is_terminal() && std::io::stdin().is_terminal()
    }

    // ─── Output Helpers ───

    fn print_status(&self, msg: &str) {
        eprintln!("{} {}", style("→").cyan(), msg);
    }

    fn print_info(&self, msg: &str) {
        eprintln!("{} {}", style("info:").cyan(), msg);
    }

    fn print_warning(&self, msg: &str) {
        eprintln!("{} {}", style("warning:").yellow().bold(), msg);
    }
}

fn load_commits(path: &Path) -> Result<Vec<CommitRecord>> {
    let json = std::fs::read_to_string(path)?;
    let inputs: Vec<CommitInput> = serde_json::from_str(&json)?;
    let commits = inputs
        .into_iter()
        .map(|c| CommitRecord::new(c.hash, c.message))
        .collect::<Result<Vec<_>>>()?;
    debug!(path = %path.display(), count = commits.len(), "commits loaded");
    Ok(commits)
}
