// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use console::style;
use tracing::{debug, info, warn};

use crate::domain::BranchState;
use crate::error::{Error, Result};

pub const REMOTE_QUESTION: &str = "Which remote would you like to make your pull request against?";

const CHOICE_STICKY: usize = 2;
const CHOICE_PREVAILING: usize = 3;

/// Source of the operator's answer when two remotes compete.
pub trait RemotePrompt {
    /// Shows `options` numbered from 1 and returns the raw number entered,
    /// or `None` when the answer is not a number.
    fn choose(&mut self, context: &str, question: &str, options: &[String]) -> Result<Option<usize>>;
}

/// Numbered menu on the terminal, answered by typing the option number.
pub struct TerminalPrompt;

impl RemotePrompt for TerminalPrompt {
    fn choose(&mut self, context: &str, question: &str, options: &[String]) -> Result<Option<usize>> {
        println!("{context}");
        println!("{question}:");
        for (i, option) in options.iter().enumerate() {
            println!("    {}) {option}", style(i + 1).bold());
        }
        let answer: String = dialoguer::Input::new()
            .with_prompt("")
            .allow_empty(true)
            .interact_text()?;
        Ok(answer.trim().parse().ok())
    }
}

pub struct RemoteSelector;

impl RemoteSelector {
    /// Picks the remote for `state.branch` given the remote the current
    /// issues call for. Passing no prompt means nobody can be asked.
    ///
    /// On success the chosen remote becomes the branch's sticky remote; the
    /// caller persists `state`. Cancellation is reported as
    /// [`Error::Cancelled`] or [`Error::AmbiguousRemote`].
    pub fn resolve(
        state: &mut BranchState,
        prevailing: &str,
        prompt: Option<&mut dyn RemotePrompt>,
    ) -> Result<String> {
        let Some(sticky) = state.sticky_remote.clone() else {
            debug!(branch = %state.branch, remote = prevailing, "no previous remote");
            state.sticky_remote = Some(prevailing.to_string());
            return Ok(prevailing.to_string());
        };

        if sticky == prevailing {
            return Ok(sticky);
        }

        let Some(prompt) = prompt else {
            warn!(
                branch = %state.branch,
                %sticky,
                prevailing,
                "remote conflict cannot be resolved without a prompt"
            );
            return Err(Error::AmbiguousRemote {
                branch: state.branch.clone(),
                sticky,
                prevailing: prevailing.to_string(),
            });
        };

        let context = format!(
            "'{}' was previously made against the '{sticky}' remote, but the prevailing issue indicates it should be made against '{prevailing}'",
            state.branch
        );
        let options = Self::options(&sticky, prevailing);
        let chosen = match prompt.choose(&context, REMOTE_QUESTION, &options)? {
            Some(CHOICE_STICKY) => sticky,
            Some(CHOICE_PREVAILING) => prevailing.to_string(),
            other => {
                info!(branch = %state.branch, answer = ?other, "remote selection cancelled");
                return Err(Error::Cancelled);
            }
        };

        info!(branch = %state.branch, remote = %chosen, "remote selected");
        state.sticky_remote = Some(chosen.clone());
        Ok(chosen)
    }

    pub fn options(sticky: &str, prevailing: &str) -> Vec<String> {
        vec![
            "[Cancel]".to_string(),
            format!("Use {sticky} (previous)"),
            format!("Use {prevailing} (new)"),
        ]
    }
}
