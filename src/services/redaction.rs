// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::IssueReference;
use crate::error::{Error, Result};
use crate::services::issues::tracker_name;

/// What a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RuleScope {
    MatchAll,
    Component(String),
    Project(String),
}

impl RuleScope {
    pub fn matches(&self, reference: &IssueReference) -> bool {
        match self {
            Self::MatchAll => true,
            Self::Component(name) => reference.component.as_deref() == Some(name.as_str()),
            Self::Project(name) => reference.project.as_deref() == Some(name.as_str()),
        }
    }
}

impl FromStr for RuleScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == ".*" || s == "*" {
            return Ok(Self::MatchAll);
        }
        match s.split_once(':') {
            Some(("component", name)) if !name.is_empty() => Ok(Self::Component(name.to_string())),
            Some(("project", name)) if !name.is_empty() => Ok(Self::Project(name.to_string())),
            _ => Err(Error::Config(format!(
                "invalid redaction scope '{s}', expected '.*', 'component:<name>' or 'project:<name>'"
            ))),
        }
    }
}

impl TryFrom<String> for RuleScope {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<RuleScope> for String {
    fn from(scope: RuleScope) -> Self {
        scope.to_string()
    }
}

impl std::fmt::Display for RuleScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MatchAll => write!(f, ".*"),
            Self::Component(name) => write!(f, "component:{name}"),
            Self::Project(name) => write!(f, "project:{name}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Redact,
    Exempt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionRule {
    pub scope: RuleScope,
    pub polarity: Polarity,
}

impl RedactionRule {
    pub fn redact(scope: RuleScope) -> Self {
        Self {
            scope,
            polarity: Polarity::Redact,
        }
    }

    pub fn exempt(scope: RuleScope) -> Self {
        Self {
            scope,
            polarity: Polarity::Exempt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Allow,
    Block,
}

/// Outcome for a single reference; the scopes are the first matching rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceVerdict {
    pub reference: IssueReference,
    pub redacted_by: Option<RuleScope>,
    pub exempted_by: Option<RuleScope>,
}

impl ReferenceVerdict {
    pub fn redacted(&self) -> bool {
        self.redacted_by.is_some()
    }

    pub fn exempt(&self) -> bool {
        self.exempted_by.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedactionReport {
    pub verdict: Verdict,
    pub references: Vec<ReferenceVerdict>,
    /// Reference that settled the verdict: the first exempt one, otherwise
    /// the first redacted one.
    pub decided_by: Option<IssueReference>,
    /// Rationale for the verdict, in reporting order.
    pub notes: Vec<String>,
    /// Redactions waived by an exemption.
    pub warnings: Vec<String>,
}

impl RedactionReport {
    pub fn is_blocked(&self) -> bool {
        self.verdict == Verdict::Block
    }
}

/// Rule set of one issue tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedactionPolicy {
    redact: Vec<RedactionRule>,
    exempt: Vec<RedactionRule>,
}

impl RedactionPolicy {
    pub fn new(rules: impl IntoIterator<Item = RedactionRule>) -> Self {
        let (redact, exempt): (Vec<_>, Vec<_>) = rules
            .into_iter()
            .partition(|rule| rule.polarity == Polarity::Redact);
        Self { redact, exempt }
    }

    pub fn is_empty(&self) -> bool {
        self.redact.is_empty() && self.exempt.is_empty()
    }

    pub fn evaluate(&self, references: &[IssueReference]) -> RedactionReport {
        evaluate(references, &self.redact, &self.exempt)
    }
}

fn first_match(rules: &[RedactionRule], reference: &IssueReference) -> Option<RuleScope> {
    rules
        .iter()
        .find(|rule| rule.scope.matches(reference))
        .map(|rule| rule.scope.clone())
}

/// Decides whether the change must go through a restricted remote.
///
/// Intentional: one exempt reference waives redaction for the whole change,
/// including other references that are redacted on their own. Do not turn
/// this into a per-reference gate; callers rely on the global waiver.
pub fn evaluate(
    references: &[IssueReference],
    redact_rules: &[RedactionRule],
    exempt_rules: &[RedactionRule],
) -> RedactionReport {
    let verdicts: Vec<ReferenceVerdict> = references
        .iter()
        .map(|reference| ReferenceVerdict {
            reference: reference.clone(),
            redacted_by: first_match(redact_rules, reference),
            exempted_by: first_match(exempt_rules, reference),
        })
        .collect();

    let mut notes = Vec::new();
    let mut warnings = Vec::new();

    let exempt = verdicts.iter().find(|v| v.exempt());
    let redacted = verdicts.iter().find(|v| v.redacted());
    let (verdict, decided_by) = match (exempt, redacted) {
        (Some(current), _) => {
            if let Some(scope) = &current.exempted_by {
                info!(reference = %current.reference, %scope, "redaction exemption matched");
                notes.push(format!(
                    "{} matches '{scope}' and is exempt from redaction",
                    current.reference
                ));
            }
            for other in verdicts
                .iter()
                .filter(|o| o.redacted() && o.reference != current.reference)
            {
                warn!(
                    exempt = %current.reference,
                    redacted = %other.reference,
                    "redaction exemption overrides redaction"
                );
                warnings.push(format!(
                    "Redaction exemption overrides the redaction of {}",
                    other.reference
                ));
                warnings.extend(redacted_note(other));
            }
            (Verdict::Allow, Some(current.reference.clone()))
        }
        (None, Some(current)) => {
            info!(reference = %current.reference, "redaction rule matched");
            notes.extend(redacted_note(current));
            (Verdict::Block, Some(current.reference.clone()))
        }
        (None, None) => (Verdict::Allow, None),
    };

    RedactionReport {
        verdict,
        references: verdicts,
        decided_by,
        notes,
        warnings,
    }
}

fn redacted_note(current: &ReferenceVerdict) -> Option<String> {
    let scope = current.redacted_by.as_ref()?;
    let tracker = tracker_name(&current.reference.link);
    Some(match (scope, tracker) {
        (RuleScope::MatchAll, Some(tracker)) => {
            format!("{} is a {tracker} and is thus redacted", current.reference)
        }
        _ => format!("{} matches '{scope}' and is thus redacted", current.reference),
    })
}
