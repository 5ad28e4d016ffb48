// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

pub mod annotate;
pub mod backend;
pub mod body;
pub mod diff;
pub mod git;
pub mod issues;
pub mod linkify;
pub mod redaction;
pub mod remote;
