// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

mod branch;
mod comment;
mod commit;
mod diff;
mod issue;

pub use branch::*;
pub use comment::*;
pub use commit::*;
pub use diff::*;
pub use issue::*;
