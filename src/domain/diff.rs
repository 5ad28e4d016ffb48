// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineKind {
    /// `diff --git`, `index`, mode lines, `---` and `+++`.
    FileHeader,
    HunkHeader,
    Context,
    Addition,
    Removal,
}

/// One line of a unified diff, tagged with the file it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: DiffLineKind,
    pub text: String,
    /// Destination path of the file; empty for lines before the first file.
    pub path: String,
    /// Line number in the destination file, for context and addition lines.
    pub line: Option<u32>,
}

impl DiffLine {
    pub fn is_file_header(&self) -> bool {
        self.kind == DiffLineKind::FileHeader
    }
}
