// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use prsync::domain::CommitRecord;

#[allow(dead_code)]
pub const HASH_A: &str = "11aa76f9fc380e9fe06157154f32b304e8dc4749";
#[allow(dead_code)]
pub const HASH_B: &str = "53ea230fcedbce327eb1c45a6ab65a88de864505";
#[allow(dead_code)]
pub const HASH_C: &str = "ccc39e76f938a1685e388991fc3127a85d0be0f0";

/// 70 dashes, spelled out so tests don't lean on the crate's constant.
#[allow(dead_code)]
pub const RULE: &str = "----------------------------------------------------------------------";

/// Create a CommitRecord with a message
#[allow(dead_code)]
pub fn commit(hash: &str, message: &str) -> CommitRecord {
    CommitRecord::new(hash, Some(message.to_string())).unwrap()
}

/// Create a CommitRecord whose message is unknown
#[allow(dead_code)]
pub fn empty_commit(hash: &str) -> CommitRecord {
    CommitRecord::new(hash, None).unwrap()
}

/// Diff of a single new ChangeLog entry, as GitHub serves it
#[allow(dead_code)]
pub fn changelog_diff_git() -> String {
    [
        "diff --git a/ChangeLog b/ChangeLog",
        "--- a/ChangeLog",
        "+++ b/ChangeLog",
        "@@ -1,0 +1,0 @@",
        "+Example Change",
        "+https://bugs.webkit.org/show_bug.cgi?id=1234",
        "+",
        "+Reviewed by NOBODY (OOPS!).",
        "+* Source/file.cpp:",
    ]
    .join("\n")
}

/// The same diff without the `diff --git` line, as Bitbucket serves it
#[allow(dead_code)]
pub fn changelog_diff_plain() -> String {
    [
        "--- a/ChangeLog",
        "+++ b/ChangeLog",
        "@@ -1,0 +1,0 @@",
        "+Example Change",
        "+https://bugs.webkit.org/show_bug.cgi?id=1234",
        "+",
        "+Reviewed by NOBODY (OOPS!).",
        "+* Source/file.cpp:",
    ]
    .join("\n")
}
