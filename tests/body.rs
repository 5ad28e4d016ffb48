// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

mod helpers;

use helpers::{HASH_A, HASH_B, HASH_C, RULE, commit, empty_commit};
use prsync::Error;
use prsync::domain::{CommitRecord, PullRequestBody};
use prsync::services::body::BodyCodec;
use proptest::prelude::*;

// ─── Encoding (HTML) ─────────────────────────────────────────────────────────

#[test]
fn encode_single_linked() {
    let commits = [commit(
        HASH_A,
        "[scoping] Bug to fix\nhttps://bugs.webkit.org/1234\nrdar://1234\n\nReviewed by Tim Contributor.\n",
    )];
    let expected = format!(
        "#### {HASH_A}\n<pre>\n[scoping] Bug to fix\n\
         <a href=\"https://bugs.webkit.org/1234\">https://bugs.webkit.org/1234</a>\n\
         <a href=\"https://rdar.apple.com/1234\">rdar://1234</a>\n\n\
         Reviewed by Tim Contributor.\n</pre>"
    );
    assert_eq!(BodyCodec::encode(None, &commits, true), expected);
}

#[test]
fn encode_keeps_brackets_outside_anchor() {
    let commits = [commit(HASH_A, "[scoping] Bug to fix\n(rdar://1234)\n")];
    let body = BodyCodec::encode(None, &commits, true);
    assert!(body.contains("(<a href=\"https://rdar.apple.com/1234\">rdar://1234</a>)\n</pre>"));
}

#[test]
fn encode_multiple_linked() {
    let commits = [
        commit(
            HASH_A,
            "[scoping] Bug to fix (Part 3)\nhttps://bugs.webkit.org/1234\n\nReviewed by Tim Contributor.\n",
        ),
        commit(
            HASH_B,
            "[scoping] Bug to fix (Part 2)\n<http://bugs.webkit.org/1234>\n\nReviewed by Tim Contributor.\n",
        ),
        commit(
            HASH_C,
            "[scoping] Bug to fix (Part 1)\n<rdar:///1234>\n\nReviewed by Tim Contributor.\n",
        ),
    ];
    let expected = format!(
        "#### {HASH_A}\n<pre>\n[scoping] Bug to fix (Part 3)\n\
         <a href=\"https://bugs.webkit.org/1234\">https://bugs.webkit.org/1234</a>\n\n\
         Reviewed by Tim Contributor.\n</pre>\n{RULE}\n\
         #### {HASH_B}\n<pre>\n[scoping] Bug to fix (Part 2)\n\
         &lt;<a href=\"http://bugs.webkit.org/1234\">http://bugs.webkit.org/1234</a>&gt;\n\n\
         Reviewed by Tim Contributor.\n</pre>\n{RULE}\n\
         #### {HASH_C}\n<pre>\n[scoping] Bug to fix (Part 1)\n\
         &lt;<a href=\"https://rdar.apple.com//1234\">rdar:///1234</a>&gt;\n\n\
         Reviewed by Tim Contributor.\n</pre>"
    );
    assert_eq!(BodyCodec::encode(None, &commits, true), expected);
}

#[test]
fn encode_empty_message() {
    let body = BodyCodec::encode(None, &[empty_commit(HASH_A)], true);
    assert_eq!(body, format!("#### {HASH_A}\n<pre>\n???\n</pre>"));
}

#[test]
fn encode_with_preamble() {
    let commits = [commit(HASH_A, "[scoping] Bug to fix\n\nReviewed by Tim Contributor.\n")];
    let expected = format!(
        "Comment body\n\n{RULE}\n#### {HASH_A}\n<pre>\n[scoping] Bug to fix\n\n\
         Reviewed by Tim Contributor.\n</pre>"
    );
    assert_eq!(BodyCodec::encode(Some("Comment body"), &commits, true), expected);
}

#[test]
fn encode_without_commits_is_preamble_only() {
    let body = BodyCodec::encode(Some("Nothing yet"), &[], true);
    assert_eq!(body, format!("Nothing yet\n\n{RULE}\n"));
}

// ─── Encoding (Markdown) ─────────────────────────────────────────────────────

#[test]
fn encode_single_fenced() {
    let commits = [commit(HASH_A, "[scoping] Bug to fix\n\nReviewed by Tim Contributor.\n")];
    let expected =
        format!("#### {HASH_A}\n```\n[scoping] Bug to fix\n\nReviewed by Tim Contributor.\n```");
    assert_eq!(BodyCodec::encode(None, &commits, false), expected);
}

#[test]
fn encode_multiple_fenced_keeps_text_verbatim() {
    let commits = [
        commit(
            HASH_A,
            "[scoping] Bug to fix (Part 2)\nhttps://bugs.webkit.org/1234\n\nReviewed by Tim Contributor.\n",
        ),
        commit(
            HASH_B,
            "[scoping] Bug to fix (Part 1)\n<http://bugs.webkit.org/1234>\n\nReviewed by Tim Contributor.\n",
        ),
    ];
    let expected = format!(
        "#### {HASH_A}\n```\n[scoping] Bug to fix (Part 2)\nhttps://bugs.webkit.org/1234\n\n\
         Reviewed by Tim Contributor.\n```\n{RULE}\n\
         #### {HASH_B}\n```\n[scoping] Bug to fix (Part 1)\n<http://bugs.webkit.org/1234>\n\n\
         Reviewed by Tim Contributor.\n```"
    );
    assert_eq!(BodyCodec::encode(None, &commits, false), expected);
}

#[test]
fn fence_outgrows_backticks_in_message() {
    let commits = [commit(HASH_A, "Use a block:\n```\ncode\n```\n")];
    let body = BodyCodec::encode(None, &commits, false);
    assert!(body.starts_with(&format!("#### {HASH_A}\n````\n")));
    assert!(body.ends_with("\n````"));

    let decoded = BodyCodec::decode(&body).unwrap();
    assert_eq!(
        decoded.commits[0].message.as_deref(),
        Some("Use a block:\n```\ncode\n```")
    );
}

// ─── Decoding ────────────────────────────────────────────────────────────────

#[test]
fn decode_single_fenced() {
    let text = format!(
        "#### {HASH_A}\n```\n[scoping] Bug to fix\n\nReviewed by Tim Contributor.\n```"
    );
    let body = BodyCodec::decode(&text).unwrap();
    assert!(body.preamble.is_none());
    assert_eq!(body.commits.len(), 1);
    assert_eq!(body.commits[0].hash, HASH_A);
    assert_eq!(
        body.commits[0].message.as_deref(),
        Some("[scoping] Bug to fix\n\nReviewed by Tim Contributor.")
    );
}

#[test]
fn decode_ignores_status_bubble_after_fence() {
    let text = format!(
        "#### {HASH_A}\n```\n[scoping] Bug to fix\n\nReviewed by Tim Contributor.\n\
         ```<!--EWS-Status-Bubble-Start-->\n...\n<!--EWS-Status-Bubble-End-->"
    );
    let body = BodyCodec::decode(&text).unwrap();
    assert_eq!(body.commits.len(), 1);
    assert_eq!(
        body.commits[0].message.as_deref(),
        Some("[scoping] Bug to fix\n\nReviewed by Tim Contributor.")
    );
}

#[test]
fn decode_ignores_status_bubble_after_pre() {
    let text = format!(
        "Comment body\n\n{RULE}\n#### {HASH_A}\n<pre>\n[scoping] Bug to fix\n\n\
         Reviewed by Tim Contributor.\n</pre><!--EWS-Status-Bubble-Start-->\n...\n\
         <!--EWS-Status-Bubble-End-->"
    );
    let body = BodyCodec::decode(&text).unwrap();
    assert_eq!(body.preamble.as_deref(), Some("Comment body"));
    assert_eq!(body.commits.len(), 1);
    assert_eq!(
        body.commits[0].message.as_deref(),
        Some("[scoping] Bug to fix\n\nReviewed by Tim Contributor.")
    );
}

#[test]
fn decode_multiple_fenced() {
    let text = format!(
        "#### {HASH_A}\n```\n[scoping] Bug to fix (Part 2)\n\nReviewed by Tim Contributor.\n```\n\
         {RULE}\n#### {HASH_B}\n```\n[scoping] Bug to fix (Part 1)\n\nReviewed by Tim Contributor.\n```"
    );
    let body = BodyCodec::decode(&text).unwrap();
    let hashes: Vec<&str> = body.commits.iter().map(|c| c.hash.as_str()).collect();
    assert_eq!(hashes, [HASH_A, HASH_B]);
    assert_eq!(
        body.commits[1].message.as_deref(),
        Some("[scoping] Bug to fix (Part 1)\n\nReviewed by Tim Contributor.")
    );
}

#[test]
fn decode_html_strips_anchors_and_entities() {
    let text = format!(
        "#### {HASH_A}\n<pre>\n[scoping] Bug to fix (Part 2)\n\
         <a href=\"https://bugs.webkit.org/1234\">https://bugs.webkit.org/1234</a>\n\n\
         Reviewed by Tim Contributor.\n</pre>\n{RULE}\n\
         #### {HASH_B}\n<pre>\n[scoping] Bug to fix (Part 1)\n\
         &lt;<a href=\"http://bugs.webkit.org/1234\">http://bugs.webkit.org/1234</a>&gt;\n\n\
         Reviewed by Tim Contributor.\n</pre>"
    );
    let body = BodyCodec::decode(&text).unwrap();
    assert_eq!(
        body.commits[0].message.as_deref(),
        Some("[scoping] Bug to fix (Part 2)\nhttps://bugs.webkit.org/1234\n\nReviewed by Tim Contributor.")
    );
    assert_eq!(
        body.commits[1].message.as_deref(),
        Some("[scoping] Bug to fix (Part 1)\n<http://bugs.webkit.org/1234>\n\nReviewed by Tim Contributor.")
    );
}

#[test]
fn decode_placeholder_as_missing_message() {
    for text in [
        format!("#### {HASH_A}\n```\n???\n```"),
        format!("#### {HASH_A}\n<pre>\n???\n</pre>"),
    ] {
        let body = BodyCodec::decode(&text).unwrap();
        assert_eq!(body.commits.len(), 1);
        assert_eq!(body.commits[0].message, None);
    }
}

#[test]
fn decode_preamble_and_links() {
    let text = format!(
        "Comment body\n\n{RULE}\n#### {HASH_A}\n<pre>\n[scoping] Bug to fix\n\
         <a href=\"https://bugs.webkit.org/1234\">https://bugs.webkit.org/1234</a>\n\
         <a href=\"https://rdar.apple.com/1234\">rdar://1234</a>\n\n\
         Reviewed by Tim Contributor.\n</pre>"
    );
    let body = BodyCodec::decode(&text).unwrap();
    assert_eq!(body.preamble.as_deref(), Some("Comment body"));
    assert_eq!(
        body.commits[0].message.as_deref(),
        Some("[scoping] Bug to fix\nhttps://bugs.webkit.org/1234\nrdar://1234\n\nReviewed by Tim Contributor.")
    );
}

#[test]
fn decode_accepts_crlf() {
    let text = format!("#### {HASH_A}\r\n```\r\nFix it\r\n```\r\n");
    let body = BodyCodec::decode(&text).unwrap();
    assert_eq!(body.commits[0].message.as_deref(), Some("Fix it"));
}

#[test]
fn decode_keeps_crlf_inside_messages() {
    let commits = [commit(HASH_A, "line one\r\nline two")];
    for linkify in [true, false] {
        let decoded = BodyCodec::decode(&BodyCodec::encode(None, &commits, linkify)).unwrap();
        assert_eq!(
            decoded.commits[0].message.as_deref(),
            Some("line one\r\nline two"),
            "linkify = {linkify}"
        );
    }
}

#[test]
fn decode_ignores_status_bubble_on_next_line() {
    let text = format!(
        "#### {HASH_A}\n```\nFix it\n```\n<!--EWS-Status-Bubble-Start-->\n...\n<!--EWS-Status-Bubble-End-->"
    );
    let body = BodyCodec::decode(&text).unwrap();
    assert_eq!(body.commits, vec![commit(HASH_A, "Fix it")]);
}

#[test]
fn decode_ignores_status_bubble_after_blank_line_and_several_commits() {
    let text = format!(
        "#### {HASH_A}\n<pre>\nTwo\n</pre>\n{RULE}\n#### {HASH_B}\n<pre>\nOne\n</pre>\n\n\
         <!--EWS-Status-Bubble-Start-->\n<table>...</table>\n<!--EWS-Status-Bubble-End-->\n"
    );
    let body = BodyCodec::decode(&text).unwrap();
    assert_eq!(body.commits, vec![commit(HASH_A, "Two"), commit(HASH_B, "One")]);
}

#[test]
fn decode_ignores_unterminated_status_bubble() {
    let text = format!("#### {HASH_A}\n```\nFix it\n```\n<!--EWS-Status-Bubble-Start-->\npending");
    let body = BodyCodec::decode(&text).unwrap();
    assert_eq!(body.commits.len(), 1);
}

#[test]
fn preamble_may_quote_a_rule_and_header() {
    let body = PullRequestBody {
        preamble: Some(format!("Note\n\n{RULE}\n#### quoted")),
        commits: vec![commit(HASH_A, "Fix it")],
    };
    for linkify in [true, false] {
        let text = BodyCodec::encode_body(&body, linkify);
        assert_eq!(BodyCodec::decode(&text).unwrap(), body, "linkify = {linkify}");
    }
}

#[test]
fn decode_rejects_text_without_commits() {
    let err = BodyCodec::decode("Just a description").unwrap_err();
    assert!(matches!(err, Error::MalformedBody(_)));
}

#[test]
fn decode_rejects_unterminated_block() {
    let err = BodyCodec::decode(&format!("#### {HASH_A}\n<pre>\nFix it")).unwrap_err();
    assert!(matches!(err, Error::MalformedBody(_)));
}

#[test]
fn decode_rejects_bad_hash() {
    let err = BodyCodec::decode("#### not-a-hash\n```\nFix it\n```").unwrap_err();
    assert!(matches!(err, Error::MalformedBody(_)));
}

#[test]
fn decode_rejects_missing_rule_between_sections() {
    let text = format!("#### {HASH_A}\n```\nOne\n```\n#### {HASH_B}\n```\nTwo\n```");
    assert!(BodyCodec::decode(&text).is_err());
}

#[test]
fn decode_error_message() {
    let err = BodyCodec::decode("Just a description").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Malformed pull request body: no '#### <hash>' commit header found");
}

// ─── Round trip ──────────────────────────────────────────────────────────────

#[test]
fn encode_body_round_trips_through_decode() {
    let body = PullRequestBody {
        preamble: Some("Fixes a crash & a leak.\n\nSee <rdar://problem/99>.".to_string()),
        commits: vec![
            commit(HASH_A, "Fix the crash\nhttps://bugs.webkit.org/show_bug.cgi?id=1&x=2"),
            empty_commit(HASH_B),
        ],
    };
    for linkify in [true, false] {
        let text = BodyCodec::encode_body(&body, linkify);
        assert_eq!(BodyCodec::decode(&text).unwrap(), body, "linkify = {linkify}");
    }
}

fn message_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-z0-9 <>&`.:/()\\[\\]#\r\n-]{0,60}")
        .prop_map(|m| m.map(|m| m.trim_end_matches('\n').to_string()))
        .prop_filter("placeholder collapses to None", |m| m.as_deref() != Some("???"))
}

fn commit_strategy() -> impl Strategy<Value = CommitRecord> {
    ("[0-9a-f]{40}", message_strategy())
        .prop_map(|(hash, message)| CommitRecord::new(hash, message).unwrap())
}

proptest! {
    #[test]
    fn round_trip_preserves_commits(
        commits in prop::collection::vec(commit_strategy(), 1..5),
        linkify in any::<bool>(),
    ) {
        let text = BodyCodec::encode(None, &commits, linkify);
        let decoded = BodyCodec::decode(&text).unwrap();
        prop_assert!(decoded.preamble.is_none());
        prop_assert_eq!(decoded.commits, commits);
    }

    #[test]
    fn round_trip_preserves_preamble(
        preamble in "[A-Za-z .,]{0,40}",
        commits in prop::collection::vec(commit_strategy(), 1..3),
    ) {
        let text = BodyCodec::encode(Some(&preamble), &commits, true);
        let decoded = BodyCodec::decode(&text).unwrap();
        prop_assert_eq!(decoded.preamble, Some(preamble));
        prop_assert_eq!(decoded.commits.len(), commits.len());
    }

    #[test]
    fn decode_never_panics(input in "\\PC{0,300}") {
        let _ = BodyCodec::decode(&input);
    }
}
