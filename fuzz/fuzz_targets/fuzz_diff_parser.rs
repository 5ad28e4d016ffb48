// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

#![no_main]

use libfuzzer_sys::fuzz_target;
use prsync::domain::ThreadMap;
use prsync::services::annotate::{DiffAnnotator, NestingMode};
use prsync::services::diff::parse_unified_diff;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let lines = parse_unified_diff(text);
        let out = DiffAnnotator::annotate(&lines, &ThreadMap::new(), NestingMode::OneLevel);
        assert_eq!(out.len(), lines.len());
    }
});
