// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

#![no_main]

use libfuzzer_sys::fuzz_target;
use prsync::services::body::BodyCodec;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data)
        && let Ok(body) = BodyCodec::decode(text)
    {
        // Whatever decodes must survive a second trip unchanged.
        for linkify in [true, false] {
            let encoded = BodyCodec::encode_body(&body, linkify);
            if let Ok(again) = BodyCodec::decode(&encoded) {
                assert_eq!(again.commits.len(), body.commits.len());
            }
        }
    }
});
