// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Credential scrubbing for query log lines

use once_cell::sync::Lazy;
use regex::Regex;

static SECRET_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^(CREATE|ALTER)\s+USER.+password\s*=\s*'(?P<secret>[^']+)'",
        r"(?i)^COPY.+FROM.+WITH.+s3_access_key\s*=\s*'(?P<secret>[^']+)'",
        r"(?i)^COPY.+FROM.+WITH.+s3_secret_key\s*=\s*'(?P<secret>[^']+)'",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("secret pattern must compile"))
    .collect()
});

/// Mask passwords and object-store keys before a query string is logged
pub fn scrub_sensitive(query: &str) -> String {
    let mut result = query.to_string();
    for pattern in SECRET_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(&result) {
            if let Some(secret) = captures.name("secret") {
                let range = secret.range();
                result.replace_range(range, "XXXXXXXX");
            }
        }
    }
    result
}
