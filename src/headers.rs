// File: headers.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use std::collections::HashMap;

/// Case-insensitive, first-write-wins view of a raw response header block.
///
/// This is a best-effort parser for comparison purposes only: it keys on the
/// literal `": "` separator, skips the status line and anything malformed,
/// and does not handle folding or repeated-header semantics. It never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: HashMap<String, String>,
}

impl HeaderMap {
    /// Extracts headers from decoded response text.
    pub fn parse(response_text: &str) -> Self {
        let mut entries = HashMap::new();
        for line in response_text.split("\r\n") {
            if let Some((name, value)) = line.split_once(": ") {
                entries
                    .entry(name.to_lowercase())
                    .or_insert_with(|| value.to_string());
            }
        }
        Self { entries }
    }

    /// Looks up a header by name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
