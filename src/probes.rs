// File: probes.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

pub const BOTH_HEADERS: &str = "Both Headers";
pub const TE_ONLY: &str = "TE Only";

/// One ambiguous request payload, built once and consumed by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: &'static str,
    pub request_bytes: Vec<u8>,
}

/// Builds the fixed, ordered probe set for a target host.
///
/// Both requests declare a chunked body whose only content is the terminal
/// chunk; the first additionally claims `Content-Length: 5`. The conflict
/// between the two length declarations is the point of the probe, so the
/// byte layout here must not be altered.
pub fn build_test_cases(host: &str) -> Vec<TestCase> {
    let both = format!(
        "POST / HTTP/1.1\r\n\
         Host: {host}\r\n\
         Content-Length: 5\r\n\
         Transfer-Encoding: chunked\r\n\
         Connection: keep-alive\r\n\r\n\
         0\r\n\r\n"
    );

    let te_only = format!(
        "POST / HTTP/1.1\r\n\
         Host: {host}\r\n\
         Transfer-Encoding: chunked\r\n\
         Connection: keep-alive\r\n\r\n\
         0\r\n\r\n"
    );

    vec![
        TestCase {
            name: BOTH_HEADERS,
            request_bytes: both.into_bytes(),
        },
        TestCase {
            name: TE_ONLY,
            request_bytes: te_only.into_bytes(),
        },
    ]
}
