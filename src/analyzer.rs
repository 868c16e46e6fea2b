// File: analyzer.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::Serialize;
use std::time::Duration;

use crate::headers::HeaderMap;
use crate::probes::{build_test_cases, BOTH_HEADERS, TE_ONLY};
use crate::transport::ProbeTransport;

pub const NOT_SPECIFIED: &str = "Not specified";

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
    pub case_delay: Duration,
}

impl ProbeConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
            timeout: Duration::from_secs(10),
            case_delay: Duration::from_secs(1),
        }
    }
}

/// What one completed probe case looked like from the outside. A case whose
/// transport step fails produces no Observation at all.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Observation {
    pub test_name: String,
    pub response_time: f64,
    pub connection: String,
    pub content_length: String,
}

/// The one inconsistency pattern this tool flags: the server closes the
/// connection when both framing headers are present but keeps it alive on
/// the Transfer-Encoding-only variant. The reverse direction is not flagged.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Finding {
    pub both_headers_connection: String,
    pub te_only_connection: String,
    pub response_time_delta: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub target: String,
    pub completed_at: DateTime<Utc>,
    pub observations: Vec<Observation>,
    pub finding: Option<Finding>,
}

/// Builds an Observation from a decoded response, applying the
/// `"Not specified"` sentinel for headers the server did not send.
pub fn observe(test_name: &str, response_text: &str, response_time: f64) -> Observation {
    let headers = HeaderMap::parse(response_text);
    Observation {
        test_name: test_name.to_string(),
        response_time,
        connection: headers
            .get("connection")
            .unwrap_or(NOT_SPECIFIED)
            .to_string(),
        content_length: headers
            .get("content-length")
            .unwrap_or(NOT_SPECIFIED)
            .to_string(),
    }
}

/// Applies the inconsistency rule to a finished run. Pure over the
/// Observation list; if either named case is missing the check is skipped.
pub fn evaluate(observations: &[Observation]) -> Option<Finding> {
    let both = observations.iter().find(|o| o.test_name == BOTH_HEADERS)?;
    let te_only = observations.iter().find(|o| o.test_name == TE_ONLY)?;

    if both.connection.eq_ignore_ascii_case("close")
        && te_only.connection.eq_ignore_ascii_case("keep-alive")
    {
        Some(Finding {
            both_headers_connection: both.connection.clone(),
            te_only_connection: te_only.connection.clone(),
            response_time_delta: (both.response_time - te_only.response_time).abs(),
        })
    } else {
        None
    }
}

/// Runs the full probe set against one target, strictly sequentially, and
/// applies the inconsistency rule to whatever cases completed.
pub struct DifferentialAnalyzer {
    config: ProbeConfig,
    transport: ProbeTransport,
}

impl DifferentialAnalyzer {
    pub fn new(config: ProbeConfig) -> Self {
        let transport = ProbeTransport::new(&config.host, config.port, config.timeout);
        Self { config, transport }
    }

    pub async fn run(&self) -> RunReport {
        let mut observations = Vec::new();

        for test_case in build_test_cases(&self.config.host) {
            debug!("running '{}' probe case", test_case.name);
            match self.transport.exchange(&test_case).await {
                Ok(exchange) => {
                    observations.push(observe(
                        test_case.name,
                        &exchange.response_text,
                        exchange.elapsed_secs,
                    ));
                }
                Err(e) => warn!("'{}' probe failed: {}", test_case.name, e),
            }
            // Fixed politeness pause after every case, success or not.
            tokio::time::sleep(self.config.case_delay).await;
        }

        let finding = evaluate(&observations);

        RunReport {
            target: format!("{}:{}", self.config.host, self.config.port),
            completed_at: Utc::now(),
            observations,
            finding,
        }
    }
}
