// File: cli.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use clap::Parser;
use colored::*;
use url::Url;

use crate::analyzer::RunReport;

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = env!("CARGO_PKG_DESCRIPTION"),
)]
pub struct Cli {
    /// Target URL or bare hostname (e.g. example.com)
    pub target: String,

    #[arg(
        short = 't',
        long = "timeout",
        default_value_t = 10,
        help = "Per-operation timeout in seconds"
    )]
    pub timeout: u64,

    #[arg(long = "json", help = "Emit the report as JSON instead of text")]
    pub json: bool,

    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,

    #[arg(long = "no-color", help = "Disable colored output")]
    pub no_color: bool,
}

/// Resolves the positional target into `(host, port)`, defaulting to the
/// http scheme and port 80 when the argument is a bare hostname.
pub fn resolve_target(
    target: &str,
) -> Result<(String, u16), Box<dyn std::error::Error + Send + Sync>> {
    let normalized = if target.contains("://") {
        target.to_string()
    } else {
        format!("http://{}", target)
    };

    let parsed = Url::parse(&normalized)?;
    let host = parsed.host_str().ok_or("no host in target URL")?.to_string();
    let port = parsed.port_or_known_default().unwrap_or(80);

    Ok((host, port))
}

pub fn display_report(report: &RunReport) {
    for observation in &report.observations {
        println!();
        println!("Test: {}", observation.test_name);
        println!("Response time: {:.2}s", observation.response_time);
        println!("Connection header: {}", observation.connection);
        println!("Content-Length header: {}", observation.content_length);
    }

    if let Some(finding) = &report.finding {
        println!();
        println!(
            "{}",
            "[!] Potential header parsing inconsistency detected:"
                .bright_yellow()
                .bold()
        );
        println!(
            "- Server returns 'Connection: {}' with both headers",
            finding.both_headers_connection
        );
        println!(
            "- Server returns 'Connection: {}' with TE only",
            finding.te_only_connection
        );
        println!(
            "- Response timing differs by: {:.2}s",
            finding.response_time_delta
        );
    }
}

pub fn display_json_report(
    report: &RunReport,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_bare_hostname_defaults_to_port_80() {
        let (host, port) = resolve_target("example.com").unwrap();
        assert_eq!(host, "example.com");
        assert_eq!(port, 80);
    }

    #[test]
    fn test_resolve_url_with_explicit_port() {
        let (host, port) = resolve_target("http://example.com:8080/path").unwrap();
        assert_eq!(host, "example.com");
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_resolve_http_url_uses_known_default() {
        let (host, port) = resolve_target("http://probe.internal").unwrap();
        assert_eq!(host, "probe.internal");
        assert_eq!(port, 80);
    }

    #[test]
    fn test_resolve_rejects_garbage() {
        assert!(resolve_target("http://").is_err());
    }
}
