// File: main.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use clap::Parser;
use log::LevelFilter;
use std::time::Duration;

use teprobe::analyzer::{DifferentialAnalyzer, ProbeConfig};
use teprobe::cli::{display_json_report, display_report, resolve_target, Cli};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Warn,
    };
    simple_logger::SimpleLogger::new()
        .with_level(log_level)
        .init()?;

    if cli.no_color {
        colored::control::set_override(false);
    }

    let (host, port) = resolve_target(&cli.target)?;

    if !cli.json {
        println!("Testing {}:{} for header parsing behavior...", host, port);
    }

    let mut config = ProbeConfig::new(&host, port);
    config.timeout = Duration::from_secs(cli.timeout);

    let report = DifferentialAnalyzer::new(config).run().await;

    if cli.json {
        display_json_report(&report)?;
    } else {
        display_report(&report);
    }

    Ok(())
}
