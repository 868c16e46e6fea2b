// File: transport.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use log::{debug, trace};
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::probes::TestCase;

const READ_BUFFER_SIZE: usize = 4096;

/// What one raw exchange produced: the (possibly truncated) response text
/// and the time from just before the send to just after the read returned.
#[derive(Debug, Clone)]
pub struct RawExchange {
    pub response_text: String,
    pub elapsed_secs: f64,
}

/// Raw single-shot TCP transport. One connection per test case, one write,
/// one bounded read, then the stream is dropped.
#[derive(Debug, Clone)]
pub struct ProbeTransport {
    host: String,
    port: u16,
    timeout: Duration,
}

impl ProbeTransport {
    pub fn new(host: &str, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.to_string(),
            port,
            timeout,
        }
    }

    /// Sends one test case and captures the server's immediate reaction.
    ///
    /// The read is deliberately a single `recv` into a fixed 4096-byte
    /// buffer. A response larger than that is truncated; the probe only
    /// needs the header block. Connect, write and read failures (refused,
    /// reset, timeout) are all recoverable per-case errors for the caller.
    pub async fn exchange(
        &self,
        test_case: &TestCase,
    ) -> Result<RawExchange, Box<dyn std::error::Error + Send + Sync>> {
        let addr = format!("{}:{}", self.host, self.port);

        let mut stream = match tokio::time::timeout(self.timeout, TcpStream::connect(&addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(format!("connection to {} failed: {}", addr, e).into()),
            Err(_) => return Err(format!("connection to {} timed out", addr).into()),
        };

        debug!("connected to {}, sending '{}' probe", addr, test_case.name);

        let start_time = Instant::now();
        stream.write_all(&test_case.request_bytes).await?;

        let mut buffer = [0u8; READ_BUFFER_SIZE];
        let bytes_read =
            match tokio::time::timeout(self.timeout, stream.read(&mut buffer)).await {
                Ok(Ok(n)) => n,
                Ok(Err(e)) => return Err(format!("read failed: {}", e).into()),
                Err(_) => {
                    return Err(format!(
                        "no response within {}s",
                        self.timeout.as_secs_f64()
                    )
                    .into())
                }
            };
        let elapsed_secs = start_time.elapsed().as_secs_f64();

        trace!(
            "'{}' probe read {} bytes in {:.2}s",
            test_case.name,
            bytes_read,
            elapsed_secs
        );

        // Lossy on purpose: a garbled response still carries timing and
        // whatever header lines survived the decode.
        let response_text = String::from_utf8_lossy(&buffer[..bytes_read]).to_string();

        Ok(RawExchange {
            response_text,
            elapsed_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probes::build_test_cases;
    use tokio::net::TcpListener;

    async fn canned_server(response: &'static [u8]) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buffer = [0u8; 4096];
                let _ = socket.read(&mut buffer).await;
                let _ = socket.write_all(response).await;
            }
        });
        port
    }

    #[tokio::test]
    async fn test_exchange_returns_response_and_timing() {
        let port =
            canned_server(b"HTTP/1.1 200 OK\r\nConnection: close\r\nContent-Length: 0\r\n\r\n")
                .await;
        let transport = ProbeTransport::new("127.0.0.1", port, Duration::from_secs(5));
        let case = &build_test_cases("127.0.0.1")[0];

        let exchange = transport.exchange(case).await.unwrap();
        assert!(exchange.response_text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(exchange.response_text.contains("Connection: close"));
        assert!(exchange.elapsed_secs >= 0.0);
    }

    #[tokio::test]
    async fn test_exchange_refused_connection_is_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let transport = ProbeTransport::new("127.0.0.1", port, Duration::from_secs(2));
        let case = &build_test_cases("127.0.0.1")[0];
        assert!(transport.exchange(case).await.is_err());
    }

    #[tokio::test]
    async fn test_exchange_read_timeout_is_error() {
        // Server accepts but never answers.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            if let Ok((socket, _)) = listener.accept().await {
                tokio::time::sleep(Duration::from_secs(30)).await;
                drop(socket);
            }
        });

        let transport = ProbeTransport::new("127.0.0.1", port, Duration::from_millis(200));
        let case = &build_test_cases("127.0.0.1")[0];
        let err = transport.exchange(case).await.unwrap_err();
        assert!(err.to_string().contains("no response"));
    }

    #[tokio::test]
    async fn test_exchange_decodes_invalid_utf8_lossily() {
        let port = canned_server(b"HTTP/1.1 200 OK\r\nServer: \xff\xfe\r\n\r\n").await;
        let transport = ProbeTransport::new("127.0.0.1", port, Duration::from_secs(5));
        let case = &build_test_cases("127.0.0.1")[1];

        let exchange = transport.exchange(case).await.unwrap();
        assert!(exchange.response_text.contains('\u{FFFD}'));
    }
}
