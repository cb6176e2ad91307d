// Copyright (C) 2026 The me4storage developers
//
// Permission is hereby granted, free of charge, to any
// person obtaining a copy of this software and associated
// documentation files (the "Software"), to deal in the
// Software without restriction, including without
// limitation the rights to use, copy, modify, merge,
// publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software
// is furnished to do so, subject to the following
// conditions:
//
// The above copyright notice and this permission notice
// shall be included in all copies or substantial portions
// of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF
// ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED
// TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A
// PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT
// SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY
// CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR
// IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
// DEALINGS IN THE SOFTWARE.

use std::thread::sleep;
use std::time::Duration;

use reqwest::blocking;
use tracing::{debug, warn};

use super::error::*;

/// HTTP statuses worth another attempt.
pub const RETRY_STATUS: [u16; 5] = [429, 500, 502, 503, 504];
const BACKOFF_MAX: Duration = Duration::from_secs(120);

/// Raw reply of a single HTTP exchange.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One blocking HTTP GET. Implementations must not retry on their own.
///
/// Connection and TLS failures are reported as
/// [`MeError::NetworkError`][1], expired timeouts as [`MeError::TimeOut`][2];
/// any HTTP status, including 4xx/5xx, is an `Ok(HttpReply)`.
///
/// [1]: enum.MeError.html#variant.NetworkError
/// [2]: enum.MeError.html#variant.TimeOut
pub trait Transport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpReply>;
}

/// `reqwest` backed transport.
pub struct HttpTransport {
    client: blocking::Client,
}

impl HttpTransport {
    /// `verify == false` accepts any server certificate for this client only.
    pub fn new(verify: bool, timeout: Duration) -> Result<HttpTransport> {
        let client = blocking::Client::builder()
            .danger_accept_invalid_certs(!verify)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                MeError::LibBug(format!("Failed to build HTTP client: {}", e))
            })?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpReply> {
        let mut req = self.client.get(url);
        for &(name, value) in headers {
            req = req.header(name, value);
        }
        let resp = req.send()?;
        let status = resp.status().as_u16();
        debug!("Headers: {:?}", resp.headers());
        let body = resp.text()?;
        Ok(HttpReply { status, body })
    }
}

/// Bounded retry with exponential backoff.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub retries: u32,
    pub backoff_factor: Duration,
}

impl RetryPolicy {
    pub fn new(retries: u32, backoff_factor: Duration) -> RetryPolicy {
        RetryPolicy {
            retries,
            backoff_factor,
        }
    }

    /// Single attempt.
    pub fn none() -> RetryPolicy {
        RetryPolicy::new(0, Duration::from_secs(0))
    }

    /// Sleep before the next attempt once `errors` attempts have failed.
    /// Zero after the first failure, then `factor * 2^(errors - 1)`.
    pub fn backoff(&self, errors: u32) -> Duration {
        if errors <= 1 {
            return Duration::from_secs(0);
        }
        let exp = 2u32.saturating_pow(errors - 1);
        let backoff = self.backoff_factor.saturating_mul(exp);
        if backoff > BACKOFF_MAX {
            BACKOFF_MAX
        } else {
            backoff
        }
    }
}

fn is_retryable_error(e: &MeError) -> bool {
    match *e {
        MeError::NetworkError(_) | MeError::TimeOut(_) => true,
        _ => false,
    }
}

/// GET `url`, retrying connection failures and [`RETRY_STATUS`][1] replies
/// up to `policy.retries` times. A non-success reply left after that is
/// [`MeError::HttpStatus`][2].
///
/// [1]: constant.RETRY_STATUS.html
/// [2]: enum.MeError.html#variant.HttpStatus
pub fn get_with_retry<T: Transport + ?Sized>(
    tp: &T,
    url: &str,
    headers: &[(&str, &str)],
    policy: &RetryPolicy,
) -> Result<HttpReply> {
    let mut errors: u32 = 0;
    loop {
        let can_retry = errors < policy.retries;
        match tp.get(url, headers) {
            Ok(reply) => {
                if reply.is_success() {
                    return Ok(reply);
                }
                if !(can_retry && RETRY_STATUS.contains(&reply.status)) {
                    return Err(MeError::HttpStatus {
                        status: reply.status,
                        body: reply.body,
                    });
                }
                warn!(
                    "GET {} returned HTTP {}, retrying ({}/{})",
                    url,
                    reply.status,
                    errors + 1,
                    policy.retries
                );
            }
            Err(e) => {
                if !(can_retry && is_retryable_error(&e)) {
                    return Err(e);
                }
                warn!(
                    "GET {} failed: {}, retrying ({}/{})",
                    url,
                    e,
                    errors + 1,
                    policy.retries
                );
            }
        }
        errors += 1;
        let pause = policy.backoff(errors);
        if pause > Duration::from_secs(0) {
            sleep(pause);
        }
    }
}
