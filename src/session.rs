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

use std::time::Duration;

use serde_json::{self, json, Map, Value};
use sha2::{Digest, Sha256};
use tracing::{debug, error};

use super::data::{Resource, Status};
use super::error::*;
use super::params::Parameters;
use super::transport::{get_with_retry, HttpTransport, RetryPolicy, Transport};

pub const DEFAULT_PORT: u16 = 443;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_RETRIES: u32 = 5;
pub const DEFAULT_BACKOFF_FACTOR: Duration = Duration::from_millis(300);

const SUCCESS_PREFIX: &str = "Success:";

/// Connection settings of a [`Session`][1].
///
/// [1]: struct.Session.html
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Host name or address, optionally with an `https://` prefix.
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Verify the array's TLS certificate.
    pub verify: bool,
    /// Per attempt.
    pub timeout: Duration,
    pub retries: u32,
    pub backoff_factor: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            username: "manage".to_string(),
            password: String::new(),
            verify: true,
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
        }
    }
}

/// Authenticated connection to one array.
///
/// The session key obtained at construction is sent with every request;
/// the API has no logout.
pub struct Session<T: Transport = HttpTransport> {
    tp: T,
    base_url: String,
    session_key: String,
    retry: RetryPolicy,
}

/// Digest used as the login credential: hex SHA-256 of
/// `"{username}_{password}"`.
pub fn login_digest(username: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}_{}", username, password).as_bytes());
    format!("{:x}", hasher.finalize())
}

fn base_url(host: &str, port: u16) -> Result<String> {
    let host = host.trim_end_matches('/');
    let api = if host.contains("://") {
        format!("{}:{}/api/", host, port)
    } else if host.contains(':') && !host.starts_with('[') {
        // Bare IPv6 address.
        format!("https://[{}]:{}/api/", host, port)
    } else {
        format!("https://{}:{}/api/", host, port)
    };
    let parsed = url::Url::parse(&api)?;
    if parsed.host_str().is_none() {
        return Err(MeError::InvalidArgument(format!(
            "No host in API URL '{}'",
            api
        )));
    }
    Ok(api)
}

/// Decode a response body.
///
/// Some commands answer with plain text such as `Success: Command completed
/// successfully.` instead of JSON; that is turned into a body holding one
/// successful [`Status`][1].
///
/// [1]: struct.Status.html
pub fn decode_body(text: &str) -> Result<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(v) => Ok(v),
        Err(e) => {
            if text.trim_start().starts_with(SUCCESS_PREFIX) {
                debug!("Non-JSON success acknowledgment: {}", text.trim());
                Ok(success_body())
            } else {
                Err(MeError::Decode {
                    reason: format!("{}", e),
                    body: text.to_string(),
                })
            }
        }
    }
}

fn success_body() -> Value {
    let s = Status::success();
    json!({
        "status": [{
            "response-type": s.response_type,
            "response-type-numeric": s.response_type_numeric,
            "response": s.response,
            "return-code": s.return_code,
            "component-id": s.component_id,
            "time-stamp": s.time_stamp,
            "time-stamp-numeric": s.time_stamp_numeric,
        }]
    })
}

/// Parse the `status` array of a decoded body.
pub fn statuses(body: &Value, raw: &str) -> Result<Vec<Status>> {
    let entries = match body.get(Status::KEY) {
        Some(&Value::Array(ref a)) if !a.is_empty() => a,
        _ => {
            return Err(MeError::MissingStatus(format!(
                "Unexpected status in response: {}",
                raw
            )))
        }
    };
    let mut ret = Vec::with_capacity(entries.len());
    for entry in entries {
        ret.push(serde_json::from_value(entry.clone()).map_err(|e| {
            MeError::IncompleteResponse(format!(
                "Malformed status entry ({}): {}",
                e, raw
            ))
        })?);
    }
    Ok(ret)
}

/// Fail on the first status entry with a non-zero return code.
pub fn validate_status(body: &Value, raw: &str) -> Result<()> {
    for status in statuses(body, raw)? {
        if !status.is_success() {
            return Err(MeError::ApiStatus {
                code: status.return_code,
                message: status.response,
                body: raw.to_string(),
            });
        }
    }
    Ok(())
}

fn incomplete(what: &str) -> MeError {
    MeError::IncompleteResponse(format!(
        "This library was expecting a value that is missing from the \
         response ({}). Possibly the API has changed its response format.",
        what
    ))
}

/// Extract every record under `R::KEY`. A missing key means no records.
pub fn records<R: Resource>(body: &Map<String, Value>) -> Result<Vec<R>> {
    match body.get(R::KEY) {
        None => Ok(Vec::new()),
        Some(&Value::Array(ref items)) => {
            let mut ret = Vec::with_capacity(items.len());
            for item in items {
                ret.push(serde_json::from_value(item.clone()).map_err(
                    |e| incomplete(&format!("{}: {}", R::KEY, e)),
                )?);
            }
            Ok(ret)
        }
        Some(&Value::Object(_)) => Err(MeError::ShapeMismatch(format!(
            "Expected a collection under '{}', got a single object",
            R::KEY
        ))),
        Some(v) => Err(incomplete(&format!("{}: unexpected value {}", R::KEY, v))),
    }
}

/// Extract the single record under `R::KEY`.
pub fn record<R: Resource>(body: &Map<String, Value>) -> Result<R> {
    match body.get(R::KEY) {
        Some(&Value::Object(ref obj)) => {
            serde_json::from_value(Value::Object(obj.clone()))
                .map_err(|e| incomplete(&format!("{}: {}", R::KEY, e)))
        }
        Some(&Value::Array(_)) => Err(MeError::ShapeMismatch(format!(
            "Expected a single object under '{}', got a collection of objects",
            R::KEY
        ))),
        Some(v) => Err(incomplete(&format!("{}: unexpected value {}", R::KEY, v))),
        None => Err(incomplete(R::KEY)),
    }
}

impl Session<HttpTransport> {
    /// Connect and log in to the array.
    ///
    /// # Errors
    ///
    ///  * [`MeError::Login`][1] when no session key could be obtained.
    ///  * [`MeError::HttpStatus`][2] when the login request was rejected.
    ///
    /// [1]: enum.MeError.html#variant.Login
    /// [2]: enum.MeError.html#variant.HttpStatus
    pub fn new(cfg: &SessionConfig) -> Result<Session<HttpTransport>> {
        let tp = HttpTransport::new(cfg.verify, cfg.timeout)?;
        Session::with_transport(tp, cfg)
    }
}

impl<T: Transport> Session<T> {
    /// Log in over the given transport.
    pub fn with_transport(tp: T, cfg: &SessionConfig) -> Result<Session<T>> {
        debug!(
            "Session params: host: {}, port: {}, username: {}, verify: {}, \
             timeout: {:?}, retries: {}",
            cfg.host, cfg.port, cfg.username, cfg.verify, cfg.timeout,
            cfg.retries
        );
        let base_url = base_url(&cfg.host, cfg.port)?;
        let session_key = login(&tp, &base_url, &cfg.username, &cfg.password)?;
        Ok(Session {
            tp,
            base_url,
            session_key,
            retry: RetryPolicy::new(cfg.retries, cfg.backoff_factor),
        })
    }

    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.tp
    }

    /// Full URL for `endpoint` with `params` encoded into the path.
    pub fn url(&self, endpoint: &str, params: &Parameters) -> String {
        format!("{}{}", self.base_url, params.encode(endpoint))
    }

    fn get(&self, url: &str) -> Result<String> {
        debug!("HTTP GET: {}", url);
        let headers = [("datatype", "json"), ("sessionKey", &*self.session_key)];
        let reply = get_with_retry(&self.tp, url, &headers, &self.retry)?;
        debug!("Response:\n{}", reply.body);
        Ok(reply.body)
    }

    /// Issue `endpoint` and return the validated response object.
    ///
    /// # Errors
    ///
    ///  * [`MeError::ShapeMismatch`][1] when the body is a JSON array.
    ///  * [`MeError::MissingStatus`][2] when there is no `status` array.
    ///  * [`MeError::ApiStatus`][3] when any status entry reports failure.
    ///  * [`MeError::Decode`][4] when the body cannot be decoded.
    ///
    /// [1]: enum.MeError.html#variant.ShapeMismatch
    /// [2]: enum.MeError.html#variant.MissingStatus
    /// [3]: enum.MeError.html#variant.ApiStatus
    /// [4]: enum.MeError.html#variant.Decode
    pub fn fetch_object(
        &self,
        endpoint: &str,
        params: &Parameters,
    ) -> Result<Map<String, Value>> {
        let url = self.url(endpoint, params);
        let text = self.get(&url)?;
        let body = decode_body(&text)?;
        if body.is_array() {
            return Err(MeError::ShapeMismatch(format!(
                "Bad object URL '{}': expected an object, got a collection \
                 of objects",
                url
            )));
        }
        validate_status(&body, &text)?;
        match body {
            Value::Object(obj) => Ok(obj),
            _ => Err(MeError::ShapeMismatch(format!(
                "Bad object URL '{}': expected an object, got {}",
                url, text
            ))),
        }
    }

    /// Same as [`fetch_object()`][1] without parameters.
    ///
    /// [1]: #method.fetch_object
    pub fn fetch(&self, endpoint: &str) -> Result<Map<String, Value>> {
        self.fetch_object(endpoint, &Parameters::new())
    }

    /// Issue `endpoint` and collect the records it returns.
    pub fn fetch_all<R: Resource>(
        &self,
        endpoint: &str,
        params: &Parameters,
    ) -> Result<Vec<R>> {
        records(&self.fetch_object(endpoint, params)?)
    }

    /// Issue `endpoint` and return its single record.
    pub fn fetch_one<R: Resource>(
        &self,
        endpoint: &str,
        params: &Parameters,
    ) -> Result<R> {
        record(&self.fetch_object(endpoint, params)?)
    }
}

fn login<T: Transport>(
    tp: &T,
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<String> {
    let url = format!("{}login/{}", base_url, login_digest(username, password));
    let reply =
        get_with_retry(tp, &url, &[("datatype", "json")], &RetryPolicy::none())?;
    debug!("Response:\n{}", reply.body);

    let body: Value = match serde_json::from_str(&reply.body) {
        Ok(v) => v,
        Err(_) => {
            error!(
                "Unable to login, unexpected output in response: \n{}",
                reply.body
            );
            return Err(MeError::Login(reply.body));
        }
    };
    let first = match statuses(&body, &reply.body) {
        Ok(mut s) => s.remove(0),
        Err(_) => {
            error!(
                "Unable to login, unexpected output in response: \n{}",
                reply.body
            );
            return Err(MeError::Login(reply.body));
        }
    };
    if !first.is_success() || first.response.is_empty() {
        error!("Unable to login: {}", first.response);
        return Err(MeError::Login(reply.body));
    }
    Ok(first.response)
}
