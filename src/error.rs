// Copyright (C) 2017-2018 Red Hat, Inc.
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
//
// Author: Gris Ge <fge@redhat.com>

use std::result;
use std::fmt;

#[derive(Debug)]
pub enum MeError {
    /// Internal invariant broken, e.g. a regex failed to compile.
    LibBug(String),
    /// Login did not yield a usable session key. Holds the raw response.
    Login(String),
    /// Response body is neither JSON nor a `Success:` acknowledgment.
    Decode {
        reason: String,
        body: String,
    },
    /// Decoded response carries no usable `status` array.
    MissingStatus(String),
    /// The array reported a non-zero return code.
    ApiStatus {
        code: i64,
        message: String,
        body: String,
    },
    /// Caller asked for a single object but got a collection (or the
    /// reverse). Indicates a bug in the calling code.
    ShapeMismatch(String),
    /// A field this library depends on is missing from the response.
    IncompleteResponse(String),
    /// Non-success HTTP status code.
    HttpStatus {
        status: u16,
        body: String,
    },
    TimeOut(String),
    NetworkError(String),
    InvalidArgument(String),
    Config(String),
}

impl MeError {
    /// Short, static description of the error kind.
    pub fn summary(&self) -> &'static str {
        match *self {
            MeError::LibBug(_) => "Library bug",
            MeError::Login(_) => "Login failed",
            MeError::Decode { .. } => "Undecodable response",
            MeError::MissingStatus(_) => "Unexpected status in response",
            MeError::ApiStatus { .. } => "Operation failed",
            MeError::ShapeMismatch(_) => "Bad object URL",
            MeError::IncompleteResponse(_) => "Incomplete response",
            MeError::HttpStatus { .. } => "HTTP error",
            MeError::TimeOut(_) => "Timeout",
            MeError::NetworkError(_) => "Network error",
            MeError::InvalidArgument(_) => "Invalid argument",
            MeError::Config(_) => "Configuration error",
        }
    }
}

impl ::std::error::Error for MeError {}

impl fmt::Display for MeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MeError::Decode { ref reason, ref body } => write!(
                f,
                "Failed to decode response ({}), raw response: {}",
                reason, body
            ),
            MeError::ApiStatus {
                code, ref message, ..
            } => write!(
                f,
                "Operation failed. rc: {}. Response: {}",
                code, message
            ),
            MeError::HttpStatus { status, ref body } => {
                write!(f, "HTTP status {}: {}", status, body)
            }
            MeError::LibBug(ref x)
            | MeError::Login(ref x)
            | MeError::MissingStatus(ref x)
            | MeError::ShapeMismatch(ref x)
            | MeError::IncompleteResponse(ref x)
            | MeError::TimeOut(ref x)
            | MeError::NetworkError(ref x)
            | MeError::InvalidArgument(ref x)
            | MeError::Config(ref x) => write!(f, "{}", x),
        }
    }
}

pub type Result<T> = result::Result<T, MeError>;

impl From<::reqwest::Error> for MeError {
    fn from(e: ::reqwest::Error) -> Self {
        if e.is_timeout() {
            MeError::TimeOut(format!("{}", e))
        } else if e.is_builder() {
            MeError::LibBug(format!("Failed to build HTTP request: {}", e))
        } else {
            MeError::NetworkError(format!("{}", e))
        }
    }
}

impl From<::url::ParseError> for MeError {
    fn from(e: ::url::ParseError) -> Self {
        MeError::InvalidArgument(format!("Failed to parse URL: {}", e))
    }
}

impl From<::regex::Error> for MeError {
    fn from(e: ::regex::Error) -> Self {
        MeError::LibBug(format!("Regex error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_status_display_carries_code_and_message() {
        let e = MeError::ApiStatus {
            code: -10028,
            message: "The specified name is already in use.".to_string(),
            body: "{}".to_string(),
        };
        assert_eq!(
            "Operation failed. rc: -10028. Response: The specified name is \
             already in use.",
            format!("{}", e)
        );
        assert_eq!("Operation failed", e.summary());
    }

    #[test]
    fn missing_status_and_api_status_are_distinct() {
        let missing = MeError::MissingStatus("{\"foo\": []}".to_string());
        match missing {
            MeError::MissingStatus(_) => (),
            _ => panic!("expected MissingStatus"),
        }
        assert_ne!(
            missing.summary(),
            MeError::ApiStatus {
                code: 1,
                message: String::new(),
                body: String::new(),
            }.summary()
        );
    }
}
