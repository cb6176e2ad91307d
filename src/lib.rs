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

//! # `me4storage`
//!
//! Client for the management HTTP API of Dell PowerVault ME4 class storage
//! arrays, supporting these actions:
//!
//!  * List systems, pools, disk groups, volumes, hosts, host groups and
//!    volume mappings.
//!
//!  * Create and delete disk groups, volumes, hosts and users.
//!
//!  * Map and unmap volumes to hosts.
//!
//!  * Check system health and firmware update readiness.
//!
//!  * Restart management or storage controllers.
//!
//! Every API call is an HTTP GET whose arguments are path segments. A
//! [`Session`][1] logs in once, then validates the `status` array of every
//! response. [`Client`][2] offers one method per array command on top of
//! it.
//!
//! # Example code
//!
//! ```rust,no_run
//! extern crate me4storage;
//! use me4storage::{Client, MeError, SessionConfig};
//! fn main() {
//!     let cfg = SessionConfig {
//!         host: "me4-array.example.com".to_string(),
//!         password: "!manage".to_string(),
//!         ..Default::default()
//!     };
//!     let c = match Client::new(&cfg) {
//!         Ok(i) => i,
//!         Err(e) => {
//!             match e {
//!                 // Error handling goes here
//!                 MeError::Login(_) => panic!("Wrong username or password"),
//!                 _ => panic!("{}", e),
//!             };
//!         }
//!     };
//!     let vols = match c.volumes() {
//!         Ok(i) => i,
//!         Err(e) => panic!("{}", e), // Please use error handling as above.
//!     };
//!     for vol in vols {
//!         println!("Got volume: {} {}", vol.volume_name, vol.size);
//!     }
//! }
//! ```
//!
//! [1]: struct.Session.html
//! [2]: struct.Client.html

extern crate percent_encoding;
extern crate regex;
extern crate reqwest;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
extern crate sha2;
extern crate toml;
extern crate tracing;
extern crate url;

pub use self::client::Client;
pub use self::config::{
    default_config_files, load_config_file, load_config_files, FileConfig,
    DEFAULT_CONFIG_FILES,
};
pub use self::data::*;
pub use self::error::{MeError, Result};
pub use self::misc::{
    mgmt_port_controller, size_bytes_2_size_human,
    size_bytes_2_size_metric, size_human_2_size_bytes, time_duration_human,
};
pub use self::params::{encode_path, Parameter, Parameters, PATH_SAFE};
pub use self::session::{
    decode_body, login_digest, validate_status, Session, SessionConfig,
};
pub use self::transport::{
    get_with_retry, HttpReply, HttpTransport, RetryPolicy, Transport,
    RETRY_STATUS,
};

mod client;
mod config;
mod data;
mod error;
mod misc;
mod params;
mod session;
mod transport;
