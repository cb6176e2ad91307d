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

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use super::error::*;
use super::session::SessionConfig;

/// Files read when no `--config-file` is given. Later files override
/// earlier ones.
pub const DEFAULT_CONFIG_FILES: [&str; 2] =
    ["/etc/me4cli/me4cli.toml", ".me4cli.toml"];

/// Connection settings as found in a configuration file. Every key is
/// optional.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_host: Option<String>,
    pub api_port: Option<u16>,
    pub api_username: Option<String>,
    pub api_password: Option<String>,
    pub api_disable_tls_verification: Option<bool>,
    /// Seconds.
    pub api_timeout: Option<u64>,
    pub api_retries: Option<u32>,
}

impl FileConfig {
    /// Take every key set in `other`.
    pub fn merge(&mut self, other: FileConfig) {
        if other.api_host.is_some() {
            self.api_host = other.api_host;
        }
        if other.api_port.is_some() {
            self.api_port = other.api_port;
        }
        if other.api_username.is_some() {
            self.api_username = other.api_username;
        }
        if other.api_password.is_some() {
            self.api_password = other.api_password;
        }
        if other.api_disable_tls_verification.is_some() {
            self.api_disable_tls_verification =
                other.api_disable_tls_verification;
        }
        if other.api_timeout.is_some() {
            self.api_timeout = other.api_timeout;
        }
        if other.api_retries.is_some() {
            self.api_retries = other.api_retries;
        }
    }

    /// Fill a [`SessionConfig`][1] from the built-in defaults and the keys
    /// set here.
    ///
    /// [1]: struct.SessionConfig.html
    pub fn session_config(&self) -> SessionConfig {
        let mut cfg = SessionConfig::default();
        if let Some(ref h) = self.api_host {
            cfg.host = h.clone();
        }
        if let Some(p) = self.api_port {
            cfg.port = p;
        }
        if let Some(ref u) = self.api_username {
            cfg.username = u.clone();
        }
        if let Some(ref p) = self.api_password {
            cfg.password = p.clone();
        }
        if let Some(d) = self.api_disable_tls_verification {
            cfg.verify = !d;
        }
        if let Some(t) = self.api_timeout {
            cfg.timeout = Duration::from_secs(t);
        }
        if let Some(r) = self.api_retries {
            cfg.retries = r;
        }
        cfg
    }
}

/// Parse one configuration file.
///
/// # Errors
///
///  * [`MeError::Config`][1] when the file cannot be read or parsed.
///
/// [1]: enum.MeError.html#variant.Config
pub fn load_config_file(path: &Path) -> Result<FileConfig> {
    let contents = fs::read_to_string(path).map_err(|e| {
        MeError::Config(format!("{}: {}", path.display(), e))
    })?;
    toml::from_str(&contents)
        .map_err(|e| MeError::Config(format!("{}: {}", path.display(), e)))
}

/// Read and merge `paths` in order, skipping files that do not exist.
pub fn load_config_files<P: AsRef<Path>>(paths: &[P]) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            debug!("Config file {} not found, skipping", path.display());
            continue;
        }
        debug!("Reading config file {}", path.display());
        cfg.merge(load_config_file(path)?);
    }
    Ok(cfg)
}

/// [`DEFAULT_CONFIG_FILES`][1] as paths.
///
/// [1]: constant.DEFAULT_CONFIG_FILES.html
pub fn default_config_files() -> Vec<PathBuf> {
    DEFAULT_CONFIG_FILES.iter().map(PathBuf::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn later_files_override_earlier() {
        let dir = TempDir::new().unwrap();
        let system = write(
            &dir,
            "system.toml",
            "api_host = \"me4-a\"\napi_username = \"monitor\"\napi_retries = 2\n",
        );
        let local = write(
            &dir,
            "local.toml",
            "api_host = \"me4-b\"\napi_disable_tls_verification = true\n",
        );
        let missing = dir.path().join("missing.toml");

        let cfg = load_config_files(&[system, missing, local]).unwrap();
        assert_eq!(Some("me4-b".to_string()), cfg.api_host);
        assert_eq!(Some("monitor".to_string()), cfg.api_username);

        let session = cfg.session_config();
        assert_eq!("me4-b", session.host);
        assert_eq!("monitor", session.username);
        assert_eq!(2, session.retries);
        assert!(!session.verify);
        assert_eq!(443, session.port);
        assert_eq!(Duration::from_secs(60), session.timeout);
    }

    #[test]
    fn invalid_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let bad = write(&dir, "bad.toml", "api_port = \"not a port\"\n");
        match load_config_files(&[bad]) {
            Err(MeError::Config(msg)) => assert!(msg.contains("bad.toml")),
            other => panic!("unexpected {:?}", other),
        }
        let typo = write(&dir, "typo.toml", "api_hots = \"x\"\n");
        assert!(load_config_file(&typo).is_err());
    }

    #[test]
    fn empty_config_gives_defaults() {
        let cfg = load_config_files::<PathBuf>(&[]).unwrap();
        assert_eq!(FileConfig::default(), cfg);
        let session = cfg.session_config();
        assert_eq!("localhost", session.host);
        assert_eq!("manage", session.username);
        assert_eq!("", session.password);
        assert!(session.verify);
        assert_eq!(5, session.retries);
    }
}
