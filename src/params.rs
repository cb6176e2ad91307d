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

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters the array's path parser accepts unencoded, on top of ASCII
/// letters and digits. Pinned to the firmware we talk to; `*` is needed for
/// wildcard arguments such as `show volumes *`.
pub const PATH_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'@')
    .remove(b'_')
    .remove(b'.')
    .remove(b',')
    .remove(b'-')
    .remove(b'~')
    .remove(b':')
    .remove(b'"')
    .remove(b'*');

/// Value of a single request parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    /// Keyword only, e.g. the resource name in `create user <name>`.
    Flag,
    /// Keyword followed by a quoted value. An empty string is still sent as
    /// `""`.
    Value(String),
}

/// Ordered parameter list of a single API call.
///
/// The array API takes every argument as a path segment and its grammar is
/// positional for some commands, so insertion order is kept as is.
///
/// ```rust
/// use me4storage::Parameters;
///
/// let mut params = Parameters::new();
/// params.flag("dg01").value("disks", "0.0-9");
/// assert_eq!(params.raw_path("add/disk-group"),
///            "add/disk-group/dg01/disks/\"0.0-9\"");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    entries: Vec<(String, Parameter)>,
}

impl Parameters {
    pub fn new() -> Parameters {
        Parameters {
            entries: Vec::new(),
        }
    }

    /// Append a name-only parameter.
    pub fn flag(&mut self, name: &str) -> &mut Parameters {
        self.entries.push((name.to_string(), Parameter::Flag));
        self
    }

    /// Append a `name "value"` parameter.
    pub fn value(&mut self, name: &str, value: &str) -> &mut Parameters {
        self.entries
            .push((name.to_string(), Parameter::Value(value.to_string())));
        self
    }

    /// Append `name "value"` only when `value` is `Some`.
    pub fn value_opt(
        &mut self,
        name: &str,
        value: Option<&str>,
    ) -> &mut Parameters {
        if let Some(v) = value {
            self.value(name, v);
        }
        self
    }

    /// Append `name "a,b,c"`.
    pub fn list(&mut self, name: &str, values: &[String]) -> &mut Parameters {
        self.value(name, &values.join(","))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Parameter)> {
        self.entries.iter()
    }

    /// Path before percent-encoding.
    pub fn raw_path(&self, endpoint: &str) -> String {
        let mut path = endpoint.to_string();
        for (name, param) in &self.entries {
            path.push('/');
            path.push_str(name);
            if let Parameter::Value(ref v) = *param {
                path.push_str("/\"");
                path.push_str(v);
                path.push('"');
            }
        }
        path
    }

    /// Percent-encoded path, ready to be appended to `/api/`.
    pub fn encode(&self, endpoint: &str) -> String {
        encode_path(&self.raw_path(endpoint))
    }
}

impl<'a> From<&'a [(&'a str, Option<&'a str>)]> for Parameters {
    fn from(pairs: &'a [(&'a str, Option<&'a str>)]) -> Self {
        let mut params = Parameters::new();
        for &(name, value) in pairs {
            match value {
                Some(v) => params.value(name, v),
                None => params.flag(name),
            };
        }
        params
    }
}

pub fn encode_path(raw: &str) -> String {
    utf8_percent_encode(raw, PATH_SAFE).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_and_value_segments() {
        let mut params = Parameters::new();
        params.flag("a").value("b", "x y");
        assert_eq!("ep/a/b/\"x y\"", params.raw_path("ep"));
        assert_eq!("ep/a/b/\"x%20y\"", params.encode("ep"));
    }

    #[test]
    fn insertion_order_is_kept() {
        let mut params = Parameters::new();
        params.flag("z").value("a", "1");
        assert_eq!("ep/z/a/\"1\"", params.raw_path("ep"));
    }

    #[test]
    fn empty_value_is_not_a_flag() {
        let mut params = Parameters::new();
        params.value("info", "");
        assert_eq!("set/system/info/\"\"", params.raw_path("set/system"));

        let mut params = Parameters::new();
        params.flag("info");
        assert_eq!("set/system/info", params.raw_path("set/system"));
    }

    #[test]
    fn safe_characters_pass_through() {
        assert_eq!(
            "a/b@c_d.e,f-g~h:i\"j*k",
            encode_path("a/b@c_d.e,f-g~h:i\"j*k")
        );
    }

    #[test]
    fn unsafe_characters_are_encoded() {
        assert_eq!("%23%3F%26%25%27%2B%3D", encode_path("#?&%'+="));
        assert_eq!("caf%C3%A9", encode_path("café"));
    }

    #[test]
    fn from_optional_pairs() {
        let pairs: &[(&str, Option<&str>)] =
            &[("type", Some("linear")), ("dg1", None)];
        let params = Parameters::from(pairs);
        assert_eq!(2, params.len());
        assert_eq!(
            "add/disk-group/type/\"linear\"/dg1",
            params.raw_path("add/disk-group")
        );
    }

    #[test]
    fn list_is_comma_joined() {
        let mut params = Parameters::new();
        params.list("hosts", &["h1".to_string(), "h2".to_string()]);
        assert_eq!("ep/hosts/\"h1,h2\"", params.raw_path("ep"));
        assert_eq!("ep/hosts/\"h1,h2\"", params.encode("ep"));
    }
}
