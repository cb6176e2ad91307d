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

use regex::Regex;

use super::error::*;

struct SizeUnit<'a> {
    unit: &'a str,
    bytes: u64,
    decimals: usize,
}

// Ordered largest first; the last entry is the floor for small values.
const SIZE_CONVS: [SizeUnit<'static>; 5] = [
    SizeUnit {
        unit: "PiB",
        bytes: 1u64 << 50,
        decimals: 2,
    },
    SizeUnit {
        unit: "TiB",
        bytes: 1u64 << 40,
        decimals: 2,
    },
    SizeUnit {
        unit: "GiB",
        bytes: 1u64 << 30,
        decimals: 2,
    },
    SizeUnit {
        unit: "MiB",
        bytes: 1u64 << 20,
        decimals: 1,
    },
    SizeUnit {
        unit: "KiB",
        bytes: 1u64 << 10,
        decimals: 1,
    },
];

const METRIC_SIZE_CONVS: [SizeUnit<'static>; 5] = [
    SizeUnit {
        unit: "PB",
        bytes: 1_000_000_000_000_000u64,
        decimals: 2,
    },
    SizeUnit {
        unit: "TB",
        bytes: 1_000_000_000_000u64,
        decimals: 2,
    },
    SizeUnit {
        unit: "GB",
        bytes: 1_000_000_000u64,
        decimals: 2,
    },
    SizeUnit {
        unit: "MB",
        bytes: 1_000_000u64,
        decimals: 1,
    },
    SizeUnit {
        unit: "KB",
        bytes: 1_000u64,
        decimals: 1,
    },
];

fn format_size(i: u64, convs: &[SizeUnit]) -> String {
    // Values below the second smallest unit are shown in the smallest one.
    let mut conv = &convs[convs.len() - 1];
    for size_conv in convs {
        if i >= size_conv.bytes && size_conv.bytes > conv.bytes {
            conv = size_conv;
            break;
        }
    }
    format!(
        "{:.*}{}",
        conv.decimals,
        i as f64 / conv.bytes as f64,
        conv.unit
    )
}

/// Convert a size in bytes to a base-2 string, e.g. `1.50GiB`.
///
/// Sizes below 1MiB are shown in KiB.
pub fn size_bytes_2_size_human(i: u64) -> String {
    format_size(i, &SIZE_CONVS)
}

/// Convert a size in bytes to a base-10 string, e.g. `4.00TB`.
pub fn size_bytes_2_size_metric(i: u64) -> String {
    format_size(i, &METRIC_SIZE_CONVS)
}

/// Convert human readable size string into integer size in bytes.
///
/// Supported size string formats:
///
///  * `1024` gets `1024u64`.
///  * `1.9KiB` gets `(1024 * 1.9) as u64`.
///  * `2K` and `2k` are the same as `2KiB`.
///  * `2KB` gets `2 * 1000`.
///  * `4 TB` gets `4 * 1000^4`.
///
/// # Errors
///
///  * [`MeError::InvalidArgument`][1] on empty number or unknown unit.
///
/// [1]: enum.MeError.html#variant.InvalidArgument
pub fn size_human_2_size_bytes(s: &str) -> Result<u64> {
    let regex_size_human = Regex::new(
        r"(?x)
        ^
        ([0-9]+(?:\.[0-9]*)?) # 1: number
        [\ \t]*             # might have space between number and unit
        ([a-zA-Z]*)         # 2: units
        $
        ",
    )?;

    let invalid =
        || MeError::InvalidArgument(format!("Invalid disk size: '{}'", s));

    let cap = regex_size_human.captures(s.trim()).ok_or_else(invalid)?;
    let number = cap
        .get(1)
        .and_then(|n| n.as_str().parse::<f64>().ok())
        .ok_or_else(invalid)?;
    let unit = match cap.get(2) {
        Some(u) => u.as_str().to_uppercase(),
        None => String::new(),
    };
    if unit.is_empty() || unit == "B" {
        return Ok(number as u64);
    }
    // `K` and `KIB` are base-2, `KB` is base-10.
    let base2 = if unit.len() == 1 {
        format!("{}IB", unit)
    } else {
        unit.clone()
    };
    for size_conv in SIZE_CONVS.iter() {
        if size_conv.unit.to_uppercase() == base2 {
            return Ok((size_conv.bytes as f64 * number) as u64);
        }
    }
    for size_conv in METRIC_SIZE_CONVS.iter() {
        if size_conv.unit == unit {
            return Ok((size_conv.bytes as f64 * number) as u64);
        }
    }
    Err(MeError::InvalidArgument(format!(
        "Invalid unit suffix '{}' in disk size '{}'",
        unit, s
    )))
}

/// Format seconds as `1d 2h 3m 4s`, leaving out leading zero fields.
pub fn time_duration_human(secs: u64) -> String {
    let (mm, ss) = (secs / 60, secs % 60);
    let (hh, mm) = (mm / 60, mm % 60);
    let (dd, hh) = (hh / 24, hh % 24);

    let mut res = String::new();
    if dd > 0 {
        res.push_str(&format!("{}d ", dd));
    }
    if dd > 0 || hh > 0 {
        res.push_str(&format!("{}h ", hh));
    }
    if dd > 0 || hh > 0 || mm > 0 {
        res.push_str(&format!("{}m ", mm));
    }
    res.push_str(&format!("{}s", ss));
    res
}

/// Controller letter of a management port id: `mgmtport_a` gives `A`.
///
/// Ids not following that pattern are returned unchanged.
pub fn mgmt_port_controller(durable_id: &str) -> String {
    let regex_port = match Regex::new(r"^mgmtport_(.+)$") {
        Ok(r) => r,
        Err(_) => return durable_id.to_string(),
    };
    match regex_port.captures(durable_id).and_then(|c| c.get(1)) {
        Some(m) => m.as_str().to_uppercase(),
        None => durable_id.to_string(),
    }
}
