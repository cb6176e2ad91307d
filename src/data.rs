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

use serde::de::{DeserializeOwned, Error as DeError};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A record type returned by the array under a fixed response key, e.g.
/// `"volumes": [ {...}, ... ]` for [`Volume`][1].
///
/// [1]: struct.Volume.html
pub trait Resource: DeserializeOwned {
    /// Key of the payload in a decoded response body.
    const KEY: &'static str;
}

/// Numeric fields are sometimes rendered as strings by older firmware.
fn lenient_int<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> ::std::result::Result<i64, D::Error> {
    let v: Value = Deserialize::deserialize(deserializer)?;
    match v {
        Value::Number(ref n) => match n.as_i64() {
            Some(i) => Ok(i),
            None => n
                .as_f64()
                .map(|f| f as i64)
                .ok_or_else(|| D::Error::custom(format!("bad number {}", n))),
        },
        Value::String(ref s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("not an integer: '{}'", s))),
        _ => Err(D::Error::custom(format!("not an integer: {}", v))),
    }
}

fn lenient_float<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> ::std::result::Result<f64, D::Error> {
    let v: Value = Deserialize::deserialize(deserializer)?;
    match v {
        Value::Number(ref n) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom(format!("bad number {}", n))),
        Value::String(ref s) => s
            .trim()
            .trim_end_matches('%')
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("not a number: '{}'", s))),
        _ => Err(D::Error::custom(format!("not a number: {}", v))),
    }
}

/// Health derived from the `health-numeric` field shared by most records.
#[repr(i64)]
#[derive(Debug, Clone, PartialEq, Copy)]
pub enum Health {
    Ok = 0,
    Degraded = 1,
    Fault = 2,
    Unknown = 3,
    NotAvailable = 4,
}

impl From<i64> for Health {
    fn from(i: i64) -> Health {
        match i {
            0 => Health::Ok,
            1 => Health::Degraded,
            2 => Health::Fault,
            4 => Health::NotAvailable,
            _ => Health::Unknown,
        }
    }
}

/// RAID level accepted by `add disk-group`.
#[derive(Debug, Clone, PartialEq, Copy)]
pub enum RaidLevel {
    Raid1,
    Raid5,
    Raid6,
    Raid10,
    /// Distributed RAID, virtual disk groups only.
    Adapt,
}

impl RaidLevel {
    pub fn as_str(&self) -> &'static str {
        match *self {
            RaidLevel::Raid1 => "raid1",
            RaidLevel::Raid5 => "raid5",
            RaidLevel::Raid6 => "raid6",
            RaidLevel::Raid10 => "raid10",
            RaidLevel::Adapt => "adapt",
        }
    }
}

/// Storage controller selector used by `restart`, `show certificate` and
/// disk group ownership.
#[derive(Debug, Clone, PartialEq, Copy)]
pub enum Controller {
    A,
    B,
    Both,
}

impl Controller {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Controller::A => "a",
            Controller::B => "b",
            Controller::Both => "both",
        }
    }
}

/// Operation outcome. Every response carries one or more of these in its
/// `status` array; `return_code == 0` means success.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Status {
    #[serde(default)]
    pub response_type: String,
    #[serde(default)]
    pub response_type_numeric: i64,
    /// Human readable message, or the session key for `login`.
    #[serde(default)]
    pub response: String,
    pub return_code: i64,
    #[serde(default)]
    pub component_id: String,
    #[serde(default)]
    pub time_stamp: String,
    #[serde(default)]
    pub time_stamp_numeric: i64,
}

impl Resource for Status {
    const KEY: &'static str = "status";
}

impl Status {
    /// Canonical envelope for plain text `Success: ...` acknowledgments.
    pub fn success() -> Status {
        Status {
            response_type: "Success".to_string(),
            response_type_numeric: 0,
            response: String::new(),
            return_code: 0,
            component_id: String::new(),
            time_stamp: String::new(),
            time_stamp_numeric: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.return_code == 0
    }
}

/// Storage system (enclosure set managed by one controller pair).
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct System {
    pub system_name: String,
    pub system_contact: String,
    pub system_location: String,
    pub system_information: String,
    pub midplane_serial_number: String,
    pub vendor_name: String,
    pub product_id: String,
    pub product_brand: String,
    #[serde(deserialize_with = "lenient_int")]
    pub enclosure_count: i64,
    pub health: String,
    pub health_numeric: i64,
    pub health_reason: String,
    #[serde(rename = "other-MC-status")]
    pub other_mc_status: String,
    #[serde(default)]
    pub redundancy: Vec<Redundancy>,
    #[serde(default)]
    pub unhealthy_component: Vec<UnhealthyComponent>,
}

impl Resource for System {
    const KEY: &'static str = "system";
}

impl System {
    pub fn is_healthy(&self) -> bool {
        Health::from(self.health_numeric) == Health::Ok
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Redundancy {
    pub redundancy_mode: String,
    pub redundancy_status: String,
    pub controller_a_status: String,
    pub controller_a_serial_number: String,
    pub controller_b_status: String,
    pub controller_b_serial_number: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct UnhealthyComponent {
    pub component_type: String,
    pub component_id: String,
    pub basetype: String,
    pub primary_key: String,
    pub health: String,
    pub health_numeric: i64,
    pub health_reason: String,
    pub health_recommendation: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct ServiceTagInfo {
    pub service_tag: String,
    #[serde(deserialize_with = "lenient_int")]
    pub enclosure_id: i64,
}

impl Resource for ServiceTagInfo {
    const KEY: &'static str = "service-tag-info";
}

/// Virtual storage pool (`A` or `B`), or the pool backing a linear disk
/// group.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Pool {
    pub name: String,
    pub serial_number: String,
    pub storage_type: String,
    /// Capacity in 512 byte blocks.
    pub total_size_numeric: i64,
    pub total_size: String,
    pub total_avail_numeric: i64,
    pub total_avail: String,
    pub owner: String,
    pub preferred_owner: String,
    pub health: String,
    pub health_numeric: i64,
    pub health_reason: String,
    #[serde(default)]
    pub disk_groups: Vec<DiskGroup>,
    #[serde(default)]
    pub tiers: Vec<Tier>,
}

impl Resource for Pool {
    const KEY: &'static str = "pools";
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Tier {
    pub serial_number: String,
    pub pool: String,
    pub tier: String,
    #[serde(deserialize_with = "lenient_int")]
    pub diskcount: i64,
    pub total_size: String,
    pub total_size_numeric: i64,
    pub available_size: String,
    pub available_size_numeric: i64,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct DiskGroup {
    pub name: String,
    pub size: String,
    pub size_numeric: i64,
    pub freespace: String,
    pub freespace_numeric: i64,
    pub storage_type: String,
    pub pool: String,
    pub owner: String,
    pub raidtype: String,
    #[serde(deserialize_with = "lenient_int")]
    pub diskcount: i64,
    #[serde(deserialize_with = "lenient_int")]
    pub sparecount: i64,
    pub chunksize: String,
    pub status: String,
    pub current_job: String,
    pub serial_number: String,
    pub health: String,
    pub health_numeric: i64,
    pub health_reason: String,
    #[serde(default)]
    pub unhealthy_component: Vec<UnhealthyComponent>,
}

impl Resource for DiskGroup {
    const KEY: &'static str = "disk-groups";
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Volume {
    pub durable_id: String,
    pub volume_name: String,
    pub storage_pool_name: String,
    pub virtual_disk_name: String,
    pub size: String,
    /// Size in 512 byte blocks.
    pub size_numeric: i64,
    pub allocated_size: String,
    pub allocated_size_numeric: i64,
    pub storage_type: String,
    pub owner: String,
    pub serial_number: String,
    pub write_policy: String,
    pub volume_type: String,
    pub raidtype: String,
    pub health: String,
    pub health_numeric: i64,
    pub health_reason: String,
}

impl Resource for Volume {
    const KEY: &'static str = "volumes";
}

/// Initiator (FC WWPN, iSCSI IQN or SAS address) known to the array.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Initiator {
    pub durable_id: String,
    pub nickname: String,
    pub discovered: String,
    pub mapped: String,
    pub profile: String,
    pub host_bus_type: String,
    pub id: String,
    pub host_id: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Host {
    pub durable_id: String,
    pub name: String,
    pub serial_number: String,
    #[serde(deserialize_with = "lenient_int")]
    pub member_count: i64,
    pub host_group: String,
    #[serde(default)]
    pub initiator: Vec<Initiator>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct HostGroup {
    pub durable_id: String,
    pub name: String,
    pub serial_number: String,
    #[serde(deserialize_with = "lenient_int")]
    pub member_count: i64,
    #[serde(default, alias = "host")]
    pub hosts: Vec<Host>,
}

impl Resource for HostGroup {
    const KEY: &'static str = "host-group";
}

/// Volume with its LUN mappings, as returned by `show maps`.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct VolumeView {
    pub durable_id: String,
    pub volume_serial: String,
    pub volume_name: String,
    #[serde(default)]
    pub volume_view_mappings: Vec<VolumeViewMapping>,
}

impl Resource for VolumeView {
    const KEY: &'static str = "volume-view";
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct VolumeViewMapping {
    pub durable_id: String,
    pub parent_id: String,
    pub mapped_id: String,
    pub ports: String,
    pub lun: String,
    pub access: String,
    pub identifier: String,
    pub nickname: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct User {
    pub username: String,
    pub roles: String,
    pub user_type: String,
    pub user_locale: String,
    #[serde(rename = "interface-access-WBI")]
    pub interface_access_wbi: String,
    #[serde(rename = "interface-access-CLI")]
    pub interface_access_cli: String,
    #[serde(rename = "interface-access-FTP")]
    pub interface_access_ftp: String,
    #[serde(rename = "interface-access-SMIS")]
    pub interface_access_smis: String,
    #[serde(rename = "interface-access-SNMP")]
    pub interface_access_snmp: String,
    pub storage_size_base: String,
    #[serde(deserialize_with = "lenient_int")]
    pub timeout: i64,
}

impl Resource for User {
    const KEY: &'static str = "users";
}

impl User {
    /// The array marks an enabled interface with `x`.
    pub fn ftp_enabled(&self) -> bool {
        self.interface_access_ftp == "x"
    }

    pub fn web_enabled(&self) -> bool {
        self.interface_access_wbi == "x"
    }

    pub fn cli_enabled(&self) -> bool {
        self.interface_access_cli == "x"
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct CertificateStatus {
    pub controller: String,
    pub certificate_status: String,
    pub certificate_time: String,
    pub certificate_signature: String,
    pub certificate_text: String,
}

impl Resource for CertificateStatus {
    const KEY: &'static str = "certificate-status";
}

/// Management port settings of one controller.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkParameters {
    /// `mgmtport_a` or `mgmtport_b`.
    pub durable_id: String,
    pub active_version: String,
    pub ip_address: String,
    pub gateway: String,
    pub subnet_mask: String,
    pub mac_address: String,
    pub addressing_mode: String,
    pub link_speed: String,
    pub health: String,
    pub health_numeric: i64,
}

impl Resource for NetworkParameters {
    const KEY: &'static str = "network-parameters";
}

impl NetworkParameters {
    /// Controller letter, upper case.
    pub fn controller(&self) -> String {
        super::misc::mgmt_port_controller(&self.durable_id)
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct AdvancedSettings {
    pub background_scrub: String,
    pub background_scrub_interval: String,
    pub partner_firmware_upgrade: String,
    pub utility_priority: String,
    pub smart: String,
    pub dynamic_spares: String,
    pub background_disk_scrub: String,
}

impl Resource for AdvancedSettings {
    const KEY: &'static str = "advanced-settings-table";
}

/// Percentage of each controller's cache holding data that could not be
/// written to disk.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct UnwritableCache {
    #[serde(deserialize_with = "lenient_float")]
    pub unwritable_a_percentage: f64,
    #[serde(deserialize_with = "lenient_float")]
    pub unwritable_b_percentage: f64,
}

impl Resource for UnwritableCache {
    const KEY: &'static str = "unwritable-cache";
}

impl UnwritableCache {
    pub fn has_unwritable_data(&self) -> bool {
        self.unwritable_a_percentage > 0.0 || self.unwritable_b_percentage > 0.0
    }
}

/// Result of `check firmware-upgrade-health`.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct CodeLoadReadiness {
    pub overall_health: String,
    /// Zero when the system is ready for a firmware update.
    pub overall_health_numeric: i64,
    #[serde(default)]
    pub code_load_readiness_reasons: Vec<CodeLoadReadinessReason>,
}

impl Resource for CodeLoadReadiness {
    const KEY: &'static str = "code-load-readiness";
}

impl CodeLoadReadiness {
    pub fn is_ready(&self) -> bool {
        self.overall_health_numeric == 0
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct CodeLoadReadinessReason {
    pub readiness_reason: String,
    pub failure_risks: String,
}

/// Installed license, from `show license`.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct License {
    pub license_key: String,
}

impl Resource for License {
    const KEY: &'static str = "license";
}

/// Firmware and hardware revisions of one controller, from `show versions`.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Version {
    /// `controller-a-versions` or `controller-b-versions`.
    pub object_name: String,
    pub bundle_version: String,
    pub bundle_base_version: String,
    pub build_date: String,
    pub sc_fw: String,
    pub mc_fw: String,
    #[serde(default)]
    pub ec_fw: String,
    #[serde(default)]
    pub pld_rev: String,
    #[serde(default)]
    pub hw_rev: String,
}

impl Resource for Version {
    const KEY: &'static str = "versions";
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct NtpStatus {
    /// `activated` or `deactivated`.
    pub ntp_status: String,
    pub ntp_server_address: String,
    pub ntp_contact_time: String,
}

impl Resource for NtpStatus {
    const KEY: &'static str = "ntp-status";
}

/// DNS settings of one controller.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct DnsParameters {
    pub controller: String,
    #[serde(deserialize_with = "lenient_int")]
    pub controller_numeric: i64,
    pub name_servers: String,
    pub search_domains: String,
}

impl Resource for DnsParameters {
    const KEY: &'static str = "dns-parameters";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{self, json};

    #[test]
    fn status_tolerates_missing_optional_fields() {
        let s: Status = serde_json::from_str(
            r#"{"return-code": 5, "response": "bad"}"#,
        ).unwrap();
        assert_eq!(5, s.return_code);
        assert_eq!("bad", s.response);
        assert!(!s.is_success());
    }

    #[test]
    fn status_requires_return_code() {
        let r: ::std::result::Result<Status, _> =
            serde_json::from_str(r#"{"response": "no code"}"#);
        assert!(r.is_err());
    }

    #[test]
    fn user_interface_flags() {
        let u: User = serde_json::from_value(json!({
            "username": "manage",
            "roles": "manage,monitor",
            "user-type": "Standard",
            "user-locale": "English",
            "interface-access-WBI": "x",
            "interface-access-CLI": "x",
            "interface-access-FTP": "",
            "interface-access-SMIS": "",
            "interface-access-SNMP": "",
            "storage-size-base": "10",
            "timeout": "1800",
        })).unwrap();
        assert!(u.web_enabled());
        assert!(u.cli_enabled());
        assert!(!u.ftp_enabled());
        assert_eq!(1800, u.timeout);
    }

    #[test]
    fn unwritable_cache_accepts_strings_and_numbers() {
        let c: UnwritableCache = serde_json::from_value(json!({
            "unwritable-a-percentage": 0,
            "unwritable-b-percentage": "3",
        })).unwrap();
        assert!(c.has_unwritable_data());
    }

    #[test]
    fn missing_required_key_is_an_error() {
        let r: ::std::result::Result<ServiceTagInfo, _> =
            serde_json::from_value(json!({"service-tag": "ABC1234"}));
        assert!(r.is_err());
    }

    #[test]
    fn health_from_numeric() {
        assert_eq!(Health::Ok, Health::from(0));
        assert_eq!(Health::Fault, Health::from(2));
        assert_eq!(Health::Unknown, Health::from(42));
    }

    #[test]
    fn dns_parameters_numeric_controller() {
        let d: DnsParameters = serde_json::from_value(json!({
            "controller": "A",
            "controller-numeric": "1",
            "name-servers": "10.0.0.53,10.0.1.53",
            "search-domains": "example.com",
        })).unwrap();
        assert_eq!(1, d.controller_numeric);
        assert_eq!("10.0.0.53,10.0.1.53", d.name_servers);
    }

    #[test]
    fn version_optional_revisions() {
        let v: Version = serde_json::from_value(json!({
            "object-name": "controller-a-versions",
            "bundle-version": "GT280R010-01",
            "bundle-base-version": "GT280R010",
            "build-date": "Mon Aug 24 11:10:44 MDT 2020",
            "sc-fw": "GTS280R10-01",
            "mc-fw": "GTM280R010-01",
        })).unwrap();
        assert_eq!("GT280R010-01", v.bundle_version);
        assert_eq!("", v.hw_rev);
    }
}
