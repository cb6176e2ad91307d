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

use super::data::*;
use super::error::*;
use super::params::Parameters;
use super::session::{Session, SessionConfig};
use super::transport::{HttpTransport, Transport};

/// Represent the connection to one storage array.
pub struct Client<T: Transport = HttpTransport> {
    session: Session<T>,
}

fn no_params() -> Parameters {
    Parameters::new()
}

fn first<R: Resource>(mut items: Vec<R>) -> Result<R> {
    if items.is_empty() {
        return Err(MeError::IncompleteResponse(format!(
            "This library was expecting a value that is missing from the \
             response ({}). Possibly the API has changed its response format.",
            R::KEY
        )));
    }
    Ok(items.remove(0))
}

impl Client<HttpTransport> {
    /// Log in to the array described by `cfg`.
    ///
    /// # Errors
    ///
    ///  * [`MeError::Login`][1]
    ///  * [`MeError::NetworkError`][2]
    ///  * [`MeError::InvalidArgument`][3] on a malformed host.
    ///
    /// [1]: enum.MeError.html#variant.Login
    /// [2]: enum.MeError.html#variant.NetworkError
    /// [3]: enum.MeError.html#variant.InvalidArgument
    pub fn new(cfg: &SessionConfig) -> Result<Client<HttpTransport>> {
        Ok(Client {
            session: Session::new(cfg)?,
        })
    }
}

impl<T: Transport> Client<T> {
    /// Wrap an already authenticated session.
    pub fn from_session(session: Session<T>) -> Client<T> {
        Client { session }
    }

    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    fn invoke(&self, endpoint: &str, params: &Parameters) -> Result<()> {
        self.session.fetch_object(endpoint, params)?;
        Ok(())
    }

    /// Gets a list of systems on this connection.
    pub fn systems(&self) -> Result<Vec<System>> {
        self.session.fetch_all("show/system", &no_params())
    }

    /// Gets the service tag of each enclosure.
    pub fn service_tag_info(&self) -> Result<Vec<ServiceTagInfo>> {
        self.session.fetch_all("show/service-tag-info", &no_params())
    }

    /// Gets a list of pools on this connection.
    pub fn pools(&self) -> Result<Vec<Pool>> {
        self.session.fetch_all("show/pools", &no_params())
    }

    /// Gets a list of disk groups on this connection.
    pub fn disk_groups(&self) -> Result<Vec<DiskGroup>> {
        self.session.fetch_all("show/disk-groups", &no_params())
    }

    /// Gets a list of volumes on this connection.
    pub fn volumes(&self) -> Result<Vec<Volume>> {
        self.session.fetch_all("show/volumes", &no_params())
    }

    /// Gets a list of host groups including their member hosts.
    ///
    /// Hosts not in any group are reported by the array under a pseudo
    /// group whose name is `-ungrouped-`.
    pub fn host_groups(&self) -> Result<Vec<HostGroup>> {
        self.session.fetch_all("show/host-groups", &no_params())
    }

    /// Gets a list of hosts, flattened from [`host_groups()`][1].
    ///
    /// [1]: #method.host_groups
    pub fn hosts(&self) -> Result<Vec<Host>> {
        Ok(self
            .host_groups()?
            .into_iter()
            .flat_map(|g| g.hosts)
            .collect())
    }

    /// Gets the volume to host mappings.
    pub fn mappings(&self) -> Result<Vec<VolumeView>> {
        self.session.fetch_all("show/maps", &no_params())
    }

    /// Gets all users, or only the one named `user`.
    pub fn users(&self, user: Option<&str>) -> Result<Vec<User>> {
        let mut params = Parameters::new();
        if let Some(u) = user {
            params.flag(u);
        }
        self.session.fetch_all("show/users", &params)
    }

    /// Gets the TLS certificate status of controller `ctrl`.
    pub fn certificates(
        &self,
        ctrl: Controller,
    ) -> Result<Vec<CertificateStatus>> {
        let mut params = Parameters::new();
        params.flag(ctrl.as_str());
        self.session.fetch_all("show/certificate", &params)
    }

    /// Gets the management port settings of each controller.
    pub fn network_parameters(&self) -> Result<Vec<NetworkParameters>> {
        self.session.fetch_all("show/network-parameters", &no_params())
    }

    /// Gets the system wide advanced settings.
    ///
    /// # Errors
    ///
    ///  * [`MeError::IncompleteResponse`][1] when the array returned no
    ///    settings table.
    ///
    /// [1]: enum.MeError.html#variant.IncompleteResponse
    pub fn advanced_settings(&self) -> Result<AdvancedSettings> {
        first(self.session.fetch_all("show/advanced-settings", &no_params())?)
    }

    /// Gets the share of controller cache holding unwritable data.
    pub fn unwritable_cache(&self) -> Result<UnwritableCache> {
        first(self.session.fetch_all("show/unwritable-cache", &no_params())?)
    }

    /// Gets the installed license.
    pub fn license(&self) -> Result<Vec<License>> {
        self.session.fetch_all("show/license", &no_params())
    }

    /// Gets firmware versions, one record per controller.
    pub fn versions(&self) -> Result<Vec<Version>> {
        self.session.fetch_all("show/versions", &no_params())
    }

    pub fn ntp_status(&self) -> Result<Vec<NtpStatus>> {
        self.session.fetch_all("show/ntp-status", &no_params())
    }

    /// Gets the DNS settings of each controller.
    pub fn dns_parameters(&self) -> Result<Vec<DnsParameters>> {
        self.session.fetch_all("show/dns-parameters", &no_params())
    }

    /// Checks whether the system is ready for a firmware update.
    ///
    /// A failed readiness check is reported in the returned records, not as
    /// an error.
    pub fn firmware_upgrade_health(&self) -> Result<Vec<CodeLoadReadiness>> {
        self.session
            .fetch_all("check/firmware-upgrade-health", &no_params())
    }

    /// Create a user account.
    ///
    /// `roles` such as `monitor` or `manage`, `interfaces` such as `wbi`,
    /// `cli`, `ftp`. Empty lists leave the array defaults, as do `None` for
    /// `base` (`2` or `10`, the base of displayed sizes) and `timeout`
    /// (session idle seconds).
    ///
    /// # Errors
    ///
    ///  * [`MeError::ApiStatus`][1] when the user exists or the password
    ///    does not meet the array's rules.
    ///  * [`MeError::InvalidArgument`][2] when `base` is neither 2 nor 10.
    ///
    /// [1]: enum.MeError.html#variant.ApiStatus
    /// [2]: enum.MeError.html#variant.InvalidArgument
    pub fn user_create(
        &self,
        name: &str,
        password: &str,
        base: Option<u32>,
        roles: &[String],
        interfaces: &[String],
        timeout: Option<u32>,
    ) -> Result<()> {
        if let Some(b) = base {
            if b != 2 && b != 10 {
                return Err(MeError::InvalidArgument(format!(
                    "Storage size base must be 2 or 10, got {}",
                    b
                )));
            }
        }
        let mut params = Parameters::new();
        if let Some(b) = base {
            params.value("base", &b.to_string());
        }
        if !interfaces.is_empty() {
            params.list("interfaces", interfaces);
        }
        params.value("password", password);
        if !roles.is_empty() {
            params.list("roles", roles);
        }
        if let Some(t) = timeout {
            params.value("timeout", &t.to_string());
        }
        params.flag(name);
        self.invoke("create/user", &params)
    }

    /// Create a volume of `size` (e.g. `"4TB"`, `"100GiB"`) in `pool`.
    pub fn volume_create(&self, name: &str, pool: &str, size: &str) -> Result<()> {
        let mut params = Parameters::new();
        params.value("pool", pool).value("size", size).flag(name);
        self.invoke("create/volume", &params)
    }

    /// Create a host from initiator ids or nicknames, optionally placing it
    /// into `host_group`.
    pub fn host_create(
        &self,
        name: &str,
        initiators: &[String],
        host_group: Option<&str>,
    ) -> Result<()> {
        let mut params = Parameters::new();
        params.value_opt("host-group", host_group);
        params.list("initiators", initiators).flag(name);
        self.invoke("create/host", &params)
    }

    /// Create a linear disk group.
    ///
    /// `disks` uses the array's `enclosure.slot` notation, e.g. `0.0-9`.
    /// `chunk_size` and `spares` are left to the array when `None`/empty.
    pub fn linear_disk_group_create(
        &self,
        name: &str,
        disks: &str,
        level: RaidLevel,
        assigned_to: Controller,
        chunk_size: Option<&str>,
        spares: &[String],
    ) -> Result<()> {
        if level == RaidLevel::Adapt {
            return Err(MeError::InvalidArgument(
                "ADAPT is only available for virtual disk groups".to_string(),
            ));
        }
        let assigned = match assigned_to {
            Controller::Both => "auto",
            c => c.as_str(),
        };
        let mut params = Parameters::new();
        params
            .value("type", "linear")
            .flag(name)
            .value("disks", disks)
            .value("assigned-to", assigned)
            .value("level", level.as_str())
            .value_opt("chunk-size", chunk_size);
        if !spares.is_empty() {
            params.list("spare", spares);
        }
        self.invoke("add/disk-group", &params)
    }

    /// Create a virtual disk group in pool `a` or `b`.
    pub fn virtual_disk_group_create(
        &self,
        disks: &str,
        level: RaidLevel,
        pool: Controller,
    ) -> Result<()> {
        if pool == Controller::Both {
            return Err(MeError::InvalidArgument(
                "A virtual disk group belongs to pool a or pool b".to_string(),
            ));
        }
        let mut params = Parameters::new();
        params
            .value("type", "virtual")
            .value("disks", disks)
            .value("level", level.as_str())
            .value("pool", pool.as_str());
        self.invoke("add/disk-group", &params)
    }

    /// Add `hosts` to host group `name`.
    pub fn host_group_members_add(
        &self,
        name: &str,
        hosts: &[String],
    ) -> Result<()> {
        let mut params = Parameters::new();
        params.flag(name).list("hosts", hosts);
        self.invoke("add/host-group-members", &params)
    }

    fn delete_named(&self, endpoint: &str, names: &[String]) -> Result<()> {
        if names.is_empty() {
            return Err(MeError::InvalidArgument(format!(
                "{}: no names given",
                endpoint
            )));
        }
        let mut params = Parameters::new();
        params.flag(&names.join(","));
        self.invoke(endpoint, &params)
    }

    /// Delete pools with all their disk groups and volumes.
    ///
    /// # Errors
    ///
    ///  * [`MeError::InvalidArgument`][1] when `names` is empty.
    ///
    /// [1]: enum.MeError.html#variant.InvalidArgument
    pub fn pools_delete(&self, names: &[String]) -> Result<()> {
        self.delete_named("delete/pools", names)
    }

    /// Delete volumes.
    ///
    /// # Errors
    ///
    ///  * [`MeError::InvalidArgument`][1] when `names` is empty.
    ///
    /// [1]: enum.MeError.html#variant.InvalidArgument
    pub fn volumes_delete(&self, names: &[String]) -> Result<()> {
        self.delete_named("delete/volumes", names)
    }

    /// Delete hosts.
    pub fn hosts_delete(&self, names: &[String]) -> Result<()> {
        self.delete_named("delete/hosts", names)
    }

    pub fn user_delete(&self, name: &str) -> Result<()> {
        let mut params = Parameters::new();
        params.flag(name);
        self.invoke("delete/user", &params)
    }

    /// Update the system description. `None` fields are left unchanged.
    pub fn system_info_set(
        &self,
        contact: Option<&str>,
        info: Option<&str>,
        location: Option<&str>,
        name: Option<&str>,
    ) -> Result<()> {
        let mut params = Parameters::new();
        params
            .value_opt("contact", contact)
            .value_opt("info", info)
            .value_opt("location", location)
            .value_opt("name", name);
        if params.is_empty() {
            return Err(MeError::InvalidArgument(
                "Nothing to set on system".to_string(),
            ));
        }
        self.invoke("set/system", &params)
    }

    /// Map `volume` as `lun` to `initiators` (ids, nicknames or
    /// `host.*`/`hostgroup.*.*` wildcards) with `access` such as
    /// `read-write` or `read-only`.
    pub fn volume_map(
        &self,
        volume: &str,
        lun: u32,
        initiators: &[String],
        access: &str,
    ) -> Result<()> {
        let mut params = Parameters::new();
        params
            .value("access", access)
            .value("lun", &lun.to_string())
            .list("initiator", initiators)
            .flag(volume);
        self.invoke("map/volume", &params)
    }

    /// Remove the mapping of `volume` to `initiators`.
    pub fn volume_unmap(&self, volume: &str, initiators: &[String]) -> Result<()> {
        let mut params = Parameters::new();
        params.list("initiator", initiators).flag(volume);
        self.invoke("unmap/volume", &params)
    }

    /// Restart the management controller(s). Host I/O is not interrupted.
    pub fn restart_mc(&self, ctrl: Controller) -> Result<()> {
        let mut params = Parameters::new();
        params.flag(ctrl.as_str());
        self.invoke("restart/mc", &params)
    }

    /// Restart the storage controller(s).
    ///
    /// Restarting both controllers interrupts host I/O.
    pub fn restart_sc(&self, ctrl: Controller) -> Result<()> {
        let mut params = Parameters::new();
        params.flag(ctrl.as_str());
        self.invoke("restart/sc", &params)
    }
}
