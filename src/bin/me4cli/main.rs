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

extern crate clap;
extern crate me4storage;
extern crate tracing;
extern crate tracing_subscriber;

mod table;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use me4storage::{
    default_config_files, load_config_files, size_bytes_2_size_human,
    size_bytes_2_size_metric, size_human_2_size_bytes, time_duration_human,
    Client, CodeLoadReadiness, Controller, Health, MeError, RaidLevel, Result,
    SessionConfig, System, UnwritableCache,
};

use table::display_table;

/// Nagios style result of a command, used as the process exit status.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq)]
enum CheckResult {
    Ok = 0,
    Warning = 1,
    Critical = 2,
    Unknown = 3,
}

#[derive(Parser, Debug)]
#[command(
    name = "me4cli",
    version,
    about = "Manage Dell PowerVault ME4 storage arrays"
)]
struct Cli {
    /// Configuration file, may be given more than once [default:
    /// /etc/me4cli/me4cli.toml, .me4cli.toml]
    #[arg(short = 'f', long = "config-file", global = true)]
    config_file: Vec<PathBuf>,

    /// Enable debug messages
    #[arg(long, global = true)]
    debug: bool,

    /// Only show warnings and errors
    #[arg(long, global = true, conflicts_with = "debug")]
    quiet: bool,

    /// Disable coloured log output
    #[arg(long = "nocolour", alias = "nocolor", global = true)]
    nocolour: bool,

    /// Array management address
    #[arg(short = 'H', long, global = true)]
    api_host: Option<String>,

    #[arg(short = 'P', long, global = true)]
    api_port: Option<u16>,

    #[arg(short = 'u', long, global = true)]
    api_username: Option<String>,

    #[arg(short = 'p', long, global = true)]
    api_password: Option<String>,

    /// Do not verify the array's TLS certificate
    #[arg(long, global = true)]
    api_disable_tls_verification: bool,

    /// Per request timeout in seconds
    #[arg(long, global = true)]
    api_timeout: Option<u64>,

    /// Retries on connection errors and 429/5xx replies
    #[arg(long, global = true)]
    api_retries: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Display array configuration and state
    #[command(subcommand)]
    Show(ShowCmd),
    /// Run health checks, exit status follows Nagios conventions
    #[command(subcommand)]
    Check(CheckCmd),
    #[command(subcommand)]
    Create(CreateCmd),
    #[command(subcommand)]
    Add(AddCmd),
    #[command(subcommand)]
    Delete(DeleteCmd),
    #[command(subcommand)]
    Modify(ModifyCmd),
    #[command(subcommand)]
    Map(MapCmd),
    #[command(subcommand)]
    Unmap(UnmapCmd),
    /// Restart management or storage controllers
    #[command(subcommand)]
    Restart(RestartCmd),
}

#[derive(Subcommand, Debug)]
enum ShowCmd {
    System,
    ServiceTags,
    Pools,
    DiskGroups,
    Volumes,
    Hosts,
    HostGroups,
    /// Volume to host mappings
    Maps,
    Users {
        /// Only show this user
        #[arg(long)]
        user: Option<String>,
    },
    Certificates {
        #[arg(long, value_enum, default_value = "both")]
        controller: ControllerArg,
    },
    Network,
    AdvancedSettings,
    License,
    /// Firmware versions of each controller
    Versions,
    Ntp,
    Dns,
}

#[derive(Subcommand, Debug)]
enum CheckCmd {
    /// WARNING when any system is not healthy
    Health,
    /// CRITICAL when a firmware update would be unsafe
    FirmwareReadiness,
}

#[derive(Subcommand, Debug)]
enum CreateCmd {
    User {
        name: String,
        #[arg(long)]
        password: String,
        /// e.g. monitor,manage
        #[arg(long, value_delimiter = ',')]
        roles: Vec<String>,
        /// e.g. wbi,cli,ftp
        #[arg(long, value_delimiter = ',')]
        interfaces: Vec<String>,
        /// Base of displayed storage sizes
        #[arg(long, value_parser = ["2", "10"])]
        base: Option<String>,
        /// Session idle timeout in seconds
        #[arg(long)]
        timeout: Option<u32>,
    },
    Volume {
        name: String,
        #[arg(long)]
        pool: String,
        /// e.g. 4TB, 100GiB
        #[arg(long)]
        size: String,
    },
    Host {
        name: String,
        #[arg(long, value_delimiter = ',', required = true)]
        initiators: Vec<String>,
        #[arg(long)]
        host_group: Option<String>,
    },
    #[command(subcommand)]
    DiskGroup(DiskGroupCmd),
}

#[derive(Subcommand, Debug)]
enum DiskGroupCmd {
    Linear(LinearDiskGroupArgs),
    Virtual {
        #[arg(long)]
        disks: String,
        #[arg(long, value_enum)]
        level: RaidArg,
        #[arg(long, value_enum)]
        pool: ControllerArg,
    },
}

#[derive(Args, Debug)]
struct LinearDiskGroupArgs {
    #[arg(long)]
    name: String,
    /// Disks in enclosure.slot notation, e.g. 0.0-9
    #[arg(long)]
    disks: String,
    #[arg(long, value_enum)]
    level: RaidArg,
    /// `both` lets the array choose
    #[arg(long, value_enum, default_value = "both")]
    assigned_to: ControllerArg,
    #[arg(long)]
    chunk_size: Option<String>,
    #[arg(long, value_delimiter = ',')]
    spare: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum AddCmd {
    HostGroupMembers {
        name: String,
        #[arg(long, value_delimiter = ',', required = true)]
        hosts: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
enum DeleteCmd {
    /// Delete pools with all their disk groups and volumes
    Pools {
        #[arg(long, conflicts_with = "names")]
        all: bool,
        #[arg(required_unless_present = "all")]
        names: Vec<String>,
    },
    Volumes {
        #[arg(required = true)]
        names: Vec<String>,
    },
    Hosts {
        #[arg(required = true)]
        names: Vec<String>,
    },
    Users {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ModifyCmd {
    System {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        info: Option<String>,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum MapCmd {
    Volume {
        volume: String,
        #[arg(long)]
        lun: u32,
        /// Initiators, host.* or hostgroup.*.*
        #[arg(long, value_delimiter = ',', required = true)]
        initiators: Vec<String>,
        #[arg(long, default_value = "read-write")]
        access: String,
    },
}

#[derive(Subcommand, Debug)]
enum UnmapCmd {
    Volume {
        volume: String,
        #[arg(long, value_delimiter = ',', required = true)]
        initiators: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
enum RestartCmd {
    Mc {
        #[arg(value_enum, default_value = "both")]
        controller: ControllerArg,
    },
    Sc {
        #[arg(value_enum, default_value = "both")]
        controller: ControllerArg,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ControllerArg {
    A,
    B,
    Both,
}

impl From<ControllerArg> for Controller {
    fn from(c: ControllerArg) -> Controller {
        match c {
            ControllerArg::A => Controller::A,
            ControllerArg::B => Controller::B,
            ControllerArg::Both => Controller::Both,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RaidArg {
    Raid1,
    Raid5,
    Raid6,
    Raid10,
    Adapt,
}

impl From<RaidArg> for RaidLevel {
    fn from(r: RaidArg) -> RaidLevel {
        match r {
            RaidArg::Raid1 => RaidLevel::Raid1,
            RaidArg::Raid5 => RaidLevel::Raid5,
            RaidArg::Raid6 => RaidLevel::Raid6,
            RaidArg::Raid10 => RaidLevel::Raid10,
            RaidArg::Adapt => RaidLevel::Adapt,
        }
    }
}

fn init_logging(cli: &Cli) {
    let default_level = if cli.debug {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.nocolour)
        .with_target(false)
        .init();
}

/// Defaults, then config files in order, then command line.
fn session_config(cli: &Cli) -> Result<SessionConfig> {
    let files = if cli.config_file.is_empty() {
        default_config_files()
    } else {
        cli.config_file.clone()
    };
    let mut cfg = load_config_files(&files)?.session_config();
    apply_overrides(cli, &mut cfg);
    Ok(cfg)
}

fn apply_overrides(cli: &Cli, cfg: &mut SessionConfig) {
    if let Some(ref h) = cli.api_host {
        cfg.host = h.clone();
    }
    if let Some(p) = cli.api_port {
        cfg.port = p;
    }
    if let Some(ref u) = cli.api_username {
        cfg.username = u.clone();
    }
    if let Some(ref p) = cli.api_password {
        cfg.password = p.clone();
    }
    if cli.api_disable_tls_verification {
        cfg.verify = false;
    }
    if let Some(t) = cli.api_timeout {
        cfg.timeout = Duration::from_secs(t);
    }
    if let Some(r) = cli.api_retries {
        cfg.retries = r;
    }
}

/// WARNING when any system is not healthy, UNKNOWN when there is none.
fn health_result(systems: &[System]) -> CheckResult {
    if systems.is_empty() {
        CheckResult::Unknown
    } else if systems.iter().all(System::is_healthy) {
        CheckResult::Ok
    } else {
        CheckResult::Warning
    }
}

/// CRITICAL when the array reports a readiness problem or holds
/// unwritable cache data.
fn firmware_result(
    readiness: &[CodeLoadReadiness],
    cache: &UnwritableCache,
) -> CheckResult {
    if cache.has_unwritable_data() || readiness.iter().any(|r| !r.is_ready()) {
        CheckResult::Critical
    } else if readiness.is_empty() {
        CheckResult::Unknown
    } else {
        CheckResult::Ok
    }
}

fn show(c: &Client, what: &ShowCmd) -> Result<CheckResult> {
    match *what {
        ShowCmd::System => {
            let rows = c
                .systems()?
                .into_iter()
                .map(|s| {
                    vec![
                        s.system_name,
                        s.product_id,
                        s.midplane_serial_number,
                        s.system_location,
                        s.system_contact,
                        s.health,
                    ]
                })
                .collect::<Vec<_>>();
            display_table(
                &["Name", "Product", "Serial", "Location", "Contact", "Health"],
                &rows,
            );
        }
        ShowCmd::ServiceTags => {
            let rows = c
                .service_tag_info()?
                .into_iter()
                .map(|t| vec![t.enclosure_id.to_string(), t.service_tag])
                .collect::<Vec<_>>();
            display_table(&["Enclosure", "Service Tag"], &rows);
        }
        ShowCmd::Pools => {
            let rows = c
                .pools()?
                .into_iter()
                .map(|p| {
                    vec![
                        p.name,
                        p.storage_type,
                        p.total_size,
                        p.total_avail,
                        p.owner,
                        p.disk_groups.len().to_string(),
                        p.health,
                    ]
                })
                .collect::<Vec<_>>();
            display_table(
                &["Name", "Type", "Size", "Available", "Owner", "Disk Groups", "Health"],
                &rows,
            );
        }
        ShowCmd::DiskGroups => {
            let rows = c
                .disk_groups()?
                .into_iter()
                .map(|d| {
                    vec![
                        d.name,
                        d.pool,
                        d.raidtype,
                        d.diskcount.to_string(),
                        d.sparecount.to_string(),
                        d.size,
                        d.freespace,
                        d.owner,
                        d.current_job,
                        d.health,
                    ]
                })
                .collect::<Vec<_>>();
            display_table(
                &[
                    "Name", "Pool", "RAID", "Disks", "Spares", "Size", "Free",
                    "Owner", "Job", "Health",
                ],
                &rows,
            );
        }
        ShowCmd::Volumes => {
            let rows = c
                .volumes()?
                .into_iter()
                .map(|v| {
                    vec![
                        v.volume_name,
                        v.storage_pool_name,
                        v.size,
                        v.allocated_size,
                        v.raidtype,
                        v.owner,
                        v.serial_number,
                        v.health,
                    ]
                })
                .collect::<Vec<_>>();
            display_table(
                &[
                    "Name", "Pool", "Size", "Allocated", "RAID", "Owner",
                    "Serial", "Health",
                ],
                &rows,
            );
        }
        ShowCmd::Hosts => {
            let mut rows = Vec::new();
            for h in c.hosts()? {
                let initiators = h
                    .initiator
                    .iter()
                    .map(|i| i.id.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                rows.push(vec![h.name, h.host_group, initiators]);
            }
            display_table(&["Name", "Host Group", "Initiators"], &rows);
        }
        ShowCmd::HostGroups => {
            let rows = c
                .host_groups()?
                .into_iter()
                .map(|g| {
                    let hosts = g
                        .hosts
                        .iter()
                        .map(|h| h.name.as_str())
                        .collect::<Vec<_>>()
                        .join(",");
                    vec![g.name, g.member_count.to_string(), hosts]
                })
                .collect::<Vec<_>>();
            display_table(&["Name", "Members", "Hosts"], &rows);
        }
        ShowCmd::Maps => {
            let mut rows = Vec::new();
            for view in c.mappings()? {
                for m in view.volume_view_mappings {
                    rows.push(vec![
                        view.volume_name.clone(),
                        m.identifier,
                        m.nickname,
                        m.lun,
                        m.access,
                        m.ports,
                    ]);
                }
            }
            display_table(
                &["Volume", "Initiator", "Nickname", "LUN", "Access", "Ports"],
                &rows,
            );
        }
        ShowCmd::Users { ref user } => {
            let rows = c
                .users(user.as_ref().map(String::as_str))?
                .into_iter()
                .map(|u| {
                    let yes_no = |b: bool| (if b { "yes" } else { "no" }).to_string();
                    let web = yes_no(u.web_enabled());
                    let cli = yes_no(u.cli_enabled());
                    let ftp = yes_no(u.ftp_enabled());
                    let timeout = time_duration_human(u.timeout.max(0) as u64);
                    vec![u.username, u.roles, web, cli, ftp, timeout]
                })
                .collect::<Vec<_>>();
            display_table(
                &["User", "Roles", "WBI", "CLI", "FTP", "Timeout"],
                &rows,
            );
        }
        ShowCmd::Certificates { controller } => {
            for cert in c.certificates(controller.into())? {
                println!(
                    "Controller {}: {} ({})",
                    cert.controller, cert.certificate_status, cert.certificate_time
                );
                println!("{}", cert.certificate_text);
            }
        }
        ShowCmd::Network => {
            let rows = c
                .network_parameters()?
                .into_iter()
                .map(|n| {
                    vec![
                        n.controller(),
                        n.ip_address,
                        n.subnet_mask,
                        n.gateway,
                        n.mac_address,
                        n.addressing_mode,
                        n.health,
                    ]
                })
                .collect::<Vec<_>>();
            display_table(
                &["Controller", "IP", "Netmask", "Gateway", "MAC", "Mode", "Health"],
                &rows,
            );
        }
        ShowCmd::AdvancedSettings => {
            let s = c.advanced_settings()?;
            let rows = vec![
                vec!["Background scrub".to_string(), s.background_scrub],
                vec![
                    "Background scrub interval".to_string(),
                    s.background_scrub_interval,
                ],
                vec!["Background disk scrub".to_string(), s.background_disk_scrub],
                vec![
                    "Partner firmware upgrade".to_string(),
                    s.partner_firmware_upgrade,
                ],
                vec!["Utility priority".to_string(), s.utility_priority],
                vec!["SMART".to_string(), s.smart],
                vec!["Dynamic spares".to_string(), s.dynamic_spares],
            ];
            display_table(&["Setting", "Value"], &rows);
        }
        ShowCmd::License => {
            for lic in c.license()? {
                println!("License key: {}", lic.license_key);
            }
        }
        ShowCmd::Versions => {
            let rows = c
                .versions()?
                .into_iter()
                .map(|v| {
                    vec![
                        v.object_name,
                        v.bundle_version,
                        v.sc_fw,
                        v.mc_fw,
                        v.ec_fw,
                        v.build_date,
                    ]
                })
                .collect::<Vec<_>>();
            display_table(
                &["Controller", "Bundle", "SC", "MC", "EC", "Built"],
                &rows,
            );
        }
        ShowCmd::Ntp => {
            let rows = c
                .ntp_status()?
                .into_iter()
                .map(|n| vec![n.ntp_status, n.ntp_server_address, n.ntp_contact_time])
                .collect::<Vec<_>>();
            display_table(&["Status", "Server", "Last Contact"], &rows);
        }
        ShowCmd::Dns => {
            let rows = c
                .dns_parameters()?
                .into_iter()
                .map(|d| vec![d.controller, d.name_servers, d.search_domains])
                .collect::<Vec<_>>();
            display_table(&["Controller", "Name Servers", "Search Domains"], &rows);
        }
    }
    Ok(CheckResult::Ok)
}

fn check(c: &Client, what: &CheckCmd) -> Result<CheckResult> {
    match *what {
        CheckCmd::Health => {
            let systems = c.systems()?;
            if systems.is_empty() {
                println!("No system reported by the array");
            }
            for system in &systems {
                println!("System: {}", system.system_name);
                println!("\tHealth: {}", system.health);
                println!("\tProduct Type: {}", system.product_id);
                if !system.is_healthy() {
                    println!("\tReason: {}", system.health_reason);
                    for comp in &system.unhealthy_component {
                        println!(
                            "\t{} {}: {} ({})",
                            comp.component_type,
                            comp.component_id,
                            comp.health,
                            comp.health_reason
                        );
                    }
                }
            }
            Ok(health_result(&systems))
        }
        CheckCmd::FirmwareReadiness => {
            let readiness = c.firmware_upgrade_health()?;
            if readiness.is_empty() {
                println!("No firmware update readiness reported by the array");
            }
            for r in &readiness {
                println!("Firmware update readiness: {}", r.overall_health);
                for reason in &r.code_load_readiness_reasons {
                    println!("\t{}", reason.readiness_reason);
                    println!("\t\tRisk: {}", reason.failure_risks);
                }
            }
            let cache = c.unwritable_cache()?;
            if cache.has_unwritable_data() {
                println!(
                    "Unwritable cache data present: controller A {}%, \
                     controller B {}%",
                    cache.unwritable_a_percentage, cache.unwritable_b_percentage
                );
            }
            let unhealthy = c
                .systems()?
                .into_iter()
                .filter(|s| Health::from(s.health_numeric) != Health::Ok)
                .count();
            if unhealthy > 0 {
                warn!("{} system(s) not healthy, check before updating", unhealthy);
            }
            Ok(firmware_result(&readiness, &cache))
        }
    }
}

fn create(c: &Client, what: &CreateCmd) -> Result<CheckResult> {
    match *what {
        CreateCmd::User {
            ref name,
            ref password,
            ref roles,
            ref interfaces,
            ref base,
            timeout,
        } => {
            let base = match *base {
                Some(ref b) => Some(b.parse::<u32>().map_err(|_| {
                    MeError::InvalidArgument(format!("Invalid base '{}'", b))
                })?),
                None => None,
            };
            info!("Creating user {}", name);
            c.user_create(name, password, base, roles, interfaces, timeout)?;
        }
        CreateCmd::Volume {
            ref name,
            ref pool,
            ref size,
        } => {
            let bytes = size_human_2_size_bytes(size)?;
            info!(
                "Creating volume {} of {} ({}) in pool {}",
                name,
                size_bytes_2_size_metric(bytes),
                size_bytes_2_size_human(bytes),
                pool
            );
            c.volume_create(name, pool, size)?;
        }
        CreateCmd::Host {
            ref name,
            ref initiators,
            ref host_group,
        } => {
            info!("Creating host {} with initiators {}", name, initiators.join(","));
            c.host_create(name, initiators, host_group.as_ref().map(String::as_str))?;
        }
        CreateCmd::DiskGroup(DiskGroupCmd::Linear(ref a)) => {
            info!(
                "Creating linear disk group {} on disks {}",
                a.name, a.disks
            );
            c.linear_disk_group_create(
                &a.name,
                &a.disks,
                a.level.into(),
                a.assigned_to.into(),
                a.chunk_size.as_ref().map(String::as_str),
                &a.spare,
            )?;
        }
        CreateCmd::DiskGroup(DiskGroupCmd::Virtual {
            ref disks,
            level,
            pool,
        }) => {
            let pool: Controller = pool.into();
            info!(
                "Creating virtual disk group in pool {} on disks {}",
                pool.as_str(),
                disks
            );
            c.virtual_disk_group_create(disks, level.into(), pool)?;
        }
    }
    Ok(CheckResult::Ok)
}

fn delete(c: &Client, what: &DeleteCmd) -> Result<CheckResult> {
    match *what {
        DeleteCmd::Pools { all, ref names } => {
            let existing: Vec<String> =
                c.pools()?.into_iter().map(|p| p.name).collect();
            let targets: Vec<String> = if all {
                existing
            } else {
                let mut found = Vec::new();
                for name in names {
                    if existing.contains(name) {
                        found.push(name.clone());
                    } else {
                        warn!("Pool {} does not exist", name);
                    }
                }
                found
            };
            if targets.is_empty() {
                info!("No pools to delete");
                return Ok(CheckResult::Ok);
            }
            info!("Deleting pools {}", targets.join(","));
            c.pools_delete(&targets)?;
        }
        DeleteCmd::Volumes { ref names } => {
            info!("Deleting volumes {}", names.join(","));
            c.volumes_delete(names)?;
        }
        DeleteCmd::Hosts { ref names } => {
            info!("Deleting hosts {}", names.join(","));
            c.hosts_delete(names)?;
        }
        DeleteCmd::Users { ref names } => {
            for name in names {
                info!("Deleting user {}", name);
                c.user_delete(name)?;
            }
        }
    }
    Ok(CheckResult::Ok)
}

fn run(cli: &Cli) -> Result<CheckResult> {
    let cfg = session_config(cli)?;
    if !cfg.verify {
        warn!("TLS certificate verification disabled for {}", cfg.host);
    }
    let c = Client::new(&cfg)?;

    match cli.command {
        Command::Show(ref what) => show(&c, what),
        Command::Check(ref what) => check(&c, what),
        Command::Create(ref what) => create(&c, what),
        Command::Add(AddCmd::HostGroupMembers {
            ref name,
            ref hosts,
        }) => {
            info!("Adding hosts {} to host group {}", hosts.join(","), name);
            c.host_group_members_add(name, hosts)?;
            Ok(CheckResult::Ok)
        }
        Command::Delete(ref what) => delete(&c, what),
        Command::Modify(ModifyCmd::System {
            ref name,
            ref info,
            ref contact,
            ref location,
        }) => {
            c.system_info_set(
                contact.as_ref().map(String::as_str),
                info.as_ref().map(String::as_str),
                location.as_ref().map(String::as_str),
                name.as_ref().map(String::as_str),
            )?;
            Ok(CheckResult::Ok)
        }
        Command::Map(MapCmd::Volume {
            ref volume,
            lun,
            ref initiators,
            ref access,
        }) => {
            info!("Mapping volume {} as LUN {}", volume, lun);
            c.volume_map(volume, lun, initiators, access)?;
            Ok(CheckResult::Ok)
        }
        Command::Unmap(UnmapCmd::Volume {
            ref volume,
            ref initiators,
        }) => {
            info!("Unmapping volume {}", volume);
            c.volume_unmap(volume, initiators)?;
            Ok(CheckResult::Ok)
        }
        Command::Restart(RestartCmd::Mc { controller }) => {
            let ctrl: Controller = controller.into();
            info!("Restarting management controller {}", ctrl.as_str());
            c.restart_mc(ctrl)?;
            Ok(CheckResult::Ok)
        }
        Command::Restart(RestartCmd::Sc { controller }) => {
            let ctrl: Controller = controller.into();
            info!("Restarting storage controller {}", ctrl.as_str());
            c.restart_sc(ctrl)?;
            Ok(CheckResult::Ok)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(rc) => ExitCode::from(rc as u8),
        Err(e) => {
            report(&e);
            ExitCode::from(CheckResult::Critical as u8)
        }
    }
}

fn report(e: &MeError) {
    match *e {
        MeError::Login(_) => {
            error!("Exception {}: check api_username and api_password", e.summary())
        }
        _ => error!("Exception {}: {}", e.summary(), e),
    }
}
