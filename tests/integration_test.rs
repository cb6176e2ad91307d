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

extern crate me4storage;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use me4storage::*;

const API: &str = "https://me4.example.com:443/api/";
const SESSION_KEY: &str = "e8b4ff5a0c1d2e3f";
const OK_STATUS: &str = r#""status": [{"response-type": "Success",
    "response-type-numeric": 0, "response": "Command completed successfully.",
    "return-code": 0, "component-id": "", "time-stamp": "2020-01-01 10:00:00",
    "time-stamp-numeric": 1577872800}]"#;

struct Request {
    url: String,
    headers: Vec<(String, String)>,
}

/// Replays canned replies and records every request.
#[derive(Default)]
struct ScriptedArray {
    replies: RefCell<VecDeque<Result<HttpReply>>>,
    requests: RefCell<Vec<Request>>,
}

impl ScriptedArray {
    fn reply(self, status: u16, body: &str) -> ScriptedArray {
        self.replies.borrow_mut().push_back(Ok(HttpReply {
            status,
            body: body.to_string(),
        }));
        self
    }

    fn fail(self, e: MeError) -> ScriptedArray {
        self.replies.borrow_mut().push_back(Err(e));
        self
    }

    fn logged_in(self) -> ScriptedArray {
        let login = format!(
            r#"{{"status": [{{"response-type": "Success",
                "response-type-numeric": 0, "response": "{}",
                "return-code": 0}}]}}"#,
            SESSION_KEY
        );
        self.reply(200, &login)
    }

    fn urls(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|r| r.url.clone()).collect()
    }
}

impl Transport for ScriptedArray {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpReply> {
        self.requests.borrow_mut().push(Request {
            url: url.to_string(),
            headers: headers
                .iter()
                .map(|&(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        match self.replies.borrow_mut().pop_front() {
            Some(r) => r,
            None => Err(MeError::NetworkError("script exhausted".to_string())),
        }
    }
}

fn config() -> SessionConfig {
    SessionConfig {
        host: "me4.example.com".to_string(),
        username: "manage".to_string(),
        password: "!manage".to_string(),
        retries: 2,
        backoff_factor: Duration::from_millis(0),
        ..Default::default()
    }
}

fn connect(array: ScriptedArray) -> Client<ScriptedArray> {
    Client::from_session(Session::with_transport(array, &config()).unwrap())
}

fn requests_of(c: &Client<ScriptedArray>) -> Vec<String> {
    c.session().transport().urls()
}

#[test]
fn login_and_list_volumes() {
    let c = connect(ScriptedArray::default().logged_in().reply(
        200,
        &format!(
            r#"{{{}, "volumes": [
                {{"durable-id": "V0", "volume-name": "lustre-ost0",
                  "storage-pool-name": "A", "virtual-disk-name": "dg01",
                  "size": "96.0TB", "size-numeric": 187500000000,
                  "allocated-size": "96.0TB",
                  "allocated-size-numeric": 187500000000,
                  "storage-type": "Linear", "owner": "A",
                  "serial-number": "00c0ff3c5a0a000012", "write-policy": "write-back",
                  "volume-type": "base", "raidtype": "RAID6",
                  "health": "OK", "health-numeric": 0, "health-reason": ""}}]}}"#,
            OK_STATUS
        ),
    ));
    assert_eq!(SESSION_KEY, c.session().session_key());

    let vols = c.volumes().unwrap();
    assert_eq!(1, vols.len());
    assert_eq!("lustre-ost0", vols[0].volume_name);
    assert_eq!(187_500_000_000, vols[0].size_numeric);

    let array = c.session().transport();
    let requests = array.requests.borrow();
    assert_eq!(
        format!("{}login/{}", API, login_digest("manage", "!manage")),
        requests[0].url
    );
    assert_eq!(
        vec![("datatype".to_string(), "json".to_string())],
        requests[0].headers
    );
    assert_eq!(format!("{}show/volumes", API), requests[1].url);
    assert!(requests[1]
        .headers
        .contains(&("sessionKey".to_string(), SESSION_KEY.to_string())));
    assert!(requests[1]
        .headers
        .contains(&("datatype".to_string(), "json".to_string())));
}

#[test]
fn plain_text_success_for_mutations() {
    let c = connect(
        ScriptedArray::default()
            .logged_in()
            .reply(200, "Success: Command completed successfully. (alice)"),
    );
    c.user_create(
        "alice",
        "pa ss#1",
        None,
        &["manage".to_string()],
        &["wbi".to_string(), "cli".to_string()],
        None,
    )
    .unwrap();
    assert_eq!(
        format!(
            "{}create/user/interfaces/\"wbi,cli\"/password/\"pa%20ss%231\"\
             /roles/\"manage\"/alice",
            API
        ),
        requests_of(&c)[1]
    );
}

#[test]
fn linear_disk_group_parameter_order() {
    let c = connect(
        ScriptedArray::default()
            .logged_in()
            .reply(200, &format!("{{{}}}", OK_STATUS)),
    );
    c.linear_disk_group_create(
        "dg01",
        "0.0-9",
        RaidLevel::Raid6,
        Controller::A,
        Some("512k"),
        &["0.10".to_string(), "0.11".to_string()],
    )
    .unwrap();
    assert_eq!(
        format!(
            "{}add/disk-group/type/\"linear\"/dg01/disks/\"0.0-9\"\
             /assigned-to/\"a\"/level/\"raid6\"/chunk-size/\"512k\"\
             /spare/\"0.10,0.11\"",
            API
        ),
        requests_of(&c)[1]
    );
}

#[test]
fn adapt_is_rejected_for_linear_groups() {
    let c = connect(ScriptedArray::default().logged_in());
    match c.linear_disk_group_create(
        "dg01",
        "0.0-9",
        RaidLevel::Adapt,
        Controller::Both,
        None,
        &[],
    ) {
        Err(MeError::InvalidArgument(_)) => (),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(1, requests_of(&c).len());
}

#[test]
fn failed_command_reports_return_code() {
    let body = r#"{"status": [{"response-type": "Error",
        "response-type-numeric": 1,
        "response": "The specified name is already in use.",
        "return-code": -10029}]}"#;
    let c = connect(ScriptedArray::default().logged_in().reply(200, body));
    match c.volume_create("vol1", "A", "1TB") {
        Err(MeError::ApiStatus {
            code,
            message,
            body: raw,
        }) => {
            assert_eq!(-10029, code);
            assert_eq!("The specified name is already in use.", message);
            assert_eq!(body, raw);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn response_without_status() {
    let c = connect(
        ScriptedArray::default()
            .logged_in()
            .reply(200, r#"{"pools": []}"#),
    );
    match c.pools() {
        Err(MeError::MissingStatus(_)) => (),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn collection_where_object_expected() {
    let tags = format!(
        r#"{{{}, "service-tag-info": [{{"service-tag": "7XK2Q53",
            "enclosure-id": 0}}]}}"#,
        OK_STATUS
    );
    let c = connect(
        ScriptedArray::default()
            .logged_in()
            .reply(200, &tags)
            .reply(200, "[{\"status\": []}]"),
    );
    match c
        .session()
        .fetch_one::<ServiceTagInfo>("show/service-tag-info", &Parameters::new())
    {
        Err(MeError::ShapeMismatch(_)) => (),
        other => panic!("unexpected {:?}", other),
    }
    match c.session().fetch("show/system") {
        Err(MeError::ShapeMismatch(_)) => (),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn busy_array_is_retried() {
    let c = connect(
        ScriptedArray::default()
            .logged_in()
            .reply(503, "busy")
            .fail(MeError::TimeOut("read timed out".to_string()))
            .reply(
                200,
                &format!(
                    r#"{{{}, "service-tag-info": [{{"service-tag": "7XK2Q53",
                        "enclosure-id": 0}}]}}"#,
                    OK_STATUS
                ),
            ),
    );
    let tags = c.service_tag_info().unwrap();
    assert_eq!("7XK2Q53", tags[0].service_tag);
    // login + 3 attempts
    assert_eq!(4, requests_of(&c).len());
}

#[test]
fn retries_are_bounded() {
    let mut array = ScriptedArray::default().logged_in();
    for _ in 0..10 {
        array = array.reply(503, "busy");
    }
    let c = connect(array);
    match c.systems() {
        Err(MeError::HttpStatus { status, body }) => {
            assert_eq!(503, status);
            assert_eq!("busy", body);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(1 + 3, requests_of(&c).len());
}

#[test]
fn client_errors_are_not_retried() {
    let c = connect(
        ScriptedArray::default()
            .logged_in()
            .reply(404, "not found"),
    );
    match c.disk_groups() {
        Err(MeError::HttpStatus { status, .. }) => assert_eq!(404, status),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(2, requests_of(&c).len());
}

#[test]
fn bad_credentials() {
    let array = ScriptedArray::default().reply(
        200,
        r#"{"status": [{"response-type": "Error",
            "response": "Authentication Unsuccessful", "return-code": 2}]}"#,
    );
    match Session::with_transport(array, &config()) {
        Err(MeError::Login(body)) => {
            assert!(body.contains("Authentication Unsuccessful"))
        }
        Err(e) => panic!("unexpected {:?}", e),
        Ok(_) => panic!("login should fail"),
    }
}

#[test]
fn hosts_come_from_host_groups() {
    let body = format!(
        r#"{{{}, "host-group": [
            {{"durable-id": "HGU", "name": "-ungrouped-",
              "serial-number": "UNGROUPEDHOSTS", "member-count": 1,
              "host": [{{"durable-id": "H1", "name": "oss1",
                "serial-number": "00c0ff01", "member-count": 1,
                "host-group": "UNGROUPEDHOSTS", "initiator": []}}]}},
            {{"durable-id": "HG0", "name": "lustre",
              "serial-number": "00c0ff02", "member-count": 2,
              "host": [
                {{"durable-id": "H2", "name": "oss2",
                  "serial-number": "00c0ff03", "member-count": 1,
                  "host-group": "00c0ff02", "initiator": []}},
                {{"durable-id": "H3", "name": "oss3",
                  "serial-number": "00c0ff04", "member-count": 1,
                  "host-group": "00c0ff02", "initiator": []}}]}}]}}"#,
        OK_STATUS
    );
    let c = connect(ScriptedArray::default().logged_in().reply(200, &body));
    let names: Vec<String> = c.hosts().unwrap().into_iter().map(|h| h.name).collect();
    assert_eq!(vec!["oss1", "oss2", "oss3"], names);
    assert_eq!(format!("{}show/host-groups", API), requests_of(&c)[1]);
}

#[test]
fn deleting_nothing_sends_nothing() {
    let c = connect(ScriptedArray::default().logged_in());
    match c.pools_delete(&[]) {
        Err(MeError::InvalidArgument(_)) => (),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(1, requests_of(&c).len());
}

#[test]
fn restart_and_map_paths() {
    let ok = format!("{{{}}}", OK_STATUS);
    let c = connect(
        ScriptedArray::default()
            .logged_in()
            .reply(200, &ok)
            .reply(200, &ok)
            .reply(200, &ok)
            .reply(200, &ok),
    );
    c.restart_mc(Controller::Both).unwrap();
    c.pools_delete(&["A".to_string(), "B".to_string()]).unwrap();
    c.volume_map("vol1", 3, &["oss1.*".to_string()], "read-write")
        .unwrap();
    c.system_info_set(None, Some("Lustre OSS array"), None, None)
        .unwrap();
    let urls = requests_of(&c);
    assert_eq!(format!("{}restart/mc/both", API), urls[1]);
    assert_eq!(format!("{}delete/pools/A,B", API), urls[2]);
    assert_eq!(
        format!(
            "{}map/volume/access/\"read-write\"/lun/\"3\"\
             /initiator/\"oss1.*\"/vol1",
            API
        ),
        urls[3]
    );
    assert_eq!(
        format!("{}set/system/info/\"Lustre%20OSS%20array\"", API),
        urls[4]
    );
}

#[test]
fn user_size_base_and_timeout() {
    let c = connect(
        ScriptedArray::default()
            .logged_in()
            .reply(200, "Success: Command completed successfully. (bob)"),
    );
    c.user_create("bob", "Secret1!", Some(10), &[], &[], Some(1800))
        .unwrap();
    assert_eq!(
        format!(
            "{}create/user/base/\"10\"/password/\"Secret1%21\"\
             /timeout/\"1800\"/bob",
            API
        ),
        requests_of(&c)[1]
    );
    match c.user_create("carol", "Secret1!", Some(8), &[], &[], None) {
        Err(MeError::InvalidArgument(_)) => (),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(2, requests_of(&c).len());
}

#[test]
fn license_and_versions() {
    let c = connect(
        ScriptedArray::default()
            .logged_in()
            .reply(
                200,
                &format!(
                    r#"{{{}, "license": [{{"license-key": "0004b56810fae46b9b07a8b24d0e2b5a",
                        "virtualization": "Enabled"}}]}}"#,
                    OK_STATUS
                ),
            )
            .reply(
                200,
                &format!(
                    r#"{{{}, "versions": [
                        {{"object-name": "controller-a-versions",
                          "bundle-version": "GT280R010-01",
                          "bundle-base-version": "GT280R010",
                          "build-date": "Mon Aug 24 11:10:44 MDT 2020",
                          "sc-fw": "GTS280R10-01", "mc-fw": "GTM280R010-01",
                          "ec-fw": "3022", "pld-rev": "6", "hw-rev": "5.1"}},
                        {{"object-name": "controller-b-versions",
                          "bundle-version": "GT280R010-01",
                          "bundle-base-version": "GT280R010",
                          "build-date": "Mon Aug 24 11:10:44 MDT 2020",
                          "sc-fw": "GTS280R10-01", "mc-fw": "GTM280R010-01"}}]}}"#,
                    OK_STATUS
                ),
            ),
    );
    let lic = c.license().unwrap();
    assert_eq!("0004b56810fae46b9b07a8b24d0e2b5a", lic[0].license_key);

    let versions = c.versions().unwrap();
    assert_eq!(2, versions.len());
    assert_eq!("controller-b-versions", versions[1].object_name);
    assert_eq!("5.1", versions[0].hw_rev);

    let urls = requests_of(&c);
    assert_eq!(format!("{}show/license", API), urls[1]);
    assert_eq!(format!("{}show/versions", API), urls[2]);
}

#[test]
fn ntp_and_dns() {
    let c = connect(
        ScriptedArray::default()
            .logged_in()
            .reply(
                200,
                &format!(
                    r#"{{{}, "ntp-status": [{{"ntp-status": "activated",
                        "ntp-server-address": "10.0.0.123",
                        "ntp-contact-time": "2020-09-01 10:00:00"}}]}}"#,
                    OK_STATUS
                ),
            )
            .reply(
                200,
                &format!(
                    r#"{{{}, "dns-parameters": [
                        {{"controller": "A", "controller-numeric": 1,
                          "name-servers": "10.0.0.53",
                          "search-domains": "example.com"}},
                        {{"controller": "B", "controller-numeric": 0,
                          "name-servers": "10.0.0.53",
                          "search-domains": "example.com"}}]}}"#,
                    OK_STATUS
                ),
            ),
    );
    let ntp = c.ntp_status().unwrap();
    assert_eq!("activated", ntp[0].ntp_status);
    assert_eq!("10.0.0.123", ntp[0].ntp_server_address);

    let dns = c.dns_parameters().unwrap();
    assert_eq!(vec!["A", "B"], dns.iter().map(|d| d.controller.as_str()).collect::<Vec<_>>());

    let urls = requests_of(&c);
    assert_eq!(format!("{}show/ntp-status", API), urls[1]);
    assert_eq!(format!("{}show/dns-parameters", API), urls[2]);
}
