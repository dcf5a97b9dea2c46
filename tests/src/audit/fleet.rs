use std::sync::Arc;

use siteaudit_common::config::{
    AuditConfig, Credentials, DEFAULT_ROUTER_COMMAND, DEFAULT_SWITCH_COMMAND,
};
use siteaudit_common::record::{SiteRecord, Slot};
use siteaudit_common::report::{AuditedRecord, FactValue, REPORT_COLUMNS, Reachability};
use siteaudit_core::Pipeline;

use crate::lab::{Device, LabNetwork};

const ROUTER_OUTPUT: &str =
    "10.0.0.1 reachable  00:11:22 BDI201\nInternet 10.0.0.1  0  aabb.ccdd.eeff ARPA BDI201";
const SWITCH_OUTPUT: &str = "201  MGMT  Gi1/0/48  active";

fn config(concurrency: usize) -> AuditConfig {
    let mut cfg = AuditConfig::new(Credentials::new("netops", "secret"));
    cfg.concurrency = concurrency;
    cfg
}

fn site(id: usize, addresses: &[(Slot, &str)]) -> SiteRecord {
    let mut columns = vec![("Site".to_string(), format!("Site {id}"))];
    columns.extend(
        addresses
            .iter()
            .map(|(slot, address)| (slot.address_column().to_string(), address.to_string())),
    );
    SiteRecord::from_columns(id, columns)
}

async fn run(
    lab: Arc<LabNetwork>,
    records: Vec<SiteRecord>,
    concurrency: usize,
) -> Vec<AuditedRecord> {
    let pipeline = Pipeline::new(lab.clone(), lab, config(concurrency)).unwrap();
    pipeline.process(records).await.unwrap()
}

fn is_closed_vocabulary(value: &str) -> bool {
    let sentinels = ["Configured", "Not Configured", "Not Found", "N/A"];
    sentinels.contains(&value)
        || Slot::ALL.iter().any(|slot| {
            [
                format!("{slot} Reachable"),
                format!("{slot} Not Reachable"),
                format!("{slot} IP Not Available"),
            ]
            .contains(&value.to_string())
        })
}

#[tokio::test]
async fn fully_reachable_site_reports_every_fact() {
    let lab = Arc::new(
        LabNetwork::default()
            .with("10.0.0.5", Device::PingOnly)
            .with("10.0.0.6", Device::PingOnly)
            .managed("10.0.0.1", ROUTER_OUTPUT)
            .managed("10.0.0.2", SWITCH_OUTPUT),
    );
    let record = site(
        0,
        &[
            (Slot::Ups, "10.0.0.5"),
            (Slot::Olt, "10.0.0.6"),
            (Slot::Router, "10.0.0.1"),
            (Slot::Switch, "10.0.0.2"),
        ],
    );

    let audited = run(lab.clone(), vec![record], 4).await;
    let fields = audited[0].fields();
    let report: Vec<&str> = fields[5..].iter().map(|(_, v)| v.as_str()).collect();

    assert_eq!(
        report,
        [
            "UPS Reachable",
            "OLT Reachable",
            "Router Reachable",
            "Configured",
            "reachable",
            "aabb.ccdd.eeff",
            "Switch Reachable",
            "Configured",
            "Gi1/0/48",
        ]
    );

    let mut sessions = lab.sessions();
    sessions.sort();
    assert_eq!(
        sessions,
        [
            ("10.0.0.1".to_string(), DEFAULT_ROUTER_COMMAND.to_string()),
            ("10.0.0.2".to_string(), DEFAULT_SWITCH_COMMAND.to_string()),
        ]
    );
}

#[tokio::test]
async fn missing_addresses_are_never_probed() {
    let lab = Arc::new(LabNetwork::default());
    let audited = run(lab.clone(), vec![site(0, &[])], 1).await;

    assert!(lab.probed().is_empty());
    assert!(lab.sessions().is_empty());
    for slot in Slot::ALL {
        assert_eq!(audited[0].reachability(slot), Reachability::AddressNotAvailable);
    }
    assert_eq!(
        audited[0].router_facts.gateway_address,
        FactValue::AddressNotAvailable(Slot::Router)
    );
    assert_eq!(
        audited[0].switch_facts.tagged_port.to_string(),
        "Switch IP Not Available"
    );
}

#[tokio::test]
async fn silent_devices_get_no_session() {
    let lab = Arc::new(LabNetwork::default());
    let record = site(0, &[(Slot::Router, "10.0.0.1"), (Slot::Switch, "10.0.0.2")]);

    let audited = run(lab.clone(), vec![record], 1).await;

    assert_eq!(lab.probed().len(), 2);
    assert!(lab.sessions().is_empty());
    assert_eq!(audited[0].router, Reachability::NotReachable);
    assert_eq!(
        audited[0].router_facts.config_status.to_string(),
        "Router Not Reachable"
    );
    assert_eq!(
        audited[0].switch_facts.vlan_status.to_string(),
        "Switch Not Reachable"
    );
}

#[tokio::test]
async fn failed_sessions_keep_reachability_and_report_na() {
    let lab = Arc::new(
        LabNetwork::default()
            .with("10.0.0.1", Device::RejectsLogin)
            .with("10.0.0.2", Device::PingOnly),
    );
    let record = site(0, &[(Slot::Router, "10.0.0.1"), (Slot::Switch, "10.0.0.2")]);

    let audited = run(lab.clone(), vec![record], 1).await;
    let a = &audited[0];

    assert_eq!(a.router, Reachability::Reachable);
    assert_eq!(a.switch, Reachability::Reachable);
    assert_eq!(lab.sessions().len(), 2);
    assert_eq!(a.router_facts.config_status, FactValue::SessionFailed);
    assert_eq!(a.router_facts.neighbor_mac, FactValue::SessionFailed);
    assert_eq!(a.switch_facts.tagged_port.to_string(), "N/A");
}

#[tokio::test]
async fn empty_output_means_not_configured() {
    let lab = Arc::new(
        LabNetwork::default()
            .managed("10.0.0.1", "\r\n\r\n")
            .managed("10.0.0.2", ""),
    );
    let record = site(0, &[(Slot::Router, "10.0.0.1"), (Slot::Switch, "10.0.0.2")]);

    let audited = run(lab, vec![record], 1).await;
    let a = &audited[0];

    assert_eq!(a.router_facts.config_status, FactValue::NotConfigured);
    assert_eq!(a.router_facts.gateway_address, FactValue::NotConfigured);
    assert_eq!(a.switch_facts.vlan_status, FactValue::NotConfigured);
    assert_eq!(a.switch_facts.tagged_port, FactValue::NotConfigured);
}

#[tokio::test]
async fn large_fleet_keeps_order_and_vocabulary() {
    let mut lab = LabNetwork::default();
    let mut records = Vec::new();
    for i in 0..40 {
        let router = format!("10.{i}.0.1");
        let switch = format!("10.{i}.0.2");
        lab = match i % 4 {
            0 => lab.managed(&router, ROUTER_OUTPUT).managed(&switch, SWITCH_OUTPUT),
            1 => lab.with(&router, Device::RejectsLogin),
            2 => lab.managed(&router, "").with(&switch, Device::PingOnly),
            _ => lab,
        };
        records.push(site(i, &[(Slot::Router, &router), (Slot::Switch, &switch)]));
    }
    let lab = Arc::new(lab);

    let audited = run(lab, records, 7).await;

    assert_eq!(audited.len(), 40);
    for (i, a) in audited.iter().enumerate() {
        assert_eq!(a.record.id, i);
        assert_eq!(a.record.address(Slot::Router), Some(format!("10.{i}.0.1").as_str()));

        let fields = a.fields();
        assert_eq!(fields.len(), 3 + REPORT_COLUMNS.len());
        for (name, value) in &fields[3..] {
            assert!(!value.is_empty(), "blank {name} in record {i}");
        }
        for idx in [3, 4, 5, 6, 9, 10] {
            let value = &fields[idx].1;
            assert!(is_closed_vocabulary(value), "{value} outside the vocabulary");
        }
    }
}

#[tokio::test]
async fn repeated_audits_agree() {
    let lab = Arc::new(
        LabNetwork::default()
            .managed("10.0.0.1", ROUTER_OUTPUT)
            .with("10.0.0.5", Device::PingOnly),
    );
    let records = vec![
        site(0, &[(Slot::Router, "10.0.0.1"), (Slot::Ups, "10.0.0.5")]),
        site(1, &[(Slot::Switch, "10.0.0.9")]),
    ];

    let first = run(lab.clone(), records.clone(), 2).await;
    let second = run(lab, records, 2).await;

    assert_eq!(first, second);
}
