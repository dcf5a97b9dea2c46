//! # Audit Report Model
//!
//! Every status and fact field of an audited record takes a value from a
//! small closed vocabulary. The variants encode *why* a value is absent, so a
//! report never carries a blank cell.

use std::fmt;

use crate::record::{SiteRecord, Slot};

pub const UPS_REACHABILITY_COLUMN: &str = "UPS Reachability";
pub const OLT_REACHABILITY_COLUMN: &str = "OLT Reachability";
pub const ROUTER_REACHABILITY_COLUMN: &str = "Router Reachability";
pub const ROUTER_CONFIG_COLUMN: &str = "BDI 201 Configuration Status";
pub const GATEWAY_COLUMN: &str = "Gateway IP Address";
pub const NEIGHBOR_MAC_COLUMN: &str = "SNMP MAC Address";
pub const SWITCH_REACHABILITY_COLUMN: &str = "Switch Reachability";
pub const VLAN_STATUS_COLUMN: &str = "VLAN 201 Status";
pub const TAGGED_PORT_COLUMN: &str = "VLAN 201 Tagged Port";

/// Report columns in the order they are appended to a record.
pub const REPORT_COLUMNS: [&str; 9] = [
    UPS_REACHABILITY_COLUMN,
    OLT_REACHABILITY_COLUMN,
    ROUTER_REACHABILITY_COLUMN,
    ROUTER_CONFIG_COLUMN,
    GATEWAY_COLUMN,
    NEIGHBOR_MAC_COLUMN,
    SWITCH_REACHABILITY_COLUMN,
    VLAN_STATUS_COLUMN,
    TAGGED_PORT_COLUMN,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reachability {
    Reachable,
    NotReachable,
    AddressNotAvailable,
}

impl Reachability {
    pub fn render(self, slot: Slot) -> String {
        match self {
            Reachability::Reachable => format!("{slot} Reachable"),
            Reachability::NotReachable => format!("{slot} Not Reachable"),
            Reachability::AddressNotAvailable => format!("{slot} IP Not Available"),
        }
    }
}

/// A single derived fact: either a token lifted from device output or a
/// sentinel stating why there is none.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FactValue {
    Value(String),
    Configured,
    NotConfigured,
    NotFound,
    SessionFailed,
    NotReachable(Slot),
    AddressNotAvailable(Slot),
}

impl FactValue {
    /// Wraps a token, falling back to [`FactValue::NotFound`] for a blank one.
    pub fn token(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            FactValue::NotFound
        } else {
            FactValue::Value(trimmed.to_string())
        }
    }
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactValue::Value(v) => f.write_str(v),
            FactValue::Configured => f.write_str("Configured"),
            FactValue::NotConfigured => f.write_str("Not Configured"),
            FactValue::NotFound => f.write_str("Not Found"),
            FactValue::SessionFailed => f.write_str("N/A"),
            FactValue::NotReachable(slot) => write!(f, "{slot} Not Reachable"),
            FactValue::AddressNotAvailable(slot) => write!(f, "{slot} IP Not Available"),
        }
    }
}

/// Facts a router slot contributes: the gateway binding of the management VRF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterFacts {
    pub config_status: FactValue,
    pub gateway_address: FactValue,
    pub neighbor_mac: FactValue,
}

/// Facts a switch slot contributes: the management VLAN row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchFacts {
    pub vlan_status: FactValue,
    pub tagged_port: FactValue,
}

/// Shared shape of router and switch facts, so slot handling can stay generic.
pub trait DeviceFacts: Sized {
    /// Every field set to the same sentinel.
    fn uniform(value: FactValue) -> Self;
}

impl DeviceFacts for RouterFacts {
    fn uniform(value: FactValue) -> Self {
        Self {
            config_status: value.clone(),
            gateway_address: value.clone(),
            neighbor_mac: value,
        }
    }
}

impl DeviceFacts for SwitchFacts {
    fn uniform(value: FactValue) -> Self {
        Self {
            vlan_status: value.clone(),
            tagged_port: value,
        }
    }
}

/// Outcome of auditing one site record. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditedRecord {
    pub record: SiteRecord,
    pub ups: Reachability,
    pub olt: Reachability,
    pub router: Reachability,
    pub switch: Reachability,
    pub router_facts: RouterFacts,
    pub switch_facts: SwitchFacts,
}

impl AuditedRecord {
    pub fn reachability(&self, slot: Slot) -> Reachability {
        match slot {
            Slot::Ups => self.ups,
            Slot::Olt => self.olt,
            Slot::Router => self.router,
            Slot::Switch => self.switch,
        }
    }

    /// The report columns alone, in [`REPORT_COLUMNS`] order.
    pub fn report_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            (UPS_REACHABILITY_COLUMN, self.ups.render(Slot::Ups)),
            (OLT_REACHABILITY_COLUMN, self.olt.render(Slot::Olt)),
            (ROUTER_REACHABILITY_COLUMN, self.router.render(Slot::Router)),
            (ROUTER_CONFIG_COLUMN, self.router_facts.config_status.to_string()),
            (GATEWAY_COLUMN, self.router_facts.gateway_address.to_string()),
            (NEIGHBOR_MAC_COLUMN, self.router_facts.neighbor_mac.to_string()),
            (SWITCH_REACHABILITY_COLUMN, self.switch.render(Slot::Switch)),
            (VLAN_STATUS_COLUMN, self.switch_facts.vlan_status.to_string()),
            (TAGGED_PORT_COLUMN, self.switch_facts.tagged_port.to_string()),
        ]
    }

    /// Full output row: source columns first, report columns replacing any
    /// same-named source column in place and appended otherwise.
    pub fn fields(&self) -> Vec<(String, String)> {
        let mut report = self.report_fields();
        let mut row: Vec<(String, String)> = Vec::with_capacity(self.record.columns.len() + report.len());

        for (name, value) in &self.record.columns {
            let key = name.trim();
            match report.iter().position(|(column, _)| *column == key) {
                Some(idx) => {
                    let (column, status) = report.remove(idx);
                    row.push((column.to_string(), status));
                }
                None => row.push((name.clone(), value.clone())),
            }
        }

        row.extend(report.into_iter().map(|(k, v)| (k.to_string(), v)));
        row
    }
}
