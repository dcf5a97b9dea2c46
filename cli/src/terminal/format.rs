use colored::*;
use siteaudit_common::record::Slot;
use siteaudit_common::report::{AuditedRecord, FactValue, Reachability};

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn reachability_to_detail(slot: Slot, reachability: Reachability) -> Detail {
    let color = match reachability {
        Reachability::Reachable => colors::REACHABLE,
        Reachability::NotReachable => colors::NOT_REACHABLE,
        Reachability::AddressNotAvailable => colors::NOT_AVAILABLE,
    };
    (slot.label().to_string(), reachability.render(slot).color(color))
}

pub fn fact_to_detail(key: &str, fact: &FactValue) -> Detail {
    let color = match fact {
        FactValue::Value(_) | FactValue::Configured => colors::REACHABLE,
        FactValue::NotConfigured | FactValue::NotReachable(_) => colors::NOT_REACHABLE,
        FactValue::SessionFailed | FactValue::NotFound => colors::SESSION_FAILED,
        FactValue::AddressNotAvailable(_) => colors::NOT_AVAILABLE,
    };
    (key.to_string(), fact.to_string().color(color))
}

/// Tree rows for one audited record. Device facts are listed only when the
/// device was reached.
pub fn record_details(audited: &AuditedRecord) -> Vec<Detail> {
    let mut details: Vec<Detail> = Slot::ALL
        .into_iter()
        .map(|slot| reachability_to_detail(slot, audited.reachability(slot)))
        .collect();

    if audited.router == Reachability::Reachable {
        let facts = &audited.router_facts;
        details.push(fact_to_detail("BDI", &facts.config_status));
        details.push(fact_to_detail("Gateway", &facts.gateway_address));
        details.push(fact_to_detail("MAC", &facts.neighbor_mac));
    }
    if audited.switch == Reachability::Reachable {
        let facts = &audited.switch_facts;
        details.push(fact_to_detail("VLAN", &facts.vlan_status));
        details.push(fact_to_detail("Port", &facts.tagged_port));
    }
    details
}

/// Display name of a record: its first non-address column, else its row.
pub fn record_name(audited: &AuditedRecord) -> String {
    let addresses = Slot::ALL.map(|slot| slot.address_column());
    audited
        .record
        .columns
        .iter()
        .find(|(name, value)| !addresses.contains(&name.trim()) && !value.trim().is_empty())
        .map(|(_, value)| value.trim().to_string())
        .unwrap_or_else(|| format!("Row {}", audited.record.id + 1))
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SlotTally {
    pub reachable: usize,
    pub not_reachable: usize,
    pub not_available: usize,
}

pub fn tally(audited: &[AuditedRecord], slot: Slot) -> SlotTally {
    audited
        .iter()
        .fold(SlotTally::default(), |mut acc, a| {
            match a.reachability(slot) {
                Reachability::Reachable => acc.reachable += 1,
                Reachability::NotReachable => acc.not_reachable += 1,
                Reachability::AddressNotAvailable => acc.not_available += 1,
            }
            acc
        })
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FactTally {
    pub configured: usize,
    pub not_configured: usize,
    pub session_failed: usize,
}

pub fn tally_status<'a>(statuses: impl Iterator<Item = &'a FactValue>) -> FactTally {
    statuses.fold(FactTally::default(), |mut acc, status| {
        match status {
            FactValue::Configured => acc.configured += 1,
            FactValue::NotConfigured => acc.not_configured += 1,
            FactValue::SessionFailed => acc.session_failed += 1,
            _ => {}
        }
        acc
    })
}

pub fn slot_tally_to_value(t: SlotTally) -> ColoredString {
    format!(
        "{} reachable, {} not reachable, {} without IP",
        t.reachable.to_string().color(colors::REACHABLE).bold(),
        t.not_reachable.to_string().color(colors::NOT_REACHABLE).bold(),
        t.not_available.to_string().color(colors::NOT_AVAILABLE),
    )
    .normal()
}

pub fn fact_tally_to_value(t: FactTally) -> ColoredString {
    format!(
        "{} configured, {} not configured, {} N/A",
        t.configured.to_string().color(colors::REACHABLE).bold(),
        t.not_configured.to_string().color(colors::NOT_REACHABLE).bold(),
        t.session_failed.to_string().color(colors::SESSION_FAILED),
    )
    .normal()
}
