//! Positional parsing of device command output.
//!
//! All knowledge of the command output layout lives here. The router command
//! prints ARP rows filtered to the management BDI, e.g.
//!
//! ```text
//! 10.0.0.1 reachable  00:11:22 BDI201
//! Internet 10.0.0.1  0  aabb.ccdd.eeff ARPA BDI201
//! ```
//!
//! and the switch command prints rows of the VLAN table. Tokens are lifted by
//! position without validating their shape; a missing position becomes
//! [`FactValue::NotFound`] instead of a panic.

use siteaudit_common::report::{FactValue, RouterFacts, SwitchFacts};

/// Token index of the gateway address on the first router line.
const GATEWAY_FIELD: usize = 1;
/// Token index of the neighbor MAC on the second router line.
const NEIGHBOR_MAC_FIELD: usize = 3;
/// Token index of the tagged port on the first VLAN row.
const TAGGED_PORT_FIELD: usize = 2;

pub fn extract_router_facts(output: &str) -> RouterFacts {
    let mut lines = content_lines(output);

    let Some(first) = lines.next() else {
        return RouterFacts {
            config_status: FactValue::NotConfigured,
            gateway_address: FactValue::NotConfigured,
            neighbor_mac: FactValue::NotConfigured,
        };
    };

    let neighbor_mac = lines
        .next()
        .map(|line| field(line, NEIGHBOR_MAC_FIELD))
        .unwrap_or(FactValue::NotFound);

    RouterFacts {
        config_status: FactValue::Configured,
        gateway_address: field(first, GATEWAY_FIELD),
        neighbor_mac,
    }
}

pub fn extract_switch_facts(output: &str) -> SwitchFacts {
    match content_lines(output).next() {
        Some(row) => SwitchFacts {
            vlan_status: FactValue::Configured,
            tagged_port: field(row, TAGGED_PORT_FIELD),
        },
        None => SwitchFacts {
            vlan_status: FactValue::NotConfigured,
            tagged_port: FactValue::NotConfigured,
        },
    }
}

/// Lines of `output` from the first non-blank one on, CR stripped.
fn content_lines(output: &str) -> impl Iterator<Item = &str> {
    output
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .skip_while(|line| line.trim().is_empty())
}

fn field(line: &str, idx: usize) -> FactValue {
    line.split_whitespace()
        .nth(idx)
        .map(FactValue::token)
        .unwrap_or(FactValue::NotFound)
}
