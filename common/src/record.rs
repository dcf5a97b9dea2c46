//! # Site Record Model
//!
//! A site record is one row of the fleet inventory. It carries up to four
//! management addresses, one per [`Slot`], plus whatever other columns the
//! record source handed us. Records are read once and never mutated; the
//! audit produces a separate [`AuditedRecord`](crate::report::AuditedRecord).

use std::fmt;

pub const UPS_IP_COLUMN: &str = "UPS IP";
pub const OLT_IP_COLUMN: &str = "OLT IP";
pub const ROUTER_IP_COLUMN: &str = "Router IP";
pub const SWITCH_IP_COLUMN: &str = "Switch IP";

/// One of the four monitored endpoint roles of a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Ups,
    Olt,
    Router,
    Switch,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Ups, Slot::Olt, Slot::Router, Slot::Switch];

    /// Label used as the prefix of every status string for this slot.
    pub fn label(self) -> &'static str {
        match self {
            Slot::Ups => "UPS",
            Slot::Olt => "OLT",
            Slot::Router => "Router",
            Slot::Switch => "Switch",
        }
    }

    /// Source column holding the slot's address.
    pub fn address_column(self) -> &'static str {
        match self {
            Slot::Ups => UPS_IP_COLUMN,
            Slot::Olt => OLT_IP_COLUMN,
            Slot::Router => ROUTER_IP_COLUMN,
            Slot::Switch => SWITCH_IP_COLUMN,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteRecord {
    /// Stable identifier, the row index in the record source.
    pub id: usize,
    /// Source columns in their original order.
    pub columns: Vec<(String, String)>,
    ups: Option<String>,
    olt: Option<String>,
    router: Option<String>,
    switch: Option<String>,
}

impl SiteRecord {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Builds a record from named source columns.
    ///
    /// Missing columns and blank cells both mean "no address".
    pub fn from_columns(id: usize, columns: Vec<(String, String)>) -> Self {
        let lookup = |slot: Slot| {
            columns
                .iter()
                .find(|(name, _)| name.trim() == slot.address_column())
                .and_then(|(_, value)| normalize_address(value))
        };

        Self {
            id,
            ups: lookup(Slot::Ups),
            olt: lookup(Slot::Olt),
            router: lookup(Slot::Router),
            switch: lookup(Slot::Switch),
            columns,
        }
    }

    pub fn with_address(mut self, slot: Slot, address: &str) -> Self {
        let value = normalize_address(address);
        match slot {
            Slot::Ups => self.ups = value,
            Slot::Olt => self.olt = value,
            Slot::Router => self.router = value,
            Slot::Switch => self.switch = value,
        }
        self
    }

    pub fn address(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::Ups => self.ups.as_deref(),
            Slot::Olt => self.olt.as_deref(),
            Slot::Router => self.router.as_deref(),
            Slot::Switch => self.switch.as_deref(),
        }
    }
}

fn normalize_address(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
