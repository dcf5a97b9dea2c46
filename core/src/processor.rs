//! # Record Processor
//!
//! Runs the per-slot state machine for one site record:
//!
//! ```text
//! NoAddress  ──────────────────────────────▶ "<Slot> IP Not Available"
//! Probing ── unreachable ──────────────────▶ "<Slot> Not Reachable"
//!         └─ reachable ── UPS / OLT ───────▶ "<Slot> Reachable"
//!                      └─ Router / Switch ─▶ Extracting ── output ─▶ parsed facts
//!                                                       └─ error ──▶ "N/A"
//! ```
//!
//! The four slots of a record are independent and are driven concurrently.
//! Every device condition ends in a status string; nothing is propagated.

use std::sync::Arc;

use siteaudit_common::config::AuditConfig;
use siteaudit_common::record::{SiteRecord, Slot};
use siteaudit_common::report::{AuditedRecord, DeviceFacts, FactValue, Reachability};
use tokio::time::{Instant, timeout_at};
use tracing::{debug, warn};

use crate::extract;
use crate::probe::Prober;
use crate::session::{DeviceClass, DeviceTarget, SessionClient, SessionError};

pub struct RecordProcessor {
    prober: Arc<dyn Prober>,
    sessions: Arc<dyn SessionClient>,
    config: Arc<AuditConfig>,
}

impl RecordProcessor {
    pub fn new(
        prober: Arc<dyn Prober>,
        sessions: Arc<dyn SessionClient>,
        config: Arc<AuditConfig>,
    ) -> Self {
        Self {
            prober,
            sessions,
            config,
        }
    }

    /// Audits one record. Sessions still running at `deadline` count as failed.
    pub async fn process(&self, record: SiteRecord, deadline: Option<Instant>) -> AuditedRecord {
        let (ups, olt, (router, router_facts), (switch, switch_facts)) = tokio::join!(
            self.probe_slot(&record, Slot::Ups),
            self.probe_slot(&record, Slot::Olt),
            self.device_slot(
                &record,
                Slot::Router,
                DeviceClass::Router,
                deadline,
                extract::extract_router_facts,
            ),
            self.device_slot(
                &record,
                Slot::Switch,
                DeviceClass::Switch,
                deadline,
                extract::extract_switch_facts,
            ),
        );

        AuditedRecord {
            record,
            ups,
            olt,
            router,
            switch,
            router_facts,
            switch_facts,
        }
    }

    async fn probe_slot(&self, record: &SiteRecord, slot: Slot) -> Reachability {
        let Some(address) = record.address(slot) else {
            return Reachability::AddressNotAvailable;
        };

        if self.prober.is_reachable(address).await {
            Reachability::Reachable
        } else {
            debug!(record = record.id, %slot, address, "Not reachable");
            Reachability::NotReachable
        }
    }

    async fn device_slot<F: DeviceFacts>(
        &self,
        record: &SiteRecord,
        slot: Slot,
        class: DeviceClass,
        deadline: Option<Instant>,
        extract: fn(&str) -> F,
    ) -> (Reachability, F) {
        let Some(address) = record.address(slot) else {
            let sentinel = FactValue::AddressNotAvailable(slot);
            return (Reachability::AddressNotAvailable, F::uniform(sentinel));
        };

        if !self.prober.is_reachable(address).await {
            debug!(record = record.id, %slot, address, "Not reachable");
            return (Reachability::NotReachable, F::uniform(FactValue::NotReachable(slot)));
        }

        let target = DeviceTarget::new(class, address, &self.config);
        let outcome = match deadline {
            Some(at) => timeout_at(at, self.sessions.run_command(&target))
                .await
                .unwrap_or(Err(SessionError::DeadlineExceeded)),
            None => self.sessions.run_command(&target).await,
        };

        match outcome {
            Ok(output) => (Reachability::Reachable, extract(output.as_str())),
            Err(e) => {
                warn!(
                    record = record.id,
                    %slot,
                    %class,
                    address,
                    error = %e,
                    "Session failed, reporting facts as N/A"
                );
                (Reachability::Reachable, F::uniform(FactValue::SessionFailed))
            }
        }
    }
}
