//! # Audit Pipeline
//!
//! Fans the [`RecordProcessor`] out over a whole batch of records.
//!
//! * One tokio task per record, gated by a semaphore of `concurrency` permits.
//! * Results are gathered by position, so output order equals input order.
//! * A panicking task is a defect, not a device condition: the batch is
//!   aborted and [`PipelineError::RecordFailed`] names the record.

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use siteaudit_common::config::{AuditConfig, ConfigError};
use siteaudit_common::record::SiteRecord;
use siteaudit_common::report::AuditedRecord;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{error, info};

use crate::probe::Prober;
use crate::processor::RecordProcessor;
use crate::session::SessionClient;

/// Called with the number of records finished so far.
pub type ProgressCallback = Arc<dyn Fn(usize) + Send + Sync>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid audit configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("audit of record {record} failed: {reason}")]
    RecordFailed { record: usize, reason: String },
}

pub struct Pipeline {
    processor: Arc<RecordProcessor>,
    concurrency: usize,
    batch_deadline: Option<Duration>,
    on_record_done: Option<ProgressCallback>,
}

impl Pipeline {
    pub fn new(
        prober: Arc<dyn Prober>,
        sessions: Arc<dyn SessionClient>,
        config: AuditConfig,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        let concurrency = config.concurrency;
        let batch_deadline = config.batch_deadline;
        let processor = RecordProcessor::new(prober, sessions, Arc::new(config));

        Ok(Self {
            processor: Arc::new(processor),
            concurrency,
            batch_deadline,
            on_record_done: None,
        })
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_record_done = Some(callback);
        self
    }

    /// Audits every record and returns them in input order.
    pub async fn process(
        &self,
        records: Vec<SiteRecord>,
    ) -> Result<Vec<AuditedRecord>, PipelineError> {
        let total = records.len();
        info!(
            records = total,
            concurrency = self.concurrency,
            "Auditing {total} site records"
        );

        let deadline = self.batch_deadline.map(|limit| Instant::now() + limit);
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let finished = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::with_capacity(total);
        for record in records {
            let id = record.id;
            let processor = Arc::clone(&self.processor);
            let semaphore = Arc::clone(&semaphore);
            let finished = Arc::clone(&finished);
            let callback = self.on_record_done.clone();

            let handle = tokio::spawn(async move {
                // Held until the record is done; the semaphore is never closed.
                let _permit = semaphore.acquire_owned().await;
                let audited = processor.process(record, deadline).await;

                let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(cb) = callback {
                    cb(done);
                }
                audited
            });
            handles.push((id, handle));
        }

        let mut results = Vec::with_capacity(total);
        let mut pending = handles.into_iter();
        while let Some((id, handle)) = pending.next() {
            match handle.await {
                Ok(audited) => results.push(audited),
                Err(e) => {
                    for (_, rest) in pending {
                        rest.abort();
                    }
                    let reason = if e.is_panic() {
                        panic_message(e.into_panic())
                    } else {
                        e.to_string()
                    };
                    error!(record = id, %reason, "Record task failed, aborting batch");
                    return Err(PipelineError::RecordFailed { record: id, reason });
                }
            }
        }

        info!(records = results.len(), "Audit complete");
        Ok(results)
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "task panicked".to_string()
    }
}
