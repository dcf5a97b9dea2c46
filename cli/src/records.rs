//! CSV record source and report sink.
//!
//! Every input column survives into the report. Header names are kept as
//! written; address lookup and report column replacement ignore surrounding
//! whitespace.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use csv::{ReaderBuilder, StringRecord, Writer};
use siteaudit_common::record::SiteRecord;
use siteaudit_common::report::AuditedRecord;
use tracing::warn;

pub fn load(path: &Path) -> anyhow::Result<Vec<SiteRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening inventory {}", path.display()))?;
    read_records(file).with_context(|| format!("reading inventory {}", path.display()))
}

pub fn read_records<R: Read>(source: R) -> anyhow::Result<Vec<SiteRecord>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(source);
    let headers: StringRecord = reader.headers()?.clone();

    let mut records = Vec::new();
    for (id, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("malformed row {}", id + 2))?;
        if row.len() > headers.len() {
            warn!(
                row = id + 2,
                cells = row.len(),
                columns = headers.len(),
                "Dropping cells beyond the header width"
            );
        }
        let columns = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), row.get(i).unwrap_or("").to_string()))
            .collect();
        records.push(SiteRecord::from_columns(id, columns));
    }
    Ok(records)
}

pub fn save(path: &Path, audited: &[AuditedRecord]) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating report {}", path.display()))?;
    write_report(file, audited).with_context(|| format!("writing report {}", path.display()))
}

pub fn write_report<W: Write>(sink: W, audited: &[AuditedRecord]) -> anyhow::Result<()> {
    let mut writer = Writer::from_writer(sink);

    if let Some(first) = audited.first() {
        let header: Vec<String> = first.fields().into_iter().map(|(name, _)| name).collect();
        writer.write_record(&header)?;
    }

    for record in audited {
        let values: Vec<String> = record.fields().into_iter().map(|(_, value)| value).collect();
        writer.write_record(&values)?;
    }

    writer.flush()?;
    Ok(())
}

/// `report_YYYYMMDD_HHMMSS.csv` in the current directory.
pub fn default_report_path() -> PathBuf {
    PathBuf::from(format!("report_{}.csv", Local::now().format("%Y%m%d_%H%M%S")))
}
