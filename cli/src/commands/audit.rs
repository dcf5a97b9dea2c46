use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use colored::*;
use siteaudit_common::record::Slot;
use siteaudit_common::report::AuditedRecord;
use siteaudit_core::Pipeline;
use siteaudit_core::probe;
use siteaudit_core::session::SshSessionClient;
use tracing::info;

use super::AuditArgs;
use crate::records;
use crate::terminal::print::{self, Rule, StatusTable};
use crate::terminal::{colors, format, spinner};

pub async fn audit(args: AuditArgs, quiet: u8) -> anyhow::Result<()> {
    let records = records::load(&args.input)?;
    if records.is_empty() {
        print::rule(Rule::Section("nothing to audit"), quiet);
        print::no_records();
        return Ok(());
    }

    let cfg = args.to_config();
    let prober = probe::system_prober(cfg.probe);
    let pipeline = Pipeline::new(prober, Arc::new(SshSessionClient::new()), cfg)?
        .with_progress(Arc::new(spinner::report_audit_progress));

    spinner::start_audit_progress(records.len());
    let start_time = Instant::now();

    let outcome = tokio::select! {
        outcome = pipeline.process(records) => outcome,
        _ = tokio::signal::ctrl_c() => {
            spinner::finish_audit_progress();
            bail!("audit interrupted, no report written");
        }
    };
    spinner::finish_audit_progress();
    let audited = outcome?;

    let output = args.output.unwrap_or_else(records::default_report_path);
    records::save(&output, &audited)
        .with_context(|| format!("saving audit report to {}", output.display()))?;

    audit_ends(&audited, start_time.elapsed(), quiet);
    info!("Report written to {}", output.display());
    Ok(())
}

fn audit_ends(audited: &[AuditedRecord], total_time: Duration, quiet: u8) {
    if quiet == 0 {
        print::rule(Rule::Section("site audit"), quiet);
        print_records(audited);
        print::blank();
    }

    print::rule(Rule::Section("summary"), quiet);
    if quiet < 2 {
        print_summary_lines(audited);
    }
    print_summary(audited.len(), total_time, quiet);
}

fn print_records(audited: &[AuditedRecord]) {
    for (idx, record) in audited.iter().enumerate() {
        print::record_tree(idx, &format::record_name(record), &format::record_details(record));
        if idx + 1 != audited.len() {
            print::blank();
        }
    }
}

fn print_summary_lines(audited: &[AuditedRecord]) {
    let table = StatusTable::for_keys(
        Slot::ALL
            .iter()
            .map(|slot| slot.label())
            .chain(["BDI 201", "VLAN 201"]),
    );

    for slot in Slot::ALL {
        let tally = format::tally(audited, slot);
        table.row(slot.label(), format::slot_tally_to_value(tally));
    }

    let bdi = format::tally_status(audited.iter().map(|a| &a.router_facts.config_status));
    table.row("BDI 201", format::fact_tally_to_value(bdi));

    let vlan = format::tally_status(audited.iter().map(|a| &a.switch_facts.vlan_status));
    table.row("VLAN 201", format::fact_tally_to_value(vlan));
}

fn print_summary(records_len: usize, total_time: Duration, quiet: u8) {
    let audited: ColoredString = format!("{records_len} site records").bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: String = format!("Audit Complete: {audited} audited in {total_time}")
        .color(colors::TEXT_DEFAULT)
        .to_string();

    match quiet {
        0 => {
            print::rule(Rule::Closing, quiet);
            print::centered(&output);
        }
        _ => info!("{output}"),
    }
}
