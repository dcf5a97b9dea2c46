use std::time::Instant;

use colored::*;
use siteaudit_core::probe;
use tokio::task::JoinSet;

use super::ProbeArgs;
use crate::terminal::colors;
use crate::terminal::print::{self, Rule, StatusTable};

pub async fn probe(args: ProbeArgs, quiet: u8) -> anyhow::Result<()> {
    let prober = probe::system_prober(args.ping.into());
    let start_time = Instant::now();

    let mut set = JoinSet::new();
    for (idx, address) in args.addresses.into_iter().enumerate() {
        let prober = prober.clone();
        set.spawn(async move {
            let reachable = prober.is_reachable(&address).await;
            (idx, address, reachable)
        });
    }

    let mut results = Vec::with_capacity(set.len());
    while let Some(joined) = set.join_next().await {
        results.push(joined?);
    }
    results.sort_by_key(|(idx, _, _)| *idx);

    print::rule(Rule::Section("reachability"), quiet);
    let table = StatusTable::for_keys(results.iter().map(|(_, address, _)| address.as_str()));

    let mut alive = 0;
    for (_, address, reachable) in &results {
        let value = if *reachable {
            alive += 1;
            "Reachable".color(colors::REACHABLE).bold()
        } else {
            "Not Reachable".color(colors::NOT_REACHABLE)
        };
        table.row(address, value);
    }

    let summary = format!(
        "{} of {} addresses answered in {}",
        alive.to_string().green().bold(),
        results.len(),
        format!("{:.2}s", start_time.elapsed().as_secs_f64()).yellow().bold()
    );
    if quiet == 0 {
        print::rule(Rule::Closing, quiet);
        print::centered(&summary);
    } else {
        tracing::info!("{summary}");
    }
    Ok(())
}
