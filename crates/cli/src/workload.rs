//! Random transaction driver
//!
//! Each transaction issues `reads` reads and `writes` writes in random order
//! over keys `start..start + range`, then commits. Aborted transactions are
//! counted and not retried. The coordinator is stopped at the end of a run
//! unless the caller asks to keep it.

use crate::parse::WorkloadSpec;
use anyhow::{Context, Result};
use occkv_core::{CoordinatorApi, Entry, Outcome, TxnStats};
use occkv_server::DispatcherClient;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Connect through the dispatcher and run the workload until the deadline
pub async fn run(spec: &WorkloadSpec) -> Result<(TxnStats, Vec<Entry>)> {
    let dispatcher = DispatcherClient::connect(&spec.dispatcher)
        .await
        .with_context(|| format!("connecting to dispatcher at {}", spec.dispatcher))?;
    let coordinator = dispatcher
        .open_coordinator()
        .await
        .context("opening a coordinator")?;
    info!(dispatcher = %spec.dispatcher, "Coordinator ready");

    let report = drive(&coordinator, spec).await;
    let released = if spec.keep {
        Ok(())
    } else {
        coordinator.stop().await
    };
    let report = report?;
    released.context("releasing the coordinator")?;
    Ok(report)
}

async fn drive(
    coordinator: &dyn CoordinatorApi,
    spec: &WorkloadSpec,
) -> Result<(TxnStats, Vec<Entry>)> {
    let mut rng = StdRng::from_entropy();
    let deadline = Instant::now() + spec.duration;
    loop {
        run_transaction(coordinator, spec, &mut rng).await?;
        if Instant::now() >= deadline {
            break;
        }
    }

    let stats = coordinator.stats().await?;
    let entries = coordinator.read_all().await?;
    Ok((stats, entries))
}

/// Run one transaction and commit it
pub async fn run_transaction<R: Rng + Send>(
    coordinator: &dyn CoordinatorApi,
    spec: &WorkloadSpec,
    rng: &mut R,
) -> Result<Outcome> {
    let mut reads = spec.reads;
    let mut writes = spec.writes;

    while reads > 0 || writes > 0 {
        let key = (spec.start + rng.gen_range(0..spec.range)).to_string();
        let do_read = writes == 0 || (reads > 0 && rng.gen_bool(0.5));

        if do_read {
            reads -= 1;
            match coordinator.read(&key).await {
                Ok(entry) => debug!(key, value = %entry.value, version = entry.version, "Read"),
                Err(e) if e.is_not_found() => warn!(key, "Read of a key the store does not hold"),
                Err(e) => return Err(e.into()),
            }
        } else {
            writes -= 1;
            let value = rng.gen_range(20..120).to_string();
            coordinator.write(&key, &value).await?;
            debug!(key, value, "Write");
        }

        if !spec.pause.is_zero() {
            tokio::time::sleep(spec.pause).await;
        }
    }

    let outcome = match coordinator.commit().await {
        Ok(outcome) => outcome,
        Err(e) if e.is_not_found() => {
            warn!(error = %e, "Commit rejected");
            Outcome::Abort
        }
        Err(e) => return Err(e.into()),
    };
    info!(%outcome, "Transaction complete");
    Ok(outcome)
}

/// Human-readable summary of a run
pub fn summary(stats: &TxnStats, entries: &[Entry]) -> String {
    let mut out = format!(
        "transactions: {}  committed: {}  aborted: {}  success ratio: {:.2}\n",
        stats.total_attempts,
        stats.successes,
        stats.failures(),
        stats.success_ratio()
    );
    for entry in entries {
        out.push_str(&format!(
            "  {:>6} = {:<8} (version {})\n",
            entry.key, entry.value, entry.version
        ));
    }
    out
}
