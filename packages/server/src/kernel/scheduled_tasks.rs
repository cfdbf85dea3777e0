//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! One periodic task: the sheet re-sync sweep, so imported tables pick up
//! appended rows without an admin pressing the refresh button. The sweep
//! is the same sequential, per-page-contained pass the admin endpoint
//! runs; the scheduler adds nothing but timing.

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::sheets::run_resync_sweep;
use crate::kernel::ServerDeps;

/// Start all scheduled tasks
pub async fn start_scheduler(deps: ServerDeps, schedule: &str) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let sweep_deps = deps.clone();
    let sweep_job = Job::new_async(schedule, move |_uuid, _lock| {
        let deps = sweep_deps.clone();
        Box::pin(async move {
            match run_resync_sweep(&deps).await {
                Ok(report) => {
                    tracing::info!(updated = report.updated, "Scheduled re-sync finished");
                }
                Err(e) => {
                    tracing::error!("Scheduled re-sync failed: {}", e);
                }
            }
        })
    })?;

    scheduler.add(sweep_job).await?;
    scheduler.start().await?;

    Ok(scheduler)
}
