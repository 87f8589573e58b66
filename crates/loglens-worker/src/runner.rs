//! Worker runner, the main loop that polls for jobs and executes them.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, watch};
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info, trace, warn};

use loglens_core::config::worker::WorkerConfig;

use crate::maintenance::QueueMaintenance;
use crate::processor::{JobExecutionError, JobProcessor};
use crate::queue::JobQueue;

/// Polls the queue and executes jobs under a concurrency bound.
#[derive(Debug)]
pub struct WorkerRunner {
    queue: Arc<JobQueue>,
    processor: Arc<dyn JobProcessor>,
    maintenance: QueueMaintenance,
    config: WorkerConfig,
    worker_id: String,
}

impl WorkerRunner {
    pub fn new(
        queue: Arc<JobQueue>,
        processor: Arc<dyn JobProcessor>,
        maintenance: QueueMaintenance,
        config: WorkerConfig,
        worker_id: String,
    ) -> Self {
        Self {
            queue,
            processor,
            maintenance,
            config,
            worker_id,
        }
    }

    /// Run until the cancel signal flips to `true`, then drain
    /// in-flight jobs within the shutdown grace period.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        info!(
            worker_id = %self.worker_id,
            concurrency = self.config.concurrency,
            poll_interval_ms = self.config.poll_interval_ms,
            "Worker started"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);

        let mut maintenance_tick =
            time::interval(Duration::from_secs(self.config.maintenance_interval_seconds.max(1)));
        maintenance_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first interval tick fires immediately.
        maintenance_tick.tick().await;

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        info!(worker_id = %self.worker_id, "Worker received shutdown signal");
                        break;
                    }
                }
                _ = maintenance_tick.tick() => {
                    self.maintenance.run_once().await;
                }
                claimed = self.poll_and_process(&semaphore) => {
                    // Idle sleep only when nothing was claimed; a busy
                    // queue is drained as fast as permits allow.
                    if !claimed {
                        tokio::select! {
                            _ = cancel.changed() => {
                                if *cancel.borrow() {
                                    info!(worker_id = %self.worker_id, "Worker shutting down");
                                    break;
                                }
                            }
                            _ = time::sleep(poll_interval) => {}
                        }
                    }
                }
            }
        }

        info!(worker_id = %self.worker_id, "Waiting for in-flight jobs to complete...");
        let max_permits = self.config.concurrency.max(1) as u32;
        let grace = Duration::from_secs(self.config.shutdown_grace_seconds);
        if time::timeout(grace, semaphore.acquire_many(max_permits))
            .await
            .is_err()
        {
            warn!(worker_id = %self.worker_id, "Shutdown grace period expired with jobs still running");
        }
        info!(worker_id = %self.worker_id, "Worker shut down complete");
    }

    /// Claim one job if a worker slot is free. Returns whether a job
    /// was claimed.
    async fn poll_and_process(&self, semaphore: &Arc<Semaphore>) -> bool {
        let permit = match Arc::clone(semaphore).try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                trace!("All worker slots occupied, waiting...");
                return false;
            }
        };

        match self.queue.dequeue(&self.worker_id).await {
            Ok(Some(job)) => {
                let queue = Arc::clone(&self.queue);
                let processor = Arc::clone(&self.processor);

                tokio::spawn(async move {
                    let _permit = permit;
                    let job_id = job.id;

                    info!(%job_id, attempt = job.attempts, max_attempts = job.max_attempts, "Processing job");

                    match processor.process(&job, &queue).await {
                        Ok(details) => {
                            if let Err(e) = queue.complete(job_id, details).await {
                                error!(%job_id, error = %e, "Failed to mark job completed");
                            } else {
                                info!(%job_id, "Job completed successfully");
                            }
                        }
                        Err(JobExecutionError::Permanent(msg)) => {
                            error!(%job_id, error = %msg, "Job failed permanently");
                            if let Err(e) = queue.fail_permanent(job_id, &msg).await {
                                error!(%job_id, error = %e, "Failed to mark job failed");
                            }
                        }
                        Err(JobExecutionError::Transient(msg)) => {
                            warn!(%job_id, error = %msg, "Job failed (transient)");
                            if let Err(e) = queue.fail(&job, &msg).await {
                                error!(%job_id, error = %e, "Failed to record job failure");
                            }
                        }
                        Err(JobExecutionError::Internal(err)) => {
                            let msg = err.to_string();
                            error!(%job_id, error = %msg, "Job internal error");
                            if let Err(e) = queue.fail(&job, &msg).await {
                                error!(%job_id, error = %e, "Failed to record job failure");
                            }
                        }
                    }
                });
                true
            }
            Ok(None) => {
                drop(permit);
                trace!("No jobs available");
                false
            }
            Err(e) => {
                drop(permit);
                error!(error = %e, "Failed to dequeue job");
                false
            }
        }
    }
}
