//! Periodic conditions and forecast jobs.
//!
//! Each job runs on its own interval. A pass walks every configured entry,
//! forcing a refresh and pausing between entries so neither the provider nor
//! the equipment sees bursts. An interval that overruns skips the missed
//! ticks rather than running a pass twice.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{debug, error, info, warn};
use weather_common::{LocationEntry, WeatherError};

use crate::config::ConfigStore;
use crate::lookup::RefreshEngine;
use crate::metrics::RefreshKind;

/// Pause between consecutive entries in a pass.
pub const ENTRY_PACING: Duration = Duration::from_secs(2);

/// Delay before the first pass after a reschedule.
pub const RESCHEDULE_DELAY: Duration = Duration::from_secs(60);

/// Outcome counts of one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub refreshed: usize,
    pub failed: usize,
    pub skipped: usize,
    /// The pass was cancelled before reaching every entry
    pub interrupted: bool,
}

struct Jobs {
    shutdown: broadcast::Sender<()>,
    handles: Vec<JoinHandle<()>>,
    conditions_minutes: u32,
    forecasts_minutes: u32,
}

/// Owns the two periodic refresh jobs.
pub struct Scheduler {
    engine: Arc<RefreshEngine>,
    pacing: Duration,
    jobs: Mutex<Option<Jobs>>,
}

impl Scheduler {
    pub fn new(engine: Arc<RefreshEngine>) -> Self {
        Self {
            engine,
            pacing: ENTRY_PACING,
            jobs: Mutex::new(None),
        }
    }

    /// Override the pause between entries.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    fn config(&self) -> &Arc<ConfigStore> {
        self.engine.config()
    }

    /// Spawn both jobs. Any jobs already running are cancelled first.
    pub fn start(&self, initial_delay: Duration, conditions_minutes: u32, forecasts_minutes: u32) {
        let (shutdown, _) = broadcast::channel::<()>(1);

        let handles = vec![
            self.spawn_job(
                RefreshKind::Conditions,
                initial_delay,
                minutes(conditions_minutes),
                shutdown.subscribe(),
            ),
            self.spawn_job(
                RefreshKind::Forecast,
                initial_delay,
                minutes(forecasts_minutes),
                shutdown.subscribe(),
            ),
        ];

        let previous = self
            .jobs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(Jobs {
                shutdown,
                handles,
                conditions_minutes,
                forecasts_minutes,
            });
        if let Some(previous) = previous {
            cancel(previous);
        }

        info!(
            initial_delay_secs = initial_delay.as_secs(),
            conditions_minutes, forecasts_minutes, "Refresh jobs scheduled"
        );
    }

    /// Cancel both jobs and re-arm them with new periods after a one minute delay.
    pub fn reschedule(&self, conditions_minutes: u32, forecasts_minutes: u32) {
        self.start(RESCHEDULE_DELAY, conditions_minutes, forecasts_minutes);
    }

    /// Cancel both jobs. In-flight fetches finish; the pass ends at its next pause.
    pub fn stop(&self) {
        let jobs = self.jobs.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(jobs) = jobs {
            cancel(jobs);
            info!("Refresh jobs stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.jobs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|jobs| jobs.handles.iter().any(|h| !h.is_finished()))
    }

    /// Periods (conditions, forecasts) in minutes of the running jobs.
    pub fn periods(&self) -> Option<(u32, u32)> {
        self.jobs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|jobs| (jobs.conditions_minutes, jobs.forecasts_minutes))
    }

    fn spawn_job(
        &self,
        kind: RefreshKind,
        initial_delay: Duration,
        period: Duration,
        mut shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        let engine = self.engine.clone();
        let pacing = self.pacing;

        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.recv() => return,
                _ = sleep(initial_delay) => {}
            }

            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = shutdown.recv() => break,
                    _ = ticker.tick() => {}
                }

                let summary = run_pass(&engine, kind, pacing, Some(&mut shutdown)).await;
                if summary.interrupted {
                    break;
                }
            }

            debug!(job = kind.as_str(), "Refresh job exited");
        })
    }

    /// One conditions pass over every entry, without cancellation.
    pub async fn run_conditions_pass(&self) -> PassSummary {
        run_pass(&self.engine, RefreshKind::Conditions, self.pacing, None).await
    }

    /// One forecast pass over every entry, without cancellation.
    pub async fn run_forecasts_pass(&self) -> PassSummary {
        run_pass(&self.engine, RefreshKind::Forecast, self.pacing, None).await
    }

    /// Number of configured entries, for logging by callers.
    pub async fn entry_count(&self) -> usize {
        self.config().snapshot().await.entries().len()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Some(jobs) = self.jobs.get_mut().unwrap_or_else(|e| e.into_inner()).take() {
            cancel(jobs);
        }
    }
}

fn minutes(m: u32) -> Duration {
    Duration::from_secs(u64::from(m.max(1)) * 60)
}

fn cancel(jobs: Jobs) {
    // Receivers also see the channel close when the sender drops.
    let _ = jobs.shutdown.send(());
    drop(jobs.handles);
}

async fn run_pass(
    engine: &RefreshEngine,
    kind: RefreshKind,
    pacing: Duration,
    mut shutdown: Option<&mut broadcast::Receiver<()>>,
) -> PassSummary {
    // Pick up edits made to the file outside this process
    let config = match engine.config().reload().await {
        Ok(config) => config,
        Err(e) => {
            warn!(job = kind.as_str(), error = %e, "Failed to reload configuration, keeping the last one");
            engine.config().snapshot().await
        }
    };
    let entries = config.entries();
    let mut summary = PassSummary::default();

    info!(job = kind.as_str(), entries = entries.len(), "Starting refresh pass");

    for (idx, entry) in entries.iter().enumerate() {
        if idx > 0 {
            let cancelled = match shutdown.as_deref_mut() {
                Some(rx) => tokio::select! {
                    _ = rx.recv() => true,
                    _ = sleep(pacing) => false,
                },
                None => {
                    sleep(pacing).await;
                    false
                }
            };
            if cancelled {
                info!(job = kind.as_str(), "Refresh pass interrupted");
                summary.interrupted = true;
                return summary;
            }
        }

        match engine.equipment().has_points(entry.path()).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(path = %entry.path(), "No weather points, skipping");
                summary.skipped += 1;
                continue;
            }
            Err(e) => {
                warn!(path = %entry.path(), error = %e, "Failed to resolve equipment points");
                summary.skipped += 1;
                continue;
            }
        }

        match refresh(engine, kind, entry).await {
            Ok(()) => summary.refreshed += 1,
            Err(WeatherError::MissingStationContent(msg)) => {
                warn!(path = %entry.path(), job = kind.as_str(), reason = %msg, "Missing station content");
                summary.failed += 1;
            }
            Err(e) => {
                error!(path = %entry.path(), job = kind.as_str(), error = %e, "Refresh failed");
                summary.failed += 1;
            }
        }
    }

    info!(
        job = kind.as_str(),
        refreshed = summary.refreshed,
        failed = summary.failed,
        skipped = summary.skipped,
        "Refresh pass complete"
    );
    summary
}

async fn refresh(
    engine: &RefreshEngine,
    kind: RefreshKind,
    entry: &LocationEntry,
) -> Result<(), WeatherError> {
    match kind {
        RefreshKind::Conditions => engine.refresh_conditions(entry, true).await.map(|_| ()),
        RefreshKind::Forecast => engine.refresh_forecasts(entry, true).await.map(|_| ()),
    }
}
