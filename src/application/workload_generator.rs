//! WorkloadGenerator - Controllable synthetic write traffic.
//!
//! A run is `concurrency` workers, each looping:
//!
//! ```text
//! fake bid → persist via RecordStore → publish event → wait pacing interval
//! ```
//!
//! ## Lifecycle
//!
//! ```text
//! Idle --start()--> Running --stop()--> Idle
//!        Running --start()--> Running   (no-op, current run continues)
//! ```
//!
//! The transition happens under one mutex together with the settings, so
//! two concurrent `start()` calls can never spawn two runs, and settings
//! can only change while idle.
//!
//! `stop()` flips a watch channel shared by every worker of the run. A
//! sleeping worker wakes and exits at once; a worker in the middle of a
//! persist finishes that record first. Either way no worker outlives the
//! stop by more than one pacing interval.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::foundation::RunId;
use crate::domain::workload::{Bid, GeneratorSettings};
use crate::domain::DashboardEvent;
use crate::ports::{EventPublisher, RecordStore};

/// Errors returned by generator control operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeneratorError {
    #[error("Generator settings cannot change while {0} is active")]
    RunActive(RunId),
}

/// Result of [`WorkloadGenerator::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started(RunId),
    /// A run was already active; nothing changed.
    AlreadyRunning(RunId),
}

/// Result of [`WorkloadGenerator::stop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped(RunId),
    NotRunning,
}

/// Point-in-time view of the generator for the control surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorStatus {
    pub running: bool,
    pub run_id: Option<RunId>,
    #[serde(flatten)]
    pub settings: GeneratorSettings,
    pub active_workers: usize,
    pub produced: u64,
    pub failed: u64,
}

#[derive(Debug, Default)]
struct WorkerCounters {
    active: AtomicUsize,
    produced: AtomicU64,
    failed: AtomicU64,
}

/// Decrements the active worker count when a worker ends, even by panic.
struct ActiveWorker(Arc<WorkerCounters>);

impl ActiveWorker {
    fn enter(counters: Arc<WorkerCounters>) -> Self {
        counters.active.fetch_add(1, Ordering::SeqCst);
        Self(counters)
    }
}

impl Drop for ActiveWorker {
    fn drop(&mut self) {
        self.0.active.fetch_sub(1, Ordering::SeqCst);
    }
}

struct ActiveRun {
    id: RunId,
    stop: watch::Sender<bool>,
    workers: Vec<JoinHandle<()>>,
}

enum RunState {
    Idle,
    Running(ActiveRun),
}

struct Control {
    settings: GeneratorSettings,
    state: RunState,
    /// Workers of stopped runs that may still be finishing a record.
    draining: Vec<JoinHandle<()>>,
    runs_started: u64,
}

/// Concurrent synthetic record producer with start/stop control.
pub struct WorkloadGenerator {
    store: Arc<dyn RecordStore>,
    publisher: Arc<dyn EventPublisher>,
    control: Mutex<Control>,
    counters: Arc<WorkerCounters>,
}

impl WorkloadGenerator {
    /// Create an idle generator.
    pub fn new(
        settings: GeneratorSettings,
        store: Arc<dyn RecordStore>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            store,
            publisher,
            control: Mutex::new(Control {
                settings,
                state: RunState::Idle,
                draining: Vec::new(),
                runs_started: 0,
            }),
            counters: Arc::new(WorkerCounters::default()),
        }
    }

    fn control(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawn a run unless one is already active. Returns immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self) -> StartOutcome {
        let mut control = self.control();

        if let RunState::Running(run) = &control.state {
            tracing::debug!(run_id = %run.id, "Generator already running, start ignored");
            return StartOutcome::AlreadyRunning(run.id);
        }

        control.runs_started += 1;
        control.draining.retain(|worker| !worker.is_finished());

        let run_id = RunId::new(control.runs_started);
        let settings = control.settings;
        let (stop, stop_rx) = watch::channel(false);

        let workers = (0..settings.concurrency())
            .map(|index| {
                let worker = Worker {
                    run_id,
                    index,
                    wait: settings.wait(),
                    store: Arc::clone(&self.store),
                    publisher: Arc::clone(&self.publisher),
                    counters: Arc::clone(&self.counters),
                    stop: stop_rx.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        control.state = RunState::Running(ActiveRun {
            id: run_id,
            stop,
            workers,
        });

        tracing::info!(
            run_id = %run_id,
            concurrency = settings.concurrency(),
            wait_ms = settings.wait().as_millis() as u64,
            "Generator started"
        );
        StartOutcome::Started(run_id)
    }

    /// Signal every worker of the active run to finish. Does not wait.
    pub fn stop(&self) -> StopOutcome {
        let mut control = self.control();

        match std::mem::replace(&mut control.state, RunState::Idle) {
            RunState::Idle => StopOutcome::NotRunning,
            RunState::Running(run) => {
                // Receivers also see the sender drop, so a failed send is fine.
                let _ = run.stop.send(true);
                control.draining.extend(run.workers);
                tracing::info!(run_id = %run.id, "Generator stopped");
                StopOutcome::Stopped(run.id)
            }
        }
    }

    /// Stop and wait for every worker, including those of earlier runs.
    pub async fn shutdown(&self) {
        self.stop();
        let workers = std::mem::take(&mut self.control().draining);
        for worker in workers {
            if let Err(e) = worker.await {
                tracing::warn!(error = %e, "Generator worker ended abnormally");
            }
        }
    }

    /// Replace concurrency and pacing. Only allowed while idle.
    pub fn reconfigure(&self, settings: GeneratorSettings) -> Result<GeneratorSettings, GeneratorError> {
        let mut control = self.control();
        if let RunState::Running(run) = &control.state {
            return Err(GeneratorError::RunActive(run.id));
        }
        control.settings = settings;
        tracing::info!(
            concurrency = settings.concurrency(),
            wait_ms = settings.wait().as_millis() as u64,
            "Generator reconfigured"
        );
        Ok(settings)
    }

    pub fn settings(&self) -> GeneratorSettings {
        self.control().settings
    }

    pub fn is_running(&self) -> bool {
        matches!(self.control().state, RunState::Running(_))
    }

    /// Workers currently alive, across runs.
    pub fn active_workers(&self) -> usize {
        self.counters.active.load(Ordering::SeqCst)
    }

    pub fn status(&self) -> GeneratorStatus {
        let control = self.control();
        let run_id = match &control.state {
            RunState::Running(run) => Some(run.id),
            RunState::Idle => None,
        };
        GeneratorStatus {
            running: run_id.is_some(),
            run_id,
            settings: control.settings,
            active_workers: self.active_workers(),
            produced: self.counters.produced.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        }
    }
}

struct Worker {
    run_id: RunId,
    index: usize,
    wait: Duration,
    store: Arc<dyn RecordStore>,
    publisher: Arc<dyn EventPublisher>,
    counters: Arc<WorkerCounters>,
    stop: watch::Receiver<bool>,
}

impl Worker {
    async fn run(mut self) {
        let _active = ActiveWorker::enter(Arc::clone(&self.counters));
        let mut rng = StdRng::from_entropy();
        tracing::debug!(run_id = %self.run_id, worker = self.index, "Worker started");

        loop {
            if *self.stop.borrow() {
                break;
            }

            let bid = Bid::fake(&mut rng);
            self.produce(bid).await;

            tokio::select! {
                _ = self.stop.changed() => break,
                _ = tokio::time::sleep(self.wait) => {}
            }
        }

        tracing::debug!(run_id = %self.run_id, worker = self.index, "Worker finished");
    }

    async fn produce(&self, bid: Bid) {
        let event = match self.store.persist(&bid).await {
            Ok(()) => {
                self.counters.produced.fetch_add(1, Ordering::Relaxed);
                DashboardEvent::RecordProduced(bid)
            }
            Err(e) => {
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    run_id = %self.run_id,
                    worker = self.index,
                    record_id = %bid.id,
                    error = %e,
                    "Failed to persist record, continuing"
                );
                DashboardEvent::persist_failed(bid.id, e.message)
            }
        };

        if let Err(e) = self.publisher.publish(event).await {
            tracing::debug!(run_id = %self.run_id, error = %e, "Event not delivered");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DomainError;
    use async_trait::async_trait;
    use std::time::Instant;

    #[derive(Default)]
    struct TimedStore {
        calls: Mutex<Vec<Instant>>,
        fail_every: Option<usize>,
    }

    impl TimedStore {
        fn failing_every(n: usize) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_every: Some(n),
            }
        }

        fn calls(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RecordStore for TimedStore {
        async fn persist(&self, _bid: &Bid) -> Result<(), DomainError> {
            let count = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(Instant::now());
                calls.len()
            };
            match self.fail_every {
                Some(n) if count % n == 0 => Err(DomainError::database("simulated outage")),
                _ => Ok(()),
            }
        }
    }

    #[derive(Default)]
    struct RecordingPublisher {
        events: Mutex<Vec<DashboardEvent>>,
    }

    impl RecordingPublisher {
        fn events(&self) -> Vec<DashboardEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EventPublisher for RecordingPublisher {
        async fn publish(&self, event: DashboardEvent) -> Result<(), DomainError> {
            self.events.lock().unwrap().push(event);
            Ok(())
        }
    }

    fn generator(
        concurrency: i64,
        wait_ms: i64,
        store: Arc<TimedStore>,
        publisher: Arc<RecordingPublisher>,
    ) -> WorkloadGenerator {
        WorkloadGenerator::new(
            GeneratorSettings::from_raw(concurrency, wait_ms),
            store,
            publisher,
        )
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while !condition() {
            assert!(Instant::now() < deadline, "condition not reached in time");
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn start_spawns_configured_number_of_workers() {
        let store = Arc::new(TimedStore::default());
        let gen = generator(4, 20, store, Arc::default());

        assert!(matches!(gen.start(), StartOutcome::Started(_)));
        wait_until(|| gen.active_workers() == 4).await;

        gen.shutdown().await;
        assert_eq!(gen.active_workers(), 0);
    }

    #[tokio::test]
    async fn second_start_while_running_is_a_noop() {
        let store = Arc::new(TimedStore::default());
        let gen = generator(3, 20, store, Arc::default());

        let first = gen.start();
        let second = gen.start();

        let StartOutcome::Started(run_id) = first else {
            panic!("first start should spawn a run");
        };
        assert_eq!(second, StartOutcome::AlreadyRunning(run_id));

        wait_until(|| gen.active_workers() == 3).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(gen.active_workers(), 3);

        gen.shutdown().await;
    }

    #[tokio::test]
    async fn concurrent_starts_never_double_the_workers() {
        let store = Arc::new(TimedStore::default());
        let gen = Arc::new(generator(5, 20, store, Arc::default()));

        let attempts: Vec<_> = (0..8)
            .map(|_| {
                let gen = Arc::clone(&gen);
                tokio::spawn(async move { gen.start() })
            })
            .collect();
        let mut started = 0;
        for attempt in attempts {
            if let StartOutcome::Started(_) = attempt.await.unwrap() {
                started += 1;
            }
        }

        assert_eq!(started, 1);
        wait_until(|| gen.active_workers() == 5).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(gen.active_workers(), 5);

        gen.shutdown().await;
    }

    #[tokio::test]
    async fn no_records_persisted_later_than_one_interval_after_stop() {
        let wait = Duration::from_millis(40);
        let store = Arc::new(TimedStore::default());
        let gen = generator(4, wait.as_millis() as i64, Arc::clone(&store), Arc::default());

        gen.start();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let stopped_at = Instant::now();
        assert!(matches!(gen.stop(), StopOutcome::Stopped(_)));
        tokio::time::sleep(wait * 4).await;

        let late: Vec<_> = store
            .calls()
            .into_iter()
            .filter(|at| *at > stopped_at + wait)
            .collect();
        assert!(late.is_empty(), "{} records persisted after stop", late.len());
        assert_eq!(gen.active_workers(), 0);
    }

    #[tokio::test]
    async fn stop_wakes_sleeping_workers_immediately() {
        let store = Arc::new(TimedStore::default());
        let gen = generator(3, 60_000, store, Arc::default());

        gen.start();
        wait_until(|| gen.active_workers() == 3).await;

        gen.stop();
        wait_until(|| gen.active_workers() == 0).await;
    }

    #[tokio::test]
    async fn stop_when_idle_reports_not_running() {
        let gen = generator(1, 10, Arc::default(), Arc::default());
        assert_eq!(gen.stop(), StopOutcome::NotRunning);
    }

    #[tokio::test]
    async fn restart_after_stop_gets_new_run_id() {
        let gen = generator(2, 10, Arc::default(), Arc::default());

        let StartOutcome::Started(first) = gen.start() else {
            panic!("expected a new run");
        };
        assert_eq!(gen.stop(), StopOutcome::Stopped(first));
        let StartOutcome::Started(second) = gen.start() else {
            panic!("expected a new run");
        };

        assert!(second > first);
        gen.shutdown().await;
        assert_eq!(gen.active_workers(), 0);
    }

    #[tokio::test]
    async fn each_persisted_record_is_published() {
        let store = Arc::new(TimedStore::default());
        let publisher = Arc::new(RecordingPublisher::default());
        let gen = generator(2, 10, Arc::clone(&store), Arc::clone(&publisher));

        gen.start();
        wait_until(|| gen.status().produced >= 6).await;
        gen.shutdown().await;

        let records = publisher
            .events()
            .into_iter()
            .filter(|event| matches!(event, DashboardEvent::RecordProduced(_)))
            .count() as u64;
        assert_eq!(records, gen.status().produced);
        assert_eq!(store.calls().len() as u64, gen.status().produced);
    }

    #[tokio::test]
    async fn persistence_failures_do_not_stop_workers() {
        let store = Arc::new(TimedStore::failing_every(2));
        let publisher = Arc::new(RecordingPublisher::default());
        let gen = generator(1, 5, Arc::clone(&store), Arc::clone(&publisher));

        gen.start();
        wait_until(|| gen.status().failed >= 3).await;
        assert!(gen.is_running());
        assert_eq!(gen.active_workers(), 1);
        gen.shutdown().await;

        let status = gen.status();
        assert!(status.produced >= 2);
        let failures = publisher
            .events()
            .into_iter()
            .filter(|event| matches!(event, DashboardEvent::PersistFailed { .. }))
            .count() as u64;
        assert_eq!(failures, status.failed);
    }

    #[tokio::test]
    async fn reconfigure_rejected_while_running() {
        let gen = generator(1, 10, Arc::default(), Arc::default());

        let StartOutcome::Started(run_id) = gen.start() else {
            panic!("expected a new run");
        };
        assert_eq!(
            gen.reconfigure(GeneratorSettings::from_raw(8, 100)),
            Err(GeneratorError::RunActive(run_id))
        );

        gen.stop();
        let applied = gen.reconfigure(GeneratorSettings::from_raw(8, 100)).unwrap();
        assert_eq!(applied.concurrency(), 8);
        assert_eq!(gen.settings(), applied);
        gen.shutdown().await;
    }

    #[tokio::test]
    async fn status_reflects_settings_and_state() {
        let gen = generator(6, 250, Arc::default(), Arc::default());

        let idle = gen.status();
        assert!(!idle.running);
        assert_eq!(idle.run_id, None);
        assert_eq!(idle.settings.concurrency(), 6);

        gen.start();
        let running = gen.status();
        assert!(running.running);
        assert_eq!(running.run_id, Some(RunId::new(1)));

        let json = serde_json::to_value(&running).unwrap();
        assert_eq!(json["concurrency"], 6);
        assert_eq!(json["wait_ms"], 250);
        assert_eq!(json["running"], true);

        gen.shutdown().await;
    }
}
