//! HealthMonitor - Periodic cluster health polling.
//!
//! Every poll rebuilds the per-status counts from scratch and replaces the
//! published snapshot wholesale, so a node that disappears from the source
//! stops being counted on the very next cycle.
//!
//! Failure policy per poll:
//!
//! | Source result              | Snapshot                  |
//! |----------------------------|---------------------------|
//! | nodes                      | `Known(counts)`           |
//! | no nodes                   | `Unknown`                 |
//! | fatal error (rejected)     | `Unknown`                 |
//! | transient error            | previous value retained   |
//!
//! Polling never stops on its own; only the shutdown signal ends `run`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

use crate::domain::health::HealthSnapshot;
use crate::domain::DashboardEvent;
use crate::ports::{EventPublisher, NodeStatusSource};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// What a single poll did to the published snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Snapshot replaced and the rendered summary changed.
    Changed,
    /// Snapshot replaced with an equivalent summary.
    Unchanged,
    /// Transient failure; previous snapshot kept.
    Retained,
}

/// Cheap, cloneable read access to the latest health snapshot.
#[derive(Debug, Clone)]
pub struct HealthHandle {
    snapshot: watch::Receiver<HealthSnapshot>,
}

impl HealthHandle {
    pub fn snapshot(&self) -> HealthSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Latest summary text, e.g. `"3 node(s) LIVE"`.
    pub fn summary(&self) -> String {
        self.snapshot.borrow().summary()
    }
}

pub struct HealthMonitor {
    source: Arc<dyn NodeStatusSource>,
    publisher: Option<Arc<dyn EventPublisher>>,
    poll_interval: Duration,
    snapshot: watch::Sender<HealthSnapshot>,
}

impl HealthMonitor {
    /// A zero interval falls back to [`DEFAULT_POLL_INTERVAL`].
    pub fn new(source: Arc<dyn NodeStatusSource>, poll_interval: Duration) -> Self {
        let poll_interval = if poll_interval.is_zero() {
            DEFAULT_POLL_INTERVAL
        } else {
            poll_interval
        };
        let (snapshot, _) = watch::channel(HealthSnapshot::default());
        Self {
            source,
            publisher: None,
            poll_interval,
            snapshot,
        }
    }

    /// Publish a status event through `publisher` whenever the summary changes.
    pub fn with_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn handle(&self) -> HealthHandle {
        HealthHandle {
            snapshot: self.snapshot.subscribe(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Fetch once and update the snapshot according to the failure policy.
    pub async fn poll_once(&self) -> PollOutcome {
        let source = self.source.name();
        let next = match self.source.fetch_nodes().await {
            Ok(nodes) if nodes.is_empty() => {
                tracing::warn!(source, "Node status source reported no nodes");
                HealthSnapshot::unknown("no nodes reported")
            }
            Ok(nodes) => HealthSnapshot::from_nodes(&nodes),
            Err(e) if e.is_fatal() => {
                tracing::error!(source, error = %e, "Node status unavailable until credentials are fixed");
                HealthSnapshot::unknown(e.to_string())
            }
            Err(e) => {
                tracing::warn!(source, error = %e, "Health poll failed, keeping previous summary");
                return PollOutcome::Retained;
            }
        };

        let summary = next.summary();
        let previous = self.snapshot.send_replace(next);
        if previous.summary() == summary {
            return PollOutcome::Unchanged;
        }

        tracing::info!(source, summary = %summary, "Cluster health changed");
        if let Some(publisher) = &self.publisher {
            if let Err(e) = publisher.publish(DashboardEvent::health_changed(summary)).await {
                tracing::debug!(error = %e, "Health event not delivered");
            }
        }
        PollOutcome::Changed
    }

    /// Poll every interval until `shutdown` flips to true or its sender drops.
    ///
    /// An in-flight poll is abandoned on shutdown.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            source = self.source.name(),
            interval_ms = self.poll_interval.as_millis() as u64,
            "Health monitor started"
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    tokio::select! {
                        _ = self.poll_once() => {}
                        changed = shutdown.changed() => {
                            if changed.is_err() || *shutdown.borrow() {
                                break;
                            }
                        }
                    }
                }
            }
        }

        tracing::info!("Health monitor stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DomainError;
    use crate::domain::health::{NodeStatus, DEAD, LIVE};
    use crate::ports::NodeSourceError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    type Reply = Result<Vec<NodeStatus>, NodeSourceError>;

    /// Replays scripted replies, repeating the last one forever.
    struct ScriptedSource {
        replies: Mutex<VecDeque<Reply>>,
        last: Mutex<Option<Reply>>,
        polls: Mutex<usize>,
    }

    impl ScriptedSource {
        fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                last: Mutex::new(None),
                polls: Mutex::new(0),
            }
        }

        fn polls(&self) -> usize {
            *self.polls.lock().unwrap()
        }
    }

    #[async_trait]
    impl NodeStatusSource for ScriptedSource {
        async fn fetch_nodes(&self) -> Result<Vec<NodeStatus>, NodeSourceError> {
            *self.polls.lock().unwrap() += 1;
            let next = self.replies.lock().unwrap().pop_front();
            let mut last = self.last.lock().unwrap();
            if let Some(reply) = next {
                *last = Some(reply);
            }
            last.clone().unwrap_or_else(|| Ok(Vec::new()))
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    #[derive(Default)]
    struct SummaryRecorder {
        summaries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl EventPublisher for SummaryRecorder {
        async fn publish(&self, event: DashboardEvent) -> Result<(), DomainError> {
            if let DashboardEvent::HealthChanged { summary, .. } = event {
                self.summaries.lock().unwrap().push(summary);
            }
            Ok(())
        }
    }

    fn nodes(statuses: &[&str]) -> Vec<NodeStatus> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| NodeStatus::new(format!("node{}", i + 1), "us-east1", *status))
            .collect()
    }

    fn monitor(replies: Vec<Reply>) -> (HealthMonitor, Arc<ScriptedSource>, Arc<SummaryRecorder>) {
        let source = Arc::new(ScriptedSource::new(replies));
        let recorder = Arc::new(SummaryRecorder::default());
        let monitor = HealthMonitor::new(source.clone(), Duration::from_millis(10))
            .with_publisher(recorder.clone());
        (monitor, source, recorder)
    }

    #[tokio::test]
    async fn summary_before_first_poll_is_zero_live() {
        let (monitor, _, _) = monitor(vec![]);
        assert_eq!(monitor.handle().summary(), "0 node(s) LIVE");
    }

    #[tokio::test]
    async fn all_live_cluster_reports_single_segment() {
        let (monitor, _, _) = monitor(vec![Ok(nodes(&[LIVE, LIVE, LIVE]))]);

        assert_eq!(monitor.poll_once().await, PollOutcome::Changed);
        assert_eq!(monitor.handle().summary(), "3 node(s) LIVE");
    }

    #[tokio::test]
    async fn mixed_statuses_report_sorted_segments() {
        let (monitor, _, _) = monitor(vec![Ok(nodes(&[LIVE, DEAD, LIVE, "SUSPECT"]))]);

        monitor.poll_once().await;
        assert_eq!(
            monitor.handle().summary(),
            "1 node(s) DEAD | 2 node(s) LIVE | 1 node(s) SUSPECT"
        );
    }

    #[tokio::test]
    async fn statuses_missing_from_next_poll_are_cleared() {
        let (monitor, _, _) = monitor(vec![
            Ok(nodes(&[LIVE, DEAD, "DECOMMISSIONING"])),
            Ok(nodes(&[LIVE, LIVE])),
        ]);

        monitor.poll_once().await;
        monitor.poll_once().await;

        assert_eq!(monitor.handle().summary(), "2 node(s) LIVE");
    }

    #[tokio::test]
    async fn transient_error_retains_previous_summary() {
        let (monitor, _, recorder) = monitor(vec![
            Ok(nodes(&[LIVE, DEAD])),
            Err(NodeSourceError::Unavailable("connection refused".into())),
            Err(NodeSourceError::Malformed("expected value".into())),
        ]);

        monitor.poll_once().await;
        assert_eq!(monitor.poll_once().await, PollOutcome::Retained);
        assert_eq!(monitor.poll_once().await, PollOutcome::Retained);

        assert_eq!(monitor.handle().summary(), "1 node(s) DEAD | 1 node(s) LIVE");
        assert_eq!(recorder.summaries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejected_credentials_mark_status_unknown_then_recover() {
        let (monitor, _, _) = monitor(vec![
            Ok(nodes(&[LIVE])),
            Err(NodeSourceError::Rejected("401 Unauthorized".into())),
            Ok(nodes(&[LIVE, LIVE])),
        ]);

        monitor.poll_once().await;
        assert_eq!(monitor.poll_once().await, PollOutcome::Changed);
        assert_eq!(monitor.handle().summary(), "cluster status unknown");
        assert!(!monitor.handle().snapshot().is_known());

        monitor.poll_once().await;
        assert_eq!(monitor.handle().summary(), "2 node(s) LIVE");
    }

    #[tokio::test]
    async fn empty_node_list_marks_status_unknown() {
        let (monitor, _, _) = monitor(vec![Ok(nodes(&[LIVE])), Ok(Vec::new())]);

        monitor.poll_once().await;
        monitor.poll_once().await;

        assert_eq!(monitor.handle().summary(), "cluster status unknown");
    }

    #[tokio::test]
    async fn publishes_only_when_summary_changes() {
        let (monitor, _, recorder) = monitor(vec![
            Ok(nodes(&[LIVE, LIVE])),
            Ok(nodes(&[LIVE, LIVE])),
            Ok(nodes(&[LIVE, DEAD])),
            Ok(nodes(&[DEAD, LIVE])),
        ]);

        assert_eq!(monitor.poll_once().await, PollOutcome::Changed);
        assert_eq!(monitor.poll_once().await, PollOutcome::Unchanged);
        assert_eq!(monitor.poll_once().await, PollOutcome::Changed);
        assert_eq!(monitor.poll_once().await, PollOutcome::Unchanged);

        assert_eq!(
            *recorder.summaries.lock().unwrap(),
            vec![
                "2 node(s) LIVE".to_string(),
                "1 node(s) DEAD | 1 node(s) LIVE".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn run_keeps_polling_after_errors_until_shutdown() {
        let (monitor, source, _) = monitor(vec![
            Err(NodeSourceError::Rejected("403 Forbidden".into())),
            Err(NodeSourceError::Unavailable("timeout".into())),
            Ok(nodes(&[LIVE])),
        ]);
        let handle = monitor.handle();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(monitor.run(shutdown_rx));
        tokio::time::timeout(Duration::from_secs(2), async {
            while handle.summary() != "1 node(s) LIVE" {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("monitor never recovered");

        shutdown_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
        assert!(source.polls() >= 3);
    }

    /// Never answers, like an endpoint that hangs until the request timeout.
    struct HangingSource;

    #[async_trait]
    impl NodeStatusSource for HangingSource {
        async fn fetch_nodes(&self) -> Result<Vec<NodeStatus>, NodeSourceError> {
            std::future::pending().await
        }

        fn name(&self) -> &'static str {
            "hanging"
        }
    }

    #[tokio::test]
    async fn shutdown_interrupts_in_flight_poll() {
        let monitor = HealthMonitor::new(Arc::new(HangingSource), Duration::from_millis(10));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(monitor.run(shutdown_rx));
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_millis(500), task)
            .await
            .expect("shutdown waited for the hanging poll")
            .unwrap();
    }

    #[tokio::test]
    async fn zero_interval_uses_default() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let monitor = HealthMonitor::new(source, Duration::ZERO);
        assert_eq!(monitor.poll_interval(), DEFAULT_POLL_INTERVAL);
    }
}
