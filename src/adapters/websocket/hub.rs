//! Broadcast hub fanning one event stream out to every live viewer.
//!
//! The set of active connections is owned by a single coordinating loop.
//! Everything else talks to it through a cloneable [`HubHandle`], which
//! feeds three queues:
//!
//! ```text
//!  register ───┐
//!  unregister ─┼──► Hub loop ──try_send──► Connection outbound buffers
//!  broadcast ──┘    (HashMap<ConnectionId, Connection>)
//! ```
//!
//! Delivery is best-effort: a connection whose outbound buffer is full is
//! evicted instead of slowing down the others.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::domain::foundation::{ConnectionId, DomainError, ErrorCode};
use crate::domain::DashboardEvent;
use crate::ports::EventPublisher;

use super::messages::{Frame, ServerMessage};

/// Default capacity of each viewer's outbound buffer.
pub const DEFAULT_OUTBOUND_BUFFER: usize = 64;

/// Default capacity of the hub's request queues.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Sizing of the hub's queues.
#[derive(Debug, Clone, Copy)]
pub struct HubConfig {
    /// Frames a single viewer may lag behind before it is evicted.
    pub outbound_buffer: usize,
    /// Capacity of each of the register/unregister/broadcast queues.
    pub queue_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// One registered viewer: its id and the sending half of its outbound buffer.
///
/// Dropping the `Connection` closes the buffer, which ends the viewer's
/// write pump.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    outbound: mpsc::Sender<Frame>,
}

impl Connection {
    /// Create a connection with an outbound buffer of `capacity` frames.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Frame>) {
        let (outbound, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                id: ConnectionId::new(),
                outbound,
            },
            rx,
        )
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue a frame for this viewer only, before it is registered.
    ///
    /// Returns false if the buffer is full or the viewer is gone.
    pub fn enqueue(&self, frame: Frame) -> bool {
        self.outbound.try_send(frame).is_ok()
    }
}

/// A connection waiting to join, plus the signal that it has.
struct Registration {
    connection: Connection,
    joined: oneshot::Sender<()>,
}

/// Cloneable front door to the hub loop.
#[derive(Clone)]
pub struct HubHandle {
    register_tx: mpsc::Sender<Registration>,
    unregister_tx: mpsc::Sender<ConnectionId>,
    broadcast_tx: mpsc::Sender<Frame>,
    count_tx: mpsc::Sender<oneshot::Sender<usize>>,
    outbound_buffer: usize,
}

impl HubHandle {
    /// Create a connection sized for this hub.
    pub fn new_connection(&self) -> (Connection, mpsc::Receiver<Frame>) {
        Connection::new(self.outbound_buffer)
    }

    /// Add a connection to the active set.
    ///
    /// Returns once the loop has inserted it, so every broadcast submitted
    /// afterwards reaches it. If the hub has already shut down the
    /// connection is dropped, which closes its outbound buffer.
    pub async fn register(&self, connection: Connection) {
        let (joined, joined_rx) = oneshot::channel();
        let registration = Registration { connection, joined };
        if let Err(rejected) = self.register_tx.send(registration).await {
            tracing::debug!(
                connection_id = %rejected.0.connection.id,
                "Hub closed, connection not registered"
            );
            return;
        }
        // Err only if the loop stopped first; the connection is gone either way.
        let _ = joined_rx.await;
    }

    /// Remove a connection if present. Unknown ids are ignored.
    pub async fn unregister(&self, id: ConnectionId) {
        if self.unregister_tx.send(id).await.is_err() {
            tracing::trace!(connection_id = %id, "Hub closed, nothing to unregister");
        }
    }

    /// Deliver a frame to every active connection.
    ///
    /// Returns once the frame is queued for the hub loop.
    pub async fn broadcast(&self, frame: Frame) -> Result<(), DomainError> {
        self.broadcast_tx
            .send(frame)
            .await
            .map_err(|_| DomainError::new(ErrorCode::HubClosed, "Hub is no longer running"))
    }

    /// Number of active connections, or `None` if the hub has stopped.
    pub async fn connection_count(&self) -> Option<usize> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.count_tx.send(reply_tx).await.ok()?;
        reply_rx.await.ok()
    }
}

#[async_trait]
impl EventPublisher for HubHandle {
    async fn publish(&self, event: DashboardEvent) -> Result<(), DomainError> {
        let kind = event.kind();
        let frame = ServerMessage::from(event).to_frame().map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize {} event: {}", kind, e),
            )
        })?;
        self.broadcast(frame).await
    }
}

/// The coordinating loop and the connection set it owns.
pub struct Hub {
    connections: HashMap<ConnectionId, Connection>,
    register_rx: mpsc::Receiver<Registration>,
    unregister_rx: mpsc::Receiver<ConnectionId>,
    broadcast_rx: mpsc::Receiver<Frame>,
    count_rx: mpsc::Receiver<oneshot::Sender<usize>>,
}

impl Hub {
    /// Create a hub and its handle. Nothing runs until [`Hub::run`].
    pub fn new(config: HubConfig) -> (Self, HubHandle) {
        let capacity = config.queue_capacity.max(1);
        let (register_tx, register_rx) = mpsc::channel(capacity);
        let (unregister_tx, unregister_rx) = mpsc::channel(capacity);
        let (broadcast_tx, broadcast_rx) = mpsc::channel(capacity);
        let (count_tx, count_rx) = mpsc::channel(capacity);

        let hub = Self {
            connections: HashMap::new(),
            register_rx,
            unregister_rx,
            broadcast_rx,
            count_rx,
        };
        let handle = HubHandle {
            register_tx,
            unregister_tx,
            broadcast_tx,
            count_tx,
            outbound_buffer: config.outbound_buffer,
        };
        (hub, handle)
    }

    /// Create a hub and spawn its loop on the runtime.
    pub fn spawn(config: HubConfig, shutdown: watch::Receiver<bool>) -> (HubHandle, JoinHandle<()>) {
        let (hub, handle) = Self::new(config);
        let task = tokio::spawn(hub.run(shutdown));
        (handle, task)
    }

    /// Run until shutdown is signalled or every handle is dropped.
    ///
    /// Requests are served in priority order unregister → broadcast →
    /// register, so a frame queued before a registration never reaches
    /// that later connection.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        tracing::debug!("Hub loop started");

        loop {
            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }

                request = self.unregister_rx.recv() => match request {
                    Some(id) => self.remove(id),
                    None => break,
                },

                request = self.broadcast_rx.recv() => match request {
                    Some(frame) => self.deliver(frame),
                    None => break,
                },

                request = self.register_rx.recv() => match request {
                    Some(Registration { connection, joined }) => {
                        self.insert(connection);
                        let _ = joined.send(());
                    }
                    None => break,
                },

                request = self.count_rx.recv() => match request {
                    Some(reply) => {
                        let _ = reply.send(self.connections.len());
                    }
                    None => break,
                },
            }
        }

        let remaining = self.connections.len();
        self.connections.clear();
        tracing::info!(remaining, "Hub loop stopped, connections released");
    }

    fn insert(&mut self, connection: Connection) {
        tracing::debug!(connection_id = %connection.id, "Connection registered");
        self.connections.insert(connection.id, connection);
    }

    fn remove(&mut self, id: ConnectionId) {
        if self.connections.remove(&id).is_some() {
            tracing::debug!(connection_id = %id, "Connection unregistered");
        }
    }

    fn deliver(&mut self, frame: Frame) {
        let mut evicted = Vec::new();

        for (id, connection) in &self.connections {
            match connection.outbound.try_send(frame.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(connection_id = %id, "Outbound buffer full, dropping slow viewer");
                    evicted.push(*id);
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(connection_id = %id, "Viewer gone, dropping connection");
                    evicted.push(*id);
                }
            }
        }

        for id in evicted {
            self.connections.remove(&id);
        }
    }
}
