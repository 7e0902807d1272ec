//! Per-viewer read and write pumps.
//!
//! Each viewer runs two loops:
//! - the read pump consumes inbound frames only to notice the peer leaving
//! - the write pump drains the outbound buffer into the socket
//!
//! Whichever finishes first aborts the other, then the connection is
//! unregistered from the hub. The socket sink is owned by the write pump,
//! so it is closed exactly once, when that task ends.

use std::fmt::Display;

use axum::extract::ws::Message;
use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;

use crate::domain::foundation::ConnectionId;

use super::hub::{Connection, HubHandle};
use super::messages::Frame;

/// Register `connection`, pump frames until either side stops, then unregister.
pub async fn serve_connection<W, R, E>(
    hub: HubHandle,
    connection: Connection,
    outbound: mpsc::Receiver<Frame>,
    sink: W,
    stream: R,
) where
    W: Sink<Message> + Unpin + Send + 'static,
    W::Error: Display + Send,
    R: Stream<Item = Result<Message, E>> + Unpin + Send + 'static,
    E: Display + Send + 'static,
{
    let id = connection.id();
    hub.register(connection).await;

    let mut write_task = tokio::spawn(write_pump(id, outbound, sink));
    let mut read_task = tokio::spawn(read_pump(id, stream));

    tokio::select! {
        _ = &mut write_task => {
            read_task.abort();
        }
        _ = &mut read_task => {
            write_task.abort();
        }
    }

    hub.unregister(id).await;
}

async fn write_pump<W>(id: ConnectionId, mut outbound: mpsc::Receiver<Frame>, mut sink: W)
where
    W: Sink<Message> + Unpin,
    W::Error: Display,
{
    while let Some(frame) = outbound.recv().await {
        if let Err(e) = sink.send(Message::Text(frame.to_string())).await {
            tracing::debug!(connection_id = %id, "Send error, closing connection: {}", e);
            return;
        }
    }

    // Outbound buffer closed by the hub (evicted or shutting down).
    tracing::debug!(connection_id = %id, "Outbound closed, sending close frame");
    let _ = sink.send(Message::Close(None)).await;
    let _ = sink.close().await;
}

async fn read_pump<R, E>(id: ConnectionId, mut stream: R)
where
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => {
                tracing::debug!(connection_id = %id, "Viewer sent close frame");
                return;
            }
            Ok(_) => {
                // Viewers have nothing to say; ping/pong is handled by axum.
                tracing::trace!(connection_id = %id, "Ignoring inbound frame");
            }
            Err(e) => {
                tracing::debug!(connection_id = %id, "Receive error: {}", e);
                return;
            }
        }
    }
    tracing::debug!(connection_id = %id, "Viewer stream ended");
}
