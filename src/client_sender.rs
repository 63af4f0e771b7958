use std::io;

use futures_util::{Sink, SinkExt};
use tracing::debug;
use uuid::Uuid;

use crate::channels::ReceiverWrapper;

/// Sole writer for one connection. Drains the outbound queue into the socket
/// until every sender for the connection is gone, then closes the write side.
pub async fn run_sender<R, W>(connection_id: &Uuid, receiver: &mut R, sink: &mut W) -> io::Result<()>
where
    R: ReceiverWrapper<String>,
    W: Sink<String, Error = io::Error> + Unpin,
{
    while let Some(line) = receiver.receive().await {
        debug!(%connection_id, line = %line.trim_end(), "Sending");
        sink.send(line).await?;
    }

    debug!(%connection_id, "Outbound queue closed");
    sink.close().await
}
