use std::io;

use futures_util::{Stream, StreamExt};
use tracing::debug;
use uuid::Uuid;

use crate::{message_handler::handle_line, registry::Registry};

/// Read loop of one connection. Returns once the peer closes the stream or a
/// read fails; both count as a normal disconnect.
pub async fn run_listener<S>(connection_id: &Uuid, lines: &mut S, registry: &Registry) -> io::Result<()>
where
    S: Stream<Item = io::Result<String>> + Unpin,
{
    while let Some(received) = lines.next().await {
        let raw_message = received?;
        debug!(%connection_id, raw = %raw_message, "Received");
        handle_line(registry, *connection_id, &raw_message);
    }

    Ok(())
}
