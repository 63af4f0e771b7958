use tracing::debug;
use uuid::Uuid;

use crate::{
    error::Error, handlers::Outbound, registry::Registry, replies::Reply, result::Result,
};

/// Routed to the sender's current channel; `target` is only echoed in the text.
pub fn handle_privmsg(
    registry: &Registry,
    connection_id: Uuid,
    target: &str,
    text: &str,
) -> Result<Option<Outbound>> {
    let client = registry
        .client(connection_id)
        .ok_or(Error::UnknownConnection(connection_id))?;

    if client.channel.is_empty() {
        debug!(%connection_id, %target, "PRIVMSG from a client outside any channel dropped");
        return Ok(None);
    }

    Ok(Some(Outbound::ToChannel {
        channel: client.channel,
        reply: Reply::PrivMsg {
            nick: client.nick,
            target: target.to_string(),
            text: text.to_string(),
        },
    }))
}
