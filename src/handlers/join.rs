use uuid::Uuid;

use crate::{handlers::Outbound, registry::Registry, replies::Reply, result::Result};

/// Moves the client into `channel` and announces it to the whole channel,
/// the joining client included.
pub fn handle_join(registry: &Registry, connection_id: Uuid, channel: &str) -> Result<Outbound> {
    let client = registry.join_channel(connection_id, channel)?;

    Ok(Outbound::ToChannel {
        channel: client.channel.clone(),
        reply: Reply::Join {
            nick: client.nick,
            channel: client.channel,
        },
    })
}
