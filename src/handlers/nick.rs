use uuid::Uuid;

use crate::{handlers::Outbound, registry::Registry, replies::Reply, result::Result};

pub fn handle_nick(registry: &Registry, connection_id: Uuid, nick: &str) -> Result<Outbound> {
    let client = registry.set_nickname(connection_id, nick)?;

    Ok(Outbound::ToSender(Reply::Nick { nick: client.nick }))
}
