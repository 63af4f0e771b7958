use std::str::FromStr;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    broadcast::{broadcast, send_line},
    handlers::{join::handle_join, nick::handle_nick, privmsg::handle_privmsg, Outbound},
    message_parsing::{Command, Message},
    registry::Registry,
    result::Result,
};

/// Parses one received line and applies it. Malformed and unknown input is
/// dropped without a reply.
pub fn handle_line(registry: &Registry, connection_id: Uuid, raw_message: &str) {
    let command = match Command::from_str(raw_message) {
        Ok(c) => c,
        Err(e) => {
            debug!(%connection_id, raw = %raw_message, error = %e, "Dropping malformed message");
            return;
        }
    };

    let message = Message {
        connection_id,
        command,
    };

    if let Err(e) = handle_message(registry, &message) {
        warn!(%connection_id, error = %e, "Unable to handle message");
    }
}

pub fn handle_message(registry: &Registry, message: &Message) -> Result<()> {
    let connection_id = message.connection_id;

    let outbound = match &message.command {
        Command::Nick { nick } => {
            info!(%connection_id, %nick, "NICK");
            Some(handle_nick(registry, connection_id, nick)?)
        }
        Command::Join { channel } => {
            let outbound = handle_join(registry, connection_id, channel)?;
            info!(%connection_id, %channel, "JOIN");
            Some(outbound)
        }
        Command::PrivMsg { target, text } => {
            debug!(%connection_id, %target, "PRIVMSG");
            handle_privmsg(registry, connection_id, target, text)?
        }
        Command::Unhandled => {
            debug!(%connection_id, "Unhandled message ignored");
            None
        }
    };

    if let Some(outbound) = outbound {
        deliver(registry, connection_id, outbound);
    }

    Ok(())
}

fn deliver(registry: &Registry, connection_id: Uuid, outbound: Outbound) {
    match outbound {
        Outbound::ToSender(reply) => match registry.sender_of(connection_id) {
            Some(sender) => {
                if !send_line(&sender, &reply.to_line()) {
                    warn!(%connection_id, "Unable to queue reply for sender");
                }
            }
            None => debug!(%connection_id, "Sender gone before reply"),
        },
        Outbound::ToChannel { channel, reply } => {
            let delivered = broadcast(registry, &channel, &reply.to_line());
            debug!(%connection_id, %channel, delivered, "Broadcast");
        }
    }
}
