use std::{collections::HashSet, net::SocketAddr};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::Sender;
use uuid::Uuid;

use crate::settings::Settings;

#[derive(Clone)]
pub struct ServerContext {
    pub start_time: DateTime<Utc>,
    pub version: String,
    pub settings: Settings,
}

impl ServerContext {
    pub fn new(settings: Settings) -> Self {
        ServerContext {
            start_time: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            settings,
        }
    }
}

/// Outbound queue of one connection. Items are complete, CRLF terminated lines.
#[derive(Clone, Debug)]
pub struct ReplySender(pub Sender<String>);

/// Per-connection state held by the registry.
pub struct ClientContext {
    pub connection_id: Uuid,
    pub nick: String,
    pub channel: String,
    pub client_host: Option<SocketAddr>,
    pub connected_at: DateTime<Utc>,
    pub sender: ReplySender,
}

/// Point-in-time copy of a client's identity, nickname and channel.
#[derive(Clone, Debug, PartialEq)]
pub struct Client {
    pub connection_id: Uuid,
    pub nick: String,
    pub channel: String,
}

impl From<&ClientContext> for Client {
    fn from(ctx: &ClientContext) -> Self {
        Client {
            connection_id: ctx.connection_id,
            nick: ctx.nick.clone(),
            channel: ctx.channel.clone(),
        }
    }
}

#[derive(Default)]
pub struct ChannelContext {
    pub members: HashSet<Uuid>,
}
