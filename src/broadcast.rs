use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use crate::{context::ReplySender, registry::Registry};

/// Queues `message` for every current member of `channel` and returns how
/// many members accepted it.
///
/// The member list is a snapshot taken under the registry lock; the sends
/// happen after it is released. A full or closed queue only costs that
/// member its copy, the owning connection's read loop does the cleanup.
pub fn broadcast(registry: &Registry, channel: &str, message: &str) -> usize {
    let members = match registry.channel_senders(channel) {
        Some(m) => m,
        None => {
            debug!(%channel, "Broadcast to unknown channel ignored");
            return 0;
        }
    };

    let mut delivered = 0;

    for (member, sender) in members {
        if send_line(&sender, message) {
            delivered += 1;
        } else {
            warn!(%member, %channel, "Unable to deliver broadcast to member");
        }
    }

    delivered
}

/// Non-blocking enqueue onto one connection's outbound queue.
pub fn send_line(sender: &ReplySender, message: &str) -> bool {
    match sender.0.try_send(message.to_string()) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            debug!("Outbound queue full, dropping line");
            false
        }
        Err(TrySendError::Closed(_)) => {
            debug!("Outbound queue closed, dropping line");
            false
        }
    }
}
