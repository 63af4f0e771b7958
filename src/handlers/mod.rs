pub mod join;
pub mod nick;
pub mod privmsg;

use crate::replies::Reply;

/// Where a handler's reply has to go.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    ToSender(Reply),
    ToChannel { channel: String, reply: Reply },
}
