pub mod broadcast;
pub mod channels;
pub mod client;
pub mod client_listener;
pub mod client_sender;
pub mod codec;
pub mod context;
pub mod error;
pub mod handlers;
pub mod message_handler;
pub mod message_parsing;
pub mod registry;
pub mod replies;
pub mod result;
pub mod server;
pub mod settings;
pub mod telemetry;

pub use crate::context::{ChannelContext, ClientContext, ServerContext};
