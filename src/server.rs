use std::{net::SocketAddr, sync::Arc, time::Duration};

use chrono::Utc;
use tokio::{
    net::{TcpListener, TcpStream},
    sync::mpsc,
    time::timeout,
};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    client_listener::run_listener,
    client_sender::run_sender,
    codec::LineCodec,
    context::{ReplySender, ServerContext},
    registry::Registry,
    result::Result,
};

const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn bind(context: &ServerContext) -> Result<TcpListener> {
    let address = format!("{}:{}", context.settings.host, context.settings.port);
    let listener = TcpListener::bind(&address).await?;
    Ok(listener)
}

/// Accept loop. Each connection gets its own task; tasks are never joined,
/// every one of them cleans up its own registry entry on the way out.
pub async fn run_server(
    context: ServerContext,
    listener: TcpListener,
    registry: Arc<Registry>,
) -> Result<()> {
    info!(
        address = %listener.local_addr()?,
        version = %context.version,
        started_at = %context.start_time,
        "IRC relay listening"
    );

    loop {
        let (stream, client_ip) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "Failed to accept client");
                continue;
            }
        };

        let registry = registry.clone();
        let context = context.clone();

        tokio::spawn(async move {
            handle_connection(stream, Some(client_ip), registry, context).await;
        });
    }
}

pub async fn handle_connection(
    stream: TcpStream,
    client_ip: Option<SocketAddr>,
    registry: Arc<Registry>,
    context: ServerContext,
) {
    let connection_id = Uuid::new_v4();
    let max_line_len = context.settings.max_line_len;
    let (read_half, write_half) = stream.into_split();
    let (sender, mut receiver) = mpsc::channel(context.settings.outbound_queue_len.max(1));

    if let Err(e) = registry.register(connection_id, ReplySender(sender), client_ip) {
        warn!(%connection_id, error = %e, "Unable to register connection");
        return;
    }

    info!(%connection_id, client_ip = ?client_ip, clients = registry.len(), "Client connected");

    let mut writer = tokio::spawn(async move {
        let mut sink = FramedWrite::new(write_half, LineCodec::with_max_line_len(max_line_len));
        if let Err(e) = run_sender(&connection_id, &mut receiver, &mut sink).await {
            debug!(%connection_id, error = %e, "Write failed");
        }
    });

    let mut lines = FramedRead::new(read_half, LineCodec::with_max_line_len(max_line_len));
    if let Err(e) = run_listener(&connection_id, &mut lines, &registry).await {
        debug!(%connection_id, error = %e, "Read failed");
    }

    match registry.leave_all(connection_id) {
        Some(ctx) => {
            let session = Utc::now() - ctx.connected_at;
            info!(
                %connection_id,
                client_ip = ?ctx.client_host,
                nick = %ctx.nick,
                channel = %ctx.channel,
                session_secs = session.num_seconds(),
                clients = registry.len(),
                "Client disconnected"
            );
        }
        None => warn!(%connection_id, "Disconnected connection already removed"),
    }

    // the registry held the last long-lived sender, the writer drains and closes
    if timeout(WRITER_DRAIN_TIMEOUT, &mut writer).await.is_err() {
        debug!(%connection_id, "Writer did not finish draining, aborting it");
        writer.abort();
    }
}
