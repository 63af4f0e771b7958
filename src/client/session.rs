use std::io;

use futures_util::{SinkExt, Stream, StreamExt};
use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt},
    net::{lookup_host, TcpStream},
    sync::mpsc::Sender,
};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, warn};

use crate::{
    channels::ReceiverWrapper,
    client::input::{Input, HELP},
    codec::LineCodec,
    error::Error,
    result::Result,
};

const PROMPT: &str = "> ";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Something to put on the terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum Display {
    Line(String),
    System(String),
    Clear,
}

pub async fn connect(host: &str, port: u16) -> Result<TcpStream> {
    let addresses: Vec<_> = lookup_host((host, port))
        .await
        .map_err(|_| Error::AddressResolution(host.to_string()))?
        .collect();

    if addresses.is_empty() {
        return Err(Error::AddressResolution(host.to_string()));
    }

    let stream = TcpStream::connect(&addresses[..]).await?;
    Ok(stream)
}

/// Single owner of the terminal, so the prompt and incoming lines never
/// interleave mid-line.
pub async fn run_printer<R, W>(receiver: &mut R, out: &mut W) -> io::Result<()>
where
    R: ReceiverWrapper<Display>,
    W: AsyncWrite + Unpin,
{
    out.write_all(PROMPT.as_bytes()).await?;
    out.flush().await?;

    while let Some(display) = receiver.receive().await {
        let text = match display {
            Display::Line(line) => format!("\r{}\n{}", line, PROMPT),
            Display::System(line) => format!("\r[system] {}\n{}", line, PROMPT),
            Display::Clear => format!("{}{}", CLEAR_SCREEN, PROMPT),
        };
        out.write_all(text.as_bytes()).await?;
        out.flush().await?;
    }

    out.write_all(b"\n").await?;
    out.flush().await
}

async fn show(display: &Sender<Display>, item: Display) {
    if display.send(item).await.is_err() {
        debug!("Display closed");
    }
}

/// Relays user input to the server and server lines to the display until the
/// user quits, input ends, or the server goes away.
pub async fn run_session<R, W, I>(
    server_read: R,
    server_write: W,
    user_input: &mut I,
    display: &Sender<Display>,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    I: Stream<Item = io::Result<String>> + Unpin,
{
    let mut server_lines = FramedRead::new(server_read, LineCodec::new());
    let mut sink = FramedWrite::new(server_write, LineCodec::new());

    loop {
        tokio::select! {
            received = server_lines.next() => match received {
                Some(Ok(line)) => show(display, Display::Line(line)).await,
                Some(Err(e)) => {
                    warn!(error = %e, "Read from server failed");
                    show(display, Display::System("disconnected from server".to_string())).await;
                    return Ok(());
                }
                None => {
                    show(display, Display::System("disconnected from server".to_string())).await;
                    return Ok(());
                }
            },
            typed = user_input.next() => {
                let input = match typed {
                    Some(line) => Input::parse(&line?),
                    None => Input::Quit,
                };

                match &input {
                    Input::Help => {
                        for line in HELP {
                            show(display, Display::Line(line.to_string())).await;
                        }
                    }
                    Input::Clear => show(display, Display::Clear).await,
                    Input::Empty => {}
                    Input::MsgUsage => {
                        show(display, Display::System("usage: /msg <target> <text>".to_string())).await
                    }
                    Input::Unknown => {
                        show(display, Display::System("unknown command, /help lists them".to_string())).await
                    }
                    _ => {}
                }

                if let Some(line) = input.to_wire() {
                    sink.send(line).await?;
                }

                if input == Input::Quit {
                    sink.close().await?;
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::FakeChannelReceiver;
    use futures_util::stream;
    use tokio::{
        io::{duplex, split, AsyncReadExt},
        sync::mpsc,
    };

    #[tokio::test]
    async fn run_printer_promptsaftereveryline() {
        let mut receiver = FakeChannelReceiver::new(vec![
            Display::Line(":bob JOIN #test".to_string()),
            Display::System("disconnected from server".to_string()),
        ]);
        let mut out = Vec::new();

        run_printer(&mut receiver, &mut out).await.unwrap();

        assert_eq!(
            "> \r:bob JOIN #test\n> \r[system] disconnected from server\n> \n",
            String::from_utf8(out).unwrap()
        );
    }

    #[tokio::test]
    async fn run_session_sendscommandsandquits() {
        let (client_side, mut server_side) = duplex(4096);
        let (read_half, write_half) = split(client_side);
        let (display, mut shown) = mpsc::channel(16);
        let mut typed = stream::iter(
            vec!["/nick alice", "/join test", "/msg #test hi there", "/bogus", "/quit"]
                .into_iter()
                .map(|l| Ok(l.to_string())),
        );

        run_session(read_half, write_half, &mut typed, &display)
            .await
            .unwrap();

        let mut sent = String::new();
        server_side.read_to_string(&mut sent).await.unwrap();
        assert_eq!(
            "NICK alice\r\nJOIN #test\r\nPRIVMSG #test :hi there\r\nQUIT :Goodbye!\r\n",
            sent
        );
        assert_eq!(
            Some(Display::System("unknown command, /help lists them".to_string())),
            shown.recv().await
        );
    }

    #[tokio::test]
    async fn run_session_serverclosed_reportsdisconnect() {
        let (client_side, mut server_side) = duplex(4096);
        let (read_half, write_half) = split(client_side);
        let (display, mut shown) = mpsc::channel(16);
        let mut typed = stream::pending::<io::Result<String>>();

        server_side
            .write_all(b":alice PRIVMSG #test :hel")
            .await
            .unwrap();
        server_side.write_all(b"lo\r\n").await.unwrap();
        drop(server_side);

        run_session(read_half, write_half, &mut typed, &display)
            .await
            .unwrap();

        assert_eq!(
            Some(Display::Line(":alice PRIVMSG #test :hello".to_string())),
            shown.recv().await
        );
        assert_eq!(
            Some(Display::System("disconnected from server".to_string())),
            shown.recv().await
        );
    }
}
