use std::{env, process};

use relay_irc::{
    client::session::{self, Display},
    codec::LineCodec,
    error::Error,
    settings::DEFAULT_PORT,
    telemetry,
};
use tokio::sync::mpsc;
use tokio_util::codec::FramedRead;

fn parse_args(args: &[String]) -> Result<(String, u16), Error> {
    let program = args.first().map(String::as_str).unwrap_or("relay-client");
    let usage = || Error::InvalidArguments(format!("usage: {} <server-address> [port]", program));

    let host = args.get(1).ok_or_else(usage)?.clone();
    let port = match args.get(2) {
        Some(p) => p.parse().map_err(|_| usage())?,
        None => DEFAULT_PORT,
    };

    Ok((host, port))
}

#[tokio::main]
async fn main() {
    telemetry::init("warn");

    let args: Vec<String> = env::args().collect();
    let (host, port) = match parse_args(&args) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&host, port).await {
        eprintln!("[system] {}", e);
        process::exit(1);
    }
}

async fn run(host: &str, port: u16) -> anyhow::Result<()> {
    println!("[system] connecting to {}:{}...", host, port);
    let stream = session::connect(host, port).await?;
    println!("[system] connected, /help lists the commands");

    let (display, mut display_receiver) = mpsc::channel::<Display>(256);
    let printer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        session::run_printer(&mut display_receiver, &mut stdout).await
    });

    let (read_half, write_half) = stream.into_split();
    let mut typed = FramedRead::new(tokio::io::stdin(), LineCodec::new());
    let outcome = session::run_session(read_half, write_half, &mut typed, &display).await;

    drop(display);
    printer.await??;
    outcome?;

    // stdin reads block a runtime thread, do not wait on them at shutdown
    process::exit(0);
}
