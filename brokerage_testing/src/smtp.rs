use std::{
    net::{IpAddr, SocketAddr},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use anyhow::Context;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
};
use tracing::{debug, info};

/// How the fake smtp server reacts to a delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SmtpBehavior {
    /// Accept every message.
    #[default]
    Accept,
    /// Refuse any credentials.
    RejectAuth,
    /// Refuse every recipient.
    RejectRecipient,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceivedMail {
    pub from: String,
    pub recipients: Vec<String>,
    pub data: String,
}

#[derive(Debug, Default)]
struct State {
    connections: AtomicUsize,
    auth_attempts: AtomicUsize,
    queued: AtomicUsize,
    mails: Mutex<Vec<ReceivedMail>>,
}

/// Handle to a fake smtp server running in the background.
#[derive(Debug, Clone)]
pub struct FakeSmtpServer {
    addr: SocketAddr,
    state: Arc<State>,
}

impl FakeSmtpServer {
    /// Start a fake smtp server on an ephemeral port of the loopback
    /// interface.
    pub async fn spawn(behavior: SmtpBehavior) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0))
            .await
            .context("Failed to bind fake smtp server")?;
        let addr = listener.local_addr()?;
        let state = Arc::<State>::default();

        tokio::spawn(accept_loop(listener, behavior, Arc::clone(&state)));

        Ok(Self { addr, state })
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn connections(&self) -> usize {
        self.state.connections.load(Ordering::SeqCst)
    }

    pub fn auth_attempts(&self) -> usize {
        self.state.auth_attempts.load(Ordering::SeqCst)
    }

    pub fn mails(&self) -> Vec<ReceivedMail> {
        self.state
            .mails
            .lock()
            .map(|mails| mails.clone())
            .unwrap_or_default()
    }
}

pub async fn start_server(host: IpAddr, port: u16, behavior: SmtpBehavior) -> anyhow::Result<()> {
    info!("Starting fake smtp server on {host}:{port} ({behavior:?})");

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;

    accept_loop(listener, behavior, Default::default()).await;
    Ok(())
}

async fn accept_loop(listener: TcpListener, behavior: SmtpBehavior, state: Arc<State>) {
    while let Ok((stream, peer)) = listener.accept().await {
        state.connections.fetch_add(1, Ordering::SeqCst);
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(err) = handle(stream, behavior, &state).await {
                debug!(%peer, "smtp session ended with error: {err}");
            }
        });
    }
}

async fn handle(stream: TcpStream, behavior: SmtpBehavior, state: &State) -> anyhow::Result<()> {
    let (read, mut write) = stream.into_split();
    let mut lines = BufReader::new(read).lines();
    let mut mail = ReceivedMail::default();

    write.write_all(b"220 localhost ESMTP fake\r\n").await?;

    while let Some(line) = lines.next_line().await? {
        let command = line
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();

        let reply = match command.as_str() {
            "EHLO" => "250-localhost\r\n250-AUTH PLAIN\r\n250 8BITMIME\r\n".to_owned(),
            "HELO" => "250 localhost\r\n".to_owned(),
            "AUTH" => {
                state.auth_attempts.fetch_add(1, Ordering::SeqCst);
                match behavior {
                    SmtpBehavior::RejectAuth => {
                        "535 5.7.8 Authentication credentials invalid\r\n".to_owned()
                    }
                    _ => "235 2.7.0 Authentication successful\r\n".to_owned(),
                }
            }
            "MAIL" => {
                mail = ReceivedMail {
                    from: address_argument(&line),
                    ..Default::default()
                };
                "250 2.1.0 Ok\r\n".to_owned()
            }
            "RCPT" => match behavior {
                SmtpBehavior::RejectRecipient => {
                    "550 5.1.1 Recipient address rejected\r\n".to_owned()
                }
                _ => {
                    mail.recipients.push(address_argument(&line));
                    "250 2.1.5 Ok\r\n".to_owned()
                }
            },
            "DATA" => {
                write
                    .write_all(b"354 End data with <CR><LF>.<CR><LF>\r\n")
                    .await?;
                while let Some(line) = lines.next_line().await? {
                    if line == "." {
                        break;
                    }
                    let line = line.strip_prefix('.').unwrap_or(&line);
                    mail.data.push_str(line);
                    mail.data.push('\n');
                }
                let id = state.queued.fetch_add(1, Ordering::SeqCst) + 1;
                if let Ok(mut mails) = state.mails.lock() {
                    mails.push(std::mem::take(&mut mail));
                }
                format!("250 2.0.0 Ok: queued as FAKE{id:04}\r\n")
            }
            "RSET" | "NOOP" => "250 2.0.0 Ok\r\n".to_owned(),
            "QUIT" => {
                write.write_all(b"221 2.0.0 Bye\r\n").await?;
                break;
            }
            _ => "502 5.5.2 Command not recognized\r\n".to_owned(),
        };

        write.write_all(reply.as_bytes()).await?;
    }

    Ok(())
}

/// `MAIL FROM:<a@b>` -> `a@b`
fn address_argument(line: &str) -> String {
    line.split_once('<')
        .and_then(|(_, rest)| rest.split_once('>'))
        .map(|(address, _)| address.to_owned())
        .unwrap_or_default()
}
