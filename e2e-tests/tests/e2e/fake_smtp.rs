use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};

/// How the fake relay answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Accept every message
    Accept,
    /// Refuse every recipient with a permanent error
    RejectRecipient,
    /// Accept the connection but never send a greeting
    Silent,
}

/// One message as seen by the relay
#[derive(Debug, Clone, Default)]
pub struct CapturedMail {
    pub auth: Option<String>,
    pub mail_from: String,
    pub rcpt_to: Vec<String>,
    /// Message lines without CRLF, dot-unstuffed
    pub lines: Vec<String>,
}

impl CapturedMail {
    pub fn has_header(&self, name: &str) -> bool {
        let prefix = format!("{}:", name.to_ascii_lowercase());
        self.lines
            .iter()
            .take_while(|line| !line.is_empty())
            .any(|line| line.to_ascii_lowercase().starts_with(&prefix))
    }

    pub fn header(&self, name: &str) -> Option<String> {
        let prefix = format!("{}:", name.to_ascii_lowercase());
        self.lines
            .iter()
            .take_while(|line| !line.is_empty())
            .find(|line| line.to_ascii_lowercase().starts_with(&prefix))
            .map(|line| line[prefix.len()..].trim().to_string())
    }

    /// Lines after the header block
    pub fn body_lines(&self) -> Vec<&str> {
        self.lines
            .iter()
            .skip_while(|line| !line.is_empty())
            .skip(1)
            .map(String::as_str)
            .collect()
    }
}

/// Minimal SMTP server speaking just enough ESMTP for an authenticated relay
pub struct FakeSmtpServer {
    addr: SocketAddr,
    mails: Arc<Mutex<Vec<CapturedMail>>>,
    connections: Arc<AtomicUsize>,
}

impl FakeSmtpServer {
    /// Bind an ephemeral port and start accepting connections
    pub async fn start(behavior: Behavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake SMTP server");
        let addr = listener.local_addr().unwrap();

        let mails: Arc<Mutex<Vec<CapturedMail>>> = Arc::default();
        let connections = Arc::new(AtomicUsize::new(0));

        let accept_mails = mails.clone();
        let accept_connections = connections.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                accept_connections.fetch_add(1, Ordering::SeqCst);
                let mails = accept_mails.clone();
                tokio::spawn(async move {
                    let _ = session(stream, behavior, mails).await;
                });
            }
        });

        Self {
            addr,
            mails,
            connections,
        }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn mails(&self) -> Vec<CapturedMail> {
        self.mails.lock().unwrap().clone()
    }

    /// Number of TCP connections accepted so far
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

async fn session(
    stream: TcpStream,
    behavior: Behavior,
    mails: Arc<Mutex<Vec<CapturedMail>>>,
) -> std::io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);

    if behavior == Behavior::Silent {
        let mut sink = Vec::new();
        reader.read_to_end(&mut sink).await?;
        return Ok(());
    }

    reply(&mut writer, "220 fake.smtp ESMTP ready").await?;

    let mut current = CapturedMail::default();
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(());
        }

        let command = line.trim_end().to_string();
        let upper = command.to_ascii_uppercase();

        if upper.starts_with("EHLO") {
            reply(&mut writer, "250-fake.smtp\r\n250 AUTH PLAIN LOGIN").await?;
        } else if upper.starts_with("HELO") {
            reply(&mut writer, "250 fake.smtp").await?;
        } else if upper.starts_with("AUTH") {
            current.auth = Some(command.clone());
            reply(&mut writer, "235 2.7.0 Authentication successful").await?;
        } else if upper.starts_with("MAIL FROM:") {
            current.mail_from = angle_path(&command);
            reply(&mut writer, "250 2.1.0 OK").await?;
        } else if upper.starts_with("RCPT TO:") {
            if behavior == Behavior::RejectRecipient {
                reply(&mut writer, "550 5.1.1 Mailbox unavailable").await?;
            } else {
                current.rcpt_to.push(angle_path(&command));
                reply(&mut writer, "250 2.1.5 OK").await?;
            }
        } else if upper == "DATA" {
            reply(&mut writer, "354 End data with <CR><LF>.<CR><LF>").await?;
            current.lines = read_data(&mut reader).await?;

            let auth = current.auth.clone();
            mails.lock().unwrap().push(std::mem::take(&mut current));
            current.auth = auth;

            reply(&mut writer, "250 2.0.0 Queued").await?;
        } else if upper == "QUIT" {
            reply(&mut writer, "221 2.0.0 Bye").await?;
            return Ok(());
        } else {
            // RSET, NOOP and anything else
            reply(&mut writer, "250 2.0.0 OK").await?;
        }
    }
}

async fn read_data<R>(reader: &mut BufReader<R>) -> std::io::Result<Vec<String>>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut lines = Vec::new();
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(lines);
        }

        let content = line.trim_end_matches(['\r', '\n']);
        if content == "." {
            return Ok(lines);
        }

        let unstuffed = content.strip_prefix('.').unwrap_or(content);
        lines.push(unstuffed.to_string());
    }
}

async fn reply(writer: &mut OwnedWriteHalf, response: &str) -> std::io::Result<()> {
    writer.write_all(format!("{}\r\n", response).as_bytes()).await?;
    writer.flush().await
}

fn angle_path(command: &str) -> String {
    match (command.find('<'), command.find('>')) {
        (Some(start), Some(end)) if start < end => command[start + 1..end].to_string(),
        _ => String::new(),
    }
}
