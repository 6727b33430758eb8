//! Blocking IMAP client over rustls — just enough of the protocol for one
//! sorting pass: list, fetch a `From:` header, copy, flag, expunge.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use tracing::debug;

use crate::config::ImapConfig;
use crate::error::MailboxError;
use crate::mailbox::{Mailbox, MessageId};

const READ_TIMEOUT: Duration = Duration::from_secs(30);

type TlsStream = rustls::StreamOwned<rustls::ClientConnection, TcpStream>;

/// A logged-in IMAP session with `INBOX` selected.
pub struct ImapMailbox {
    stream: TlsStream,
    tag_counter: u32,
}

impl ImapMailbox {
    /// Connect over TLS, authenticate, and select `INBOX`.
    pub fn connect(config: &ImapConfig) -> Result<Self, MailboxError> {
        let connection_failed = |reason: String| MailboxError::ConnectionFailed {
            host: config.host.clone(),
            port: config.port,
            reason,
        };

        let tcp = TcpStream::connect((config.host.as_str(), config.port))
            .map_err(|e| connection_failed(e.to_string()))?;
        tcp.set_read_timeout(Some(READ_TIMEOUT))?;

        let mut root_store = rustls::RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let tls_config = Arc::new(
            rustls::ClientConfig::builder()
                .with_root_certificates(root_store)
                .with_no_client_auth(),
        );
        let server_name = rustls::pki_types::ServerName::try_from(config.host.clone())
            .map_err(|e| connection_failed(e.to_string()))?;
        let conn = rustls::ClientConnection::new(tls_config, server_name)
            .map_err(|e| connection_failed(e.to_string()))?;

        let mut mailbox = Self {
            stream: rustls::StreamOwned::new(conn, tcp),
            tag_counter: 0,
        };

        let greeting = mailbox.read_line()?;
        debug!(greeting = %greeting.trim_end(), "IMAP server greeting");

        let login = format!(
            "LOGIN \"{}\" \"{}\"",
            config.user,
            config.password.expose_secret()
        );
        let response = mailbox.send_command(&login)?;
        if !response_ok(&response) {
            return Err(MailboxError::AuthFailed {
                user: config.user.clone(),
            });
        }

        let response = mailbox.send_command("SELECT \"INBOX\"")?;
        if !response_ok(&response) {
            return Err(MailboxError::Protocol {
                command: "SELECT \"INBOX\"".to_string(),
                response: last_line(&response),
            });
        }

        debug!(host = %config.host, user = %config.user, "IMAP session ready");
        Ok(mailbox)
    }

    /// Politely end the session. Errors are ignored; the sort already ran.
    pub fn logout(mut self) {
        let _ = self.send_command("LOGOUT");
    }

    fn next_tag(&mut self) -> String {
        self.tag_counter += 1;
        format!("A{}", self.tag_counter)
    }

    /// Send one tagged command and collect every response line up to and
    /// including the tagged completion line.
    fn send_command(&mut self, command: &str) -> Result<Vec<String>, MailboxError> {
        let tag = self.next_tag();
        let full = format!("{tag} {command}\r\n");
        self.stream.write_all(full.as_bytes())?;
        self.stream.flush()?;

        let done_prefix = format!("{tag} ");
        let mut lines = Vec::new();
        loop {
            let line = self.read_line()?;
            let done = line.starts_with(&done_prefix);
            lines.push(line);
            if done {
                return Ok(lines);
            }
        }
    }

    /// Read one CRLF-terminated line, terminator included.
    fn read_line(&mut self) -> Result<String, MailboxError> {
        let mut buf = Vec::new();
        loop {
            let mut byte = [0u8; 1];
            match self.stream.read(&mut byte) {
                Ok(0) => return Err(MailboxError::Disconnected),
                Ok(_) => {
                    buf.push(byte[0]);
                    if buf.ends_with(b"\r\n") {
                        return Ok(String::from_utf8_lossy(&buf).to_string());
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl Mailbox for ImapMailbox {
    fn list_message_ids(&mut self) -> Result<Vec<MessageId>, MailboxError> {
        let response = self.send_command("SEARCH ALL")?;
        if !response_ok(&response) {
            return Err(MailboxError::Protocol {
                command: "SEARCH ALL".to_string(),
                response: last_line(&response),
            });
        }
        Ok(parse_search_ids(&response))
    }

    fn fetch_sender_header(&mut self, id: &str) -> Result<Vec<u8>, MailboxError> {
        let command = format!("FETCH {id} BODY.PEEK[HEADER.FIELDS (FROM)]");
        let response = self.send_command(&command)?;
        if !response_ok(&response) {
            return Err(MailboxError::Protocol {
                command,
                response: last_line(&response),
            });
        }
        Ok(extract_fetch_payload(&response))
    }

    fn move_message(&mut self, id: &str, destination_folder: &str) -> Result<(), MailboxError> {
        let command = format!("COPY {id} \"{destination_folder}\"");
        let response = self.send_command(&command)?;
        if !response_ok(&response) {
            return Err(MailboxError::Protocol {
                command,
                response: last_line(&response),
            });
        }
        Ok(())
    }

    fn mark_for_deletion(&mut self, id: &str) -> Result<(), MailboxError> {
        let command = format!("STORE {id} +FLAGS (\\Deleted)");
        let response = self.send_command(&command)?;
        if !response_ok(&response) {
            return Err(MailboxError::Protocol {
                command,
                response: last_line(&response),
            });
        }
        Ok(())
    }

    fn purge_marked(&mut self) -> Result<(), MailboxError> {
        let response = self.send_command("EXPUNGE")?;
        if !response_ok(&response) {
            return Err(MailboxError::Protocol {
                command: "EXPUNGE".to_string(),
                response: last_line(&response),
            });
        }
        Ok(())
    }
}

/// Whether the tagged completion line reports OK.
fn response_ok(lines: &[String]) -> bool {
    lines
        .last()
        .is_some_and(|line| line.split_whitespace().nth(1) == Some("OK"))
}

/// Trimmed tagged completion line, for error reporting.
fn last_line(lines: &[String]) -> String {
    lines
        .last()
        .map(|line| line.trim_end().to_string())
        .unwrap_or_default()
}

/// Collect message ids from `* SEARCH` data lines.
fn parse_search_ids(lines: &[String]) -> Vec<String> {
    let mut ids = Vec::new();
    for line in lines {
        if let Some(rest) = line.strip_prefix("* SEARCH") {
            ids.extend(rest.split_whitespace().map(str::to_string));
        }
    }
    ids
}

/// Payload bytes of a single-message FETCH response: everything between the
/// opening `* n FETCH` line and the tagged completion line, minus the
/// closing paren line.
fn extract_fetch_payload(lines: &[String]) -> Vec<u8> {
    let mut payload = String::new();
    for line in lines.iter().skip(1).take(lines.len().saturating_sub(2)) {
        if line.trim_end() == ")" {
            continue;
        }
        payload.push_str(line);
    }
    payload.into_bytes()
}
