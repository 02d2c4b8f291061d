//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Async transport session

use crate::{ClientConfig, Key, Result, SessionError, SessionObserver, TelnetSession, TextChunk};
use bbslink_telnetcodec::{OptionState, TelnetOption};
use bytes::{Buf, BytesMut};
use std::io;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{error, info};

/// A telnet session bound to a byte stream.
///
/// Wraps a [`TelnetSession`] and a transport. Each call does its I/O and returns; there are no
/// background tasks, so negotiation replies go out when [`read`](Session::read) is called and
/// pending requests only time out when [`tick`](Session::tick) is called.
///
/// Transport failures close the session and surface as [`SessionError::Connection`].
///
/// # Cancel safety
///
/// [`read`](Session::read) may be used as a branch of `tokio::select!`. Bytes are removed from
/// the write queue only once the transport has accepted them, and text decoded by a read that
/// was cancelled while writing replies is returned by the next call to `read`.
///
/// # Example
///
/// ```no_run
/// use bbslink_client::Session;
///
/// # async fn example() -> bbslink_client::Result<()> {
/// let mut session = Session::connect("bbs.example.org", 23).await?;
/// while let Some(chunks) = session.read().await? {
///     for chunk in chunks {
///         print!("{chunk}");
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Session<S> {
    stream: Option<S>,
    engine: TelnetSession,
    read_buffer: Vec<u8>,
    unwritten: BytesMut,
    undelivered: Option<Vec<TextChunk>>,
}

impl Session<TcpStream> {
    /// Connects to the configured server and starts negotiating.
    pub async fn open(config: ClientConfig) -> Result<Self> {
        let addr = config.address();
        info!("Connecting to {}...", addr);

        let stream = match timeout(config.connect_timeout, TcpStream::connect(&addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                error!("Connection to {} failed: {}", addr, e);
                return Err(e.into());
            }
            Err(_) => {
                error!("Connection to {} timed out", addr);
                return Err(SessionError::ConnectTimeout(addr));
            }
        };

        info!("Connected to {}", stream.peer_addr()?);
        Self::with_stream(stream, config).await
    }

    /// Connects to `host:port` with the default configuration.
    pub async fn connect(host: impl Into<String>, port: u16) -> Result<Self> {
        Self::open(ClientConfig::new(host, port)).await
    }
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Starts a session over an already connected stream.
    ///
    /// Sends the opening announcements before returning.
    pub async fn with_stream(stream: S, config: ClientConfig) -> Result<Self> {
        let mut engine = TelnetSession::new(&config);
        engine.start(Instant::now())?;
        let mut session = Session {
            stream: Some(stream),
            engine,
            read_buffer: vec![0; config.buffer_size.max(1)],
            unwritten: BytesMut::new(),
            undelivered: None,
        };
        session.flush().await?;
        Ok(session)
    }

    /// Installs an observer on the underlying engine.
    pub fn set_observer(&mut self, observer: impl SessionObserver + 'static) {
        self.engine.set_observer(observer);
    }

    /// Reads once from the transport.
    ///
    /// Returns the text decoded from that read, which may be empty when the read carried only
    /// negotiation, or `None` when the server closed the connection. Negotiation replies are
    /// written before this returns.
    ///
    /// This method is cancel safe. Bytes still queued from an earlier call are written first,
    /// and text from a read that was cancelled while its replies were being written is
    /// returned before reading again.
    pub async fn read(&mut self) -> Result<Option<Vec<TextChunk>>> {
        if self.stream.is_none() {
            return Err(SessionError::Closed);
        }
        self.flush().await?;
        if self.undelivered.is_none() {
            let stream = self.stream.as_mut().ok_or(SessionError::Closed)?;
            let count = match stream.read(&mut self.read_buffer).await {
                Ok(count) => count,
                Err(e) => {
                    error!("Read failed: {}", e);
                    self.close();
                    return Err(e.into());
                }
            };
            if count == 0 {
                info!("Server closed connection");
                self.close();
                return Ok(None);
            }
            self.undelivered = Some(self.engine.feed(&self.read_buffer[..count])?);
            self.flush().await?;
        }
        Ok(self.undelivered.take())
    }

    /// Sends user input, doubling any `IAC` bytes.
    pub async fn send_input(&mut self, input: &[u8]) -> Result<()> {
        self.engine.send_input(input)?;
        self.flush().await
    }

    /// Sends a line of text terminated by a carriage return.
    pub async fn send_line(&mut self, line: &str) -> Result<()> {
        self.engine.send_input(line.as_bytes())?;
        self.engine.send_key(Key::Enter)?;
        self.flush().await
    }

    /// Sends the byte sequence for a key.
    pub async fn send_key(&mut self, key: Key) -> Result<()> {
        self.engine.send_key(key)?;
        self.flush().await
    }

    /// Reports a new terminal size to the server.
    pub async fn report_window_size(&mut self, rows: u16, cols: u16) -> Result<()> {
        self.engine.report_window_size(rows, cols)?;
        self.flush().await
    }

    /// Expires unanswered negotiation requests against the current time.
    pub fn tick(&mut self) -> Result<()> {
        self.engine.resolve_timeouts(Instant::now())
    }

    /// Negotiation state of `option`.
    pub fn option_state(&self, option: TelnetOption) -> Result<OptionState> {
        self.engine.option_state(option)
    }

    /// Drops the transport and all session state. Does not wait for anything.
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            info!(unwritten = self.unwritten.len(), "Closing session");
        }
        self.unwritten.clear();
        self.undelivered = None;
        self.engine.close();
    }

    /// `true` once the session has been closed.
    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    /// Writes the queued bytes, oldest first.
    ///
    /// A byte leaves `unwritten` only after the stream accepted it, so a cancelled flush
    /// resumes where it stopped.
    async fn flush(&mut self) -> Result<()> {
        let outgoing = self.engine.take_outgoing()?;
        self.unwritten.extend_from_slice(&outgoing);
        if self.unwritten.is_empty() {
            return Ok(());
        }
        let stream = self.stream.as_mut().ok_or(SessionError::Closed)?;
        let mut result = Ok(());
        while !self.unwritten.is_empty() {
            match stream.write(&self.unwritten).await {
                Ok(0) => {
                    result = Err(io::Error::from(io::ErrorKind::WriteZero));
                    break;
                }
                Ok(count) => self.unwritten.advance(count),
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }
        if result.is_ok() {
            result = stream.flush().await;
        }
        if let Err(e) = result {
            error!("Write failed: {}", e);
            self.close();
            return Err(e.into());
        }
        Ok(())
    }
}
