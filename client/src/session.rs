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

//! Sans-IO telnet session engine

use crate::{ClientConfig, Key, Result, SessionError, SessionObserver, TextChunk};
use bbslink_telnetcodec::naws::WindowSize;
use bbslink_telnetcodec::{
    CodecError, CodecResult, DecodedUnit, NegotiationEvent, NegotiationOutcome, Negotiator,
    OptionState, TelnetCodec, TelnetOption, encode_text,
};
use bytes::{Bytes, BytesMut};
use std::time::Instant;
use tokio_util::codec::Decoder;
use tracing::{debug, info, trace, warn};

/// Telnet session engine
///
/// Owns the codec, the negotiation state and the byte queues of one connection, and performs
/// no I/O: the caller feeds bytes read from the transport and writes out whatever
/// [`take_outgoing`](TelnetSession::take_outgoing) returns. Negotiation replies are queued
/// within the call that received the request.
///
/// After [`close`](TelnetSession::close) all state is gone and every other operation fails
/// with [`SessionError::Closed`].
///
/// # Example
///
/// ```
/// use bbslink_client::{ClientConfig, TelnetSession};
/// use std::time::Instant;
///
/// let mut session = TelnetSession::new(&ClientConfig::default());
/// session.start(Instant::now()).unwrap();
/// assert_eq!(&session.take_outgoing().unwrap()[..], b"\xFF\xFB\x1F\xFF\xFB\x18\xFF\xFD\x03");
///
/// let text = session.feed(b"Hello\xFF\xFD\x1F").unwrap();
/// assert_eq!(text[0].as_bytes(), b"Hello");
/// // WILL NAWS was pending, so the DO completes it and the window size follows.
/// assert_eq!(&session.take_outgoing().unwrap()[..], b"\xFF\xFA\x1F\x00\x50\x00\x18\xFF\xF0");
/// ```
pub struct TelnetSession {
    state: Option<SessionState>,
    observer: Option<Box<dyn SessionObserver>>,
}

struct SessionState {
    codec: TelnetCodec,
    negotiator: Negotiator,
    carry: BytesMut,
    outgoing: BytesMut,
    initial_window_size: WindowSize,
}

impl TelnetSession {
    /// Creates a session with every option unnegotiated.
    pub fn new(config: &ClientConfig) -> Self {
        TelnetSession {
            state: Some(SessionState {
                codec: TelnetCodec::with_max_subnegotiation_len(config.max_subnegotiation_len),
                negotiator: Negotiator::new(config.negotiation_config()),
                carry: BytesMut::new(),
                outgoing: BytesMut::new(),
                initial_window_size: config.window_size(),
            }),
            observer: None,
        }
    }

    /// Installs an observer, replacing any previous one.
    pub fn set_observer(&mut self, observer: impl SessionObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Queues the opening announcements and the configured window size.
    ///
    /// The window size goes out as soon as the server enables NAWS.
    pub fn start(&mut self, now: Instant) -> Result<()> {
        let TelnetSession { state, observer } = self;
        let state = state.as_mut().ok_or(SessionError::Closed)?;
        let outcome = state.negotiator.start(now);
        state.apply(outcome, observer);
        let outcome = state.negotiator.set_window_size(state.initial_window_size);
        state.apply_result(outcome, observer);
        Ok(())
    }

    /// Processes bytes received from the transport and returns the display text they carried.
    ///
    /// Control sequences are consumed here; a sequence cut off at the end of `raw` is kept and
    /// completed by the next call.
    pub fn feed(&mut self, raw: &[u8]) -> Result<Vec<TextChunk>> {
        let TelnetSession { state, observer } = self;
        let state = state.as_mut().ok_or(SessionError::Closed)?;
        state.carry.extend_from_slice(raw);
        let mut chunks = Vec::new();
        loop {
            let unit = state.codec.decode(&mut state.carry);
            for error in state.codec.take_diagnostics() {
                report_diagnostic(observer, &error);
            }
            match unit {
                Ok(Some(DecodedUnit::Text(text))) => {
                    let chunk = TextChunk::from(text);
                    if let Some(observer) = observer.as_mut() {
                        observer.on_text(&chunk);
                    }
                    chunks.push(chunk);
                }
                Ok(Some(DecodedUnit::Negotiation(frame))) => {
                    trace!(%frame, "Received");
                    let outcome = state.negotiator.receive(frame);
                    state.apply_result(outcome, observer);
                }
                Ok(None) => break,
                Err(error) => {
                    report_diagnostic(observer, &error);
                    break;
                }
            }
        }
        Ok(chunks)
    }

    /// Queues user input. The only transformation is doubling `IAC` bytes.
    pub fn send_input(&mut self, input: &[u8]) -> Result<()> {
        let state = self.state.as_mut().ok_or(SessionError::Closed)?;
        state.outgoing.extend_from_slice(&encode_text(input));
        Ok(())
    }

    /// Queues the byte sequence for a key.
    pub fn send_key(&mut self, key: Key) -> Result<()> {
        self.send_input(&key.to_bytes())
    }

    /// Records a new terminal size and sends it if NAWS is enabled.
    pub fn report_window_size(&mut self, rows: u16, cols: u16) -> Result<()> {
        let TelnetSession { state, observer } = self;
        let state = state.as_mut().ok_or(SessionError::Closed)?;
        let outcome = state.negotiator.set_window_size(WindowSize::new(cols, rows));
        state.apply_result(outcome, observer);
        Ok(())
    }

    /// Treats every request older than the negotiation timeout as refused.
    pub fn resolve_timeouts(&mut self, now: Instant) -> Result<()> {
        let TelnetSession { state, observer } = self;
        let state = state.as_mut().ok_or(SessionError::Closed)?;
        let outcome = state.negotiator.resolve_timeouts(now);
        state.apply(outcome, observer);
        Ok(())
    }

    /// Drains the bytes waiting to be written to the transport.
    pub fn take_outgoing(&mut self) -> Result<Bytes> {
        let state = self.state.as_mut().ok_or(SessionError::Closed)?;
        Ok(state.outgoing.split().freeze())
    }

    /// `true` if bytes are waiting to be written.
    pub fn has_outgoing(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|state| !state.outgoing.is_empty())
    }

    /// Negotiation state of `option`.
    pub fn option_state(&self, option: TelnetOption) -> Result<OptionState> {
        let state = self.state.as_ref().ok_or(SessionError::Closed)?;
        Ok(state.negotiator.option_state(option))
    }

    /// The most recently reported window size.
    pub fn window_size(&self) -> Result<Option<WindowSize>> {
        let state = self.state.as_ref().ok_or(SessionError::Closed)?;
        Ok(state.negotiator.window_size())
    }

    /// Discards all session state. Calling it again does nothing.
    pub fn close(&mut self) {
        if let Some(state) = self.state.take() {
            info!(
                discarded_carry = state.carry.len(),
                discarded_outgoing = state.outgoing.len(),
                "Session closed"
            );
        }
    }

    /// `true` once [`close`](TelnetSession::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.state.is_none()
    }
}

impl std::fmt::Debug for TelnetSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelnetSession")
            .field("closed", &self.is_closed())
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl SessionState {
    /// Queues the replies of a negotiation step and reports its events.
    fn apply(
        &mut self,
        outcome: NegotiationOutcome,
        observer: &mut Option<Box<dyn SessionObserver>>,
    ) {
        for frame in outcome.replies {
            debug!(%frame, "Sending");
            frame.encode(&mut self.outgoing);
        }
        let Some(observer) = observer.as_mut() else {
            return;
        };
        for event in outcome.events {
            match event {
                NegotiationEvent::OptionStatus(option, side, status) => {
                    observer.on_option_changed(option, side, status);
                }
                NegotiationEvent::Command(command) => observer.on_command(command),
                NegotiationEvent::Subnegotiate(argument) => observer.on_subnegotiation(&argument),
            }
        }
    }

    /// Like [`apply`](SessionState::apply), but a failed step is logged and reported instead.
    fn apply_result(
        &mut self,
        outcome: CodecResult<NegotiationOutcome>,
        observer: &mut Option<Box<dyn SessionObserver>>,
    ) {
        match outcome {
            Ok(outcome) => self.apply(outcome, observer),
            Err(error) => {
                warn!(%error, "Skipping negotiation step");
                report_diagnostic(observer, &error);
            }
        }
    }
}

fn report_diagnostic(observer: &mut Option<Box<dyn SessionObserver>>, error: &CodecError) {
    if let Some(observer) = observer.as_mut() {
        observer.on_diagnostic(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbslink_telnetcodec::{NegotiationStatus, TelnetSide};

    fn session() -> TelnetSession {
        TelnetSession::new(&ClientConfig::default())
    }

    #[test]
    fn test_new_session_is_unnegotiated() {
        let session = session();
        let state = session.option_state(TelnetOption::NAWS).unwrap();
        assert_eq!(state.status(TelnetSide::Local), NegotiationStatus::Unknown);
        assert!(!session.has_outgoing());
    }

    #[test]
    fn test_feed_returns_text_only() {
        let mut session = session();
        let chunks = session.feed(b"one\xFF\xF1two").unwrap();
        assert_eq!(
            chunks,
            vec![TextChunk::new(&b"one"[..]), TextChunk::new(&b"two"[..])]
        );
    }

    #[test]
    fn test_send_input_escapes_iac() {
        let mut session = session();
        session.send_input(b"\xFFq\r").unwrap();
        assert_eq!(&session.take_outgoing().unwrap()[..], b"\xFF\xFFq\r");
        assert!(session.take_outgoing().unwrap().is_empty());
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut session = session();
        session.close();
        session.close();
        assert!(session.is_closed());
        assert!(session.feed(b"x").unwrap_err().is_closed());
        assert!(session.take_outgoing().unwrap_err().is_closed());
    }
}
