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

//! Session engine tests
//!
//! Drive a [`TelnetSession`] with scripted server bytes and check the text it returns and the
//! bytes it queues for the server.

use bbslink_client::{
    ClientConfig, CodecError, Key, NegotiationStatus, SessionObserver, TelnetCommand,
    TelnetOption, TelnetSession, TelnetSide, TextChunk,
};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

// ============================================================================
// Helper Functions
// ============================================================================

fn started_session(config: &ClientConfig) -> TelnetSession {
    let mut session = TelnetSession::new(config);
    session.start(Instant::now()).unwrap();
    session.take_outgoing().unwrap();
    session
}

fn text_of(chunks: &[TextChunk]) -> Vec<u8> {
    chunks.iter().flat_map(|chunk| chunk.as_bytes().to_vec()).collect()
}

#[derive(Debug, Clone, PartialEq)]
enum Observed {
    Text(Vec<u8>),
    Option(TelnetOption, TelnetSide, NegotiationStatus),
    Command(TelnetCommand),
    Diagnostic(CodecError),
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<Observed>>>);

impl Recorder {
    fn take(&self) -> Vec<Observed> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl SessionObserver for Recorder {
    fn on_text(&mut self, text: &TextChunk) {
        self.0.lock().unwrap().push(Observed::Text(text.as_bytes().to_vec()));
    }

    fn on_option_changed(&mut self, option: TelnetOption, side: TelnetSide, status: NegotiationStatus) {
        self.0.lock().unwrap().push(Observed::Option(option, side, status));
    }

    fn on_command(&mut self, command: TelnetCommand) {
        self.0.lock().unwrap().push(Observed::Command(command));
    }

    fn on_diagnostic(&mut self, error: &CodecError) {
        self.0.lock().unwrap().push(Observed::Diagnostic(error.clone()));
    }
}

// ============================================================================
// Start-up Tests
// ============================================================================

#[test]
fn start_announces_and_holds_window_size() {
    let mut session = TelnetSession::new(&ClientConfig::default());
    assert!(!session.has_outgoing());
    session.start(Instant::now()).unwrap();
    assert_eq!(
        &session.take_outgoing().unwrap()[..],
        b"\xFF\xFB\x1F\xFF\xFB\x18\xFF\xFD\x03"
    );
    let naws = session.option_state(TelnetOption::NAWS).unwrap();
    assert!(naws.pending_local());
    assert_eq!(
        session.window_size().unwrap(),
        Some(bbslink_client::naws::WindowSize::new(80, 24))
    );
}

// ============================================================================
// Text and Negotiation Tests
// ============================================================================

#[test]
fn feed_returns_text_in_order_and_answers_negotiation() {
    let mut session = started_session(&ClientConfig::default());
    let chunks = session
        .feed(b"\x1B[2J\xFF\xFB\x01Welcome\r\n\xFF\xFB\x03Login: ")
        .unwrap();
    assert_eq!(
        chunks,
        vec![
            TextChunk::new(&b"\x1B[2J"[..]),
            TextChunk::new(&b"Welcome\r\n"[..]),
            TextChunk::new(&b"Login: "[..]),
        ]
    );
    // DO ECHO for the unsolicited WILL ECHO; WILL SGA answers our DO SGA.
    assert_eq!(&session.take_outgoing().unwrap()[..], b"\xFF\xFD\x01");
    assert!(session.option_state(TelnetOption::Echo).unwrap().remote_enabled());
    assert!(session.option_state(TelnetOption::SuppressGoAhead).unwrap().remote_enabled());
}

#[test]
fn unsupported_do_is_answered_with_wont_only() {
    let mut session = TelnetSession::new(&ClientConfig::default());
    let chunks = session.feed(&[0xFF, 0xFD, 0x05]).unwrap();
    assert!(chunks.is_empty());
    assert_eq!(&session.take_outgoing().unwrap()[..], &[0xFF, 0xFC, 0x05]);
}

#[test]
fn will_echo_outside_policy_is_answered_with_wont() {
    let config = ClientConfig::default().without_remote_option(TelnetOption::Echo);
    let mut session = TelnetSession::new(&config);
    let chunks = session.feed(&[0xFF, 0xFB, 0x01]).unwrap();
    assert!(chunks.is_empty());
    assert_eq!(&session.take_outgoing().unwrap()[..], &[0xFF, 0xFC, 0x01]);
    let echo = session.option_state(TelnetOption::Echo).unwrap();
    assert_eq!(echo.status(TelnetSide::Remote), NegotiationStatus::Refused);
}

#[test]
fn unsolicited_will_echo_is_accepted_once() {
    let mut session = TelnetSession::new(&ClientConfig::default());
    session.feed(&[0xFF, 0xFB, 0x01]).unwrap();
    session.feed(&[0xFF, 0xFB, 0x01, 0xFF, 0xFB, 0x01]).unwrap();
    assert_eq!(&session.take_outgoing().unwrap()[..], &[0xFF, 0xFD, 0x01]);
}

#[test]
fn window_size_follows_naws_acceptance() {
    let mut session = started_session(&ClientConfig::default());
    session.report_window_size(24, 80).unwrap();
    assert!(!session.has_outgoing());

    session.feed(&[0xFF, 0xFD, 0x1F]).unwrap();
    assert_eq!(
        &session.take_outgoing().unwrap()[..],
        &[0xFF, 0xFA, 0x1F, 0x00, 0x50, 0x00, 0x18, 0xFF, 0xF0]
    );

    session.report_window_size(50, 132).unwrap();
    assert_eq!(
        &session.take_outgoing().unwrap()[..],
        &[0xFF, 0xFA, 0x1F, 0x00, 0x84, 0x00, 0x32, 0xFF, 0xF0]
    );
}

#[test]
fn terminal_type_request_is_answered() {
    let config = ClientConfig::default().with_terminal_types(["ANSI", "VT100"]);
    let mut session = started_session(&config);
    session
        .feed(b"\xFF\xFD\x18\xFF\xFA\x18\x01\xFF\xF0\xFF\xFA\x18\x01\xFF\xF0")
        .unwrap();
    assert_eq!(
        &session.take_outgoing().unwrap()[..],
        b"\xFF\xFA\x18\x00ANSI\xFF\xF0\xFF\xFA\x18\x00VT100\xFF\xF0"
    );
}

#[test]
fn text_split_across_feeds_is_not_lost() {
    let mut session = TelnetSession::new(&ClientConfig::default());
    let stream: &[u8] = b"ab\xFF\xFFcd\xFF\xFB\x01ef\xFF\xFA\x18\x01\xFF\xF0gh";
    let mut collected = Vec::new();
    for byte in stream {
        collected.extend(text_of(&session.feed(std::slice::from_ref(byte)).unwrap()));
    }
    assert_eq!(collected, b"ab\xFFcdefgh");
}

#[test]
fn user_input_is_escaped_without_newline_translation() {
    let mut session = TelnetSession::new(&ClientConfig::default());
    session.send_input(b"hi\xFF\n").unwrap();
    session.send_key(Key::Enter).unwrap();
    session.send_key(Key::Up).unwrap();
    assert_eq!(&session.take_outgoing().unwrap()[..], b"hi\xFF\xFF\n\r\x1B[A");
}

// ============================================================================
// Timeout Tests
// ============================================================================

#[test]
fn unanswered_requests_time_out() {
    let config = ClientConfig::default().with_negotiation_timeout(Duration::from_secs(5));
    let mut session = TelnetSession::new(&config);
    let start = Instant::now();
    session.start(start).unwrap();

    session.resolve_timeouts(start + Duration::from_secs(4)).unwrap();
    assert!(session.option_state(TelnetOption::TTYPE).unwrap().pending_local());

    session.resolve_timeouts(start + Duration::from_secs(5)).unwrap();
    let ttype = session.option_state(TelnetOption::TTYPE).unwrap();
    assert!(!ttype.pending_local());
    assert_eq!(ttype.status(TelnetSide::Local), NegotiationStatus::Refused);
}

// ============================================================================
// Observer Tests
// ============================================================================

#[test]
fn observer_sees_events_in_arrival_order() {
    let recorder = Recorder::default();
    let mut session = TelnetSession::new(&ClientConfig::default());
    session.set_observer(recorder.clone());

    session
        .feed(b"A\xFF\xF9\xFF\xFB\x01B\xFF\xFA\x18\x01\xFF\xFB\x03")
        .unwrap();
    assert_eq!(
        recorder.take(),
        vec![
            Observed::Text(b"A".to_vec()),
            Observed::Command(TelnetCommand::GoAhead),
            Observed::Option(TelnetOption::Echo, TelnetSide::Remote, NegotiationStatus::Accepted),
            Observed::Text(b"B".to_vec()),
            Observed::Diagnostic(CodecError::subnegotiation(
                TelnetOption::TTYPE,
                bbslink_client::SubnegotiationErrorKind::UnexpectedCommand { command: 0xFB },
            )),
            Observed::Option(
                TelnetOption::SuppressGoAhead,
                TelnetSide::Remote,
                NegotiationStatus::Accepted
            ),
        ]
    );
}

// ============================================================================
// Close Tests
// ============================================================================

#[test]
fn closed_session_rejects_everything() {
    let mut session = started_session(&ClientConfig::default());
    session.send_input(b"pending").unwrap();
    session.close();

    assert!(session.feed(&[0xFF, 0xFD, 0x01]).unwrap_err().is_closed());
    assert!(session.send_input(b"x").unwrap_err().is_closed());
    assert!(session.report_window_size(24, 80).unwrap_err().is_closed());
    assert!(session.resolve_timeouts(Instant::now()).unwrap_err().is_closed());
    assert!(session.take_outgoing().unwrap_err().is_closed());
    assert!(!session.has_outgoing());
    session.close();
}
