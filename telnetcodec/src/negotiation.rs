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

//!
//! Option negotiation for a telnet client.
//!
//! [`Negotiator`] owns one [`OptionState`] per option byte and answers the peer's
//! `DO`/`DONT`/`WILL`/`WONT` according to a [`NegotiationConfig`]. It never touches I/O:
//! every call returns the frames to send and the events to report in a [`NegotiationOutcome`].
//!

use crate::args::TelnetArgument;
use crate::args::naws::WindowSize;
use crate::args::ttype::TerminalType;
use crate::event::NegotiationEvent;
use crate::frame::TelnetFrame;
use crate::options::{TelnetOption, TelnetSide};
use crate::result::CodecResult;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default time to wait for the peer to answer one of our requests.
pub const DEFAULT_NEGOTIATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Name sent in `TTYPE IS` when no terminal type is configured.
const UNKNOWN_TERMINAL: &str = "UNKNOWN";

/// Negotiation status of one side of an option.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum NegotiationStatus {
    /// Never negotiated
    #[default]
    Unknown,
    /// We asked and are waiting for the answer
    Requested,
    /// Enabled
    Accepted,
    /// Disabled, refused or timed out
    Refused,
}

impl std::fmt::Display for NegotiationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NegotiationStatus::Unknown => write!(f, "Unknown"),
            NegotiationStatus::Requested => write!(f, "Requested"),
            NegotiationStatus::Accepted => write!(f, "Accepted"),
            NegotiationStatus::Refused => write!(f, "Refused"),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
struct SideState {
    status: NegotiationStatus,
    requested_at: Option<Instant>,
}

impl SideState {
    /// Moves to `status`, clearing any pending request. Returns `true` if the status changed.
    fn settle(&mut self, status: NegotiationStatus) -> bool {
        self.requested_at = None;
        std::mem::replace(&mut self.status, status) != status
    }
}

/// Negotiation state of a single option.
///
/// The local side is what *we* perform (`WILL`/`WONT` from us, `DO`/`DONT` from the peer); the
/// remote side is what the *peer* performs.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct OptionState {
    local: SideState,
    remote: SideState,
}

impl OptionState {
    /// Status of the given side.
    pub fn status(&self, side: TelnetSide) -> NegotiationStatus {
        self.side(side).status
    }

    /// When the pending request on `side` was sent, if one is pending.
    pub fn requested_at(&self, side: TelnetSide) -> Option<Instant> {
        self.side(side).requested_at
    }

    /// `true` if we perform this option.
    pub fn local_enabled(&self) -> bool {
        self.local.status == NegotiationStatus::Accepted
    }

    /// `true` if the peer performs this option.
    pub fn remote_enabled(&self) -> bool {
        self.remote.status == NegotiationStatus::Accepted
    }

    /// `true` while our `WILL` is unanswered.
    pub fn pending_local(&self) -> bool {
        self.local.status == NegotiationStatus::Requested
    }

    /// `true` while our `DO` is unanswered.
    pub fn pending_remote(&self) -> bool {
        self.remote.status == NegotiationStatus::Requested
    }

    fn side(&self, side: TelnetSide) -> &SideState {
        match side {
            TelnetSide::Local => &self.local,
            TelnetSide::Remote => &self.remote,
        }
    }

    fn side_mut(&mut self, side: TelnetSide) -> &mut SideState {
        match side {
            TelnetSide::Local => &mut self.local,
            TelnetSide::Remote => &mut self.remote,
        }
    }
}

/// Which options are acceptable, what to ask for up front, and how long to wait for answers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NegotiationConfig {
    /// Options we agree to perform when the peer sends `DO`
    pub local_options: Vec<TelnetOption>,
    /// Options we let the peer perform when it sends `WILL`
    pub remote_options: Vec<TelnetOption>,
    /// Options offered with `WILL` when the session starts
    pub announce: Vec<TelnetOption>,
    /// Options requested with `DO` when the session starts
    pub request: Vec<TelnetOption>,
    /// Names sent in reply to `TTYPE SEND`, in order
    pub terminal_types: Vec<String>,
    /// How long a request may stay unanswered before it counts as refused
    pub timeout: Duration,
}

impl NegotiationConfig {
    /// Replaces the list of terminal names.
    pub fn with_terminal_types<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terminal_types = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the pending-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Agrees to perform `option` when asked.
    pub fn with_local_option(mut self, option: TelnetOption) -> Self {
        if !self.local_options.contains(&option) {
            self.local_options.push(option);
        }
        self
    }

    /// Refuses to perform `option`, and stops announcing it.
    pub fn without_local_option(mut self, option: TelnetOption) -> Self {
        self.local_options.retain(|o| *o != option);
        self.announce.retain(|o| *o != option);
        self
    }

    /// Lets the peer perform `option`.
    pub fn with_remote_option(mut self, option: TelnetOption) -> Self {
        if !self.remote_options.contains(&option) {
            self.remote_options.push(option);
        }
        self
    }

    /// Refuses to let the peer perform `option`, and stops requesting it.
    pub fn without_remote_option(mut self, option: TelnetOption) -> Self {
        self.remote_options.retain(|o| *o != option);
        self.request.retain(|o| *o != option);
        self
    }

    /// Replaces the options offered with `WILL` at start.
    pub fn with_announce(mut self, options: Vec<TelnetOption>) -> Self {
        self.announce = options;
        self
    }

    /// Replaces the options requested with `DO` at start.
    pub fn with_request(mut self, options: Vec<TelnetOption>) -> Self {
        self.request = options;
        self
    }
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        NegotiationConfig {
            local_options: vec![
                TelnetOption::NAWS,
                TelnetOption::TTYPE,
                TelnetOption::SuppressGoAhead,
                TelnetOption::TransmitBinary,
            ],
            remote_options: vec![
                TelnetOption::Echo,
                TelnetOption::SuppressGoAhead,
                TelnetOption::TransmitBinary,
            ],
            announce: vec![TelnetOption::NAWS, TelnetOption::TTYPE],
            request: vec![TelnetOption::SuppressGoAhead],
            terminal_types: vec![String::from("xterm")],
            timeout: DEFAULT_NEGOTIATION_TIMEOUT,
        }
    }
}

/// Frames to send and events to report, produced by one [`Negotiator`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NegotiationOutcome {
    /// Frames for the peer, in order
    pub replies: Vec<TelnetFrame>,
    /// Events for the application, in order
    pub events: Vec<NegotiationEvent>,
}

impl NegotiationOutcome {
    /// Appends `other` after this outcome.
    pub fn extend(&mut self, other: NegotiationOutcome) {
        self.replies.extend(other.replies);
        self.events.extend(other.events);
    }

    /// `true` when there is nothing to send and nothing to report.
    pub fn is_empty(&self) -> bool {
        self.replies.is_empty() && self.events.is_empty()
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct SupportState {
    /// Whether we perform this option.
    local: bool,
    /// Whether we let the peer perform this option.
    remote: bool,
}

/// Client-side option negotiation.
///
/// # Example
/// ```
/// use bbslink_telnetcodec::{Negotiator, NegotiationConfig, TelnetFrame, TelnetOption};
///
/// let mut negotiator = Negotiator::new(NegotiationConfig::default());
/// let outcome = negotiator.receive(TelnetFrame::Do(TelnetOption::Linemode)).unwrap();
/// assert_eq!(outcome.replies, vec![TelnetFrame::Wont(TelnetOption::Linemode)]);
/// ```
#[derive(Clone, Debug)]
pub struct Negotiator {
    support: [SupportState; 256],
    state: [OptionState; 256],
    announce: Vec<TelnetOption>,
    request: Vec<TelnetOption>,
    terminal_types: Vec<String>,
    next_terminal_type: usize,
    timeout: Duration,
    window_size: Option<WindowSize>,
}

impl Negotiator {
    /// Creates a negotiator with every option in [`NegotiationStatus::Unknown`].
    pub fn new(config: NegotiationConfig) -> Negotiator {
        let mut support = [SupportState::default(); 256];
        for option in &config.local_options {
            support[option.to_u8() as usize].local = true;
        }
        for option in &config.remote_options {
            support[option.to_u8() as usize].remote = true;
        }
        Negotiator {
            support,
            state: [OptionState::default(); 256],
            announce: config.announce,
            request: config.request,
            terminal_types: config.terminal_types,
            next_terminal_type: 0,
            timeout: config.timeout,
            window_size: None,
        }
    }

    /// Sends the configured `WILL` announcements and `DO` requests.
    pub fn start(&mut self, now: Instant) -> NegotiationOutcome {
        let mut outcome = NegotiationOutcome::default();
        for option in self.announce.clone() {
            outcome.extend(self.request_local(option, now));
        }
        for option in self.request.clone() {
            outcome.extend(self.request_remote(option, now));
        }
        outcome
    }

    /// State of `option`.
    pub fn option_state(&self, option: TelnetOption) -> OptionState {
        self.state[option.to_u8() as usize]
    }

    /// `true` if we perform `option`.
    pub fn local_enabled(&self, option: TelnetOption) -> bool {
        self.option_state(option).local_enabled()
    }

    /// `true` if the peer performs `option`.
    pub fn remote_enabled(&self, option: TelnetOption) -> bool {
        self.option_state(option).remote_enabled()
    }

    /// Checks if we agree to perform the given option
    pub fn is_supported_local(&self, option: TelnetOption) -> bool {
        self.support[option.to_u8() as usize].local
    }

    /// Checks if we let the peer perform the given option
    pub fn is_supported_remote(&self, option: TelnetOption) -> bool {
        self.support[option.to_u8() as usize].remote
    }

    /// The last window size reported by the application.
    pub fn window_size(&self) -> Option<WindowSize> {
        self.window_size
    }

    /// The pending-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Offers to perform `option` by sending `WILL`.
    ///
    /// Nothing is sent when the option is not in the local support list, already enabled, or
    /// already requested.
    pub fn request_local(&mut self, option: TelnetOption, now: Instant) -> NegotiationOutcome {
        self.send_request(option, TelnetSide::Local, now)
    }

    /// Asks the peer to perform `option` by sending `DO`.
    ///
    /// Nothing is sent when the option is not in the remote support list, already enabled, or
    /// already requested.
    pub fn request_remote(&mut self, option: TelnetOption, now: Instant) -> NegotiationOutcome {
        self.send_request(option, TelnetSide::Remote, now)
    }

    /// Records a new window size and sends it if NAWS is enabled.
    ///
    /// While NAWS is not enabled the size is kept and sent as soon as the peer accepts NAWS.
    ///
    /// # Errors
    ///
    /// Returns the error raised while encoding the NAWS payload.
    pub fn set_window_size(&mut self, size: WindowSize) -> CodecResult<NegotiationOutcome> {
        self.window_size = Some(size);
        let mut outcome = NegotiationOutcome::default();
        if self.local_enabled(TelnetOption::NAWS) {
            outcome
                .replies
                .push(TelnetArgument::NAWSWindowSize(size).to_frame()?);
        } else {
            debug!(%size, "NAWS not enabled yet, holding window size");
        }
        Ok(outcome)
    }

    /// Turns every request older than the timeout into [`NegotiationStatus::Refused`].
    pub fn resolve_timeouts(&mut self, now: Instant) -> NegotiationOutcome {
        let mut outcome = NegotiationOutcome::default();
        let timeout = self.timeout;
        for index in 0..self.state.len() {
            for side in [TelnetSide::Local, TelnetSide::Remote] {
                let state = self.state[index].side_mut(side);
                let expired = state.status == NegotiationStatus::Requested
                    && state
                        .requested_at
                        .is_some_and(|at| now.saturating_duration_since(at) >= timeout);
                if expired {
                    state.settle(NegotiationStatus::Refused);
                    let option = TelnetOption::from_u8(index as u8);
                    warn!(%option, %side, "Negotiation timed out, treating as refused");
                    outcome.events.push(NegotiationEvent::OptionStatus(
                        option,
                        side,
                        NegotiationStatus::Refused,
                    ));
                }
            }
        }
        outcome
    }

    /// Processes a control frame from the peer.
    ///
    /// # Errors
    ///
    /// Returns the parse error when a subnegotiation payload for NAWS or TTYPE is malformed.
    /// The negotiation state is unchanged in that case. Encoding errors of a NAWS or TTYPE
    /// reply are returned as well.
    pub fn receive(&mut self, frame: TelnetFrame) -> CodecResult<NegotiationOutcome> {
        let mut outcome = NegotiationOutcome::default();
        match frame {
            TelnetFrame::Do(option) => self.recv_do(option, &mut outcome)?,
            TelnetFrame::Dont(option) => self.recv_disable(option, TelnetSide::Local, &mut outcome),
            TelnetFrame::Will(option) => self.recv_will(option, &mut outcome),
            TelnetFrame::Wont(option) => {
                self.recv_disable(option, TelnetSide::Remote, &mut outcome);
            }
            TelnetFrame::Command(command) => {
                debug!(%command, "Received command");
                outcome.events.push(NegotiationEvent::Command(command));
            }
            TelnetFrame::Subnegotiate(option, payload) => {
                let argument = TelnetArgument::parse(option, &payload)?;
                self.recv_subnegotiation(&argument, &mut outcome)?;
                outcome.events.push(NegotiationEvent::Subnegotiate(argument));
            }
        }
        Ok(outcome)
    }

    fn send_request(
        &mut self,
        option: TelnetOption,
        side: TelnetSide,
        now: Instant,
    ) -> NegotiationOutcome {
        let mut outcome = NegotiationOutcome::default();
        let supported = match side {
            TelnetSide::Local => self.is_supported_local(option),
            TelnetSide::Remote => self.is_supported_remote(option),
        };
        if !supported {
            debug!(%option, %side, "Not requesting unsupported option");
            return outcome;
        }
        let state = self.state[option.to_u8() as usize].side_mut(side);
        match state.status {
            NegotiationStatus::Requested | NegotiationStatus::Accepted => {}
            NegotiationStatus::Unknown | NegotiationStatus::Refused => {
                state.status = NegotiationStatus::Requested;
                state.requested_at = Some(now);
                debug!(%option, %side, "Requesting option");
                outcome.replies.push(match side {
                    TelnetSide::Local => TelnetFrame::Will(option),
                    TelnetSide::Remote => TelnetFrame::Do(option),
                });
                outcome.events.push(NegotiationEvent::OptionStatus(
                    option,
                    side,
                    NegotiationStatus::Requested,
                ));
            }
        }
        outcome
    }

    /// Peer asks us to perform `option`.
    fn recv_do(
        &mut self,
        option: TelnetOption,
        outcome: &mut NegotiationOutcome,
    ) -> CodecResult<()> {
        if !self.is_supported_local(option) {
            debug!(%option, "Refusing DO");
            outcome.replies.push(TelnetFrame::Wont(option));
            self.settle(option, TelnetSide::Local, NegotiationStatus::Refused, outcome);
            return Ok(());
        }
        match self.option_state(option).local.status {
            NegotiationStatus::Accepted => Ok(()),
            NegotiationStatus::Requested => {
                // The DO answers our WILL.
                self.settle(option, TelnetSide::Local, NegotiationStatus::Accepted, outcome);
                self.local_accepted(option, outcome)
            }
            NegotiationStatus::Unknown | NegotiationStatus::Refused => {
                debug!(%option, "Accepting DO");
                outcome.replies.push(TelnetFrame::Will(option));
                self.settle(option, TelnetSide::Local, NegotiationStatus::Accepted, outcome);
                self.local_accepted(option, outcome)
            }
        }
    }

    /// Peer offers to perform `option`.
    ///
    /// An offer outside the remote policy is refused with `WONT`, the same verb that refuses an
    /// unsupported `DO`.
    fn recv_will(&mut self, option: TelnetOption, outcome: &mut NegotiationOutcome) {
        if !self.is_supported_remote(option) {
            debug!(%option, "Refusing WILL");
            outcome.replies.push(TelnetFrame::Wont(option));
            self.settle(option, TelnetSide::Remote, NegotiationStatus::Refused, outcome);
            return;
        }
        match self.option_state(option).remote.status {
            NegotiationStatus::Accepted => {}
            NegotiationStatus::Requested => {
                self.settle(option, TelnetSide::Remote, NegotiationStatus::Accepted, outcome);
            }
            NegotiationStatus::Unknown | NegotiationStatus::Refused => {
                debug!(%option, "Accepting WILL");
                outcome.replies.push(TelnetFrame::Do(option));
                self.settle(option, TelnetSide::Remote, NegotiationStatus::Accepted, outcome);
            }
        }
    }

    /// Peer sent `DONT` (local side) or `WONT` (remote side).
    fn recv_disable(
        &mut self,
        option: TelnetOption,
        side: TelnetSide,
        outcome: &mut NegotiationOutcome,
    ) {
        if self.option_state(option).status(side) == NegotiationStatus::Accepted {
            debug!(%option, %side, "Acknowledging disable");
            outcome.replies.push(match side {
                TelnetSide::Local => TelnetFrame::Wont(option),
                TelnetSide::Remote => TelnetFrame::Dont(option),
            });
        }
        self.settle(option, side, NegotiationStatus::Refused, outcome);
    }

    fn recv_subnegotiation(
        &mut self,
        argument: &TelnetArgument,
        outcome: &mut NegotiationOutcome,
    ) -> CodecResult<()> {
        if let TelnetArgument::TerminalType(TerminalType::Send) = argument {
            if !self.local_enabled(TelnetOption::TTYPE) {
                debug!("Ignoring TTYPE SEND, TTYPE is not enabled");
                return Ok(());
            }
            let name = self.next_terminal_type();
            debug!(%name, "Sending terminal type");
            outcome
                .replies
                .push(TelnetArgument::TerminalType(TerminalType::Is(name)).to_frame()?);
        }
        Ok(())
    }

    /// Side effects of `option` becoming enabled on our side.
    fn local_accepted(
        &mut self,
        option: TelnetOption,
        outcome: &mut NegotiationOutcome,
    ) -> CodecResult<()> {
        match option {
            TelnetOption::NAWS => {
                if let Some(size) = self.window_size {
                    debug!(%size, "NAWS enabled, sending window size");
                    outcome
                        .replies
                        .push(TelnetArgument::NAWSWindowSize(size).to_frame()?);
                }
            }
            TelnetOption::TTYPE => self.next_terminal_type = 0,
            _ => {}
        }
        Ok(())
    }

    fn settle(
        &mut self,
        option: TelnetOption,
        side: TelnetSide,
        status: NegotiationStatus,
        outcome: &mut NegotiationOutcome,
    ) {
        if self.state[option.to_u8() as usize].side_mut(side).settle(status) {
            outcome
                .events
                .push(NegotiationEvent::OptionStatus(option, side, status));
        }
    }

    /// Walks the terminal type list, repeating the last entry once it is exhausted.
    fn next_terminal_type(&mut self) -> String {
        let name = self
            .terminal_types
            .get(self.next_terminal_type)
            .or(self.terminal_types.last())
            .map_or(UNKNOWN_TERMINAL, String::as_str)
            .to_string();
        if self.next_terminal_type < self.terminal_types.len() {
            self.next_terminal_type += 1;
        }
        name
    }
}

impl Default for Negotiator {
    fn default() -> Self {
        Negotiator::new(NegotiationConfig::default())
    }
}
