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

//! # BBSLink Telnet Protocol Codec
//!
//! This crate implements the telnet layer of a BBS terminal client: a byte-level codec that
//! separates display text from control sequences, and a negotiation state machine that answers
//! the server's option requests. Neither part performs I/O.
//!
//! ## Overview
//!
//! The Telnet protocol (RFC 854) interleaves display bytes with `IAC` (0xFF) command sequences.
//! This crate handles:
//!
//! - **Text**: runs of display bytes, with the `IAC IAC` escape collapsed to a single `0xFF`
//! - **Control commands**: `NOP`, `GA`, `AYT` and the other two-byte commands
//! - **Option negotiation**: `DO`, `DONT`, `WILL`, `WONT`
//! - **Subnegotiation**: `NAWS` window sizes and `TERMINAL-TYPE` exchange
//!
//! ## Core Components
//!
//! ### [`TelnetCodec`]
//!
//! Implements [`Decoder`](tokio_util::codec::Decoder) and
//! [`Encoder`](tokio_util::codec::Encoder) from `tokio_util::codec`. A sequence cut short by the
//! end of a read stays in the source buffer until the rest arrives. The free functions
//! [`decode`], [`encode_text`] and [`encode_negotiation`] offer the same behaviour over plain
//! buffers with an explicit carry.
//!
//! ### [`Negotiator`]
//!
//! Tracks a [`NegotiationStatus`] for each side of all 256 options and decides which requests to
//! accept according to a [`NegotiationConfig`]. Unanswered requests are turned into refusals by
//! [`Negotiator::resolve_timeouts`], with the current time passed in by the caller.
//!
//! ## Usage Example
//!
//! ```rust
//! use bbslink_telnetcodec::{DecodedUnit, Negotiator, NegotiationConfig, TelnetCodec, TelnetFrame};
//! use bytes::BytesMut;
//! use tokio_util::codec::{Decoder, Encoder};
//!
//! let mut codec = TelnetCodec::new();
//! let mut negotiator = Negotiator::new(NegotiationConfig::default());
//!
//! let mut input = BytesMut::from(&b"Welcome!\xFF\xFB\x01"[..]); // Text + WILL ECHO
//! let mut output = BytesMut::new();
//! while let Some(unit) = codec.decode(&mut input).unwrap() {
//!     match unit {
//!         DecodedUnit::Text(text) => println!("{}", String::from_utf8_lossy(&text)),
//!         DecodedUnit::Negotiation(frame) => {
//!             for reply in negotiator.receive(frame).unwrap().replies {
//!                 codec.encode(reply, &mut output).unwrap();
//!             }
//!         }
//!     }
//! }
//! assert_eq!(&output[..], b"\xFF\xFD\x01"); // DO ECHO
//! ```
//!
//! ## Protocol Details
//!
//! - 2-byte commands: `IAC <command>` (e.g., `IAC NOP`)
//! - 3-byte negotiation: `IAC <DO|DONT|WILL|WONT> <option>`
//! - Subnegotiation: `IAC SB <option> <data...> IAC SE`, with `IAC` in the data doubled
//!
//! No newline translation is done; `CR`, `LF` and `NUL` pass through untouched.
//!
//! ## Related RFCs
//!
//! - RFC 854: Telnet Protocol Specification
//! - RFC 855: Telnet Option Specifications
//! - RFC 856: Telnet Binary Transmission
//! - RFC 857: Telnet Echo Option
//! - RFC 858: Telnet Suppress Go Ahead Option
//! - RFC 1073: Telnet Window Size Option
//! - RFC 1091: Telnet Terminal-Type Option

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(
    clippy::option_if_let_else,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::len_without_is_empty
)]

mod args;
mod codec;
pub mod consts;
mod event;
mod frame;
mod negotiation;
mod options;
mod result;

pub use self::args::{TelnetArgument, naws, ttype};
pub use self::codec::{
    DEFAULT_MAX_SUBNEGOTIATION_LEN, Decoded, TelnetCodec, decode, encode_negotiation, encode_text,
};
pub use self::event::NegotiationEvent;
pub use self::frame::{DecodedUnit, TelnetCommand, TelnetFrame};
pub use self::negotiation::{
    DEFAULT_NEGOTIATION_TIMEOUT, NegotiationConfig, NegotiationOutcome, NegotiationStatus,
    Negotiator, OptionState,
};
pub use self::options::{TelnetOption, TelnetSide};
pub use self::result::{CodecError, CodecResult, SubnegotiationErrorKind};
