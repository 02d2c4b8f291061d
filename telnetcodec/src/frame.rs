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

use crate::{TelnetOption, consts};
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt::Formatter;

/// Two-byte Telnet commands (`IAC <command>`).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TelnetCommand {
    /// No Operation
    NoOperation,
    /// End of urgent Data Stream
    DataMark,
    /// Operator pressed the Break key or the Attention key.
    Break,
    /// Interrupt current process.
    InterruptProcess,
    /// Cancel output from the current process.
    AbortOutput,
    /// Request acknowledgment.
    AreYouThere,
    /// Request that the operator erase the previous character.
    EraseCharacter,
    /// Request that the operator erase the previous line.
    EraseLine,
    /// End of input for half-duplex connections.
    GoAhead,
    /// End of Record, marks the end of a prompt
    EndOfRecord,
    /// Any command byte this codec does not recognize, including a stray `SE`.
    Unknown(u8),
}

impl TelnetCommand {
    /// Returns the wire byte for this command.
    pub fn to_u8(&self) -> u8 {
        match self {
            TelnetCommand::NoOperation => consts::NOP,
            TelnetCommand::DataMark => consts::DM,
            TelnetCommand::Break => consts::BRK,
            TelnetCommand::InterruptProcess => consts::IP,
            TelnetCommand::AbortOutput => consts::AO,
            TelnetCommand::AreYouThere => consts::AYT,
            TelnetCommand::EraseCharacter => consts::EC,
            TelnetCommand::EraseLine => consts::EL,
            TelnetCommand::GoAhead => consts::GA,
            TelnetCommand::EndOfRecord => consts::EOR,
            TelnetCommand::Unknown(byte) => *byte,
        }
    }

    /// Maps a command byte that is not a negotiation verb, `SB` or `IAC`.
    pub fn from_u8(byte: u8) -> Self {
        match byte {
            consts::NOP => TelnetCommand::NoOperation,
            consts::DM => TelnetCommand::DataMark,
            consts::BRK => TelnetCommand::Break,
            consts::IP => TelnetCommand::InterruptProcess,
            consts::AO => TelnetCommand::AbortOutput,
            consts::AYT => TelnetCommand::AreYouThere,
            consts::EC => TelnetCommand::EraseCharacter,
            consts::EL => TelnetCommand::EraseLine,
            consts::GA => TelnetCommand::GoAhead,
            consts::EOR => TelnetCommand::EndOfRecord,
            byte => TelnetCommand::Unknown(byte),
        }
    }
}

impl std::fmt::Display for TelnetCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TelnetCommand::Unknown(byte) => write!(f, "Unknown({byte:#04X})"),
            other => write!(f, "{other:?}"),
        }
    }
}

///
/// `TelnetFrame` is one control sequence on the wire: everything that starts with `IAC` except
/// the `IAC IAC` data escape.
///
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TelnetFrame {
    /// `IAC <command>`
    Command(TelnetCommand),
    /// `IAC DO <option>`
    Do(TelnetOption),
    /// `IAC DONT <option>`
    Dont(TelnetOption),
    /// `IAC WILL <option>`
    Will(TelnetOption),
    /// `IAC WONT <option>`
    Wont(TelnetOption),
    /// `IAC SB <option> <payload> IAC SE`, payload already unescaped
    Subnegotiate(TelnetOption, Bytes),
}

impl TelnetFrame {
    /// The option this frame negotiates, if any.
    pub fn option(&self) -> Option<TelnetOption> {
        match self {
            TelnetFrame::Command(_) => None,
            TelnetFrame::Do(option)
            | TelnetFrame::Dont(option)
            | TelnetFrame::Will(option)
            | TelnetFrame::Wont(option)
            | TelnetFrame::Subnegotiate(option, _) => Some(*option),
        }
    }

    /// Number of bytes this frame occupies on the wire, escaping included.
    pub fn encoded_len(&self) -> usize {
        match self {
            TelnetFrame::Command(_) => 2,
            TelnetFrame::Do(_) | TelnetFrame::Dont(_) | TelnetFrame::Will(_) | TelnetFrame::Wont(_) => 3,
            TelnetFrame::Subnegotiate(_, payload) => 5 + escaped_len(payload),
        }
    }

    /// Appends the wire form of this frame to `dst`.
    ///
    /// Subnegotiation payload bytes equal to `IAC` are doubled so the receiver can find the
    /// terminating `IAC SE`.
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.reserve(self.encoded_len());
        match self {
            TelnetFrame::Command(command) => {
                dst.put_u8(consts::IAC);
                dst.put_u8(command.to_u8());
            }
            TelnetFrame::Do(option) => put_negotiation(dst, consts::DO, *option),
            TelnetFrame::Dont(option) => put_negotiation(dst, consts::DONT, *option),
            TelnetFrame::Will(option) => put_negotiation(dst, consts::WILL, *option),
            TelnetFrame::Wont(option) => put_negotiation(dst, consts::WONT, *option),
            TelnetFrame::Subnegotiate(option, payload) => {
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::SB);
                dst.put_u8(option.to_u8());
                put_escaped(dst, payload);
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::SE);
            }
        }
    }
}

impl std::fmt::Display for TelnetFrame {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TelnetFrame::Command(command) => write!(f, "IAC {command}"),
            TelnetFrame::Do(option) => write!(f, "DO {option}"),
            TelnetFrame::Dont(option) => write!(f, "DONT {option}"),
            TelnetFrame::Will(option) => write!(f, "WILL {option}"),
            TelnetFrame::Wont(option) => write!(f, "WONT {option}"),
            TelnetFrame::Subnegotiate(option, payload) => {
                write!(f, "SB {option} ({} bytes)", payload.len())
            }
        }
    }
}

///
/// `DecodedUnit` is what the decoder yields: either a run of display bytes with telnet escaping
/// removed, or a control frame for the negotiation layer.
///
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DecodedUnit {
    /// Bytes to render, `IAC IAC` already collapsed to a single `0xFF`
    Text(Bytes),
    /// A control sequence
    Negotiation(TelnetFrame),
}

impl DecodedUnit {
    /// Returns the text payload if this is a text unit.
    pub fn as_text(&self) -> Option<&Bytes> {
        match self {
            DecodedUnit::Text(bytes) => Some(bytes),
            DecodedUnit::Negotiation(_) => None,
        }
    }
}

fn put_negotiation(dst: &mut BytesMut, verb: u8, option: TelnetOption) {
    dst.put_u8(consts::IAC);
    dst.put_u8(verb);
    dst.put_u8(option.to_u8());
}

/// Appends `data` to `dst`, doubling every `IAC`.
pub(crate) fn put_escaped(dst: &mut BytesMut, data: &[u8]) {
    dst.reserve(escaped_len(data));
    for chunk in data.split_inclusive(|byte| *byte == consts::IAC) {
        dst.put_slice(chunk);
        if chunk.last() == Some(&consts::IAC) {
            dst.put_u8(consts::IAC);
        }
    }
}

pub(crate) fn escaped_len(data: &[u8]) -> usize {
    data.len() + data.iter().filter(|byte| **byte == consts::IAC).count()
}
