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

use crate::args::TelnetArgument;
use crate::frame::TelnetCommand;
use crate::negotiation::NegotiationStatus;
use crate::options::{TelnetOption, TelnetSide};

///
/// `NegotiationEvent` reports what the negotiation layer did with an incoming control frame.
/// Replies to the peer are returned separately; events are for the application, which is free
/// to ignore them.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NegotiationEvent {
    /// One side of an option changed status.
    /// Parameters: (option, side, status)
    /// - option: The telnet option that was negotiated
    /// - side: Whether this is Local or Remote
    /// - status: The status the side moved to
    OptionStatus(TelnetOption, TelnetSide, NegotiationStatus),
    /// A two-byte command such as `NOP`, `GA` or `AYT`, including unrecognized ones
    Command(TelnetCommand),
    /// Subnegotiation payload
    Subnegotiate(TelnetArgument),
}

impl std::fmt::Display for NegotiationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NegotiationEvent::OptionStatus(option, side, status) => {
                write!(f, "{option} ({side}) is {status}")
            }
            NegotiationEvent::Command(command) => write!(f, "Command {command}"),
            NegotiationEvent::Subnegotiate(argument) => write!(f, "Subnegotiation {argument}"),
        }
    }
}
