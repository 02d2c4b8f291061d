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

//! Telnet wire constants (RFC 854, RFC 855 and option RFCs).

/// Interpret As Command
pub const IAC: u8 = 255;
/// Refusal to perform, or confirmation you are no longer performing, the indicated option.
pub const DONT: u8 = 254;
/// Request that the other party perform, or confirmation that you expect it to perform, the option.
pub const DO: u8 = 253;
/// Refusal to perform, or to continue performing, the indicated option.
pub const WONT: u8 = 252;
/// Desire to begin performing, or confirmation that you are now performing, the option.
pub const WILL: u8 = 251;
/// Subnegotiation Begin
pub const SB: u8 = 250;
/// Go Ahead
pub const GA: u8 = 249;
/// Erase Line
pub const EL: u8 = 248;
/// Erase Character
pub const EC: u8 = 247;
/// Are You There
pub const AYT: u8 = 246;
/// Abort Output
pub const AO: u8 = 245;
/// Interrupt Process
pub const IP: u8 = 244;
/// Break
pub const BRK: u8 = 243;
/// Data Mark
pub const DM: u8 = 242;
/// No Operation
pub const NOP: u8 = 241;
/// Subnegotiation End
pub const SE: u8 = 240;
/// End of Record
pub const EOR: u8 = 239;

/// Carriage Return
pub const CR: u8 = 13;
/// Line Feed
pub const LF: u8 = 10;

/// Telnet option codes
pub mod option {
    /// Binary Transmission [RFC856]
    pub const BINARY: u8 = 0;
    /// Echo [RFC857]
    pub const ECHO: u8 = 1;
    /// Suppress Go Ahead [RFC858]
    pub const SGA: u8 = 3;
    /// Status [RFC859]
    pub const STATUS: u8 = 5;
    /// Timing Mark [RFC860]
    pub const TM: u8 = 6;
    /// Terminal Type [RFC1091]
    pub const TTYPE: u8 = 24;
    /// End of Record [RFC885]
    pub const EOR: u8 = 25;
    /// Negotiate About Window Size [RFC1073]
    pub const NAWS: u8 = 31;
    /// Terminal Speed [RFC1079]
    pub const TSPEED: u8 = 32;
    /// Remote Flow Control [RFC1372]
    pub const LFLOW: u8 = 33;
    /// Linemode [RFC1184]
    pub const LINEMODE: u8 = 34;
    /// X Display Location [RFC1096]
    pub const XDISPLOC: u8 = 35;
    /// New Environment [RFC1572]
    pub const NEW_ENVIRONMENT: u8 = 39;
    /// Charset [RFC2066]
    pub const CHARSET: u8 = 42;
    /// Mud Client Compression Protocol v2
    pub const COMPRESS2: u8 = 86;
    /// Generic Mud Communication Protocol
    pub const GMCP: u8 = 201;
}

/// Terminal-Type subnegotiation commands (RFC 1091)
pub mod ttype {
    /// The payload carries a terminal type name
    pub const IS: u8 = 0;
    /// Request for the peer to send its terminal type
    pub const SEND: u8 = 1;
}
