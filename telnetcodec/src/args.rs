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

use crate::TelnetOption;
use crate::args::naws::WindowSize;
use crate::args::ttype::TerminalType;
use crate::frame::TelnetFrame;
use crate::result::CodecResult;
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt::Formatter;

pub mod naws;
pub mod ttype;

///
/// Telnet Subnegotiation Argument
///
/// The parsed form of a `SB <option> ... SE` payload for the options this client understands.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelnetArgument {
    /// A subnegotiation for the window size, in characters.
    NAWSWindowSize(WindowSize),
    /// A Terminal-Type request or reply.
    TerminalType(TerminalType),
    /// A subnegotiation for an option without a dedicated parser.
    Unknown(TelnetOption, Bytes),
}

impl TelnetArgument {
    /// Parses an unescaped subnegotiation payload for `option`.
    ///
    /// Options without a dedicated parser are returned as [`TelnetArgument::Unknown`].
    ///
    /// # Examples
    ///
    /// ```
    /// use bbslink_telnetcodec::{TelnetArgument, TelnetOption};
    /// use bbslink_telnetcodec::naws::WindowSize;
    ///
    /// let arg = TelnetArgument::parse(TelnetOption::NAWS, &[0, 80, 0, 24]).unwrap();
    /// assert_eq!(arg, TelnetArgument::NAWSWindowSize(WindowSize::new(80, 24)));
    /// ```
    pub fn parse(option: TelnetOption, payload: &[u8]) -> CodecResult<TelnetArgument> {
        let mut src = payload;
        match option {
            TelnetOption::NAWS => Ok(TelnetArgument::NAWSWindowSize(WindowSize::decode(&mut src)?)),
            TelnetOption::TTYPE => Ok(TelnetArgument::TerminalType(TerminalType::decode(&mut src)?)),
            option => Ok(TelnetArgument::Unknown(option, Bytes::copy_from_slice(payload))),
        }
    }

    /// Returns the encoded byte length of this argument, before IAC escaping.
    pub fn len(&self) -> usize {
        match self {
            TelnetArgument::NAWSWindowSize(inner) => inner.len(),
            TelnetArgument::TerminalType(inner) => inner.len(),
            TelnetArgument::Unknown(_option, inner) => inner.len(),
        }
    }

    /// Encodes this `TelnetArgument` to a `BufMut` buffer, unescaped.
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        Ok(self.write(&mut dst.writer())?)
    }

    /// Writes this `TelnetArgument` to a `std::io::Write` writer, unescaped.
    ///
    /// Escaping happens when the argument is wrapped into a [`TelnetFrame::Subnegotiate`] and
    /// that frame is encoded.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        match self {
            TelnetArgument::NAWSWindowSize(inner) => inner.write(writer),
            TelnetArgument::TerminalType(inner) => inner.write(writer),
            TelnetArgument::Unknown(_option, payload) => {
                writer.write_all(payload)?;
                Ok(payload.len())
            }
        }
    }

    /// Returns the `TelnetOption` associated with this argument.
    pub fn option(&self) -> TelnetOption {
        match self {
            TelnetArgument::NAWSWindowSize(_) => TelnetOption::NAWS,
            TelnetArgument::TerminalType(_) => TelnetOption::TTYPE,
            TelnetArgument::Unknown(option, _) => *option,
        }
    }

    /// Wraps this argument into a subnegotiation frame ready for encoding.
    pub fn to_frame(&self) -> CodecResult<TelnetFrame> {
        let mut payload = BytesMut::with_capacity(self.len());
        self.encode(&mut payload)?;
        Ok(TelnetFrame::Subnegotiate(self.option(), payload.freeze()))
    }
}

impl std::fmt::Display for TelnetArgument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TelnetArgument::NAWSWindowSize(v) => write!(f, "{v}"),
            TelnetArgument::TerminalType(v) => write!(f, "TerminalType({v})"),
            TelnetArgument::Unknown(o, v) => write!(f, "{o}-{v:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_terminal_type_send() {
        let arg = TelnetArgument::parse(TelnetOption::TTYPE, &[1]).unwrap();
        assert_eq!(arg, TelnetArgument::TerminalType(TerminalType::Send));
        assert_eq!(arg.option(), TelnetOption::TTYPE);
    }

    #[test]
    fn test_parse_unknown_keeps_payload() {
        let arg = TelnetArgument::parse(TelnetOption::Charset, b"\x01;UTF-8").unwrap();
        assert_eq!(
            arg,
            TelnetArgument::Unknown(TelnetOption::Charset, Bytes::from_static(b"\x01;UTF-8"))
        );
    }

    #[test]
    fn test_to_frame() {
        let frame = TelnetArgument::NAWSWindowSize(WindowSize::new(80, 24))
            .to_frame()
            .unwrap();
        assert_eq!(
            frame,
            TelnetFrame::Subnegotiate(TelnetOption::NAWS, Bytes::from_static(&[0, 80, 0, 24]))
        );
    }
}
