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

//! Terminal Type (RFC 1091)
//!

use crate::{CodecError, CodecResult, SubnegotiationErrorKind, TelnetOption, consts};
use bytes::{Buf, BufMut};

/// Terminal-Type subnegotiation payload.
///
/// The server asks with `SEND`; the client answers with `IS` followed by the terminal name in
/// ASCII. Repeated `SEND`s walk through the client's list of names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TerminalType {
    /// `IS <name>`
    Is(String),
    /// `SEND`
    Send,
}

impl TerminalType {
    /// Returns the encoded length in bytes, before IAC escaping.
    pub fn len(&self) -> usize {
        match self {
            TerminalType::Is(name) => 1 + name.len(),
            TerminalType::Send => 1,
        }
    }

    /// Encodes this payload into a byte buffer.
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        Ok(self.write(&mut dst.writer())?)
    }

    /// Writes this payload to a writer.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        match self {
            TerminalType::Is(name) => {
                writer.write_all(&[consts::ttype::IS])?;
                writer.write_all(name.as_bytes())?;
            }
            TerminalType::Send => writer.write_all(&[consts::ttype::SEND])?,
        }
        Ok(self.len())
    }

    /// Decodes a Terminal-Type payload.
    ///
    /// # Example
    /// ```
    /// use bbslink_telnetcodec::ttype::TerminalType;
    ///
    /// let mut buf: &[u8] = b"\x00ANSI";
    /// assert_eq!(TerminalType::decode(&mut buf).unwrap(), TerminalType::Is("ANSI".into()));
    /// ```
    pub fn decode<T: Buf>(src: &mut T) -> CodecResult<TerminalType> {
        if !src.has_remaining() {
            return Err(CodecError::subnegotiation(
                TelnetOption::TTYPE,
                SubnegotiationErrorKind::InsufficientData {
                    required: 1,
                    available: 0,
                },
            ));
        }
        match src.get_u8() {
            consts::ttype::IS => {
                let name = src.copy_to_bytes(src.remaining());
                Ok(TerminalType::Is(String::from_utf8_lossy(&name).into_owned()))
            }
            consts::ttype::SEND => {
                src.advance(src.remaining());
                Ok(TerminalType::Send)
            }
            command => Err(CodecError::subnegotiation(
                TelnetOption::TTYPE,
                SubnegotiationErrorKind::InvalidCommand {
                    command,
                    expected: vec![consts::ttype::IS, consts::ttype::SEND],
                },
            )),
        }
    }
}

impl std::fmt::Display for TerminalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalType::Is(name) => write!(f, "IS {name}"),
            TerminalType::Send => write!(f, "SEND"),
        }
    }
}
