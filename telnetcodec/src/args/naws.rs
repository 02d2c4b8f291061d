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

//! Negotiate About Window Size (RFC 1073)
//!

use crate::{CodecError, CodecResult, SubnegotiationErrorKind, TelnetOption};
use byteorder::{BigEndian, WriteBytesExt};
use bytes::{Buf, BufMut};

/// Represents the Negotiate About Window Size (NAWS) option data.
///
/// # Format
/// The window size is encoded as four bytes in big-endian format:
/// - 2 bytes for columns (width)
/// - 2 bytes for rows (height)
///
/// # Example
/// ```
/// use bbslink_telnetcodec::naws::WindowSize;
///
/// let size = WindowSize::new(80, 24);
/// assert_eq!(size.cols, 80);
/// assert_eq!(size.rows, 24);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSize {
    /// The number of columns (characters) in the terminal window
    pub cols: u16,
    /// The number of rows (lines) in the terminal window
    pub rows: u16,
}

impl WindowSize {
    /// Creates a new `WindowSize` with the specified columns and rows.
    pub fn new(cols: u16, rows: u16) -> Self {
        WindowSize { cols, rows }
    }

    /// Returns the encoded length of this `WindowSize` in bytes, before IAC escaping.
    pub fn len(&self) -> usize {
        4
    }

    /// Encodes this `WindowSize` into a byte buffer using big-endian format.
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        Ok(self.write(&mut dst.writer())?)
    }

    /// Writes the columns followed by the rows as big-endian u16 values.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        writer.write_u16::<BigEndian>(self.cols)?;
        writer.write_u16::<BigEndian>(self.rows)?;
        Ok(4)
    }

    /// Decodes a `WindowSize` from a byte buffer in big-endian format.
    ///
    /// # Errors
    /// Returns `CodecError::SubnegotiationError` with `InsufficientData` if
    /// fewer than 4 bytes are available in the buffer.
    ///
    /// # Example
    /// ```
    /// use bbslink_telnetcodec::naws::WindowSize;
    ///
    /// let mut buf: &[u8] = &[0x00, 0x50, 0x00, 0x18];
    /// let size = WindowSize::decode(&mut buf).unwrap();
    /// assert_eq!(size, WindowSize::new(80, 24));
    /// ```
    pub fn decode<T: Buf>(src: &mut T) -> CodecResult<WindowSize> {
        // NAWS format: WIDTH-HIGH WIDTH-LOW HEIGHT-HIGH HEIGHT-LOW
        if src.remaining() >= 4 {
            Ok(WindowSize {
                cols: src.get_u16(),
                rows: src.get_u16(),
            })
        } else {
            Err(CodecError::subnegotiation(
                TelnetOption::NAWS,
                SubnegotiationErrorKind::InsufficientData {
                    required: 4,
                    available: src.remaining(),
                },
            ))
        }
    }
}

impl Default for WindowSize {
    /// The traditional 80x24 terminal.
    fn default() -> Self {
        WindowSize { cols: 80, rows: 24 }
    }
}

impl std::fmt::Display for WindowSize {
    /// Formats as `(cols,rows)`, for example `(80,24)`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.cols, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn test_encode_is_cols_then_rows_big_endian() {
        let mut buf = BytesMut::new();
        let written = WindowSize::new(80, 24).encode(&mut buf).unwrap();
        assert_eq!(written, 4);
        assert_eq!(&buf[..], &[0x00, 0x50, 0x00, 0x18]);

        buf.clear();
        WindowSize::new(300, 1).encode(&mut buf).unwrap();
        assert_eq!(&buf[..], &[0x01, 0x2C, 0x00, 0x01]);
    }

    #[test]
    fn test_decode_short_payload() {
        let mut buf: &[u8] = &[0x00, 0x50];
        let err = WindowSize::decode(&mut buf).unwrap_err();
        assert_eq!(
            err,
            CodecError::subnegotiation(
                TelnetOption::NAWS,
                SubnegotiationErrorKind::InsufficientData {
                    required: 4,
                    available: 2
                }
            )
        );
    }

    #[test]
    fn test_default_and_display() {
        assert_eq!(WindowSize::default(), WindowSize::new(80, 24));
        assert_eq!(WindowSize::new(132, 43).to_string(), "(132,43)");
    }
}
