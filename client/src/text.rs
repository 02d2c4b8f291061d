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

//! Display text produced by a session

use bytes::Bytes;
use std::borrow::Cow;

/// A run of display bytes, with telnet escaping already removed.
///
/// The bytes are passed through untouched, carriage control and ANSI sequences included; what
/// they mean on screen is up to the display.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct TextChunk {
    bytes: Bytes,
}

impl TextChunk {
    /// Wraps display bytes.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        TextChunk {
            bytes: bytes.into(),
        }
    }

    /// The raw display bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the chunk, returning the raw display bytes.
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Number of bytes in the chunk.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the chunk holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decodes the chunk for display.
    ///
    /// Valid UTF-8 is borrowed as is; anything else is read as Latin-1, one character per byte,
    /// so legacy 8-bit boards still render something readable.
    ///
    /// ```
    /// use bbslink_client::TextChunk;
    ///
    /// assert_eq!(TextChunk::new(&b"caf\xC3\xA9"[..]).to_text_lossy(), "café");
    /// assert_eq!(TextChunk::new(&b"caf\xE9"[..]).to_text_lossy(), "café");
    /// ```
    pub fn to_text_lossy(&self) -> Cow<'_, str> {
        match std::str::from_utf8(&self.bytes) {
            Ok(text) => Cow::Borrowed(text),
            Err(_) => Cow::Owned(self.bytes.iter().map(|&byte| char::from(byte)).collect()),
        }
    }
}

impl From<Bytes> for TextChunk {
    fn from(bytes: Bytes) -> Self {
        TextChunk { bytes }
    }
}

impl AsRef<[u8]> for TextChunk {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Display for TextChunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_is_borrowed() {
        let chunk = TextChunk::new(&b"Welcome\r\n"[..]);
        assert!(matches!(chunk.to_text_lossy(), Cow::Borrowed("Welcome\r\n")));
    }

    #[test]
    fn test_invalid_utf8_falls_back_to_latin1() {
        let chunk = TextChunk::new(Bytes::from_static(&[0x41, 0xFF, 0xB0]));
        assert_eq!(chunk.to_text_lossy(), "A\u{FF}\u{B0}");
        assert_eq!(chunk.len(), 3);
    }

    #[test]
    fn test_empty_chunk() {
        let chunk = TextChunk::default();
        assert!(chunk.is_empty());
        assert_eq!(chunk.to_string(), "");
    }
}
