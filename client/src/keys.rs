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

//! Keyboard input mapping
//!
//! BBS software expects VT100/ANSI cursor sequences for the navigation keys. The bytes produced
//! here are unescaped keyboard input; the session doubles any `IAC` on the way out.

use bytes::Bytes;

/// A key pressed by the user.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Key {
    /// Cursor up, `ESC [ A`
    Up,
    /// Cursor down, `ESC [ B`
    Down,
    /// Cursor right, `ESC [ C`
    Right,
    /// Cursor left, `ESC [ D`
    Left,
    /// Carriage return
    Enter,
    /// Backspace, `0x08`
    Backspace,
    /// Horizontal tab
    Tab,
    /// A bare `ESC`
    Escape,
    /// `ESC [ 3 ~`
    Delete,
    /// `ESC [ H`
    Home,
    /// `ESC [ F`
    End,
    /// `ESC [ 5 ~`
    PageUp,
    /// `ESC [ 6 ~`
    PageDown,
    /// A printable character, sent as UTF-8
    Char(char),
}

impl Key {
    /// The bytes this key sends to the server.
    ///
    /// ```
    /// use bbslink_client::Key;
    ///
    /// assert_eq!(&Key::Up.to_bytes()[..], b"\x1B[A");
    /// assert_eq!(&Key::Char('é').to_bytes()[..], "é".as_bytes());
    /// ```
    pub fn to_bytes(&self) -> Bytes {
        match self {
            Key::Up => Bytes::from_static(b"\x1B[A"),
            Key::Down => Bytes::from_static(b"\x1B[B"),
            Key::Right => Bytes::from_static(b"\x1B[C"),
            Key::Left => Bytes::from_static(b"\x1B[D"),
            Key::Enter => Bytes::from_static(b"\r"),
            Key::Backspace => Bytes::from_static(b"\x08"),
            Key::Tab => Bytes::from_static(b"\t"),
            Key::Escape => Bytes::from_static(b"\x1B"),
            Key::Delete => Bytes::from_static(b"\x1B[3~"),
            Key::Home => Bytes::from_static(b"\x1B[H"),
            Key::End => Bytes::from_static(b"\x1B[F"),
            Key::PageUp => Bytes::from_static(b"\x1B[5~"),
            Key::PageDown => Bytes::from_static(b"\x1B[6~"),
            Key::Char(ch) => {
                let mut buf = [0u8; 4];
                Bytes::copy_from_slice(ch.encode_utf8(&mut buf).as_bytes())
            }
        }
    }
}

impl From<char> for Key {
    fn from(ch: char) -> Self {
        match ch {
            '\r' | '\n' => Key::Enter,
            '\t' => Key::Tab,
            '\x08' => Key::Backspace,
            '\x1B' => Key::Escape,
            ch => Key::Char(ch),
        }
    }
}
