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
use crate::frame::{DecodedUnit, TelnetCommand, TelnetFrame, put_escaped};
use crate::result::{CodecError, SubnegotiationErrorKind};
use crate::{TelnetOption, consts};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{trace, warn};

/// Default bound on the payload of a single `IAC SB ... IAC SE` span.
pub const DEFAULT_MAX_SUBNEGOTIATION_LEN: usize = 8192;

/// A codec for the Telnet protocol as seen from a terminal client.
///
/// Decoding turns a raw byte stream into [`DecodedUnit`]s: runs of display text with `IAC IAC`
/// collapsed, and control frames for the negotiation layer. A sequence cut short by the end of
/// the buffer is left in the source buffer and completed by the next read, which is how
/// `tokio_util`'s `Framed` expects a decoder to behave and how the carry of [`decode`] works.
///
/// Encoding escapes text and serializes [`TelnetFrame`]s. No newline translation is done in
/// either direction.
///
/// Malformed subnegotiations are never fatal: the span is dropped, decoding resumes with plain
/// text, and the error is kept until [`TelnetCodec::take_diagnostics`] is called.
#[derive(Clone, Debug)]
pub struct TelnetCodec {
    max_subnegotiation_len: usize,
    diagnostics: Vec<CodecError>,
}

impl TelnetCodec {
    /// Creates a new `TelnetCodec` with the default subnegotiation bound.
    ///
    /// # Example
    /// ```
    /// use bbslink_telnetcodec::TelnetCodec;
    ///
    /// let codec = TelnetCodec::new();
    /// ```
    pub fn new() -> TelnetCodec {
        TelnetCodec::default()
    }

    /// Creates a codec that gives up on a subnegotiation after `limit` payload bytes without
    /// `IAC SE`.
    pub fn with_max_subnegotiation_len(limit: usize) -> TelnetCodec {
        TelnetCodec {
            max_subnegotiation_len: limit,
            diagnostics: Vec::new(),
        }
    }

    /// The subnegotiation lookahead bound in bytes.
    pub fn max_subnegotiation_len(&self) -> usize {
        self.max_subnegotiation_len
    }

    /// Drains the decode errors recorded since the last call.
    pub fn take_diagnostics(&mut self) -> Vec<CodecError> {
        std::mem::take(&mut self.diagnostics)
    }
}

impl Default for TelnetCodec {
    fn default() -> Self {
        TelnetCodec::with_max_subnegotiation_len(DEFAULT_MAX_SUBNEGOTIATION_LEN)
    }
}

impl Decoder for TelnetCodec {
    type Item = DecodedUnit;
    type Error = CodecError;

    /// Decodes the next unit from the front of `src`.
    ///
    /// Returns `Ok(None)` when `src` is empty or holds only the beginning of a control
    /// sequence; those bytes stay in `src` for the next call. A text run ends at the first
    /// control sequence or at the end of `src`, whichever comes first.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<DecodedUnit>, Self::Error> {
        loop {
            match next_step(src, self.max_subnegotiation_len) {
                Step::Incomplete => return Ok(None),
                Step::Unit(unit, consumed) => {
                    src.advance(consumed);
                    trace!(?unit, consumed, "Decoded unit");
                    return Ok(Some(unit));
                }
                Step::Malformed(error, consumed) => {
                    src.advance(consumed);
                    warn!(%error, discarded = consumed, "Discarding malformed subnegotiation");
                    self.diagnostics.push(error);
                }
            }
        }
    }

    /// Like `decode`, but drops a trailing partial sequence once the stream has ended.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<DecodedUnit>, Self::Error> {
        match self.decode(src)? {
            Some(unit) => Ok(Some(unit)),
            None => {
                if !src.is_empty() {
                    warn!(
                        remaining = src.len(),
                        "Stream ended inside a telnet sequence, dropping it"
                    );
                    src.clear();
                }
                Ok(None)
            }
        }
    }
}

impl Encoder<&[u8]> for TelnetCodec {
    type Error = CodecError;

    /// Encodes display or keyboard bytes, doubling every `IAC`.
    fn encode(&mut self, item: &[u8], dst: &mut BytesMut) -> Result<(), Self::Error> {
        put_escaped(dst, item);
        Ok(())
    }
}

impl Encoder<u8> for TelnetCodec {
    type Error = CodecError;

    fn encode(&mut self, item: u8, dst: &mut BytesMut) -> Result<(), Self::Error> {
        // Encode a raw byte, escaping IAC if necessary
        dst.reserve(2);
        if item == consts::IAC {
            dst.put_u8(consts::IAC);
        }
        dst.put_u8(item);
        Ok(())
    }
}

impl Encoder<TelnetFrame> for TelnetCodec {
    type Error = CodecError;

    /// Encodes a control frame: `IAC <cmd>`, `IAC <verb> <option>` or
    /// `IAC SB <option> <escaped payload> IAC SE`.
    fn encode(&mut self, item: TelnetFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        item.encode(dst);
        Ok(())
    }
}

impl Encoder<TelnetArgument> for TelnetCodec {
    type Error = CodecError;

    fn encode(&mut self, item: TelnetArgument, dst: &mut BytesMut) -> Result<(), Self::Error> {
        item.to_frame()?.encode(dst);
        Ok(())
    }
}

impl Encoder<DecodedUnit> for TelnetCodec {
    type Error = CodecError;

    /// Re-encodes a decoded unit into the wire form it was decoded from.
    fn encode(&mut self, item: DecodedUnit, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            DecodedUnit::Text(text) => put_escaped(dst, &text),
            DecodedUnit::Negotiation(frame) => frame.encode(dst),
        }
        Ok(())
    }
}

/// Output of a single [`decode`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    /// Units in arrival order
    pub units: Vec<DecodedUnit>,
    /// Trailing partial sequence, to be passed back as `carry` with the next buffer
    pub carry: BytesMut,
    /// Malformed spans that were dropped
    pub errors: Vec<CodecError>,
}

/// Decodes `carry` followed by `buffer`.
///
/// This is the buffer-in, buffer-out form of the [`TelnetCodec`] decoder: whatever trailing
/// partial sequence is left comes back as [`Decoded::carry`] and must be handed to the next
/// call.
///
/// # Example
/// ```
/// use bbslink_telnetcodec::{DecodedUnit, decode};
///
/// let first = decode(b"Hi\xFF", &[]);
/// assert_eq!(first.units, vec![DecodedUnit::Text("Hi".into())]);
/// assert_eq!(&first.carry[..], b"\xFF");
///
/// let second = decode(b"\xFF!", &first.carry);
/// assert_eq!(second.units, vec![DecodedUnit::Text(b"\xFF!"[..].into())]);
/// assert!(second.carry.is_empty());
/// ```
pub fn decode(buffer: &[u8], carry: &[u8]) -> Decoded {
    let mut codec = TelnetCodec::new();
    let mut src = BytesMut::with_capacity(carry.len() + buffer.len());
    src.extend_from_slice(carry);
    src.extend_from_slice(buffer);
    let mut units = Vec::new();
    // The decoder only ever fails with I/O errors, which cannot happen on an in-memory buffer.
    while let Ok(Some(unit)) = codec.decode(&mut src) {
        units.push(unit);
    }
    Decoded {
        units,
        carry: src,
        errors: codec.take_diagnostics(),
    }
}

/// Escapes display or keyboard bytes for the wire: every `IAC` is doubled, nothing else changes.
///
/// ```
/// use bbslink_telnetcodec::encode_text;
///
/// assert_eq!(&encode_text(b"A\xFFB")[..], b"A\xFF\xFFB");
/// assert_eq!(&encode_text(b"line\n")[..], b"line\n");
/// ```
pub fn encode_text(text: &[u8]) -> Bytes {
    let mut dst = BytesMut::new();
    put_escaped(&mut dst, text);
    dst.freeze()
}

/// Serializes a negotiation frame.
///
/// ```
/// use bbslink_telnetcodec::{TelnetFrame, TelnetOption, encode_negotiation};
///
/// assert_eq!(&encode_negotiation(&TelnetFrame::Wont(TelnetOption::Echo))[..], &[255, 252, 1]);
/// ```
pub fn encode_negotiation(frame: &TelnetFrame) -> Bytes {
    let mut dst = BytesMut::with_capacity(frame.encoded_len());
    frame.encode(&mut dst);
    dst.freeze()
}

enum Step {
    /// A complete unit and the number of source bytes it used
    Unit(DecodedUnit, usize),
    /// A malformed span to drop
    Malformed(CodecError, usize),
    /// More input is needed
    Incomplete,
}

fn next_step(src: &[u8], max_subnegotiation_len: usize) -> Step {
    let (text, consumed) = scan_text(src);
    if consumed > 0 {
        return Step::Unit(DecodedUnit::Text(text.freeze()), consumed);
    }
    // Either src is empty or it starts with IAC followed by something other than IAC.
    match src.get(1) {
        None => Step::Incomplete,
        Some(&verb @ (consts::DO | consts::DONT | consts::WILL | consts::WONT)) => {
            match src.get(2) {
                None => Step::Incomplete,
                Some(&option) => {
                    let option = TelnetOption::from_u8(option);
                    let frame = match verb {
                        consts::DO => TelnetFrame::Do(option),
                        consts::DONT => TelnetFrame::Dont(option),
                        consts::WILL => TelnetFrame::Will(option),
                        _ => TelnetFrame::Wont(option),
                    };
                    Step::Unit(DecodedUnit::Negotiation(frame), 3)
                }
            }
        }
        Some(&consts::SB) => scan_subnegotiation(src, max_subnegotiation_len),
        Some(&command) => Step::Unit(
            DecodedUnit::Negotiation(TelnetFrame::Command(TelnetCommand::from_u8(command))),
            2,
        ),
    }
}

/// Collects display bytes from the front of `src` up to the first control sequence.
fn scan_text(src: &[u8]) -> (BytesMut, usize) {
    let mut text = BytesMut::new();
    let mut index = 0;
    while index < src.len() {
        match src[index..].iter().position(|byte| *byte == consts::IAC) {
            None => {
                text.extend_from_slice(&src[index..]);
                index = src.len();
            }
            Some(offset) => {
                text.extend_from_slice(&src[index..index + offset]);
                index += offset;
                if src.get(index + 1) == Some(&consts::IAC) {
                    text.put_u8(consts::IAC);
                    index += 2;
                } else {
                    break;
                }
            }
        }
    }
    (text, index)
}

/// Scans `IAC SB <option> <payload> IAC SE` from the front of `src`.
fn scan_subnegotiation(src: &[u8], limit: usize) -> Step {
    let Some(&option) = src.get(2) else {
        return Step::Incomplete;
    };
    let option = TelnetOption::from_u8(option);
    let mut payload = BytesMut::new();
    let mut index = 3;
    loop {
        if payload.len() > limit {
            return Step::Malformed(
                CodecError::subnegotiation(option, SubnegotiationErrorKind::Unterminated { limit }),
                index,
            );
        }
        match (src.get(index), src.get(index + 1)) {
            (None, _) | (Some(&consts::IAC), None) => return Step::Incomplete,
            (Some(&consts::IAC), Some(&consts::IAC)) => {
                payload.put_u8(consts::IAC);
                index += 2;
            }
            (Some(&consts::IAC), Some(&consts::SE)) => {
                let frame = TelnetFrame::Subnegotiate(option, payload.freeze());
                return Step::Unit(DecodedUnit::Negotiation(frame), index + 2);
            }
            (Some(&consts::IAC), Some(&command)) => {
                // Resume at the IAC so the embedded command is still decoded.
                return Step::Malformed(
                    CodecError::subnegotiation(
                        option,
                        SubnegotiationErrorKind::UnexpectedCommand { command },
                    ),
                    index,
                );
            }
            (Some(&byte), _) => {
                payload.put_u8(byte);
                index += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(codec: &mut TelnetCodec, src: &mut BytesMut) -> Vec<DecodedUnit> {
        let mut units = Vec::new();
        while let Some(unit) = codec.decode(src).unwrap() {
            units.push(unit);
        }
        units
    }

    fn text(bytes: &[u8]) -> DecodedUnit {
        DecodedUnit::Text(Bytes::copy_from_slice(bytes))
    }

    #[test]
    fn test_escaped_iac_inside_text_is_one_unit() {
        let decoded = decode(&[0x41, 0xFF, 0xFF, 0x42], &[]);
        assert_eq!(decoded.units, vec![text(&[0x41, 0xFF, 0x42])]);
        assert!(decoded.carry.is_empty());
    }

    #[test]
    fn test_text_runs_split_at_commands() {
        let mut codec = TelnetCodec::new();
        let mut src = BytesMut::from(&b"Login:\xFF\xFD\x18Password:"[..]);
        assert_eq!(
            decode_all(&mut codec, &mut src),
            vec![
                text(b"Login:"),
                DecodedUnit::Negotiation(TelnetFrame::Do(TelnetOption::TTYPE)),
                text(b"Password:"),
            ]
        );
        assert!(src.is_empty());
    }

    #[test]
    fn test_lone_iac_is_carried() {
        let decoded = decode(b"abc\xFF", &[]);
        assert_eq!(decoded.units, vec![text(b"abc")]);
        assert_eq!(&decoded.carry[..], &[0xFF]);

        let decoded = decode(&[0xFB, 0x01], &decoded.carry);
        assert_eq!(
            decoded.units,
            vec![DecodedUnit::Negotiation(TelnetFrame::Will(TelnetOption::Echo))]
        );
        assert!(decoded.carry.is_empty());
    }

    #[test]
    fn test_negotiation_without_option_is_carried() {
        let decoded = decode(&[0xFF, 0xFD], &[]);
        assert!(decoded.units.is_empty());
        assert_eq!(&decoded.carry[..], &[0xFF, 0xFD]);
    }

    #[test]
    fn test_unknown_command_is_surfaced() {
        let decoded = decode(&[0xFF, 0x80, b'x'], &[]);
        assert_eq!(
            decoded.units,
            vec![
                DecodedUnit::Negotiation(TelnetFrame::Command(TelnetCommand::Unknown(0x80))),
                text(b"x"),
            ]
        );
    }

    #[test]
    fn test_go_ahead_command() {
        let decoded = decode(b"> \xFF\xF9", &[]);
        assert_eq!(
            decoded.units,
            vec![
                text(b"> "),
                DecodedUnit::Negotiation(TelnetFrame::Command(TelnetCommand::GoAhead)),
            ]
        );
    }

    #[test]
    fn test_subnegotiation_unescapes_payload() {
        let decoded = decode(&[0xFF, 0xFA, 0x1F, 0x00, 0xFF, 0xFF, 0x00, 0x18, 0xFF, 0xF0], &[]);
        assert_eq!(
            decoded.units,
            vec![DecodedUnit::Negotiation(TelnetFrame::Subnegotiate(
                TelnetOption::NAWS,
                Bytes::from_static(&[0x00, 0xFF, 0x00, 0x18]),
            ))]
        );
    }

    #[test]
    fn test_partial_subnegotiation_is_carried() {
        let decoded = decode(&[0xFF, 0xFA, 0x18, 0x01, 0xFF], &[]);
        assert!(decoded.units.is_empty());
        assert_eq!(decoded.carry.len(), 5);

        let decoded = decode(&[0xF0, b'o', b'k'], &decoded.carry);
        assert_eq!(
            decoded.units,
            vec![
                DecodedUnit::Negotiation(TelnetFrame::Subnegotiate(
                    TelnetOption::TTYPE,
                    Bytes::from_static(&[0x01]),
                )),
                text(b"ok"),
            ]
        );
    }

    #[test]
    fn test_command_inside_subnegotiation_drops_span() {
        let mut codec = TelnetCodec::new();
        let mut src = BytesMut::from(&[0xFF, 0xFA, 0x18, 0x01, 0xFF, 0xFB, 0x01, b'A'][..]);
        assert_eq!(
            decode_all(&mut codec, &mut src),
            vec![
                DecodedUnit::Negotiation(TelnetFrame::Will(TelnetOption::Echo)),
                text(b"A"),
            ]
        );
        assert_eq!(
            codec.take_diagnostics(),
            vec![CodecError::subnegotiation(
                TelnetOption::TTYPE,
                SubnegotiationErrorKind::UnexpectedCommand { command: 0xFB }
            )]
        );
        assert!(codec.take_diagnostics().is_empty());
    }

    #[test]
    fn test_unterminated_subnegotiation_is_bounded() {
        let mut codec = TelnetCodec::with_max_subnegotiation_len(4);
        let mut src = BytesMut::from(&[0xFF, 0xFA, 0xC9, b'a', b'b', b'c', b'd', b'e', b'f'][..]);
        let units = decode_all(&mut codec, &mut src);
        assert_eq!(units, vec![text(b"f")]);
        assert_eq!(
            codec.take_diagnostics(),
            vec![CodecError::subnegotiation(
                TelnetOption::GMCP,
                SubnegotiationErrorKind::Unterminated { limit: 4 }
            )]
        );
    }

    #[test]
    fn test_subnegotiation_within_bound_waits() {
        let mut codec = TelnetCodec::with_max_subnegotiation_len(4);
        let mut src = BytesMut::from(&[0xFF, 0xFA, 0xC9, b'a', b'b', b'c', b'd'][..]);
        assert!(decode_all(&mut codec, &mut src).is_empty());
        assert_eq!(src.len(), 7);
        assert!(codec.take_diagnostics().is_empty());
    }

    #[test]
    fn test_decode_eof_drops_partial_sequence() {
        let mut codec = TelnetCodec::new();
        let mut src = BytesMut::from(&[0xFF, 0xFA][..]);
        assert_eq!(codec.decode_eof(&mut src).unwrap(), None);
        assert!(src.is_empty());
    }

    #[test]
    fn test_encode_text_only_doubles_iac() {
        assert_eq!(&encode_text(&[0x41, 0xFF, 0x0D, 0x0A])[..], &[0x41, 0xFF, 0xFF, 0x0D, 0x0A]);
        assert!(encode_text(&[]).is_empty());
    }

    #[test]
    fn test_encoder_impls() {
        let mut codec = TelnetCodec::new();
        let mut dst = BytesMut::new();
        codec.encode(&b"hi\xFF"[..], &mut dst).unwrap();
        codec.encode(TelnetFrame::Will(TelnetOption::NAWS), &mut dst).unwrap();
        codec.encode(0xFFu8, &mut dst).unwrap();
        assert_eq!(&dst[..], b"hi\xFF\xFF\xFF\xFB\x1F\xFF\xFF");
    }
}
