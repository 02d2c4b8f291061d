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
use thiserror::Error;

/// Result Type for Codec Operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Represents possible errors that can occur in the codec handling process.
///
/// None of these are fatal to a telnet session: the decoder reports a malformed span, drops it
/// and keeps decoding.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum CodecError {
    /// An I/O error occurred while reading from or writing to the underlying stream.
    ///
    /// Contains the error kind and a description of what operation failed.
    #[error("I/O error during {operation}: {kind:?}")]
    IOError {
        /// The kind of I/O error that occurred
        kind: std::io::ErrorKind,
        /// Description of the operation that failed
        operation: String,
    },

    /// Error occurred during telnet option subnegotiation.
    ///
    /// Returned when a subnegotiation span is malformed or its payload cannot be parsed.
    #[error("Subnegotiation error for option {option}: {reason}")]
    SubnegotiationError {
        /// The telnet option being subnegotiated
        option: TelnetOption,
        /// Specific reason for the failure
        reason: SubnegotiationErrorKind,
    },
}

/// Specific kinds of subnegotiation errors with structured context.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SubnegotiationErrorKind {
    /// No `IAC SE` was found within the lookahead bound.
    #[error("no IAC SE within {limit} bytes")]
    Unterminated {
        /// The lookahead bound that was exceeded
        limit: usize,
    },

    /// An `IAC` followed by something other than `IAC` or `SE` inside the span.
    #[error("unexpected command 0x{command:02X} inside subnegotiation")]
    UnexpectedCommand {
        /// The command byte that followed `IAC`
        command: u8,
    },

    /// Insufficient data available to decode the subnegotiation.
    #[error("insufficient data (required: {required}, available: {available})")]
    InsufficientData {
        /// Number of bytes required
        required: usize,
        /// Number of bytes available
        available: usize,
    },

    /// Invalid command byte in the subnegotiation data.
    #[error("invalid command 0x{command:02X} (expected one of: {expected:?})")]
    InvalidCommand {
        /// The invalid command byte
        command: u8,
        /// Expected command bytes
        expected: Vec<u8>,
    },
}

impl CodecError {
    /// Shorthand for a [`CodecError::SubnegotiationError`].
    pub fn subnegotiation(option: TelnetOption, reason: SubnegotiationErrorKind) -> Self {
        CodecError::SubnegotiationError { option, reason }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::IOError {
            kind: err.kind(),
            operation: err.to_string(),
        }
    }
}
