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

//! Client error types

use std::io;
use thiserror::Error;

/// Client result type
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors surfaced by a telnet session.
///
/// Protocol problems in the incoming stream are not errors: they are logged, reported to the
/// [`SessionObserver`](crate::SessionObserver) and skipped.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The transport failed to connect, read or write
    #[error("Connection error: {0}")]
    Connection(#[from] io::Error),

    /// The server did not accept the connection in time
    #[error("Timed out connecting to {0}")]
    ConnectTimeout(String),

    /// The session has been closed
    #[error("Session closed")]
    Closed,
}

impl SessionError {
    /// Check if the error is a connection error
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            SessionError::Connection(_) | SessionError::ConnectTimeout(_)
        )
    }

    /// Check if the error was caused by using a closed session
    pub fn is_closed(&self) -> bool {
        matches!(self, SessionError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_connection_error() {
        let refused = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        assert!(SessionError::from(refused).is_connection_error());
        assert!(SessionError::ConnectTimeout("bbs:23".into()).is_connection_error());
        assert!(!SessionError::Closed.is_connection_error());
    }

    #[test]
    fn test_error_is_closed() {
        assert!(SessionError::Closed.is_closed());
        assert!(!SessionError::ConnectTimeout("bbs:23".into()).is_closed());
    }

    #[test]
    fn test_error_display() {
        let err = SessionError::ConnectTimeout("bbs.example.org:23".into());
        assert_eq!(err.to_string(), "Timed out connecting to bbs.example.org:23");
        assert_eq!(SessionError::Closed.to_string(), "Session closed");
    }
}
