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

//! # BBSLink Telnet Client
//!
//! Session layer of a telnet BBS client: negotiates the telnet options a BBS expects (window
//! size, terminal type, suppress-go-ahead, echo) and hands the application clean display text.
//!
//! ## Features
//!
//! - **Sans-IO engine** - [`TelnetSession`] turns received bytes into text and replies without
//!   touching a socket, so it can be driven from any event loop or from tests
//! - **Async transport** - [`Session`] binds the engine to a Tokio `TcpStream` or any other
//!   `AsyncRead + AsyncWrite` stream
//! - **Key mapping** - [`Key`] produces the VT100 sequences BBS software expects
//! - **Observer hooks** - [`SessionObserver`] sees text, option changes, commands and dropped
//!   input as they happen
//!
//! ## Quick Start
//!
//! ```no_run
//! use bbslink_client::{ClientConfig, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("bbs.example.org", 23)
//!         .with_terminal_type("ansi")
//!         .with_terminal_size(80, 25);
//!
//!     let mut session = Session::open(config).await?;
//!     while let Some(chunks) = session.read().await? {
//!         for chunk in chunks {
//!             print!("{}", chunk.to_text_lossy());
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Sending Data
//!
//! ```no_run
//! # use bbslink_client::{Key, Session};
//! # async fn example(session: &mut Session<tokio::net::TcpStream>) -> bbslink_client::Result<()> {
//! // Send a line (appends CR)
//! session.send_line("guest").await?;
//!
//! // Send a navigation key
//! session.send_key(Key::Down).await?;
//!
//! // Tell the server the terminal was resized
//! session.report_window_size(50, 132).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, future_incompatible, rust_2018_idioms)]

mod config;
mod connection;
mod error;
mod handler;
mod keys;
mod session;
mod text;

pub use config::ClientConfig;
pub use connection::Session;
pub use error::{Result, SessionError};
pub use handler::{CallbackObserver, SessionObserver};
pub use keys::Key;
pub use session::TelnetSession;
pub use text::TextChunk;

// Re-export types from bbslink_telnetcodec
pub use bbslink_telnetcodec::{
    CodecError, NegotiationStatus, OptionState, SubnegotiationErrorKind, TelnetArgument,
    TelnetCommand, TelnetOption, TelnetSide, naws, ttype,
};
