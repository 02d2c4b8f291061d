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

//! Session observer hooks

use crate::TextChunk;
use bbslink_telnetcodec::{
    CodecError, NegotiationStatus, TelnetArgument, TelnetCommand, TelnetOption, TelnetSide,
};

/// Session observer trait
///
/// Implement this trait to watch what a session does with the incoming stream. Every method
/// has a default implementation that does nothing. Methods are called synchronously from
/// inside [`TelnetSession::feed`](crate::TelnetSession::feed) and the other engine calls, in
/// the order the underlying bytes arrived.
///
/// # Example
///
/// ```
/// use bbslink_client::{SessionObserver, TextChunk};
///
/// /// Watches for a board's editor prompt.
/// struct EditorSpotter {
///     seen: bool,
/// }
///
/// impl SessionObserver for EditorSpotter {
///     fn on_text(&mut self, text: &TextChunk) {
///         if text.to_text_lossy().contains("Enter message text") {
///             self.seen = true;
///         }
///     }
/// }
/// ```
pub trait SessionObserver: Send {
    /// Called for every chunk of display text
    fn on_text(&mut self, _text: &TextChunk) {}

    /// Called when one side of an option changes negotiation status
    fn on_option_changed(
        &mut self,
        _option: TelnetOption,
        _side: TelnetSide,
        _status: NegotiationStatus,
    ) {
    }

    /// Called when the server sends a two-byte command such as `GA`, `NOP` or `AYT`
    fn on_command(&mut self, _command: TelnetCommand) {}

    /// Called when a complete subnegotiation is received
    fn on_subnegotiation(&mut self, _argument: &TelnetArgument) {}

    /// Called when malformed input was dropped from the stream
    fn on_diagnostic(&mut self, _error: &CodecError) {}
}

/// Callback-based observer implementation
///
/// This provides a way to observe a session with closures instead of implementing the
/// `SessionObserver` trait.
///
/// # Example
///
/// ```
/// use bbslink_client::CallbackObserver;
///
/// let observer = CallbackObserver {
///     on_text: Some(Box::new(|text| print!("{text}"))),
///     ..Default::default()
/// };
/// ```
#[derive(Default)]
pub struct CallbackObserver {
    /// Called on display text
    pub on_text: Option<Box<dyn FnMut(&TextChunk) + Send + 'static>>,

    /// Called on option status change
    pub on_option_changed:
        Option<Box<dyn FnMut(TelnetOption, TelnetSide, NegotiationStatus) + Send + 'static>>,

    /// Called on telnet command
    pub on_command: Option<Box<dyn FnMut(TelnetCommand) + Send + 'static>>,

    /// Called on subnegotiation
    pub on_subnegotiation: Option<Box<dyn FnMut(&TelnetArgument) + Send + 'static>>,

    /// Called on dropped input
    pub on_diagnostic: Option<Box<dyn FnMut(&CodecError) + Send + 'static>>,
}

impl SessionObserver for CallbackObserver {
    fn on_text(&mut self, text: &TextChunk) {
        if let Some(ref mut f) = self.on_text {
            f(text);
        }
    }

    fn on_option_changed(
        &mut self,
        option: TelnetOption,
        side: TelnetSide,
        status: NegotiationStatus,
    ) {
        if let Some(ref mut f) = self.on_option_changed {
            f(option, side, status);
        }
    }

    fn on_command(&mut self, command: TelnetCommand) {
        if let Some(ref mut f) = self.on_command {
            f(command);
        }
    }

    fn on_subnegotiation(&mut self, argument: &TelnetArgument) {
        if let Some(ref mut f) = self.on_subnegotiation {
            f(argument);
        }
    }

    fn on_diagnostic(&mut self, error: &CodecError) {
        if let Some(ref mut f) = self.on_diagnostic {
            f(error);
        }
    }
}

impl std::fmt::Debug for CallbackObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackObserver")
            .field("on_text", &self.on_text.is_some())
            .field("on_option_changed", &self.on_option_changed.is_some())
            .field("on_command", &self.on_command.is_some())
            .field("on_subnegotiation", &self.on_subnegotiation.is_some())
            .field("on_diagnostic", &self.on_diagnostic.is_some())
            .finish()
    }
}
