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

//! Client configuration

use bbslink_telnetcodec::naws::WindowSize;
use bbslink_telnetcodec::{DEFAULT_MAX_SUBNEGOTIATION_LEN, NegotiationConfig, TelnetOption};
use std::time::Duration;

/// Telnet client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server hostname or IP address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Terminal types to report, in order of preference (e.g., "xterm", "ansi")
    pub terminal_types: Vec<String>,

    /// Terminal width in columns
    pub terminal_width: u16,

    /// Terminal height in rows
    pub terminal_height: u16,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// How long to wait for the server to answer an option request
    pub negotiation_timeout: Duration,

    /// Buffer size for incoming data
    pub buffer_size: usize,

    /// Longest subnegotiation payload accepted before it is dropped as malformed
    pub max_subnegotiation_len: usize,

    /// Options the server may not perform, on top of the default policy
    pub refused_remote_options: Vec<TelnetOption>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 23,
            terminal_types: vec!["xterm".to_string()],
            terminal_width: 80,
            terminal_height: 24,
            connect_timeout: Duration::from_secs(10),
            negotiation_timeout: Duration::from_secs(5),
            buffer_size: 8192,
            max_subnegotiation_len: DEFAULT_MAX_SUBNEGOTIATION_LEN,
            refused_remote_options: Vec::new(),
        }
    }
}

impl ClientConfig {
    /// Create a new client configuration with the given host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Set a single terminal type
    pub fn with_terminal_type(mut self, terminal_type: impl Into<String>) -> Self {
        self.terminal_types = vec![terminal_type.into()];
        self
    }

    /// Set the terminal types offered one after another on repeated `TTYPE SEND`
    pub fn with_terminal_types<I, S>(mut self, terminal_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terminal_types = terminal_types.into_iter().map(Into::into).collect();
        self
    }

    /// Set the terminal size
    pub fn with_terminal_size(mut self, width: u16, height: u16) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the negotiation timeout
    pub fn with_negotiation_timeout(mut self, timeout: Duration) -> Self {
        self.negotiation_timeout = timeout;
        self
    }

    /// Set the read buffer size
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Set the subnegotiation lookahead bound
    pub fn with_max_subnegotiation_len(mut self, limit: usize) -> Self {
        self.max_subnegotiation_len = limit;
        self
    }

    /// Refuse the server's offer to perform `option`, for example to keep local echo
    pub fn without_remote_option(mut self, option: TelnetOption) -> Self {
        if !self.refused_remote_options.contains(&option) {
            self.refused_remote_options.push(option);
        }
        self
    }

    /// Get the server address as a string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The window size reported when the session starts
    pub fn window_size(&self) -> WindowSize {
        WindowSize::new(self.terminal_width, self.terminal_height)
    }

    /// Negotiation policy derived from this configuration
    pub fn negotiation_config(&self) -> NegotiationConfig {
        self.refused_remote_options.iter().fold(
            NegotiationConfig::default()
                .with_terminal_types(self.terminal_types.iter().cloned())
                .with_timeout(self.negotiation_timeout),
            |negotiation, option| negotiation.without_remote_option(*option),
        )
    }
}
