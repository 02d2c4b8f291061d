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

//! # Telnet Client Example
//!
//! Connects to a BBS, prints what it sends and forwards what you type. It shows:
//!
//! - Opening a session with a custom configuration
//! - Watching option negotiation through an observer
//! - Sending user input line by line
//! - Expiring unanswered negotiation requests
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example telnet_client -- bbs.example.org 23
//! ```
//!
//! Set `RUST_LOG=debug` to see each negotiation step.

use bbslink_client::{
    ClientConfig, CodecError, NegotiationStatus, Session, SessionObserver, TelnetCommand,
    TelnetOption, TelnetSide,
};
use std::io::{self, Write};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// Logs what the negotiation layer does
struct NegotiationLogger;

impl SessionObserver for NegotiationLogger {
    fn on_option_changed(&mut self, option: TelnetOption, side: TelnetSide, status: NegotiationStatus) {
        debug!("Option {} ({}) is now {}", option, side, status);
    }

    fn on_command(&mut self, command: TelnetCommand) {
        debug!("Server sent {}", command);
    }

    fn on_diagnostic(&mut self, error: &CodecError) {
        warn!("Dropped malformed input: {}", error);
    }
}

/// Parse command line arguments
fn parse_args() -> ClientConfig {
    let args: Vec<String> = std::env::args().collect();

    let host = args.get(1).map(|s| s.as_str()).unwrap_or("localhost");
    let port: u16 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(23);

    ClientConfig::new(host, port)
        .with_terminal_types(["ansi", "xterm"])
        .with_terminal_size(80, 25)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = parse_args();

    println!("BBSLink Telnet Client");
    println!("=====================");
    println!("Connecting to: {}", config.address());
    println!("Terminal types: {}", config.terminal_types.join(", "));
    println!("Terminal size: {}x{}", config.terminal_width, config.terminal_height);
    println!();

    let mut session = Session::open(config).await?;
    session.set_observer(NegotiationLogger);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    let mut stdin_open = true;

    loop {
        tokio::select! {
            read = session.read() => match read? {
                Some(chunks) => {
                    let mut stdout = io::stdout().lock();
                    for chunk in chunks {
                        stdout.write_all(chunk.to_text_lossy().as_bytes())?;
                    }
                    stdout.flush()?;
                }
                None => {
                    println!("\n[Disconnected by server]");
                    break;
                }
            },
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => session.send_line(&line).await?,
                None => stdin_open = false,
            },
            _ = ticker.tick() => session.tick()?,
            _ = tokio::signal::ctrl_c() => {
                println!("\n\nReceived Ctrl+C, disconnecting...");
                session.close();
                break;
            }
        }
    }

    info!("Client finished");
    Ok(())
}
