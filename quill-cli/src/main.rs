//! Quill CLI
//!
//! Drives one editable surface over stdin/stdout, one JSON object per line.
//!
//! Requests (`op`):
//! - open: load text, regions, triggers and argument sources
//! - select / deselect: move the selection
//! - set_arg: change an argument source's input value
//! - click: activate a trigger; the response is the outcome event
//! - list: registered modifiers
//! - text: current text, selection and regions
//!
//! Logs go to stderr; the filter is read from `QUILL_LOG` (default `info`).

mod protocol;
mod session;

use protocol::{Request, Response};
use quill::Quill;
use session::Session;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "QUILL_LOG";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::io::Result<()> {
    init_logging();
    info!(version = SERVER_VERSION, "quill-cli started");

    let mut session = Session::new(Quill::with_standard_library());
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!(bytes = line.len(), "request received");

        let response = match serde_json::from_str::<Request>(line) {
            Ok(request) => match session.handle(request).await {
                Ok(result) => Response::ok(result),
                Err(e) => {
                    warn!(error = %e, "request failed");
                    Response::err(e)
                }
            },
            Err(e) => {
                warn!(error = %e, "unparseable request");
                Response::err(protocol::CliError::Parse(e))
            }
        };

        let mut out = match serde_json::to_string(&response) {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "failed to serialize response");
                continue;
            }
        };
        out.push('\n');
        stdout.write_all(out.as_bytes()).await?;
        stdout.flush().await?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}
