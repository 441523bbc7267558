//! Transport worker: owns the HTTP client on its own thread so the UI
//! loop never blocks on the network. Commands arrive over a channel, one
//! request runs at a time, and completions flow back as discrete replies
//! the event loop drains between frames.

use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use ovenpilot_client::{ClientError, OvenClient};
use ovenpilot_protocol::{ChartData, MessageReply, RunRequest, StatusQuery, StatusReply};
use tracing::debug;

/// Requests the UI hands to the worker.
#[derive(Debug)]
pub enum Command {
    Poll(StatusQuery),
    Run(RunRequest),
    Kill,
    ClearStatus,
    FetchChartData,
    Shutdown,
}

/// Completions flowing back into the event loop.
#[derive(Debug)]
pub enum Reply {
    Status(Result<StatusReply, ClientError>),
    Run(Result<MessageReply, ClientError>),
    Kill(Result<MessageReply, ClientError>),
    Clear(Result<MessageReply, ClientError>),
    ChartData(Result<ChartData, ClientError>),
}

/// Spawn the worker thread with a single-threaded tokio runtime.
pub fn spawn(
    client: OvenClient,
    commands: Receiver<Command>,
    replies: Sender<Reply>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(error) => {
                debug!(%error, "transport runtime failed to start");
                return;
            }
        };

        for command in commands {
            let reply = match command {
                Command::Poll(query) => Reply::Status(runtime.block_on(client.status(query))),
                Command::Run(request) => Reply::Run(runtime.block_on(client.run(&request))),
                Command::Kill => Reply::Kill(runtime.block_on(client.kill())),
                Command::ClearStatus => Reply::Clear(runtime.block_on(client.clear_status())),
                Command::FetchChartData => {
                    Reply::ChartData(runtime.block_on(client.chart_data()))
                }
                Command::Shutdown => break,
            };
            if replies.send(reply).is_err() {
                break;
            }
        }
    })
}
