use std::sync::Arc;
use std::thread::JoinHandle;

use arc_swap::ArcSwap;
use tokio::sync::mpsc;

use crate::client::GameClient;
use crate::error::ClientError;
use crate::protocol::TurnRequest;
use crate::state::State;

/// Work the UI hands to the network thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    Start,
    Turn(TurnRequest),
    CommandOptions(String),
}

#[derive(Debug, PartialEq, Eq)]
pub enum ExitResult {
    /// The UI dropped its end of the channel.
    Closed,
}

pub struct ServerConnection {
    pub last_state: Arc<ArcSwap<State>>,
    pub request_tx: mpsc::UnboundedSender<Request>,
    pub join_handle: JoinHandle<ExitResult>,
}

/// Fetch the title, then serve requests one at a time until the sender side
/// goes away. Only this task writes `last_state`.
pub async fn run_session(
    client: GameClient,
    last_state: Arc<ArcSwap<State>>,
    mut rx: mpsc::UnboundedReceiver<Request>,
) -> ExitResult {
    match client.title().await {
        Ok(title) => {
            tracing::info!("Connected to {}: {}", client.base(), title);
            last_state.store(last_state.load().with_title(title).into());
        }
        Err(e) => {
            tracing::error!("Error fetching title: {}", e);
        }
    }

    while let Some(request) = rx.recv().await {
        last_state.store(last_state.load().waiting().into());
        match request {
            Request::Start => {
                let result = client.send_turn(&TurnRequest::start()).await;
                log_failure("start", &result);
                last_state.store(last_state.load().after_start(&result).into());
            }
            Request::Turn(turn) => {
                tracing::info!("Sending {} {:?}", turn.command, turn.args);
                let result = client.send_turn(&turn).await;
                log_failure(&turn.command, &result);
                last_state.store(last_state.load().after_turn(&result).into());
            }
            Request::CommandOptions(command) => {
                let next = match client.command_options(&command).await {
                    Ok(args) => {
                        tracing::debug!("{} options: {:?}", command, args);
                        last_state.load().with_command_options(&command, args)
                    }
                    Err(e) => {
                        tracing::warn!("Keeping built-in options for {}: {}", command, e);
                        last_state.load().idle()
                    }
                };
                last_state.store(next.into());
            }
        }
    }

    tracing::info!("Request channel closed, network thread exiting");
    ExitResult::Closed
}

fn log_failure<T>(what: &str, result: &Result<T, ClientError>) {
    if let Err(e) = result {
        tracing::error!("Error sending {}: {}", what, e);
    }
}

impl ServerConnection {
    #[tokio::main]
    pub async fn start_thread(
        client: GameClient,
        last_state: Arc<ArcSwap<State>>,
        rx: mpsc::UnboundedReceiver<Request>,
    ) -> ExitResult {
        run_session(client, last_state, rx).await
    }

    pub fn send(&self, request: Request) -> Result<(), mpsc::error::SendError<Request>> {
        self.request_tx.send(request)
    }

    pub fn new(client: GameClient) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let last_state = Arc::new(ArcSwap::from_pointee(State::default()));
        let thread_state = Arc::clone(&last_state);
        let join_handle = std::thread::spawn(move || Self::start_thread(client, thread_state, rx));

        Self {
            last_state,
            request_tx: tx,
            join_handle,
        }
    }
}
