//! Background move worker
//!
//! The computer player runs in its own task. Requests go in over one
//! channel; the worker announces itself with [`WorkerMessage::Ready`] and
//! then answers each request with a [`WorkerMessage::Move`].

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use yavalath_core::{Cell, MoveReply, MoveRequest, MoveSource};

use crate::state::ServerState;

/// Messages from the worker
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerMessage {
    Ready,
    Move(MoveReply),
}

/// Handle to a running move worker
pub struct MoveWorker {
    requests: UnboundedSender<MoveRequest>,
    messages: UnboundedReceiver<WorkerMessage>,
}

impl MoveWorker {
    /// Wait for the worker's ready signal
    pub async fn ready(&mut self) -> Result<()> {
        match self.messages.recv().await {
            Some(WorkerMessage::Ready) => Ok(()),
            Some(other) => bail!("Move worker sent {:?} before ready", other),
            None => bail!("Move worker exited before ready"),
        }
    }

    pub fn into_parts(self) -> (UnboundedSender<MoveRequest>, UnboundedReceiver<WorkerMessage>) {
        (self.requests, self.messages)
    }
}

/// Spawn a worker task that answers move requests with `source`
pub fn spawn_move_worker<S>(source: S) -> MoveWorker
where
    S: MoveSource + 'static,
{
    let (request_tx, mut request_rx) = mpsc::unbounded_channel::<MoveRequest>();
    let (message_tx, message_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        if message_tx.send(WorkerMessage::Ready).is_err() {
            return;
        }
        let mut source = source;
        while let Some(request) = request_rx.recv().await {
            let (returned, cell) = match choose(source, request).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!("Move worker failed: {:#}", e);
                    return;
                }
            };
            source = returned;

            let Some(cell) = cell else {
                tracing::info!("No move available for {}", request.token);
                continue;
            };
            let reply = MoveReply {
                generation: request.generation,
                cell,
            };
            if message_tx.send(WorkerMessage::Move(reply)).is_err() {
                return;
            }
        }
    });

    MoveWorker {
        requests: request_tx,
        messages: message_rx,
    }
}

/// Run the move search off the async threads
async fn choose<S>(mut source: S, request: MoveRequest) -> Result<(S, Option<Cell>)>
where
    S: MoveSource + 'static,
{
    tokio::task::spawn_blocking(move || {
        let cell = source.choose_move(&request.token);
        (source, cell)
    })
    .await
    .context("Move search panicked")
}

/// Apply worker replies to the shared session as they arrive
pub fn spawn_reply_pump(
    state: Arc<ServerState>,
    mut messages: UnboundedReceiver<WorkerMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(message) = messages.recv().await {
            let WorkerMessage::Move(reply) = message else {
                continue;
            };
            let next = {
                let mut session = state.session();
                match session.receive_move(reply) {
                    Ok(next) => {
                        tracing::info!("Computer plays cell {}", reply.cell);
                        next
                    }
                    Err(e) => {
                        tracing::debug!("Discarding computer move: {}", e);
                        None
                    }
                }
            };
            state.dispatch(next);
        }
    })
}
