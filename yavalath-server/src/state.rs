//! Server state management
//!
//! One game session shared by all handlers, plus the channel to the move
//! worker when the computer plays.

use std::sync::{RwLock, RwLockWriteGuard};

use tokio::sync::mpsc::UnboundedSender;
use yavalath_core::{MoveRequest, Session};

/// Server-wide shared state
pub struct ServerState {
    session: RwLock<Session>,
    pub show_numbers: bool,
    requests: Option<UnboundedSender<MoveRequest>>,
}

impl ServerState {
    pub fn new(session: Session, show_numbers: bool) -> Self {
        Self {
            session: RwLock::new(session),
            show_numbers,
            requests: None,
        }
    }

    /// Route computer move requests to a worker
    pub fn with_worker(mut self, requests: UnboundedSender<MoveRequest>) -> Self {
        self.requests = Some(requests);
        self
    }

    pub fn has_worker(&self) -> bool {
        self.requests.is_some()
    }

    /// Lock the session for one transition
    pub fn session(&self) -> RwLockWriteGuard<'_, Session> {
        self.session
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Forward a move request to the worker, if there is one
    pub fn dispatch(&self, request: Option<MoveRequest>) {
        let Some(request) = request else {
            return;
        };
        match &self.requests {
            Some(requests) => {
                tracing::debug!("Requesting computer move for {}", request.token);
                if requests.send(request).is_err() {
                    tracing::warn!("Move worker has stopped, request dropped");
                }
            }
            None => tracing::debug!("No move worker, request {} dropped", request.generation),
        }
    }
}
