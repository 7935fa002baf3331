//! Hand-off of session events from runner threads to the async network side.
//!
//! Runner threads call [`Emitter::emit`], which only enqueues on an unbounded
//! tokio channel and therefore never blocks. The network side owns the
//! receiving end, either directly via [`EmissionBridge::channel`] or through
//! a drain task started by [`EmissionBridge::attach`]. Events from one
//! emitter are delivered in the order they were emitted.

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::error::BridgeError;
use crate::event::{Envelope, GameEvent};

#[derive(Debug, Clone)]
pub struct EmissionBridge {
    tx: UnboundedSender<Envelope>,
}

impl EmissionBridge {
    /// Bridge plus the receiver the network side drains itself
    pub fn channel() -> (Self, UnboundedReceiver<Envelope>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Bridge whose events are handed to `callback` by a task on `handle`.
    ///
    /// The task ends once every emitter and the bridge itself are dropped.
    pub fn attach<F>(handle: &Handle, mut callback: F) -> (Self, JoinHandle<()>)
    where
        F: FnMut(Envelope) + Send + 'static,
    {
        let (bridge, mut rx) = Self::channel();
        let task = handle.spawn(async move {
            while let Some(envelope) = rx.recv().await {
                trace!(session_id = %envelope.session_id, kind = envelope.event.kind(), "delivering event");
                callback(envelope);
            }
            debug!("emission bridge drained");
        });
        (bridge, task)
    }

    pub fn emitter(&self, session_id: impl Into<String>) -> Emitter {
        Emitter {
            session_id: session_id.into(),
            tx: self.tx.clone(),
        }
    }
}

/// Per-session sending side of the bridge
#[derive(Debug, Clone)]
pub struct Emitter {
    session_id: String,
    tx: UnboundedSender<Envelope>,
}

impl Emitter {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Queue `event` for delivery; fails only if the receiving side is gone
    pub fn emit(&self, event: GameEvent) -> Result<(), BridgeError> {
        let envelope = Envelope {
            session_id: self.session_id.clone(),
            event,
        };
        self.tx
            .send(envelope)
            .map_err(|_| BridgeError::Closed(self.session_id.clone()))
    }
}
