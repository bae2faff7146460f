//! # Callback Handlers
//!
//! The handler registry is explicit: a [`CallbackHandler`] registers its
//! name with the dispatcher before any call is issued and receives every
//! response addressed to that name on its own channel. Dropping the handler
//! unregisters the name again. No ambient or process-global lookup exists.

use crate::dispatcher::{DispatcherCommand, DispatcherHandle};
use crate::envelope::ApiResponse;
use tokio::sync::mpsc;

/// A named response handler, registered with the session's dispatcher.
///
/// Responses whose `callback` field equals the handler's name arrive via
/// [`next_response`](CallbackHandler::next_response). The registration is
/// released either manually through
/// [`unregister`](CallbackHandler::unregister) or automatically on drop.
#[derive(Debug)]
pub struct CallbackHandler {
    name: String,
    response_rx: mpsc::Receiver<ApiResponse>,
    /// Dispatcher handle needed for unregistering. An `Option` so manual
    /// unregistration can take it, disarming the `Drop` path.
    unregister_info: Option<DispatcherHandle>,
}

impl CallbackHandler {
    pub(crate) async fn register(
        name: String,
        dispatcher: DispatcherHandle,
        channel_capacity: usize,
    ) -> Self {
        let (response_tx, response_rx) = mpsc::channel(channel_capacity);

        if dispatcher
            .command_tx
            .send(DispatcherCommand::Register(name.clone(), response_tx))
            .await
            .is_err()
        {
            tracing::warn!(
                "dispatcher is down, handler `{}` will never receive responses",
                name
            );
        }

        Self {
            name,
            response_rx,
            unregister_info: Some(dispatcher),
        }
    }

    /// The registered handler name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Receives the next response addressed to this handler. Returns `None`
    /// if the session shut down.
    pub async fn next_response(&mut self) -> Option<ApiResponse> {
        self.response_rx.recv().await
    }

    /// Manually unregisters the handler from the dispatcher.
    ///
    /// This consumes the handler. After this call the name resolves to
    /// nothing and the automatic `Drop` unregistration will not run a
    /// second time.
    pub async fn unregister(mut self) {
        if let Some(dispatcher) = self.unregister_info.take() {
            tracing::debug!("manual unregister for handler `{}`", self.name);
            let _ = dispatcher
                .command_tx
                .send(DispatcherCommand::Unregister(self.name.clone()))
                .await;
        }
    }
}

impl Drop for CallbackHandler {
    fn drop(&mut self) {
        // Only unregister automatically if it has not been done manually.
        if let Some(dispatcher) = self.unregister_info.take() {
            let name = self.name.clone();
            tracing::debug!("automatic unregister (on drop) for handler `{}`", name);
            tokio::spawn(async move {
                dispatcher
                    .command_tx
                    .send(DispatcherCommand::Unregister(name))
                    .await
                    .ok();
            });
        }
    }
}
