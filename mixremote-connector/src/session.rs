//! # Session
//!
//! The `Session` is the explicitly constructed client instance: it owns the
//! dispatch worker and, through its handle, hands out handlers and API
//! clients. Nothing in the crate relies on process-wide state.
//!
//! ## Core Components
//!
//! - [`Session`]: Owns the background dispatcher. It is consumed when its
//!   `run` method is called.
//! - [`SessionHandle`]: A clonable, thread-safe handle providing the public
//!   API of the running session (registering handlers, building clients,
//!   shutting down).

use crate::{
    client::ApiClient,
    config::ClientConfig,
    dispatcher::{Dispatcher, DispatcherHandle},
    handler::CallbackHandler,
    transport::AsyncHttpTransport,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// A clonable, thread-safe handle for interacting with a running [`Session`].
#[derive(Debug, Clone)]
pub struct SessionHandle {
    dispatcher: DispatcherHandle,
    config: Arc<ClientConfig>,
}

impl SessionHandle {
    /// Registers a named handler with the session's dispatcher.
    ///
    /// Responses whose `callback` field carries this name are delivered to
    /// the returned handler. Registration completes before this returns, so
    /// a call issued afterwards cannot race its own response.
    ///
    /// # Arguments
    ///
    /// * `name` - The handler name the server will echo back in `callback`.
    pub async fn register(&self, name: impl Into<String>) -> CallbackHandler {
        CallbackHandler::register(
            name.into(),
            self.dispatcher.clone(),
            self.config.channels.handler_event_buffer,
        )
        .await
    }

    /// Builds an [`ApiClient`] over the given transport, wired to this
    /// session's dispatcher.
    pub fn api_client<C>(&self, transport: Arc<C>) -> ApiClient<C>
    where
        C: AsyncHttpTransport + ?Sized + 'static,
    {
        ApiClient::new(transport, self.config.clone(), self.dispatcher.clone())
    }

    /// Sends a shutdown signal to the session's background worker.
    pub async fn stop(&self) {
        self.dispatcher.stop().await;
    }
}

/// The session runner.
///
/// Created once, its [`run`](Session::run) method is spawned as a background
/// task and consumes it, leaving the [`SessionHandle`] as the only way to
/// interact with the running session.
pub struct Session {
    dispatcher: Dispatcher,
}

impl Session {
    /// Creates a new `Session` and its associated [`SessionHandle`].
    ///
    /// This sets up the communication channels but does not start anything:
    /// the returned `Session` must be driven by spawning
    /// [`run`](Session::run).
    pub fn new(config: Arc<ClientConfig>) -> (Self, SessionHandle) {
        let (command_tx, command_rx) = mpsc::channel(config.channels.dispatcher_command_buffer);
        let (dispatcher, dispatcher_handle) = Dispatcher::new(config.clone(), command_tx, command_rx);

        let runner = Self { dispatcher };
        let handle = SessionHandle {
            dispatcher: dispatcher_handle,
            config,
        };
        (runner, handle)
    }

    /// Runs the session's background worker.
    ///
    /// This consumes the `Session` and should be spawned as a single,
    /// long-running task. It runs until [`SessionHandle::stop`] is called.
    /// Under [`crate::config::UnknownHandlerPolicy::Fail`] it terminates
    /// with an error as soon as a response names an unregistered handler.
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!("session is running its dispatch worker");
        self.dispatcher.run().await
    }
}
