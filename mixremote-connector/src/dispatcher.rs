//! # Response Dispatcher
//!
//! The `Dispatcher` is a background worker that acts as the single
//! completion handler for the session.
//!
//! ## Purpose
//! Every raw response body the transport produces is handed to the
//! dispatcher, which decodes the JSON envelope and forwards the result to
//! the one handler whose registered name matches the envelope's `callback`
//! field. Handlers register and unregister through the same command channel,
//! so no ambient global registry exists.

use crate::{
    config::{ClientConfig, UnknownHandlerPolicy},
    envelope::{try_parse_body, ApiResponse},
    error::ClientError,
};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::mpsc;

/// A background worker that routes decoded responses to named handlers.
///
/// It maintains the handler registry and forwards each incoming response to
/// the matching handler channel, applying the configured
/// [`UnknownHandlerPolicy`] when the `callback` name resolves to nothing.
pub struct Dispatcher {
    handlers: HashMap<String, mpsc::Sender<ApiResponse>>,
    command_rx: mpsc::Receiver<DispatcherCommand>,
    body_tx: mpsc::Sender<String>,
    body_rx: mpsc::Receiver<String>,
    unknown_handler: UnknownHandlerPolicy,
}

/// Defines commands that can be sent to the dispatcher task.
#[derive(Debug)]
pub enum DispatcherCommand {
    Register(String, mpsc::Sender<ApiResponse>),
    Unregister(String),
    Dispatch(String),
    Shutdown,
}

#[derive(Clone, Debug)]
pub struct DispatcherHandle {
    pub(crate) command_tx: mpsc::Sender<DispatcherCommand>,
}

impl DispatcherHandle {
    /// Hands a raw response body to the dispatcher.
    pub async fn dispatch(&self, body: String) {
        if self
            .command_tx
            .send(DispatcherCommand::Dispatch(body))
            .await
            .is_err()
        {
            tracing::warn!("failed to dispatch response: dispatcher may be down");
        }
    }

    pub async fn stop(&self) {
        if self
            .command_tx
            .send(DispatcherCommand::Shutdown)
            .await
            .is_err()
        {
            tracing::warn!("failed to send shutdown to dispatcher: it may already be down");
        }
    }
}

impl Dispatcher {
    /// Creates a new `Dispatcher`.
    pub fn new(
        config: Arc<ClientConfig>,
        command_tx: mpsc::Sender<DispatcherCommand>,
        command_rx: mpsc::Receiver<DispatcherCommand>,
    ) -> (Self, DispatcherHandle) {
        let (body_tx, body_rx) = mpsc::channel(config.channels.dispatcher_event_buffer);
        let dispatcher = Self {
            handlers: HashMap::new(),
            command_rx,
            body_tx,
            body_rx,
            unknown_handler: config.dispatch.unknown_handler,
        };
        let handle = DispatcherHandle { command_tx };
        (dispatcher, handle)
    }

    /// Runs the main loop for the dispatcher.
    ///
    /// Returns an error only under [`UnknownHandlerPolicy::Fail`], when a
    /// response names an unregistered handler.
    pub async fn run(mut self) -> anyhow::Result<()> {
        tracing::info!("dispatcher started, waiting for responses and commands");
        loop {
            tokio::select! {
                Some(body) = self.body_rx.recv() => self.handle_body(body).await?,
                Some(command) = self.command_rx.recv() => {
                    if self.handle_command(command).await? {
                        break;
                    }
                },
                else => {
                    tracing::info!("all channels closed, dispatcher shutting down");
                    break;
                }
            }
        }
        Ok(())
    }

    /// Decodes one raw body and routes it to the matching handler.
    ///
    /// A malformed body aborts dispatch for that response only; the worker
    /// keeps running.
    async fn handle_body(&mut self, raw: String) -> anyhow::Result<()> {
        let response = match try_parse_body(&raw) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("discarding malformed response body: {}", e);
                return Ok(());
            }
        };

        // Diagnostic echo of the decoded structure.
        tracing::info!("response: {}", response.to_json_string());

        let name = response.callback().to_string();
        let delivered = match self.handlers.get(&name) {
            Some(handler_tx) => handler_tx.send(response).await.is_ok(),
            None => {
                match self.unknown_handler {
                    UnknownHandlerPolicy::Ignore => {
                        tracing::debug!("dropping response for unknown callback `{}`", name);
                    }
                    UnknownHandlerPolicy::Log => {
                        tracing::warn!("no handler registered for callback `{}`", name);
                    }
                    UnknownHandlerPolicy::Fail => {
                        return Err(ClientError::UnknownHandler(name).into());
                    }
                }
                return Ok(());
            }
        };

        if !delivered {
            tracing::warn!("handler `{}` disconnected, removing it", name);
            self.handlers.remove(&name);
        }
        Ok(())
    }

    /// Handles an incoming command. Returns `Ok(true)` if the dispatcher
    /// should shut down.
    async fn handle_command(&mut self, command: DispatcherCommand) -> anyhow::Result<bool> {
        match command {
            DispatcherCommand::Register(name, handler_tx) => {
                tracing::info!("registering handler `{}`", name);
                if self.handlers.insert(name, handler_tx).is_some() {
                    tracing::debug!("previous registration under that name was replaced");
                }
            }
            DispatcherCommand::Unregister(name) => {
                tracing::info!("unregistering handler `{}`", name);
                self.handlers.remove(&name);
            }
            DispatcherCommand::Dispatch(body) => {
                if self.body_tx.send(body).await.is_err() {
                    tracing::error!("response receiver closed, shutting down dispatcher");
                    return Ok(true);
                }
            }
            DispatcherCommand::Shutdown => {
                tracing::info!("received shutdown command, exiting");
                return Ok(true);
            }
        }
        Ok(false)
    }
}
