//! # Remote Call Client
//!
//! This module provides the [`ApiClient`], the request side of the remote
//! control contract: it builds `api/<version>/<handler>?<escaped payload>`
//! URLs and issues fire-and-forget GET requests over a shared transport.
//!
//! ## Single in-flight slot
//!
//! The client owns exactly one request slot. [`ApiClient::call`] aborts any
//! request still in flight before issuing the new one, so only the newest
//! request's completion can reach the dispatcher. Callers that need every
//! response must wait for a handler to fire before calling again.
//!
//! ## Failure behaviour
//!
//! A transport-level failure produces no completion at all: the error is
//! logged and no handler fires. The caller has no way to observe it.

use crate::{
    commands::ScriptCall,
    config::ClientConfig,
    dispatcher::DispatcherHandle,
    transport::AsyncHttpTransport,
};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::AbortHandle;

/// The asynchronous remote call client.
///
/// Owns its transport and its dispatcher handle; nothing about it is
/// process-global. Obtain one through
/// [`crate::session::SessionHandle::api_client`].
pub struct ApiClient<C: AsyncHttpTransport + ?Sized> {
    transport: Arc<C>,
    config: Arc<ClientConfig>,
    dispatcher: DispatcherHandle,
    /// The one in-flight request, if any.
    in_flight: Mutex<Option<AbortHandle>>,
}

impl<C: AsyncHttpTransport + ?Sized + 'static> ApiClient<C> {
    pub(crate) fn new(
        transport: Arc<C>,
        config: Arc<ClientConfig>,
        dispatcher: DispatcherHandle,
    ) -> Self {
        Self {
            transport,
            config,
            dispatcher,
            in_flight: Mutex::new(None),
        }
    }

    /// The request path for a call, without the base URL:
    /// `api/<version>/<handler>?<url-escaped payload>`.
    pub fn request_path(&self, handler_name: &str, payload: &str) -> String {
        format!(
            "api/{}/{}?{}",
            self.config.endpoint.api_version,
            handler_name,
            urlencoding::encode(payload)
        )
    }

    /// The full request URL for a call.
    pub fn request_url(&self, handler_name: &str, payload: &str) -> String {
        format!(
            "{}/{}",
            self.config.endpoint.base_url.trim_end_matches('/'),
            self.request_path(handler_name, payload)
        )
    }

    /// Issues a remote call and returns immediately.
    ///
    /// The response, when it arrives, is decoded and routed to the handler
    /// registered under the name carried in its `callback` field —
    /// conventionally `handler_name`, which the server echoes back.
    ///
    /// If a request is still in flight it is aborted and replaced; see the
    /// module docs.
    ///
    /// # Arguments
    ///
    /// * `handler_name` - The handler the server should address its reply to.
    /// * `payload` - The raw script payload, escaped before transmission.
    pub fn call(&self, handler_name: &str, payload: &str) {
        let url = self.request_url(handler_name, payload);
        let transport = Arc::clone(&self.transport);
        let dispatcher = self.dispatcher.clone();
        let name = handler_name.to_string();

        tracing::debug!("GET {}", url);
        let task = tokio::spawn(async move {
            match transport.get(&url).await {
                Ok(body) => dispatcher.dispatch(body).await,
                Err(e) => {
                    tracing::warn!("request for `{}` failed, no completion will fire: {}", name, e);
                }
            }
        });

        let mut slot = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.replace(task.abort_handle()) {
            previous.abort();
            tracing::debug!("in-flight request replaced, previous request aborted");
        }
    }

    /// Issues a typed scripting-API call. See [`crate::commands`].
    pub fn call_script(&self, handler_name: &str, script: &ScriptCall) {
        self.call(handler_name, script.expr());
    }
}
