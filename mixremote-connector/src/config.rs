#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The top-level configuration for the `mixremote-connector` library.
///
/// This struct aggregates all necessary settings: the control-server
/// endpoint, channel capacities and the dispatch policy. It is typically
/// deserialized from a configuration file and passed to the
/// [`crate::session::Session`] upon initialization.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub struct ClientConfig {
    #[cfg_attr(feature = "serde", serde(default))]
    pub endpoint: Endpoint,
    #[cfg_attr(feature = "serde", serde(default))]
    pub channels: ChannelConfig,
    #[cfg_attr(feature = "serde", serde(default))]
    pub dispatch: DispatchConfig,
}

/// Defines where the MixProcessing control server is reached.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub struct Endpoint {
    /// Base URL of the control server, without the `api/...` suffix.
    pub base_url: String,
    /// Remote API version segment of the request path.
    pub api_version: String,
}

/// Defines capacities for the MPSC channels within the connector.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub struct ChannelConfig {
    /// The buffer capacity for the dispatcher's internal response queue.
    pub dispatcher_event_buffer: usize,
    /// The buffer capacity for the command channel to the dispatcher.
    pub dispatcher_command_buffer: usize,
    /// The buffer capacity for individual handler channels.
    pub handler_event_buffer: usize,
}

/// Defines how incoming responses are routed.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub struct DispatchConfig {
    #[cfg_attr(feature = "serde", serde(default))]
    pub unknown_handler: UnknownHandlerPolicy,
}

/// What to do when a response names a handler nobody registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum UnknownHandlerPolicy {
    /// Drop the response silently (logged at debug level only).
    Ignore,
    /// Drop the response and log a warning.
    #[default]
    Log,
    /// Terminate the dispatch worker with
    /// [`crate::error::ClientError::UnknownHandler`].
    Fail,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            channels: ChannelConfig::default(),
            dispatch: DispatchConfig::default(),
        }
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        // The stock MixProcessing webserver listens on port 8080 and mounts
        // the remote API at `api/api1`.
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            api_version: "api1".to_string(),
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            dispatcher_event_buffer: 256,
            dispatcher_command_buffer: 128,
            handler_event_buffer: 128,
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            unknown_handler: UnknownHandlerPolicy::default(),
        }
    }
}
