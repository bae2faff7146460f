use thiserror::Error;

/// Request-time transport failures.
///
/// A failed request never produces a completion: the dispatcher is not
/// invoked and no handler fires. The failure is logged where it happens and
/// is not escalated further.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered with HTTP status {0}")]
    Status(reqwest::StatusCode),
}

/// Failures while decoding a response body into an [`crate::envelope::ApiResponse`].
///
/// Any of these aborts dispatch for that response only; the dispatch worker
/// keeps running.
#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("response body is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("response body is not a JSON object")]
    NotAnObject,

    #[error("response object carries no `callback` field")]
    MissingCallback,

    #[error("`callback` field is not a string")]
    CallbackNotAString,
}

/// Top-level connector errors.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The startup capability check failed: no asynchronous HTTP transport
    /// could be constructed. The client stays non-functional.
    #[error("async HTTP transport unavailable, remote control disabled: {0}")]
    TransportUnavailable(#[source] reqwest::Error),

    /// The configured endpoint base URL is unusable.
    #[error("endpoint base URL `{url}` is invalid: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    /// A response named a handler that is not registered. Only surfaced as
    /// an error under [`crate::config::UnknownHandlerPolicy::Fail`].
    #[error("no handler registered for callback `{0}`")]
    UnknownHandler(String),
}
