//! A client library for the MixProcessing remote control server.
//!
//! MixProcessing exposes its scripting API over plain HTTP: a control client
//! issues a GET request to `api/api1/<handler>?<url-escaped script call>` and
//! the server answers with a JSON object that names, in its `callback` field,
//! the handler the result belongs to. This crate provides the asynchronous
//! Rust side of that contract.
//!
//! # Key Components
//!
//! *   [`session::Session`]: The entry point. It owns the background dispatch
//!     worker and hands out a clonable [`session::SessionHandle`].
//! *   [`client::ApiClient`]: Builds request URLs and issues fire-and-forget
//!     GET calls over a single reusable transport. One request may be in
//!     flight at a time; a newer call replaces (and aborts) the older one.
//! *   [`handler::CallbackHandler`]: An explicitly registered named handler.
//!     Responses whose `callback` field matches the name arrive on it.
//! *   [`commands`]: Typed builders for the remote scripting API
//!     (`mp.channelOn('...')` and friends).
pub mod client;
/// Typed builders for remote scripting-API calls.
pub mod commands;
/// Defines configuration structures for the connector.
pub mod config;
/// The internal response-routing worker (`Dispatcher`).
mod dispatcher;

/// Parsing of the JSON response envelope.
pub mod envelope;
/// The connector error taxonomy.
pub mod error;
/// Explicitly registered, named response handlers.
pub mod handler;
/// The session runner and its clonable handle.
pub mod session;
/// The asynchronous HTTP transport abstraction.
pub mod transport;
