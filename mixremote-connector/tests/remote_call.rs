use async_trait::async_trait;
use mixremote_connector::{
    config::{ClientConfig, UnknownHandlerPolicy},
    error::{ClientError, TransportError},
    session::{Session, SessionHandle},
    transport::AsyncHttpTransport,
};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{task::JoinHandle, time};

/// A mock transport that records request URLs and serves canned bodies.
///
/// Replies are taken from the queue first; once it is empty the mock echoes
/// a minimal envelope addressed to the handler named in the request path,
/// which is what the real server does for a well-formed call.
struct MockTransport {
    requests: Mutex<Vec<String>>,
    replies: Mutex<VecDeque<String>>,
    latency: Duration,
}

impl MockTransport {
    fn echo() -> Arc<Self> {
        Self::build(&[], Duration::ZERO)
    }

    fn echo_with_latency(latency: Duration) -> Arc<Self> {
        Self::build(&[], latency)
    }

    fn with_replies(replies: &[&str]) -> Arc<Self> {
        Self::build(replies, Duration::ZERO)
    }

    fn build(replies: &[&str], latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            replies: Mutex::new(replies.iter().map(|s| s.to_string()).collect()),
            latency,
        })
    }

    /// Extracts the handler name from `.../api/<version>/<handler>?<query>`.
    fn handler_name(url: &str) -> String {
        let path = url.split('?').next().unwrap_or(url);
        path.rsplit('/').next().unwrap_or("").to_string()
    }

    fn recorded_requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AsyncHttpTransport for MockTransport {
    async fn get(&self, url: &str) -> Result<String, TransportError> {
        self.requests.lock().unwrap().push(url.to_string());
        if !self.latency.is_zero() {
            time::sleep(self.latency).await;
        }
        let canned = self.replies.lock().unwrap().pop_front();
        Ok(canned.unwrap_or_else(|| format!(r#"{{"callback":"{}"}}"#, Self::handler_name(url))))
    }
}

/// Test setup helper: starts a session with the given unknown-handler policy
/// and returns its handle plus the join handle of the running worker.
fn start_session(
    policy: UnknownHandlerPolicy,
) -> (SessionHandle, JoinHandle<anyhow::Result<()>>) {
    let mut config = ClientConfig::default();
    config.dispatch.unknown_handler = policy;
    let (session, handle) = Session::new(Arc::new(config));
    let task = tokio::spawn(session.run());
    (handle, task)
}

#[tokio::test(start_paused = true)]
async fn request_path_and_url_match_the_wire_format() {
    let (handle, _task) = start_session(UnknownHandlerPolicy::Log);
    let transport = MockTransport::echo();
    let api = handle.api_client(transport.clone());

    assert_eq!(
        api.request_path("onList", "mp.systemListSketches();"),
        "api/api1/onList?mp.systemListSketches%28%29%3B"
    );
    assert_eq!(
        api.request_path("onPing", "a b&c=d"),
        "api/api1/onPing?a%20b%26c%3Dd"
    );

    let mut on_list = handle.register("onList").await;
    api.call("onList", "mp.systemListSketches();");
    on_list.next_response().await.expect("echoed response");

    assert_eq!(
        transport.recorded_requests(),
        vec!["http://127.0.0.1:8080/api/api1/onList?mp.systemListSketches%28%29%3B".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn dispatches_the_full_object_to_the_named_handler_exactly_once() {
    let (handle, _task) = start_session(UnknownHandlerPolicy::Log);
    let transport = MockTransport::with_replies(&[
        r#"{"callback":"onList","error":false,"return":["Clock","Noise"]}"#,
    ]);
    let mut on_list = handle.register("onList").await;
    let api = handle.api_client(transport);

    api.call("onList", "mp.systemListSketches();");

    let response = time::timeout(Duration::from_secs(5), on_list.next_response())
        .await
        .expect("response should arrive")
        .expect("session is running");

    assert_eq!(response.callback(), "onList");
    assert!(!response.is_error());
    assert_eq!(
        response.return_values(),
        &[serde_json::json!("Clock"), serde_json::json!("Noise")]
    );
    // The handler sees the complete decoded object, `callback` included.
    assert_eq!(response.fields().len(), 3);
    assert!(response.get("callback").is_some());

    // Exactly once: nothing further arrives.
    let second = time::timeout(Duration::from_millis(200), on_list.next_response()).await;
    assert!(second.is_err(), "handler must fire exactly once");
}

#[tokio::test(start_paused = true)]
async fn unknown_callback_terminates_the_worker_under_fail_policy() {
    let (handle, task) = start_session(UnknownHandlerPolicy::Fail);
    let api = handle.api_client(MockTransport::echo());

    api.call("nobody", "mp.channelOn('channel0');");

    let result = time::timeout(Duration::from_secs(5), task)
        .await
        .expect("worker should terminate")
        .expect("worker task should not panic");
    let err = result.expect_err("an unregistered callback must fail observably");
    assert!(
        matches!(
            err.downcast_ref::<ClientError>(),
            Some(ClientError::UnknownHandler(name)) if name == "nobody"
        ),
        "unexpected error: {err:#}"
    );
}

#[tokio::test(start_paused = true)]
async fn unknown_callback_is_skipped_under_the_default_policy() {
    let (handle, task) = start_session(UnknownHandlerPolicy::Log);
    let api = handle.api_client(MockTransport::echo());

    api.call("nobody", "mp.channelOn('channel0');");
    // Let the first request complete before issuing the next one, otherwise
    // it would be replaced in the in-flight slot.
    time::sleep(Duration::from_millis(50)).await;

    let mut on_ping = handle.register("onPing").await;
    api.call("onPing", "mp.channelIsEditing();");

    let response = time::timeout(Duration::from_secs(5), on_ping.next_response())
        .await
        .expect("worker must survive an unknown callback")
        .expect("session is running");
    assert_eq!(response.callback(), "onPing");
    assert!(!task.is_finished());
}

#[tokio::test(start_paused = true)]
async fn malformed_body_invokes_no_handler_and_keeps_the_worker_alive() {
    let (handle, task) = start_session(UnknownHandlerPolicy::Fail);
    let transport = MockTransport::with_replies(&["<html>404 Not Found</html>"]);
    let mut on_ping = handle.register("onPing").await;
    let api = handle.api_client(transport);

    api.call("onPing", "mp.channelIsEditing();");
    time::sleep(Duration::from_millis(50)).await;

    // The malformed body was discarded without reaching any handler, even
    // under the strict policy. A follow-up call still works.
    api.call("onPing", "mp.channelIsEditing();");
    let response = time::timeout(Duration::from_secs(5), on_ping.next_response())
        .await
        .expect("worker must survive a malformed body")
        .expect("session is running");
    assert_eq!(response.callback(), "onPing");
    assert!(!task.is_finished());
}

#[tokio::test(start_paused = true)]
async fn overlapping_calls_keep_only_the_newest_request() {
    let (handle, _task) = start_session(UnknownHandlerPolicy::Log);
    let transport = MockTransport::echo_with_latency(Duration::from_millis(200));
    let mut on_a = handle.register("onA").await;
    let mut on_b = handle.register("onB").await;
    let api = handle.api_client(transport.clone());

    // Known single-slot behaviour: the second call replaces the first while
    // it is still in flight, so only the second completion can ever fire.
    api.call("onA", "mp.channelOn('a');");
    api.call("onB", "mp.channelOn('b');");

    let response = time::timeout(Duration::from_secs(5), on_b.next_response())
        .await
        .expect("surviving request should complete")
        .expect("session is running");
    assert_eq!(response.callback(), "onB");

    let replaced = time::timeout(Duration::from_millis(500), on_a.next_response()).await;
    assert!(replaced.is_err(), "the replaced request must never complete");

    // The first request was aborted before it ever reached the wire.
    assert_eq!(transport.recorded_requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn dropping_a_handler_unregisters_its_name() {
    let (handle, task) = start_session(UnknownHandlerPolicy::Fail);
    let api = handle.api_client(MockTransport::echo());

    let on_temp = handle.register("onTemp").await;
    drop(on_temp);
    // The drop-side unregister runs on a spawned task.
    time::sleep(Duration::from_millis(50)).await;

    api.call("onTemp", "mp.channelIsEditing();");

    let result = time::timeout(Duration::from_secs(5), task)
        .await
        .expect("worker should terminate")
        .expect("worker task should not panic");
    assert!(
        result.is_err(),
        "a dropped handler must no longer be registered"
    );
}

#[tokio::test(start_paused = true)]
async fn registering_a_name_again_replaces_the_previous_handler() {
    let (handle, _task) = start_session(UnknownHandlerPolicy::Log);
    let api = handle.api_client(MockTransport::echo());

    let mut first = handle.register("onPing").await;
    let mut second = handle.register("onPing").await;

    api.call("onPing", "mp.channelIsEditing();");

    let response = time::timeout(Duration::from_secs(5), second.next_response())
        .await
        .expect("replacement handler should fire")
        .expect("session is running");
    assert_eq!(response.callback(), "onPing");

    // The replaced handler's channel is gone; it sees end-of-stream.
    let gone = time::timeout(Duration::from_secs(5), first.next_response())
        .await
        .expect("replaced channel should close");
    assert!(gone.is_none());
}

#[tokio::test(start_paused = true)]
async fn stop_shuts_down_the_session_cleanly() {
    let (handle, task) = start_session(UnknownHandlerPolicy::Log);
    let mut on_ping = handle.register("onPing").await;

    handle.stop().await;

    let result = time::timeout(Duration::from_secs(5), task)
        .await
        .expect("worker should terminate")
        .expect("worker task should not panic");
    assert!(result.is_ok());

    let closed = time::timeout(Duration::from_secs(5), on_ping.next_response())
        .await
        .expect("handler channel should close");
    assert!(closed.is_none());
}
