//! Shared helpers for unit tests.

use futures::StreamExt;

use crate::Response;
use crate::ResponseStream;

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    env_logger::init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
    println!("setup logger for unit test.");
}

/// Drains a response stream to completion.
pub async fn collect_responses(mut stream: ResponseStream) -> Vec<Response> {
    let mut responses = Vec::new();
    while let Some(response) = stream.next().await {
        responses.push(response);
    }
    responses
}

pub fn progress(text: &str) -> Response {
    Response::Progress { text: text.to_string() }
}
