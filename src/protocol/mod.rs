//! Response stream protocol shared by the repair and discovery workers.
//!
//! Every caller-facing operation produces an ordered sequence of progress
//! messages terminated by exactly one `Done` sentinel or one `Errored`
//! message, never both, with nothing after the terminal.

#[cfg(test)]
mod protocol_test;

use serde::Deserialize;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Default bound of the per-invocation response channel.
pub const DEFAULT_RESPONSE_BUFFER: usize = 256;

/// One unit of the streaming protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    /// Non-final progress line
    Progress { text: String },

    /// Final sentinel: the invocation completed successfully
    Done,

    /// Terminal failure report carrying the cause
    Errored { text: String },
}

impl Response {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Response::Progress { .. })
    }
}

/// Stream handed to the consumer of one invocation.
pub type ResponseStream = ReceiverStream<Response>;

/// The consumer withdrew before the invocation finished.
///
/// Producers treat this as a stop signal: no further store operations are
/// issued, and deletions already acknowledged are not rolled back.
#[derive(Debug, thiserror::Error)]
#[error("response stream consumer disconnected")]
pub struct ReporterClosed;

/// Producer side of one invocation's response stream.
///
/// The terminal methods consume the reporter, so no message can follow the
/// sentinel or the error by construction.
#[derive(Debug)]
pub struct Reporter {
    tx: mpsc::Sender<Response>,
}

impl Reporter {
    pub fn channel(buffer: usize) -> (Self, ResponseStream) {
        // A zero bound would panic inside mpsc; the channel floor is one slot.
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self { tx }, ReceiverStream::new(rx))
    }

    pub async fn progress(
        &self,
        text: impl Into<String>,
    ) -> std::result::Result<(), ReporterClosed> {
        self.send(Response::Progress { text: text.into() }).await
    }

    pub async fn done(self) -> std::result::Result<(), ReporterClosed> {
        self.send(Response::Done).await
    }

    pub async fn errored(
        self,
        text: impl Into<String>,
    ) -> std::result::Result<(), ReporterClosed> {
        self.send(Response::Errored { text: text.into() }).await
    }

    async fn send(
        &self,
        response: Response,
    ) -> std::result::Result<(), ReporterClosed> {
        self.tx.send(response).await.map_err(|_| ReporterClosed)
    }
}
