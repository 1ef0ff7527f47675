use futures::StreamExt;

use super::*;

#[tokio::test]
async fn progress_then_done_arrive_in_order() {
    let (reporter, mut stream) = Reporter::channel(8);

    reporter.progress("first").await.expect("consumer alive");
    reporter.progress("second").await.expect("consumer alive");
    reporter.done().await.expect("consumer alive");

    assert_eq!(stream.next().await, Some(Response::Progress { text: "first".into() }));
    assert_eq!(stream.next().await, Some(Response::Progress { text: "second".into() }));
    assert_eq!(stream.next().await, Some(Response::Done));
    // Terminal methods consume the reporter, so the stream ends here.
    assert_eq!(stream.next().await, None);
}

#[tokio::test]
async fn errored_is_terminal() {
    let (reporter, mut stream) = Reporter::channel(8);

    reporter.errored("boom").await.expect("consumer alive");

    assert_eq!(stream.next().await, Some(Response::Errored { text: "boom".into() }));
    assert_eq!(stream.next().await, None);
}

#[tokio::test]
async fn zero_buffer_requests_get_the_one_slot_floor() {
    let (reporter, mut stream) = Reporter::channel(0);

    reporter.progress("first").await.expect("consumer alive");

    assert_eq!(stream.next().await, Some(Response::Progress { text: "first".into() }));
}

#[tokio::test]
async fn send_fails_once_consumer_withdraws() {
    let (reporter, stream) = Reporter::channel(8);
    drop(stream);

    assert!(reporter.progress("ignored").await.is_err());
}

#[test]
fn terminal_classification() {
    assert!(!Response::Progress { text: "x".into() }.is_terminal());
    assert!(Response::Done.is_terminal());
    assert!(Response::Errored { text: "x".into() }.is_terminal());
}
