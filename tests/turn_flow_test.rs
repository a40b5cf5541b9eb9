// Integration tests for complete turns: chunked bodies, malformed lines,
// rejected requests and mid-stream faults, observed through the store.

mod common;

use bytes::Bytes;
use chatline::adapters::MockResponse;
use chatline::config::{ClientConfig, DEFAULT_ERROR_TEXT};
use chatline::error::{StreamError, SubmitError, TurnError};
use chatline::models::MessageRole;
use chatline::state::SessionStatus;
use chatline::traits::HttpError;
use chatline::turn::{TurnOutcome, TurnPhase};
use common::{channel_harness, done_line, status_line, text_line, TurnHarness};

#[tokio::test]
async fn test_status_and_text_split_across_chunks() {
    let (mut controller, mut store, body) = channel_harness(ClientConfig::default());
    let mut rx = store.subscribe();
    let turn = controller.begin(&mut store, "What's new?").unwrap();

    let script = async move {
        body.chunk("{\"type\":\"st");
        body.chunk("atus\",\"content\":\"Searching...\"}\n{\"type\":\"text\",\"content\":\"Hel");
        {
            let session = rx
                .wait_for(|s| s.transient_status.as_deref() == Some("Searching..."))
                .await
                .unwrap();
            assert_eq!(session.live_message().unwrap().text, "");
        }

        body.chunk("lo\"}\n");
        {
            let session = rx
                .wait_for(|s| s.live_message().is_some_and(|m| m.text == "Hello"))
                .await
                .unwrap();
            assert_eq!(session.transient_status, None);
            assert_eq!(session.status, SessionStatus::Streaming);
        }

        body.chunk(done_line());
    };

    let (report, ()) = tokio::join!(controller.drive(&mut store, turn), script);

    assert_eq!(report.outcome, TurnOutcome::Success);
    assert_eq!(report.status_events, 1);
    assert_eq!(report.text_events, 1);

    let session = store.snapshot();
    assert_eq!(session.messages.len(), 2);
    assert_eq!(session.messages[1].text, "Hello");
    assert_eq!(session.transient_status, None);
    assert_eq!(session.live_message_id, None);
    assert_eq!(session.status, SessionStatus::Idle);
}

#[tokio::test]
async fn test_server_error_marks_reply_failed() {
    let mut harness = TurnHarness::new(MockResponse::status(500, "Internal Server Error"));

    let report = harness.submit("Hello").await;
    assert!(!report.entered_streaming);
    assert_eq!(
        report.outcome,
        TurnOutcome::Failed(TurnError::RequestRejected {
            status: Some(500),
            message: "Server error (500): Internal Server Error".to_string(),
        })
    );

    let session = harness.session();
    assert_eq!(session.messages.len(), 2);
    assert_eq!(session.messages[0].role, MessageRole::User);
    assert_eq!(session.messages[0].text, "Hello");
    assert!(!session.messages[0].failed);
    assert_eq!(session.messages[1].text, DEFAULT_ERROR_TEXT);
    assert!(session.messages[1].failed);
    assert_eq!(session.status, SessionStatus::Idle);
    assert_eq!(session.transient_status, None);
}

#[tokio::test]
async fn test_trailing_partial_line_is_discarded() {
    let body = format!("{}{}", text_line("Hi"), "{\"type\":\"te");
    let mut harness = TurnHarness::new(MockResponse::chunks([body]));

    let report = harness.submit("Hello").await;
    assert_eq!(report.outcome, TurnOutcome::Success);
    assert_eq!(report.discarded_partial.as_deref(), Some("{\"type\":\"te"));
    assert!(report.malformed_lines.is_empty());
    assert_eq!(harness.reply_text(), "Hi");
    assert!(!harness.session().messages[1].failed);
}

#[tokio::test]
async fn test_text_deltas_are_appended_in_order() {
    let deltas: Vec<String> = (0..50).map(|i| format!("d{} ", i)).collect();
    let body: String = deltas.iter().map(|d| text_line(d)).collect();
    let chunks: Vec<Vec<u8>> = body.as_bytes().chunks(7).map(|c| c.to_vec()).collect();
    let mut harness = TurnHarness::new(MockResponse::chunks(chunks));

    let report = harness.submit("count").await;
    assert_eq!(report.text_events, 50);
    assert_eq!(harness.reply_text(), deltas.concat());
}

#[tokio::test]
async fn test_multibyte_content_split_inside_characters() {
    let body = format!("{}{}", text_line("héllo 👋"), done_line());
    let chunks: Vec<Vec<u8>> = body.as_bytes().chunks(1).map(|c| c.to_vec()).collect();
    let mut harness = TurnHarness::new(MockResponse::chunks(chunks));

    let report = harness.submit("greet").await;
    assert_eq!(report.outcome, TurnOutcome::Success);
    assert_eq!(harness.reply_text(), "héllo 👋");
}

#[tokio::test]
async fn test_crlf_body_decodes_like_lf() {
    let body = format!("{}{}", text_line("a"), text_line("b")).replace('\n', "\r\n");
    let mut harness = TurnHarness::new(MockResponse::chunks([body]));

    let report = harness.submit("x").await;
    assert!(report.outcome.is_success());
    assert!(report.malformed_lines.is_empty());
    assert_eq!(harness.reply_text(), "ab");
}

#[tokio::test]
async fn test_done_clears_transient_status() {
    let (mut controller, mut store, body) = channel_harness(ClientConfig::default());
    let mut rx = store.subscribe();
    let turn = controller.begin(&mut store, "hi").unwrap();

    let script = async move {
        body.chunk(status_line("Working"));
        rx.wait_for(|s| s.transient_status.as_deref() == Some("Working"))
            .await
            .unwrap();

        body.chunk(done_line());
        let session = rx
            .wait_for(|s| s.transient_status.is_none())
            .await
            .unwrap();
        assert_eq!(session.status, SessionStatus::Streaming);
    };

    let (report, ()) = tokio::join!(controller.drive(&mut store, turn), script);
    assert!(report.outcome.is_success());
    assert_eq!(store.session().transient_status, None);
}

#[tokio::test]
async fn test_malformed_lines_do_not_change_text_or_end_stream() {
    let body = [
        text_line("one "),
        "{not json}\n".to_string(),
        "{\"type\":\"tool\",\"content\":\"x\"}\n".to_string(),
        "   \n".to_string(),
        text_line("two"),
        done_line(),
    ]
    .concat();
    let mut harness = TurnHarness::new(MockResponse::chunks([body]));

    let report = harness.submit("x").await;
    assert_eq!(report.outcome, TurnOutcome::Success);
    assert_eq!(
        report.malformed_lines,
        vec![
            "{not json}".to_string(),
            "{\"type\":\"tool\",\"content\":\"x\"}".to_string()
        ]
    );
    assert_eq!(report.text_events, 2);
    assert_eq!(harness.reply_text(), "one two");
}

#[tokio::test]
async fn test_connection_drop_discards_partial_text() {
    let mut harness = TurnHarness::new(MockResponse::StreamThenError(
        vec![Bytes::from(text_line("Partial answer"))],
        HttpError::Io("connection reset by peer".to_string()),
    ));

    let report = harness.submit("x").await;
    assert!(report.entered_streaming);
    assert_eq!(report.text_events, 1);
    assert_eq!(
        report.outcome,
        TurnOutcome::Failed(TurnError::Stream(StreamError::ConnectionLost {
            message: "IO error: connection reset by peer".to_string(),
        }))
    );
    assert_eq!(harness.reply_text(), DEFAULT_ERROR_TEXT);
    assert!(harness.session().messages[1].failed);
}

#[tokio::test]
async fn test_invalid_utf8_fails_turn() {
    let mut harness = TurnHarness::new(MockResponse::Stream(vec![
        Bytes::from(text_line("ok")),
        Bytes::from_static(b"{\"type\":\"text\",\"content\":\"\xff\"}\n"),
    ]));

    let report = harness.submit("x").await;
    assert!(matches!(
        report.outcome,
        TurnOutcome::Failed(TurnError::Stream(StreamError::InvalidUtf8 { .. }))
    ));
    assert_eq!(harness.reply_text(), DEFAULT_ERROR_TEXT);
}

#[tokio::test]
async fn test_custom_texts_are_used() {
    let config = ClientConfig::default()
        .with_thinking_text("Hmm...")
        .with_error_text("Nope.");
    let mut harness = TurnHarness::with_config(MockResponse::status(502, "Bad Gateway"), config);

    let turn = harness
        .controller
        .begin(&mut harness.store, "hi")
        .unwrap();
    assert_eq!(harness.session().transient_status.as_deref(), Some("Hmm..."));

    harness.controller.drive(&mut harness.store, turn).await;
    assert_eq!(harness.reply_text(), "Nope.");
}

#[tokio::test]
async fn test_session_accepts_next_turn_after_failure() {
    let mut harness = TurnHarness::new(MockResponse::status(500, "boom"));
    let first = harness.submit("first").await;
    assert!(!first.outcome.is_success());

    harness.http.set_default_response(MockResponse::chunks([
        text_line("recovered"),
        done_line(),
    ]));
    let second = harness.submit("second").await;
    assert!(second.outcome.is_success());

    let session = harness.session();
    assert_eq!(session.messages.len(), 4);
    assert!(session.messages[1].failed);
    assert_eq!(session.messages[3].text, "recovered");
    assert!(!session.messages[3].failed);
    assert_eq!(
        harness.controller.phase(),
        &TurnPhase::Settled(TurnOutcome::Success)
    );
}

#[tokio::test]
async fn test_submission_while_streaming_is_rejected() {
    let (mut controller, mut store, body) = channel_harness(ClientConfig::default());
    let turn = controller.begin(&mut store, "first").unwrap();

    assert_eq!(
        controller.begin(&mut store, "second").err(),
        Some(SubmitError::TurnInFlight)
    );
    assert_eq!(store.snapshot().messages.len(), 2);

    drop(body);
    let report = controller.drive(&mut store, turn).await;
    assert!(report.outcome.is_success());
    assert_eq!(store.snapshot().messages[1].text, "");
}
