//! One request/response turn.
//!
//! A turn moves through `Idle -> Submitting -> Streaming -> Settled`.
//! [`TurnController::begin`] performs the optimistic updates (user message,
//! empty assistant placeholder, thinking indicator) and
//! [`TurnController::drive`] opens the stream and applies every decoded
//! event to the [`ConversationStore`] until the body ends or breaks.
//!
//! Whatever happens, the session is back to idle when `drive` returns.

use std::time::Duration;

use futures::StreamExt;

use crate::config::ClientConfig;
use crate::conductor::ChatClient;
use crate::debug::{
    emit_debug, DebugEventKind, DebugEventSender, ErrorData, MalformedLineData,
    ProcessedEventData, StreamLifecycleData, StreamPhase,
};
use crate::error::{StreamError, SubmitError, TurnError};
use crate::models::{ChatRequest, MessageId};
use crate::ndjson::{parse_line, FrameDecoder, StreamEvent};
use crate::state::ConversationStore;
use crate::traits::ByteStream;

/// Where the controller is in the current (or last) turn.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TurnPhase {
    #[default]
    Idle,
    /// Request issued, no response yet
    Submitting,
    /// 2xx response, reading the body
    Streaming,
    Settled(TurnOutcome),
}

/// How a turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Success,
    Failed(TurnError),
}

impl TurnOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TurnOutcome::Success)
    }

    pub fn error(&self) -> Option<&TurnError> {
        match self {
            TurnOutcome::Success => None,
            TurnOutcome::Failed(e) => Some(e),
        }
    }
}

/// What happened during a settled turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub outcome: TurnOutcome,
    /// Whether the server accepted the request and a body was read
    pub entered_streaming: bool,
    pub text_events: usize,
    pub status_events: usize,
    /// Raw lines that did not decode, in arrival order
    pub malformed_lines: Vec<String>,
    /// Unterminated trailing fragment left when the body ended
    pub discarded_partial: Option<String>,
}

impl TurnReport {
    fn started() -> Self {
        Self {
            outcome: TurnOutcome::Success,
            entered_streaming: false,
            text_events: 0,
            status_events: 0,
            malformed_lines: Vec::new(),
            discarded_partial: None,
        }
    }
}

/// A turn whose optimistic updates are applied but whose request is not yet
/// sent. Pass it to [`TurnController::drive`].
#[derive(Debug)]
#[must_use = "a pending turn leaves the session streaming until it is driven"]
pub struct PendingTurn {
    request: ChatRequest,
    live_id: MessageId,
}

impl PendingTurn {
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }

    /// The assistant placeholder receiving this turn's text.
    pub fn live_id(&self) -> MessageId {
        self.live_id
    }
}

/// Runs turns against a [`ConversationStore`].
#[derive(Debug)]
pub struct TurnController {
    client: ChatClient,
    thinking_text: String,
    error_text: String,
    idle_timeout: Option<Duration>,
    max_line_bytes: usize,
    debug_tx: Option<DebugEventSender>,
    phase: TurnPhase,
}

impl TurnController {
    pub fn new(client: ChatClient, config: &ClientConfig) -> Self {
        Self {
            client,
            thinking_text: config.thinking_text.clone(),
            error_text: config.error_text.clone(),
            idle_timeout: config.idle_timeout,
            max_line_bytes: config.max_line_bytes,
            debug_tx: None,
            phase: TurnPhase::Idle,
        }
    }

    /// Attach a debug event channel.
    pub fn with_debug(mut self, debug_tx: DebugEventSender) -> Self {
        self.debug_tx = Some(debug_tx);
        self
    }

    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }

    /// Submit `text` and run the turn to completion.
    pub async fn submit(
        &mut self,
        store: &mut ConversationStore,
        text: &str,
    ) -> Result<TurnReport, SubmitError> {
        let turn = self.begin(store, text)?;
        Ok(self.drive(store, turn).await)
    }

    /// Validate `text` and apply the optimistic updates for a new turn.
    ///
    /// Blank input and a turn already in flight are rejected without
    /// touching the session.
    pub fn begin(
        &mut self,
        store: &mut ConversationStore,
        text: &str,
    ) -> Result<PendingTurn, SubmitError> {
        if text.trim().is_empty() {
            return Err(SubmitError::EmptyInput);
        }
        if store.is_streaming() {
            return Err(SubmitError::TurnInFlight);
        }

        store.begin_streaming();
        store.append_user(text);
        let live_id = store.append_assistant_placeholder();
        store.set_transient_status(Some(self.thinking_text.clone()));
        self.phase = TurnPhase::Submitting;

        let request = ChatRequest::user_message(text, store.conversation_id());
        tracing::info!("Turn started for conversation {}", request.thread_id());
        Ok(PendingTurn { request, live_id })
    }

    /// Send the request and apply the response stream until it ends.
    ///
    /// Always settles the session and returns a report; failures are
    /// reported in [`TurnReport::outcome`].
    pub async fn drive(&mut self, store: &mut ConversationStore, turn: PendingTurn) -> TurnReport {
        let conversation_id = turn.request.thread_id().to_string();
        let mut report = TurnReport::started();

        self.emit_lifecycle(StreamPhase::Connecting, None, &conversation_id);
        let result = match self.open_stream(&turn.request).await {
            Ok(body) => {
                self.phase = TurnPhase::Streaming;
                report.entered_streaming = true;
                tracing::debug!("Response stream opened");
                self.emit_lifecycle(StreamPhase::Connected, None, &conversation_id);

                self.read_stream(store, turn.live_id, body, &mut report, &conversation_id)
                    .await
                    .map_err(TurnError::Stream)
            }
            Err(e) => Err(e),
        };

        let outcome = match result {
            Ok(()) => {
                self.emit_lifecycle(StreamPhase::Completed, None, &conversation_id);
                TurnOutcome::Success
            }
            Err(e) => {
                if e.is_rejection() {
                    tracing::warn!("Request rejected: {}", e);
                } else {
                    tracing::error!("Stream failed: {}", e);
                }
                store.replace_live(turn.live_id, self.error_text.clone(), true);
                emit_debug(
                    &self.debug_tx,
                    DebugEventKind::Error(ErrorData::with_code(e.error_code(), e.to_string())),
                    &conversation_id,
                );
                self.emit_lifecycle(StreamPhase::Failed, Some(e.to_string()), &conversation_id);
                TurnOutcome::Failed(e)
            }
        };

        store.settle();
        tracing::info!(
            "Turn settled ({}): {} text, {} status, {} malformed",
            if outcome.is_success() { "success" } else { "failed" },
            report.text_events,
            report.status_events,
            report.malformed_lines.len()
        );
        self.phase = TurnPhase::Settled(outcome.clone());
        report.outcome = outcome;
        report
    }

    /// Send the request, bounded by the idle timeout when one is set.
    async fn open_stream(&self, request: &ChatRequest) -> Result<ByteStream, TurnError> {
        let Some(limit) = self.idle_timeout else {
            return self.client.stream_chat(request).await;
        };
        match tokio::time::timeout(limit, self.client.stream_chat(request)).await {
            Ok(result) => result,
            Err(_) => Err(TurnError::RequestRejected {
                status: None,
                message: format!("No response within {:?}", limit),
            }),
        }
    }

    async fn read_stream(
        &self,
        store: &mut ConversationStore,
        live_id: MessageId,
        mut body: ByteStream,
        report: &mut TurnReport,
        conversation_id: &str,
    ) -> Result<(), StreamError> {
        let mut decoder = FrameDecoder::with_max_line_bytes(self.max_line_bytes);

        loop {
            let next = match self.idle_timeout {
                Some(limit) => tokio::time::timeout(limit, body.next())
                    .await
                    .map_err(|_| StreamError::Timeout { after: limit })?,
                None => body.next().await,
            };

            match next {
                Some(Ok(chunk)) => {
                    for line in decoder.feed(&chunk)? {
                        if let Some(event) = parse_line(&line) {
                            self.apply(store, live_id, event, report, conversation_id);
                        }
                    }
                }
                Some(Err(e)) => {
                    return Err(StreamError::ConnectionLost {
                        message: e.to_string(),
                    })
                }
                None => {
                    let partial = decoder.flush().filter(|rest| !rest.trim().is_empty());
                    if let Some(rest) = &partial {
                        tracing::debug!("Discarding unterminated trailing line: {:?}", rest);
                    }
                    report.discarded_partial = partial;
                    return Ok(());
                }
            }
        }
    }

    fn apply(
        &self,
        store: &mut ConversationStore,
        live_id: MessageId,
        event: StreamEvent,
        report: &mut TurnReport,
        conversation_id: &str,
    ) {
        let summary = match &event {
            StreamEvent::Text(delta) => {
                store.append_to_live(live_id, delta);
                report.text_events += 1;
                delta.clone()
            }
            StreamEvent::Status(status) => {
                store.set_transient_status(Some(status.clone()));
                report.status_events += 1;
                status.clone()
            }
            StreamEvent::Done => {
                store.set_transient_status(None);
                String::new()
            }
            StreamEvent::Malformed { raw } => {
                tracing::warn!("Skipping malformed stream line: {}", raw);
                emit_debug(
                    &self.debug_tx,
                    DebugEventKind::MalformedLine(MalformedLineData::new(raw.as_str())),
                    conversation_id,
                );
                report.malformed_lines.push(raw.clone());
                return;
            }
        };

        emit_debug(
            &self.debug_tx,
            DebugEventKind::ProcessedEvent(ProcessedEventData::new(event.kind(), summary)),
            conversation_id,
        );
    }

    fn emit_lifecycle(&self, phase: StreamPhase, details: Option<String>, conversation_id: &str) {
        let data = match details {
            Some(details) => StreamLifecycleData::with_details(phase, details),
            None => StreamLifecycleData::new(phase),
        };
        emit_debug(
            &self.debug_tx,
            DebugEventKind::StreamLifecycle(data),
            conversation_id,
        );
    }
}
