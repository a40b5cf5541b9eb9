//! Line-oriented terminal output.
//!
//! [`ConsoleRenderer`] turns successive session snapshots into incremental
//! writes: new assistant text is printed as it lands, transient status on
//! its own line, and a failed reply as a single error line. User messages
//! are not echoed since the user just typed them.

use std::collections::HashSet;
use std::future::Future;
use std::io::{self, Write};

use tokio::sync::watch;

use crate::models::{ConversationId, Message, MessageId, MessageRole};
use crate::state::ConversationSession;

const ASSISTANT_PREFIX: &str = "assistant> ";
const STATUS_PREFIX: &str = "... ";

/// Progress through the assistant message currently being printed.
#[derive(Debug)]
struct Cursor {
    id: MessageId,
    printed: usize,
    started: bool,
}

/// Renders session snapshots to a writer, printing only what changed.
#[derive(Debug)]
pub struct ConsoleRenderer<W: Write> {
    out: W,
    conversation_id: Option<ConversationId>,
    finished: HashSet<MessageId>,
    cursor: Option<Cursor>,
    status: Option<String>,
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            conversation_id: None,
            finished: HashSet::new(),
            cursor: None,
            status: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print whatever changed since the previous snapshot.
    pub fn render(&mut self, session: &ConversationSession) -> io::Result<()> {
        if self.conversation_id.as_ref() != Some(&session.conversation_id) {
            if self.conversation_id.is_some() {
                self.end_line()?;
                writeln!(self.out, "--- new conversation {} ---", session.conversation_id)?;
            }
            self.conversation_id = Some(session.conversation_id.clone());
            self.finished.clear();
            self.cursor = None;
            self.status = None;
        }

        if session.transient_status != self.status {
            if let Some(status) = &session.transient_status {
                self.end_line()?;
                writeln!(self.out, "{}{}", STATUS_PREFIX, status)?;
                if let Some(cursor) = self.cursor.as_mut() {
                    cursor.started = false;
                }
            }
            self.status = session.transient_status.clone();
        }

        for message in &session.messages {
            if self.finished.contains(&message.id) {
                continue;
            }
            match message.role {
                MessageRole::User => {
                    self.finished.insert(message.id);
                }
                MessageRole::Assistant => {
                    let live = session.live_message_id == Some(message.id);
                    self.render_assistant(message, live)?;
                }
            }
        }

        self.out.flush()
    }

    fn render_assistant(&mut self, message: &Message, live: bool) -> io::Result<()> {
        let printed = match &self.cursor {
            Some(cursor) if cursor.id == message.id => cursor.printed,
            _ => {
                self.end_line()?;
                self.cursor = Some(Cursor {
                    id: message.id,
                    printed: 0,
                    started: false,
                });
                0
            }
        };

        if message.failed {
            self.end_line()?;
            writeln!(self.out, "error: {}", message.text)?;
            self.finish(message.id);
            return Ok(());
        }

        let fresh = message.text.get(printed..).unwrap_or_default();
        if !fresh.is_empty() {
            if !self.cursor.as_ref().is_some_and(|c| c.started) {
                write!(self.out, "{}", ASSISTANT_PREFIX)?;
            }
            write!(self.out, "{}", fresh)?;
            if let Some(cursor) = self.cursor.as_mut() {
                cursor.printed = message.text.len();
                cursor.started = true;
            }
        }

        if !live {
            self.end_line()?;
            self.finish(message.id);
        }
        Ok(())
    }

    /// Terminate a partially printed assistant line.
    fn end_line(&mut self) -> io::Result<()> {
        if let Some(cursor) = self.cursor.as_mut() {
            if cursor.started {
                writeln!(self.out)?;
                cursor.started = false;
            }
        }
        Ok(())
    }

    fn finish(&mut self, id: MessageId) {
        self.finished.insert(id);
        self.cursor = None;
    }
}

/// Await `work` while rendering every session change published on `rx`.
///
/// The final snapshot is rendered after `work` completes, so its effects are
/// on screen before this returns.
pub async fn render_while<F, W>(
    work: F,
    rx: &mut watch::Receiver<ConversationSession>,
    renderer: &mut ConsoleRenderer<W>,
) -> io::Result<F::Output>
where
    F: Future,
    W: Write,
{
    tokio::pin!(work);
    let mut sender_alive = true;

    let output = loop {
        tokio::select! {
            output = &mut work => break output,
            changed = rx.changed(), if sender_alive => match changed {
                Ok(()) => {
                    let session = rx.borrow_and_update().clone();
                    renderer.render(&session)?;
                }
                Err(_) => sender_alive = false,
            },
        }
    };

    let session = rx.borrow_and_update().clone();
    renderer.render(&session)?;
    Ok(output)
}
