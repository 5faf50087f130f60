//! Line-oriented terminal host.
//!
//! One process run is one conversation. User lines come from stdin; messages
//! are printed as `author: content`.

use std::collections::HashMap;
use std::io::{IsTerminal, Write};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use uuid::Uuid;

use super::{ChatSurface, MessageHandle, OutboundMessage};
use crate::app::ChatApp;
use crate::error::{RelayError, Result};

const DEFAULT_AUTHOR: &str = "assistant";
const QUIT_COMMAND: &str = "/quit";

struct Screen<W> {
    out: W,
    authors: HashMap<MessageHandle, String>,
    /// Most recent message and the number of lines it occupies.
    last: Option<(MessageHandle, usize)>,
}

/// [`ChatSurface`] that prints to a terminal.
///
/// Updating the message that was printed last rewrites it in place when
/// ANSI control sequences are available. Any other update is printed again
/// with an `(edited)` marker.
pub struct TerminalSurface<W> {
    screen: Mutex<Screen<W>>,
    ansi: bool,
}

impl TerminalSurface<std::io::Stdout> {
    pub fn stdout() -> Self {
        let out = std::io::stdout();
        let ansi = out.is_terminal();
        Self::new(out, ansi)
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(out: W, ansi: bool) -> Self {
        Self {
            screen: Mutex::new(Screen {
                out,
                authors: HashMap::new(),
                last: None,
            }),
            ansi,
        }
    }

    /// Print the input prompt, closing the previous turn.
    pub fn prompt(&self) -> Result<()> {
        self.with_screen(|screen| {
            write!(screen.out, "you> ")?;
            screen.out.flush()?;
            // The user's input line now sits below the last message, and
            // messages from earlier turns are never updated again.
            screen.last = None;
            screen.authors.clear();
            Ok(())
        })
    }

    /// Recover the writer, e.g. to inspect output in tests.
    pub fn into_inner(self) -> W {
        self.screen
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .out
    }

    fn with_screen<T>(&self, f: impl FnOnce(&mut Screen<W>) -> std::io::Result<T>) -> Result<T> {
        let mut screen = self
            .screen
            .lock()
            .map_err(|_| RelayError::Surface("terminal lock poisoned".into()))?;
        Ok(f(&mut screen)?)
    }
}

fn render(author: &str, content: &str) -> (String, usize) {
    let line = format!("{author}: {content}");
    let rows = line.lines().count().max(1);
    (line, rows)
}

#[async_trait]
impl<W: Write + Send> ChatSurface for TerminalSurface<W> {
    async fn send(&self, message: OutboundMessage) -> Result<MessageHandle> {
        let handle = MessageHandle::new();
        let author = message
            .author
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_string());
        self.with_screen(|screen| {
            let (line, rows) = render(&author, &message.content);
            writeln!(screen.out, "{line}")?;
            screen.out.flush()?;
            screen.authors.insert(handle, author);
            screen.last = Some((handle, rows));
            Ok(())
        })?;
        Ok(handle)
    }

    async fn update(&self, handle: &MessageHandle, content: &str) -> Result<()> {
        let ansi = self.ansi;
        self.with_screen(|screen| {
            let Some(author) = screen.authors.get(handle).cloned() else {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("unknown message {handle}"),
                ));
            };
            let (line, rows) = render(&author, content);
            match screen.last {
                Some((last, last_rows)) if ansi && last == *handle => {
                    // Move up over the old rendering and clear to the end.
                    write!(screen.out, "\x1b[{last_rows}A\r\x1b[J")?;
                    writeln!(screen.out, "{line}")?;
                    screen.last = Some((*handle, rows));
                }
                _ => {
                    let (edited, edited_rows) = render(&format!("{author} (edited)"), content);
                    writeln!(screen.out, "{edited}")?;
                    screen.last = Some((*handle, edited_rows));
                }
            }
            screen.out.flush()
        })
        .map_err(|e| match e {
            RelayError::Io(io) => RelayError::Surface(io.to_string()),
            other => other,
        })
    }
}

/// Drive one conversation from `input` until EOF or `/quit`.
///
/// A failure to start the session ends the conversation with that error.
pub async fn run_conversation<R, W>(
    app: &ChatApp,
    input: R,
    surface: &TerminalSurface<W>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write + Send,
{
    let conversation_id = Uuid::new_v4().to_string();
    app.on_chat_start(&conversation_id).await?;

    let mut lines = input.lines();
    loop {
        surface.prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text == QUIT_COMMAND {
            break;
        }
        app.on_message(&conversation_id, text, surface).await;
    }

    app.on_chat_end(&conversation_id);
    Ok(())
}
