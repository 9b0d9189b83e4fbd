//! Line Input
//!
//! rustyline blocks, so the editor lives on its own thread and hands lines
//! to the async session over channels. A line is only read when the session
//! asks for one.

use std::sync::mpsc as std_mpsc;

use async_trait::async_trait;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;

use nanocode_core::{AgentError, InputEvent, InputSource, Result};

use crate::render::separator;

/// Interactive prompt backed by rustyline
pub struct ReplInput {
    requests: std_mpsc::Sender<()>,
    events: mpsc::Receiver<std::result::Result<InputEvent, String>>,
}

impl ReplInput {
    /// Start the input thread
    pub fn spawn() -> std::io::Result<Self> {
        let (request_tx, request_rx) = std_mpsc::channel::<()>();
        let (event_tx, event_rx) = mpsc::channel(1);

        std::thread::Builder::new()
            .name("nanocode-input".into())
            .spawn(move || read_loop(&request_rx, &event_tx))?;

        Ok(Self {
            requests: request_tx,
            events: event_rx,
        })
    }
}

fn read_loop(
    requests: &std_mpsc::Receiver<()>,
    events: &mpsc::Sender<std::result::Result<InputEvent, String>>,
) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            let _ = events.blocking_send(Err(format!("failed to create line editor: {e}")));
            return;
        }
    };
    let prompt = format!("{} ", "❯".bold().blue());

    while requests.recv().is_ok() {
        println!("{}", separator());
        let event = match editor.readline(&prompt) {
            Ok(line) => {
                println!("{}", separator());
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                Ok(InputEvent::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(InputEvent::Interrupted),
            Err(ReadlineError::Eof) => Ok(InputEvent::Eof),
            Err(e) => Err(e.to_string()),
        };

        let stop = event.is_err();
        if events.blocking_send(event).is_err() || stop {
            break;
        }
    }
}

#[async_trait]
impl InputSource for ReplInput {
    async fn next_line(&mut self) -> Result<InputEvent> {
        if self.requests.send(()).is_err() {
            return Ok(InputEvent::Eof);
        }
        match self.events.recv().await {
            Some(Ok(event)) => Ok(event),
            Some(Err(message)) => Err(AgentError::Io(std::io::Error::other(message))),
            None => Ok(InputEvent::Eof),
        }
    }
}
