use crossterm::event::{Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;

use crate::shutdown::Shutdown;

/// Raw mode swallows SIGINT, so interactive mode watches the keyboard and
/// sets the shutdown flag itself.
pub struct KeyListener {
    task: tokio::task::JoinHandle<()>,
}

impl KeyListener {
    pub fn spawn(shutdown: Shutdown) -> Self {
        let task = tokio::spawn(async move {
            let mut reader = EventStream::new();
            while let Some(event) = reader.next().await {
                match event {
                    Ok(CrosstermEvent::Key(key)) if is_quit_key(&key) => {
                        tracing::debug!(?key.code, "quit key pressed");
                        shutdown.trigger();
                        break;
                    }
                    Ok(_) => {}
                    Err(err) => {
                        tracing::warn!(error = %err, "terminal input stream failed");
                        break;
                    }
                }
            }
        });

        Self { task }
    }
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
