//! Interactive terminal frontend
//!
//! Raw-mode prompt with a status line and the suggestion list underneath.
//! Keys: type to search, Up/Down to move, Enter to open, Esc to drop the
//! selection, click a row to pick it, Ctrl-C or Ctrl-D to quit.

mod screen;

pub use screen::{Row, Screen, TerminalView, FIRST_ROW};

use crate::config::Settings;
use crate::provider::SearchProvider;
use crate::storage::SnapshotStore;
use crate::widget::{Intent, LinkOpener, SystemOpener, Widget, WidgetBuilder};
use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Run the interactive frontend until the user quits
pub async fn run(
    settings: &Settings,
    provider: Arc<dyn SearchProvider>,
    snapshots: SnapshotStore,
) -> Result<()> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;

    let result = event_loop(settings, provider, snapshots).await;

    execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    result
}

async fn event_loop(
    settings: &Settings,
    provider: Arc<dyn SearchProvider>,
    snapshots: SnapshotStore,
) -> Result<()> {
    let view = TerminalView::new();
    let widget = WidgetBuilder::new(provider)
        .settings(settings.suggest.clone())
        .input(view.clone())
        .status(view.clone())
        .list(view.clone())
        .snapshots(snapshots)
        .mount()?;

    let stop = Arc::new(AtomicBool::new(false));
    let (tx, mut events) = mpsc::unbounded_channel();
    let reader = {
        let stop = Arc::clone(&stop);
        tokio::task::spawn_blocking(move || -> io::Result<()> {
            while !stop.load(Ordering::Relaxed) {
                if event::poll(Duration::from_millis(100))? && tx.send(event::read()?).is_err() {
                    break;
                }
            }
            Ok(())
        })
    };

    let mut opener = SystemOpener;
    while let Some(event) = events.recv().await {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if !on_key(key, &view, &widget) {
                    break;
                }
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let clicked = {
                    let screen = view.lock();
                    screen
                        .row_at(mouse.row)
                        .map(|index| (index, screen.rows[index].url.clone()))
                };
                if let Some((index, url)) = clicked {
                    if let Some(url) = url {
                        if let Err(e) = opener.open(&url) {
                            warn!("Could not open {}: {}", url, e);
                        }
                    }
                    widget.send(Intent::Click(index));
                }
            }
            Event::Resize(..) => view.update(|_| ()),
            _ => {}
        }
    }

    stop.store(true, Ordering::Relaxed);
    widget.dispose().await;
    reader.await??;
    info!("Terminal frontend closed");
    Ok(())
}

/// Handle one key press; `false` means quit
fn on_key(key: KeyEvent, view: &TerminalView, widget: &Widget) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => return false,
        KeyCode::Up => widget.send(Intent::MoveUp),
        KeyCode::Down => widget.send(Intent::MoveDown),
        KeyCode::Enter => widget.send(Intent::Activate),
        KeyCode::Esc => widget.send(Intent::Escape),
        KeyCode::Backspace => {
            let text = view.update(|s| {
                s.focused = true;
                s.text.pop();
                s.text.clone()
            });
            widget.input(text);
        }
        KeyCode::Char(c) if !ctrl => {
            let text = view.update(|s| {
                s.focused = true;
                s.text.push(c);
                s.text.clone()
            });
            widget.input(text);
        }
        _ => {}
    }
    true
}
