//! What the terminal shows, and how it is drawn

use crate::suggest::Suggestion;
use crate::widget::{InputField, ListView, StatusView};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::queue;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

const PROMPT: &str = "> ";
/// Terminal row of the first suggestion
pub const FIRST_ROW: u16 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Screen {
    pub text: String,
    pub focused: bool,
    pub status: String,
    pub rows: Vec<Row>,
    pub selected: Option<usize>,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            text: String::new(),
            focused: true,
            status: String::new(),
            rows: Vec::new(),
            selected: None,
        }
    }
}

impl Screen {
    /// Row index under terminal line `y`
    pub fn row_at(&self, y: u16) -> Option<usize> {
        let index = usize::from(y.checked_sub(FIRST_ROW)?);
        (index < self.rows.len()).then_some(index)
    }

    pub fn draw(&self, out: &mut impl Write, width: u16) -> io::Result<()> {
        let width = usize::from(width.max(1));

        queue!(out, Hide, MoveTo(0, 0), Clear(ClearType::All))?;
        queue!(out, Print(clip(&format!("{}{}", PROMPT, self.text), width)))?;

        queue!(
            out,
            MoveTo(0, 1),
            SetForegroundColor(Color::DarkGrey),
            Print(clip(&self.status, width)),
            ResetColor
        )?;

        for (i, row) in self.rows.iter().enumerate() {
            let line = match &row.description {
                Some(description) => format!("{} - {}", row.title, description),
                None => row.title.clone(),
            };
            queue!(out, MoveTo(0, FIRST_ROW + i as u16))?;
            if self.selected == Some(i) {
                queue!(out, SetAttribute(Attribute::Reverse))?;
            }
            queue!(out, Print(clip(&line, width)), SetAttribute(Attribute::Reset))?;
        }

        if self.focused {
            let column = (PROMPT.chars().count() + self.text.chars().count()).min(width - 1);
            queue!(out, MoveTo(column as u16, 0), Show)?;
        }
        out.flush()
    }
}

fn clip(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// Handle shared by the widget views and the event loop
#[derive(Clone, Default)]
pub struct TerminalView {
    screen: Arc<Mutex<Screen>>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, Screen> {
        self.screen.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Apply `f` to the screen, then redraw
    pub fn update<R>(&self, f: impl FnOnce(&mut Screen) -> R) -> R {
        let mut screen = self.lock();
        let result = f(&mut screen);
        let width = terminal::size().map(|(w, _)| w).unwrap_or(80);
        if let Err(e) = screen.draw(&mut io::stdout(), width) {
            debug!("Redraw failed: {}", e);
        }
        result
    }
}

impl InputField for TerminalView {
    fn set_text(&mut self, text: &str) {
        self.update(|s| s.text = text.to_string());
    }

    fn blur(&mut self) {
        self.update(|s| s.focused = false);
    }
}

impl StatusView for TerminalView {
    fn set_status(&mut self, text: &str) {
        self.update(|s| s.status = text.to_string());
    }
}

impl ListView for TerminalView {
    fn render(&mut self, items: &[Suggestion], selected: Option<usize>) {
        let rows = items
            .iter()
            .map(|item| Row {
                title: item.title().to_string(),
                description: item.description().map(str::to_string),
                url: item.url().map(str::to_string),
            })
            .collect();
        self.update(|s| {
            s.rows = rows;
            s.selected = selected;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen_with_rows(n: usize) -> Screen {
        Screen {
            rows: (0..n)
                .map(|i| Row {
                    title: format!("Row {}", i),
                    description: None,
                    url: None,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_row_at() {
        let screen = screen_with_rows(2);
        assert_eq!(screen.row_at(0), None);
        assert_eq!(screen.row_at(1), None);
        assert_eq!(screen.row_at(FIRST_ROW), Some(0));
        assert_eq!(screen.row_at(FIRST_ROW + 1), Some(1));
        assert_eq!(screen.row_at(FIRST_ROW + 2), None);
    }

    #[test]
    fn test_draw_contains_text() {
        let mut screen = screen_with_rows(1);
        screen.text = "cat".to_string();
        screen.status = "Loading…".to_string();

        let mut out = Vec::new();
        screen.draw(&mut out, 80).unwrap();
        let drawn = String::from_utf8_lossy(&out);

        assert!(drawn.contains("> cat"));
        assert!(drawn.contains("Loading…"));
        assert!(drawn.contains("Row 0"));
    }

    #[test]
    fn test_clip_counts_chars() {
        assert_eq!(clip("Loading…", 8), "Loading…");
        assert_eq!(clip("abcdef", 3), "abc");
    }
}
