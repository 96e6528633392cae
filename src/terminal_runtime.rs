//! Terminal surface lifecycle for the game host.

use std::io;
use std::panic;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::{Frame, Terminal};

type AppTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Raw-mode, alternate-screen surface with mouse capture, released on drop.
pub struct TerminalSession {
    terminal: AppTerminal,
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        let acquired = execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide)
            .and_then(|()| Terminal::new(CrosstermBackend::new(stdout)));

        match acquired {
            Ok(terminal) => {
                tracing::debug!("terminal surface acquired");
                Ok(Self { terminal })
            }
            Err(error) => {
                let _ = restore_terminal();
                Err(error)
            }
        }
    }

    /// Full terminal area anchored at the origin.
    pub fn area(&self) -> io::Result<Rect> {
        let size = self.terminal.size()?;
        Ok(Rect::new(0, 0, size.width, size.height))
    }

    /// Draws one frame. Returns false when the frame had to be dropped.
    pub fn present(&mut self, render: impl FnOnce(&mut Frame<'_>)) -> bool {
        match self.terminal.draw(render) {
            Ok(_) => true,
            Err(error) => {
                tracing::warn!(%error, "skipping frame");
                false
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(error) = restore_terminal() {
            tracing::warn!(%error, "terminal restore failed");
        }
    }
}

/// Chains a hook that gives the terminal back before the panic message
/// prints.
pub fn install_panic_hook() {
    let previous = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        previous(panic_info);
    }));
}

/// Leaves raw mode, mouse capture and the alternate screen. Safe to call
/// more than once.
pub fn restore_terminal() -> io::Result<()> {
    let raw_mode = disable_raw_mode();
    let mut stdout = io::stdout();
    execute!(stdout, DisableMouseCapture, Show, LeaveAlternateScreen)?;
    raw_mode
}
