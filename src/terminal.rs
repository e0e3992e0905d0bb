use std::io::{self, Stdout};
use std::ops::{Deref, DerefMut};
use std::panic;
use std::sync::Once;

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

pub type CoachTerminal = Terminal<CrosstermBackend<Stdout>>;

static PANIC_HOOK: Once = Once::new();

/// Owns the raw-mode alternate screen; dropping it hands the terminal back.
pub struct TerminalSession {
    terminal: CoachTerminal,
    restored: bool,
}

impl TerminalSession {
    /// Restores the terminal now and reports any failure.
    pub fn close(mut self) -> io::Result<()> {
        self.restored = true;
        restore()
    }
}

impl Deref for TerminalSession {
    type Target = CoachTerminal;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for TerminalSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if !self.restored {
            if let Err(err) = restore() {
                tracing::error!(error = %err, "failed to restore terminal");
            }
        }
    }
}

/// Switches to raw mode on the alternate screen with the cursor hidden.
pub fn init() -> io::Result<TerminalSession> {
    PANIC_HOOK.call_once(install_panic_hook);
    enable_raw_mode()?;
    if let Err(err) = execute!(io::stdout(), EnterAlternateScreen, Hide) {
        let _ = disable_raw_mode();
        return Err(err);
    }
    let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    Ok(TerminalSession {
        terminal,
        restored: false,
    })
}

pub fn restore() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)?;
    Ok(())
}

/// Gives the terminal back before the panic message is printed.
fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if let Err(err) = restore() {
            tracing::error!(error = %err, "failed to restore terminal after panic");
        }
        tracing::error!(%info, "panic in interview coach");
        previous(info);
    }));
}
