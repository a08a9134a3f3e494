//! Raw mode and alternate screen ownership for the demo.
//!
//! A process-wide flag records whether the demo currently owns the screen, so
//! the guard's `Drop` and the panic hook restore it exactly once and a panic
//! raised before the screen is entered leaves the terminal alone.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};

static SCREEN_ENTERED: AtomicBool = AtomicBool::new(false);

/// Owns the terminal while the demo runs; leaving is idempotent.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    /// Switch to raw mode on the alternate screen.
    pub fn enter() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        SCREEN_ENTERED.store(true, Ordering::SeqCst);
        // From here on Drop undoes raw mode even if the switch fails
        let guard = Self { _private: () };
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }

    /// Hand the terminal back, reporting failures. Drop does nothing after this.
    pub fn leave(&mut self) -> anyhow::Result<()> {
        leave_screen().map(|_| ())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = leave_screen() {
            tracing::debug!(error = %e, "Could not hand the terminal back on drop");
        }
    }
}

/// Restore the terminal if it is still owned. Returns whether anything was done.
fn leave_screen() -> anyhow::Result<bool> {
    if !SCREEN_ENTERED.swap(false, Ordering::SeqCst) {
        return Ok(false);
    }
    let mut stdout = io::stdout();
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;
    stdout.flush()?;
    Ok(true)
}

/// Chain a panic hook that hands the terminal back before the message prints.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Err(e) = leave_screen() {
            tracing::debug!(error = %e, "Could not hand the terminal back on panic");
        }
        previous(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaving_unowned_screen_is_a_no_op() {
        assert!(!SCREEN_ENTERED.load(Ordering::SeqCst));
        assert!(!leave_screen().unwrap());
    }
}
