//! TerminalSession: owns the real terminal for the lifetime of a render loop.
//!
//! Entering switches to the alternate screen in raw mode with the cursor hidden
//! and line wrap disabled; exiting restores all of it. Frames are written
//! through the `Write` impl, which the encoder uses for its single write + flush
//! per frame.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::ResetColor,
    terminal, QueueableCommand,
};
use log::debug;

pub struct TerminalSession {
    stdout: io::Stdout,
    buf: Vec<u8>,
    clear_on_enter: bool,
    active: bool,
}

impl Default for TerminalSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalSession {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            buf: Vec::with_capacity(256),
            clear_on_enter: false,
            active: false,
        }
    }

    /// Clear the alternate screen when entering.
    pub fn with_clear_on_enter(mut self, clear: bool) -> Self {
        self.clear_on_enter = clear;
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        if self.clear_on_enter {
            self.buf.queue(terminal::Clear(terminal::ClearType::All))?;
        }
        self.flush_buf()?;
        self.active = true;
        debug!("terminal: session entered");
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        queue_restore(&mut self.buf)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        self.active = false;
        debug!("terminal: session exited");
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Write for TerminalSession {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.stdout.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if self.active {
            let _ = self.exit();
        }
    }
}

/// Queue the bytes that undo [`TerminalSession::enter`].
///
/// `ESC[0m` resets colours and attributes alike, so it is sent once.
fn queue_restore(buf: &mut Vec<u8>) -> io::Result<()> {
    buf.queue(ResetColor)?;
    buf.queue(terminal::EnableLineWrap)?;
    buf.queue(cursor::Show)?;
    buf.queue(terminal::LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_resets_colours_once() {
        let mut buf = Vec::new();
        queue_restore(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("\x1b[0m"));
        assert_eq!(text.matches("\x1b[0m").count(), 1);
        assert!(text.contains("\x1b[?25h"));
        assert!(text.ends_with("\x1b[?1049l"));
    }

    #[test]
    fn new_session_is_inactive() {
        let session = TerminalSession::new().with_clear_on_enter(true);
        assert!(!session.is_active());
        assert!(session.clear_on_enter);
    }
}
