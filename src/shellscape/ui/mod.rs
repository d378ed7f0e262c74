use std::io;

use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::{prelude::Backend, Terminal};

use crate::{
    error::{ErrorAction, ErrorKind, VcThemeError},
    VcThemeResult,
};

use super::{app::ShellscapeApp, widgets::ShellscapeWidgets};

#[derive(Debug)]
pub struct ShellscapeInterface<B: Backend> {
    terminal: Terminal<B>,
}

impl<B: Backend> ShellscapeInterface<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        Self { terminal }
    }

    /// Switches the terminal to raw mode on the alternate screen.
    ///
    /// A panic hook puts the terminal back before the panic message is printed.
    pub fn invoke(&mut self) -> VcThemeResult<()> {
        terminal::enable_raw_mode().map_err(|err| {
            interface_error(ErrorKind::TerminalRawModeActivationFailed, "enable raw mode", err)
        })?;

        crossterm::execute!(io::stdout(), EnterAlternateScreen).map_err(|err| {
            interface_error(ErrorKind::EnterTerminalAltScreenFailed, "enter the alternate screen", err)
        })?;

        let panic_hook = std::panic::take_hook();

        std::panic::set_hook(Box::new(move |panic| {
            if let Err(err) = Self::reset() {
                tracing::error!("Failed to reset the terminal: {}", err);
            }

            panic_hook(panic);
        }));

        self.terminal.hide_cursor().map_err(|err| {
            interface_error(ErrorKind::TerminalCursorHideFailed, "hide the cursor", err)
        })?;

        self.terminal.clear().map_err(|err| {
            interface_error(ErrorKind::TerminalClearScreenFailed, "clear the screen", err)
        })?;

        Ok(())
    }

    pub fn render(&mut self, shellscape_app: &mut ShellscapeApp) -> VcThemeResult<()> {
        self.terminal
            .draw(|frame| ShellscapeWidgets::paint(frame, shellscape_app))
            .map_err(|err| {
                interface_error(ErrorKind::TerminalWidgetRenderingError, "render the interface", err)
            })?;

        Ok(())
    }

    pub fn reset() -> VcThemeResult<()> {
        terminal::disable_raw_mode().map_err(|err| {
            interface_error(ErrorKind::TerminalRawModeDeactivationFailed, "disable raw mode", err)
        })?;

        crossterm::execute!(io::stdout(), LeaveAlternateScreen).map_err(|err| {
            interface_error(ErrorKind::LeaveTerminalAltScreenFailed, "leave the alternate screen", err)
        })?;

        Ok(())
    }

    pub fn abort(&mut self) -> VcThemeResult<()> {
        Self::reset()?;

        self.terminal.show_cursor().map_err(|err| {
            interface_error(ErrorKind::TerminalCursorUnhideFailed, "show the cursor", err)
        })?;

        Ok(())
    }
}

fn interface_error(kind: ErrorKind, attempt: &str, err: io::Error) -> VcThemeError {
    VcThemeError::raise_critical_interface_error(
        kind,
        &format!("Failed to {}: {}", attempt, err),
        ErrorAction::Exit,
    )
}
