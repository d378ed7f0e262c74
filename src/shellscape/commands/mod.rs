use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

use super::app::InputMode;

/// Enum representing the various shellscape commands.
#[derive(Clone, PartialEq, Debug)]
pub enum ShellscapeCommands {
    /// Command to terminate the shellscape.
    Terminate,
    /// No operation or command.
    None,
    ScrollUp,
    ScrollDown,
    CursorUp,
    CursorDown,
    SelectBackdrop,
    StartAddition,
    RequestDeletion,
    RestoreBackdrop,
    CycleSectionTarget,
    Reload,
    InputChar(char),
    InputBackspace,
    SubmitInput,
    CancelInput,
    ConfirmDeletion,
    CancelDeletion,
}

impl ShellscapeCommands {
    /// Converts a `KeyEvent` into a `ShellscapeCommands` variant for the current input mode.
    ///
    /// `Ctrl+C` terminates from every mode. While typing a URL every printable key goes to the
    /// input line, and while a deletion waits for confirmation only `y`, `n` and `Esc` count.
    pub fn from_key_event(event: KeyEvent, input_mode: &InputMode) -> ShellscapeCommands {
        info!("Handling key event: {:?} in mode {:?}", event, input_mode);

        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && matches!(event.code, KeyCode::Char('c') | KeyCode::Char('C')) {
            info!("Received termination command via `Ctrl+C`");

            return ShellscapeCommands::Terminate;
        }

        match input_mode {
            InputMode::Normal => Self::from_normal_key(event, ctrl),
            InputMode::Input => match event.code {
                KeyCode::Esc => ShellscapeCommands::CancelInput,
                KeyCode::Enter => ShellscapeCommands::SubmitInput,
                KeyCode::Backspace => ShellscapeCommands::InputBackspace,
                KeyCode::Char(character) if !ctrl => ShellscapeCommands::InputChar(character),
                _ => ShellscapeCommands::None,
            },
            InputMode::Confirm(_) => match event.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => ShellscapeCommands::ConfirmDeletion,
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    ShellscapeCommands::CancelDeletion
                }
                _ => ShellscapeCommands::None,
            },
        }
    }

    fn from_normal_key(event: KeyEvent, ctrl: bool) -> ShellscapeCommands {
        match event.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                info!("Received termination event from Esc or 'q'");
                ShellscapeCommands::Terminate
            }
            KeyCode::Up if ctrl => ShellscapeCommands::ScrollUp,
            KeyCode::Down if ctrl => ShellscapeCommands::ScrollDown,
            KeyCode::Char('z') | KeyCode::Char('Z') if ctrl => ShellscapeCommands::RestoreBackdrop,
            _ if ctrl => ShellscapeCommands::None,
            KeyCode::Up | KeyCode::Char('k') => ShellscapeCommands::CursorUp,
            KeyCode::Down | KeyCode::Char('j') => ShellscapeCommands::CursorDown,
            KeyCode::Enter => ShellscapeCommands::SelectBackdrop,
            KeyCode::Char('a') => ShellscapeCommands::StartAddition,
            KeyCode::Delete | KeyCode::Char('d') => ShellscapeCommands::RequestDeletion,
            KeyCode::Char('u') => ShellscapeCommands::RestoreBackdrop,
            KeyCode::Char('s') => ShellscapeCommands::CycleSectionTarget,
            KeyCode::Char('r') => ShellscapeCommands::Reload,
            _ => ShellscapeCommands::None,
        }
    }
}
