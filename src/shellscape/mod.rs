use app::{InputMode, ShellscapeApp};
use commands::ShellscapeCommands;
use events::{ShellscapeEvents, ShellscapeTerminalEvents};
use ratatui::{prelude::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use ui::ShellscapeInterface;

use crate::{
    error::{ErrorAction, ErrorKind, VcThemeError},
    themes::{ActivationScope, ThemeConfig},
    VcThemeResult,
};

pub mod app;
pub mod commands;
mod events;
pub mod metadata;
pub mod notifications;
mod ui;
mod widgets;

/// Terminal front end: owns the channel fed by the terminal event reader.
#[derive(Debug)]
pub struct Shellscape {
    events_sender: UnboundedSender<ShellscapeTerminalEvents>,
    events_receiver: UnboundedReceiver<ShellscapeTerminalEvents>,
}

impl Shellscape {
    pub fn new() -> Self {
        let (events_sender, events_receiver) = mpsc::unbounded_channel();

        Self {
            events_sender,
            events_receiver,
        }
    }

    fn get_terminal(&self) -> VcThemeResult<Terminal<CrosstermBackend<Stdout>>> {
        let backend = CrosstermBackend::new(io::stdout());

        Terminal::new(backend).map_err(|err| {
            VcThemeError::raise_critical_interface_error(
                ErrorKind::TerminalInitializationFailed,
                &format!("Failed to create terminal backend: {}", err),
                ErrorAction::Exit,
            )
        })
    }

    pub fn create_interface(
        &self,
    ) -> VcThemeResult<ShellscapeInterface<CrosstermBackend<Stdout>>> {
        self.get_terminal().map(ShellscapeInterface::new)
    }

    pub fn create_app(&self, theme: &ThemeConfig) -> ShellscapeApp {
        ShellscapeApp::new(
            env!("CARGO_PKG_VERSION"),
            theme.get_display_name(),
            theme.get_activation_scope() == ActivationScope::PerSection,
        )
    }

    pub fn create_events(&self, tick_rate: u64) -> ShellscapeEvents {
        ShellscapeEvents::new(tick_rate, self.events_sender.clone())
    }

    pub async fn next(&mut self) -> VcThemeResult<ShellscapeTerminalEvents> {
        self.events_receiver.recv().await.ok_or_else(|| {
            VcThemeError::raise_critical_interface_error(
                ErrorKind::TerminalEventReceiveFailed,
                "Error while receiving response from Shellscape sender: No response received.",
                ErrorAction::Exit,
            )
        })
    }

    pub fn match_shellscape_event(
        &self,
        event: ShellscapeTerminalEvents,
        input_mode: &InputMode,
    ) -> ShellscapeCommands {
        match event {
            ShellscapeTerminalEvents::Key(key) => ShellscapeCommands::from_key_event(key, input_mode),
            _ => ShellscapeCommands::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::{
        shellscape::{
            app::InputMode, commands::ShellscapeCommands, events::ShellscapeTerminalEvents,
            Shellscape,
        },
        themes::{builtin_themes, find_theme},
    };

    #[test]
    fn test_only_key_events_become_commands() {
        let shellscape = Shellscape::new();
        let key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);

        assert_eq!(
            shellscape.match_shellscape_event(ShellscapeTerminalEvents::Key(key), &InputMode::Normal),
            ShellscapeCommands::StartAddition
        );
        assert_eq!(
            shellscape.match_shellscape_event(ShellscapeTerminalEvents::Tick, &InputMode::Normal),
            ShellscapeCommands::None
        );
        assert_eq!(
            shellscape.match_shellscape_event(ShellscapeTerminalEvents::Resize(80, 24), &InputMode::Normal),
            ShellscapeCommands::None
        );
    }

    #[test]
    fn test_app_is_section_aware_for_sectioned_themes() {
        let shellscape = Shellscape::new();

        let discord_plus = shellscape.create_app(&find_theme(&builtin_themes(), "Discord+").unwrap());
        let softx = shellscape.create_app(&find_theme(&builtin_themes(), "SoftX").unwrap());

        assert!(discord_plus.section_aware);
        assert!(!softx.section_aware);
        assert_eq!(discord_plus.metadata.version, env!("CARGO_PKG_VERSION"));
    }
}
