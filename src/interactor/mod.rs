use std::path::Path;

use chrono::Local;
use tracing::{debug, info};

use crate::{
    baraddur::ObserverEvents,
    error::VcThemeError,
    session::BackdropSession,
    shellscape::{
        app::{InputMode, ShellscapeApp},
        commands::ShellscapeCommands,
        notifications::ShellscapeNotifications,
    },
    themes::ActivationScope,
    VcThemeResult,
};

#[derive(Clone, PartialEq, Debug)]
pub enum InteractorFlow {
    Continue,
    Terminate,
}

/// Applies shellscape commands and observer events to the session, and reports every
/// outcome to the app as a notification.
#[derive(Clone, PartialEq, Debug)]
pub struct Interactor {
    session: BackdropSession,
    app: ShellscapeApp,
}

impl Interactor {
    pub fn new(session: BackdropSession, app: ShellscapeApp) -> Self {
        Self { session, app }
    }

    pub fn get_app_mut(&mut self) -> &mut ShellscapeApp {
        &mut self.app
    }

    pub fn get_input_mode(&self) -> &InputMode {
        &self.app.input_mode
    }

    /// Loads the theme file into the session. Failing to load it is fatal for the UI.
    pub async fn open(&mut self, path: &Path) -> VcThemeResult<()> {
        let start_time = Local::now();
        let opened = self.session.open_file(path).await?;
        let file_name = path.to_string_lossy().to_string();

        self.app.reset_file_heading(file_name.clone());
        self.app.reset_backdrops(opened.entries);
        self.app.reset_section_target(self.session.get_section_target());

        if !opened.name_matches_theme {
            self.app.add_notification(ShellscapeNotifications::create_warning(
                start_time,
                &format!(
                    "The file **{}** does not look like a {} theme file. Backdrops may not be detected correctly.",
                    file_name,
                    self.session.get_theme().get_display_name()
                ),
            ));
        }

        self.app.add_notification(ShellscapeNotifications::create_success(
            start_time,
            &format!(
                "Loaded **{}** backdrops from **{}**",
                self.app.backdrops.len(),
                file_name
            ),
        ));

        Ok(())
    }

    pub async fn handle(&mut self, command: ShellscapeCommands) -> InteractorFlow {
        debug!("Handling shellscape command: {:?}", command);

        match command {
            ShellscapeCommands::Terminate => return InteractorFlow::Terminate,
            ShellscapeCommands::None => {}
            ShellscapeCommands::ScrollUp => self.app.scroll_notifications_up(),
            ShellscapeCommands::ScrollDown => self.app.scroll_notifications_down(),
            ShellscapeCommands::CursorUp => self.app.cursor_up(),
            ShellscapeCommands::CursorDown => self.app.cursor_down(),
            ShellscapeCommands::SelectBackdrop => self.select_highlighted().await,
            ShellscapeCommands::StartAddition => self.app.enter_input_mode(),
            ShellscapeCommands::InputChar(character) => self.app.push_input_char(character),
            ShellscapeCommands::InputBackspace => self.app.pop_input_char(),
            ShellscapeCommands::CancelInput => self.app.reset_input_mode(),
            ShellscapeCommands::SubmitInput => self.submit_input().await,
            ShellscapeCommands::RequestDeletion => self.request_deletion().await,
            ShellscapeCommands::ConfirmDeletion => self.confirm_deletion().await,
            ShellscapeCommands::CancelDeletion => {
                self.app.reset_input_mode();
                self.app.add_notification(ShellscapeNotifications::create_information(
                    Local::now(),
                    "Deletion cancelled.",
                ));
            }
            ShellscapeCommands::RestoreBackdrop => self.restore_last().await,
            ShellscapeCommands::CycleSectionTarget => self.cycle_section_target(),
            ShellscapeCommands::Reload => self.reload().await,
        }

        InteractorFlow::Continue
    }

    pub async fn handle_observer_event(&mut self, event: ObserverEvents) {
        match event {
            ObserverEvents::StartingMessage(message) => {
                self.app.add_notification(ShellscapeNotifications::create_information(
                    Local::now(),
                    &message,
                ));
            }
            ObserverEvents::AsyncDebouncerError(message) => {
                self.app.add_notification(ShellscapeNotifications::create_warning(
                    Local::now(),
                    &format!(
                        "The file observer stopped: {}. Press **r** to reload by hand.",
                        message
                    ),
                ));
            }
            ObserverEvents::ModifiedPath(path) => {
                let start_time = Local::now();

                match self.session.reload_backdrops().await {
                    Ok(entries) => {
                        if self.app.reset_backdrops(entries) {
                            info!("Backdrop list changed on disk: {:?}", path);

                            self.app.add_notification(ShellscapeNotifications::create_information(
                                start_time,
                                &format!(
                                    "**{}** changed on disk. The backdrop list was reloaded.",
                                    path.to_string_lossy()
                                ),
                            ));
                        }
                    }
                    Err(err) => self.notify_error(err),
                }
            }
        }
    }

    pub fn notify_error(&mut self, error: VcThemeError) {
        self.app
            .add_notification(ShellscapeNotifications::create_vctheme_error(
                Local::now(),
                error,
            ));
    }

    fn notify_activation_warning(&mut self, error: VcThemeError) {
        self.app.add_notification(ShellscapeNotifications::create_warning(
            Local::now(),
            &format!("The file was saved without a new active backdrop. {}", error.get_message()),
        ));
    }

    async fn refresh_backdrops(&mut self) {
        match self.session.backdrops().await {
            Ok(entries) => {
                self.app.reset_backdrops(entries);
            }
            Err(err) => self.notify_error(err),
        }
    }

    async fn select_highlighted(&mut self) {
        let url = match self.app.highlighted_backdrop() {
            Some(entry) => entry.url.clone(),
            None => return self.warn_no_backdrop(),
        };

        let start_time = Local::now();

        match self.session.select_backdrop(&url).await {
            Ok(()) => {
                self.app.add_notification(ShellscapeNotifications::create_success(
                    start_time,
                    &format!(
                        "**{}** is now the active backdrop in {}.",
                        url,
                        self.session.get_section_target()
                    ),
                ));
                self.refresh_backdrops().await;
            }
            Err(err) => self.notify_error(err),
        }
    }

    async fn submit_input(&mut self) {
        let url = self.app.input_buffer.trim().to_string();
        let start_time = Local::now();

        match self.session.add_backdrop(&url).await {
            Ok(()) => {
                self.app.reset_input_mode();
                self.app.add_notification(ShellscapeNotifications::create_success(
                    start_time,
                    &format!("Backdrop **{}** added to the theme.", url),
                ));
                self.refresh_backdrops().await;
            }
            // The typed URL stays in the input line so it can be corrected.
            Err(err) => self.notify_error(err),
        }
    }

    async fn request_deletion(&mut self) {
        let url = match self.app.highlighted_backdrop() {
            Some(entry) => entry.url.clone(),
            None => return self.warn_no_backdrop(),
        };

        match self.session.ensure_deletable(&url).await {
            Ok(()) => self.app.enter_confirm_mode(&url),
            Err(err) => self.notify_error(err),
        }
    }

    async fn confirm_deletion(&mut self) {
        let url = match &self.app.input_mode {
            InputMode::Confirm(url) => url.clone(),
            _ => return,
        };

        self.app.reset_input_mode();

        let start_time = Local::now();

        match self.session.delete_backdrop(&url).await {
            Ok(deletion) => {
                self.app.add_notification(ShellscapeNotifications::create_success(
                    start_time,
                    &format!(
                        "Backdrop **{}** deleted. Press **u** to restore it.",
                        url
                    ),
                ));

                for replacement in &deletion.replacements {
                    self.app.add_notification(ShellscapeNotifications::create_information(
                        Local::now(),
                        &format!("**{}** is now the active backdrop.", replacement),
                    ));
                }

                if let Some(err) = deletion.activation_warning {
                    self.notify_activation_warning(err);
                }

                self.refresh_backdrops().await;
            }
            Err(err) => self.notify_error(err),
        }
    }

    async fn restore_last(&mut self) {
        let start_time = Local::now();

        match self.session.restore_last().await {
            Ok(restoration) => {
                self.app.add_notification(ShellscapeNotifications::create_success(
                    start_time,
                    &format!("Backdrop **{}** restored.", restoration.url),
                ));

                if let Some(err) = restoration.activation_warning {
                    self.notify_activation_warning(err);
                }

                self.refresh_backdrops().await;
            }
            Err(err) => self.notify_error(err),
        }
    }

    fn cycle_section_target(&mut self) {
        let theme = self.session.get_theme();

        if theme.get_activation_scope() != ActivationScope::PerSection {
            let message = format!(
                "**{}** keeps a single active backdrop for the whole file.",
                theme.get_display_name()
            );

            self.app
                .add_notification(ShellscapeNotifications::create_warning(Local::now(), &message));

            return;
        }

        let section_target = self.session.cycle_section_target();

        self.app.reset_section_target(section_target);
        self.app.add_notification(ShellscapeNotifications::create_information(
            Local::now(),
            &format!("Selections now apply to **{}**.", section_target),
        ));
    }

    async fn reload(&mut self) {
        let start_time = Local::now();

        match self.session.backdrops().await {
            Ok(entries) => {
                self.app.reset_backdrops(entries);
                self.app.add_notification(ShellscapeNotifications::create_success(
                    start_time,
                    &format!("Reloaded **{}** backdrops.", self.app.backdrops.len()),
                ));
            }
            Err(err) => self.notify_error(err),
        }
    }

    fn warn_no_backdrop(&mut self) {
        self.app.add_notification(ShellscapeNotifications::create_warning(
            Local::now(),
            "No backdrop is highlighted.",
        ));
    }
}
