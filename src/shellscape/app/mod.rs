use rand::Rng;
use ratatui::widgets::ScrollbarState;
use tracing::{debug, info};

use crate::backdropper::{sections::SectionTarget, BackdropEntry};

use super::{metadata::ShellscapeMetadata, notifications::ShellscapeNotifications};

/// What the keyboard is currently driving.
#[derive(Clone, PartialEq, Debug)]
pub enum InputMode {
    /// Browsing the backdrop list.
    Normal,
    /// Typing the URL of a new backdrop.
    Input,
    /// Waiting for `y`/`n` before deleting the given URL.
    Confirm(String),
}

#[derive(Clone, PartialEq, Debug)]
pub struct ShellscapeApp {
    pub metadata: ShellscapeMetadata,
    /// Newest first.
    pub notifications: Vec<ShellscapeNotifications>,
    pub notifications_offset: (u16, u16),
    pub notification_scroll_vertical: ScrollbarState,
    pub backdrops: Vec<BackdropEntry>,
    pub cursor: usize,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub section_target: SectionTarget,
    /// False for themes whose activation ignores sections; hides the target in the UI.
    pub section_aware: bool,
}

impl ShellscapeApp {
    pub fn new(version: &str, theme_name: &str, section_aware: bool) -> Self {
        let metadata = ShellscapeMetadata::new(
            "VCTheme".to_string(),
            random_subtitle_message(),
            theme_name.to_string(),
            None,
            version.to_string(),
            "MIT License".to_string(),
            "Enter select \u{2022} a add \u{2022} d delete \u{2022} u restore \u{2022} s section \u{2022} r reload \u{2022} q quit".to_string(),
        );

        Self {
            metadata,
            notifications: vec![],
            notifications_offset: (0, 0),
            notification_scroll_vertical: ScrollbarState::default(),
            backdrops: vec![],
            cursor: 0,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            section_target: SectionTarget::All,
            section_aware,
        }
    }

    pub fn add_notification(&mut self, notification: ShellscapeNotifications) {
        info!("Adding VCTheme notification in ShellscapeApp.");
        debug!("New notification: {}", notification.get_message());

        self.notifications.insert(0, notification);
        self.notifications_offset = (0, 0);
        self.notification_scroll_vertical = self
            .notification_scroll_vertical
            .content_length(self.notifications.len())
            .position(0);
    }

    pub fn scroll_notifications_up(&mut self) {
        self.notifications_offset.0 = self.notifications_offset.0.saturating_sub(1);
        self.notification_scroll_vertical = self
            .notification_scroll_vertical
            .position(self.notifications_offset.0 as usize);
    }

    pub fn scroll_notifications_down(&mut self) {
        self.notifications_offset.0 = self.notifications_offset.0.saturating_add(1);
        self.notification_scroll_vertical = self
            .notification_scroll_vertical
            .position(self.notifications_offset.0 as usize);
    }

    /// Replaces the listed backdrops, keeping the cursor inside the list.
    ///
    /// Returns false when the new list equals the current one.
    pub fn reset_backdrops(&mut self, backdrops: Vec<BackdropEntry>) -> bool {
        if self.backdrops == backdrops {
            return false;
        }

        self.backdrops = backdrops;
        self.cursor = self.cursor.min(self.backdrops.len().saturating_sub(1));

        true
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.backdrops.len() {
            self.cursor += 1;
        }
    }

    pub fn highlighted_backdrop(&self) -> Option<&BackdropEntry> {
        self.backdrops.get(self.cursor)
    }

    pub fn enter_input_mode(&mut self) {
        self.input_buffer.clear();
        self.input_mode = InputMode::Input;
    }

    pub fn enter_confirm_mode(&mut self, url: &str) {
        self.input_mode = InputMode::Confirm(url.to_string());
    }

    pub fn reset_input_mode(&mut self) {
        self.input_buffer.clear();
        self.input_mode = InputMode::Normal;
    }

    pub fn push_input_char(&mut self, character: char) {
        self.input_buffer.push(character);
    }

    pub fn pop_input_char(&mut self) {
        self.input_buffer.pop();
    }

    pub fn reset_section_target(&mut self, section_target: SectionTarget) {
        self.section_target = section_target;
    }

    pub fn reset_file_heading(&mut self, heading: String) {
        self.metadata.reset_file_heading(heading);
    }
}

fn random_subtitle_message() -> String {
    let messages = [
        "Every Discord deserves a backdrop worth looking at.",
        "Swap the scenery behind your chats without touching a single line by hand.",
        "Backdrops come and go; the theme file stays tidy.",
        "Paste a link, pick a favourite, and let the theme do the rest.",
        "One keystroke between you and a brand new wallpaper.",
    ];

    let idx = rand::thread_rng().gen_range(0..messages.len());
    let selected_message = messages[idx].to_string();

    debug!("Selected random subtitle message: {}", selected_message);

    selected_message
}
