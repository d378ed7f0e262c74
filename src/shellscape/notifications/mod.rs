use chrono::{DateTime, Local, TimeDelta};

use crate::error::VcThemeError;

#[derive(Clone, PartialEq, Debug)]
pub enum ShellscapeNotifications {
    Success {
        start_time: DateTime<Local>,
        ending_time: DateTime<Local>,
        duration: TimeDelta,
        message: String,
    },
    Information {
        start_time: DateTime<Local>,
        message: String,
    },
    Warning {
        start_time: DateTime<Local>,
        message: String,
    },
    VcThemeError {
        start_time: DateTime<Local>,
        error: VcThemeError,
    },
}

impl ShellscapeNotifications {
    /// A success for an operation that started at `start_time` and finished now.
    pub fn create_success(start_time: DateTime<Local>, message: &str) -> Self {
        let ending_time = Local::now();

        ShellscapeNotifications::Success {
            start_time,
            ending_time,
            duration: ending_time - start_time,
            message: message.to_string(),
        }
    }

    pub fn create_information(start_time: DateTime<Local>, message: &str) -> Self {
        ShellscapeNotifications::Information {
            start_time,
            message: message.to_string(),
        }
    }

    pub fn create_warning(start_time: DateTime<Local>, message: &str) -> Self {
        ShellscapeNotifications::Warning {
            start_time,
            message: message.to_string(),
        }
    }

    pub fn create_vctheme_error(start_time: DateTime<Local>, error: VcThemeError) -> Self {
        ShellscapeNotifications::VcThemeError { start_time, error }
    }

    pub fn get_message(&self) -> String {
        match self {
            ShellscapeNotifications::Success { message, .. }
            | ShellscapeNotifications::Information { message, .. }
            | ShellscapeNotifications::Warning { message, .. } => message.clone(),
            ShellscapeNotifications::VcThemeError { error, .. } => error.get_message(),
        }
    }
}
