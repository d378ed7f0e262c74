use std::fmt;

use tracing::error;

/// Enum representing errors in VCTheme. It can be either a `CriticalError` or a `GeneralError`,
/// each wrapping a specific type of error information.
#[derive(Clone, PartialEq, Debug)]
pub enum VcThemeError {
    /// A critical error, the current runtime cannot continue after it.
    CriticalError(VcThemeErrorType),
    /// A general error, reported to the user while the runtime keeps going.
    GeneralError(VcThemeErrorType),
}

impl fmt::Display for VcThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TYPE: {:?}\nKIND: {:?}\nACTION: {:?}\nMESSAGE: {}",
            self.get_type(),
            self.get_kind(),
            self.get_action(),
            self.get_message()
        )
    }
}

impl std::error::Error for VcThemeError {}

impl VcThemeError {
    /// Checks if the error is a critical error.
    pub fn is_critical(&self) -> bool {
        matches!(self, VcThemeError::CriticalError(_))
    }

    /// Checks if the error is a general error.
    pub fn is_general(&self) -> bool {
        matches!(self, VcThemeError::GeneralError(_))
    }

    /// Returns the action associated with this error.
    pub fn get_action(&self) -> ErrorAction {
        match self {
            VcThemeError::CriticalError(err) => err.get_action(),
            VcThemeError::GeneralError(err) => err.get_action(),
        }
    }

    /// Retrieves the error message associated with the error.
    pub fn get_message(&self) -> String {
        match self {
            VcThemeError::CriticalError(err) => err.get_message(),
            VcThemeError::GeneralError(err) => err.get_message(),
        }
    }

    /// Retrieves the kind of the error.
    pub fn get_kind(&self) -> ErrorKind {
        match self {
            VcThemeError::CriticalError(err) => err.get_kind(),
            VcThemeError::GeneralError(err) => err.get_kind(),
        }
    }

    /// Retrieves the type of the error.
    pub fn get_type(&self) -> ErrorType {
        match self {
            VcThemeError::CriticalError(err) => err.get_type(),
            VcThemeError::GeneralError(err) => err.get_type(),
        }
    }

    /// ==============================================================================================================
    ///
    /// Each `raise_*` function names both the severity (critical vs. general) and the layer the
    /// error comes from (backdrop rules, CSS document, interface, observer, runtime). Reading
    /// `VcThemeError::raise_general_backdrop_error(..)` at a call site tells the reader how the
    /// failure is going to be surfaced without inspecting the payload.
    ///
    /// ==============================================================================================================

    /// Raises a general error produced by a backdrop rule (validation, duplicates, last backdrop).
    pub fn raise_general_backdrop_error(
        kind: ErrorKind,
        message: &str,
        action: ErrorAction,
    ) -> Self {
        error!(
            "General Backdrop Error raised. Kind: {:?}, Message: '{}', Action: {:?}",
            kind, message, action
        );

        VcThemeError::GeneralError(VcThemeErrorType::BackdropError {
            kind,
            message: message.to_string(),
            action,
        })
    }

    /// Raises a general error related to reading or writing the CSS document.
    pub fn raise_general_document_error(
        kind: ErrorKind,
        message: &str,
        action: ErrorAction,
    ) -> Self {
        error!(
            "General Document Error raised. Kind: {:?}, Message: '{}', Action: {:?}",
            kind, message, action
        );

        VcThemeError::GeneralError(VcThemeErrorType::DocumentError {
            kind,
            message: message.to_string(),
            action,
        })
    }

    /// Raises a critical error related to the terminal interface.
    pub fn raise_critical_interface_error(
        kind: ErrorKind,
        message: &str,
        action: ErrorAction,
    ) -> Self {
        error!(
            "Critical Interface Error raised. Kind: {:?}, Message: '{}', Action: {:?}",
            kind, message, action
        );

        VcThemeError::CriticalError(VcThemeErrorType::InterfaceError {
            kind,
            message: message.to_string(),
            action,
        })
    }

    /// Raises a general error related to the file observer.
    pub fn raise_general_observer_error(
        kind: ErrorKind,
        message: &str,
        action: ErrorAction,
    ) -> Self {
        error!(
            "General Observer Error raised. Kind: {:?}, Message: '{}', Action: {:?}",
            kind, message, action
        );

        VcThemeError::GeneralError(VcThemeErrorType::ObserverError {
            kind,
            message: message.to_string(),
            action,
        })
    }

    /// Raises a critical error related to the VCTheme runtime.
    pub fn raise_critical_runtime_error(
        kind: ErrorKind,
        message: &str,
        action: ErrorAction,
    ) -> Self {
        error!(
            "Critical VCTheme Runtime Error raised. Kind: {:?}, Message: '{}', Action: {:?}",
            kind, message, action
        );

        VcThemeError::CriticalError(VcThemeErrorType::RuntimeError {
            kind,
            message: message.to_string(),
            action,
        })
    }

    /// Raises a general error related to the VCTheme runtime.
    pub fn raise_general_runtime_error(
        kind: ErrorKind,
        message: &str,
        action: ErrorAction,
    ) -> Self {
        error!(
            "General VCTheme Runtime Error raised. Kind: {:?}, Message: '{}', Action: {:?}",
            kind, message, action
        );

        VcThemeError::GeneralError(VcThemeErrorType::RuntimeError {
            kind,
            message: message.to_string(),
            action,
        })
    }
}

/// The payload carried by every `VcThemeError`, tagged by the layer it was raised from.
#[derive(Clone, PartialEq, Debug)]
pub enum VcThemeErrorType {
    BackdropError {
        kind: ErrorKind,
        message: String,
        action: ErrorAction,
    },
    DocumentError {
        kind: ErrorKind,
        message: String,
        action: ErrorAction,
    },
    InterfaceError {
        kind: ErrorKind,
        message: String,
        action: ErrorAction,
    },
    ObserverError {
        kind: ErrorKind,
        message: String,
        action: ErrorAction,
    },
    RuntimeError {
        kind: ErrorKind,
        message: String,
        action: ErrorAction,
    },
}

impl VcThemeErrorType {
    pub fn get_action(&self) -> ErrorAction {
        match self {
            VcThemeErrorType::BackdropError { action, .. }
            | VcThemeErrorType::DocumentError { action, .. }
            | VcThemeErrorType::InterfaceError { action, .. }
            | VcThemeErrorType::ObserverError { action, .. }
            | VcThemeErrorType::RuntimeError { action, .. } => action.clone(),
        }
    }

    pub fn get_message(&self) -> String {
        match self {
            VcThemeErrorType::BackdropError { message, .. }
            | VcThemeErrorType::DocumentError { message, .. }
            | VcThemeErrorType::InterfaceError { message, .. }
            | VcThemeErrorType::ObserverError { message, .. }
            | VcThemeErrorType::RuntimeError { message, .. } => message.clone(),
        }
    }

    pub fn get_kind(&self) -> ErrorKind {
        match self {
            VcThemeErrorType::BackdropError { kind, .. }
            | VcThemeErrorType::DocumentError { kind, .. }
            | VcThemeErrorType::InterfaceError { kind, .. }
            | VcThemeErrorType::ObserverError { kind, .. }
            | VcThemeErrorType::RuntimeError { kind, .. } => kind.clone(),
        }
    }

    pub fn get_type(&self) -> ErrorType {
        match self {
            VcThemeErrorType::BackdropError { .. } => ErrorType::BackdropError,
            VcThemeErrorType::DocumentError { .. } => ErrorType::DocumentError,
            VcThemeErrorType::InterfaceError { .. } => ErrorType::InterfaceError,
            VcThemeErrorType::ObserverError { .. } => ErrorType::ObserverError,
            VcThemeErrorType::RuntimeError { .. } => ErrorType::RuntimeError,
        }
    }
}

/// The `ErrorAction` enum defines what the user or the runtime should do next.
#[derive(Clone, PartialEq, Debug)]
pub enum ErrorAction {
    /// Tell the user and keep going.
    Notify,
    /// The user has to correct their input or file before retrying.
    Fix,
    /// The runtime has to stop.
    Exit,
}

/// The `ErrorType` enum categorizes errors by the layer that raised them.
#[derive(Clone, PartialEq, Debug)]
pub enum ErrorType {
    BackdropError,
    DocumentError,
    InterfaceError,
    ObserverError,
    RuntimeError,
}

/// The `ErrorKind` enum gives the precise reason for a failure.
#[derive(Clone, PartialEq, Debug)]
pub enum ErrorKind {
    FileNotLoaded,
    InvalidBackdropUrl,
    DuplicateBackdropUrl,
    LastBackdropDeletionBlocked,
    BackdropNotFound,
    BackdropAnchorMissing,
    NothingToRestore,
    UnknownTheme,
    ThemeFileNotFound,
    ThemesDirReadFailed,
    FileReadFailed,
    FileReadMaxRetriesExceeded,
    FileWriteFailed,
    ConfigFileReadError,
    ConfigFileParsingError,
    TracingSubscriberInitializationFailed,
    TerminalRawModeActivationFailed,
    TerminalRawModeDeactivationFailed,
    EnterTerminalAltScreenFailed,
    LeaveTerminalAltScreenFailed,
    TerminalCursorHideFailed,
    TerminalCursorUnhideFailed,
    TerminalClearScreenFailed,
    TerminalWidgetRenderingError,
    TerminalInitializationFailed,
    TerminalEventReceiveFailed,
    AsyncDebouncerCreationFailed,
    DebouncerWatchFailed,
    ObserverEventReceiveFailed,
}

#[cfg(test)]
mod tests {
    use crate::error::{ErrorAction, ErrorKind, ErrorType, VcThemeError};

    #[test]
    fn test_assert_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<VcThemeError>();
        assert_sync::<VcThemeError>();
    }

    #[test]
    fn test_is_critical() {
        let critical_error = VcThemeError::raise_critical_runtime_error(
            ErrorKind::ConfigFileParsingError,
            "Critical error occurred",
            ErrorAction::Exit,
        );
        assert!(critical_error.is_critical());

        let general_error = VcThemeError::raise_general_backdrop_error(
            ErrorKind::InvalidBackdropUrl,
            "General error occurred",
            ErrorAction::Fix,
        );
        assert!(!general_error.is_critical());
        assert!(general_error.is_general());
    }

    #[test]
    fn test_getters() {
        let error = VcThemeError::raise_general_document_error(
            ErrorKind::FileReadFailed,
            "No such file",
            ErrorAction::Notify,
        );

        assert_eq!(error.get_message(), "No such file");
        assert_eq!(error.get_kind(), ErrorKind::FileReadFailed);
        assert_eq!(error.get_type(), ErrorType::DocumentError);
        assert_eq!(error.get_action(), ErrorAction::Notify);
    }

    #[test]
    fn test_display() {
        let error = VcThemeError::raise_general_backdrop_error(
            ErrorKind::DuplicateBackdropUrl,
            "This link is already present in the list of backdrops.",
            ErrorAction::Fix,
        );

        assert_eq!(
            format!("{}", error),
            "TYPE: BackdropError\nKIND: DuplicateBackdropUrl\nACTION: Fix\nMESSAGE: This link is already present in the list of backdrops."
        );
    }
}
