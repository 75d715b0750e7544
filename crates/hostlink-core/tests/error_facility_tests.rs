use std::collections::HashSet;

use hostlink_core::errors::{EngineError, ErrorKind};

#[test]
fn test_only_startup_failures_are_fatal() {
    let fatal = [
        EngineError::UnsupportedPlatform {
            platform: "solaris".to_string(),
        },
        EngineError::UnsupportedVersion {
            version: "2018.3.1".to_string(),
            minimum: "6.2".to_string(),
        },
    ];
    let recoverable = [
        EngineError::ContextUnresolved {
            path: "/projects/untitled.spp".to_string(),
            reason: "no entity".to_string(),
        },
        EngineError::CommandFailed {
            name: "Publish...".to_string(),
            reason: "boom".to_string(),
        },
        EngineError::host_refused("create_toolbar", "no main window"),
        EngineError::PluginContribution {
            provider: "baker".to_string(),
            reason: "panicked".to_string(),
        },
    ];

    assert!(fatal.iter().all(|e| e.kind().is_fatal()));
    assert!(recoverable.iter().all(|e| !e.kind().is_fatal()));
}

#[test]
fn test_unknown_command_message_lists_known_commands() {
    let err = EngineError::UnknownCommand {
        setting: "toolbar_commands".to_string(),
        command: "Render Farm...".to_string(),
        known: vec!["Publish...".to_string(), "File Open...".to_string()],
    };

    let message = err.to_string();
    assert_eq!(err.code(), "ERR_CONFIGURATION_WARNING");
    assert!(message.contains("toolbar_commands"));
    assert!(message.contains("Render Farm..."));
    assert!(message.contains("Publish..."));
}

#[test]
fn test_invalid_transition_names_state() {
    let err = EngineError::InvalidTransition {
        op: "app_init".to_string(),
        state: "Destroyed".to_string(),
    };

    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(err.to_string(), "Cannot app_init while engine is Destroyed");
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "settings.yml missing");
    let err: EngineError = io.into();

    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.to_string().contains("settings.yml missing"));
}

#[test]
fn test_error_codes_are_unique() {
    let kinds = [
        ErrorKind::FatalStartup,
        ErrorKind::RecoverableContext,
        ErrorKind::ConfigurationWarning,
        ErrorKind::UiResourceFailure,
        ErrorKind::PluginContributionFailure,
        ErrorKind::DuplicateCommand,
        ErrorKind::NotFound,
        ErrorKind::CommandFailed,
        ErrorKind::InvalidState,
        ErrorKind::InvalidVersion,
        ErrorKind::InvalidSettings,
        ErrorKind::Io,
        ErrorKind::Internal,
    ];

    let codes: HashSet<&str> = kinds.iter().map(|k| k.code()).collect();
    assert_eq!(codes.len(), kinds.len());
    assert!(codes.iter().all(|c| c.starts_with("ERR_")));
}
