//! User-facing alert delivery.
//!
//! Alerts are the watcher's only product: everything the pipeline detects
//! ends up here as a title and a message. Delivery is a strategy behind
//! the [`AlertSink`] trait so the pipeline can be exercised in tests
//! without rendering anything; sink failure is always per-event and never
//! stops the watch loop.

use std::process::{Command, ExitStatus};

use {
    parking_lot::Mutex,
    thiserror::Error,
    tracing::{info, warn},
};

/// Error type for alert delivery.
#[derive(Error, Debug)]
pub enum AlertError {
    /// The notifier command could not be launched.
    #[error("failed to run alert command: {0}")]
    Io(#[from] std::io::Error),
    /// The notifier command ran but reported failure.
    #[error("alert command exited with status {status}")]
    CommandFailed { status: ExitStatus },
    /// An empty notifier command was configured.
    #[error("alert command is empty")]
    EmptyCommand,
}

/// Delivery strategy for user-facing alerts.
pub trait AlertSink: Send + Sync {
    /// Delivers one alert.
    ///
    /// # Errors
    ///
    /// Returns `AlertError` when delivery fails; the caller logs it and
    /// keeps processing events.
    fn alert(&self, title: &str, message: &str) -> Result<(), AlertError>;
}

/// Writes alerts to the log only. The fallback when no notifier command
/// is configured.
#[derive(Debug, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn alert(&self, title: &str, message: &str) -> Result<(), AlertError> {
        warn!("<< {} >> {}", title, message);
        Ok(())
    }
}

/// Invokes an external notifier command (such as `notify-send`),
/// appending the alert title and message as its final two arguments.
#[derive(Debug, Clone)]
pub struct CommandAlertSink {
    program: String,
    args: Vec<String>,
}

impl CommandAlertSink {
    /// Builds a sink from the configured command line.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::EmptyCommand` when `command` has no program.
    pub fn new(command: &[String]) -> Result<Self, AlertError> {
        let Some((program, args)) = command.split_first() else {
            return Err(AlertError::EmptyCommand);
        };

        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl AlertSink for CommandAlertSink {
    fn alert(&self, title: &str, message: &str) -> Result<(), AlertError> {
        info!("<< {} >> {}", title, message);

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(title)
            .arg(message)
            .status()?;

        if !status.success() {
            return Err(AlertError::CommandFailed { status });
        }

        Ok(())
    }
}

/// Records alerts instead of rendering them; the test double for the
/// pipeline's sink.
#[derive(Debug, Default)]
pub struct RecordingAlertSink {
    alerts: Mutex<Vec<(String, String)>>,
}

impl RecordingAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alerts recorded so far, in delivery order.
    pub fn recorded(&self) -> Vec<(String, String)> {
        self.alerts.lock().clone()
    }
}

impl AlertSink for RecordingAlertSink {
    fn alert(&self, title: &str, message: &str) -> Result<(), AlertError> {
        self.alerts
            .lock()
            .push((title.to_string(), message.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::alert::{AlertError, AlertSink, CommandAlertSink, LogAlertSink, RecordingAlertSink};

    #[test]
    fn test_recording_sink_keeps_delivery_order() {
        let sink = RecordingAlertSink::new();
        sink.alert("WRONG FOLDER", "first").unwrap();
        sink.alert("INVALID NAME", "second").unwrap();

        assert_eq!(
            sink.recorded(),
            vec![
                ("WRONG FOLDER".to_string(), "first".to_string()),
                ("INVALID NAME".to_string(), "second".to_string()),
            ]
        );
    }

    #[test]
    fn test_log_sink_always_succeeds() {
        assert!(LogAlertSink.alert("WRONG FOLDER", "message").is_ok());
    }

    #[test]
    fn test_empty_command_is_rejected() {
        assert!(matches!(
            CommandAlertSink::new(&[]),
            Err(AlertError::EmptyCommand)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_sink_reports_exit_status() {
        let ok = CommandAlertSink::new(&["true".to_string()]).unwrap();
        assert!(ok.alert("TITLE", "message").is_ok());

        let failing = CommandAlertSink::new(&["false".to_string()]).unwrap();
        assert!(matches!(
            failing.alert("TITLE", "message"),
            Err(AlertError::CommandFailed { .. })
        ));
    }
}
