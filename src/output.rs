// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::time::Instant;

use crate::deploy::DeploymentSummary;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration_secs(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a warning to stderr.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Warning: {message}"),
            OutputMode::Json => emit_stderr(&JsonEvent {
                event: "warning",
                message,
                duration_secs: None,
            }),
        }
    }

    /// Print the result of a finished deployment.
    pub fn summary(&self, summary: &DeploymentSummary) {
        match self.mode {
            OutputMode::Normal => {
                println!("\nSUCCESS:");
                println!("New application ID: {}", summary.app_id);
                println!("Running instances: {}", summary.instances);
                for app in &summary.retired_apps {
                    println!("Scaled down: {app}");
                }
                println!("Finished in {:.1}s", self.elapsed_secs());
            }
            OutputMode::Quiet => println!("{} {}", summary.app_id, summary.instances),
            OutputMode::Json => {
                let event = SummaryEvent {
                    event: "success",
                    summary,
                    duration_secs: self.duration_secs(),
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    println!("{json}");
                }
            }
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => emit_stderr(&JsonEvent {
                event: "error",
                message,
                duration_secs: self.duration_secs(),
            }),
        }
    }
}

fn emit_stderr<T: Serialize>(event: &T) {
    if let Ok(json) = serde_json::to_string(event) {
        eprintln!("{json}");
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[derive(Serialize)]
struct SummaryEvent<'a> {
    event: &'a str,
    #[serde(flatten)]
    summary: &'a DeploymentSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AppId;
    use chrono::Utc;

    #[test]
    fn summary_event_flattens_fields() {
        let summary = DeploymentSummary {
            app_id: AppId::new("/svc.v2"),
            instances: 4,
            strategy: "zero downtime",
            retired_apps: vec![AppId::new("/svc.v1")],
            redeployed: false,
            started_at: Utc::now(),
            finished_at: Utc::now(),
        };
        let event = SummaryEvent {
            event: "success",
            summary: &summary,
            duration_secs: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "success");
        assert_eq!(json["app_id"], "/svc.v2");
        assert_eq!(json["instances"], 4);
        assert_eq!(json["retired_apps"][0], "/svc.v1");
        assert!(json.get("duration_secs").is_none());
    }

    #[test]
    fn timer_starts_at_zero() {
        let output = Output::new(OutputMode::Quiet);
        assert_eq!(output.elapsed_secs(), 0.0);
    }
}
