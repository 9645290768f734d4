//! Per-stage spinners

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use super::error::Stage;
use crate::fmt::{CHECKMARK, CROSSMARK};

const STAGE_WIDTH: usize = 16;

/// Draws one spinner per running stage, or nothing when disabled
#[derive(Debug, Clone, Copy)]
pub struct StageProgress {
    enabled: bool,
}

impl StageProgress {
    /// Create a reporter; `enabled = false` makes every call a no-op
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Start the spinner for `stage`
    pub fn start(&self, stage: Stage, detail: &str) -> StageSpinner {
        if !self.enabled {
            return StageSpinner {
                stage,
                bar: None,
            };
        }

        let pb_style = ProgressStyle::default_spinner()
            .template(&format!(
                "  {{spinner:.dim}} {{prefix:<{STAGE_WIDTH}}}  {{wide_msg}}"
            ))
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏✔");

        let pb = ProgressBar::new_spinner();
        pb.set_style(pb_style);
        pb.set_prefix(format!("{}", style(stage).cyan()));
        pb.set_message(format!("{}", style(detail).dim()));
        pb.enable_steady_tick(Duration::from_millis(80));

        StageSpinner {
            stage,
            bar: Some(pb),
        }
    }
}

/// A running stage spinner
#[derive(Debug)]
pub struct StageSpinner {
    stage: Stage,
    bar: Option<ProgressBar>,
}

impl StageSpinner {
    /// Update the detail text
    pub fn set_detail(&self, detail: &str) {
        if let Some(pb) = &self.bar {
            pb.set_message(format!("{}", style(detail).dim()));
        }
    }

    /// Replace the spinner with a success line
    pub fn finish_ok(self, detail: &str) {
        if let Some(pb) = self.bar {
            pb.finish_and_clear();
            eprintln!(
                "  {} {:<STAGE_WIDTH$}  {}",
                CHECKMARK,
                style(self.stage).cyan(),
                style(detail).dim()
            );
        }
    }

    /// Replace the spinner with a failure line
    pub fn finish_err(self, detail: &str) {
        if let Some(pb) = self.bar {
            pb.finish_and_clear();
            eprintln!(
                "  {} {:<STAGE_WIDTH$}  {}",
                CROSSMARK,
                style(self.stage).cyan(),
                style(detail).red()
            );
        }
    }
}
