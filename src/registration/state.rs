//! Wizard state machine: tracks which step the user is on.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RegistrationError;

/// A single step of a wizard. Static for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardStep {
    pub title: String,
    pub description: String,
}

impl WizardStep {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// What the wizard's primary button does on the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryAction {
    Next,
    Submit,
}

impl std::fmt::Display for PrimaryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Next => write!(f, "Next"),
            Self::Submit => write!(f, "Submit"),
        }
    }
}

/// How a step relates to the current position, for rendering the step strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMarker {
    Done,
    Current,
    Pending,
}

/// Drives a strictly linear, finite sequence of steps.
///
/// States are `0..N`; `advance` and `retreat` move by one and are no-ops at the
/// boundaries. Submission is not a transition: the terminal step only changes
/// what the primary action means.
#[derive(Debug, Clone, Serialize)]
pub struct WizardController {
    steps: Vec<WizardStep>,
    index: usize,
}

impl WizardController {
    /// Create a controller positioned on the first step.
    pub fn new(steps: Vec<WizardStep>) -> Result<Self, RegistrationError> {
        if steps.is_empty() {
            return Err(RegistrationError::NoSteps);
        }
        Ok(Self { steps, index: 0 })
    }

    pub fn steps(&self) -> &[WizardStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false: construction rejects empty step lists.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &WizardStep {
        &self.steps[self.index]
    }

    /// Move forward one step. Returns whether the index changed.
    pub fn advance(&mut self) -> bool {
        if self.index + 1 < self.steps.len() {
            self.index += 1;
            true
        } else {
            debug!(index = self.index, "advance ignored on final step");
            false
        }
    }

    /// Move back one step. Returns whether the index changed.
    pub fn retreat(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            debug!("retreat ignored on first step");
            false
        }
    }

    /// `(index + 1) / N`, always in `(0, 1]`.
    pub fn progress_fraction(&self) -> f64 {
        (self.index + 1) as f64 / self.steps.len() as f64
    }

    pub fn progress_percent(&self) -> f64 {
        self.progress_fraction() * 100.0
    }

    pub fn is_terminal(&self) -> bool {
        self.index + 1 == self.steps.len()
    }

    pub fn can_retreat(&self) -> bool {
        self.index > 0
    }

    pub fn primary_action(&self) -> PrimaryAction {
        if self.is_terminal() {
            PrimaryAction::Submit
        } else {
            PrimaryAction::Next
        }
    }

    /// Marker for step `i` relative to the current position.
    pub fn marker(&self, i: usize) -> StepMarker {
        use std::cmp::Ordering::*;
        match i.cmp(&self.index) {
            Less => StepMarker::Done,
            Equal => StepMarker::Current,
            Greater => StepMarker::Pending,
        }
    }
}
