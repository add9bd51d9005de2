use std::time::Duration;

use thiserror::Error;

/// Failures raised while building or mounting a wizard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepperError {
    #[error("wizard `{flow}` must declare at least one step")]
    NoSteps { flow: String },
    #[error("wizard `{flow}` has no descriptor for step {step}")]
    MissingStep { flow: String, step: usize },
    #[error("wizard `{flow}` declares step {step} more than once")]
    DuplicateStep { flow: String, step: usize },
    #[error("wizard `{flow}` has {total} steps; step {step} is out of range")]
    UnknownStep {
        flow: String,
        step: usize,
        total: usize,
    },
    #[error("wizard `{flow}` uses control id `{id}` more than once")]
    DuplicateControl { flow: String, id: String },
    #[error("mount `{flow}` has no panel for step {step}")]
    MissingPanel { flow: String, step: usize },
    #[error("mount `{flow}` has no element `{id}` required by step {step}")]
    MissingControl {
        flow: String,
        step: usize,
        id: String,
    },
}

/// Outcome of a commit that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    #[error("submission timed out after {0:?}")]
    TimedOut(Duration),
    #[error("submission rejected: {0}")]
    Rejected(String),
    #[error("submission cancelled")]
    Cancelled,
}

/// Invalid input to the pricing helpers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("subtotal must be zero or positive (got {0})")]
    NegativeSubtotal(f64),
    #[error("subtotal is not a finite number")]
    NotFinite,
    #[error("product `{0}` is not in the catalog")]
    UnknownProduct(String),
}

/// Persistence failures for the user configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("no configuration directory available on this platform")]
    NoConfigDir,
    #[error("invalid setting `{key}` = `{value}`")]
    InvalidSetting { key: String, value: String },
}

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Stepper(#[from] StepperError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("Command failed: {0}")]
    Command(String),
}
