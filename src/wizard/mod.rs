//! Multi-step wizard engine.

pub mod annotator;
pub mod instance;
pub mod navigator;
pub mod record;
pub mod step;
pub mod submission;
pub mod summary;

pub use annotator::{AnnotationReport, ErrorAnnotator};
pub use instance::{
    TeardownHandle, Transition, WizardConfig, WizardConfigBuilder, WizardInstance,
    DEFAULT_ADVISORY_MESSAGE, DEFAULT_FAILURE_MESSAGE,
};
pub use navigator::{DotState, Move, Navigator, Progress, SubmissionState};
pub use record::{FieldValue, SharedRecord};
pub use step::{
    AmountField, ChoiceGroup, Collector, Control, FieldError, Rule, StepContext, StepDescriptor,
    TextField, Validator,
};
pub use submission::{
    Clock, CommitOutcome, Committer, Receipt, SimulatedCommit, SubmissionController,
    SubmitOutcome, SystemClock, DEFAULT_SUBMIT_DELAY, DEFAULT_SUBMIT_TIMEOUT,
};
pub use summary::{Summary, SummaryBuilder, SummaryRow};
