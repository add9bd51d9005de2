//! Wizard configuration and the instance that wires navigator, gate,
//! annotator and submission together against a [`Surface`].

use std::collections::HashSet;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::StepperError;
use crate::notify::{Notifier, Severity};
use crate::surface::{InputSource, MountIds, SubmitControl, Surface};
use crate::wizard::annotator::ErrorAnnotator;
use crate::wizard::navigator::{Move, Navigator, Progress, SubmissionState};
use crate::wizard::record::SharedRecord;
use crate::wizard::step::{Collector, ElementRef, FieldError, StepDescriptor, Validator};
use crate::wizard::submission::{
    Committer, SubmissionController, SubmitOutcome, DEFAULT_SUBMIT_TIMEOUT,
};

pub const DEFAULT_ADVISORY_MESSAGE: &str = "Completa los campos requeridos.";
pub const DEFAULT_FAILURE_MESSAGE: &str =
    "No pudimos enviar el formulario. Revisa tu conexión e inténtalo nuevamente.";

/// Immutable description of one wizard.
#[derive(Clone, Debug)]
pub struct WizardConfig {
    ids: MountIds,
    total_steps: usize,
    steps: Vec<StepDescriptor>,
    success_message: String,
    advisory_message: String,
    failure_message: String,
    submit_timeout: Duration,
}

impl WizardConfig {
    pub fn builder(mount_id: impl Into<String>, total_steps: usize) -> WizardConfigBuilder {
        WizardConfigBuilder::new(mount_id.into(), total_steps)
    }

    pub fn mount_id(&self) -> &str {
        &self.ids.flow
    }

    pub fn mount_ids(&self) -> MountIds {
        self.ids.clone()
    }

    pub fn form_id(&self) -> &str {
        &self.ids.form
    }

    pub fn done_id(&self) -> &str {
        &self.ids.done
    }

    pub fn summary_id(&self) -> &str {
        &self.ids.summary
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn steps(&self) -> &[StepDescriptor] {
        &self.steps
    }

    /// Descriptor for the 1-based `position`.
    pub fn step(&self, position: usize) -> Option<&StepDescriptor> {
        position
            .checked_sub(1)
            .and_then(|index| self.steps.get(index))
    }

    pub fn success_message(&self) -> &str {
        &self.success_message
    }

    pub fn advisory_message(&self) -> &str {
        &self.advisory_message
    }

    pub fn failure_message(&self) -> &str {
        &self.failure_message
    }

    pub fn submit_timeout(&self) -> Duration {
        self.submit_timeout
    }
}

pub struct WizardConfigBuilder {
    mount_id: String,
    total_steps: usize,
    form_id: Option<String>,
    done_id: Option<String>,
    summary_id: Option<String>,
    success_message: String,
    advisory_message: String,
    failure_message: String,
    submit_timeout: Duration,
    steps: Vec<StepDescriptor>,
    collectors: Vec<(usize, Collector)>,
    validators: Vec<(usize, Validator)>,
}

impl WizardConfigBuilder {
    fn new(mount_id: String, total_steps: usize) -> Self {
        Self {
            mount_id,
            total_steps,
            form_id: None,
            done_id: None,
            summary_id: None,
            success_message: "¡Formulario enviado!".into(),
            advisory_message: DEFAULT_ADVISORY_MESSAGE.into(),
            failure_message: DEFAULT_FAILURE_MESSAGE.into(),
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
            steps: Vec::new(),
            collectors: Vec::new(),
            validators: Vec::new(),
        }
    }

    pub fn form_surface(mut self, id: impl Into<String>) -> Self {
        self.form_id = Some(id.into());
        self
    }

    pub fn done_surface(mut self, id: impl Into<String>) -> Self {
        self.done_id = Some(id.into());
        self
    }

    pub fn summary_surface(mut self, id: impl Into<String>) -> Self {
        self.summary_id = Some(id.into());
        self
    }

    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = message.into();
        self
    }

    pub fn advisory_message(mut self, message: impl Into<String>) -> Self {
        self.advisory_message = message.into();
        self
    }

    pub fn failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = message.into();
        self
    }

    pub fn submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }

    pub fn step(mut self, step: StepDescriptor) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(mut self, steps: impl IntoIterator<Item = StepDescriptor>) -> Self {
        self.steps.extend(steps);
        self
    }

    /// Extra collector for `position`, run after the step's own hooks.
    pub fn collector(mut self, position: usize, collector: Collector) -> Self {
        self.collectors.push((position, collector));
        self
    }

    /// Extra validator for `position`; its errors follow the step's own.
    pub fn validator(mut self, position: usize, validator: Validator) -> Self {
        self.validators.push((position, validator));
        self
    }

    /// Checks the step set exhaustively and freezes the configuration.
    pub fn build(self) -> Result<WizardConfig, StepperError> {
        let flow = self.mount_id.clone();
        let total = self.total_steps;
        if total == 0 {
            return Err(StepperError::NoSteps { flow });
        }

        let mut slots: Vec<Option<StepDescriptor>> = vec![None; total];
        for step in self.steps {
            let position = step.position;
            if position == 0 || position > total {
                return Err(StepperError::UnknownStep {
                    flow,
                    step: position,
                    total,
                });
            }
            let slot = &mut slots[position - 1];
            if slot.is_some() {
                return Err(StepperError::DuplicateStep {
                    flow,
                    step: position,
                });
            }
            *slot = Some(step);
        }

        let mut steps = Vec::with_capacity(total);
        for (index, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(step) => steps.push(step),
                None => {
                    return Err(StepperError::MissingStep {
                        flow,
                        step: index + 1,
                    })
                }
            }
        }

        for (position, collector) in self.collectors {
            let step = lookup_mut(&mut steps, position).ok_or(StepperError::UnknownStep {
                flow: flow.clone(),
                step: position,
                total,
            })?;
            step.push_collector(collector);
        }
        for (position, validator) in self.validators {
            let step = lookup_mut(&mut steps, position).ok_or(StepperError::UnknownStep {
                flow: flow.clone(),
                step: position,
                total,
            })?;
            step.push_validator(validator);
        }

        let mut seen = HashSet::new();
        for step in &steps {
            for control in &step.controls {
                let id = match control.element() {
                    Some(ElementRef::Field(id)) | Some(ElementRef::Group(id)) => id,
                    None => continue,
                };
                if !seen.insert(id) {
                    return Err(StepperError::DuplicateControl {
                        flow,
                        id: id.to_string(),
                    });
                }
            }
        }

        let ids = MountIds {
            form: self
                .form_id
                .unwrap_or_else(|| format!("{}-form-wrap", self.mount_id)),
            done: self.done_id.unwrap_or_else(|| format!("{}-done", self.mount_id)),
            summary: self
                .summary_id
                .unwrap_or_else(|| format!("{}-summary", self.mount_id)),
            flow: self.mount_id,
        };

        Ok(WizardConfig {
            ids,
            total_steps: total,
            steps,
            success_message: self.success_message,
            advisory_message: self.advisory_message,
            failure_message: self.failure_message,
            submit_timeout: self.submit_timeout,
        })
    }
}

fn lookup_mut(steps: &mut [StepDescriptor], position: usize) -> Option<&mut StepDescriptor> {
    position
        .checked_sub(1)
        .and_then(move |index| steps.get_mut(index))
}

/// Result of a `next`/`prev` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Moved { from: usize, to: usize },
    Blocked(Vec<FieldError>),
    Stayed,
    /// Locked, done or torn down.
    Ignored,
    /// The mount is no longer on the page.
    Detached,
}

/// Cancels a wizard's pending work from outside the event that owns it.
#[derive(Debug, Clone)]
pub struct TeardownHandle {
    token: CancellationToken,
}

impl TeardownHandle {
    pub fn teardown(&self) {
        self.token.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// One independently owned wizard bound to a mount.
pub struct WizardInstance {
    session: Uuid,
    config: WizardConfig,
    navigator: Navigator,
    record: SharedRecord,
    errors: Vec<FieldError>,
    controller: SubmissionController,
    cancel: CancellationToken,
}

impl WizardInstance {
    /// Binds `config` to its mount.
    ///
    /// Returns `Ok(None)` when the page has no such mount; the wizard simply
    /// does not activate there.
    pub fn mount<S: Surface>(
        config: WizardConfig,
        surface: &mut S,
    ) -> Result<Option<Self>, StepperError> {
        let flow = config.mount_id().to_string();
        if !surface.has_mount(&flow) {
            debug!(flow = %flow, "mount not present; wizard inactive");
            return Ok(None);
        }

        for step in config.steps() {
            if !surface.has_panel(&flow, step.position) {
                return Err(StepperError::MissingPanel {
                    flow,
                    step: step.position,
                });
            }
            for control in &step.controls {
                let (id, present) = match control.element() {
                    Some(ElementRef::Field(id)) => (id, surface.has_field(&flow, id)),
                    Some(ElementRef::Group(key)) => (key, surface.has_group(&flow, key)),
                    None => continue,
                };
                if !present {
                    return Err(StepperError::MissingControl {
                        flow,
                        step: step.position,
                        id: id.to_string(),
                    });
                }
            }
        }

        let cancel = CancellationToken::new();
        let instance = Self {
            session: Uuid::new_v4(),
            navigator: Navigator::new(config.total_steps()),
            controller: SubmissionController::new(config.submit_timeout(), cancel.clone()),
            config,
            record: SharedRecord::new(),
            errors: Vec::new(),
            cancel,
        };
        surface.show_step(&flow, 1);
        surface.render_progress(&flow, &instance.progress());
        surface.set_submit(&flow, SubmitControl::enabled());
        info!(
            flow = %flow,
            session = %instance.session,
            steps = instance.config.total_steps(),
            "wizard mounted"
        );
        Ok(Some(instance))
    }

    pub fn session_id(&self) -> Uuid {
        self.session
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn cursor(&self) -> usize {
        self.navigator.cursor()
    }

    pub fn state(&self) -> SubmissionState {
        self.navigator.state()
    }

    pub fn progress(&self) -> Progress {
        self.navigator.progress()
    }

    pub fn record(&self) -> &SharedRecord {
        &self.record
    }

    /// Errors of the latest gate attempt.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn current_step(&self) -> Option<&StepDescriptor> {
        self.config.step(self.navigator.cursor())
    }

    pub fn is_torn_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn teardown_handle(&self) -> TeardownHandle {
        TeardownHandle {
            token: self.cancel.clone(),
        }
    }

    /// Aborts any pending submission; every later event is ignored.
    pub fn teardown(&mut self) {
        if !self.cancel.is_cancelled() {
            info!(flow = %self.config.mount_id(), session = %self.session, "wizard torn down");
        }
        self.cancel.cancel();
    }

    /// Runs the collect-then-validate gate of the current step.
    pub fn validate(&mut self, input: &dyn InputSource) -> Vec<FieldError> {
        let cursor = self.navigator.cursor();
        let errors = match self.config.step(cursor) {
            Some(step) => step.gate(input, &mut self.record),
            None => Vec::new(),
        };
        debug!(
            flow = %self.config.mount_id(),
            step = cursor,
            errors = errors.len(),
            "step gate evaluated"
        );
        self.errors = errors.clone();
        errors
    }

    pub fn next<S: Surface, N: Notifier + ?Sized>(
        &mut self,
        surface: &mut S,
        notifier: &N,
    ) -> Transition {
        if let Some(blocked) = self.precheck(surface) {
            return blocked;
        }
        if self.navigator.state() != SubmissionState::Idle {
            return Transition::Ignored;
        }

        if let Some(errors) = self.run_gate(surface, notifier) {
            return Transition::Blocked(errors);
        }

        let flow = self.config.mount_id().to_string();
        match self.navigator.advance() {
            Move::Moved { from, to } => {
                surface.show_step(&flow, to);
                surface.render_progress(&flow, &self.progress());
                info!(flow = %flow, session = %self.session, from, to, "step advanced");
                Transition::Moved { from, to }
            }
            Move::Stayed => {
                surface.render_progress(&flow, &self.progress());
                Transition::Stayed
            }
            Move::Ignored => Transition::Ignored,
        }
    }

    pub fn prev<S: Surface>(&mut self, surface: &mut S) -> Transition {
        if let Some(blocked) = self.precheck(surface) {
            return blocked;
        }
        let flow = self.config.mount_id().to_string();
        match self.navigator.retreat() {
            Move::Moved { from, to } => {
                surface.show_step(&flow, to);
                surface.render_progress(&flow, &self.progress());
                info!(flow = %flow, session = %self.session, from, to, "step retreated");
                Transition::Moved { from, to }
            }
            Move::Stayed => Transition::Stayed,
            Move::Ignored => Transition::Ignored,
        }
    }

    /// Final-step submit: gate, then hand over to the submission controller.
    pub async fn submit<S, C, N>(
        &mut self,
        surface: &mut S,
        committer: &C,
        notifier: &N,
    ) -> SubmitOutcome
    where
        S: Surface,
        C: Committer + ?Sized,
        N: Notifier + ?Sized,
    {
        if self.precheck(surface).is_some() {
            return SubmitOutcome::Ignored;
        }
        if self.navigator.state() != SubmissionState::Idle || !self.navigator.is_final_step() {
            debug!(
                flow = %self.config.mount_id(),
                cursor = self.navigator.cursor(),
                state = ?self.navigator.state(),
                "submit ignored"
            );
            return SubmitOutcome::Ignored;
        }

        if let Some(errors) = self.run_gate(surface, notifier) {
            return SubmitOutcome::Rejected(errors);
        }

        self.controller
            .execute(
                &mut self.navigator,
                surface,
                &self.config,
                &self.record,
                committer,
                notifier,
            )
            .await
    }

    /// Renders the live preview of an amount control.
    pub fn preview<S: Surface>(&self, surface: &mut S, control_id: &str) -> Option<String> {
        if self.is_torn_down() {
            return None;
        }
        let field = self
            .config
            .steps()
            .iter()
            .find_map(|step| step.amount_field(control_id))?;
        let text = field.preview_text(&surface.text(control_id))?;
        surface.set_preview(self.config.mount_id(), control_id, &text);
        Some(text)
    }

    /// Starts a fresh session on step 1. Refused while locked or done.
    pub fn reset<S: Surface>(&mut self, surface: &mut S) -> bool {
        if self.precheck(surface).is_some() || !self.navigator.restart() {
            return false;
        }
        let flow = self.config.mount_id().to_string();
        self.record.clear();
        self.errors.clear();
        ErrorAnnotator::clear(surface, &flow);
        surface.show_step(&flow, 1);
        surface.render_progress(&flow, &self.progress());
        info!(flow = %flow, session = %self.session, "wizard session reset");
        true
    }

    fn precheck<S: Surface>(&self, surface: &S) -> Option<Transition> {
        if self.is_torn_down() {
            return Some(Transition::Ignored);
        }
        if !surface.has_mount(self.config.mount_id()) {
            warn!(flow = %self.config.mount_id(), "mount disappeared; event dropped");
            return Some(Transition::Detached);
        }
        None
    }

    /// Returns the errors when the gate blocks; annotations are refreshed
    /// either way.
    fn run_gate<S: Surface, N: Notifier + ?Sized>(
        &mut self,
        surface: &mut S,
        notifier: &N,
    ) -> Option<Vec<FieldError>> {
        let errors = self.validate(&*surface);
        let flow = self.config.mount_id().to_string();
        ErrorAnnotator::annotate(surface, &flow, &errors);
        if errors.is_empty() {
            return None;
        }
        notifier.notify(self.config.advisory_message(), Severity::Err);
        info!(
            flow = %flow,
            step = self.navigator.cursor(),
            errors = errors.len(),
            "transition blocked by validation"
        );
        Some(errors)
    }
}
