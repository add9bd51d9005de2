//! Shell state, dispatch, and the glue between commands and wizard instances.

use std::collections::HashMap;
use std::io;

use dialoguer::theme::ColorfulTheme;
use serde::Serialize;
use thiserror::Error;
use tokio::runtime::{Builder as RuntimeBuilder, Runtime};
use tracing::{debug, warn};

use crate::cli::commands;
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::cli::render::{self, ToastPrinter};
use crate::config::{Config, ConfigManager};
use crate::errors::{CliError, ConfigError, PricingError, StepperError};
use crate::flows::FlowKind;
use crate::pricing;
use crate::surface::{Document, InputSource, Surface};
use crate::cli::shell::parse_command_line;
use crate::wizard::{
    Control, Receipt, SimulatedCommit, SubmissionState, SubmitOutcome, Summary, SummaryBuilder,
    Transition, WizardInstance,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error("flow `{0}` is not mounted on this page")]
    FlowUnavailable(FlowKind),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Stepper(#[from] StepperError),
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// Result of a completed submit, kept until the flow is remounted.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReport {
    pub flow: FlowKind,
    pub receipt: Receipt,
    pub summary: Summary,
}

pub struct ShellContext {
    mode: CliMode,
    pub(crate) registry: CommandRegistry,
    theme: ColorfulTheme,
    config_manager: Option<ConfigManager>,
    config: Config,
    document: Document,
    wizards: HashMap<FlowKind, WizardInstance>,
    reports: HashMap<FlowKind, SubmissionReport>,
    active: FlowKind,
    runtime: Runtime,
    committer: SimulatedCommit,
    notifier: ToastPrinter,
    pub(crate) running: bool,
    pub(crate) last_command: Option<String>,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = match ConfigManager::new() {
            Ok(manager) => Some(manager),
            Err(err) => {
                warn!(error = %err, "config directory unavailable; settings will not persist");
                None
            }
        };
        let config = match &config_manager {
            Some(manager) => manager.load()?,
            None => Config::default(),
        };
        Self::with_config(mode, config, config_manager)
    }

    pub fn with_config(
        mode: CliMode,
        config: Config,
        config_manager: Option<ConfigManager>,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        cli_io::apply_config(&config);

        let runtime = RuntimeBuilder::new_current_thread().enable_time().build()?;
        let mut context = ShellContext {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            config_manager,
            committer: SimulatedCommit::new(config.submit_delay()),
            config,
            document: Document::new(),
            wizards: HashMap::new(),
            reports: HashMap::new(),
            active: FlowKind::Client,
            runtime,
            notifier: ToastPrinter,
            running: true,
            last_command: None,
        };
        for kind in FlowKind::ALL {
            context.mount_flow(kind)?;
        }
        Ok(context)
    }

    fn mount_flow(&mut self, kind: FlowKind) -> Result<(), StepperError> {
        if let Some(mut previous) = self.wizards.remove(&kind) {
            previous.teardown();
        }
        self.reports.remove(&kind);
        self.document.remove_flow(kind.mount_id());
        let config = kind.config(&self.config)?;
        kind.scaffold(&mut self.document, &config);
        if let Some(wizard) = WizardInstance::mount(config, &mut self.document)? {
            self.wizards.insert(kind, wizard);
        }
        Ok(())
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names()
    }

    /// Flow names plus every input id and group name of the mounted flows.
    pub(crate) fn argument_words(&self) -> Vec<String> {
        let mut words: Vec<String> = FlowKind::ALL.iter().map(ToString::to_string).collect();
        for wizard in self.wizards.values() {
            for control in wizard.config().steps().iter().flat_map(|step| step.controls.iter()) {
                match control {
                    Control::Text(field) | Control::Prose(field) => words.push(field.id.to_string()),
                    Control::Amount(field) => words.push(field.id.to_string()),
                    Control::Choice(group) | Control::Checks(group) => {
                        words.push(group.name.to_string())
                    }
                    Control::Note(_) => {}
                }
            }
        }
        words
    }

    #[cfg(test)]
    pub(crate) fn active(&self) -> FlowKind {
        self.active
    }

    #[cfg(test)]
    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn wizard(&self, kind: FlowKind) -> Result<&WizardInstance, CommandError> {
        self.wizards
            .get(&kind)
            .ok_or(CommandError::FlowUnavailable(kind))
    }

    pub(crate) fn prompt(&self) -> String {
        match self.wizards.get(&self.active) {
            Some(wizard) => format!(
                "stepper[{} {}/{}]> ",
                self.active,
                wizard.cursor(),
                wizard.config().total_steps()
            ),
            None => "stepper> ".to_string(),
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    /// Splits one input line into words and dispatches it.
    pub(crate) fn handle_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = parse_command_line(line)
            .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
        let Some(first) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        self.last_command = Some(line.trim().to_string());
        let command = first.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        let control = self.dispatch(&command, first, &args)?;
        if control == LoopControl::Exit {
            self.running = false;
        }
        Ok(control)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.registry.suggest(input) {
            cli_io::print_info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action("Exit shell?").map_err(|err| CliError::Command(err.to_string()))
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        debug!(command = ?self.last_command, error = %err, "command failed");
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    // ---- flows ------------------------------------------------------------

    pub(crate) fn switch_flow(&mut self, kind: FlowKind) -> CommandResult {
        self.wizard(kind)?;
        self.active = kind;
        self.show_active()
    }

    pub(crate) fn list_flows(&self) {
        output::section("Flows");
        for kind in FlowKind::ALL {
            let marker = if kind == self.active { "*" } else { " " };
            match self.wizards.get(&kind) {
                Some(wizard) => cli_io::print_info(format!(
                    "{marker} {:<7} {:<24} paso {}/{} ({:?})",
                    kind.to_string(),
                    kind.title(),
                    wizard.cursor(),
                    wizard.config().total_steps(),
                    wizard.state()
                )),
                None => cli_io::print_info(format!("{marker} {:<7} (not mounted)", kind.to_string())),
            }
        }
    }

    pub(crate) fn show_active(&self) -> CommandResult {
        let kind = self.active;
        let wizard = self.wizard(kind)?;
        let config = wizard.config();
        let mount = self
            .document
            .flow(config.mount_id())
            .ok_or(CommandError::FlowUnavailable(kind))?;

        output::section(kind.title());
        output::plain(render::progress_line(mount));
        if wizard.state() == SubmissionState::Done {
            if let Some(section) = self.document.section(config.summary_id()) {
                cli_io::print_lines(render::summary_lines(section));
            }
            return Ok(());
        }
        cli_io::print_lines(render::step_lines(config, mount, &self.document));
        Ok(())
    }

    pub(crate) fn set_text(&mut self, id: &str, value: &str) -> CommandResult {
        let kind = self.active;
        let mount_id = self.wizard(kind)?.config().mount_id();
        if !self.document.has_field(mount_id, id) {
            return Err(CommandError::InvalidArguments(format!(
                "`{id}` is not a field of the {kind} flow"
            )));
        }
        self.document.inputs_mut().set_text(id, value);

        let wizard = self.wizards.get(&kind).ok_or(CommandError::FlowUnavailable(kind))?;
        if let Some(preview) = wizard.preview(&mut self.document, id) {
            cli_io::print_info(preview);
        }
        Ok(())
    }

    /// Canonical spelling of `value` among the options of group `name`.
    fn resolve_option(&self, name: &str, value: &str, multi: bool) -> Result<String, CommandError> {
        let wizard = self.wizard(self.active)?;
        let group = wizard
            .config()
            .steps()
            .iter()
            .flat_map(|step| step.controls.iter())
            .find_map(|control| match control {
                Control::Choice(group) if !multi && group.name == name => Some(group),
                Control::Checks(group) if multi && group.name == name => Some(group),
                _ => None,
            })
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "`{name}` is not a {} group of the {} flow",
                    if multi { "checkbox" } else { "radio" },
                    self.active
                ))
            })?;
        group
            .options
            .iter()
            .find(|option| option.to_lowercase() == value.to_lowercase())
            .map(|option| option.to_string())
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "`{value}` is not an option of `{name}` (options: {})",
                    group.options.join(", ")
                ))
            })
    }

    pub(crate) fn pick(&mut self, name: &str, value: &str) -> CommandResult {
        let option = self.resolve_option(name, value, false)?;
        self.document.inputs_mut().pick(name, option);
        Ok(())
    }

    pub(crate) fn check(&mut self, name: &str, value: &str, on: bool) -> CommandResult {
        let option = self.resolve_option(name, value, true)?;
        if on {
            self.document.inputs_mut().check(name, option);
        } else {
            self.document.inputs_mut().uncheck(name, &option);
        }
        Ok(())
    }

    pub(crate) fn advance(&mut self) -> CommandResult {
        let kind = self.active;
        let wizard = self.wizards.get_mut(&kind).ok_or(CommandError::FlowUnavailable(kind))?;
        let transition = wizard.next(&mut self.document, &self.notifier);
        self.report_transition(kind, transition)
    }

    pub(crate) fn retreat(&mut self) -> CommandResult {
        let kind = self.active;
        let wizard = self.wizards.get_mut(&kind).ok_or(CommandError::FlowUnavailable(kind))?;
        let transition = wizard.prev(&mut self.document);
        self.report_transition(kind, transition)
    }

    fn report_transition(&self, kind: FlowKind, transition: Transition) -> CommandResult {
        match transition {
            Transition::Moved { .. } | Transition::Blocked(_) => self.show_active(),
            Transition::Stayed => {
                cli_io::print_hint("Use `submit` on the last step, `prev` to go back.");
                Ok(())
            }
            Transition::Ignored => {
                self.print_warning("The wizard is locked or finished. Use `reset` to start over.");
                Ok(())
            }
            Transition::Detached => Err(CommandError::FlowUnavailable(kind)),
        }
    }

    pub(crate) fn submit(&mut self) -> CommandResult {
        let kind = self.active;
        let wizard = self.wizards.get_mut(&kind).ok_or(CommandError::FlowUnavailable(kind))?;
        let outcome = self.runtime.block_on(wizard.submit(
            &mut self.document,
            &self.committer,
            &self.notifier,
        ));
        match outcome {
            SubmitOutcome::Completed { summary, receipt } => {
                self.show_active()?;
                cli_io::print_info(format!("Receipt {} ({} fields)", receipt.id, receipt.fields));
                self.reports.insert(
                    kind,
                    SubmissionReport {
                        flow: kind,
                        receipt,
                        summary,
                    },
                );
                Ok(())
            }
            SubmitOutcome::Rejected(_) | SubmitOutcome::Failed(_) => self.show_active(),
            SubmitOutcome::Cancelled => {
                self.print_warning("Submission cancelled.");
                Ok(())
            }
            SubmitOutcome::Ignored => {
                self.print_warning("Submit is only available on the last step while the form is open.");
                Ok(())
            }
        }
    }

    pub(crate) fn show_summary(&self) -> CommandResult {
        let wizard = self.wizard(self.active)?;
        if wizard.state() == SubmissionState::Done {
            output::section("Resumen");
            if let Some(section) = self.document.section(wizard.config().summary_id()) {
                cli_io::print_lines(render::summary_lines(section));
            }
        } else {
            output::section("Resumen (en curso)");
            cli_io::print_lines(
                SummaryBuilder::build(wizard.record())
                    .lines()
                    .into_iter()
                    .map(|line| format!("  {line}")),
            );
        }
        Ok(())
    }

    /// Prints the completed submission of the active flow as JSON.
    pub(crate) fn show_report_json(&self) -> CommandResult {
        let kind = self.active;
        let report = self.reports.get(&kind).ok_or_else(|| {
            CommandError::Message(format!("The {kind} flow has not been submitted yet."))
        })?;
        output::plain(serde_json::to_string_pretty(report)?);
        Ok(())
    }

    /// Back to step 1 with an empty record; a finished flow is remounted.
    pub(crate) fn reset(&mut self) -> CommandResult {
        let kind = self.active;
        let wizard = self.wizards.get_mut(&kind).ok_or(CommandError::FlowUnavailable(kind))?;
        if !wizard.reset(&mut self.document) {
            self.mount_flow(kind)?;
        }
        cli_io::print_success(format!("{} flow restarted.", kind));
        self.show_active()
    }

    /// Prompts for every control of the current step.
    pub(crate) fn fill(&mut self) -> CommandResult {
        if self.mode != CliMode::Interactive {
            return Err(CommandError::Message(
                "`fill` needs an interactive terminal; use set/pick/check in scripts.".into(),
            ));
        }
        let kind = self.active;
        let step = self
            .wizard(kind)?
            .current_step()
            .cloned()
            .ok_or(CommandError::FlowUnavailable(kind))?;

        for control in &step.controls {
            match control {
                Control::Text(field) | Control::Prose(field) => {
                    let current = self.document.inputs().raw_text(field.id).unwrap_or_default().to_string();
                    let prompt = format!("{} [{}]", field.label.unwrap_or(field.id), field.id);
                    let value = cli_io::prompt_text(&self.theme, &prompt, &current)?;
                    self.document.inputs_mut().set_text(field.id, value);
                }
                Control::Amount(field) => {
                    let current = self.document.inputs().raw_text(field.id).unwrap_or_default().to_string();
                    let value = cli_io::prompt_text(&self.theme, field.label, &current)?;
                    self.set_text(field.id, &value)?;
                }
                Control::Choice(group) => {
                    let selected = self.document.choice(group.name);
                    let current = group
                        .options
                        .iter()
                        .position(|option| selected.as_deref() == Some(*option));
                    let index = cli_io::select_one(&self.theme, group.label, &group.options, current)?;
                    if let Some(option) = group.options.get(index) {
                        self.document.inputs_mut().pick(group.name, *option);
                    }
                }
                Control::Checks(group) => {
                    let checked = self.document.checked(group.name);
                    let defaults: Vec<bool> = group
                        .options
                        .iter()
                        .map(|option| checked.iter().any(|value| value == option))
                        .collect();
                    let picked = cli_io::select_many(&self.theme, group.label, &group.options, &defaults)?;
                    for (index, option) in group.options.iter().enumerate() {
                        if picked.contains(&index) {
                            self.document.inputs_mut().check(group.name, *option);
                        } else {
                            self.document.inputs_mut().uncheck(group.name, option);
                        }
                    }
                }
                Control::Note(text) => cli_io::print_info(text),
            }
        }
        self.show_active()
    }

    // ---- settings ---------------------------------------------------------

    pub(crate) fn show_config(&self) -> CommandResult {
        output::section("Configuration");
        for (key, value) in self.config.entries() {
            cli_io::print_info(format!("  {:<18} {}", key, value));
        }
        if let Some(manager) = &self.config_manager {
            cli_io::print_info(format!("  file               {}", manager.config_path().display()));
        }
        Ok(())
    }

    pub(crate) fn set_config_value(&mut self, key: &str, value: &str) -> CommandResult {
        self.config.set(key, value)?;
        if let Some(manager) = &self.config_manager {
            manager.save(&self.config)?;
        }
        cli_io::apply_config(&self.config);
        self.committer = SimulatedCommit::new(self.config.submit_delay());
        cli_io::print_success(format!("Updated `{key}`."));
        if key == "submit_timeout_ms" {
            cli_io::print_hint("The new timeout applies after `reset`.");
        }
        Ok(())
    }

    pub(crate) fn quote(&self, raw: &str) -> CommandResult {
        let subtotal = parse_subtotal(raw).ok_or_else(|| {
            CommandError::InvalidArguments(format!("`{raw}` is not a number"))
        })?;
        let quote = pricing::discount(subtotal)?;
        cli_io::print_info(format!(
            "Subtotal ${} · {}% dcto. → ${} (ahorro ${})",
            pricing::format_amount(quote.subtotal),
            quote.percent,
            pricing::format_amount(quote.final_price),
            pricing::format_amount(quote.savings)
        ));
        Ok(())
    }
}

/// Accepts `120`, `120.5` and es-CL forms such as `200.000` or `1.250,5`.
fn parse_subtotal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().trim_start_matches('$');
    if trimmed.contains(',') {
        return trimmed.replace('.', "").replace(',', ".").parse().ok();
    }
    let grouped = trimmed
        .split('.')
        .skip(1)
        .all(|chunk| chunk.len() == 3 && chunk.chars().all(|ch| ch.is_ascii_digit()));
    if trimmed.contains('.') && grouped {
        return trimmed.replace('.', "").parse().ok();
    }
    trimmed.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ShellContext {
        let config = Config {
            submit_delay_ms: 0,
            ui_color_enabled: false,
            ..Config::default()
        };
        ShellContext::with_config(CliMode::Script, config, None).expect("shell context")
    }

    fn run(context: &mut ShellContext, lines: &[&str]) {
        for line in lines {
            context.handle_line(line).expect("command succeeds");
        }
    }

    #[test]
    fn both_flows_are_mounted() {
        let context = context();
        assert!(context.wizard(FlowKind::Client).is_ok());
        assert!(context.wizard(FlowKind::Worker).is_ok());
        assert_eq!(context.prompt(), "stepper[client 1/10]> ");
    }

    #[test]
    fn next_is_blocked_until_step_is_valid() {
        let mut context = context();
        run(&mut context, &["next"]);
        assert_eq!(context.wizard(FlowKind::Client).map(|w| w.cursor()).ok(), Some(1));

        run(
            &mut context,
            &[
                "set cl-nombre Ana",
                "set cl-apellido Rojas",
                "set cl-correo ana@correo.cl",
                "set cl-tel '+56 9 1234 5678'",
                "next",
            ],
        );
        assert_eq!(context.wizard(FlowKind::Client).map(|w| w.cursor()).ok(), Some(2));
    }

    #[test]
    fn unknown_fields_and_options_are_rejected() {
        let mut context = context();
        assert!(matches!(
            context.handle_line("set wk-rut 12345678"),
            Err(CommandError::InvalidArguments(_))
        ));
        assert!(matches!(
            context.handle_line("pick cl-tipo Sombrero"),
            Err(CommandError::InvalidArguments(_))
        ));
        assert!(context.handle_line("pick cl-tipo traje").is_ok());
        assert_eq!(context.document().choice("cl-tipo").as_deref(), Some("Traje"));
    }

    #[test]
    fn switching_flows_keeps_each_cursor() {
        let mut context = context();
        run(
            &mut context,
            &[
                "set cl-nombre Ana",
                "set cl-apellido Rojas",
                "set cl-correo ana@correo.cl",
                "set cl-tel 1234",
                "next",
                "flow worker",
            ],
        );
        assert_eq!(context.active(), FlowKind::Worker);
        assert_eq!(context.wizard(FlowKind::Worker).map(|w| w.cursor()).ok(), Some(1));
        assert_eq!(context.wizard(FlowKind::Client).map(|w| w.cursor()).ok(), Some(2));
    }

    #[test]
    fn completion_words_cover_both_flows() {
        let words = context().argument_words();
        for expected in ["client", "worker", "cl-presupuesto", "cl-tela", "wk-esp", "wk-ref"] {
            assert!(words.iter().any(|word| word == expected), "{expected} missing");
        }
    }

    #[test]
    fn unknown_command_keeps_the_loop_running() {
        let mut context = context();
        assert!(matches!(context.handle_line("nxet"), Ok(LoopControl::Continue)));
        assert!(context.running);
        assert!(matches!(context.handle_line("exit"), Ok(LoopControl::Exit)));
        assert!(!context.running);
        assert_eq!(context.last_command.as_deref(), Some("exit"));
    }

    #[test]
    fn unbalanced_quotes_are_reported() {
        let mut context = context();
        assert!(matches!(
            context.handle_line("set cl-nombre 'Ana"),
            Err(CommandError::InvalidArguments(_))
        ));
        assert!(matches!(context.handle_line("   "), Ok(LoopControl::Continue)));
    }

    #[test]
    fn json_report_needs_a_submitted_flow() {
        let mut context = context();
        assert!(matches!(
            context.handle_line("summary json"),
            Err(CommandError::Message(_))
        ));
        assert!(matches!(
            context.handle_line("summary yaml"),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn subtotals_parse_in_both_notations() {
        assert_eq!(parse_subtotal("120"), Some(120.0));
        assert_eq!(parse_subtotal("120.5"), Some(120.5));
        assert_eq!(parse_subtotal("200.000"), Some(200000.0));
        assert_eq!(parse_subtotal("$1.250,5"), Some(1250.5));
        assert_eq!(parse_subtotal("abc"), None);
    }
}
