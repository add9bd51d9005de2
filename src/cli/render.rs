//! Plain-text views of a wizard mount. Colour is applied by `output`.

use crate::cli::output;
use crate::notify::{Notifier, Severity};
use crate::surface::{FlowMount, InputSource, Section};
use crate::wizard::{Control, DotState, StepDescriptor, WizardConfig};

const BAR_WIDTH: usize = 20;

pub fn progress_line(mount: &FlowMount) -> String {
    let dots: String = mount
        .dots
        .iter()
        .map(|dot| match dot {
            DotState::Done => '●',
            DotState::Active => '◉',
            DotState::Pending => '○',
        })
        .collect();
    let filled = (usize::from(mount.progress.fill_percent) * BAR_WIDTH / 100).min(BAR_WIDTH);
    format!(
        "{dots}  [{}{}] {} · {}",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled),
        mount.progress.step_text,
        mount.progress.percent_text
    )
}

/// Active panel of `config`'s mount with live values and error markers.
pub fn step_lines(config: &WizardConfig, mount: &FlowMount, input: &dyn InputSource) -> Vec<String> {
    let Some(step) = mount.active_step().and_then(|pos| config.step(pos)) else {
        return vec!["(no active step)".to_string()];
    };
    let mut lines = vec![format!("Paso {}: {}", step.position, step.title)];
    lines.extend(control_lines(step, mount, input));
    if let Some(banner) = &mount.banner {
        lines.push(format!("  ! {banner}"));
    }
    if step.position == config.total_steps() {
        let state = match (mount.submit.disabled, mount.submit.loading) {
            (true, true) => "enviando…",
            (true, false) => "enviado",
            _ => "listo para enviar",
        };
        lines.push(format!("  [Enviar] {state}"));
    }
    lines
}

fn control_lines(step: &StepDescriptor, mount: &FlowMount, input: &dyn InputSource) -> Vec<String> {
    let mut lines = Vec::new();
    for control in &step.controls {
        match control {
            Control::Text(field) | Control::Prose(field) => {
                let value = input.text(field.id);
                let label = field.label.unwrap_or(field.id);
                lines.push(format!("  {label} [{}]: {}", field.id, or_dash(&value)));
                push_field_error(&mut lines, mount, field.id);
            }
            Control::Amount(field) => {
                let display = field.display(&input.text(field.id));
                lines.push(format!("  {} [{}]: {}", field.label, field.id, or_dash(&display)));
                if let Some(preview) = mount.field(field.id).and_then(|slot| slot.preview.as_ref()) {
                    lines.push(format!("    {preview}"));
                }
                push_field_error(&mut lines, mount, field.id);
            }
            Control::Choice(group) => {
                lines.push(format!("  {} [{}]:", group.label, group.name));
                let selected = input.choice(group.name);
                for option in &group.options {
                    let mark = if selected.as_deref() == Some(*option) { "(•)" } else { "( )" };
                    lines.push(format!("    {mark} {option}"));
                }
                push_group_advisories(&mut lines, mount, group.group);
            }
            Control::Checks(group) => {
                lines.push(format!("  {} [{}]:", group.label, group.name));
                let checked = input.checked(group.name);
                for option in &group.options {
                    let mark = if checked.iter().any(|value| value == option) { "[x]" } else { "[ ]" };
                    lines.push(format!("    {mark} {option}"));
                }
                push_group_advisories(&mut lines, mount, group.group);
            }
            Control::Note(text) => lines.push(format!("  ℹ {text}")),
        }
    }
    lines
}

fn push_field_error(lines: &mut Vec<String>, mount: &FlowMount, id: &str) {
    if let Some(slot) = mount.field(id).filter(|slot| slot.error) {
        lines.push(format!("    ✗ {}", slot.error_text));
    }
}

fn push_group_advisories(lines: &mut Vec<String>, mount: &FlowMount, key: &str) {
    for advisory in mount.group_errors.iter().filter(|adv| adv.group == key) {
        lines.push(format!("    {}", advisory.text));
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "—"
    } else {
        value
    }
}

pub fn summary_lines(section: &Section) -> Vec<String> {
    section
        .rows
        .iter()
        .map(|row| format!("  {}: {}", row.label, row.value))
        .collect()
}

/// Prints toasts as coloured terminal lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct ToastPrinter;

impl Notifier for ToastPrinter {
    fn notify(&self, message: &str, severity: Severity) {
        let line = format!("{} {}", severity.icon(), message);
        match severity {
            Severity::Ok => output::success(line),
            Severity::Err => output::error(line),
            Severity::Info => output::info(line),
        }
        tracing::debug!(?severity, message, "toast");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Document, Surface};
    use crate::wizard::{
        ChoiceGroup, Progress, Rule, StepDescriptor, TextField, WizardConfig,
    };

    fn config() -> WizardConfig {
        let mut steps: Vec<StepDescriptor> = (1..=10)
            .map(|pos| StepDescriptor::display_only(pos, "Paso"))
            .collect();
        steps[2] = StepDescriptor::new(
            3,
            "Tipo de prenda",
            vec![
                Control::Choice(
                    ChoiceGroup::new("cl-tipo", "g-tipo", "Tipo de prenda", vec!["Traje", "Camisa"])
                        .required("Elige el tipo de prenda."),
                ),
                Control::Text(TextField::new("cl-nota", "Nota", Rule::Optional)),
            ],
        );
        WizardConfig::builder("flow-client", 10)
            .steps(steps)
            .build()
            .expect("valid config")
    }

    #[test]
    fn progress_line_shows_dots_and_bar() {
        let config = config();
        let mut doc = Document::new();
        doc.scaffold(&config);
        doc.render_progress("flow-client", &Progress::at(3, 10));
        let mount = doc.flow("flow-client").cloned().unwrap_or_default();
        insta::assert_snapshot!(
            progress_line(&mount),
            @"●●◉○○○○○○○  [████░░░░░░░░░░░░░░░░] Paso 3 de 10 · 20% completado"
        );
    }

    #[test]
    fn step_lines_render_selection_and_advisory() {
        let config = config();
        let mut doc = Document::new();
        doc.scaffold(&config);
        doc.show_step("flow-client", 3);
        doc.inputs_mut().pick("cl-tipo", "Camisa");
        doc.mark_group("flow-client", "g-tipo", "⚠ Elige el tipo de prenda.");

        let mount = doc.flow("flow-client").cloned().unwrap_or_default();
        let lines = step_lines(&config, &mount, &doc);
        assert_eq!(
            lines,
            vec![
                "Paso 3: Tipo de prenda",
                "  Tipo de prenda [cl-tipo]:",
                "    ( ) Traje",
                "    (•) Camisa",
                "    ⚠ Elige el tipo de prenda.",
                "  Nota [cl-nota]: —",
            ]
        );
    }
}
